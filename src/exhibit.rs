// 🖼️ Exhibit catalog - the 14 case selectors
//
// Each exhibit pairs a template asset (templates/*.html, embedded at build
// time) with the DataStore tables it binds. Templates never hold numbers and
// the DataStore never holds markup.

use crate::data::DataStore;
use crate::error::{CasebookError, Result};
use crate::template::{Bindings, Rendered, TemplateRenderer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exhibit {
    Q1,
    Q2,
    Q3,
    Q4,
    Q5,
    Q6,
    Exhibit1,
    Exhibit2,
    Exhibit3,
    Exhibit4,
    Exhibit5,
    Exhibit6,
    Exhibit7,
    Exhibit8,
}

impl Exhibit {
    /// Selector order as shown in the button row
    pub const ALL: [Exhibit; 14] = [
        Exhibit::Q1,
        Exhibit::Q2,
        Exhibit::Q3,
        Exhibit::Q4,
        Exhibit::Q5,
        Exhibit::Q6,
        Exhibit::Exhibit1,
        Exhibit::Exhibit2,
        Exhibit::Exhibit3,
        Exhibit::Exhibit4,
        Exhibit::Exhibit5,
        Exhibit::Exhibit6,
        Exhibit::Exhibit7,
        Exhibit::Exhibit8,
    ];

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            Exhibit::Q1 => "Q1",
            Exhibit::Q2 => "Q2",
            Exhibit::Q3 => "Q3",
            Exhibit::Q4 => "Q4",
            Exhibit::Q5 => "Q5",
            Exhibit::Q6 => "Q6",
            Exhibit::Exhibit1 => "Exhibit 1",
            Exhibit::Exhibit2 => "Exhibit 2",
            Exhibit::Exhibit3 => "Exhibit 3",
            Exhibit::Exhibit4 => "Exhibit 4",
            Exhibit::Exhibit5 => "Exhibit 5",
            Exhibit::Exhibit6 => "Exhibit 6",
            Exhibit::Exhibit7 => "Exhibit 7",
            Exhibit::Exhibit8 => "Exhibit 8",
        }
    }

    /// URL and file-name form: `q1` ... `exhibit-8`
    pub fn slug(&self) -> &'static str {
        match self {
            Exhibit::Q1 => "q1",
            Exhibit::Q2 => "q2",
            Exhibit::Q3 => "q3",
            Exhibit::Q4 => "q4",
            Exhibit::Q5 => "q5",
            Exhibit::Q6 => "q6",
            Exhibit::Exhibit1 => "exhibit-1",
            Exhibit::Exhibit2 => "exhibit-2",
            Exhibit::Exhibit3 => "exhibit-3",
            Exhibit::Exhibit4 => "exhibit-4",
            Exhibit::Exhibit5 => "exhibit-5",
            Exhibit::Exhibit6 => "exhibit-6",
            Exhibit::Exhibit7 => "exhibit-7",
            Exhibit::Exhibit8 => "exhibit-8",
        }
    }

    pub fn title(&self) -> &'static str {
        self.headers()[0]
    }

    /// Section headers the rendered document must contain; the first is the
    /// page title
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            Exhibit::Q1 => &[
                "P&G Supplier Payment Terms Extension",
                "Cost-Reduction Program",
                "Payment Terms vs Industry",
                "Working-Capital Metrics",
            ],
            Exhibit::Q2 => &[
                "Impact of the 75-Day Terms on P&G and Fibria",
                "P&G: Gains and Costs",
                "Fibria: Costs and Considerations",
                "Interest Cost Comparison",
            ],
            Exhibit::Q3 => &[
                "SCF Invoice Discount Economics",
                "Discount Rate Build-Up",
                "Supplier Proceeds by Arrangement",
                "Cash Received Over Time",
            ],
            Exhibit::Q4 => &[
                "P&G SCF Program: Win-Win-Win Analysis",
                "Who Wins",
                "Who Could Lose",
                "Key Success Factors",
                "Program Adoption",
                "Conclusion",
            ],
            Exhibit::Q5 => &[
                "Should Fibria Keep Using the SCF Program?",
                "BRL/USD Exchange Rate",
                "Foreign-Exchange Losses",
                "Borrowing Cost by Credit Rating",
                "Cash Cycle by Payment Arrangement",
                "Recommendation",
            ],
            Exhibit::Q6 => &[
                "Renewing the SCF Agreement in 2015",
                "Discount Under Renewal Scenarios",
                "SCF Advantage by Credit Rating",
                "3M LIBOR Trend",
                "Negotiating Position",
            ],
            Exhibit::Exhibit1 => &[
                "P&G Income Statement (2011-2015)",
                "Revenue and Profit",
                "Cost Structure",
                "Margin Trends",
                "Per-Share Data",
            ],
            Exhibit::Exhibit2 => &[
                "P&G Balance Sheet Analysis (2011-2015)",
                "Assets, Liabilities and Equity",
                "Liquidity and Leverage",
                "Working Capital Components",
                "Cash Conversion Cycle",
            ],
            Exhibit::Exhibit3 => &[
                "P&G Working Capital Management (2000-2015)",
                "DSO, DIO, DPO and CCC",
                "Cash Conversion Cycle",
                "Key Milestones",
            ],
            Exhibit::Exhibit4 => &[
                "P&G Supply Chain Finance Economics",
                "Table A: Payment Scenarios",
                "Payment Timeline",
                "Table B: Invoice Discount",
                "Supplier Perspective",
                "P&G Perspective",
            ],
            Exhibit::Exhibit5 => &[
                "Fibria Financial Analysis (2012-2015)",
                "Revenue and Profit",
                "Profitability Ratios",
                "Exchange Rate and Pulp Price",
                "SCF Program Impact",
            ],
            Exhibit::Exhibit6 => &[
                "Fibria Balance Sheet Analysis (2012-2015)",
                "Assets and Capital Structure",
                "Debt and Liquidity",
                "Working Capital",
                "SCF Effect on the P&G Receivable",
            ],
            Exhibit::Exhibit7 => &[
                "Fibria Working Capital Analysis (2005-2015)",
                "Cash Conversion Cycle Trend",
                "Cycle by Payment Arrangement",
                "Before and After SCF",
                "Working Capital Tied Up",
                "Financing Terms",
            ],
            Exhibit::Exhibit8 => &[
                "Market Interest Rates (Exhibit 8)",
                "US Treasury Yield Curve",
                "Corporate Bond Yields by Rating",
                "Short-Term Rates",
                "SCF Rate Simulation",
                "Ratings Comparison",
                "LIBOR History",
            ],
        }
    }

    /// Binding keys of the DataStore tables this exhibit embeds
    pub fn tables(&self) -> &'static [&'static str] {
        match self {
            Exhibit::Q1 => &[
                "pgFinancialData",
                "pgCostCuttingData",
                "pgPaymentTermsData",
                "pgCashCycleData",
            ],
            Exhibit::Q2 => &["scfPaymentTermsData", "scfImpactData", "scfInterestRangeData"],
            Exhibit::Q3 => &[
                "scfTableBData",
                "scfDiscountRateData",
                "scfSupplierPerspectiveData",
                "scfPaymentTimelineData",
            ],
            Exhibit::Q4 => &[
                "scfPartyData",
                "scfSuccessFactorData",
                "scfAdoptionData",
                "scfProgramTimelineData",
            ],
            Exhibit::Q5 => &[
                "exchangeRateData",
                "currencyLossData",
                "creditRateData",
                "fibriaSCFScenarioData",
            ],
            Exhibit::Q6 => &[
                "scfRateSimulationData",
                "ratingsComparisonData",
                "historicalLiborData",
                "shortTermRatesData",
            ],
            Exhibit::Exhibit1 => &["pgFinancialData"],
            Exhibit::Exhibit2 => &["pgBalanceSheetData", "pgWorkingCapitalData"],
            Exhibit::Exhibit3 => &["pgCashCycleData", "pgTimelineData"],
            Exhibit::Exhibit4 => &[
                "scfTableAData",
                "scfPaymentTimelineData",
                "scfTableBData",
                "scfDiscountRateData",
                "scfSupplierPerspectiveData",
                "scfBuyerPerspectiveData",
            ],
            Exhibit::Exhibit5 => &[
                "fibriaFinancialData",
                "fibriaMarketData",
                "fibriaSCFImpactData",
            ],
            Exhibit::Exhibit6 => &[
                "fibriaBalanceSheetData",
                "fibriaWorkingCapitalData",
                "fibriaSCFAnalysisData",
            ],
            Exhibit::Exhibit7 => &[
                "fibriaCashCycleData",
                "fibriaSCFScenarioData",
                "fibriaCycleComparisonData",
                "fibriaWorkingCapitalNeedData",
                "fibriaFinancingRatesData",
            ],
            Exhibit::Exhibit8 => &[
                "treasuryYieldsData",
                "corporateBondYieldsData",
                "shortTermRatesData",
                "scfRateSimulationData",
                "ratingsComparisonData",
                "historicalLiborData",
            ],
        }
    }

    /// Static markup for this exhibit
    pub fn template_source(&self) -> &'static str {
        match self {
            Exhibit::Q1 => include_str!("../templates/q1.html"),
            Exhibit::Q2 => include_str!("../templates/q2.html"),
            Exhibit::Q3 => include_str!("../templates/q3.html"),
            Exhibit::Q4 => include_str!("../templates/q4.html"),
            Exhibit::Q5 => include_str!("../templates/q5.html"),
            Exhibit::Q6 => include_str!("../templates/q6.html"),
            Exhibit::Exhibit1 => include_str!("../templates/exhibit-1.html"),
            Exhibit::Exhibit2 => include_str!("../templates/exhibit-2.html"),
            Exhibit::Exhibit3 => include_str!("../templates/exhibit-3.html"),
            Exhibit::Exhibit4 => include_str!("../templates/exhibit-4.html"),
            Exhibit::Exhibit5 => include_str!("../templates/exhibit-5.html"),
            Exhibit::Exhibit6 => include_str!("../templates/exhibit-6.html"),
            Exhibit::Exhibit7 => include_str!("../templates/exhibit-7.html"),
            Exhibit::Exhibit8 => include_str!("../templates/exhibit-8.html"),
        }
    }

    pub fn renderer(&self) -> TemplateRenderer {
        TemplateRenderer::new(self.slug(), self.template_source())
    }

    /// Bind this exhibit's tables from the store.
    ///
    /// An unknown key is a catalog bug and is returned as an error; a table
    /// that fails to serialize is bound as-is and falls back at render time.
    pub fn bindings(&self, store: &DataStore) -> Result<Bindings> {
        let mut bindings = Bindings::new();
        for key in self.tables() {
            let value = store
                .table_json(key)
                .ok_or_else(|| CasebookError::UnknownTable(key.to_string()))?;
            bindings = bindings.bind_json(key, value);
        }
        Ok(bindings)
    }

    pub fn render(&self, store: &DataStore) -> Result<Rendered> {
        let bindings = self.bindings(store)?;
        Ok(self.renderer().render(&bindings))
    }
}

impl fmt::Display for Exhibit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Exhibit {
    type Err = CasebookError;

    /// Accepts `Q1`, `q1`, `Exhibit 8`, `exhibit-8`, `exhibit8`, `e8`
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();

        let index = if let Some(n) = normalized.strip_prefix('q') {
            n.parse::<usize>().ok().filter(|n| (1..=6).contains(n)).map(|n| n - 1)
        } else {
            normalized
                .strip_prefix("exhibit")
                .or_else(|| normalized.strip_prefix('e'))
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| (1..=8).contains(n))
                .map(|n| n + 5)
        };

        index
            .map(|i| Exhibit::ALL[i])
            .ok_or_else(|| CasebookError::UnknownExhibit(s.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::PLACEHOLDER_SUFFIX;

    #[test]
    fn test_parse_selectors() {
        assert_eq!("Q1".parse::<Exhibit>().unwrap(), Exhibit::Q1);
        assert_eq!("q6".parse::<Exhibit>().unwrap(), Exhibit::Q6);
        assert_eq!("Exhibit 8".parse::<Exhibit>().unwrap(), Exhibit::Exhibit8);
        assert_eq!("exhibit-2".parse::<Exhibit>().unwrap(), Exhibit::Exhibit2);
        assert_eq!("exhibit1".parse::<Exhibit>().unwrap(), Exhibit::Exhibit1);
        assert_eq!("E5".parse::<Exhibit>().unwrap(), Exhibit::Exhibit5);
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!("q7".parse::<Exhibit>().is_err());
        assert!("exhibit 9".parse::<Exhibit>().is_err());
        assert!("exhibit 0".parse::<Exhibit>().is_err());
        assert!("balance".parse::<Exhibit>().is_err());
    }

    #[test]
    fn test_slug_round_trips_through_parse() {
        for exhibit in Exhibit::ALL {
            assert_eq!(exhibit.slug().parse::<Exhibit>().unwrap(), exhibit);
            assert_eq!(exhibit.label().parse::<Exhibit>().unwrap(), exhibit);
        }
    }

    #[test]
    fn test_every_template_declares_exactly_its_tables() {
        let store = DataStore::new();

        for exhibit in Exhibit::ALL {
            let renderer = exhibit.renderer();
            let bindings = exhibit.bindings(&store).unwrap();
            let (unused, unbound) = renderer.check(&bindings);

            assert!(unused.is_empty(), "{}: tables without placeholder {:?}", exhibit, unused);
            assert!(unbound.is_empty(), "{}: placeholders without table {:?}", exhibit, unbound);
        }
    }

    #[test]
    fn test_every_exhibit_renders_clean_with_headers() {
        let store = DataStore::new();

        for exhibit in Exhibit::ALL {
            let rendered = exhibit.render(&store).unwrap();

            assert!(!rendered.document.is_empty());
            assert!(
                !rendered.document.contains(PLACEHOLDER_SUFFIX),
                "{} left a placeholder",
                exhibit
            );
            assert!(rendered.report.is_clean(), "{}", rendered.report.summary());

            for header in exhibit.headers() {
                assert!(
                    rendered.document.contains(header),
                    "{} is missing header {:?}",
                    exhibit,
                    header
                );
            }
        }
    }

    #[test]
    fn test_balance_sheet_exhibit_embeds_first_record_verbatim() {
        let store = DataStore::new();
        let rendered = Exhibit::Exhibit2.render(&store).unwrap();

        let expected = serde_json::to_string(&store.pg_balance_sheet()[0]).unwrap();
        assert!(expected
            .starts_with(r#"{"year":"2011","currentAssets":21970,"totalAssets":138354,"#));
        assert!(rendered.document.contains(&format!("[{},", expected)));
    }

    #[test]
    fn test_table_keys_exist_in_store() {
        for exhibit in Exhibit::ALL {
            for key in exhibit.tables() {
                assert!(DataStore::table_info(key).is_some(), "{} -> {}", exhibit, key);
            }
        }
    }
}
