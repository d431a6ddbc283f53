// 🗄️ DataStore - literal case-study tables grouped by topic
//
// Tables are built once and never mutated. Each table has a binding key
// (camelCase, e.g. `pgBalanceSheetData`) that templates use to locate it.

pub mod fibria;
pub mod market;
pub mod pg;
pub mod records;
pub mod scf;

use crate::error::{CasebookError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use fibria::FibriaTables;
pub use market::MarketTables;
pub use pg::PgTables;
pub use records::*;
pub use scf::ScfTables;

// ============================================================================
// TOPICS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Pg,
    Fibria,
    Scf,
    Market,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Pg => "P&G",
            Topic::Fibria => "Fibria",
            Topic::Scf => "SCF economics",
            Topic::Market => "Market rates",
        }
    }
}

/// Catalog entry for one table
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TableInfo {
    pub key: &'static str,
    pub topic: Topic,
    pub title: &'static str,
}

const fn info(key: &'static str, topic: Topic, title: &'static str) -> TableInfo {
    TableInfo { key, topic, title }
}

/// All tables in topic order
pub const TABLES: &[TableInfo] = &[
    info("pgFinancialData", Topic::Pg, "P&G income statement 2011-2015"),
    info("pgBalanceSheetData", Topic::Pg, "P&G balance sheet 2011-2015"),
    info("pgWorkingCapitalData", Topic::Pg, "P&G working capital balances"),
    info("pgCashCycleData", Topic::Pg, "P&G DSO/DIO/DPO/CCC 2000-2015"),
    info("pgTimelineData", Topic::Pg, "P&G working-capital milestones"),
    info("pgCostCuttingData", Topic::Pg, "P&G cost-reduction mix (%)"),
    info("pgPaymentTermsData", Topic::Pg, "Payment terms vs industry (days)"),
    info("fibriaFinancialData", Topic::Fibria, "Fibria income statement 2012-2015"),
    info("fibriaMarketData", Topic::Fibria, "BRL/USD and pulp price"),
    info("fibriaSCFImpactData", Topic::Fibria, "Fibria financing cost with and without SCF"),
    info("fibriaBalanceSheetData", Topic::Fibria, "Fibria balance sheet 2012-2015"),
    info("fibriaWorkingCapitalData", Topic::Fibria, "Fibria working capital balances"),
    info("fibriaSCFAnalysisData", Topic::Fibria, "Fibria P&G receivable before and after SCF"),
    info("fibriaCashCycleData", Topic::Fibria, "Fibria DSO/DSI/DPO/CCC 2005-2015"),
    info(
        "fibriaSCFScenarioData",
        Topic::Fibria,
        "Fibria cash cycle under each payment arrangement",
    ),
    info("fibriaCycleComparisonData", Topic::Fibria, "Fibria cycle before and after SCF"),
    info("fibriaWorkingCapitalNeedData", Topic::Fibria, "Capital tied up in the P&G receivable"),
    info("fibriaFinancingRatesData", Topic::Fibria, "SCF vs standalone funding"),
    info("exchangeRateData", Topic::Fibria, "BRL/USD year-end rate"),
    info("currencyLossData", Topic::Fibria, "Fibria FX losses (BRL millions)"),
    info("creditRateData", Topic::Fibria, "One-year yield by rating"),
    info("scfTableAData", Topic::Scf, "Table A: payment scenarios on a $1,000 invoice"),
    info("scfPaymentTimelineData", Topic::Scf, "Cash received by day"),
    info("scfTableBData", Topic::Scf, "Table B: invoice discount calculation"),
    info("scfDiscountRateData", Topic::Scf, "Discount rate components"),
    info("scfSupplierPerspectiveData", Topic::Scf, "Supplier view of the three arrangements"),
    info("scfBuyerPerspectiveData", Topic::Scf, "P&G view of the extension"),
    info("scfPaymentTermsData", Topic::Scf, "Payment-term change (days)"),
    info("scfImpactData", Topic::Scf, "Impact of the term extension on P&G and Fibria"),
    info("scfInterestRangeData", Topic::Scf, "Annual interest effect ranges"),
    info("scfPartyData", Topic::Scf, "Win-win-win: who gains and who loses"),
    info("scfSuccessFactorData", Topic::Scf, "SCF program success factors"),
    info("scfAdoptionData", Topic::Scf, "Supplier participation (%)"),
    info("scfProgramTimelineData", Topic::Scf, "SCF program milestones"),
    info("treasuryYieldsData", Topic::Market, "US Treasury yield curve"),
    info("corporateBondYieldsData", Topic::Market, "One-year corporate yields by rating"),
    info("shortTermRatesData", Topic::Market, "LIBOR and commercial paper"),
    info("scfRateSimulationData", Topic::Market, "SCF discount under renewal scenarios"),
    info("ratingsComparisonData", Topic::Market, "Borrowing cost vs SCF discount by rating"),
    info("historicalLiborData", Topic::Market, "3M LIBOR history"),
];

// ============================================================================
// DATA STORE
// ============================================================================

/// Read-only holder of every literal table
pub struct DataStore {
    pg: PgTables,
    fibria: FibriaTables,
    scf: ScfTables,
    market: MarketTables,
}

impl DataStore {
    pub fn new() -> Self {
        DataStore {
            pg: pg::build(),
            fibria: fibria::build(),
            scf: scf::build(),
            market: market::build(),
        }
    }

    pub fn pg(&self) -> &PgTables {
        &self.pg
    }

    pub fn fibria(&self) -> &FibriaTables {
        &self.fibria
    }

    pub fn scf(&self) -> &ScfTables {
        &self.scf
    }

    pub fn market(&self) -> &MarketTables {
        &self.market
    }

    // ------------------------------------------------------------------------
    // Typed accessors for the tables the exhibits lean on most
    // ------------------------------------------------------------------------

    pub fn pg_financials(&self) -> &[FinancialYearRecord] {
        &self.pg.financials
    }

    pub fn pg_balance_sheet(&self) -> &[BalanceSheetRecord] {
        &self.pg.balance_sheet
    }

    pub fn pg_working_capital(&self) -> &[WorkingCapitalRecord] {
        &self.pg.working_capital
    }

    pub fn pg_cash_cycle(&self) -> &[CashCycleRecord] {
        &self.pg.cash_cycle
    }

    pub fn fibria_income(&self) -> &[FibriaIncomeRecord] {
        &self.fibria.income
    }

    pub fn fibria_balance_sheet(&self) -> &[FibriaBalanceSheetRecord] {
        &self.fibria.balance_sheet
    }

    pub fn fibria_cash_cycle(&self) -> &[CashCycleRecord] {
        &self.fibria.cash_cycle
    }

    pub fn scf_rate_simulation(&self) -> &[RateScenarioRecord] {
        &self.market.scf_rate_simulation
    }

    pub fn ratings_comparison(&self) -> &[RatingComparisonRecord] {
        &self.market.ratings_comparison
    }

    // ------------------------------------------------------------------------
    // Keyed access
    // ------------------------------------------------------------------------

    /// Binding keys in topic order
    pub fn table_names(&self) -> Vec<&'static str> {
        TABLES.iter().map(|t| t.key).collect()
    }

    pub fn table_info(name: &str) -> Option<&'static TableInfo> {
        TABLES.iter().find(|t| t.key == name)
    }

    /// Serialize one table by binding key.
    ///
    /// Returns `None` for an unknown key. The inner result carries any
    /// serialization failure so callers can decide how to recover.
    pub fn table_json(&self, name: &str) -> Option<serde_json::Result<Value>> {
        use serde_json::to_value;

        let (pg, fibria, scf, market) = (&self.pg, &self.fibria, &self.scf, &self.market);

        let value = match name {
            "pgFinancialData" => to_value(&pg.financials),
            "pgBalanceSheetData" => to_value(&pg.balance_sheet),
            "pgWorkingCapitalData" => to_value(&pg.working_capital),
            "pgCashCycleData" => to_value(&pg.cash_cycle),
            "pgTimelineData" => to_value(&pg.timeline),
            "pgCostCuttingData" => to_value(&pg.cost_cutting),
            "pgPaymentTermsData" => to_value(&pg.payment_terms),
            "fibriaFinancialData" => to_value(&fibria.income),
            "fibriaMarketData" => to_value(&fibria.market),
            "fibriaSCFImpactData" => to_value(&fibria.scf_impact),
            "fibriaBalanceSheetData" => to_value(&fibria.balance_sheet),
            "fibriaWorkingCapitalData" => to_value(&fibria.working_capital),
            "fibriaSCFAnalysisData" => to_value(&fibria.receivable_financing),
            "fibriaCashCycleData" => to_value(&fibria.cash_cycle),
            "fibriaSCFScenarioData" => to_value(&fibria.scf_scenarios),
            "fibriaCycleComparisonData" => to_value(&fibria.cycle_comparison),
            "fibriaWorkingCapitalNeedData" => to_value(&fibria.working_capital_need),
            "fibriaFinancingRatesData" => to_value(&fibria.financing_rates),
            "exchangeRateData" => to_value(&fibria.exchange_rates),
            "currencyLossData" => to_value(&fibria.currency_losses),
            "creditRateData" => to_value(&fibria.credit_rates),
            "scfTableAData" => to_value(&scf.table_a),
            "scfPaymentTimelineData" => to_value(&scf.payment_timeline),
            "scfTableBData" => to_value(&scf.table_b),
            "scfDiscountRateData" => to_value(&scf.discount_components),
            "scfSupplierPerspectiveData" => to_value(&scf.supplier_perspective),
            "scfBuyerPerspectiveData" => to_value(&scf.buyer_perspective),
            "scfPaymentTermsData" => to_value(&scf.payment_terms),
            "scfImpactData" => to_value(&scf.impacts),
            "scfInterestRangeData" => to_value(&scf.interest_ranges),
            "scfPartyData" => to_value(&scf.parties),
            "scfSuccessFactorData" => to_value(&scf.success_factors),
            "scfAdoptionData" => to_value(&scf.adoption),
            "scfProgramTimelineData" => to_value(&scf.program_timeline),
            "treasuryYieldsData" => to_value(&market.treasury_yields),
            "corporateBondYieldsData" => to_value(&market.corporate_bond_yields),
            "shortTermRatesData" => to_value(&market.short_term_rates),
            "scfRateSimulationData" => to_value(&market.scf_rate_simulation),
            "ratingsComparisonData" => to_value(&market.ratings_comparison),
            "historicalLiborData" => to_value(&market.historical_libor),
            _ => return None,
        };

        Some(value)
    }

    /// Like `table_json`, but an unknown key is an error
    pub fn table(&self, name: &str) -> Result<Value> {
        match self.table_json(name) {
            Some(value) => Ok(value?),
            None => Err(CasebookError::UnknownTable(name.to_string())),
        }
    }

    /// Every table keyed by binding key, in topic order
    pub fn all_tables(&self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        for info in TABLES {
            map.insert(info.key.to_string(), self.table(info.key)?);
        }
        Ok(map)
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_catalog_key_resolves() {
        let store = DataStore::new();

        for info in TABLES {
            let value = store.table(info.key).unwrap();
            assert!(
                value.is_array() || value.is_object(),
                "{} should serialize to an array or object",
                info.key
            );
        }
    }

    #[test]
    fn test_catalog_keys_are_unique() {
        let mut keys: Vec<_> = TABLES.iter().map(|t| t.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), TABLES.len());
    }

    #[test]
    fn test_unknown_table() {
        let store = DataStore::new();
        assert!(store.table_json("noSuchData").is_none());
        assert!(matches!(
            store.table("noSuchData"),
            Err(CasebookError::UnknownTable(_))
        ));
    }

    /// Parse a table's JSON text back into its record type and compare
    fn round_trip<T>(store: &DataStore, key: &'static str, expected: &T) -> &'static str
    where
        T: serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let text = serde_json::to_string(&store.table(key).unwrap()).unwrap();
        let parsed: T = serde_json::from_str(&text)
            .unwrap_or_else(|e| panic!("{} did not parse back: {}", key, e));
        assert_eq!(&parsed, expected, "{} did not round-trip", key);
        key
    }

    fn assert_rate_round_trip(store: &DataStore, key: &'static str, table: &RateTable) {
        let text = serde_json::to_string(&store.table(key).unwrap()).unwrap();
        let rows: Vec<Map<String, Value>> = serde_json::from_str(&text).unwrap();

        assert_eq!(rows.len(), table.rows.len(), "{} row count", key);
        for (row, rate) in rows.iter().zip(&table.rows) {
            assert_eq!(row.len(), 2, "{}: {:?}", key, row);
            assert_eq!(row[table.label_key], Value::from(rate.label.as_str()), "{}", key);
            assert_eq!(row[table.rate_key].as_f64(), Some(rate.rate), "{}", key);
        }
    }

    #[test]
    fn test_every_table_round_trips_to_its_records() {
        let store = DataStore::new();
        let (pg, fibria, scf, market) = (store.pg(), store.fibria(), store.scf(), store.market());
        let mut covered: Vec<&str> = Vec::new();

        covered.push(round_trip(&store, "pgFinancialData", &pg.financials));
        covered.push(round_trip(&store, "pgBalanceSheetData", &pg.balance_sheet));
        covered.push(round_trip(&store, "pgWorkingCapitalData", &pg.working_capital));
        covered.push(round_trip(&store, "pgCashCycleData", &pg.cash_cycle));
        covered.push(round_trip(&store, "pgTimelineData", &pg.timeline));
        covered.push(round_trip(&store, "pgCostCuttingData", &pg.cost_cutting));
        covered.push(round_trip(&store, "pgPaymentTermsData", &pg.payment_terms));

        covered.push(round_trip(&store, "fibriaFinancialData", &fibria.income));
        covered.push(round_trip(&store, "fibriaMarketData", &fibria.market));
        covered.push(round_trip(&store, "fibriaSCFImpactData", &fibria.scf_impact));
        covered.push(round_trip(&store, "fibriaBalanceSheetData", &fibria.balance_sheet));
        covered.push(round_trip(&store, "fibriaWorkingCapitalData", &fibria.working_capital));
        covered.push(round_trip(&store, "fibriaSCFAnalysisData", &fibria.receivable_financing));
        covered.push(round_trip(&store, "fibriaCashCycleData", &fibria.cash_cycle));
        covered.push(round_trip(&store, "fibriaSCFScenarioData", &fibria.scf_scenarios));
        covered.push(round_trip(&store, "fibriaCycleComparisonData", &fibria.cycle_comparison));
        covered.push(round_trip(
            &store,
            "fibriaWorkingCapitalNeedData",
            &fibria.working_capital_need,
        ));
        covered.push(round_trip(&store, "fibriaFinancingRatesData", &fibria.financing_rates));

        covered.push(round_trip(&store, "scfTableAData", &scf.table_a));
        covered.push(round_trip(&store, "scfPaymentTimelineData", &scf.payment_timeline));
        covered.push(round_trip(&store, "scfTableBData", &scf.table_b));
        covered.push(round_trip(&store, "scfDiscountRateData", &scf.discount_components));
        covered.push(round_trip(&store, "scfSupplierPerspectiveData", &scf.supplier_perspective));
        covered.push(round_trip(&store, "scfBuyerPerspectiveData", &scf.buyer_perspective));
        covered.push(round_trip(&store, "scfPaymentTermsData", &scf.payment_terms));
        covered.push(round_trip(&store, "scfImpactData", &scf.impacts));
        covered.push(round_trip(&store, "scfInterestRangeData", &scf.interest_ranges));
        covered.push(round_trip(&store, "scfPartyData", &scf.parties));
        covered.push(round_trip(&store, "scfSuccessFactorData", &scf.success_factors));
        covered.push(round_trip(&store, "scfAdoptionData", &scf.adoption));
        covered.push(round_trip(&store, "scfProgramTimelineData", &scf.program_timeline));

        covered.push(round_trip(&store, "scfRateSimulationData", &market.scf_rate_simulation));
        covered.push(round_trip(&store, "ratingsComparisonData", &market.ratings_comparison));

        let rate_tables = [
            ("exchangeRateData", &fibria.exchange_rates),
            ("currencyLossData", &fibria.currency_losses),
            ("creditRateData", &fibria.credit_rates),
            ("treasuryYieldsData", &market.treasury_yields),
            ("corporateBondYieldsData", &market.corporate_bond_yields),
            ("shortTermRatesData", &market.short_term_rates),
            ("historicalLiborData", &market.historical_libor),
        ];
        for (key, table) in rate_tables {
            assert_rate_round_trip(&store, key, table);
            covered.push(key);
        }

        let mut expected: Vec<&str> = TABLES.iter().map(|t| t.key).collect();
        expected.sort();
        covered.sort();
        assert_eq!(covered, expected);
    }

    #[test]
    fn test_pg_balance_sheet_first_record() {
        let store = DataStore::new();
        let value = store.table("pgBalanceSheetData").unwrap();
        let first = &value[0];

        assert_eq!(first["year"], "2011");
        assert_eq!(first["totalAssets"], 138354);
        assert_eq!(first["currentAssets"], 21970);
        assert_eq!(first["debtToCapital"], 32.0);
    }

    #[test]
    fn test_rate_tables_use_chart_keys() {
        let store = DataStore::new();

        let treasury = store.table("treasuryYieldsData").unwrap();
        assert_eq!(treasury[0]["maturity"], "1M");
        assert_eq!(treasury[0]["yield"], 0.05);

        let libor = store.table("historicalLiborData").unwrap();
        assert_eq!(libor[3]["date"], "2015 (Aug)");
        assert_eq!(libor[3]["libor3m"], 0.30);

        assert_eq!(store.market().corporate_bond_yields.get("BBB"), Some(1.13));
    }

    #[test]
    fn test_records_are_ordered_by_year() {
        let store = DataStore::new();
        let years: Vec<_> = store.pg_cash_cycle().iter().map(|r| r.year.as_str()).collect();
        assert_eq!(years.len(), 16);
        assert_eq!(&years[..4], ["2000", "2002", "2002", "2003"]);

        let mut sorted = years.clone();
        sorted.sort();
        assert_eq!(years, sorted);

        // The repeated label is kept as published and left to the audit
        let report = crate::integrity::audit(&store);
        assert!(report
            .findings
            .iter()
            .any(|f| f.table == "pgCashCycleData" && f.field == "year"));
    }

    #[test]
    fn test_field_order_follows_declaration() {
        let store = DataStore::new();
        let value = store.table("pgBalanceSheetData").unwrap();
        let keys: Vec<_> = value[0].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys[0], "year");
        assert_eq!(keys[1], "currentAssets");
        assert_eq!(keys[2], "totalAssets");
    }

    #[test]
    fn test_all_tables_covers_catalog() {
        let store = DataStore::new();
        let all = store.all_tables().unwrap();
        assert_eq!(all.len(), TABLES.len());
        assert!(all.contains_key("scfTableBData"));
    }
}
