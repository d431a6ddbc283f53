// 🧮 Integrity Audit - recompute hand-calculated figures
//
// Several case tables carry derived figures that were computed by hand
// (cycle lengths, discounts, financing costs). The audit recomputes each one
// from its inputs and reports the rows that disagree. Data is never corrected.

use crate::data::DataStore;
use crate::exhibit::Exhibit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Relative gap at which a finding becomes critical
pub const CRITICAL_GAP: f64 = 0.25;

/// Days; inputs are rounded to one decimal, so three of them can drift 0.15
const DAYS_TOLERANCE: f64 = 0.15;

/// Whole currency units
const AMOUNT_TOLERANCE: f64 = 0.5;

/// Percentage points on one-decimal ratios
const RATIO_TOLERANCE: f64 = 0.06;

/// Percentage points / dollars on two-decimal figures
const RATE_TOLERANCE: f64 = 0.01;

/// Fibria's annual sales to P&G (USD millions)
const PG_ANNUAL_SALES: f64 = 300.0;

// ============================================================================
// FINDINGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Stated figure is off by a quarter or more
    Warning,  // Stated figure is off beyond rounding
}

impl Severity {
    pub fn for_gap(stated: f64, recomputed: f64) -> Self {
        if recomputed == 0.0 {
            return Severity::Critical;
        }

        let relative = (stated - recomputed).abs() / recomputed.abs();
        if relative < CRITICAL_GAP {
            Severity::Warning
        } else {
            Severity::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityFinding {
    /// Binding key of the table, e.g. `scfSupplierPerspectiveData`
    pub table: String,

    /// Year or scenario name of the row
    pub record: String,

    /// JSON field name of the stated figure
    pub field: String,

    pub stated: f64,
    pub recomputed: f64,
    pub severity: Severity,

    /// Formula used for the recomputation
    pub note: String,
}

impl IntegrityFinding {
    pub fn gap(&self) -> f64 {
        self.stated - self.recomputed
    }
}

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// Number of figures checked per table
    pub checked: BTreeMap<String, usize>,
    pub findings: Vec<IntegrityFinding>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn checked_count(&self) -> usize {
        self.checked.values().sum()
    }

    pub fn critical_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .count()
    }

    pub fn has_critical_findings(&self) -> bool {
        self.critical_count() > 0
    }

    pub fn summary(&self) -> String {
        format!(
            "Checked {} figures in {} tables: {} findings ({} critical)",
            self.checked_count(),
            self.checked.len(),
            self.findings.len(),
            self.critical_count()
        )
    }

    /// Restrict the report to the given tables
    pub fn for_tables(&self, tables: &[&str]) -> IntegrityReport {
        IntegrityReport {
            checked: self
                .checked
                .iter()
                .filter(|(table, _)| tables.contains(&table.as_str()))
                .map(|(table, count)| (table.clone(), *count))
                .collect(),
            findings: self
                .findings
                .iter()
                .filter(|f| tables.contains(&f.table.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub fn for_exhibit(&self, exhibit: Exhibit) -> IntegrityReport {
        self.for_tables(exhibit.tables())
    }
}

// ============================================================================
// AUDIT
// ============================================================================

struct Auditor {
    report: IntegrityReport,
}

impl Auditor {
    #[allow(clippy::too_many_arguments)]
    fn compare(
        &mut self,
        table: &str,
        record: &str,
        field: &str,
        stated: f64,
        recomputed: f64,
        tolerance: f64,
        formula: &str,
    ) {
        *self.report.checked.entry(table.to_string()).or_insert(0) += 1;

        if (stated - recomputed).abs() <= tolerance + 1e-9 {
            return;
        }

        let severity = Severity::for_gap(stated, recomputed);
        log::debug!(
            "{} [{}] {}: stated {} but {} gives {:.4}",
            table,
            record,
            field,
            stated,
            formula,
            recomputed
        );

        self.report.findings.push(IntegrityFinding {
            table: table.to_string(),
            record: record.to_string(),
            field: field.to_string(),
            stated,
            recomputed,
            severity,
            note: format!("{} = {:.4}", formula, recomputed),
        });
    }

    /// Year labels must strictly increase; a repeated or backwards label is flagged
    fn year_sequence<'y>(&mut self, table: &str, years: impl IntoIterator<Item = &'y str>) {
        let mut previous: Option<f64> = None;

        for label in years {
            let Some(year) = leading_year(label) else {
                continue;
            };
            *self.report.checked.entry(table.to_string()).or_insert(0) += 1;

            if let Some(prev) = previous.filter(|prev| year <= *prev) {
                log::debug!("{} [{}] year does not follow {}", table, label, prev);
                self.report.findings.push(IntegrityFinding {
                    table: table.to_string(),
                    record: label.to_string(),
                    field: "year".to_string(),
                    stated: year,
                    recomputed: prev + 1.0,
                    severity: Severity::Warning,
                    note: format!("previous year + 1 = {}", prev + 1.0),
                });
            }
            previous = Some(year);
        }
    }
}

/// `2015 (H1)` reads as 2015
fn leading_year(label: &str) -> Option<f64> {
    let digits: String = label.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Recompute every derived figure in the store
pub fn audit(store: &DataStore) -> IntegrityReport {
    let mut auditor = Auditor {
        report: IntegrityReport::default(),
    };

    audit_pg(store, &mut auditor);
    audit_fibria(store, &mut auditor);
    audit_scf(store, &mut auditor);
    audit_market(store, &mut auditor);

    let report = auditor.report;
    if report.is_clean() {
        log::info!("{}", report.summary());
    } else {
        log::warn!("{}", report.summary());
    }
    report
}

/// Findings for the tables one exhibit binds
pub fn audit_exhibit(store: &DataStore, exhibit: Exhibit) -> IntegrityReport {
    audit(store).for_exhibit(exhibit)
}

fn audit_pg(store: &DataStore, a: &mut Auditor) {
    for fy in store.pg_financials() {
        let year = fy.year.to_string();
        let revenue = fy.revenue as f64;
        let t = "pgFinancialData";

        a.compare(
            t,
            &year,
            "grossProfit",
            fy.gross_profit as f64,
            (fy.revenue - fy.cogs) as f64,
            AMOUNT_TOLERANCE,
            "revenue - cogs",
        );
        a.compare(
            t,
            &year,
            "operatingIncome",
            fy.operating_income as f64,
            (fy.gross_profit - fy.sga) as f64,
            AMOUNT_TOLERANCE,
            "grossProfit - sga",
        );
        a.compare(
            t,
            &year,
            "cogsRatio",
            fy.cogs_ratio,
            fy.cogs as f64 / revenue * 100.0,
            RATIO_TOLERANCE,
            "cogs / revenue",
        );
        a.compare(
            t,
            &year,
            "sgaRatio",
            fy.sga_ratio,
            fy.sga as f64 / revenue * 100.0,
            RATIO_TOLERANCE,
            "sga / revenue",
        );
        a.compare(
            t,
            &year,
            "grossMargin",
            fy.gross_margin,
            fy.gross_profit as f64 / revenue * 100.0,
            RATIO_TOLERANCE,
            "grossProfit / revenue",
        );
        a.compare(
            t,
            &year,
            "operatingMargin",
            fy.operating_margin,
            fy.operating_income as f64 / revenue * 100.0,
            RATIO_TOLERANCE,
            "operatingIncome / revenue",
        );
        a.compare(
            t,
            &year,
            "netMargin",
            fy.net_margin,
            fy.net_income as f64 / revenue * 100.0,
            RATIO_TOLERANCE,
            "netIncome / revenue",
        );
    }

    for wc in store.pg_working_capital() {
        a.compare(
            "pgWorkingCapitalData",
            &wc.year,
            "workingCapital",
            wc.working_capital as f64,
            (wc.accounts_receivable + wc.inventory - wc.accounts_payable) as f64,
            AMOUNT_TOLERANCE,
            "AR + inventory - AP",
        );
    }

    let wc_years = store.pg_working_capital().iter().map(|wc| wc.year.as_str());
    a.year_sequence("pgWorkingCapitalData", wc_years);
    let cycle_years = store.pg_cash_cycle().iter().map(|c| c.year.as_str());
    a.year_sequence("pgCashCycleData", cycle_years);

    for c in store.pg_cash_cycle() {
        a.compare(
            "pgCashCycleData",
            &c.year,
            "ccc",
            c.ccc,
            c.dso + c.dio - c.dpo,
            DAYS_TOLERANCE,
            "DSO + DIO - DPO",
        );
    }
}

fn audit_fibria(store: &DataStore, a: &mut Auditor) {
    let fibria = store.fibria();

    for inc in store.fibria_income() {
        let revenue = inc.revenue as f64;
        let t = "fibriaFinancialData";

        a.compare(
            t,
            &inc.year,
            "grossProfit",
            inc.gross_profit as f64,
            (inc.revenue - inc.cogs) as f64,
            AMOUNT_TOLERANCE,
            "revenue - cogs",
        );
        a.compare(
            t,
            &inc.year,
            "grossMargin",
            inc.gross_margin,
            inc.gross_profit as f64 / revenue * 100.0,
            RATIO_TOLERANCE,
            "grossProfit / revenue",
        );
        a.compare(
            t,
            &inc.year,
            "operatingMargin",
            inc.operating_margin,
            inc.operating_income as f64 / revenue * 100.0,
            RATIO_TOLERANCE,
            "operatingIncome / revenue",
        );
        a.compare(
            t,
            &inc.year,
            "netMargin",
            inc.net_margin,
            inc.net_income as f64 / revenue * 100.0,
            RATIO_TOLERANCE,
            "netIncome / revenue",
        );
    }

    for wc in &fibria.working_capital {
        a.compare(
            "fibriaWorkingCapitalData",
            &wc.year,
            "workingCapital",
            wc.working_capital as f64,
            (wc.accounts_receivable + wc.inventory - wc.accounts_payable) as f64,
            AMOUNT_TOLERANCE,
            "AR + inventory - AP",
        );
    }

    let cycle_years = store.fibria_cash_cycle().iter().map(|c| c.year.as_str());
    a.year_sequence("fibriaCashCycleData", cycle_years);

    for c in store.fibria_cash_cycle() {
        a.compare(
            "fibriaCashCycleData",
            &c.year,
            "ccc",
            c.ccc,
            c.dso + c.dio - c.dpo,
            DAYS_TOLERANCE,
            "DSO + DIO - DPO",
        );
    }

    for s in &fibria.scf_scenarios {
        let t = "fibriaSCFScenarioData";
        a.compare(
            t,
            &s.scenario,
            "cashCycle",
            s.cash_cycle,
            s.receivable_days + s.inventory_days - s.payable_days,
            DAYS_TOLERANCE,
            "receivableDays + inventoryDays - payableDays",
        );
        a.compare(
            t,
            &s.scenario,
            "cashNeeded",
            s.cash_needed,
            s.cash_cycle / 365.0 * PG_ANNUAL_SALES,
            RATE_TOLERANCE,
            "cashCycle / 365 x 300",
        );
    }

    for c in &fibria.cycle_comparison {
        a.compare(
            "fibriaCycleComparisonData",
            &c.category,
            "change",
            c.change,
            c.after - c.before,
            DAYS_TOLERANCE,
            "after - before",
        );
    }

    for need in &fibria.working_capital_need {
        let t = "fibriaWorkingCapitalNeedData";
        a.compare(
            t,
            &need.year,
            "withoutSCF",
            need.without_scf,
            need.cash_cycle / 365.0 * need.revenue_usd,
            RATE_TOLERANCE,
            "cashCycle / 365 x revenueUsd",
        );
        a.compare(
            t,
            &need.year,
            "withSCF",
            need.with_scf,
            (need.cash_cycle - need.effect) / 365.0 * need.revenue_usd,
            RATE_TOLERANCE,
            "(cashCycle - effect) / 365 x revenueUsd",
        );
    }
}

fn audit_scf(store: &DataStore, a: &mut Auditor) {
    let scf = store.scf();
    let b = &scf.table_b;

    a.compare(
        "scfTableBData",
        "Table B",
        "financingRate",
        b.financing_rate,
        b.libor_60_day + b.bank_spread,
        RATE_TOLERANCE,
        "libor60Day + bankSpread",
    );
    a.compare(
        "scfTableBData",
        "Table B",
        "discountPercentage",
        b.discount_percentage,
        b.financing_rate * b.days_financed / 360.0,
        RATE_TOLERANCE,
        "financingRate x daysFinanced / 360",
    );

    for row in &scf.table_a {
        let t = "scfTableAData";
        a.compare(
            t,
            &row.scenario,
            "netAmount",
            row.net_amount,
            1000.0 - row.financing_cost,
            RATE_TOLERANCE,
            "1000 - financingCost",
        );

        // Early payment is discounted at the Table B rate for the days financed
        if row.receivable < row.days {
            let days = (row.days - row.receivable) as f64;
            a.compare(
                t,
                &row.scenario,
                "financingCost",
                row.financing_cost,
                1000.0 * b.financing_rate / 100.0 * days / 360.0,
                RATE_TOLERANCE,
                "1000 x financingRate x (days - receivable) / 360",
            );
        }
    }

    for s in &scf.supplier_perspective {
        let t = "scfSupplierPerspectiveData";
        a.compare(
            t,
            &s.name,
            "financingCost",
            s.financing_cost,
            s.invoice_amount * s.annual_rate / 100.0 * s.days_to_receive / 360.0,
            RATE_TOLERANCE,
            "invoiceAmount x annualRate x daysToReceive / 360",
        );
        a.compare(
            t,
            &s.name,
            "netAmount",
            s.net_amount,
            s.invoice_amount - s.financing_cost,
            RATE_TOLERANCE,
            "invoiceAmount - financingCost",
        );
    }
}

fn audit_market(store: &DataStore, a: &mut Auditor) {
    for s in store.scf_rate_simulation() {
        let t = "scfRateSimulationData";
        a.compare(
            t,
            &s.scenario,
            "totalRate",
            s.total_rate,
            s.libor + s.spread,
            RATE_TOLERANCE,
            "libor + spread",
        );
        a.compare(
            t,
            &s.scenario,
            "discount",
            s.discount,
            s.total_rate * s.period / 365.0,
            RATE_TOLERANCE,
            "totalRate x period / 365",
        );
        a.compare(
            t,
            &s.scenario,
            "costYear",
            s.cost_year,
            s.discount * 365.0 / s.period,
            RATE_TOLERANCE,
            "discount x 365 / period",
        );
    }

    for r in store.ratings_comparison() {
        a.compare(
            "ratingsComparisonData",
            &r.rating,
            "costDifference",
            r.cost_difference,
            r.borrowing_cost - r.scf_discount,
            RATE_TOLERANCE,
            "borrowingCost - scfDiscount",
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn findings_for<'a>(report: &'a IntegrityReport, table: &str) -> Vec<&'a IntegrityFinding> {
        report.findings.iter().filter(|f| f.table == table).collect()
    }

    #[test]
    fn test_consistent_tables_pass() {
        let report = audit(&DataStore::new());

        for table in [
            "pgFinancialData",
            "pgWorkingCapitalData",
            "fibriaWorkingCapitalData",
            "fibriaCashCycleData",
            "fibriaSCFScenarioData",
            "fibriaCycleComparisonData",
            "fibriaWorkingCapitalNeedData",
            "scfTableAData",
            "scfTableBData",
            "ratingsComparisonData",
        ] {
            assert!(
                report.checked.get(table).copied().unwrap_or(0) > 0,
                "{} was not checked",
                table
            );
            let findings = findings_for(&report, table);
            assert!(findings.is_empty(), "{}: {:?}", table, findings);
        }
    }

    #[test]
    fn test_supplier_financing_costs_are_flagged() {
        let report = audit(&DataStore::new());
        let findings = findings_for(&report, "scfSupplierPerspectiveData");

        assert_eq!(findings.len(), 3);
        assert!(findings.iter().all(|f| f.field == "financingCost"));

        let original = findings.iter().find(|f| f.record == "Original terms").unwrap();
        assert!((original.recomputed - 4.375).abs() < 1e-9);
        assert_eq!(original.severity, Severity::Critical);

        let extended = findings.iter().find(|f| f.record == "Extension without SCF").unwrap();
        assert_eq!(extended.severity, Severity::Warning);

        let scf = findings.iter().find(|f| f.record == "SCF program").unwrap();
        assert!(scf.recomputed < 1.0);
        assert_eq!(scf.severity, Severity::Critical);
    }

    #[test]
    fn test_rate_simulation_annualized_cost_is_flagged() {
        let report = audit(&DataStore::new());
        let findings = findings_for(&report, "scfRateSimulationData");

        assert_eq!(findings.len(), 3);
        for f in findings {
            assert_eq!(f.field, "costYear");
            assert_eq!(f.severity, Severity::Warning);
            assert!(f.recomputed > f.stated);
        }
    }

    #[test]
    fn test_fibria_2013_gross_profit_is_flagged() {
        let report = audit(&DataStore::new());
        let gross = report
            .findings
            .iter()
            .find(|f| {
                f.table == "fibriaFinancialData" && f.record == "2013" && f.field == "grossProfit"
            })
            .unwrap();

        assert_eq!(gross.stated, 1535.0);
        assert_eq!(gross.recomputed, 1015.0);
        assert_eq!(gross.severity, Severity::Critical);
        assert!(gross.note.starts_with("revenue - cogs"));
    }

    #[test]
    fn test_repeated_cash_cycle_year_is_flagged() {
        let report = audit(&DataStore::new());
        let findings = findings_for(&report, "pgCashCycleData");

        assert_eq!(findings.len(), 1);
        let repeated = findings[0];
        assert_eq!(repeated.field, "year");
        assert_eq!(repeated.record, "2002");
        assert_eq!(repeated.stated, 2002.0);
        assert_eq!(repeated.recomputed, 2003.0);
        assert_eq!(repeated.severity, Severity::Warning);
    }

    #[test]
    fn test_year_sequence_accepts_partial_years() {
        let mut auditor = Auditor {
            report: IntegrityReport::default(),
        };
        auditor.year_sequence("t", ["2012", "2013", "2015 (H1)", "n/a"]);
        assert!(auditor.report.is_clean());
        assert_eq!(auditor.report.checked["t"], 3);

        auditor.year_sequence("u", ["2014", "2013"]);
        assert_eq!(auditor.report.findings.len(), 1);
        assert_eq!(auditor.report.findings[0].record, "2013");
    }

    #[test]
    fn test_severity_threshold() {
        assert_eq!(Severity::for_gap(1.1, 1.0), Severity::Warning);
        assert_eq!(Severity::for_gap(1.3, 1.0), Severity::Critical);
        assert_eq!(Severity::for_gap(0.5, 1.0), Severity::Critical);
        assert_eq!(Severity::for_gap(0.1, 0.0), Severity::Critical);
    }

    #[test]
    fn test_exhibit_filter() {
        let store = DataStore::new();
        let full = audit(&store);

        let e4 = audit_exhibit(&store, Exhibit::Exhibit4);
        assert!(e4.findings.iter().all(|f| Exhibit::Exhibit4.tables().contains(&f.table.as_str())));
        assert_eq!(e4.findings.len(), 3);
        assert!(e4.checked_count() < full.checked_count());

        let e2 = full.for_exhibit(Exhibit::Exhibit2);
        assert!(e2.is_clean());
        assert!(e2.checked.contains_key("pgWorkingCapitalData"));
    }

    #[test]
    fn test_summary_counts() {
        let report = audit(&DataStore::new());
        let summary = report.summary();

        assert!(report.has_critical_findings());
        assert!(summary.contains(&format!("{} findings", report.findings.len())));
        assert!(summary.contains(&format!("({} critical)", report.critical_count())));
    }
}
