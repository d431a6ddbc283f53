// 📒 Record types for the case-study tables
//
// Every record is a plain value built once by `DataStore::new()`.
// JSON keys are camelCase because the chart scripts read them by name.

use serde::{Deserialize, Serialize};

// ============================================================================
// INCOME STATEMENTS
// ============================================================================

/// P&G income statement line items for one fiscal year (USD millions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialYearRecord {
    pub year: u16,
    pub revenue: i64,
    pub cogs: i64,
    pub gross_profit: i64,
    pub sga: i64,
    pub operating_income: i64,
    pub net_income: i64,

    /// Ratios are percentages of revenue, rounded to one decimal
    pub cogs_ratio: f64,
    pub sga_ratio: f64,
    pub gross_margin: f64,
    pub operating_margin: f64,
    pub net_margin: f64,

    pub employees: i64,
    pub eps: f64,
    pub dividend: f64,

    /// Millions of shares
    pub shares_outstanding: i64,
}

/// Fibria income statement (BRL millions unless noted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FibriaIncomeRecord {
    pub year: String,
    pub revenue: i64,
    pub cogs: i64,
    pub gross_profit: i64,
    pub sga_expense: i64,
    pub operating_income: i64,
    pub net_income: i64,
    pub gross_margin: f64,
    pub operating_margin: f64,
    pub net_margin: f64,

    /// BRL per USD
    pub exchange_rate: f64,

    /// USD millions
    #[serde(rename = "revenueUSD")]
    pub revenue_usd: i64,

    /// Thousand tonnes
    pub pulp_sales: i64,

    /// USD per tonne
    pub pulp_price: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTrendRecord {
    pub year: String,
    pub exchange_rate: f64,
    pub pulp_price: i64,
}

// ============================================================================
// BALANCE SHEETS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetRecord {
    pub year: String,
    pub current_assets: i64,
    pub total_assets: i64,
    pub current_liabilities: i64,
    pub total_liabilities: i64,
    pub total_equity: i64,
    pub cash: i64,
    pub accounts_receivable: i64,
    pub inventory: i64,
    pub accounts_payable: i64,
    pub current_ratio: f64,
    pub total_debt: i64,

    /// Percent
    pub debt_to_capital: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FibriaBalanceSheetRecord {
    pub year: String,
    pub current_assets: i64,
    pub cash: i64,
    pub accounts_receivable: i64,
    pub inventory: i64,
    pub other_current_assets: i64,
    pub total_assets: i64,
    pub current_liabilities: i64,
    pub accounts_payable: i64,
    pub short_term_debt: i64,
    pub other_current_liabilities: i64,
    pub long_term_debt: i64,
    #[serde(rename = "otherLTLiabilities")]
    pub other_lt_liabilities: i64,
    pub total_liabilities: i64,
    pub total_equity: i64,
    pub current_ratio: f64,
    pub total_debt: i64,
    pub debt_to_capital: f64,
    pub exchange_rate: f64,
}

// ============================================================================
// WORKING CAPITAL
// ============================================================================

/// Working-capital balances; `working_capital` is AR + inventory - AP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingCapitalRecord {
    pub year: String,
    pub accounts_receivable: i64,
    pub inventory: i64,
    pub accounts_payable: i64,
    pub working_capital: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_conversion_cycle: Option<f64>,
}

/// Working-capital timing in days; `ccc` is DSO + DIO - DPO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashCycleRecord {
    pub year: String,
    pub dso: f64,
    pub dio: f64,
    pub dpo: f64,
    pub ccc: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_dpo: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleComparisonRecord {
    pub category: String,
    pub before: f64,
    pub after: f64,
    pub change: f64,
}

/// Capital tied up in the P&G receivable, with and without SCF (USD millions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingCapitalNeedRecord {
    pub year: String,
    pub cash_cycle: f64,
    pub revenue_usd: f64,
    #[serde(rename = "withoutSCF")]
    pub without_scf: f64,
    #[serde(rename = "withSCF")]
    pub with_scf: f64,

    /// Days removed from the cycle by SCF
    pub effect: f64,
    pub calc_desc: String,
}

// ============================================================================
// RATES
// ============================================================================

/// A single quoted rate in percent. The JSON key of `label` differs by
/// table, so tables of rates are serialized through `RateTable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub label: String,
    pub rate: f64,
}

impl RateRecord {
    pub fn new(label: &str, rate: f64) -> Self {
        RateRecord {
            label: label.to_string(),
            rate,
        }
    }
}

/// A list of rates plus the JSON key names the chart expects
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub label_key: &'static str,
    pub rate_key: &'static str,
    pub rows: Vec<RateRecord>,
}

impl RateTable {
    pub fn new(label_key: &'static str, rate_key: &'static str, rows: Vec<RateRecord>) -> Self {
        RateTable {
            label_key,
            rate_key,
            rows,
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.rows.iter().find(|r| r.label == label).map(|r| r.rate)
    }
}

impl Serialize for RateTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};

        struct Row<'a>(&'a RateTable, &'a RateRecord);

        impl Serialize for Row<'_> {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(self.0.label_key, &self.1.label)?;
                map.serialize_entry(self.0.rate_key, &self.1.rate)?;
                map.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Row(self, row))?;
        }
        seq.end()
    }
}

// ============================================================================
// SCF SCENARIOS
// ============================================================================

/// SCF discount under a renewal scenario (percent, days)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateScenarioRecord {
    pub scenario: String,
    pub libor: f64,
    pub spread: f64,
    pub total_rate: f64,
    pub period: f64,
    pub discount: f64,
    pub cost_year: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingComparisonRecord {
    pub rating: String,
    pub borrowing_cost: f64,
    pub scf_discount: f64,
    pub cost_difference: f64,
}

/// Case Table A: one payment arrangement on a $1,000 invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentScenarioRecord {
    pub scenario: String,
    pub days: i64,
    pub receivable: i64,
    pub payable: i64,
    pub financing_cost: f64,
    pub net_amount: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTimelinePoint {
    pub name: String,
    pub scf: f64,
    pub traditional: f64,
    pub label: String,
}

/// Case Table B: invoice discount calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCalculation {
    pub days_financed: f64,
    #[serde(rename = "libor60Day")]
    pub libor_60_day: f64,
    pub bank_spread: f64,
    pub financing_rate: f64,
    pub discount_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierScenarioRecord {
    pub name: String,
    pub invoice_amount: f64,
    pub days_to_receive: f64,
    pub financing_cost: f64,
    pub net_amount: f64,
    pub annual_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerScenarioRecord {
    pub name: String,
    #[serde(rename = "DPO")]
    pub dpo: i64,
    pub working_capital_impact: i64,
    pub cash_outflow: i64,
    pub cash_outflow_day: i64,
}

/// Fibria's P&G receivable under each payment arrangement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FibriaScfScenarioRecord {
    pub scenario: String,
    pub receivable_days: f64,
    pub inventory_days: f64,
    pub payable_days: f64,
    pub cash_cycle: f64,

    /// USD millions tied up, on $300M of annual P&G sales
    pub cash_needed: f64,
    pub calc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableFinancingRecord {
    pub category: String,
    pub days_outstanding: f64,
    pub ar_value: f64,
    pub financing_cost: f64,
    pub liquidity_impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingCost {
    pub financing_cost: f64,
    pub cash_flow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScfImpactRecord {
    pub year: String,
    #[serde(rename = "withoutSCF")]
    pub without_scf: FinancingCost,
    #[serde(rename = "withSCF")]
    pub with_scf: FinancingCost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingRateRecord {
    pub scenario: String,
    pub rate: f64,
    pub rating_base: String,
    pub calc_base: String,
    pub annual_savings: String,
}

// ============================================================================
// NARRATIVE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub year: String,
    pub event: String,
}

impl TimelineEvent {
    pub fn new(year: &str, event: &str) -> Self {
        TimelineEvent {
            year: year.to_string(),
            event: event.to_string(),
        }
    }
}

/// A named share or count, used for pie and bar charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

impl NamedValue {
    pub fn new(name: &str, value: f64) -> Self {
        NamedValue {
            name: name.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Positive,
    Negative,
    Consideration,
}

/// One bullet of an impact analysis card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactItem {
    pub party: String,
    pub stance: Stance,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTerms {
    pub before: i64,
    pub after: i64,
    pub change: i64,
}

/// Annual interest effect range for one party (USD millions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestRange {
    pub party: String,
    pub min: f64,
    pub max: f64,
    pub unit: String,
}

/// Benefits (or losses) of one party in the win-win-win analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyBenefits {
    pub party: String,
    pub wins: bool,
    pub points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessFactor {
    pub title: String,
    pub detail: String,
}
