// 🧴 P&G tables - income statement, balance sheet, working capital
//
// Figures are USD millions as reported in the case exhibits. Ratios and
// cycle days were computed by hand from the same exhibits.

use super::records::{
    BalanceSheetRecord, CashCycleRecord, FinancialYearRecord, NamedValue, TimelineEvent,
    WorkingCapitalRecord,
};

pub struct PgTables {
    pub financials: Vec<FinancialYearRecord>,
    pub balance_sheet: Vec<BalanceSheetRecord>,
    pub working_capital: Vec<WorkingCapitalRecord>,
    pub cash_cycle: Vec<CashCycleRecord>,
    pub timeline: Vec<TimelineEvent>,
    pub cost_cutting: Vec<NamedValue>,
    pub payment_terms: Vec<NamedValue>,
}

pub fn build() -> PgTables {
    PgTables {
        financials: financials(),
        balance_sheet: balance_sheet(),
        working_capital: working_capital(),
        cash_cycle: cash_cycle(),
        timeline: vec![
            TimelineEvent::new("2010", "Need for cost reduction emerges"),
            TimelineEvent::new("2012", "$10 billion cost-reduction program announced"),
            TimelineEvent::new(
                "2013",
                "Supply chain finance (SCF) launched, payment terms extended 45 to 75 days",
            ),
            TimelineEvent::new("2015", "Negative cash conversion cycle (-3.5 days) reached"),
        ],
        cost_cutting: vec![
            NamedValue::new("Overhead", 30.0),
            NamedValue::new("Cost of goods sold", 60.0),
            NamedValue::new("Marketing efficiency", 10.0),
        ],
        payment_terms: vec![
            NamedValue::new("P&G (before)", 45.0),
            NamedValue::new("P&G (after)", 75.0),
            NamedValue::new("Industry average", 85.0),
            NamedValue::new("Industry maximum", 100.0),
        ],
    }
}

#[allow(clippy::too_many_arguments)]
fn fy(
    year: u16,
    revenue: i64,
    cogs: i64,
    gross_profit: i64,
    sga: i64,
    operating_income: i64,
    net_income: i64,
    ratios: [f64; 5],
    employees: i64,
    eps: f64,
    dividend: f64,
    shares_outstanding: i64,
) -> FinancialYearRecord {
    let [cogs_ratio, sga_ratio, gross_margin, operating_margin, net_margin] = ratios;
    FinancialYearRecord {
        year,
        revenue,
        cogs,
        gross_profit,
        sga,
        operating_income,
        net_income,
        cogs_ratio,
        sga_ratio,
        gross_margin,
        operating_margin,
        net_margin,
        employees,
        eps,
        dividend,
        shares_outstanding,
    }
}

#[rustfmt::skip]
fn financials() -> Vec<FinancialYearRecord> {
    // ratios: [cogs, sga, gross, operating, net] as % of revenue
    vec![
        fy(2011, 81104, 39859, 41245, 25750, 15495, 11797, [49.1, 31.7, 50.9, 19.1, 14.5], 129000, 4.04, 1.97, 2804),
        fy(2012, 82006, 41411, 40595, 25984, 14611, 10756, [50.5, 31.7, 49.5, 17.8, 13.1], 126000, 3.66, 2.14, 2780),
        fy(2013, 80116, 39991, 40125, 26000, 14125, 11312, [49.9, 32.5, 50.1, 17.6, 14.1], 121000, 3.86, 2.29, 2742),
        fy(2014, 80510, 40611, 39899, 24402, 15497, 11643, [50.4, 30.3, 49.6, 19.2, 14.5], 118000, 4.01, 2.45, 2730),
        fy(2015, 76279, 38248, 38031, 23158, 14873, 7036, [50.1, 30.4, 49.9, 19.5, 9.2], 110000, 2.44, 2.59, 2712),
    ]
}

fn balance_sheet() -> Vec<BalanceSheetRecord> {
    let row = |year: &str,
               current_assets,
               total_assets,
               current_liabilities,
               total_liabilities,
               total_equity,
               cash,
               accounts_receivable,
               inventory,
               accounts_payable,
               current_ratio,
               total_debt,
               debt_to_capital| BalanceSheetRecord {
        year: year.to_string(),
        current_assets,
        total_assets,
        current_liabilities,
        total_liabilities,
        total_equity,
        cash,
        accounts_receivable,
        inventory,
        accounts_payable,
        current_ratio,
        total_debt,
        debt_to_capital,
    };

    vec![
        row("2011", 21970, 138354, 27293, 70353, 68001, 2768, 6275, 7379, 8022, 0.80, 32014, 32.0),
        row("2012", 21910, 132244, 24907, 68209, 64035, 4436, 6068, 6721, 7920, 0.88, 29778, 31.7),
        row("2013", 23990, 139263, 30037, 70554, 68709, 5947, 6508, 6909, 8777, 0.80, 31543, 31.5),
        row("2014", 31617, 144266, 33726, 74290, 69976, 10686, 6386, 6759, 8461, 0.94, 35417, 33.6),
        row("2015", 29646, 129495, 29790, 66445, 63050, 11612, 4861, 5454, 8257, 1.00, 30298, 32.5),
    ]
}

fn working_capital() -> Vec<WorkingCapitalRecord> {
    let row = |year: &str, ar, inv, ap, wc, ccc: f64| WorkingCapitalRecord {
        year: year.to_string(),
        accounts_receivable: ar,
        inventory: inv,
        accounts_payable: ap,
        working_capital: wc,
        cash_conversion_cycle: Some(ccc),
    };

    vec![
        row("2011", 6275, 7379, 8022, 5632, 22.4),
        row("2012", 6068, 6721, 7920, 4869, 16.4),
        row("2013", 6508, 6909, 8777, 4640, 12.6),
        row("2014", 6386, 6759, 8461, 4684, 13.7),
        row("2015", 4861, 5454, 8257, 2058, -3.5),
    ]
}

fn cash_cycle() -> Vec<CashCycleRecord> {
    let row = |year: &str, dso, dio, dpo, ccc, adjusted: f64| CashCycleRecord {
        year: year.to_string(),
        dso,
        dio,
        dpo,
        ccc,
        adjusted_dpo: Some(adjusted),
    };

    vec![
        row("2000", 26.6, 60.6, 38.4, 48.8, 32.5),
        row("2002", 27.3, 58.9, 36.1, 50.1, 30.8),
        row("2002", 28.0, 61.6, 39.3, 50.3, 33.2),
        row("2003", 25.6, 60.0, 46.1, 39.5, 38.5),
        row("2004", 28.8, 63.9, 52.5, 40.2, 43.1),
        row("2005", 26.9, 65.6, 49.8, 42.7, 41.1),
        row("2006", 30.6, 69.3, 54.1, 45.8, 44.5),
        row("2007", 32.3, 69.8, 58.4, 43.7, 47.9),
        row("2008", 31.1, 78.2, 63.0, 46.4, 51.8),
        row("2009", 27.8, 64.9, 56.4, 36.3, 47.2),
        row("2010", 25.1, 62.9, 71.4, 16.6, 58.1),
        row("2011", 28.2, 67.6, 73.5, 22.4, 59.7),
        row("2012", 27.0, 59.2, 69.8, 16.4, 57.1),
        row("2013", 29.6, 63.1, 80.1, 12.6, 64.9),
        row("2014", 29.0, 60.7, 76.0, 13.7, 62.3),
        row("2015", 23.3, 52.0, 78.8, -3.5, 64.8),
    ]
}
