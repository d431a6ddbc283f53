// 🌲 Fibria tables - pulp producer and P&G supplier
//
// Income statement and balance sheet are BRL millions; SCF figures are USD
// millions on roughly $300M of annual sales to P&G. 2015 covers the first
// half only.

use super::records::{
    CashCycleRecord, CycleComparisonRecord, FibriaBalanceSheetRecord, FibriaIncomeRecord,
    FibriaScfScenarioRecord, FinancingCost, FinancingRateRecord, MarketTrendRecord, RateRecord,
    RateTable, ReceivableFinancingRecord, ScfImpactRecord, WorkingCapitalNeedRecord,
    WorkingCapitalRecord,
};

pub struct FibriaTables {
    pub income: Vec<FibriaIncomeRecord>,
    pub market: Vec<MarketTrendRecord>,
    pub scf_impact: Vec<ScfImpactRecord>,
    pub balance_sheet: Vec<FibriaBalanceSheetRecord>,
    pub working_capital: Vec<WorkingCapitalRecord>,
    pub receivable_financing: Vec<ReceivableFinancingRecord>,
    pub cash_cycle: Vec<CashCycleRecord>,
    pub scf_scenarios: Vec<FibriaScfScenarioRecord>,
    pub cycle_comparison: Vec<CycleComparisonRecord>,
    pub working_capital_need: Vec<WorkingCapitalNeedRecord>,
    pub financing_rates: Vec<FinancingRateRecord>,
    pub exchange_rates: RateTable,
    pub currency_losses: RateTable,
    pub credit_rates: RateTable,
}

pub fn build() -> FibriaTables {
    FibriaTables {
        income: income(),
        market: vec![
            trend("2012", 1.955, 780),
            trend("2013", 2.1605, 770),
            trend("2014", 2.3547, 741),
            trend("2015", 2.5989, 793),
        ],
        scf_impact: scf_impact(),
        balance_sheet: balance_sheet(),
        working_capital: working_capital(),
        receivable_financing: vec![
            ReceivableFinancingRecord {
                category: "Before SCF".to_string(),
                days_outstanding: 60.0,
                ar_value: 49.32,
                financing_cost: 1.23,
                liquidity_impact: "Low".to_string(),
            },
            ReceivableFinancingRecord {
                category: "After SCF".to_string(),
                days_outstanding: 15.0,
                ar_value: 12.33,
                financing_cost: 0.04,
                liquidity_impact: "High".to_string(),
            },
        ],
        cash_cycle: cash_cycle(),
        scf_scenarios: scf_scenarios(),
        cycle_comparison: vec![
            comparison("DSO", 57.0, 40.0, -17.0),
            comparison("DSI", 85.0, 85.0, 0.0),
            comparison("DPO", 38.0, 38.0, 0.0),
            comparison("CCC", 104.0, 87.0, -17.0),
        ],
        working_capital_need: working_capital_need(),
        financing_rates: vec![
            FinancingRateRecord {
                scenario: "SCF program".to_string(),
                rate: 1.3,
                rating_base: "P&G AA-".to_string(),
                calc_base: "LIBOR + 1% spread".to_string(),
                annual_savings: "about $0.3M per year".to_string(),
            },
            FinancingRateRecord {
                scenario: "Fibria standalone funding".to_string(),
                rate: 2.5,
                rating_base: "Fibria BBB-".to_string(),
                calc_base: "USD funding around 3%".to_string(),
                annual_savings: "-".to_string(),
            },
        ],
        exchange_rates: RateTable::new(
            "year",
            "rate",
            vec![
                RateRecord::new("2012", 1.96),
                RateRecord::new("2013", 2.16),
                RateRecord::new("2014", 2.35),
                RateRecord::new("2015", 2.69),
            ],
        ),
        currency_losses: RateTable::new(
            "year",
            "loss",
            vec![
                RateRecord::new("2012", 735.0),
                RateRecord::new("2013", 933.0),
                RateRecord::new("2014", 722.0),
                RateRecord::new("2015", 1926.0),
            ],
        ),
        credit_rates: RateTable::new(
            "rating",
            "rate",
            vec![
                RateRecord::new("AAA", 0.48),
                RateRecord::new("AA", 0.63),
                RateRecord::new("A", 0.74),
                RateRecord::new("BBB", 1.13),
                RateRecord::new("BB", 2.80),
            ],
        ),
    }
}

fn trend(year: &str, exchange_rate: f64, pulp_price: i64) -> MarketTrendRecord {
    MarketTrendRecord {
        year: year.to_string(),
        exchange_rate,
        pulp_price,
    }
}

fn comparison(category: &str, before: f64, after: f64, change: f64) -> CycleComparisonRecord {
    CycleComparisonRecord {
        category: category.to_string(),
        before,
        after,
        change,
    }
}

#[rustfmt::skip]
fn income() -> Vec<FibriaIncomeRecord> {
    let row = |year: &str,
               revenue,
               cogs,
               gross_profit,
               sga_expense,
               operating_income,
               net_income,
               margins: [f64; 3],
               exchange_rate,
               revenue_usd,
               pulp_sales,
               pulp_price| FibriaIncomeRecord {
        year: year.to_string(),
        revenue,
        cogs,
        gross_profit,
        sga_expense,
        operating_income,
        net_income,
        gross_margin: margins[0],
        operating_margin: margins[1],
        net_margin: margins[2],
        exchange_rate,
        revenue_usd,
        pulp_sales,
        pulp_price,
    };

    vec![
        row("2012", 6174, 5237, 937, 579, 345, -705, [15.2, 5.6, -11.4], 1.955, 3159, 5357, 780),
        row("2013", 6317, 5302, 1535, 642, 914, -706, [22.2, 13.2, -10.2], 2.1605, 2924, 5198, 770),
        row("2014", 7084, 5546, 1538, 644, 1660, 156, [21.7, 23.4, 2.2], 2.3547, 3009, 5305, 741),
        row("2015 (H1)", 8054, 5560, 2494, 703, 1698, -449, [31.0, 21.1, -5.6], 2.5989, 3099, 5370, 793),
    ]
}

fn scf_impact() -> Vec<ScfImpactRecord> {
    // Without SCF: 60-day receivable funded at 2.5%. With SCF: 15 days at a
    // 0.35% discount, phased in during 2013.
    let row = |year: &str, revenue_usd: f64, without: f64, with: f64| ScfImpactRecord {
        year: year.to_string(),
        without_scf: FinancingCost {
            financing_cost: without,
            cash_flow: revenue_usd - without,
        },
        with_scf: FinancingCost {
            financing_cost: with,
            cash_flow: revenue_usd - with,
        },
    };

    vec![
        row("2012", 3159.0, 154.35, 154.35),
        row("2013", 2924.0, 146.20, 34.02),
        row("2014", 3009.0, 150.45, 31.59),
        row("2015", 3099.0, 154.95, 32.54),
    ]
}

fn balance_sheet() -> Vec<FibriaBalanceSheetRecord> {
    // [current assets, cash, AR, inventory, other CA, total assets]
    // [current liab, AP, ST debt, other CL, LT debt, other LT liab, total liab, equity]
    let row = |year: &str,
               a: [i64; 6],
               l: [i64; 8],
               current_ratio,
               total_debt,
               debt_to_capital,
               exchange_rate| {
        FibriaBalanceSheetRecord {
            year: year.to_string(),
            current_assets: a[0],
            cash: a[1],
            accounts_receivable: a[2],
            inventory: a[3],
            other_current_assets: a[4],
            total_assets: a[5],
            current_liabilities: l[0],
            accounts_payable: l[1],
            short_term_debt: l[2],
            other_current_liabilities: l[3],
            long_term_debt: l[4],
            other_lt_liabilities: l[5],
            total_liabilities: l[6],
            total_equity: l[7],
            current_ratio,
            total_debt,
            debt_to_capital,
            exchange_rate,
        }
    };

    vec![
        row(
            "2012",
            [6246, 3296, 964, 1183, 803, 28145],
            [2475, 436, 1138, 901, 9630, 869, 12974, 15171],
            2.52,
            10768,
            41.5,
            1.955,
        ),
        row(
            "2013",
            [5807, 2099, 1477, 1266, 965, 26750],
            [4448, 587, 2973, 888, 6801, 1010, 12259, 14491],
            1.31,
            9773,
            40.3,
            2.1605,
        ),
        row(
            "2014",
            [3261, 745, 695, 1239, 582, 25594],
            [2099, 593, 966, 540, 7361, 1518, 10978, 14616],
            1.55,
            8327,
            36.3,
            2.3547,
        ),
        row(
            "2015 (H1)",
            [3862, 1386, 875, 1455, 146, 26501],
            [2086, 637, 894, 555, 8121, 1730, 11937, 14563],
            1.85,
            9015,
            38.2,
            2.6913,
        ),
    ]
}

fn working_capital() -> Vec<WorkingCapitalRecord> {
    let row = |year: &str, ar, inv, ap, wc| WorkingCapitalRecord {
        year: year.to_string(),
        accounts_receivable: ar,
        inventory: inv,
        accounts_payable: ap,
        working_capital: wc,
        cash_conversion_cycle: None,
    };

    vec![
        row("2012", 964, 1183, 436, 1711),
        row("2013", 1477, 1266, 587, 2156),
        row("2014", 695, 1239, 593, 1341),
        row("2015 (H1)", 875, 1455, 637, 1693),
    ]
}

fn cash_cycle() -> Vec<CashCycleRecord> {
    let row = |year: &str, dso, dio, dpo, ccc| CashCycleRecord {
        year: year.to_string(),
        dso,
        dio,
        dpo,
        ccc,
        adjusted_dpo: None,
    };

    vec![
        row("2005", 68.0, 85.0, 48.0, 105.0),
        row("2006", 65.0, 88.0, 45.0, 108.0),
        row("2007", 58.0, 75.0, 43.0, 90.0),
        row("2008", 70.0, 95.0, 50.0, 115.0),
        row("2009", 115.0, 68.0, 32.0, 151.0),
        row("2010", 80.0, 83.0, 33.0, 130.0),
        row("2011", 80.0, 85.0, 28.0, 137.0),
        row("2012", 57.0, 85.0, 38.0, 104.0),
        row("2013", 77.0, 85.0, 40.0, 122.0),
        row("2014", 40.0, 85.0, 38.0, 87.0),
        row("2015 (H1)", 37.0, 85.0, 37.0, 85.0),
    ]
}

#[rustfmt::skip]
fn scf_scenarios() -> Vec<FibriaScfScenarioRecord> {
    let row = |scenario: &str, receivable_days, cash_cycle, cash_needed, calc: &str| {
        FibriaScfScenarioRecord {
            scenario: scenario.to_string(),
            receivable_days,
            inventory_days: 80.0,
            payable_days: 40.0,
            cash_cycle,
            cash_needed,
            calc: calc.to_string(),
        }
    };

    vec![
        row("Standard terms (60 days)", 60.0, 100.0, 82.19, "60d + 80d - 40d = 100d"),
        row("P&G extension without SCF (105 days)", 105.0, 145.0, 119.18, "105d + 80d - 40d = 145d"),
        row("P&G SCF program (5 days)", 5.0, 45.0, 36.99, "5d + 80d - 40d = 45d"),
    ]
}

#[rustfmt::skip]
fn working_capital_need() -> Vec<WorkingCapitalNeedRecord> {
    // The calc descriptions are the case team's own arithmetic and are kept
    // verbatim; see integrity.rs for the recomputed figures.
    let row = |year: &str, cash_cycle, revenue_usd, without_scf, with_scf, effect, calc_desc: &str| {
        WorkingCapitalNeedRecord {
            year: year.to_string(),
            cash_cycle,
            revenue_usd,
            without_scf,
            with_scf,
            effect,
            calc_desc: calc_desc.to_string(),
        }
    };

    vec![
        row("2012 (before SCF)", 104.0, 3159.0, 900.1, 900.1, 0.0, "104d/365d x $3,159M = $901M"),
        row("2013 (SCF phase-in)", 122.0, 2924.0, 977.34, 897.23, 10.0, "(122d-10d)/365d x $2,924M = $900M"),
        row("2014 (SCF in full)", 87.0, 3009.0, 717.21, 577.07, 17.0, "(87d-17d)/365d x $3,009M = $580M"),
        row("2015", 85.0, 3099.0, 721.68, 577.35, 17.0, "(85d-17d)/365d x $3,099M = $575M"),
    ]
}
