// 📈 Market rates as of August 7, 2015 (percent)

use super::records::{RateRecord, RateScenarioRecord, RateTable, RatingComparisonRecord};

pub struct MarketTables {
    pub treasury_yields: RateTable,
    pub corporate_bond_yields: RateTable,
    pub short_term_rates: RateTable,
    pub scf_rate_simulation: Vec<RateScenarioRecord>,
    pub ratings_comparison: Vec<RatingComparisonRecord>,
    pub historical_libor: RateTable,
}

pub fn build() -> MarketTables {
    MarketTables {
        treasury_yields: RateTable::new(
            "maturity",
            "yield",
            vec![
                RateRecord::new("1M", 0.05),
                RateRecord::new("3M", 0.12),
                RateRecord::new("6M", 0.17),
                RateRecord::new("1Y", 0.33),
                RateRecord::new("5Y", 1.52),
                RateRecord::new("10Y", 2.16),
                RateRecord::new("30Y", 2.86),
            ],
        ),
        // One-year maturity
        corporate_bond_yields: RateTable::new(
            "rating",
            "yield",
            vec![
                RateRecord::new("AAA", 0.48),
                RateRecord::new("AA", 0.63),
                RateRecord::new("A", 0.74),
                RateRecord::new("BBB", 1.13),
                RateRecord::new("BB", 2.80),
                RateRecord::new("B", 3.74),
                RateRecord::new("CCC", 4.58),
            ],
        ),
        short_term_rates: RateTable::new(
            "type",
            "rate",
            vec![
                RateRecord::new("1M LIBOR", 0.19),
                RateRecord::new("3M LIBOR", 0.30),
                RateRecord::new("6M LIBOR", 0.49),
                RateRecord::new("30-day AA CP", 0.18),
                RateRecord::new("60-day AA CP", 0.23),
                RateRecord::new("90-day AA CP", 0.30),
            ],
        ),
        scf_rate_simulation: vec![
            scenario("Current (2013 contract)", 0.30, 1.00, 1.30, 0.35, 1.05),
            scenario("Renewal scenario 1", 0.30, 0.80, 1.10, 0.30, 0.90),
            scenario("Renewal scenario 2", 0.30, 0.70, 1.00, 0.27, 0.81),
        ],
        ratings_comparison: vec![
            rating("P&G (AA-)", 0.63, 0.30, 0.33),
            rating("Fibria (BBB-)", 1.13, 0.30, 0.83),
            rating("BB-rated company", 2.80, 0.30, 2.50),
        ],
        historical_libor: RateTable::new(
            "date",
            "libor3m",
            vec![
                RateRecord::new("2012", 0.43),
                RateRecord::new("2013", 0.27),
                RateRecord::new("2014", 0.23),
                RateRecord::new("2015 (Aug)", 0.30),
            ],
        ),
    }
}

fn scenario(
    name: &str,
    libor: f64,
    spread: f64,
    total_rate: f64,
    discount: f64,
    cost_year: f64,
) -> RateScenarioRecord {
    RateScenarioRecord {
        scenario: name.to_string(),
        libor,
        spread,
        total_rate,
        period: 100.0,
        discount,
        cost_year,
    }
}

fn rating(
    name: &str,
    borrowing_cost: f64,
    scf_discount: f64,
    cost_difference: f64,
) -> RatingComparisonRecord {
    RatingComparisonRecord {
        rating: name.to_string(),
        borrowing_cost,
        scf_discount,
        cost_difference,
    }
}
