// 🔗 Supply chain finance economics - case Tables A and B plus narratives
//
// Amounts are on a $1,000 invoice unless noted. The financing costs in
// Table A and the supplier view were computed by hand for the case write-up.

use super::records::{
    BuyerScenarioRecord, DiscountCalculation, ImpactItem, InterestRange, NamedValue,
    PartyBenefits, PaymentScenarioRecord, PaymentTerms, PaymentTimelinePoint, Stance,
    SuccessFactor, SupplierScenarioRecord, TimelineEvent,
};

pub struct ScfTables {
    pub table_a: Vec<PaymentScenarioRecord>,
    pub payment_timeline: Vec<PaymentTimelinePoint>,
    pub table_b: DiscountCalculation,
    pub discount_components: Vec<NamedValue>,
    pub supplier_perspective: Vec<SupplierScenarioRecord>,
    pub buyer_perspective: Vec<BuyerScenarioRecord>,
    pub payment_terms: PaymentTerms,
    pub impacts: Vec<ImpactItem>,
    pub interest_ranges: Vec<InterestRange>,
    pub parties: Vec<PartyBenefits>,
    pub success_factors: Vec<SuccessFactor>,
    pub adoption: Vec<NamedValue>,
    pub program_timeline: Vec<TimelineEvent>,
}

pub fn build() -> ScfTables {
    let table_b = DiscountCalculation {
        days_financed: 60.0,
        libor_60_day: 0.30,
        bank_spread: 1.00,
        financing_rate: 1.30,
        discount_percentage: 0.22,
    };

    ScfTables {
        table_a: table_a(),
        payment_timeline: vec![
            timeline_point("D+0", 0.0, 0.0, "Invoice issued"),
            timeline_point("D+15", 997.83, 0.0, "SCF early payment"),
            timeline_point("D+45", 997.83, 997.08, "Original due date"),
            timeline_point("D+75", 997.83, 994.17, "Extended due date"),
        ],
        discount_components: vec![
            NamedValue::new("60-day LIBOR", table_b.libor_60_day),
            NamedValue::new("Bank spread", table_b.bank_spread),
        ],
        table_b,
        supplier_perspective: supplier_perspective(),
        buyer_perspective: vec![
            BuyerScenarioRecord {
                name: "Original terms".to_string(),
                dpo: 45,
                working_capital_impact: 0,
                cash_outflow: 1000,
                cash_outflow_day: 45,
            },
            BuyerScenarioRecord {
                name: "SCF program".to_string(),
                dpo: 75,
                working_capital_impact: 30,
                cash_outflow: 1000,
                cash_outflow_day: 75,
            },
        ],
        payment_terms: PaymentTerms {
            before: 45,
            after: 75,
            change: 30,
        },
        impacts: impacts(),
        interest_ranges: vec![
            InterestRange {
                party: "P&G savings".to_string(),
                min: 10.0,
                max: 20.0,
                unit: "USD millions".to_string(),
            },
            InterestRange {
                party: "Fibria cost".to_string(),
                min: 0.74,
                max: 1.11,
                unit: "USD millions".to_string(),
            },
        ],
        parties: parties(),
        success_factors: success_factors(),
        adoption: vec![
            NamedValue::new("Participating", 20.0),
            NamedValue::new("Not participating", 80.0),
        ],
        program_timeline: vec![
            TimelineEvent::new("2012", "$10 billion cost-reduction program announced"),
            TimelineEvent::new("Apr 2013", "SCF launched together with the payment-term extension"),
            TimelineEvent::new("Mid 2013", "Fibria joins the SCF program"),
            TimelineEvent::new("Mid 2015", "About 700 suppliers enrolled, second phase planned"),
        ],
    }
}

fn timeline_point(name: &str, scf: f64, traditional: f64, label: &str) -> PaymentTimelinePoint {
    PaymentTimelinePoint {
        name: name.to_string(),
        scf,
        traditional,
        label: label.to_string(),
    }
}

fn table_a() -> Vec<PaymentScenarioRecord> {
    let row = |scenario: &str, days, receivable, financing_cost, net_amount, description: &str| {
        PaymentScenarioRecord {
            scenario: scenario.to_string(),
            days,
            receivable,
            payable: 45,
            financing_cost,
            net_amount,
            description: description.to_string(),
        }
    };

    vec![
        row("Original terms", 45, 45, 2.92, 997.08, "Payment terms before SCF"),
        row(
            "Extended terms, no SCF",
            75,
            75,
            5.83,
            994.17,
            "Terms extended without SCF; the supplier carries the extra days",
        ),
        row(
            "SCF program",
            75,
            15,
            2.17,
            997.83,
            "P&G pays at day 75, the supplier collects from the bank at day 15",
        ),
    ]
}

fn supplier_perspective() -> Vec<SupplierScenarioRecord> {
    let row = |name: &str, days_to_receive, financing_cost, net_amount, annual_rate| {
        SupplierScenarioRecord {
            name: name.to_string(),
            invoice_amount: 1000.0,
            days_to_receive,
            financing_cost,
            net_amount,
            annual_rate,
        }
    };

    vec![
        row("Original terms", 45.0, 2.92, 997.08, 3.50),
        row("Extension without SCF", 75.0, 5.83, 994.17, 3.50),
        row("SCF program", 15.0, 2.17, 997.83, 1.30),
    ]
}

fn impact(
    party: &str,
    stance: Stance,
    title: &str,
    value: Option<&str>,
    detail: &str,
) -> ImpactItem {
    ImpactItem {
        party: party.to_string(),
        stance,
        title: title.to_string(),
        value: value.map(str::to_string),
        detail: detail.to_string(),
    }
}

fn impacts() -> Vec<ImpactItem> {
    use Stance::{Consideration, Negative, Positive};

    vec![
        impact("P&G", Positive, "Higher accounts payable", Some("$4.0B"), "$8.7B to $12.7B"),
        impact("P&G", Positive, "Cash retained", Some("$4.0B"), "Operating cash flow improves"),
        impact(
            "P&G",
            Positive,
            "Interest savings",
            Some("$10-20M per year"),
            "0.25%-0.50% at an AA rating on $4.0B",
        ),
        impact(
            "P&G",
            Positive,
            "Shorter cash conversion cycle",
            Some("30 days"),
            "12.6 to -17.4 days",
        ),
        impact(
            "P&G",
            Negative,
            "Lower current ratio",
            None,
            "Current liabilities grow faster than current assets",
        ),
        impact(
            "P&G",
            Negative,
            "Strained supplier relations",
            None,
            "Suppliers absorb the cash-flow squeeze",
        ),
        impact(
            "P&G",
            Negative,
            "Supply-chain stability",
            None,
            "Weaker suppliers raise the risk of disruption",
        ),
        impact(
            "P&G",
            Negative,
            "Long-run price pressure",
            None,
            "Supplier financing costs may be passed back in prices",
        ),
        impact(
            "Fibria",
            Negative,
            "Higher receivables",
            Some("$37M"),
            "45 more days outstanding lifts receivables by 75%",
        ),
        impact(
            "Fibria",
            Negative,
            "Extra funding required",
            Some("$37M"),
            "Additional working capital to finance",
        ),
        impact(
            "Fibria",
            Negative,
            "Interest cost",
            Some("$0.74-1.11M per year"),
            "2.0%-3.0% at a BBB- rating on $37M",
        ),
        impact(
            "Fibria",
            Negative,
            "Longer cash conversion cycle",
            Some("45 days"),
            "100 to 145 days",
        ),
        impact(
            "Fibria",
            Negative,
            "Lower current ratio",
            Some("1.55 to 1.35"),
            "Short-term liquidity weakens",
        ),
        impact(
            "Fibria",
            Consideration,
            "Currency exposure",
            None,
            "90% of debt is USD-denominated; a stronger dollar raises the burden",
        ),
        impact(
            "Fibria",
            Consideration,
            "Liquidity management",
            None,
            "Added pressure on an already stretched balance sheet",
        ),
        impact(
            "Fibria",
            Consideration,
            "Industry profile",
            None,
            "Commodity producers already run a ~100-day cycle",
        ),
        impact(
            "Fibria",
            Consideration,
            "Dependence on P&G",
            None,
            "P&G is about 10% of Fibria sales",
        ),
    ]
}

fn party(name: &str, wins: bool, points: &[&str]) -> PartyBenefits {
    PartyBenefits {
        party: name.to_string(),
        wins,
        points: points.iter().map(|p| p.to_string()).collect(),
    }
}

fn parties() -> Vec<PartyBenefits> {
    vec![
        party(
            "P&G",
            true,
            &[
                "Working capital improves (DPO 45 to 75 days)",
                "Terms aligned with the 75-100 day industry norm",
                "Supplier relationships preserved",
                "Better cash flow and lower costs",
            ],
        ),
        party(
            "Suppliers",
            true,
            &[
                "Funding priced off P&G's AA- rating",
                "Choice of payment at day 15 or day 75",
                "Fast cash conversion (Fibria: within 5 days)",
                "Lower receivables on the balance sheet",
            ],
        ),
        party(
            "SCF banks",
            true,
            &[
                "New business on P&G's low risk profile",
                "Stable income from the 1% spread",
                "Access to thousands of P&G suppliers",
                "Credit risk bounded by P&G's rating",
            ],
        ),
        party(
            "Local banks",
            false,
            &["Lose supplier lending, especially in emerging markets"],
        ),
        party(
            "Small suppliers",
            false,
            &["Limited SCF access leaves only the longer terms"],
        ),
        party(
            "Low-cost borrowers",
            false,
            &["Strongly rated suppliers gain little from SCF"],
        ),
    ]
}

fn success_factors() -> Vec<SuccessFactor> {
    let factor = |title: &str, detail: &str| SuccessFactor {
        title: title.to_string(),
        detail: detail.to_string(),
    };

    vec![
        factor(
            "P&G's AA- credit rating",
            "Low discounts for suppliers and predictable credit risk for banks",
        ),
        factor(
            "Competing SCF banks",
            "Citigroup and JP Morgan/Deutsche Bank competition keeps terms favorable",
        ),
        factor(
            "Supplier choice",
            "Suppliers decide whether to join, which bank to use and when to discount",
        ),
        factor(
            "Phased global rollout",
            "Started with 3,500 key suppliers and expanded region by region",
        ),
        factor(
            "Tailored terms",
            "SCF terms negotiated to the supplier's finances and region",
        ),
    ]
}
