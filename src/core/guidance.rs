use super::types::RiskLevel;

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RiskLevel::Low => {
                "Low-risk portfolios usually hold government bonds, term deposits and \
                 fixed-income funds. Expected returns are lower but more stable."
            }
            RiskLevel::Medium => {
                "Medium-risk portfolios blend equities, bonds and cash in a balanced \
                 allocation. Expected return and risk are both moderate."
            }
            RiskLevel::High => {
                "High-risk portfolios concentrate on equities, especially growth stocks, \
                 sector ETFs or alternative assets. Expected returns are high but come \
                 with large swings."
            }
        }
    }
}

pub const INVESTMENT_TIPS: [&str; 5] = [
    "Invest regularly: accumulation works best when you contribute every period, \
     whether the market is rising or falling.",
    "Diversify: spread capital across asset classes to reduce risk.",
    "Think long term: the longer the horizon, the more compounding works for you.",
    "Rebalance periodically: adjust the portfolio so the allocation keeps matching \
     your goals and risk tolerance.",
    "Use tooling: simulators and analysis software help you make better-informed decisions.",
];

pub const DISCLAIMER: &str =
    "This projection is for reference only and does not guarantee future investment results.";
