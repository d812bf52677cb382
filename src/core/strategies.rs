use super::engine::project_deterministic;
use super::report::summarize;
use super::types::{ProjectionInput, StrategyOutcome};
use crate::error::InputError;

/// A named scaling of the plan's expected return.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Strategy {
    pub name: &'static str,
    pub multiplier: f64,
}

pub const STRATEGIES: [Strategy; 3] = [
    Strategy {
        name: "conservative",
        multiplier: 0.5,
    },
    Strategy {
        name: "balanced",
        multiplier: 1.0,
    },
    Strategy {
        name: "aggressive",
        multiplier: 1.5,
    },
];

impl Strategy {
    pub fn annual_return_pct(self, base_return_pct: f64) -> f64 {
        base_return_pct * self.multiplier
    }
}

/// Deterministic projection of every strategy in [`STRATEGIES`] order.
/// Volatility on `input` is ignored.
///
/// Every scaled return must stay above -100 %, so a base return at or below
/// -66.67 % is rejected with [`InputError::InvalidReturn`] for the aggressive
/// variant even though the base plan alone would project.
pub fn compare_strategies(input: &ProjectionInput) -> Result<Vec<StrategyOutcome>, InputError> {
    let base = input.deterministic();

    STRATEGIES
        .iter()
        .map(|strategy| -> Result<StrategyOutcome, InputError> {
            let annual_return_pct = strategy.annual_return_pct(base.annual_return_pct);
            let series = project_deterministic(&base.with_annual_return(annual_return_pct))?;
            let summary = summarize(&series);

            Ok(StrategyOutcome {
                name: strategy.name,
                multiplier: strategy.multiplier,
                annual_return_pct,
                balances: series.balances(),
                final_balance: summary.final_balance,
                total_contributed: summary.total_contributed,
                profit: summary.profit,
                roi_pct: summary.roi_pct,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn input(annual_return_pct: f64, volatility_pct: f64) -> ProjectionInput {
        ProjectionInput {
            initial: 10_000_000.0,
            monthly: 1_000_000.0,
            years: 10,
            annual_return_pct,
            volatility_pct,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_outcomes_are_ordered_by_multiplier(annual in 0.0f64..=30.0, years in 1u32..=40) {
            let mut plan = input(annual, 0.0);
            plan.years = years;
            let outcomes = compare_strategies(&plan).expect("valid input");

            prop_assert_eq!(outcomes.len(), 3);
            prop_assert!(outcomes[0].final_balance <= outcomes[1].final_balance);
            prop_assert!(outcomes[1].final_balance <= outcomes[2].final_balance);
            for outcome in &outcomes {
                prop_assert_eq!(outcome.total_contributed, outcomes[0].total_contributed);
            }
        }
    }

    #[test]
    fn strategies_scale_expected_return() {
        let outcomes = compare_strategies(&input(10.0, 0.0)).expect("valid input");

        let names: Vec<&str> = outcomes.iter().map(|o| o.name).collect();
        assert_eq!(names, vec!["conservative", "balanced", "aggressive"]);
        assert_relative_eq!(outcomes[0].annual_return_pct, 5.0);
        assert_relative_eq!(outcomes[1].annual_return_pct, 10.0);
        assert_relative_eq!(outcomes[2].annual_return_pct, 15.0);
    }

    #[test]
    fn balanced_strategy_matches_base_projection() {
        let plan = input(8.0, 0.0);
        let outcomes = compare_strategies(&plan).expect("valid input");
        let base = summarize(&project_deterministic(&plan).expect("valid input"));

        assert_eq!(outcomes[1].final_balance, base.final_balance);
        assert_eq!(outcomes[1].roi_pct, base.roi_pct);
        assert_eq!(outcomes[1].balances.len(), 121);
    }

    #[test]
    fn volatility_is_ignored() {
        let calm = compare_strategies(&input(10.0, 0.0)).expect("valid input");
        let noisy = compare_strategies(&input(10.0, 25.0)).expect("valid input");
        assert_eq!(calm, noisy);
    }

    #[test]
    fn deeply_negative_base_return_is_rejected_by_aggressive_variant() {
        let plan = input(-70.0, 0.0);
        assert!(project_deterministic(&plan).is_ok());
        assert_eq!(
            compare_strategies(&plan),
            Err(InputError::InvalidReturn(-105.0))
        );

        let outcomes = compare_strategies(&input(-60.0, 0.0)).expect("valid input");
        assert_relative_eq!(outcomes[2].annual_return_pct, -90.0);
    }

    #[test]
    fn zero_return_collapses_strategies() {
        let outcomes = compare_strategies(&input(0.0, 0.0)).expect("valid input");
        for outcome in &outcomes {
            assert_eq!(outcome.final_balance, 130_000_000.0);
            assert_eq!(outcome.profit, 0.0);
        }
    }
}
