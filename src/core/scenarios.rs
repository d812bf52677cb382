use rand::Rng;

use super::engine::project;
use super::types::{ProjectionInput, ScenarioFan};
use crate::error::InputError;

pub const DEFAULT_SCENARIOS: u32 = 10;

/// Draws `count` independent paths for the same plan from one generator.
pub fn scenario_fan<R: Rng + ?Sized>(
    input: &ProjectionInput,
    count: u32,
    rng: &mut R,
) -> Result<ScenarioFan, InputError> {
    if count == 0 {
        return Err(InputError::NoScenarios);
    }

    let paths = (0..count)
        .map(|_| project(input, &mut *rng).map(|series| series.balances()))
        .collect::<Result<Vec<_>, _>>()?;

    let average = pointwise_mean(&paths);
    let finals: Vec<f64> = paths
        .iter()
        .filter_map(|path| path.last().copied())
        .collect();
    let final_min = finals.iter().copied().fold(f64::INFINITY, f64::min);
    let final_max = finals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let final_mean = finals.iter().sum::<f64>() / finals.len() as f64;

    Ok(ScenarioFan {
        paths,
        average,
        final_min,
        final_mean,
        final_max,
    })
}

fn pointwise_mean(paths: &[Vec<f64>]) -> Vec<f64> {
    let Some(first) = paths.first() else {
        return Vec::new();
    };

    let mut sums = vec![0.0; first.len()];
    for path in paths {
        for (sum, value) in sums.iter_mut().zip(path) {
            *sum += value;
        }
    }

    let n = paths.len() as f64;
    sums.into_iter().map(|sum| sum / n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::project_deterministic;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use proptest::prelude::{any, prop_assert, proptest};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn volatile_input() -> ProjectionInput {
        ProjectionInput {
            initial: 10_000_000.0,
            monthly: 1_000_000.0,
            years: 10,
            annual_return_pct: 10.0,
            volatility_pct: 15.0,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date"),
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(24))]

        #[test]
        fn prop_final_spread_brackets_mean(seed in any::<u64>(), count in 1u32..=30) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let fan = scenario_fan(&volatile_input(), count, &mut rng).expect("valid input");

            prop_assert!(fan.paths.len() == count as usize);
            prop_assert!(fan.final_min <= fan.final_mean + 1e-6);
            prop_assert!(fan.final_mean <= fan.final_max + 1e-6);
            prop_assert!(fan.average.len() == 121);
        }
    }

    #[test]
    fn fan_has_requested_number_of_distinct_paths() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let fan = scenario_fan(&volatile_input(), DEFAULT_SCENARIOS, &mut rng).expect("valid input");

        assert_eq!(fan.paths.len(), 10);
        for (i, a) in fan.paths.iter().enumerate() {
            assert_eq!(a[0], 10_000_000.0);
            for b in &fan.paths[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn average_is_pointwise_mean_of_paths() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let fan = scenario_fan(&volatile_input(), 4, &mut rng).expect("valid input");

        for month in [0usize, 1, 60, 120] {
            let expected = fan.paths.iter().map(|p| p[month]).sum::<f64>() / 4.0;
            assert_relative_eq!(fan.average[month], expected, max_relative = 1e-12);
        }
        assert_relative_eq!(fan.final_mean, fan.average[120], max_relative = 1e-12);
    }

    #[test]
    fn large_fan_average_approaches_deterministic_path() {
        let input = volatile_input();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let fan = scenario_fan(&input, 2_000, &mut rng).expect("valid input");
        let baseline = project_deterministic(&input.deterministic()).expect("valid input");

        let expected = baseline.last().map(|s| s.balance).expect("non-empty");
        assert_relative_eq!(fan.final_mean, expected, max_relative = 0.05);
    }

    #[test]
    fn zero_volatility_fan_collapses_to_one_path() {
        let input = volatile_input().deterministic();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let fan = scenario_fan(&input, 3, &mut rng).expect("valid input");

        assert_eq!(fan.paths[0], fan.paths[2]);
        assert_eq!(fan.final_min, fan.final_max);
    }

    #[test]
    fn empty_fan_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            scenario_fan(&volatile_input(), 0, &mut rng),
            Err(InputError::NoScenarios)
        );
    }

    #[test]
    fn invalid_input_propagates() {
        let mut input = volatile_input();
        input.years = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            scenario_fan(&input, 2, &mut rng),
            Err(InputError::EmptyHorizon)
        );
    }
}
