use chrono::Months;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::types::{MONTHS_PER_YEAR, MonthlySample, ProjectionInput, ProjectionSeries};
use crate::error::InputError;

/// Monthly rate that compounds to `annual_return_pct` over twelve periods.
pub fn effective_monthly_rate(annual_return_pct: f64) -> f64 {
    (1.0 + annual_return_pct / 100.0).powf(1.0 / f64::from(MONTHS_PER_YEAR)) - 1.0
}

/// Standard deviation of one month's return for an annualized volatility.
pub fn monthly_volatility(volatility_pct: f64) -> f64 {
    volatility_pct / 100.0 / f64::from(MONTHS_PER_YEAR).sqrt()
}

/// Projects the plan month by month.
///
/// With zero volatility every month grows at the effective monthly rate and
/// `rng` is left untouched. Otherwise each month's realized rate is drawn from
/// a normal distribution centred on that rate, so repeated calls sharing one
/// generator yield independent paths.
pub fn project<R: Rng + ?Sized>(
    input: &ProjectionInput,
    rng: &mut R,
) -> Result<ProjectionSeries, InputError> {
    input.validate()?;

    let monthly_rate = effective_monthly_rate(input.annual_return_pct);
    if !input.is_stochastic() {
        return Ok(compound(input, || monthly_rate));
    }

    let shocks = Normal::new(monthly_rate, monthly_volatility(input.volatility_pct))
        .map_err(|_| InputError::InvalidVolatility(input.volatility_pct))?;
    Ok(compound(input, || shocks.sample(&mut *rng)))
}

/// Zero-volatility projection without a random source.
pub fn project_deterministic(input: &ProjectionInput) -> Result<ProjectionSeries, InputError> {
    input.validate()?;
    if input.is_stochastic() {
        return Err(InputError::RandomSourceRequired(input.volatility_pct));
    }

    let monthly_rate = effective_monthly_rate(input.annual_return_pct);
    Ok(compound(input, || monthly_rate))
}

// Contributions land at the end of each period, after growth.
fn compound(input: &ProjectionInput, mut next_rate: impl FnMut() -> f64) -> ProjectionSeries {
    let months = input.months();
    let mut samples = Vec::with_capacity(months as usize + 1);

    let mut contributed = input.initial;
    let mut balance = input.initial;
    samples.push(MonthlySample {
        month: 0,
        date: input.start_date,
        contributed,
        balance,
    });

    for month in 1..=months {
        let rate = next_rate();
        contributed += input.monthly;
        balance = balance * (1.0 + rate) + input.monthly;
        samples.push(MonthlySample {
            month,
            date: input.start_date + Months::new(month),
            contributed,
            balance,
        });
    }

    ProjectionSeries { samples }
}
