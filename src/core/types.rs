use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::InputError;

pub const MONTHS_PER_YEAR: u32 = 12;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Parameters of one projection. Percentages are whole-number percents
/// (`10.0` means 10 % per year).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInput {
    pub initial: f64,
    pub monthly: f64,
    pub years: u32,
    pub annual_return_pct: f64,
    pub volatility_pct: f64,
    pub start_date: NaiveDate,
}

impl ProjectionInput {
    /// Number of compounding periods. Only meaningful once [`Self::validate`]
    /// has accepted the horizon.
    pub fn months(&self) -> u32 {
        self.years.saturating_mul(MONTHS_PER_YEAR)
    }

    pub fn is_stochastic(&self) -> bool {
        self.volatility_pct > 0.0
    }

    /// Same plan with a different expected return.
    pub fn with_annual_return(&self, annual_return_pct: f64) -> Self {
        Self {
            annual_return_pct,
            ..self.clone()
        }
    }

    pub fn deterministic(&self) -> Self {
        Self {
            volatility_pct: 0.0,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        for (field, value) in [("initial", self.initial), ("monthly", self.monthly)] {
            if !value.is_finite() || value < 0.0 {
                return Err(InputError::NegativeAmount { field, value });
            }
        }

        if self.years == 0 {
            return Err(InputError::EmptyHorizon);
        }

        let end = self
            .years
            .checked_mul(MONTHS_PER_YEAR)
            .and_then(|months| self.start_date.checked_add_months(Months::new(months)));
        if end.is_none() {
            return Err(InputError::HorizonOverflow {
                start: self.start_date,
                years: self.years,
            });
        }

        if !self.annual_return_pct.is_finite() || self.annual_return_pct <= -100.0 {
            return Err(InputError::InvalidReturn(self.annual_return_pct));
        }

        if !self.volatility_pct.is_finite() || self.volatility_pct < 0.0 {
            return Err(InputError::InvalidVolatility(self.volatility_pct));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySample {
    pub month: u32,
    pub date: NaiveDate,
    pub contributed: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSeries {
    pub samples: Vec<MonthlySample>,
}

impl ProjectionSeries {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&MonthlySample> {
        self.samples.last()
    }

    pub fn balances(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.balance).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyCheckpoint {
    pub year: u32,
    pub contributed: f64,
    pub balance: f64,
    pub profit: f64,
    pub roi_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub total_contributed: f64,
    pub final_balance: f64,
    pub profit: f64,
    pub roi_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub principal: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioFan {
    pub paths: Vec<Vec<f64>>,
    pub average: Vec<f64>,
    pub final_min: f64,
    pub final_mean: f64,
    pub final_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOutcome {
    pub name: &'static str,
    pub multiplier: f64,
    pub annual_return_pct: f64,
    pub balances: Vec<f64>,
    pub final_balance: f64,
    pub total_contributed: f64,
    pub profit: f64,
    pub roi_pct: Option<f64>,
}
