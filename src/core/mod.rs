mod engine;
mod guidance;
mod report;
mod scenarios;
mod strategies;
mod types;

pub use engine::{effective_monthly_rate, monthly_volatility, project, project_deterministic};
pub use guidance::{DISCLAIMER, INVESTMENT_TIPS};
pub use report::{allocation, roi_pct, summarize, yearly_checkpoints};
pub use scenarios::{DEFAULT_SCENARIOS, scenario_fan};
pub use strategies::{STRATEGIES, Strategy, compare_strategies};
pub use types::{
    Allocation, MONTHS_PER_YEAR, MonthlySample, ProjectionInput, ProjectionSeries,
    ProjectionSummary, RiskLevel, ScenarioFan, StrategyOutcome, YearlyCheckpoint,
};
