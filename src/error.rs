//! Input-domain errors.
//!
//! The projection kernel has no runtime failure modes of its own; everything
//! here describes a parameter that falls outside the domain the engine or the
//! dashboard accepts.

/// Rejected projection parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    /// A money amount that must be a finite value >= 0.
    #[error("{field} must be a finite amount >= 0, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },

    /// The projection horizon must cover at least one year.
    #[error("horizon must be at least 1 year")]
    EmptyHorizon,

    /// The horizon runs past the last representable calendar date.
    #[error("a {years}-year horizon starting {start} overflows the calendar")]
    HorizonOverflow { start: chrono::NaiveDate, years: u32 },

    /// The expected annual return cannot be compounded.
    #[error("expected annual return must be finite and > -100%, got {0}")]
    InvalidReturn(f64),

    /// Volatility must be a finite percentage >= 0.
    #[error("volatility must be a finite percentage >= 0, got {0}")]
    InvalidVolatility(f64),

    /// A deterministic-only entry point received a stochastic input.
    #[error("volatility is {0}%, a random source is required")]
    RandomSourceRequired(f64),

    /// A scenario fan needs at least one path.
    #[error("scenario count must be > 0")]
    NoScenarios,

    /// A dashboard control set outside its slider bounds.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    /// A dashboard control set between two slider notches.
    #[error("{field} must be a multiple of {step}, got {value}")]
    OffStep {
        field: &'static str,
        step: f64,
        value: f64,
    },
}

/// Failures surfaced by the command line front end.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render report")]
    Render(#[from] std::fmt::Error),
}
