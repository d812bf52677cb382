use super::types::{
    Allocation, MONTHS_PER_YEAR, ProjectionSeries, ProjectionSummary, YearlyCheckpoint,
};

/// Profit as a percentage of the contributed amount, `None` when nothing was
/// contributed.
pub fn roi_pct(profit: f64, contributed: f64) -> Option<f64> {
    if contributed == 0.0 {
        return None;
    }
    Some(profit / contributed * 100.0)
}

/// One row per year boundary, starting with year 0 (the opening balance).
pub fn yearly_checkpoints(series: &ProjectionSeries) -> Vec<YearlyCheckpoint> {
    series
        .samples
        .iter()
        .step_by(MONTHS_PER_YEAR as usize)
        .map(|sample| {
            let profit = sample.balance - sample.contributed;
            YearlyCheckpoint {
                year: sample.month / MONTHS_PER_YEAR,
                contributed: sample.contributed,
                balance: sample.balance,
                profit,
                roi_pct: roi_pct(profit, sample.contributed),
            }
        })
        .collect()
}

pub fn summarize(series: &ProjectionSeries) -> ProjectionSummary {
    let (total_contributed, final_balance) = series
        .last()
        .map(|s| (s.contributed, s.balance))
        .unwrap_or((0.0, 0.0));
    let profit = final_balance - total_contributed;

    ProjectionSummary {
        total_contributed,
        final_balance,
        profit,
        roi_pct: roi_pct(profit, total_contributed),
    }
}

pub fn allocation(summary: &ProjectionSummary) -> Allocation {
    Allocation {
        principal: summary.total_contributed,
        profit: summary.profit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::project_deterministic;
    use crate::core::types::ProjectionInput;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn input(initial: f64, monthly: f64, years: u32, annual_return_pct: f64) -> ProjectionInput {
        ProjectionInput {
            initial,
            monthly,
            years,
            annual_return_pct,
            volatility_pct: 0.0,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date"),
        }
    }

    #[test]
    fn roi_is_undefined_without_contributions() {
        assert_eq!(roi_pct(0.0, 0.0), None);
        assert_eq!(roi_pct(50.0, 200.0), Some(25.0));
        assert_eq!(roi_pct(-50.0, 200.0), Some(-25.0));
    }

    #[test]
    fn yearly_checkpoints_sample_every_twelfth_month() {
        let series = project_deterministic(&input(1_000.0, 100.0, 3, 0.0)).expect("valid input");
        let rows = yearly_checkpoints(&series);

        assert_eq!(rows.len(), 4);
        let years: Vec<u32> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![0, 1, 2, 3]);
        assert_eq!(rows[0].contributed, 1_000.0);
        assert_eq!(rows[1].contributed, 2_200.0);
        assert_eq!(rows[3].balance, 4_600.0);
        assert!(rows.iter().all(|r| r.profit == 0.0));
        assert!(rows.iter().all(|r| r.roi_pct == Some(0.0)));
    }

    #[test]
    fn yearly_checkpoints_report_growth() {
        let series = project_deterministic(&input(1_000.0, 0.0, 2, 10.0)).expect("valid input");
        let rows = yearly_checkpoints(&series);

        assert_relative_eq!(rows[1].balance, 1_100.0, epsilon = 1e-9);
        assert_relative_eq!(rows[2].balance, 1_210.0, epsilon = 1e-9);
        assert_relative_eq!(rows[2].profit, 210.0, epsilon = 1e-9);
        assert_relative_eq!(rows[2].roi_pct.expect("contributed"), 21.0, epsilon = 1e-9);
    }

    #[test]
    fn summary_matches_last_sample() {
        let series = project_deterministic(&input(10_000_000.0, 1_000_000.0, 1, 0.0))
            .expect("valid input");
        let summary = summarize(&series);

        assert_eq!(summary.total_contributed, 22_000_000.0);
        assert_eq!(summary.final_balance, 22_000_000.0);
        assert_eq!(summary.profit, 0.0);
        assert_eq!(summary.roi_pct, Some(0.0));

        let split = allocation(&summary);
        assert_eq!(split.principal, 22_000_000.0);
        assert_eq!(split.profit, 0.0);
    }

    #[test]
    fn zero_plan_flags_undefined_roi() {
        let series = project_deterministic(&input(0.0, 0.0, 7, 12.0)).expect("valid input");
        let summary = summarize(&series);

        assert_eq!(summary.final_balance, 0.0);
        assert_eq!(summary.roi_pct, None);
        assert!(yearly_checkpoints(&series).iter().all(|r| r.roi_pct.is_none()));
    }

    #[test]
    fn roi_serializes_as_null_when_undefined() {
        let series = project_deterministic(&input(0.0, 0.0, 1, 5.0)).expect("valid input");
        let json = serde_json::to_value(summarize(&series)).expect("serializable");
        assert!(json["roiPct"].is_null());
        assert_eq!(json["finalBalance"], 0.0);
    }
}
