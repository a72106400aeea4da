//! Day-simulation clock (spec §4.10): advances the simulated date by a
//! number of days or to a target date, applying the daily usage list and
//! the lifecycle tracker's checks along the way.

use chrono::NaiveDate;

use crate::lifecycle::{self, DailySummary, UsageEvent};
use crate::model::Item;

/// How far to advance the simulated clock.
#[derive(Clone, Debug)]
pub enum Advance {
    Days(u32),
    ToDate(NaiveDate),
}

/// Result of a simulation step: the new simulated date and the union of
/// every day's lifecycle summary along the way.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    pub new_date: NaiveDate,
    pub summary: DailySummary,
}

/// Advances `current` by `advance`, applying `usage` once on the final day
/// reached (matching the single "usageList" input per simulate call) and
/// running the expiry/depletion sweep for every day crossed, so an item
/// expiring mid-range is still caught.
pub fn advance(current: NaiveDate, advance: Advance, items: &mut Vec<Item>, usage: &[UsageEvent]) -> SimulationResult {
    let target = match advance {
        Advance::Days(days) => current + chrono::Duration::days(days as i64),
        Advance::ToDate(date) => date,
    };

    let mut summary = DailySummary::default();
    let mut day = current;
    while day < target {
        day += chrono::Duration::days(1);
        let is_final_day = day == target;
        let daily_usage: &[UsageEvent] = if is_final_day { usage } else { &[] };
        let day_summary = lifecycle::advance_day(items, day, daily_usage);
        summary.used.extend(day_summary.used);
        summary.expired.extend(day_summary.expired);
        summary.depleted.extend(day_summary.depleted);
    }

    SimulationResult { new_date: target, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_by_days_moves_clock_forward() {
        let mut items = Vec::new();
        let result = advance(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            Advance::Days(1),
            &mut items,
            &[],
        );
        assert_eq!(result.new_date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    }

    #[test]
    fn test_advance_catches_expiry_mid_range() {
        let mut items = vec![Item::new(
            "I1".into(),
            "Widget".into(),
            (1.0, 1.0, 1.0),
            1.0,
            50,
            Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            None,
            "A".into(),
        )
        .unwrap()];

        let result = advance(
            NaiveDate::from_ymd_opt(2024, 12, 30).unwrap(),
            Advance::ToDate(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()),
            &mut items,
            &[],
        );

        assert!(items[0].waste);
        assert!(result.summary.expired.contains(&"I1".to_string()));
    }

    #[test]
    fn test_advance_to_date_in_the_past_is_a_no_op() {
        let mut items = Vec::new();
        let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let result = advance(start, Advance::ToDate(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()), &mut items, &[]);
        assert_eq!(result.new_date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(result.summary.expired.is_empty());
    }
}
