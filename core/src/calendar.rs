//! Calendar helpers: the random-date provider and date-window arithmetic.

use crate::{
    error::{GenError, GenResult},
    rng::StageRng,
};
use chrono::{Months, NaiveDate};

/// Source of "a random calendar date in range".
///
/// The client generator only relies on the contract that the returned
/// date lies in `[start, end]`; swap the implementation to change how
/// opening dates are distributed.
pub trait DateProvider {
    fn date_between(&mut self, rng: &mut StageRng, start: NaiveDate, end: NaiveDate) -> NaiveDate;
}

/// Every whole day in `[start, end]` is equally likely.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformDates;

impl DateProvider for UniformDates {
    fn date_between(&mut self, rng: &mut StageRng, start: NaiveDate, end: NaiveDate) -> NaiveDate {
        uniform_date(rng, start, end)
    }
}

/// Uniform whole-day draw in `[start, end]`, both ends inclusive.
/// Returns `start` when the window is empty or inverted.
pub fn uniform_date(rng: &mut StageRng, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days();
    if span <= 0 {
        return start;
    }
    let offset = rng.next_u64_below(span as u64 + 1);
    start + chrono::Duration::days(offset as i64)
}

/// The date `years` calendar years before `as_of`.
/// Feb 29 clamps to Feb 28 in non-leap target years.
pub fn years_before(as_of: NaiveDate, years: u32) -> GenResult<NaiveDate> {
    years
        .checked_mul(12)
        .and_then(|months| as_of.checked_sub_months(Months::new(months)))
        .ok_or_else(|| GenError::DateOutOfRange {
            reason: format!("{years} years before {as_of}"),
        })
}

/// Whole days from `from` to `to` divided by 365.25.
pub fn age_in_years(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / 365.25
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StageSlot};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn uniform_date_inclusive_bounds() {
        let mut rng = RngBank::new(11).for_stage(StageSlot::Transactions);
        let (start, end) = (d(2023, 1, 1), d(2023, 1, 3));
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..2_000 {
            let day = uniform_date(&mut rng, start, end);
            assert!(day >= start && day <= end);
            seen.insert(day);
        }
        assert_eq!(seen.len(), 3, "both ends of the window must be reachable");
    }

    #[test]
    fn single_day_window() {
        let mut rng = RngBank::new(11).for_stage(StageSlot::Transactions);
        let day = d(2020, 2, 29);
        assert_eq!(uniform_date(&mut rng, day, day), day);
    }

    #[test]
    fn years_before_clamps_leap_day() {
        assert_eq!(years_before(d(2024, 2, 29), 1).unwrap(), d(2023, 2, 28));
        assert_eq!(years_before(d(2026, 10, 19), 10).unwrap(), d(2016, 10, 19));
    }

    #[test]
    fn years_before_reports_overflow() {
        let err = years_before(d(2024, 6, 30), 400_000_000).unwrap_err();
        assert!(matches!(err, GenError::DateOutOfRange { .. }));
        assert!(years_before(d(2024, 6, 30), 300_000).is_err());
    }

    #[test]
    fn age_uses_julian_year() {
        let age = age_in_years(d(2020, 1, 1), d(2021, 1, 1));
        assert!((age - 366.0 / 365.25).abs() < 1e-12);
    }
}
