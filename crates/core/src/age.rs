//! Calendar age arithmetic.
//!
//! This is the only place the minimum-age rule lives. Both the profile
//! validator and anything else that needs to gate on age go through
//! [`is_eligible`].

use chrono::{Datelike, NaiveDate};

/// Minimum age, in whole years, required to store profile parameters.
pub const MINIMUM_AGE: i32 = 18;

/// Compute the age in whole years of someone born on `birth_date`, as of
/// `reference_date`.
///
/// The year difference is reduced by one when the reference `(month, day)`
/// sorts before the birth `(month, day)`, i.e. the birthday has not happened
/// yet that year. A 29 February birthday is therefore reached on 1 March in
/// non-leap years.
///
/// Returns a negative value when `birth_date` is after `reference_date`.
///
/// ```
/// use chrono::NaiveDate;
/// use fitness_diary_core::compute_age;
///
/// let born = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
/// let day_before = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
/// let birthday = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
///
/// assert_eq!(compute_age(born, day_before), 33);
/// assert_eq!(compute_age(born, birthday), 34);
/// ```
#[must_use]
pub fn compute_age(birth_date: NaiveDate, reference_date: NaiveDate) -> i32 {
    let years = reference_date.year() - birth_date.year();
    if (reference_date.month(), reference_date.day()) < (birth_date.month(), birth_date.day()) {
        years - 1
    } else {
        years
    }
}

/// Whether someone born on `birth_date` is at least [`MINIMUM_AGE`] years old
/// on `reference_date`.
#[must_use]
pub fn is_eligible(birth_date: NaiveDate, reference_date: NaiveDate) -> bool {
    compute_age(birth_date, reference_date) >= MINIMUM_AGE
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_day_before_birthday() {
        assert_eq!(compute_age(date(1990, 6, 15), date(2024, 6, 14)), 33);
    }

    #[test]
    fn test_age_on_birthday() {
        assert_eq!(compute_age(date(1990, 6, 15), date(2024, 6, 15)), 34);
    }

    #[test]
    fn test_age_earlier_month_later_day() {
        // Month already passed even though the day-of-month is smaller
        assert_eq!(compute_age(date(1990, 3, 30), date(2024, 4, 1)), 34);
    }

    #[test]
    fn test_age_later_month_earlier_day() {
        assert_eq!(compute_age(date(1990, 12, 1), date(2024, 11, 30)), 33);
    }

    #[test]
    fn test_age_same_day_of_birth() {
        assert_eq!(compute_age(date(2024, 1, 1), date(2024, 1, 1)), 0);
    }

    #[test]
    fn test_age_future_birth_is_negative() {
        assert!(compute_age(date(2030, 1, 1), date(2024, 1, 1)) < 0);
    }

    #[test]
    fn test_leap_day_birthday_in_common_year() {
        let born = date(2004, 2, 29);
        assert_eq!(compute_age(born, date(2022, 2, 28)), 17);
        assert_eq!(compute_age(born, date(2022, 3, 1)), 18);
    }

    #[test]
    fn test_leap_day_birthday_in_leap_year() {
        assert_eq!(compute_age(date(2004, 2, 29), date(2024, 2, 29)), 20);
    }

    #[test]
    fn test_eligible_on_eighteenth_anniversary() {
        let reference = date(2024, 6, 15);
        for (month, day) in [(1, 1), (3, 31), (6, 15)] {
            let born = date(2024 - MINIMUM_AGE, month, day);
            assert!(is_eligible(born, reference), "born {born} should be eligible");
        }
    }

    #[test]
    fn test_not_eligible_day_before_anniversary() {
        let born = date(2006, 6, 15);
        assert!(!is_eligible(born, date(2024, 6, 14)));
        assert!(is_eligible(born, date(2024, 6, 15)));
    }

    #[test]
    fn test_anniversary_across_year_boundary() {
        let born = date(2005, 12, 31);
        assert!(!is_eligible(born, date(2023, 12, 30)));
        assert!(is_eligible(born, date(2023, 12, 31)));
        assert!(is_eligible(born, date(2024, 1, 1)));
    }
}
