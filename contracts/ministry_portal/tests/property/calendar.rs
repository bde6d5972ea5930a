#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Properties of the date arithmetic behind ages and the analytics window.
//!
//! Invariants tested:
//! - Age is the year difference, minus one before the birthday
//! - Age never decreases as time passes
//! - `months_before` stays on or before the original date and never produces
//!   an invalid date

use portal_common::{days_in_month, CivilDate};
use proptest::prelude::*;

fn civil_date() -> impl Strategy<Value = CivilDate> {
    (1900u32..=2100, 1u32..=12)
        .prop_flat_map(|(year, month)| {
            (Just(year), Just(month), 1u32..=days_in_month(year, month))
        })
        .prop_map(|(year, month, day)| CivilDate { year, month, day })
}

proptest! {
    #[test]
    fn prop_age_matches_birthday_rule(dob in civil_date(), today in civil_date()) {
        prop_assume!(today.sort_key() >= dob.sort_key());

        let mut expected = today.year - dob.year;
        if (today.month, today.day) < (dob.month, dob.day) {
            expected -= 1;
        }
        prop_assert_eq!(dob.age_on(&today), expected);
    }

    #[test]
    fn prop_age_is_monotonic(dob in civil_date(), a in civil_date(), b in civil_date()) {
        let (earlier, later) = if a.sort_key() <= b.sort_key() { (a, b) } else { (b, a) };
        prop_assert!(dob.age_on(&earlier) <= dob.age_on(&later));
    }

    #[test]
    fn prop_months_before_stays_valid(today in civil_date(), months in 0u32..=24) {
        let since = today.months_before(months);
        prop_assert!(since.is_valid());
        prop_assert!(today.is_on_or_after(&since));
        prop_assert!(since.day <= today.day);
    }

    #[test]
    fn prop_first_of_month_bounds_the_month(today in civil_date()) {
        let start = today.first_of_month();
        prop_assert_eq!(start.day, 1);
        prop_assert_eq!(start.month_key(), today.month_key());
        prop_assert!(today.is_on_or_after(&start));
    }
}
