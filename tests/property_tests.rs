//! Property-based tests for the hours evaluator and the part filter.
//!
//! These tests use proptest to check invariants across a wide range of
//! schedules, instants and query strings.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use proptest::prelude::*;

use repuestos_locator::{
    entities::part,
    hours::{DayCode, OpeningHours, WeekdaySet},
    queries::{
        part_filter::{dedup_by_id, like_contains},
        PartFilter, PartFilterParams,
    },
};

fn time_strategy() -> impl Strategy<Value = NaiveTime> {
    (0u32..86_400).prop_map(|secs| {
        NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).expect("secs below one day")
    })
}

/// Any instant within a four-week window, so every weekday shows up.
fn instant_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (0i64..28, time_strategy()).prop_map(|(day, time)| {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date")
            + chrono::Duration::days(day);
        date.and_time(time)
    })
}

fn weekday_set_strategy() -> impl Strategy<Value = WeekdaySet> {
    proptest::collection::vec(proptest::sample::select(DayCode::ALL.to_vec()), 0..8)
        .prop_map(|days| days.into_iter().collect())
}

fn part_row(id: i32) -> part::Model {
    part::Model {
        id,
        name: format!("Repuesto {}", id),
        name_folded: format!("repuesto {}", id),
        description: None,
        description_folded: None,
        category_id: None,
        image_url: None,
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn open_iff_day_listed_and_time_inside_window(
        days in weekday_set_strategy(),
        opening in time_strategy(),
        closing in time_strategy(),
        now in instant_strategy(),
    ) {
        let hours = OpeningHours::new(days, Some(opening), Some(closing));
        let expected = days.contains(DayCode::from_weekday(now.weekday()))
            && opening <= now.time()
            && now.time() <= closing;
        prop_assert_eq!(hours.is_open_at(now), expected);
    }

    #[test]
    fn overnight_windows_are_always_closed(
        days in weekday_set_strategy(),
        opening in time_strategy(),
        closing in time_strategy(),
        now in instant_strategy(),
    ) {
        prop_assume!(closing < opening);
        let hours = OpeningHours::new(days, Some(opening), Some(closing));
        prop_assert!(!hours.is_open_at(now));
    }

    #[test]
    fn missing_bounds_or_days_mean_closed(
        days in weekday_set_strategy(),
        opening in time_strategy(),
        closing in time_strategy(),
        now in instant_strategy(),
    ) {
        prop_assert!(!OpeningHours::new(days, None, Some(closing)).is_open_at(now));
        prop_assert!(!OpeningHours::new(days, Some(opening), None).is_open_at(now));
        prop_assert!(
            !OpeningHours::new(WeekdaySet::empty(), Some(opening), Some(closing)).is_open_at(now)
        );
    }

    #[test]
    fn weekday_storage_form_round_trips(days in weekday_set_strategy()) {
        let stored = days.to_db_string();
        prop_assert_eq!(WeekdaySet::parse(&stored).unwrap(), days);
        prop_assert_eq!(WeekdaySet::from_stored(&stored), days);
    }

    #[test]
    fn like_pattern_never_exposes_wildcards(term in ".{0,24}") {
        let pattern = like_contains(&term);
        prop_assert!(pattern.starts_with('%'));
        prop_assert!(pattern.ends_with('%'));

        let inner: Vec<char> = pattern[1..pattern.len() - 1].chars().collect();
        let mut i = 0;
        while i < inner.len() {
            if inner[i] == '\\' {
                // Every escape is followed by the character it protects.
                prop_assert!(i + 1 < inner.len());
                prop_assert!(matches!(inner[i + 1], '%' | '_' | '\\'));
                i += 2;
            } else {
                prop_assert!(inner[i] != '%' && inner[i] != '_');
                i += 1;
            }
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence_in_order(ids in proptest::collection::vec(1i32..20, 0..40)) {
        let rows = ids.iter().copied().map(part_row).collect();
        let kept: Vec<i32> = dedup_by_id(rows).into_iter().map(|p| p.id).collect();

        let mut expected = Vec::new();
        for id in ids {
            if !expected.contains(&id) {
                expected.push(id);
            }
        }
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn numeric_filters_accept_integers_only(year in -5000i32..5000, junk in "[a-z]{1,6}") {
        let parsed = PartFilter::try_from(PartFilterParams {
            anio: Some(format!(" {} ", year)),
            ..Default::default()
        })
        .unwrap();
        prop_assert_eq!(parsed.year, Some(year));
        prop_assert!(parsed.search.is_none());

        let rejected = PartFilter::try_from(PartFilterParams {
            categoria_id: Some(format!("{}{}", year, junk)),
            ..Default::default()
        });
        prop_assert!(rejected.is_err());
    }

    #[test]
    fn blank_text_parameters_are_ignored(padding in "[ \t]{0,5}") {
        let filter = PartFilter::try_from(PartFilterParams {
            search: Some(padding.clone()),
            marca: Some(padding.clone()),
            modelo: Some(padding.clone()),
            anio: Some(padding.clone()),
            categoria_id: Some(padding),
        })
        .unwrap();
        prop_assert!(filter.is_empty());
    }
}
