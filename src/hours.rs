//! Business-hours evaluation.
//!
//! Stores, branches and professionals carry a set of opening weekdays plus an
//! optional opening and closing time. An entity is open when the local weekday
//! is in the set and the local time lies inside `[opening, closing]`, both
//! ends inclusive. A missing bound or an empty weekday set means closed. A
//! window whose closing time precedes its opening time never matches, so
//! overnight schedules are reported as closed.

use chrono::{Datelike, FixedOffset, NaiveDateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

pub const STATUS_OPEN: &str = "Abierto";
pub const STATUS_CLOSED: &str = "Cerrado";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown weekday code '{0}'")]
pub struct ParseDayError(pub String);

/// Weekday abbreviation as stored and exchanged over the API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum DayCode {
    Lun,
    Mar,
    Mie,
    Jue,
    Vie,
    Sab,
    Dom,
}

impl DayCode {
    pub const ALL: [DayCode; 7] = [
        DayCode::Lun,
        DayCode::Mar,
        DayCode::Mie,
        DayCode::Jue,
        DayCode::Vie,
        DayCode::Sab,
        DayCode::Dom,
    ];

    pub fn code(self) -> &'static str {
        match self {
            DayCode::Lun => "LUN",
            DayCode::Mar => "MAR",
            DayCode::Mie => "MIE",
            DayCode::Jue => "JUE",
            DayCode::Vie => "VIE",
            DayCode::Sab => "SAB",
            DayCode::Dom => "DOM",
        }
    }

    pub fn from_weekday(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayCode::Lun,
            Weekday::Tue => DayCode::Mar,
            Weekday::Wed => DayCode::Mie,
            Weekday::Thu => DayCode::Jue,
            Weekday::Fri => DayCode::Vie,
            Weekday::Sat => DayCode::Sab,
            Weekday::Sun => DayCode::Dom,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for DayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DayCode {
    type Err = ParseDayError;

    /// Accepts the Spanish codes and the English three-letter abbreviations,
    /// in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LUN" | "MON" => Ok(DayCode::Lun),
            "MAR" | "TUE" => Ok(DayCode::Mar),
            "MIE" | "WED" => Ok(DayCode::Mie),
            "JUE" | "THU" => Ok(DayCode::Jue),
            "VIE" | "FRI" => Ok(DayCode::Vie),
            "SAB" | "SAT" => Ok(DayCode::Sab),
            "DOM" | "SUN" => Ok(DayCode::Dom),
            _ => Err(ParseDayError(s.to_string())),
        }
    }
}

impl TryFrom<String> for DayCode {
    type Error = ParseDayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Set of opening weekdays. Iterates Monday first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<DayCode>", from = "Vec<DayCode>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub fn empty() -> Self {
        Self(0)
    }

    /// Parses the comma-separated storage form. Empty segments are skipped.
    pub fn parse(raw: &str) -> Result<Self, ParseDayError> {
        raw.split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(DayCode::from_str)
            .collect()
    }

    /// Parses a stored value, dropping codes that do not parse.
    pub fn from_stored(raw: &str) -> Self {
        raw.split(',')
            .filter_map(|segment| segment.parse::<DayCode>().ok())
            .collect()
    }

    pub fn insert(&mut self, day: DayCode) {
        self.0 |= day.bit();
    }

    pub fn contains(&self, day: DayCode) -> bool {
        self.0 & day.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = DayCode> + '_ {
        DayCode::ALL.into_iter().filter(move |day| self.contains(*day))
    }

    /// Comma-separated storage form, e.g. `LUN,MAR,MIE`.
    pub fn to_db_string(&self) -> String {
        self.iter().map(DayCode::code).collect::<Vec<_>>().join(",")
    }
}

impl FromIterator<DayCode> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = DayCode>>(iter: I) -> Self {
        let mut set = WeekdaySet::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl From<Vec<DayCode>> for WeekdaySet {
    fn from(days: Vec<DayCode>) -> Self {
        days.into_iter().collect()
    }
}

impl From<WeekdaySet> for Vec<DayCode> {
    fn from(set: WeekdaySet) -> Self {
        set.iter().collect()
    }
}

/// Result of evaluating opening hours at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStatus {
    Open,
    Closed,
}

impl OpenStatus {
    pub fn is_open(self) -> bool {
        matches!(self, OpenStatus::Open)
    }

    pub fn label(self) -> &'static str {
        match self {
            OpenStatus::Open => STATUS_OPEN,
            OpenStatus::Closed => STATUS_CLOSED,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpeningHours {
    pub days: WeekdaySet,
    pub opening: Option<NaiveTime>,
    pub closing: Option<NaiveTime>,
}

impl OpeningHours {
    pub fn new(days: WeekdaySet, opening: Option<NaiveTime>, closing: Option<NaiveTime>) -> Self {
        Self {
            days,
            opening,
            closing,
        }
    }

    pub fn is_open_at(&self, now: NaiveDateTime) -> bool {
        let (Some(opening), Some(closing)) = (self.opening, self.closing) else {
            return false;
        };
        if !self.days.contains(DayCode::from_weekday(now.weekday())) {
            return false;
        }
        let time = now.time();
        opening <= time && time <= closing
    }

    pub fn status_at(&self, now: NaiveDateTime) -> OpenStatus {
        if self.is_open_at(now) {
            OpenStatus::Open
        } else {
            OpenStatus::Closed
        }
    }
}

/// Current wall-clock time at the given offset from UTC.
pub fn local_now(offset: FixedOffset) -> NaiveDateTime {
    Utc::now().with_timezone(&offset).naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn mon_to_sat() -> OpeningHours {
        OpeningHours::new(
            WeekdaySet::parse("LUN,MAR,MIE,JUE,VIE,SAB").unwrap(),
            Some(time(8, 0)),
            Some(time(18, 0)),
        )
    }

    #[rstest]
    #[case("LUN", DayCode::Lun)]
    #[case("mon", DayCode::Lun)]
    #[case("Mie", DayCode::Mie)]
    #[case("WED", DayCode::Mie)]
    #[case(" sab ", DayCode::Sab)]
    #[case("SUN", DayCode::Dom)]
    fn day_codes_parse(#[case] raw: &str, #[case] expected: DayCode) {
        assert_eq!(raw.parse::<DayCode>().unwrap(), expected);
    }

    #[rstest]
    #[case("LUNES")]
    #[case("")]
    #[case("XYZ")]
    fn unknown_day_codes_fail(#[case] raw: &str) {
        assert!(raw.parse::<DayCode>().is_err());
    }

    #[test]
    fn weekday_set_round_trips_storage_form() {
        let set = WeekdaySet::parse("SAB, lun,,MIE").unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.to_db_string(), "LUN,MIE,SAB");
        assert_eq!(WeekdaySet::from_stored("LUN,???,SAB").to_db_string(), "LUN,SAB");
        assert!(WeekdaySet::parse("").unwrap().is_empty());
    }

    #[test]
    fn weekday_set_serializes_as_code_list() {
        let set = WeekdaySet::parse("DOM,LUN").unwrap();
        assert_eq!(serde_json::to_value(set).unwrap(), serde_json::json!(["LUN", "DOM"]));
        let back: WeekdaySet = serde_json::from_value(serde_json::json!(["sun", "MON"])).unwrap();
        assert_eq!(back, set);
    }

    // 2024-06-10 is a Monday, 2024-06-11 a Tuesday, 2024-06-16 a Sunday.
    #[rstest]
    #[case(at(2024, 6, 11, 10, 0), OpenStatus::Open)]
    #[case(at(2024, 6, 11, 19, 0), OpenStatus::Closed)]
    #[case(at(2024, 6, 10, 9, 0), OpenStatus::Open)]
    #[case(at(2024, 6, 10, 8, 0), OpenStatus::Open)]
    #[case(at(2024, 6, 10, 18, 0), OpenStatus::Open)]
    #[case(at(2024, 6, 10, 7, 59), OpenStatus::Closed)]
    #[case(at(2024, 6, 10, 18, 1), OpenStatus::Closed)]
    #[case(at(2024, 6, 15, 12, 0), OpenStatus::Open)]
    #[case(at(2024, 6, 16, 10, 0), OpenStatus::Closed)]
    fn monday_to_saturday_schedule(#[case] now: NaiveDateTime, #[case] expected: OpenStatus) {
        assert_eq!(mon_to_sat().status_at(now), expected);
    }

    #[test]
    fn missing_bounds_mean_closed() {
        let mut hours = mon_to_sat();
        hours.closing = None;
        assert_eq!(hours.status_at(at(2024, 6, 10, 9, 0)), OpenStatus::Closed);

        let mut hours = mon_to_sat();
        hours.opening = None;
        assert!(!hours.is_open_at(at(2024, 6, 10, 9, 0)));
    }

    #[test]
    fn empty_day_set_means_closed() {
        let hours = OpeningHours::new(WeekdaySet::empty(), Some(time(0, 0)), Some(time(23, 59)));
        assert!(!hours.is_open_at(at(2024, 6, 12, 12, 0)));
    }

    #[test]
    fn overnight_window_is_never_open() {
        let hours = OpeningHours::new(
            DayCode::ALL.into_iter().collect(),
            Some(time(22, 0)),
            Some(time(2, 0)),
        );
        assert!(!hours.is_open_at(at(2024, 6, 12, 23, 0)));
        assert!(!hours.is_open_at(at(2024, 6, 12, 1, 0)));
        assert!(!hours.is_open_at(at(2024, 6, 12, 12, 0)));
    }

    #[test]
    fn status_labels() {
        assert_eq!(OpenStatus::Open.label(), "Abierto");
        assert_eq!(OpenStatus::Closed.label(), "Cerrado");
    }

    #[test]
    fn local_now_applies_offset() {
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let utc = Utc::now().naive_utc();
        let local = local_now(offset);
        let diff = (utc - local).num_minutes();
        assert!((179..=181).contains(&diff));
    }
}
