use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Timestamp as written into sheet cells.
pub fn stamp(dt: NaiveDateTime) -> String {
    dt.format(STAMP_FORMAT).to_string()
}

pub fn now_stamp() -> String {
    stamp(now())
}

/// Accepts our own stamps as well as the ISO variants older rows were written with.
pub fn parse_stamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(s, STAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

pub fn is_ymd(s: &str) -> bool {
    parse_date(s).is_some()
}

/// Interview slot in `YYYY-MM-DD` + `HH:MM` form.
pub fn parse_slot(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = parse_date(date)?;
    let time = NaiveTime::parse_from_str(time.trim(), TIME_FORMAT).ok()?;
    Some(date.and_time(time))
}
