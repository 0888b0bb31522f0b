//! Value representations for schema-convert.
//!
//! `Value` carries both sides of a conversion: the internal typed value a
//! schema describes and the external representation a converter produces
//! (text, lists, tagged maps).

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Timelike, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;

/// Fixed offset from UTC, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtcOffset {
    minutes: i32,
}

impl UtcOffset {
    /// The zero offset.
    pub const UTC: UtcOffset = UtcOffset { minutes: 0 };

    /// Create an offset, `None` unless strictly within one day either side of UTC.
    pub fn from_minutes(minutes: i32) -> Option<Self> {
        if minutes.abs() < 24 * 60 {
            Some(Self { minutes })
        } else {
            None
        }
    }

    /// Offset in minutes; negative west of UTC.
    pub fn minutes(&self) -> i32 {
        self.minutes
    }

    /// Equivalent chrono offset.
    pub fn to_fixed_offset(&self) -> FixedOffset {
        // always in range, see from_minutes
        FixedOffset::east_opt(self.minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let total = self.minutes.abs();
        write!(f, "{sign}{:02}:{:02}", total / 60, total % 60)
    }
}

/// Time of day with an optional UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeValue {
    pub time: NaiveTime,
    pub offset: Option<UtcOffset>,
}

impl TimeValue {
    /// Create a naive time value.
    pub fn new(time: NaiveTime) -> Self {
        Self { time, offset: None }
    }

    /// Create a time value with an offset.
    pub fn with_offset(time: NaiveTime, offset: UtcOffset) -> Self {
        Self {
            time,
            offset: Some(offset),
        }
    }

    /// Microsecond part of the time.
    pub fn microsecond(&self) -> u32 {
        self.time.nanosecond() / 1_000
    }
}

/// Date and time of day with an optional UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeValue {
    pub datetime: NaiveDateTime,
    pub offset: Option<UtcOffset>,
}

impl DateTimeValue {
    /// Create a naive datetime value.
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self {
            datetime,
            offset: None,
        }
    }

    /// Join a date and a time value; the time's offset is kept.
    pub fn from_parts(date: NaiveDate, time: TimeValue) -> Self {
        Self {
            datetime: date.and_time(time.time),
            offset: time.offset,
        }
    }

    /// Date part.
    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    /// Time part, carrying the offset.
    pub fn time(&self) -> TimeValue {
        TimeValue {
            time: self.datetime.time(),
            offset: self.offset,
        }
    }
}

/// File-like value.
///
/// `content` is the readable source; a file without one cannot be rendered
/// as text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileValue {
    pub content: Option<Vec<u8>>,
    pub filename: Option<String>,
    pub mimetype: Option<String>,
}

impl FileValue {
    /// Create a file with content and metadata.
    pub fn new(
        content: impl Into<Vec<u8>>,
        filename: impl Into<String>,
        mimetype: impl Into<String>,
    ) -> Self {
        Self {
            content: Some(content.into()),
            filename: Some(filename.into()),
            mimetype: Some(mimetype.into()),
        }
    }

    /// A file with metadata only and no readable source.
    pub fn without_source() -> Self {
        Self::default()
    }

    /// Reader over the file content, if any.
    pub fn reader(&self) -> Option<Cursor<&[u8]>> {
        self.content.as_deref().map(Cursor::new)
    }
}

/// A value on either side of a conversion.
///
/// `Null` stands for an absent value and is passed through unchanged by
/// every converter.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,

    /// 64-bit signed integer
    Integer(i64),

    /// 64-bit floating point
    Float(f64),

    /// Arbitrary-precision decimal
    Decimal(Decimal),

    /// Text
    String(String),

    /// Boolean
    Boolean(bool),

    /// Calendar date
    Date(NaiveDate),

    /// Time of day
    Time(TimeValue),

    /// Date and time of day
    DateTime(DateTimeValue),

    /// File-like value
    File(FileValue),

    /// Ordered list, the value of a sequence
    List(Vec<Value>),

    /// Fixed-arity tuple
    Tuple(Vec<Value>),

    /// Named values, for structures and tagged maps
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Create a text value.
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Create a map value from `(key, value)` pairs.
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::DateTime(_) => "date_time",
            Self::File(_) => "file",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "map",
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the items of a list or tuple.
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get this value as a map.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<TimeValue> for Value {
    fn from(value: TimeValue) -> Self {
        Self::Time(value)
    }
}

impl From<DateTimeValue> for Value {
    fn from(value: DateTimeValue) -> Self {
        Self::DateTime(value)
    }
}

impl From<FileValue> for Value {
    fn from(value: FileValue) -> Self {
        Self::File(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_utc_offset_display() {
        let cases = [
            (0, "+00:00"),
            (60, "+01:00"),
            (90, "+01:30"),
            (-60, "-01:00"),
            (-90, "-01:30"),
        ];
        for (minutes, expected) in cases {
            let offset = UtcOffset::from_minutes(minutes).unwrap();
            assert_eq!(offset.to_string(), expected, "Failed for {minutes} minutes");
        }
    }

    #[test]
    fn test_utc_offset_range() {
        assert!(UtcOffset::from_minutes(23 * 60 + 59).is_some());
        assert!(UtcOffset::from_minutes(24 * 60).is_none());
        assert!(UtcOffset::from_minutes(-24 * 60).is_none());
    }

    #[test]
    fn test_utc_offset_to_fixed_offset() {
        let offset = UtcOffset::from_minutes(-90).unwrap();
        assert_eq!(offset.to_fixed_offset().local_minus_utc(), -90 * 60);
        assert_eq!(UtcOffset::UTC.to_fixed_offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_datetime_parts() {
        let date = NaiveDate::from_ymd_opt(2001, 2, 3).unwrap();
        let time = TimeValue::with_offset(
            NaiveTime::from_hms_micro_opt(4, 5, 6, 7).unwrap(),
            UtcOffset::from_minutes(90).unwrap(),
        );
        let dt = DateTimeValue::from_parts(date, time);
        assert_eq!(dt.date(), date);
        assert_eq!(dt.time(), time);
        assert_eq!(dt.time().microsecond(), 7);
    }

    #[test]
    fn test_file_reader() {
        let file = FileValue::new("foo", "a.txt", "text/plain");
        let mut out = String::new();
        file.reader().unwrap().read_to_string(&mut out).unwrap();
        assert_eq!(out, "foo");

        assert!(FileValue::without_source().reader().is_none());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::from(42i64).as_i64(), Some(42));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::Integer(2).as_f64(), Some(2.0));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(
            Value::Tuple(vec![Value::Null]).as_items(),
            Some(&[Value::Null][..])
        );
        assert_eq!(Value::Boolean(false).as_i64(), None);
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::List(vec![]).kind(), "list");
        assert_eq!(Value::map([("a", Value::Null)]).kind(), "map");
    }
}
