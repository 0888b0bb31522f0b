//! Date and time ↔ tagged maps.
//!
//! ```text
//! 2008-06-07  ↔  {type: "date", year: 2008, month: 6, day: 7}
//! 11:12:13    ↔  {type: "time", hour: 11, minute: 12, second: 13, microsecond: 0}
//! ```
//!
//! The `type` tag is written but not checked on the way back.

use chrono::{Datelike, NaiveTime, Timelike};
use convert_core::{Context, ConvertError, Converter, Result, SchemaType, TimeValue, Value};
use std::collections::BTreeMap;
use string_types::date_from_parts;

/// Key holding the kind tag of a tagged map.
pub const TYPE_KEY: &str = "type";

/// Read one integer part: an integer, an integral float or numeric text.
pub(crate) fn int_part(value: &Value) -> Result<i64> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(*f as i64),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| ConvertError::invalid("Invalid Number")),
        _ => Err(ConvertError::invalid("Invalid Number")),
    }
}

/// Build a date from integer parts, with the reason on failure.
pub(crate) fn date_from_ints(year: i64, month: i64, day: i64) -> Result<Value> {
    let year = i32::try_from(year).map_err(|_| {
        ConvertError::invalid(format!("Invalid date: year {year} is out of range"))
    })?;
    // out-of-range months and days fail the range checks as 0
    let month = i32::try_from(month).unwrap_or(0);
    let day = i32::try_from(day).unwrap_or(0);
    date_from_parts(year, month, day).map(Value::Date)
}

fn tagged_map<'v>(value: &'v Value, kind: &str) -> Result<&'v BTreeMap<String, Value>> {
    value.as_map().ok_or_else(|| {
        ConvertError::invalid(format!("Invalid {kind}: expected a map, found {}", value.kind()))
    })
}

fn required<'v>(map: &'v BTreeMap<String, Value>, key: &str, kind: &str) -> Result<&'v Value> {
    map.get(key)
        .ok_or_else(|| ConvertError::invalid(format!("Invalid {kind}: missing '{key}'")))
}

/// Date ↔ `{type: "date", year, month, day}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateToTaggedMapConverter;

impl Converter for DateToTaggedMapConverter {
    fn from_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Date(d) => Ok(Value::map([
                (TYPE_KEY, Value::string("date")),
                ("year", Value::Integer(d.year().into())),
                ("month", Value::Integer(d.month().into())),
                ("day", Value::Integer(d.day().into())),
            ])),
            other => Err(ConvertError::UnexpectedValue {
                expected: "date",
                found: other.kind(),
            }),
        }
    }

    fn to_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let map = tagged_map(value, "date")?;
        let year = int_part(required(map, "year", "date")?)?;
        let month = int_part(required(map, "month", "date")?)?;
        let day = int_part(required(map, "day", "date")?)?;
        date_from_ints(year, month, day)
    }
}

fn time_part(value: i64, max: i64, name: &str) -> Result<u32> {
    if !(0..=max).contains(&value) {
        return Err(ConvertError::invalid(format!(
            "Invalid time: {name} must be in 0..{max}"
        )));
    }
    u32::try_from(value).map_err(|_| ConvertError::invalid("Invalid time"))
}

/// Time ↔ `{type: "time", hour, minute, second, microsecond}`.
///
/// The UTC offset is not represented; `microsecond` defaults to 0 when read
/// back.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeToTaggedMapConverter;

impl Converter for TimeToTaggedMapConverter {
    fn from_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Time(t) => Ok(Value::map([
                (TYPE_KEY, Value::string("time")),
                ("hour", Value::Integer(t.time.hour().into())),
                ("minute", Value::Integer(t.time.minute().into())),
                ("second", Value::Integer(t.time.second().into())),
                ("microsecond", Value::Integer(t.microsecond().into())),
            ])),
            other => Err(ConvertError::UnexpectedValue {
                expected: "time",
                found: other.kind(),
            }),
        }
    }

    fn to_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let map = tagged_map(value, "time")?;
        let hour = int_part(required(map, "hour", "time")?)?;
        let minute = int_part(required(map, "minute", "time")?)?;
        let second = int_part(required(map, "second", "time")?)?;
        let micro = map.get("microsecond").map(int_part).transpose()?.unwrap_or(0);

        let time = NaiveTime::from_hms_micro_opt(
            time_part(hour, 23, "hour")?,
            time_part(minute, 59, "minute")?,
            time_part(second, 59, "second")?,
            time_part(micro, 999_999, "microsecond")?,
        )
        .ok_or_else(|| ConvertError::invalid("Invalid time"))?;
        Ok(Value::Time(TimeValue::new(time)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use convert_core::testing::DispatchDelegate;
    use convert_core::UtcOffset;

    fn lookup(schema: &SchemaType) -> Option<&'static dyn Converter> {
        match schema {
            SchemaType::Date => Some(&DateToTaggedMapConverter),
            SchemaType::Time => Some(&TimeToTaggedMapConverter),
            _ => None,
        }
    }

    fn delegate() -> DispatchDelegate {
        DispatchDelegate::new(lookup)
    }

    fn date_map(year: Value, month: Value, day: Value) -> Value {
        Value::map([("year", year), ("month", month), ("day", day)])
    }

    #[test]
    fn test_date_roundtrip() {
        let delegate = delegate();
        let date = Value::Date(NaiveDate::from_ymd_opt(2008, 6, 7).unwrap());
        let map = delegate.from_type(&SchemaType::Date, &date).unwrap();
        assert_eq!(
            map,
            Value::map([
                ("type", Value::string("date")),
                ("year", Value::Integer(2008)),
                ("month", Value::Integer(6)),
                ("day", Value::Integer(7)),
            ])
        );
        assert_eq!(delegate.to_type(&SchemaType::Date, &map).unwrap(), date);
    }

    #[test]
    fn test_date_accepts_numeric_text() {
        let delegate = delegate();
        let map = date_map(Value::string("2008"), Value::string(" 6"), Value::Integer(7));
        assert_eq!(
            delegate.to_type(&SchemaType::Date, &map).unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2008, 6, 7).unwrap())
        );
    }

    #[test]
    fn test_date_errors() {
        let delegate = delegate();
        let bad_number = date_map(Value::string("two"), Value::Integer(1), Value::Integer(1));
        assert_eq!(
            delegate.to_type(&SchemaType::Date, &bad_number).unwrap_err(),
            ConvertError::invalid("Invalid Number")
        );

        let bad_day = date_map(Value::Integer(2023), Value::Integer(2), Value::Integer(30));
        assert_eq!(
            delegate.to_type(&SchemaType::Date, &bad_day).unwrap_err(),
            ConvertError::invalid("Invalid date: day is out of range for month")
        );

        let missing = Value::map([("year", Value::Integer(2023))]);
        assert_eq!(
            delegate.to_type(&SchemaType::Date, &missing).unwrap_err(),
            ConvertError::invalid("Invalid date: missing 'month'")
        );

        let err = delegate
            .to_type(&SchemaType::Date, &Value::string("2023-01-01"))
            .unwrap_err();
        assert!(err.is_data_error());
    }

    #[test]
    fn test_time_roundtrip_drops_offset() {
        let delegate = delegate();
        let naive = NaiveTime::from_hms_micro_opt(11, 12, 13, 14).unwrap();
        let with_offset = Value::Time(TimeValue::with_offset(naive, UtcOffset::UTC));
        let map = delegate.from_type(&SchemaType::Time, &with_offset).unwrap();
        assert_eq!(
            map,
            Value::map([
                ("type", Value::string("time")),
                ("hour", Value::Integer(11)),
                ("minute", Value::Integer(12)),
                ("second", Value::Integer(13)),
                ("microsecond", Value::Integer(14)),
            ])
        );
        assert_eq!(
            delegate.to_type(&SchemaType::Time, &map).unwrap(),
            Value::Time(TimeValue::new(naive))
        );
    }

    #[test]
    fn test_time_microsecond_defaults_to_zero() {
        let delegate = delegate();
        let map = Value::map([
            ("hour", Value::Integer(1)),
            ("minute", Value::Integer(2)),
            ("second", Value::Integer(3)),
        ]);
        assert_eq!(
            delegate.to_type(&SchemaType::Time, &map).unwrap(),
            Value::Time(TimeValue::new(NaiveTime::from_hms_opt(1, 2, 3).unwrap()))
        );
    }

    #[test]
    fn test_time_errors() {
        let delegate = delegate();
        let map = Value::map([
            ("hour", Value::Integer(24)),
            ("minute", Value::Integer(0)),
            ("second", Value::Integer(0)),
        ]);
        assert_eq!(
            delegate.to_type(&SchemaType::Time, &map).unwrap_err(),
            ConvertError::invalid("Invalid time: hour must be in 0..23")
        );

        let map = Value::map([
            ("hour", Value::Boolean(true)),
            ("minute", Value::Integer(0)),
            ("second", Value::Integer(0)),
        ]);
        assert_eq!(
            delegate.to_type(&SchemaType::Time, &map).unwrap_err(),
            ConvertError::invalid("Invalid Number")
        );
    }

    #[test]
    fn test_null_passthrough() {
        let delegate = delegate();
        for schema in [SchemaType::Date, SchemaType::Time] {
            assert_eq!(delegate.from_type(&schema, &Value::Null).unwrap(), Value::Null);
            assert_eq!(delegate.to_type(&schema, &Value::Null).unwrap(), Value::Null);
        }
    }
}
