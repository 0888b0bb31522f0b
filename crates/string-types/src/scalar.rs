//! Scalar codec: atomic values ↔ text.
//!
//! Every converter here maps `Value::Null` to `Value::Null` in both
//! directions, trims surrounding whitespace before parsing, and reports
//! unparseable text as `InvalidValue`.

use chrono::{NaiveDate, NaiveTime};
use convert_core::{
    Context, ConvertError, Converter, DateTimeValue, FileValue, Result, SchemaType, TimeValue,
    UtcOffset, Value,
};
use rust_decimal::Decimal;
use std::io::Read;
use std::str::FromStr;

/// Default name of files created from text.
pub const DEFAULT_FILENAME: &str = "content.txt";

/// Default media type of files created from text.
pub const DEFAULT_MIMETYPE: &str = "text/plain";

/// Borrow the text of an external representation.
pub(crate) fn expect_text(value: &Value) -> Result<&str> {
    value.as_str().ok_or(ConvertError::UnexpectedValue {
        expected: "string",
        found: value.kind(),
    })
}

fn unexpected(expected: &'static str, value: &Value) -> ConvertError {
    ConvertError::UnexpectedValue {
        expected,
        found: value.kind(),
    }
}

fn parse_number<T: FromStr>(text: &str, type_string: &str) -> Result<T> {
    text.trim()
        .parse::<T>()
        .map_err(|_| ConvertError::invalid(format!("Not a valid {type_string}")))
}

/// Integer ↔ decimal digits.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerToStringConverter;

impl Converter for IntegerToStringConverter {
    fn from_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Integer(i) => Ok(Value::String(i.to_string())),
            other => Err(unexpected("integer", other)),
        }
    }

    fn to_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        parse_number::<i64>(expect_text(value)?, "integer").map(Value::Integer)
    }
}

/// Canonical text for a float: shortest round-tripping digits, with `.0`
/// kept on integral values so the text still reads as a float.
pub fn format_float(f: f64) -> String {
    let text = f.to_string();
    if f.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

/// Float ↔ decimal text.
#[derive(Debug, Default, Clone, Copy)]
pub struct FloatToStringConverter;

impl Converter for FloatToStringConverter {
    fn from_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Float(f) => Ok(Value::String(format_float(*f))),
            Value::Integer(i) => Ok(Value::String(format_float(*i as f64))),
            other => Err(unexpected("float", other)),
        }
    }

    fn to_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        parse_number::<f64>(expect_text(value)?, "number").map(Value::Float)
    }
}

/// Parse exact decimal text, accepting plain and scientific notation.
///
/// Values beyond the 96-bit mantissa or 28 fractional digits fail rather
/// than round.
pub fn parse_decimal(text: &str) -> Result<Decimal> {
    let text = text.trim();
    let parsed = if text.contains(['e', 'E']) {
        Decimal::from_scientific(text)
    } else {
        Decimal::from_str_exact(text)
    };
    parsed.map_err(|_| ConvertError::invalid("Not a valid decimal"))
}

/// Arbitrary-precision decimal ↔ decimal text; the scale is preserved.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecimalToStringConverter;

impl Converter for DecimalToStringConverter {
    fn from_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Decimal(d) => Ok(Value::String(d.to_string())),
            Value::Integer(i) => Ok(Value::String(i.to_string())),
            other => Err(unexpected("decimal", other)),
        }
    }

    fn to_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        parse_decimal(expect_text(value)?).map(Value::Decimal)
    }
}

/// Boolean ↔ the literals `True` / `False`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanToStringConverter;

impl Converter for BooleanToStringConverter {
    fn from_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Boolean(true) => Ok(Value::string("True")),
            Value::Boolean(false) => Ok(Value::string("False")),
            other => Err(unexpected("boolean", other)),
        }
    }

    fn to_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match expect_text(value)?.trim() {
            "True" => Ok(Value::Boolean(true)),
            "False" => Ok(Value::Boolean(false)),
            other => Err(ConvertError::invalid(format!(
                "{other:?} should be either True or False"
            ))),
        }
    }
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse `Y-M-D` into a calendar date.
///
/// Fails with `Invalid date` unless there are exactly three integer parts,
/// and with `Invalid date: …` when they do not form a date in years 1..=9999.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let parts = text
        .split('-')
        .map(|p| p.trim().parse::<i32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| ConvertError::invalid("Invalid date"))?;

    let [year, month, day] = parts[..] else {
        return Err(ConvertError::invalid("Invalid date"));
    };
    date_from_parts(year, month, day)
}

/// Build a date from numeric parts, with a reason on failure.
pub fn date_from_parts(year: i32, month: i32, day: i32) -> Result<NaiveDate> {
    if !(1..=9999).contains(&year) {
        return Err(ConvertError::invalid(format!(
            "Invalid date: year {year} is out of range"
        )));
    }
    if !(1..=12).contains(&month) {
        return Err(ConvertError::invalid("Invalid date: month must be in 1..12"));
    }
    if day < 1 {
        return Err(ConvertError::invalid(
            "Invalid date: day is out of range for month",
        ));
    }
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .ok_or_else(|| ConvertError::invalid("Invalid date: day is out of range for month"))
}

/// Calendar date ↔ `YYYY-MM-DD`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateToStringConverter;

impl Converter for DateToStringConverter {
    fn from_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Date(d) => Ok(Value::String(format_date(d))),
            other => Err(unexpected("date", other)),
        }
    }

    fn to_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        parse_date(expect_text(value)?.trim()).map(Value::Date)
    }
}

/// Format a time as `HH:MM:SS[.ffffff][±HH:MM]`.
///
/// The fraction only appears for a non-zero microsecond.
pub fn format_time(time: &TimeValue) -> String {
    let mut out = time.time.format("%H:%M:%S").to_string();
    let micro = time.microsecond();
    if micro != 0 {
        out.push_str(&format!(".{micro:06}"));
    }
    if let Some(offset) = time.offset {
        out.push_str(&offset.to_string());
    }
    out
}

fn invalid_time() -> ConvertError {
    ConvertError::invalid("Invalid time")
}

fn parse_offset(sign: i32, text: &str) -> Result<UtcOffset> {
    let (hours, minutes) = text.split_once(':').ok_or_else(invalid_time)?;
    let hours: i32 = hours.trim().parse().map_err(|_| invalid_time())?;
    let minutes: i32 = minutes.trim().parse().map_err(|_| invalid_time())?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(ConvertError::invalid("Invalid time: UTC offset out of range"));
    }
    UtcOffset::from_minutes(sign * (hours * 60 + minutes))
        .ok_or_else(|| ConvertError::invalid("Invalid time: UTC offset out of range"))
}

fn parse_micros(text: &str) -> Result<u32> {
    if text.is_empty() || text.len() > 6 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_time());
    }
    // digits after the point are a decimal fraction of a second, so ".5" is
    // 500000 microseconds, not 5
    let padded = format!("{text:0<6}");
    padded.parse().map_err(|_| invalid_time())
}

/// Parse `HH:MM[:SS][.ffffff][±HH:MM]`.
///
/// The zone offset is split off at the last `+` or `-`, then the fraction at
/// `.`, then hours, minutes and optional seconds at `:`.
pub fn parse_time(text: &str) -> Result<TimeValue> {
    let (rest, offset) = match text.rfind(['+', '-']) {
        Some(pos) => {
            let sign = if text[pos..].starts_with('-') { -1 } else { 1 };
            (&text[..pos], Some(parse_offset(sign, &text[pos + 1..])?))
        }
        None => (text, None),
    };

    let (rest, micro) = match rest.split_once('.') {
        Some((hms, fraction)) => (hms, parse_micros(fraction.trim())?),
        None => (rest, 0),
    };

    let parts = rest
        .split(':')
        .map(|p| p.trim().parse::<u32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| invalid_time())?;
    let (hour, minute, second) = match parts[..] {
        [h, m] => (h, m, 0),
        [h, m, s] => (h, m, s),
        _ => return Err(invalid_time()),
    };

    if hour > 23 {
        return Err(ConvertError::invalid("Invalid time: hour must be in 0..23"));
    }
    if minute > 59 {
        return Err(ConvertError::invalid("Invalid time: minute must be in 0..59"));
    }
    if second > 59 {
        return Err(ConvertError::invalid("Invalid time: second must be in 0..59"));
    }
    let time = NaiveTime::from_hms_micro_opt(hour, minute, second, micro).ok_or_else(invalid_time)?;
    Ok(TimeValue { time, offset })
}

/// Time of day ↔ `HH:MM:SS[.ffffff][±HH:MM]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeToStringConverter;

impl Converter for TimeToStringConverter {
    fn from_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Time(t) => Ok(Value::String(format_time(t))),
            other => Err(unexpected("time", other)),
        }
    }

    fn to_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        parse_time(expect_text(value)?.trim()).map(Value::Time)
    }
}

/// Format a datetime as `<date>T<time>`.
pub fn format_datetime(dt: &DateTimeValue) -> String {
    format!("{}T{}", format_date(&dt.date()), format_time(&dt.time()))
}

/// Parse `<date>T<time>`, each half parsed as for Date and Time.
pub fn parse_datetime(text: &str) -> Result<DateTimeValue> {
    let mut halves = text.split('T');
    let (Some(date), Some(time), None) = (halves.next(), halves.next(), halves.next()) else {
        return Err(ConvertError::invalid("Invalid datetime"));
    };
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    Ok(DateTimeValue::from_parts(date, time))
}

/// Date and time ↔ ISO `<date>T<time>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeToStringConverter;

impl Converter for DateTimeToStringConverter {
    fn from_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::DateTime(dt) => Ok(Value::String(format_datetime(dt))),
            other => Err(unexpected("date_time", other)),
        }
    }

    fn to_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        parse_datetime(expect_text(value)?.trim()).map(Value::DateTime)
    }
}

/// Text file ↔ its UTF-8 content.
///
/// Text converts back into a new in-memory file named `content.txt` of type
/// `text/plain`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileToStringConverter;

impl Converter for FileToStringConverter {
    fn from_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        let file = match value {
            Value::Null => return Ok(Value::Null),
            Value::File(file) => file,
            other => return Err(unexpected("file", other)),
        };
        let mut reader = file.reader().ok_or(ConvertError::MissingSource)?;
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| ConvertError::invalid(format!("Failed to read file content: {e}")))?;
        String::from_utf8(bytes)
            .map(Value::String)
            .map_err(|_| ConvertError::invalid("File content is not valid UTF-8"))
    }

    fn to_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let text = expect_text(value)?.trim();
        Ok(Value::File(FileValue::new(
            text.as_bytes(),
            DEFAULT_FILENAME,
            DEFAULT_MIMETYPE,
        )))
    }
}
