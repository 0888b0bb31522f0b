use crate::tagged::{date_from_ints, int_part};
use chrono::Datelike;
use convert_core::{Context, ConvertError, Converter, Result, SchemaType, Value};

/// Date ↔ `(year, month, day)`.
///
/// Parts read back may be integers or numeric text.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTripleConverter;

impl Converter for DateTripleConverter {
    fn from_type(&self, _schema: &SchemaType, value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Date(d) => Ok(Value::Tuple(vec![
                Value::Integer(d.year().into()),
                Value::Integer(d.month().into()),
                Value::Integer(d.day().into()),
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
        let items = value.as_items().ok_or(ConvertError::UnexpectedValue {
            expected: "tuple",
            found: value.kind(),
        })?;
        let parts = items.iter().map(int_part).collect::<Result<Vec<_>>>()?;
        let [year, month, day] = parts[..] else {
            return Err(ConvertError::invalid(format!(
                "Invalid date: expected 3 parts, found {}",
                parts.len()
            )));
        };
        date_from_ints(year, month, day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use convert_core::testing::DispatchDelegate;

    fn lookup(_schema: &SchemaType) -> Option<&'static dyn Converter> {
        Some(&DateTripleConverter)
    }

    #[test]
    fn test_roundtrip() {
        let delegate = DispatchDelegate::new(lookup);
        let date = Value::Date(NaiveDate::from_ymd_opt(1966, 12, 18).unwrap());
        let triple = delegate.from_type(&SchemaType::Date, &date).unwrap();
        assert_eq!(
            triple,
            Value::Tuple(vec![
                Value::Integer(1966),
                Value::Integer(12),
                Value::Integer(18)
            ])
        );
        assert_eq!(delegate.to_type(&SchemaType::Date, &triple).unwrap(), date);
    }

    #[test]
    fn test_text_parts() {
        let delegate = DispatchDelegate::new(lookup);
        let triple = Value::List(vec![
            Value::string("1966"),
            Value::string("12"),
            Value::string("18"),
        ]);
        assert_eq!(
            delegate.to_type(&SchemaType::Date, &triple).unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(1966, 12, 18).unwrap())
        );
    }

    #[test]
    fn test_errors() {
        let delegate = DispatchDelegate::new(lookup);
        let cases = [
            (
                vec![Value::string("x"), Value::Integer(1), Value::Integer(1)],
                "Invalid Number",
            ),
            (
                vec![Value::Integer(2023), Value::Integer(13), Value::Integer(1)],
                "Invalid date: month must be in 1..12",
            ),
            (
                vec![Value::Integer(2023), Value::Integer(1)],
                "Invalid date: expected 3 parts, found 2",
            ),
        ];
        for (parts, message) in cases {
            assert_eq!(
                delegate
                    .to_type(&SchemaType::Date, &Value::Tuple(parts))
                    .unwrap_err(),
                ConvertError::invalid(message)
            );
        }
    }
}
