use chrono::NaiveDate;
use schema_convert::string_types::IntegerToStringConverter;
use schema_convert::{
    Context, ConvertError, Converter, Facade, FacadeConfig, Registry, RegistryKey, Result,
    SchemaType, StructuralPath, TypeTag, Value,
};
use std::sync::Arc;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter("schema_convert=debug")
        .try_init()
        .ok(); // Ignore if already initialized
}

/// Converter answering with its own name, to see which entry won.
#[derive(Debug)]
struct Marker(&'static str);

impl Converter for Marker {
    fn from_type(&self, _schema: &SchemaType, _value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        Ok(Value::string(self.0))
    }

    fn to_type(&self, _schema: &SchemaType, _value: &Value, _ctx: &Context<'_>) -> Result<Value> {
        Ok(Value::string(self.0))
    }
}

fn at(facade: &Facade, segments: [usize; 2]) -> Result<Value> {
    facade.convert_from_at(
        &SchemaType::Integer,
        &Value::Integer(5),
        &StructuralPath::from_segments(segments),
    )
}

#[test]
fn test_literal_pattern_beats_wildcards() {
    init_logging();
    let facade = Facade::builder()
        .path_converter("*.*", Marker("*.*"))
        .path_converter("0.*", Marker("0.*"))
        .path_converter("*.1", Marker("*.1"))
        .path_converter("0.1", Marker("0.1"))
        .build()
        .unwrap();

    let cases = [
        ([0, 1], "0.1"),
        ([0, 2], "0.*"),
        ([1, 1], "*.1"),
        ([1, 2], "*.*"),
    ];
    for (segments, expected) in cases {
        assert_eq!(
            at(&facade, segments).unwrap(),
            Value::string(expected),
            "Failed for path {segments:?}"
        );
    }
}

#[test]
fn test_unmatched_path_falls_through_to_type() {
    init_logging();
    let facade = Facade::builder()
        .path_converter("0.1", Marker("0.1"))
        .build()
        .unwrap();
    assert_eq!(at(&facade, [1, 1]).unwrap(), Value::string("5"));

    let mut registry = Registry::new();
    registry
        .register_path("0.1", Arc::new(Marker("0.1")))
        .unwrap();
    let facade = Facade::new(registry);
    assert_eq!(at(&facade, [0, 1]).unwrap(), Value::string("0.1"));
    assert_eq!(
        at(&facade, [1, 1]).unwrap_err(),
        ConvertError::NoConverterFound {
            tag: TypeTag::Integer,
            path: StructuralPath::from_segments([1usize, 1]),
        }
    );
}

#[test]
fn test_path_patterns_apply_inside_composites() {
    init_logging();
    let schema = SchemaType::sequence(SchemaType::tuple(vec![
        SchemaType::Integer,
        SchemaType::Integer,
    ]));
    let value = Value::List(vec![
        Value::Tuple(vec![Value::Integer(1), Value::Integer(2)]),
        Value::Tuple(vec![Value::Integer(3), Value::Integer(4)]),
    ]);

    // second element of every row as text, the rest native
    let facade = Facade::builder()
        .preset(schema_convert::Preset::Json)
        .path_converter("*.1", IntegerToStringConverter)
        .build()
        .unwrap();
    let converted = facade.convert_from(&schema, &value).unwrap();
    assert_eq!(
        converted,
        Value::List(vec![
            Value::List(vec![Value::Integer(1), "2".into()]),
            Value::List(vec![Value::Integer(3), "4".into()]),
        ])
    );
    assert_eq!(facade.convert_to(&schema, &converted).unwrap(), value);
}

#[test]
fn test_type_override_replaces_default() {
    init_logging();
    let facade = Facade::builder()
        .type_converter(TypeTag::Date, schema_convert::json_types::DateTripleConverter)
        .build()
        .unwrap();
    let date = Value::Date(NaiveDate::from_ymd_opt(2008, 6, 7).unwrap());
    let triple = facade.convert_from(&SchemaType::Date, &date).unwrap();
    assert_eq!(
        triple,
        Value::Tuple(vec![
            Value::Integer(2008),
            Value::Integer(6),
            Value::Integer(7)
        ])
    );
    assert_eq!(facade.convert_to(&SchemaType::Date, &triple).unwrap(), date);
}

#[test]
fn test_number_tag_covers_numeric_kinds() {
    init_logging();
    let facade = Facade::new(Registry::new().with_type(TypeTag::Number, Marker("number")));
    for schema in [SchemaType::Integer, SchemaType::Float, SchemaType::Decimal] {
        assert_eq!(
            facade.convert_from(&schema, &Value::Null).unwrap(),
            Value::string("number"),
            "Failed for {schema:?}"
        );
    }
    assert!(matches!(
        facade.convert_from(&SchemaType::Boolean, &Value::Boolean(true)),
        Err(ConvertError::NoConverterFound { .. })
    ));
}

#[test]
fn test_structure_needs_a_converter() {
    init_logging();
    let schema = SchemaType::structure([("name", SchemaType::String)]);
    let value = Value::map([("name", Value::string("Ada"))]);
    let err = Facade::string().convert_from(&schema, &value).unwrap_err();
    assert_eq!(
        err,
        ConvertError::NoConverterFound {
            tag: TypeTag::Structure,
            path: StructuralPath::root(),
        }
    );
    assert!(!err.is_data_error());
}

#[test]
fn test_facade_as_nested_converter() {
    init_logging();
    // the second element is rendered by a text facade inside a JSON one
    let facade = Facade::builder()
        .preset(schema_convert::Preset::Json)
        .path_converter("1", Facade::string())
        .build()
        .unwrap();
    let schema = SchemaType::tuple(vec![SchemaType::Date, SchemaType::Date]);
    let first = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let second = NaiveDate::from_ymd_opt(2021, 3, 4).unwrap();
    let value = Value::Tuple(vec![first.into(), second.into()]);

    let converted = facade.convert_from(&schema, &value).unwrap();
    assert_eq!(
        converted,
        Value::List(vec![
            Value::map([
                ("type", Value::string("date")),
                ("year", Value::Integer(2020)),
                ("month", Value::Integer(1)),
                ("day", Value::Integer(2)),
            ]),
            Value::string("2021-03-04"),
        ])
    );
    assert_eq!(facade.convert_to(&schema, &converted).unwrap(), value);
}

#[test]
fn test_config_built_facade() {
    init_logging();
    let yaml = r#"
preset: json
types:
  date: date_string
paths:
  "*.0": integer_string
"#;
    let facade = FacadeConfig::from_yaml_str(yaml).unwrap().build().unwrap();
    assert!(facade
        .registry()
        .contains(&RegistryKey::Path("*.0".to_string())));

    let schema = SchemaType::sequence(SchemaType::tuple(vec![
        SchemaType::Integer,
        SchemaType::Date,
    ]));
    let value = Value::List(vec![Value::Tuple(vec![
        Value::Integer(7),
        NaiveDate::from_ymd_opt(1999, 12, 31).unwrap().into(),
    ])]);
    let converted = facade.convert_from(&schema, &value).unwrap();
    assert_eq!(
        converted,
        Value::List(vec![Value::List(vec!["7".into(), "1999-12-31".into()])])
    );
    assert_eq!(facade.convert_to(&schema, &converted).unwrap(), value);
}
