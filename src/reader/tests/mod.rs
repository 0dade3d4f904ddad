#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use crate::{
    command::Locale,
    reader::{
        ArgumentReader, EnumReader, IntReader, LongReader, ReaderError, ReaderRegistry,
        StringReader, Value, ValueType,
    },
};

const NUMBER: ValueType = ValueType::new("number");
const COUNT: ValueType = ValueType::with_supertypes("count", &[NUMBER]);
const SMALL_COUNT: ValueType = ValueType::with_supertypes("small_count", &[COUNT]);
const COLOR: ValueType = ValueType::new("color");

fn locale() -> Locale {
    Locale::default()
}

mod value_types {
    use super::*;

    #[test]
    fn subtype_relation_is_reflexive_and_transitive() {
        assert!(NUMBER.is_subtype_of(&NUMBER));
        assert!(COUNT.is_subtype_of(&NUMBER));
        assert!(SMALL_COUNT.is_subtype_of(&NUMBER));
        assert!(!NUMBER.is_subtype_of(&COUNT));
        assert!(!COLOR.is_subtype_of(&NUMBER));
    }

    #[test]
    fn identity_is_the_name() {
        assert_eq!(ValueType::new("long"), ValueType::LONG);
        assert_eq!(ValueType::LONG.to_string(), "long");
    }

    #[test]
    fn integral_values_widen() {
        assert_eq!(Value::Byte(-3).as_i64(), Some(-3));
        assert_eq!(Value::Int(7).as_f64(), Some(7.0));
        assert_eq!(Value::String("x".into()).as_i64(), None);
        assert_eq!(Value::Enum("RED".into()).as_str(), Some("RED"));
    }

    #[test]
    fn custom_values_downcast() {
        let value = Value::Custom(Arc::new(42u8));
        assert_eq!(value.downcast_ref::<u8>(), Some(&42));
        assert_eq!(value.downcast_ref::<u16>(), None);
    }
}

mod builtin_readers {
    use super::*;

    #[test]
    fn reads_integers() {
        let registry = ReaderRegistry::with_defaults();

        assert_eq!(
            registry.read(&ValueType::BYTE, "-128", &locale()).unwrap(),
            Value::Byte(-128)
        );
        assert_eq!(
            registry.read(&ValueType::SHORT, "300", &locale()).unwrap(),
            Value::Short(300)
        );
        assert_eq!(
            registry.read(&ValueType::LONG, "5", &locale()).unwrap(),
            Value::Long(5)
        );
    }

    #[test]
    fn rejects_out_of_range_byte() {
        let registry = ReaderRegistry::with_defaults();

        let error = registry.read(&ValueType::BYTE, "200", &locale()).unwrap_err();
        assert_eq!(error.input, "200");
        assert_eq!(error.to_string(), "Could not parse 200 to byte!");
    }

    #[test]
    fn long_error_carries_template_and_token() {
        let error = LongReader.read("five", &locale()).unwrap_err();

        assert_eq!(error.template, "Could not parse {input} to long!");
        assert_eq!(error.input, "five");
        assert_eq!(error.render("{input} ist keine Zahl"), "five ist keine Zahl");
    }

    #[test]
    fn decimal_comma_follows_locale() {
        let registry = ReaderRegistry::with_defaults();

        assert_eq!(
            registry
                .read(&ValueType::DOUBLE, "2,5", &Locale::new("de_DE"))
                .unwrap(),
            Value::Double(2.5)
        );
        assert!(registry.read(&ValueType::DOUBLE, "2,5", &locale()).is_err());
        assert_eq!(
            registry.read(&ValueType::FLOAT, "0.5", &locale()).unwrap(),
            Value::Float(0.5)
        );
    }

    #[test]
    fn strings_pass_through() {
        let value = StringReader.read("Hello There", &locale()).unwrap();
        assert_eq!(value, Value::String("Hello There".to_string()));
    }
}

mod enum_reader {
    use super::*;

    fn colors() -> EnumReader {
        EnumReader::new("Color", &["red", "dark_blue"])
    }

    #[test]
    fn matches_ignoring_case_and_spaces() {
        let reader = colors();

        assert_eq!(
            reader.read("Dark Blue", &locale()).unwrap(),
            Value::Enum("DARK_BLUE".to_string())
        );
        assert_eq!(
            reader.read("RED", &locale()).unwrap(),
            Value::Enum("RED".to_string())
        );
    }

    #[test]
    fn unknown_constant_names_the_enumeration() {
        let error = colors().read("green", &locale()).unwrap_err();
        assert_eq!(error, ReaderError::new("Could not find {input} in Color!", "green"));
    }

    #[test]
    fn suggests_lowercase_constants() {
        assert_eq!(colors().suggestions(), vec!["red", "dark_blue"]);
    }
}

mod registry {
    use super::*;

    #[test]
    fn resolves_exact_type_first() {
        let registry = ReaderRegistry::new();
        registry.register(LongReader, &[NUMBER]);
        registry.register(IntReader, &[COUNT]);

        let value = registry.read(&COUNT, "3", &locale()).unwrap();
        assert_eq!(value, Value::Int(3));
    }

    #[test]
    fn subtype_resolution_is_memoized_once() {
        let registry = ReaderRegistry::new();
        registry.register(LongReader, &[NUMBER]);

        assert!(registry.get(&SMALL_COUNT).is_none());

        let first = registry.resolve(&SMALL_COUNT).unwrap();
        let cached = registry.get(&SMALL_COUNT).unwrap();
        assert!(Arc::ptr_eq(&first, &cached));

        assert!(registry.has_reader(&SMALL_COUNT));
        let again = registry.resolve(&SMALL_COUNT).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert!(Arc::ptr_eq(&first, &registry.get(&NUMBER).unwrap()));
    }

    #[test]
    fn unrelated_type_has_no_reader() {
        let registry = ReaderRegistry::with_defaults();

        assert!(!registry.has_reader(&COLOR));
        let error = registry.read(&COLOR, "red", &locale()).unwrap_err();
        assert_eq!(error.to_string(), "No reader found for color!");
    }

    #[test]
    fn removing_reader_drops_all_its_entries() {
        let registry = ReaderRegistry::new();
        registry.register(LongReader, &[NUMBER, ValueType::LONG]);
        registry.register(StringReader, &[ValueType::STRING]);
        assert!(registry.has_reader(&COUNT));

        registry.remove_reader::<LongReader>();

        assert!(registry.get(&NUMBER).is_none());
        assert!(registry.get(&ValueType::LONG).is_none());
        assert!(registry.get(&COUNT).is_none());
        assert!(registry.get_by_reader::<LongReader>().is_none());
        assert!(registry.has_reader(&ValueType::STRING));
    }

    #[test]
    fn removing_type_keeps_reader_identity() {
        let registry = ReaderRegistry::new();
        registry.register(LongReader, &[NUMBER, ValueType::LONG]);

        registry.remove_type(&NUMBER);

        assert!(registry.get(&NUMBER).is_none());
        assert!(registry.get(&ValueType::LONG).is_some());
        assert!(registry.get_by_reader::<LongReader>().is_some());
    }

    #[test]
    fn suggestions_come_from_resolved_reader() {
        let registry = ReaderRegistry::with_defaults();
        registry.register(EnumReader::new("Color", &["red", "blue"]), &[COLOR]);

        assert_eq!(registry.suggestions(&COLOR), vec!["red", "blue"]);
        assert!(registry.suggestions(&ValueType::LONG).is_empty());
        assert!(registry.suggestions(&NUMBER).is_empty());
    }

    #[test]
    fn shared_across_threads() {
        let registry = Arc::new(ReaderRegistry::new());
        registry.register(LongReader, &[NUMBER]);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.has_reader(&SMALL_COUNT))
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert!(registry.get(&SMALL_COUNT).is_some());
    }
}
