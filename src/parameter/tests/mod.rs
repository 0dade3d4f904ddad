#![allow(clippy::unwrap_used, clippy::panic)]

use crate::{
    command::{CommandError, Locale, RegistrationError},
    parameter::{
        ArgBounds, ArgumentMatcher, ArgumentOrigin, Flag, IndexedGroup, IndexedSlot,
        MatchOutcome, NamedParameter, ParameterSpec,
    },
    reader::{ReaderRegistry, Value, ValueType},
};

fn tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

fn run(spec: &ParameterSpec, line: &str) -> Result<MatchOutcome, CommandError> {
    let readers = ReaderRegistry::with_defaults();
    ArgumentMatcher::new(spec, &readers, &Locale::default()).run(&tokens(line))
}

fn values(outcome: &MatchOutcome) -> Vec<Value> {
    outcome
        .arguments()
        .iter()
        .filter(|argument| argument.is_indexed())
        .map(|argument| argument.value().clone())
        .collect()
}

fn give_spec() -> ParameterSpec {
    ParameterSpec::builder()
        .indexed(IndexedGroup::fixed(vec![
            IndexedSlot::new("item", ValueType::STRING),
            IndexedSlot::new("amount", ValueType::LONG),
        ]))
        .named(NamedParameter::new("to", ValueType::STRING).label("player"))
        .flag(Flag::new("f", "force"))
        .build(&ReaderRegistry::with_defaults())
        .unwrap()
}

fn say_spec() -> ParameterSpec {
    ParameterSpec::builder()
        .indexed(IndexedGroup::greedy(IndexedSlot::new("message", ValueType::STRING)))
        .flag(Flag::new("l", "loud"))
        .build(&ReaderRegistry::with_defaults())
        .unwrap()
}

mod specification {
    use super::*;

    #[test]
    fn repeat_counts() {
        let single = IndexedGroup::single(IndexedSlot::new("a", ValueType::STRING));
        let fixed = IndexedGroup::fixed(vec![
            IndexedSlot::new("a", ValueType::STRING),
            IndexedSlot::new("b", ValueType::STRING),
        ]);
        let greedy = IndexedGroup::greedy_index();

        assert_eq!(single.repeat_count(), 1);
        assert_eq!(fixed.repeat_count(), 2);
        assert_eq!(greedy.repeat_count(), -1);
        assert!(!greedy.is_required());
        assert_eq!(greedy.slots()[0].labels(), ["0"]);
    }

    #[test]
    fn empty_index_is_optional_string() {
        let group = IndexedGroup::empty_index("target");

        assert!(!group.is_required());
        assert_eq!(group.slots()[0].types(), [ValueType::STRING]);
        assert_eq!(group.slots()[0].labels(), ["target"]);
    }

    #[test]
    fn bounds_from_groups() {
        let spec = ParameterSpec::builder()
            .indexed(IndexedGroup::single(IndexedSlot::new("a", ValueType::STRING)))
            .indexed(
                IndexedGroup::fixed(vec![
                    IndexedSlot::new("b", ValueType::STRING).optional(),
                    IndexedSlot::new("c", ValueType::STRING).optional(),
                ])
                .optional(),
            )
            .build(&ReaderRegistry::with_defaults())
            .unwrap();

        let bounds = spec.bounds();
        assert_eq!(bounds, ArgBounds { min: 1, max: Some(3) });
        assert!(!bounds.contains(0));
        assert!(bounds.contains(1));
        assert!(bounds.contains(3));
        assert!(!bounds.contains(4));
    }

    #[test]
    fn greedy_group_removes_upper_bound() {
        assert_eq!(say_spec().bounds(), ArgBounds { min: 1, max: None });
    }

    #[test]
    fn unreadable_type_fails_construction() {
        const WORLD: ValueType = ValueType::new("world");

        let result = ParameterSpec::builder()
            .indexed(IndexedGroup::single(IndexedSlot::new("world", WORLD)))
            .build(&ReaderRegistry::with_defaults());

        assert_eq!(
            result.unwrap_err(),
            RegistrationError::UnreadableType {
                parameter: "world(0)".to_string(),
                value_type: WORLD,
            }
        );
    }

    #[test]
    fn unreadable_named_type_fails_construction() {
        const WORLD: ValueType = ValueType::new("world");

        let result = ParameterSpec::builder()
            .named(NamedParameter::new("in", WORLD))
            .build(&ReaderRegistry::with_defaults());

        assert!(matches!(
            result,
            Err(RegistrationError::UnreadableType { parameter, .. }) if parameter == "in"
        ));
    }

    #[test]
    fn empty_group_needs_a_label() {
        let result = ParameterSpec::builder()
            .indexed(IndexedGroup::fixed(Vec::new()))
            .build(&ReaderRegistry::with_defaults());

        assert_eq!(result.unwrap_err(), RegistrationError::MissingLabel);
    }

    #[test]
    fn flags_match_short_and_long_ignoring_case() {
        let flag = Flag::new("f", "force");

        assert!(flag.matches("-f"));
        assert!(flag.matches("-FORCE"));
        assert!(!flag.matches("force"));
        assert!(!flag.matches("-forced"));
    }

    #[test]
    fn named_parameters_match_aliases() {
        let param = NamedParameter::new("world", ValueType::STRING).alias("w");

        assert!(param.matches_name("World"));
        assert!(param.matches_name("W"));
        assert!(!param.matches_name("wo"));
    }
}

mod matching {
    use super::*;

    #[test]
    fn group_then_flag() {
        let spec = give_spec();
        let outcome = run(&spec, "stone 5 -f").unwrap();

        assert_eq!(
            values(&outcome),
            vec![Value::String("stone".to_string()), Value::Long(5)]
        );
        let flags: Vec<_> = outcome
            .arguments()
            .iter()
            .filter(|argument| matches!(argument.origin(), ArgumentOrigin::Flag(0)))
            .collect();
        assert_eq!(flags.len(), 1);
    }

    #[test]
    fn short_required_group_is_too_few() {
        let spec = give_spec();
        assert_eq!(run(&spec, "stone").unwrap_err(), CommandError::TooFewArguments);
    }

    #[test]
    fn named_parameter_before_positionals() {
        let spec = give_spec();
        let outcome = run(&spec, "to Bob stone 5").unwrap();

        let named = &outcome.arguments()[0];
        assert_eq!(named.origin(), ArgumentOrigin::Named(0));
        assert_eq!(named.value(), &Value::String("Bob".to_string()));
        assert_eq!(values(&outcome).len(), 2);
    }

    #[test]
    fn named_name_is_case_insensitive() {
        let spec = give_spec();
        let outcome = run(&spec, "stone 5 TO alice").unwrap();

        assert_eq!(outcome.arguments()[2].raw(), "alice");
    }

    #[test]
    fn named_without_value_is_a_parse_error() {
        let spec = give_spec();
        assert_eq!(
            run(&spec, "stone 5 to").unwrap_err(),
            CommandError::ArgumentParse {
                token: "to".to_string()
            }
        );
    }

    #[test]
    fn named_greed_zero_reads_its_own_name() {
        let spec = ParameterSpec::builder()
            .named(NamedParameter::new("silent", ValueType::STRING).greed(0))
            .indexed(IndexedGroup::single(IndexedSlot::new("msg", ValueType::STRING)))
            .build(&ReaderRegistry::with_defaults())
            .unwrap();

        let outcome = run(&spec, "silent hi").unwrap();
        assert_eq!(outcome.arguments()[0].origin(), ArgumentOrigin::Named(0));
        assert_eq!(outcome.arguments()[0].raw(), "silent");
        assert_eq!(outcome.arguments()[1].raw(), "hi");
    }

    #[test]
    fn named_greed_two_joins_values() {
        let spec = ParameterSpec::builder()
            .named(NamedParameter::new("reason", ValueType::STRING).greed(2))
            .build(&ReaderRegistry::with_defaults())
            .unwrap();

        let outcome = run(&spec, "reason too loud").unwrap();
        assert_eq!(outcome.arguments().len(), 1);
        assert_eq!(outcome.arguments()[0].raw(), "too loud");
    }

    #[test]
    fn conversion_failure_names_type_and_token() {
        let spec = give_spec();

        match run(&spec, "stone five").unwrap_err() {
            CommandError::InvalidArgument { value_type, source } => {
                assert_eq!(value_type, ValueType::LONG);
                assert_eq!(source.input, "five");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn greedy_group_merges_into_one_argument() {
        let spec = say_spec();
        let outcome = run(&spec, "hello there big world").unwrap();

        assert_eq!(outcome.arguments().len(), 1);
        assert_eq!(outcome.arguments()[0].raw(), "hello there big world");
        assert_eq!(
            outcome.arguments()[0].value(),
            &Value::String("hello there big world".to_string())
        );
    }

    #[test]
    fn flag_interrupts_greedy_group() {
        let spec = say_spec();
        let outcome = run(&spec, "hello -loud world").unwrap();

        let raws: Vec<_> = outcome.arguments().iter().map(|a| a.raw()).collect();
        assert_eq!(raws, vec!["hello", "-loud", "world"]);
        assert_eq!(values(&outcome).len(), 2);
    }

    #[test]
    fn greedy_group_leaves_tokens_for_required_followers() {
        let spec = ParameterSpec::builder()
            .indexed(IndexedGroup::greedy(IndexedSlot::new("words", ValueType::STRING)))
            .indexed(IndexedGroup::single(IndexedSlot::new("count", ValueType::INT)))
            .build(&ReaderRegistry::with_defaults())
            .unwrap();

        let outcome = run(&spec, "a b c 3").unwrap();
        assert_eq!(
            values(&outcome),
            vec![Value::String("a b c".to_string()), Value::Int(3)]
        );
    }

    #[test]
    fn trailing_flag_does_not_feed_greedy_group() {
        let spec = ParameterSpec::builder()
            .indexed(IndexedGroup::greedy(IndexedSlot::new("message", ValueType::STRING)))
            .indexed(IndexedGroup::single(IndexedSlot::new("target", ValueType::STRING)))
            .flag(Flag::new("l", "loud"))
            .build(&ReaderRegistry::with_defaults())
            .unwrap();
        let expected = vec![
            Value::String("hello".to_string()),
            Value::String("world".to_string()),
        ];

        assert_eq!(values(&run(&spec, "hello world").unwrap()), expected);
        assert_eq!(values(&run(&spec, "hello world -l").unwrap()), expected);
        assert_eq!(values(&run(&spec, "-l hello world").unwrap()), expected);
    }

    #[test]
    fn leftover_tokens_are_too_many() {
        let spec = ParameterSpec::builder()
            .indexed(IndexedGroup::single(IndexedSlot::new("a", ValueType::STRING)))
            .build(&ReaderRegistry::with_defaults())
            .unwrap();

        assert_eq!(run(&spec, "x y").unwrap_err(), CommandError::TooManyArguments);
    }

    #[test]
    fn unknown_flag_is_a_parse_error() {
        let spec = ParameterSpec::builder()
            .indexed(IndexedGroup::single(IndexedSlot::new("a", ValueType::STRING)))
            .build(&ReaderRegistry::with_defaults())
            .unwrap();

        assert_eq!(
            run(&spec, "x -nope").unwrap_err(),
            CommandError::ArgumentParse {
                token: "-nope".to_string()
            }
        );
    }

    #[test]
    fn negative_number_is_positional() {
        let spec = ParameterSpec::builder()
            .indexed(IndexedGroup::single(IndexedSlot::new("n", ValueType::INT)))
            .build(&ReaderRegistry::with_defaults())
            .unwrap();

        assert_eq!(values(&run(&spec, "-4").unwrap()), vec![Value::Int(-4)]);
    }

    #[test]
    fn optional_trailing_slot_may_be_omitted() {
        let spec = ParameterSpec::builder()
            .indexed(IndexedGroup::fixed(vec![
                IndexedSlot::new("item", ValueType::STRING),
                IndexedSlot::new("amount", ValueType::LONG).optional(),
            ]))
            .build(&ReaderRegistry::with_defaults())
            .unwrap();

        assert_eq!(values(&run(&spec, "stone").unwrap()).len(), 1);
        assert_eq!(values(&run(&spec, "stone 3").unwrap()).len(), 2);
    }

    #[test]
    fn optional_groups_are_skipped_when_absent() {
        let spec = ParameterSpec::builder()
            .indexed(IndexedGroup::single(IndexedSlot::new("a", ValueType::STRING)))
            .indexed(IndexedGroup::empty_index("b"))
            .build(&ReaderRegistry::with_defaults())
            .unwrap();

        assert!(run(&spec, "").unwrap().arguments().is_empty());
        assert_eq!(values(&run(&spec, "x y").unwrap()).len(), 2);
    }

    #[test]
    fn alternative_types_are_tried_in_order() {
        let spec = ParameterSpec::builder()
            .indexed(IndexedGroup::single(
                IndexedSlot::new("amount", ValueType::LONG).or_type(ValueType::STRING),
            ))
            .build(&ReaderRegistry::with_defaults())
            .unwrap();

        assert_eq!(values(&run(&spec, "5").unwrap()), vec![Value::Long(5)]);
        assert_eq!(
            values(&run(&spec, "all").unwrap()),
            vec![Value::String("all".to_string())]
        );
    }

    #[test]
    fn lenient_match_reports_pending_slot() {
        let spec = give_spec();
        let readers = ReaderRegistry::with_defaults();
        let locale = Locale::default();
        let matcher = ArgumentMatcher::new(&spec, &readers, &locale).lenient(true);

        let outcome = matcher.run(&tokens("stone")).unwrap();
        assert_eq!(outcome.pending_slot(&spec), Some((0, 1)));

        let outcome = matcher.run(&[]).unwrap();
        assert_eq!(outcome.pending_slot(&spec), Some((0, 0)));

        let outcome = matcher.run(&tokens("stone 5")).unwrap();
        assert_eq!(outcome.pending_slot(&spec), None);
    }
}
