use jsel::{IndexPredicate, NamePredicate, Selector, parse};
use proptest::prelude::*;

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        // Bare identifiers.
        "[a-z_][a-z0-9_]{0,6}",
        // Names that force the quoted form when printed.
        "[a-z ]{1,8}",
        Just("it's \"quoted\"\n".to_string()),
    ]
}

fn arb_index_predicate() -> impl Strategy<Value = IndexPredicate> {
    prop_oneof![
        (0usize..100).prop_map(IndexPredicate::Single),
        // Two or more elements, so canonical printing cannot collapse the
        // set back to the single form.
        prop::collection::btree_set(0usize..100, 2..5)
            .prop_map(|set| IndexPredicate::Several(set.into_iter().collect())),
        // Inverted ranges stay legal, so generate them too.
        (0usize..50, 0usize..50).prop_map(|(start, end)| IndexPredicate::Range { start, end }),
    ]
}

fn arb_name_predicate() -> impl Strategy<Value = NamePredicate> {
    prop_oneof![
        arb_name().prop_map(NamePredicate::Single),
        prop::collection::btree_set(arb_name(), 2..4)
            .prop_map(|set| NamePredicate::Several(set.into_iter().collect())),
    ]
}

fn arb_step() -> impl Strategy<Value = Selector> {
    prop_oneof![
        any::<bool>().prop_map(|strict| Selector::Iterate { strict }),
        (arb_index_predicate(), any::<bool>())
            .prop_map(|(predicate, strict)| Selector::Index { predicate, strict }),
        (arb_name_predicate(), any::<bool>(), any::<bool>()).prop_map(
            |(predicate, strict, mandatory)| Selector::Name {
                predicate,
                strict,
                mandatory,
            }
        ),
    ]
}

fn arb_selector() -> impl Strategy<Value = Selector> {
    prop::collection::vec(arb_step(), 0..6)
        .prop_map(|steps| steps.into_iter().fold(Selector::This, Selector::pipe))
}

proptest! {
    #[test]
    fn display_parse_roundtrip(selector in arb_selector()) {
        let printed = selector.to_string();
        let reparsed = parse(&printed).expect("printed selector should reparse");
        prop_assert_eq!(reparsed, selector);
    }

    #[test]
    fn display_is_a_fixed_point(selector in arb_selector()) {
        let printed = selector.to_string();
        let reprinted = parse(&printed)
            .expect("printed selector should reparse")
            .to_string();
        prop_assert_eq!(reprinted, printed);
    }

    #[test]
    fn pipe_identity_law(step in arb_step()) {
        prop_assert_eq!(Selector::pipe(Selector::This, step.clone()), step);
    }

    #[test]
    fn pipe_wraps_non_identity(first in arb_step(), second in arb_step()) {
        let expected = Selector::Pipe {
            first: Box::new(first.clone()),
            second: Box::new(second.clone()),
        };
        prop_assert_eq!(Selector::pipe(first, second), expected);
    }
}
