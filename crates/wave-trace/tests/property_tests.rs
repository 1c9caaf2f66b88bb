use proptest::prelude::*;
use wave_test_utils::VcdBuilder;
use wave_trace::vcd;

proptest! {
    #[test]
    fn parse_never_panics(s in "\\PC*") {
        // Arbitrary text either decodes or reports an error.
        let _ = vcd::parse(&s);
    }

    #[test]
    fn value_at_matches_last_change(
        values in proptest::collection::vec(0u64..16, 1..40),
    ) {
        let mut builder = VcdBuilder::new().wire("top.v", 4);
        for (step, value) in values.iter().enumerate() {
            builder = builder.change(step as u64 * 3, "top.v", *value);
        }
        let trace = vcd::parse(&builder.build()).unwrap();

        prop_assert_eq!(trace.len(), values.len());
        for (step, value) in values.iter().enumerate() {
            prop_assert_eq!(trace.value_at("top.v", step).and_then(|v| v.as_u64()), Some(*value));
        }

        // transitions are strictly increasing and only report real changes
        let transitions = trace.transitions("top.v", 0, values.len() - 1).unwrap();
        let expected = values.windows(2).filter(|w| w[0] != w[1]).count();
        prop_assert_eq!(transitions.len(), expected);
        prop_assert!(transitions.windows(2).all(|w| w[0].index < w[1].index));
    }
}
