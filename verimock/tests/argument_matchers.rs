// vim: tw=80
//! Matching single arguments
#![deny(warnings)]

use verimock::*;

mod equals {
    use super::*;

    #[test]
    fn same_value() {
        assert!(eq(5u32).matches(&Value::of(5u32)));
    }

    #[test]
    fn different_value() {
        assert!(!eq(5u32).matches(&Value::of(6u32)));
    }

    /// Equal-looking values of different types never match
    #[test]
    fn different_type() {
        assert!(!eq(5u32).matches(&Value::of(5u64)));
        assert!(!eq("x").matches(&Value::of(String::from("x"))));
    }

    #[test]
    fn null() {
        assert!(ArgMatcher::Equals(Value::Null).matches(&Value::Null));
        assert!(!ArgMatcher::Equals(Value::Null).matches(&Value::of(0)));
        assert!(!eq(0).matches(&Value::Null));
    }

    #[test]
    fn structural_vec() {
        assert!(eq(vec![1, 2, 3]).matches(&Value::of(vec![1, 2, 3])));
        assert!(!eq(vec![1, 2, 3]).matches(&Value::of(vec![1, 2])));
    }

    #[test]
    fn array_value() {
        let expected = ArgMatcher::Equals(Value::array(["a", "b"]));
        assert!(expected.matches(&Value::array(["a", "b"])));
        assert!(!expected.matches(&Value::array(["b", "a"])));
    }
}

mod array_equals {
    use super::*;

    #[test]
    fn ok() {
        assert!(array_eq([1, 2]).matches(&Value::array([1, 2])));
    }

    #[test]
    fn different_length() {
        assert!(!array_eq([1, 2]).matches(&Value::array([1, 2, 3])));
    }

    #[test]
    fn not_an_array() {
        assert!(!array_eq([1]).matches(&Value::of(1)));
        assert!(!array_eq([1]).matches(&Value::Null));
    }

    #[test]
    fn nested() {
        let v = Value::Array(vec![Value::Null, Value::array([1, 2])]);
        let m = ArgMatcher::ArrayEquals(vec![Value::Null, Value::array([1, 2])]);
        assert!(m.matches(&v));
    }
}

mod custom {
    use super::*;

    #[test]
    fn predicate_ok() {
        let m = pred::<i32, _>(predicate::lt(10));
        assert!(m.matches(&Value::of(9)));
        assert!(!m.matches(&Value::of(10)));
    }

    #[test]
    fn predicate_wrong_type() {
        let m = pred::<i32, _>(predicate::always());
        assert!(!m.matches(&Value::of(9u8)));
        assert!(!m.matches(&Value::Null));
    }

    #[test]
    fn function_ok() {
        let m = function(|s: &String| s.len() == 3);
        assert!(m.matches(&Value::of(String::from("abc"))));
        assert!(!m.matches(&Value::of(String::from("abcd"))));
    }

    #[test]
    fn value_predicate() {
        let m = ArgMatcher::Custom(Custom::new(
            predicate::function(|v: &Value| v.is_null())));
        assert!(m.matches(&Value::Null));
        assert!(!m.matches(&Value::of(())));
    }

    #[test]
    fn any_matches_anything() {
        for v in [Value::Null, Value::of(1), Value::array([1u8])] {
            assert!(any().matches(&v));
        }
    }
}

#[test]
fn capturing_always_matches() {
    let captor = Captor::new();
    assert!(captor.matcher().matches(&Value::of(1)));
    assert!(captor.matcher().matches(&Value::Null));
    // Matching alone captures nothing
    assert!(captor.all_values().is_empty());
}

#[test]
fn value_downcast() {
    let v = Value::of(42u16);
    assert_eq!(v.downcast_ref::<u16>(), Some(&42));
    assert_eq!(v.downcast_ref::<u32>(), None);
    assert_eq!(Value::Null.downcast_ref::<u16>(), None);
}

#[test]
fn value_of_value_is_identity() {
    assert_eq!(Value::of(Value::Null), Value::Null);
    assert_eq!(Value::of(Value::array([1])), Value::array([1]));
}

#[test]
fn debug() {
    let v = Value::Array(vec![Value::of(1), Value::Null, Value::of("s")]);
    assert_eq!(format!("{:?}", v), "[1, null, \"s\"]");
    assert_eq!(format!("{:?}", eq(3)), "Equals(3)");
    assert_eq!(format!("{:?}", any_varargs()), "AnyVarargs");
}
