// vim: tw=80
//! Checking how many times a method was called
#![deny(warnings)]

use pretty_assertions::assert_eq;
use verimock::*;

fn foo() -> Signature {
    Signature::new("foo", &["u32"])
}

/// Record `foo(x)` once for each `x`
fn setup(xs: &[u32]) -> (Registry, Mock) {
    let registry = Registry::new();
    let mock = Mock::new("mock");
    for x in xs {
        registry.record_call(&mock, &foo(), args![*x]);
    }
    (registry, mock)
}

fn wanted(mock: &Mock, x: u32) -> InvocationMatcher {
    InvocationMatcher::from_args(mock, foo(), args![x])
}

mod exact {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ok() {
        let (registry, mock) = setup(&[1, 2, 1]);
        verify(&registry, &wanted(&mock, 1), VerificationMode::times(2).unwrap())
            .unwrap();
        verify(&registry, &wanted(&mock, 2), VerificationMode::once()).unwrap();
    }

    #[test]
    fn too_few() {
        let (registry, mock) = setup(&[1, 2]);
        let mode = VerificationMode::times(2).unwrap();
        let e = verify(&registry, &wanted(&mock, 1), mode).unwrap_err();
        let d = match &e {
            Error::TooFewInvocations(d) => d,
            _ => panic!("Unexpected error {:?}", e)
        };
        assert_eq!(d.actual_count, 1);
        assert_eq!(d.wanted_count(), 2);
        assert_eq!(d.locations.len(), 1);
        assert_eq!(d.first_extra, None);
    }

    #[test]
    fn too_many() {
        let (registry, mock) = setup(&[1, 1, 1]);
        let e = verify(&registry, &wanted(&mock, 1), VerificationMode::once())
            .unwrap_err();
        let d = match &e {
            Error::TooManyInvocations(d) => d,
            _ => panic!("Unexpected error {:?}", e)
        };
        assert_eq!(d.actual_count, 3);
        assert_eq!(d.locations.len(), 3);
        // The first call over the limit is the second one
        assert_eq!(d.first_extra, Some(d.locations[1]));
    }

    #[test]
    fn never_ok() {
        let (registry, mock) = setup(&[1]);
        verify(&registry, &wanted(&mock, 2), VerificationMode::never())
            .unwrap();
    }

    #[test]
    fn never_but_invoked() {
        let (registry, mock) = setup(&[2, 1]);
        let e = verify(&registry, &wanted(&mock, 1), VerificationMode::never())
            .unwrap_err();
        let d = match &e {
            Error::NeverWantedButInvoked(d) => d,
            _ => panic!("Unexpected error {:?}", e)
        };
        assert_eq!(d.actual_count, 1);
        assert_eq!(d.first_extra, Some(d.locations[0]));
    }

    #[test]
    fn negative() {
        let e = VerificationMode::times(-1).unwrap_err();
        assert!(matches!(e,
            Error::Configuration(ConfigError::NegativeCount{count: -1})));
    }
}

mod at_least {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ok() {
        let (registry, mock) = setup(&[1, 1, 1]);
        verify(&registry, &wanted(&mock, 1),
               VerificationMode::at_least(2).unwrap()).unwrap();
    }

    #[test]
    fn zero_with_no_calls() {
        let (registry, mock) = setup(&[]);
        verify(&registry, &wanted(&mock, 1),
               VerificationMode::at_least(0).unwrap()).unwrap();
    }

    #[test]
    fn too_few() {
        let (registry, mock) = setup(&[1]);
        let e = verify(&registry, &wanted(&mock, 1),
                       VerificationMode::at_least(2).unwrap()).unwrap_err();
        assert!(matches!(e, Error::TooFewInvocations(_)));
    }

    #[test]
    fn at_least_once_with_no_calls() {
        let (registry, mock) = setup(&[2]);
        let e = verify(&registry, &wanted(&mock, 1),
                       VerificationMode::at_least_once()).unwrap_err();
        assert_eq!(e.discrepancy().unwrap().actual_count, 0);
    }

    #[test]
    fn negative() {
        assert!(VerificationMode::at_least(-3).is_err());
    }
}

mod at_most {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ok() {
        let (registry, mock) = setup(&[1, 1]);
        verify(&registry, &wanted(&mock, 1),
               VerificationMode::at_most(2).unwrap()).unwrap();
        verify(&registry, &wanted(&mock, 3),
               VerificationMode::at_most(2).unwrap()).unwrap();
    }

    #[test]
    fn too_many() {
        let (registry, mock) = setup(&[1, 1, 1]);
        let e = verify(&registry, &wanted(&mock, 1),
                       VerificationMode::at_most(2).unwrap()).unwrap_err();
        let d = e.discrepancy().unwrap();
        assert!(matches!(e, Error::TooManyInvocations(_)));
        assert_eq!(d.first_extra, Some(d.locations[2]));
    }

    /// `AtMost(0)` is not the same as `never`, as far as reporting goes
    #[test]
    fn zero() {
        let (registry, mock) = setup(&[1]);
        let e = verify(&registry, &wanted(&mock, 1),
                       VerificationMode::at_most(0).unwrap()).unwrap_err();
        assert!(matches!(e, Error::TooManyInvocations(_)));
    }

    #[test]
    fn negative() {
        assert!(VerificationMode::at_most(-1).is_err());
    }
}

#[test]
fn bounds() {
    assert_eq!(VerificationMode::Exact(3).min(), 3);
    assert_eq!(VerificationMode::Exact(3).max(), Some(3));
    assert_eq!(VerificationMode::AtLeast(2).min(), 2);
    assert_eq!(VerificationMode::AtLeast(2).max(), None);
    assert_eq!(VerificationMode::AtMost(4).min(), 0);
    assert_eq!(VerificationMode::AtMost(4).max(), Some(4));
}

#[test]
fn marks_matches_verified() {
    let (registry, mock) = setup(&[1, 2, 1]);
    verify(&registry, &wanted(&mock, 1), VerificationMode::times(2).unwrap())
        .unwrap();
    let flags: Vec<bool> = registry.snapshot(&mock).iter()
        .map(|i| i.is_verified())
        .collect();
    assert_eq!(flags, vec![true, false, true]);
}

#[test]
fn failure_marks_nothing() {
    let (registry, mock) = setup(&[1, 1]);
    verify(&registry, &wanted(&mock, 1), VerificationMode::once()).unwrap_err();
    assert!(registry.snapshot(&mock).iter().all(|i| !i.is_verified()));
}

/// Verifying twice gives the same answer; verified calls still count
#[test]
fn idempotent() {
    let (registry, mock) = setup(&[1]);
    let w = wanted(&mock, 1);
    verify(&registry, &w, VerificationMode::once()).unwrap();
    verify(&registry, &w, VerificationMode::once()).unwrap();
}

#[test]
fn other_mocks_are_ignored() {
    let (registry, mock) = setup(&[1]);
    let other = Mock::new("mock");
    registry.record_call(&other, &foo(), args![1u32]);
    verify(&registry, &wanted(&mock, 1), VerificationMode::once()).unwrap();
    verify(&registry, &wanted(&other, 1), VerificationMode::once()).unwrap();
}

/// Methods that differ only by parameter types are different methods
#[test]
fn overloads_are_distinct() {
    let registry = Registry::new();
    let mock = Mock::new("mock");
    let foo_u64 = Signature::new("foo", &["u64"]);
    registry.record_call(&mock, &foo(), args![1u32]);
    registry.record_call(&mock, &foo_u64, args![1u64]);

    let w = InvocationMatcher::new(&mock, foo_u64, vec![any()]);
    verify(&registry, &w, VerificationMode::once()).unwrap();
}

#[test]
fn reports_similar_call() {
    let (registry, mock) = setup(&[7]);
    let e = verify(&registry, &wanted(&mock, 1), VerificationMode::once())
        .unwrap_err();
    let d = e.discrepancy().unwrap();
    let recorded = registry.snapshot(&mock)[0].location();
    assert_eq!(d.similar, Some(recorded));
}

#[test]
fn no_similar_call() {
    let (registry, mock) = setup(&[]);
    let e = verify(&registry, &wanted(&mock, 1), VerificationMode::once())
        .unwrap_err();
    assert_eq!(e.discrepancy().unwrap().similar, None);
}

#[test]
fn non_variadic_arity_mismatch() {
    let (registry, mock) = setup(&[1]);
    let w = InvocationMatcher::new(&mock, foo(), vec![any(), any()]);
    let e = verify(&registry, &w, VerificationMode::once()).unwrap_err();
    assert!(matches!(e, Error::Configuration(
        ConfigError::ArityMismatch{expected: 2, actual: 1, ..})));
}

mod arity {
    use super::*;
    use pretty_assertions::assert_eq;

    fn foo2() -> Signature {
        Signature::new("foo", &["u32", "u32"])
    }

    /// A malformed pattern is rejected even if nothing was ever called
    #[test]
    fn no_calls() {
        let registry = Registry::new();
        let mock = Mock::new("mock");
        let w = InvocationMatcher::new(&mock, foo2(), vec![any()]);
        let e = verify(&registry, &w, VerificationMode::never()).unwrap_err();
        assert!(matches!(e, Error::Configuration(
            ConfigError::ArityMismatch{expected: 1, actual: 2, ..})));
        assert_eq!(e.to_string(), "foo(u32, u32) takes 2 arguments, not 1");
    }

    /// Same answer whether or not a call of the method was recorded
    #[test]
    fn with_calls() {
        let registry = Registry::new();
        let mock = Mock::new("mock");
        registry.record_call(&mock, &foo2(), args![1u32, 2u32]);
        let w = InvocationMatcher::new(&mock, foo2(), vec![any()]);
        let e = verify(&registry, &w, VerificationMode::never()).unwrap_err();
        assert!(matches!(e, Error::Configuration(
            ConfigError::ArityMismatch{expected: 1, actual: 2, ..})));
    }

    #[test]
    fn trailing_any_varargs() {
        let registry = Registry::new();
        let mock = Mock::new("mock");
        registry.record_call(&mock, &foo2(), args![1u32, 2u32]);
        let w = InvocationMatcher::new(&mock, foo2(),
            vec![eq(1u32), any_varargs()]);
        verify(&registry, &w, VerificationMode::once()).unwrap();
        let too_long = InvocationMatcher::new(&mock, foo2(),
            vec![any(), any(), any(), any_varargs()]);
        assert!(too_long.check_arity().is_err());
    }

    #[test]
    fn unverified_query() {
        let registry = Registry::new();
        let mock = Mock::new("mock");
        let w = InvocationMatcher::new(&mock, foo2(), vec![]);
        assert!(registry.first_unverified(&w).is_err());
    }

    #[test]
    fn variadic_is_exempt() {
        let sig = Signature::new("call", &["i32", "i32..."]).variadic();
        let w = InvocationMatcher::new(&Mock::new("mock"), sig,
            vec![eq(1), eq(2), eq(3)]);
        w.check_arity().unwrap();
    }
}

#[test]
fn display() {
    let (registry, mock) = setup(&[1]);
    let e = verify(&registry, &wanted(&mock, 1),
                   VerificationMode::times(2).unwrap()).unwrap_err();
    assert_eq!(e.to_string(), "wanted 2 calls of foo(u32) but there were 1");
}
