// vim: tw=80
//! Checking that nothing else happened
#![deny(warnings)]

use verimock::*;

fn foo() -> Signature {
    Signature::new("foo", &["i32"])
}

mod no_more {
    use super::*;

    #[test]
    fn ok() {
        let registry = Registry::new();
        let mock = Mock::new("mock");
        registry.record_call(&mock, &foo(), args![1]);
        let wanted = InvocationMatcher::from_args(&mock, foo(), args![1]);
        verify(&registry, &wanted, VerificationMode::once()).unwrap();
        verify_no_more_interactions(&registry, &[mock]).unwrap();
    }

    #[test]
    fn no_calls() {
        let registry = Registry::new();
        verify_no_more_interactions(&registry, &[Mock::new("mock")]).unwrap();
    }

    /// Reports the oldest unverified call across every mock given
    #[test]
    fn unverified() {
        let registry = Registry::new();
        let a = Mock::new("a");
        let b = Mock::new("b");
        registry.record_call(&a, &foo(), args![1]);
        registry.record_call(&b, &foo(), args![2]);
        registry.record_call(&a, &foo(), args![3]);
        let wanted = InvocationMatcher::from_args(&a, foo(), args![1]);
        verify(&registry, &wanted, VerificationMode::once()).unwrap();

        let e = verify_no_more_interactions(&registry, &[a, b.clone()])
            .unwrap_err();
        match &e {
            Error::NoMoreInteractionsWanted{invocation} => {
                assert_eq!(invocation.mock(), b.id());
                assert_eq!(invocation.arguments()[0], Value::of(2));
            },
            _ => panic!("Unexpected error {:?}", e)
        }
    }

    /// A failed verification doesn't count as verifying anything
    #[test]
    fn after_failed_verification() {
        let registry = Registry::new();
        let mock = Mock::new("mock");
        registry.record_call(&mock, &foo(), args![1]);
        registry.record_call(&mock, &foo(), args![1]);
        let wanted = InvocationMatcher::from_args(&mock, foo(), args![1]);
        verify(&registry, &wanted, VerificationMode::once()).unwrap_err();
        assert!(verify_no_more_interactions(&registry, &[mock]).is_err());
    }

    #[test]
    fn no_mocks() {
        let e = verify_no_more_interactions(&Registry::new(), &[])
            .unwrap_err();
        assert!(matches!(e, Error::Configuration(ConfigError::NoMocksGiven)));
    }
}

mod zero {
    use super::*;

    #[test]
    fn ok() {
        let registry = Registry::new();
        let a = Mock::new("a");
        let b = Mock::new("b");
        registry.record_call(&b, &foo(), args![1]);
        verify_zero_interactions(&registry, &[a]).unwrap();
    }

    /// Unlike no_more, verified calls count too
    #[test]
    fn verified_call() {
        let registry = Registry::new();
        let mock = Mock::new("mock");
        registry.record_call(&mock, &foo(), args![1]);
        let wanted = InvocationMatcher::from_args(&mock, foo(), args![1]);
        verify(&registry, &wanted, VerificationMode::once()).unwrap();
        let e = verify_zero_interactions(&registry, &[mock]).unwrap_err();
        match &e {
            Error::NoInteractionsWanted{invocation} =>
                assert_eq!(invocation.sequence(), 1),
            _ => panic!("Unexpected error {:?}", e)
        }
    }

    #[test]
    fn no_mocks() {
        assert!(verify_zero_interactions(&Registry::new(), &[]).is_err());
    }

    #[test]
    fn display() {
        let registry = Registry::new();
        let mock = Mock::new("mock");
        registry.record_call(&mock, &foo(), args![1]);
        let line = line!() - 1;
        let e = verify_zero_interactions(&registry, &[mock]).unwrap_err();
        let expected = format!("no interactions wanted, but foo(i32) was called \
            at {}:{}:", file!(), line);
        assert!(e.to_string().starts_with(&expected), "{}", e);
    }
}
