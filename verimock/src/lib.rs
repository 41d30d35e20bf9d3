// vim: tw=80
//! The recording and verification core of a mock object library.
//!
//! Verimock records every call made on a test double, and later decides
//! whether the recorded calls satisfy an expectation.  It does not create mock
//! objects, nor decide what a mocked call returns; those are the job of the
//! layer that intercepts calls and hands them to Verimock.
//!
//! # Usage
//!
//! The basic flow is the same however the calls get here.
//! * Create a [`Registry`] for the test, and a [`Mock`] handle for each test
//!   double.
//! * Whenever a double is called, record the call with
//!   [`Registry::record_call`].  The registry may be shared with any thread
//!   that calls mocks.
//! * Afterwards, describe the calls you expected with an
//!   [`InvocationMatcher`] and check them with a [`VerificationMode`].  A
//!   failed check returns an [`Error`] carrying a [`Discrepancy`] that says
//!   what was found instead.
//!
//! # User Guide
//!
//! * [`Getting started`](#getting-started)
//! * [`Matching arguments`](#matching-arguments)
//! * [`Call counts`](#call-counts)
//! * [`Variadic methods`](#variadic-methods)
//! * [`Capturing arguments`](#capturing-arguments)
//! * [`Call order`](#call-order)
//! * [`Sessions`](#sessions)
//!
//! ## Getting Started
//! ```
//! use verimock::*;
//!
//! let registry = Registry::new();
//! let mock = Mock::new("mock");
//! let foo = Signature::new("foo", &["u32"]);
//!
//! registry.record_call(&mock, &foo, args![4u32]);
//!
//! let wanted = InvocationMatcher::from_args(&mock, foo, args![4u32]);
//! verify(&registry, &wanted, VerificationMode::once()).unwrap();
//! ```
//!
//! ## Matching arguments
//!
//! Plain values given to [`InvocationMatcher::from_args`] must compare equal
//! to the recorded arguments, and must have the same type.  For anything else
//! build the [`ArgMatcher`]s yourself.  [`pred`] accepts any [`Predicate`]
//! from the `predicates` crate, and [`function`] any closure.
//! ```
//! # use verimock::*;
//! let registry = Registry::new();
//! let mock = Mock::new("mock");
//! let foo = Signature::new("foo", &["u32", "String"]);
//! registry.record_call(&mock, &foo, args![42u32, String::from("hello")]);
//!
//! let wanted = InvocationMatcher::new(&mock, foo, vec![
//!     pred::<u32, _>(predicate::in_iter(40..50)),
//!     function(|s: &String| s.starts_with("he"))
//! ]);
//! verify(&registry, &wanted, VerificationMode::once()).unwrap();
//! ```
//!
//! ## Call counts
//!
//! [`VerificationMode`] is one of `Exact(n)`, `AtLeast(min)` or
//! `AtMost(max)`.  The checked constructors reject negative counts.
//! ```
//! # use verimock::*;
//! let registry = Registry::new();
//! let mock = Mock::new("mock");
//! let foo = Signature::new("foo", &[]);
//! registry.record_call(&mock, &foo, args![]);
//! registry.record_call(&mock, &foo, args![]);
//!
//! let wanted = InvocationMatcher::new(&mock, foo, vec![]);
//! verify(&registry, &wanted, VerificationMode::at_least(1).unwrap()).unwrap();
//! let e = verify(&registry, &wanted, VerificationMode::once()).unwrap_err();
//! assert!(matches!(e, Error::TooManyInvocations(_)));
//! ```
//!
//! ## Variadic methods
//!
//! The trailing group of a variadic method is flattened, both when recording
//! and when matching.  A `null` group counts as one null argument.
//! ```
//! # use verimock::*;
//! let registry = Registry::new();
//! let mock = Mock::new("mock");
//! let call = Signature::new("call", &["i32", "i32..."]).variadic();
//! registry.record_call(&mock, &call, args![1, Value::array([2, 3])]);
//!
//! let wanted = InvocationMatcher::from_args(&mock, call, args![1, 2, 3]);
//! verify(&registry, &wanted, VerificationMode::once()).unwrap();
//! ```
//!
//! ## Capturing arguments
//!
//! A [`Captor`] matches anything, and keeps the arguments of the calls that a
//! successful verification consumed.
//! ```
//! # use verimock::*;
//! let registry = Registry::new();
//! let mock = Mock::new("mock");
//! let f = Signature::new("f", &["&str"]);
//! for s in ["a", "b", "c"] {
//!     registry.record_call(&mock, &f, args![s]);
//! }
//!
//! let captor = Captor::new();
//! let wanted = InvocationMatcher::new(&mock, f, vec![captor.matcher()]);
//! verify(&registry, &wanted, VerificationMode::times(3).unwrap()).unwrap();
//! assert_eq!(captor.last_value().unwrap(), Value::of("c"));
//! ```
//!
//! ## Call order
//!
//! An [`InOrder`] verifies that calls happened in the order given, across
//! all of its mocks.  See its documentation for details.
//!
//! ## Sessions
//!
//! A [`Session`] wraps a registry for the declare-then-call style of
//! verification used by generated mocks, and catches a declaration that was
//! never followed by its call.
//! ```
//! # use std::sync::Arc;
//! # use verimock::*;
//! let mut session = Session::new(Arc::new(Registry::new()));
//! let mock = Mock::new("mock");
//!
//! session.begin_verification(&mock, VerificationMode::once()).unwrap();
//! // Oops: forgot to make the call being verified
//! let e = session.begin_stubbing().unwrap_err();
//! assert!(matches!(e, Error::UnfinishedVerification{..}));
//! // The session has recovered
//! session.begin_stubbing().unwrap();
//! ```

mod error;
pub mod finder;
mod in_order;
mod invocation;
mod matcher;
mod mode;
mod session;
mod value;
mod varargs;

pub use error::{ConfigError, Discrepancy, Error, Result};
pub use in_order::InOrder;
pub use invocation::{
    CallSite,
    Invocation,
    Ledger,
    Mock,
    MockId,
    Registry,
    Signature
};
pub use matcher::{
    ArgMatcher,
    Captor,
    Custom,
    InvocationMatcher,
    any,
    any_varargs,
    array_eq,
    eq,
    function,
    pred
};
pub use mode::{
    Verification,
    VerificationMode,
    verify,
    verify_no_more_interactions,
    verify_zero_interactions
};
pub use predicates::prelude::{Predicate, predicate};
pub use session::{CallOutcome, Session, SessionState};
pub use value::{ArgValue, Value};
pub use varargs::{RawArg, VarArgs, expand_varargs, into_matchers};

/// Build a `Vec<`[`Value`]`>` out of argument expressions.
///
/// # Examples
/// ```
/// # use verimock::*;
/// let v = args![1u8, "two", Value::Null];
/// assert_eq!(v[1], Value::of("two"));
/// assert!(v[2].is_null());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($e:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::of($e)),*]
    };
}
