// vim: tw=80
//! Argument matchers and invocation matchers.

use std::{
    fmt,
    marker::PhantomData,
    sync::{Arc, Mutex, PoisonError}
};

use predicates::{
    prelude::{Predicate, predicate},
    reflection::PredicateReflection
};

use crate::{
    ConfigError,
    Error,
    Result,
    invocation::{Invocation, Mock, Signature},
    value::{ArgValue, Value},
    varargs::{RawArg, expand_varargs, into_matchers}
};

/// A predicate over one argument.
#[derive(Clone)]
pub enum ArgMatcher {
    /// Structural equality.
    Equals(Value),
    /// Element-wise equality with an `Array` argument.
    ArrayEquals(Vec<Value>),
    /// Matches anything, and remembers the arguments of verified calls.
    Capturing(Captor),
    /// A user-supplied predicate.
    Custom(Custom),
    /// Placed last, matches any number of remaining variadic arguments,
    /// including none.
    AnyVarargs,
}

impl ArgMatcher {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ArgMatcher::Equals(expected) => expected == value,
            ArgMatcher::ArrayEquals(expected) => value.as_array()
                .map_or(false, |items| items == expected.as_slice()),
            ArgMatcher::Capturing(_) => true,
            ArgMatcher::Custom(c) => c.eval(value),
            ArgMatcher::AnyVarargs => true
        }
    }
}

impl fmt::Debug for ArgMatcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArgMatcher::Equals(v) => f.debug_tuple("Equals").field(v).finish(),
            ArgMatcher::ArrayEquals(v) => f.debug_tuple("ArrayEquals")
                .field(v)
                .finish(),
            ArgMatcher::Capturing(_) => f.write_str("Capturing"),
            ArgMatcher::Custom(c) => write!(f, "Custom({})", c.0),
            ArgMatcher::AnyVarargs => f.write_str("AnyVarargs")
        }
    }
}

/// A user-supplied argument predicate.
#[derive(Clone)]
pub struct Custom(Arc<dyn Predicate<Value> + Send + Sync>);

impl Custom {
    pub fn new<P>(p: P) -> Self
        where P: Predicate<Value> + Send + Sync + 'static
    {
        Custom(Arc::new(p))
    }

    pub fn eval(&self, value: &Value) -> bool {
        self.0.eval(value)
    }
}

/// Adapts a `Predicate<T>` into a `Predicate<Value>`.  Values that aren't a
/// `T` never match.
struct Downcasting<T, P> {
    inner: P,
    // fn() -> T keeps this Send + Sync regardless of T
    _t: PhantomData<fn() -> T>,
}

impl<T, P: fmt::Display> fmt::Display for Downcasting<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl<T, P: fmt::Display> PredicateReflection for Downcasting<T, P> {}

impl<T, P> Predicate<Value> for Downcasting<T, P>
    where T: ArgValue,
          P: Predicate<T>
{
    fn eval(&self, value: &Value) -> bool {
        value.downcast_ref::<T>()
            .map_or(false, |t| self.inner.eval(t))
    }
}

/// Matches anything, and keeps the arguments of the calls it helped verify.
///
/// Values are captured when a verification that uses the captor succeeds, one
/// per verified call, oldest first.  Clones share the same storage.
///
/// # Examples
/// ```
/// # use verimock::*;
/// let captor = Captor::new();
/// assert!(matches!(captor.last_value(), Err(Error::NoArgumentValueCaptured)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Captor {
    values: Arc<Mutex<Vec<Value>>>,
}

impl Captor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A matcher that feeds this captor.
    pub fn matcher(&self) -> ArgMatcher {
        ArgMatcher::Capturing(self.clone())
    }

    fn capture(&self, value: &Value) {
        self.values.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(value.clone());
    }

    /// Every captured value, oldest first.
    pub fn all_values(&self) -> Vec<Value> {
        self.values.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recently captured value.
    pub fn last_value(&self) -> Result<Value> {
        self.values.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .ok_or(Error::NoArgumentValueCaptured)
    }
}

/// Match a value equal to `t`.
pub fn eq<T: ArgValue>(t: T) -> ArgMatcher {
    ArgMatcher::Equals(Value::of(t))
}

/// Match an `Array` whose elements equal `items`, in order.
pub fn array_eq<I>(items: I) -> ArgMatcher
    where I: IntoIterator,
          I::Item: ArgValue
{
    ArgMatcher::ArrayEquals(items.into_iter().map(Value::of).collect())
}

/// Match any single argument.
pub fn any() -> ArgMatcher {
    ArgMatcher::Custom(Custom::new(predicate::always()))
}

/// Match any number of trailing variadic arguments.
pub fn any_varargs() -> ArgMatcher {
    ArgMatcher::AnyVarargs
}

/// Match arguments of type `T` that satisfy a [`Predicate`].
///
/// # Examples
/// ```
/// # use verimock::*;
/// let m = pred::<u32, _>(predicate::gt(5));
/// assert!(m.matches(&Value::of(6u32)));
/// assert!(!m.matches(&Value::of(6i64)));
/// ```
pub fn pred<T, P>(p: P) -> ArgMatcher
    where T: ArgValue,
          P: Predicate<T> + Send + Sync + 'static
{
    ArgMatcher::Custom(Custom::new(Downcasting{inner: p, _t: PhantomData}))
}

/// Match arguments of type `T` for which `f` returns true.
pub fn function<T, F>(f: F) -> ArgMatcher
    where T: ArgValue,
          F: Fn(&T) -> bool + Send + Sync + 'static
{
    pred::<T, _>(predicate::function(f))
}

/// A pattern selecting calls of one method on one mock.
#[derive(Clone, Debug)]
pub struct InvocationMatcher {
    mock: Mock,
    signature: Signature,
    matchers: Vec<ArgMatcher>,
}

impl InvocationMatcher {
    /// Build a matcher from explicit argument matchers.
    pub fn new(mock: &Mock, signature: Signature, matchers: Vec<ArgMatcher>)
        -> Self
    {
        InvocationMatcher{mock: mock.clone(), signature, matchers}
    }

    /// Build a matcher from the arguments of a declared call.  A variadic
    /// group is flattened, and plain values are wrapped in equality matchers.
    ///
    /// # Examples
    /// ```
    /// # use verimock::*;
    /// let mock = Mock::new("m");
    /// let sig = Signature::new("call", &["i32", "i32..."]).variadic();
    /// let wanted = InvocationMatcher::from_args(&mock, sig,
    ///     vec![Value::of(1), Value::array([2, 3])]);
    /// assert_eq!(wanted.matchers().len(), 3);
    /// ```
    pub fn from_args<A>(mock: &Mock, signature: Signature, args: Vec<A>)
        -> Self
        where A: Into<RawArg>
    {
        let raw: Vec<RawArg> = args.into_iter().map(Into::into).collect();
        let raw = expand_varargs(raw, signature.is_variadic());
        InvocationMatcher::new(mock, signature, into_matchers(raw))
    }

    pub fn mock(&self) -> &Mock {
        &self.mock
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn matchers(&self) -> &[ArgMatcher] {
        &self.matchers
    }

    /// Fail if a non-variadic signature takes a different number of arguments
    /// than there are matchers.  A trailing [`any_varargs`] may stand for any
    /// remaining parameters.
    ///
    /// # Examples
    /// ```
    /// # use verimock::*;
    /// let mock = Mock::new("m");
    /// let sig = Signature::new("foo", &["u32", "u32"]);
    /// let wanted = InvocationMatcher::new(&mock, sig, vec![any()]);
    /// assert!(wanted.check_arity().is_err());
    /// ```
    pub fn check_arity(&self) -> Result<()> {
        if self.signature.is_variadic() {
            return Ok(());
        }
        let params = self.signature.params().len();
        let ok = match self.matchers.split_last() {
            Some((ArgMatcher::AnyVarargs, fixed)) => fixed.len() <= params,
            _ => self.matchers.len() == params
        };
        if ok {
            Ok(())
        } else {
            Err(ConfigError::ArityMismatch {
                signature: self.signature.clone(),
                expected: self.matchers.len(),
                actual: params
            }.into())
        }
    }

    /// Does `invocation` match this pattern?
    ///
    /// A call of a non-variadic method with a different number of arguments
    /// than there are matchers is a configuration error.
    pub fn matches(&self, invocation: &Invocation) -> Result<bool> {
        if !self.targets_method_of(invocation) ||
            invocation.signature() != &self.signature
        {
            return Ok(false);
        }
        self.arguments_match(invocation.arguments())
    }

    fn arguments_match(&self, args: &[Value]) -> Result<bool> {
        let (fixed, rest) = match self.matchers.split_last() {
            Some((ArgMatcher::AnyVarargs, fixed)) => (fixed, true),
            _ => (&self.matchers[..], false)
        };
        if rest {
            if args.len() < fixed.len() {
                return Ok(false);
            }
        } else if args.len() != fixed.len() {
            if self.signature.is_variadic() {
                return Ok(false);
            }
            return Err(ConfigError::ArityMismatch {
                signature: self.signature.clone(),
                expected: fixed.len(),
                actual: args.len()
            }.into());
        }
        Ok(fixed.iter().zip(args).all(|(m, a)| m.matches(a)))
    }

    /// Is `invocation` a call of the same-named method on the same mock?
    /// Parameter types and arguments are ignored.
    pub fn targets_method_of(&self, invocation: &Invocation) -> bool {
        invocation.mock() == self.mock.id() &&
            invocation.signature().name() == self.signature.name()
    }

    /// Feed every captor of this pattern from `invocation`'s arguments.
    pub(crate) fn capture_from(&self, invocation: &Invocation) {
        for (m, a) in self.matchers.iter().zip(invocation.arguments()) {
            if let ArgMatcher::Capturing(captor) = m {
                captor.capture(a);
            }
        }
    }
}
