// vim: tw=80
//! Argument normalization.
//!
//! A variadic method's trailing group arrives as one array argument.  Before
//! it is stored or compared it is flattened, so that `call(1, [2, 3])` and
//! `call(1, 2, 3)` describe the same call.

use crate::{
    matcher::ArgMatcher,
    value::Value
};

/// One argument of a declared call: either a plain value, which will be
/// compared for equality, or an explicit matcher.
#[derive(Clone, Debug)]
pub enum RawArg {
    Value(Value),
    Matcher(ArgMatcher),
}

impl From<Value> for RawArg {
    fn from(v: Value) -> Self {
        RawArg::Value(v)
    }
}

impl From<ArgMatcher> for RawArg {
    fn from(m: ArgMatcher) -> Self {
        RawArg::Matcher(m)
    }
}

/// An argument slot that may hold a variadic group.
pub trait VarArgs: Sized {
    /// Split a trailing group into its elements, or hand the argument back if
    /// it isn't a group.
    fn into_group(self) -> Result<Vec<Self>, Self>;
}

impl VarArgs for Value {
    fn into_group(self) -> Result<Vec<Self>, Self> {
        match self {
            Value::Array(items) => Ok(items),
            // An absent array counts as a group holding a single null.
            Value::Null => Ok(vec![Value::Null]),
            other => Err(other)
        }
    }
}

impl VarArgs for RawArg {
    fn into_group(self) -> Result<Vec<Self>, Self> {
        match self {
            RawArg::Value(v) => v.into_group()
                .map(|items| items.into_iter().map(RawArg::Value).collect())
                .map_err(RawArg::Value),
            m @ RawArg::Matcher(_) => Err(m)
        }
    }
}

/// Flatten the trailing variadic group of `args`, if there is one.
///
/// Arguments of non-variadic methods, and trailing arguments that are already
/// matchers, are returned unchanged.
///
/// # Examples
/// ```
/// # use verimock::*;
/// let args = vec![Value::of(1), Value::array([2, 3])];
/// assert_eq!(expand_varargs(args, true), args![1, 2, 3]);
/// ```
pub fn expand_varargs<A: VarArgs>(mut args: Vec<A>, variadic: bool) -> Vec<A> {
    if !variadic {
        return args;
    }
    match args.pop().map(VarArgs::into_group) {
        Some(Ok(items)) => args.extend(items),
        Some(Err(last)) => args.push(last),
        None => ()
    }
    args
}

/// Turn declared arguments into argument matchers.  Plain values are compared
/// for equality, arrays element-wise.
pub fn into_matchers(args: Vec<RawArg>) -> Vec<ArgMatcher> {
    args.into_iter()
        .map(|a| match a {
            RawArg::Value(Value::Array(items)) => ArgMatcher::ArrayEquals(items),
            RawArg::Value(v) => ArgMatcher::Equals(v),
            RawArg::Matcher(m) => m
        }).collect()
}
