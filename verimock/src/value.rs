// vim: tw=80
//! Type-erased argument values.
//!
//! Every argument that passes through the engine is stored as a [`Value`].
//! Scalars may be of any type that is `PartialEq + Debug + Send + Sync +
//! 'static`; two scalars are equal only if they have the same concrete type
//! and compare equal under that type's `PartialEq`.

use downcast::{downcast, Any};
use std::{fmt, sync::Arc};

/// An argument value whose concrete type has been erased.
///
/// Implemented automatically for every eligible type.  Users should never need
/// to implement it by hand.
pub trait ArgValue: Any + fmt::Debug + Send + Sync {
    /// Structural equality against another erased value.
    fn dyn_eq(&self, other: &dyn ArgValue) -> bool;
}

downcast!(dyn ArgValue);

impl<T> ArgValue for T
    where T: PartialEq + fmt::Debug + Send + Sync + 'static
{
    fn dyn_eq(&self, other: &dyn ArgValue) -> bool {
        other.downcast_ref::<T>()
            .map_or(false, |o| self == o)
    }
}

/// One argument of a recorded call or of an expected call.
///
/// `Array` is the representation of a sequence of values, such as the trailing
/// group of a variadic call.  Arrays compare element-wise.
#[derive(Clone)]
pub enum Value {
    Null,
    Scalar(Arc<dyn ArgValue>),
    Array(Vec<Value>),
}

impl Value {
    /// Wrap any eligible value.  Wrapping a `Value` returns it unchanged.
    pub fn of<T: ArgValue>(t: T) -> Self {
        if let Some(v) = (&t as &dyn std::any::Any).downcast_ref::<Value>() {
            return v.clone();
        }
        Value::Scalar(Arc::new(t))
    }

    /// Build an `Array` out of homogeneous scalars.
    ///
    /// # Examples
    /// ```
    /// # use verimock::*;
    /// let v = Value::array([2, 3]);
    /// assert_eq!(v, Value::Array(vec![Value::of(2), Value::of(3)]));
    /// ```
    pub fn array<I>(items: I) -> Self
        where I: IntoIterator,
              I::Item: ArgValue
    {
        Value::Array(items.into_iter().map(Value::of).collect())
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None
        }
    }

    /// Borrow the scalar as its concrete type, if it is one.
    pub fn downcast_ref<T: ArgValue>(&self) -> Option<&T> {
        match self {
            Value::Scalar(a) => (**a).downcast_ref::<T>().ok(),
            _ => None
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Scalar(a) => fmt::Debug::fmt(&**a, f),
            Value::Array(items) => f.debug_list().entries(items).finish()
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Scalar(a), Value::Scalar(b)) => (**a).dyn_eq(&**b),
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => false
        }
    }
}
