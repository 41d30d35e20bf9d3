// vim: tw=80
//! Verification modes: how many matching calls an expectation wants.

use std::sync::Arc;

use tracing::debug;

use crate::{
    ConfigError,
    Discrepancy,
    Error,
    Result,
    finder,
    in_order::InOrder,
    invocation::{CallSite, Invocation, Mock, Registry},
    matcher::InvocationMatcher
};

/// The quantifier applied to the calls matching an expectation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum VerificationMode {
    /// Exactly this many calls.
    Exact(usize),
    /// At least this many calls.
    AtLeast(usize),
    /// No more than this many calls.
    AtMost(usize),
}

fn count(n: i64) -> Result<usize> {
    usize::try_from(n)
        .map_err(|_| ConfigError::NegativeCount{count: n}.into())
}

impl VerificationMode {
    /// Require exactly `n` calls.
    ///
    /// # Examples
    /// ```
    /// # use verimock::*;
    /// assert_eq!(VerificationMode::times(2).unwrap(),
    ///            VerificationMode::Exact(2));
    /// assert!(VerificationMode::times(-1).is_err());
    /// ```
    pub fn times(n: i64) -> Result<Self> {
        count(n).map(VerificationMode::Exact)
    }

    /// Require at least `min` calls.
    pub fn at_least(min: i64) -> Result<Self> {
        count(min).map(VerificationMode::AtLeast)
    }

    /// Allow at most `max` calls.
    pub fn at_most(max: i64) -> Result<Self> {
        count(max).map(VerificationMode::AtMost)
    }

    /// Shortcut for `Exact(1)`
    pub fn once() -> Self {
        VerificationMode::Exact(1)
    }

    /// Shortcut for `Exact(0)`
    pub fn never() -> Self {
        VerificationMode::Exact(0)
    }

    /// Shortcut for `AtLeast(1)`
    pub fn at_least_once() -> Self {
        VerificationMode::AtLeast(1)
    }

    /// The fewest matching calls that satisfy this mode.
    pub fn min(&self) -> usize {
        match *self {
            VerificationMode::Exact(n) | VerificationMode::AtLeast(n) => n,
            VerificationMode::AtMost(_) => 0
        }
    }

    /// The most matching calls that satisfy this mode, if there is a limit.
    pub fn max(&self) -> Option<usize> {
        match *self {
            VerificationMode::Exact(n) | VerificationMode::AtMost(n) => Some(n),
            VerificationMode::AtLeast(_) => None
        }
    }

    /// Check the calls that matched `wanted` against this mode.
    ///
    /// `matches` must be in sequence order.  On success every one of them is
    /// marked verified and fed to `wanted`'s captors.  `all` is the unfiltered
    /// snapshot the matches came from; it is only used to describe a failure.
    pub fn check(&self, wanted: &InvocationMatcher,
                 matches: &[Arc<Invocation>],
                 all: &[Arc<Invocation>]) -> Result<()>
    {
        let actual = matches.len();
        if actual < self.min() {
            let d = discrepancy(wanted, *self, matches, all, None);
            return Err(Error::TooFewInvocations(d));
        }
        if let Some(max) = self.max() {
            if actual > max {
                let extra = Some(matches[max].location());
                let d = discrepancy(wanted, *self, matches, all, extra);
                return Err(match self {
                    VerificationMode::Exact(0) =>
                        Error::NeverWantedButInvoked(d),
                    _ => Error::TooManyInvocations(d)
                });
            }
        }
        for i in matches {
            wanted.capture_from(i);
            i.mark_verified();
        }
        debug!(signature = %wanted.signature(), mode = ?self, actual,
               "verified");
        Ok(())
    }
}

pub(crate) fn discrepancy(wanted: &InvocationMatcher, mode: VerificationMode,
                          matches: &[Arc<Invocation>],
                          all: &[Arc<Invocation>],
                          first_extra: Option<CallSite>)
    -> Box<Discrepancy>
{
    Box::new(Discrepancy {
        wanted: wanted.clone(),
        mode,
        actual_count: matches.len(),
        locations: matches.iter().map(|i| i.location()).collect(),
        first_extra,
        similar: finder::find_similar(all, wanted).map(|i| i.location())
    })
}

/// A verification mode, optionally constrained to an ordering group.
#[derive(Clone, Debug)]
pub enum Verification {
    Unordered(VerificationMode),
    InOrder(InOrder, VerificationMode),
}

impl Verification {
    /// Check `wanted` against the calls recorded in `registry`.
    pub fn verify(&self, registry: &Registry, wanted: &InvocationMatcher)
        -> Result<()>
    {
        match self {
            Verification::Unordered(mode) => verify(registry, wanted, *mode),
            Verification::InOrder(order, mode) =>
                order.verify(registry, wanted, *mode)
        }
    }
}

impl From<VerificationMode> for Verification {
    fn from(mode: VerificationMode) -> Self {
        Verification::Unordered(mode)
    }
}

/// Check that the calls on `wanted`'s mock that match it satisfy `mode`.
///
/// # Examples
/// ```
/// # use verimock::*;
/// let registry = Registry::new();
/// let mock = Mock::new("mock");
/// let sig = Signature::new("foo", &["u32"]);
/// registry.record_call(&mock, &sig, args![5u32]);
///
/// let wanted = InvocationMatcher::from_args(&mock, sig, args![5u32]);
/// verify(&registry, &wanted, VerificationMode::once()).unwrap();
/// ```
pub fn verify(registry: &Registry, wanted: &InvocationMatcher,
              mode: VerificationMode) -> Result<()>
{
    wanted.check_arity()?;
    let snapshot = registry.snapshot(wanted.mock());
    let matches = finder::find_all(&snapshot, wanted)?;
    mode.check(wanted, &matches, &snapshot)
}

/// Fail if any call on `mocks` hasn't been verified yet.
pub fn verify_no_more_interactions(registry: &Registry, mocks: &[Mock])
    -> Result<()>
{
    if mocks.is_empty() {
        return Err(ConfigError::NoMocksGiven.into());
    }
    let timeline = registry.merged_snapshot(mocks);
    match finder::first_unverified_any(&timeline) {
        Some(invocation) => Err(Error::NoMoreInteractionsWanted{invocation}),
        None => Ok(())
    }
}

/// Fail if there was any call at all on `mocks`, verified or not.
pub fn verify_zero_interactions(registry: &Registry, mocks: &[Mock])
    -> Result<()>
{
    if mocks.is_empty() {
        return Err(ConfigError::NoMocksGiven.into());
    }
    match registry.merged_snapshot(mocks).into_iter().next() {
        Some(invocation) => Err(Error::NoInteractionsWanted{invocation}),
        None => Ok(())
    }
}
