// vim: tw=80
//! Errors returned by the engine.
//!
//! Verification failures are structured values.  Their `Display` output is a
//! terse one-liner; rendering a useful report is left to the caller, which has
//! every matching location in the [`Discrepancy`].

use std::sync::Arc;

use thiserror::Error;

use crate::{
    invocation::{CallSite, Invocation, Mock, Signature},
    matcher::InvocationMatcher,
    mode::VerificationMode
};

/// What was wanted, and what was found, when a verification failed.
#[derive(Clone, Debug)]
pub struct Discrepancy {
    /// The pattern that was being verified.
    pub wanted: InvocationMatcher,
    pub mode: VerificationMode,
    /// How many calls matched `wanted`.
    pub actual_count: usize,
    /// Call sites of every matching call, oldest first.
    pub locations: Vec<CallSite>,
    /// For too many calls, the first call over the limit.
    pub first_extra: Option<CallSite>,
    /// A call of the same method whose arguments didn't match, if any.
    pub similar: Option<CallSite>,
}

impl Discrepancy {
    /// The count that `mode` was checking against.
    pub fn wanted_count(&self) -> usize {
        match self.mode {
            VerificationMode::Exact(n) |
            VerificationMode::AtLeast(n) |
            VerificationMode::AtMost(n) => n
        }
    }
}

/// Mistakes in how the engine was set up or called.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("verification counts must not be negative, got {count}")]
    NegativeCount {
        count: i64
    },

    #[error("{signature} takes {actual} arguments, not {expected}")]
    ArityMismatch {
        signature: Signature,
        expected: usize,
        actual: usize
    },

    #[error("mock {mock} is not part of this ordering group")]
    MockNotInOrderGroup {
        mock: Mock
    },

    #[error("at least one mock is required")]
    NoMocksGiven,

    #[error("argument matchers may only be used while verifying, but one was passed to {signature}")]
    MatcherOutsideVerification {
        signature: Signature
    },
}

/// Every error the engine returns.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("wanted {} calls of {} but there were {}",
            .0.wanted_count(), .0.wanted.signature(), .0.actual_count)]
    TooFewInvocations(Box<Discrepancy>),

    #[error("wanted {} calls of {} but there were {}",
            .0.wanted_count(), .0.wanted.signature(), .0.actual_count)]
    TooManyInvocations(Box<Discrepancy>),

    #[error("{} was never wanted but was called {} times",
            .0.wanted.signature(), .0.actual_count)]
    NeverWantedButInvoked(Box<Discrepancy>),

    #[error("{} was not called in the wanted order", .0.wanted.signature())]
    VerificationInOrderFailure(Box<Discrepancy>),

    #[error("no more interactions wanted, but {} was called at {}",
            .invocation.signature(), .invocation.location())]
    NoMoreInteractionsWanted {
        invocation: Arc<Invocation>
    },

    #[error("no interactions wanted, but {} was called at {}",
            .invocation.signature(), .invocation.location())]
    NoInteractionsWanted {
        invocation: Arc<Invocation>
    },

    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("unfinished stubbing started at {location}")]
    UnfinishedStubbing {
        location: CallSite
    },

    #[error("unfinished verification started at {location}")]
    UnfinishedVerification {
        location: CallSite
    },

    #[error("no argument value was captured")]
    NoArgumentValueCaptured,
}

impl Error {
    /// The discrepancy behind a failed count or ordering check.
    pub fn discrepancy(&self) -> Option<&Discrepancy> {
        match self {
            Error::TooFewInvocations(d) |
            Error::TooManyInvocations(d) |
            Error::NeverWantedButInvoked(d) |
            Error::VerificationInOrderFailure(d) => Some(d),
            _ => None
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
