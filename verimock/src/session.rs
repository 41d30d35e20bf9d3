// vim: tw=80
//! Tracks stubbing and verification declarations that span two calls.
//!
//! Declaring a stub or a verification and then making the call it applies to
//! are separate steps.  If the second step never happens, the [`Session`]
//! notices at the start of the next stubbing or verification call, reports
//! the mistake once, and returns to `Idle` so later calls work normally.

use std::{
    mem,
    sync::Arc
};

use tracing::warn;

use crate::{
    ConfigError,
    Error,
    Result,
    in_order::InOrder,
    invocation::{CallSite, Mock, Registry, Signature},
    matcher::InvocationMatcher,
    mode::{self, Verification},
    value::Value,
    varargs::RawArg
};

/// Where the session is in the declare-then-call protocol.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionState {
    Idle,
    StubbingDeclared,
    VerificationDeclared,
}

#[derive(Debug)]
enum State {
    Idle,
    StubbingDeclared {
        location: CallSite
    },
    VerificationDeclared {
        mock: Mock,
        verification: Verification,
        location: CallSite
    },
}

/// What [`Session::handle_call`] did with a call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CallOutcome {
    /// The call was recorded with this sequence number.
    Recorded(u64),
    /// The call described a pending verification, which succeeded.
    Verified,
}

/// The verification API as seen by one test thread.
///
/// A `Session` is neither `Send` nor `Sync`.  Mocks may be called from other
/// threads through the shared [`Registry`]; the session itself must stay on
/// the test's thread.
///
/// # Examples
/// ```
/// # use std::sync::Arc;
/// # use verimock::*;
/// let mut session = Session::new(Arc::new(Registry::new()));
/// let mock = Mock::new("mock");
/// let sig = Signature::new("foo", &["u32"]);
///
/// session.handle_call(&mock, &sig, args![4u32]).unwrap();
///
/// session.begin_verification(&mock, VerificationMode::once()).unwrap();
/// let outcome = session.handle_call(&mock, &sig, args![4u32]).unwrap();
/// assert_eq!(outcome, CallOutcome::Verified);
/// ```
#[derive(Debug)]
pub struct Session {
    registry: Arc<Registry>,
    state: State,
}

impl Session {
    pub fn new(registry: Arc<Registry>) -> Self {
        Session{registry, state: State::Idle}
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn state(&self) -> SessionState {
        match self.state {
            State::Idle => SessionState::Idle,
            State::StubbingDeclared{..} => SessionState::StubbingDeclared,
            State::VerificationDeclared{..} =>
                SessionState::VerificationDeclared
        }
    }

    /// Fail if a stubbing or verification was started and never finished.
    ///
    /// Either way the session is `Idle` afterwards.
    pub fn validate_state(&mut self) -> Result<()> {
        match mem::replace(&mut self.state, State::Idle) {
            State::Idle => Ok(()),
            State::StubbingDeclared{location} => {
                warn!(%location, "discarding unfinished stubbing");
                Err(Error::UnfinishedStubbing{location})
            },
            State::VerificationDeclared{location, ..} => {
                warn!(%location, "discarding unfinished verification");
                Err(Error::UnfinishedVerification{location})
            }
        }
    }

    /// Declare that a stub is being set up.
    #[track_caller]
    pub fn begin_stubbing(&mut self) -> Result<()> {
        let location = CallSite::caller();
        self.validate_state()?;
        self.state = State::StubbingDeclared{location};
        Ok(())
    }

    /// The stub declared by [`begin_stubbing`](Self::begin_stubbing) is
    /// complete.
    pub fn complete_stubbing(&mut self) {
        if let State::StubbingDeclared{..} = self.state {
            self.state = State::Idle;
        }
    }

    /// Declare that the next call on `mock` describes the calls to verify.
    ///
    /// The call should be passed to [`handle_call`](Self::handle_call).
    #[track_caller]
    pub fn begin_verification<V>(&mut self, mock: &Mock, verification: V)
        -> Result<()>
        where V: Into<Verification>
    {
        let location = CallSite::caller();
        self.validate_state()?;
        self.state = State::VerificationDeclared {
            mock: mock.clone(),
            verification: verification.into(),
            location
        };
        Ok(())
    }

    /// Take back the pending verification, if there is one, without running
    /// it.
    pub fn complete_verification(&mut self) -> Option<Verification> {
        match mem::replace(&mut self.state, State::Idle) {
            State::VerificationDeclared{verification, ..} => Some(verification),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Handle a call intercepted on `mock`.
    ///
    /// If a verification of `mock` is pending, the call describes what to
    /// verify and the verification runs.  Otherwise the call is recorded.
    /// A pending verification of some other mock stays pending.
    #[track_caller]
    pub fn handle_call<I>(&mut self, mock: &Mock, signature: &Signature,
                          args: I) -> Result<CallOutcome>
        where I: IntoIterator,
              I::Item: Into<RawArg>
    {
        let location = CallSite::caller();
        let args: Vec<RawArg> = args.into_iter().map(Into::into).collect();
        match mem::replace(&mut self.state, State::Idle) {
            State::VerificationDeclared{mock: pending, verification, ..}
                if &pending == mock =>
            {
                let wanted = InvocationMatcher::from_args(mock,
                    signature.clone(), args);
                verification.verify(&self.registry, &wanted)?;
                Ok(CallOutcome::Verified)
            },
            pending @ State::VerificationDeclared{..} => {
                self.state = pending;
                self.record(mock, signature, args, location)
            },
            other => {
                self.state = other;
                self.validate_state()?;
                self.record(mock, signature, args, location)
            }
        }
    }

    fn record(&self, mock: &Mock, signature: &Signature, args: Vec<RawArg>,
              location: CallSite) -> Result<CallOutcome>
    {
        let values = args.into_iter()
            .map(|a| match a {
                RawArg::Value(v) => Ok(v),
                RawArg::Matcher(_) => Err(ConfigError::MatcherOutsideVerification {
                    signature: signature.clone()
                })
            }).collect::<std::result::Result<Vec<Value>, _>>()?;
        let seq = self.registry.record_at(mock, signature, values, location);
        Ok(CallOutcome::Recorded(seq))
    }

    /// Verify `wanted` right away.
    pub fn verify<V>(&mut self, wanted: &InvocationMatcher, verification: V)
        -> Result<()>
        where V: Into<Verification>
    {
        self.validate_state()?;
        verification.into().verify(&self.registry, wanted)
    }

    /// Start an ordering group over `mocks`.
    pub fn in_order(&mut self, mocks: &[Mock]) -> Result<InOrder> {
        self.validate_state()?;
        InOrder::new(mocks)
    }

    /// Fail if any call on `mocks` hasn't been verified.
    pub fn verify_no_more_interactions(&mut self, mocks: &[Mock])
        -> Result<()>
    {
        self.validate_state()?;
        mode::verify_no_more_interactions(&self.registry, mocks)
    }

    /// Fail if there was any call on `mocks`.
    pub fn verify_zero_interactions(&mut self, mocks: &[Mock]) -> Result<()> {
        self.validate_state()?;
        mode::verify_zero_interactions(&self.registry, mocks)
    }
}
