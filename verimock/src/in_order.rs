// vim: tw=80
//! Verifying that calls happened in a given order, across several mocks.

use std::{
    cell::RefCell,
    rc::Rc,
};

use tracing::debug;

use crate::{
    ConfigError,
    Error,
    Result,
    finder,
    invocation::{Mock, Registry},
    matcher::InvocationMatcher,
    mode::{Verification, VerificationMode, discrepancy}
};

/// The mocks an ordering group governs, and how far its verifications have
/// progressed through their combined timeline.
#[derive(Debug)]
struct OrderingContext {
    mocks: Vec<Mock>,
    /// Sequence number of the last call consumed by a verification.  0 before
    /// the first one.
    last_consumed: u64,
}

impl OrderingContext {
    fn governs(&self, mock: &Mock) -> bool {
        self.mocks.contains(mock)
    }
}

/// Used to verify that calls were made in the order given.
///
/// Each successful verification consumes the calls it matched.  The next one
/// only considers calls made after the last consumed call on *any* mock of the
/// group.  Clones share the same progress.
///
/// An `InOrder` belongs to one test thread; it is neither `Send` nor `Sync`.
///
/// # Examples
/// ```
/// # use verimock::*;
/// let registry = Registry::new();
/// let a = Mock::new("a");
/// let b = Mock::new("b");
/// let x = Signature::new("x", &[]);
/// let y = Signature::new("y", &[]);
/// registry.record_call(&a, &x, args![]);
/// registry.record_call(&b, &y, args![]);
///
/// let order = InOrder::new(&[a.clone(), b.clone()]).unwrap();
/// let wanted_y = InvocationMatcher::new(&b, y, vec![]);
/// let wanted_x = InvocationMatcher::new(&a, x, vec![]);
/// order.verify(&registry, &wanted_y, VerificationMode::once()).unwrap();
/// assert!(order.verify(&registry, &wanted_x, VerificationMode::once())
///     .is_err());
/// ```
#[derive(Clone, Debug)]
pub struct InOrder {
    context: Rc<RefCell<OrderingContext>>,
}

impl InOrder {
    /// Start an ordering group over `mocks`.
    pub fn new(mocks: &[Mock]) -> Result<Self> {
        if mocks.is_empty() {
            return Err(ConfigError::NoMocksGiven.into());
        }
        let context = OrderingContext {
            mocks: mocks.to_vec(),
            last_consumed: 0
        };
        Ok(InOrder{context: Rc::new(RefCell::new(context))})
    }

    /// Wrap `mode` so that it verifies within this group.
    pub fn mode(&self, mode: VerificationMode) -> Verification {
        Verification::InOrder(self.clone(), mode)
    }

    pub fn contains(&self, mock: &Mock) -> bool {
        self.context.borrow().governs(mock)
    }

    /// Sequence number of the last call consumed so far, or 0.
    pub fn cursor(&self) -> u64 {
        self.context.borrow().last_consumed
    }

    /// Verify `wanted` against the calls made after the last consumed call.
    ///
    /// For `Exact(n)`, if the first run of consecutive matching calls holds
    /// exactly `n` calls, only that run is consumed; later matches remain
    /// available to later verifications.  Otherwise every match after the
    /// cursor is counted.
    ///
    /// Too few matches after the cursor is a `VerificationInOrderFailure`
    /// when there are none at all, or when the calls before the cursor would
    /// have made up the difference.  Otherwise it is `TooFewInvocations`.
    pub fn verify(&self, registry: &Registry, wanted: &InvocationMatcher,
                  mode: VerificationMode) -> Result<()>
    {
        wanted.check_arity()?;
        let (timeline, cursor) = {
            let ctx = self.context.borrow();
            if !ctx.governs(wanted.mock()) {
                return Err(ConfigError::MockNotInOrderGroup {
                    mock: wanted.mock().clone()
                }.into());
            }
            (registry.merged_snapshot(&ctx.mocks), ctx.last_consumed)
        };
        let window = finder::find_after(&timeline, wanted, cursor)?;
        let consumed = match mode {
            VerificationMode::Exact(n) => {
                let chunk = finder::first_matching_chunk(&timeline, wanted,
                                                         cursor)?;
                if chunk.len() == n { chunk } else { window }
            },
            _ => window
        };
        if consumed.len() < mode.min() {
            let everywhere = finder::find_all(&timeline, wanted)?;
            if consumed.is_empty() || everywhere.len() >= mode.min() {
                // Report where the calls did happen
                let mut d = discrepancy(wanted, mode, &everywhere, &timeline,
                                        None);
                d.actual_count = consumed.len();
                return Err(Error::VerificationInOrderFailure(d));
            }
        }
        mode.check(wanted, &consumed, &timeline)?;
        if let Some(last) = consumed.last() {
            self.context.borrow_mut().last_consumed = last.sequence();
            debug!(cursor = last.sequence(), "in-order cursor advanced");
        }
        Ok(())
    }

    /// Fail if any call on the group's mocks after the last consumed call
    /// hasn't been verified.
    pub fn verify_no_more_interactions(&self, registry: &Registry)
        -> Result<()>
    {
        let ctx = self.context.borrow();
        let timeline = registry.merged_snapshot(&ctx.mocks);
        let after = timeline.iter()
            .filter(|i| i.sequence() > ctx.last_consumed)
            .find(|i| !i.is_verified())
            .cloned();
        match after {
            Some(invocation) => Err(Error::NoMoreInteractionsWanted{invocation}),
            None => Ok(())
        }
    }
}
