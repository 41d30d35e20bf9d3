// vim: tw=80
//! Invocation records and the ledgers that hold them.

use std::{
    collections::HashMap,
    fmt,
    panic::Location,
    sync::{
        Arc,
        Mutex,
        MutexGuard,
        PoisonError,
        atomic::{AtomicBool, AtomicU64, Ordering}
    }
};

use tracing::trace;

use crate::{
    Result,
    finder,
    matcher::InvocationMatcher,
    value::Value,
    varargs::expand_varargs
};

static NEXT_MOCK_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of one test double.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MockId(u64);

/// A handle to one test double.
///
/// Clones of a `Mock` refer to the same double.  Two separately created
/// `Mock`s are always distinct, even if they share a name.
#[derive(Clone, Debug)]
pub struct Mock {
    id: MockId,
    name: Arc<str>,
}

impl Mock {
    pub fn new(name: &str) -> Self {
        let id = MockId(NEXT_MOCK_ID.fetch_add(1, Ordering::Relaxed));
        Mock{id, name: name.into()}
    }

    pub fn id(&self) -> MockId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Mock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq for Mock {
    fn eq(&self, other: &Mock) -> bool {
        self.id == other.id
    }
}

impl Eq for Mock {}

/// Identifies a method: its name and its ordered parameter types.
///
/// Overloads with the same name but different parameter types are different
/// methods.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Signature {
    name: String,
    params: Vec<String>,
    variadic: bool,
}

impl Signature {
    /// # Examples
    /// ```
    /// # use verimock::*;
    /// let sig = Signature::new("foo", &["u32", "&str"]);
    /// assert_ne!(sig, Signature::new("foo", &["u32"]));
    /// ```
    pub fn new(name: &str, params: &[&str]) -> Self {
        Signature {
            name: name.to_owned(),
            params: params.iter().map(|p| (*p).to_owned()).collect(),
            variadic: false
        }
    }

    /// Declare that the last parameter collects a variable number of
    /// arguments.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({}", self.name, self.params.join(", "))?;
        if self.variadic {
            f.write_str("...")?;
        }
        f.write_str(")")
    }
}

/// Where a call, or a call to the verification API, was made.
///
/// Used only for reporting; never matched on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CallSite(&'static Location<'static>);

impl CallSite {
    /// The location of the caller of the `#[track_caller]` chain.
    #[track_caller]
    pub fn caller() -> Self {
        CallSite(Location::caller())
    }

    pub fn file(&self) -> &'static str {
        self.0.file()
    }

    pub fn line(&self) -> u32 {
        self.0.line()
    }

    pub fn column(&self) -> u32 {
        self.0.column()
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self.0, f)
    }
}

/// One completed call made on a test double.
///
/// Everything but the `verified` flag is immutable.  The flag only ever goes
/// from `false` to `true`.
#[derive(Debug)]
pub struct Invocation {
    mock: MockId,
    signature: Signature,
    arguments: Vec<Value>,
    sequence: u64,
    location: CallSite,
    verified: AtomicBool,
}

impl Invocation {
    pub fn mock(&self) -> MockId {
        self.mock
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The call's arguments, with any variadic group already expanded.
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Position of this call in the registry-wide total order.  Starts at 1.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn location(&self) -> CallSite {
        self.location
    }

    pub fn is_verified(&self) -> bool {
        self.verified.load(Ordering::Acquire)
    }

    pub(crate) fn mark_verified(&self) {
        self.verified.store(true, Ordering::Release);
    }
}

/// The append-only log of calls made on one mock.
#[derive(Debug, Default)]
pub struct Ledger {
    invocations: Mutex<Vec<Arc<Invocation>>>,
}

impl Ledger {
    // Records are only ever pushed, so a panic elsewhere can't leave the log
    // half-written.
    fn lock(&self) -> MutexGuard<'_, Vec<Arc<Invocation>>> {
        self.invocations.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a new record, numbering it from `counter`.
    ///
    /// The number is drawn under the ledger's lock so each ledger stays in
    /// sequence order even when several threads call the same mock.
    pub(crate) fn append<F>(&self, counter: &AtomicU64, make: F) -> u64
        where F: FnOnce(u64) -> Invocation
    {
        let mut guard = self.lock();
        let sequence = counter.fetch_add(1, Ordering::Relaxed) + 1;
        guard.push(Arc::new(make(sequence)));
        sequence
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// A copy of the log as it is right now, in sequence order.
    ///
    /// Calls appended after the snapshot was taken are not visible through it,
    /// but the records it holds are shared with the ledger, so marking them
    /// verified marks the ledger's records too.
    pub fn snapshot(&self) -> Vec<Arc<Invocation>> {
        self.lock().clone()
    }
}

/// Owns the ledgers of every mock used by one test, and the sequence counter
/// that orders their calls.
///
/// A `Registry` is `Send + Sync`; share it through an `Arc` with any thread
/// that calls mocks.
#[derive(Debug, Default)]
pub struct Registry {
    ledgers: Mutex<HashMap<MockId, Arc<Ledger>>>,
    sequence: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ledger of `mock`, creating it on first use.
    pub fn ledger(&self, mock: &Mock) -> Arc<Ledger> {
        self.ledger_by_id(mock.id())
    }

    fn ledger_by_id(&self, id: MockId) -> Arc<Ledger> {
        self.ledgers.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_default()
            .clone()
    }

    /// Record a completed call and return its sequence number.
    ///
    /// `args` are the raw arguments; if `signature` is variadic a trailing
    /// array is expanded before it is stored.
    #[track_caller]
    pub fn record_call(&self, mock: &Mock, signature: &Signature,
                       args: Vec<Value>) -> u64
    {
        self.record_at(mock, signature, args, CallSite::caller())
    }

    pub(crate) fn record_at(&self, mock: &Mock, signature: &Signature,
                            args: Vec<Value>, location: CallSite) -> u64
    {
        let arguments = expand_varargs(args, signature.is_variadic());
        let sequence = self.ledger(mock).append(&self.sequence, |sequence| {
            Invocation {
                mock: mock.id(),
                signature: signature.clone(),
                arguments,
                sequence,
                location,
                verified: AtomicBool::new(false)
            }
        });
        trace!(mock = %mock, %signature, sequence, "recorded call");
        sequence
    }

    pub fn snapshot(&self, mock: &Mock) -> Vec<Arc<Invocation>> {
        self.ledger(mock).snapshot()
    }

    /// Snapshots of several mocks' ledgers merged into one timeline, ordered
    /// by sequence number.
    ///
    /// Every ledger is locked at once, so the timeline has no gaps: any call
    /// on these mocks that is missing from it was numbered after every call
    /// in it.
    pub fn merged_snapshot(&self, mocks: &[Mock]) -> Vec<Arc<Invocation>> {
        let mut ids: Vec<MockId> = mocks.iter().map(Mock::id).collect();
        ids.sort_unstable();
        ids.dedup();
        let ledgers: Vec<Arc<Ledger>> = ids.into_iter()
            .map(|id| self.ledger_by_id(id))
            .collect();
        // Always lock in MockId order
        let guards: Vec<_> = ledgers.iter().map(|l| l.lock()).collect();
        let mut merged: Vec<Arc<Invocation>> = guards.iter()
            .flat_map(|g| g.iter().cloned())
            .collect();
        drop(guards);
        merged.sort_by_key(|i| i.sequence());
        merged
    }

    /// The oldest call on the wanted mock that matches `wanted` and hasn't
    /// been verified yet.  Has no side effects.
    pub fn first_unverified(&self, wanted: &InvocationMatcher)
        -> Result<Option<Arc<Invocation>>>
    {
        wanted.check_arity()?;
        finder::first_unverified(&self.snapshot(wanted.mock()), wanted)
    }
}
