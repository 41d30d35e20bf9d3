// vim: tw=80
//! Queries over ledger snapshots.
//!
//! Nothing here mutates a record.  Marking calls verified is left to the
//! checkers in [`mode`](crate::mode).

use std::sync::Arc;

use crate::{
    Result,
    invocation::Invocation,
    matcher::InvocationMatcher
};

/// Every call in `snapshot` that matches `wanted`, in sequence order.
pub fn find_all(snapshot: &[Arc<Invocation>], wanted: &InvocationMatcher)
    -> Result<Vec<Arc<Invocation>>>
{
    find_after(snapshot, wanted, 0)
}

/// Like [`find_all`], but only calls whose sequence number is greater than
/// `cursor`.
pub fn find_after(snapshot: &[Arc<Invocation>], wanted: &InvocationMatcher,
                  cursor: u64) -> Result<Vec<Arc<Invocation>>>
{
    let mut found = Vec::new();
    for i in snapshot.iter().filter(|i| i.sequence() > cursor) {
        if wanted.matches(i)? {
            found.push(i.clone());
        }
    }
    Ok(found)
}

/// The oldest matching call that hasn't been verified yet.
pub fn first_unverified(snapshot: &[Arc<Invocation>],
                        wanted: &InvocationMatcher)
    -> Result<Option<Arc<Invocation>>>
{
    for i in snapshot.iter().filter(|i| !i.is_verified()) {
        if wanted.matches(i)? {
            return Ok(Some(i.clone()));
        }
    }
    Ok(None)
}

/// The oldest call that hasn't been verified yet, whatever it is.
pub fn first_unverified_any(snapshot: &[Arc<Invocation>])
    -> Option<Arc<Invocation>>
{
    snapshot.iter()
        .find(|i| !i.is_verified())
        .cloned()
}

/// A call of the same method as `wanted` that doesn't match it.
///
/// Prefers unverified calls.  Calls whose arity `wanted` can't be compared
/// against count as not matching.
pub fn find_similar(snapshot: &[Arc<Invocation>], wanted: &InvocationMatcher)
    -> Option<Arc<Invocation>>
{
    let mut similar = snapshot.iter()
        .filter(|i| wanted.targets_method_of(i))
        .filter(|i| !matches!(wanted.matches(i), Ok(true)));
    let first = similar.clone().next();
    similar.find(|i| !i.is_verified())
        .or(first)
        .cloned()
}

/// The first run of consecutive matching calls after `cursor`.
///
/// `timeline` is normally the merged snapshot of an ordering group.  The run
/// ends at the first call after it that doesn't match.
pub fn first_matching_chunk(timeline: &[Arc<Invocation>],
                            wanted: &InvocationMatcher,
                            cursor: u64) -> Result<Vec<Arc<Invocation>>>
{
    let mut chunk = Vec::new();
    for i in timeline.iter().filter(|i| i.sequence() > cursor) {
        if wanted.matches(i)? {
            chunk.push(i.clone());
        } else if !chunk.is_empty() {
            break;
        }
    }
    Ok(chunk)
}
