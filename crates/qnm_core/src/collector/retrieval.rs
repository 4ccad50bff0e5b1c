//! State retrieval interface for event sources.
//!
//! Delivering nodes expose more than one way to read out a stored state
//! (memory peek vs raw register access). Event sources implement
//! [`StateRetriever`] for each mechanism and compose them with
//! [`FallbackRetriever`], so the fallback is an explicit strategy instead
//! of exception-driven control flow. A retriever returning `None` simply
//! yields a state-less [`DeliveryEvent`](super::DeliveryEvent).

use crate::quantum::RawState;

/// One way of reading a delivered state out of a node.
pub trait StateRetriever {
    /// Retrieve the raw state for a logical unit slot, or `None` when this
    /// mechanism cannot see it.
    fn retrieve(&self, unit_ref: u64) -> Option<RawState>;
}

impl<F> StateRetriever for F
where
    F: Fn(u64) -> Option<RawState>,
{
    fn retrieve(&self, unit_ref: u64) -> Option<RawState> {
        self(unit_ref)
    }
}

/// Primary retrieval mechanism with an explicit secondary strategy.
pub struct FallbackRetriever<P, S> {
    primary: P,
    secondary: S,
}

impl<P: StateRetriever, S: StateRetriever> FallbackRetriever<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: StateRetriever, S: StateRetriever> StateRetriever for FallbackRetriever<P, S> {
    fn retrieve(&self, unit_ref: u64) -> Option<RawState> {
        self.primary
            .retrieve(unit_ref)
            .or_else(|| self.secondary.retrieve(unit_ref))
    }
}
