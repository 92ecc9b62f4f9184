//! Observable state container
//!
//! Holds the current `RunState`, runs every dispatched action through the
//! reducer, and then notifies subscribers synchronously, in the order they
//! subscribed.

use std::fmt;

use super::model::RunState;
use crate::error::Result;
use crate::protocol::Action;

/// Listener invoked after every state transition with the applied action
/// and the resulting state
pub type Listener = Box<dyn FnMut(&Action, &RunState) -> Result<()>>;

/// Handle returned by [`Store::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// State container driven by a reducer
pub struct Store<R> {
    state: RunState,
    reducer: R,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl<R> fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<R> Store<R>
where
    R: Fn(&RunState, &Action) -> Result<RunState>,
{
    /// Create a store with an initial state and a reducer
    pub const fn new(initial: RunState, reducer: R) -> Self {
        Self {
            state: initial,
            reducer,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// The current state snapshot
    pub const fn get_state(&self) -> &RunState {
        &self.state
    }

    /// Reduce `action` into a new state, then notify every listener.
    ///
    /// A reducer error leaves the state untouched. A listener error stops
    /// notification and is returned; the new state is kept.
    pub fn dispatch(&mut self, action: &Action) -> Result<()> {
        self.state = (self.reducer)(&self.state, action)?;
        for (_, listener) in &mut self.listeners {
            listener(action, &self.state)?;
        }
        Ok(())
    }

    /// Register a listener
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Action, &RunState) -> Result<()> + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners
    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
