//! Test-run state
//!
//! This module holds the run-state model, the reducer that advances it,
//! and the store that notifies subscribers of each transition.

pub mod model;
pub mod reducer;
pub mod store;

pub use model::{Case, RunState, Suite};
pub use reducer::reduce;
pub use store::{Listener, Store, SubscriptionId};
