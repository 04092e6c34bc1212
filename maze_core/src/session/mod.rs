//! # Shared session
//!
//! The narrow API runners and the coordinator use to talk through shared memory:
//!
//! - `register()`: claim a unique slot under the session lock
//! - `publish(slot, pos)`: write a position under the session lock
//! - `snapshot()`: consistent copy of every slot
//! - `is_quit()` / `request_quit()`: cooperative cancellation

pub mod shared;
pub mod snapshot;

pub use shared::SharedSession;
pub use snapshot::RegistrySnapshot;
