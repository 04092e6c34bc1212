//! # Shared memory for maze sessions
//!
//! - **ShmRegion**: named, memory-mapped session file under the platform shm directory
//! - **SessionLayout**: header, cell grid and slot table offsets inside a region
//! - **ShmMutex**: process-shared lock over a word in the session header
//!
//! [`crate::session::SharedSession`] is the only user of the raw offsets and
//! pointers; the path helpers are public so tools can locate session files.

pub mod layout;
pub mod platform;
pub mod shm_mutex;
pub mod shm_region;

pub use layout::{SessionHeader, SessionLayout, SlotEntry, LAYOUT_VERSION, SESSION_MAGIC};
pub use platform::*;
pub use shm_mutex::{ShmMutex, ShmMutexGuard};
pub use shm_region::ShmRegion;
