//! Record store subsystem.
//!
//! # Data Flow
//! ```text
//! Controller operation
//!     → memory.rs (lock, read or mutate, unlock)
//!     → record.rs (Address / AddressFields values handed back by clone)
//! ```
//!
//! # Design Decisions
//! - One mutex guards the map and the id sequence together
//! - Ids come from a monotonic sequence starting at 1 and are never reused
//! - Records are returned by value; callers never hold references into the map

pub mod memory;
pub mod record;

pub use memory::RecordStore;
pub use record::{Address, AddressFields, AddressId};
