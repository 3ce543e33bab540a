//! Moondust Store — in-process implementation of the store traits.
//!
//! The real persistence engine is an external collaborator; this crate is
//! the abstract store the rest of the system programs against, held in
//! memory behind a single mutex. Status transitions are conditional writes
//! keyed on the current status, which gives compare-and-swap semantics for
//! moderation decisions.

mod memory;

pub use memory::MemoryStore;
