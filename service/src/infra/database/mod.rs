//! [`Database`]-related implementations.
//!
//! The document store contract is deliberately narrow: single-document
//! reads and writes only, no transactions, no locks. Two concurrent
//! updates of the same document race with last-write-wins semantics.

#[cfg(feature = "memory")]
pub mod memory;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "memory")]
pub use self::memory::Memory;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "memory")]
    /// [`Memory`] error.
    Memory(memory::Error),
}
