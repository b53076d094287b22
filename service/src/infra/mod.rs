//! Infrastructure implementations.

pub mod database;
pub mod media;

#[cfg(feature = "memory")]
pub use self::database::Memory;
#[cfg(feature = "fs-media")]
pub use self::media::Fs;
pub use self::{database::Database, media::Media};
