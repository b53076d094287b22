//! Media-pipeline implementations.
//!
//! The pipeline stores raw image bytes and yields a public URL per upload.
//! A listing creation uploads every image before writing the document;
//! if any single upload fails the whole creation aborts.

#[cfg(feature = "fs-media")]
pub mod fs;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "fs-media")]
pub use self::fs::Fs;

/// Media-pipeline operation.
pub use common::Handler as Media;

/// Raw bytes of an image to upload.
#[derive(Clone, Debug)]
pub struct Image(pub Vec<u8>);

/// [`Media`] pipeline error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "fs-media")]
    /// [`Fs`] error.
    Fs(fs::Error),
}
