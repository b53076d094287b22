//! Filesystem-backed [`Media`] pipeline.

use std::{io, path::PathBuf};

use common::operations::Upload;
use derive_more::{Display, Error as StdError, From};
use tokio::fs;
use tracerr::Traced;
use uuid::Uuid;

use crate::{
    domain::listing::ImageUrl,
    infra::{media, Media},
};

/// Filesystem-backed media pipeline.
///
/// Stores every upload under its own random name inside one directory and
/// serves it back under the configured public base URL.
#[derive(Clone, Debug)]
pub struct Fs {
    /// Directory the uploaded images are stored in.
    dir: PathBuf,

    /// Public base URL the stored images are served under.
    base_url: String,

    /// Maximum accepted image size in bytes.
    max_bytes: usize,
}

/// [`Fs`] pipeline configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to store the uploaded images in.
    pub dir: PathBuf,

    /// Public base URL the stored images are served under.
    pub base_url: String,

    /// Maximum accepted image size in bytes.
    pub max_bytes: usize,
}

impl Fs {
    /// Creates a new [`Fs`] pipeline, making sure its directory exists.
    ///
    /// # Errors
    ///
    /// Errors if the directory cannot be created.
    pub fn new(config: Config) -> Result<Self, Traced<Error>> {
        std::fs::create_dir_all(&config.dir)
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        Ok(Self {
            dir: config.dir,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            max_bytes: config.max_bytes,
        })
    }
}

impl Media<Upload<media::Image>> for Fs {
    type Ok = ImageUrl;
    type Err = Traced<media::Error>;

    async fn execute(
        &self,
        Upload(image): Upload<media::Image>,
    ) -> Result<Self::Ok, Self::Err> {
        let media::Image(bytes) = image;
        if bytes.len() > self.max_bytes {
            return Err(tracerr::new!(media::Error::from(Error::TooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            })));
        }

        let name = Uuid::new_v4().simple().to_string();
        fs::write(self.dir.join(&name), bytes)
            .await
            .map_err(Error::Io)
            .map_err(tracerr::from_and_wrap!(=> media::Error))?;

        tracing::debug!(name, "image stored");

        let url = format!("{}/{name}", self.base_url);
        #[expect(unsafe_code, reason = "well-formed by construction")]
        Ok(unsafe { ImageUrl::new_unchecked(url) })
    }
}

/// [`Fs`] pipeline error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Image exceeds the configured size limit.
    #[display("image of {size} bytes exceeds the {limit} bytes limit")]
    TooLarge {
        /// Size of the rejected image.
        size: usize,

        /// Configured size limit.
        limit: usize,
    },

    /// Filesystem failure.
    #[display("filesystem operation failed: {_0}")]
    #[from]
    Io(io::Error),
}
