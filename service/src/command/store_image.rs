//! [`Command`] for storing a standalone image.

use common::operations::Upload;
use derive_more::From;
use tracerr::Traced;

use crate::{
    domain::listing::ImageUrl,
    infra::{media, Media},
    Service,
};

use super::Command;

/// [`Command`] for storing a standalone image (a profile photo) through
/// the media pipeline.
#[derive(Clone, Debug, From)]
pub struct StoreImage {
    /// Raw [`Image`] to store.
    ///
    /// [`Image`]: media::Image
    pub image: media::Image,
}

impl<Db, M> Command<StoreImage> for Service<Db, M>
where
    M: Media<
        Upload<media::Image>,
        Ok = ImageUrl,
        Err = Traced<media::Error>,
    >,
{
    type Ok = ImageUrl;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: StoreImage) -> Result<Self::Ok, Self::Err> {
        let StoreImage { image } = cmd;

        self.media
            .execute(Upload(image))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`StoreImage`] [`Command`] execution.
pub type ExecutionError = media::Error;
