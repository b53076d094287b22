//! [`Command`] for creating a new [`Listing`].

use common::{
    operations::{Insert, Upload},
    DateTime, Price,
};
use derive_more::{Display, Error, From};
use futures::future;
use tracerr::Traced;

use crate::{
    domain::{
        listing::{self, Images},
        Caller, Listing,
    },
    infra::{database, media, Database, Media},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Listing`].
///
/// Uploads every provided image through the media pipeline first and
/// writes the document only after all of them succeed. A single failed
/// upload aborts the whole creation (already uploaded bytes stay orphaned
/// in the pipeline, with no compensating cleanup).
#[derive(Clone, Debug)]
pub struct CreateListing {
    /// [`Caller`] creating the [`Listing`].
    pub caller: Caller,

    /// [`Title`] of the new [`Listing`].
    ///
    /// [`Title`]: listing::Title
    pub title: listing::Title,

    /// [`Description`] of the new [`Listing`].
    ///
    /// [`Description`]: listing::Description
    pub description: listing::Description,

    /// [`Status`] of the new [`Listing`].
    ///
    /// [`Status`]: listing::Status
    pub status: listing::Status,

    /// [`Price`] of the new [`Listing`].
    pub price: Price,

    /// [`Location`] of the new [`Listing`].
    ///
    /// [`Location`]: listing::Location
    pub location: listing::Location,

    /// [`Attributes`] of the new [`Listing`].
    ///
    /// [`Attributes`]: listing::Attributes
    pub attributes: listing::Attributes,

    /// Raw images of the new [`Listing`], in their significant order.
    pub images: Vec<media::Image>,

    /// [`OwnerSnapshot`] to denormalize onto the new [`Listing`].
    ///
    /// [`OwnerSnapshot`]: listing::OwnerSnapshot
    pub owner: listing::OwnerSnapshot,
}

impl<Db, M> Command<CreateListing> for Service<Db, M>
where
    Db: Database<Insert<Listing>, Ok = (), Err = Traced<database::Error>>,
    M: Media<
        Upload<media::Image>,
        Ok = listing::ImageUrl,
        Err = Traced<media::Error>,
    >,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateListing,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateListing {
            caller,
            title,
            description,
            status,
            price,
            location,
            attributes,
            images,
            owner,
        } = cmd;

        if !caller.email_verified {
            return Err(tracerr::new!(E::EmailNotVerified));
        }

        let num_images = images.len();
        if !(Images::MIN..=Images::MAX).contains(&num_images) {
            return Err(tracerr::new!(E::WrongImagesCount(num_images)));
        }

        let urls = future::try_join_all(
            images
                .into_iter()
                .map(|image| self.media.execute(Upload(image))),
        )
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let images = Images::new(urls)
            .ok_or(E::WrongImagesCount(num_images))
            .map_err(tracerr::wrap!())?;

        let listing = Listing {
            id: listing::Id::new(),
            title,
            description,
            status,
            price,
            location,
            attributes,
            images,
            owner_id: caller.id,
            owner,
            created_at: DateTime::now().coerce(),
        };

        self.database
            .execute(Insert(listing.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::info!(id = %listing.id, "listing created");

        Ok(listing)
    }
}

/// Error of [`CreateListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Caller`] has not verified their email address.
    #[display("`Caller` has not verified their email address")]
    EmailNotVerified,

    /// [`Media`] pipeline error.
    #[display("`Media` upload failed: {_0}")]
    #[from]
    Media(media::Error),

    /// Number of provided images is out of bounds.
    #[display(
        "cannot create a `Listing` with {_0} images ({min}..={max} required)",
        min = Images::MIN,
        max = Images::MAX,
    )]
    WrongImagesCount(#[error(not(source))] usize),
}

#[cfg(test)]
mod spec {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use common::operations::{By, Select, Upload};
    use jsonwebtoken::DecodingKey;
    use tracerr::Traced;

    use crate::{
        domain::{
            listing::{Attributes, ImageUrl, Residence, Status},
            user, Caller, Listing,
        },
        infra::{media, Database as _, Media, Memory},
        Command as _, Config, Service,
    };

    use super::{CreateListing, ExecutionError};

    /// [`Media`] pipeline yielding sequential fake URLs.
    #[derive(Debug, Default)]
    struct SeqMedia(AtomicUsize);

    impl Media<Upload<media::Image>> for SeqMedia {
        type Ok = ImageUrl;
        type Err = Traced<media::Error>;

        async fn execute(
            &self,
            Upload(_): Upload<media::Image>,
        ) -> Result<Self::Ok, Self::Err> {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            Ok(format!("https://img.test/{n}").parse().unwrap())
        }
    }

    /// [`Media`] pipeline failing every upload.
    #[derive(Clone, Copy, Debug)]
    struct BrokenMedia;

    impl Media<Upload<media::Image>> for BrokenMedia {
        type Ok = ImageUrl;
        type Err = Traced<media::Error>;

        async fn execute(
            &self,
            Upload(_): Upload<media::Image>,
        ) -> Result<Self::Ok, Self::Err> {
            Err(tracerr::new!(media::Error::Fs(
                crate::infra::media::fs::Error::TooLarge { size: 1, limit: 0 }
            )))
        }
    }

    fn service<M>(db: Memory, media: M) -> Service<Memory, M> {
        Service::new(
            Config {
                jwt_decoding_key: DecodingKey::from_secret(b"test-secret"),
            },
            db,
            media,
        )
    }

    fn caller(uid: &str) -> Caller {
        Caller {
            id: user::Id::new(uid).unwrap(),
            is_admin: false,
            email_verified: true,
        }
    }

    fn command(caller: Caller, num_images: usize) -> CreateListing {
        CreateListing {
            caller,
            title: "Beautiful Modern Villa".parse().unwrap(),
            description: "Describe the property...".parse().unwrap(),
            status: Status::ForSale,
            price: "25000000".parse().unwrap(),
            location: "Budhanilkantha, Kathmandu".parse().unwrap(),
            attributes: Attributes::House(Residence {
                beds: 4,
                baths: 3,
                sqft: 2400,
                facilities: vec!["Parking".parse().unwrap()],
            }),
            images: (0..num_images)
                .map(|_| media::Image(vec![0_u8; 16]))
                .collect(),
            owner: crate::domain::listing::OwnerSnapshot {
                name: "Ram Karki".parse().unwrap(),
                photo_url: None,
                phone: None,
            },
        }
    }

    #[tokio::test]
    async fn stores_listing_with_featured_first_image() {
        let db = Memory::new();
        let svc = service(db.clone(), SeqMedia::default());

        let created =
            svc.execute(command(caller("u1"), 3)).await.unwrap();

        assert_eq!(created.images.len(), 3);
        assert_eq!(created.images.featured().as_ref(), "https://img.test/0");
        assert_eq!(created.owner_id.as_ref(), "u1");

        let stored: Option<Listing> = db
            .execute(Select(By::new(created.id)))
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn rejects_image_count_out_of_bounds() {
        let svc = service(Memory::new(), SeqMedia::default());

        assert!(matches!(
            svc.execute(command(caller("u1"), 0)).await.unwrap_err().as_ref(),
            ExecutionError::WrongImagesCount(0),
        ));
        assert!(matches!(
            svc.execute(command(caller("u1"), 6)).await.unwrap_err().as_ref(),
            ExecutionError::WrongImagesCount(6),
        ));
    }

    #[tokio::test]
    async fn rejects_unverified_email() {
        let svc = service(Memory::new(), SeqMedia::default());
        let unverified = Caller {
            email_verified: false,
            ..caller("u1")
        };

        assert!(matches!(
            svc.execute(command(unverified, 1)).await.unwrap_err().as_ref(),
            ExecutionError::EmailNotVerified,
        ));
    }

    #[tokio::test]
    async fn failed_upload_aborts_whole_creation() {
        let db = Memory::new();
        let svc = service(db.clone(), BrokenMedia);

        assert!(svc.execute(command(caller("u1"), 3)).await.is_err());

        let stored: Vec<Listing> =
            db.execute(Select(By::new(()))).await.unwrap();
        assert!(stored.is_empty());
    }
}
