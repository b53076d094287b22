//! [`Command`] for deleting a [`Listing`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{listing, Caller, Listing},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Listing`].
///
/// Deletion is permanent removal from the store: no soft-delete, no
/// versioning. Repeating it for the same ID reports the listing as missing
/// every time, with no further side effect.
#[derive(Clone, Debug)]
pub struct DeleteListing {
    /// [`Caller`] performing the deletion.
    pub caller: Caller,

    /// ID of the [`Listing`] to delete.
    pub id: listing::Id,
}

impl<Db, M> Command<DeleteListing> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Listing>, listing::Id>>,
            Ok = Option<Listing>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Listing, listing::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteListing,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteListing { caller, id } = cmd;

        let listing = self
            .database
            .execute(Select(By::<Option<Listing>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(id))
            .map_err(tracerr::wrap!())?;

        if !caller.can_mutate(&listing.owner_id) {
            return Err(tracerr::new!(E::Forbidden(id)));
        }

        self.database
            .execute(Delete(By::<Listing, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::info!(id = %id, "listing deleted");

        Ok(())
    }
}

/// Error of [`DeleteListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Caller`] is neither the owner nor an administrator.
    #[display("`Caller` is not allowed to mutate `Listing(id: {_0})`")]
    Forbidden(#[error(not(source))] listing::Id),

    /// [`Listing`] doesn't exist.
    #[display("`Listing(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] listing::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        DateTime,
    };
    use jsonwebtoken::DecodingKey;

    use crate::{
        domain::{
            listing::{
                Attributes, Images, OwnerSnapshot, Residence, Status,
            },
            user, Caller, Listing,
        },
        infra::{Database as _, Memory},
        Command as _, Config, Service,
    };

    use super::{DeleteListing, ExecutionError};

    fn service(db: Memory) -> Service<Memory, ()> {
        Service::new(
            Config {
                jwt_decoding_key: DecodingKey::from_secret(b"test-secret"),
            },
            db,
            (),
        )
    }

    fn caller(uid: &str, is_admin: bool) -> Caller {
        Caller {
            id: user::Id::new(uid).unwrap(),
            is_admin,
            email_verified: true,
        }
    }

    fn listing(owner: &str) -> Listing {
        Listing {
            id: crate::domain::listing::Id::new(),
            title: "Beautiful Modern Villa".parse().unwrap(),
            description: "Describe the property...".parse().unwrap(),
            status: Status::ForSale,
            price: "25000000".parse().unwrap(),
            location: "Budhanilkantha, Kathmandu".parse().unwrap(),
            attributes: Attributes::House(Residence {
                beds: 4,
                baths: 3,
                sqft: 2400,
                facilities: vec![],
            }),
            images: Images::new(vec![
                "https://img.test/a".parse().unwrap(),
            ])
            .unwrap(),
            owner_id: user::Id::new(owner).unwrap(),
            owner: OwnerSnapshot {
                name: "Ram Karki".parse().unwrap(),
                photo_url: None,
                phone: None,
            },
            created_at: DateTime::now().coerce(),
        }
    }

    #[tokio::test]
    async fn owner_deletes_and_repeat_reports_missing() {
        let db = Memory::new();
        let stored = listing("u1");
        db.execute(Insert(stored.clone())).await.unwrap();
        let svc = service(db.clone());

        svc.execute(DeleteListing {
            caller: caller("u1", false),
            id: stored.id,
        })
        .await
        .unwrap();

        let found: Option<Listing> =
            db.execute(Select(By::new(stored.id))).await.unwrap();
        assert!(found.is_none());

        let err = svc
            .execute(DeleteListing {
                caller: caller("u1", false),
                id: stored.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NotExists(_)));
    }

    #[tokio::test]
    async fn admin_deletes_foreign_listing() {
        let db = Memory::new();
        let stored = listing("u1");
        db.execute(Insert(stored.clone())).await.unwrap();

        assert!(service(db)
            .execute(DeleteListing {
                caller: caller("root", true),
                id: stored.id,
            })
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn stranger_is_forbidden() {
        let db = Memory::new();
        let stored = listing("u1");
        db.execute(Insert(stored.clone())).await.unwrap();

        let err = service(db.clone())
            .execute(DeleteListing {
                caller: caller("u2", false),
                id: stored.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::Forbidden(_)));

        let found: Option<Listing> =
            db.execute(Select(By::new(stored.id))).await.unwrap();
        assert!(found.is_some());
    }
}
