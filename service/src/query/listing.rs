//! [`Query`] collection related to a single [`Listing`].

use common::operations::{By, Select};
use derive_more::From;
use tracerr::Traced;

use crate::{
    domain::{listing, user, Listing, User},
    infra::{database, Database},
    read, Service,
};

use super::Query;

/// Queries a single [`Listing`] with its owner contact details resolved.
///
/// Loads the owner's live [`User`] record and merges it over the
/// denormalized snapshot stored on the listing, so a renamed owner shows
/// their current name while a deleted one still shows the snapshot.
#[derive(Clone, Copy, Debug, From)]
pub struct ById(pub listing::Id);

impl<Db, M> Query<ById> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Listing>, listing::Id>>,
            Ok = Option<Listing>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<read::listing::WithOwner>;
    type Err = Traced<database::Error>;

    async fn execute(&self, ById(id): ById) -> Result<Self::Ok, Self::Err> {
        let Some(listing) = self
            .database()
            .execute(Select(By::<Option<Listing>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let live = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(
                listing.owner_id.clone(),
            )))
            .await
            .map_err(tracerr::wrap!())?;

        let owner =
            read::listing::OwnerContact::merge(&listing.owner, live.as_ref());

        Ok(Some(read::listing::WithOwner { listing, owner }))
    }
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, DateTime};
    use jsonwebtoken::DecodingKey;

    use crate::{
        domain::{
            listing::{
                Attributes, Images, OwnerSnapshot, Residence, Status,
            },
            user, Listing, User,
        },
        infra::{Database as _, Memory},
        Config, Query as _, Service,
    };

    use super::ById;

    fn service(db: Memory) -> Service<Memory, ()> {
        Service::new(
            Config {
                jwt_decoding_key: DecodingKey::from_secret(b"test-secret"),
            },
            db,
            (),
        )
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
                phone: Some("9800000000".parse().unwrap()),
            },
            created_at: DateTime::now().coerce(),
        }
    }

    #[tokio::test]
    async fn merges_live_owner_record() {
        let db = Memory::new();
        let stored = listing("u1");
        db.execute(Insert(stored.clone())).await.unwrap();
        db.execute(Insert(User {
            id: user::Id::new("u1").unwrap(),
            name: "Shyam Shrestha".parse().unwrap(),
            email: Some("shyam@example.com".parse().unwrap()),
            phone: None,
            photo_url: None,
            role: user::Role::Agent,
            created_at: DateTime::now().coerce(),
        }))
        .await
        .unwrap();

        let found = service(db)
            .execute(ById(stored.id))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.owner.name.as_ref(), "Shyam Shrestha");
        assert_eq!(found.owner.phone.unwrap().as_ref(), "9800000000");
        assert_eq!(found.owner.role, user::Role::Agent);
    }

    #[tokio::test]
    async fn falls_back_to_snapshot_without_live_record() {
        let db = Memory::new();
        let stored = listing("gone");
        db.execute(Insert(stored.clone())).await.unwrap();

        let found = service(db)
            .execute(ById(stored.id))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.owner.name.as_ref(), "Ram Karki");
        assert_eq!(found.owner.role, user::Role::User);
        assert!(found.owner.email.is_none());
    }

    #[tokio::test]
    async fn missing_listing_yields_none() {
        let found = service(Memory::new())
            .execute(ById(crate::domain::listing::Id::new()))
            .await
            .unwrap();

        assert!(found.is_none());
    }
}
