//! [`Query`] collection related to multiple [`Listing`]s.

use common::operations::{By, Select};
use derive_more::From;
use tracerr::Traced;

use crate::{
    domain::{user, Listing},
    infra::{database, Database},
    read, Service,
};

use super::Query;

/// Queries the [`Listing`]s matching the provided [`Criteria`], newest
/// first.
///
/// The whole collection is fetched from the store and filtered in memory
/// by the [`Criteria`] engine.
///
/// [`Criteria`]: read::listing::Criteria
#[derive(Clone, Debug, From)]
pub struct Filtered(pub read::listing::Criteria);

impl<Db, M> Query<Filtered> for Service<Db, M>
where
    Db: Database<
        Select<By<Vec<Listing>, ()>>,
        Ok = Vec<Listing>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Filtered(criteria): Filtered,
    ) -> Result<Self::Ok, Self::Err> {
        let all = self
            .database()
            .execute(Select(By::<Vec<Listing>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(criteria.apply(all))
    }
}

/// Queries the [`Listing`]s owned by the provided [`User`], newest first.
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug, From)]
pub struct ByOwner(pub user::Id);

impl<Db, M> Query<ByOwner> for Service<Db, M>
where
    Db: Database<
        Select<By<Vec<Listing>, ()>>,
        Ok = Vec<Listing>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ByOwner(owner_id): ByOwner,
    ) -> Result<Self::Ok, Self::Err> {
        let mut mine: Vec<_> = self
            .database()
            .execute(Select(By::<Vec<Listing>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .filter(|l| l.owner_id == owner_id)
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(mine)
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
            user, Listing,
        },
        infra::{Database as _, Memory},
        read, Config, Query as _, Service,
    };

    use super::{ByOwner, Filtered};

    fn service(db: Memory) -> Service<Memory, ()> {
        Service::new(
            Config {
                jwt_decoding_key: DecodingKey::from_secret(b"test-secret"),
            },
            db,
            (),
        )
    }

    fn listing(owner: &str, status: Status, created_at: &str) -> Listing {
        Listing {
            id: crate::domain::listing::Id::new(),
            title: "Beautiful Modern Villa".parse().unwrap(),
            description: "Describe the property...".parse().unwrap(),
            status,
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
            created_at: DateTime::from_rfc3339(created_at).unwrap().coerce(),
        }
    }

    #[tokio::test]
    async fn filters_and_orders_newest_first() {
        let db = Memory::new();
        let old =
            listing("u1", Status::ForSale, "2024-01-01T00:00:00Z");
        let new =
            listing("u2", Status::ForSale, "2024-06-01T00:00:00Z");
        let rented =
            listing("u1", Status::ForRent, "2024-03-01T00:00:00Z");
        for l in [&old, &new, &rented] {
            db.execute(Insert(l.clone())).await.unwrap();
        }

        let found = service(db)
            .execute(Filtered(read::listing::Criteria {
                status: Some(Status::ForSale),
                ..read::listing::Criteria::default()
            }))
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, new.id);
        assert_eq!(found[1].id, old.id);
    }

    #[tokio::test]
    async fn by_owner_returns_only_own_listings() {
        let db = Memory::new();
        let mine =
            listing("u1", Status::ForSale, "2024-01-01T00:00:00Z");
        let foreign =
            listing("u2", Status::ForSale, "2024-06-01T00:00:00Z");
        for l in [&mine, &foreign] {
            db.execute(Insert(l.clone())).await.unwrap();
        }

        let found = service(db)
            .execute(ByOwner(user::Id::new("u1").unwrap()))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, mine.id);
    }
}
