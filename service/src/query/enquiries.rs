//! [`Query`] collection related to multiple [`Enquiry`]s.

use common::operations::{By, Select};
use derive_more::From;
use tracerr::Traced;

use crate::{
    domain::{user, Enquiry},
    infra::{database, Database},
    Service,
};

use super::Query;

/// Queries the [`Enquiry`]s addressed to the provided recipient, newest
/// first.
#[derive(Clone, Debug, From)]
pub struct ByRecipient(pub user::Id);

impl<Db, M> Query<ByRecipient> for Service<Db, M>
where
    Db: Database<
        Select<By<Vec<Enquiry>, user::Id>>,
        Ok = Vec<Enquiry>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Enquiry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ByRecipient(recipient_id): ByRecipient,
    ) -> Result<Self::Ok, Self::Err> {
        let mut enquiries = self
            .database()
            .execute(Select(By::<Vec<Enquiry>, _>::new(recipient_id)))
            .await
            .map_err(tracerr::wrap!())?;
        enquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(enquiries)
    }
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, DateTime};
    use jsonwebtoken::DecodingKey;

    use crate::{
        domain::{enquiry, user, Enquiry},
        infra::{Database as _, Memory},
        Config, Query as _, Service,
    };

    use super::ByRecipient;

    fn service(db: Memory) -> Service<Memory, ()> {
        Service::new(
            Config {
                jwt_decoding_key: DecodingKey::from_secret(b"test-secret"),
            },
            db,
            (),
        )
    }

    fn enquiry(recipient: &str, created_at: &str) -> Enquiry {
        Enquiry {
            id: enquiry::Id::new(),
            recipient_id: user::Id::new(recipient).unwrap(),
            sender_name: "Sita Rai".parse().unwrap(),
            sender_email: "sita@example.com".parse().unwrap(),
            sender_phone: "9800000000".parse().unwrap(),
            message: "Is the price negotiable?".parse().unwrap(),
            property_id: crate::domain::listing::Id::new(),
            property_title: "Beautiful Modern Villa".parse().unwrap(),
            read: false,
            created_at: DateTime::from_rfc3339(created_at).unwrap().coerce(),
        }
    }

    #[tokio::test]
    async fn returns_only_own_enquiries_newest_first() {
        let db = Memory::new();
        let old = enquiry("u1", "2024-01-01T00:00:00Z");
        let new = enquiry("u1", "2024-06-01T00:00:00Z");
        let foreign = enquiry("u2", "2024-03-01T00:00:00Z");
        for e in [&old, &new, &foreign] {
            db.execute(Insert(e.clone())).await.unwrap();
        }

        let found = service(db)
            .execute(ByRecipient(user::Id::new("u1").unwrap()))
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, new.id);
        assert_eq!(found[1].id, old.id);
    }
}
