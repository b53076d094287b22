//! In-memory [`Database`] implementation.
//!
//! One [`HashMap`] per collection behind a [`tokio::sync::RwLock`]: reads
//! take the shared lock, mutations the exclusive one. State lives only as
//! long as the process, which is what local development and tests need.

use std::{collections::HashMap, sync::Arc};

use common::operations::{By, Delete, Insert, Select, Update};
use derive_more::{Display, Error as StdError};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::{enquiry, listing, user, Enquiry, Listing, User},
    infra::{database, Database},
};

/// In-memory [`Database`].
///
/// Cheaply cloneable: clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Shared collections of this [`Memory`] database.
    state: Arc<RwLock<State>>,
}

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Collections of a [`Memory`] database.
#[derive(Debug, Default)]
struct State {
    /// `properties` collection.
    listings: HashMap<listing::Id, Listing>,

    /// `users` collection.
    users: HashMap<user::Id, User>,

    /// `notifications` collection.
    enquiries: HashMap<enquiry::Id, Enquiry>,
}

/// [`Memory`] database error.
#[derive(Clone, Debug, Display, StdError)]
pub enum Error {
    /// Document with the same ID is already stored.
    #[display("document `{id}` already exists in `{collection}`")]
    AlreadyExists {
        /// Collection the document belongs to.
        collection: &'static str,

        /// ID of the document.
        id: String,
    },

    /// Document to mutate is not stored.
    #[display("document `{id}` does not exist in `{collection}`")]
    NotExists {
        /// Collection the document belongs to.
        collection: &'static str,

        /// ID of the document.
        id: String,
    },
}

impl Database<Select<By<Option<Listing>, listing::Id>>> for Memory {
    type Ok = Option<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state.read().await.listings.get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<Vec<Listing>, ()>>> for Memory {
    type Ok = Vec<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<Listing>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state.read().await.listings.values().cloned().collect())
    }
}

impl Database<Insert<Listing>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(listing): Insert<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state.write().await;
        if state.listings.contains_key(&listing.id) {
            return Err(tracerr::new!(database::Error::Memory(
                Error::AlreadyExists {
                    collection: "properties",
                    id: listing.id.to_string(),
                }
            )));
        }
        drop(state.listings.insert(listing.id, listing));
        Ok(())
    }
}

impl Database<Update<Listing>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(listing): Update<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state.write().await;
        if !state.listings.contains_key(&listing.id) {
            return Err(tracerr::new!(database::Error::Memory(
                Error::NotExists {
                    collection: "properties",
                    id: listing.id.to_string(),
                }
            )));
        }
        drop(state.listings.insert(listing.id, listing));
        Ok(())
    }
}

impl Database<Delete<By<Listing, listing::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Listing, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.state
            .write()
            .await
            .listings
            .remove(&id)
            .map(drop)
            .ok_or_else(|| {
                tracerr::new!(database::Error::Memory(Error::NotExists {
                    collection: "properties",
                    id: id.to_string(),
                }))
            })
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state.read().await.users.get(&by.into_inner()).cloned())
    }
}

impl Database<Insert<User>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state.write().await;
        if state.users.contains_key(&user.id) {
            return Err(tracerr::new!(database::Error::Memory(
                Error::AlreadyExists {
                    collection: "users",
                    id: user.id.to_string(),
                }
            )));
        }
        drop(state.users.insert(user.id.clone(), user));
        Ok(())
    }
}

impl Database<Update<User>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(user): Update<User>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user.id) {
            return Err(tracerr::new!(database::Error::Memory(
                Error::NotExists {
                    collection: "users",
                    id: user.id.to_string(),
                }
            )));
        }
        drop(state.users.insert(user.id.clone(), user));
        Ok(())
    }
}

impl Database<Select<By<Option<Enquiry>, enquiry::Id>>> for Memory {
    type Ok = Option<Enquiry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Enquiry>, enquiry::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state.read().await.enquiries.get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<Vec<Enquiry>, user::Id>>> for Memory {
    type Ok = Vec<Enquiry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Enquiry>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let recipient_id = by.into_inner();
        Ok(self
            .state
            .read()
            .await
            .enquiries
            .values()
            .filter(|e| e.recipient_id == recipient_id)
            .cloned()
            .collect())
    }
}

impl Database<Insert<Enquiry>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(enquiry): Insert<Enquiry>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state.write().await;
        if state.enquiries.contains_key(&enquiry.id) {
            return Err(tracerr::new!(database::Error::Memory(
                Error::AlreadyExists {
                    collection: "notifications",
                    id: enquiry.id.to_string(),
                }
            )));
        }
        drop(state.enquiries.insert(enquiry.id, enquiry));
        Ok(())
    }
}

impl Database<Update<Enquiry>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(enquiry): Update<Enquiry>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state.write().await;
        if !state.enquiries.contains_key(&enquiry.id) {
            return Err(tracerr::new!(database::Error::Memory(
                Error::NotExists {
                    collection: "notifications",
                    id: enquiry.id.to_string(),
                }
            )));
        }
        drop(state.enquiries.insert(enquiry.id, enquiry));
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Delete, Insert, Select, Update},
        DateTime,
    };

    use crate::{
        domain::{
            listing::{
                Attributes, Images, OwnerSnapshot, Residence, Status,
            },
            user, Listing,
        },
        infra::Database as _,
    };

    use super::Memory;

    fn listing() -> Listing {
        Listing {
            id: crate::domain::listing::Id::new(),
            title: "Villa".parse().unwrap(),
            description: "Bright.".parse().unwrap(),
            status: Status::ForSale,
            price: "5000000".parse().unwrap(),
            location: "Kathmandu".parse().unwrap(),
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
            owner_id: user::Id::new("owner-1").unwrap(),
            owner: OwnerSnapshot {
                name: "Ram Karki".parse().unwrap(),
                photo_url: None,
                phone: None,
            },
            created_at: DateTime::now().coerce(),
        }
    }

    #[tokio::test]
    async fn insert_select_update_delete() {
        let db = Memory::new();
        let mut stored = listing();

        db.execute(Insert(stored.clone())).await.unwrap();
        let found: Option<Listing> =
            db.execute(Select(By::new(stored.id))).await.unwrap();
        assert_eq!(found.unwrap().title, stored.title);

        stored.title = "Renamed Villa".parse().unwrap();
        db.execute(Update(stored.clone())).await.unwrap();
        let found: Option<Listing> =
            db.execute(Select(By::new(stored.id))).await.unwrap();
        assert_eq!(found.unwrap().title.as_ref(), "Renamed Villa");

        db.execute(Delete(By::<Listing, _>::new(stored.id)))
            .await
            .unwrap();
        let found: Option<Listing> =
            db.execute(Select(By::new(stored.id))).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let db = Memory::new();
        let stored = listing();

        db.execute(Insert(stored.clone())).await.unwrap();
        assert!(db.execute(Insert(stored)).await.is_err());
    }

    #[tokio::test]
    async fn deleting_missing_document_fails() {
        let db = Memory::new();

        assert!(db
            .execute(Delete(By::<Listing, _>::new(
                crate::domain::listing::Id::new()
            )))
            .await
            .is_err());
    }
}
