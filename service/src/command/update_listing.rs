//! [`Command`] for updating an existing [`Listing`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{listing, Caller, Listing},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Listing`].
///
/// Applies a partial field merge: only the fields supplied by the
/// [`Patch`] change, omitted ones keep their prior value.
///
/// [`Patch`]: listing::Patch
#[derive(Clone, Debug)]
pub struct UpdateListing {
    /// [`Caller`] performing the update.
    pub caller: Caller,

    /// ID of the [`Listing`] to update.
    pub id: listing::Id,

    /// [`Patch`] to apply.
    ///
    /// [`Patch`]: listing::Patch
    pub patch: listing::Patch,
}

impl<Db, M> Command<UpdateListing> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Listing>, listing::Id>>,
            Ok = Option<Listing>,
            Err = Traced<database::Error>,
        > + Database<Update<Listing>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateListing,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateListing { caller, id, patch } = cmd;

        let mut listing = self
            .database
            .execute(Select(By::<Option<Listing>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(id))
            .map_err(tracerr::wrap!())?;

        if !caller.can_mutate(&listing.owner_id) {
            return Err(tracerr::new!(E::Forbidden(id)));
        }

        if let Some(attributes) = &patch.attributes {
            if attributes.kind() != listing.kind() {
                return Err(tracerr::new!(E::KindMismatch {
                    expected: listing.kind(),
                    provided: attributes.kind(),
                }));
            }
        }

        patch.apply(&mut listing);

        // Plain read-modify-write: two authorized callers updating the
        // same listing race with last-write-wins at the store.
        self.database
            .execute(Update(listing.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(listing)
    }
}

/// Error of [`UpdateListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Caller`] is neither the owner nor an administrator.
    #[display("`Caller` is not allowed to mutate `Listing(id: {_0})`")]
    Forbidden(#[error(not(source))] listing::Id),

    /// Supplied attributes describe a different [`Kind`] than the
    /// [`Listing`] has.
    ///
    /// [`Kind`]: listing::Kind
    #[display("`Listing` is a {expected}, not a {provided}")]
    KindMismatch {
        /// [`Kind`] the [`Listing`] has.
        ///
        /// [`Kind`]: listing::Kind
        expected: listing::Kind,

        /// [`Kind`] the supplied attributes describe.
        ///
        /// [`Kind`]: listing::Kind
        provided: listing::Kind,
    },

    /// [`Listing`] doesn't exist.
    #[display("`Listing(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] listing::Id),
}
