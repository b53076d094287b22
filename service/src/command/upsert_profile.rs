//! [`Command`] for creating or updating a [`User`] profile.

use common::{
    operations::{By, Insert, Select, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{user, Caller, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating or updating a [`User`] profile.
///
/// A profile may only ever be written by its own [`Caller`]: the document
/// ID is the caller's ID, so there's nothing to authorize beyond
/// authentication itself.
#[derive(Clone, Debug)]
pub struct UpsertProfile {
    /// [`Caller`] whose profile is written.
    pub caller: Caller,

    /// [`Patch`] to apply (or to create the profile from).
    ///
    /// [`Patch`]: user::Patch
    pub patch: user::Patch,
}

impl<Db, M> Command<UpsertProfile> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Insert<User>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<User>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpsertProfile,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpsertProfile { caller, patch } = cmd;

        let existing = self
            .database
            .execute(Select(By::<Option<User>, _>::new(caller.id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if let Some(mut user) = existing {
            patch.apply(&mut user);
            self.database
                .execute(Update(user.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            return Ok(user);
        }

        let user::Patch {
            name,
            email,
            phone,
            photo_url,
            role,
        } = patch;

        let user = User {
            id: caller.id,
            name: name.ok_or(E::MissingName).map_err(tracerr::wrap!())?,
            email,
            phone,
            photo_url,
            role: role.unwrap_or(user::Role::User),
            created_at: DateTime::now().coerce(),
        };

        self.database
            .execute(Insert(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::info!(id = %user.id, "profile created");

        Ok(user)
    }
}

/// Error of [`UpsertProfile`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Registration without a display name.
    #[display("cannot create a profile without a `Name`")]
    MissingName,
}
