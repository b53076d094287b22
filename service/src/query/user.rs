//! [`Query`] collection related to a single [`User`].

use common::operations::By;

use crate::domain::user;
#[cfg(doc)]
use crate::{domain::User, Query};

use super::DatabaseQuery;

/// Queries a [`User`] profile by its ID.
pub type ById = DatabaseQuery<By<Option<crate::domain::User>, user::Id>>;
