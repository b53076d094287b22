//! [`Caller`] definitions.

use derive_more::{AsRef, Display, FromStr};
use serde::{Deserialize, Serialize};

use crate::domain::user;

/// Identity of an authenticated request, resolved from a bearer [`Token`].
#[derive(Clone, Debug)]
pub struct Caller {
    /// ID of the [`User`] behind this [`Caller`].
    ///
    /// [`User`]: crate::domain::User
    pub id: user::Id,

    /// Indicator whether the identity provider marked this [`Caller`] as an
    /// administrator.
    pub is_admin: bool,

    /// Indicator whether this [`Caller`] has verified their email address.
    pub email_verified: bool,
}

impl Caller {
    /// Decides whether this [`Caller`] may mutate (update or delete) a
    /// document owned by the [`User`] with the given `owner_id`.
    ///
    /// True iff the [`Caller`] is the owner, or an administrator. Used
    /// identically for updates and deletions: there are no partial-edit
    /// rights.
    ///
    /// [`User`]: crate::domain::User
    #[must_use]
    pub fn can_mutate(&self, owner_id: &user::Id) -> bool {
        self.id == *owner_id || self.is_admin
    }
}

/// Bearer token carrying a [`Caller`] identity.
#[derive(AsRef, Clone, Debug, Display, FromStr)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`Token`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }
}

/// Payload of a [`Token`], as issued by the identity provider.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Claims {
    /// Subject the [`Token`] was issued for.
    pub sub: String,

    /// Indicator whether the subject is an administrator.
    #[serde(default)]
    pub admin: bool,

    /// Indicator whether the subject has verified their email address.
    #[serde(default)]
    pub email_verified: bool,

    /// Unix timestamp when the [`Token`] expires.
    pub exp: i64,
}

#[cfg(test)]
mod spec {
    use crate::domain::user;

    use super::Caller;

    fn id(s: &str) -> user::Id {
        user::Id::new(s).unwrap()
    }

    fn caller(uid: &str, is_admin: bool) -> Caller {
        Caller {
            id: id(uid),
            is_admin,
            email_verified: true,
        }
    }

    #[test]
    fn owner_can_mutate() {
        assert!(caller("u1", false).can_mutate(&id("u1")));
    }

    #[test]
    fn stranger_cannot_mutate() {
        assert!(!caller("u1", false).can_mutate(&id("u2")));
    }

    #[test]
    fn admin_can_mutate_anything() {
        assert!(caller("u1", true).can_mutate(&id("u2")));
        assert!(caller("u1", true).can_mutate(&id("u1")));
    }
}
