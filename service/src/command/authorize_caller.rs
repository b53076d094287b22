//! [`Command`] for resolving a [`Caller`] from a bearer token.

use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

use crate::{
    domain::{
        caller::{Claims, Token},
        user, Caller,
    },
    Service,
};

use super::Command;

/// [`Command`] for resolving a [`Caller`] from a bearer token.
///
/// This is the Identity Verifier boundary: a request failing here is an
/// authentication failure, reported before any ownership rule is ever
/// consulted.
#[derive(Clone, Debug, From)]
pub struct AuthorizeCaller {
    /// Bearer [`Token`] to verify.
    pub token: Token,
}

impl<Db, M> Command<AuthorizeCaller> for Service<Db, M> {
    type Ok = Caller;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeCaller,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeCaller { token } = cmd;

        let claims = jsonwebtoken::decode::<Claims>(
            token.as_ref(),
            &self.config.jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        let id = user::Id::new(claims.sub)
            .ok_or(E::InvalidSubject)
            .map_err(tracerr::wrap!())?;

        Ok(Caller {
            id,
            is_admin: claims.admin,
            email_verified: claims.email_verified,
        })
    }
}

/// Error of [`AuthorizeCaller`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    #[from]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// Token subject is not a valid [`user::Id`].
    #[display("Token subject is not a valid `user::Id`")]
    InvalidSubject,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use jsonwebtoken::{DecodingKey, EncodingKey, Header};

    use crate::{
        domain::caller::{Claims, Token},
        infra::Memory,
        Command as _, Config, Service,
    };

    use super::AuthorizeCaller;

    const SECRET: &[u8] = b"test-secret";

    fn service() -> Service<Memory, ()> {
        Service::new(
            Config {
                jwt_decoding_key: DecodingKey::from_secret(SECRET),
            },
            Memory::new(),
            (),
        )
    }

    fn token(claims: &Claims, secret: &[u8]) -> Token {
        jsonwebtoken::encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
        .parse()
        .unwrap()
    }

    fn claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_owned(),
            admin: false,
            email_verified: true,
            exp: (DateTime::now() + Duration::from_secs(3600))
                .unix_timestamp(),
        }
    }

    #[tokio::test]
    async fn resolves_valid_token() {
        let caller = service()
            .execute(AuthorizeCaller {
                token: token(&claims("u1"), SECRET),
            })
            .await
            .unwrap();

        assert_eq!(caller.id.as_ref(), "u1");
        assert!(!caller.is_admin);
        assert!(caller.email_verified);
    }

    #[tokio::test]
    async fn resolves_admin_claim() {
        let caller = service()
            .execute(AuthorizeCaller {
                token: token(
                    &Claims {
                        admin: true,
                        ..claims("root")
                    },
                    SECRET,
                ),
            })
            .await
            .unwrap();

        assert!(caller.is_admin);
    }

    #[tokio::test]
    async fn rejects_wrong_signature() {
        assert!(service()
            .execute(AuthorizeCaller {
                token: token(&claims("u1"), b"other-secret"),
            })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let expired = Claims {
            exp: (DateTime::now() - Duration::from_secs(3600))
                .unix_timestamp(),
            ..claims("u1")
        };

        assert!(service()
            .execute(AuthorizeCaller {
                token: token(&expired, SECRET),
            })
            .await
            .is_err());
    }
}
