//! [`Command`] for marking an [`Enquiry`] as read.

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{enquiry, Caller, Enquiry},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking an [`Enquiry`] as read.
///
/// The only mutation an [`Enquiry`] ever sees. Only its recipient may
/// perform it, and repeating it is a no-op.
#[derive(Clone, Debug)]
pub struct MarkEnquiryRead {
    /// [`Caller`] marking the [`Enquiry`].
    pub caller: Caller,

    /// ID of the [`Enquiry`] to mark.
    pub id: enquiry::Id,
}

impl<Db, M> Command<MarkEnquiryRead> for Service<Db, M>
where
    Db: Database<
            Select<By<Option<Enquiry>, enquiry::Id>>,
            Ok = Option<Enquiry>,
            Err = Traced<database::Error>,
        > + Database<Update<Enquiry>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Enquiry;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: MarkEnquiryRead,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let MarkEnquiryRead { caller, id } = cmd;

        let mut enquiry = self
            .database
            .execute(Select(By::<Option<Enquiry>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(id))
            .map_err(tracerr::wrap!())?;

        if enquiry.recipient_id != caller.id {
            return Err(tracerr::new!(E::Forbidden(id)));
        }

        if enquiry.read {
            return Ok(enquiry);
        }

        enquiry.read = true;
        self.database
            .execute(Update(enquiry.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(enquiry)
    }
}

/// Error of [`MarkEnquiryRead`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Caller`] is not the recipient of the [`Enquiry`].
    #[display("`Caller` is not the recipient of `Enquiry(id: {_0})`")]
    Forbidden(#[error(not(source))] enquiry::Id),

    /// [`Enquiry`] doesn't exist.
    #[display("`Enquiry(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] enquiry::Id),
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, DateTime};
    use jsonwebtoken::DecodingKey;

    use crate::{
        domain::{enquiry, user, Caller, Enquiry},
        infra::{Database as _, Memory},
        Command as _, Config, Service,
    };

    use super::{ExecutionError, MarkEnquiryRead};

    fn service(db: Memory) -> Service<Memory, ()> {
        Service::new(
            Config {
                jwt_decoding_key: DecodingKey::from_secret(b"test-secret"),
            },
            db,
            (),
        )
    }

    fn caller(uid: &str) -> Caller {
        Caller {
            id: user::Id::new(uid).unwrap(),
            is_admin: false,
            email_verified: true,
        }
    }

    fn enquiry(recipient: &str) -> Enquiry {
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
            created_at: DateTime::now().coerce(),
        }
    }

    #[tokio::test]
    async fn recipient_marks_enquiry_read_idempotently() {
        let db = Memory::new();
        let stored = enquiry("u1");
        db.execute(Insert(stored.clone())).await.unwrap();
        let svc = service(db);

        let marked = svc
            .execute(MarkEnquiryRead {
                caller: caller("u1"),
                id: stored.id,
            })
            .await
            .unwrap();
        assert!(marked.read);

        let again = svc
            .execute(MarkEnquiryRead {
                caller: caller("u1"),
                id: stored.id,
            })
            .await
            .unwrap();
        assert!(again.read);
    }

    #[tokio::test]
    async fn non_recipient_is_forbidden() {
        let db = Memory::new();
        let stored = enquiry("u1");
        db.execute(Insert(stored.clone())).await.unwrap();

        let err = service(db)
            .execute(MarkEnquiryRead {
                caller: caller("u2"),
                id: stored.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Forbidden(_)));
    }
}
