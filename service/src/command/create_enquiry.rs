//! [`Command`] for creating a new [`Enquiry`].

use common::{operations::Insert, DateTime};
use tracerr::Traced;

use crate::{
    domain::{
        enquiry::{self, Message, SenderEmail, SenderName, SenderPhone},
        listing, user, Enquiry,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Enquiry`].
///
/// The only write an anonymous visitor may perform: no authentication is
/// required, matching the public enquiry form.
#[derive(Clone, Debug)]
pub struct CreateEnquiry {
    /// ID of the [`User`] receiving the [`Enquiry`].
    ///
    /// [`User`]: crate::domain::User
    pub recipient_id: user::Id,

    /// [`SenderName`] of the [`Enquiry`].
    pub sender_name: SenderName,

    /// [`SenderEmail`] of the [`Enquiry`].
    pub sender_email: SenderEmail,

    /// [`SenderPhone`] of the [`Enquiry`].
    pub sender_phone: SenderPhone,

    /// [`Message`] of the [`Enquiry`].
    pub message: Message,

    /// ID of the [`Listing`] the [`Enquiry`] is about.
    ///
    /// [`Listing`]: crate::domain::Listing
    pub property_id: listing::Id,

    /// Title of that [`Listing`], denormalized onto the [`Enquiry`].
    ///
    /// [`Listing`]: crate::domain::Listing
    pub property_title: listing::Title,
}

impl<Db, M> Command<CreateEnquiry> for Service<Db, M>
where
    Db: Database<Insert<Enquiry>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Enquiry;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateEnquiry,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateEnquiry {
            recipient_id,
            sender_name,
            sender_email,
            sender_phone,
            message,
            property_id,
            property_title,
        } = cmd;

        let enquiry = Enquiry {
            id: enquiry::Id::new(),
            recipient_id,
            sender_name,
            sender_email,
            sender_phone,
            message,
            property_id,
            property_title,
            read: false,
            created_at: DateTime::now().coerce(),
        };

        self.database
            .execute(Insert(enquiry.clone()))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(enquiry)
    }
}

/// Error of [`CreateEnquiry`] [`Command`] execution.
pub type ExecutionError = database::Error;
