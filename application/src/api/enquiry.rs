//! [`Enquiry`]-related API definitions.
//!
//! [`Enquiry`]: service::domain::Enquiry

use axum::{extract::Path, Extension, Json};
use common::Handler as _;
use serde::{Deserialize, Serialize};
use service::{command, domain::Enquiry, query};

use crate::{
    api::MessageBody, define_error, AsError, Context, Error, Service,
};

/// One enquiry notification, as the UI consumes it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryBody {
    /// Opaque ID of the enquiry.
    id: String,

    /// ID of the recipient (the listing owner).
    recipient_id: String,

    /// Sender name.
    sender_name: String,

    /// Sender email.
    sender_email: String,

    /// Sender phone.
    sender_phone: String,

    /// Free-text message.
    message: String,

    /// ID of the property the enquiry is about.
    property_id: String,

    /// Title of that property.
    property_title: String,

    /// Whether the recipient has seen the enquiry.
    read: bool,

    /// RFC 3339 creation timestamp.
    created_at: String,
}

impl From<Enquiry> for EnquiryBody {
    fn from(enquiry: Enquiry) -> Self {
        Self {
            id: enquiry.id.to_string(),
            recipient_id: enquiry.recipient_id.to_string(),
            sender_name: enquiry.sender_name.to_string(),
            sender_email: enquiry.sender_email.to_string(),
            sender_phone: enquiry.sender_phone.to_string(),
            message: enquiry.message.to_string(),
            property_id: enquiry.property_id.to_string(),
            property_title: enquiry.property_title.to_string(),
            read: enquiry.read,
            created_at: enquiry.created_at.to_rfc3339(),
        }
    }
}

/// JSON body of the `POST /api/enquiries` request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
    /// ID of the recipient (the listing owner).
    recipient_id: String,

    /// Sender name.
    sender_name: String,

    /// Sender email.
    sender_email: String,

    /// Sender phone.
    sender_phone: String,

    /// Free-text message.
    message: String,

    /// ID of the property the enquiry is about.
    property_id: String,

    /// Title of that property.
    property_title: String,
}

/// `POST /api/enquiries` handler.
///
/// Public: the enquiry form requires no account at all.
pub async fn create(
    Extension(service): Extension<Service>,
    Json(body): Json<CreateBody>,
) -> Result<(http::StatusCode, Json<MessageBody>), Error> {
    let cmd = command::CreateEnquiry {
        recipient_id: body
            .recipient_id
            .parse()
            .map_err(|e| Error::invalid_field("recipientId", e))?,
        sender_name: body
            .sender_name
            .parse()
            .map_err(|e| Error::invalid_field("senderName", e))?,
        sender_email: body
            .sender_email
            .parse()
            .map_err(|e| Error::invalid_field("senderEmail", e))?,
        sender_phone: body
            .sender_phone
            .parse()
            .map_err(|e| Error::invalid_field("senderPhone", e))?,
        message: body
            .message
            .parse()
            .map_err(|e| Error::invalid_field("message", e))?,
        property_id: body
            .property_id
            .parse()
            .map_err(|_| Error::invalid_field("propertyId", "malformed"))?,
        property_title: body
            .property_title
            .parse()
            .map_err(|e| Error::invalid_field("propertyTitle", e))?,
    };

    drop(service.execute(cmd).await.map_err(AsError::into_error)?);

    Ok((
        http::StatusCode::CREATED,
        Json(MessageBody {
            message: "Enquiry sent successfully",
        }),
    ))
}

/// `GET /api/notifications` handler.
///
/// Returns the authenticated caller's enquiries, newest first.
pub async fn list(ctx: Context) -> Result<Json<Vec<EnquiryBody>>, Error> {
    let caller = ctx.current_caller().await?;

    let enquiries = ctx
        .service()
        .execute(query::enquiries::ByRecipient(caller.id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(enquiries.into_iter().map(Into::into).collect()))
}

/// `POST /api/notifications/{id}/read` handler.
///
/// Flips the `read` flag; repeating it is a no-op.
pub async fn mark_read(
    ctx: Context,
    Path(id): Path<String>,
) -> Result<Json<EnquiryBody>, Error> {
    let caller = ctx.current_caller().await?;
    let id = id
        .parse()
        .map_err(|_| Error::from(EnquiryError::NotFound))?;

    let enquiry = ctx
        .service()
        .execute(command::MarkEnquiryRead { caller, id })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(enquiry.into()))
}

impl AsError for command::mark_enquiry_read::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::mark_enquiry_read::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::Forbidden(_) => Some(EnquiryError::Forbidden.into()),
            E::NotExists(_) => Some(EnquiryError::NotFound.into()),
        }
    }
}

define_error! {
    enum EnquiryError {
        #[code = "FORBIDDEN"]
        #[status = FORBIDDEN]
        #[message = "Only the recipient may read this notification"]
        Forbidden,

        #[code = "NOTIFICATION_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Notification not found"]
        NotFound,
    }
}
