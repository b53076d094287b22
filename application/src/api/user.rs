//! [`User`]-related API definitions.
//!
//! [`User`]: service::domain::User

use axum::{extract::Multipart, Json};
use common::Handler as _;
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{user, User},
    infra::media,
    query,
};

use crate::{define_error, AsError, Context, Error};

/// One user profile document, as the UI consumes it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
    /// ID the identity provider issued for the user.
    uid: String,

    /// Display name.
    display_name: String,

    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,

    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,

    /// Profile photo URL.
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    photo_url: Option<String>,

    /// Self-declared role.
    role: user::Role,
}

impl From<User> for ProfileBody {
    fn from(user: User) -> Self {
        Self {
            uid: user.id.to_string(),
            display_name: user.name.to_string(),
            email: user.email.as_ref().map(ToString::to_string),
            phone_number: user.phone.as_ref().map(ToString::to_string),
            photo_url: user.photo_url.as_ref().map(ToString::to_string),
            role: user.role,
        }
    }
}

/// `GET /api/profile` handler.
///
/// Returns the authenticated caller's own profile document.
pub async fn find(ctx: Context) -> Result<Json<ProfileBody>, Error> {
    let caller = ctx.current_caller().await?;

    ctx.service()
        .execute(query::user::ById::by(caller.id))
        .await
        .map_err(AsError::into_error)?
        .map(|user| Json(user.into()))
        .ok_or_else(|| ProfileError::NotFound.into())
}

/// JSON body of the `PUT /api/profile` request.
///
/// Every field is optional: omitted fields keep their stored value. The
/// first write of a profile must carry at least a display name.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertBody {
    /// New display name.
    display_name: Option<String>,

    /// New email address.
    email: Option<String>,

    /// New phone number.
    phone_number: Option<String>,

    /// New profile photo URL.
    #[serde(rename = "photoURL")]
    photo_url: Option<String>,

    /// New self-declared role.
    role: Option<user::Role>,
}

/// `PUT /api/profile` handler.
///
/// Creates the caller's profile on first write, patches it afterwards.
/// Only the caller themselves can ever reach their own document.
pub async fn upsert(
    ctx: Context,
    Json(body): Json<UpsertBody>,
) -> Result<Json<ProfileBody>, Error> {
    let caller = ctx.current_caller().await?;

    let patch = user::Patch {
        name: body
            .display_name
            .map(|v| {
                v.parse().map_err(|e| Error::invalid_field("displayName", e))
            })
            .transpose()?,
        email: body
            .email
            .map(|v| v.parse().map_err(|e| Error::invalid_field("email", e)))
            .transpose()?,
        phone: body
            .phone_number
            .map(|v| {
                v.parse().map_err(|e| Error::invalid_field("phoneNumber", e))
            })
            .transpose()?,
        photo_url: body
            .photo_url
            .map(|v| {
                v.parse().map_err(|e| Error::invalid_field("photoURL", e))
            })
            .transpose()?,
        role: body.role,
    };

    let user = ctx
        .service()
        .execute(command::UpsertProfile { caller, patch })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(user.into()))
}

/// JSON body of the `POST /api/profile-photo` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoBody {
    /// URL of the stored photo.
    image_url: String,
}

/// `POST /api/profile-photo` handler.
///
/// Stores a single `image` multipart part through the media pipeline and
/// returns its public URL.
pub async fn upload_photo(
    ctx: Context,
    mut multipart: Multipart,
) -> Result<Json<PhotoBody>, Error> {
    drop(ctx.current_caller().await?);

    let mut image = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        Error::bad_request(format!("Malformed multipart body: {e}"))
    })? {
        if field.name() == Some("image") {
            let bytes = field.bytes().await.map_err(|e| {
                Error::bad_request(format!("Broken image upload: {e}"))
            })?;
            image = Some(media::Image(bytes.to_vec()));
            break;
        }
    }
    let image =
        image.ok_or_else(|| Error::bad_request("Image file is required."))?;

    let url = ctx
        .service()
        .execute(command::StoreImage { image })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(PhotoBody {
        image_url: url.to_string(),
    }))
}

impl AsError for command::upsert_profile::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::upsert_profile::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::MissingName => {
                Some(Error::invalid_field("displayName", "missing"))
            }
        }
    }
}

define_error! {
    enum ProfileError {
        #[code = "PROFILE_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Profile not found"]
        NotFound,
    }
}
