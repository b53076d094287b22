//! [`Listing`]-related API definitions.
//!
//! [`Listing`]: service::domain::Listing

use std::{fmt, str::FromStr};

use axum::{
    extract::{Multipart, Path, Query},
    Extension, Json,
};
use common::{Handler as _, Price};
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{
        listing::{self, Attributes, Parcel, Residence},
        user, Caller, Listing,
    },
    infra::media,
    query, read,
};

use crate::{
    api::{CreatedBody, MessageBody},
    define_error, AsError, Context, Error, Service,
};

/// One property document, in the flat shape the UI consumes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingBody {
    /// Opaque ID of the listing.
    id: String,

    /// Listing title.
    title: String,

    /// Listing description.
    description: String,

    /// Kind of the property.
    property_type: listing::Kind,

    /// Commercial status of the listing.
    status: listing::Status,

    /// Price as the numeric string it was submitted as.
    price: String,

    /// Human-readable price ("2 Crore 50 Lakh").
    price_label: String,

    /// Free-text location.
    location: String,

    /// URL of the featured image (always `imageUrls[0]`).
    featured_image_url: String,

    /// Ordered image URLs.
    image_urls: Vec<String>,

    /// RFC 3339 creation timestamp.
    created_at: String,

    /// ID of the owning user.
    owner_id: String,

    /// Owner display name.
    owner_name: String,

    /// Owner photo URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_photo_url: Option<String>,

    /// Owner phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_phone_number: Option<String>,

    /// Owner email, resolved from the live user record only.
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_email: Option<String>,

    /// Owner role, resolved from the live user record only.
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_role: Option<user::Role>,

    /// Number of bedrooms (house/apartment only).
    #[serde(skip_serializing_if = "Option::is_none")]
    beds: Option<String>,

    /// Number of bathrooms (house/apartment only).
    #[serde(skip_serializing_if = "Option::is_none")]
    baths: Option<String>,

    /// Built area in square feet (house/apartment only).
    #[serde(skip_serializing_if = "Option::is_none")]
    sqft: Option<String>,

    /// Amenity tags (house/apartment only).
    #[serde(skip_serializing_if = "Option::is_none")]
    facilities: Option<Vec<String>>,

    /// Land area (land only).
    #[serde(skip_serializing_if = "Option::is_none")]
    land_area: Option<String>,

    /// Compass direction the parcel faces (land only).
    #[serde(skip_serializing_if = "Option::is_none")]
    land_face: Option<listing::LandFace>,

    /// Road access kind (land only).
    #[serde(skip_serializing_if = "Option::is_none")]
    road_access: Option<listing::RoadAccess>,

    /// Road width (land only).
    #[serde(skip_serializing_if = "Option::is_none")]
    road_width: Option<String>,
}

impl ListingBody {
    /// Builds a [`ListingBody`] from the given [`Listing`] and, when a
    /// single listing is read, its merged [`OwnerContact`].
    ///
    /// Without a contact the owner block falls back to the denormalized
    /// snapshot stored on the listing itself.
    ///
    /// [`OwnerContact`]: read::listing::OwnerContact
    fn new(
        listing: Listing,
        owner: Option<read::listing::OwnerContact>,
    ) -> Self {
        let mut body = Self {
            id: listing.id.to_string(),
            title: listing.title.to_string(),
            description: listing.description.to_string(),
            property_type: listing.kind(),
            status: listing.status,
            price: listing.price.to_string(),
            price_label: listing.price.label(),
            location: listing.location.to_string(),
            featured_image_url: listing.images.featured().to_string(),
            image_urls: listing
                .images
                .iter()
                .map(ToString::to_string)
                .collect(),
            created_at: listing.created_at.to_rfc3339(),
            owner_id: listing.owner_id.to_string(),
            owner_name: listing.owner.name.to_string(),
            owner_photo_url: listing
                .owner
                .photo_url
                .as_ref()
                .map(ToString::to_string),
            owner_phone_number: listing
                .owner
                .phone
                .as_ref()
                .map(ToString::to_string),
            owner_email: None,
            owner_role: None,
            beds: None,
            baths: None,
            sqft: None,
            facilities: None,
            land_area: None,
            land_face: None,
            road_access: None,
            road_width: None,
        };

        match &listing.attributes {
            Attributes::House(r) | Attributes::Apartment(r) => {
                body.beds = Some(r.beds.to_string());
                body.baths = Some(r.baths.to_string());
                body.sqft = Some(r.sqft.to_string());
                body.facilities = Some(
                    r.facilities.iter().map(ToString::to_string).collect(),
                );
            }
            Attributes::Land(p) => {
                body.land_area = Some(p.area.to_string());
                body.land_face = Some(p.face);
                body.road_access = Some(p.road_access);
                body.road_width = Some(p.road_width.to_string());
            }
        }

        if let Some(owner) = owner {
            body.owner_name = owner.name.to_string();
            body.owner_photo_url =
                owner.photo_url.as_ref().map(ToString::to_string);
            body.owner_phone_number =
                owner.phone.as_ref().map(ToString::to_string);
            body.owner_email = owner.email.as_ref().map(ToString::to_string);
            body.owner_role = Some(owner.role);
        }

        body
    }
}

impl From<Listing> for ListingBody {
    fn from(listing: Listing) -> Self {
        Self::new(listing, None)
    }
}

impl From<read::listing::WithOwner> for ListingBody {
    fn from(with_owner: read::listing::WithOwner) -> Self {
        Self::new(with_owner.listing, Some(with_owner.owner))
    }
}

/// Query parameters of the listing search.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Free-text term matched against title or description.
    query: Option<String>,

    /// Property kind to match exactly.
    #[serde(rename = "type")]
    kind: Option<String>,

    /// Location part matched case-insensitively.
    location: Option<String>,

    /// Commercial status to match exactly.
    status: Option<String>,

    /// Inclusive lower price bound.
    #[serde(rename = "minPrice")]
    min_price: Option<String>,

    /// Inclusive upper price bound.
    #[serde(rename = "maxPrice")]
    max_price: Option<String>,
}

impl TryFrom<ListParams> for read::listing::Criteria {
    type Error = Error;

    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        let ListParams {
            query,
            kind,
            location,
            status,
            min_price,
            max_price,
        } = params;

        Ok(Self {
            query: non_empty(query),
            kind: non_empty(kind)
                .map(|s| s.parse())
                .transpose()
                .map_err(|_| {
                    Error::invalid_field("type", "unknown property type")
                })?,
            location: non_empty(location),
            status: non_empty(status)
                .map(|s| s.parse())
                .transpose()
                .map_err(|_| {
                    Error::invalid_field("status", "unknown listing status")
                })?,
            min_price: non_empty(min_price)
                .map(|s| s.parse::<Price>())
                .transpose()
                .map_err(|e| Error::invalid_field("minPrice", e))?,
            max_price: non_empty(max_price)
                .map(|s| s.parse::<Price>())
                .transpose()
                .map_err(|e| Error::invalid_field("maxPrice", e))?,
        })
    }
}

/// Normalizes an optional query parameter: trims it and drops it entirely
/// when blank, the way the UI omits unused filters.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// `GET /api/properties` handler.
///
/// Public. Returns the listings matching the supplied filters, newest
/// first.
pub async fn list(
    Extension(service): Extension<Service>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ListingBody>>, Error> {
    let criteria = read::listing::Criteria::try_from(params)?;

    let listings = service
        .execute(query::listings::Filtered(criteria))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

/// `GET /api/properties/{id}` handler.
///
/// Public. Resolves the owner's live profile and merges it over the
/// snapshot stored on the listing.
pub async fn find(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<ListingBody>, Error> {
    let id = id
        .parse::<listing::Id>()
        .map_err(|_| Error::from(ListingError::NotFound))?;

    service
        .execute(query::listing::ById(id))
        .await
        .map_err(AsError::into_error)?
        .map(|found| Json(found.into()))
        .ok_or_else(|| ListingError::NotFound.into())
}

/// `GET /api/my-properties` handler.
///
/// Returns the authenticated caller's own listings, newest first.
pub async fn mine(ctx: Context) -> Result<Json<Vec<ListingBody>>, Error> {
    let caller = ctx.current_caller().await?;

    let listings = ctx
        .service()
        .execute(query::listings::ByOwner(caller.id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

/// `POST /api/properties` handler.
///
/// Multipart form: 1–5 `images` parts plus the listing fields.
pub async fn create(
    ctx: Context,
    mut multipart: Multipart,
) -> Result<(http::StatusCode, Json<CreatedBody>), Error> {
    let caller = ctx.current_caller().await?;

    let mut form = CreateForm::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        Error::bad_request(format!("Malformed multipart body: {e}"))
    })? {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };
        if name == "images" {
            let bytes = field.bytes().await.map_err(|e| {
                Error::bad_request(format!("Broken image upload: {e}"))
            })?;
            form.images.push(media::Image(bytes.to_vec()));
        } else {
            let value = field.text().await.map_err(|e| {
                Error::bad_request(format!("Broken form field `{name}`: {e}"))
            })?;
            form.set(&name, value);
        }
    }

    let listing = ctx
        .service()
        .execute(form.into_command(caller)?)
        .await
        .map_err(AsError::into_error)?;

    Ok((
        http::StatusCode::CREATED,
        Json(CreatedBody {
            message: "Property added successfully",
            id: listing.id.to_string(),
        }),
    ))
}

/// Accumulated fields of the `POST /api/properties` multipart form.
#[derive(Debug, Default)]
struct CreateForm {
    /// `title` field.
    title: Option<String>,

    /// `description` field.
    description: Option<String>,

    /// `propertyType` field.
    property_type: Option<String>,

    /// `status` field.
    status: Option<String>,

    /// `price` field.
    price: Option<String>,

    /// `location` field.
    location: Option<String>,

    /// `beds` field.
    beds: Option<String>,

    /// `baths` field.
    baths: Option<String>,

    /// `sqft` field.
    sqft: Option<String>,

    /// `landArea` field.
    land_area: Option<String>,

    /// `landFace` field.
    land_face: Option<String>,

    /// `roadAccess` field.
    road_access: Option<String>,

    /// `roadWidth` field.
    road_width: Option<String>,

    /// Repeated `facilities` fields.
    facilities: Vec<String>,

    /// `ownerName` field.
    owner_name: Option<String>,

    /// `ownerPhotoUrl` field.
    owner_photo_url: Option<String>,

    /// `ownerPhoneNumber` field.
    owner_phone_number: Option<String>,

    /// Repeated `images` parts.
    images: Vec<media::Image>,
}

impl CreateForm {
    /// Records the given text `value` under the form field `name`.
    ///
    /// Unknown fields are ignored.
    fn set(&mut self, name: &str, value: String) {
        match name {
            "title" => self.title = Some(value),
            "description" => self.description = Some(value),
            "propertyType" => self.property_type = Some(value),
            "status" => self.status = Some(value),
            "price" => self.price = Some(value),
            "location" => self.location = Some(value),
            "beds" => self.beds = Some(value),
            "baths" => self.baths = Some(value),
            "sqft" => self.sqft = Some(value),
            "landArea" => self.land_area = Some(value),
            "landFace" => self.land_face = Some(value),
            "roadAccess" => self.road_access = Some(value),
            "roadWidth" => self.road_width = Some(value),
            "facilities" => self.facilities.push(value),
            "ownerName" => self.owner_name = Some(value),
            "ownerPhotoUrl" => self.owner_photo_url = Some(value),
            "ownerPhoneNumber" => self.owner_phone_number = Some(value),
            _ => {}
        }
    }

    /// Validates this [`CreateForm`] into a [`command::CreateListing`].
    fn into_command(
        self,
        caller: Caller,
    ) -> Result<command::CreateListing, Error> {
        let kind = parse::<listing::Kind>(self.property_type, "propertyType")?;

        let attributes = match kind {
            listing::Kind::House | listing::Kind::Apartment => {
                let residence = Residence {
                    beds: parse(self.beds, "beds")?,
                    baths: parse(self.baths, "baths")?,
                    sqft: parse(self.sqft, "sqft")?,
                    facilities: self
                        .facilities
                        .into_iter()
                        .map(|f| {
                            f.parse().map_err(|e| {
                                Error::invalid_field("facilities", e)
                            })
                        })
                        .collect::<Result<_, _>>()?,
                };
                if matches!(kind, listing::Kind::House) {
                    Attributes::House(residence)
                } else {
                    Attributes::Apartment(residence)
                }
            }
            listing::Kind::Land => Attributes::Land(Parcel {
                area: parse(self.land_area, "landArea")?,
                face: parse(self.land_face, "landFace")?,
                road_access: parse(self.road_access, "roadAccess")?,
                road_width: parse(self.road_width, "roadWidth")?,
            }),
        };

        Ok(command::CreateListing {
            caller,
            title: parse(self.title, "title")?,
            description: parse(self.description, "description")?,
            status: parse(self.status, "status")?,
            price: parse(self.price, "price")?,
            location: parse(self.location, "location")?,
            attributes,
            images: self.images,
            owner: listing::OwnerSnapshot {
                name: parse(self.owner_name, "ownerName")?,
                photo_url: parse_opt(self.owner_photo_url, "ownerPhotoUrl")?,
                phone: parse_opt(
                    self.owner_phone_number,
                    "ownerPhoneNumber",
                )?,
            },
        })
    }
}

/// Parses the required form field `name` out of the given `value`.
fn parse<T: FromStr>(
    value: Option<String>,
    name: &'static str,
) -> Result<T, Error>
where
    T::Err: fmt::Display,
{
    value
        .ok_or_else(|| Error::invalid_field(name, "missing"))?
        .parse()
        .map_err(|e| Error::invalid_field(name, e))
}

/// Parses the optional form field `name` out of the given `value`.
///
/// A missing or blank value yields [`None`].
fn parse_opt<T: FromStr>(
    value: Option<String>,
    name: &'static str,
) -> Result<Option<T>, Error>
where
    T::Err: fmt::Display,
{
    non_empty(value)
        .map(|v| v.parse().map_err(|e| Error::invalid_field(name, e)))
        .transpose()
}

/// JSON body of the `PUT /api/properties/{id}` request.
///
/// Every field is optional: omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
    /// New listing title.
    title: Option<String>,

    /// New listing description.
    description: Option<String>,

    /// New commercial status.
    status: Option<listing::Status>,

    /// New price.
    price: Option<String>,

    /// New location.
    location: Option<String>,

    /// New number of bedrooms (house/apartment only).
    beds: Option<String>,

    /// New number of bathrooms (house/apartment only).
    baths: Option<String>,

    /// New built area (house/apartment only).
    sqft: Option<String>,

    /// New amenity tags (house/apartment only).
    facilities: Option<Vec<String>>,

    /// New land area (land only).
    land_area: Option<String>,

    /// New parcel facing (land only).
    land_face: Option<listing::LandFace>,

    /// New road access kind (land only).
    road_access: Option<listing::RoadAccess>,

    /// New road width (land only).
    road_width: Option<String>,
}

impl UpdateBody {
    /// Validates this [`UpdateBody`] into a [`listing::Patch`].
    ///
    /// Attribute fields replace the whole attribute group, so whenever any
    /// of them is supplied, the group must be complete (except the
    /// amenity tags, which default to none).
    fn into_patch(self, kind: listing::Kind) -> Result<listing::Patch, Error> {
        let Self {
            title,
            description,
            status,
            price,
            location,
            beds,
            baths,
            sqft,
            facilities,
            land_area,
            land_face,
            road_access,
            road_width,
        } = self;

        let has_residence = beds.is_some()
            || baths.is_some()
            || sqft.is_some()
            || facilities.is_some();
        let has_parcel = land_area.is_some()
            || land_face.is_some()
            || road_access.is_some()
            || road_width.is_some();

        let attributes = match (has_residence, has_parcel) {
            (true, true) => {
                return Err(Error::bad_request(
                    "Cannot mix house/apartment and land fields",
                ));
            }
            (true, false) => {
                let residence = Residence {
                    beds: parse(beds, "beds")?,
                    baths: parse(baths, "baths")?,
                    sqft: parse(sqft, "sqft")?,
                    facilities: facilities
                        .unwrap_or_default()
                        .into_iter()
                        .map(|f| {
                            f.parse().map_err(|e| {
                                Error::invalid_field("facilities", e)
                            })
                        })
                        .collect::<Result<_, _>>()?,
                };
                Some(if matches!(kind, listing::Kind::House) {
                    Attributes::House(residence)
                } else {
                    Attributes::Apartment(residence)
                })
            }
            (false, true) => Some(Attributes::Land(Parcel {
                area: parse(land_area, "landArea")?,
                face: land_face
                    .ok_or_else(|| Error::invalid_field("landFace", "missing"))?,
                road_access: road_access.ok_or_else(|| {
                    Error::invalid_field("roadAccess", "missing")
                })?,
                road_width: parse(road_width, "roadWidth")?,
            })),
            (false, false) => None,
        };

        Ok(listing::Patch {
            title: title
                .map(|v| {
                    v.parse().map_err(|e| Error::invalid_field("title", e))
                })
                .transpose()?,
            description: description
                .map(|v| {
                    v.parse()
                        .map_err(|e| Error::invalid_field("description", e))
                })
                .transpose()?,
            status,
            price: price
                .map(|v| {
                    v.parse().map_err(|e| Error::invalid_field("price", e))
                })
                .transpose()?,
            location: location
                .map(|v| {
                    v.parse().map_err(|e| Error::invalid_field("location", e))
                })
                .transpose()?,
            attributes,
        })
    }
}

/// `PUT /api/properties/{id}` handler.
///
/// Partial merge: only the supplied fields change.
pub async fn update(
    ctx: Context,
    Path(id): Path<String>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<MessageBody>, Error> {
    let caller = ctx.current_caller().await?;
    let id = id
        .parse::<listing::Id>()
        .map_err(|_| Error::from(ListingError::NotFound))?;

    // The stored kind decides whether residence fields make a house or an
    // apartment attribute group; the lifecycle rejects a group of a
    // different kind anyway.
    let found = ctx
        .service()
        .execute(query::listing::ById(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| Error::from(ListingError::NotFound))?;

    let patch = body.into_patch(found.listing.kind())?;

    drop(
        ctx.service()
            .execute(command::UpdateListing { caller, id, patch })
            .await
            .map_err(AsError::into_error)?,
    );

    Ok(Json(MessageBody {
        message: "Property updated successfully",
    }))
}

/// `DELETE /api/properties/{id}` handler.
///
/// Permanent removal. A repeated delete reports not-found again.
pub async fn delete(
    ctx: Context,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, Error> {
    let caller = ctx.current_caller().await?;
    let id = id
        .parse::<listing::Id>()
        .map_err(|_| Error::from(ListingError::NotFound))?;

    ctx.service()
        .execute(command::DeleteListing { caller, id })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(MessageBody {
        message: "Property deleted successfully",
    }))
}

impl AsError for command::create_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::create_listing::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::Media(e) => e.try_as_error(),
            E::EmailNotVerified => Some(ListingError::EmailNotVerified.into()),
            E::WrongImagesCount(_) => Some(Error {
                code: "INVALID_IMAGES",
                status_code: http::StatusCode::BAD_REQUEST,
                message: self.to_string(),
                backtrace: None,
            }),
        }
    }
}

impl AsError for command::update_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::update_listing::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::Forbidden(_) => Some(ListingError::Forbidden.into()),
            E::NotExists(_) => Some(ListingError::NotFound.into()),
            E::KindMismatch { .. } => {
                Some(Error::bad_request(self.to_string()))
            }
        }
    }
}

impl AsError for command::delete_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::delete_listing::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::Forbidden(_) => Some(ListingError::Forbidden.into()),
            E::NotExists(_) => Some(ListingError::NotFound.into()),
        }
    }
}

define_error! {
    enum ListingError {
        #[code = "EMAIL_NOT_VERIFIED"]
        #[status = FORBIDDEN]
        #[message = "Email address must be verified to list a property"]
        EmailNotVerified,

        #[code = "FORBIDDEN"]
        #[status = FORBIDDEN]
        #[message = "Forbidden"]
        Forbidden,

        #[code = "PROPERTY_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Property not found"]
        NotFound,
    }
}

#[cfg(test)]
mod spec {
    use service::read;

    use super::ListParams;

    #[test]
    fn list_params_convert_to_criteria() {
        let criteria = read::listing::Criteria::try_from(ListParams {
            query: Some("villa".to_owned()),
            kind: Some("House".to_owned()),
            status: Some("For Sale".to_owned()),
            min_price: Some("10000".to_owned()),
            ..ListParams::default()
        })
        .unwrap();

        assert_eq!(criteria.query.as_deref(), Some("villa"));
        assert_eq!(
            criteria.kind,
            Some(service::domain::listing::Kind::House),
        );
        assert_eq!(
            criteria.status,
            Some(service::domain::listing::Status::ForSale),
        );
        assert_eq!(criteria.min_price, Some("10000".parse().unwrap()));
        assert!(criteria.location.is_none());
        assert!(criteria.max_price.is_none());
    }

    #[test]
    fn blank_params_impose_no_constraint() {
        let criteria = read::listing::Criteria::try_from(ListParams {
            query: Some("  ".to_owned()),
            kind: Some(String::new()),
            ..ListParams::default()
        })
        .unwrap();

        assert!(criteria.query.is_none());
        assert!(criteria.kind.is_none());
    }

    #[test]
    fn malformed_price_bound_is_rejected_up_front() {
        assert!(read::listing::Criteria::try_from(ListParams {
            min_price: Some("cheap".to_owned()),
            ..ListParams::default()
        })
        .is_err());

        assert!(read::listing::Criteria::try_from(ListParams {
            max_price: Some("-5".to_owned()),
            ..ListParams::default()
        })
        .is_err());
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(read::listing::Criteria::try_from(ListParams {
            kind: Some("Castle".to_owned()),
            ..ListParams::default()
        })
        .is_err());
    }
}
