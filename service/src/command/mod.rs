//! [`Command`] definition.

pub mod authorize_caller;
pub mod create_enquiry;
pub mod create_listing;
pub mod delete_listing;
pub mod mark_enquiry_read;
pub mod store_image;
pub mod update_listing;
pub mod upsert_profile;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_caller::AuthorizeCaller, create_enquiry::CreateEnquiry,
    create_listing::CreateListing, delete_listing::DeleteListing,
    mark_enquiry_read::MarkEnquiryRead, store_image::StoreImage,
    update_listing::UpdateListing, upsert_profile::UpsertProfile,
};
