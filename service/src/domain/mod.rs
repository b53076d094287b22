//! Domain definitions.

pub mod caller;
pub mod enquiry;
pub mod listing;
pub mod user;

pub use self::{
    caller::Caller, enquiry::Enquiry, listing::Listing, user::User,
};
