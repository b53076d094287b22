//! [`Enquiry`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use uuid::Uuid;

use crate::domain::{listing, user};

/// Buyer-to-owner message about a [`Listing`].
///
/// Created by any visitor, authenticated or not. Once stored, only its
/// [`Enquiry::read`] flag ever changes, and it's never deleted.
///
/// [`Listing`]: crate::domain::Listing
#[derive(Clone, Debug)]
pub struct Enquiry {
    /// ID of this [`Enquiry`].
    pub id: Id,

    /// ID of the [`User`] receiving this [`Enquiry`] (the listing owner).
    ///
    /// [`User`]: crate::domain::User
    pub recipient_id: user::Id,

    /// [`SenderName`] of this [`Enquiry`].
    pub sender_name: SenderName,

    /// [`SenderEmail`] of this [`Enquiry`].
    pub sender_email: SenderEmail,

    /// [`SenderPhone`] of this [`Enquiry`].
    pub sender_phone: SenderPhone,

    /// [`Message`] of this [`Enquiry`].
    pub message: Message,

    /// ID of the [`Listing`] this [`Enquiry`] is about.
    ///
    /// [`Listing`]: crate::domain::Listing
    pub property_id: listing::Id,

    /// Title of that [`Listing`], denormalized at creation time.
    ///
    /// [`Listing`]: crate::domain::Listing
    pub property_title: listing::Title,

    /// Indicator whether the recipient has seen this [`Enquiry`].
    ///
    /// Flips to `true` once and never back.
    pub read: bool,

    /// [`DateTime`] when this [`Enquiry`] was created.
    pub created_at: CreationDateTime,
}

/// ID of an [`Enquiry`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Name of an [`Enquiry`] sender.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct SenderName(String);

impl SenderName {
    /// Creates a new [`SenderName`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`SenderName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`SenderName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for SenderName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `SenderName`")
    }
}

/// Email address of an [`Enquiry`] sender.
///
/// Lightly validated: enquiries come from an anonymous form and the address
/// is only ever shown to the recipient, never mailed to.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct SenderEmail(String);

impl SenderEmail {
    /// Creates a new [`SenderEmail`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`SenderEmail`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`SenderEmail`].
    fn check(address: impl AsRef<str>) -> bool {
        let address = address.as_ref();
        address.trim() == address
            && address.contains('@')
            && address.len() <= 512
    }
}

impl FromStr for SenderEmail {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `SenderEmail`")
    }
}

/// Phone number of an [`Enquiry`] sender.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct SenderPhone(String);

impl SenderPhone {
    /// Creates a new [`SenderPhone`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`SenderPhone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`SenderPhone`].
    fn check(number: impl AsRef<str>) -> bool {
        let number = number.as_ref();
        number.trim() == number && !number.is_empty() && number.len() <= 64
    }
}

impl FromStr for SenderPhone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `SenderPhone`")
    }
}

/// Free-text message of an [`Enquiry`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Message(String);

impl Message {
    /// Creates a new [`Message`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Message`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Message`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        text.trim() == text && !text.is_empty() && text.len() <= 4096
    }
}

impl FromStr for Message {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Message`")
    }
}

/// [`DateTime`] when an [`Enquiry`] was created.
pub type CreationDateTime = DateTimeOf<(Enquiry, unit::Creation)>;
