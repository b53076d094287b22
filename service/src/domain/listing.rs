//! [`Listing`] definitions.

use std::slice;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Price};
use derive_more::{AsRef, Display, From, FromStr, Into};
use uuid::Uuid;

use crate::domain::user;

/// Property listed for sale or rent.
#[derive(Clone, Debug)]
pub struct Listing {
    /// ID of this [`Listing`].
    pub id: Id,

    /// [`Title`] of this [`Listing`].
    pub title: Title,

    /// [`Description`] of this [`Listing`].
    pub description: Description,

    /// [`Status`] of this [`Listing`].
    pub status: Status,

    /// [`Price`] this [`Listing`] is offered at.
    pub price: Price,

    /// [`Location`] of this [`Listing`].
    pub location: Location,

    /// Kind-specific [`Attributes`] of this [`Listing`].
    pub attributes: Attributes,

    /// [`Images`] of this [`Listing`].
    pub images: Images,

    /// ID of the [`User`] owning this [`Listing`].
    ///
    /// [`User`]: crate::domain::User
    pub owner_id: user::Id,

    /// [`OwnerSnapshot`] captured when this [`Listing`] was created.
    pub owner: OwnerSnapshot,

    /// [`DateTime`] when this [`Listing`] was created.
    pub created_at: CreationDateTime,
}

impl Listing {
    /// Returns [`Kind`] of this [`Listing`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.attributes.kind()
    }
}

/// ID of a [`Listing`].
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

/// Title of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `title` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 512
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Description of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Description`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        text.trim() == text && !text.is_empty() && text.len() <= 4096
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Location of a [`Listing`].
///
/// Free text, matched by case-insensitive substring when filtering.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Location(String);

impl Location {
    /// Creates a new [`Location`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `location` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Creates a new [`Location`] if the given `location` is valid.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Option<Self> {
        let location = location.into();
        Self::check(&location).then_some(Self(location))
    }

    /// Checks whether the given `location` is a valid [`Location`].
    fn check(location: impl AsRef<str>) -> bool {
        let location = location.as_ref();
        location.trim() == location
            && !location.is_empty()
            && location.len() <= 512
    }
}

impl FromStr for Location {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Location`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Listing`]."]
    enum Kind {
        #[doc = "A standalone house."]
        House = 1 => "House",

        #[doc = "An apartment in a building."]
        Apartment = 2 => "Apartment",

        #[doc = "A parcel of land."]
        Land = 3 => "Land",
    }
}

define_kind! {
    #[doc = "Commercial status of a [`Listing`]."]
    enum Status {
        #[doc = "Offered for sale."]
        ForSale = 1 => "For Sale",

        #[doc = "Offered for rent."]
        ForRent = 2 => "For Rent",
    }
}

/// Kind-specific attributes of a [`Listing`].
///
/// Exactly one attribute group exists per [`Listing`], so a land parcel can
/// never carry bedrooms and a house can never carry a road access.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Attributes {
    /// [`Residence`] attributes of a [`Kind::House`] [`Listing`].
    House(Residence),

    /// [`Residence`] attributes of a [`Kind::Apartment`] [`Listing`].
    Apartment(Residence),

    /// [`Parcel`] attributes of a [`Kind::Land`] [`Listing`].
    Land(Parcel),
}

impl Attributes {
    /// Returns [`Kind`] these [`Attributes`] describe.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::House(_) => Kind::House,
            Self::Apartment(_) => Kind::Apartment,
            Self::Land(_) => Kind::Land,
        }
    }

    /// Returns the [`Residence`] attributes, if this is a house or an
    /// apartment.
    #[must_use]
    pub fn residence(&self) -> Option<&Residence> {
        match self {
            Self::House(r) | Self::Apartment(r) => Some(r),
            Self::Land(_) => None,
        }
    }

    /// Returns the [`Parcel`] attributes, if this is a land parcel.
    #[must_use]
    pub fn parcel(&self) -> Option<&Parcel> {
        match self {
            Self::Land(p) => Some(p),
            Self::House(_) | Self::Apartment(_) => None,
        }
    }
}

/// Attributes of a habitable [`Listing`] (house or apartment).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Residence {
    /// Number of bedrooms.
    pub beds: Beds,

    /// Number of bathrooms.
    pub baths: Baths,

    /// Built area in square feet.
    pub sqft: Sqft,

    /// Extra [`Facility`]s ("Parking", "24hr Water", ...).
    pub facilities: Vec<Facility>,
}

/// Attributes of a [`Kind::Land`] [`Listing`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parcel {
    /// [`LandArea`] of the parcel.
    pub area: LandArea,

    /// Compass direction the parcel faces.
    pub face: LandFace,

    /// Kind of the road reaching the parcel.
    pub road_access: RoadAccess,

    /// [`RoadWidth`] of that road.
    pub road_width: RoadWidth,
}

/// Number of bedrooms in a [`Listing`].
pub type Beds = u16;

/// Number of bathrooms in a [`Listing`].
pub type Baths = u16;

/// Built area of a [`Listing`] in square feet.
pub type Sqft = u32;

/// Free-text amenity tag of a [`Listing`] ("Parking", "Garden", ...).
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Facility(String);

impl Facility {
    /// Creates a new [`Facility`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `tag` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Creates a new [`Facility`] if the given `tag` is valid.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Option<Self> {
        let tag = tag.into();
        Self::check(&tag).then_some(Self(tag))
    }

    /// Checks whether the given `tag` is a valid [`Facility`].
    fn check(tag: impl AsRef<str>) -> bool {
        let tag = tag.as_ref();
        tag.trim() == tag && !tag.is_empty() && tag.len() <= 128
    }
}

impl FromStr for Facility {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Facility`")
    }
}

/// Free-text area of a land parcel ("4 Aana", "1 Ropani").
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct LandArea(String);

impl LandArea {
    /// Creates a new [`LandArea`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `area` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(area: impl Into<String>) -> Self {
        Self(area.into())
    }

    /// Creates a new [`LandArea`] if the given `area` is valid.
    #[must_use]
    pub fn new(area: impl Into<String>) -> Option<Self> {
        let area = area.into();
        Self::check(&area).then_some(Self(area))
    }

    /// Checks whether the given `area` is a valid [`LandArea`].
    fn check(area: impl AsRef<str>) -> bool {
        let area = area.as_ref();
        area.trim() == area && !area.is_empty() && area.len() <= 128
    }
}

impl FromStr for LandArea {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `LandArea`")
    }
}

/// Free-text width of the road reaching a land parcel ("13 ft").
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct RoadWidth(String);

impl RoadWidth {
    /// Creates a new [`RoadWidth`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `width` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(width: impl Into<String>) -> Self {
        Self(width.into())
    }

    /// Creates a new [`RoadWidth`] if the given `width` is valid.
    #[must_use]
    pub fn new(width: impl Into<String>) -> Option<Self> {
        let width = width.into();
        Self::check(&width).then_some(Self(width))
    }

    /// Checks whether the given `width` is a valid [`RoadWidth`].
    fn check(width: impl AsRef<str>) -> bool {
        let width = width.as_ref();
        width.trim() == width && !width.is_empty() && width.len() <= 128
    }
}

impl FromStr for RoadWidth {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `RoadWidth`")
    }
}

define_kind! {
    #[doc = "Compass direction a land parcel faces."]
    enum LandFace {
        #[doc = "Facing east."]
        East = 1 => "East",

        #[doc = "Facing west."]
        West = 2 => "West",

        #[doc = "Facing north."]
        North = 3 => "North",

        #[doc = "Facing south."]
        South = 4 => "South",

        #[doc = "Facing north-east."]
        NorthEast = 5 => "North-East",

        #[doc = "Facing north-west."]
        NorthWest = 6 => "North-West",

        #[doc = "Facing south-east."]
        SouthEast = 7 => "South-East",

        #[doc = "Facing south-west."]
        SouthWest = 8 => "South-West",
    }
}

define_kind! {
    #[doc = "Kind of the road reaching a land parcel."]
    enum RoadAccess {
        #[doc = "Paved road."]
        Pitched = 1 => "Pitched",

        #[doc = "Gravel road."]
        Gravel = 2 => "Gravel",

        #[doc = "Unpaved soil road."]
        Soil = 3 => "Soil",
    }
}

/// URL of an uploaded [`Listing`] image.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `url` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Creates a new [`ImageUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Checks whether the given `url` is a valid [`ImageUrl`].
    fn check(url: impl AsRef<str>) -> bool {
        let url = url.as_ref();
        url.trim() == url && !url.is_empty() && url.len() <= 2048
    }
}

impl FromStr for ImageUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImageUrl`")
    }
}

/// Ordered images of a [`Listing`].
///
/// Holds between [`Images::MIN`] and [`Images::MAX`] URLs. The order is
/// significant: the first entry is the featured image used as the listing
/// thumbnail.
#[derive(Clone, Debug, Eq, Into, PartialEq)]
pub struct Images(Vec<ImageUrl>);

impl Images {
    /// Minimum number of images of a [`Listing`].
    pub const MIN: usize = 1;

    /// Maximum number of images of a [`Listing`].
    pub const MAX: usize = 5;

    /// Creates new [`Images`] if the number of the given `urls` is within
    /// the [`Images::MIN`]..=[`Images::MAX`] bounds.
    #[must_use]
    pub fn new(urls: Vec<ImageUrl>) -> Option<Self> {
        ((Self::MIN..=Self::MAX).contains(&urls.len())).then_some(Self(urls))
    }

    /// Returns the featured image of a [`Listing`] (always the first one).
    #[expect(clippy::missing_panics_doc, reason = "never empty")]
    #[must_use]
    pub fn featured(&self) -> &ImageUrl {
        self.0.first().expect("`Images` are never empty")
    }

    /// Iterates over these [`Images`] in order.
    pub fn iter(&self) -> slice::Iter<'_, ImageUrl> {
        self.0.iter()
    }

    /// Returns the number of these [`Images`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether there are no [`Images`].
    ///
    /// Always `false` by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Contact details of a [`Listing`] owner, denormalized onto the listing
/// when it's created.
///
/// May go stale relative to the owner's live [`User`] record: nothing keeps
/// the two in sync.
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct OwnerSnapshot {
    /// [`user::Name`] of the owner at creation time.
    pub name: user::Name,

    /// [`user::PhotoUrl`] of the owner at creation time.
    pub photo_url: Option<user::PhotoUrl>,

    /// [`user::Phone`] of the owner at creation time.
    pub phone: Option<user::Phone>,
}

/// Partial update of a [`Listing`].
///
/// Only the supplied fields change; omitted fields keep their prior value.
#[derive(Clone, Debug, Default)]
pub struct Patch {
    /// New [`Title`], if it should change.
    pub title: Option<Title>,

    /// New [`Description`], if it should change.
    pub description: Option<Description>,

    /// New [`Status`], if it should change.
    pub status: Option<Status>,

    /// New [`Price`], if it should change.
    pub price: Option<Price>,

    /// New [`Location`], if it should change.
    pub location: Option<Location>,

    /// New [`Attributes`], if they should change.
    ///
    /// Replaces the whole attribute group, and must describe the same
    /// [`Kind`] the [`Listing`] already has.
    pub attributes: Option<Attributes>,
}

impl Patch {
    /// Applies this [`Patch`] to the given [`Listing`].
    pub fn apply(self, listing: &mut Listing) {
        let Self {
            title,
            description,
            status,
            price,
            location,
            attributes,
        } = self;

        if let Some(title) = title {
            listing.title = title;
        }
        if let Some(description) = description {
            listing.description = description;
        }
        if let Some(status) = status {
            listing.status = status;
        }
        if let Some(price) = price {
            listing.price = price;
        }
        if let Some(location) = location {
            listing.location = location;
        }
        if let Some(attributes) = attributes {
            listing.attributes = attributes;
        }
    }
}

/// [`DateTime`] when a [`Listing`] was created.
pub type CreationDateTime = DateTimeOf<(Listing, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::user;

    use super::{
        Attributes, Id, Images, Kind, Listing, Patch, Residence, Status,
        Title,
    };

    fn urls(n: usize) -> Vec<super::ImageUrl> {
        (0..n)
            .map(|i| {
                super::ImageUrl::new(format!("https://img.test/{i}")).unwrap()
            })
            .collect()
    }

    fn listing() -> Listing {
        Listing {
            id: Id::new(),
            title: "Beautiful Modern Villa".parse().unwrap(),
            description: "Describe the property...".parse().unwrap(),
            status: Status::ForSale,
            price: "25000000".parse().unwrap(),
            location: "Budhanilkantha, Kathmandu".parse().unwrap(),
            attributes: Attributes::House(Residence {
                beds: 4,
                baths: 3,
                sqft: 2400,
                facilities: vec!["Parking".parse().unwrap()],
            }),
            images: Images::new(urls(3)).unwrap(),
            owner_id: user::Id::new("owner-1").unwrap(),
            owner: super::OwnerSnapshot {
                name: "Ram Karki".parse().unwrap(),
                photo_url: None,
                phone: None,
            },
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn images_enforce_bounds() {
        assert!(Images::new(urls(0)).is_none());
        assert!(Images::new(urls(1)).is_some());
        assert!(Images::new(urls(5)).is_some());
        assert!(Images::new(urls(6)).is_none());
    }

    #[test]
    fn featured_image_is_first() {
        let images = Images::new(urls(3)).unwrap();
        assert_eq!(images.featured().as_ref(), "https://img.test/0");
    }

    #[test]
    fn kind_follows_attributes() {
        let listing = listing();
        assert_eq!(listing.kind(), Kind::House);
        assert!(listing.attributes.residence().is_some());
        assert!(listing.attributes.parcel().is_none());
    }

    #[test]
    fn patch_changes_only_supplied_fields() {
        let mut patched = listing();
        let original = patched.clone();

        Patch {
            price: Some("30000000".parse().unwrap()),
            ..Patch::default()
        }
        .apply(&mut patched);

        assert_eq!(patched.price, "30000000".parse().unwrap());
        assert_eq!(patched.title, original.title);
        assert_eq!(patched.description, original.description);
        assert_eq!(patched.status, original.status);
        assert_eq!(patched.location, original.location);
        assert_eq!(patched.attributes, original.attributes);
        assert_eq!(patched.images, original.images);
        assert_eq!(patched.created_at, original.created_at);
    }

    #[test]
    fn title_rejects_blank_and_padded() {
        assert!(Title::new("").is_none());
        assert!(Title::new(" padded ").is_none());
        assert!(Title::new("Prime Plot of Land").is_some());
    }
}
