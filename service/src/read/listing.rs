//! [`Listing`]-related read definitions.

use common::Price;

use crate::domain::{
    listing::{self, Kind, Status},
    user, Listing, User,
};

/// Criteria for selecting [`Listing`]s.
///
/// Every field is optional; an absent field imposes no constraint. Present
/// fields combine conjunctively.
#[derive(Clone, Debug, Default)]
pub struct Criteria {
    /// Free-text term matched (case-insensitively) against a [`Listing`]
    /// title or description.
    pub query: Option<String>,

    /// Exact [`Kind`] to match.
    pub kind: Option<Kind>,

    /// Free-text location part matched case-insensitively.
    pub location: Option<String>,

    /// Exact [`Status`] to match.
    pub status: Option<Status>,

    /// Inclusive lower [`Price`] bound.
    pub min_price: Option<Price>,

    /// Inclusive upper [`Price`] bound.
    pub max_price: Option<Price>,
}

impl Criteria {
    /// Checks whether the given [`Listing`] satisfies every present
    /// predicate of these [`Criteria`].
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        let Self {
            query,
            kind,
            location,
            status,
            min_price,
            max_price,
        } = self;

        let status_match = status.map_or(true, |s| listing.status == s);
        let kind_match = kind.map_or(true, |k| listing.kind() == k);
        let location_match = location
            .as_deref()
            .map_or(true, |l| contains_ci(listing.location.as_ref(), l));
        let query_match = query.as_deref().map_or(true, |q| {
            contains_ci(listing.title.as_ref(), q)
                || contains_ci(listing.description.as_ref(), q)
        });
        let min_match = min_price.map_or(true, |min| listing.price >= min);
        let max_match = max_price.map_or(true, |max| listing.price <= max);

        status_match
            && kind_match
            && location_match
            && query_match
            && min_match
            && max_match
    }

    /// Selects the subset of the given `listings` matching these
    /// [`Criteria`], newest first.
    ///
    /// The whole collection is materialized in memory and scanned linearly,
    /// exactly as the store hands it over. Listings with equal creation
    /// times keep the order the store returned them in (the sort is
    /// stable). Swapping this for store-side indexed queries behind the
    /// same [`Criteria`] contract is the designated extension point for
    /// larger datasets.
    #[must_use]
    pub fn apply(&self, mut listings: Vec<Listing>) -> Vec<Listing> {
        listings.retain(|l| self.matches(l));
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listings
    }
}

/// Checks whether `haystack` contains `needle`, ignoring ASCII and Unicode
/// simple case differences.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Contact details of a [`Listing`] owner, as surfaced on a single-listing
/// read.
///
/// Produced by [`OwnerContact::merge`] from the live [`User`] record and
/// the denormalized [`listing::OwnerSnapshot`].
#[derive(Clone, Debug)]
pub struct OwnerContact {
    /// Owner [`user::Name`].
    pub name: user::Name,

    /// Owner [`user::PhotoUrl`].
    pub photo_url: Option<user::PhotoUrl>,

    /// Owner [`user::Phone`].
    pub phone: Option<user::Phone>,

    /// Owner [`user::Email`].
    ///
    /// Only the live [`User`] record carries it; the snapshot never did.
    pub email: Option<user::Email>,

    /// Owner [`user::Role`].
    pub role: user::Role,
}

impl OwnerContact {
    /// Merges the live [`User`] record with the denormalized `snapshot`.
    ///
    /// Precedence per field: live record, then snapshot, then default. The
    /// snapshot wins only where the live record is missing a field (or the
    /// whole record is gone).
    #[must_use]
    pub fn merge(
        snapshot: &listing::OwnerSnapshot,
        live: Option<&User>,
    ) -> Self {
        Self {
            name: live
                .map(|u| u.name.clone())
                .unwrap_or_else(|| snapshot.name.clone()),
            photo_url: live
                .and_then(|u| u.photo_url.clone())
                .or_else(|| snapshot.photo_url.clone()),
            phone: live
                .and_then(|u| u.phone.clone())
                .or_else(|| snapshot.phone.clone()),
            email: live.and_then(|u| u.email.clone()),
            role: live.map_or(user::Role::User, |u| u.role),
        }
    }
}

/// A [`Listing`] with its owner's merged [`OwnerContact`].
#[derive(Clone, Debug)]
pub struct WithOwner {
    /// The [`Listing`] itself.
    pub listing: Listing,

    /// Merged [`OwnerContact`] of the listing owner.
    pub owner: OwnerContact,
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{
        listing::{
            Attributes, Images, Kind, OwnerSnapshot, Parcel, Residence,
            Status,
        },
        user, Listing, User,
    };

    use super::{Criteria, OwnerContact};

    fn listing(
        title: &str,
        status: Status,
        price: &str,
        created_at: &str,
    ) -> Listing {
        Listing {
            id: crate::domain::listing::Id::new(),
            title: title.parse().unwrap(),
            description: "Spacious and bright.".parse().unwrap(),
            status,
            price: price.parse().unwrap(),
            location: "Budhanilkantha, Kathmandu".parse().unwrap(),
            attributes: Attributes::House(Residence {
                beds: 4,
                baths: 3,
                sqft: 2400,
                facilities: vec![],
            }),
            images: Images::new(vec![
                "https://img.test/a".parse().unwrap(),
            ])
            .unwrap(),
            owner_id: user::Id::new("owner-1").unwrap(),
            owner: OwnerSnapshot {
                name: "Ram Karki".parse().unwrap(),
                photo_url: None,
                phone: None,
            },
            created_at: DateTime::from_rfc3339(created_at).unwrap().coerce(),
        }
    }

    fn parcel(title: &str, created_at: &str) -> Listing {
        Listing {
            attributes: Attributes::Land(Parcel {
                area: "4 Aana".parse().unwrap(),
                face: crate::domain::listing::LandFace::East,
                road_access: crate::domain::listing::RoadAccess::Pitched,
                road_width: "13 ft".parse().unwrap(),
            }),
            ..listing(title, Status::ForSale, "9000000", created_at)
        }
    }

    #[test]
    fn empty_criteria_keep_everything_sorted() {
        let old = listing(
            "Old Villa",
            Status::ForSale,
            "5000000",
            "2024-01-01T00:00:00Z",
        );
        let new = listing(
            "New Flat",
            Status::ForRent,
            "20000",
            "2024-06-01T00:00:00Z",
        );

        let out = Criteria::default().apply(vec![old.clone(), new.clone()]);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, new.id);
        assert_eq!(out[1].id, old.id);
    }

    #[test]
    fn status_is_matched_exactly() {
        let sale = listing(
            "Old Villa",
            Status::ForSale,
            "5000000",
            "2024-01-01T00:00:00Z",
        );
        let rent = listing(
            "New Flat",
            Status::ForRent,
            "20000",
            "2024-06-01T00:00:00Z",
        );

        let out = Criteria {
            status: Some(Status::ForSale),
            ..Criteria::default()
        }
        .apply(vec![sale.clone(), rent]);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, sale.id);
    }

    #[test]
    fn min_price_keeps_both_and_orders_newest_first() {
        let sale = listing(
            "Old Villa",
            Status::ForSale,
            "5000000",
            "2024-01-01T00:00:00Z",
        );
        let rent = listing(
            "New Flat",
            Status::ForRent,
            "20000",
            "2024-06-01T00:00:00Z",
        );

        let out = Criteria {
            min_price: Some("10000".parse().unwrap()),
            ..Criteria::default()
        }
        .apply(vec![sale.clone(), rent.clone()]);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, rent.id);
        assert_eq!(out[1].id, sale.id);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let exact = listing(
            "Exact",
            Status::ForSale,
            "20000",
            "2024-06-01T00:00:00Z",
        );

        let criteria = Criteria {
            min_price: Some("20000".parse().unwrap()),
            max_price: Some("20000".parse().unwrap()),
            ..Criteria::default()
        };

        assert!(criteria.matches(&exact));
    }

    #[test]
    fn query_matches_title_or_description_case_insensitively() {
        let villa = listing(
            "Beautiful Modern Villa",
            Status::ForSale,
            "5000000",
            "2024-01-01T00:00:00Z",
        );

        assert!(Criteria {
            query: Some("VILLA".to_owned()),
            ..Criteria::default()
        }
        .matches(&villa));
        assert!(Criteria {
            query: Some("spacious".to_owned()),
            ..Criteria::default()
        }
        .matches(&villa));
        assert!(!Criteria {
            query: Some("bungalow".to_owned()),
            ..Criteria::default()
        }
        .matches(&villa));
    }

    #[test]
    fn predicates_combine_conjunctively() {
        let house = listing(
            "Villa",
            Status::ForSale,
            "5000000",
            "2024-01-01T00:00:00Z",
        );
        let land = parcel("Prime Plot", "2024-02-01T00:00:00Z");

        let out = Criteria {
            kind: Some(Kind::Land),
            status: Some(Status::ForSale),
            ..Criteria::default()
        }
        .apply(vec![house, land.clone()]);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, land.id);
    }

    fn live_owner() -> User {
        User {
            id: user::Id::new("owner-1").unwrap(),
            name: "Shyam Shrestha".parse().unwrap(),
            email: Some("shyam@example.com".parse().unwrap()),
            phone: Some("9841000000".parse().unwrap()),
            photo_url: Some("https://img.test/shyam".parse().unwrap()),
            role: user::Role::Agent,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn merge_prefers_live_record() {
        let snapshot = crate::domain::listing::OwnerSnapshot {
            name: "Ram Karki".parse().unwrap(),
            photo_url: Some("https://img.test/ram".parse().unwrap()),
            phone: Some("9800000000".parse().unwrap()),
        };

        let merged = OwnerContact::merge(&snapshot, Some(&live_owner()));

        assert_eq!(merged.name.as_ref(), "Shyam Shrestha");
        assert_eq!(merged.phone.unwrap().as_ref(), "9841000000");
        assert_eq!(merged.email.unwrap().as_ref(), "shyam@example.com");
        assert_eq!(merged.role, user::Role::Agent);
    }

    #[test]
    fn merge_falls_back_to_snapshot_per_field() {
        let snapshot = crate::domain::listing::OwnerSnapshot {
            name: "Ram Karki".parse().unwrap(),
            photo_url: Some("https://img.test/ram".parse().unwrap()),
            phone: Some("9800000000".parse().unwrap()),
        };
        let live = User {
            photo_url: None,
            phone: None,
            ..live_owner()
        };

        let merged = OwnerContact::merge(&snapshot, Some(&live));

        assert_eq!(merged.photo_url.unwrap().as_ref(), "https://img.test/ram");
        assert_eq!(merged.phone.unwrap().as_ref(), "9800000000");
    }

    #[test]
    fn merge_without_live_record_uses_snapshot_and_defaults() {
        let snapshot = crate::domain::listing::OwnerSnapshot {
            name: "Ram Karki".parse().unwrap(),
            photo_url: None,
            phone: Some("9800000000".parse().unwrap()),
        };

        let merged = OwnerContact::merge(&snapshot, None);

        assert_eq!(merged.name.as_ref(), "Ram Karki");
        assert!(merged.photo_url.is_none());
        assert!(merged.email.is_none());
        assert_eq!(merged.role, user::Role::User);
    }
}
