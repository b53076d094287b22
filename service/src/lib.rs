//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use derive_more::Debug;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] decoding key bearer tokens are validated with.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,
}

/// Domain service.
///
/// Generic over its document database `Db` and its media pipeline `M`.
/// Every request resolves its own [`Caller`] and runs strictly
/// sequentially: verify identity, authorize, mutate, respond. No state is
/// shared between requests apart from what `Db` and `M` hold.
///
/// [`Caller`]: domain::Caller
#[derive(Clone, Debug)]
pub struct Service<Db, M> {
    /// Configuration of this [`Service`].
    config: Config,

    /// Document database of this [`Service`].
    database: Db,

    /// Media pipeline of this [`Service`].
    media: M,
}

impl<Db, M> Service<Db, M> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(config: Config, database: Db, media: M) -> Self {
        Self {
            config,
            database,
            media,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the document database of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns the media pipeline of this [`Service`].
    #[must_use]
    pub fn media(&self) -> &M {
        &self.media
    }
}
