//! Macros for defining kind enums.

/// Macro for defining a kind enum with a fixed wire spelling per variant.
///
/// The wire spelling is what the variant (de)serializes to/from and what it
/// parses from via [`FromStr`], so enums carrying spaces in their canonical
/// form ("For Sale") keep it on every boundary.
///
/// [`FromStr`]: std::str::FromStr
///
/// # Example
///
/// ```rust
/// # use crate::common::define_kind;
///
/// define_kind! {
///     #[doc = "Shape kind."]
///     enum Kind {
///         #[doc = "A cube"]
///         Cube = 1 => "Cube",
///
///         #[doc = "A sphere"]
///         Sphere = 2 => "Sphere",
///     }
/// }
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $value:literal => $wire:literal
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::serde::Deserialize,
            $crate::private::serde::Serialize,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            PartialEq,
        )]
        #[doc = $doc]
        #[repr(u8)]
        #[strum(crate = "::common::private::strum")]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 #[strum(serialize = $wire)]
                 #[serde(rename = $wire)]
                 $variant = $value,
            )*
        }

        impl $name {
            /// Converts this into its [`u8`] representation.
            #[must_use]
            pub const fn u8(self) -> u8 {
                self as u8
            }
        }
    };
}
