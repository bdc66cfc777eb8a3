//! Typed ID wrappers for domain entities.
//!
//! Users and orders are keyed by opaque strings so that identities minted by
//! an external provider can be stored unchanged. Every other entity uses the
//! store-assigned integer identity.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Common behaviour of entity identifiers.
pub trait Identifier: Display {
    /// Returns true when the identifier could name a stored row.
    fn is_valid(&self) -> bool;
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wraps a raw identifier.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw identifier.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl Identifier for $name {
            fn is_valid(&self) -> bool {
                self.0 > 0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wraps a raw identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrows the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the raw identifier.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Identifier for $name {
            fn is_valid(&self) -> bool {
                !self.0.trim().is_empty()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

numeric_id!(
    /// Cart item identifier.
    CartItemId
);
numeric_id!(
    /// Order item identifier.
    OrderItemId
);
numeric_id!(
    /// Product identifier.
    ProductId
);
numeric_id!(
    /// Category identifier.
    CategoryId
);
numeric_id!(
    /// Sub-category identifier.
    SubCategoryId
);
numeric_id!(
    /// Address identifier.
    AddressId
);

string_id!(
    /// User identifier, usually minted by an identity provider.
    UserId
);
string_id!(
    /// Order identifier, assigned by the store on insert.
    OrderId
);
