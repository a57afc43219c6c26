//! Newtype IDs for type-safe document references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different collections.

/// Macro to define a type-safe document ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use quickbite_core::define_id;
/// define_id!(RestaurantId);
/// define_id!(OrderId);
///
/// let restaurant_id = RestaurantId::new("r1");
/// let order_id = OrderId::new("r1");
///
/// // These are different types, so this won't compile:
/// // let _: RestaurantId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from an existing document key.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying key.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying key.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
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
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard document IDs
define_id!(RestaurantId);
define_id!(MenuItemId);
define_id!(GroceryItemId);
define_id!(OrderId);
define_id!(ZoneId);

impl ZoneId {
    /// Build a zone ID from a creation timestamp, e.g. `zone_1718000000000`.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("zone_{millis}"))
    }
}

impl OrderId {
    /// Short reference used in order tables: `#` plus the last six characters.
    #[must_use]
    pub fn table_ref(&self) -> String {
        format!("#{}", tail_chars(&self.0, 6))
    }

    /// Reference used on the dashboard: `#` plus the last eight characters,
    /// upper-cased. Empty IDs render as `N/A`.
    #[must_use]
    pub fn dashboard_ref(&self) -> String {
        if self.0.is_empty() {
            return "N/A".to_string();
        }
        format!("#{}", tail_chars(&self.0, 8).to_uppercase())
    }
}

/// Return at most the last `n` characters of `s`.
fn tail_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    s.char_indices().nth(count - n).map_or(s, |(idx, _)| s.get(idx..).unwrap_or(s))
}
