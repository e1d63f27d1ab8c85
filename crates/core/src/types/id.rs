//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally passing a shop ID where a SIM card ID is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around a `String` holding a UUID v4 with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Constructors: `generate()` for fresh IDs, `new()` for existing values
/// - `Display`, `AsRef<str>`, `From<String>` and `From<&str>`
/// - `sqlx` `Type`, `Encode`, and `Decode` as `TEXT` (with `sqlite` feature)
///
/// IDs are stored as opaque strings: callers may look up any string, and an
/// unknown or malformed value is simply "not found".
///
/// # Example
///
/// ```rust
/// # use simcard_core::define_id;
/// define_id!(WarehouseId);
/// define_id!(PalletId);
///
/// let warehouse = WarehouseId::generate();
/// let pallet = PalletId::new("p-1");
///
/// // These are different types, so this won't compile:
/// // let _: WarehouseId = pallet;
/// # let _ = (warehouse, pallet);
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
        #[cfg_attr(feature = "sqlite", derive(::sqlx::Type), sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh random (UUID v4) ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4().to_string())
            }

            /// Wrap an existing ID value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
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
    };
}

// Define standard entity IDs
define_id!(ShopId);
define_id!(SimCardId);
define_id!(UserId);
