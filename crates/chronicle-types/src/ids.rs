//! Type-safe identifier wrappers.
//!
//! Chain-side identifiers (action ids, non-fungible item ids, order ids,
//! tradable ids) are GUIDs and map onto [`Uuid`] newtypes. Account and avatar
//! addresses are 20-byte values rendered as lowercase hex, which is also
//! how they are stored in the mirror.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Content-addressed identifier of a single chain action.
    ActionId
}

define_id! {
    /// Non-fungible id of an item instance (equipment, costume, consumable).
    ItemId
}

define_id! {
    /// Identifier of a shop order.
    OrderId
}

define_id! {
    /// Identifier of a tradable item as listed on the shop.
    ///
    /// For non-fungible items this equals the item's [`ItemId`].
    TradableId
}

impl From<ItemId> for TradableId {
    fn from(id: ItemId) -> Self {
        Self(id.0)
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Byte length of a chain address.
pub const ADDRESS_LEN: usize = 20;

/// Error returned when parsing an [`Address`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    /// The input is not valid hex.
    #[error("invalid address hex: {0}")]
    InvalidHex(String),

    /// The decoded input is not exactly 20 bytes.
    #[error("address must be {ADDRESS_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// A 20-byte chain address (account, avatar, or derived state address).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Build an address from raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw address bytes.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Lowercase hex without the `0x` prefix, as stored in the mirror.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(trimmed).map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        let len = bytes.len();
        let array: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_rejected: Vec<u8>| AddressParseError::InvalidLength(len))?;
        Ok(Self(array))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let action = ActionId::new();
        let order = OrderId::new();
        assert_ne!(action.into_inner(), Uuid::nil());
        assert_ne!(order.into_inner(), Uuid::nil());
    }

    #[test]
    fn tradable_id_from_item_id_keeps_uuid() {
        let item = ItemId::new();
        let tradable = TradableId::from(item);
        assert_eq!(tradable.into_inner(), item.into_inner());
    }

    #[test]
    fn address_parses_with_and_without_prefix() {
        let plain: Result<Address, _> = "340f110b91d0577a9ae0ea69ce15269436f217da".parse();
        let prefixed: Result<Address, _> = "0x340F110B91D0577A9AE0EA69CE15269436F217DA".parse();
        assert!(plain.is_ok());
        assert_eq!(plain.ok(), prefixed.ok());
    }

    #[test]
    fn address_display_is_lowercase_hex() {
        let addr = Address::new([0xAB; ADDRESS_LEN]);
        assert_eq!(addr.to_string(), "ab".repeat(ADDRESS_LEN));
    }

    #[test]
    fn address_rejects_wrong_length() {
        let parsed: Result<Address, _> = "abcd".parse();
        assert_eq!(parsed, Err(AddressParseError::InvalidLength(2)));
    }

    #[test]
    fn address_rejects_bad_hex() {
        let parsed: Result<Address, _> = "zz".parse();
        assert!(matches!(parsed, Err(AddressParseError::InvalidHex(_))));
    }

    #[test]
    fn address_serde_is_hex_string() {
        let addr = Address::new([1; ADDRESS_LEN]);
        let json = serde_json::to_string(&addr).ok();
        assert_eq!(json, Some(format!("\"{}\"", "01".repeat(ADDRESS_LEN))));
        let back: Option<Address> = json.and_then(|j| serde_json::from_str(&j).ok());
        assert_eq!(back, Some(addr));
    }
}
