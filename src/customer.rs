//! The customer model supplied by the customer feed.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, de::Visitor};

/// An opaque, stable identifier for a customer.
///
/// Feeds may encode IDs as JSON numbers or strings, both are stored as text
/// so that `1` and `"1"` refer to the same customer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    /// The ID as it appears in URLs and in the customer table.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CustomerId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for CustomerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for CustomerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CustomerIdVisitor;

        impl<'de> Visitor<'de> for CustomerIdVisitor {
            type Value = CustomerId;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a customer id as a number or a string")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(CustomerId(value.to_string()))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(CustomerId(value.to_string()))
            }

            // `1.0` formats as "1", matching the integer ID.
            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(CustomerId(value.to_string()))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(CustomerId::from(value))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(CustomerId::from(value))
            }
        }

        deserializer.deserialize_any(CustomerIdVisitor)
    }
}

/// A customer as listed in the dashboard table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// The customer's ID, referenced by [crate::Transaction::customer_id].
    pub id: CustomerId,
    /// The customer's display name.
    pub name: String,
}

impl Customer {
    /// Create a customer from an ID and a name.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: CustomerId::from(id),
            name: name.to_owned(),
        }
    }
}
