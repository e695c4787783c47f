//! User record model
//!
//! Field names on the wire and in the store are the Spanish names used by
//! existing clients (`nombre`, `telefono`, ...). Rust-side names are English.

use std::fmt;

use bson::oid::ObjectId;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Stored field names.
///
/// These are the keys of the persisted document and of the JSON request body.
pub mod fields {
    /// Store-generated identifier
    pub const ID: &str = "_id";
    /// Display name
    pub const NAME: &str = "nombre";
    /// Phone number
    pub const PHONE: &str = "telefono";
    /// Postal address
    pub const ADDRESS: &str = "direccion";
    /// Natural key (national identification number)
    pub const NATIONAL_ID: &str = "cedula";
    /// Email address
    pub const EMAIL: &str = "correo";

    /// Fields overwritten by an update, in the order they are written.
    pub const MUTABLE: [&str; 4] = [NAME, PHONE, ADDRESS, EMAIL];
}

/// A persisted user record.
///
/// `id` is assigned by the store and never changes. `national_id` is the
/// natural key; the store carries a unique index on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Store-generated identifier
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Display name
    #[serde(rename = "nombre", default)]
    pub name: String,
    /// Phone number
    #[serde(rename = "telefono", default)]
    pub phone: String,
    /// Postal address
    #[serde(rename = "direccion", default)]
    pub address: String,
    /// National identification number
    #[serde(rename = "cedula", default)]
    pub national_id: String,
    /// Email address
    #[serde(rename = "correo", default)]
    pub email: String,
}

impl Record {
    /// Create a record that has not been stored yet.
    pub fn new(national_id: impl Into<String>, update: RecordUpdate) -> Self {
        Self {
            id: None,
            name: update.name,
            phone: update.phone,
            address: update.address,
            national_id: national_id.into(),
            email: update.email,
        }
    }

    /// The four mutable fields of this record.
    pub fn mutable_fields(&self) -> RecordUpdate {
        RecordUpdate {
            name: self.name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            email: self.email.clone(),
        }
    }
}

/// The mutable part of a record, as carried by an update request.
///
/// Decoding is lenient in the ways existing clients rely on:
/// - unknown keys are ignored, so `id`, `_id` and `cedula` in a request
///   body never reach the store
/// - keys match field names regardless of case (`"Nombre"` sets `name`)
/// - a `null` value leaves the field as decoded so far, and a top-level
///   `null` is an empty update
///
/// A missing key decodes as the empty string and overwrites the stored
/// value just like an explicit `""` would. When a key appears more than
/// once the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordUpdate {
    /// Display name
    #[serde(rename = "nombre")]
    pub name: String,
    /// Phone number
    #[serde(rename = "telefono")]
    pub phone: String,
    /// Postal address
    #[serde(rename = "direccion")]
    pub address: String,
    /// Email address
    #[serde(rename = "correo")]
    pub email: String,
}

impl RecordUpdate {
    /// Field name / value pairs in [`fields::MUTABLE`] order.
    pub fn assignments(&self) -> [(&'static str, &str); 4] {
        [
            (fields::NAME, self.name.as_str()),
            (fields::PHONE, self.phone.as_str()),
            (fields::ADDRESS, self.address.as_str()),
            (fields::EMAIL, self.email.as_str()),
        ]
    }
}

impl RecordUpdate {
    fn slot(&mut self, key: &str) -> Option<&mut String> {
        let key = key.to_lowercase();
        match key.as_str() {
            fields::NAME => Some(&mut self.name),
            fields::PHONE => Some(&mut self.phone),
            fields::ADDRESS => Some(&mut self.address),
            fields::EMAIL => Some(&mut self.email),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for RecordUpdate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(RecordUpdateVisitor)
    }
}

struct RecordUpdateVisitor;

impl<'de> Visitor<'de> for RecordUpdateVisitor {
    type Value = RecordUpdate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a record update object")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(RecordUpdate::default())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(RecordUpdate::default())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut update = RecordUpdate::default();
        while let Some(key) = map.next_key::<String>()? {
            match update.slot(&key) {
                Some(slot) => {
                    if let Some(value) = map.next_value::<Option<String>>()? {
                        *slot = value;
                    }
                }
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(update)
    }
}

/// National identification number used as the lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NationalId(String);

impl NationalId {
    /// Wrap a raw key.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NationalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NationalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for NationalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
