use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A salon client, stored in the `clients` collection.
///
/// Mirrors the `client` table of the fixture dump; `password` is carried
/// verbatim from that dump (pre-existing data artifact, the application's
/// own accounts live in Firebase Auth).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub name: String,
    pub gender: Gender,
    pub age: i64,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    F,
    M,
}

/// A product, stored in the `products` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub order_no: String,
    pub product_name: String,
    pub description: Option<String>,
    pub price_min: f64,
    pub price_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
