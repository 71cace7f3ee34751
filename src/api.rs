use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use strum::{Display, EnumIter, IntoStaticStr};

use std::fmt;

const STATUS_ID_SEPARATOR: &str = " - ";

// types for POST /item
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub seller_id: i64,
    pub name: String,
    pub price: i64,
    pub statistics: Statistics,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub contacts: i64,
    pub likes: i64,
    pub view_count: i64,
}

impl Listing {
    /// The listing every case starts from.
    pub fn sample(seller_id: i64) -> Self {
        Listing {
            seller_id,
            name: "iPhone XR".to_string(),
            price: 1500,
            statistics: Statistics {
                contacts: 50,
                likes: 12,
                view_count: 416,
            },
        }
    }

    pub fn payload(&self) -> Value {
        serde_json::json!({
            "sellerId": self.seller_id,
            "name": self.name,
            "price": self.price,
            "statistics": {
                "contacts": self.statistics.contacts,
                "likes": self.statistics.likes,
                "viewCount": self.statistics.view_count,
            },
        })
    }

    pub fn payload_without(&self, field: Field) -> Value {
        let mut payload = self.payload();
        if let Value::Object(map) = &mut payload {
            map.remove(field.key());
        }
        payload
    }

    pub fn payload_with_seller_id(&self, seller_id: Value) -> Value {
        let mut payload = self.payload();
        payload["sellerId"] = seller_id;
        payload
    }
}

/// Top-level fields the service is supposed to require on creation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumIter, IntoStaticStr)]
pub enum Field {
    #[strum(serialize = "sellerId")]
    SellerId,
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "price")]
    Price,
    #[strum(serialize = "statistics")]
    Statistics,
}

impl Field {
    pub fn key(&self) -> &'static str {
        self.into()
    }
}

// response of POST /item
#[derive(Debug, Deserialize)]
pub struct Created {
    pub status: String,
}

impl Created {
    pub fn item_id(&self) -> Result<&str, Box<dyn std::error::Error>> {
        item_id_from_status(&self.status)
    }
}

/// The service only reports the new id inside free text, e.g. "Successfully created - 42".
pub fn item_id_from_status(status: &str) -> Result<&str, Box<dyn std::error::Error>> {
    match status.split(STATUS_ID_SEPARATOR).nth(1) {
        Some(id) if !id.trim().is_empty() => Ok(id.trim()),
        _ => Err(format!("Response status format unexpected: '{}'", status).into()),
    }
}

// types for GET /item/{id} and GET /statistic/{id}
// numbers stay loose, the service may send 1500.0 for 1500
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub seller_id: Number,
    pub price: Number,
    pub statistics: StatisticsRecord,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsRecord {
    pub contacts: Number,
    pub likes: Number,
    pub view_count: Number,
}

/// Numeric equality regardless of integer or float encoding.
pub fn number_eq(number: &Number, expected: i64) -> bool {
    match number.as_i64() {
        Some(n) => n == expected,
        None => number.as_f64() == Some(expected as f64),
    }
}

pub fn value_eq(value: Option<&Value>, expected: i64) -> bool {
    match value {
        Some(Value::Number(number)) => number_eq(number, expected),
        _ => false,
    }
}

/// Fetch endpoints wrap a single record in an array.
pub fn first_record(body: &Value) -> Result<&Value, Box<dyn std::error::Error>> {
    match body {
        Value::Array(records) => records
            .first()
            .ok_or_else(|| "Expected one record, got an empty array".into()),
        other => Err(format!("Expected an array of records, got {}", shape(other)).into()),
    }
}

pub fn decode<T>(value: &Value) -> Result<T, Box<dyn std::error::Error>>
where
    T: serde::de::DeserializeOwned,
{
    serde_path_to_error::deserialize(value.clone())
        .map_err(|e| format!("Failed to decode '{}' ({})", e.path(), e.inner()).into())
}

/// Name of a JSON value's kind, for failure messages.
pub fn shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Identifier passed to GET /item/{id} by the malformed-id cases.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemId {
    Number(u64),
    Text(String),
    // sent as a literal "null" segment so the request still targets /item/{id}
    Absent,
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => write!(f, "{}", s),
            ItemId::Absent => write!(f, "null"),
        }
    }
}
