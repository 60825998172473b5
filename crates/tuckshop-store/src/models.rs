//! Domain models persisted as documents.
//!
//! Each model has a `*Fields` struct describing the document body exactly as
//! it is stored, and a full struct that adds the store id (and timestamps)
//! for the UI layer.

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tuckshop_shared::types::{ItemId, OfferId, PurchaseId};

use crate::collection::{Document, Fields};
use crate::error::{Result, StoreError};

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// Body of an `items` document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ItemFields {
    pub name: String,
    /// Free text, conventionally `"<currency> <amount>"`.
    pub price: String,
    pub category: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "stock_level"
    )]
    pub stock: Option<u32>,
}

/// A catalog item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub price: String,
    pub category: String,
    pub stock: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn from_document(doc: &Document) -> Result<Self> {
        let fields: ItemFields = decode(doc)?;
        Ok(Self {
            id: ItemId(doc.id),
            name: fields.name,
            price: fields.price,
            category: fields.category,
            stock: fields.stock,
            created_at: doc.created_at,
        })
    }

    pub fn fields(&self) -> ItemFields {
        ItemFields {
            name: self.name.clone(),
            price: self.price.clone(),
            category: self.category.clone(),
            stock: self.stock,
        }
    }

    /// List row text, e.g. `Samosa - Ksh 50`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.price)
    }
}

/// Accepts a number, a numeric string, an empty string or null.
fn stock_level<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid stock level {n}"))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid stock level '{s}'"))),
        Some(other) => Err(de::Error::custom(format!("invalid stock level {other}"))),
    }
}

// ---------------------------------------------------------------------------
// Offer
// ---------------------------------------------------------------------------

/// Body of an `offers` document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OfferFields {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A promotional offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offer {
    pub id: OfferId,
    pub description: String,
    /// Falls back to the document's creation time for offers written
    /// without a `created_at` field.
    pub created_at: DateTime<Utc>,
}

impl Offer {
    pub fn from_document(doc: &Document) -> Result<Self> {
        let fields: OfferFields = decode(doc)?;
        Ok(Self {
            id: OfferId(doc.id),
            description: fields.description,
            created_at: fields.created_at.unwrap_or(doc.created_at),
        })
    }
}

// ---------------------------------------------------------------------------
// Purchase
// ---------------------------------------------------------------------------

/// Body of a `purchases` document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PurchaseFields {
    pub item_id: ItemId,
    pub item_name: String,
    pub quantity: u32,
    /// Formatted total, e.g. `Ksh 150`.
    pub total_price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased_at: Option<DateTime<Utc>>,
}

/// A recorded purchase. Purchases are never modified after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Purchase {
    pub id: PurchaseId,
    pub item_id: ItemId,
    pub item_name: String,
    pub quantity: u32,
    pub total_price: String,
    pub purchased_at: DateTime<Utc>,
}

impl Purchase {
    pub fn from_document(doc: &Document) -> Result<Self> {
        let fields: PurchaseFields = decode(doc)?;
        Ok(Self {
            id: PurchaseId(doc.id),
            item_id: fields.item_id,
            item_name: fields.item_name,
            quantity: fields.quantity,
            total_price: fields.total_price,
            purchased_at: fields.purchased_at.unwrap_or(doc.created_at),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn decode<T: DeserializeOwned>(doc: &Document) -> Result<T> {
    serde_json::from_value(Value::Object(doc.data.clone())).map_err(|e| {
        StoreError::MalformedDocument {
            id: doc.id.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Decode a listing. Documents that do not fit the model are logged with
/// their id and left out.
pub(crate) fn decode_all<T>(docs: &[Document], from_document: fn(&Document) -> Result<T>) -> Vec<T> {
    docs.iter()
        .filter_map(|doc| match from_document(doc) {
            Ok(model) => Some(model),
            Err(e) => {
                tracing::warn!(id = %doc.id, error = %e, "Skipping malformed document");
                None
            }
        })
        .collect()
}

/// Serialize a `*Fields` struct into a document body.
pub(crate) fn to_fields<T: Serialize>(value: &T) -> Result<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::MalformedDocument {
            id: String::from("<new>"),
            reason: format!("expected a JSON object, got {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    fn doc(data: Value) -> Document {
        Document {
            id: Uuid::new_v4(),
            data: data.as_object().cloned().unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn item_without_stock_omits_field() {
        let fields = ItemFields {
            name: "Samosa".into(),
            price: "Ksh 50".into(),
            category: "Snacks".into(),
            stock: None,
        };
        let body = to_fields(&fields).unwrap();
        assert!(!body.contains_key("stock"));
        assert_eq!(body.len(), 3);
    }

    #[test]
    fn item_stock_accepts_number_or_numeric_string() {
        let a = Item::from_document(&doc(json!({
            "name": "Soda", "price": "Ksh 60", "category": "Drinks", "stock": 12
        })))
        .unwrap();
        let b = Item::from_document(&doc(json!({
            "name": "Soda", "price": "Ksh 60", "category": "Drinks", "stock": "12"
        })))
        .unwrap();
        let c = Item::from_document(&doc(json!({
            "name": "Soda", "price": "Ksh 60", "category": "Drinks", "stock": ""
        })))
        .unwrap();

        assert_eq!(a.stock, Some(12));
        assert_eq!(b.stock, Some(12));
        assert_eq!(c.stock, None);
        assert_eq!(a.label(), "Soda - Ksh 60");
    }

    #[test]
    fn malformed_item_reports_document_id() {
        let d = doc(json!({ "name": "Soda" }));
        match Item::from_document(&d) {
            Err(StoreError::MalformedDocument { id, .. }) => assert_eq!(id, d.id.to_string()),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn decode_all_skips_documents_that_do_not_fit() {
        let good = doc(json!({ "name": "Samosa", "price": "Ksh 50", "category": "Snacks" }));
        let legacy = doc(json!({ "name": "Chai", "price": "Ksh 20" }));

        let items = decode_all(&[legacy, good.clone()], Item::from_document);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, ItemId(good.id));
    }

    #[test]
    fn offer_falls_back_to_document_time() {
        let d = doc(json!({ "description": "Free tea with any snack" }));
        let offer = Offer::from_document(&d).unwrap();
        assert_eq!(offer.created_at, d.created_at);
        assert_eq!(offer.id, OfferId(d.id));
    }
}
