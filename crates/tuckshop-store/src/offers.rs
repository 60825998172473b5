//! CRUD operations for [`Offer`] documents.

use chrono::Utc;
use serde_json::Value;
use tuckshop_shared::constants::OFFERS_COLLECTION;
use tuckshop_shared::types::OfferId;

use crate::collection::Fields;
use crate::database::Database;
use crate::error::Result;
use crate::models::{decode_all, to_fields, Offer, OfferFields};

impl Database {
    /// Append an offer stamped with the current time.
    pub fn create_offer(&self, description: &str) -> Result<Offer> {
        let fields = OfferFields {
            description: description.to_string(),
            created_at: Some(Utc::now()),
        };
        let doc = self.collection(OFFERS_COLLECTION).add(to_fields(&fields)?)?;
        Offer::from_document(&doc)
    }

    /// Every offer, in insertion order. Malformed documents are skipped.
    pub fn list_offers(&self) -> Result<Vec<Offer>> {
        let docs = self.collection(OFFERS_COLLECTION).stream()?;
        Ok(decode_all(&docs, Offer::from_document))
    }

    pub fn update_offer(&self, id: OfferId, description: &str) -> Result<Offer> {
        let mut patch = Fields::new();
        patch.insert("description".into(), Value::String(description.to_string()));
        let doc = self.collection(OFFERS_COLLECTION).update(id.0, patch)?;
        Offer::from_document(&doc)
    }

    pub fn delete_offer(&self, id: OfferId) -> Result<bool> {
        self.collection(OFFERS_COLLECTION).delete(id.0)
    }
}
