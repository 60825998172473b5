//! Append-only [`Purchase`] records.

use chrono::Utc;
use tuckshop_shared::constants::PURCHASES_COLLECTION;

use crate::database::Database;
use crate::error::Result;
use crate::models::{decode_all, to_fields, Item, Purchase, PurchaseFields};

impl Database {
    /// Record a purchase of `quantity` units of `item` for `total_price`.
    pub fn record_purchase(&self, item: &Item, quantity: u32, total_price: &str) -> Result<Purchase> {
        let fields = PurchaseFields {
            item_id: item.id,
            item_name: item.name.clone(),
            quantity,
            total_price: total_price.to_string(),
            purchased_at: Some(Utc::now()),
        };
        let doc = self
            .collection(PURCHASES_COLLECTION)
            .add(to_fields(&fields)?)?;

        tracing::info!(
            purchase_id = %doc.id,
            item_id = %item.id,
            quantity,
            total = %total_price,
            "purchase recorded"
        );

        Purchase::from_document(&doc)
    }

    /// Every purchase, oldest first.
    pub fn list_purchases(&self) -> Result<Vec<Purchase>> {
        let docs = self.collection(PURCHASES_COLLECTION).stream()?;
        Ok(decode_all(&docs, Purchase::from_document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::tests::temp_db;
    use crate::models::ItemFields;

    #[test]
    fn record_and_list() {
        let (_dir, db) = temp_db();
        let item = db
            .create_item(&ItemFields {
                name: "Samosa".into(),
                price: "Ksh 50".into(),
                category: "Snacks".into(),
                stock: None,
            })
            .unwrap();

        let purchase = db.record_purchase(&item, 3, "Ksh 150").unwrap();
        assert_eq!(purchase.item_id, item.id);
        assert_eq!(purchase.item_name, "Samosa");
        assert_eq!(purchase.quantity, 3);
        assert_eq!(purchase.total_price, "Ksh 150");

        assert_eq!(db.list_purchases().unwrap(), vec![purchase]);
    }

    #[test]
    fn stored_document_uses_wire_field_names() {
        let (_dir, db) = temp_db();
        let item = db
            .create_item(&ItemFields {
                name: "Soda".into(),
                price: "Ksh 60".into(),
                category: "Drinks".into(),
                stock: Some(24),
            })
            .unwrap();
        db.record_purchase(&item, 2, "Ksh 120").unwrap();

        let docs = db.collection(PURCHASES_COLLECTION).stream().unwrap();
        let body = &docs[0].data;
        assert_eq!(body["item_id"], item.id.to_string());
        assert_eq!(body["item_name"], "Soda");
        assert_eq!(body["quantity"], 2);
        assert_eq!(body["total_price"], "Ksh 120");
    }
}
