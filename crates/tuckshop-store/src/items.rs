//! CRUD operations for [`Item`] documents.

use serde_json::Value;
use tuckshop_shared::constants::ITEMS_COLLECTION;
use tuckshop_shared::types::ItemId;

use crate::collection::Filter;
use crate::database::Database;
use crate::error::Result;
use crate::models::{decode_all, to_fields, Item, ItemFields};

impl Database {
    /// Insert a new item. Duplicate names are allowed.
    pub fn create_item(&self, fields: &ItemFields) -> Result<Item> {
        let doc = self.collection(ITEMS_COLLECTION).add(to_fields(fields)?)?;
        Item::from_document(&doc)
    }

    /// Every item, in insertion order. Malformed documents are skipped.
    pub fn list_items(&self) -> Result<Vec<Item>> {
        let docs = self.collection(ITEMS_COLLECTION).stream()?;
        Ok(decode_all(&docs, Item::from_document))
    }

    /// Items whose name is exactly `name`, in insertion order.
    pub fn find_items_by_name(&self, name: &str) -> Result<Vec<Item>> {
        let docs = self
            .collection(ITEMS_COLLECTION)
            .filter(&Filter::eq("name", name))?;
        Ok(decode_all(&docs, Item::from_document))
    }

    /// Overwrite an item's fields. A `None` stock removes the field.
    pub fn update_item(&self, id: ItemId, fields: &ItemFields) -> Result<Item> {
        let mut patch = to_fields(fields)?;
        if fields.stock.is_none() {
            patch.insert("stock".into(), Value::Null);
        }
        let doc = self.collection(ITEMS_COLLECTION).update(id.0, patch)?;
        Item::from_document(&doc)
    }

    /// Delete an item by id.  Returns `true` if it existed.
    pub fn delete_item(&self, id: ItemId) -> Result<bool> {
        self.collection(ITEMS_COLLECTION).delete(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::tests::temp_db;
    use crate::error::StoreError;

    fn samosa() -> ItemFields {
        ItemFields {
            name: "Samosa".into(),
            price: "Ksh 50".into(),
            category: "Snacks".into(),
            stock: None,
        }
    }

    #[test]
    fn create_and_list() {
        let (_dir, db) = temp_db();
        let created = db.create_item(&samosa()).unwrap();

        let items = db.list_items().unwrap();
        assert_eq!(items, vec![created.clone()]);
        assert_eq!(items[0].fields(), samosa());
    }

    #[test]
    fn list_skips_malformed_documents() {
        let (_dir, db) = temp_db();
        let legacy = db
            .collection(ITEMS_COLLECTION)
            .add(
                serde_json::json!({ "name": "Chai", "price": "Ksh 20" })
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .unwrap();
        let item = db.create_item(&samosa()).unwrap();

        assert_eq!(db.list_items().unwrap(), vec![item]);
        assert!(db.find_items_by_name("Chai").unwrap().is_empty());
        assert_eq!(db.collection(ITEMS_COLLECTION).get(legacy.id).unwrap().id, legacy.id);
    }

    #[test]
    fn find_by_name_returns_duplicates_oldest_first() {
        let (_dir, db) = temp_db();
        let first = db.create_item(&samosa()).unwrap();
        db.create_item(&ItemFields {
            name: "Chapati".into(),
            ..samosa()
        })
        .unwrap();
        let second = db
            .create_item(&ItemFields {
                price: "Ksh 70".into(),
                ..samosa()
            })
            .unwrap();

        let hits = db.find_items_by_name("Samosa").unwrap();
        assert_eq!(
            hits.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
        assert!(db.find_items_by_name("Pizza").unwrap().is_empty());
    }

    #[test]
    fn update_replaces_fields_and_clears_stock() {
        let (_dir, db) = temp_db();
        let item = db
            .create_item(&ItemFields {
                stock: Some(8),
                ..samosa()
            })
            .unwrap();

        let updated = db
            .update_item(
                item.id,
                &ItemFields {
                    name: "Beef Samosa".into(),
                    price: "Ksh 60".into(),
                    category: "Snacks".into(),
                    stock: None,
                },
            )
            .unwrap();

        assert_eq!(updated.id, item.id);
        assert_eq!(updated.name, "Beef Samosa");
        assert_eq!(updated.price, "Ksh 60");
        assert_eq!(updated.stock, None);
        assert_eq!(updated.created_at, item.created_at);
    }

    #[test]
    fn delete_leaves_same_named_items() {
        let (_dir, db) = temp_db();
        let a = db.create_item(&samosa()).unwrap();
        let b = db.create_item(&samosa()).unwrap();

        assert!(db.delete_item(a.id).unwrap());

        let remaining = db.list_items().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.id);
        assert!(matches!(
            db.collection(ITEMS_COLLECTION).get(a.id.0),
            Err(StoreError::NotFound)
        ));
    }
}
