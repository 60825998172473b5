use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

document_id!(
    /// Store identifier of a catalog item.
    ItemId
);

document_id!(
    /// Store identifier of a promotional offer.
    OfferId
);

document_id!(
    /// Store identifier of a recorded purchase.
    PurchaseId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_uuid() {
        let id = ItemId::new();
        assert_eq!(id.to_string(), id.0.to_string());
        assert_ne!(id, ItemId::new());
    }

    #[test]
    fn serializes_as_bare_uuid() {
        let id = OfferId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
    }
}
