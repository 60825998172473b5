//! Screen state for the login screen and the three main-screen panels.
//!
//! Views hold exactly what is on screen: the last loaded rows, the current
//! selection and the form contents. Nothing here talks to the store.

use tuckshop_shared::constants::OFFER_BULLET;
use tuckshop_store::{Item, ItemFields, Offer};

use crate::error::CommandError;

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the user (the desktop variant's modal dialogs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum Screen {
    Login { message: Option<String> },
    Main(Box<MainView>),
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Login { message: None }
    }
}

#[derive(Debug)]
pub struct MainView {
    pub admin: String,
    pub catalog: CatalogView,
    pub offers: OffersView,
    pub purchase: PurchaseForm,
}

impl MainView {
    pub fn new(admin: &str) -> Self {
        Self {
            admin: admin.to_string(),
            catalog: CatalogView::default(),
            offers: OffersView::default(),
            purchase: PurchaseForm::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Item catalog
// ---------------------------------------------------------------------------

/// The four item entry fields, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub name: String,
    pub price: String,
    pub category: String,
    /// Optional; empty means "no stock tracked".
    pub stock: String,
}

impl ItemForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Copy a row's values into the form.
    pub fn load(&mut self, item: &Item) {
        self.name = item.name.clone();
        self.price = item.price.clone();
        self.category = item.category.clone();
        self.stock = item.stock.map(|s| s.to_string()).unwrap_or_default();
    }

    /// Validate the form into a document body.
    pub fn to_fields(&self) -> Result<ItemFields, CommandError> {
        let name = self.name.trim();
        let price = self.price.trim();
        let category = self.category.trim();
        if name.is_empty() || price.is_empty() || category.is_empty() {
            return Err(CommandError::Validation(
                "Name, price and category are required".into(),
            ));
        }

        let stock = match self.stock.trim() {
            "" => None,
            raw => Some(raw.parse::<u32>().map_err(|_| {
                CommandError::Validation(format!("Stock '{raw}' is not a whole number"))
            })?),
        };

        Ok(ItemFields {
            name: name.to_string(),
            price: price.to_string(),
            category: category.to_string(),
            stock,
        })
    }
}

#[derive(Debug, Default)]
pub struct CatalogView {
    pub items: Vec<Item>,
    pub selected: Option<usize>,
    pub form: ItemForm,
    /// Set once any load has populated the list.
    pub loaded: bool,
}

impl CatalogView {
    /// Replace the rows. The selection follows its item by id, or is
    /// dropped if that item is gone.
    pub fn set_items(&mut self, items: Vec<Item>) {
        let selected_id = self.selected_item().map(|item| item.id);
        self.items = items;
        self.selected = selected_id.and_then(|id| self.items.iter().position(|i| i.id == id));
        self.loaded = true;
    }

    /// Select row `index` and copy it into the form.
    pub fn select(&mut self, index: usize) -> Result<&Item, CommandError> {
        let item = self
            .items
            .get(index)
            .ok_or_else(|| CommandError::Validation(format!("No item at row {}", index + 1)))?;
        self.form.load(item);
        self.selected = Some(index);
        Ok(item)
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.selected.and_then(|i| self.items.get(i))
    }

    pub fn reset_form(&mut self) {
        self.form.clear();
        self.selected = None;
    }

    pub fn rows(&self) -> Vec<String> {
        self.items.iter().map(Item::label).collect()
    }
}

// ---------------------------------------------------------------------------
// Offers
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct OffersView {
    pub offers: Vec<Offer>,
    pub selected: Option<usize>,
    pub loaded: bool,
}

impl OffersView {
    pub fn set_offers(&mut self, offers: Vec<Offer>) {
        let selected_id = self.selected_offer().map(|offer| offer.id);
        self.offers = offers;
        self.selected = selected_id.and_then(|id| self.offers.iter().position(|o| o.id == id));
        self.loaded = true;
    }

    pub fn select(&mut self, index: usize) -> Result<&Offer, CommandError> {
        let offer = self
            .offers
            .get(index)
            .ok_or_else(|| CommandError::Validation(format!("No offer at row {}", index + 1)))?;
        self.selected = Some(index);
        Ok(offer)
    }

    /// Select the first offer whose description equals a displayed line,
    /// bullet and padding removed. Runs of whitespace compare equal.
    pub fn select_text(&mut self, line: &str) -> Result<&Offer, CommandError> {
        let wanted = strip_bullet(line);
        let index = self
            .offers
            .iter()
            .position(|o| o.description.split_whitespace().eq(wanted.split_whitespace()))
            .ok_or_else(|| CommandError::NotFound(format!("No offer reads '{wanted}'")))?;
        self.select(index)
    }

    pub fn selected_offer(&self) -> Option<&Offer> {
        self.selected.and_then(|i| self.offers.get(i))
    }

    pub fn lines(&self) -> Vec<String> {
        self.offers
            .iter()
            .map(|o| format!("{OFFER_BULLET} {}", o.description))
            .collect()
    }
}

/// Remove a leading bullet marker and surrounding whitespace. `-` and `*`
/// only count as markers when followed by whitespace, so `-20% on soda`
/// keeps its sign.
pub fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix(OFFER_BULLET) {
        return rest.trim();
    }
    ['-', '*']
        .iter()
        .find_map(|&marker| {
            line.strip_prefix(marker)
                .filter(|rest| rest.starts_with(char::is_whitespace))
        })
        .unwrap_or(line)
        .trim()
}

// ---------------------------------------------------------------------------
// Purchases
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct PurchaseForm {
    pub item_name: String,
    pub quantity: String,
    /// Outcome of the last purchase, e.g. `Purchase successful! Total price: Ksh 150`.
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tuckshop_shared::types::{ItemId, OfferId};

    use super::*;

    fn item(name: &str, price: &str) -> Item {
        Item {
            id: ItemId::new(),
            name: name.into(),
            price: price.into(),
            category: "Snacks".into(),
            stock: Some(5),
            created_at: Utc::now(),
        }
    }

    fn offer(description: &str) -> Offer {
        Offer {
            id: OfferId::new(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn form_requires_name_price_category() {
        let form = ItemForm {
            name: "Samosa".into(),
            price: "  ".into(),
            category: "Snacks".into(),
            stock: String::new(),
        };
        assert!(matches!(form.to_fields(), Err(CommandError::Validation(_))));
    }

    #[test]
    fn form_parses_optional_stock() {
        let mut form = ItemForm {
            name: " Samosa ".into(),
            price: "Ksh 50".into(),
            category: "Snacks".into(),
            stock: "12".into(),
        };
        let fields = form.to_fields().unwrap();
        assert_eq!(fields.name, "Samosa");
        assert_eq!(fields.stock, Some(12));

        form.stock = "lots".into();
        assert!(matches!(form.to_fields(), Err(CommandError::Validation(_))));
    }

    #[test]
    fn selecting_a_row_fills_the_form() {
        let mut catalog = CatalogView::default();
        catalog.set_items(vec![item("Samosa", "Ksh 50"), item("Soda", "Ksh 60")]);

        catalog.select(1).unwrap();
        assert_eq!(catalog.form.name, "Soda");
        assert_eq!(catalog.form.price, "Ksh 60");
        assert_eq!(catalog.form.stock, "5");
        assert!(catalog.select(2).is_err());
        assert_eq!(catalog.rows(), ["Samosa - Ksh 50", "Soda - Ksh 60"]);
    }

    #[test]
    fn selection_follows_item_across_reload() {
        let a = item("Samosa", "Ksh 50");
        let b = item("Soda", "Ksh 60");
        let mut catalog = CatalogView::default();
        catalog.set_items(vec![a.clone(), b.clone()]);
        catalog.select(1).unwrap();

        catalog.set_items(vec![b.clone()]);
        assert_eq!(catalog.selected, Some(0));

        catalog.set_items(vec![a]);
        assert_eq!(catalog.selected, None);
    }

    #[test]
    fn offer_selection_by_displayed_line() {
        let mut offers = OffersView::default();
        offers.set_offers(vec![offer("Free tea"), offer("2 for 1 mandazi")]);

        assert_eq!(offers.lines()[1], "• 2 for 1 mandazi");
        let picked = offers.select_text("  • 2 for 1 mandazi ").unwrap().id;
        assert_eq!(Some(picked), offers.selected_offer().map(|o| o.id));
        assert!(matches!(
            offers.select_text("• nothing"),
            Err(CommandError::NotFound(_))
        ));
    }

    #[test]
    fn strip_bullet_variants() {
        assert_eq!(strip_bullet("• Free tea"), "Free tea");
        assert_eq!(strip_bullet("  - Free tea  "), "Free tea");
        assert_eq!(strip_bullet("Free tea"), "Free tea");
        assert_eq!(strip_bullet("* 2 for 1"), "2 for 1");
        assert_eq!(strip_bullet("-20% on soda"), "-20% on soda");
        assert_eq!(strip_bullet("*new* chapati"), "*new* chapati");
    }

    #[test]
    fn offer_text_with_leading_sign_is_selectable() {
        let mut offers = OffersView::default();
        offers.set_offers(vec![offer("Free tea"), offer("-20% on soda")]);

        let line = offers.lines()[1].clone();
        assert_eq!(line, "• -20% on soda");
        assert_eq!(offers.select_text(&line).unwrap().description, "-20% on soda");
        assert_eq!(offers.select_text("-20% on soda").unwrap().description, "-20% on soda");
    }

    #[test]
    fn offer_text_matches_despite_collapsed_spaces() {
        let mut offers = OffersView::default();
        offers.set_offers(vec![offer("Buy 2  get 1   free")]);

        assert!(offers.select_text("• Buy 2 get 1 free").is_ok());
        assert_eq!(offers.selected, Some(0));
        assert!(offers.select_text("• Buy 2 get 1").is_err());
    }
}
