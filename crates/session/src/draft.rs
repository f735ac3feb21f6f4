//! Typed drafts accumulated step by step during a workflow.

use serde::{Deserialize, Serialize};

use common::{CategoryId, ImageRef, Money};
use store::{CatalogItem, ContactInfo, NewCatalogItem};

/// Contact fields gathered during checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
}

impl ContactDraft {
    /// The finished contact info, once every step has run.
    pub fn complete(&self) -> Option<ContactInfo> {
        Some(ContactInfo {
            phone: self.phone.clone()?,
            address: self.address.clone()?,
            postal_code: self.postal_code.clone()?,
        })
    }
}

/// Item fields gathered while authoring or editing a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub category_id: Option<CategoryId>,
    pub cover: Option<ImageRef>,
    pub photo: Option<ImageRef>,
    pub stock: u32,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            description: None,
            price: None,
            category_id: None,
            cover: None,
            photo: None,
            stock: 1,
        }
    }
}

impl ItemDraft {
    /// Pre-seeds a draft from an existing item for the edit workflow, so
    /// every step can keep its current value.
    pub fn from_item(item: &CatalogItem) -> Self {
        Self {
            title: Some(item.title.clone()),
            author: Some(item.author.clone()),
            description: Some(item.description.clone()),
            price: Some(item.price),
            category_id: item.category_id,
            cover: item.cover.clone(),
            photo: item.photo.clone(),
            stock: item.stock,
        }
    }

    /// The finished new-item shape, once the required steps have run.
    pub fn complete(&self) -> Option<NewCatalogItem> {
        Some(NewCatalogItem {
            title: self.title.clone()?,
            author: self.author.clone()?,
            description: self.description.clone()?,
            price: self.price?,
            category_id: self.category_id,
            cover: self.cover.clone(),
            photo: self.photo.clone(),
            stock: self.stock,
        })
    }

    /// Writes the draft over an existing item.
    pub fn apply_to(&self, item: &mut CatalogItem) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(author) = &self.author {
            item.author = author.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        item.category_id = self.category_id;
        item.cover = self.cover.clone();
        item.photo = self.photo.clone();
        item.stock = self.stock;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::ItemId;

    fn item() -> CatalogItem {
        CatalogItem {
            id: ItemId::new(5),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            description: "Spice and sand".to_string(),
            price: Money::from_units(15_000),
            category_id: Some(CategoryId::new(2)),
            cover: None,
            photo: Some(ImageRef::new("file-1")),
            stock: 4,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn contact_draft_completes_only_when_full() {
        let mut draft = ContactDraft::default();
        assert!(draft.complete().is_none());

        draft.phone = Some("0912".to_string());
        draft.address = Some("1 Main St".to_string());
        assert!(draft.complete().is_none());

        draft.postal_code = Some("12345".to_string());
        let contact = draft.complete().unwrap();
        assert_eq!(contact.phone, "0912");
        assert_eq!(contact.postal_code, "12345");
    }

    #[test]
    fn item_draft_defaults_to_one_in_stock() {
        assert_eq!(ItemDraft::default().stock, 1);
        assert!(ItemDraft::default().complete().is_none());
    }

    #[test]
    fn from_item_keeps_every_field() {
        let draft = ItemDraft::from_item(&item());
        let new_item = draft.complete().unwrap();
        assert_eq!(new_item.title, "Dune");
        assert_eq!(new_item.price, Money::from_units(15_000));
        assert_eq!(new_item.category_id, Some(CategoryId::new(2)));
        assert_eq!(new_item.photo.unwrap().as_str(), "file-1");
        assert_eq!(new_item.stock, 4);
    }

    #[test]
    fn apply_to_overwrites_changed_fields() {
        let mut target = item();
        let mut draft = ItemDraft::from_item(&target);
        draft.title = Some("Dune Messiah".to_string());
        draft.price = Some(Money::from_units(18_000));
        draft.category_id = None;

        draft.apply_to(&mut target);
        assert_eq!(target.title, "Dune Messiah");
        assert_eq!(target.author, "Frank Herbert");
        assert_eq!(target.price, Money::from_units(18_000));
        assert_eq!(target.category_id, None);
        assert_eq!(target.photo.as_ref().unwrap().as_str(), "file-1");
    }
}
