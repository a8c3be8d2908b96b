//! Cart line-item value types and pure list transforms.
//!
//! All transforms take the current list by reference and return a fresh
//! `Vec`, so a committed snapshot is never aliased by a later mutation.

use serde::{Deserialize, Serialize};

use gomarket_core::{Price, ProductId, Quantity};

/// One product entry in the cart with an associated quantity.
///
/// `title`, `image_url`, and `price` are descriptive attributes carried over
/// from the catalog at first insertion and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique product identifier; primary key for dedup and lookup.
    pub id: ProductId,
    /// Product title as shown in the catalog.
    pub title: String,
    /// Product image URL.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
    /// Units of this product in the cart, always >= 1.
    pub quantity: Quantity,
}

/// A candidate line item: a product without a quantity yet.
///
/// Adding a `NewLineItem` to the cart either appends a [`LineItem`] with
/// quantity 1 or bumps the quantity of the existing entry for the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLineItem {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Product image URL.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
}

impl From<NewLineItem> for LineItem {
    fn from(candidate: NewLineItem) -> Self {
        Self {
            id: candidate.id,
            title: candidate.title,
            image_url: candidate.image_url,
            price: candidate.price,
            quantity: Quantity::ONE,
        }
    }
}

/// Add `candidate` to `items`: append with quantity 1 if the id is absent,
/// otherwise bump the existing entry's quantity by one.
///
/// The existing entry's attributes win; the candidate's title/price/image are
/// only used on first insertion. Linear scan is fine at cart scale.
pub(crate) fn with_added(items: &[LineItem], candidate: NewLineItem) -> Vec<LineItem> {
    let mut next: Vec<LineItem> = Vec::with_capacity(items.len() + 1);
    let mut found = false;

    for item in items {
        if item.id == candidate.id {
            found = true;
            next.push(LineItem {
                quantity: item.quantity.saturating_increment(),
                ..item.clone()
            });
        } else {
            next.push(item.clone());
        }
    }

    if !found {
        next.push(LineItem::from(candidate));
    }

    next
}

/// Apply `adjust` to the quantity of the entry with `id`, returning the new
/// list, or `None` if no entry has that id.
pub(crate) fn with_adjusted(
    items: &[LineItem],
    id: &ProductId,
    adjust: impl Fn(Quantity) -> Quantity,
) -> Option<Vec<LineItem>> {
    if !items.iter().any(|item| &item.id == id) {
        return None;
    }

    Some(
        items
            .iter()
            .map(|item| {
                if &item.id == id {
                    LineItem {
                        quantity: adjust(item.quantity),
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect(),
    )
}
