use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CartError;

/// Sales tax applied on top of the subtotal, in whole percent.
pub const TAX_RATE_PERCENT: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub name: String,
    pub price: u64,
    pub quantity: u32,
}

impl CartLineItem {
    pub fn new(name: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            price,
            quantity: 1,
        }
    }

    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: u64,
    pub tax: u64,
    pub total: u64,
}

impl CartTotals {
    pub fn from_subtotal(subtotal: u64) -> Self {
        let tax = tax_for(subtotal);
        Self {
            subtotal,
            tax,
            total: subtotal.saturating_add(tax),
        }
    }
}

/// Tax on `subtotal`, rounded half-up to a whole unit.
pub fn tax_for(subtotal: u64) -> u64 {
    let scaled = u128::from(subtotal) * u128::from(TAX_RATE_PERCENT) + 50;
    u64::try_from(scaled / 100).unwrap_or(u64::MAX)
}

/// Insertion-ordered line items, keyed by exact product name.
///
/// Serializes as a bare JSON array so the persisted value is the list itself.
/// Deserializing goes through the same invariant check as [`Cart::from_items`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from raw items, rejecting lists that break the cart
    /// invariants (zero quantity or a repeated name).
    pub fn from_items(items: Vec<CartLineItem>) -> Option<Self> {
        let cart = Self { items };
        cart.is_consistent().then_some(cart)
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.name == name)
    }

    /// Adds one unit of `name`. An existing line keeps the price it was first added at.
    pub fn add(&mut self, name: &str, price: u64) {
        match self.get_mut(name) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(CartLineItem::new(name, price)),
        }
    }

    /// Returns whether a line was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.name != name);
        self.items.len() != before
    }

    /// Sets the quantity of an existing line, clamped to at least one.
    /// Returns whether the line exists.
    pub fn set_quantity(&mut self, name: &str, quantity: i64) -> bool {
        let Some(item) = self.get_mut(name) else {
            return false;
        };
        item.quantity = clamp_quantity(quantity);
        true
    }

    pub fn subtotal(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.line_total()))
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from_subtotal(self.subtotal())
    }

    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.items.len());
        self.items
            .iter()
            .all(|item| item.quantity >= 1 && seen.insert(item.name.as_str()))
    }
}

impl TryFrom<Vec<CartLineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<CartLineItem>) -> Result<Self, Self::Error> {
        Cart::from_items(items).ok_or_else(|| {
            CartError::validation("line items violate cart invariants")
        })
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: u64, quantity: u32) -> CartLineItem {
        CartLineItem {
            name: name.to_string(),
            price,
            quantity,
        }
    }

    #[test]
    fn totals_round_tax_half_up() {
        let cart = Cart::from_items(vec![item("Keyboard", 100, 2), item("Pad", 50, 1)])
            .expect("consistent cart");
        let totals = cart.totals();
        assert_eq!(totals.subtotal, 250);
        assert_eq!(totals.tax, 38);
        assert_eq!(totals.total, 288);
    }

    #[test]
    fn tax_rounds_to_nearest_unit() {
        // 1.95, 0.45, 1.5
        assert_eq!(tax_for(13), 2);
        assert_eq!(tax_for(3), 0);
        assert_eq!(tax_for(10), 2);
        assert_eq!(tax_for(0), 0);
    }

    #[test]
    fn add_keeps_first_price() {
        let mut cart = Cart::new();
        cart.add("Mouse", 500);
        cart.add("Mouse", 999);
        assert_eq!(cart.items(), &[item("Mouse", 500, 2)]);
    }

    #[test]
    fn names_match_exactly() {
        let mut cart = Cart::new();
        cart.add("Mouse", 500);
        cart.add("mouse", 500);
        cart.add("Mouse ", 500);
        assert_eq!(cart.len(), 3);
        assert!(!cart.remove("MOUSE"));
    }

    #[test]
    fn quantity_never_drops_below_one() {
        let mut cart = Cart::new();
        cart.add("Mouse", 500);
        assert!(cart.set_quantity("Mouse", 0));
        assert_eq!(cart.get("Mouse").map(|i| i.quantity), Some(1));
        assert!(cart.set_quantity("Mouse", -5));
        assert_eq!(cart.get("Mouse").map(|i| i.quantity), Some(1));
        assert!(cart.set_quantity("Mouse", i64::MAX));
        assert_eq!(cart.get("Mouse").map(|i| i.quantity), Some(u32::MAX));
        assert!(!cart.set_quantity("Headset", 3));
    }

    #[test]
    fn rejects_inconsistent_items() {
        assert!(Cart::from_items(vec![item("A", 1, 0)]).is_none());
        assert!(Cart::from_items(vec![item("A", 1, 1), item("A", 2, 1)]).is_none());
        assert!(Cart::from_items(vec![item("A", 1, 1), item("B", 2, 3)]).is_some());
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut cart = Cart::new();
        cart.add("Mouse", 500);
        let json = serde_json::to_string(&cart).expect("serialize");
        assert_eq!(json, r#"[{"name":"Mouse","price":500,"quantity":1}]"#);
    }

    #[test]
    fn deserializing_checks_invariants() {
        let repeated = r#"[{"name":"Mouse","price":500,"quantity":1},{"name":"Mouse","price":500,"quantity":2}]"#;
        assert!(serde_json::from_str::<Cart>(repeated).is_err());
        assert!(
            serde_json::from_str::<Cart>(r#"[{"name":"Mouse","price":500,"quantity":0}]"#)
                .is_err()
        );

        let cart: Cart =
            serde_json::from_str(r#"[{"name":"Mouse","price":500,"quantity":3}]"#)
                .expect("valid cart");
        assert_eq!(cart.items(), &[item("Mouse", 500, 3)]);
    }
}
