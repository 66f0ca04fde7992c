//! Cart page model and its text rendering.
//!
//! The page is rebuilt from a freshly loaded cart after every action, so the
//! totals shown always match the stored line items.

use std::fmt::Write as _;

use shared::{
    domain::{Cart, CartLineItem, CartTotals},
    protocol::CartIntent,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartPage {
    Empty,
    Items(CartSummary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<CartLineView>,
    pub totals: CartTotals,
}

/// One rendered line plus the intents its controls dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub name: String,
    pub price: u64,
    pub quantity: u32,
    pub line_total: u64,
    pub decrement: CartIntent,
    pub increment: CartIntent,
    pub remove: CartIntent,
}

impl CartLineView {
    fn from_item(item: &CartLineItem) -> Self {
        let quantity = i64::from(item.quantity);
        Self {
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
            line_total: item.line_total(),
            decrement: CartIntent::SetQuantity {
                name: item.name.clone(),
                quantity: quantity - 1,
            },
            increment: CartIntent::SetQuantity {
                name: item.name.clone(),
                quantity: quantity + 1,
            },
            remove: CartIntent::RemoveItem {
                name: item.name.clone(),
            },
        }
    }
}

impl CartPage {
    pub fn is_empty(&self) -> bool {
        matches!(self, CartPage::Empty)
    }

    pub fn line(&self, name: &str) -> Option<&CartLineView> {
        match self {
            CartPage::Empty => None,
            CartPage::Items(summary) => summary.lines.iter().find(|line| line.name == name),
        }
    }
}

pub fn build_page(cart: &Cart) -> CartPage {
    if cart.is_empty() {
        return CartPage::Empty;
    }

    CartPage::Items(CartSummary {
        lines: cart.items().iter().map(CartLineView::from_item).collect(),
        totals: cart.totals(),
    })
}

pub fn format_amount(currency: &str, amount: u64) -> String {
    format!("{currency}{amount}")
}

pub fn render_text(page: &CartPage, currency: &str) -> String {
    let summary = match page {
        CartPage::Empty => return "Your cart is empty.\n".to_string(),
        CartPage::Items(summary) => summary,
    };

    let mut out = String::new();
    for line in &summary.lines {
        let _ = writeln!(
            out,
            "{}  x{}  {} each  Total: {}",
            line.name,
            line.quantity,
            format_amount(currency, line.price),
            format_amount(currency, line.line_total),
        );
    }
    let _ = writeln!(out, "Subtotal: {}", format_amount(currency, summary.totals.subtotal));
    let _ = writeln!(out, "Tax: {}", format_amount(currency, summary.totals.tax));
    let _ = writeln!(out, "Total: {}", format_amount(currency, summary.totals.total));
    out
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
