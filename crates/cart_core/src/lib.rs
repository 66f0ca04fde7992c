//! Persisted shopping cart over an injected key-value store.
//!
//! [`CartStore`] owns the read-modify-write cycle for the cart value,
//! [`view`] turns a cart into a renderable page and [`controller`] routes
//! user intents through the store.

use shared::{
    domain::{Cart, CartTotals},
    error::{CartError, ErrorCode},
};
use storage::KeyValueStore;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub mod catalog;
pub mod controller;
pub mod view;

pub use catalog::{Catalog, Product, SearchResult};
pub use controller::{CartController, CartUpdate};
pub use view::{CartLineView, CartPage, CartSummary};

/// Storage key the cart lives under unless configured otherwise.
pub const DEFAULT_CART_KEY: &str = "cart";

pub struct CartStore<S: KeyValueStore> {
    store: S,
    key: String,
    // Held across every load-modify-save so tasks sharing a store never
    // interleave their writes.
    mutation: Mutex<()>,
}

impl<S: KeyValueStore> CartStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_CART_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            mutation: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.store
    }

    /// Reads the persisted cart. Anything other than a well-formed cart
    /// (missing key, bad JSON, broken invariants, backend failure) reads as
    /// an empty cart.
    pub async fn load_cart(&self) -> Cart {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(error) => {
                warn!(key = %self.key, error = %format!("{error:#}"), "cart read failed; using empty cart");
                return Cart::new();
            }
        };

        match decode_cart(&raw) {
            Ok(cart) => cart,
            Err(reason) => {
                warn!(key = %self.key, %reason, "discarding unreadable cart state");
                Cart::new()
            }
        }
    }

    /// Overwrites the stored cart. A cart that breaks the line-item
    /// invariants is refused rather than written, since it would read back
    /// as empty.
    pub async fn save_cart(&self, cart: &Cart) -> Result<(), CartError> {
        if !cart.is_consistent() {
            return Err(CartError::validation("line items violate cart invariants"));
        }
        let _guard = self.mutation.lock().await;
        self.write_cart(cart).await
    }

    pub async fn add_item(&self, name: &str, price: u64) -> Result<(), CartError> {
        let _guard = self.mutation.lock().await;
        let mut cart = self.load_cart().await;
        cart.add(name, price);
        debug!(key = %self.key, %name, price, "added cart item");
        self.write_cart(&cart).await
    }

    pub async fn remove_item(&self, name: &str) -> Result<(), CartError> {
        let _guard = self.mutation.lock().await;
        let mut cart = self.load_cart().await;
        if !cart.remove(name) {
            debug!(key = %self.key, %name, "remove skipped; item not in cart");
            return Ok(());
        }
        debug!(key = %self.key, %name, "removed cart item");
        self.write_cart(&cart).await
    }

    pub async fn set_quantity(&self, name: &str, quantity: i64) -> Result<(), CartError> {
        let _guard = self.mutation.lock().await;
        let mut cart = self.load_cart().await;
        if !cart.set_quantity(name, quantity) {
            debug!(key = %self.key, %name, "quantity update skipped; item not in cart");
            return Ok(());
        }
        debug!(key = %self.key, %name, requested = quantity, "updated cart quantity");
        self.write_cart(&cart).await
    }

    pub async fn clear_cart(&self) -> Result<(), CartError> {
        let _guard = self.mutation.lock().await;
        self.store
            .delete(&self.key)
            .await
            .map_err(storage_failure)?;
        debug!(key = %self.key, "cleared cart");
        Ok(())
    }

    pub async fn totals(&self) -> CartTotals {
        self.load_cart().await.totals()
    }

    async fn write_cart(&self, cart: &Cart) -> Result<(), CartError> {
        let encoded = serde_json::to_string(cart)
            .map_err(|e| CartError::new(ErrorCode::Serialization, e.to_string()))?;
        self.store
            .set(&self.key, &encoded)
            .await
            .map_err(storage_failure)
    }
}

fn decode_cart(raw: &str) -> Result<Cart, serde_json::Error> {
    serde_json::from_str::<Cart>(raw)
}

fn storage_failure(err: anyhow::Error) -> CartError {
    CartError::new(ErrorCode::Storage, format!("{err:#}"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
