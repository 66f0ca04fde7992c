//! Routes user intents to the cart store and re-renders after each one.

use shared::protocol::{CartIntent, Notification};
use storage::KeyValueStore;
use tracing::{debug, error};

use crate::{
    view::{build_page, CartPage},
    CartStore,
};

/// Result of handling one intent: the page to show now and an optional
/// toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartUpdate {
    pub page: CartPage,
    pub notification: Option<Notification>,
}

pub struct CartController<S: KeyValueStore> {
    store: CartStore<S>,
}

impl<S: KeyValueStore> CartController<S> {
    pub fn new(store: CartStore<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CartStore<S> {
        &self.store
    }

    pub async fn display(&self) -> CartPage {
        build_page(&self.store.load_cart().await)
    }

    /// Applies `intent`. Store failures come back as an error notification;
    /// the page is always rendered.
    pub async fn dispatch(&self, intent: CartIntent) -> CartUpdate {
        let intent_name = intent.name();
        debug!(intent = intent_name, "dispatching cart intent");

        let outcome = match intent {
            CartIntent::AddItem { name, price } => self
                .store
                .add_item(&name, price)
                .await
                .map(|()| Some(Notification::success(format!("{name} added to cart")))),
            CartIntent::RemoveItem { name } => self
                .store
                .remove_item(&name)
                .await
                .map(|()| Some(Notification::info("Item removed"))),
            CartIntent::SetQuantity { name, quantity } => self
                .store
                .set_quantity(&name, quantity)
                .await
                .map(|()| None),
            CartIntent::ClearCart { confirmed: false } => Ok(None),
            CartIntent::ClearCart { confirmed: true } => self
                .store
                .clear_cart()
                .await
                .map(|()| Some(Notification::success("Cart cleared!"))),
            CartIntent::Checkout => Ok(Some(Notification::info("Proceeding to checkout..."))),
        };

        let notification = match outcome {
            Ok(notification) => notification,
            Err(err) => {
                error!(intent = intent_name, code = ?err.code, reason = %err.message, "cart update failed");
                Some(Notification::error(format!(
                    "Could not update your cart: {}",
                    err.message
                )))
            }
        };

        CartUpdate {
            page: self.display().await,
            notification,
        }
    }
}
