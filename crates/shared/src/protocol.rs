use serde::{Deserialize, Serialize};

/// How long an on-screen notification stays up before it dismisses itself.
pub const NOTIFICATION_DISMISS_AFTER_MS: u64 = 4000;

/// A user action routed from the front end to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum CartIntent {
    AddItem {
        name: String,
        price: u64,
    },
    RemoveItem {
        name: String,
    },
    SetQuantity {
        name: String,
        quantity: i64,
    },
    ClearCart {
        confirmed: bool,
    },
    Checkout,
}

impl CartIntent {
    pub fn name(&self) -> &'static str {
        match self {
            CartIntent::AddItem { .. } => "add_item",
            CartIntent::RemoveItem { .. } => "remove_item",
            CartIntent::SetQuantity { .. } => "set_quantity",
            CartIntent::ClearCart { .. } => "clear_cart",
            CartIntent::Checkout => "checkout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub dismiss_after_ms: u64,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            dismiss_after_ms: NOTIFICATION_DISMISS_AFTER_MS,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }
}
