//! Status enums for marketplace entities.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders are created `Pending` by checkout and only ever move forward via
/// status transitions; they are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Stable string form used for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse the stable string form. Returns `None` for unknown values.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Notification event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewOrder,
    NewMessage,
    NewReview,
    LowStock,
}

impl NotificationKind {
    /// Stable string form used for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NewOrder => "new_order",
            Self::NewMessage => "new_message",
            Self::NewReview => "new_review",
            Self::LowStock => "low_stock",
        }
    }

    /// Parse the stable string form. Returns `None` for unknown values.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new_order" => Some(Self::NewOrder),
            "new_message" => Some(Self::NewMessage),
            "new_review" => Some(Self::NewReview),
            "low_stock" => Some(Self::LowStock),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("refunded"), None);
    }

    #[test]
    fn test_notification_kind_roundtrip() {
        for kind in [
            NotificationKind::NewOrder,
            NotificationKind::NewMessage,
            NotificationKind::NewReview,
            NotificationKind::LowStock,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("price_drop"), None);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&NotificationKind::NewOrder).expect("serialize");
        assert_eq!(json, "\"new_order\"");
    }
}
