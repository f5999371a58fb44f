//! Order repository.
//!
//! The central contract here is [`OrderStore::create_order_with_notification`]:
//! an order and the seller notification describing it are one storage
//! transaction, so a reader can never observe a notification for an order
//! that was not persisted (or the reverse).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use terracotta_core::{ArtisanId, NotificationId, OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::{NewNotification, NewOrder, Order, OrderLine};

/// Storage contract for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist an order and its seller notification as one atomic unit.
    ///
    /// On error, neither the order nor the notification is visible.
    async fn create_order_with_notification(
        &self,
        order: NewOrder,
        notification: NewNotification,
    ) -> Result<(), RepositoryError>;

    /// Fetch one order by ID.
    async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// All orders placed by a buyer, most recent first.
    async fn list_for_buyer(&self, buyer_id: UserId) -> Result<Vec<Order>, RepositoryError>;

    /// All orders received by a seller, most recent first.
    async fn list_for_seller(&self, seller_id: ArtisanId) -> Result<Vec<Order>, RepositoryError>;
}

#[async_trait]
impl<S: OrderStore + ?Sized> OrderStore for &S {
    async fn create_order_with_notification(
        &self,
        order: NewOrder,
        notification: NewNotification,
    ) -> Result<(), RepositoryError> {
        (**self).create_order_with_notification(order, notification).await
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        (**self).get(id).await
    }

    async fn list_for_buyer(&self, buyer_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        (**self).list_for_buyer(buyer_id).await
    }

    async fn list_for_seller(&self, seller_id: ArtisanId) -> Result<Vec<Order>, RepositoryError> {
        (**self).list_for_seller(seller_id).await
    }
}

/// `PostgreSQL`-backed order store.
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create a new order store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw order row; converted to the domain type after decoding.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    buyer_id: i32,
    seller_id: i32,
    lines: serde_json::Value,
    total_amount: Decimal,
    status: String,
    shipping_address: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let lines: Vec<OrderLine> = serde_json::from_value(row.lines).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order lines in database: {e}"))
        })?;
        let status = OrderStatus::parse(&row.status).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown order status: {}", row.status))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            buyer_id: UserId::new(row.buyer_id),
            seller_id: ArtisanId::new(row.seller_id),
            lines,
            total_amount: row.total_amount,
            status,
            shipping_address: row.shipping_address,
            created_at: row.created_at,
        })
    }
}

const SELECT_ORDER: &str = r"
    SELECT id, buyer_id, seller_id, lines, total_amount, status,
           shipping_address, created_at
    FROM market.orders
";

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn create_order_with_notification(
        &self,
        order: NewOrder,
        notification: NewNotification,
    ) -> Result<(), RepositoryError> {
        let lines = serde_json::to_value(&order.lines).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize order lines: {e}"))
        })?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO market.orders
                (id, buyer_id, seller_id, lines, total_amount, status, shipping_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(order.id.as_uuid())
        .bind(order.buyer_id.as_i32())
        .bind(order.seller_id.as_i32())
        .bind(lines)
        .bind(order.total_amount)
        .bind(OrderStatus::Pending.as_str())
        .bind(&order.shipping_address)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO market.notifications
                (id, artisan_id, kind, title, body, sender, link)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(NotificationId::generate().as_uuid())
        .bind(notification.artisan_id.as_i32())
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(notification.sender.as_deref())
        .bind(notification.link.as_deref())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("{SELECT_ORDER} WHERE id = $1");
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Order::try_from).transpose()
    }

    async fn list_for_buyer(&self, buyer_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!("{SELECT_ORDER} WHERE buyer_id = $1 ORDER BY created_at DESC");
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(buyer_id.as_i32())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn list_for_seller(&self, seller_id: ArtisanId) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!("{SELECT_ORDER} WHERE seller_id = $1 ORDER BY created_at DESC");
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(seller_id.as_i32())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Order::try_from).collect()
    }
}
