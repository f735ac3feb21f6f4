use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgPoolOptions, postgres::PgRow};

use common::{CategoryId, ChatId, ImageRef, ItemId, Money, OrderId};

use crate::error::{Result, StoreError};
use crate::gateway::Store;
use crate::records::{
    CartEntry, CatalogItem, Category, ContactInfo, NewCatalogItem, NewOrder, NewOrderLine,
    OperatorRecord, OrderLine, OrderRecord, OrderStatus, UserRecord,
};

/// PostgreSQL-backed store implementation.
///
/// Each operation acquires a connection from the pool for the duration of
/// one call; callers never hold connection state across operations.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Establishes the backend with a bounded, fixed-delay retry loop.
    ///
    /// Every attempt is verified with a trivial round-trip query before the
    /// handle is handed out. Exhausting `max_retries` attempts fails with
    /// [`StoreError::Unavailable`].
    pub async fn connect(url: &str, max_retries: u32, retry_delay: Duration) -> Result<Self> {
        let attempts = max_retries.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match Self::try_connect(url).await {
                Ok(pool) => {
                    tracing::info!(attempt, "store connection established");
                    return Ok(Self { pool });
                }
                Err(err) => {
                    metrics::counter!("store_connect_failures_total").increment(1);
                    if attempt >= attempts {
                        return Err(StoreError::Unavailable {
                            attempts: attempt,
                            source: err,
                        });
                    }
                    tracing::warn!(
                        attempt,
                        max_retries = attempts,
                        error = %err,
                        "store connection failed, retrying after fixed delay"
                    );
                    tokio::time::sleep(retry_delay).await;
                }
            }
        }
    }

    async fn try_connect(url: &str) -> std::result::Result<PgPool, sqlx::Error> {
        let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
        // round-trip check: a pool that cannot answer this is not usable
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&pool)
            .await?;
        Ok(pool)
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_user(row: PgRow) -> Result<UserRecord> {
        Ok(UserRecord {
            chat_id: ChatId::new(row.try_get("chat_id")?),
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            postal_code: row.try_get("postal_code")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_item(row: PgRow) -> Result<CatalogItem> {
        Ok(CatalogItem {
            id: ItemId::new(row.try_get("item_id")?),
            title: row.try_get("title")?,
            author: row.try_get("author")?,
            description: row.try_get("description")?,
            price: Money::from_units(row.try_get("price")?),
            category_id: row
                .try_get::<Option<i64>, _>("category_id")?
                .map(CategoryId::new),
            cover: row.try_get::<Option<String>, _>("cover_ref")?.map(ImageRef::new),
            photo: row.try_get::<Option<String>, _>("photo_ref")?.map(ImageRef::new),
            stock: row.try_get::<i32, _>("stock")? as u32,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_category(row: PgRow) -> Result<Category> {
        Ok(Category {
            id: CategoryId::new(row.try_get("category_id")?),
            name: row.try_get("name")?,
        })
    }

    fn row_to_order(row: PgRow) -> Result<OrderRecord> {
        Ok(OrderRecord {
            id: OrderId::new(row.try_get("order_id")?),
            user_id: ChatId::new(row.try_get("user_id")?),
            total: Money::from_units(row.try_get("total")?),
            receipt: ImageRef::new(row.try_get::<String, _>("receipt_ref")?),
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            postal_code: row.try_get("postal_code")?,
            status: OrderStatus::parse(row.try_get::<String, _>("status")?.as_str())?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_order_line(row: PgRow) -> Result<OrderLine> {
        Ok(OrderLine {
            id: row.try_get("line_id")?,
            order_id: OrderId::new(row.try_get("order_id")?),
            title: row.try_get("title")?,
            author: row.try_get("author")?,
            price: Money::from_units(row.try_get("price")?),
            quantity: row.try_get::<i32, _>("quantity")? as u32,
        })
    }

    fn row_to_operator(row: PgRow) -> Result<OperatorRecord> {
        Ok(OperatorRecord {
            chat_id: ChatId::new(row.try_get("chat_id")?),
            name: row.try_get("name")?,
            is_super: row.try_get("is_super")?,
        })
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn ensure_user(&self, chat_id: ChatId) -> Result<()> {
        sqlx::query("INSERT INTO users (chat_id) VALUES ($1) ON CONFLICT (chat_id) DO NOTHING")
            .bind(chat_id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn user(&self, chat_id: ChatId) -> Result<Option<UserRecord>> {
        let row = sqlx::query(
            "SELECT chat_id, phone, address, postal_code, created_at FROM users WHERE chat_id = $1",
        )
        .bind(chat_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_user).transpose()
    }

    async fn update_user_contact(&self, chat_id: ChatId, contact: &ContactInfo) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (chat_id, phone, address, postal_code)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (chat_id) DO UPDATE SET
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                postal_code = EXCLUDED.postal_code
            "#,
        )
        .bind(chat_id.as_i64())
        .bind(&contact.phone)
        .bind(&contact.address)
        .bind(&contact.postal_code)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_item(&self, item: NewCatalogItem) -> Result<ItemId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO items (title, author, description, price, category_id, cover_ref, photo_ref, stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING item_id
            "#,
        )
        .bind(&item.title)
        .bind(&item.author)
        .bind(&item.description)
        .bind(item.price.units())
        .bind(item.category_id.map(|c| c.as_i64()))
        .bind(item.cover.as_ref().map(|r| r.as_str()))
        .bind(item.photo.as_ref().map(|r| r.as_str()))
        .bind(item.stock as i32)
        .fetch_one(&self.pool)
        .await?;
        Ok(ItemId::new(id))
    }

    async fn update_item(&self, item: &CatalogItem) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET title = $2, author = $3, description = $4, price = $5,
                category_id = $6, cover_ref = $7, photo_ref = $8, stock = $9
            WHERE item_id = $1
            "#,
        )
        .bind(item.id.as_i64())
        .bind(&item.title)
        .bind(&item.author)
        .bind(&item.description)
        .bind(item.price.units())
        .bind(item.category_id.map(|c| c.as_i64()))
        .bind(item.cover.as_ref().map(|r| r.as_str()))
        .bind(item.photo.as_ref().map(|r| r.as_str()))
        .bind(item.stock as i32)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_item(&self, id: ItemId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM items WHERE item_id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn item(&self, id: ItemId) -> Result<Option<CatalogItem>> {
        let row = sqlx::query(
            r#"
            SELECT item_id, title, author, description, price, category_id, cover_ref, photo_ref, stock, created_at
            FROM items WHERE item_id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_item).transpose()
    }

    async fn list_items(&self) -> Result<Vec<CatalogItem>> {
        let rows = sqlx::query(
            r#"
            SELECT item_id, title, author, description, price, category_id, cover_ref, photo_ref, stock, created_at
            FROM items ORDER BY title, item_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_item).collect()
    }

    async fn items_in_category(&self, category_id: CategoryId) -> Result<Vec<CatalogItem>> {
        let rows = sqlx::query(
            r#"
            SELECT item_id, title, author, description, price, category_id, cover_ref, photo_ref, stock, created_at
            FROM items WHERE category_id = $1 ORDER BY title, item_id
            "#,
        )
        .bind(category_id.as_i64())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_item).collect()
    }

    async fn search_items(&self, query: &str) -> Result<Vec<CatalogItem>> {
        let pattern = format!("%{query}%");
        let rows = sqlx::query(
            r#"
            SELECT item_id, title, author, description, price, category_id, cover_ref, photo_ref, stock, created_at
            FROM items
            WHERE title ILIKE $1 OR author ILIKE $1 OR description ILIKE $1
            ORDER BY title, item_id
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_item).collect()
    }

    async fn insert_category(&self, name: &str) -> Result<CategoryId> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO categories (name) VALUES ($1) RETURNING category_id")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(CategoryId::new(id))
    }

    async fn category(&self, id: CategoryId) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT category_id, name FROM categories WHERE category_id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_category).transpose()
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT category_id, name FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_category).collect()
    }

    async fn delete_category(&self, id: CategoryId) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        // detach items before the row goes away
        sqlx::query("UPDATE items SET category_id = NULL WHERE category_id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM categories WHERE category_id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_cart_line(&self, user_id: ChatId, item_id: ItemId) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cart_lines (user_id, item_id, quantity)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, item_id)
            DO UPDATE SET quantity = cart_lines.quantity + 1
            "#,
        )
        .bind(user_id.as_i64())
        .bind(item_id.as_i64())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn bump_cart_quantity(&self, user_id: ChatId, item_id: ItemId, delta: i32) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // delete first so the quantity >= 1 check never sees a zero
        sqlx::query(
            "DELETE FROM cart_lines WHERE user_id = $1 AND item_id = $2 AND quantity + $3 <= 0",
        )
        .bind(user_id.as_i64())
        .bind(item_id.as_i64())
        .bind(delta)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE cart_lines SET quantity = quantity + $3 WHERE user_id = $1 AND item_id = $2",
        )
        .bind(user_id.as_i64())
        .bind(item_id.as_i64())
        .bind(delta)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn remove_cart_line(&self, user_id: ChatId, item_id: ItemId) -> Result<()> {
        sqlx::query("DELETE FROM cart_lines WHERE user_id = $1 AND item_id = $2")
            .bind(user_id.as_i64())
            .bind(item_id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn cart_entries(&self, user_id: ChatId) -> Result<Vec<CartEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT i.item_id, i.title, i.author, i.description, i.price, i.category_id,
                   i.cover_ref, i.photo_ref, i.stock, i.created_at, c.quantity
            FROM cart_lines c
            JOIN items i ON i.item_id = c.item_id
            WHERE c.user_id = $1
            ORDER BY i.title, i.item_id
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let quantity = row.try_get::<i32, _>("quantity")? as u32;
                Ok(CartEntry {
                    item: Self::row_to_item(row)?,
                    quantity,
                })
            })
            .collect()
    }

    async fn cart_total(&self, user_id: ChatId) -> Result<Money> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(i.price * c.quantity), 0)::BIGINT
            FROM cart_lines c
            JOIN items i ON i.item_id = c.item_id
            WHERE c.user_id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_one(&self.pool)
        .await?;
        Ok(Money::from_units(total))
    }

    async fn clear_cart(&self, user_id: ChatId) -> Result<()> {
        sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_order(&self, order: NewOrder, lines: Vec<NewOrderLine>) -> Result<OrderId> {
        let mut tx = self.pool.begin().await?;

        let order_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (user_id, total, receipt_ref, phone, address, postal_code, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING order_id
            "#,
        )
        .bind(order.user_id.as_i64())
        .bind(order.total.units())
        .bind(order.receipt.as_str())
        .bind(&order.contact.phone)
        .bind(&order.contact.address)
        .bind(&order.contact.postal_code)
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (order_id, title, author, price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order_id)
            .bind(&line.title)
            .bind(&line.author)
            .bind(line.price.units())
            .bind(line.quantity as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(OrderId::new(order_id))
    }

    async fn order(&self, id: OrderId) -> Result<Option<OrderRecord>> {
        let row = sqlx::query(
            r#"
            SELECT order_id, user_id, total, receipt_ref, phone, address, postal_code, status, created_at
            FROM orders WHERE order_id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_order).transpose()
    }

    async fn order_lines(&self, id: OrderId) -> Result<Vec<OrderLine>> {
        let rows = sqlx::query(
            r#"
            SELECT line_id, order_id, title, author, price, quantity
            FROM order_lines WHERE order_id = $1 ORDER BY line_id
            "#,
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_order_line).collect()
    }

    async fn set_order_status_if_pending(&self, id: OrderId, status: OrderStatus) -> Result<bool> {
        let result =
            sqlx::query("UPDATE orders SET status = $2 WHERE order_id = $1 AND status = 'pending'")
                .bind(id.as_i64())
                .bind(status.as_str())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn orders_for_user(&self, user_id: ChatId) -> Result<Vec<OrderRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT order_id, user_id, total, receipt_ref, phone, address, postal_code, status, created_at
            FROM orders WHERE user_id = $1 ORDER BY created_at DESC, order_id DESC
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn pending_orders(&self) -> Result<Vec<OrderRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT order_id, user_id, total, receipt_ref, phone, address, postal_code, status, created_at
            FROM orders WHERE status = 'pending' ORDER BY created_at DESC, order_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn ensure_operator(&self, operator: OperatorRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO operators (chat_id, name, is_super)
            VALUES ($1, $2, $3)
            ON CONFLICT (chat_id) DO UPDATE SET
                name = EXCLUDED.name,
                is_super = EXCLUDED.is_super
            "#,
        )
        .bind(operator.chat_id.as_i64())
        .bind(&operator.name)
        .bind(operator.is_super)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn operator(&self, chat_id: ChatId) -> Result<Option<OperatorRecord>> {
        let row = sqlx::query("SELECT chat_id, name, is_super FROM operators WHERE chat_id = $1")
            .bind(chat_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_operator).transpose()
    }

    async fn is_operator(&self, chat_id: ChatId) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM operators WHERE chat_id = $1)")
                .bind(chat_id.as_i64())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
