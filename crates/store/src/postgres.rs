use async_trait::async_trait;
use chrono::Utc;
use common::{OrderId, ProductId};
use domain::{NewProduct, Order, PlaceOrder, Product};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    Result,
    store::{OrderStore, Page, ProductFilter, ProductStore},
};

/// Runs all pending migrations against the given pool.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// PostgreSQL-backed product store.
///
/// Stock decrements are a single conditional `UPDATE`, so concurrent
/// checkouts can never drive `available_quantity` negative.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn row_to_product(row: &PgRow) -> Result<Product> {
    let sizes: Vec<String> = row.try_get("sizes")?;
    Ok(Product {
        id: ProductId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        sizes: sizes.into_iter().collect(),
        available_quantity: row.try_get("available_quantity")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Escapes `LIKE` metacharacters so filter values match literally.
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn create(&self, new: NewProduct) -> Result<Product> {
        let product = Product::from_new(ProductId::new(), new, Utc::now());
        let sizes: Vec<String> = product.sizes.iter().cloned().collect();

        sqlx::query(
            "INSERT INTO products (id, name, price, sizes, available_quantity, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(product.price)
        .bind(&sizes)
        .bind(product.available_quantity)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    async fn list(&self, filter: &ProductFilter, page: Page) -> Result<Vec<Product>> {
        let mut sql = String::from(
            "SELECT id, name, price, sizes, available_quantity, created_at, updated_at
             FROM products WHERE 1=1",
        );
        let mut param_count = 0;

        if filter.name.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND name ILIKE ${param_count}"));
        }
        if filter.size.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND ${param_count} = ANY(sizes)"));
        }

        sql.push_str(&format!(
            " ORDER BY id ASC LIMIT ${} OFFSET ${}",
            param_count + 1,
            param_count + 2
        ));

        let mut query = sqlx::query(&sql);
        if let Some(name) = &filter.name {
            query = query.bind(format!("%{}%", escape_like(name)));
        }
        if let Some(size) = &filter.size {
            // Sizes are stored lower-cased at validation time.
            query = query.bind(size.to_lowercase());
        }
        query = query.bind(page.limit()).bind(page.offset());

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_product).collect()
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query(
            "SELECT id, name, price, sizes, available_quantity, created_at, updated_at
             FROM products WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn decrement_quantity(&self, id: ProductId, amount: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE products
             SET available_quantity = available_quantity - $2, updated_at = $3
             WHERE id = $1 AND available_quantity >= $2",
        )
        .bind(id.as_uuid())
        .bind(amount)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// PostgreSQL-backed order store, counterpart to [`PgProductStore`].
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn row_to_order(row: &PgRow) -> Result<Order> {
    Ok(Order {
        id: OrderId::from_uuid(row.try_get("id")?),
        user_id: row.try_get("user_id")?,
        product_id: ProductId::from_uuid(row.try_get("product_id")?),
        quantity: row.try_get("quantity")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn insert(&self, cmd: PlaceOrder) -> Result<Order> {
        let order = Order::from_place(OrderId::new(), cmd, Utc::now());

        sqlx::query(
            "INSERT INTO orders (id, user_id, product_id, quantity, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(order.id.as_uuid())
        .bind(&order.user_id)
        .bind(order.product_id.as_uuid())
        .bind(order.quantity)
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(
            "SELECT id, user_id, product_id, quantity, created_at
             FROM orders WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_order).transpose()
    }

    async fn delete(&self, id: OrderId) -> Result<()> {
        // Deleting an absent order is a no-op.
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: &str, page: Page) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            "SELECT id, user_id, product_id, quantity, created_at
             FROM orders WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_order).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_passes_plain_text_through() {
        assert_eq!(escape_like("widget"), "widget");
    }

    #[test]
    fn escape_like_escapes_metacharacters() {
        assert_eq!(escape_like("100% cotton"), "100\\% cotton");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
