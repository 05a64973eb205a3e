use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{OrderId, ProductId};
use domain::{NewProduct, Order, PlaceOrder, Product};
use tokio::sync::RwLock;

use crate::{
    Result,
    store::{OrderStore, Page, ProductFilter, ProductStore},
};

/// In-memory product store.
///
/// Serves as the zero-configuration default backend and as the test
/// double; behavior matches the PostgreSQL implementation. Keyed by a
/// `BTreeMap`, so iteration order is ID order, which for time-ordered
/// IDs is creation order.
#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<BTreeMap<ProductId, Product>>>,
}

impl InMemoryProductStore {
    /// Creates a new empty in-memory product store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of products stored.
    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }
}

fn matches_filter(product: &Product, filter: &ProductFilter) -> bool {
    if let Some(ref name) = filter.name {
        if !product.name.to_lowercase().contains(&name.to_lowercase()) {
            return false;
        }
    }
    if let Some(ref size) = filter.size {
        if !product.sizes.contains(&size.to_lowercase()) {
            return false;
        }
    }
    true
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, new: NewProduct) -> Result<Product> {
        let product = Product::from_new(ProductId::new(), new, Utc::now());
        let mut products = self.products.write().await;
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn list(&self, filter: &ProductFilter, page: Page) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        let results = products
            .values()
            .filter(|p| matches_filter(p, filter))
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok(results)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn decrement_quantity(&self, id: ProductId, amount: i64) -> Result<bool> {
        // One critical section: the check and the write cannot interleave
        // with another decrement.
        let mut products = self.products.write().await;
        match products.get_mut(&id) {
            Some(product) if product.available_quantity >= amount => {
                product.available_quantity -= amount;
                product.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// In-memory order store, counterpart to [`InMemoryProductStore`].
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<BTreeMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, cmd: PlaceOrder) -> Result<Order> {
        let order = Order::from_place(OrderId::new(), cmd, Utc::now());
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn delete(&self, id: OrderId) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.remove(&id);
        Ok(())
    }

    async fn list_by_user(&self, user_id: &str, page: Page) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut results: Vec<Order> = orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(results
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}
