//! Order placement workflow with stock reservation.

use domain::{Order, PlaceOrder};
use store::{OrderStore, ProductStore};

use crate::error::{CheckoutError, Result};

/// Drives an order from validated request to reserved stock.
///
/// Placement is a two-step write: insert the order, then decrement the
/// product's stock with a conditional update. When the decrement loses
/// against concurrent checkouts the order is deleted again, so an order
/// only ever remains on record together with its stock reservation.
pub struct CheckoutWorkflow<P, O>
where
    P: ProductStore,
    O: OrderStore,
{
    products: P,
    orders: O,
}

impl<P, O> CheckoutWorkflow<P, O>
where
    P: ProductStore,
    O: OrderStore,
{
    /// Creates a new checkout workflow over the given stores.
    pub fn new(products: P, orders: O) -> Self {
        Self { products, orders }
    }

    /// Places an order, reserving stock for it.
    ///
    /// Fails with [`CheckoutError::ProductNotFound`] for unknown products
    /// and [`CheckoutError::InsufficientStock`] when the requested
    /// quantity visibly exceeds the available stock. When the stock check
    /// passes but a concurrent checkout drains the stock before our
    /// decrement lands, the order is rolled back and
    /// [`CheckoutError::QuantityUpdateFailed`] is returned.
    #[tracing::instrument(
        skip(self, cmd),
        fields(product_id = %cmd.product_id(), quantity = cmd.quantity())
    )]
    pub async fn place_order(&self, cmd: PlaceOrder) -> Result<Order> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let checkout_start = std::time::Instant::now();

        let product_id = cmd.product_id();
        let quantity = cmd.quantity();

        // 1. The product must exist.
        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or(CheckoutError::ProductNotFound(product_id))?;

        // 2. Reject obviously oversized orders up front. The decrement
        // below remains the authoritative check.
        if product.available_quantity < quantity {
            return Err(CheckoutError::InsufficientStock {
                product_id,
                available: product.available_quantity,
                requested: quantity,
            });
        }

        // 3. Record the order before touching stock.
        let order = self.orders.insert(cmd).await?;

        // 4. Reserve stock. A concurrent checkout may have drained it
        // between the check above and this update.
        match self.products.decrement_quantity(product_id, quantity).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(
                    order_id = %order.id,
                    quantity,
                    "stock update rejected, rolling back order"
                );
                metrics::counter!("checkout_stock_rejections").increment(1);

                if let Err(e) = self.orders.delete(order.id).await {
                    metrics::counter!("checkout_compensation_failures").increment(1);
                    tracing::error!(
                        order_id = %order.id,
                        error = %e,
                        "failed to roll back order after rejected stock update"
                    );
                    return Err(e.into());
                }

                return Err(CheckoutError::QuantityUpdateFailed);
            }
            Err(e) => return Err(e.into()),
        }

        let duration = checkout_start.elapsed().as_secs_f64();
        metrics::histogram!("checkout_duration_seconds").record(duration);
        metrics::counter!("checkout_completed").increment(1);
        tracing::info!(order_id = %order.id, user_id = %order.user_id, "order placed");

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use common::{OrderId, ProductId};
    use domain::{NewProduct, Product};
    use rust_decimal::Decimal;
    use store::{
        InMemoryOrderStore, InMemoryProductStore, Page, ProductFilter, StoreError,
    };

    /// Product store wrapper whose decrement can be made to reject or fail.
    #[derive(Clone, Default)]
    struct FlakyProductStore {
        inner: InMemoryProductStore,
        reject_decrement: Arc<AtomicBool>,
        fail_decrement: Arc<AtomicBool>,
    }

    impl FlakyProductStore {
        fn set_reject_decrement(&self, reject: bool) {
            self.reject_decrement.store(reject, Ordering::SeqCst);
        }

        fn set_fail_decrement(&self, fail: bool) {
            self.fail_decrement.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ProductStore for FlakyProductStore {
        async fn create(&self, new: NewProduct) -> store::Result<Product> {
            self.inner.create(new).await
        }

        async fn list(&self, filter: &ProductFilter, page: Page) -> store::Result<Vec<Product>> {
            self.inner.list(filter, page).await
        }

        async fn get(&self, id: ProductId) -> store::Result<Option<Product>> {
            self.inner.get(id).await
        }

        async fn decrement_quantity(&self, id: ProductId, amount: i64) -> store::Result<bool> {
            if self.fail_decrement.load(Ordering::SeqCst) {
                return Err(StoreError::Database(sqlx::Error::PoolClosed));
            }
            if self.reject_decrement.load(Ordering::SeqCst) {
                return Ok(false);
            }
            self.inner.decrement_quantity(id, amount).await
        }
    }

    /// Order store wrapper whose insert and delete can be made to fail.
    #[derive(Clone, Default)]
    struct FlakyOrderStore {
        inner: InMemoryOrderStore,
        fail_insert: Arc<AtomicBool>,
        fail_delete: Arc<AtomicBool>,
    }

    impl FlakyOrderStore {
        fn set_fail_insert(&self, fail: bool) {
            self.fail_insert.store(fail, Ordering::SeqCst);
        }

        fn set_fail_delete(&self, fail: bool) {
            self.fail_delete.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl OrderStore for FlakyOrderStore {
        async fn insert(&self, cmd: PlaceOrder) -> store::Result<Order> {
            if self.fail_insert.load(Ordering::SeqCst) {
                return Err(StoreError::Database(sqlx::Error::PoolClosed));
            }
            self.inner.insert(cmd).await
        }

        async fn get(&self, id: OrderId) -> store::Result<Option<Order>> {
            self.inner.get(id).await
        }

        async fn delete(&self, id: OrderId) -> store::Result<()> {
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(StoreError::Database(sqlx::Error::PoolClosed));
            }
            self.inner.delete(id).await
        }

        async fn list_by_user(&self, user_id: &str, page: Page) -> store::Result<Vec<Order>> {
            self.inner.list_by_user(user_id, page).await
        }
    }

    async fn setup(
        quantity: i64,
    ) -> (
        CheckoutWorkflow<FlakyProductStore, FlakyOrderStore>,
        FlakyProductStore,
        FlakyOrderStore,
        ProductId,
    ) {
        let products = FlakyProductStore::default();
        let orders = FlakyOrderStore::default();

        let product = products
            .create(
                NewProduct::new("Widget", "9.99".parse::<Decimal>().unwrap(), ["small"], quantity)
                    .unwrap(),
            )
            .await
            .unwrap();

        let workflow = CheckoutWorkflow::new(products.clone(), orders.clone());
        (workflow, products, orders, product.id)
    }

    fn place(product_id: ProductId, quantity: i64) -> PlaceOrder {
        PlaceOrder::new("alice", product_id, quantity).unwrap()
    }

    async fn stock_of(products: &FlakyProductStore, id: ProductId) -> i64 {
        products.get(id).await.unwrap().unwrap().available_quantity
    }

    #[tokio::test]
    async fn place_order_reserves_stock() {
        let (workflow, products, orders, product_id) = setup(5).await;

        let order = workflow.place_order(place(product_id, 3)).await.unwrap();

        assert_eq!(order.user_id, "alice");
        assert_eq!(order.product_id, product_id);
        assert_eq!(order.quantity, 3);
        assert_eq!(stock_of(&products, product_id).await, 2);
        assert_eq!(orders.get(order.id).await.unwrap(), Some(order));
    }

    #[tokio::test]
    async fn place_order_rejects_unknown_product() {
        let (workflow, _, orders, _) = setup(5).await;
        let missing = ProductId::new();

        let result = workflow.place_order(place(missing, 1)).await;

        assert!(matches!(
            result,
            Err(CheckoutError::ProductNotFound(id)) if id == missing
        ));
        assert_eq!(orders.inner.order_count().await, 0);
    }

    #[tokio::test]
    async fn place_order_rejects_insufficient_stock() {
        let (workflow, products, orders, product_id) = setup(2).await;

        let result = workflow.place_order(place(product_id, 3)).await;

        assert!(matches!(
            result,
            Err(CheckoutError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            })
        ));
        assert_eq!(stock_of(&products, product_id).await, 2);
        assert_eq!(orders.inner.order_count().await, 0);
    }

    #[tokio::test]
    async fn place_order_accepts_exact_remaining_stock() {
        let (workflow, products, _, product_id) = setup(3).await;

        workflow.place_order(place(product_id, 3)).await.unwrap();

        assert_eq!(stock_of(&products, product_id).await, 0);
    }

    #[tokio::test]
    async fn rejected_stock_update_rolls_back_the_order() {
        let (workflow, products, orders, product_id) = setup(5).await;
        products.set_reject_decrement(true);

        let result = workflow.place_order(place(product_id, 3)).await;

        let err = result.unwrap_err();
        assert!(matches!(err, CheckoutError::QuantityUpdateFailed));
        assert_eq!(err.to_string(), "failed to update product quantity");
        assert_eq!(stock_of(&products, product_id).await, 5);
        assert_eq!(orders.inner.order_count().await, 0);
    }

    #[tokio::test]
    async fn failed_rollback_surfaces_the_storage_error() {
        let (workflow, products, orders, product_id) = setup(5).await;
        products.set_reject_decrement(true);
        orders.set_fail_delete(true);

        let result = workflow.place_order(place(product_id, 3)).await;

        assert!(matches!(result, Err(CheckoutError::Store(_))));
        // The order could not be rolled back and stays on record.
        assert_eq!(orders.inner.order_count().await, 1);
    }

    #[tokio::test]
    async fn insert_failure_leaves_stock_untouched() {
        let (workflow, products, orders, product_id) = setup(5).await;
        orders.set_fail_insert(true);

        let result = workflow.place_order(place(product_id, 3)).await;

        assert!(matches!(result, Err(CheckoutError::Store(_))));
        assert_eq!(stock_of(&products, product_id).await, 5);
        assert_eq!(orders.inner.order_count().await, 0);
    }

    #[tokio::test]
    async fn decrement_error_propagates_and_keeps_the_order() {
        let (workflow, products, orders, product_id) = setup(5).await;
        products.set_fail_decrement(true);

        let result = workflow.place_order(place(product_id, 3)).await;

        // A storage error is indistinguishable from a timeout whose
        // update may still have landed, so no rollback is attempted.
        assert!(matches!(result, Err(CheckoutError::Store(_))));
        assert_eq!(orders.inner.order_count().await, 1);
    }

    #[tokio::test]
    async fn repeated_orders_are_distinct() {
        let (workflow, products, orders, product_id) = setup(5).await;

        let first = workflow.place_order(place(product_id, 2)).await.unwrap();
        let second = workflow.place_order(place(product_id, 2)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(stock_of(&products, product_id).await, 1);
        assert_eq!(orders.inner.order_count().await, 2);
    }
}
