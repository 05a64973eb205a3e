use checkout::CheckoutWorkflow;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{NewProduct, PlaceOrder};
use rust_decimal::Decimal;
use store::{InMemoryOrderStore, InMemoryProductStore, ProductStore};

fn make_product(quantity: i64) -> NewProduct {
    NewProduct::new(
        "Benchmark Widget",
        "9.99".parse::<Decimal>().unwrap(),
        ["small"],
        quantity,
    )
    .unwrap()
}

fn bench_place_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let products = InMemoryProductStore::new();
    let orders = InMemoryOrderStore::new();

    // Enough stock that the bench never drains it
    let product_id = rt.block_on(async {
        products.create(make_product(1 << 40)).await.unwrap().id
    });

    let workflow = CheckoutWorkflow::new(products, orders);

    c.bench_function("checkout/place_order", |b| {
        b.iter(|| {
            rt.block_on(async {
                let cmd = PlaceOrder::new("bench-user", product_id, 1).unwrap();
                workflow.place_order(cmd).await.unwrap();
            });
        });
    });
}

fn bench_full_checkout_cycle(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("checkout/create_product_and_place_order", |b| {
        b.iter(|| {
            rt.block_on(async {
                let products = InMemoryProductStore::new();
                let orders = InMemoryOrderStore::new();
                let product = products.create(make_product(10)).await.unwrap();

                let workflow = CheckoutWorkflow::new(products, orders);
                let cmd = PlaceOrder::new("bench-user", product.id, 3).unwrap();
                workflow.place_order(cmd).await.unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_place_order, bench_full_checkout_cycle);
criterion_main!(benches);
