use common::{ChatId, ImageRef, Money};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{CartDelta, CartEngine, OrderDesk};
use store::{ContactInfo, MemoryStore, NewCatalogItem, Store};

fn new_item(title: &str, price: i64) -> NewCatalogItem {
    NewCatalogItem {
        title: title.to_string(),
        author: "Author".to_string(),
        description: String::new(),
        price: Money::from_units(price),
        category_id: None,
        cover: None,
        photo: None,
        stock: 1,
    }
}

fn contact() -> ContactInfo {
    ContactInfo {
        phone: "0912".to_string(),
        address: "1 Main St".to_string(),
        postal_code: "12345".to_string(),
    }
}

fn bench_add_to_cart(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = MemoryStore::default();
    let item = rt.block_on(async { store.insert_item(new_item("Bench", 1_000)).await.unwrap() });
    let cart = CartEngine::new(store);
    let user = ChatId::new(1);

    c.bench_function("domain/add_to_cart", |b| {
        b.iter(|| {
            rt.block_on(async {
                cart.add_item(user, item).await.unwrap();
            });
        });
    });
}

fn bench_quantity_churn(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = MemoryStore::default();
    let item = rt.block_on(async {
        let id = store.insert_item(new_item("Bench", 1_000)).await.unwrap();
        store.add_cart_line(ChatId::new(1), id).await.unwrap();
        store.add_cart_line(ChatId::new(1), id).await.unwrap();
        id
    });
    let cart = CartEngine::new(store);
    let user = ChatId::new(1);

    c.bench_function("domain/quantity_inc_dec", |b| {
        b.iter(|| {
            rt.block_on(async {
                cart.change_quantity(user, item, CartDelta::Increment)
                    .await
                    .unwrap();
                cart.change_quantity(user, item, CartDelta::Decrement)
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_cart_total_20_lines(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = MemoryStore::default();
    let user = ChatId::new(1);

    rt.block_on(async {
        for n in 0..20 {
            let id = store
                .insert_item(new_item(&format!("Item {n}"), 100 * (n + 1)))
                .await
                .unwrap();
            store.add_cart_line(user, id).await.unwrap();
        }
    });
    let cart = CartEngine::new(store);

    c.bench_function("domain/cart_total_20_lines", |b| {
        b.iter(|| {
            rt.block_on(async {
                cart.total(user).await.unwrap();
            });
        });
    });
}

fn bench_place_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("domain/fill_cart_and_place_order", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = MemoryStore::default();
                let user = ChatId::new(1);
                let item = store.insert_item(new_item("Bench", 1_000)).await.unwrap();
                store.add_cart_line(user, item).await.unwrap();
                store.add_cart_line(user, item).await.unwrap();

                let desk = OrderDesk::new(store);
                desk.place(user, contact(), ImageRef::new("receipt"))
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_add_to_cart,
    bench_quantity_churn,
    bench_cart_total_20_lines,
    bench_place_order,
);
criterion_main!(benches);
