use cart_core::{CartController, CartPage, CartStore};
use shared::{domain::CartTotals, protocol::CartIntent};
use storage::{KeyValueStore, Storage};

#[tokio::test]
async fn cart_survives_reopening_the_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("data").join("storefront.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    {
        let storage = Storage::new(&database_url).await.expect("db");
        let carts = CartStore::new(storage);
        carts.add_item("Keyboard", 100).await.expect("add");
        carts.add_item("Keyboard", 100).await.expect("add");
        carts.add_item("Pad", 50).await.expect("add");
    }

    let storage = Storage::new(&database_url).await.expect("reopen");
    let controller = CartController::new(CartStore::new(storage));
    let CartPage::Items(summary) = controller.display().await else {
        panic!("expected persisted items");
    };
    assert_eq!(
        summary.totals,
        CartTotals {
            subtotal: 250,
            tax: 38,
            total: 288
        }
    );

    let update = controller
        .dispatch(CartIntent::ClearCart { confirmed: true })
        .await;
    assert!(update.page.is_empty());
}

#[tokio::test]
async fn corrupt_row_in_sqlite_reads_as_empty_cart() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.set("cart", "<html>").await.expect("poke");

    let carts = CartStore::new(storage.clone());
    assert!(carts.load_cart().await.is_empty());

    carts.add_item("Mouse", 500).await.expect("add");
    let raw = storage.get("cart").await.expect("get").expect("value");
    assert_eq!(raw, r#"[{"name":"Mouse","price":500,"quantity":1}]"#);
}
