use super::*;

use cart_core::catalog::Product;
use storage::MemoryStore;

fn controller() -> CartController<MemoryStore> {
    CartController::new(CartStore::new(MemoryStore::new()))
}

fn catalog() -> Catalog {
    Catalog::new(vec![
        Product::new("Gaming Mouse", 500, "Wireless"),
        Product::new("Headset", 800, "Surround sound"),
    ])
}

async fn run(controller: &CartController<MemoryStore>, command: Command) -> String {
    execute(controller, &catalog(), command, "R", || false)
        .await
        .expect("command")
}

#[tokio::test]
async fn add_uses_catalog_price_and_reports() {
    let cart = controller();
    let out = run(
        &cart,
        Command::Add {
            name: "Gaming Mouse".to_string(),
            price: None,
        },
    )
    .await;
    assert_eq!(
        out,
        "[ok] Gaming Mouse added to cart\n\
         Gaming Mouse  x1  R500 each  Total: R500\n\
         Subtotal: R500\n\
         Tax: R75\n\
         Total: R575\n"
    );
}

#[tokio::test]
async fn add_rejects_unknown_product_without_price() {
    let cart = controller();
    let err = execute(
        &cart,
        &catalog(),
        Command::Add {
            name: "Joystick".to_string(),
            price: None,
        },
        "R",
        || false,
    )
    .await
    .expect_err("should fail");
    assert_eq!(
        err.downcast_ref::<CartError>().map(|e| e.code),
        Some(shared::error::ErrorCode::NotFound)
    );
    assert!(err.to_string().contains("not in the catalog"));

    let err = execute(
        &cart,
        &catalog(),
        Command::Add {
            name: "Joystick".to_string(),
            price: Some("cheap".to_string()),
        },
        "R",
        || false,
    )
    .await
    .expect_err("should fail");
    assert!(err.to_string().contains("invalid product price"));
}

#[tokio::test]
async fn decrement_stops_at_one() {
    let cart = controller();
    run(
        &cart,
        Command::Add {
            name: "Headset".to_string(),
            price: None,
        },
    )
    .await;
    run(
        &cart,
        Command::Increment {
            name: "Headset".to_string(),
        },
    )
    .await;
    for _ in 0..3 {
        run(
            &cart,
            Command::Decrement {
                name: "Headset".to_string(),
            },
        )
        .await;
    }

    let out = run(&cart, Command::Show).await;
    assert!(out.starts_with("Headset  x1  R800 each"), "{out}");
}

#[tokio::test]
async fn stepping_missing_line_reports_it() {
    let cart = controller();
    let out = run(
        &cart,
        Command::Increment {
            name: "Headset".to_string(),
        },
    )
    .await;
    assert_eq!(out, "'Headset' is not in the cart\nYour cart is empty.\n");
}

#[tokio::test]
async fn clear_asks_for_confirmation() {
    let cart = controller();
    run(
        &cart,
        Command::Add {
            name: "Headset".to_string(),
            price: None,
        },
    )
    .await;

    let out = execute(&cart, &catalog(), Command::Clear { yes: false }, "R", || false)
        .await
        .expect("declined clear");
    assert!(out.starts_with("Headset"), "{out}");

    let out = execute(&cart, &catalog(), Command::Clear { yes: false }, "R", || true)
        .await
        .expect("confirmed clear");
    assert_eq!(out, "[ok] Cart cleared!\nYour cart is empty.\n");
}

#[tokio::test]
async fn set_quantity_accepts_non_positive_values() {
    let cart = controller();
    run(
        &cart,
        Command::Add {
            name: "Widget".to_string(),
            price: Some("10".to_string()),
        },
    )
    .await;
    let out = run(
        &cart,
        Command::SetQuantity {
            name: "Widget".to_string(),
            quantity: -5,
        },
    )
    .await;
    assert!(out.starts_with("Widget  x1  R10 each"), "{out}");
}

#[test]
fn search_lists_matches_then_dimmed() {
    let out = render_search(&catalog(), "wireless", "R");
    assert_eq!(out, "Gaming Mouse  R500\n  (Headset)\n");

    let out = render_search(&catalog(), "zzz", "R");
    assert_eq!(out, "  (Gaming Mouse)\n  (Headset)\nNo products match.\n");
}

#[test]
fn parses_negative_quantity_argument() {
    let cli = Cli::try_parse_from(["cart", "set-quantity", "Mouse", "-5"]).expect("parse");
    match cli.command {
        Command::SetQuantity { name, quantity } => {
            assert_eq!(name, "Mouse");
            assert_eq!(quantity, -5);
        }
        other => panic!("unexpected command {other:?}"),
    }
}
