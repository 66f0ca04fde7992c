use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Result;
use cart_core::{
    catalog::{parse_price, Catalog},
    view::{format_amount, render_text},
    CartController, CartStore,
};
use clap::{Parser, Subcommand};
use shared::{
    error::CartError,
    protocol::{CartIntent, Notification, NotificationKind},
};
use storage::{KeyValueStore, Storage};
use tracing::error;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, normalize_database_url};

#[derive(Parser, Debug)]
#[command(name = "cart", about = "Manage the storefront shopping cart")]
struct Cli {
    /// Overrides the configured database url.
    #[arg(long)]
    database_url: Option<String>,
    /// Overrides the configured catalog file.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Show,
    Add {
        name: String,
        /// Unit price; looked up in the catalog when omitted.
        #[arg(long)]
        price: Option<String>,
    },
    Remove {
        name: String,
    },
    SetQuantity {
        name: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    Increment {
        name: String,
    },
    Decrement {
        name: String,
    },
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    Checkout,
    Search {
        #[arg(default_value = "")]
        term: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(url) = cli.database_url {
        settings.database_url = url;
    }
    if let Some(path) = cli.catalog {
        settings.catalog_path = Some(path);
    }

    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(%database_url, error = %format!("{error:#}"), "failed to open cart database");
        error
    })?;
    let catalog = match &settings.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::default(),
    };
    let controller = CartController::new(CartStore::with_key(storage, settings.cart_key));

    let output = execute(
        &controller,
        &catalog,
        cli.command,
        &settings.currency_symbol,
        confirm_on_stdin,
    )
    .await?;
    print!("{output}");
    Ok(())
}

fn confirm_on_stdin() -> bool {
    print!("Clear your entire cart? [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Runs one command and returns everything it prints.
async fn execute<S: KeyValueStore>(
    controller: &CartController<S>,
    catalog: &Catalog,
    command: Command,
    currency: &str,
    confirm: impl FnOnce() -> bool,
) -> Result<String> {
    let intent = match command {
        Command::Show => return Ok(render_text(&controller.display().await, currency)),
        Command::Search { term } => return Ok(render_search(catalog, &term, currency)),
        Command::Add { name, price } => {
            let price = match price {
                Some(raw) => parse_price(&raw)?,
                None => catalog
                    .find(&name)
                    .map(|product| product.price)
                    .ok_or_else(|| {
                        CartError::not_found(format!("'{name}' is not in the catalog; pass --price"))
                    })?,
            };
            CartIntent::AddItem { name, price }
        }
        Command::Remove { name } => CartIntent::RemoveItem { name },
        Command::SetQuantity { name, quantity } => CartIntent::SetQuantity { name, quantity },
        Command::Increment { name } => match step_intent(controller, &name, Step::Up).await {
            Some(intent) => intent,
            None => return Ok(not_in_cart(controller, &name, currency).await),
        },
        Command::Decrement { name } => match step_intent(controller, &name, Step::Down).await {
            Some(intent) => intent,
            None => return Ok(not_in_cart(controller, &name, currency).await),
        },
        Command::Clear { yes } => CartIntent::ClearCart {
            confirmed: yes || confirm(),
        },
        Command::Checkout => CartIntent::Checkout,
    };

    let update = controller.dispatch(intent).await;
    let mut out = String::new();
    if let Some(notification) = &update.notification {
        out.push_str(&render_notification(notification));
    }
    out.push_str(&render_text(&update.page, currency));
    Ok(out)
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Up,
    Down,
}

/// Picks the "+" or "-" control of the line as currently rendered.
async fn step_intent<S: KeyValueStore>(
    controller: &CartController<S>,
    name: &str,
    step: Step,
) -> Option<CartIntent> {
    let page = controller.display().await;
    let line = page.line(name)?;
    Some(match step {
        Step::Up => line.increment.clone(),
        Step::Down => line.decrement.clone(),
    })
}

async fn not_in_cart<S: KeyValueStore>(
    controller: &CartController<S>,
    name: &str,
    currency: &str,
) -> String {
    format!(
        "'{name}' is not in the cart\n{}",
        render_text(&controller.display().await, currency)
    )
}

fn render_notification(notification: &Notification) -> String {
    let label = match notification.kind {
        NotificationKind::Success => "ok",
        NotificationKind::Error => "error",
        NotificationKind::Info => "info",
    };
    format!("[{label}] {}\n", notification.message)
}

fn render_search(catalog: &Catalog, term: &str, currency: &str) -> String {
    let result = catalog.search(term);
    let mut out = String::new();
    for product in &result.matches {
        out.push_str(&format!(
            "{}  {}\n",
            product.name,
            format_amount(currency, product.price)
        ));
    }
    for product in &result.dimmed {
        out.push_str(&format!("  ({})\n", product.name));
    }
    if result.matches.is_empty() {
        out.push_str("No products match.\n");
    }
    out
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
