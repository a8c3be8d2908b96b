//! GoMarket CLI - inspect and mutate a cart from the command line.
//!
//! The cart lives in JSON files under `GOMARKET_DATA_DIR` (default
//! `./data`), so repeated invocations operate on the same persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gomarket show
//!
//! # Add one unit of a product (bumps quantity if already present)
//! gomarket add --id p1 --title "Shirt" --image-url https://img.example/p1.png --price 19.90
//!
//! # Adjust quantities
//! gomarket inc p1
//! gomarket dec p1
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};

use gomarket_cart::storage::JsonFileStore;
use gomarket_cart::{CartConfig, CartStore, NewLineItem};
use gomarket_core::{Price, ProductId};

#[derive(Parser)]
#[command(name = "gomarket")]
#[command(author, version, about = "GoMarket cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current cart
    Show,
    /// Add one unit of a product to the cart
    Add {
        /// Product id
        #[arg(long)]
        id: String,

        /// Product title
        #[arg(long)]
        title: String,

        /// Product image URL
        #[arg(long)]
        image_url: String,

        /// Unit price (e.g. 19.90)
        #[arg(long)]
        price: Price,
    },
    /// Increase the quantity of a line item by one
    Inc {
        /// Product id
        id: String,
    },
    /// Decrease the quantity of a line item by one (stops at 1)
    Dec {
        /// Product id
        id: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gomarket_cart=info,gomarket_cli=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    let storage = Arc::new(JsonFileStore::open(config.data_dir.clone()).await?);
    let store = CartStore::open(storage, &config).await?;

    match cli.command {
        Commands::Show => {}
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => {
            store.add_item(NewLineItem {
                id: ProductId::parse(&id)?,
                title,
                image_url,
                price,
            });
        }
        Commands::Inc { id } => store.increment(&ProductId::parse(&id)?),
        Commands::Dec { id } => store.decrement(&ProductId::parse(&id)?),
    }

    // Mutations are fire-and-forget; wait for the write before the process exits.
    store.flush().await?;

    print_cart(&store);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(store: &CartStore) {
    let items = store.items();
    if items.is_empty() {
        println!("cart is empty");
        return;
    }

    for item in &items {
        println!(
            "{:>3} x {:<30} {:>10}  [{}]",
            item.quantity.get(),
            item.title,
            item.price.to_string(),
            item.id
        );
    }
}
