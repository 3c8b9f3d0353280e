//! Course Cart CLI - Inspect and edit a cart stored in a JSON file.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart in ./cart.json
//! cart-cli show
//!
//! # Add one unit of a course
//! cart-cli add --name "Algebra I" --price '$49.99' --image /static/img/algebra.svg
//!
//! # Change the quantity of the first line item
//! cart-cli set-quantity 0 3
//!
//! # Remove the first line item from another store file
//! cart-cli --store ~/carts/alice.json remove 0
//! ```
//!
//! # Commands
//!
//! - `show` - Print the cart summary
//! - `add` - Add one unit of a product
//! - `remove` - Remove a line item by position
//! - `set-quantity` - Set a line item's quantity (values below 1 store 1)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use coursecart_core::CartError;
use thiserror::Error;

mod commands;
mod file_store;

use file_store::FileStore;

/// Errors that end a CLI run with exit status 1.
#[derive(Debug, Error)]
enum CliError {
    /// The cart operation was rejected or could not be saved.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Writing the summary to stdout failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Course Cart command-line tools")]
struct Cli {
    /// JSON file holding the store (one object of key to string value)
    #[arg(short, long, global = true, default_value = "cart.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart summary
    Show,
    /// Add one unit of a product
    Add {
        /// Product name (line items are matched by name)
        #[arg(short, long)]
        name: String,

        /// Display price, e.g. "$49.99"
        #[arg(short, long, default_value = "")]
        price: String,

        /// Image URL
        #[arg(short, long, default_value = "")]
        image: String,
    },
    /// Remove the line item at a position
    Remove {
        /// Zero-based line item position
        index: String,
    },
    /// Set the quantity of the line item at a position
    SetQuantity {
        /// Zero-based line item position
        index: String,

        /// New quantity; anything below 1 stores 1
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coursecart_cli=info,coursecart_core=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let store = FileStore::new(cli.store);
    tracing::debug!(path = %store.path().display(), "Using store file");

    let summary = match cli.command {
        Commands::Show => commands::cart::show(store).await,
        Commands::Add { name, price, image } => {
            commands::cart::add(store, &name, &price, &image).await?
        }
        Commands::Remove { index } => commands::cart::remove(store, &index).await?,
        Commands::SetQuantity { index, quantity } => {
            commands::cart::set_quantity(store, &index, &quantity).await?
        }
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{summary}")?;
    Ok(())
}
