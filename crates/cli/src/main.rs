//! MMA Shop CLI - Drive the cart, favorites, checkout and order stores.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (every cart, favorites and checkout command acts for this user)
//! mma-cli login --id u1 --name "Lan" --email lan@example.vn --phone 0912345678 \
//!     --dob 2000-01-01 --address "12 Le Loi, Hue"
//!
//! # Fill the cart
//! mma-cli cart add --id 1 --name "Dior Sauvage" --price 500000 --stock 5 --quantity 2
//! mma-cli cart inc 1
//!
//! # Check out everything with express shipping and a voucher
//! mma-cli checkout --shipping express --voucher FREESHIP
//!
//! # Move an order along
//! mma-cli orders advance 123456 processing
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` - Session
//! - `cart` - Add, list, change quantities, remove
//! - `fav` - Add, remove, list favorites
//! - `checkout` - Place an order from the cart
//! - `orders` - List, show, change status
//! - `revenue` - Sum of all order totals
//! - `catalog` - Shipping options and vouchers

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use mma_shop_core::{OrderStatus, ProductId};
use mma_shop_store::{ShopConfig, ShopState};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "mma-cli")]
#[command(author, version, about = "MMA shop command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as a user
    Login {
        /// Account id
        #[arg(long)]
        id: String,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        /// Vietnamese phone number (0xxxxxxxxx or +84xxxxxxxxx)
        #[arg(short, long)]
        phone: String,
        /// Date of birth
        #[arg(long, default_value = "")]
        dob: String,
        /// Delivery address
        #[arg(short, long, default_value = "")]
        address: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage favorites
    Fav {
        #[command(subcommand)]
        action: FavAction,
    },
    /// Place an order from the cart
    Checkout {
        /// Shipping option (`standard`, `express`, `super-express`)
        #[arg(short, long, default_value = "standard")]
        shipping: String,
        /// Voucher code
        #[arg(short, long)]
        voucher: Option<String>,
        /// Only check out these product ids (default: the whole cart)
        #[arg(short, long, value_delimiter = ',')]
        products: Vec<ProductId>,
    },
    /// Inspect and update orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Sum of all order totals
    Revenue,
    /// List shipping options and vouchers
    Catalog,
}

/// Product details shared by `cart add` and `fav add`.
#[derive(clap::Args)]
struct ProductArgs {
    /// Product id
    #[arg(long)]
    id: ProductId,
    #[arg(short, long)]
    name: String,
    /// Unit price in VND
    #[arg(long)]
    price: Decimal,
    #[arg(long, default_value = "")]
    image: String,
    /// Units in stock
    #[arg(long, default_value_t = 1)]
    stock: u32,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product (a repeat add creates a second line unless --merge)
    Add {
        #[command(flatten)]
        product: ProductArgs,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
        /// Add to an existing line instead of appending a new one
        #[arg(long)]
        merge: bool,
    },
    /// List the cart with the checkout subtotal
    List,
    /// Set the quantity of a product in your cart, up to stock
    Qty { id: ProductId, quantity: u32 },
    /// Add one unit, up to stock
    Inc { id: ProductId },
    /// Remove one unit, down to one
    Dec { id: ProductId },
    /// Remove a product from your cart
    Remove {
        id: ProductId,
        /// Remove the product from every user's cart
        #[arg(long)]
        all_users: bool,
    },
}

#[derive(Subcommand)]
enum FavAction {
    /// Favorite a product
    Add {
        #[command(flatten)]
        product: ProductArgs,
    },
    /// Unfavorite a product
    Remove {
        id: ProductId,
        /// Remove the product from every user's favorites
        #[arg(long)]
        all_users: bool,
    },
    /// List your favorites
    List,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List your orders, newest first (--all for every user)
    List {
        #[arg(long)]
        all: bool,
    },
    /// Show one order
    Show { order_id: String },
    /// Set an order's status without lifecycle checks
    Status {
        order_id: String,
        status: OrderStatus,
    },
    /// Move an order along its lifecycle
    Advance {
        order_id: String,
        status: OrderStatus,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ShopConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(config.sentry_environment.clone().into()),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ShopConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mma_shop_store=info,mma_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ShopConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = ShopState::open(config).await?;

    match cli.command {
        Commands::Login {
            id,
            name,
            email,
            phone,
            dob,
            address,
        } => {
            let login = commands::session::Login {
                id,
                name,
                email,
                phone,
                dob,
                address,
            };
            commands::session::login(&state, login).await?;
        }
        Commands::Logout => commands::session::logout(&state).await?,
        Commands::Whoami => commands::session::whoami(&state).await?,
        Commands::Cart { action } => match action {
            CartAction::Add {
                product,
                quantity,
                merge,
            } => commands::cart::add(&state, &product.into(), quantity, merge).await?,
            CartAction::List => commands::cart::list(&state).await?,
            CartAction::Qty { id, quantity } => {
                commands::cart::set_quantity(&state, id, quantity).await?;
            }
            CartAction::Inc { id } => commands::cart::step(&state, id, true).await?,
            CartAction::Dec { id } => commands::cart::step(&state, id, false).await?,
            CartAction::Remove { id, all_users } => {
                commands::cart::remove(&state, id, all_users).await?;
            }
        },
        Commands::Fav { action } => match action {
            FavAction::Add { product } => commands::favorites::add(&state, &product.into()).await?,
            FavAction::Remove { id, all_users } => {
                commands::favorites::remove(&state, id, all_users).await?;
            }
            FavAction::List => commands::favorites::list(&state).await?,
        },
        Commands::Checkout {
            shipping,
            voucher,
            products,
        } => {
            commands::checkout::place_order(&state, &shipping, voucher.as_deref(), &products)
                .await?;
        }
        Commands::Orders { action } => match action {
            OrdersAction::List { all } => commands::orders::list(&state, all).await?,
            OrdersAction::Show { order_id } => commands::orders::show(&state, &order_id).await?,
            OrdersAction::Status { order_id, status } => {
                commands::orders::set_status(&state, &order_id, status).await?;
            }
            OrdersAction::Advance { order_id, status } => {
                commands::orders::advance(&state, &order_id, status).await?;
            }
        },
        Commands::Revenue => commands::orders::revenue(&state).await,
        Commands::Catalog => commands::catalog::list(),
    }
    Ok(())
}

impl From<ProductArgs> for mma_shop_store::models::Product {
    fn from(args: ProductArgs) -> Self {
        Self {
            id: args.id,
            name: args.name,
            image: args.image,
            price: args.price,
            stock: args.stock,
        }
    }
}
