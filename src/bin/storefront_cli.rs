use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use storefront_api::{
    client::{CartSummary, SessionStore, StorefrontClient, DEFAULT_BASE_URL},
    entities::{CategoryModel, ProductModel},
    services::orders::PlaceOrderInput,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("STOREFRONT_URL").ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let client = StorefrontClient::new(base_url).context("failed to build HTTP client")?;
    let store = match cli.session_file.clone() {
        Some(path) => SessionStore::new(path),
        None => SessionStore::default_location()
            .ok_or_else(|| anyhow!("no home directory; pass --session-file"))?,
    };
    let context = CliContext { client, store };

    match cli.command {
        Commands::Products(args) => handle_products(&context, args, cli.json).await?,
        Commands::Categories => handle_categories(&context, cli.json).await?,
        Commands::Cart(command) => handle_cart_command(&context, command, cli.json).await?,
        Commands::Checkout(args) => handle_checkout(&context, args, cli.json).await?,
        Commands::Session(command) => handle_session_command(&context, command, cli.json)?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(name = "storefront", about = "Browse the storefront, manage your cart and check out", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[arg(
        long,
        global = true,
        help = "API base URL (defaults to $STOREFRONT_URL or http://localhost:8080)"
    )]
    base_url: Option<String>,
    #[arg(long, global = true, help = "Session file to use instead of the default location")]
    session_file: Option<std::path::PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, optionally for one category
    Products(ProductsArgs),
    /// List categories
    Categories,
    #[command(subcommand)]
    Cart(CartCommands),
    /// Place an order for the current cart
    Checkout(CheckoutArgs),
    #[command(subcommand)]
    Session(SessionCommands),
}

#[derive(Args)]
struct ProductsArgs {
    #[arg(long, help = "Only list products of this category id")]
    category: Option<i32>,
}

#[derive(Subcommand)]
enum CartCommands {
    /// Show cart lines with client-side totals
    Show,
    /// Add a product as a new line
    Add(CartAddArgs),
    /// Set the quantity of a line
    Set(CartSetArgs),
    /// Increase a line's quantity by one
    Inc(CartItemArgs),
    /// Decrease a line's quantity by one, stopping at zero
    Dec(CartItemArgs),
    /// Remove a line
    Remove(CartItemArgs),
}

#[derive(Args)]
struct CartAddArgs {
    #[arg(help = "Product id")]
    product: i32,
    #[arg(long, default_value_t = 1, help = "Quantity to add")]
    quantity: i32,
}

#[derive(Args)]
struct CartSetArgs {
    #[arg(help = "Cart item id")]
    item: i32,
    #[arg(help = "New quantity")]
    quantity: i32,
}

#[derive(Args)]
struct CartItemArgs {
    #[arg(help = "Cart item id")]
    item: i32,
}

#[derive(Args)]
struct CheckoutArgs {
    #[arg(long, help = "Contact email")]
    email: String,
    #[arg(long, help = "Delivery address")]
    address: String,
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Print the current session id
    Show,
    /// Start a new, empty cart
    Reset,
}

struct CliContext {
    client: StorefrontClient,
    store: SessionStore,
}

impl CliContext {
    async fn summary(&self) -> Result<(storefront_api::session::SessionId, CartSummary)> {
        let session = self.store.load_or_create()?;
        let lines = self
            .client
            .list_cart(&session.session_id)
            .await
            .context("failed to load cart")?;
        let products = self
            .client
            .list_products()
            .await
            .context("failed to load products")?;
        Ok((session.session_id, CartSummary::build(&lines, &products)))
    }

    async fn current_quantity(&self, item_id: i32) -> Result<i32> {
        let (_, summary) = self.summary().await?;
        summary
            .find(item_id)
            .map(|line| line.quantity)
            .ok_or_else(|| anyhow!("cart item {} is not in this session's cart", item_id))
    }
}

async fn handle_products(context: &CliContext, args: ProductsArgs, json: bool) -> Result<()> {
    let products = match args.category {
        Some(category_id) => context
            .client
            .list_products_by_category(category_id)
            .await
            .with_context(|| format!("failed to list products of category {}", category_id))?,
        None => context
            .client
            .list_products()
            .await
            .context("failed to list products")?,
    };

    if json {
        print_json(&products)?;
    } else if products.is_empty() {
        println!("No products found.");
    } else {
        for product in &products {
            render_product(product);
        }
    }
    Ok(())
}

async fn handle_categories(context: &CliContext, json: bool) -> Result<()> {
    let categories = context
        .client
        .list_categories()
        .await
        .context("failed to list categories")?;

    if json {
        print_json(&categories)?;
    } else {
        for category in &categories {
            render_category(category);
        }
    }
    Ok(())
}

async fn handle_cart_command(context: &CliContext, command: CartCommands, json: bool) -> Result<()> {
    match command {
        CartCommands::Show => {
            let (session_id, summary) = context.summary().await?;
            if json {
                print_json(&summary)?;
            } else {
                render_summary(&session_id, &summary);
            }
            return Ok(());
        }
        CartCommands::Add(args) => {
            if args.quantity < 0 {
                bail!("quantity must not be negative");
            }
            let session = context.store.load_or_create()?;
            let item = context
                .client
                .add_to_cart(&session.session_id, args.product, args.quantity)
                .await
                .context("failed to add to cart")?;
            if json {
                return print_json(&item);
            }
            println!(
                "Added product {} x{} (line {})",
                item.product_id, item.quantity, item.id
            );
        }
        CartCommands::Set(args) => {
            if args.quantity < 0 {
                bail!("quantity must not be negative");
            }
            set_quantity(context, args.item, args.quantity, json).await?;
        }
        CartCommands::Inc(args) => {
            let quantity = context.current_quantity(args.item).await?;
            set_quantity(context, args.item, quantity.saturating_add(1), json).await?;
        }
        CartCommands::Dec(args) => {
            // Stops at zero and keeps the line; only `remove` deletes.
            let quantity = context.current_quantity(args.item).await?;
            set_quantity(context, args.item, quantity.saturating_sub(1).max(0), json).await?;
        }
        CartCommands::Remove(args) => {
            context
                .client
                .remove_cart_item(args.item)
                .await
                .context("failed to remove cart item")?;
            if json {
                return print_json(&serde_json::json!({ "removed": args.item }));
            }
            println!("Removed line {}", args.item);
        }
    }
    Ok(())
}

async fn set_quantity(context: &CliContext, item_id: i32, quantity: i32, json: bool) -> Result<()> {
    let item = context
        .client
        .update_cart_item(item_id, quantity)
        .await
        .with_context(|| format!("failed to update cart item {}", item_id))?;
    if json {
        print_json(&item)?;
    } else {
        println!("Line {} now has quantity {}", item.id, item.quantity);
    }
    Ok(())
}

async fn handle_checkout(context: &CliContext, args: CheckoutArgs, json: bool) -> Result<()> {
    let (session_id, summary) = context.summary().await?;
    if summary.is_empty() {
        bail!("cart is empty");
    }

    let input = PlaceOrderInput {
        session_id: session_id.to_string(),
        email: args.email,
        address: args.address,
        total: summary.total,
    };
    let order = context
        .client
        .place_order(&input)
        .await
        .context("failed to place order")?;

    if json {
        print_json(&order)?;
    } else {
        println!("Order {} placed • total {}", order.id, order.total);
    }
    Ok(())
}

fn handle_session_command(context: &CliContext, command: SessionCommands, json: bool) -> Result<()> {
    let session = match command {
        SessionCommands::Show => context.store.load_or_create()?,
        SessionCommands::Reset => context.store.reset()?,
    };

    if json {
        print_json(&session)?;
    } else {
        println!("Session: {}", session.session_id);
        println!("Stored at: {}", context.store.path().display());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_product(product: &ProductModel) {
    let category = product
        .category_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "- [{}] {} • {} • category {}",
        product.id, product.name, product.price, category
    );
}

fn render_category(category: &CategoryModel) {
    println!("- [{}] {}", category.id, category.name);
}

fn render_summary(session_id: &storefront_api::session::SessionId, summary: &CartSummary) {
    println!("Cart for session {}", session_id);
    if summary.is_empty() {
        println!("  (empty)");
        return;
    }
    for line in &summary.lines {
        let name = line.name.as_deref().unwrap_or("unknown product");
        let price = line
            .unit_price
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  line {} • {} x{} @ {} = {}",
            line.item_id, name, line.quantity, price, line.line_total
        );
    }
    println!("Items: {} • Total: {}", summary.item_count, summary.total);
}
