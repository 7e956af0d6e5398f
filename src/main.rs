use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use sprout_admin::client::{ImageUpload, ProductPayload};
use sprout_admin::errors::ServiceError;
use sprout_admin::models::{Acknowledgement, NewProduct, ProductOption, ShipmentStatus};
use sprout_admin::services::{preview_count, ActionOutcome};
use sprout_admin::{config, events, AdminContext, ListQuery};

#[derive(Parser)]
#[command(
    name = "sprout-admin",
    version,
    about = "Back-office tooling for the Sprout grocery storefront"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and drive order lifecycles
    Orders {
        #[command(subcommand)]
        action: OrderCommands,
    },
    /// Generate and preview product variants
    Variants {
        #[command(subcommand)]
        action: VariantCommands,
    },
    /// Manage catalog products
    Products {
        #[command(subcommand)]
        action: ProductCommands,
    },
}

#[derive(Subcommand)]
enum OrderCommands {
    /// List orders
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 20)]
        limit: u64,
    },
    /// Show one order
    Show { id: Uuid },
    /// Confirm a pending order
    Confirm { id: Uuid },
    /// Cancel an order (terminal)
    Cancel {
        id: Uuid,
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Delete an order permanently
    Delete {
        id: Uuid,
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Set the shipment stage (placed, pending, processing, delivered)
    SetShipment { id: Uuid, stage: String },
}

#[derive(Args)]
struct VariantArgs {
    /// Product name used for the SKU base slug
    #[arg(long)]
    name: String,
    /// Option axis as "Name=v1,v2,..."; repeatable
    #[arg(long = "option", value_parser = parse_option)]
    options: Vec<ProductOption>,
}

#[derive(Subcommand)]
enum VariantCommands {
    /// Print how many variants the options expand to
    Preview(VariantArgs),
    /// Expand options into variant drafts and print them as JSON
    Generate(VariantArgs),
}

#[derive(Subcommand)]
enum ProductCommands {
    /// Create a product; images switch the submission to multipart
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        description: Option<String>,
        /// Sales unit label, e.g. "kg" or "bunch"
        #[arg(long)]
        unit: Option<String>,
        /// Image file; repeatable
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    /// List products
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 20)]
        limit: u64,
    },
}

fn parse_option(raw: &str) -> Result<ProductOption, String> {
    let (name, values) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected Name=v1,v2 but got {raw:?}"))?;
    if name.trim().is_empty() {
        return Err("option name must not be empty".to_string());
    }
    let mut option = ProductOption::new(name.trim());
    for value in values.split(',') {
        let value = value.trim();
        if !value.is_empty() {
            option.push_value(value);
        }
    }
    Ok(option)
}

/// Asks the operator for a y/N acknowledgement on stdin.
fn acknowledge(question: &str, assume_yes: bool) -> Acknowledgement {
    if assume_yes {
        return Acknowledgement::Accepted;
    }
    print!("{question} [y/N] ");
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return Acknowledgement::Dismissed;
    }
    if answer.trim().eq_ignore_ascii_case("y") {
        Acknowledgement::Accepted
    } else {
        Acknowledgement::Dismissed
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), ServiceError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run() -> Result<(), ServiceError> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    config::init_tracing(&cfg.log_level);

    let (event_tx, event_rx) = mpsc::channel(1024);
    tokio::spawn(events::process_events(event_rx));

    let ctx = AdminContext::new(cfg, events::EventSender::new(event_tx))?;

    match cli.command {
        Commands::Orders { action } => {
            let orders = ctx.order_service();
            match action {
                OrderCommands::List { page, limit } => {
                    let result = orders.list_orders(ListQuery { page, limit }).await?;
                    print_json(&result)?;
                }
                OrderCommands::Show { id } => {
                    let order = orders.get_order(id).await?;
                    print_json(&order)?;
                }
                OrderCommands::Confirm { id } => {
                    let result = orders.confirm(id).await?;
                    print_json(&result)?;
                }
                OrderCommands::Cancel { id, yes } => {
                    let ack = acknowledge(
                        &format!("Cancel order {id}? This cannot be undone."),
                        yes,
                    );
                    match orders.cancel(id, ack).await? {
                        ActionOutcome::Completed(result) => print_json(&result)?,
                        ActionOutcome::Aborted => println!("aborted"),
                    }
                }
                OrderCommands::Delete { id, yes } => {
                    let ack = acknowledge(
                        &format!("Delete order {id} permanently? This cannot be undone."),
                        yes,
                    );
                    match orders.delete(id, ack).await? {
                        ActionOutcome::Completed(result) => print_json(&result)?,
                        ActionOutcome::Aborted => println!("aborted"),
                    }
                }
                OrderCommands::SetShipment { id, stage } => {
                    let stage = ShipmentStatus::from_str(&stage).map_err(|_| {
                        ServiceError::InvalidStatus(format!(
                            "Unknown shipment stage: {stage} (expected placed, pending, processing or delivered)"
                        ))
                    })?;
                    let result = orders.set_shipment(id, stage).await?;
                    print_json(&result)?;
                }
            }
        }
        Commands::Variants { action } => {
            let catalog = ctx.catalog_service();
            match action {
                VariantCommands::Preview(args) => {
                    println!("{}", preview_count(&args.options));
                }
                VariantCommands::Generate(args) => {
                    let drafts = catalog.generate_variants(&args.name, &args.options).await?;
                    if drafts.is_empty() {
                        info!("no option values supplied; nothing generated");
                    }
                    print_json(&drafts)?;
                }
            }
        }
        Commands::Products { action } => {
            let catalog = ctx.catalog_service();
            match action {
                ProductCommands::Create {
                    name,
                    price,
                    description,
                    unit,
                    images,
                } => {
                    let product = NewProduct {
                        name,
                        description,
                        price,
                        unit,
                        is_active: true,
                        variants: Vec::new(),
                    };
                    let payload = if images.is_empty() {
                        ProductPayload::Json(product)
                    } else {
                        let mut uploads = Vec::with_capacity(images.len());
                        for path in images {
                            uploads.push(read_image(&path).await?);
                        }
                        ProductPayload::Multipart {
                            product,
                            images: uploads,
                        }
                    };
                    let created = catalog.create_product(payload).await?;
                    print_json(&created)?;
                }
                ProductCommands::List { page, limit } => {
                    let result = catalog.list_products(ListQuery { page, limit }).await?;
                    print_json(&result)?;
                }
            }
        }
    }

    Ok(())
}

async fn read_image(path: &PathBuf) -> Result<ImageUpload, ServiceError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ServiceError::ValidationError(format!("cannot read {}: {e}", path.display())))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let content_type = match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };
    Ok(ImageUpload {
        file_name,
        content_type: content_type.to_string(),
        bytes,
    })
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
