use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    DeleteConfirmation, HttpCatalogClient, InventorySession, InventoryView, MutationOutcome,
    Preconfirmed,
};
use shared::domain::{CategoryId, ItemId, ItemStatus, LocationId};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Overrides, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(name = "inventory", about = "Browse and edit the inventory catalog")]
struct Cli {
    /// Catalog service base url.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Per-request timeout in seconds; 0 disables it.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[arg(long, global = true)]
    api_token: Option<String>,
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List items, optionally filtered.
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Exact status; omitted shows Unclaimed and Claimed items.
        #[arg(long, default_value = "")]
        status: String,
    },
    Categories,
    Locations,
    AddItem(NewItemArgs),
    UpdateItem {
        id: i64,
        #[command(flatten)]
        changes: ItemChanges,
    },
    DeleteItem {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    AddCategory {
        name: String,
    },
    DeleteCategory {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    AddLocation {
        building: String,
        floor: String,
    },
    DeleteLocation {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct NewItemArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    location: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "Unclaimed")]
    status: String,
    /// YYYY-MM-DD
    #[arg(long, default_value = "")]
    date: String,
}

#[derive(Args, Debug)]
struct ItemChanges {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    date: Option<String>,
}

/// Asks on the terminal; anything but `y`/`yes` declines.
struct TerminalConfirmation;

impl DeleteConfirmation for TerminalConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn confirmation(yes: bool) -> &'static dyn DeleteConfirmation {
    if yes {
        &Preconfirmed
    } else {
        &TerminalConfirmation
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = load_settings(
        &cli.config,
        Overrides {
            server_url: cli.server_url,
            request_timeout_secs: cli.timeout_secs,
            api_token: cli.api_token,
        },
    )?;
    info!(server_url = %settings.server_url, "inventory: using catalog service");

    let remote = HttpCatalogClient::with_options(&settings.server_url, settings.http_options())
        .context("failed to set up catalog client")?;
    let session = InventorySession::new(Arc::new(remote));

    run(&session, cli.command).await
}

async fn run(session: &InventorySession, command: Command) -> Result<()> {
    match command {
        Command::List {
            search,
            category,
            location,
            status,
        } => {
            session
                .refresh_all()
                .await
                .context("failed to load items")?;
            session.set_search_term(search);
            session.set_category_filter(category.as_deref());
            session.set_location_filter(location.as_deref());
            session.set_status_filter(&status);
            print_items(&session.view());
            // Reference fetch failures leave placeholders in the rows.
            report(session);
        }
        Command::Categories => {
            session
                .fetch_categories()
                .await
                .context("failed to load categories")?;
            for option in session.view().category_options {
                println!("{}\t{}", option.value, option.label);
            }
        }
        Command::Locations => {
            session
                .fetch_locations()
                .await
                .context("failed to load locations")?;
            for option in session.view().location_options {
                println!("{}\t{}", option.value, option.label);
            }
        }
        Command::AddItem(args) => {
            session.open_new_item();
            session.edit_item_form(|form| {
                form.name = args.name;
                form.category = args.category;
                form.location = args.location;
                form.description = args.description;
                form.status = ItemStatus::parse(&args.status);
                form.date = args.date;
            });
            if let Some(item) = session.submit_item_form().await? {
                println!("{}", item.item_id);
            }
            report(session);
        }
        Command::UpdateItem { id, changes } => {
            session.fetch_items().await.context("failed to load items")?;
            let items = session.store().items();
            let Some(item) = items.iter().find(|item| item.item_id == ItemId(id)) else {
                bail!("no item with id {id}");
            };
            session.open_item_editor(item);
            session.edit_item_form(|form| {
                if let Some(v) = changes.name {
                    form.name = v;
                }
                if let Some(v) = changes.category {
                    form.category = v;
                }
                if let Some(v) = changes.location {
                    form.location = v;
                }
                if let Some(v) = changes.description {
                    form.description = v;
                }
                if let Some(v) = changes.status {
                    form.status = ItemStatus::parse(&v);
                }
                if let Some(v) = changes.date {
                    form.date = v;
                }
            });
            session.submit_item_form().await?;
            report(session);
        }
        Command::DeleteItem { id, yes } => {
            let outcome = session.delete_item(ItemId(id), confirmation(yes)).await?;
            report_outcome(session, outcome);
        }
        Command::AddCategory { name } => {
            session.edit_category_form(|form| form.name = name);
            if let Some(category) = session.submit_category_form().await? {
                println!("{}", category.category_id);
            }
            report(session);
        }
        Command::DeleteCategory { id, yes } => {
            let outcome = session
                .delete_category(CategoryId(id), confirmation(yes))
                .await?;
            report_outcome(session, outcome);
        }
        Command::AddLocation { building, floor } => {
            session.edit_location_form(|form| {
                form.building = building;
                form.floor = floor;
            });
            if let Some(location) = session.submit_location_form().await? {
                println!("{}", location.location_id);
            }
            report(session);
        }
        Command::DeleteLocation { id, yes } => {
            let outcome = session
                .delete_location(LocationId(id), confirmation(yes))
                .await?;
            report_outcome(session, outcome);
        }
    }
    Ok(())
}

fn print_items(view: &InventoryView) {
    if let Some(caption) = view.empty_caption() {
        println!("{caption}");
        return;
    }
    println!("ID\tName\tDescription\tCategory\tLocation\tStatus\tDate Added");
    for row in &view.rows {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.item_id,
            row.name,
            row.description,
            row.category,
            row.location,
            row.status,
            row.date_added
        );
    }
}

/// Reload failures after a successful write are surfaced but do not fail the command.
fn report(session: &InventorySession) {
    if let Some(message) = session.notices().success() {
        println!("{message}");
    }
    if let Some(message) = session.notices().error() {
        eprintln!("warning: {message}");
    }
}

fn report_outcome(session: &InventorySession, outcome: MutationOutcome) {
    match outcome {
        MutationOutcome::Completed => report(session),
        MutationOutcome::Declined => println!("Cancelled."),
    }
}
