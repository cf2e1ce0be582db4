use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use property_catalog::browse::{BrowseSession, CatalogPage, FilterEdit, FilterForm, FILTER_DEBOUNCE};
use property_catalog::catalog::{
    create_property, CreatePropertyForm, FilterQuery, HttpPropertyService, InMemoryPropertyService,
    PropertyService,
};
use property_catalog::{render, AppConfig, CatalogError};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "property-catalog", version, about = "Browse and create real-estate listings")]
struct Cli {
    /// Use the built-in sample catalog instead of the backend
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List one page of properties matching the filters
    List {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long)]
        min_price: Option<i64>,
        #[arg(long)]
        max_price: Option<i64>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show the details of one property
    Show { id: String },
    /// Create a new property
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        price: i64,
        #[arg(long)]
        image_url: String,
        #[arg(long, default_value = "")]
        owner_id: String,
    },
    /// Interactive browsing with live, debounced filters
    Browse,
}

/// One line typed into the browse prompt
#[derive(Debug, PartialEq, Eq)]
enum BrowseCommand {
    Edit(FilterEdit),
    Page(usize),
    Refetch,
    Show,
    Help,
    Quit,
}

const BROWSE_HELP: &str = "commands: name <text> | address <text> | price <min> <max> | page <n> | refetch | show | quit";

fn parse_command(line: &str) -> std::result::Result<BrowseCommand, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match word {
        "name" => Ok(BrowseCommand::Edit(FilterEdit::Name(rest.to_string()))),
        "address" => Ok(BrowseCommand::Edit(FilterEdit::Address(rest.to_string()))),
        "price" => {
            let bounds: Vec<i64> = rest
                .split_whitespace()
                .map(|n| n.replace(['_', ','], "").parse::<i64>())
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| format!("invalid price: {}", e))?;
            match bounds.as_slice() {
                [min, max] => Ok(BrowseCommand::Edit(FilterEdit::PriceRange(*min, *max))),
                _ => Err("usage: price <min> <max>".to_string()),
            }
        }
        "page" => rest
            .parse()
            .map(BrowseCommand::Page)
            .map_err(|_| "usage: page <n>".to_string()),
        "refetch" => Ok(BrowseCommand::Refetch),
        "show" | "" => Ok(BrowseCommand::Show),
        "help" => Ok(BrowseCommand::Help),
        "quit" | "exit" => Ok(BrowseCommand::Quit),
        other => Err(format!("unknown command '{}'", other)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("🏠 {} v{}", config.app.name, config.app.version);

    let service: Arc<dyn PropertyService> = if cli.offline {
        Arc::new(InMemoryPropertyService::with_sample_data())
    } else {
        Arc::new(HttpPropertyService::new(&config).context("Failed to create HTTP client")?)
    };
    info!("Using {} backend", service.source_name());

    match cli.command {
        Command::List {
            name,
            address,
            min_price,
            max_price,
            page,
        } => {
            let defaults = FilterForm::default();
            let form = defaults.clone().with(FilterEdit::Name(name)).with(FilterEdit::Address(address)).with(
                FilterEdit::PriceRange(
                    min_price.unwrap_or(defaults.min_price),
                    max_price.unwrap_or(defaults.max_price),
                ),
            );
            list(service, form.to_query(), page).await
        }
        Command::Show { id } => show(service.as_ref(), &id).await,
        Command::Create {
            name,
            address,
            price,
            image_url,
            owner_id,
        } => {
            let form = CreatePropertyForm {
                owner_id,
                name,
                address,
                price,
                image_url,
            };
            create(service.as_ref(), &form).await
        }
        Command::Browse => browse(service).await,
    }
}

async fn list(service: Arc<dyn PropertyService>, query: FilterQuery, page: usize) -> Result<()> {
    let mut catalog = CatalogPage::new(service);
    if let Some(handle) = catalog.on_filters_change(query) {
        handle.await.context("Fetch task panicked")?;
    }
    if page != 1 && !catalog.on_page_change(page) {
        eprintln!("Page {} is not available, showing page 1", page);
    }

    let view = catalog.view();
    print!("{}", render::page_view(&view));
    match view.error {
        Some(error) => anyhow::bail!(error),
        None => Ok(()),
    }
}

async fn show(service: &dyn PropertyService, id: &str) -> Result<()> {
    let everything = FilterQuery {
        name: None,
        address: None,
        min_price: None,
        max_price: None,
    };
    let property = service
        .list(&everything)
        .await?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

    print!("{}", render::property_detail(&property));
    Ok(())
}

async fn create(service: &dyn PropertyService, form: &CreatePropertyForm) -> Result<()> {
    match create_property(service, form).await {
        Ok(created) => {
            println!("✅ Property created successfully.");
            print!("{}", render::property_detail(&created));
            Ok(())
        }
        Err(CatalogError::Validation(errors)) => {
            eprintln!("The property was not created:");
            eprint!("{}", render::validation_errors(&errors));
            anyhow::bail!("{} invalid field(s)", errors.len())
        }
        Err(err) => Err(err).context("Could not create the property"),
    }
}

async fn browse(service: Arc<dyn PropertyService>) -> Result<()> {
    let (mut session, initial) = BrowseSession::start(service, FILTER_DEBOUNCE);
    if let Some(handle) = initial {
        handle.await.context("Fetch task panicked")?;
    }
    print!("{}", render::page_view(&session.view()));
    println!("{}", BROWSE_HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(BrowseCommand::Edit(edit)) => session.edit(edit).await,
                    Ok(BrowseCommand::Page(page)) => {
                        if session.page().on_page_change(page) {
                            print!("{}", render::page_view(&session.view()));
                        } else {
                            println!("Page {} is not available", page);
                        }
                    }
                    Ok(BrowseCommand::Refetch) => {
                        if let Some(handle) = session.page().refetch() {
                            handle.await.context("Fetch task panicked")?;
                        }
                        print!("{}", render::page_view(&session.view()));
                    }
                    Ok(BrowseCommand::Show) => {
                        let form = session.form();
                        println!(
                            "filters: name='{}' address='{}' price={}..{}",
                            form.name, form.address, form.min_price, form.max_price
                        );
                        print!("{}", render::page_view(&session.view()));
                    }
                    Ok(BrowseCommand::Help) => println!("{}", BROWSE_HELP),
                    Ok(BrowseCommand::Quit) => break,
                    Err(message) => println!("{}", message),
                }
            }
            Some(query) = session.next_settled() => {
                if let Some(handle) = session.apply_settled(query) {
                    handle.await.context("Fetch task panicked")?;
                }
                print!("{}", render::page_view(&session.view()));
            }
        }
    }

    Ok(())
}
