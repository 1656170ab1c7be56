use anyhow::{anyhow, bail};
use clap::Subcommand;
use serde_json::json;
use tokio::io::AsyncReadExt;

use crate::cli::utils::{output_notification, output_success};
use crate::cli::{Console, OutputFormat};
use crate::grid::{render_grid, FetchOutcome, PageSize};
use crate::resources::{Resource, Screen};

#[derive(Subcommand)]
pub enum ResourceCommands {
    #[command(about = "List one page of records")]
    List {
        #[arg(long, default_value_t = 1, help = "Page number, starting at 1")]
        page: usize,
        #[arg(long, help = "Rows per page (10, 25, 50, 100)")]
        size: Option<usize>,
        #[arg(long, help = "Server-side filter text")]
        filter: Option<String>,
    },

    #[command(about = "Show one record")]
    Show {
        #[arg(help = "Record ID")]
        id: String,
    },

    #[command(about = "Create a record from JSON on stdin")]
    Create,

    #[command(about = "Update a record from JSON on stdin")]
    Update {
        #[arg(help = "Record ID")]
        id: String,
    },

    #[command(about = "Delete (or cancel) a record")]
    Delete {
        #[arg(help = "Record ID")]
        id: String,
    },
}

pub async fn handle<R: Resource>(
    cmd: ResourceCommands,
    console: &mut Console,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    console
        .enter(R::ROUTE)
        .map_err(|_| anyhow!("Not signed in. Run 'rental-admin auth login <username>' first."))?;

    let collection = R::PATH.trim_start_matches('/');
    let mut screen = Screen::<R>::new(console.client.clone(), console.page_size);

    match cmd {
        ResourceCommands::List { page, size, filter } => {
            let outcome = load_listing(&mut screen, page, size, filter).await?;
            let grid = screen.grid_mut();
            if outcome == FetchOutcome::Failed {
                let reason = grid.state().last_error().unwrap_or("unknown error").to_string();
                bail!("Could not load {}: {}", collection, reason);
            }

            let state = grid.state();
            match output_format {
                OutputFormat::Json => output_success(
                    output_format,
                    &format!("Loaded {}", collection),
                    Some(json!({
                        "content": serde_json::to_value(state.items())?,
                        "page": {
                            "number": state.page_index() + 1,
                            "size": state.page_size().get(),
                            "totalPages": state.total_pages(),
                        },
                        "filter": state.filter_text(),
                    })),
                ),
                OutputFormat::Text => {
                    println!("{}", render_grid(grid));
                    Ok(())
                }
            }
        }
        ResourceCommands::Show { id } => {
            let record = screen.details(&id).await?;
            match output_format {
                OutputFormat::Json => output_success(
                    output_format,
                    &format!("{} {}", R::SINGULAR, id),
                    Some(json!({ "record": serde_json::to_value(&record)? })),
                ),
                OutputFormat::Text => {
                    for column in R::columns() {
                        println!("{:<16} {}", format!("{}:", column.label), column.cell(&record));
                    }
                    Ok(())
                }
            }
        }
        ResourceCommands::Create => {
            if !R::SUPPORTS_CREATE {
                bail!("{} records cannot be created here.", R::SINGULAR);
            }
            let draft: R::Create = serde_json::from_str(&read_stdin().await?)?;
            let notification = screen.create(&draft).await;
            output_notification(output_format, &notification)
        }
        ResourceCommands::Update { id } => {
            if !R::SUPPORTS_UPDATE {
                bail!("{} records cannot be edited here.", R::SINGULAR);
            }
            let draft: R::Update = serde_json::from_str(&read_stdin().await?)?;
            let notification = screen.update(&id, &draft).await;
            output_notification(output_format, &notification)
        }
        ResourceCommands::Delete { id } => {
            let notification = screen.delete(&id).await;
            output_notification(output_format, &notification)
        }
    }
}

/// Load the 1-based `page` of a listing. Size and filter are set before
/// the first request, so page 1 costs one fetch and any later page two.
pub async fn load_listing<R: Resource>(
    screen: &mut Screen<R>,
    page: usize,
    size: Option<usize>,
    filter: Option<String>,
) -> anyhow::Result<FetchOutcome> {
    if page == 0 {
        bail!("Page numbers start at 1");
    }
    let grid = screen.grid_mut();
    let page_size = match size {
        Some(n) => PageSize::try_from(n)?,
        None => grid.state().page_size(),
    };
    grid.preset(page_size, filter.unwrap_or_default());

    let mut outcome = grid.load().await;
    if outcome == FetchOutcome::Applied && page > 1 {
        outcome = grid.set_page_index(page - 1).await?;
    }
    Ok(outcome)
}

async fn read_stdin() -> anyhow::Result<String> {
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    Ok(input)
}
