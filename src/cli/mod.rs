pub mod commands;
pub mod input;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::{config, AppConfig};
use crate::error::ClientError;
use crate::grid::PageSize;
use crate::resources::{Administrator, Car, Customer, Model, Rental};
use crate::session::{Credential, FileCredentialStore, GateDecision, Navigator, Route, RouteHistory, Session};

#[derive(Parser)]
#[command(name = "rental-admin")]
#[command(about = "Rental Admin - terminal administration console for the car-rental backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in, sign out and session status")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Customer accounts")]
    Customers {
        #[command(subcommand)]
        cmd: commands::resource::ResourceCommands,
    },

    #[command(about = "Cars in the fleet")]
    Cars {
        #[command(subcommand)]
        cmd: commands::resource::ResourceCommands,
    },

    #[command(about = "Car models and their daily rates")]
    Models {
        #[command(subcommand)]
        cmd: commands::resource::ResourceCommands,
    },

    #[command(about = "Administrator accounts")]
    Administrators {
        #[command(subcommand)]
        cmd: commands::resource::ResourceCommands,
    },

    #[command(about = "Rentals")]
    Rentals {
        #[command(subcommand)]
        cmd: commands::resource::ResourceCommands,
    },

    #[command(about = "Car brands used by models")]
    Brands {
        #[command(subcommand)]
        cmd: commands::catalog::BrandCommands,
    },

    #[command(name = "fuel-types", about = "Fuel types used by models")]
    FuelTypes {
        #[command(subcommand)]
        cmd: commands::catalog::FuelTypeCommands,
    },

    #[command(about = "Car images")]
    Images {
        #[command(subcommand)]
        cmd: commands::catalog::ImageCommands,
    },

    #[command(about = "Interactive paged browser over one collection")]
    Browse {
        #[arg(default_value = "cars", help = "Route to open (customers, cars, models, administrators, rentals)")]
        route: String,
        #[arg(long, help = "Rows per page (10, 25, 50, 100)")]
        size: Option<usize>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs: the authenticated client, the route history
/// and the default page size.
pub struct Console {
    pub client: ApiClient,
    pub navigator: RouteHistory,
    pub page_size: PageSize,
}

impl Console {
    pub fn new(client: ApiClient, page_size: PageSize) -> Self {
        Self {
            client,
            navigator: RouteHistory::new(),
            page_size,
        }
    }

    /// Credentials persist in `<config dir>/credentials.json`
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store = FileCredentialStore::in_dir(config.config_dir()?);
        let session = Session::new(Arc::new(store));
        let client = ApiClient::from_config(config, session)?;
        Ok(Self::new(client, config.grid.default_page_size))
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    /// Navigate to a protected route through the session gate
    pub fn enter(&mut self, route: Route) -> Result<Credential, ClientError> {
        let gate = self.client.session().gate();
        match gate.enter(&mut self.navigator, route.path())? {
            GateDecision::Allow(credential) => Ok(credential),
            GateDecision::Deny => Err(ClientError::NotAuthenticated),
        }
    }

    /// Re-check the current route
    pub fn recheck(&mut self) -> Result<GateDecision, ClientError> {
        let gate = self.client.session().gate();
        gate.evaluate(&mut self.navigator)
    }

    pub fn current_route(&self) -> &str {
        self.navigator.current()
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let mut console = Console::from_config(config())?;

    let result = match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &mut console, &output_format).await,
        Commands::Customers { cmd } => commands::resource::handle::<Customer>(cmd, &mut console, &output_format).await,
        Commands::Cars { cmd } => commands::resource::handle::<Car>(cmd, &mut console, &output_format).await,
        Commands::Models { cmd } => commands::resource::handle::<Model>(cmd, &mut console, &output_format).await,
        Commands::Administrators { cmd } => {
            commands::resource::handle::<Administrator>(cmd, &mut console, &output_format).await
        }
        Commands::Rentals { cmd } => commands::resource::handle::<Rental>(cmd, &mut console, &output_format).await,
        Commands::Brands { cmd } => commands::catalog::handle_brands(cmd, &mut console, &output_format).await,
        Commands::FuelTypes { cmd } => commands::catalog::handle_fuel_types(cmd, &mut console, &output_format).await,
        Commands::Images { cmd } => commands::catalog::handle_images(cmd, &mut console, &output_format).await,
        Commands::Browse { route, size } => {
            let route: Route = route.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            if let Some(n) = size {
                console.page_size = PageSize::try_from(n)?;
            }
            let mut stdout = std::io::stdout();
            if std::io::stdin().is_terminal() {
                let history = config().config_dir().ok().map(|dir| dir.join("history.txt"));
                let lines = input::EditorLines::new(history)?;
                commands::browse::run_browse(&mut console, route, lines, &mut stdout).await
            } else {
                let lines = input::StreamLines::new(tokio::io::BufReader::new(tokio::io::stdin()));
                commands::browse::run_browse(&mut console, route, lines, &mut stdout).await
            }
        }
    };

    // JSON callers get a structured error; text callers get it from main
    if let (Err(e), OutputFormat::Json) = (&result, &output_format) {
        let code = e.downcast_ref::<ClientError>().map(ClientError::error_code);
        utils::output_error(&output_format, &e.to_string(), code)?;
        std::process::exit(1);
    }
    result
}
