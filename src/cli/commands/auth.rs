use clap::Subcommand;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::login;
use crate::cli::utils::output_success;
use crate::cli::{Console, OutputFormat};
use crate::session::{Navigator, Route};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in as an administrator")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Sign out and forget the stored token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, console: &mut Console, output_format: &OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => read_password().await?,
            };
            let credential = login(&console.client, &username, &password).await?;
            // land on the fleet list, like a fresh sign-in in the panel
            console.navigator.replace(Route::Cars.path());
            output_success(
                output_format,
                &format!("Signed in as {}", credential.display_name),
                Some(json!({ "display_name": credential.display_name })),
            )
        }
        AuthCommands::Logout => {
            console.client.session().logout(&mut console.navigator)?;
            output_success(output_format, "Signed out", Some(json!({ "route": console.current_route() })))
        }
        AuthCommands::Status => match console.session().credential()? {
            Some(credential) => output_success(
                output_format,
                &format!("Signed in as {}", credential.display_name),
                Some(json!({ "signed_in": true, "display_name": credential.display_name })),
            ),
            None => output_success(output_format, "Not signed in", Some(json!({ "signed_in": false }))),
        },
    }
}

async fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
