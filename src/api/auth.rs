use reqwest::header::SET_COOKIE;
use serde::Deserialize;
use tracing::{info, warn};

use super::{is_no_content, ApiClient};
use crate::error::ClientError;
use crate::session::Credential;

const MIN_USERNAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 5;

#[derive(Debug, Deserialize)]
struct TokenBody {
    token: String,
}

pub fn validate_login(username: &str, password: &str) -> Result<(), ClientError> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ClientError::Validation(format!(
            "Username must be at least {} characters.",
            MIN_USERNAME_LEN
        )));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::Validation(format!(
            "Password must be at least {} characters.",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// `PUT /session` with basic credentials; on success the credential record is written
pub async fn login(client: &ApiClient, username: &str, password: &str) -> Result<Credential, ClientError> {
    validate_login(username, password)?;

    let url = client.root_url("/session")?;
    let response = client
        .http()
        .put(url)
        .basic_auth(username, Some(password))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        warn!("Login for '{}' rejected with {}", username, status);
        return Err(match status.as_u16() {
            401 => ClientError::Unauthorized("Invalid credentials. Please try again.".to_string()),
            500 => ClientError::Status {
                status: 500,
                body: "Internal server error. Please try again.".to_string(),
            },
            code => ClientError::Status {
                status: code,
                body: "An unexpected error occurred. Please try again.".to_string(),
            },
        });
    }

    let cookie_token = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| cookie_value(cookie, client.token_cookie()));

    let token = match cookie_token {
        Some(token) => token,
        None if is_no_content(status) => {
            return Err(ClientError::Decode("login succeeded but no session token was issued".to_string()))
        }
        None => response.json::<TokenBody>().await?.token,
    };

    let credential = Credential::new(token, username);
    client.session().sign_in(&credential)?;
    info!("Administrator '{}' logged in", username);
    Ok(credential)
}

/// Value of cookie `name` in one `Set-Cookie` header
fn cookie_value(header: &str, name: &str) -> Option<String> {
    let pair = header.split(';').next()?;
    let (key, value) = pair.split_once('=')?;
    if key.trim() == name && !value.trim().is_empty() {
        Some(value.trim().to_string())
    } else {
        None
    }
}
