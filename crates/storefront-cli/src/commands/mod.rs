//! CLI command implementations.

mod auth;
mod reset;
mod route;

pub use auth::{login, logout, register, status};
pub use reset::{reset_confirm, reset_request};
pub use route::route_check;

use crate::output::{self, OutputFormat};
use anyhow::Result;
use std::sync::Arc;
use storefront_config::{Config, Paths};
use storefront_session::{Notifier, SessionContext, SessionManager, StorefrontClient};
use storefront_store::{CredentialStore, FileCookieJar};

/// Notifier that routes session notices through the CLI's output layer.
struct CliNotifier {
    format: OutputFormat,
}

impl Notifier for CliNotifier {
    fn acknowledge(&self, message: &str) {
        output::print_success(message, &self.format);
    }

    fn alert(&self, message: &str) {
        output::print_error(message, &self.format);
    }
}

/// Build the API client from on-disk config.
fn build_client() -> Result<StorefrontClient> {
    let paths = Paths::new()?;
    let config = Config::load(&paths)?;
    Ok(StorefrontClient::new(config.api_base()))
}

/// Build the session manager from on-disk config and cookie state.
fn build_manager(format: &OutputFormat) -> Result<SessionManager> {
    let paths = Paths::new()?;
    let config = Config::load(&paths)?;
    let jar = FileCookieJar::open(paths.cookie_file())?;
    let store = CredentialStore::new(Box::new(jar));
    let client = StorefrontClient::new(config.api_base());

    Ok(SessionManager::with_notifier(
        store,
        client,
        Arc::new(SessionContext::new()),
        Box::new(CliNotifier { format: *format }),
    ))
}

/// Read a line from stdin after printing a prompt.
fn prompt_line(prompt: &str) -> Result<String> {
    use std::io::{self, Write};

    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
