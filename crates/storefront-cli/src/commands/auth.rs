//! Authentication commands.

use super::{build_manager, prompt_line};
use crate::output::{self, OutputFormat};
use anyhow::Result;

/// Login with email and password.
pub async fn login(format: &OutputFormat) -> Result<()> {
    let manager = build_manager(format)?;

    let email = prompt_line("Email: ")?;
    if email.is_empty() {
        output::print_error("Email is required", format);
        return Ok(());
    }

    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        output::print_error("Password is required", format);
        return Ok(());
    }

    println!("Logging in...");

    // Success and failure messages come through the manager's notifier.
    let _ = manager.login(&email, &password).await;

    Ok(())
}

/// Create an account, then log in with the same credentials.
pub async fn register(format: &OutputFormat) -> Result<()> {
    let manager = build_manager(format)?;

    let full_name = prompt_line("Full name: ")?;
    let email = prompt_line("Email: ")?;
    let phone = prompt_line("Phone: ")?;

    if full_name.is_empty() || email.is_empty() {
        output::print_error("Full name and email are required", format);
        return Ok(());
    }

    let password = rpassword::prompt_password("Password: ")?;
    let password_confirm = rpassword::prompt_password("Confirm password: ")?;

    if password.is_empty() {
        output::print_error("Password is required", format);
        return Ok(());
    }
    if password != password_confirm {
        output::print_error("Passwords do not match", format);
        return Ok(());
    }

    println!("Creating account...");

    let _ = manager
        .register(&full_name, &email, &phone, &password, &password_confirm)
        .await;

    Ok(())
}

/// Logout and clear the stored credential pair.
pub async fn logout(format: &OutputFormat) -> Result<()> {
    let manager = build_manager(format)?;
    manager.logout()?;
    Ok(())
}

/// Show session status, restoring it from stored cookies first.
pub async fn status(format: &OutputFormat) -> Result<()> {
    let manager = build_manager(format)?;

    // A failed restore (expired pair, failed refresh) leaves the session
    // cleared, which the status output below reports as logged out.
    let _ = manager.restore_session().await;

    let identity = manager.context().identity();
    match format {
        OutputFormat::Text => match identity {
            Some(identity) => {
                output::print_row("Auth", "logged in");
                output::print_row("User", &identity.username);
                output::print_row("User ID", &identity.user_id.to_string());
            }
            None => {
                output::print_row("Auth", "not logged in");
            }
        },
        OutputFormat::Json => {
            let json = serde_json::json!({
                "logged_in": identity.is_some(),
                "username": identity.as_ref().map(|i| i.username.clone()),
                "user_id": identity.as_ref().map(|i| i.user_id),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
