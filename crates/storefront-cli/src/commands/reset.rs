//! Password reset commands.

use super::build_client;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use storefront_session::ResetLink;

/// Ask the API to send a password-reset message.
pub async fn reset_request(email: &str, format: &OutputFormat) -> Result<()> {
    let client = build_client()?;

    match client.request_password_reset(email).await {
        Ok(()) => {
            output::print_success(&format!("Password reset message sent to {}", email), format);
        }
        Err(e) => {
            output::print_error(&e.detail(), format);
        }
    }

    Ok(())
}

/// Submit a new password for a reset link.
pub async fn reset_confirm(otp: &str, uidb64: &str, format: &OutputFormat) -> Result<()> {
    let link = match ResetLink::from_params(Some(otp), Some(uidb64)) {
        Ok(link) => link,
        Err(e) => {
            output::print_error(&e.detail(), format);
            return Ok(());
        }
    };

    let password = rpassword::prompt_password("New password: ")?;
    let password_confirm = rpassword::prompt_password("Confirm new password: ")?;

    if password.is_empty() {
        output::print_error("Password is required", format);
        return Ok(());
    }
    if password != password_confirm {
        output::print_error("Passwords do not match", format);
        return Ok(());
    }

    let client = build_client()?;
    match client.confirm_password_reset(&link, &password).await {
        Ok(()) => {
            output::print_success("Password changed, you can now log in", format);
        }
        Err(e) => {
            output::print_error(&e.detail(), format);
        }
    }

    Ok(())
}
