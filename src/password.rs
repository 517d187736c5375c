// Hotspot password handling

//! Password acquisition and validation.
//!
//! Validation is a pure function so the enable flow can be exercised
//! without a terminal; acquisition wraps it with hidden interactive
//! input. A programmatically supplied password that is too short fails
//! outright instead of re-prompting.

use crate::error::HotspotError;

/// Minimum hotspot password length, per WPA2-PSK.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Whether a candidate password meets the minimum length. Counted in
/// characters, not bytes.
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Obtain the hotspot password.
///
/// A supplied password is validated once and rejected if too short. With
/// none supplied, an interactive session re-prompts with hidden input
/// until the minimum length is met; a non-interactive session fails.
pub fn obtain_password(
    supplied: Option<String>,
    interactive: bool,
) -> Result<String, HotspotError> {
    if let Some(password) = supplied {
        if validate_password(&password) {
            return Ok(password);
        }
        return Err(HotspotError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    if !interactive {
        return Err(HotspotError::PasswordRequired);
    }
    loop {
        let password = rpassword::prompt_password("Enter hotspot password (min 8 chars): ")?;
        if validate_password(&password) {
            return Ok(password);
        }
        eprintln!("Password must be at least {MIN_PASSWORD_LEN} characters.");
    }
}
