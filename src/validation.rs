//! Checks run on form input before anything is sent to the auth service.
//!
//! Each function returns the message to show the user on failure.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub fn email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Please enter your email address".to_string());
    }
    if !EMAIL_RE.is_match(email) {
        return Err("Please enter a valid email address".to_string());
    }
    Ok(())
}

pub fn password_length(password: &str, min: usize) -> Result<(), String> {
    if password.chars().count() < min {
        return Err(format!("Password must be at least {min} characters"));
    }
    Ok(())
}

pub fn passwords_match(password: &str, confirmation: &str) -> Result<(), String> {
    if password != confirmation {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

pub fn sign_in(email_addr: &str, password: &str) -> Result<(), String> {
    email(email_addr)?;
    if password.is_empty() {
        return Err("Please enter your password".to_string());
    }
    Ok(())
}

pub fn registration(
    name: &str,
    email_addr: &str,
    password: &str,
    confirmation: &str,
    min: usize,
) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Please enter your name".to_string());
    }
    email(email_addr)?;
    passwords_match(password, confirmation)?;
    password_length(password, min)
}

pub fn password_reset(
    token: &str,
    password: &str,
    confirmation: &str,
    min: usize,
) -> Result<(), String> {
    if token.trim().is_empty() {
        return Err("Invalid reset token".to_string());
    }
    if password.is_empty() {
        return Err("Please enter your new password".to_string());
    }
    password_length(password, min)?;
    passwords_match(password, confirmation)
}

pub fn profile_update(name: &str, image: &str) -> Result<(), String> {
    if name.trim().is_empty() && image.trim().is_empty() {
        return Err("Please enter a name or image".to_string());
    }
    Ok(())
}

pub fn password_change(current: &str, new: &str, min: usize) -> Result<(), String> {
    if current.is_empty() {
        return Err("Please enter your current password".to_string());
    }
    password_length(new, min)
}

/// Display name derived for magic-link sign-ups: the email's local part.
pub fn local_part(email: &str) -> &str {
    email.trim().split('@').next().unwrap_or_default()
}
