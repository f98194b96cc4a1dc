use crate::models::user::{ProfileUpdate, GENDERS};
use anyhow::{bail, Result};
use chrono::NaiveDate;

const MAX_USERNAME_LEN: usize = 150;
const MAX_NAME_LEN: usize = 150;
const MAX_INGREDIENT_NAME_LEN: usize = 200;
const MIN_PASSWORD_LEN: usize = 8;

/// Usernames: 1-150 chars of letters, digits and `@ . + - _`.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        bail!("Username is required");
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        bail!("Username must be at most {} characters", MAX_USERNAME_LEN);
    }
    if let Some(c) = username
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')))
    {
        bail!("Username contains invalid character '{}'", c);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => bail!("Invalid email address"),
    }
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        bail!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        );
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        bail!("Password cannot be entirely numeric");
    }
    Ok(())
}

/// Validate the fields present in a profile update. `today` bounds the birthday.
pub fn validate_profile(update: &ProfileUpdate, today: NaiveDate) -> Result<()> {
    for (field, value) in [
        ("first_name", &update.first_name),
        ("last_name", &update.last_name),
    ] {
        if let Some(v) = value {
            if v.chars().count() > MAX_NAME_LEN {
                bail!("{} must be at most {} characters", field, MAX_NAME_LEN);
            }
        }
    }

    for (field, value) in [
        ("target_weight", update.target_weight),
        ("current_weight", update.current_weight),
    ] {
        if let Some(w) = value {
            if !w.is_finite() || w <= 0.0 || w >= 1000.0 {
                bail!("{} must be between 0 and 1000", field);
            }
        }
    }

    if let Some(h) = update.height {
        if h <= 0 || h >= 300 {
            bail!("height must be between 0 and 300");
        }
    }

    if let Some(a) = update.weekly_physical_activity {
        if !(0..=7).contains(&a) {
            bail!("weekly_physical_activity must be between 0 and 7");
        }
    }

    if let Some(g) = &update.gender {
        if !GENDERS.contains(&g.as_str()) {
            bail!("gender must be one of M, F, O");
        }
    }

    if let Some(b) = update.birthday {
        if b > today {
            bail!("birthday cannot be in the future");
        }
    }

    Ok(())
}

/// Trim ingredient names, drop duplicates (first occurrence wins) and reject
/// empty or oversized names.
pub fn normalize_ingredient_names(names: &[String]) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for raw in names {
        let name = raw.trim();
        validate_ingredient_name(name)?;
        if !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    Ok(out)
}

pub fn validate_ingredient_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Ingredient name cannot be empty");
    }
    if name.chars().count() > MAX_INGREDIENT_NAME_LEN {
        bail!(
            "Ingredient name must be at most {} characters",
            MAX_INGREDIENT_NAME_LEN
        );
    }
    Ok(())
}

pub fn validate_calories(calories: i32) -> Result<()> {
    if calories < 0 {
        bail!("calories cannot be negative");
    }
    Ok(())
}

pub fn validate_recipe_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Recipe name is required");
    }
    Ok(())
}
