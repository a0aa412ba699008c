//! Core business logic - framework-agnostic catalog, order, payment and reporting
//! operations. Every function takes a `SeaORM` connection and returns
//! [`crate::errors::Result`].

use crate::errors::{Error, Result};

pub mod category;
pub mod menu;
pub mod money;
pub mod order;
pub mod order_item;
pub mod payment;
pub mod product;
pub mod report;
pub mod seed;
pub mod user;

/// Maximum length of names, sizes and other short catalog labels.
pub const MAX_NAME_LEN: usize = 100;

/// Trims a name and checks it is non-empty and at most [`MAX_NAME_LEN`] characters.
pub(crate) fn clean_name(name: &str, what: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Config {
            message: format!("{what} cannot be empty"),
        });
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(Error::Config {
            message: format!("{what} cannot be longer than {MAX_NAME_LEN} characters"),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  Burgers ", "Category name").unwrap(), "Burgers");
        assert!(matches!(
            clean_name("   ", "Category name").unwrap_err(),
            Error::Config { message: _ }
        ));
        assert!(clean_name(&"x".repeat(MAX_NAME_LEN), "Name").is_ok());
        assert!(clean_name(&"x".repeat(MAX_NAME_LEN + 1), "Name").is_err());
    }
}
