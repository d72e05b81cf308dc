// Validation utilities module
// Provides validation functions for domain-specific rules

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

/// Basic `local@domain.tld` shape: no whitespace, one `@`, a dot in the domain
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

/// Checks that an email address has the basic `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Validates that price is strictly positive
pub fn validate_positive_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("price_must_be_positive"))
    }
}

/// Validates that stock is not negative
pub fn validate_stock(stock: i64) -> Result<(), ValidationError> {
    if stock < 0 {
        Err(ValidationError::new("stock_must_not_be_negative"))
    } else {
        Ok(())
    }
}
