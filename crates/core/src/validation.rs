//! Input validation utilities.
//!
//! The domain model assumes well-typed arguments. Front ends run raw user input through these
//! parsers first, so an empty or unparsable field is rejected before it reaches the registry.
//! Every parser has the `fn(&str) -> Result<T, E>` shape clap accepts as a value parser.

use crate::constants::{MAX_AMOUNT, MAX_PERCENTAGE};
use crate::{RegistryError, RegistryResult};

fn parse_number(input: &str, field: &str) -> RegistryResult<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::InvalidInput(format!("{} cannot be empty", field)));
    }

    let value: f64 = trimmed.parse().map_err(|_| {
        RegistryError::InvalidInput(format!("{} must be a number, got: '{}'", field, trimmed))
    })?;

    if !value.is_finite() {
        return Err(RegistryError::InvalidInput(format!(
            "{} must be a finite number",
            field
        )));
    }

    Ok(value)
}

/// Parses an admission probability, which must lie in `[0, 1]`.
pub fn admission_probability(input: &str) -> RegistryResult<f64> {
    let value = parse_number(input, "admission probability")?;
    if !(0.0..=1.0).contains(&value) {
        return Err(RegistryError::InvalidInput(format!(
            "admission probability must be between 0 and 1, got: {}",
            value
        )));
    }
    Ok(value)
}

/// Parses a fee or a procedure cost, which must lie in `[0, MAX_AMOUNT]`.
pub fn non_negative_amount(input: &str) -> RegistryResult<f64> {
    let value = parse_number(input, "amount")?;
    if value < 0.0 {
        return Err(RegistryError::InvalidInput(format!(
            "amount cannot be negative, got: {}",
            value
        )));
    }
    if value > MAX_AMOUNT {
        return Err(RegistryError::InvalidInput(format!(
            "amount cannot exceed {}, got: {}",
            MAX_AMOUNT, value
        )));
    }
    Ok(value)
}

/// Parses a gap percentage. Values above 100 are allowed up to `MAX_PERCENTAGE`; negative values
/// are not.
pub fn percentage(input: &str) -> RegistryResult<f64> {
    let value = parse_number(input, "percentage")?;
    if value < 0.0 {
        return Err(RegistryError::InvalidInput(format!(
            "percentage cannot be negative, got: {}",
            value
        )));
    }
    if value > MAX_PERCENTAGE {
        return Err(RegistryError::InvalidInput(format!(
            "percentage cannot exceed {}, got: {}",
            MAX_PERCENTAGE, value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: RegistryResult<f64>) -> String {
        match result {
            Err(RegistryError::InvalidInput(msg)) => msg,
            other => panic!("Expected InvalidInput error, got {:?}", other),
        }
    }

    #[test]
    fn test_admission_probability_accepts_bounds() {
        assert_eq!(admission_probability("0").unwrap(), 0.0);
        assert_eq!(admission_probability(" 0.55 ").unwrap(), 0.55);
        assert_eq!(admission_probability("1.0").unwrap(), 1.0);
    }

    #[test]
    fn test_admission_probability_rejects_out_of_range() {
        assert!(message(admission_probability("1.01")).contains("between 0 and 1"));
        assert!(message(admission_probability("-0.1")).contains("between 0 and 1"));
    }

    #[test]
    fn test_rejects_empty_and_unparsable() {
        assert!(message(non_negative_amount("   ")).contains("cannot be empty"));
        assert!(message(non_negative_amount("fifty")).contains("must be a number"));
        assert!(message(percentage("NaN")).contains("finite"));
        assert!(message(admission_probability("inf")).contains("finite"));
    }

    #[test]
    fn test_amounts_must_not_be_negative() {
        assert_eq!(non_negative_amount("0").unwrap(), 0.0);
        assert_eq!(non_negative_amount("1500").unwrap(), 1500.0);
        assert!(message(non_negative_amount("-5")).contains("negative"));
    }

    #[test]
    fn test_percentage_allows_large_values() {
        assert_eq!(percentage("150").unwrap(), 150.0);
        assert!(message(percentage("-1")).contains("negative"));
    }

    #[test]
    fn test_rejects_values_that_could_overflow_balances() {
        assert!(message(non_negative_amount("1e308")).contains("cannot exceed"));
        assert_eq!(non_negative_amount("1e12").unwrap(), MAX_AMOUNT);
        assert!(message(percentage("1e300")).contains("cannot exceed"));
    }
}
