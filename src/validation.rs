// Validation utilities module
// Provides custom validation functions for domain-specific rules

use validator::ValidationError;

/// Validates that a payment method is one of the accepted values
/// Valid values: "cash", "card", "upi", "wallet" (case-insensitive)
pub fn validate_payment_method(method: &str) -> Result<(), ValidationError> {
    let valid_methods = ["cash", "card", "upi", "wallet"];
    if valid_methods.contains(&method.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_payment_method"))
    }
}

/// Validates that a search radius is positive and within the supported range
pub fn validate_radius_km(radius: f64) -> Result<(), ValidationError> {
    if radius.is_finite() && radius > 0.0 && radius <= 100.0 {
        Ok(())
    } else {
        Err(ValidationError::new("radius_out_of_range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_methods() {
        assert!(validate_payment_method("cash").is_ok());
        assert!(validate_payment_method("Card").is_ok());
        assert!(validate_payment_method("UPI").is_ok());
        assert!(validate_payment_method("cheque").is_err());
        assert!(validate_payment_method("").is_err());
    }

    #[test]
    fn test_radius_bounds() {
        assert!(validate_radius_km(0.5).is_ok());
        assert!(validate_radius_km(100.0).is_ok());
        assert!(validate_radius_km(0.0).is_err());
        assert!(validate_radius_km(-3.0).is_err());
        assert!(validate_radius_km(101.0).is_err());
        assert!(validate_radius_km(f64::NAN).is_err());
    }
}
