// src/common/validation.rs

//! Validadores customizados usados nos payloads (`#[validate(custom(...))]`).

use rust_decimal::Decimal;
use validator::ValidationError;

pub fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_strictly_positive_values() {
        assert!(validate_positive(&Decimal::ONE).is_ok());
        assert!(validate_positive(&Decimal::new(1, 2)).is_ok());

        let err = validate_positive(&Decimal::ZERO).unwrap_err();
        assert_eq!(err.code, "range");
        assert!(validate_positive(&Decimal::NEGATIVE_ONE).is_err());
    }
}
