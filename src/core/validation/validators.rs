//! Custom field validators for use with `#[validate(custom(function = ...))]`

use crate::core::order::{AMOUNT_LIMIT, is_storable_amount};
use rust_decimal::Decimal;
use std::borrow::Cow;
use validator::ValidationError;

/// Decimal amounts (prices, totals) must not be negative
pub fn non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.message = Some(Cow::Borrowed("must not be negative"));
        error.add_param(Cow::Borrowed("value"), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Amounts must fit a NUMERIC(10,2) column
pub fn storable_amount(value: &Decimal) -> Result<(), ValidationError> {
    non_negative_amount(value)?;

    if !is_storable_amount(*value) {
        let mut error = ValidationError::new("amount_range");
        error.message = Some(Cow::Borrowed("must be less than 100000000"));
        error.add_param(Cow::Borrowed("limit"), &AMOUNT_LIMIT.to_string());
        return Err(error);
    }
    Ok(())
}
