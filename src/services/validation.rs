use crate::{
    constants::{ADDRESS_MAX_HEX_LEN, ADDRESS_MIN_HEX_LEN, TX_HASH_MAX_HEX_LEN},
    error::{AppError, Result},
};

/// Returns the trimmed address when it is `0x` + 63-64 hex digits.
pub fn validate_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Address is required"));
    }
    if !is_hex_with_prefix(trimmed, ADDRESS_MIN_HEX_LEN, ADDRESS_MAX_HEX_LEN) {
        return Err(AppError::validation("Invalid Starknet address format"));
    }
    Ok(trimmed.to_string())
}

pub fn validate_tx_hash(tx_hash: &str) -> Result<String> {
    let trimmed = tx_hash.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Transaction hash is required"));
    }
    if !is_hex_with_prefix(trimmed, 1, TX_HASH_MAX_HEX_LEN) {
        return Err(AppError::validation("Invalid transaction hash format"));
    }
    Ok(trimmed.to_string())
}

/// `label` names the entity in the message, e.g. "Tank ID must be a positive integer".
pub fn validate_id(id: i64, label: &str) -> Result<i64> {
    if id <= 0 {
        return Err(AppError::validation(format!(
            "{} ID must be a positive integer",
            label
        )));
    }
    Ok(id)
}

fn is_hex_with_prefix(value: &str, min_digits: usize, max_digits: usize) -> bool {
    let Some(digits) = value.strip_prefix("0x") else {
        return false;
    };
    (min_digits..=max_digits).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_hexdigit())
}
