use crate::error::{Error, Result};

/// Endpoint keys join the parent row to every child table and appear in
/// URLs; keep them short and unambiguous.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::BadRequest("Endpoint key cannot be empty".to_string()));
    }

    if key.len() > 128 {
        return Err(Error::BadRequest(
            "Endpoint key cannot exceed 128 characters".to_string(),
        ));
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(Error::BadRequest(
            "Endpoint key may only contain letters, digits, '-', '_' and '.'".to_string(),
        ));
    }

    Ok(())
}
