//! Shareable ids
//!
//! User-facing stand-in for a raw aggregator account id. The encoding is
//! reversible so a shared id can be resolved back to its bank record.

/// Encode an account id for use in user-facing contexts
pub fn encrypt_id(id: &str) -> String {
    hex::encode(id.as_bytes())
}

/// Recover the account id behind a shareable id
pub fn decrypt_id(shareable_id: &str) -> Option<String> {
    let bytes = hex::decode(shareable_id).ok()?;
    String::from_utf8(bytes).ok()
}
