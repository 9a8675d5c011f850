//! Merchant-side reference ids for authorizations and captures

use uuid::Uuid;

/// Longest reference id MWS accepts
pub const MAX_REFERENCE_LEN: usize = 32;

/// Prefix for authorization reference ids
pub const AUTHORIZATION_PREFIX: char = 'A';

/// Prefix for capture reference ids
pub const CAPTURE_PREFIX: char = 'C';

/// Random reference id: the prefix followed by 31 lowercase hex digits of a
/// v4 UUID.
pub fn reference_id(prefix: char) -> String {
    let mut id = String::with_capacity(MAX_REFERENCE_LEN);
    id.push(prefix);
    id.extend(
        Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(MAX_REFERENCE_LEN - prefix.len_utf8()),
    );
    id
}

/// Reference id for an `Authorize` call
pub fn authorization_reference() -> String {
    reference_id(AUTHORIZATION_PREFIX)
}

/// Reference id for a `Capture` call
pub fn capture_reference() -> String {
    reference_id(CAPTURE_PREFIX)
}
