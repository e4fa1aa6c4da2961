//! Document id helpers
//!
//! Every id-shaped value in the system is a 24-character hex token:
//! a 4-byte unix timestamp followed by 8 random bytes. The timestamp
//! prefix keeps freshly created records roughly insertion-ordered;
//! the random tail needs no coordination between writers.
//!
//! Ids must be validated with [`is_valid`] before being used in any
//! store lookup.

use chrono::Utc;

/// Length of a document id in hex characters.
pub const ID_LEN: usize = 24;

/// Generate a new document id.
pub fn generate() -> String {
    let secs = Utc::now().timestamp() as u32;
    let tail: [u8; 8] = rand::random();

    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&secs.to_be_bytes());
    bytes[4..].copy_from_slice(&tail);
    hex::encode(bytes)
}

/// Check that a string is a well-formed document id.
pub fn is_valid(id: &str) -> bool {
    id.len() == ID_LEN && hex::decode(id).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_valid() {
        let id = generate();
        assert_eq!(id.len(), ID_LEN);
        assert!(is_valid(&id));
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(generate(), generate());
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(!is_valid(""));
        assert!(!is_valid("bad-id"));
        assert!(!is_valid("0123456789abcdef0123456")); // 23 chars
        assert!(!is_valid("0123456789abcdef012345678")); // 25 chars
        assert!(!is_valid("0123456789abcdef0123456g")); // non-hex
    }

    #[test]
    fn accepts_uppercase_hex() {
        assert!(is_valid("0123456789ABCDEF01234567"));
    }
}
