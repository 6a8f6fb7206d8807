use uuid::Uuid;

const KEY_LEN: usize = 12;

/// Returns a fresh opaque key for a block, span or mark definition.
///
/// Keys only need to be unique within one document; they are not stable
/// across encodes.
pub fn new_key() -> String {
    let mut key = Uuid::new_v4().simple().to_string();
    key.truncate(KEY_LEN);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_short_hex() {
        let key = new_key();
        assert_eq!(key.len(), KEY_LEN);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn keys_differ() {
        assert_ne!(new_key(), new_key());
    }
}
