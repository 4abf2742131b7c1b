//! Cache key derivation
//!
//! A key is the SHA-256 of the file path, modification time, theme id and
//! language id. Each field is length-prefixed so no choice of path can make
//! two different inputs encode to the same bytes.

use std::fmt;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use crate::syntax::LanguageId;

/// Length of the hex encoding used for on-disk file names
pub const KEY_HEX_LEN: usize = 64;

/// Versioned domain tag mixed into every key
const KEY_DOMAIN: &[u8] = b"glance/highlight-key/1";

/// Identity of one highlight: same inputs, same key
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    pub fn derive(
        path: &Path,
        modified: SystemTime,
        theme_id: &str,
        language: LanguageId,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(KEY_DOMAIN);
        update_field(&mut hasher, path.as_os_str().as_encoded_bytes());
        update_field(&mut hasher, &mtime_nanos(modified).to_le_bytes());
        update_field(&mut hasher, theme_id.as_bytes());
        update_field(&mut hasher, language.as_str().as_bytes());
        Self(hasher.finalize().into())
    }

    /// Lowercase hex, the form used as a disk file name
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Parse a file name back into a key, rejecting anything that is not
    /// exactly 64 lowercase hex digits
    pub fn from_hex(name: &str) -> Option<Self> {
        if !is_valid_name(name) {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&name[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(bytes))
    }
}

/// Whether `name` has the exact shape of an encoded key
pub fn is_valid_name(name: &str) -> bool {
    name.len() == KEY_HEX_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

/// Signed nanoseconds relative to the Unix epoch
fn mtime_nanos(modified: SystemTime) -> i128 {
    match modified.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_nanos() as i128,
        Err(e) => -(e.duration().as_nanos() as i128),
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({}…)", &self.to_hex()[..12])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_deterministic() {
        let a = CacheKey::derive(Path::new("/a/b.rs"), at(100), "dark", LanguageId::Rust);
        let b = CacheKey::derive(Path::new("/a/b.rs"), at(100), "dark", LanguageId::Rust);
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), b.to_hex());
    }

    #[test]
    fn test_each_field_changes_key() {
        let base = CacheKey::derive(Path::new("/a/b.rs"), at(100), "dark", LanguageId::Rust);
        assert_ne!(
            base,
            CacheKey::derive(Path::new("/a/c.rs"), at(100), "dark", LanguageId::Rust)
        );
        assert_ne!(
            base,
            CacheKey::derive(Path::new("/a/b.rs"), at(101), "dark", LanguageId::Rust)
        );
        assert_ne!(
            base,
            CacheKey::derive(Path::new("/a/b.rs"), at(100), "light", LanguageId::Rust)
        );
        assert_ne!(
            base,
            CacheKey::derive(Path::new("/a/b.rs"), at(100), "dark", LanguageId::C)
        );
        // Sub-second changes count too
        assert_ne!(
            base,
            CacheKey::derive(
                Path::new("/a/b.rs"),
                at(100) + Duration::from_nanos(1),
                "dark",
                LanguageId::Rust
            )
        );
    }

    #[test]
    fn test_field_boundaries_are_unambiguous() {
        let a = CacheKey::derive(Path::new("/x/dar"), at(1), "kjson", LanguageId::Json);
        let b = CacheKey::derive(Path::new("/x/dark"), at(1), "json", LanguageId::Json);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_round_trip_and_validation() {
        let key = CacheKey::derive(Path::new("/f"), at(5), "dark", LanguageId::Yaml);
        let hex = key.to_hex();
        assert_eq!(hex.len(), KEY_HEX_LEN);
        assert!(is_valid_name(&hex));
        assert_eq!(CacheKey::from_hex(&hex), Some(key));

        assert!(!is_valid_name(&hex.to_uppercase()));
        assert!(!is_valid_name(&hex[..63]));
        assert!(!is_valid_name("../../../../etc/passwd"));
        assert!(!is_valid_name(&format!("{}.tmp", &hex[..60])));
        assert_eq!(CacheKey::from_hex("zz"), None);
    }

    #[test]
    fn test_pre_epoch_mtime() {
        let before = UNIX_EPOCH - Duration::from_secs(10);
        let after = UNIX_EPOCH + Duration::from_secs(10);
        assert_ne!(
            CacheKey::derive(Path::new("/f"), before, "dark", LanguageId::Rust),
            CacheKey::derive(Path::new("/f"), after, "dark", LanguageId::Rust)
        );
    }
}
