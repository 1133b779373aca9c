//! Node and connection identifiers.
//!
//! Ids are arbitrary strings in save files. Editor-made ids look like
//! `node-k3` or `conn-1f`: a kind prefix, a dash, and a process-wide
//! sequence number in lowercase base36 (`0-9` then `a-z`). Base36 keeps
//! them short in saved JSON while staying readable in logs.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static NAMES: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);
static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Interned id. Equality and hashing compare the 4-byte key, never the
/// text, so ids are free to copy into selections and snapshots.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(Spur);

impl Id {
    pub fn intern(name: &str) -> Self {
        Id(NAMES.get_or_intern(name))
    }

    pub fn as_str(&self) -> &str {
        NAMES.resolve(&self.0)
    }

    /// Next editor-made id for `prefix`, e.g. `node-1a`.
    ///
    /// The sequence only guarantees uniqueness within this process. A
    /// loaded file may already hold `node-1a`; `Document::fresh_id`
    /// skips over such collisions.
    pub fn with_prefix(prefix: &str) -> Self {
        let seq = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}-{}", base36(seq)))
    }
}

/// Lowercase base36, most significant digit first.
fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    // u64::MAX needs 13 base36 digits.
    let mut buf = [0u8; 13];
    let mut at = buf.len();
    loop {
        at -= 1;
        buf[at] = DIGITS[(n % 36) as usize];
        n /= 36;
        if n == 0 {
            break;
        }
    }
    String::from_utf8_lossy(&buf[at..]).into_owned()
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.as_str())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Saved as the bare string.
impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Ok(Id::intern(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = Id::intern("node-a");
        let b = Id::intern("node-a");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "node-a");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = Id::with_prefix("node");
        let b = Id::with_prefix("node");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("node-"));
    }

    #[test]
    fn base36_digits() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(36 * 36 + 35), "10z");
        assert_eq!(base36(u64::MAX), "3w5e11264sgsf");
    }
}
