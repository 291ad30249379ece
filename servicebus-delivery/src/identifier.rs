//! Message and correlation identifiers

use std::fmt;

use uuid::Uuid;

use crate::Result;

/// A random (version 4) 128-bit identifier
///
/// Generated once per outbound message and used both as its message-id and correlation-id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(Uuid);

impl Identifier {
    /// Draws a new identifier from the OS entropy source
    ///
    /// Returns [`Error::GenerationFailed`](crate::Error::GenerationFailed) instead of a
    /// predictable value when no entropy is available.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; 16];
        getrandom::getrandom(&mut bytes)?;
        Ok(Self(uuid::Builder::from_random_bytes(bytes).into_uuid()))
    }

    /// Wraps raw bytes, e.g. a UUID read back from a received message
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Big-endian bytes of the identifier
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// The identifier as a [`Uuid`]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for Identifier {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<Identifier> for Uuid {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::Identifier;

    #[test]
    fn generated_identifiers_are_pairwise_distinct() {
        let ids: HashSet<Identifier> = (0..10_000)
            .map(|_| Identifier::generate().unwrap())
            .collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn generated_identifier_is_version_4() {
        let id = Identifier::generate().unwrap();
        assert_eq!(id.as_uuid().get_version_num(), 4);
        assert_eq!(id.as_uuid().get_variant(), uuid::Variant::RFC4122);
    }

    #[test]
    fn displays_lowercase_hyphenated() {
        let id = Identifier::from_bytes([
            0xde, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x42, 0x02, 0x83, 0x04, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ]);
        assert_eq!(id.to_string(), "deadbeef-0001-4202-8304-0a0b0c0d0e0f");
    }

    #[test]
    fn bytes_survive_conversion() {
        let id = Identifier::generate().unwrap();
        assert_eq!(Identifier::from_bytes(*id.as_bytes()), id);
    }
}
