//! Encoding of shared-access keys for use inside a connection URI

use std::borrow::Cow;

/// Percent-encodes the characters of the base64 alphabet that are unsafe in a URI
///
/// Only `/`, `+` and `=` are escapes (`%2F`, `%2B` and `%3D`); every other character, including
/// `%` itself, is copied unchanged, which is narrower than general URL encoding.
/// The input is borrowed back when there is nothing to escape.
pub fn encode_key(key: &str) -> Cow<'_, str> {
    if !key.contains(['/', '+', '=']) {
        return Cow::Borrowed(key);
    }

    let mut encoded = String::with_capacity(key.len() + 2 * key.len() / 3);
    for c in key.chars() {
        match c {
            '/' => encoded.push_str("%2F"),
            '+' => encoded.push_str("%2B"),
            '=' => encoded.push_str("%3D"),
            _ => encoded.push(c),
        }
    }
    Cow::Owned(encoded)
}

/// Whether the transport expects the key percent-encoded in the connection URI
///
/// This is a property of the transport adapter and has no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEncoding {
    /// The key goes through [`encode_key`] before being embedded
    PercentEncoded,

    /// The key is embedded verbatim
    Raw,
}

impl KeyEncoding {
    /// Applies the encoding to a key
    pub fn apply<'a>(&self, key: &'a str) -> Cow<'a, str> {
        match self {
            KeyEncoding::PercentEncoded => encode_key(key),
            KeyEncoding::Raw => Cow::Borrowed(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use base64::{engine::general_purpose::STANDARD, Engine};
    use rand::{Rng, RngCore};

    use super::{encode_key, KeyEncoding};

    fn decode_key(encoded: &str) -> String {
        encoded
            .replace("%2F", "/")
            .replace("%2B", "+")
            .replace("%3D", "=")
    }

    fn random_keys() -> impl Iterator<Item = String> {
        let mut rng = rand::thread_rng();
        (0..1_000).map(move |_| {
            let mut bytes = vec![0u8; rng.gen_range(1..=64)];
            rng.fill_bytes(&mut bytes);
            STANDARD.encode(bytes)
        })
    }

    #[test]
    fn escapes_exactly_the_unsafe_characters() {
        assert_eq!(encode_key("abc+d/e=f"), "abc%2Bd%2Fe%3Df");
        assert_eq!(encode_key("a+b c%d"), "a%2Bb c%d");
    }

    #[test]
    fn borrows_when_nothing_to_escape() {
        let key = "AbCdEf0123456789";
        assert!(matches!(encode_key(key), Cow::Borrowed(k) if k == key));
        assert_eq!(encode_key(""), "");
    }

    #[test]
    fn encoded_base64_keys_contain_no_unsafe_characters() {
        for key in random_keys() {
            let encoded = encode_key(&key);
            assert!(!encoded.contains(['/', '+', '=']), "{encoded}");
            assert!(encoded.len() >= key.len() && encoded.len() <= 3 * key.len());
        }
    }

    #[test]
    fn decoding_the_escapes_recovers_the_key() {
        for key in random_keys() {
            assert_eq!(decode_key(&encode_key(&key)), key);
        }
    }

    #[test]
    fn raw_encoding_keeps_the_key() {
        assert_eq!(KeyEncoding::Raw.apply("k/+="), "k/+=");
        assert_eq!(KeyEncoding::PercentEncoded.apply("k/+="), "k%2F%2B%3D");
    }
}
