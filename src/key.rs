//! 128-bit heap keys
//!
//! A [`Key`] is an unsigned 128-bit integer stored as two 64-bit halves,
//! `hi` being the more significant one. Keys are plain `Copy` values: every
//! heap in this crate stores them by value and never shares them.
//!
//! # Text formats
//!
//! | Form | Example | Use |
//! |------|---------|-----|
//! | hex  | `df6943ba6d51464f6b02157933bdd9ad` | interchange ([`Key::from_hex`], [`Key::to_hex`]) |
//! | debug | `0-10` | heap dumps (`Display`, `"{hi}-{lo}"` in decimal) |
//!
//! The hex form is exactly 32 digits, optionally prefixed by `0x`. The first
//! 16 digits are `hi`, the remaining 16 are `lo`.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::Key;
//!
//! let key = Key::from_hex("0xdf6943ba6d51464f6b02157933bdd9ad").unwrap();
//! assert_eq!(key.hi(), 0xdf6943ba6d51464f);
//! assert_eq!(key.lo(), 0x6b02157933bdd9ad);
//! assert_eq!(Key::new(0, 10).to_string(), "0-10");
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of hex digits in the textual form of a key.
pub const HEX_DIGITS: usize = 32;

const HALF_DIGITS: usize = HEX_DIGITS / 2;

/// Which half of a key a parse error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyHalf {
    Hi,
    Lo,
}

impl fmt::Display for KeyHalf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyHalf::Hi => f.write_str("high"),
            KeyHalf::Lo => f.write_str("low"),
        }
    }
}

/// Error returned when a hex string cannot be decoded into a [`Key`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    /// The input (without its `0x` prefix) is not exactly 32 characters long
    #[error("expected 32 hex digits, got {len}")]
    InvalidLength { len: usize },

    /// One half of the input contains a character that is not a hex digit
    #[error("invalid hex digit in {half} half: {digits:?}")]
    InvalidDigit { half: KeyHalf, digits: String },
}

/// A 128-bit unsigned key with total order
///
/// Ordering compares `hi` first and `lo` on ties, which is the numeric order
/// of the 128-bit value. The derived `Ord` relies on the field order below.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    hi: u64,
    lo: u64,
}

impl Key {
    /// The smallest key, `0-0`
    pub const MIN: Key = Key { hi: 0, lo: 0 };

    /// The largest key
    pub const MAX: Key = Key {
        hi: u64::MAX,
        lo: u64::MAX,
    };

    /// Creates a key from its high and low halves
    pub const fn new(hi: u64, lo: u64) -> Self {
        Key { hi, lo }
    }

    /// Parses 32 hex digits, optionally prefixed by `0x` or `0X`
    ///
    /// No padding or truncation happens: any other length is rejected.
    ///
    /// # Errors
    ///
    /// [`KeyParseError::InvalidLength`] when the digit count is wrong, and
    /// [`KeyParseError::InvalidDigit`] when a half contains a non-hex character.
    pub fn from_hex(s: &str) -> Result<Self, KeyParseError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != HEX_DIGITS {
            return Err(KeyParseError::InvalidLength { len: digits.len() });
        }
        // A multi-byte character would make the split below land off a char
        // boundary, and is never a hex digit anyway.
        if let Some(offset) = digits.bytes().position(|b| !b.is_ascii()) {
            let in_hi = offset < HALF_DIGITS;
            let half = if in_hi { KeyHalf::Hi } else { KeyHalf::Lo };
            return Err(KeyParseError::InvalidDigit {
                half,
                digits: digits
                    .char_indices()
                    .filter(|&(i, _)| (i < HALF_DIGITS) == in_hi)
                    .map(|(_, c)| c)
                    .collect(),
            });
        }

        let (hi, lo) = digits.split_at(HALF_DIGITS);
        Ok(Key {
            hi: parse_half(hi, KeyHalf::Hi)?,
            lo: parse_half(lo, KeyHalf::Lo)?,
        })
    }

    /// Returns the 32-digit lowercase hex form, without prefix
    pub fn to_hex(&self) -> String {
        format!("{:016x}{:016x}", self.hi, self.lo)
    }

    /// The more significant 64 bits
    pub const fn hi(&self) -> u64 {
        self.hi
    }

    /// The less significant 64 bits
    pub const fn lo(&self) -> u64 {
        self.lo
    }

    /// Strict comparison: `hi` first, then `lo`
    pub fn less_than(&self, other: &Key) -> bool {
        self.hi < other.hi || (self.hi == other.hi && self.lo < other.lo)
    }

    /// Field-wise equality
    pub fn equals(&self, other: &Key) -> bool {
        self.hi == other.hi && self.lo == other.lo
    }
}

fn parse_half(digits: &str, half: KeyHalf) -> Result<u64, KeyParseError> {
    // from_str_radix tolerates a leading '+', a key digit string must not.
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(KeyParseError::InvalidDigit {
            half,
            digits: digits.to_owned(),
        });
    }
    u64::from_str_radix(digits, 16).map_err(|_| KeyParseError::InvalidDigit {
        half,
        digits: digits.to_owned(),
    })
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::from_hex(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.hi, self.lo)
    }
}

impl fmt::LowerHex for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

impl From<u128> for Key {
    fn from(value: u128) -> Self {
        Key {
            hi: (value >> 64) as u64,
            lo: value as u64,
        }
    }
}

impl From<Key> for u128 {
    fn from(key: Key) -> Self {
        (u128::from(key.hi) << 64) | u128::from(key.lo)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Key {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Key {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Key::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_hi_then_lo() {
        let a = Key::new(0, 100);
        let b = Key::new(0, 200);
        let c = Key::new(1, 0);

        assert!(a.less_than(&b));
        assert!(!b.less_than(&a));
        assert!(b.less_than(&c));
        assert!(!a.less_than(&a));
        assert!(a < b && b < c);
    }

    #[test]
    fn test_equals() {
        assert!(Key::new(3, 4).equals(&Key::new(3, 4)));
        assert!(!Key::new(0, 100).equals(&Key::new(0, 200)));
        assert!(!Key::new(1, 4).equals(&Key::new(3, 4)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Key::new(0, 10).to_string(), "0-10");
        assert_eq!(
            Key::MAX.to_string(),
            "18446744073709551615-18446744073709551615"
        );
    }

    #[test]
    fn test_from_hex_prefixed() {
        let key = Key::from_hex("0xdf6943ba6d51464f6b02157933bdd9ad").unwrap();
        assert_eq!(key, Key::new(0xdf6943ba6d51464f, 0x6b02157933bdd9ad));
    }

    #[test]
    fn test_from_hex_zero() {
        let key = Key::from_hex(&"0".repeat(32)).unwrap();
        assert_eq!(key, Key::new(0, 0));
    }

    #[test]
    fn test_from_hex_uppercase() {
        let key: Key = "0XFFFFFFFFFFFFFFFF0000000000000001".parse().unwrap();
        assert_eq!(key, Key::new(u64::MAX, 1));
    }

    #[test]
    fn test_from_hex_wrong_length() {
        assert_eq!(
            Key::from_hex("0x1234"),
            Err(KeyParseError::InvalidLength { len: 4 })
        );
        assert_eq!(
            Key::from_hex(&"0".repeat(33)),
            Err(KeyParseError::InvalidLength { len: 33 })
        );
        assert_eq!(Key::from_hex(""), Err(KeyParseError::InvalidLength { len: 0 }));
    }

    #[test]
    fn test_from_hex_bad_digit() {
        let err = Key::from_hex("0000000000000000000000000000000g").unwrap_err();
        assert_eq!(
            err,
            KeyParseError::InvalidDigit {
                half: KeyHalf::Lo,
                digits: "000000000000000g".to_owned(),
            }
        );

        let err = Key::from_hex("+000000000000000ffffffffffffffff").unwrap_err();
        assert!(matches!(err, KeyParseError::InvalidDigit { half: KeyHalf::Hi, .. }));
    }

    #[test]
    fn test_from_hex_non_ascii() {
        // 30 ASCII digits plus one two-byte character is 32 bytes
        let s = format!("{}é", "0".repeat(30));
        assert_eq!(s.len(), 32);
        assert_eq!(
            Key::from_hex(&s),
            Err(KeyParseError::InvalidDigit {
                half: KeyHalf::Lo,
                digits: format!("{}é", "0".repeat(14)),
            })
        );

        let s = format!("é{}", "0".repeat(30));
        assert_eq!(
            Key::from_hex(&s),
            Err(KeyParseError::InvalidDigit {
                half: KeyHalf::Hi,
                digits: format!("é{}", "0".repeat(14)),
            })
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            KeyParseError::InvalidLength { len: 4 }.to_string(),
            "expected 32 hex digits, got 4"
        );
        assert_eq!(
            KeyParseError::InvalidDigit {
                half: KeyHalf::Hi,
                digits: "zz".to_owned()
            }
            .to_string(),
            "invalid hex digit in high half: \"zz\""
        );
    }

    #[test]
    fn test_hex_round_trip() {
        let key = Key::new(0x0123456789abcdef, 0xfedcba9876543210);
        assert_eq!(key.to_hex(), "0123456789abcdeffedcba9876543210");
        assert_eq!(Key::from_hex(&key.to_hex()), Ok(key));
        assert_eq!(format!("{:#x}", key), "0x0123456789abcdeffedcba9876543210");
    }

    #[test]
    fn test_hex_order_matches_string_order() {
        let a = "0xdf6943ba6d51464f6b02157933bdd9ad";
        let b = "0xdf6943ba6d51464f6b02157933bdd9ae";
        let c = "0xe06943ba6d51464f0000000000000000";
        let ka = Key::from_hex(a).unwrap();
        let kb = Key::from_hex(b).unwrap();
        let kc = Key::from_hex(c).unwrap();

        assert_eq!(ka < kb, a < b);
        assert_eq!(kb < kc, b < c);
        assert_eq!(ka < kc, a < c);
    }

    #[test]
    fn test_u128_conversion() {
        let value: u128 = (7u128 << 64) | 9;
        let key = Key::from(value);
        assert_eq!(key, Key::new(7, 9));
        assert_eq!(u128::from(key), value);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_hex_string() {
        let key = Key::new(0, 255);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"000000000000000000000000000000ff\"");
        let back: Key = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<Key>("\"0x12\"").is_err());
    }
}
