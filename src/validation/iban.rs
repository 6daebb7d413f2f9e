//! IBAN validation (ISO 13616 structure, ISO 7064 MOD-97-10 checksum).
//!
//! Validation is only meaningful for non-empty input. An empty string is
//! reported as invalid; callers that treat an empty field as "no opinion"
//! must special-case it before calling [`validate`].

use std::fmt;
use thiserror::Error;

use crate::validation::registry;

const MAX_BBAN_LEN: usize = 30;

/// Reasons an input is not a valid IBAN.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IbanError {
    #[error("IBAN is empty")]
    Empty,

    #[error("IBAN must be 2 letters, 2 digits, then 1 to 30 letters or digits")]
    Malformed,

    #[error("country code {0} does not issue IBANs")]
    UnknownCountry(String),

    #[error("IBAN for {country} must be {expected} characters, got {actual}")]
    WrongLength {
        country: String,
        expected: usize,
        actual: usize,
    },

    #[error("IBAN check digits do not match")]
    Checksum,
}

/// An IBAN in electronic format (uppercase, no whitespace) that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iban(String);

impl Iban {
    /// Parse and validate raw user input.
    pub fn parse(raw: &str) -> Result<Self, IbanError> {
        let iban = normalize(raw);
        if iban.is_empty() {
            return Err(IbanError::Empty);
        }
        if !has_valid_structure(&iban) {
            return Err(IbanError::Malformed);
        }

        let country = &iban[..2];
        let expected = registry::expected_length(country)
            .ok_or_else(|| IbanError::UnknownCountry(country.to_string()))?;
        if iban.len() != expected {
            return Err(IbanError::WrongLength {
                country: country.to_string(),
                expected,
                actual: iban.len(),
            });
        }

        if mod97(&iban) != 1 {
            return Err(IbanError::Checksum);
        }

        Ok(Self(iban))
    }

    /// Electronic format, e.g. `DE89370400440532013000`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-letter country code.
    pub fn country(&self) -> &str {
        &self.0[..2]
    }

    /// Check digits (positions 3-4).
    pub fn check_digits(&self) -> &str {
        &self.0[2..4]
    }

    /// Basic bank account number (everything after the check digits).
    pub fn bban(&self) -> &str {
        &self.0[4..]
    }
}

/// Print format: groups of four separated by spaces.
impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chunk) in self.0.as_bytes().chunks(4).enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            // Chunks are ASCII, validated at construction.
            f.write_str(std::str::from_utf8(chunk).map_err(|_| fmt::Error)?)?;
        }
        Ok(())
    }
}

impl AsRef<str> for Iban {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns true when `raw` is a valid IBAN once whitespace is stripped and
/// letters are uppercased.
pub fn validate(raw: &str) -> bool {
    Iban::parse(raw).is_ok()
}

/// Strip all whitespace and uppercase.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// `^[A-Z]{2}[0-9]{2}[A-Z0-9]{1,30}$`
fn has_valid_structure(iban: &str) -> bool {
    let bytes = iban.as_bytes();
    if bytes.len() < 5 || bytes.len() > 4 + MAX_BBAN_LEN {
        return false;
    }
    bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..4].iter().all(u8::is_ascii_digit)
        && bytes[4..]
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// MOD-97-10 over the rearranged IBAN (BBAN + country + check digits).
///
/// Letters expand to two-digit values (A=10 .. Z=35), folded in one step so
/// the accumulator never exceeds `96 * 100 + 35`.
fn mod97(iban: &str) -> u32 {
    let (head, bban) = iban.split_at(4);
    bban.bytes().chain(head.bytes()).fold(0u32, |acc, b| match b {
        b'0'..=b'9' => (acc * 10 + u32::from(b - b'0')) % 97,
        b'A'..=b'Z' => (acc * 100 + u32::from(b - b'A') + 10) % 97,
        _ => acc,
    })
}
