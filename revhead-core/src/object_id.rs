//! Commit and tree identifiers.
//!
//! [`ObjectId`] is a plain 20-byte SHA-1 value. It is `Copy`, compares by its
//! bytes and can be converted to and from [`git2::Oid`] so the rest of the
//! crate never has to pass hex strings around.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of raw bytes in an object id.
pub const OBJECT_ID_BYTES: usize = 20;

/// Number of hex characters in the textual form of an object id.
pub const OBJECT_ID_HEX_LENGTH: usize = OBJECT_ID_BYTES * 2;

/// Number of hex characters rendered by [`ObjectId::to_short_string`].
pub const SHORT_ID_LENGTH: usize = 8;

/// Content-addressed identifier of a commit or tree object.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; OBJECT_ID_BYTES]);

/// Reasons an object id could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectIdParseError {
  /// The input was not exactly [`OBJECT_ID_HEX_LENGTH`] bytes long.
  #[error("object id must be {OBJECT_ID_HEX_LENGTH} hex characters, got {0} bytes")]
  InvalidLength(usize),
  /// The input contained a character that is not a hex digit.
  #[error("invalid hex character {character:?} at offset {offset}")]
  InvalidCharacter {
    /// The offending character.
    character: char,
    /// Byte offset of the offending character.
    offset: usize,
  },
}

impl ObjectId {
  /// Build an id from raw bytes.
  pub const fn from_bytes(bytes: [u8; OBJECT_ID_BYTES]) -> Self {
    Self(bytes)
  }

  /// Raw bytes of the id.
  pub const fn as_bytes(&self) -> &[u8; OBJECT_ID_BYTES] {
    &self.0
  }

  /// Abbreviated lowercase hex form used for compact display.
  pub fn to_short_string(&self) -> String {
    let mut short = self.to_string();
    short.truncate(SHORT_ID_LENGTH);
    short
  }

  /// Generate a random id. Only meant for tests.
  #[cfg(any(test, feature = "testing"))]
  pub fn random() -> Self {
    let mut bytes = [0u8; OBJECT_ID_BYTES];
    let first = uuid::Uuid::new_v4();
    let second = uuid::Uuid::new_v4();
    let (head, tail) = bytes.split_at_mut(16);
    head.copy_from_slice(first.as_bytes());
    tail.copy_from_slice(&second.as_bytes()[..OBJECT_ID_BYTES - 16]);
    Self(bytes)
  }
}

impl FromStr for ObjectId {
  type Err = ObjectIdParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.len() != OBJECT_ID_HEX_LENGTH {
      return Err(ObjectIdParseError::InvalidLength(s.len()));
    }

    // Any multi-byte character fails `to_digit`, so `index` stays below 40.
    let mut bytes = [0u8; OBJECT_ID_BYTES];
    for (index, (offset, character)) in s.char_indices().enumerate() {
      let nibble = character
        .to_digit(16)
        .ok_or(ObjectIdParseError::InvalidCharacter { character, offset })? as u8;
      bytes[index / 2] |= if index % 2 == 0 { nibble << 4 } else { nibble };
    }

    Ok(Self(bytes))
  }
}

impl fmt::Display for ObjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for byte in &self.0 {
      write!(f, "{byte:02x}")?;
    }
    Ok(())
  }
}

impl fmt::Debug for ObjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("ObjectId").field(&self.to_string()).finish()
  }
}

impl From<git2::Oid> for ObjectId {
  fn from(oid: git2::Oid) -> Self {
    let mut bytes = [0u8; OBJECT_ID_BYTES];
    bytes.copy_from_slice(oid.as_bytes());
    Self(bytes)
  }
}

impl From<ObjectId> for git2::Oid {
  fn from(id: ObjectId) -> Self {
    // Twenty bytes is always a valid SHA-1 oid.
    git2::Oid::from_bytes(&id.0).unwrap_or_else(|_| git2::Oid::zero())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = "3b6ce324e30ed7fda24483fd56a180c34a262202";

  #[test]
  fn parses_and_displays_lowercase_hex() {
    let id: ObjectId = SAMPLE.to_uppercase().parse().unwrap();
    assert_eq!(id.to_string(), SAMPLE);
  }

  #[test]
  fn short_string_is_a_prefix() {
    let id: ObjectId = SAMPLE.parse().unwrap();
    assert_eq!(id.to_short_string(), "3b6ce324");
    assert_eq!(id.to_short_string().len(), SHORT_ID_LENGTH);
  }

  #[test]
  fn rejects_wrong_length() {
    let err = "3b6ce324".parse::<ObjectId>().unwrap_err();
    assert_eq!(err, ObjectIdParseError::InvalidLength(8));
  }

  #[test]
  fn rejects_non_hex_characters() {
    let input = format!("{}zz", &SAMPLE[..38]);
    let err = input.parse::<ObjectId>().unwrap_err();
    assert_eq!(
      err,
      ObjectIdParseError::InvalidCharacter {
        character: 'z',
        offset: 38
      }
    );
  }

  #[test]
  fn length_is_measured_in_bytes() {
    let err = "é".repeat(OBJECT_ID_HEX_LENGTH).parse::<ObjectId>().unwrap_err();
    assert_eq!(err, ObjectIdParseError::InvalidLength(80));
  }

  #[test]
  fn reports_multibyte_character_as_written() {
    let input = format!("{}é", &SAMPLE[..38]);
    let err = input.parse::<ObjectId>().unwrap_err();
    assert_eq!(
      err,
      ObjectIdParseError::InvalidCharacter {
        character: 'é',
        offset: 38
      }
    );
  }

  #[test]
  fn equality_and_ordering_follow_bytes() {
    let low: ObjectId = "00000000000000000000000000000000000000ff".parse().unwrap();
    let high: ObjectId = "0100000000000000000000000000000000000000".parse().unwrap();
    assert!(low < high);
    assert_eq!(low, ObjectId::from_bytes(*low.as_bytes()));
  }

  #[test]
  fn converts_to_and_from_git2() {
    let oid = git2::Oid::from_str(SAMPLE).unwrap();
    let id = ObjectId::from(oid);
    assert_eq!(id.to_string(), SAMPLE);
    assert_eq!(git2::Oid::from(id), oid);
  }

  #[test]
  fn random_ids_differ() {
    assert_ne!(ObjectId::random(), ObjectId::random());
  }
}
