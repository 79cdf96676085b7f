//! Key description file
//!
//! One `<name> <hex>` pair per line, `#` starts a comment line:
//!
//! ```text
//! mod 010203
//! exp 010001
//! blob 010203040506
//! ```
//!
//! Parsing stops at the first malformed line.

use crate::error::KeyfileError;
use std::fmt::{Debug, Display};
use std::str::FromStr;

#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Modulus,
    Exponent,
    Blob,
}

impl Field {
    const fn name(self) -> &'static str {
        match self {
            Field::Modulus => "mod",
            Field::Exponent => "exp",
            Field::Blob => "blob",
        }
    }
}

impl FromStr for Field {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mod" => Ok(Field::Modulus),
            "exp" => Ok(Field::Exponent),
            "blob" => Ok(Field::Blob),
            _ => Err(()),
        }
    }
}

/// A single keyfile line, kept only to report where parsing failed.
struct KeyFileLine<'a> {
    num: usize,
    text: &'a str,
}

impl<'a> KeyFileLine<'a> {
    fn error(&self) -> KeyfileError {
        KeyfileError::Format {
            line: self.num,
            text: self.text.trim().to_string(),
        }
    }

    /// `Ok(None)` for blank and comment lines.
    fn field(&self) -> Result<Option<(Field, Vec<u8>)>, KeyfileError> {
        let text = self.text.trim();
        if text.is_empty() || text.starts_with('#') {
            return Ok(None);
        }

        let mut tokens = text.split_whitespace();
        let (Some(name), Some(value), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(self.error());
        };

        let field = name.parse::<Field>().map_err(|_| self.error())?;
        let value = hex::decode(value).map_err(|_| self.error())?;

        Ok(Some((field, value)))
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct KeyRecord {
    modulus: Vec<u8>,
    exponent: Vec<u8>,
    blob: Vec<u8>,
}

impl KeyRecord {
    pub fn parse(raw: &[u8]) -> Result<Self, KeyfileError> {
        let (mut modulus, mut exponent, mut blob) = (None, None, None);

        for (idx, bytes) in raw.split(|&b| b == b'\n').enumerate() {
            let num = idx + 1;
            let text = match std::str::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    return Err(KeyfileError::Format {
                        line: num,
                        text: String::from_utf8_lossy(bytes).trim().to_string(),
                    })
                }
            };

            let Some((field, value)) = KeyFileLine { num, text }.field()? else {
                continue;
            };

            log::trace!("keyfile line {num}: `{}` field", field.name());
            let slot = match field {
                Field::Modulus => &mut modulus,
                Field::Exponent => &mut exponent,
                Field::Blob => &mut blob,
            };
            *slot = Some(value);
        }

        Ok(Self {
            modulus: modulus.ok_or(KeyfileError::MissingField(Field::Modulus.name()))?,
            exponent: exponent.ok_or(KeyfileError::MissingField(Field::Exponent.name()))?,
            blob: blob.ok_or(KeyfileError::MissingField(Field::Blob.name()))?,
        })
    }

    pub fn modulus(&self) -> &[u8] {
        self.modulus.as_slice()
    }

    pub fn exponent(&self) -> &[u8] {
        self.exponent.as_slice()
    }

    pub fn blob(&self) -> &[u8] {
        self.blob.as_slice()
    }
}

impl FromStr for KeyRecord {
    type Err = KeyfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.as_bytes())
    }
}

impl Display for KeyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "mod={},exp={},blob={}",
            hex::encode(&self.modulus),
            hex::encode(&self.exponent),
            hex::encode(&self.blob)
        )
    }
}

impl Debug for KeyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRecord")
            .field("modulus", &hex::encode(&self.modulus))
            .field("exponent", &hex::encode(&self.exponent))
            .field("blob_len", &self.blob.len())
            .finish()
    }
}

#[cfg(feature = "sec-zeroize")]
impl Zeroize for KeyRecord {
    fn zeroize(&mut self) {
        self.blob.zeroize();
    }
}

#[cfg(feature = "sec-zeroize-drop")]
impl Drop for KeyRecord {
    fn drop(&mut self) {
        self.zeroize();
    }
}
