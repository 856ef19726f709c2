use crate::error::{PdfError, Result};
use std::fmt;
use std::io::Write;

/// A name value, always carrying its leading `/` sigil.
///
/// Equality and hashing operate on the sigil-prefixed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    /// Create a name from sigil-prefixed text. A missing sigil is an
    /// argument error.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if !value.starts_with('/') {
            return Err(PdfError::InvalidName(format!(
                "name must start with '/': {value:?}"
            )));
        }
        Ok(Self(value))
    }

    /// Collaborator-facing constructor: a bare name is auto-prefixed.
    pub fn adjusted(value: &str) -> Self {
        if value.starts_with('/') {
            Self(value.to_string())
        } else {
            Self(format!("/{value}"))
        }
    }

    /// The sigil-prefixed text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The text after the sigil.
    pub fn bare(&self) -> &str {
        &self.0[1..]
    }

    /// Emit the name token. Bytes that would terminate or confuse the token
    /// (delimiters, whitespace, `#`, non-printable bytes) are written as
    /// `#xx` escapes.
    pub fn write_token<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(b"/")?;
        for &byte in self.bare().as_bytes() {
            if needs_escape(byte) {
                write!(w, "#{byte:02X}")?;
            } else {
                w.write_all(&[byte])?;
            }
        }
        Ok(())
    }
}

fn needs_escape(byte: u8) -> bool {
    !(b'!'..=b'~').contains(&byte) || matches!(byte, b'#' | b'/' | b'%' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}')
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
