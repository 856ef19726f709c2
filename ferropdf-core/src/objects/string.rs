use crate::error::{PdfError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use std::io::Write;

/// Whether a string is written as a literal `( )` token or a hex `< >` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringFormat {
    #[default]
    Literal,
    Hex,
}

/// A byte string together with its preferred written form.
///
/// The content is immutable once constructed; the written form is a
/// serialization flag and does not affect equality.
#[derive(Debug, Clone)]
pub struct PdfString {
    bytes: Vec<u8>,
    format: StringFormat,
}

impl PdfString {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            format: StringFormat::Literal,
        }
    }

    pub fn hex(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            format: StringFormat::Hex,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> StringFormat {
        self.format
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lossy text view for diagnostics and metadata.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Emit the string token in its preferred form.
    pub fn write_token<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        match self.format {
            StringFormat::Literal => {
                w.write_all(b"(")?;
                for &byte in &self.bytes {
                    match byte {
                        b'(' => w.write_all(b"\\(")?,
                        b')' => w.write_all(b"\\)")?,
                        b'\\' => w.write_all(b"\\\\")?,
                        b'\n' => w.write_all(b"\\n")?,
                        b'\r' => w.write_all(b"\\r")?,
                        b'\t' => w.write_all(b"\\t")?,
                        0x08 => w.write_all(b"\\b")?,
                        0x0C => w.write_all(b"\\f")?,
                        b if b < 0x20 => write!(w, "\\{b:03o}")?,
                        b => w.write_all(&[b])?,
                    }
                }
                w.write_all(b")")
            }
            StringFormat::Hex => {
                w.write_all(b"<")?;
                for &byte in &self.bytes {
                    write!(w, "{byte:02X}")?;
                }
                w.write_all(b">")
            }
        }
    }
}

impl PartialEq for PdfString {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl From<&str> for PdfString {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}

impl From<String> for PdfString {
    fn from(s: String) -> Self {
        Self::new(s.into_bytes())
    }
}

/// Format a date as `D:YYYYMMDDHHmmss+HH'mm'`.
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    let base = date.format("D:%Y%m%d%H%M%S");
    let offset = date.offset().local_minus_utc();
    let sign = if offset < 0 { '-' } else { '+' };
    let offset = offset.abs();
    format!("{base}{sign}{:02}'{:02}'", offset / 3600, (offset % 3600) / 60)
}

/// Parse a `D:` date string. Trailing components may be omitted; the zone
/// may be `Z`, absent (treated as UTC) or `±HH'mm'`.
pub fn parse_date(text: &str) -> Result<DateTime<FixedOffset>> {
    let bad = || PdfError::InvalidFormat(format!("invalid date string: {text:?}"));

    let rest = text.strip_prefix("D:").unwrap_or(text);
    if !rest.is_ascii() {
        return Err(bad());
    }
    let digits: &str = rest;

    let field = |start: usize, len: usize, default: u32| -> Result<u32> {
        if digits.len() < start + len {
            return Ok(default);
        }
        digits[start..start + len].parse::<u32>().map_err(|_| bad())
    };

    if digits.len() < 4 {
        return Err(bad());
    }
    let year = digits[0..4].parse::<i32>().map_err(|_| bad())?;
    let month = field(4, 2, 1)?;
    let day = field(6, 2, 1)?;
    let hour = field(8, 2, 0)?;
    let minute = field(10, 2, 0)?;
    let second = field(12, 2, 0)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .ok_or_else(bad)?;

    let zone_text = &digits[digits.len().min(14)..];
    let offset_seconds = parse_zone(zone_text).ok_or_else(bad)?;
    let offset = FixedOffset::east_opt(offset_seconds).ok_or_else(bad)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(bad)
}

fn parse_zone(text: &str) -> Option<i32> {
    if text.is_empty() || text == "Z" {
        return Some(0);
    }
    let mut chars = text.chars();
    let sign = match chars.next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let rest: String = chars.collect();
    let mut parts = rest.split('\'').filter(|p| !p.is_empty());
    let hours: i32 = parts.next()?.parse().ok()?;
    let minutes: i32 = parts.next().map(|m| m.parse().ok()).unwrap_or(Some(0))?;
    Some(sign * (hours * 3600 + minutes * 60))
}
