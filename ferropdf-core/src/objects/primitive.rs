use crate::error::Result;
use crate::geometry::Rectangle;
use crate::objects::{Array, Dictionary, Name, PdfString};
use crate::writer::SerializeOptions;
use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::io::Write;

/// Identity of an indirect object: object number and generation number.
///
/// Object number 0 is the empty/sentinel reference. Live numbers are
/// expected in `[1, 0x7FFFFF]` and generations in `[0, 0xFFFF]`; foreign
/// producers that violate the range are logged and tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    number: u32,
    generation: u16,
}

impl ObjectId {
    pub const MAX_OBJECT_NUMBER: u32 = 0x7F_FFFF;

    pub fn new(number: u32, generation: u16) -> Self {
        if number == 0 || number > Self::MAX_OBJECT_NUMBER {
            tracing::warn!(number, generation, "object number outside the valid range");
        }
        Self { number, generation }
    }

    /// The empty/sentinel reference.
    pub const fn empty() -> Self {
        Self {
            number: 0,
            generation: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.number == 0
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn generation(&self) -> u16 {
        self.generation
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.number, self.generation)
    }
}

/// The closed set of value variants making up the object model.
///
/// Simple variants are immutable once constructed; `Array` and `Dictionary`
/// are mutable containers. A `Reference` stands in for an indirect object
/// owned by the cross-reference table.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(PdfString),
    Name(Name),
    Date(DateTime<FixedOffset>),
    /// Raw token text written verbatim.
    Literal(String),
    Rectangle(Rectangle),
    Array(Array),
    Dictionary(Dictionary),
    Reference(ObjectId),
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::String(_) => "String",
            Object::Name(_) => "Name",
            Object::Date(_) => "Date",
            Object::Literal(_) => "Literal",
            Object::Rectangle(_) => "Rectangle",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Reference(_) => "Reference",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Object::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Object::Real(f) => Some(*f),
            Object::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&PdfString> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Object::Name(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Object::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Object::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<ObjectId> {
        match self {
            Object::Reference(id) => Some(*id),
            _ => None,
        }
    }

    /// Emit the exact token sequence for this value.
    pub fn write_value<W: Write>(&self, w: &mut W, options: &SerializeOptions) -> Result<()> {
        match self {
            Object::Null => w.write_all(b"null")?,
            Object::Boolean(b) => w.write_all(if *b { b"true" } else { b"false" })?,
            Object::Integer(i) => write!(w, "{i}")?,
            Object::Real(f) => {
                w.write_all(format_real(*f, options.real_precision).as_bytes())?
            }
            Object::String(s) => s.write_token(w)?,
            Object::Name(n) => n.write_token(w)?,
            Object::Date(d) => {
                PdfString::from(crate::objects::string::format_date(d)).write_token(w)?
            }
            Object::Literal(text) => w.write_all(text.as_bytes())?,
            Object::Rectangle(rect) => {
                write!(
                    w,
                    "[{} {} {} {}]",
                    format_real(rect.x1, options.real_precision),
                    format_real(rect.y1, options.real_precision),
                    format_real(rect.x2, options.real_precision),
                    format_real(rect.y2, options.real_precision),
                )?;
            }
            Object::Array(array) => array.write_value(w, options)?,
            Object::Dictionary(dict) => dict.write_value(w, options)?,
            Object::Reference(id) => write!(w, "{} {} R", id.number(), id.generation())?,
        }
        Ok(())
    }
}

/// Format a real with a bounded number of fractional digits, trimming
/// trailing zeros so repeated writes of the same value are identical.
pub(crate) fn format_real(value: f64, precision: usize) -> String {
    let text = format!("{value:.precision$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::Boolean(b)
    }
}

impl From<i32> for Object {
    fn from(i: i32) -> Self {
        Object::Integer(i as i64)
    }
}

impl From<i64> for Object {
    fn from(i: i64) -> Self {
        Object::Integer(i)
    }
}

impl From<f32> for Object {
    fn from(f: f32) -> Self {
        Object::Real(f as f64)
    }
}

impl From<f64> for Object {
    fn from(f: f64) -> Self {
        Object::Real(f)
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        Object::String(PdfString::from(s))
    }
}

impl From<String> for Object {
    fn from(s: String) -> Self {
        Object::String(PdfString::from(s))
    }
}

impl From<PdfString> for Object {
    fn from(s: PdfString) -> Self {
        Object::String(s)
    }
}

impl From<Name> for Object {
    fn from(n: Name) -> Self {
        Object::Name(n)
    }
}

impl From<DateTime<FixedOffset>> for Object {
    fn from(d: DateTime<FixedOffset>) -> Self {
        Object::Date(d)
    }
}

impl From<Rectangle> for Object {
    fn from(r: Rectangle) -> Self {
        Object::Rectangle(r)
    }
}

impl From<Array> for Object {
    fn from(a: Array) -> Self {
        Object::Array(a)
    }
}

impl From<Vec<Object>> for Object {
    fn from(v: Vec<Object>) -> Self {
        Object::Array(Array::from(v))
    }
}

impl From<Dictionary> for Object {
    fn from(d: Dictionary) -> Self {
        Object::Dictionary(d)
    }
}

/// A promoted object is always stored as its reference, never re-embedded.
impl From<ObjectId> for Object {
    fn from(id: ObjectId) -> Self {
        Object::Reference(id)
    }
}
