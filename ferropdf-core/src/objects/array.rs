use crate::error::{PdfError, Result};
use crate::geometry::Rectangle;
use crate::objects::string::format_date;
use crate::objects::{Name, Object, PdfString};
use crate::writer::SerializeOptions;
use crate::xref::XrefTable;
use std::io::Write;

/// An ordered, duplicate-permitting list of values.
///
/// Typed index accessors mirror the dictionary's getters: they dereference
/// through references transparently and apply the same coercion table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    elements: Vec<Object>,
}

impl Array {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    /// Append a value. An `ObjectId` argument is stored as a reference, the
    /// same auto-conversion rule the dictionary applies.
    pub fn push(&mut self, value: impl Into<Object>) {
        self.elements.push(value.into());
    }

    pub fn insert(&mut self, index: usize, value: impl Into<Object>) -> Result<()> {
        if index > self.elements.len() {
            return Err(PdfError::IndexOutOfRange {
                index,
                len: self.elements.len(),
            });
        }
        self.elements.insert(index, value.into());
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Object> {
        if index >= self.elements.len() {
            return Err(PdfError::IndexOutOfRange {
                index,
                len: self.elements.len(),
            });
        }
        Ok(self.elements.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Object> {
        self.elements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Object> {
        self.elements.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Object> {
        self.elements.iter_mut()
    }

    /// Element at `index`, dereferenced through the table.
    pub fn resolved<'a>(&'a self, index: usize, xref: &'a XrefTable) -> Result<&'a Object> {
        let value = self.elements.get(index).ok_or(PdfError::IndexOutOfRange {
            index,
            len: self.elements.len(),
        })?;
        xref.resolve(value)
    }

    pub fn get_integer(&self, index: usize, xref: &XrefTable) -> Result<i64> {
        let value = self.resolved(index, xref)?;
        value.as_integer().ok_or(PdfError::TypeMismatch {
            expected: "Integer",
            found: value.type_name(),
        })
    }

    pub fn get_real(&self, index: usize, xref: &XrefTable) -> Result<f64> {
        let value = self.resolved(index, xref)?;
        value.as_real().ok_or(PdfError::TypeMismatch {
            expected: "Real",
            found: value.type_name(),
        })
    }

    pub fn get_boolean(&self, index: usize, xref: &XrefTable) -> Result<bool> {
        let value = self.resolved(index, xref)?;
        value.as_bool().ok_or(PdfError::TypeMismatch {
            expected: "Boolean",
            found: value.type_name(),
        })
    }

    pub fn get_name(&self, index: usize, xref: &XrefTable) -> Result<Name> {
        let value = self.resolved(index, xref)?;
        value.as_name().cloned().ok_or(PdfError::TypeMismatch {
            expected: "Name",
            found: value.type_name(),
        })
    }

    pub fn get_string(&self, index: usize, xref: &XrefTable) -> Result<PdfString> {
        match self.resolved(index, xref)? {
            Object::String(s) => Ok(s.clone()),
            Object::Date(d) => Ok(PdfString::from(format_date(d))),
            value => Err(PdfError::TypeMismatch {
                expected: "String",
                found: value.type_name(),
            }),
        }
    }

    pub fn get_rectangle(&self, index: usize, xref: &XrefTable) -> Result<Rectangle> {
        let value = self.resolved(index, xref)?;
        Rectangle::from_object(value, xref)
    }

    pub(crate) fn write_value<W: Write>(&self, w: &mut W, options: &SerializeOptions) -> Result<()> {
        w.write_all(b"[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                w.write_all(b" ")?;
            }
            element.write_value(w, options)?;
        }
        w.write_all(b"]")?;
        Ok(())
    }
}

impl From<Vec<Object>> for Array {
    fn from(elements: Vec<Object>) -> Self {
        Self { elements }
    }
}

impl FromIterator<Object> for Array {
    fn from_iter<T: IntoIterator<Item = Object>>(iter: T) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}
