//! Geometric value types used inside the object model

use crate::error::{PdfError, Result};
use crate::objects::{Array, Object};
use crate::xref::XrefTable;

/// A rectangle stored as two diagonal corners, the way the format itself
/// stores it (`[x1 y1 x2 y2]`).
///
/// The corners are not normalized: `width()` and `height()` are signed and
/// may be negative when the corners are given in non-normalized order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rectangle {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Build a rectangle from a 4-number array value, resolving references
    /// for the array itself and each element.
    pub fn from_object(object: &Object, xref: &XrefTable) -> Result<Self> {
        let resolved = xref.resolve(object)?;
        match resolved {
            Object::Rectangle(rect) => Ok(*rect),
            Object::Array(array) => {
                if array.len() != 4 {
                    return Err(PdfError::InvalidFormat(format!(
                        "rectangle source must have 4 elements, has {}",
                        array.len()
                    )));
                }
                let mut coords = [0.0f64; 4];
                for (i, slot) in coords.iter_mut().enumerate() {
                    *slot = array.get_real(i, xref)?;
                }
                Ok(Self::new(coords[0], coords[1], coords[2], coords[3]))
            }
            other => Err(PdfError::InvalidFormat(format!(
                "rectangle source must be an array, found {}",
                other.type_name()
            ))),
        }
    }

    pub fn to_array(&self) -> Array {
        let mut array = Array::new();
        array.push(self.x1);
        array.push(self.y1);
        array.push(self.x2);
        array.push(self.y2);
        array
    }
}

/// A 2D transformation matrix (`[a b c d e f]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn from_object(object: &Object, xref: &XrefTable) -> Result<Self> {
        let resolved = xref.resolve(object)?;
        match resolved {
            Object::Array(array) => {
                if array.len() != 6 {
                    return Err(PdfError::InvalidFormat(format!(
                        "matrix source must have 6 elements, has {}",
                        array.len()
                    )));
                }
                let mut m = [0.0f64; 6];
                for (i, slot) in m.iter_mut().enumerate() {
                    *slot = array.get_real(i, xref)?;
                }
                Ok(Self::new(m[0], m[1], m[2], m[3], m[4], m[5]))
            }
            other => Err(PdfError::InvalidFormat(format!(
                "matrix source must be an array, found {}",
                other.type_name()
            ))),
        }
    }

    pub fn to_array(&self) -> Array {
        let mut array = Array::new();
        array.push(self.a);
        array.push(self.b);
        array.push(self.c);
        array.push(self.d);
        array.push(self.e);
        array.push(self.f);
        array
    }
}
