//! ferropdf: an in-memory PDF object model and serialization engine.
//!
//! The crate models a document as a graph of typed, possibly-shared
//! objects: a polymorphic value hierarchy ([`Object`]), indirect
//! references resolved through a cross-reference table ([`XrefTable`]),
//! and dictionary/array containers with typed accessors and schema-driven
//! subtype transformation. Saving runs the prepare/compact/renumber/write
//! pipeline and emits a classic cross-reference section.
//!
//! ```
//! use ferropdf::{Document, Rectangle};
//!
//! let mut doc = Document::new();
//! doc.set_title("Example");
//! doc.add_page(Rectangle::new(0.0, 0.0, 595.0, 842.0))?;
//! let bytes = doc.to_bytes()?;
//! assert!(bytes.starts_with(b"%PDF-"));
//! # Ok::<(), ferropdf::PdfError>(())
//! ```
//!
//! Parsing an existing file into the model is out of scope; see
//! [`Document::from_parts`] for documents assembled elsewhere.

pub mod document;
pub mod error;
pub mod filters;
pub mod geometry;
pub mod import;
pub mod objects;
pub mod schema;
pub mod sync;
pub mod writer;
pub mod xref;

pub use document::{AccessMode, Document, DocumentMetadata, PrepareHook};
pub use error::{PdfError, Result};
pub use geometry::{Matrix, Rectangle};
pub use import::{import_closure, Importer};
pub use objects::{
    Array, Dictionary, Name, Object, ObjectId, PdfString, Stream, StringFormat, ValueCreate,
};
pub use schema::DictKind;
pub use writer::{DocumentWriter, SerializeOptions};
pub use xref::XrefTable;
