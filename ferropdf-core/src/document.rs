//! The document facade: trailer, object table, access mode, metadata, and
//! the save pipeline.

use crate::error::{PdfError, Result};
use crate::geometry::Rectangle;
use crate::objects::{Array, Dictionary, Object, ObjectId, ValueCreate};
use crate::schema::DictKind;
use crate::writer::{DocumentWriter, SerializeOptions};
use crate::xref::XrefTable;
use chrono::{DateTime, FixedOffset, Local};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const DEFAULT_VERSION: &str = "1.7";

/// Prepare passes beyond this count mean a hook keeps growing the table.
const MAX_PREPARE_PASSES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Modify,
    ReadOnly,
}

/// Host-side document information, synced into the `/Info` dictionary
/// during the prepare phase.
#[derive(Debug, Clone, Default)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<FixedOffset>>,
    pub modification_date: Option<DateTime<FixedOffset>>,
}

/// A collaborator callback run during the prepare phase, once per pass.
pub type PrepareHook = Box<dyn Fn(&mut XrefTable) -> Result<()>>;

/// An in-memory document: a trailer dictionary rooting the object graph
/// held in the cross-reference table.
///
/// A freshly created document is modifiable and seeded with a catalog and
/// an empty page tree. A document assembled from foreign parts starts
/// read-only; every mutating operation on it fails fast with
/// [`PdfError::ReadOnly`] until [`Document::reopen_for_modify`].
pub struct Document {
    version: String,
    trailer: Dictionary,
    xref: XrefTable,
    access: AccessMode,
    metadata: DocumentMetadata,
    prepare_hooks: Vec<PrepareHook>,
}

impl Document {
    pub fn new() -> Self {
        let mut xref = XrefTable::new();

        let mut pages = Dictionary::of_kind(DictKind::Pages);
        pages.set_name("Type", "Pages");
        pages.set("Kids", Array::new());
        pages.set("Count", 0);
        let pages_id = xref.add(pages);

        let mut catalog = Dictionary::of_kind(DictKind::Catalog);
        catalog.set_name("Type", "Catalog");
        catalog.set("Pages", pages_id);
        let catalog_id = xref.add(catalog);

        let mut trailer = Dictionary::of_kind(DictKind::Trailer);
        trailer.set("Root", catalog_id);

        Self {
            version: DEFAULT_VERSION.into(),
            trailer,
            xref,
            access: AccessMode::Modify,
            metadata: DocumentMetadata::default(),
            prepare_hooks: Vec::new(),
        }
    }

    /// Assemble a document from foreign parts (an imported file). The
    /// result is read-only.
    pub fn from_parts(version: impl Into<String>, trailer: Dictionary, xref: XrefTable) -> Self {
        Self {
            version: version.into(),
            trailer,
            xref,
            access: AccessMode::ReadOnly,
            metadata: DocumentMetadata::default(),
            prepare_hooks: Vec::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub fn access(&self) -> AccessMode {
        self.access
    }

    pub fn is_read_only(&self) -> bool {
        self.access == AccessMode::ReadOnly
    }

    /// Lift a read-only document into the modifiable state.
    pub fn reopen_for_modify(&mut self) {
        self.access = AccessMode::Modify;
    }

    fn ensure_modifiable(&self) -> Result<()> {
        match self.access {
            AccessMode::Modify => Ok(()),
            AccessMode::ReadOnly => Err(PdfError::ReadOnly),
        }
    }

    pub fn trailer(&self) -> &Dictionary {
        &self.trailer
    }

    pub fn xref(&self) -> &XrefTable {
        &self.xref
    }

    pub(crate) fn xref_mut(&mut self) -> &mut XrefTable {
        &mut self.xref
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut DocumentMetadata {
        &mut self.metadata
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.metadata.title = Some(title.into());
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.metadata.author = Some(author.into());
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.metadata.subject = Some(subject.into());
    }

    pub fn set_keywords(&mut self, keywords: impl Into<String>) {
        self.metadata.keywords = Some(keywords.into());
    }

    /// Promote an object into the table under a fresh id.
    pub fn add_object(&mut self, object: impl Into<Object>) -> Result<ObjectId> {
        self.ensure_modifiable()?;
        Ok(self.xref.add(object))
    }

    /// Promote an object under an explicit id (occupied slots are refused).
    pub fn insert_object(&mut self, id: ObjectId, object: impl Into<Object>) -> Result<()> {
        self.ensure_modifiable()?;
        self.xref.insert(id, object)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object> {
        self.xref.get(id)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Result<Option<&mut Object>> {
        self.ensure_modifiable()?;
        Ok(self.xref.get_mut(id))
    }

    pub fn resolve<'a>(&'a self, value: &'a Object) -> Result<&'a Object> {
        self.xref.resolve(value)
    }

    /// Register a callback run during the prepare phase of every save.
    pub fn add_prepare_hook(&mut self, hook: PrepareHook) {
        self.prepare_hooks.push(hook);
    }

    /// The catalog's id, always read through the trailer (never cached, so
    /// renumbering cannot leave a stale id behind).
    pub fn catalog_id(&self) -> Result<ObjectId> {
        self.trailer
            .get("Root")
            .and_then(Object::as_reference)
            .ok_or_else(|| PdfError::InvalidStructure("trailer has no /Root reference".into()))
    }

    fn pages_id(&self) -> Result<ObjectId> {
        let catalog_id = self.catalog_id()?;
        let catalog = self
            .xref
            .get(catalog_id)
            .and_then(Object::as_dict)
            .ok_or(PdfError::BrokenReference(catalog_id))?;
        catalog
            .get("Pages")
            .and_then(Object::as_reference)
            .ok_or_else(|| PdfError::InvalidStructure("catalog has no /Pages reference".into()))
    }

    /// Create a `/Type /Page` dictionary wired into the page tree.
    pub fn add_page(&mut self, media_box: Rectangle) -> Result<ObjectId> {
        self.ensure_modifiable()?;
        let pages_id = self.pages_id()?;

        let mut page = Dictionary::of_kind(DictKind::Page);
        page.set_name("Type", "Page");
        page.set("Parent", pages_id);
        page.set("MediaBox", media_box.to_array());
        let page_id = self.xref.add(page);

        let pages = self
            .xref
            .get_mut(pages_id)
            .and_then(Object::as_dict_mut)
            .ok_or(PdfError::BrokenReference(pages_id))?;
        match pages.get_mut("Kids") {
            Some(Object::Array(kids)) => kids.push(page_id),
            _ => {
                let mut kids = Array::new();
                kids.push(page_id);
                pages.set("Kids", kids);
            }
        }
        let count = pages
            .get("Kids")
            .and_then(Object::as_array)
            .map(Array::len)
            .unwrap_or(0);
        pages.set("Count", count as i64);

        Ok(page_id)
    }

    pub fn page_count(&self) -> usize {
        let Ok(pages_id) = self.pages_id() else {
            return 0;
        };
        self.xref
            .get(pages_id)
            .and_then(Object::as_dict)
            .and_then(|pages| pages.get("Kids"))
            .and_then(Object::as_array)
            .map(Array::len)
            .unwrap_or(0)
    }

    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.save_to(BufWriter::new(file))
    }

    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.save_to(&mut buffer)?;
        Ok(buffer)
    }

    pub fn save_to<W: Write>(&mut self, writer: W) -> Result<()> {
        self.save_with_options(writer, SerializeOptions::default())
    }

    /// The save pipeline: precondition, prepare, compact, renumber, write.
    /// Any error aborts the whole save.
    pub fn save_with_options<W: Write>(&mut self, writer: W, options: SerializeOptions) -> Result<()> {
        self.ensure_modifiable()?;
        if self.page_count() == 0 {
            return Err(PdfError::NoPages);
        }

        self.prepare_for_save()?;

        let removed = self.xref.compact(&self.trailer);
        tracing::debug!(removed, "save: compacted");

        self.xref.renumber(&mut self.trailer)?;

        let mut writer = DocumentWriter::with_options(writer, options);
        writer.write_document(&self.version, &self.xref, &self.trailer)?;
        tracing::debug!(objects = self.xref.len(), "save: written");
        Ok(())
    }

    /// Sync derived state and run the registered hooks, repeated until the
    /// table population stops changing.
    fn prepare_for_save(&mut self) -> Result<()> {
        for _ in 0..MAX_PREPARE_PASSES {
            let before = self.xref.len();

            self.sync_info()?;
            self.sync_page_tree()?;
            for (_, object) in self.xref.iter_mut() {
                sync_stream_lengths(object);
            }
            for hook in &self.prepare_hooks {
                hook(&mut self.xref)?;
            }

            if self.xref.len() == before {
                tracing::debug!(objects = before, "prepare reached fixpoint");
                return Ok(());
            }
        }
        Err(PdfError::PrepareDiverged)
    }

    fn sync_page_tree(&mut self) -> Result<()> {
        let pages_id = self.pages_id()?;
        let pages = self
            .xref
            .get_mut(pages_id)
            .and_then(Object::as_dict_mut)
            .ok_or(PdfError::BrokenReference(pages_id))?;
        if !pages.contains_key("Type") {
            pages.set_name("Type", "Pages");
        }
        let count = pages
            .get("Kids")
            .and_then(Object::as_array)
            .map(Array::len)
            .unwrap_or(0);
        pages.set("Count", count as i64);
        Ok(())
    }

    /// Push host-side metadata into the `/Info` dictionary. Documents with
    /// no metadata at all get none.
    fn sync_info(&mut self) -> Result<()> {
        let m = self.metadata.clone();
        let has_any = m.title.is_some()
            || m.author.is_some()
            || m.subject.is_some()
            || m.keywords.is_some()
            || m.creator.is_some()
            || m.producer.is_some()
            || m.creation_date.is_some()
            || m.modification_date.is_some();
        if !has_any {
            return Ok(());
        }

        let info = self
            .trailer
            .typed_value("Info", ValueCreate::Indirect, &mut self.xref)?
            .and_then(Object::as_dict_mut)
            .ok_or_else(|| PdfError::InvalidStructure("/Info is not a dictionary".into()))?;

        if let Some(title) = m.title {
            info.set_string("Title", title);
        }
        if let Some(author) = m.author {
            info.set_string("Author", author);
        }
        if let Some(subject) = m.subject {
            info.set_string("Subject", subject);
        }
        if let Some(keywords) = m.keywords {
            info.set_string("Keywords", keywords);
        }
        if let Some(creator) = m.creator {
            info.set_string("Creator", creator);
        }
        let producer = m
            .producer
            .unwrap_or_else(|| format!("ferropdf {}", env!("CARGO_PKG_VERSION")));
        info.set_string("Producer", producer);
        let creation = m
            .creation_date
            .unwrap_or_else(|| Local::now().fixed_offset());
        info.set_date_time("CreationDate", creation);
        if let Some(modified) = m.modification_date {
            info.set_date_time("ModDate", modified);
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn sync_stream_lengths(object: &mut Object) {
    match object {
        Object::Dictionary(dict) => {
            dict.sync_stream_length();
            for (_, value) in dict.iter_mut() {
                sync_stream_lengths(value);
            }
        }
        Object::Array(array) => {
            for element in array.iter_mut() {
                sync_stream_lengths(element);
            }
        }
        _ => {}
    }
}
