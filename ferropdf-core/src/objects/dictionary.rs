use crate::error::{PdfError, Result};
use crate::geometry::{Matrix, Rectangle};
use crate::objects::string::{format_date, parse_date};
use crate::objects::{Array, Name, Object, PdfString, Stream};
use crate::schema::{self, DictKind, Expected, KeySpec};
use crate::writer::SerializeOptions;
use crate::xref::XrefTable;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use std::io::Write;

/// Creation policy for [`Dictionary::typed_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCreate {
    /// Absent keys stay absent.
    None,
    /// Absent keys are populated with a schema-constructed direct value.
    Direct,
    /// Absent keys are populated with a schema-constructed value registered
    /// in the cross-reference table and stored as a reference.
    Indirect,
}

/// An insertion-ordered, key-unique map from names to values, optionally
/// owning a raw byte stream.
///
/// Keys always carry the `/` sigil; bare keys supplied by collaborators are
/// auto-prefixed. Absence of a key represents null - a stored value is never
/// semantically missing. The `kind` tag is the declaring subtype consulted
/// by the key schema; see [`Dictionary::typed_value`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    kind: DictKind,
    entries: IndexMap<Name, Object>,
    stream: Option<Stream>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_kind(kind: DictKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn kind(&self) -> DictKind {
        self.kind
    }

    /// Type transformation: retag a generic dictionary with the subtype the
    /// schema mandates, preserving the element storage. A dictionary that
    /// already carries a specific subtype is left untouched.
    pub(crate) fn transform(&mut self, expected: DictKind) {
        if self.kind == expected {
            return;
        }
        if self.kind == DictKind::Generic {
            self.kind = expected;
        } else {
            tracing::warn!(
                current = ?self.kind,
                expected = ?expected,
                "dictionary already carries a specific subtype; not retagged"
            );
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<Object>) {
        self.entries.insert(Name::adjusted(key), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.get(&Name::adjusted(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.entries.get_mut(&Name::adjusted(key))
    }

    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.entries.shift_remove(&Name::adjusted(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&Name::adjusted(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stream = None;
    }

    pub fn keys(&self) -> impl Iterator<Item = &Name> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Object)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Name, &mut Object)> {
        self.entries.iter_mut()
    }

    /// Value at `key`, dereferenced through the table. A missing key and a
    /// reference resolving to null are both `None`.
    pub fn resolved<'a>(&'a self, key: &str, xref: &'a XrefTable) -> Result<Option<&'a Object>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => {
                let resolved = xref.resolve(value)?;
                if resolved.is_null() {
                    Ok(None)
                } else {
                    Ok(Some(resolved))
                }
            }
        }
    }

    pub fn get_integer(&self, key: &str, xref: &XrefTable) -> Result<i64> {
        match self.resolved(key, xref)? {
            None => Ok(0),
            Some(value) => value.as_integer().ok_or(PdfError::TypeMismatch {
                expected: "Integer",
                found: value.type_name(),
            }),
        }
    }

    pub fn get_real(&self, key: &str, xref: &XrefTable) -> Result<f64> {
        match self.resolved(key, xref)? {
            None => Ok(0.0),
            Some(value) => value.as_real().ok_or(PdfError::TypeMismatch {
                expected: "Real",
                found: value.type_name(),
            }),
        }
    }

    pub fn get_boolean(&self, key: &str, xref: &XrefTable) -> Result<bool> {
        match self.resolved(key, xref)? {
            None => Ok(false),
            Some(value) => value.as_bool().ok_or(PdfError::TypeMismatch {
                expected: "Boolean",
                found: value.type_name(),
            }),
        }
    }

    pub fn get_name(&self, key: &str, xref: &XrefTable) -> Result<Option<Name>> {
        match self.resolved(key, xref)? {
            None => Ok(None),
            Some(value) => value.as_name().cloned().map(Some).ok_or(PdfError::TypeMismatch {
                expected: "Name",
                found: value.type_name(),
            }),
        }
    }

    pub fn get_string(&self, key: &str, xref: &XrefTable) -> Result<Option<PdfString>> {
        match self.resolved(key, xref)? {
            None => Ok(None),
            Some(Object::String(s)) => Ok(Some(s.clone())),
            Some(Object::Date(d)) => Ok(Some(PdfString::from(format_date(d)))),
            Some(value) => Err(PdfError::TypeMismatch {
                expected: "String",
                found: value.type_name(),
            }),
        }
    }

    pub fn get_date_time(&self, key: &str, xref: &XrefTable) -> Result<Option<DateTime<FixedOffset>>> {
        match self.resolved(key, xref)? {
            None => Ok(None),
            Some(Object::Date(d)) => Ok(Some(*d)),
            Some(Object::String(s)) => parse_date(&s.to_string_lossy()).map(Some),
            Some(value) => Err(PdfError::TypeMismatch {
                expected: "Date",
                found: value.type_name(),
            }),
        }
    }

    pub fn get_rectangle(&self, key: &str, xref: &XrefTable) -> Result<Option<Rectangle>> {
        match self.resolved(key, xref)? {
            None => Ok(None),
            Some(value) => Rectangle::from_object(value, xref).map(Some),
        }
    }

    pub fn get_matrix(&self, key: &str, xref: &XrefTable) -> Result<Option<Matrix>> {
        match self.resolved(key, xref)? {
            None => Ok(None),
            Some(value) => Matrix::from_object(value, xref).map(Some),
        }
    }

    pub fn set_integer(&mut self, key: &str, value: i64) {
        self.set(key, value);
    }

    pub fn set_real(&mut self, key: &str, value: f64) {
        self.set(key, value);
    }

    pub fn set_boolean(&mut self, key: &str, value: bool) {
        self.set(key, value);
    }

    pub fn set_name(&mut self, key: &str, value: &str) {
        self.set(key, Name::adjusted(value));
    }

    pub fn set_string(&mut self, key: &str, value: impl Into<PdfString>) {
        self.set(key, value.into());
    }

    pub fn set_date_time(&mut self, key: &str, value: DateTime<FixedOffset>) {
        self.set(key, value);
    }

    pub fn set_rectangle(&mut self, key: &str, value: Rectangle) {
        self.set(key, value.to_array());
    }

    pub fn set_matrix(&mut self, key: &str, value: Matrix) {
        self.set(key, value.to_array());
    }

    /// Central polymorphic accessor.
    ///
    /// Looks the key up through references. An absent key (or one resolving
    /// to the null sentinel) is populated per `create`: the key schema for
    /// `(self.kind(), key)` decides the concrete subtype to construct, and
    /// `ValueCreate::Indirect` registers the new value in the table. A
    /// present dictionary undergoes type transformation (one level deep,
    /// idempotent).
    ///
    /// The dictionary must be held outside the table for the duration of the
    /// call (reference mutation is an exclusive-writer operation); use
    /// [`XrefTable::update`] for table-held dictionaries.
    pub fn typed_value<'a>(
        &'a mut self,
        key: &str,
        create: ValueCreate,
        xref: &'a mut XrefTable,
    ) -> Result<Option<&'a mut Object>> {
        let name = Name::adjusted(key);
        let spec = schema::lookup(self.kind, &name);

        enum Slot {
            Absent,
            Indirect(crate::objects::ObjectId),
            Direct,
        }
        let slot = match self.entries.get(&name) {
            None | Some(Object::Null) => Slot::Absent,
            Some(Object::Reference(id)) => Slot::Indirect(*id),
            Some(_) => Slot::Direct,
        };

        match slot {
            Slot::Absent => {
                if create == ValueCreate::None {
                    return Ok(None);
                }
                let object = schema::construct(spec);
                if create == ValueCreate::Indirect {
                    let id = xref.add(object);
                    self.entries.insert(name, Object::Reference(id));
                    Ok(xref.get_mut(id))
                } else {
                    self.entries.insert(name.clone(), object);
                    Ok(self.entries.get_mut(&name))
                }
            }
            Slot::Indirect(id) => {
                let target_missing = match xref.get(id) {
                    None => true,
                    Some(target) => target.is_null(),
                };
                if target_missing {
                    if create == ValueCreate::None {
                        return Ok(None);
                    }
                    // Rebind the existing reference rather than renumbering.
                    xref.replace(id, schema::construct(spec));
                    return Ok(xref.get_mut(id));
                }
                let target = xref.get_mut(id).ok_or(PdfError::BrokenReference(id))?;
                apply_transformation(target, spec);
                Ok(Some(target))
            }
            Slot::Direct => {
                let value = self
                    .entries
                    .get_mut(&name)
                    .ok_or_else(|| PdfError::InvalidStructure("entry vanished".into()))?;
                apply_transformation(value, spec);
                Ok(Some(value))
            }
        }
    }

    /// Add to a key that holds either a single item or an array of items.
    ///
    /// The first value is stored directly; a second add wraps both into an
    /// array; further adds append.
    pub fn add_to_item_or_array(&mut self, key: &str, value: impl Into<Object>) {
        let name = Name::adjusted(key);
        let value = value.into();
        match self.entries.get_mut(&name) {
            None => {
                self.entries.insert(name, value);
            }
            Some(Object::Array(array)) => array.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, Object::Null);
                let mut array = Array::new();
                array.push(first);
                array.push(value);
                *existing = Object::Array(array);
            }
        }
    }

    /// Remove from a single-or-array key, maintaining the normalization
    /// rule: a 1-element array collapses back to the direct item, an emptied
    /// array drops the key. Returns whether anything was removed.
    pub fn remove_from_item_or_array(&mut self, key: &str, value: &Object) -> bool {
        let name = Name::adjusted(key);
        let Some(slot) = self.entries.get_mut(&name) else {
            return false;
        };
        if let Object::Array(array) = &mut *slot {
            let Some(position) = array.iter().position(|element| element == value) else {
                return false;
            };
            let _ = array.remove(position);
            if array.len() == 1 {
                if let Ok(only) = array.remove(0) {
                    *slot = only;
                }
            } else if array.is_empty() {
                self.entries.shift_remove(&name);
            }
            true
        } else if &*slot == value {
            self.entries.shift_remove(&name);
            true
        } else {
            false
        }
    }

    /// Attach or replace the stream, keeping `/Length` in sync.
    pub fn set_stream(&mut self, data: Vec<u8>) {
        self.set("Length", data.len() as i64);
        self.stream = Some(Stream::new(data));
    }

    pub fn stream(&self) -> Option<&Stream> {
        self.stream.as_ref()
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    pub fn take_stream(&mut self) -> Option<Vec<u8>> {
        let stream = self.stream.take()?;
        self.remove("Length");
        Some(stream.into_data())
    }

    pub(crate) fn sync_stream_length(&mut self) {
        if let Some(len) = self.stream.as_ref().map(Stream::len) {
            self.set("Length", len as i64);
        }
    }

    /// The unfiltered view of the stream bytes, applying the `/Filter`
    /// chain without mutating the stored raw bytes.
    pub fn unfiltered_data(&self, xref: &XrefTable) -> Result<Vec<u8>> {
        let stream = self.stream.as_ref().ok_or(PdfError::TypeMismatch {
            expected: "Stream",
            found: "Dictionary",
        })?;
        let filters = self.filter_names(xref)?;
        let params = self.decode_params(xref)?;
        let mut data = stream.data().to_vec();
        for (i, filter) in filters.iter().enumerate() {
            let filter_params = params.get(i).and_then(|p| p.as_ref());
            data = crate::filters::decode(filter.bare(), &data, filter_params)?;
        }
        Ok(data)
    }

    /// Compress the stream bytes in place with Flate, updating `/Filter`
    /// and `/Length`.
    #[cfg(feature = "compression")]
    pub fn compress_stream_flate(&mut self) -> Result<()> {
        let stream = self.stream.as_ref().ok_or(PdfError::TypeMismatch {
            expected: "Stream",
            found: "Dictionary",
        })?;
        let compressed = crate::filters::encode("FlateDecode", stream.data())?;
        self.set("Filter", Name::adjusted("FlateDecode"));
        self.set_stream(compressed);
        Ok(())
    }

    fn filter_names(&self, xref: &XrefTable) -> Result<Vec<Name>> {
        match self.resolved("Filter", xref)? {
            None => Ok(Vec::new()),
            Some(Object::Name(name)) => Ok(vec![name.clone()]),
            Some(Object::Array(array)) => {
                let mut names = Vec::with_capacity(array.len());
                for i in 0..array.len() {
                    names.push(array.get_name(i, xref)?);
                }
                Ok(names)
            }
            Some(other) => Err(PdfError::InvalidFormat(format!(
                "filter entry must be a name or array of names, found {}",
                other.type_name()
            ))),
        }
    }

    fn decode_params(&self, xref: &XrefTable) -> Result<Vec<Option<Dictionary>>> {
        match self.resolved("DecodeParms", xref)? {
            None => Ok(Vec::new()),
            Some(Object::Dictionary(dict)) => Ok(vec![Some(dict.clone())]),
            Some(Object::Array(array)) => {
                let mut params = Vec::with_capacity(array.len());
                for i in 0..array.len() {
                    match array.resolved(i, xref)? {
                        Object::Dictionary(dict) => params.push(Some(dict.clone())),
                        _ => params.push(None),
                    }
                }
                Ok(params)
            }
            Some(_) => Ok(Vec::new()),
        }
    }

    pub(crate) fn write_value<W: Write>(&self, w: &mut W, options: &SerializeOptions) -> Result<()> {
        w.write_all(b"<<")?;
        for (key, value) in &self.entries {
            w.write_all(b" ")?;
            key.write_token(w)?;
            w.write_all(b" ")?;
            value.write_value(w, options)?;
        }
        w.write_all(b" >>")?;

        if let Some(stream) = &self.stream {
            let declared = self.get("Length").and_then(Object::as_integer);
            if declared != Some(stream.len() as i64) {
                return Err(PdfError::InvalidStructure(format!(
                    "stream /Length {declared:?} does not match {} raw bytes",
                    stream.len()
                )));
            }
            w.write_all(b"\nstream\n")?;
            w.write_all(stream.data())?;
            w.write_all(b"\nendstream")?;
        }
        Ok(())
    }
}

fn apply_transformation(value: &mut Object, spec: Option<KeySpec>) {
    let Some(KeySpec { expected }) = spec else {
        return;
    };
    if let (Expected::Dict(kind), Object::Dictionary(dict)) = (expected, value) {
        dict.transform(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(dict: &Dictionary) -> String {
        let mut buf = Vec::new();
        dict.write_value(&mut buf, &SerializeOptions::default()).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_set_and_get_integer() {
        let xref = XrefTable::new();
        let mut dict = Dictionary::new();
        dict.set("Count", 5);
        assert_eq!(dict.get_integer("/Count", &xref).unwrap(), 5);
    }

    #[test]
    fn test_bare_and_prefixed_keys_are_the_same() {
        let mut dict = Dictionary::new();
        dict.set("Count", 1);
        assert!(dict.contains_key("/Count"));
        dict.set("/Count", 2);
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("Count"), Some(&Object::Integer(2)));
    }

    #[test]
    fn test_absent_keys_default() {
        let xref = XrefTable::new();
        let dict = Dictionary::new();
        assert_eq!(dict.get_integer("/Missing", &xref).unwrap(), 0);
        assert_eq!(dict.get_real("/Missing", &xref).unwrap(), 0.0);
        assert!(!dict.get_boolean("/Missing", &xref).unwrap());
        assert!(dict.get_name("/Missing", &xref).unwrap().is_none());
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let xref = XrefTable::new();
        let mut dict = Dictionary::new();
        dict.set("Count", "five");
        assert!(matches!(
            dict.get_integer("/Count", &xref),
            Err(PdfError::TypeMismatch { expected: "Integer", .. })
        ));
    }

    #[test]
    fn test_get_real_coerces_integer() {
        let xref = XrefTable::new();
        let mut dict = Dictionary::new();
        dict.set("V", 3);
        assert_eq!(dict.get_real("/V", &xref).unwrap(), 3.0);
    }

    #[test]
    fn test_getter_dereferences_transparently() {
        let mut xref = XrefTable::new();
        let id = xref.add(Object::Integer(42));
        let mut dict = Dictionary::new();
        dict.set("Answer", id);
        assert_eq!(dict.get_integer("/Answer", &xref).unwrap(), 42);
    }

    #[test]
    fn test_reference_to_null_treated_as_missing() {
        let mut xref = XrefTable::new();
        let id = xref.add(Object::Null);
        let mut dict = Dictionary::new();
        dict.set("Gone", id);
        assert_eq!(dict.get_integer("/Gone", &xref).unwrap(), 0);
    }

    #[test]
    fn test_get_rectangle() {
        let xref = XrefTable::new();
        let mut dict = Dictionary::new();
        dict.set_rectangle("MediaBox", Rectangle::new(0.0, 0.0, 595.0, 842.0));
        let rect = dict.get_rectangle("/MediaBox", &xref).unwrap().unwrap();
        assert_eq!(rect.width(), 595.0);
        assert_eq!(rect.height(), 842.0);
    }

    #[test]
    fn test_get_date_time_coerces_string() {
        let xref = XrefTable::new();
        let mut dict = Dictionary::new();
        dict.set_string("ModDate", "D:20240601120000+01'00'");
        let date = dict.get_date_time("/ModDate", &xref).unwrap().unwrap();
        assert_eq!(date.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn test_get_string_coerces_date() {
        use chrono::TimeZone;
        let xref = XrefTable::new();
        let date = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap();
        let mut dict = Dictionary::new();
        dict.set_date_time("CreationDate", date);
        let text = dict.get_string("/CreationDate", &xref).unwrap().unwrap();
        assert_eq!(text.to_string_lossy(), "D:20240101000000+00'00'");
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut dict = Dictionary::new();
        dict.set("B", 1);
        dict.set("A", 2);
        dict.set("C", 3);
        let keys: Vec<_> = dict.keys().map(|k| k.as_str().to_string()).collect();
        assert_eq!(keys, vec!["/B", "/A", "/C"]);
    }

    #[test]
    fn test_write_value() {
        let mut dict = Dictionary::new();
        dict.set_name("Type", "Catalog");
        dict.set("Count", 2);
        assert_eq!(token(&dict), "<< /Type /Catalog /Count 2 >>");
    }

    #[test]
    fn test_write_empty() {
        assert_eq!(token(&Dictionary::new()), "<< >>");
    }

    #[test]
    fn test_stream_length_kept_in_sync() {
        let mut dict = Dictionary::new();
        dict.set_stream(vec![1, 2, 3, 4, 5]);
        assert_eq!(dict.get("Length"), Some(&Object::Integer(5)));

        dict.set_stream(vec![9]);
        assert_eq!(dict.get("Length"), Some(&Object::Integer(1)));

        dict.take_stream();
        assert!(!dict.contains_key("Length"));
    }

    #[test]
    fn test_stream_token_layout() {
        let mut dict = Dictionary::new();
        dict.set_stream(b"BT ET".to_vec());
        let text = token(&dict);
        assert!(text.contains("/Length 5"));
        assert!(text.ends_with("stream\nBT ET\nendstream"));
    }

    #[test]
    fn test_stream_length_mismatch_fails_write() {
        let mut dict = Dictionary::new();
        dict.set_stream(b"data".to_vec());
        dict.set("Length", 999);
        let mut buf = Vec::new();
        assert!(matches!(
            dict.write_value(&mut buf, &SerializeOptions::default()),
            Err(PdfError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_item_or_array_add_and_collapse() {
        let mut dict = Dictionary::new();
        dict.add_to_item_or_array("Contents", Object::Integer(1));
        assert_eq!(dict.get("Contents"), Some(&Object::Integer(1)));

        dict.add_to_item_or_array("Contents", Object::Integer(2));
        let array = dict.get("Contents").and_then(Object::as_array).unwrap();
        assert_eq!(array.len(), 2);

        assert!(dict.remove_from_item_or_array("Contents", &Object::Integer(2)));
        // Collapsed back to the direct item, not a 1-element array.
        assert_eq!(dict.get("Contents"), Some(&Object::Integer(1)));
    }

    #[test]
    fn test_item_or_array_add_then_remove_restores_state() {
        let mut dict = Dictionary::new();
        dict.add_to_item_or_array("Annots", Object::Integer(1));
        let before = dict.clone();

        dict.add_to_item_or_array("Annots", Object::Integer(2));
        assert!(dict.remove_from_item_or_array("Annots", &Object::Integer(2)));
        assert_eq!(dict, before);
    }

    #[test]
    fn test_item_or_array_removing_only_item_drops_key() {
        let mut dict = Dictionary::new();
        dict.add_to_item_or_array("Annots", Object::Integer(1));
        assert!(dict.remove_from_item_or_array("Annots", &Object::Integer(1)));
        assert!(!dict.contains_key("Annots"));
    }

    #[test]
    fn test_item_or_array_remove_missing_value() {
        let mut dict = Dictionary::new();
        dict.add_to_item_or_array("Annots", Object::Integer(1));
        assert!(!dict.remove_from_item_or_array("Annots", &Object::Integer(9)));
        assert!(!dict.remove_from_item_or_array("Other", &Object::Integer(1)));
    }

    #[test]
    fn test_typed_value_creates_per_schema() {
        let mut xref = XrefTable::new();
        let mut catalog = Dictionary::of_kind(DictKind::Catalog);

        let value = catalog
            .typed_value("Pages", ValueCreate::Indirect, &mut xref)
            .unwrap()
            .unwrap();
        let pages = value.as_dict().unwrap();
        assert_eq!(pages.kind(), DictKind::Pages);

        // Stored as a reference, registered in the table.
        assert!(catalog.get("Pages").unwrap().as_reference().is_some());
        assert_eq!(xref.len(), 1);
    }

    #[test]
    fn test_typed_value_absent_without_creation() {
        let mut xref = XrefTable::new();
        let mut catalog = Dictionary::of_kind(DictKind::Catalog);
        let value = catalog
            .typed_value("Pages", ValueCreate::None, &mut xref)
            .unwrap();
        assert!(value.is_none());
        assert!(xref.is_empty());
    }

    #[test]
    fn test_typed_value_transformation_is_idempotent() {
        let mut xref = XrefTable::new();
        let mut catalog = Dictionary::of_kind(DictKind::Catalog);
        // A generic dictionary parked where the schema expects /Pages.
        catalog.set("Pages", Dictionary::new());

        let first = catalog
            .typed_value("Pages", ValueCreate::None, &mut xref)
            .unwrap()
            .unwrap()
            .as_dict()
            .unwrap()
            .kind();
        assert_eq!(first, DictKind::Pages);

        let second = catalog
            .typed_value("Pages", ValueCreate::None, &mut xref)
            .unwrap()
            .unwrap()
            .as_dict()
            .unwrap()
            .kind();
        assert_eq!(second, DictKind::Pages);
    }

    #[test]
    fn test_typed_value_preserves_element_storage() {
        let mut xref = XrefTable::new();
        let mut catalog = Dictionary::of_kind(DictKind::Catalog);
        let mut generic = Dictionary::new();
        generic.set("Count", 3);
        catalog.set("Pages", generic);

        let pages = catalog
            .typed_value("Pages", ValueCreate::None, &mut xref)
            .unwrap()
            .unwrap()
            .as_dict()
            .unwrap();
        assert_eq!(pages.kind(), DictKind::Pages);
        assert_eq!(pages.get("Count"), Some(&Object::Integer(3)));
    }

    #[test]
    fn test_typed_value_rebinds_dangling_reference() {
        let mut xref = XrefTable::new();
        let id = xref.add(Object::Null);
        let mut catalog = Dictionary::of_kind(DictKind::Catalog);
        catalog.set("Pages", id);

        let value = catalog
            .typed_value("Pages", ValueCreate::Direct, &mut xref)
            .unwrap()
            .unwrap();
        assert_eq!(value.as_dict().unwrap().kind(), DictKind::Pages);
        // The existing reference was rebound in place.
        assert_eq!(catalog.get("Pages").unwrap().as_reference(), Some(id));
    }
}
