//! Key schemas for dictionary subtypes.
//!
//! Each dictionary carries a [`DictKind`] tag. The registry below maps
//! `(kind, key)` pairs to the value shape expected under that key; the
//! schema drives both on-demand construction of absent values and type
//! transformation of generic dictionaries found where a specific subtype
//! belongs (see `Dictionary::typed_value`).

use crate::geometry::Rectangle;
use crate::objects::{Array, Dictionary, Name, Object};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// The declaring subtype of a dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DictKind {
    #[default]
    Generic,
    Trailer,
    Catalog,
    Pages,
    Page,
    Resources,
    Font,
    FontDescriptor,
    ExtGState,
    Annotation,
    Outlines,
    AcroForm,
    Names,
    Info,
}

/// The value shape a schema entry expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Dict(DictKind),
    Stream,
    Array,
    Rectangle,
    Integer,
}

#[derive(Debug, Clone, Copy)]
pub struct KeySpec {
    pub expected: Expected,
}

lazy_static! {
    static ref REGISTRY: HashMap<(DictKind, &'static str), KeySpec> = {
        use DictKind::*;
        use Expected::*;
        let entries: &[(DictKind, &str, Expected)] = &[
            (Trailer, "/Root", Dict(Catalog)),
            (Trailer, "/Info", Dict(Info)),
            (Catalog, "/Pages", Dict(Pages)),
            (Catalog, "/Outlines", Dict(Outlines)),
            (Catalog, "/Names", Dict(Names)),
            (Catalog, "/AcroForm", Dict(AcroForm)),
            (Pages, "/Kids", Array),
            (Pages, "/Count", Integer),
            (Pages, "/Parent", Dict(Pages)),
            (Pages, "/Resources", Dict(Resources)),
            (Pages, "/MediaBox", Rectangle),
            (Page, "/Parent", Dict(Pages)),
            (Page, "/Resources", Dict(Resources)),
            (Page, "/Contents", Stream),
            (Page, "/Annots", Array),
            (Page, "/MediaBox", Rectangle),
            (Page, "/CropBox", Rectangle),
            (Resources, "/Font", Dict(Generic)),
            (Resources, "/XObject", Dict(Generic)),
            (Resources, "/ExtGState", Dict(Generic)),
            (Resources, "/ProcSet", Array),
            (Font, "/FontDescriptor", Dict(FontDescriptor)),
            (Font, "/Widths", Array),
            (Font, "/FirstChar", Integer),
            (Font, "/LastChar", Integer),
            (Annotation, "/Rect", Rectangle),
            (Annotation, "/A", Dict(Generic)),
            (Outlines, "/First", Dict(Outlines)),
            (Outlines, "/Last", Dict(Outlines)),
            (Outlines, "/Parent", Dict(Outlines)),
            (Outlines, "/Count", Integer),
            (AcroForm, "/Fields", Array),
            (Names, "/Dests", Dict(Generic)),
        ];
        entries
            .iter()
            .map(|&(kind, key, expected)| ((kind, key), KeySpec { expected }))
            .collect()
    };
}

/// The schema entry for `key` under a dictionary of the given kind, if the
/// registry knows one.
pub fn lookup(kind: DictKind, key: &Name) -> Option<KeySpec> {
    REGISTRY.get(&(kind, key.as_str())).copied()
}

/// Build the value a schema entry mandates for an absent key. Keys the
/// registry does not know default to a generic dictionary.
pub(crate) fn construct(spec: Option<KeySpec>) -> Object {
    match spec.map(|s| s.expected) {
        Some(Expected::Dict(kind)) => Object::Dictionary(Dictionary::of_kind(kind)),
        Some(Expected::Stream) => {
            let mut dict = Dictionary::new();
            dict.set_stream(Vec::new());
            Object::Dictionary(dict)
        }
        Some(Expected::Array) => Object::Array(Array::new()),
        Some(Expected::Rectangle) => Object::Rectangle(Rectangle::new(0.0, 0.0, 0.0, 0.0)),
        Some(Expected::Integer) => Object::Integer(0),
        None => Object::Dictionary(Dictionary::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_key() {
        let spec = lookup(DictKind::Catalog, &Name::adjusted("Pages")).unwrap();
        assert_eq!(spec.expected, Expected::Dict(DictKind::Pages));
    }

    #[test]
    fn test_lookup_unknown_key() {
        assert!(lookup(DictKind::Catalog, &Name::adjusted("Nonsense")).is_none());
        assert!(lookup(DictKind::Generic, &Name::adjusted("Pages")).is_none());
    }

    #[test]
    fn test_construct_dict() {
        let spec = lookup(DictKind::Page, &Name::adjusted("Resources"));
        let value = construct(spec);
        assert_eq!(value.as_dict().unwrap().kind(), DictKind::Resources);
    }

    #[test]
    fn test_construct_stream_has_length() {
        let spec = lookup(DictKind::Page, &Name::adjusted("Contents"));
        let value = construct(spec);
        let dict = value.as_dict().unwrap();
        assert!(dict.has_stream());
        assert_eq!(dict.get("Length"), Some(&Object::Integer(0)));
    }

    #[test]
    fn test_construct_without_spec_is_generic_dict() {
        let value = construct(None);
        assert_eq!(value.as_dict().unwrap().kind(), DictKind::Generic);
    }
}
