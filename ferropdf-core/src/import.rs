//! Cross-document import: deep-copying the transitive closure of an object
//! graph from one document's table into another's.

use crate::document::Document;
use crate::error::{PdfError, Result};
use crate::objects::{Object, ObjectId};
use std::collections::HashMap;

/// One-shot import of the closure rooted at `root`. For repeated imports
/// from the same source document use [`Importer`], which memoizes.
pub fn import_closure(dest: &mut Document, src: &Document, root: ObjectId) -> Result<ObjectId> {
    Importer::new().import(dest, src, root)
}

/// Memoization context for imports from one foreign document.
///
/// The source-to-destination id map persists across calls, so an object
/// shared between two imported subgraphs is cloned exactly once and both
/// clones reference it. One importer per source document; mixing sources
/// through a single importer would conflate their id spaces.
///
/// Saving the destination renumbers its table, which invalidates cached
/// destination ids. The importer tracks the table's revision and discards
/// its map when the revision has moved, so imports after a save clone the
/// closure afresh instead of wiring references to reassigned numbers.
#[derive(Debug, Default)]
pub struct Importer {
    mapping: HashMap<ObjectId, ObjectId>,
    dest_revision: Option<u64>,
}

impl Importer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The destination id a source object was cloned to, if it has been.
    pub fn imported(&self, src_id: ObjectId) -> Option<ObjectId> {
        self.mapping.get(&src_id).copied()
    }

    /// Deep-copy the closure of `root` from `src` into `dest`.
    ///
    /// Pass 1 clones every reachable indirect object not already imported,
    /// building up the id map. Pass 2 rewrites the references inside the
    /// new clones through the complete map; a source reference whose target
    /// the source table does not hold becomes `Null` (logged).
    pub fn import(&mut self, dest: &mut Document, src: &Document, root: ObjectId) -> Result<ObjectId> {
        if dest.is_read_only() {
            return Err(PdfError::ReadOnly);
        }
        if !src.xref().contains(root) {
            return Err(PdfError::BrokenReference(root));
        }

        let revision = dest.xref().revision();
        if self.dest_revision != Some(revision) {
            if self.dest_revision.is_some() && !self.mapping.is_empty() {
                tracing::debug!(
                    entries = self.mapping.len(),
                    "destination table changed since the last import; discarding clone map"
                );
            }
            self.mapping.clear();
            self.dest_revision = Some(revision);
        }

        if let Some(mapped) = self.mapping.get(&root) {
            return Ok(*mapped);
        }

        // Pass 1: clone the not-yet-imported part of the closure.
        let mut fresh = Vec::new();
        let mut stack = vec![root];
        while let Some(src_id) = stack.pop() {
            if self.mapping.contains_key(&src_id) {
                continue;
            }
            let Some(object) = src.xref().get(src_id) else {
                // Dangling in the source; pass 2 turns references to it
                // into null.
                continue;
            };
            let dest_id = dest.xref_mut().add(object.clone());
            self.mapping.insert(src_id, dest_id);
            fresh.push(dest_id);

            let mut refs = Vec::new();
            collect_references(object, &mut refs);
            stack.extend(refs);
        }

        // Pass 2: rewrite references inside the fresh clones only; earlier
        // imports were already rewritten.
        for dest_id in fresh {
            if let Some(object) = dest.xref_mut().get_mut(dest_id) {
                remap_references(object, &self.mapping);
            }
        }

        Ok(self.mapping[&root])
    }
}

fn collect_references(object: &Object, out: &mut Vec<ObjectId>) {
    match object {
        Object::Reference(id) => out.push(*id),
        Object::Array(array) => {
            for element in array.iter() {
                collect_references(element, out);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter() {
                collect_references(value, out);
            }
        }
        _ => {}
    }
}

fn remap_references(object: &mut Object, mapping: &HashMap<ObjectId, ObjectId>) {
    match object {
        Object::Reference(id) => match mapping.get(id) {
            Some(new_id) => *id = *new_id,
            None => {
                tracing::warn!(%id, "imported reference has no source target; nulled");
                *object = Object::Null;
            }
        },
        Object::Array(array) => {
            for element in array.iter_mut() {
                remap_references(element, mapping);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                remap_references(value, mapping);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Array, Dictionary};

    /// A source document holding a small shared graph:
    /// root1 -> shared, root2 -> shared, shared -> leaf.
    fn shared_graph() -> (Document, ObjectId, ObjectId, ObjectId) {
        let mut src = Document::new();
        let leaf = src.add_object(Object::Integer(7)).unwrap();

        let mut shared = Dictionary::new();
        shared.set("Leaf", leaf);
        let shared_id = src.add_object(shared).unwrap();

        let mut root1 = Dictionary::new();
        root1.set("Shared", shared_id);
        let root1_id = src.add_object(root1).unwrap();

        let mut root2 = Dictionary::new();
        let mut list = Array::new();
        list.push(shared_id);
        root2.set("Items", list);
        let root2_id = src.add_object(root2).unwrap();

        (src, root1_id, root2_id, shared_id)
    }

    #[test]
    fn test_import_clones_closure() {
        let (src, root1, _, _) = shared_graph();
        let mut dest = Document::new();
        let before = dest.xref().len();

        let new_root = import_closure(&mut dest, &src, root1).unwrap();

        // root1, shared, leaf.
        assert_eq!(dest.xref().len(), before + 3);
        let root = dest.get_object(new_root).and_then(Object::as_dict).unwrap();
        let shared_ref = root.get("Shared").unwrap().as_reference().unwrap();
        let shared = dest.get_object(shared_ref).and_then(Object::as_dict).unwrap();
        let leaf_ref = shared.get("Leaf").unwrap().as_reference().unwrap();
        assert_eq!(dest.get_object(leaf_ref), Some(&Object::Integer(7)));
    }

    #[test]
    fn test_import_rewrites_to_destination_ids() {
        let (src, root1, _, _) = shared_graph();
        let mut dest = Document::new();
        let new_root = import_closure(&mut dest, &src, root1).unwrap();

        let root = dest.get_object(new_root).and_then(Object::as_dict).unwrap();
        let shared_ref = root.get("Shared").unwrap().as_reference().unwrap();
        // The clone references the destination table and leads to the
        // shared dictionary's content, not back into the source id space.
        assert!(dest.xref().contains(shared_ref));
        let shared = dest.get_object(shared_ref).and_then(Object::as_dict).unwrap();
        let leaf_ref = shared.get("Leaf").unwrap().as_reference().unwrap();
        assert_eq!(dest.get_object(leaf_ref), Some(&Object::Integer(7)));
    }

    #[test]
    fn test_memoized_double_import_shares_clones() {
        let (src, root1, root2, shared_id) = shared_graph();
        let mut dest = Document::new();
        let mut importer = Importer::new();

        let new_root1 = importer.import(&mut dest, &src, root1).unwrap();
        let count_after_first = dest.xref().len();
        let new_root2 = importer.import(&mut dest, &src, root2).unwrap();

        // Second import adds only root2 itself; shared and leaf are reused.
        assert_eq!(dest.xref().len(), count_after_first + 1);

        let shared_via_1 = dest
            .get_object(new_root1)
            .and_then(Object::as_dict)
            .and_then(|d| d.get("Shared"))
            .and_then(Object::as_reference)
            .unwrap();
        let shared_via_2 = dest
            .get_object(new_root2)
            .and_then(Object::as_dict)
            .and_then(|d| d.get("Items"))
            .and_then(Object::as_array)
            .and_then(|a| a.get(0))
            .and_then(Object::as_reference)
            .unwrap();
        assert_eq!(shared_via_1, shared_via_2);
        assert_eq!(importer.imported(shared_id), Some(shared_via_1));
    }

    #[test]
    fn test_import_after_save_does_not_reuse_renumbered_ids() {
        let (src, root1, root2, _) = shared_graph();
        let mut dest = Document::new();
        let page = dest
            .add_page(crate::geometry::Rectangle::new(0.0, 0.0, 612.0, 792.0))
            .unwrap();
        let mut importer = Importer::new();

        let new_root1 = importer.import(&mut dest, &src, root1).unwrap();
        if let Some(Object::Dictionary(dict)) = dest.get_object_mut(page).unwrap() {
            dict.set("Piece", new_root1);
        }
        // Saving compacts and renumbers, reassigning every destination id.
        dest.to_bytes().unwrap();

        let new_root2 = importer.import(&mut dest, &src, root2).unwrap();
        let shared_ref = dest
            .get_object(new_root2)
            .and_then(Object::as_dict)
            .and_then(|d| d.get("Items"))
            .and_then(Object::as_array)
            .and_then(|a| a.get(0))
            .and_then(Object::as_reference)
            .unwrap();
        // The wired reference leads to a live clone of the shared
        // dictionary, not to whatever now occupies a pre-save number.
        let shared = dest.get_object(shared_ref).and_then(Object::as_dict).unwrap();
        let leaf_ref = shared.get("Leaf").unwrap().as_reference().unwrap();
        assert_eq!(dest.get_object(leaf_ref), Some(&Object::Integer(7)));
    }

    #[test]
    fn test_reimporting_same_root_is_a_lookup() {
        let (src, root1, _, _) = shared_graph();
        let mut dest = Document::new();
        let mut importer = Importer::new();

        let first = importer.import(&mut dest, &src, root1).unwrap();
        let count = dest.xref().len();
        let second = importer.import(&mut dest, &src, root1).unwrap();
        assert_eq!(first, second);
        assert_eq!(dest.xref().len(), count);
    }

    #[test]
    fn test_import_missing_root_fails() {
        let (src, ..) = shared_graph();
        let mut dest = Document::new();
        assert!(matches!(
            import_closure(&mut dest, &src, ObjectId::new(99, 0)),
            Err(PdfError::BrokenReference(_))
        ));
    }

    #[test]
    fn test_import_into_read_only_destination_fails() {
        let (src, root1, _, _) = shared_graph();
        let mut dest = Document::from_parts(
            "1.4",
            Dictionary::new(),
            crate::xref::XrefTable::new(),
        );
        assert!(matches!(
            import_closure(&mut dest, &src, root1),
            Err(PdfError::ReadOnly)
        ));
    }

    #[test]
    fn test_dangling_source_reference_becomes_null() {
        let mut src = Document::new();
        let mut root = Dictionary::new();
        root.set("Gone", ObjectId::new(500, 0));
        let root_id = src.add_object(root).unwrap();

        let mut dest = Document::new();
        let new_root = import_closure(&mut dest, &src, root_id).unwrap();
        let cloned = dest.get_object(new_root).and_then(Object::as_dict).unwrap();
        assert_eq!(cloned.get("Gone"), Some(&Object::Null));
    }
}
