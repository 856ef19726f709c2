//! The cross-reference table: owner of every indirect object.
//!
//! Containers never hold other indirect objects inline; they store
//! [`Object::Reference`] values and resolve them through the table. The
//! table is also where the save pipeline compacts unreachable objects and
//! renumbers the survivors into a dense sequence.

use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object, ObjectId};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Reference chains longer than this are treated as cyclic.
const MAX_REFERENCE_DEPTH: usize = 32;

static NULL_OBJECT: Object = Object::Null;

#[derive(Debug, Clone, Default)]
pub struct XrefTable {
    objects: BTreeMap<ObjectId, Object>,
    next_number: u32,
    revision: u64,
}

impl XrefTable {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            next_number: 1,
            revision: 0,
        }
    }

    /// A counter bumped whenever existing ids are invalidated, that is when
    /// objects are removed or the table is renumbered. Holders of cached ids
    /// ([`crate::import::Importer`]) compare revisions to detect staleness.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Register an object under a freshly allocated id (generation 0).
    pub fn add(&mut self, object: impl Into<Object>) -> ObjectId {
        let id = ObjectId::new(self.next_number, 0);
        self.next_number += 1;
        self.objects.insert(id, object.into());
        id
    }

    /// Register an object under an explicit id, refusing occupied slots.
    pub fn insert(&mut self, id: ObjectId, object: impl Into<Object>) -> Result<()> {
        if self.objects.contains_key(&id) {
            return Err(PdfError::DuplicateObject(id));
        }
        self.objects.insert(id, object.into());
        self.next_number = self.next_number.max(id.number() + 1);
        Ok(())
    }

    /// Register or overwrite, returning the previous occupant.
    pub fn replace(&mut self, id: ObjectId, object: impl Into<Object>) -> Option<Object> {
        self.next_number = self.next_number.max(id.number() + 1);
        self.objects.insert(id, object.into())
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<Object> {
        let removed = self.objects.remove(&id);
        if removed.is_some() {
            self.revision += 1;
        }
        removed
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut Object)> {
        self.objects.iter_mut().map(|(id, object)| (*id, object))
    }

    /// Dereference `value` until it is no longer a reference.
    ///
    /// Reads are tolerant: a reference to a missing object resolves to the
    /// null sentinel (with a warning) instead of failing, matching how
    /// damaged files are conventionally read. Chains longer than
    /// [`MAX_REFERENCE_DEPTH`] are reported as [`PdfError::ReferenceLimit`].
    pub fn resolve<'a>(&'a self, value: &'a Object) -> Result<&'a Object> {
        let mut current = value;
        for _ in 0..MAX_REFERENCE_DEPTH {
            match current {
                Object::Reference(id) => match self.objects.get(id) {
                    Some(target) => current = target,
                    None => {
                        tracing::warn!(%id, "reference to missing object resolves to null");
                        return Ok(&NULL_OBJECT);
                    }
                },
                _ => return Ok(current),
            }
        }
        Err(PdfError::ReferenceLimit)
    }

    /// Run a closure against a table-held dictionary with the table itself
    /// still available, as `Dictionary::typed_value` requires.
    ///
    /// The dictionary is taken out of its slot for the duration of the
    /// closure; the closure must not register a new object under `id`.
    pub fn update<R>(
        &mut self,
        id: ObjectId,
        f: impl FnOnce(&mut Dictionary, &mut XrefTable) -> Result<R>,
    ) -> Result<R> {
        let mut object = self.objects.remove(&id).ok_or(PdfError::BrokenReference(id))?;
        let result = match &mut object {
            Object::Dictionary(dict) => f(dict, self),
            other => Err(PdfError::TypeMismatch {
                expected: "Dictionary",
                found: other.type_name(),
            }),
        };
        self.objects.insert(id, object);
        result
    }

    /// Drop every object not reachable from the trailer, returning how many
    /// were removed.
    pub fn compact(&mut self, trailer: &Dictionary) -> usize {
        let mut roots = Vec::new();
        for (_, value) in trailer.iter() {
            collect_references(value, &mut roots);
        }

        let mut reachable: std::collections::HashSet<ObjectId> = std::collections::HashSet::new();
        let mut queue: VecDeque<ObjectId> = roots.into_iter().collect();
        while let Some(id) = queue.pop_front() {
            if !reachable.insert(id) {
                continue;
            }
            if let Some(object) = self.objects.get(&id) {
                let mut refs = Vec::new();
                collect_references(object, &mut refs);
                queue.extend(refs);
            }
        }

        let before = self.objects.len();
        self.objects.retain(|id, _| reachable.contains(id));
        let removed = before - self.objects.len();
        if removed > 0 {
            self.revision += 1;
            tracing::debug!(removed, remaining = self.objects.len(), "compacted object table");
        }
        removed
    }

    /// Renumber all objects into the dense sequence `1..=N` (generation 0),
    /// rewriting every reference held in the table and in `trailer`.
    ///
    /// A reference to an id the table does not hold is a structural fault
    /// at this point and reported as [`PdfError::BrokenReference`].
    pub fn renumber(&mut self, trailer: &mut Dictionary) -> Result<()> {
        let mut mapping: HashMap<ObjectId, ObjectId> = HashMap::with_capacity(self.objects.len());
        for (index, old) in self.objects.keys().enumerate() {
            mapping.insert(*old, ObjectId::new(index as u32 + 1, 0));
        }

        let old = std::mem::take(&mut self.objects);
        for (old_id, mut object) in old {
            rewrite_references(&mut object, &mapping)?;
            let new_id = mapping[&old_id];
            self.objects.insert(new_id, object);
        }
        self.next_number = self.objects.len() as u32 + 1;
        self.revision += 1;

        for (_, value) in trailer.iter_mut() {
            rewrite_references(value, &mapping)?;
        }
        Ok(())
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

fn rewrite_references(object: &mut Object, mapping: &HashMap<ObjectId, ObjectId>) -> Result<()> {
    match object {
        Object::Reference(id) => match mapping.get(id) {
            Some(new_id) => {
                *id = *new_id;
                Ok(())
            }
            None => Err(PdfError::BrokenReference(*id)),
        },
        Object::Array(array) => {
            for element in array.iter_mut() {
                rewrite_references(element, mapping)?;
            }
            Ok(())
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                rewrite_references(value, mapping)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
