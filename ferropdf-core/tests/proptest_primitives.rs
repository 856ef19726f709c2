//! Property-based tests for the object table and token serialization.

use ferropdf::{Dictionary, Name, Object, ObjectId, SerializeOptions, XrefTable};
use proptest::prelude::*;
use std::collections::BTreeSet;

prop_compose! {
    fn object_id_strategy()(
        number in 1u32..=0x7F_FFFFu32,
        generation in 0u16..=u16::MAX
    ) -> ObjectId {
        ObjectId::new(number, generation)
    }
}

fn token(object: &Object) -> String {
    let mut buf = Vec::new();
    object.write_value(&mut buf, &SerializeOptions::default()).unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

proptest! {
    #[test]
    fn prop_add_never_reuses_an_id(count in 1usize..200) {
        let mut xref = XrefTable::new();
        let mut seen = BTreeSet::new();
        for i in 0..count {
            let id = xref.add(Object::Integer(i as i64));
            prop_assert!(seen.insert(id), "id {id} handed out twice");
        }
        prop_assert_eq!(xref.len(), count);
    }

    #[test]
    fn prop_renumber_is_dense_from_one(ids in prop::collection::btree_set(object_id_strategy(), 1..60)) {
        let mut xref = XrefTable::new();
        for (i, id) in ids.iter().enumerate() {
            xref.insert(*id, Object::Integer(i as i64)).unwrap();
        }
        let mut trailer = Dictionary::new();
        xref.renumber(&mut trailer).unwrap();

        let numbers: Vec<u32> = xref.ids().map(|id| id.number()).collect();
        let expected: Vec<u32> = (1..=ids.len() as u32).collect();
        prop_assert_eq!(numbers, expected);
        prop_assert!(xref.ids().all(|id| id.generation() == 0));

        // Renumbering moves objects, never loses or duplicates them.
        let values: BTreeSet<i64> = xref
            .iter()
            .filter_map(|(_, o)| o.as_integer())
            .collect();
        prop_assert_eq!(values.len(), ids.len());
    }

    #[test]
    fn prop_renumber_preserves_reference_targets(count in 2usize..40) {
        let mut xref = XrefTable::new();
        for i in 0..count {
            xref.insert(ObjectId::new((i as u32 + 1) * 3, 0), Object::Integer(i as i64)).unwrap();
        }
        let holder = xref.add(Object::Reference(ObjectId::new(3, 0)));
        let mut trailer = Dictionary::new();
        trailer.set("Root", holder);
        xref.renumber(&mut trailer).unwrap();

        // Resolving through the rewritten trailer reference still lands on
        // the value the old id held.
        let target = xref.resolve(trailer.get("Root").unwrap()).unwrap();
        prop_assert_eq!(target, &Object::Integer(0));
    }

    #[test]
    fn prop_real_token_parses_back(value in -1.0e9f64..1.0e9f64) {
        let text = token(&Object::Real(value));
        let parsed: f64 = text.parse().unwrap();
        prop_assert!((parsed - value).abs() <= 1e-6 * value.abs().max(1.0));
        // Trailing zeros are trimmed.
        if text.contains('.') {
            prop_assert!(!text.ends_with('0') && !text.ends_with('.'));
        }
    }

    #[test]
    fn prop_integer_token_roundtrip(value in any::<i64>()) {
        let text = token(&Object::Integer(value));
        prop_assert_eq!(text.parse::<i64>().unwrap(), value);
    }

    #[test]
    fn prop_name_adjusted_is_idempotent(bare in "[a-zA-Z][a-zA-Z0-9]{0,30}") {
        let name = Name::adjusted(&bare);
        prop_assert_eq!(name.as_str(), format!("/{bare}"));
        prop_assert_eq!(Name::adjusted(name.as_str()), name);
    }

    #[test]
    fn prop_stream_length_tracks_bytes(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut dict = Dictionary::new();
        dict.set_stream(data.clone());
        prop_assert_eq!(dict.get("Length"), Some(&Object::Integer(data.len() as i64)));
    }

    #[test]
    fn prop_ascii_hex_roundtrip(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let encoded = ferropdf::filters::encode("ASCIIHexDecode", &data).unwrap();
        let decoded = ferropdf::filters::decode("ASCIIHexDecode", &encoded, None).unwrap();
        prop_assert_eq!(decoded, data);
    }
}
