use proptest::prelude::*;
use tetra_sfc::{Key, L_MAX, Tet, TetType};

/// Builds a valid, arbitrarily deep tet by descending from the root through
/// a sequence of Bey child indices. Every tet reachable this way satisfies
/// the crate's construction invariants by definition.
fn tet_from_path(path: &[u8]) -> Tet {
    let mut t = Tet::new_unchecked(0, 0, 0, 0, TetType::S0);
    for &idx in path {
        t = t.child(idx % 8).unwrap();
    }
    t
}

fn arb_path() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..8, 0..8)
}

proptest! {
    #[test]
    fn codec_round_trips(path in arb_path()) {
        let tet = tet_from_path(&path);
        let key = tet.tm_index(None);
        prop_assert_eq!(key.level(), tet.level());
        let decoded = Tet::from_key(&key).unwrap();
        prop_assert_eq!(decoded, tet);
    }

    #[test]
    fn key_decode_encode_round_trips(path in arb_path()) {
        let tet = tet_from_path(&path);
        let key = tet.tm_index(None);
        let decoded = Tet::from_key(&key).unwrap();
        prop_assert_eq!(decoded.tm_index(None), key);
    }

    #[test]
    fn parent_of_child_is_identity(path in arb_path(), child_idx in 0u8..8) {
        let parent = tet_from_path(&path);
        if parent.level() < L_MAX {
            let child = parent.child(child_idx).unwrap();
            prop_assert_eq!(child.parent(None).unwrap(), parent);
        }
    }

    #[test]
    fn child_vertices_lie_within_parent_cell(path in arb_path(), child_idx in 0u8..8) {
        let parent = tet_from_path(&path);
        if parent.level() < L_MAX {
            let child = parent.child(child_idx).unwrap();
            for v in child.vertices_subdivision() {
                prop_assert!(parent.contains_point(v));
            }
        }
    }

    #[test]
    fn ordering_is_consistent_with_u128_value(path_a in arb_path(), path_b in arb_path()) {
        let a = tet_from_path(&path_a);
        let b = tet_from_path(&path_b);
        if a.level() == b.level() {
            let ka = a.tm_index(None);
            let kb = b.tm_index(None);
            prop_assert_eq!(ka.cmp(&kb), ka.as_u128().cmp(&kb.as_u128()));
        }
    }

}

#[test]
fn key_level_from_raw_of_zero_is_root() {
    assert_eq!(Key::level_from_raw(0, None), 0);
}
