//! Encoding between `Tet` values and their TM-keys.

use crate::cache::LevelCache;
use crate::connectivity::CONNECTIVITY;
use crate::error::{Result, TetraError};
use crate::key::{BITS_PER_LEVEL, COMPACT_LEVELS, Key};
use crate::tet::{Tet, TetType};
use crate::types::L_MAX;

impl Tet {
    /// Encode this tet as its TM-key, optionally consulting and populating
    /// a level cache for the ancestor-type walk.
    #[must_use]
    pub fn tm_index(&self, cache: Option<&LevelCache>) -> Key {
        if self.level() == 0 {
            return Key::root();
        }
        if let Some(cache) = cache {
            if let Some(key) = cache.get_key(*self) {
                return key;
            }
        }

        let types = ancestor_type_chain(self);

        let mut low: u64 = 0;
        let mut high: u64 = 0;
        for i in 0..self.level() as u32 {
            let ancestor_level = (i + 1) as u8;
            let cube_id = self.cube_id_at(ancestor_level);
            let type_i: u8 = types[i as usize].into();
            let slot = ((cube_id as u64) << 3) | (type_i as u64);
            if i < COMPACT_LEVELS as u32 {
                low |= slot << (BITS_PER_LEVEL * i);
            } else {
                high |= slot << (BITS_PER_LEVEL * (i - COMPACT_LEVELS as u32));
            }
        }

        let key = if self.level() <= COMPACT_LEVELS {
            Key::compact(self.level(), low)
        } else {
            Key::extended(self.level(), low, high)
        };

        if let Some(cache) = cache {
            cache.put_key(*self, key);
        }
        key
    }

    /// Decode a TM-key back into the tet it represents.
    pub fn from_key(key: &Key) -> Result<Tet> {
        if !key.is_valid() {
            return Err(TetraError::LevelOutOfRange(key.level()));
        }
        if key.level() == 0 {
            return Ok(Tet::new_unchecked(0, 0, 0, 0, TetType::S0));
        }

        let mut x: u32 = 0;
        let mut y: u32 = 0;
        let mut z: u32 = 0;
        let mut final_type = TetType::S0;

        for i in 0..key.level() as u32 {
            let slot = if i < COMPACT_LEVELS as u32 {
                (key.low() >> (BITS_PER_LEVEL * i)) & 0x3f
            } else {
                (key.high() >> (BITS_PER_LEVEL * (i - COMPACT_LEVELS as u32))) & 0x3f
            };
            let type_i = (slot & 0x7) as u8;
            let cube_bits = ((slot >> 3) & 0x7) as u8;
            let ancestor_level = (i + 1) as u8;
            let shift = L_MAX - ancestor_level;
            x |= ((cube_bits & 1) as u32) << shift;
            y |= (((cube_bits >> 1) & 1) as u32) << shift;
            z |= (((cube_bits >> 2) & 1) as u32) << shift;
            final_type = TetType::try_from(type_i).map_err(|_| TetraError::TypeOutOfRange(type_i))?;
        }

        Ok(Tet::new_unchecked(x, y, z, key.level(), final_type))
    }
}

/// The type of the ancestor at each level from 1 to `tet.level()`, indexed
/// `[level - 1]`.
fn ancestor_type_chain(tet: &Tet) -> Vec<TetType> {
    let mut types = vec![TetType::S0; tet.level() as usize];
    let mut kind = tet.kind();
    let mut level = tet.level();
    types[(level - 1) as usize] = kind;
    while level > 1 {
        let cube_id = tet.cube_id_at(level);
        let kind_u8: u8 = kind.into();
        kind = TetType::try_from(
            CONNECTIVITY.cube_id_type_to_parent_type[cube_id as usize][kind_u8 as usize],
        )
        .expect("connectivity tables only ever store valid types");
        level -= 1;
        types[(level - 1) as usize] = kind;
    }
    types
}

impl Key {
    /// Build a key from its raw parts and decode it directly, the
    /// `Key`-side mirror of `Tet::from_key`.
    pub fn decode(level: u8, low: u64, high: u64) -> Result<Tet> {
        let key = if level <= COMPACT_LEVELS {
            Key::compact(level, low)
        } else {
            Key::extended(level, low, high)
        };
        Tet::from_key(&key)
    }

    /// Recover the level implied by a packed consecutive index (3 bits per
    /// level, least-significant group = deepest level). Assumes the
    /// shallowest populated group is the true start of the chain; a raw
    /// index whose deepest populated groups happen to be zero cannot be
    /// told apart from a shallower tet by this helper alone. Optionally
    /// consults and populates a level cache, since the same raw index tends
    /// to be re-decoded along a hot traversal path.
    #[must_use]
    pub fn level_from_raw(index: u64, cache: Option<&LevelCache>) -> u8 {
        if let Some(cache) = cache {
            if let Some(level) = cache.get_level_from_raw(index) {
                return level;
            }
        }

        let mut v = index;
        let mut level = 0u8;
        while v != 0 {
            level += 1;
            v >>= 3;
        }

        if let Some(cache) = cache {
            cache.put_level_from_raw(index, level);
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_round_trips() {
        let root = Tet::new_unchecked(0, 0, 0, 0, TetType::S0);
        let key = root.tm_index(None);
        assert_eq!(key, Key::root());
        assert_eq!(Tet::from_key(&key).unwrap(), root);
    }

    #[test]
    fn level_one_child_round_trips() {
        let length = 1u32 << (L_MAX - 1);
        for kind in 0u8..6 {
            let kind = TetType::try_from(kind).unwrap();
            for &(x, y, z) in &[(0, 0, 0), (length, 0, 0), (0, length, 0), (length, length, length)] {
                let tet = Tet::new_unchecked(x, y, z, 1, kind);
                let key = tet.tm_index(None);
                assert_eq!(key.level(), 1);
                let decoded = Tet::from_key(&key).unwrap();
                assert_eq!(decoded, tet);
            }
        }
    }

    #[test]
    fn key_decode_matches_from_key() {
        let tet = Tet::new_unchecked(0, 0, 0, 0, TetType::S0).child(2).unwrap();
        let key = tet.tm_index(None);
        let decoded = Key::decode(key.level(), key.low(), key.high()).unwrap();
        assert_eq!(decoded, tet);
    }

    #[test]
    fn deep_key_round_trips_through_extended_word() {
        // Build a tet 12 levels deep by always taking Bey child 0, which
        // keeps the anchor fixed at the origin and exercises the high64 spill.
        let mut tet = Tet::new_unchecked(0, 0, 0, 0, TetType::S0);
        for _ in 0..12 {
            tet = tet.child(0).unwrap();
        }
        let key = tet.tm_index(None);
        assert_eq!(key.level(), 12);
        assert_eq!(Tet::from_key(&key).unwrap(), tet);
    }
}
