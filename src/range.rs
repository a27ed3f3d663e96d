//! Volume-to-key-range enumeration: the spatial-query entry point of the crate.

use crate::key::{Key, SfcRange};
use crate::tet::{Tet, TetType};
use crate::types::{L_MAX, Point3f, TouchedAxes, VolumeBounds};

/// Above this volume (in grid units cubed) the bounds are recursively split
/// before level selection.
pub const VOLUME_HIERARCHICAL_SPLIT_THRESHOLD: f32 = 10_000.0;
/// Above this volume (combined with `EXTENT_ADAPTIVE_THRESHOLD`), level
/// selection targets a narrow band around the volume's natural level.
pub const VOLUME_ADAPTIVE_THRESHOLD: f32 = 1_000.0;
pub const EXTENT_ADAPTIVE_THRESHOLD: f32 = 10.0;
const HIERARCHICAL_SPLIT_MAX_DEPTH: u8 = 3;

fn length_at(level: u8) -> u32 {
    1u32 << (L_MAX - level)
}

/// The level whose cell length most closely matches `target`.
fn level_for_length(target: f32) -> u8 {
    let mut best_level = 0u8;
    let mut best_diff = f32::MAX;
    for level in 0..=L_MAX {
        let diff = (length_at(level) as f32 - target).abs();
        if diff < best_diff {
            best_diff = diff;
            best_level = level;
        }
    }
    best_level
}

fn cell_range(min: f32, max: f32, length: f32, max_cell: i64) -> (i64, i64) {
    let lo = (min / length).floor().max(0.0) as i64;
    let hi = (((max / length).ceil() as i64) - 1).clamp(lo, max_cell);
    (lo.min(max_cell), hi)
}

fn touched_axes(bounds: &VolumeBounds, level: u8) -> TouchedAxes {
    let length = length_at(level) as f32;
    let max_cell = (1i64 << level) - 1;
    let (lo_x, hi_x) = cell_range(bounds.min.x, bounds.max.x, length, max_cell);
    let (lo_y, hi_y) = cell_range(bounds.min.y, bounds.max.y, length, max_cell);
    let (lo_z, hi_z) = cell_range(bounds.min.z, bounds.max.z, length, max_cell);
    let mut axes = TouchedAxes::empty();
    if hi_x > lo_x {
        axes |= TouchedAxes::X;
    }
    if hi_y > lo_y {
        axes |= TouchedAxes::Y;
    }
    if hi_z > lo_z {
        axes |= TouchedAxes::Z;
    }
    axes
}

fn hierarchical_split(bounds: VolumeBounds, depth: u8) -> Vec<VolumeBounds> {
    if depth >= HIERARCHICAL_SPLIT_MAX_DEPTH || bounds.volume() <= VOLUME_HIERARCHICAL_SPLIT_THRESHOLD
    {
        return vec![bounds];
    }
    let extent = bounds.extent();
    let axis = if extent.x >= extent.y && extent.x >= extent.z {
        0
    } else if extent.y >= extent.z {
        1
    } else {
        2
    };
    let center = bounds.center();
    let mut lo_max = bounds.max;
    let mut hi_min = bounds.min;
    match axis {
        0 => {
            lo_max.x = center.x;
            hi_min.x = center.x;
        }
        1 => {
            lo_max.y = center.y;
            hi_min.y = center.y;
        }
        _ => {
            lo_max.z = center.z;
            hi_min.z = center.z;
        }
    }
    let lo = VolumeBounds::new(bounds.min, lo_max);
    let hi = VolumeBounds::new(hi_min, bounds.max);
    let mut out = hierarchical_split(lo, depth + 1);
    out.extend(hierarchical_split(hi, depth + 1));
    out
}

/// Levels to sweep for one (already-split) region, per the §4.8 strategy
/// selection: depth-aware adaptive for mid-sized volumes, a narrow basic
/// sweep otherwise.
fn levels_for_region(bounds: &VolumeBounds) -> Vec<u8> {
    let volume = bounds.volume();
    let max_extent = bounds.max_extent().max(1.0);

    if volume > VOLUME_ADAPTIVE_THRESHOLD && max_extent > EXTENT_ADAPTIVE_THRESHOLD {
        let optimal = level_for_length(max_extent);
        let lo = optimal.saturating_sub(1);
        let hi = (optimal + 2).min(L_MAX);
        (lo..=hi)
            .filter(|&level| {
                let length = length_at(level) as f32;
                if length > 8.0 * max_extent {
                    return false;
                }
                if length < max_extent / 16.0 && touched_axes(bounds, level).is_empty() {
                    return false;
                }
                true
            })
            .collect()
    } else {
        let min_contain = level_for_length(max_extent);
        let lo = min_contain.saturating_sub(2);
        let hi = (min_contain + 3).min(L_MAX);
        (lo..=hi).collect()
    }
}

fn regions_for(bounds: &VolumeBounds) -> Vec<VolumeBounds> {
    if bounds.volume() > VOLUME_HIERARCHICAL_SPLIT_THRESHOLD {
        hierarchical_split(*bounds, 0)
    } else {
        vec![*bounds]
    }
}

fn cell_keys(x_cell: i64, y_cell: i64, z_cell: i64, level: u8, bounds: &VolumeBounds, include_intersecting: bool) -> Vec<Key> {
    let length = length_at(level);
    let x = x_cell as u32 * length;
    let y = y_cell as u32 * length;
    let z = z_cell as u32 * length;

    let mut out = Vec::with_capacity(6);
    for kind in 0u8..6 {
        let kind = TetType::try_from(kind).expect("0..6 is always a valid TetType");
        let tet = Tet::new_unchecked(x, y, z, level, kind);
        let passes = if include_intersecting {
            tet.aabb_intersect(bounds)
        } else {
            tet.aabb_contains(bounds)
        };
        if passes {
            out.push(tet.tm_index(None));
        }
    }
    out
}

fn enumerate_keys(bounds: &VolumeBounds, include_intersecting: bool) -> Vec<Key> {
    let mut keys = Vec::new();
    for region in regions_for(bounds) {
        for level in levels_for_region(&region) {
            let length = length_at(level) as f32;
            let max_cell = (1i64 << level) - 1;
            let (lo_x, hi_x) = cell_range(region.min.x, region.max.x, length, max_cell);
            let (lo_y, hi_y) = cell_range(region.min.y, region.max.y, length, max_cell);
            let (lo_z, hi_z) = cell_range(region.min.z, region.max.z, length, max_cell);
            for x_cell in lo_x..=hi_x {
                for y_cell in lo_y..=hi_y {
                    for z_cell in lo_z..=hi_z {
                        keys.extend(cell_keys(x_cell, y_cell, z_cell, level, &region, include_intersecting));
                    }
                }
            }
        }
    }
    keys
}

fn merge_ranges(mut ranges: Vec<SfcRange>) -> Vec<SfcRange> {
    ranges.sort_by_key(|r| r.start);
    let mut out: Vec<SfcRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        if let Some(last) = out.last_mut() {
            if last.is_adjacent_to(&range) {
                *last = last.merge(&range);
                continue;
            }
        }
        out.push(range);
    }
    out
}

/// Keys for every tet fully contained within `bounds` (no partial cells).
#[must_use]
pub fn bounded_by(bounds: &VolumeBounds) -> impl Iterator<Item = Key> {
    enumerate_keys(bounds, false).into_iter()
}

/// Keys for every tet that at least touches `bounds`.
#[must_use]
pub fn bounding(bounds: &VolumeBounds) -> impl Iterator<Item = Key> {
    enumerate_keys(bounds, true).into_iter()
}

/// Merged ranges of tets fully contained in `bounds`.
#[must_use]
pub fn ranges_bounded_by(bounds: &VolumeBounds) -> Vec<SfcRange> {
    merge_ranges(enumerate_keys(bounds, false).into_iter().map(SfcRange::single).collect())
}

/// Merged ranges of tets that at least touch `bounds`.
#[must_use]
pub fn ranges_bounding(bounds: &VolumeBounds) -> Vec<SfcRange> {
    merge_ranges(enumerate_keys(bounds, true).into_iter().map(SfcRange::single).collect())
}

/// The first tet (in enumeration order, not sorted) that touches `bounds`.
#[must_use]
pub fn intersecting(bounds: &VolumeBounds) -> Option<Key> {
    bounding(bounds).next()
}

/// The key of the tet at `level` containing `point`, trying each of the six
/// types at that grid cell until one claims the point.
#[must_use]
pub fn enclosing(point: Point3f, level: u8) -> Option<Key> {
    let length = length_at(level);
    let cell = |v: f32| -> u32 { (v / length as f32).floor().max(0.0) as u32 * length };
    let x = cell(point.x);
    let y = cell(point.y);
    let z = cell(point.z);
    for kind in 0u8..6 {
        let kind = TetType::try_from(kind).expect("0..6 is always a valid TetType");
        let tet = Tet::new_unchecked(x, y, z, level, kind);
        if tet.contains_point(point) {
            return Some(tet.tm_index(None));
        }
    }
    None
}

/// The key of the coarsest single tet whose subdivision vertices fully
/// contain `bounds`, climbing from `L_MAX` toward the root.
#[must_use]
pub fn enclosing_bounds(bounds: &VolumeBounds) -> Key {
    let center = bounds.center();
    let mut level = L_MAX;
    let mut found = enclosing(center, level);
    while level > 0 {
        if let Some(key) = found {
            if let Ok(tet) = Tet::from_key(&key) {
                if tet.aabb_contains(bounds) {
                    return key;
                }
            }
        }
        level -= 1;
        found = enclosing(center, level);
    }
    Key::root()
}
