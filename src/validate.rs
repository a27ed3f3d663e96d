//! Family recognition and the diagnostic tree validator.

use crate::key::Key;
use crate::tet::Tet;

/// A family is the 8 children of one parent, each a distinct child index.
#[must_use]
pub fn is_family(tets: &[Tet]) -> bool {
    if tets.len() != 8 {
        return false;
    }
    let level = tets[0].level();
    if level == 0 || tets.iter().any(|t| t.level() != level) {
        return false;
    }
    let Ok(parent) = tets[0].parent(None) else {
        return false;
    };
    if tets.iter().any(|t| t.parent(None).map(|p| p != parent).unwrap_or(true)) {
        return false;
    }
    let mut seen = [false; 8];
    for t in tets {
        let Ok(idx) = t.child_index_under_parent() else {
            return false;
        };
        if seen[idx as usize] {
            return false;
        }
        seen[idx as usize] = true;
    }
    seen.iter().all(|&s| s)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFinding {
    InvalidTet { key: Key, detail: String },
    OrphanTet { key: Key },
    SfcOrderViolation { first: Key, second: Key },
    InvalidFaceNeighborClaim { key: Key, face: u8 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub findings: Vec<ValidationFinding>,
    pub level_counts: Vec<(u8, usize)>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Diagnostic-only checker over a set of keys: not part of any hot path,
/// and safe to disable entirely in release builds.
pub struct Validator {
    enabled: bool,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    /// Checks the given keys for decodability, orphaned parents (relative to
    /// the same set), and SFC ordering; reports per-level counts.
    pub fn validate(&self, keys: &[Key]) -> ValidationReport {
        let mut report = ValidationReport::default();
        if !self.enabled {
            return report;
        }

        let mut tets = Vec::with_capacity(keys.len());
        for &key in keys {
            match Tet::from_key(&key) {
                Ok(tet) => tets.push((key, tet)),
                Err(err) => {
                    log::warn!("invalid key {key:?}: {err}");
                    report.findings.push(ValidationFinding::InvalidTet {
                        key,
                        detail: err.to_string(),
                    });
                }
            }
        }

        let present: std::collections::HashMap<Key, Tet> =
            tets.iter().map(|(k, t)| (*k, *t)).collect();
        for (key, tet) in &tets {
            if tet.level() > 0 {
                if let Ok(parent) = tet.parent(None) {
                    let parent_key = parent.tm_index(None);
                    if !present.contains_key(&parent_key) {
                        log::warn!("orphan tet {key:?}: parent {parent_key:?} not present");
                        report
                            .findings
                            .push(ValidationFinding::OrphanTet { key: *key });
                    }
                }
            }
            for face in 0u8..4 {
                let Some(neighbor) = tet.face_neighbor(face) else {
                    continue;
                };
                let neighbor_key = neighbor.tet.tm_index(None);
                let Some(&other) = present.get(&neighbor_key) else {
                    continue;
                };
                let reciprocates = other
                    .face_neighbor(neighbor.face)
                    .is_some_and(|back| back.tet == *tet);
                if !reciprocates {
                    log::warn!("face-neighbor claim {key:?} face {face} does not reciprocate");
                    report
                        .findings
                        .push(ValidationFinding::InvalidFaceNeighborClaim { key: *key, face });
                }
            }
        }

        for pair in tets.windows(2) {
            let (first, _) = pair[0];
            let (second, _) = pair[1];
            if second < first {
                log::warn!("sfc order violation: {first:?} before {second:?}");
                report
                    .findings
                    .push(ValidationFinding::SfcOrderViolation { first, second });
            }
        }

        let mut counts = std::collections::BTreeMap::new();
        for (_, tet) in &tets {
            *counts.entry(tet.level()).or_insert(0usize) += 1;
        }
        report.level_counts = counts.into_iter().collect();
        log::debug!("validated {} keys, {} findings", keys.len(), report.findings.len());
        report
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
