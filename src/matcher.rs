//! Joins structural poles to their survey counterparts.
//!
//! A lookup of canonical pole id -> survey node is built once by scanning
//! every survey node; each structural pole is then joined through its own
//! canonicalized label. Matching failures degrade to an empty survey
//! side, never an error.

use crate::ident::{canonical_pole_id, PoleSource};
use crate::sources::{KatapultDoc, KatapultNode, SpidaDoc, SpidaPole};
use std::collections::HashMap;

/// Canonical pole id -> survey node.
pub struct PoleIndex<'a> {
    map: HashMap<String, KatapultNode<'a>>,
}

impl<'a> PoleIndex<'a> {
    /// Scans all survey nodes. Nodes without a resolvable pole number are
    /// skipped with a warning. When two nodes canonicalize to the same
    /// id the later one (in document order) wins; collisions are logged
    /// rather than silently absorbed.
    pub fn build(survey: &KatapultDoc<'a>) -> Self {
        let mut map: HashMap<String, KatapultNode<'a>> = HashMap::new();
        for node in survey.nodes() {
            let Some(raw) = node.pole_number() else {
                log::warn!("survey node {} has no pole number, skipping", node.id());
                continue;
            };
            let canonical = canonical_pole_id(&raw, PoleSource::Survey);
            if let Some(previous) = map.insert(canonical.clone(), node) {
                log::warn!(
                    "survey nodes {} and {} both canonicalize to {canonical}; keeping {}",
                    previous.id(),
                    node.id(),
                    node.id()
                );
            }
        }
        Self { map }
    }

    pub fn lookup(&self, canonical_id: &str) -> Option<&KatapultNode<'a>> {
        self.map.get(canonical_id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// One structural pole joined to its (possibly absent) survey node.
pub struct MatchedPole<'a> {
    pub spida: SpidaPole<'a>,
    pub canonical_id: String,
    pub survey: Option<KatapultNode<'a>>,
}

/// Pairs every structural pole with its survey counterpart, in document
/// order. Unmatched poles keep an empty survey side and are reported via
/// a warning.
pub fn match_poles<'a>(
    structural: &SpidaDoc<'a>,
    index: &PoleIndex<'a>,
) -> Vec<MatchedPole<'a>> {
    structural
        .poles()
        .map(|spida| {
            let canonical_id = canonical_pole_id(spida.label(), PoleSource::Structural);
            let survey = index.lookup(&canonical_id).copied();
            if survey.is_none() {
                log::warn!("no survey counterpart for pole {canonical_id}");
            }
            MatchedPole {
                spida,
                canonical_id,
                survey,
            }
        })
        .collect()
}
