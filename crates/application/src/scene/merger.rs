use domain::error::Result;
use domain::{DomainError, SceneDocument, SceneStore};
use std::path::Path;
use tracing::{info, warn};

/// Corresponding fixtures whose names differ; the merge still applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMismatch {
    pub position: usize,
    pub source: String,
    pub target: String,
}

impl std::fmt::Display for NameMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{}: '{}' merged onto '{}'",
            self.position, self.source, self.target
        )
    }
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub document: SceneDocument,
    pub name_mismatches: Vec<NameMismatch>,
}

/// What `merge_files` wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub fixtures: usize,
    pub name_mismatches: Vec<NameMismatch>,
}

/// Transfers discovered addresses onto the fixtures of an authored scene.
///
/// Fixtures correspond by position: the n-th fixture of the address
/// source's flattened sequence feeds the n-th fixture of the target's.
/// Any length mismatch, or a source fixture without an IPv4 address, is
/// rejected before anything is modified. Differing names are reported in
/// the outcome, not rejected.
pub struct SceneMerger;

impl SceneMerger {
    pub fn merge(source: &SceneDocument, target: &SceneDocument) -> Result<MergeOutcome> {
        let source_order = source.flattened_fixture_indices();
        let target_order = target.flattened_fixture_indices();

        if source_order.len() != target_order.len() {
            return Err(DomainError::Correspondence(format!(
                "address source has {} fixtures, target has {}",
                source_order.len(),
                target_order.len()
            )));
        }

        let mut pairs = Vec::with_capacity(source_order.len());
        for (position, (src_idx, dst_idx)) in source_order.iter().zip(&target_order).enumerate() {
            let src = source.fixture(*src_idx).ok_or_else(|| {
                DomainError::Correspondence(format!("source fixture #{position} missing"))
            })?;
            if src.first_ipv4().is_none() {
                return Err(DomainError::Correspondence(format!(
                    "source fixture #{position} '{}' carries no IPv4 address",
                    src.name
                )));
            }
            pairs.push((position, src, *dst_idx));
        }

        let mut merged = target.clone();
        let mut name_mismatches = Vec::new();
        for (position, src, dst_idx) in pairs {
            let Some(dst) = merged.fixture_mut(dst_idx) else {
                return Err(DomainError::Correspondence(format!(
                    "target fixture index {} missing",
                    dst_idx.0
                )));
            };
            if dst.name != src.name {
                warn!(position, source = %src.name, target = %dst.name, "Merging fixtures with different names");
                name_mismatches.push(NameMismatch {
                    position,
                    source: src.name.clone(),
                    target: dst.name.clone(),
                });
            }
            dst.adopt_network(src);
        }

        info!(
            fixtures = source_order.len(),
            name_mismatches = name_mismatches.len(),
            "Scene addresses merged"
        );
        Ok(MergeOutcome {
            document: merged,
            name_mismatches,
        })
    }

    /// Load both documents, merge, and write the result to `output`.
    pub fn merge_files(
        store: &dyn SceneStore,
        source: &Path,
        target: &Path,
        output: &Path,
    ) -> Result<MergeSummary> {
        let source_doc = store.load(source)?;
        let target_doc = store.load(target)?;
        let outcome = Self::merge(&source_doc, &target_doc)?;
        store.save(&outcome.document, output)?;
        Ok(MergeSummary {
            fixtures: outcome.document.flattened_fixture_indices().len(),
            name_mismatches: outcome.name_mismatches,
        })
    }
}
