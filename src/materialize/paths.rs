//! Section path materialization
//!
//! Roots get their own name as path. Every other node gets its parent's path
//! followed by [`PATH_SEPARATOR`] and its own name, per language. A node whose
//! parent is not in the forest is treated as a root. A node without a name in
//! one language borrows the other language's name.

use std::collections::HashMap;

use serde::Serialize;

use super::errors::{MaterializeError, MaterializeResult};
use crate::model::{Section, SectionPath, PATH_SEPARATOR};
use crate::observability::{MetricsRegistry, ObservationScope};
use crate::store::CorpusStore;

/// Outcome of one rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RebuildReport {
    pub sections: usize,
    pub paths_written: usize,
}

/// Rebuilds the materialized path table
pub struct SectionPathMaterializer;

impl SectionPathMaterializer {
    /// Computes every section's path. Fails if the forest has a cycle.
    pub fn compute(sections: &[Section]) -> MaterializeResult<Vec<SectionPath>> {
        let by_id: HashMap<u64, &Section> = sections.iter().map(|s| (s.id, s)).collect();
        let mut done: HashMap<u64, (String, String)> = HashMap::with_capacity(sections.len());

        for section in sections {
            if done.contains_key(&section.id) {
                continue;
            }

            // walk up until a root or an already computed ancestor
            let mut chain = vec![section.id];
            let mut cursor = section.parent_id;
            while let Some(parent_id) = cursor {
                if done.contains_key(&parent_id) {
                    break;
                }
                let Some(parent) = by_id.get(&parent_id) else {
                    break;
                };
                if chain.contains(&parent_id) {
                    return Err(MaterializeError::cycle(parent_id));
                }
                chain.push(parent_id);
                cursor = parent.parent_id;
            }

            // then fill paths back down
            for id in chain.into_iter().rev() {
                let node = by_id[&id];
                let (name_en, name_de) = Self::names(node);
                let parent = node.parent_id.and_then(|p| done.get(&p));
                let paths = match parent {
                    Some((parent_en, parent_de)) => (
                        format!("{}{}{}", parent_en, PATH_SEPARATOR, name_en),
                        format!("{}{}{}", parent_de, PATH_SEPARATOR, name_de),
                    ),
                    None => (name_en.to_string(), name_de.to_string()),
                };
                done.insert(id, paths);
            }
        }

        let mut paths: Vec<SectionPath> = done
            .into_iter()
            .map(|(id, (path_en, path_de))| SectionPath {
                id,
                path_en,
                path_de,
            })
            .collect();
        paths.sort_by_key(|p| p.id);
        Ok(paths)
    }

    /// Segment names per language, each falling back to the other.
    /// Blank names count as missing.
    fn names(section: &Section) -> (&str, &str) {
        fn present(name: &Option<String>) -> Option<&str> {
            name.as_deref().filter(|n| !n.trim().is_empty())
        }
        let (en, de) = (present(&section.name_english), present(&section.name));
        (en.or(de).unwrap_or(""), de.or(en).unwrap_or(""))
    }

    /// Full, idempotent rebuild.
    ///
    /// Reads the forest, computes outside any lock, then replaces the path
    /// table in one write.
    pub async fn rebuild<S: CorpusStore>(
        store: &S,
        metrics: &MetricsRegistry,
    ) -> MaterializeResult<RebuildReport> {
        let scope = ObservationScope::new("SECTION_PATHS_REBUILD");

        let sections = match store.load_sections().await {
            Ok(sections) => sections,
            Err(err) => {
                scope.fail(&err.to_string());
                return Err(err.into());
            }
        };
        let paths = match Self::compute(&sections) {
            Ok(paths) => paths,
            Err(err) => {
                scope.fail(err.message());
                return Err(err);
            }
        };
        let written = match store.replace_section_paths(paths).await {
            Ok(written) => written,
            Err(err) => {
                scope.fail(&err.to_string());
                return Err(err.into());
            }
        };

        metrics.increment_path_rebuilds();
        metrics.add_paths_written(written as u64);
        let sections_count = sections.len().to_string();
        let written_count = written.to_string();
        scope.complete_with_fields(&[
            ("sections", sections_count.as_str()),
            ("written", written_count.as_str()),
        ]);

        Ok(RebuildReport {
            sections: sections.len(),
            paths_written: written,
        })
    }

    /// Rebuilds only if the store reports stale paths
    pub async fn rebuild_if_stale<S: CorpusStore>(
        store: &S,
        metrics: &MetricsRegistry,
    ) -> MaterializeResult<Option<RebuildReport>> {
        if !store.section_paths_stale().await? {
            return Ok(None);
        }
        Self::rebuild(store, metrics).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CorpusTables, MemoryCorpus};

    fn path_of(paths: &[SectionPath], id: u64) -> &SectionPath {
        paths.iter().find(|p| p.id == id).unwrap()
    }

    #[test]
    fn test_three_level_path() {
        let sections = vec![
            Section::new(3, Some(2), "Jahr 1", "Year 1"),
            Section::new(1, None, "Informatik", "CS"),
            Section::new(2, Some(1), "Bachelor", "Bachelor"),
        ];
        let paths = SectionPathMaterializer::compute(&sections).unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(path_of(&paths, 3).path_en, "CS > Bachelor > Year 1");
        assert_eq!(path_of(&paths, 3).path_de, "Informatik > Bachelor > Jahr 1");
        assert_eq!(path_of(&paths, 1).path_en, "CS");
    }

    #[test]
    fn test_missing_names_fall_back() {
        let mut root = Section::new(1, None, "Informatik", "Computer Science");
        root.name_english = None;
        let mut leaf = Section::new(2, Some(1), "", "Electives");
        leaf.name = None;
        let paths = SectionPathMaterializer::compute(&[root, leaf]).unwrap();
        assert_eq!(path_of(&paths, 2).path_en, "Informatik > Electives");
        assert_eq!(path_of(&paths, 2).path_de, "Informatik > Electives");
    }

    #[test]
    fn test_blank_names_fall_back() {
        let root = Section::new(1, None, "Informatik", "  ");
        let leaf = Section::new(2, Some(1), "", "Electives");
        let paths = SectionPathMaterializer::compute(&[root, leaf]).unwrap();
        assert_eq!(path_of(&paths, 2).path_en, "Informatik > Electives");
        assert_eq!(path_of(&paths, 2).path_de, "Informatik > Electives");
        assert_eq!(path_of(&paths, 1).path_en, "Informatik");
    }

    #[test]
    fn test_dangling_parent_is_root() {
        let sections = vec![Section::new(5, Some(99), "Physik", "Physics")];
        let paths = SectionPathMaterializer::compute(&sections).unwrap();
        assert_eq!(path_of(&paths, 5).path_en, "Physics");
    }

    #[test]
    fn test_cycle_detected() {
        let sections = vec![
            Section::new(1, Some(2), "A", "A"),
            Section::new(2, Some(1), "B", "B"),
        ];
        let err = SectionPathMaterializer::compute(&sections).unwrap_err();
        assert!(err.section_id().is_some());

        let own_parent = vec![Section::new(1, Some(1), "A", "A")];
        assert!(SectionPathMaterializer::compute(&own_parent).is_err());
    }

    #[test]
    fn test_compute_is_idempotent() {
        let sections = vec![
            Section::new(1, None, "Informatik", "CS"),
            Section::new(2, Some(1), "Bachelor", "Bachelor"),
        ];
        let first = SectionPathMaterializer::compute(&sections).unwrap();
        let second = SectionPathMaterializer::compute(&sections).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_rebuild_replaces_table() {
        let mut tables = CorpusTables::new();
        tables.upsert_section(Section::new(1, None, "Informatik", "CS"));
        tables.upsert_section(Section::new(2, Some(1), "Bachelor", "Bachelor"));
        let corpus = MemoryCorpus::new(tables);
        let metrics = MetricsRegistry::new();

        let report = SectionPathMaterializer::rebuild_if_stale(&corpus, &metrics)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.paths_written, 2);
        assert!(!corpus.section_paths_stale().await.unwrap());
        assert_eq!(metrics.snapshot().path_rebuilds, 1);

        let skipped = SectionPathMaterializer::rebuild_if_stale(&corpus, &metrics)
            .await
            .unwrap();
        assert!(skipped.is_none());
    }
}
