//! Ingest, rebuild and search over a scraped batch
//!
//! Items arrive in scrape order, so links and tags often precede the
//! records they point at. After an ingest pass:
//! - Every link with both endpoints present is applied
//! - Section paths are stale until the next rebuild
//! - Searches see department, level, review and section data

use std::io::Cursor;
use std::sync::Arc;

use tempfile::TempDir;
use unitsearch::executor::{PageRequest, ResultAssembler, SearchOutcome};
use unitsearch::ingest::{CorpusIngestor, PendingLink};
use unitsearch::materialize::{MaterializeErrorCode, SectionPathMaterializer};
use unitsearch::model::Section;
use unitsearch::observability::MetricsRegistry;
use unitsearch::store::{CorpusSnapshot, CorpusStore, CorpusTables, MemoryCorpus};

const BATCH: &str = r#"
{"kind":"section_link","unit_id":2,"section_id":12,"type":"O"}
{"kind":"department","unit_id":2,"department":"COMPUTER_SCIENCE"}
{"kind":"level","unit_id":2,"level":"MSC"}
{"kind":"unit","id":1,"semkez":"2024S","number":"252-0027-00L","title_english":"Introduction to Programming"}
{"kind":"unit","id":2,"semkez":"2024W","number":"263-2300-00L","title_english":"How To Write Fast Numerical Code"}
{"kind":"section","id":10,"name":"Informatik Master","name_english":"Computer Science Master"}
{"kind":"section","id":12,"parent_id":10,"name":"Kernfächer","name_english":"Core Courses"}
{"kind":"rating","course_number":"263-2300-00L","recommended":5.0,"engaging":4.5,"difficulty":4.0,"effort":4.0,"resources":4.5}
not json at all
{"kind":"lecturer_link","unit_id":99,"lecturer_id":7}
"#;

fn ingest_batch() -> (CorpusTables, unitsearch::ingest::IngestReport) {
    let mut tables = CorpusTables::new();
    let metrics = MetricsRegistry::new();
    let mut ingestor = CorpusIngestor::new(&mut tables, &metrics);
    ingestor.ingest_jsonl(Cursor::new(BATCH)).unwrap();
    let report = ingestor.finish();
    (tables, report)
}

async fn total(engine: &ResultAssembler<MemoryCorpus>, query: &str) -> u64 {
    match engine.search_text(query, PageRequest::new(0, 20)).await.unwrap() {
        SearchOutcome::Found(results) => results.total,
        SearchOutcome::Empty => panic!("query {:?} was treated as blank", query),
    }
}

#[test]
fn test_ingest_defers_links_until_targets_exist() {
    let (tables, report) = ingest_batch();

    assert_eq!(report.units_new, 2);
    assert_eq!(report.sections, 2);
    assert_eq!(report.ratings, 1);
    assert_eq!(report.rejected, 1);
    assert_eq!(report.links_applied, 3);
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].unit_id(), 99);
    assert!(matches!(report.unresolved[0], PendingLink::Person { .. }));

    assert!(tables.section_paths_stale());
    let tagged = tables.unit(2).unwrap();
    assert_eq!(tagged.departments.len(), 1);
    assert_eq!(tagged.levels_as_str(), "MSC");
}

#[tokio::test]
async fn test_search_after_rebuild() {
    let (tables, _) = ingest_batch();
    let corpus = Arc::new(MemoryCorpus::new(tables));
    let metrics = Arc::new(MetricsRegistry::new());

    let report = SectionPathMaterializer::rebuild_if_stale(corpus.as_ref(), &metrics)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.sections, 2);
    assert_eq!(report.paths_written, 2);
    assert!(!corpus.section_paths_stale().await.unwrap());

    let engine = ResultAssembler::new(corpus, metrics);
    assert_eq!(total(&engine, "o:\"core courses\"").await, 1);
    assert_eq!(total(&engine, "o:\"Informatik Master\"").await, 1);
    assert_eq!(total(&engine, "dep:\"Computer Science\"").await, 1);
    assert_eq!(total(&engine, "lvl:msc").await, 1);
    assert_eq!(total(&engine, "cr>=4").await, 1);
    assert_eq!(total(&engine, "-dep:\"Computer Science\"").await, 1);
    assert_eq!(total(&engine, "y:2024").await, 2);
}

#[tokio::test]
async fn test_snapshot_round_trip_keeps_paths() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corpus.json");

    let (tables, _) = ingest_batch();
    let corpus = MemoryCorpus::new(tables);
    SectionPathMaterializer::rebuild(&corpus, &MetricsRegistry::new())
        .await
        .unwrap();
    corpus.save(&path).await.unwrap();

    let snapshot = CorpusSnapshot::load(&path).unwrap();
    assert!(!snapshot.section_paths_stale);
    let core = snapshot.section_paths.iter().find(|p| p.id == 12).unwrap();
    assert_eq!(core.path_en, "Computer Science Master > Core Courses");
    assert_eq!(core.path_de, "Informatik Master > Kernfächer");

    let reloaded = MemoryCorpus::load(&path).unwrap();
    assert_eq!(reloaded.unit_count().await, 2);
}

#[tokio::test]
async fn test_cycle_leaves_paths_untouched() {
    let mut tables = CorpusTables::new();
    tables.upsert_section(Section::new(1, Some(2), "A", "A"));
    tables.upsert_section(Section::new(2, Some(1), "B", "B"));
    let corpus = MemoryCorpus::new(tables);

    let err = SectionPathMaterializer::rebuild(&corpus, &MetricsRegistry::new())
        .await
        .unwrap_err();
    assert_eq!(err.code(), MaterializeErrorCode::UnitsSectionCycle);
    assert!(corpus.section_paths_stale().await.unwrap());
}
