//! End-to-end search tests
//!
//! Query text in, grouped pages out, over an in-memory corpus:
//! - Results are grouped by course number, every semester in one group
//!   (`latest()` is the newest)
//! - Pagination is over distinct numbers and pages never overlap
//! - `total` counts distinct numbers, independent of the page
//! - Negated person filters keep units with no matching person
//! - A group only holds the semesters that matched the query

use std::collections::HashSet;
use std::sync::Arc;

use unitsearch::compiler::compile;
use unitsearch::executor::{PageRequest, ResultAssembler, SearchOutcome, SearchResults};
use unitsearch::materialize::SectionPathMaterializer;
use unitsearch::model::{LearningUnit, Lecturer, Section, UnitPersonLink, UnitSectionLink};
use unitsearch::observability::MetricsRegistry;
use unitsearch::query::{parse, parse_with_diagnostics, Combinator, QueryKey};
use unitsearch::store::{CorpusTables, MemoryCorpus};

// =============================================================================
// Helper Functions
// =============================================================================

fn unit(id: u64, semkez: &str, number: &str, title: &str) -> LearningUnit {
    let mut u = LearningUnit::new(id, semkez, Some(number));
    u.title_english = Some(title.to_string());
    u
}

/// Two semesters of Algorithms Lab, a physics course taught by Smith and a
/// stochastics course offered in the first bachelor year.
fn catalog() -> CorpusTables {
    let mut tables = CorpusTables::new();
    tables.upsert_unit(unit(1, "2024S", "263-0007-00L", "Algorithms Lab"));
    tables.upsert_unit(unit(2, "2024W", "263-0007-00L", "Algorithms Lab"));
    tables.upsert_unit(unit(3, "2023W", "402-0043-00L", "Physics I"));
    tables.upsert_unit(unit(4, "2022S", "401-0603-00L", "Stochastics"));

    tables.upsert_lecturer(Lecturer::new(10, "Anna", "Smith"));
    tables.link_lecturer(UnitPersonLink {
        unit_id: 3,
        lecturer_id: 10,
    });

    tables.upsert_section(Section::new(100, None, "Informatik", "CS"));
    tables.upsert_section(Section::new(101, Some(100), "Bachelor", "Bachelor"));
    tables.upsert_section(Section::new(102, Some(101), "Jahr 1", "Year 1"));
    tables.link_section(UnitSectionLink {
        unit_id: 4,
        section_id: 102,
        membership: Some("O".to_string()),
    });
    tables
}

async fn engine() -> ResultAssembler<MemoryCorpus> {
    let corpus = Arc::new(MemoryCorpus::new(catalog()));
    let metrics = Arc::new(MetricsRegistry::new());
    SectionPathMaterializer::rebuild(corpus.as_ref(), &metrics)
        .await
        .unwrap();
    ResultAssembler::new(corpus, metrics)
}

async fn found(
    engine: &ResultAssembler<MemoryCorpus>,
    query: &str,
    page: PageRequest,
) -> SearchResults {
    match engine.search_text(query, page).await.unwrap() {
        SearchOutcome::Found(results) => results,
        SearchOutcome::Empty => panic!("query {:?} was treated as blank", query),
    }
}

// =============================================================================
// Grouping
// =============================================================================

#[tokio::test]
async fn test_title_search_groups_semesters() {
    let engine = engine().await;
    let results = found(&engine, "t:Algorithms", PageRequest::new(0, 20)).await;

    assert_eq!(results.total, 1);
    assert_eq!(results.results.len(), 1);
    let group = results.results.get("263-0007-00L").unwrap();
    assert_eq!(group.units.len(), 2);
    assert_eq!(group.latest().map(|u| u.semkez.as_str()), Some("2024W"));
    assert!(group.by_semester("2024S").is_some());
    assert_eq!(results.parsed_query, "title=Algorithms");
}

#[tokio::test]
async fn test_results_serialize_keyed_by_number() {
    let engine = engine().await;
    let results = found(&engine, "algorithms", PageRequest::new(0, 20)).await;
    let json = serde_json::to_value(&results).unwrap();

    assert_eq!(json["total"], 1);
    assert_eq!(json["parsedQuery"], "title=algorithms");
    assert_eq!(json["results"]["263-0007-00L"].as_array().unwrap().len(), 2);
    assert!(json["execTimeMs"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_group_holds_only_matching_semesters() {
    // one number, renamed between semesters
    let mut tables = CorpusTables::new();
    tables.upsert_unit(unit(1, "2023W", "227-0945-00L", "Big Data Science"));
    tables.upsert_unit(unit(2, "2024W", "227-0945-00L", "Geospatial data processing"));
    let engine = ResultAssembler::new(
        Arc::new(MemoryCorpus::new(tables)),
        Arc::new(MetricsRegistry::new()),
    );

    let results = found(&engine, "big data", PageRequest::new(0, 20)).await;
    assert_eq!(results.total, 1);
    let group = results.results.get("227-0945-00L").unwrap();
    let semesters: Vec<&str> = group.units.iter().map(|u| u.semkez.as_str()).collect();
    assert_eq!(semesters, vec!["2023W"]);
}

// =============================================================================
// Filters
// =============================================================================

#[tokio::test]
async fn test_year_range_excluding_lecturer() {
    let engine = engine().await;
    let results = found(&engine, "y>=2023 y<2025 -l:Smith", PageRequest::new(0, 20)).await;

    assert_eq!(
        results.parsed_query,
        "year>=2023 AND year<2025 AND lecturer!=Smith"
    );
    assert_eq!(results.results.numbers(), vec!["263-0007-00L"]);
}

#[tokio::test]
async fn test_lecturer_filter_matches_either_name_order() {
    let engine = engine().await;
    for query in ["l:Smith", "l:\"anna smith\"", "l:\"Smith Anna\""] {
        let results = found(&engine, query, PageRequest::new(0, 20)).await;
        assert_eq!(results.results.numbers(), vec!["402-0043-00L"], "query {}", query);
    }
}

#[tokio::test]
async fn test_offered_in_uses_materialized_paths() {
    let engine = engine().await;
    let results = found(&engine, "o:\"Year 1\"", PageRequest::new(0, 20)).await;
    assert_eq!(results.results.numbers(), vec!["401-0603-00L"]);

    let results = found(&engine, "o:bachelor o:informatik", PageRequest::new(0, 20)).await;
    assert_eq!(results.total, 1);

    let results = found(&engine, "o:bachelor o:physics", PageRequest::new(0, 20)).await;
    assert_eq!(results.total, 0);
    assert!(results.results.is_empty());
}

#[tokio::test]
async fn test_or_query_unions_groups() {
    let engine = engine().await;
    let results = found(&engine, "t:physics OR t:stochastics", PageRequest::new(0, 20)).await;
    assert_eq!(results.total, 2);
    assert_eq!(results.parsed_query, "title=physics OR title=stochastics");
}

#[tokio::test]
async fn test_unknown_key_dropped() {
    let engine = engine().await;
    let results = found(&engine, "zzz:foo y:2024", PageRequest::new(0, 20)).await;
    assert_eq!(results.parsed_query, "year=2024");
    assert_eq!(results.total, 1);
}

// =============================================================================
// Pagination
// =============================================================================

#[tokio::test]
async fn test_total_is_distinct_numbers() {
    let engine = engine().await;
    let results = found(&engine, "y>=2000", PageRequest::new(0, 1)).await;
    assert_eq!(results.total, 3);
    assert_eq!(results.results.len(), 1);
}

#[tokio::test]
async fn test_pages_partition_numbers() {
    let engine = engine().await;
    let mut seen = HashSet::new();
    for offset in 0..3 {
        let page = PageRequest::new(offset, 1).ordered_by(QueryKey::Year, true);
        let results = found(&engine, "y>=2000", page).await;
        assert_eq!(results.total, 3);
        for number in results.results.numbers() {
            assert!(seen.insert(number.to_string()), "{} on two pages", number);
        }
    }
    assert_eq!(seen.len(), 3);

    let past_end = found(&engine, "y>=2000", PageRequest::new(3, 1)).await;
    assert_eq!(past_end.total, 3);
    assert!(past_end.results.is_empty());
}

#[tokio::test]
async fn test_default_order_is_newest_first() {
    let engine = engine().await;
    let results = found(&engine, "y>=2000", PageRequest::new(0, 20)).await;
    assert_eq!(
        results.results.numbers(),
        vec!["263-0007-00L", "402-0043-00L", "401-0603-00L"]
    );
}

#[tokio::test]
async fn test_blank_query_is_empty() {
    let engine = engine().await;
    let outcome = engine.search_text("  ", PageRequest::new(0, 20)).await.unwrap();
    assert_eq!(outcome, SearchOutcome::Empty);
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn test_alias_resolution() {
    for (alias, key) in [
        ("t", QueryKey::Title),
        ("y", QueryKey::Year),
        ("l", QueryKey::Lecturer),
        ("o", QueryKey::Offered),
        ("dep", QueryKey::Department),
        ("lang", QueryKey::Language),
    ] {
        assert_eq!(QueryKey::resolve(alias), Some(key), "alias {}", alias);
    }
    assert_eq!(QueryKey::resolve("zzz"), None);
}

#[test]
fn test_parse_equivalences() {
    assert_eq!(parse("a b"), parse("a AND b"));
    assert_eq!(parse("-y>2020"), parse("y<=2020"));
    assert_eq!(parse("OR t:foo OR"), parse("t:foo"));

    let expr = parse("a b OR c");
    assert_eq!(expr.combinator(), Combinator::Or);
    assert_eq!(expr.render(), "(title=a AND title=b) OR title=c");
}

#[test]
fn test_compiled_rendering_has_no_outer_parens() {
    let parsed = parse_with_diagnostics("y>=2023 y<2025 -l:Smith");
    assert!(parsed.unresolved_keys.is_empty());
    let compiled = compile(&parsed.expr);
    assert!(compiled.dropped.is_empty());
    assert!(compiled.joins.lecturers);
    assert_eq!(
        compiled.parsed_query(),
        "year>=2023 AND year<2025 AND lecturer!=Smith"
    );
}
