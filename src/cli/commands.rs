//! CLI command implementations
//!
//! Every command loads the config first and sets the log level from it,
//! except `explain`, which touches no corpus.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use super::args::Command;
use super::config::AppConfig;
use super::errors::{CliError, CliResult};
use super::io::write_response;
use crate::compiler::compile;
use crate::executor::{PageRequest, ResultAssembler};
use crate::http_server::{AppState, HttpServer, SearchReply};
use crate::ingest::CorpusIngestor;
use crate::materialize::{MaterializeSchedule, SectionPathMaterializer};
use crate::observability::{log_event, Event, Logger, MetricsRegistry};
use crate::query::{parse_with_diagnostics, QueryKey};
use crate::store::{CorpusSnapshot, CorpusTables, MemoryCorpus};

/// Main CLI entry point. The only function `main` calls.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Search {
            config,
            query,
            offset,
            limit,
            order_by,
            asc,
        } => search(&config, &query, offset, limit, &order_by, asc),
        Command::Explain { query } => explain(&query),
        Command::Materialize { config } => materialize(&config),
        Command::Ingest { config, input } => ingest(&config, &input),
    }
}

fn load_config(path: &Path) -> CliResult<AppConfig> {
    let config = AppConfig::load(path)?;
    Logger::set_min_severity(config.min_severity()?);
    Ok(config)
}

fn load_corpus(config: &AppConfig) -> CliResult<MemoryCorpus> {
    let path = config.corpus_path();
    match MemoryCorpus::load(&path) {
        Ok(corpus) => Ok(corpus),
        Err(err) => {
            let reason = err.to_string();
            log_event(Event::CorpusLoadFailed, &[("reason", reason.as_str())]);
            Err(err.into())
        }
    }
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}

/// Serves the HTTP API until Ctrl-C.
///
/// Rebuilds stale section paths once before binding, then hands further
/// rebuilds to the cron schedule.
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    log_event(Event::BootStart, &[]);
    let config = load_config(config_path)?;
    let schedule = MaterializeSchedule::parse(&config.materialize_cron)?;
    let corpus = Arc::new(load_corpus(&config)?);
    let metrics = Arc::new(MetricsRegistry::new());

    let mut http_config = config.http_config();
    if let Some(port) = port {
        http_config.port = port;
    }

    let rt = runtime()?;
    rt.block_on(async move {
        let units = corpus.unit_count().await.to_string();
        log_event(Event::CorpusLoaded, &[("units", units.as_str())]);

        if let Err(err) = SectionPathMaterializer::rebuild_if_stale(corpus.as_ref(), &metrics).await {
            return Err(CliError::from(err));
        }
        let scheduler = schedule.spawn(corpus.clone(), metrics.clone());

        let state = Arc::new(AppState::new(
            corpus,
            metrics,
            config.default_limit,
            config.max_limit,
        ));
        let server = HttpServer::new(http_config, state);
        log_event(Event::BootComplete, &[]);

        let served = server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)));
        scheduler.abort();
        served
    })
}

/// One-shot search printed in the JSON envelope
pub fn search(
    config_path: &Path,
    query: &str,
    offset: usize,
    limit: Option<usize>,
    order_by: &str,
    ascending: bool,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let order_by = QueryKey::from_canonical(order_by)
        .ok_or_else(|| CliError::invalid_argument(format!("Unknown order_by key: {}", order_by)))?;
    let limit = limit.unwrap_or(config.default_limit);
    if limit == 0 || limit > config.max_limit {
        return Err(CliError::invalid_argument(format!(
            "limit must be between 1 and {}, got {}",
            config.max_limit, limit
        )));
    }

    let corpus = Arc::new(load_corpus(&config)?);
    let assembler = ResultAssembler::new(corpus, Arc::new(MetricsRegistry::new()))
        .with_max_limit(config.max_limit);
    let page = PageRequest::new(offset, limit).ordered_by(order_by, !ascending);

    let outcome = runtime()?.block_on(assembler.search_text(query, page))?;
    write_response(&SearchReply::from(outcome))
}

/// Prints how a query is understood: the parsed tree, the filters kept,
/// the compiled predicate and the joins it needs
pub fn explain(query: &str) -> CliResult<()> {
    let parsed = parse_with_diagnostics(query);
    let compiled = compile(&parsed.expr);
    let dropped: Vec<String> = compiled.dropped.iter().map(ToString::to_string).collect();

    write_response(&json!({
        "query": query,
        "tree": parsed.expr,
        "unresolved_keys": parsed.unresolved_keys,
        "parsed_query": compiled.parsed_query(),
        "dropped": dropped,
        "predicate": compiled.predicate,
        "joins": compiled.joins,
    }))
}

/// Rebuilds section paths and writes the corpus back
pub fn materialize(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let corpus = load_corpus(&config)?;
    let metrics = MetricsRegistry::new();

    let report = runtime()?.block_on(async {
        let report = SectionPathMaterializer::rebuild(&corpus, &metrics).await?;
        corpus.save(&config.corpus_path()).await?;
        Ok::<_, CliError>(report)
    })?;

    let path = config.corpus_path;
    log_event(Event::CorpusSaved, &[("path", path.as_str())]);
    write_response(&report)
}

/// Ingests a JSON lines file into the corpus snapshot.
///
/// A missing snapshot file starts an empty corpus.
pub fn ingest(config_path: &Path, input: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let corpus_path = config.corpus_path();

    let mut tables = if corpus_path.exists() {
        CorpusTables::from_snapshot(CorpusSnapshot::load(&corpus_path)?)
    } else {
        CorpusTables::new()
    };

    let file = File::open(input)
        .map_err(|e| CliError::io_error(format!("Failed to open {}: {}", input.display(), e)))?;
    let metrics = MetricsRegistry::new();
    let mut ingestor = CorpusIngestor::new(&mut tables, &metrics);
    ingestor.ingest_jsonl(BufReader::new(file))?;
    let report = ingestor.finish();

    tables.to_snapshot().save(&corpus_path)?;
    let shown = corpus_path.display().to_string();
    log_event(Event::CorpusSaved, &[("path", shown.as_str())]);

    write_response(&report)
}
