//! Scan pipeline with explicit stages.
//!
//! 1. **Ingest**: decode and parse the delimited file into a typed table
//! 2. **Profile**: write table and column statistics
//! 3. **Analyze**: run the batch analyzer over every column
//! 4. **Report**: write the row-oriented analysis report
//!
//! Nothing is written before the input has been read in full, so an
//! unreadable file leaves no partial output behind.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use pii_analyzer::{BatchAnalyzer, PatternAnalyzer};
use pii_ingest::{CsvOptions, LoadedTable, frame_to_column_mapping, load_table};
use pii_model::{AnalysisOutcome, AnalyzedRecord, ColumnMapping};
use pii_report::{ProfileReport, write_analysis_report};

use crate::config::ScanConfig;
use crate::logging::redact_value;
use crate::types::{ColumnSummary, ScanResult};

/// Built-in recognizers plus the ones defined in the configuration.
pub fn build_analyzer(config: &ScanConfig) -> Result<PatternAnalyzer> {
    let mut analyzer = PatternAnalyzer::new().context("build built-in recognizers")?;
    for definition in &config.recognizers {
        let recognizer = definition
            .build()
            .with_context(|| format!("build recognizer {}", definition.name))?;
        debug!(
            recognizer = %definition.name,
            entity = %definition.entity,
            "custom recognizer registered"
        );
        analyzer.register(Box::new(recognizer));
    }
    Ok(analyzer)
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

pub fn ingest(input: &Path, options: &CsvOptions) -> Result<(LoadedTable, ColumnMapping)> {
    let table =
        load_table(input, options).with_context(|| format!("load {}", input.display()))?;
    let mapping = frame_to_column_mapping(&table.data).context("build column mapping")?;
    Ok((table, mapping))
}

// ============================================================================
// Stage 2: Profile
// ============================================================================

pub fn profile(table: &LoadedTable, title: &str, path: &Path) -> Result<PathBuf> {
    ProfileReport::profile(&table.data, title)
        .with_source(table.source.clone())
        .to_file(path)
        .context("write profile report")?;
    Ok(path.to_path_buf())
}

// ============================================================================
// Stage 3: Analyze
// ============================================================================

pub fn analyze(
    analyzer: &PatternAnalyzer,
    mapping: ColumnMapping,
    config: &ScanConfig,
) -> Result<Vec<AnalyzedRecord>> {
    let batch = BatchAnalyzer::new(analyzer)
        .with_failure_policy(config.analysis.failure_policy)
        .with_parallel(config.analysis.parallel);
    let options = config.analyze_options();
    let mut records = Vec::with_capacity(mapping.len());
    for result in batch.analyze_dict(mapping, &config.analysis.language, &options) {
        let record = result.context("analyze column")?;
        if let Some(sample) = first_flagged_text(&record) {
            debug!(
                column = %record.key,
                findings = record.recognizer_results.detection_count(),
                sample = %redact_value(sample),
                "column has findings"
            );
        }
        records.push(record);
    }
    Ok(records)
}

fn first_flagged_text(record: &AnalyzedRecord) -> Option<&str> {
    match &record.recognizer_results {
        AnalysisOutcome::Flat(results) if !results.is_empty() => {
            record.value.cells().next().and_then(|cell| cell.as_text())
        }
        AnalysisOutcome::Nested(items) => items
            .iter()
            .position(|results| !results.is_empty())
            .and_then(|idx| record.value.cells().nth(idx))
            .and_then(|cell| cell.as_text()),
        AnalysisOutcome::Flat(_) => None,
    }
}

// ============================================================================
// Full scan
// ============================================================================

/// Runs every stage for one input file.
pub fn run_scan(input: &Path, config: &ScanConfig) -> Result<ScanResult> {
    let scan_span = info_span!("scan", input = %input.display());
    let _scan_guard = scan_span.enter();
    info!(
        language = %config.analysis.language,
        failure_policy = %config.analysis.failure_policy,
        parallel = config.analysis.parallel,
        "starting scan"
    );

    let analyzer = build_analyzer(config)?;

    let ingest_start = Instant::now();
    let (table, mapping) = info_span!("ingest").in_scope(|| ingest(input, &config.csv))?;
    info!(
        rows = table.data.height(),
        columns = table.data.width(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    let profile_report = if config.output.profile {
        let profile_start = Instant::now();
        let title = input.file_name().map_or_else(
            || input.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        let path = info_span!("profile")
            .in_scope(|| profile(&table, &title, &config.output.profile_path()))?;
        info!(
            path = %path.display(),
            duration_ms = profile_start.elapsed().as_millis(),
            "profile complete"
        );
        Some(path)
    } else {
        debug!("profiling disabled");
        None
    };

    let analyze_start = Instant::now();
    let records = info_span!("analyze").in_scope(|| analyze(&analyzer, mapping, config))?;
    let columns: Vec<ColumnSummary> = records.iter().map(ColumnSummary::from_record).collect();
    info!(
        columns = columns.len(),
        findings = columns.iter().map(|column| column.findings).sum::<usize>(),
        duration_ms = analyze_start.elapsed().as_millis(),
        "analysis complete"
    );

    let analysis_report = config.output.report_path();
    write_analysis_report(&records, &analysis_report, &config.output.report_options())
        .context("write analysis report")?;

    Ok(ScanResult {
        rows: table.data.height(),
        source: table.source,
        language: config.analysis.language.clone(),
        failure_policy: config.analysis.failure_policy,
        columns,
        profile_report,
        analysis_report,
    })
}
