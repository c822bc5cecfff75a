//! End-to-end extraction run: source dir → units → payloads → documents.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use rstextract_shared::{AppConfig, Result, RstExtractError, WriteErrorPolicy};
use rstextract_source::{LoadOptions, load_dir};

use crate::extract::{extract_unit, render_document};
use crate::marker::Marker;

/// Configuration for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Directory holding the `.go` sources.
    pub source_dir: PathBuf,
    /// Directory receiving one document per unit (created if missing).
    pub output_dir: PathBuf,
    /// Marker token flagging payload comments.
    pub marker: Marker,
    /// Extension of generated documents, without the dot.
    pub output_extension: String,
    /// Ignore `*_test.go` files.
    pub skip_test_files: bool,
    /// What to do when a document cannot be written.
    pub on_write_error: WriteErrorPolicy,
}

impl ExtractConfig {
    /// Defaults: `+rst` marker, `.rst` documents, test files included, fail fast.
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            marker: Marker::default(),
            output_extension: "rst".into(),
            skip_test_files: false,
            on_write_error: WriteErrorPolicy::Abort,
        }
    }

    /// Build a run config from loaded application settings.
    pub fn from_app_config(
        app: &AppConfig,
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            marker: Marker::new(app.extract.marker.clone())?,
            output_extension: app.extract.output_extension.clone(),
            skip_test_files: app.extract.skip_test_files,
            on_write_error: app.output.on_write_error,
            ..Self::new(source_dir, output_dir)
        })
    }

    /// Reject settings that would produce unusable output paths.
    pub fn validate(&self) -> Result<()> {
        let ext = &self.output_extension;
        if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(RstExtractError::validation(format!(
                "invalid output extension {ext:?}: expected a bare extension such as \"rst\""
            )));
        }
        Ok(())
    }

    /// Path of the document generated for `unit`.
    pub fn document_path(&self, unit: &str) -> PathBuf {
        self.output_dir
            .join(format!("{unit}.{}", self.output_extension))
    }
}

/// A document written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct WrittenDoc {
    pub unit: String,
    pub path: PathBuf,
    pub payload_count: usize,
    pub size_bytes: usize,
    pub sha256: String,
}

/// A document that could not be written (only under [`WriteErrorPolicy::Skip`]).
#[derive(Debug, Clone, Serialize)]
pub struct WriteFailure {
    pub unit: String,
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractReport {
    /// Documents written, in unit name order.
    pub written: Vec<WrittenDoc>,
    /// Units without any marked comment.
    pub skipped: Vec<String>,
    /// Units whose document could not be written.
    pub failed: Vec<WriteFailure>,
    /// Wall-clock duration of the run.
    pub elapsed_ms: u64,
}

/// Progress callback for reporting run status.
pub trait ProgressReporter {
    /// Called once the source directory has been loaded.
    fn units_found(&self, count: usize);
    /// Called after a document has been written.
    fn unit_written(&self, doc: &WrittenDoc);
    /// Called for a unit that produced no payload.
    fn unit_skipped(&self, unit: &str);
    /// Called when a write failed and the run continues.
    fn unit_failed(&self, failure: &WriteFailure);
    /// Called when the run completes.
    fn done(&self, report: &ExtractReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn units_found(&self, _count: usize) {}
    fn unit_written(&self, _doc: &WrittenDoc) {}
    fn unit_skipped(&self, _unit: &str) {}
    fn unit_failed(&self, _failure: &WriteFailure) {}
    fn done(&self, _report: &ExtractReport) {}
}

/// Run a full extraction.
///
/// 1. Load and scan the source directory
/// 2. Create the output directory
/// 3. Extract each unit's payloads in unit name order
/// 4. Write one document per unit with at least one payload
///
/// Loading and directory creation errors are always fatal. A failed document
/// write is fatal under [`WriteErrorPolicy::Abort`] and recorded in the report
/// under [`WriteErrorPolicy::Skip`].
#[instrument(skip_all, fields(source = %config.source_dir.display(), output = %config.output_dir.display()))]
pub fn run(config: &ExtractConfig, progress: &dyn ProgressReporter) -> Result<ExtractReport> {
    let start = Instant::now();
    config.validate()?;

    let opts = LoadOptions {
        skip_test_files: config.skip_test_files,
    };
    let tree = load_dir(&config.source_dir, &opts)?;
    progress.units_found(tree.len());

    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| RstExtractError::io(&config.output_dir, e))?;

    let mut report = ExtractReport::default();

    for unit in &tree {
        let payloads = extract_unit(unit, &config.marker);
        if payloads.is_empty() {
            debug!(unit = %unit.name, "no marked comments, skipping unit");
            progress.unit_skipped(&unit.name);
            report.skipped.push(unit.name.clone());
            continue;
        }

        let content = render_document(&payloads);
        let target = config.document_path(&unit.name);

        match write_document(&config.output_dir, &target, &content) {
            Ok(()) => {
                let doc = WrittenDoc {
                    unit: unit.name.clone(),
                    path: target,
                    payload_count: payloads.len(),
                    size_bytes: content.len(),
                    sha256: sha256_hex(&content),
                };
                info!(
                    unit = %doc.unit,
                    path = %doc.path.display(),
                    payloads = doc.payload_count,
                    "wrote document"
                );
                progress.unit_written(&doc);
                report.written.push(doc);
            }
            Err(err) => match config.on_write_error {
                WriteErrorPolicy::Abort => return Err(err),
                WriteErrorPolicy::Skip => {
                    warn!(unit = %unit.name, error = %err, "failed to write document, continuing");
                    let failure = WriteFailure {
                        unit: unit.name.clone(),
                        path: target,
                        error: err.to_string(),
                    };
                    progress.unit_failed(&failure);
                    report.failed.push(failure);
                }
            },
        }
    }

    report.elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "extraction complete"
    );
    progress.done(&report);

    Ok(report)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Write `content` to `target` atomically (write to temp, then rename).
fn write_document(output_dir: &Path, target: &Path, content: &str) -> Result<()> {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = output_dir.join(format!(".{file_name}.tmp"));

    let written = std::fs::write(&temp, content)
        .map_err(|e| RstExtractError::io(&temp, e))
        .and_then(|()| std::fs::rename(&temp, target).map_err(|e| RstExtractError::io(target, e)));

    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp);
        return Err(e);
    }

    debug!(path = %target.display(), size = content.len(), "document written");
    Ok(())
}

fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
