//! Per-unit payload extraction.

use tracing::{instrument, trace};

use rstextract_shared::CompilationUnit;

use crate::marker::Marker;
use crate::order::order_files;

/// Collect the payloads of one compilation unit.
///
/// Files are visited in [`order_files`] order and comment blocks in source
/// order; every block whose first line is the marker contributes its payload.
#[instrument(skip_all, fields(unit = %unit.name, files = unit.files.len()))]
pub fn extract_unit(unit: &CompilationUnit, marker: &Marker) -> Vec<String> {
    let mut payloads = Vec::new();

    for file in order_files(unit) {
        for block in &file.comments {
            if let Some(payload) = marker.detect(&block.text) {
                trace!(file = %file.path.display(), line = block.line, "matched marker");
                payloads.push(payload.to_string());
            }
        }
    }

    payloads
}

/// Concatenate payloads into a document, each followed by one newline.
pub fn render_document(payloads: &[String]) -> String {
    let capacity = payloads.iter().map(|p| p.len() + 1).sum();
    let mut doc = String::with_capacity(capacity);
    for payload in payloads {
        doc.push_str(payload);
        doc.push('\n');
    }
    doc
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
