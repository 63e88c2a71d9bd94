//! Scan, match and register in one pass.

use gesso_canvas::Root;
use gesso_sketch::{match_utilities, register_matches, ScanOutput, ScanResult, ScanStats, Scanner};

/// Outcome of one just-in-time pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Classes naming a registered utility.
    pub matched: usize,
    /// Classes whose value the graph already held.
    pub existing: usize,
    /// Values newly recorded.
    pub registered: usize,
    /// Classes naming an unknown utility or modifier.
    pub skipped: usize,
    pub stats: ScanStats,
}

/// Record every class `output` uses that the graph does not hold yet.
pub fn materialize_output(root: &mut Root, output: &ScanOutput) -> MaterializeReport {
    let matches = match_utilities(&output.all_parsed, root);
    let registration = register_matches(root, &matches);

    let report = MaterializeReport {
        matched: matches.iter().filter(|m| m.factory.is_some()).count(),
        existing: registration.existing,
        registered: registration.registered,
        skipped: registration.skipped,
        stats: output.stats.clone(),
    };
    tracing::info!(
        classes = output.all_parsed.len(),
        registered = report.registered,
        skipped = report.skipped,
        "materialized scanned classes"
    );
    report
}

/// Scan the configured sources and materialize what they use.
pub fn materialize(root: &mut Root, scanner: &Scanner) -> ScanResult<MaterializeReport> {
    let output = scanner.scan()?;
    Ok(materialize_output(root, &output))
}
