use crate::config::{Catalog, Entry, HarvestLimits};
use crate::fetch::HttpFetcher;
use crate::page::{process_entry, PageReport};
use crate::paths::OutputPaths;
use crate::store::FileStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub entries_attempted: usize,
    pub entries_aborted: usize,
    pub images_saved: usize,
    pub images_failed: usize,
}

/// Processes every entry in declaration order, one at a time. `on_start`
/// fires before an entry is fetched and `on_report` once it is finished.
pub fn run_catalog<FStart, FReport>(
    catalog: &Catalog,
    fetcher: &dyn HttpFetcher,
    store: &dyn FileStore,
    paths: &OutputPaths,
    limits: &HarvestLimits,
    mut on_start: FStart,
    mut on_report: FReport,
) -> RunSummary
where
    FStart: FnMut(&Entry),
    FReport: FnMut(&PageReport),
{
    let mut summary = RunSummary::default();

    for entry in &catalog.entries {
        on_start(entry);
        let report = process_entry(entry, fetcher, store, paths, limits);

        summary.entries_attempted += 1;
        if report.is_aborted() {
            summary.entries_aborted += 1;
        }
        summary.images_saved += report.images_saved();
        summary.images_failed += report.images_failed();

        tracing::info!(
            slug = %entry.slug,
            state = ?report.state,
            saved = report.images_saved(),
            failed = report.images_failed(),
            "entry finished"
        );
        on_report(&report);
    }

    tracing::info!(
        entries = summary.entries_attempted,
        aborted = summary.entries_aborted,
        saved = summary.images_saved,
        "catalog run complete"
    );
    summary
}
