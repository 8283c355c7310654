use image_harvest::catalog::run_catalog;
use image_harvest::config::{catalog_from_env, HarvestLimits};
use image_harvest::fetch::UreqFetcher;
use image_harvest::logging;
use image_harvest::page::{ImageRole, PageReport};
use image_harvest::paths::OutputPaths;
use image_harvest::store::DiskStore;
use image_harvest::FailureKind;

fn main() {
    logging::init_logging();

    let catalog = match catalog_from_env() {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("image_harvest: {err}");
            std::process::exit(1);
        }
    };

    let paths = OutputPaths::from_env();
    let limits = HarvestLimits::default();

    println!("Starting High-Quality Image Download...");
    if let Err(err) = paths.ensure_base_dir() {
        // Per-image writes create their own folders, so keep going.
        tracing::warn!(dir = %paths.base_dir.display(), error = %err, "could not create output root");
    }

    let fetcher = UreqFetcher::new(limits.image_timeout);
    let summary = run_catalog(
        &catalog,
        &fetcher,
        &DiskStore,
        &paths,
        &limits,
        |entry| println!("\nProcessing {}...", entry.slug),
        print_report,
    );

    println!(
        "\nDone! Images saved to: {} ({} images from {} entries, {} aborted, {} failed downloads)",
        paths.base_dir.display(),
        summary.images_saved,
        summary.entries_attempted,
        summary.entries_aborted,
        summary.images_failed,
    );
}

fn print_report(report: &PageReport) {
    for outcome in report.outcomes.iter().filter(|o| o.success()) {
        let tag = match outcome.role {
            ImageRole::Hero => " (hero)",
            ImageRole::Content => "",
        };
        println!("  [OK] Saved: {}{tag}", outcome.resolved.filename);
    }

    match &report.abort_reason {
        Some(err) if err.kind() == FailureKind::NotFound => {
            println!("  [Warn] 404 Not Found: {}", report.entry.source_url)
        }
        Some(err) => println!(
            "  [Err] Failed to scrape {}: {err}",
            report.entry.source_url
        ),
        None => {}
    }
}
