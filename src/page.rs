use crate::candidates::{best_candidate, resolve_candidates};
use crate::config::{Entry, HarvestLimits};
use crate::document::PageDocument;
use crate::fetch::HttpFetcher;
use crate::filter::check_eligibility;
use crate::naming::{content_filename, hero_filename};
use crate::paths::OutputPaths;
use crate::store::FileStore;
use crate::{FailureKind, HarvestError, Result};
use std::collections::HashSet;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Fetching,
    Parsing,
    ExtractingHero,
    ExtractingContentImages,
    Done,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Hero,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSelection {
    pub absolute_url: String,
    pub filename: String,
}

#[derive(Debug)]
pub struct DownloadOutcome {
    pub entry: Entry,
    pub resolved: ResolvedSelection,
    pub role: ImageRole,
    pub path: PathBuf,
    pub error: Option<HarvestError>,
}

impl DownloadOutcome {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    /// An image answering with an error status is a failed save, not a
    /// broken connection.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.error.as_ref().map(|err| match err {
            HarvestError::HttpStatus { .. } => FailureKind::PersistenceFailure,
            other => other.kind(),
        })
    }
}

#[derive(Debug)]
pub struct PageReport {
    pub entry: Entry,
    pub state: PageState,
    /// Set when `state` is `Aborted`.
    pub abort_reason: Option<HarvestError>,
    pub outcomes: Vec<DownloadOutcome>,
    /// Content candidates turned away by the eligibility filter.
    pub rejected_candidates: usize,
}

impl PageReport {
    pub fn is_aborted(&self) -> bool {
        self.state == PageState::Aborted
    }

    pub fn images_saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success()).count()
    }

    pub fn images_failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.success()).count()
    }

    pub fn content_images_saved(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.success() && o.role == ImageRole::Content)
            .count()
    }

    pub fn hero_saved(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| o.success() && o.role == ImageRole::Hero)
    }
}

/// Runs one catalog entry through fetch, parse, hero and content extraction.
/// Never fails: problems end up in the returned report.
pub fn process_entry(
    entry: &Entry,
    fetcher: &dyn HttpFetcher,
    store: &dyn FileStore,
    paths: &OutputPaths,
    limits: &HarvestLimits,
) -> PageReport {
    let mut run = PageRun {
        entry,
        fetcher,
        store,
        paths,
        limits,
        state: PageState::Fetching,
        seen: HashSet::new(),
        outcomes: Vec::new(),
        rejected: 0,
    };

    let abort_reason = match run.execute() {
        Ok(()) => {
            run.transition(PageState::Done);
            None
        }
        Err(err) => {
            tracing::warn!(
                slug = %entry.slug,
                url = %entry.source_url,
                stage = ?run.state,
                error = %err,
                "entry aborted"
            );
            run.transition(PageState::Aborted);
            Some(err)
        }
    };

    PageReport {
        entry: entry.clone(),
        state: run.state,
        abort_reason,
        outcomes: run.outcomes,
        rejected_candidates: run.rejected,
    }
}

struct PageRun<'a> {
    entry: &'a Entry,
    fetcher: &'a dyn HttpFetcher,
    store: &'a dyn FileStore,
    paths: &'a OutputPaths,
    limits: &'a HarvestLimits,
    state: PageState,
    seen: HashSet<String>,
    outcomes: Vec<DownloadOutcome>,
    rejected: usize,
}

impl PageRun<'_> {
    fn transition(&mut self, next: PageState) {
        tracing::debug!(slug = %self.entry.slug, from = ?self.state, to = ?next, "page state");
        self.state = next;
    }

    fn execute(&mut self) -> Result<()> {
        let entry_dir = self.paths.entry_dir(&self.entry.slug);
        if let Err(err) = self.store.ensure_dir(&entry_dir) {
            tracing::warn!(slug = %self.entry.slug, error = %err, "could not create entry folder");
        }

        let response = self.fetcher.fetch_page(&self.entry.source_url)?;
        if response.status == 404 {
            return Err(HarvestError::NotFound {
                url: self.entry.source_url.clone(),
            });
        }
        if !response.is_success() {
            return Err(HarvestError::HttpStatus {
                url: self.entry.source_url.clone(),
                status: response.status,
            });
        }

        self.transition(PageState::Parsing);
        let base_url = Url::parse(&self.entry.source_url).map_err(|e| {
            HarvestError::Parse(format!("invalid page URL {}: {e}", self.entry.source_url))
        })?;
        tracing::debug!(slug = %self.entry.slug, content_type = %response.content_type, "page fetched");
        let document = PageDocument::parse(&response.body)?;

        self.transition(PageState::ExtractingHero);
        self.extract_hero(&document, &base_url);

        self.transition(PageState::ExtractingContentImages);
        self.extract_content_images(&document, &base_url);
        Ok(())
    }

    fn extract_hero(&mut self, document: &PageDocument, base_url: &Url) {
        let Some(raw) = document.summary_image() else {
            return;
        };
        let Some(absolute_url) = absolutize(&raw, base_url) else {
            tracing::debug!(slug = %self.entry.slug, raw = %raw, "unusable summary image URL");
            return;
        };
        let selection = ResolvedSelection {
            filename: hero_filename(&self.entry.slug),
            absolute_url,
        };
        self.persist(selection, ImageRole::Hero);
    }

    fn extract_content_images(&mut self, document: &PageDocument, base_url: &Url) {
        let mut accepted = 0_usize;
        for reference in document.find_all("img") {
            if accepted >= self.limits.max_content_images {
                break;
            }
            let Some(best) = best_candidate(resolve_candidates(&reference)) else {
                continue;
            };
            let Some(absolute_url) = absolutize(&best.url, base_url) else {
                continue;
            };
            if let Err(rejection) = check_eligibility(&absolute_url, &self.seen) {
                tracing::debug!(slug = %self.entry.slug, url = %absolute_url, ?rejection, "skipped candidate");
                self.rejected += 1;
                continue;
            }
            let selection = ResolvedSelection {
                filename: content_filename(&absolute_url, accepted, &self.entry.slug),
                absolute_url,
            };
            if self.persist(selection, ImageRole::Content) {
                accepted += 1;
            }
        }
    }

    /// Downloads and writes one selection; a success marks its URL as seen.
    fn persist(&mut self, resolved: ResolvedSelection, role: ImageRole) -> bool {
        let path = self.paths.image_path(&self.entry.slug, &resolved.filename);
        let error = download_to(self.fetcher, self.store, &resolved.absolute_url, &path).err();

        match &error {
            None => {
                tracing::info!(slug = %self.entry.slug, file = %resolved.filename, "saved image");
                self.seen.insert(resolved.absolute_url.clone());
            }
            Some(err) => {
                tracing::warn!(
                    slug = %self.entry.slug,
                    url = %resolved.absolute_url,
                    error = %err,
                    "image download failed"
                );
            }
        }

        let success = error.is_none();
        self.outcomes.push(DownloadOutcome {
            entry: self.entry.clone(),
            resolved,
            role,
            path,
            error,
        });
        success
    }
}

fn download_to(
    fetcher: &dyn HttpFetcher,
    store: &dyn FileStore,
    url: &str,
    path: &std::path::Path,
) -> Result<()> {
    let response = fetcher.fetch_image(url)?;
    if !response.is_success() {
        return Err(HarvestError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }
    store.write(path, &response.body)
}

/// Resolves `raw` against the page URL; only http(s) results are usable.
fn absolutize(raw: &str, base_url: &Url) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let mut joined = base_url.join(raw).ok()?;
    if !matches!(joined.scheme(), "http" | "https") {
        return None;
    }
    joined.set_fragment(None);
    Some(joined.to_string())
}
