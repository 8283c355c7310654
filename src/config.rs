use crate::{HarvestError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_MAX_CONTENT_IMAGES: usize = 6;
pub const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 10;

const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    // Core
    ("npm", "https://www.kentik.com/solutions/network-performance-monitoring/"),
    ("nms", "https://www.kentik.com/product/network-monitoring-system/"),
    // Unconfirmed target; override through a catalog file if it moves.
    ("synthetic", "https://www.kentik.com/product/synthetic-monitoring/"),
    ("ai-advisor", "https://www.kentik.com/product/ai-advisor/"),
    // ISP
    ("edge", "https://www.kentik.com/product/peering-and-interconnection/"),
    ("sp-analytics", "https://www.kentik.com/product/service-provider/"),
    // Gap
    ("protect", "https://www.kentik.com/product/network-security-and-compliance/"),
    ("kmi", "https://www.kentik.com/resources/kentik-market-intelligence/"),
    ("multi-cloud", "https://www.kentik.com/product/multi-cloud-observability/"),
    ("firehose", "https://www.kentik.com/resources/kentik-firehose/"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Folder name and filename prefix.
    pub slug: String,
    pub source_url: String,
}

impl Entry {
    pub fn new(slug: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            source_url: source_url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub entries: Vec<Entry>,
}

impl Catalog {
    pub fn new(entries: Vec<Entry>) -> Result<Self> {
        let catalog = Self { entries };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ENTRIES
                .iter()
                .map(|(slug, url)| Entry::new(*slug, *url))
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(HarvestError::InvalidCatalog(
                "catalog has no entries".to_string(),
            ));
        }
        let mut slugs = HashSet::new();
        for entry in &self.entries {
            if !is_valid_slug(&entry.slug) {
                return Err(HarvestError::InvalidCatalog(format!(
                    "slug {:?} must be non-empty ASCII letters, digits, '-' or '_'",
                    entry.slug
                )));
            }
            if !slugs.insert(entry.slug.as_str()) {
                return Err(HarvestError::InvalidCatalog(format!(
                    "duplicate slug {:?}",
                    entry.slug
                )));
            }
            let parsed = Url::parse(&entry.source_url).map_err(|e| {
                HarvestError::InvalidCatalog(format!(
                    "{}: invalid source_url {:?}: {e}",
                    entry.slug, entry.source_url
                ))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
                return Err(HarvestError::InvalidCatalog(format!(
                    "{}: source_url must be an absolute http(s) URL",
                    entry.slug
                )));
            }
        }
        Ok(())
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let bytes = std::fs::read(path)?;
    let parsed: Catalog = serde_json::from_slice(&bytes)?;
    parsed.validate()?;
    Ok(parsed)
}

/// `IMAGE_HARVEST_CATALOG` names a JSON catalog file; unset means built-in.
pub fn catalog_from_env() -> Result<Catalog> {
    match std::env::var("IMAGE_HARVEST_CATALOG") {
        Ok(v) if !v.trim().is_empty() => load_catalog(Path::new(v.trim())),
        _ => Ok(Catalog::builtin()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestLimits {
    /// Content images saved per page; the hero image is not counted.
    pub max_content_images: usize,
    pub image_timeout: Duration,
}

impl Default for HarvestLimits {
    fn default() -> Self {
        Self {
            max_content_images: DEFAULT_MAX_CONTENT_IMAGES,
            image_timeout: Duration::from_secs(DEFAULT_IMAGE_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid_and_ordered() {
        let catalog = Catalog::builtin();
        catalog.validate().expect("valid");
        assert_eq!(catalog.entries.len(), 10);
        assert_eq!(catalog.entries[0].slug, "npm");
        assert_eq!(catalog.entries[9].slug, "firehose");
    }

    #[test]
    fn rejects_duplicate_and_unsafe_slugs() {
        let dup = Catalog::new(vec![
            Entry::new("npm", "https://x.test/a"),
            Entry::new("npm", "https://x.test/b"),
        ]);
        assert!(matches!(dup, Err(HarvestError::InvalidCatalog(_))));

        let traversal = Catalog::new(vec![Entry::new("../etc", "https://x.test/a")]);
        assert!(matches!(traversal, Err(HarvestError::InvalidCatalog(_))));

        let empty = Catalog::new(Vec::new());
        assert!(matches!(empty, Err(HarvestError::InvalidCatalog(_))));
    }

    #[test]
    fn rejects_non_http_source_urls() {
        let ftp = Catalog::new(vec![Entry::new("npm", "ftp://x.test/a")]);
        assert!(matches!(ftp, Err(HarvestError::InvalidCatalog(_))));

        let relative = Catalog::new(vec![Entry::new("npm", "/product/npm")]);
        assert!(matches!(relative, Err(HarvestError::InvalidCatalog(_))));
    }

    #[test]
    fn loads_catalog_file_in_declaration_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"entries":[
                {"slug":"zeta","source_url":"https://x.test/z"},
                {"slug":"alpha","source_url":"https://x.test/a"}
            ]}"#,
        )
        .expect("write");

        let catalog = load_catalog(&path).expect("catalog");
        let slugs: Vec<&str> = catalog.entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["zeta", "alpha"]);
    }

    #[test]
    fn malformed_catalog_file_is_a_json_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "{not json").expect("write");
        assert!(matches!(load_catalog(&path), Err(HarvestError::Json(_))));
    }
}
