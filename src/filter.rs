use std::collections::HashSet;
use url::Url;

const VECTOR_IMAGE_EXT: &str = ".svg";

const EXCLUDED_URL_MARKERS: &[&str] = &["logo", "icon", "pixel"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    VectorImage,
    ExcludedMarker(&'static str),
    AlreadySeen,
}

/// Decides whether an absolute image URL may be selected for the current page.
pub fn check_eligibility(url: &str, seen: &HashSet<String>) -> Result<(), Rejection> {
    if is_vector_image(url) {
        return Err(Rejection::VectorImage);
    }
    if let Some(marker) = excluded_marker(url) {
        return Err(Rejection::ExcludedMarker(marker));
    }
    if seen.contains(url) {
        return Err(Rejection::AlreadySeen);
    }
    Ok(())
}

fn is_vector_image(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_ascii_lowercase(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase(),
    };
    path.ends_with(VECTOR_IMAGE_EXT)
}

fn excluded_marker(url: &str) -> Option<&'static str> {
    let lowered = url.to_ascii_lowercase();
    EXCLUDED_URL_MARKERS
        .iter()
        .copied()
        .find(|marker| lowered.contains(marker))
}
