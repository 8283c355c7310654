use crate::document::Attributes;

/// Scale for `<n>x` density descriptors so they can be compared with `w` widths.
pub const DENSITY_QUALITY_SCALE: f64 = 1000.0;

/// Quality of a plain `src` value; usually a fallback or placeholder.
pub const PRIMARY_SOURCE_QUALITY: f64 = 0.0;

/// Lazy-load sources usually hold the real image, so they edge out `src`.
pub const LAZY_SOURCE_QUALITY: f64 = 1.0;

const PRIMARY_SOURCE_ATTR: &str = "src";
const LAZY_SOURCE_ATTR: &str = "data-src";
const SRCSET_ATTRS: &[&str] = &["srcset", "data-srcset"];

/// Attributes of one embedded `<img>` element.
pub type ImageReference = Attributes;

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub url: String,
    pub quality: f64,
}

impl Candidate {
    fn new(url: &str, quality: f64) -> Self {
        Self {
            url: url.to_string(),
            quality,
        }
    }
}

/// Every representation of `reference` worth considering, in emission order:
/// `src`, then `data-src`, then the responsive set entries.
pub fn resolve_candidates(reference: &ImageReference) -> Vec<Candidate> {
    let mut out = Vec::new();

    if let Some(src) = non_blank(reference, PRIMARY_SOURCE_ATTR) {
        if !is_inline_data_url(src) {
            out.push(Candidate::new(src, PRIMARY_SOURCE_QUALITY));
        }
    }

    if let Some(lazy) = non_blank(reference, LAZY_SOURCE_ATTR) {
        if !is_inline_data_url(lazy) {
            out.push(Candidate::new(lazy, LAZY_SOURCE_QUALITY));
        }
    }

    // `srcset` wins; `data-srcset` is only the lazy-load fallback.
    if let Some(srcset) = SRCSET_ATTRS.iter().find_map(|attr| non_blank(reference, attr)) {
        out.extend(parse_srcset(srcset));
    }

    out
}

fn non_blank<'a>(reference: &'a ImageReference, attr: &str) -> Option<&'a str> {
    reference.get(attr).map(str::trim).filter(|v| !v.is_empty())
}

/// Parses a responsive set (`"a.jpg 480w, b.jpg 2x"`). Malformed entries are
/// dropped rather than reported.
pub fn parse_srcset(srcset: &str) -> Vec<Candidate> {
    let mut out = Vec::new();
    for chunk in srcset.split(',') {
        let part = chunk.trim();
        if part.is_empty() {
            continue;
        }
        let mut bits = part.split_whitespace();
        let Some(url) = bits.next() else {
            continue;
        };
        if is_inline_data_url(url) {
            continue;
        }
        let quality = match bits.next() {
            Some(descriptor) => match descriptor_quality(descriptor) {
                Some(quality) => quality,
                None => continue,
            },
            None => 0.0,
        };
        out.push(Candidate::new(url, quality));
    }
    out
}

/// `None` means the descriptor looked like a width/density but did not parse.
fn descriptor_quality(descriptor: &str) -> Option<f64> {
    let token = descriptor.trim().to_ascii_lowercase();
    if let Some(width) = token.strip_suffix('w') {
        return width.parse::<u64>().ok().map(|w| w as f64);
    }
    if let Some(density) = token.strip_suffix('x') {
        return density
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| d * DENSITY_QUALITY_SCALE);
    }
    Some(0.0)
}

/// Highest-quality candidate; ties go to the one emitted first.
pub fn best_candidate(mut candidates: Vec<Candidate>) -> Option<Candidate> {
    // `sort_by` is stable, which is what keeps first-seen ties in front.
    candidates.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    candidates.into_iter().next()
}

pub fn is_inline_data_url(value: &str) -> bool {
    value
        .trim_start()
        .get(..5)
        .map(|prefix| prefix.eq_ignore_ascii_case("data:"))
        .unwrap_or(false)
}
