use url::Url;

const DEFAULT_STEM: &str = "image";
const HERO_SUFFIX: &str = "hero_og.jpg";

/// `{slug}_{counter}_{basename}` for a content image.
pub fn content_filename(url: &str, counter: usize, slug: &str) -> String {
    format!("{slug}_{counter}_{}", base_name(url))
}

/// Fixed name for the page summary image, whatever its real extension.
pub fn hero_filename(slug: &str) -> String {
    format!("{slug}_{HERO_SUFFIX}")
}

fn base_name(url: &str) -> String {
    let segment = last_path_segment(url);
    let name = if segment.is_empty() || !segment.contains('.') {
        let ext = if url.contains("jpg") { ".jpg" } else { ".png" };
        format!("{DEFAULT_STEM}{ext}")
    } else {
        segment
    };
    name.split('?').next().unwrap_or_default().to_string()
}

fn last_path_segment(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        return parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("")
            .to_string();
    }
    let path = url.split(['?', '#']).next().unwrap_or("");
    path.rsplit('/').next().unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_query_and_prefixes_slug_and_counter() {
        assert_eq!(
            content_filename("https://x.test/assets/photo.png?v=2", 3, "npm"),
            "npm_3_photo.png"
        );
    }

    #[test]
    fn directory_urls_get_default_png_name() {
        let name = content_filename("https://x.test/gallery/", 0, "edge");
        assert_eq!(name, "edge_0_image.png");
    }

    #[test]
    fn default_name_prefers_jpg_when_url_mentions_it() {
        let name = content_filename("https://x.test/render?format=jpg", 1, "kmi");
        assert_eq!(name, "kmi_1_image.jpg");
    }

    #[test]
    fn extensionless_segment_is_replaced() {
        let name = content_filename("https://cdn.x.test/media/abc123", 2, "nms");
        assert_eq!(name, "nms_2_image.png");
    }

    #[test]
    fn relative_urls_still_name_cleanly() {
        assert_eq!(
            content_filename("/img/shot.webp?w=800", 4, "firehose"),
            "firehose_4_shot.webp"
        );
    }

    #[test]
    fn hero_name_is_fixed() {
        assert_eq!(hero_filename("synthetic"), "synthetic_hero_og.jpg");
    }
}
