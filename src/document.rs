use crate::{HarvestError, Result};
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

const SUMMARY_IMAGE_PROPERTY: &str = "og:image";

/// Attribute bag of one element; names are lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    attrs: BTreeMap<String, String>,
}

impl Attributes {
    pub fn from_element(element: &ElementRef<'_>) -> Self {
        let attrs = element
            .value()
            .attrs()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
            .collect();
        Self { attrs }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let attrs = pairs
            .into_iter()
            .map(|(k, v)| (k.into().to_ascii_lowercase(), v.into()))
            .collect();
        Self { attrs }
    }

    pub fn get(&self, attr: &str) -> Option<&str> {
        self.attrs.get(attr).map(String::as_str)
    }
}

/// Parsed HTML page.
pub struct PageDocument {
    html: Html,
}

impl PageDocument {
    /// Builds a document from a response body, whatever its declared content
    /// type. Only a blank body has nothing to parse.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(body);
        if text.trim().is_empty() {
            return Err(HarvestError::Parse("empty response body".to_string()));
        }
        Ok(Self {
            html: Html::parse_document(&text),
        })
    }

    /// Attributes of the first `<meta property="...">` with that property.
    pub fn find_meta_by_property(&self, property: &str) -> Option<Attributes> {
        let selector = Selector::parse("meta[property]").expect("meta selector");
        self.html
            .select(&selector)
            .find(|meta| {
                meta.value()
                    .attr("property")
                    .map(|value| value.trim().eq_ignore_ascii_case(property))
                    .unwrap_or(false)
            })
            .map(|meta| Attributes::from_element(&meta))
    }

    /// Content of the `og:image` declaration, if any.
    pub fn summary_image(&self) -> Option<String> {
        let meta = self.find_meta_by_property(SUMMARY_IMAGE_PROPERTY)?;
        let content = meta.get("content")?.trim();
        if content.is_empty() {
            None
        } else {
            Some(content.to_string())
        }
    }

    /// Attribute bags of every `tag` element in document order.
    pub fn find_all(&self, tag: &str) -> Vec<Attributes> {
        let Ok(selector) = Selector::parse(tag) else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .map(|element| Attributes::from_element(&element))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
    <html><head>
      <meta property="og:title" content="Monitoring" />
      <meta property="og:image" content=" https://cdn.x.test/og/card.png " />
    </head><body>
      <img src="/a.jpg" data-src="/a-full.jpg" />
      <p><img srcset="/b-1x.jpg 1x, /b-2x.jpg 2x" alt="B" /></p>
    </body></html>
    "#;

    #[test]
    fn finds_summary_image_and_images_in_order() {
        let doc = PageDocument::parse(PAGE.as_bytes()).expect("doc");
        assert_eq!(
            doc.summary_image().as_deref(),
            Some("https://cdn.x.test/og/card.png")
        );
        let images = doc.find_all("img");
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].get("data-src"), Some("/a-full.jpg"));
        assert_eq!(images[1].get("alt"), Some("B"));
    }

    #[test]
    fn blank_summary_image_is_ignored() {
        let html = r#"<html><head><meta property="og:image" content="  "></head></html>"#;
        let doc = PageDocument::parse(html.as_bytes()).expect("doc");
        assert!(doc.find_meta_by_property("og:image").is_some());
        assert!(doc.summary_image().is_none());
    }

    #[test]
    fn rejects_blank_bodies_only() {
        assert!(matches!(
            PageDocument::parse(b"  \n "),
            Err(HarvestError::Parse(_))
        ));
        let plain = PageDocument::parse(b"just some text").expect("doc");
        assert!(plain.find_all("img").is_empty());
    }

    #[test]
    fn meta_attributes_are_looked_up_by_name() {
        let html = r#"<html><head><meta Property="og:image" CONTENT="/card.png"></head></html>"#;
        let doc = PageDocument::parse(html.as_bytes()).expect("doc");
        let meta = doc.find_meta_by_property("og:image").expect("meta");
        assert_eq!(meta.get("content"), Some("/card.png"));
        assert_eq!(doc.summary_image().as_deref(), Some("/card.png"));
    }
}
