use scraper::{Html, Selector};
use url::{ParseError, Url};

/// One discovered image reference within a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// The src attribute exactly as found in the markup.
    pub raw_src: String,
    /// The src resolved to an absolute url against the owning page.
    pub resolved: Url,
}

/// Get the full link to an image, given its page's full url.
fn get_full_link(link: &str, page_url: &Url) -> Option<Url> {
    match Url::parse(link) {
        Ok(url) => Some(url),
        Err(e)
            if e == ParseError::EmptyHost
                || e == ParseError::RelativeUrlWithoutBase
                || e == ParseError::RelativeUrlWithCannotBeABaseBase =>
        {
            match page_url.join(link) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::error!("Failed to get full link for {}\nError : {}", link, e);
                    None
                }
            }
        }
        Err(e) => {
            tracing::error!("Failed to get full link for {}\nError : {}", link, e);
            None
        }
    }
}

/// All image references in document order, one per `img` element carrying a
/// non-empty src. Elements without a src attribute are skipped silently, they
/// count neither towards discovery nor towards progress.
pub fn get_image_links(html_string: &str, page_url: &Url) -> Vec<ImageRef> {
    let html_document = Html::parse_document(html_string);
    let img_tag_selector = Selector::parse("img").unwrap();
    html_document
        .select(&img_tag_selector)
        .filter_map(|element| element.value().attr("src"))
        .filter(|src| !src.is_empty())
        .filter_map(|src| {
            let full_link = get_full_link(src, page_url)?;
            tracing::debug!("Full link for {} => {}", src, &full_link);
            Some(ImageRef {
                raw_src: src.to_string(),
                resolved: full_link,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://www.example.com/gallery/index.html").unwrap()
    }

    #[test]
    fn keeps_document_order() {
        let html = r#"<html><body>
            <img src="first.png">
            <p><img src="/second.jpg"></p>
            <img src="https://cdn.example.org/third.gif">
        </body></html>"#;
        let refs = get_image_links(html, &page_url());
        assert_eq!(
            refs.iter().map(|r| r.resolved.as_str()).collect::<Vec<_>>(),
            vec![
                "https://www.example.com/gallery/first.png",
                "https://www.example.com/second.jpg",
                "https://cdn.example.org/third.gif",
            ]
        );
    }

    #[test]
    fn resolves_relative_paths_against_the_page() {
        let html = r#"<img src="../up/one.png">"#;
        let refs = get_image_links(html, &page_url());
        assert_eq!(
            refs[0].resolved.as_str(),
            "https://www.example.com/up/one.png"
        );
        assert_eq!(refs[0].raw_src, "../up/one.png");
    }

    #[test]
    fn scheme_relative_src_inherits_the_page_scheme() {
        let html = r#"<img src="//cdn.example.org/pic.webp">"#;
        let refs = get_image_links(html, &page_url());
        assert_eq!(refs[0].resolved.as_str(), "https://cdn.example.org/pic.webp");
    }

    #[test]
    fn skips_elements_without_a_src() {
        let html = r#"<img alt="no src"><img src=""><img src="kept.png">"#;
        let refs = get_image_links(html, &page_url());
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].raw_src, "kept.png");
    }
}
