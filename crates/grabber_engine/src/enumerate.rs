use scraper::{ElementRef, Html};
use url::Url;

use crate::ImageReference;

/// Snapshot of every `<img>` in the document, in document order.
///
/// Inert `<template>` contents are not part of the document and are skipped.
/// Sources resolve against the first `<base href>` when present, otherwise
/// against `document_url`.
pub fn enumerate_images(html: &str, document_url: Option<&Url>) -> Vec<ImageReference> {
    let document = Html::parse_document(html);
    let base = document_base(&document, document_url);

    elements_named(&document, "img")
        .enumerate()
        .map(|(index, element)| ImageReference {
            index,
            src: resolve_src(element.value().attr("src"), base.as_ref()),
        })
        .collect()
}

fn elements_named<'a>(
    document: &'a Html,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |element| element.value().name().eq_ignore_ascii_case(name))
        .filter(|element| !inside_template(element))
}

fn inside_template(element: &ElementRef<'_>) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|ancestor| ancestor.name().eq_ignore_ascii_case("template"))
    })
}

fn document_base(document: &Html, document_url: Option<&Url>) -> Option<Url> {
    let href = elements_named(document, "base")
        .find_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty());

    match href {
        Some(href) => Url::parse(href)
            .ok()
            .or_else(|| document_url.and_then(|url| url.join(href).ok()))
            .or_else(|| document_url.cloned()),
        None => document_url.cloned(),
    }
}

fn resolve_src(raw: Option<&str>, base: Option<&Url>) -> String {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return String::new();
    };
    if let Ok(url) = Url::parse(trimmed) {
        return url.into();
    }
    base.and_then(|base| base.join(trimmed).ok())
        .map(String::from)
        .unwrap_or_else(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://example.com/articles/post.html").unwrap()
    }

    fn sources(html: &str, url: Option<&Url>) -> Vec<String> {
        enumerate_images(html, url)
            .into_iter()
            .map(|image| image.src)
            .collect()
    }

    #[test]
    fn images_keep_document_order_and_ordinals() {
        let html = r#"<body><img src="a.png"><div><p><img src="/b.jpg"></p></div><IMG SRC="c.gif"></body>"#;
        let images = enumerate_images(html, Some(&page_url()));
        assert_eq!(
            images,
            vec![
                ImageReference {
                    index: 0,
                    src: "https://example.com/articles/a.png".into()
                },
                ImageReference {
                    index: 1,
                    src: "https://example.com/b.jpg".into()
                },
                ImageReference {
                    index: 2,
                    src: "https://example.com/articles/c.gif".into()
                },
            ]
        );
    }

    #[test]
    fn missing_and_blank_sources_are_empty() {
        let html = r#"<img><img src="   "><img src="https://cdn.example.com/x.png">"#;
        assert_eq!(
            sources(html, Some(&page_url())),
            vec!["", "", "https://cdn.example.com/x.png"]
        );
    }

    #[test]
    fn data_uris_are_left_as_is() {
        let html = r#"<img src="data:image/png;base64,iVBORw0KGgo=">"#;
        let images = enumerate_images(html, Some(&page_url()));
        assert_eq!(images.len(), 1);
        assert!(images[0].src.starts_with("data:image/png"));
        assert!(images[0].is_skippable());
    }

    #[test]
    fn base_element_overrides_document_url() {
        let html = r#"<head><base href="/static/"></head><body><img src="pic.png"></body>"#;
        assert_eq!(
            sources(html, Some(&page_url())),
            vec!["https://example.com/static/pic.png"]
        );
    }

    #[test]
    fn relative_source_without_base_is_kept_verbatim() {
        assert_eq!(sources(r#"<img src="pic.png">"#, None), vec!["pic.png"]);
    }

    #[test]
    fn template_contents_are_not_enumerated() {
        let html = r#"<img src="a.png"><template><img src="tpl.png"><div><img src="deep.png"></div></template><img src="b.png">"#;
        let images = enumerate_images(html, Some(&page_url()));
        assert_eq!(
            images,
            vec![
                ImageReference {
                    index: 0,
                    src: "https://example.com/articles/a.png".into()
                },
                ImageReference {
                    index: 1,
                    src: "https://example.com/articles/b.png".into()
                },
            ]
        );
    }

    #[test]
    fn base_inside_template_is_ignored() {
        let html = r#"<template><base href="/elsewhere/"></template><img src="pic.png">"#;
        assert_eq!(
            sources(html, Some(&page_url())),
            vec!["https://example.com/articles/pic.png"]
        );
    }

    #[test]
    fn no_images_yields_empty_snapshot() {
        assert!(enumerate_images("<p>text only</p>", Some(&page_url())).is_empty());
    }
}
