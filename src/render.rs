//! Turns pages into complete HTML documents. Each component contributes its
//! head/body nodes and its CSS; a collector deduplicates components by their
//! stable key before the site stylesheet is assembled, so shared chrome is
//! only styled once no matter how many contexts use it.

use crate::htmldoc::{Document, Node};
use crate::page::Page;
use crate::site::Site;

pub trait Component {
    /// Stable identity used to deduplicate components across contexts.
    fn key(&self) -> &'static str;

    /// The CSS the component contributes to the site stylesheet.
    fn css(&self) -> &'static str {
        ""
    }

    fn visit(&self, site: &Site, page: &Page, doc: &mut Document);
}

/// The component stack applied to every rendered page. All source variants
/// currently share the same chrome.
pub fn components() -> Vec<Box<dyn Component>> {
    vec![
        Box::new(MetaComponent),
        Box::new(HeaderComponent),
        Box::new(ContentComponent),
        Box::new(FooterComponent),
    ]
}

/// Runs `page` through the component stack and renders the resulting
/// document.
pub fn render_page(site: &Site, page: &Page, components: &[Box<dyn Component>]) -> String {
    let mut doc = Document::new();
    for component in components {
        component.visit(site, page, &mut doc);
    }
    doc.render()
}

/// Collects the components of every rendered context exactly once, keyed by
/// [`Component::key`], and concatenates their CSS.
pub struct ComponentCollector {
    keys: Vec<&'static str>,
    css: String,
}

impl ComponentCollector {
    pub fn new() -> ComponentCollector {
        ComponentCollector {
            keys: Vec::new(),
            css: String::new(),
        }
    }

    pub fn add_components(&mut self, components: &[Box<dyn Component>]) {
        for component in components {
            if !self.keys.contains(&component.key()) {
                self.keys.push(component.key());
                self.css.push_str(component.css());
            }
        }
    }

    pub fn css(&self) -> &str {
        &self.css
    }
}

/// Head metadata: title, description, canonical link, stylesheet and feed
/// links, and the social (Open Graph / Twitter) card tags.
struct MetaComponent;

impl Component for MetaComponent {
    fn key(&self) -> &'static str {
        "meta"
    }

    fn visit(&self, site: &Site, page: &Page, doc: &mut Document) {
        // An empty description is rendered as a single space.
        let description = match page.description.is_empty() {
            true => " ",
            false => page.description.as_str(),
        };
        let image = match page.image_url.is_empty() {
            true => page.thumbnail_url.as_str(),
            false => page.image_url.as_str(),
        };

        doc.add_head_node(Node::new("meta", "", &[("charset", "utf-8")]));
        doc.add_head_node(Node::new(
            "meta",
            "",
            &[
                ("name", "viewport"),
                ("content", "width=device-width, initial-scale=1"),
            ],
        ));
        doc.add_head_node(Node::new("title", &page.title, &[]));
        doc.add_head_node(Node::new(
            "meta",
            "",
            &[("name", "description"), ("content", description)],
        ));
        doc.add_head_node(Node::new(
            "link",
            "",
            &[("rel", "canonical"), ("href", &page.url)],
        ));
        doc.add_head_node(Node::new(
            "link",
            "",
            &[("rel", "stylesheet"), ("href", &site.css_url)],
        ));
        if !site.rss_url.is_empty() {
            doc.add_head_node(Node::new(
                "link",
                "",
                &[
                    ("rel", "alternate"),
                    ("type", "application/atom+xml"),
                    ("href", &site.rss_url),
                ],
            ));
        }

        doc.add_head_node(property_meta("og:title", &page.title));
        doc.add_head_node(property_meta("og:description", description));
        doc.add_head_node(property_meta("og:url", &page.url));
        doc.add_head_node(property_meta("og:site_name", &site.domain));
        if !site.section.is_empty() {
            doc.add_head_node(property_meta("article:section", &site.section));
        }
        if !page.published_time.is_empty() {
            doc.add_head_node(property_meta(
                "article:published_time",
                &page.published_time,
            ));
        }
        if !image.is_empty() {
            doc.add_head_node(property_meta("og:image", image));
        }
        if !site.fb_page.is_empty() {
            doc.add_head_node(property_meta("article:publisher", &site.fb_page));
        }

        if !site.card_type.is_empty() {
            doc.add_head_node(name_meta("twitter:card", &site.card_type));
        }
        if !site.twitter_handle.is_empty() {
            doc.add_head_node(name_meta("twitter:site", &site.twitter_handle));
        }
        doc.add_head_node(name_meta("twitter:title", &page.title));
        doc.add_head_node(name_meta("twitter:description", description));
        if !image.is_empty() {
            doc.add_head_node(name_meta("twitter:image", image));
        }
    }
}

fn property_meta(property: &str, content: &str) -> Node {
    Node::new("meta", "", &[("property", property), ("content", content)])
}

fn name_meta(name: &str, content: &str) -> Node {
    Node::new("meta", "", &[("name", name), ("content", content)])
}

/// The site header: domain as the home link, plus the configured main
/// navigation.
struct HeaderComponent;

impl Component for HeaderComponent {
    fn key(&self) -> &'static str {
        "header"
    }

    fn css(&self) -> &'static str {
        ".site-header { padding: 10px 20px; border-bottom: 1px solid #ddd; }\n\
         .site-header .site-title { font-size: 24px; text-decoration: none; color: #222; }\n\
         .site-header nav { display: inline-block; margin-left: 20px; }\n\
         .site-header nav a { margin-right: 12px; text-decoration: none; }\n"
    }

    fn visit(&self, site: &Site, _page: &Page, doc: &mut Document) {
        let mut header = Node::new("header", "", &[("class", "site-header")]);
        header.add_child(Node::new(
            "a",
            &site.domain,
            &[("href", &site.home_url), ("class", "site-title")],
        ));

        let mut nav = Node::new("nav", "", &[]);
        for location in &site.main_nav {
            nav.add_child(Node::new("a", &location.label, &[("href", &location.url)]));
        }
        header.add_child(nav);
        doc.add_body_node(header);
    }
}

/// The page body. Carries the tile styles, since navigation tile markup is
/// page content.
struct ContentComponent;

impl Component for ContentComponent {
    fn key(&self) -> &'static str {
        "content"
    }

    fn css(&self) -> &'static str {
        ".page-content { max-width: 800px; margin: 0 auto; padding: 20px; }\n\
         .page-content img { max-width: 100%; }\n\
         .blog-navi-tile { float: left; width: 190px; margin: 5px; text-decoration: none; color: #222; }\n\
         .blog-navi-tile h2 { font-size: 15px; font-weight: normal; margin: 4px 0 12px 0; }\n\
         .blog-navi-thumb { display: block; width: 190px; height: 190px; background-size: cover; background-position: center; }\n"
    }

    fn visit(&self, _site: &Site, page: &Page, doc: &mut Document) {
        doc.add_body_node(Node::raw("main", &page.content, &[("class", "page-content")]));
    }
}

/// The site footer: the marginal navigation (imprint, about, and whatever a
/// marginal source contributes).
struct FooterComponent;

impl Component for FooterComponent {
    fn key(&self) -> &'static str {
        "footer"
    }

    fn css(&self) -> &'static str {
        ".site-footer { clear: both; padding: 10px 20px; border-top: 1px solid #ddd; }\n\
         .site-footer a { margin-right: 12px; text-decoration: none; color: #666; }\n"
    }

    fn visit(&self, site: &Site, _page: &Page, doc: &mut Document) {
        let mut footer = Node::new("footer", "", &[("class", "site-footer")]);
        let mut nav = Node::new("nav", "", &[]);
        for location in &site.marginal_nav {
            nav.add_child(Node::new("a", &location.label, &[("href", &location.url)]));
        }
        if !site.twitter_page.is_empty() {
            nav.add_child(Node::new("a", "twitter", &[("href", &site.twitter_page)]));
        }
        footer.add_child(nav);
        doc.add_body_node(footer);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::site::NavLocation;

    fn site() -> Site {
        Site {
            domain: "example.org".to_owned(),
            home_url: "https://example.org/".to_owned(),
            css_url: "https://example.org/styles.css".to_owned(),
            rss_url: "https://example.org/blog/feed.atom".to_owned(),
            card_type: "summary".to_owned(),
            section: "blog".to_owned(),
            twitter_handle: "@example".to_owned(),
            twitter_page: String::new(),
            fb_page: String::new(),
            main_nav: vec![NavLocation {
                label: "blog".to_owned(),
                url: "https://example.org/blog/index.html".to_owned(),
            }],
            marginal_nav: vec![NavLocation {
                label: "imprint".to_owned(),
                url: "https://example.org/imprint.html".to_owned(),
            }],
        }
    }

    fn page() -> Page {
        Page {
            id: 10001,
            title: "At The Zoo".to_owned(),
            description: "A day at the zoo.".to_owned(),
            content: "<p>lions</p>".to_owned(),
            thumbnail_url: "https://example.org/thumb.png".to_owned(),
            image_url: "https://example.org/post.png".to_owned(),
            url: "https://example.org/blog/2018/3/4/at-the-zoo/".to_owned(),
            domain: "example.org".to_owned(),
            published_time: "2018-3-4 9:5:1".to_owned(),
            disqus_id: String::new(),
            fs_path: "/blog/2018/3/4/at-the-zoo/".to_owned(),
            fs_filename: "index.html".to_owned(),
        }
    }

    #[test]
    fn test_render_page_carries_metadata_chrome_and_content() {
        let rendered = render_page(&site(), &page(), &components());

        assert!(rendered.starts_with("<!doctype html>"));
        assert!(rendered.contains("<title>At The Zoo</title>"));
        assert!(rendered.contains(
            r#"<link rel="canonical" href="https://example.org/blog/2018/3/4/at-the-zoo/"/>"#
        ));
        assert!(rendered.contains(r#"<meta property="og:title" content="At The Zoo"/>"#));
        assert!(rendered.contains(r#"<meta property="og:image" content="https://example.org/post.png"/>"#));
        assert!(rendered.contains(r#"<meta name="twitter:site" content="@example"/>"#));
        assert!(rendered.contains(r#"<main class="page-content"><p>lions</p></main>"#));
        assert!(rendered.contains(r#"<a href="https://example.org/blog/index.html">blog</a>"#));
        assert!(rendered.contains(r#"<a href="https://example.org/imprint.html">imprint</a>"#));
    }

    #[test]
    fn test_empty_description_becomes_a_space() {
        let mut page = page();
        page.description = String::new();
        let rendered = render_page(&site(), &page, &components());
        assert!(rendered.contains(r#"<meta name="description" content=" "/>"#));
    }

    #[test]
    fn test_collector_deduplicates_by_key() {
        let mut collector = ComponentCollector::new();
        collector.add_components(&components());
        let once = collector.css().to_owned();

        collector.add_components(&components());
        assert_eq!(collector.css(), once);
        assert_eq!(once.matches(".page-content {").count(), 1);
    }
}
