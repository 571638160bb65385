//! Builds the blog navigation pages: one page per group produced by
//! [`crate::bundle`], each holding a tile per page in the group. The last
//! group carries the most recent content and is always named `index.html`,
//! so the blog's landing URL never changes as new posts are published; older
//! groups get `index0.html`, `index1.html`, ... with the number growing with
//! age.

use crate::bundle::Group;
use crate::htmldoc::Node;
use crate::page::Location;

const TILES_CLASS: &str = "blog-navi";
const TILE_CLASS: &str = "blog-navi-tile";
const THUMBNAIL_CLASS: &str = "blog-navi-thumb";

/// A generated navigation page, ready to be wrapped into a full document and
/// written to `{path}{filename}`.
#[derive(Clone, Debug, PartialEq)]
pub struct NaviPage {
    /// Position in emission order, 0-based. Grows with content age except
    /// for the last page, which is the newest.
    pub index: usize,
    pub filename: String,
    pub path: String,
    pub title: String,
    pub description: String,
    pub content: String,
}

/// Creates one [`NaviPage`] per group, in group order (oldest first, as the
/// bundler emits them). `page_title` and `page_description` are carried
/// verbatim onto every page; `base_path` becomes each page's directory. An
/// empty `groups` yields no pages.
pub fn generate<T: Location>(
    groups: &[Group<T>],
    base_path: &str,
    page_title: &str,
    page_description: &str,
) -> Vec<NaviPage> {
    if groups.is_empty() {
        return Vec::new();
    }

    let last = groups.len() - 1;
    let mut navi_pages = Vec::with_capacity(groups.len());
    for (i, group) in groups.iter().enumerate() {
        let filename = match i == last {
            true => String::from("index.html"),
            false => format!("index{}.html", i),
        };

        navi_pages.push(NaviPage {
            index: i,
            filename,
            path: base_path.to_owned(),
            title: page_title.to_owned(),
            description: page_description.to_owned(),
            content: navi_page_content(group),
        });
    }
    navi_pages
}

/// Renders the tile list for one group: a link per page wrapping the
/// thumbnail and the title, newest first, followed by a float-clearing
/// element the tile layout needs.
fn navi_page_content<T: Location>(group: &Group<T>) -> String {
    let mut container = Node::new("div", "", &[("class", TILES_CLASS)]);
    for element in group.elements() {
        let thumbnail = match element.thumbnail_url().is_empty() {
            true => element.image_url(),
            false => element.thumbnail_url(),
        };

        let mut anchor = Node::new(
            "a",
            " ",
            &[("href", element.url()), ("class", TILE_CLASS)],
        );
        anchor.add_child(Node::new(
            "span",
            " ",
            &[
                ("style", &format!("background-image: url({})", thumbnail)),
                ("class", THUMBNAIL_CLASS),
            ],
        ));
        anchor.add_child(Node::new("h2", element.title(), &[]));
        container.add_child(anchor);
    }
    container.add_child(Node::new("div", "", &[("style", "clear: both")]));
    container.render()
}
