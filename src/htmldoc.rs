//! A minimal HTML node and document builder. Pages are assembled
//! programmatically (navigation tiles, social metadata, site chrome) rather
//! than through a text-templating engine, so only three capabilities are
//! needed: create an element with a tag name, text content and attribute
//! pairs; append child elements; render the result as markup.

use pulldown_cmark::escape::escape_html;

/// Elements without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// A single element in the markup tree.
pub struct Node {
    tag: String,
    text: String,
    raw: bool,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Node {
    /// Creates an element with a tag name, text content and attribute pairs.
    /// The text content is HTML-escaped when rendered.
    pub fn new(tag: &str, text: &str, attributes: &[(&str, &str)]) -> Node {
        Node {
            tag: tag.to_owned(),
            text: text.to_owned(),
            raw: false,
            attributes: attributes
                .iter()
                .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
                .collect(),
            children: Vec::new(),
        }
    }

    /// Like [`Node::new`], but the text is emitted verbatim. Used to embed
    /// content that has already been rendered to HTML.
    pub fn raw(tag: &str, html: &str, attributes: &[(&str, &str)]) -> Node {
        let mut node = Node::new(tag, html, attributes);
        node.raw = true;
        node
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_to(&mut out);
        out
    }

    fn render_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            let _ = escape_html(&mut *out, value);
            out.push('"');
        }
        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            out.push_str("/>");
            return;
        }
        out.push('>');
        match self.raw {
            true => out.push_str(&self.text),
            false => {
                let _ = escape_html(&mut *out, &self.text);
            }
        }
        for child in &self.children {
            child.render_to(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// A whole HTML page: head and body node lists rendered into an HTML5
/// document. Components append nodes; the document is rendered once at the
/// end.
#[derive(Default)]
pub struct Document {
    head: Vec<Node>,
    body: Vec<Node>,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    pub fn add_head_node(&mut self, node: Node) {
        self.head.push(node);
    }

    pub fn add_body_node(&mut self, node: Node) {
        self.body.push(node);
    }

    pub fn render(&self) -> String {
        let mut out = String::from("<!doctype html>\n<html><head>");
        for node in &self.head {
            node.render_to(&mut out);
        }
        out.push_str("</head><body>");
        for node in &self.body {
            node.render_to(&mut out);
        }
        out.push_str("</body></html>\n");
        out
    }
}
