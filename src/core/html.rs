// src/core/html.rs
//! Minimal DOM interface the step interpreter walks, plus its `scraper` adapter.
//!
//! Nodes are plain copyable handles into the document; all navigation goes
//! back through the document, so a handle can never outlive the tree it indexes.

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Node};

pub trait DomTree {
    type Node: Copy;

    /// The document node itself.
    fn root(&self) -> Self::Node;

    /// First text node, in document order, whose content equals `text` exactly.
    fn find_text(&self, text: &str) -> Option<Self::Node>;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Next sibling that is an element; text and comments in between are skipped.
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Attribute value, `None` when missing or when `node` is not an element.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Serialized form: outer HTML for elements, the text for text nodes.
    fn render(&self, node: Self::Node) -> String;
}

/// A parsed HTML page.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(body: &str) -> Self {
        Self { html: Html::parse_document(body) }
    }
}

impl DomTree for HtmlDocument {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.html.tree.root().id()
    }

    fn find_text(&self, text: &str) -> Option<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .find(|n| n.value().as_text().is_some_and(|t| &**t == text))
            .map(|n| n.id())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.html.tree.get(node)?.parent().map(|p| p.id())
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.html
            .tree
            .get(node)?
            .next_siblings()
            .find(|s| s.value().is_element())
            .map(|s| s.id())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let n = self.html.tree.get(node)?;
        n.value().as_element()?.attr(name).map(String::from)
    }

    fn render(&self, node: NodeId) -> String {
        let Some(n) = self.html.tree.get(node) else {
            return s!();
        };
        match n.value() {
            Node::Document | Node::Fragment => self.html.html(),
            Node::Element(_) => ElementRef::wrap(n).map(|e| e.html()).unwrap_or_default(),
            Node::Text(t) => s!(&**t),
            Node::Comment(c) => join!("<!--", &**c, "-->"),
            _ => s!(),
        }
    }
}
