//! The document tree built by template scripts.
//!
//! Each primitive call in a template (`Section { ... }`, `Text "hi"`) produces
//! an [`Element`] handed back to Luau as userdata, so elements nest naturally
//! and the serializer receives a typed tree instead of loose tables.

use std::collections::BTreeMap;

/// What an element renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Html,
    Head,
    Body,
    Container,
    Section,
    Text,
    Heading,
    Button,
    Img,
    /// Converts descendant `className`s into inline styles.
    Tailwind,
    Link,
    Hr,
    Preview,
    /// A plain intrinsic tag created through `El(tag, props)`.
    Tag(&'static str),
}

/// Global names under which the primitives are exposed to templates.
pub const PRIMITIVES: [(&str, Kind); 13] = [
    ("Html", Kind::Html),
    ("Head", Kind::Head),
    ("Body", Kind::Body),
    ("Container", Kind::Container),
    ("Section", Kind::Section),
    ("Text", Kind::Text),
    ("Heading", Kind::Heading),
    ("Button", Kind::Button),
    ("Img", Kind::Img),
    ("Tailwind", Kind::Tailwind),
    ("Link", Kind::Link),
    ("Hr", Kind::Hr),
    ("Preview", Kind::Preview),
];

const INTRINSIC_TAGS: [&str; 28] = [
    "div", "span", "strong", "em", "b", "i", "u", "br", "p", "a", "small", "center", "ul", "ol",
    "li", "table", "thead", "tbody", "tr", "td", "th", "h1", "h2", "h3", "h4", "h5", "h6", "img",
];

impl Kind {
    /// Looks up a whitelisted intrinsic tag, case-insensitively.
    pub fn intrinsic(tag: &str) -> Option<Kind> {
        let tag = tag.trim().to_ascii_lowercase();
        INTRINSIC_TAGS
            .iter()
            .find(|t| **t == tag)
            .map(|t| Kind::Tag(t))
    }
}

const ELEMENT_OVERHEAD: usize = 128;
const TEXT_OVERHEAD: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: Kind,
    /// Plain attributes, sorted so the markup is deterministic.
    pub attrs: BTreeMap<String, String>,
    pub class_name: Option<String>,
    /// Declarations from the `style` prop, in their final order.
    pub style: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
            class_name: None,
            style: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Approximate bytes held by this element alone: its props and text
    /// children, but not its child elements.
    pub fn own_weight(&self) -> usize {
        let attrs: usize = self.attrs.iter().map(|(k, v)| k.len() + v.len()).sum();
        let style: usize = self.style.iter().map(|(p, v)| p.len() + v.len()).sum();
        let text: usize = self
            .children
            .iter()
            .map(|child| match child {
                Node::Text(text) => TEXT_OVERHEAD + text.len(),
                Node::Element(_) => 0,
            })
            .sum();
        ELEMENT_OVERHEAD + attrs + style + self.class_name.as_ref().map_or(0, String::len) + text
    }

    /// Approximate bytes held by the whole subtree.
    pub fn weight(&self) -> usize {
        let nested: usize = self
            .children
            .iter()
            .map(|child| match child {
                Node::Element(el) => el.weight(),
                Node::Text(_) => 0,
            })
            .sum();
        self.own_weight() + nested
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

impl mlua::UserData for Element {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intrinsic_tags_are_whitelisted() {
        assert_eq!(Kind::intrinsic("DIV"), Some(Kind::Tag("div")));
        assert_eq!(Kind::intrinsic("script"), None);
        assert_eq!(Kind::intrinsic("iframe"), None);
    }

    #[test]
    fn text_content_walks_nested_children() {
        let mut inner = Element::new(Kind::Text);
        inner.children.push(Node::Text("world".to_string()));
        let mut outer = Element::new(Kind::Section);
        outer.children.push(Node::Text("hello ".to_string()));
        outer.children.push(Node::Element(inner));
        assert_eq!(outer.text_content(), "hello world");
    }

    #[test]
    fn weight_counts_every_nested_element() {
        let mut leaf = Element::new(Kind::Text);
        leaf.children.push(Node::Text("x".repeat(100)));
        let mut parent = Element::new(Kind::Section);
        parent.children.push(Node::Element(leaf.clone()));
        parent.children.push(Node::Element(leaf.clone()));
        assert_eq!(leaf.own_weight(), ELEMENT_OVERHEAD + TEXT_OVERHEAD + 100);
        assert_eq!(parent.own_weight(), ELEMENT_OVERHEAD);
        assert_eq!(parent.weight(), ELEMENT_OVERHEAD + 2 * leaf.weight());
    }
}
