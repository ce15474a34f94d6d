//! Serializes an element tree into email-client friendly XHTML.
//!
//! Layout primitives become presentation tables, the way mail clients expect,
//! and each primitive carries the base styles email templates conventionally
//! start from. Explicit `style` declarations always win over class-derived
//! ones, which in turn win over the base styles.

use super::element::{Element, Kind, Node};
use super::styles::{class_to_style, merge_declaration, to_inline};

pub const DOCTYPE: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#;

const HEAD_META: &str = r#"<meta content="text/html; charset=UTF-8" http-equiv="Content-Type"/><meta name="x-apple-disable-message-reformatting"/>"#;

const VOID_TAGS: [&str; 4] = ["br", "hr", "img", "meta"];

/// Renders a full document, doctype included.
pub fn render_document(root: &Element) -> String {
    let mut out = String::from(DOCTYPE);
    write_element(&mut out, root, false);
    out
}

fn write_children(out: &mut String, children: &[Node], inline_classes: bool) {
    for child in children {
        match child {
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Element(el) => write_element(out, el, inline_classes),
        }
    }
}

fn write_element(out: &mut String, el: &Element, inline_classes: bool) {
    match el.kind {
        Kind::Tailwind => write_children(out, &el.children, true),
        Kind::Head => {
            open_tag(out, "head", el, &[], &[], inline_classes);
            out.push_str(HEAD_META);
            write_children(out, &el.children, inline_classes);
            out.push_str("</head>");
        }
        Kind::Preview => {
            out.push_str(
                r#"<div style="display:none;overflow:hidden;line-height:1px;opacity:0;max-height:0;max-width:0">"#,
            );
            out.push_str(&escape_text(&el.text_content()));
            out.push_str("</div>");
        }
        Kind::Container | Kind::Section => {
            let base: &[(&str, &str)] = if el.kind == Kind::Container {
                &[("max-width", "37.5em")]
            } else {
                &[]
            };
            let table_attrs = [
                ("align", "center"),
                ("width", "100%"),
                ("border", "0"),
                ("cellpadding", "0"),
                ("cellspacing", "0"),
                ("role", "presentation"),
            ];
            open_tag(out, "table", el, &table_attrs, base, inline_classes);
            out.push_str(r#"<tbody><tr style="width:100%"><td>"#);
            write_children(out, &el.children, inline_classes);
            out.push_str("</td></tr></tbody></table>");
        }
        Kind::Heading => {
            let tag = match el.attrs.get("as").map(String::as_str) {
                Some(level @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6")) => level,
                _ => "h1",
            };
            wrap(out, tag, el, &[], &[], inline_classes);
        }
        Kind::Text => wrap(
            out,
            "p",
            el,
            &[],
            &[("font-size", "14px"), ("line-height", "24px"), ("margin", "16px 0")],
            inline_classes,
        ),
        Kind::Button => wrap(
            out,
            "a",
            el,
            &[("target", "_blank")],
            &[
                ("line-height", "100%"),
                ("text-decoration", "none"),
                ("display", "inline-block"),
                ("max-width", "100%"),
                ("mso-padding-alt", "0px"),
            ],
            inline_classes,
        ),
        Kind::Link => wrap(
            out,
            "a",
            el,
            &[("target", "_blank")],
            &[("color", "#067df7"), ("text-decoration-line", "none")],
            inline_classes,
        ),
        Kind::Img => {
            let base = [
                ("display", "block"),
                ("outline", "none"),
                ("border", "none"),
                ("text-decoration", "none"),
            ];
            open_tag(out, "img", el, &[], &base, inline_classes);
        }
        Kind::Hr => {
            let base = [
                ("width", "100%"),
                ("border", "none"),
                ("border-top", "1px solid #eaeaea"),
            ];
            open_tag(out, "hr", el, &[], &base, inline_classes);
        }
        Kind::Html => wrap(
            out,
            "html",
            el,
            &[("lang", "en"), ("dir", "ltr")],
            &[],
            inline_classes,
        ),
        Kind::Body => wrap(out, "body", el, &[], &[], inline_classes),
        Kind::Tag(tag) if VOID_TAGS.contains(&tag) => {
            open_tag(out, tag, el, &[], &[], inline_classes);
        }
        Kind::Tag(tag) => wrap(out, tag, el, &[], &[], inline_classes),
    }
}

fn wrap(
    out: &mut String,
    tag: &str,
    el: &Element,
    defaults: &[(&str, &str)],
    base: &[(&str, &str)],
    inline_classes: bool,
) {
    open_tag(out, tag, el, defaults, base, inline_classes);
    write_children(out, &el.children, inline_classes);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Writes the opening tag; void tags are self-closed.
fn open_tag(
    out: &mut String,
    tag: &str,
    el: &Element,
    defaults: &[(&str, &str)],
    base: &[(&str, &str)],
    inline_classes: bool,
) {
    out.push('<');
    out.push_str(tag);

    for (name, value) in defaults {
        if !el.attrs.contains_key(*name) {
            push_attr(out, name, value);
        }
    }
    for (name, value) in &el.attrs {
        if el.kind == Kind::Heading && name == "as" {
            continue;
        }
        push_attr(out, name, value);
    }

    let mut style: Vec<(String, String)> = base
        .iter()
        .map(|(p, v)| (p.to_string(), v.to_string()))
        .collect();
    if let Some(classes) = el.class_name.as_deref() {
        if inline_classes {
            for (p, v) in class_to_style(classes) {
                merge_declaration(&mut style, &p, &v);
            }
        } else if !classes.trim().is_empty() {
            push_attr(out, "class", classes.trim());
        }
    }
    for (p, v) in &el.style {
        merge_declaration(&mut style, p, v);
    }
    if !style.is_empty() {
        push_attr(out, "style", &to_inline(&style));
    }

    if VOID_TAGS.contains(&tag) {
        out.push_str("/>");
    } else {
        out.push('>');
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attr(value));
    out.push('"');
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(kind: Kind, content: &str) -> Element {
        let mut el = Element::new(kind);
        el.children.push(Node::Text(content.to_string()));
        el
    }

    fn render(el: &Element) -> String {
        let mut out = String::new();
        write_element(&mut out, el, false);
        out
    }

    #[test]
    fn document_starts_with_the_doctype() {
        let html = render_document(&Element::new(Kind::Html));
        assert!(html.starts_with("<!DOCTYPE html PUBLIC"));
        assert!(html.ends_with(r#"<html lang="en" dir="ltr"></html>"#));
    }

    #[test]
    fn classes_inline_only_inside_tailwind() {
        let mut plain = text(Kind::Text, "hi");
        plain.class_name = Some("text-center".to_string());
        assert_eq!(
            render(&plain),
            r#"<p class="text-center" style="font-size:14px;line-height:24px;margin:16px 0">hi</p>"#
        );

        let mut wrapper = Element::new(Kind::Tailwind);
        wrapper.children.push(Node::Element(plain));
        assert_eq!(
            render(&wrapper),
            r#"<p style="font-size:14px;line-height:24px;margin:16px 0;text-align:center">hi</p>"#
        );
    }

    #[test]
    fn explicit_style_beats_classes() {
        let mut el = text(Kind::Tag("span"), "x");
        el.class_name = Some("text-red-600 font-bold".to_string());
        el.style.push(("color".to_string(), "#123456".to_string()));
        let mut wrapper = Element::new(Kind::Tailwind);
        wrapper.children.push(Node::Element(el));
        assert_eq!(
            render(&wrapper),
            r#"<span style="color:#123456;font-weight:700">x</span>"#
        );
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let mut link = text(Kind::Link, "<b>&</b>");
        link.attrs.insert("href".to_string(), "https://x.test/?a=1&b=\"2\"".to_string());
        let html = render(&link);
        assert!(html.contains(r#"href="https://x.test/?a=1&amp;b=&quot;2&quot;""#));
        assert!(html.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
    }

    #[test]
    fn headings_pick_their_level() {
        let mut h = text(Kind::Heading, "Title");
        h.attrs.insert("as".to_string(), "h2".to_string());
        assert_eq!(render(&h), "<h2>Title</h2>");
    }

    #[test]
    fn void_tags_self_close() {
        let mut img = Element::new(Kind::Img);
        img.attrs.insert("src".to_string(), "logo.png".to_string());
        let html = render(&img);
        assert!(html.starts_with(r#"<img src="logo.png" style="display:block"#));
        assert!(html.ends_with("/>"));
    }

    #[test]
    fn containers_are_presentation_tables() {
        let html = render(&text(Kind::Container, "body"));
        assert!(html.starts_with(r#"<table align="center" width="100%" border="0" cellpadding="0" cellspacing="0" role="presentation" style="max-width:37.5em">"#));
        assert!(html.ends_with("body</td></tr></tbody></table>"));
    }
}
