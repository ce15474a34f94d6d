//! Utility-class to inline-style conversion.
//!
//! Email clients strip `<style>` blocks, so classes used inside a `Tailwind`
//! wrapper are resolved against a fixed table here and written inline. Tokens
//! are applied left to right; a later token overwrites an earlier declaration
//! of the same property in place, and unknown tokens contribute nothing.

use std::collections::HashMap;
use std::sync::LazyLock;

type Declarations = Vec<(&'static str, String)>;

/// Multiples of the 4px spacing unit, keyed by their class suffix.
const SPACING: [(&str, f32); 15] = [
    ("0", 0.0),
    ("px", 0.25),
    ("0.5", 0.5),
    ("1", 1.0),
    ("1.5", 1.5),
    ("2", 2.0),
    ("2.5", 2.5),
    ("3", 3.0),
    ("4", 4.0),
    ("5", 5.0),
    ("6", 6.0),
    ("8", 8.0),
    ("10", 10.0),
    ("12", 12.0),
    ("16", 16.0),
];

const SHADES: [&str; 10] = [
    "50", "100", "200", "300", "400", "500", "600", "700", "800", "900",
];

const PALETTE: [(&str, [&str; 10]); 5] = [
    (
        "gray",
        [
            "#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af", "#6b7280", "#4b5563", "#374151",
            "#1f2937", "#111827",
        ],
    ),
    (
        "blue",
        [
            "#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8",
            "#1e40af", "#1e3a8a",
        ],
    ),
    (
        "red",
        [
            "#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626", "#b91c1c",
            "#991b1b", "#7f1d1d",
        ],
    ),
    (
        "green",
        [
            "#f0fdf4", "#dcfce7", "#bbf7d0", "#86efac", "#4ade80", "#22c55e", "#16a34a", "#15803d",
            "#166534", "#14532d",
        ],
    ),
    (
        "yellow",
        [
            "#fefce8", "#fef9c3", "#fef08a", "#fde047", "#facc15", "#eab308", "#ca8a04", "#a16207",
            "#854d0e", "#713f12",
        ],
    ),
];

const FIXED: &[(&str, &[(&str, &str)])] = &[
    ("text-xs", &[("font-size", "12px"), ("line-height", "16px")]),
    ("text-sm", &[("font-size", "14px"), ("line-height", "20px")]),
    ("text-base", &[("font-size", "16px"), ("line-height", "24px")]),
    ("text-lg", &[("font-size", "18px"), ("line-height", "28px")]),
    ("text-xl", &[("font-size", "20px"), ("line-height", "28px")]),
    ("text-2xl", &[("font-size", "24px"), ("line-height", "32px")]),
    ("text-3xl", &[("font-size", "30px"), ("line-height", "36px")]),
    ("text-4xl", &[("font-size", "36px"), ("line-height", "40px")]),
    ("font-normal", &[("font-weight", "400")]),
    ("font-medium", &[("font-weight", "500")]),
    ("font-semibold", &[("font-weight", "600")]),
    ("font-bold", &[("font-weight", "700")]),
    (
        "font-sans",
        &[(
            "font-family",
            "ui-sans-serif, system-ui, -apple-system, \"Segoe UI\", Roboto, \"Helvetica Neue\", Arial, sans-serif",
        )],
    ),
    ("font-serif", &[("font-family", "ui-serif, Georgia, Cambria, \"Times New Roman\", Times, serif")]),
    ("font-mono", &[("font-family", "ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, monospace")]),
    ("italic", &[("font-style", "italic")]),
    ("uppercase", &[("text-transform", "uppercase")]),
    ("lowercase", &[("text-transform", "lowercase")]),
    ("capitalize", &[("text-transform", "capitalize")]),
    ("text-left", &[("text-align", "left")]),
    ("text-center", &[("text-align", "center")]),
    ("text-right", &[("text-align", "right")]),
    ("leading-none", &[("line-height", "1")]),
    ("leading-tight", &[("line-height", "1.25")]),
    ("leading-normal", &[("line-height", "1.5")]),
    ("leading-relaxed", &[("line-height", "1.625")]),
    ("tracking-wide", &[("letter-spacing", "0.025em")]),
    ("underline", &[("text-decoration-line", "underline")]),
    ("no-underline", &[("text-decoration-line", "none")]),
    ("text-white", &[("color", "#ffffff")]),
    ("text-black", &[("color", "#000000")]),
    ("bg-white", &[("background-color", "#ffffff")]),
    ("bg-black", &[("background-color", "#000000")]),
    ("bg-transparent", &[("background-color", "transparent")]),
    ("block", &[("display", "block")]),
    ("inline-block", &[("display", "inline-block")]),
    ("inline", &[("display", "inline")]),
    ("hidden", &[("display", "none")]),
    ("w-full", &[("width", "100%")]),
    ("h-auto", &[("height", "auto")]),
    ("mx-auto", &[("margin-left", "auto"), ("margin-right", "auto")]),
    ("my-auto", &[("margin-top", "auto"), ("margin-bottom", "auto")]),
    ("max-w-md", &[("max-width", "448px")]),
    ("max-w-lg", &[("max-width", "512px")]),
    ("max-w-xl", &[("max-width", "576px")]),
    ("max-w-2xl", &[("max-width", "672px")]),
    ("rounded-none", &[("border-radius", "0px")]),
    ("rounded-sm", &[("border-radius", "2px")]),
    ("rounded", &[("border-radius", "4px")]),
    ("rounded-md", &[("border-radius", "6px")]),
    ("rounded-lg", &[("border-radius", "8px")]),
    ("rounded-xl", &[("border-radius", "12px")]),
    ("rounded-full", &[("border-radius", "9999px")]),
    ("border", &[("border-width", "1px"), ("border-style", "solid")]),
    ("border-2", &[("border-width", "2px"), ("border-style", "solid")]),
    ("border-t", &[("border-top-width", "1px"), ("border-top-style", "solid")]),
    ("border-b", &[("border-bottom-width", "1px"), ("border-bottom-style", "solid")]),
    ("border-solid", &[("border-style", "solid")]),
    ("border-none", &[("border-style", "none")]),
    ("shadow-sm", &[("box-shadow", "0 1px 2px 0 rgba(0, 0, 0, 0.05)")]),
    (
        "shadow",
        &[("box-shadow", "0 1px 3px 0 rgba(0, 0, 0, 0.1), 0 1px 2px -1px rgba(0, 0, 0, 0.1)")],
    ),
    (
        "shadow-md",
        &[("box-shadow", "0 4px 6px -1px rgba(0, 0, 0, 0.1), 0 2px 4px -2px rgba(0, 0, 0, 0.1)")],
    ),
];

/// Spacing utilities and the properties each prefix sets.
const SPACING_PREFIXES: [(&str, &[&str]); 14] = [
    ("p", &["padding"]),
    ("px", &["padding-left", "padding-right"]),
    ("py", &["padding-top", "padding-bottom"]),
    ("pt", &["padding-top"]),
    ("pr", &["padding-right"]),
    ("pb", &["padding-bottom"]),
    ("pl", &["padding-left"]),
    ("m", &["margin"]),
    ("mx", &["margin-left", "margin-right"]),
    ("my", &["margin-top", "margin-bottom"]),
    ("mt", &["margin-top"]),
    ("mr", &["margin-right"]),
    ("mb", &["margin-bottom"]),
    ("ml", &["margin-left"]),
];

static TABLE: LazyLock<HashMap<String, Declarations>> = LazyLock::new(build_table);

fn build_table() -> HashMap<String, Declarations> {
    let mut table: HashMap<String, Declarations> = HashMap::new();

    for (token, decls) in FIXED {
        table.insert(
            token.to_string(),
            decls.iter().map(|(p, v)| (*p, v.to_string())).collect(),
        );
    }

    for (prefix, properties) in SPACING_PREFIXES {
        for (suffix, units) in SPACING {
            let value = format!("{}px", units * 4.0);
            table.insert(
                format!("{}-{}", prefix, suffix),
                properties.iter().map(|p| (*p, value.clone())).collect(),
            );
        }
    }

    for (color, hexes) in PALETTE {
        for (shade, hex) in SHADES.iter().zip(hexes) {
            for (prefix, property) in [
                ("text", "color"),
                ("bg", "background-color"),
                ("border", "border-color"),
            ] {
                table.insert(
                    format!("{}-{}-{}", prefix, color, shade),
                    vec![(property, hex.to_string())],
                );
            }
        }
    }

    table
}

/// Resolves a whitespace-separated class list to ordered declarations.
pub fn class_to_style(classes: &str) -> Vec<(String, String)> {
    let mut style = Vec::new();
    for token in classes.split_whitespace() {
        if let Some(decls) = TABLE.get(token) {
            for (property, value) in decls {
                merge_declaration(&mut style, property, value);
            }
        }
    }
    style
}

/// Sets `property`, replacing an existing declaration without moving it.
pub fn merge_declaration(style: &mut Vec<(String, String)>, property: &str, value: &str) {
    match style.iter_mut().find(|(p, _)| p == property) {
        Some(slot) => slot.1 = value.to_string(),
        None => style.push((property.to_string(), value.to_string())),
    }
}

pub fn to_inline(style: &[(String, String)]) -> String {
    style
        .iter()
        .map(|(p, v)| format!("{}:{}", p, v))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(classes: &str) -> String {
        to_inline(&class_to_style(classes))
    }

    #[test]
    fn tokens_expand_in_order() {
        assert_eq!(
            inline("bg-white p-4 text-gray-900"),
            "background-color:#ffffff;padding:16px;color:#111827"
        );
    }

    #[test]
    fn later_tokens_overwrite_in_place() {
        assert_eq!(
            inline("p-4 text-center p-2"),
            "padding:8px;text-align:center"
        );
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        assert_eq!(inline("sm:p-4 hover:underline does-not-exist"), "");
        assert_eq!(inline("  font-bold   nope "), "font-weight:700");
    }

    #[test]
    fn multi_property_tokens() {
        assert_eq!(inline("mx-auto"), "margin-left:auto;margin-right:auto");
        assert_eq!(inline("py-2"), "padding-top:8px;padding-bottom:8px");
        assert_eq!(inline("p-0.5 px-px"), "padding:2px;padding-left:1px;padding-right:1px");
    }
}
