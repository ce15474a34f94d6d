//! Picks the component a template renders.
//!
//! A `--! entry: Name` manifest line wins. Without one, the first function
//! declaration whose name starts with an uppercase letter is used.

use regex::Regex;
use std::sync::LazyLock;

static MANIFEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*--![ \t]*entry[ \t]*:[ \t]*([A-Za-z_][A-Za-z0-9_]*)[ \t]*$")
        .expect("manifest pattern")
});

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:local[ \t]+)?(?:function[ \t]+([A-Z][A-Za-z0-9_]*)[ \t]*\(|([A-Z][A-Za-z0-9_]*)[ \t]*=[ \t]*function\b)",
    )
    .expect("declaration pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub name: String,
    /// Named by a manifest line rather than found by scanning.
    pub declared: bool,
}

pub fn locate(source: &str) -> Option<EntryPoint> {
    if let Some(caps) = MANIFEST.captures(source) {
        return Some(EntryPoint {
            name: caps[1].to_string(),
            declared: true,
        });
    }
    DECLARATION.captures(source).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|name| EntryPoint {
                name: name.as_str().to_string(),
                declared: false,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(source: &str) -> Option<String> {
        locate(source).map(|entry| entry.name)
    }

    #[test]
    fn first_uppercase_declaration_wins() {
        let src = "local function helper() end\nlocal function Header() end\nfunction Email() end";
        assert_eq!(name(src).as_deref(), Some("Header"));
    }

    #[test]
    fn assigned_functions_count() {
        assert_eq!(name("local Card = function()\nend").as_deref(), Some("Card"));
        assert_eq!(name("Promo=function() end").as_deref(), Some("Promo"));
    }

    #[test]
    fn manifest_overrides_scan_order() {
        let src = "local function Header() end\nfunction Email() end\n--! entry: Email";
        let entry = locate(src).unwrap();
        assert_eq!(entry.name, "Email");
        assert!(entry.declared);
    }

    #[test]
    fn lowercase_and_non_functions_are_skipped() {
        assert_eq!(name("local function email() end"), None);
        assert_eq!(name("local Theme = { color = 'red' }"), None);
        assert_eq!(name("-- function Commented() end"), None);
    }
}
