//! Strips module syntax that editors and snippets commonly carry.
//!
//! Templates are plain Luau, but users paste code written against a module
//! system (`import ... from`, `export default function`, `const`). The rewrite
//! works line by line and keeps the line count, so script errors still point
//! at the line the user typed. Text inside `[[ ... ]]` long strings is left
//! alone.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranspileError {
    #[error("line {0}: malformed import statement")]
    MalformedImport(usize),
    #[error("line {0}: unsupported export form")]
    UnsupportedExport(usize),
}

/// Source rewriting applied before a template is executed.
pub trait Transpile: Send + Sync {
    fn transpile(&self, source: &str) -> Result<String, TranspileError>;
}

/// The default rewrite rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleSugar;

impl Transpile for ModuleSugar {
    fn transpile(&self, source: &str) -> Result<String, TranspileError> {
        transpile(source)
    }
}

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*import\s+(?:[\w*{}\s,]+\s+from\s+)?["'][^"']+["']\s*;?\s*$"#)
        .expect("import pattern")
});
static EXPORT_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)export\s+(?:default\s+)?(?:local\s+)?function\s+").expect("export pattern")
});
static EXPORT_DEFAULT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)export\s+default\s+([A-Za-z_][A-Za-z0-9_]*)\s*;?\s*$")
        .expect("export default pattern")
});
static EXPORT_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)export\s+(?:const|let|local)\s+").expect("export binding pattern")
});
static BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)(?:const|let)\s+([A-Za-z_][A-Za-z0-9_]*)\s*=").expect("binding pattern")
});
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)//").expect("comment pattern"));

pub fn transpile(source: &str) -> Result<String, TranspileError> {
    let mut out = Vec::new();
    let mut in_long_string = false;

    for (index, line) in source.lines().enumerate() {
        let number = index + 1;
        if in_long_string {
            in_long_string = !line.contains("]]");
            out.push(line.to_string());
            continue;
        }
        out.push(rewrite_line(line, number)?);
        in_long_string = opens_long_string(line);
    }

    let mut result = out.join("\n");
    if source.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

fn rewrite_line(line: &str, number: usize) -> Result<String, TranspileError> {
    let trimmed = line.trim_start();

    if trimmed.starts_with("import ") || trimmed == "import" {
        return if IMPORT.is_match(line) {
            Ok(String::new())
        } else {
            Err(TranspileError::MalformedImport(number))
        };
    }

    if trimmed.starts_with("export ") || trimmed == "export" {
        if EXPORT_FUNCTION.is_match(line) {
            return Ok(EXPORT_FUNCTION.replace(line, "${1}function ").into_owned());
        }
        if EXPORT_BINDING.is_match(line) {
            return Ok(EXPORT_BINDING.replace(line, "${1}local ").into_owned());
        }
        if let Some(caps) = EXPORT_DEFAULT_NAME.captures(line) {
            return Ok(format!("{}--! entry: {}", &caps[1], &caps[2]));
        }
        return Err(TranspileError::UnsupportedExport(number));
    }

    if BINDING.is_match(line) {
        return Ok(BINDING.replace(line, "${1}local ${2} =").into_owned());
    }

    Ok(LINE_COMMENT.replace(line, "${1}--").into_owned())
}

/// True when the line leaves a `[[` long string open.
fn opens_long_string(line: &str) -> bool {
    match line.rfind("[[") {
        Some(open) => !line[open..].contains("]]"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_luau_passes_through() {
        let src = "local function Email()\n  return Text \"hi\"\nend\n";
        assert_eq!(transpile(src).unwrap(), src);
    }

    #[test]
    fn module_sugar_is_rewritten() {
        let src = "import { Text } from \"@mail/components\";\n\
                   const greeting = \"hi\"\n\
                   // the component\n\
                   export default function Welcome()\n\
                   \treturn Text(greeting)\n\
                   end";
        let out = transpile(src).unwrap();
        assert_eq!(
            out,
            "\nlocal greeting = \"hi\"\n-- the component\nfunction Welcome()\n\treturn Text(greeting)\nend"
        );
    }

    #[test]
    fn export_default_name_becomes_a_manifest() {
        let out = transpile("local function Card() end\nexport default Card;").unwrap();
        assert!(out.ends_with("--! entry: Card"));
    }

    #[test]
    fn line_numbers_are_kept() {
        let src = "import 'x'\nimport y from 'y'\nfunction A() end";
        assert_eq!(transpile(src).unwrap().lines().count(), 3);
    }

    #[test]
    fn long_strings_are_untouched() {
        let src = "local s = [[\nimport nothing\nconst x = 1\n]]\nconst y = 2";
        let out = transpile(src).unwrap();
        assert_eq!(out, "local s = [[\nimport nothing\nconst x = 1\n]]\nlocal y = 2");
    }

    #[test]
    fn malformed_syntax_is_reported_with_its_line() {
        assert_eq!(
            transpile("local a = 1\nimport from").unwrap_err(),
            TranspileError::MalformedImport(2)
        );
        assert_eq!(
            transpile("export { a, b }").unwrap_err(),
            TranspileError::UnsupportedExport(1)
        );
    }
}
