//! # Template rendering
//!
//! Turns template source into a complete HTML email.
//!
//! The pipeline runs in four steps:
//!
//! 1. **Validate**: blank input is rejected before any other work happens.
//! 2. **Transpile**: module syntax (`import`, `export default`, `const`) is
//!    rewritten to plain Luau. If the rewrite fails the source runs as typed,
//!    so valid Luau is never blocked by a transpiler limitation.
//! 3. **Execute**: the source runs in a fresh sandbox (see [`sandbox`]) with
//!    the primitives, `API` and `ASSETS` as globals, and the entry component
//!    picked by [`entry::locate`] is called with no arguments.
//! 4. **Serialize**: the returned element tree becomes XHTML markup (see
//!    [`html`]), with utility classes inlined inside `Tailwind` wrappers.
//!
//! Nothing is shared between renders; a failing or runaway template cannot
//! affect the next one.

pub mod element;
pub mod entry;
pub mod html;
pub mod sandbox;
pub mod styles;
pub mod transpile;

use common::model::render::RenderOutput;
use sandbox::{Limits, Sandbox};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use transpile::{ModuleSugar, Transpile};

/// Starter template served to new editor sessions.
pub const DEFAULT_TEMPLATE: &str = include_str!("default_template.lua");

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Please enter some code to generate the email")]
    EmptyTemplate,
    #[error("No component found. Define a function whose name starts with an uppercase letter")]
    NoComponent,
    #[error("No component found: \"{0}\" is not a function")]
    EntryNotCallable(String),
    #[error("Component \"{name}\" must return an element, got {found}")]
    NotAnElement { name: String, found: &'static str },
    #[error("Rendered email is larger than the {0} byte limit")]
    TooLarge(usize),
    #[error("{0}")]
    Script(String),
}

impl RenderError {
    /// Input problems the user can fix without touching template logic.
    pub fn is_validation(&self) -> bool {
        matches!(self, RenderError::EmptyTemplate)
    }
}

impl From<mlua::Error> for RenderError {
    fn from(err: mlua::Error) -> Self {
        RenderError::Script(sandbox::describe(&err))
    }
}

/// Values exposed to a template besides its own source.
#[derive(Debug, Clone, Default)]
pub struct TemplateInputs {
    /// Becomes the `API` global.
    pub api: Map<String, Value>,
    /// Becomes the `ASSETS` global.
    pub assets: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct RenderEngine<T = ModuleSugar> {
    transpiler: T,
    limits: Limits,
}

impl RenderEngine {
    pub fn new(timeout: Duration, memory: usize) -> Self {
        Self::with_transpiler(ModuleSugar, timeout, memory)
    }
}

impl<T: Transpile> RenderEngine<T> {
    pub fn with_transpiler(transpiler: T, timeout: Duration, memory: usize) -> Self {
        Self {
            transpiler,
            limits: Limits { timeout, memory },
        }
    }

    pub fn render(&self, code: &str, inputs: &TemplateInputs) -> Result<RenderOutput, RenderError> {
        if code.trim().is_empty() {
            return Err(RenderError::EmptyTemplate);
        }

        let source = match self.transpiler.transpile(code) {
            Ok(source) => source,
            Err(err) => {
                log::warn!("Transpile failed ({}); running the template as written", err);
                code.to_string()
            }
        };

        let entry = entry::locate(&source).ok_or(RenderError::NoComponent)?;
        log::debug!(
            "Rendering entry point {} ({})",
            entry.name,
            if entry.declared { "declared" } else { "scanned" }
        );

        let sandbox = Sandbox::new(self.limits)?;
        sandbox.inject("API", &Value::Object(inputs.api.clone()))?;
        let assets = inputs
            .assets
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect();
        sandbox.inject("ASSETS", &Value::Object(assets))?;
        let root = sandbox.run(&source, &entry.name)?;

        let html = html::render_document(&root);
        if html.len() > self.limits.memory {
            return Err(RenderError::TooLarge(self.limits.memory));
        }
        Ok(RenderOutput {
            html,
            entry_point: entry.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use transpile::TranspileError;

    fn engine() -> RenderEngine {
        RenderEngine::new(Duration::from_millis(2_000), 8 * 1024 * 1024)
    }

    #[derive(Clone, Default)]
    struct Counting(Arc<AtomicUsize>);

    impl Transpile for Counting {
        fn transpile(&self, source: &str) -> Result<String, TranspileError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            transpile::transpile(source)
        }
    }

    #[test]
    fn blank_input_is_rejected_before_transpiling() {
        let counter = Counting::default();
        let engine = RenderEngine::with_transpiler(counter.clone(), Duration::from_secs(1), 1 << 23);
        for code in ["", "   ", "\n\t\n"] {
            let err = engine.render(code, &TemplateInputs::default()).unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.to_string(), "Please enter some code to generate the email");
        }
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn default_template_renders() {
        let out = engine().render(DEFAULT_TEMPLATE, &TemplateInputs::default()).unwrap();
        assert_eq!(out.entry_point, "WelcomeEmail");
        assert!(out.html.starts_with(html::DOCTYPE));
        assert!(out.html.contains("</html>"));
    }

    #[test]
    fn missing_component_is_reported() {
        let err = engine()
            .render("local x = 1\nlocal function helper() end", &TemplateInputs::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::NoComponent));
        assert!(!err.is_validation());
    }

    #[test]
    fn module_sugar_and_inputs_flow_through() {
        let code = r#"import { Html, Body, Text } from "@mail/components"
const name = API.customer.name

export default function Receipt()
  return Html { Body { Text { "Thanks " .. name, className = "font-bold" }, Text(ASSETS.footer) } }
end"#;
        let mut api = Map::new();
        api.insert("customer".to_string(), serde_json::json!({ "name": "Grace" }));
        let inputs = TemplateInputs {
            api,
            assets: BTreeMap::from([("footer".to_string(), "Acme & Co".to_string())]),
        };
        let out = engine().render(code, &inputs).unwrap();
        assert_eq!(out.entry_point, "Receipt");
        assert!(out.html.contains("Thanks Grace"));
        assert!(out.html.contains(r#"class="font-bold""#));
        assert!(out.html.contains("Acme &amp; Co"));
    }

    #[test]
    fn transpile_failure_falls_back_to_the_raw_source() {
        let code = "import from\nfunction Email() return Text 'still works' end";
        let err = engine().render(code, &TemplateInputs::default()).unwrap_err();
        // the untouched `import from` line is not valid Luau
        assert!(matches!(err, RenderError::Script(_)), "{:?}", err);

        let out = engine()
            .render("--! entry: Email\nfunction Email() return Text 'ok' end", &TemplateInputs::default())
            .unwrap();
        assert!(out.html.contains(">ok</p>"));
    }

    #[test]
    fn oversized_documents_are_rejected() {
        let code = "function Email() local e = Text 'x' for i = 1, 18 do e = Section { e, e } end return e end";
        let err = engine().render(code, &TemplateInputs::default()).unwrap_err();
        assert!(matches!(err, RenderError::Script(_)), "{:?}", err);

        // the tree fits, but escaping grows each `&` to five bytes
        let limit = 1024 * 1024;
        let small = RenderEngine::new(Duration::from_millis(2_000), limit);
        let code = "function Email() return Text(string.rep('&', 400000)) end";
        let err = small.render(code, &TemplateInputs::default()).unwrap_err();
        assert!(matches!(err, RenderError::TooLarge(l) if l == limit), "{:?}", err);
    }

    #[test]
    fn script_errors_carry_a_message() {
        let err = engine()
            .render("function Email() error('boom') end", &TemplateInputs::default())
            .unwrap_err();
        assert!(err.to_string().contains("boom"), "{}", err);
    }
}
