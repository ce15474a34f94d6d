//! A throwaway Luau state for one render.
//!
//! Every render gets a fresh state: sandboxed standard library, a heap limit,
//! and an interrupt that aborts the script once its time budget is spent.
//! Host access (`os`, `require`, `debug`, ...) is replaced by functions that
//! raise an error, and the element primitives are the only way out of the VM.

use super::element::{Element, Kind, Node, PRIMITIVES};
use super::RenderError;
use mlua::{Lua, LuaSerdeExt, Table, Value, VmState};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

/// Globals a template may not reach.
const BLOCKED: [&str; 9] = [
    "os",
    "require",
    "loadstring",
    "getfenv",
    "setfenv",
    "debug",
    "collectgarbage",
    "newproxy",
    "coroutine",
];

/// Style properties whose numeric values take no `px` suffix.
const UNITLESS: [&str; 6] = ["font-weight", "line-height", "opacity", "z-index", "flex", "order"];

static ATTRIBUTE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_:.-]*$").expect("attribute name pattern"));

#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub timeout: Duration,
    /// Caps the Luau heap and, separately, the element tree built from it.
    pub memory: usize,
}

/// Bytes of element tree a render may build.
///
/// Elements live on the Rust heap and nesting one copies its subtree, so the
/// Luau allocator never sees this memory. Charges are never refunded.
#[derive(Debug)]
struct TreeBudget {
    used: AtomicUsize,
    max: usize,
}

impl TreeBudget {
    fn new(max: usize) -> Self {
        Self {
            used: AtomicUsize::new(0),
            max,
        }
    }

    fn charge(&self, bytes: usize) -> mlua::Result<()> {
        let used = self.used.fetch_add(bytes, Ordering::Relaxed).saturating_add(bytes);
        if used > self.max {
            return Err(mlua::Error::RuntimeError(format!(
                "template output exceeds the {} byte limit",
                self.max
            )));
        }
        Ok(())
    }
}

pub struct Sandbox {
    lua: Lua,
}

impl Sandbox {
    pub fn new(limits: Limits) -> mlua::Result<Self> {
        let lua = Lua::new();
        lua.sandbox(true)?;

        let globals = lua.globals();
        for name in BLOCKED {
            let msg = format!("{} is not available in templates", name);
            globals.set(
                name,
                lua.create_function(move |_, _: mlua::Variadic<Value>| {
                    Err::<(), _>(mlua::Error::RuntimeError(msg.clone()))
                })?,
            )?;
        }

        globals.set(
            "print",
            lua.create_function(|_, args: mlua::Variadic<Value>| {
                let line: Vec<String> = args.iter().map(display).collect();
                log::debug!("[template] {}", line.join(" "));
                Ok(())
            })?,
        )?;

        let budget = Arc::new(TreeBudget::new(limits.memory));
        for (name, kind) in PRIMITIVES {
            let budget = budget.clone();
            globals.set(
                name,
                lua.create_function(move |_, props: Value| build(kind, props, &budget))?,
            )?;
        }
        globals.set(
            "El",
            lua.create_function(move |_, (tag, props): (String, Value)| {
                let kind = Kind::intrinsic(&tag).ok_or_else(|| {
                    mlua::Error::RuntimeError(format!("<{}> is not an allowed tag", tag))
                })?;
                build(kind, props, &budget)
            })?,
        )?;

        let deadline = Instant::now() + limits.timeout;
        let millis = limits.timeout.as_millis();
        lua.set_interrupt(move |_| {
            if Instant::now() >= deadline {
                return Err(mlua::Error::RuntimeError(format!(
                    "template did not finish within {} ms",
                    millis
                )));
            }
            Ok(VmState::Continue)
        });
        lua.set_memory_limit(limits.memory)?;

        Ok(Self { lua })
    }

    /// Exposes a JSON value to the template under a global name.
    pub fn inject(&self, name: &str, value: &serde_json::Value) -> mlua::Result<()> {
        let value = self.lua.to_value(value)?;
        self.lua.globals().set(name, value)
    }

    /// Runs the template and calls its entry component with no arguments.
    pub fn run(&self, source: &str, entry: &str) -> Result<Element, RenderError> {
        let chunk = format!("{}\nreturn {}", source, entry);
        let component = self
            .lua
            .load(chunk)
            .set_name("template")
            .into_function()?
            .call::<Value>(())?;

        let Value::Function(component) = component else {
            return Err(RenderError::EntryNotCallable(entry.to_string()));
        };

        match component.call::<Value>(())? {
            Value::UserData(ud) => {
                let root = ud.borrow::<Element>()?;
                Ok(Element::clone(&root))
            }
            other => Err(RenderError::NotAnElement {
                name: entry.to_string(),
                found: other.type_name(),
            }),
        }
    }
}

/// Turns an mlua error into the message shown to the template author.
pub fn describe(err: &mlua::Error) -> String {
    match err {
        mlua::Error::CallbackError { cause, .. } => describe(cause),
        mlua::Error::WithContext { cause, .. } => describe(cause),
        mlua::Error::SyntaxError { message, .. } => message.clone(),
        mlua::Error::RuntimeError(message) => message
            .split("\nstack traceback:")
            .next()
            .unwrap_or(message)
            .trim()
            .to_string(),
        mlua::Error::MemoryError(_) => "template exceeded its memory limit".to_string(),
        other => other.to_string(),
    }
}

fn build(kind: Kind, props: Value, budget: &TreeBudget) -> mlua::Result<Element> {
    let mut el = Element::new(kind);
    match props {
        Value::Nil => {}
        Value::Table(props) => read_props(&mut el, &props, budget)?,
        other => push_child(&mut el.children, other, budget)?,
    }
    budget.charge(el.own_weight())?;
    Ok(el)
}

/// String keys are props; the array part holds the children.
fn read_props(el: &mut Element, props: &Table, budget: &TreeBudget) -> mlua::Result<()> {
    for pair in props.pairs::<Value, Value>() {
        let (key, value) = pair?;
        let Value::String(key) = key else { continue };
        let key = String::from(&*key.to_str()?);
        match key.as_str() {
            "className" | "class" => el.class_name = scalar(&value)?,
            "style" => read_style(el, value)?,
            "children" => push_child(&mut el.children, value, budget)?,
            _ => {
                let Some(name) = attribute_name(&key)? else {
                    log::debug!("Dropping event handler prop {}", key);
                    continue;
                };
                if let Some(value) = scalar(&value)? {
                    el.attrs.insert(name, value);
                }
            }
        }
    }
    for child in props.sequence_values::<Value>() {
        push_child(&mut el.children, child?, budget)?;
    }
    Ok(())
}

fn read_style(el: &mut Element, value: Value) -> mlua::Result<()> {
    match value {
        Value::Nil => {}
        Value::String(s) => {
            for decl in s.to_str()?.split(';') {
                if let Some((property, value)) = decl.split_once(':') {
                    let (property, value) = (property.trim(), value.trim());
                    if !property.is_empty() && !value.is_empty() {
                        el.style.push((property.to_string(), value.to_string()));
                    }
                }
            }
        }
        Value::Table(table) => {
            let mut sorted = BTreeMap::new();
            for pair in table.pairs::<String, Value>() {
                let (key, value) = pair?;
                let property = css_property(&key);
                let value = match value {
                    Value::Integer(n) => numeric(&property, n as f64),
                    Value::Number(n) => numeric(&property, n),
                    other => match scalar(&other)? {
                        Some(v) => v,
                        None => continue,
                    },
                };
                sorted.insert(property, value);
            }
            el.style.extend(sorted);
        }
        other => {
            return Err(mlua::Error::RuntimeError(format!(
                "style must be a table or a string, got {}",
                other.type_name()
            )));
        }
    }
    Ok(())
}

fn push_child(children: &mut Vec<Node>, value: Value, budget: &TreeBudget) -> mlua::Result<()> {
    match value {
        Value::Nil | Value::Boolean(_) => {}
        Value::String(s) => children.push(Node::Text(String::from(&*s.to_str()?))),
        Value::Integer(n) => children.push(Node::Text(n.to_string())),
        Value::Number(n) => children.push(Node::Text(format_number(n))),
        Value::UserData(ud) => {
            let el = ud.borrow::<Element>()?;
            budget.charge(el.weight())?;
            children.push(Node::Element(Element::clone(&el)));
        }
        Value::Table(list) => {
            for child in list.sequence_values::<Value>() {
                push_child(children, child?, budget)?;
            }
        }
        other => {
            return Err(mlua::Error::RuntimeError(format!(
                "cannot render a {} as a child",
                other.type_name()
            )));
        }
    }
    Ok(())
}

/// Attribute value; `nil` and `false` drop the attribute.
fn scalar(value: &Value) -> mlua::Result<Option<String>> {
    Ok(match value {
        Value::Nil | Value::Boolean(false) => None,
        Value::Boolean(true) => Some(String::new()),
        Value::String(s) => Some(String::from(&*s.to_str()?)),
        Value::Integer(n) => Some(n.to_string()),
        Value::Number(n) => Some(format_number(*n)),
        other => {
            return Err(mlua::Error::RuntimeError(format!(
                "expected a string or number, got {}",
                other.type_name()
            )));
        }
    })
}

/// Markup name for a prop. Event handlers map to `None`; names that are not
/// plain attribute names are an error.
fn attribute_name(prop: &str) -> mlua::Result<Option<String>> {
    if !ATTRIBUTE_NAME.is_match(prop) {
        return Err(mlua::Error::RuntimeError(format!(
            "{:?} is not a valid attribute name",
            prop
        )));
    }
    if prop.len() > 2 && prop[..2].eq_ignore_ascii_case("on") {
        return Ok(None);
    }
    Ok(Some(match prop {
        "htmlFor" => "for".to_string(),
        "cellPadding" => "cellpadding".to_string(),
        "cellSpacing" => "cellspacing".to_string(),
        other => other.to_string(),
    }))
}

/// `fontSize` -> `font-size`.
fn css_property(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn numeric(property: &str, n: f64) -> String {
    if n == 0.0 || UNITLESS.contains(&property) {
        format_number(n)
    } else {
        format!("{}px", format_number(n))
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.to_string_lossy().to_string(),
        other => other.type_name().to_string(),
    }
}
