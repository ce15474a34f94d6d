//! Component state for the template editor.

use crate::helpers::compute_md5;
use common::model::render::{RenderOutput, RenderSequence};
use yew::prelude::*;

pub const PREVIEW_TAB: &str = "preview";
pub const MARKUP_TAB: &str = "markup";

/// Main state container for the `EditorComponent`.
///
/// Fields are `pub` because they are accessed by `view` and `update` modules.
pub struct EditorComponent {
    /// Current template source.
    pub text: String,

    pub textarea_ref: NodeRef,

    /// Right pane: `"preview"` or `"markup"`.
    pub active_tab: String,

    /// Last successful render. Cleared whenever a render fails so a stale
    /// preview is never shown next to an error.
    pub output: Option<RenderOutput>,

    pub error: Option<String>,

    /// A render request is in flight.
    pub rendering: bool,

    /// Tickets for render requests; only the newest response is applied.
    pub sequence: RenderSequence,

    /// Feed the cached endpoint responses to the template as `API`.
    pub use_endpoint_data: bool,

    /// MD5 of the text last loaded or saved. Used for dirty tracking.
    pub original_md5: Option<String>,

    /// Guard to avoid running first-render initialization more than once.
    pub loaded: bool,
}

impl EditorComponent {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            textarea_ref: NodeRef::default(),
            active_tab: PREVIEW_TAB.to_string(),
            output: None,
            error: None,
            rendering: false,
            sequence: RenderSequence::default(),
            use_endpoint_data: false,
            original_md5: None,
            loaded: false,
        }
    }

    /// True when the text differs from what was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.original_md5
            .as_ref()
            .map_or(!self.text.is_empty(), |orig| orig != &compute_md5(&self.text))
    }

    pub fn rendered_html(&self) -> Option<&str> {
        self.output.as_ref().map(|o| o.html.as_str())
    }

    /// Applies a render response. Responses for superseded tickets are
    /// ignored; returns whether anything changed.
    pub fn apply_render(&mut self, ticket: u64, result: Result<RenderOutput, String>) -> bool {
        if !self.sequence.is_current(ticket) {
            return false;
        }
        self.rendering = false;
        match result {
            Ok(output) => {
                self.output = Some(output);
                self.error = None;
            }
            Err(message) => {
                self.output = None;
                self.error = Some(message);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirty_tracks_the_saved_digest() {
        let mut editor = EditorComponent::new();
        assert!(!editor.is_dirty());
        editor.text = "function Email() end".to_string();
        assert!(editor.is_dirty());
        editor.original_md5 = Some(compute_md5(&editor.text));
        assert!(!editor.is_dirty());
        editor.text.push(' ');
        assert!(editor.is_dirty());
    }

    fn output(html: &str) -> RenderOutput {
        RenderOutput {
            html: html.to_string(),
            entry_point: "Email".to_string(),
        }
    }

    #[test]
    fn failed_render_clears_the_previous_output() {
        let mut editor = EditorComponent::new();
        let first = editor.sequence.next();
        assert!(editor.apply_render(first, Ok(output("<p>one</p>"))));
        assert_eq!(editor.rendered_html(), Some("<p>one</p>"));

        let second = editor.sequence.next();
        editor.rendering = true;
        assert!(editor.apply_render(second, Err("boom".to_string())));
        assert_eq!(editor.rendered_html(), None);
        assert_eq!(editor.error.as_deref(), Some("boom"));
        assert!(!editor.rendering);

        let third = editor.sequence.next();
        assert!(editor.apply_render(third, Ok(output("<p>two</p>"))));
        assert_eq!(editor.error, None);
    }

    #[test]
    fn stale_responses_are_ignored() {
        let mut editor = EditorComponent::new();
        let stale = editor.sequence.next();
        let current = editor.sequence.next();
        editor.rendering = true;

        assert!(!editor.apply_render(stale, Err("late".to_string())));
        assert!(editor.rendering);
        assert_eq!(editor.error, None);

        assert!(editor.apply_render(current, Ok(output("<p>ok</p>"))));
        assert_eq!(editor.rendered_html(), Some("<p>ok</p>"));
    }
}
