use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StoragePanelProps {
    /// Template source currently in the editor.
    pub code: String,
    /// Last rendered markup, if any.
    #[prop_or_default]
    pub html: Option<String>,
    /// Receives the content of a file the user opened.
    pub on_open: Callback<String>,
    /// Receives the template source after it was saved.
    pub on_saved: Callback<String>,
}
