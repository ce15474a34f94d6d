use common::model::render::RenderOutput;

pub enum Msg {
    UpdateText(String),
    SetTab(String),
    Generate,
    Rendered {
        ticket: u64,
        result: Result<RenderOutput, String>,
    },
    ToggleEndpointData(bool),
    CopyHtml,
    DownloadHtml,
    /// Replaces the text with a document that counts as saved.
    DocumentLoaded(String),
    /// The given template text was stored remotely.
    Saved(String),
}
