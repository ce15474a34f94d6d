//! View rendering for the template editor.
//!
//! Three columns: the source editor, the preview (rendered page or raw
//! markup) and the endpoint panel. The storage panel sits in the header.
//! The preview iframe gets the markup through `srcdoc` with scripts disabled.

use super::messages::Msg;
use super::state::{EditorComponent, MARKUP_TAB, PREVIEW_TAB};
use crate::components::endpoints::EndpointsPanel;
use crate::components::storage::StoragePanel;
use crate::workspace_grid::WorkspaceGrid;
use web_sys::{HtmlInputElement, HtmlTextAreaElement, InputEvent, KeyboardEvent};
use yew::html::Scope;
use yew::prelude::*;

pub fn view(component: &EditorComponent, ctx: &Context<EditorComponent>) -> Html {
    let link = ctx.link();

    html! {
        <div class="editor-root">
            { build_header(component, link) }
            <WorkspaceGrid columns="minmax(0, 1fr) minmax(0, 1fr) 340px">
                { build_source_pane(component, link) }
                { build_preview_pane(component, link) }
                <EndpointsPanel />
            </WorkspaceGrid>
        </div>
    }
}

fn build_header(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    let entry = component
        .output
        .as_ref()
        .map(|o| o.entry_point.clone());

    html! {
        <header class="app-header">
            <span class="app-title">{"mailforge"}</span>
            {
                match entry {
                    Some(name) => html! { <span class="entry-label" title="Rendered component">{ name }</span> },
                    None => html! {},
                }
            }
            <div class="spacer" />
            <StoragePanel
                code={component.text.clone()}
                html={component.rendered_html().map(str::to_string)}
                on_open={link.callback(Msg::DocumentLoaded)}
                on_saved={link.callback(Msg::Saved)}
            />
        </header>
    }
}

fn build_source_pane(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    let on_input = link.callback(|e: InputEvent| {
        let input: HtmlTextAreaElement = e.target_unchecked_into();
        Msg::UpdateText(input.value())
    });
    let on_keydown = link.batch_callback(|e: KeyboardEvent| {
        if e.key() == "Enter" && (e.ctrl_key() || e.meta_key()) {
            e.prevent_default();
            Some(Msg::Generate)
        } else {
            None
        }
    });
    let on_toggle = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::ToggleEndpointData(input.checked())
    });

    html! {
        <section class="pane">
            <div class="pane-toolbar">
                { icon_button("play_arrow", "Generate", link.callback(|_| Msg::Generate), component.rendering) }
                <label class="toggle" title="Expose the last fetched endpoint responses as API">
                    <input type="checkbox" checked={component.use_endpoint_data} onchange={on_toggle} />
                    {"Use endpoint data"}
                </label>
                {
                    if component.is_dirty() {
                        html! { <span class="dirty-dot" title="Unsaved changes" /> }
                    } else {
                        html! {}
                    }
                }
            </div>
            <textarea
                class="code-input"
                ref={component.textarea_ref.clone()}
                spellcheck="false"
                value={component.text.clone()}
                oninput={on_input}
                onkeydown={on_keydown}
            />
        </section>
    }
}

fn build_preview_pane(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    let has_output = component.output.is_some();

    html! {
        <section class="pane">
            <div class="pane-toolbar">
                { tab_button(component, link, PREVIEW_TAB, "Preview") }
                { tab_button(component, link, MARKUP_TAB, "HTML") }
                <div class="spacer" />
                { icon_button("content_copy", "Copy", link.callback(|_| Msg::CopyHtml), !has_output) }
                { icon_button("download", "Download", link.callback(|_| Msg::DownloadHtml), !has_output) }
            </div>
            { build_preview_body(component) }
        </section>
    }
}

fn build_preview_body(component: &EditorComponent) -> Html {
    if let Some(error) = &component.error {
        return html! { <div class="error-banner">{ error }</div> };
    }
    match (&component.output, component.active_tab.as_str()) {
        (None, _) if component.rendering => html! { <div class="placeholder">{"Rendering..."}</div> },
        (None, _) => html! { <div class="placeholder">{"Press Generate to render the template"}</div> },
        (Some(output), MARKUP_TAB) => html! { <pre class="markup">{ output.html.clone() }</pre> },
        (Some(output), _) => html! {
            <iframe class="preview-frame" title="Email preview" sandbox="" srcdoc={output.html.clone()} />
        },
    }
}

fn tab_button(
    component: &EditorComponent,
    link: &Scope<EditorComponent>,
    tab: &'static str,
    label: &'static str,
) -> Html {
    html! {
        <button
            class={classes!("tab-btn", (component.active_tab == tab).then_some("active"))}
            onclick={link.callback(move |_| Msg::SetTab(tab.to_string()))}
        >
            { label }
        </button>
    }
}

fn icon_button(icon_name: &str, label: &str, on_click: Callback<MouseEvent>, disabled: bool) -> Html {
    html! {
        <button class="icon-btn" onclick={on_click} disabled={disabled}>
            <i class="material-icons">{icon_name}</i>
            <span class="icon-label">{label}</span>
        </button>
    }
}
