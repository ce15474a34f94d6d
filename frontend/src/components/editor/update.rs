//! Update function for the template editor, Elm style: mutate the state for
//! one `Msg` and return whether the view should re-render.
//!
//! Renders are tagged with a ticket from `RenderSequence`; a response whose
//! ticket is no longer current is dropped, so a slow earlier request can never
//! replace the result of a later one.

use common::requests::RenderRequest;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::helpers::{compute_md5, copy_to_clipboard, download_file, set_window_dirty_flag, show_toast};

use super::messages::Msg;
use super::state::EditorComponent;

const DOWNLOAD_NAME: &str = "email.html";

pub fn update(component: &mut EditorComponent, ctx: &Context<EditorComponent>, msg: Msg) -> bool {
    match msg {
        Msg::UpdateText(new_text) => {
            if component.text == new_text {
                return false;
            }
            component.text = new_text;
            set_window_dirty_flag(component.is_dirty());
            true
        }
        Msg::SetTab(tab) => {
            component.active_tab = tab;
            true
        }
        Msg::Generate => {
            let ticket = component.sequence.next();
            component.rendering = true;

            let request = RenderRequest {
                code: component.text.clone(),
                use_endpoint_data: component.use_endpoint_data,
                ..Default::default()
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::render(&request).await;
                link.send_message(Msg::Rendered { ticket, result });
            });
            true
        }
        Msg::Rendered { ticket, result } => component.apply_render(ticket, result),
        Msg::ToggleEndpointData(enabled) => {
            component.use_endpoint_data = enabled;
            true
        }
        Msg::CopyHtml => {
            if let Some(html) = component.rendered_html().map(str::to_string) {
                spawn_local(async move {
                    match copy_to_clipboard(&html).await {
                        Ok(()) => show_toast("HTML copied to the clipboard"),
                        Err(err) => show_toast(&err),
                    }
                });
            }
            false
        }
        Msg::DownloadHtml => {
            if let Some(html) = component.rendered_html() {
                if download_file(DOWNLOAD_NAME, "text/html", html).is_err() {
                    show_toast("Could not start the download");
                }
            }
            false
        }
        Msg::DocumentLoaded(text) => {
            component.original_md5 = Some(compute_md5(&text));
            component.text = text;
            component.output = None;
            component.error = None;
            set_window_dirty_flag(false);
            true
        }
        Msg::Saved(text) => {
            component.original_md5 = Some(compute_md5(&text));
            set_window_dirty_flag(component.is_dirty());
            true
        }
    }
}
