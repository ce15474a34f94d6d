//! Update function for the storage panel.
//!
//! Every remote call is spawned and reports back with a `...ed`/`...Loaded`
//! message; failures surface as toasts and leave the state as it was.

use common::model::session::SessionState;
use common::model::storage::FileKind;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::{StorageClient, SIGN_IN_URL};
use crate::helpers::show_toast;
use crate::top_sheet::{close_top_sheet, open_top_sheet};

use super::messages::Msg;
use super::state::StoragePanel;

pub fn update(component: &mut StoragePanel, ctx: &Context<StoragePanel>, msg: Msg) -> bool {
    match msg {
        Msg::SessionLoaded(Ok(client)) => {
            let signed_in = client.session.is_signed_in();
            component.client = client;
            if signed_in {
                ctx.link().send_message(Msg::Refresh);
            }
            true
        }
        Msg::SessionLoaded(Err(err)) => {
            gloo_console::warn!(format!("Could not read the session: {}", err));
            false
        }
        Msg::SignIn => {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(SIGN_IN_URL);
            }
            false
        }
        Msg::SignOut => {
            let client = component.client.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::SignedOut(client.sign_out().await));
            });
            false
        }
        Msg::SignedOut(Ok(())) => {
            component.client = StorageClient {
                session: SessionState::default(),
            };
            component.files.clear();
            component.files_open = false;
            show_toast("Signed out");
            true
        }
        Msg::SignedOut(Err(err)) => {
            show_toast(&format!("Could not sign out: {}", err));
            false
        }
        Msg::ToggleFiles => {
            component.files_open = !component.files_open;
            if component.files_open {
                ctx.link().send_message(Msg::Refresh);
            }
            true
        }
        Msg::Refresh => {
            component.busy = true;
            let client = component.client.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::FilesLoaded(client.list().await));
            });
            true
        }
        Msg::FilesLoaded(result) => {
            component.busy = false;
            match result {
                Ok(files) => component.files = files,
                Err(err) => show_toast(&format!("Could not list files: {}", err)),
            }
            true
        }
        Msg::Open(file_id) => {
            component.busy = true;
            let client = component.client.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::Opened(client.open(&file_id).await));
            });
            true
        }
        Msg::Opened(result) => {
            component.busy = false;
            match result {
                Ok(content) => {
                    component.files_open = false;
                    ctx.props().on_open.emit(content);
                    show_toast("File opened");
                }
                Err(err) => show_toast(&format!("Could not open the file: {}", err)),
            }
            true
        }
        Msg::ShowSaveSheet(kind) => {
            component.save_kind = kind;
            open_top_sheet(component.save_sheet_ref.clone());
            true
        }
        Msg::CloseSaveSheet => {
            close_top_sheet(component.save_sheet_ref.clone());
            false
        }
        Msg::SetSaveName(name) => {
            component.save_name = name;
            true
        }
        Msg::Save => {
            let name = component.save_name.trim().to_string();
            if name.is_empty() {
                show_toast("Enter a file name");
                return false;
            }
            let kind = component.save_kind;
            let content = match kind {
                FileKind::Lua => ctx.props().code.clone(),
                FileKind::Html => match &ctx.props().html {
                    Some(html) => html.clone(),
                    None => {
                        show_toast("Generate the email before saving its HTML");
                        return false;
                    }
                },
            };

            component.busy = true;
            close_top_sheet(component.save_sheet_ref.clone());
            let client = component.client.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = client.save(&name, kind, &content).await;
                link.send_message(Msg::Saved { kind, content, result });
            });
            true
        }
        Msg::Saved { kind, content, result } => {
            component.busy = false;
            match result {
                Ok(response) => {
                    show_toast(&format!("Saved {}", response.result.file_name));
                    if kind == FileKind::Lua {
                        ctx.props().on_saved.emit(content);
                    }
                    if component.files_open {
                        ctx.link().send_message(Msg::Refresh);
                    }
                }
                Err(err) => show_toast(&format!("Could not save: {}", err)),
            }
            true
        }
    }
}
