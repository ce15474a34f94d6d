//! View rendering for the storage panel: account controls, the file list
//! dropdown and the save sheet.

use super::messages::Msg;
use super::state::StoragePanel;
use crate::top_sheet::TopSheet;
use common::model::storage::FileKind;
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

pub fn view(component: &StoragePanel, ctx: &Context<StoragePanel>) -> Html {
    let link = ctx.link();

    let Some(user) = component.client.session.user() else {
        return html! {
            <div class="storage-panel">
                <button class="icon-btn" onclick={link.callback(|_| Msg::SignIn)}>
                    <i class="material-icons">{"login"}</i>
                    <span class="icon-label">{"Sign in to save"}</span>
                </button>
            </div>
        };
    };

    html! {
        <div class="storage-panel">
            <button class="icon-btn" onclick={link.callback(|_| Msg::ToggleFiles)} disabled={component.busy}>
                <i class="material-icons">{"folder_open"}</i>
                <span class="icon-label">{"Open"}</span>
            </button>
            <button class="icon-btn" onclick={link.callback(|_| Msg::ShowSaveSheet(FileKind::Lua))} disabled={component.busy}>
                <i class="material-icons">{"save"}</i>
                <span class="icon-label">{"Save template"}</span>
            </button>
            <button
                class="icon-btn"
                onclick={link.callback(|_| Msg::ShowSaveSheet(FileKind::Html))}
                disabled={component.busy || ctx.props().html.is_none()}
            >
                <i class="material-icons">{"html"}</i>
                <span class="icon-label">{"Save HTML"}</span>
            </button>
            <span class="user-chip" title={user.email.clone()}>
                {
                    match &user.picture {
                        Some(src) => html! { <img class="avatar" src={src.clone()} alt="" /> },
                        None => html! {},
                    }
                }
                { user.name.clone() }
            </span>
            <button class="icon-btn" onclick={link.callback(|_| Msg::SignOut)}>
                <i class="material-icons">{"logout"}</i>
            </button>
            { build_file_list(component, link) }
            { build_save_sheet(component, link) }
        </div>
    }
}

fn build_file_list(component: &StoragePanel, link: &Scope<StoragePanel>) -> Html {
    if !component.files_open {
        return html! {};
    }
    html! {
        <div class="file-list">
            {
                if component.files.is_empty() {
                    let text = if component.busy { "Loading..." } else { "No saved files yet" };
                    html! { <div class="placeholder">{ text }</div> }
                } else {
                    html! {
                        <ul>
                            { for component.files.iter().map(|file| {
                                let id = file.id.clone();
                                html! {
                                    <li onclick={link.callback(move |_| Msg::Open(id.clone()))}>
                                        <span class="file-name">{ file.name.clone() }</span>
                                        <span class="file-date">{ file.modified_time.clone().unwrap_or_default() }</span>
                                    </li>
                                }
                            }) }
                        </ul>
                    }
                }
            }
        </div>
    }
}

fn build_save_sheet(component: &StoragePanel, link: &Scope<StoragePanel>) -> Html {
    let on_input = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetSaveName(input.value())
    });
    let on_keydown = link.batch_callback(|e: KeyboardEvent| (e.key() == "Enter").then_some(Msg::Save));
    let title = match component.save_kind {
        FileKind::Lua => "Save template",
        FileKind::Html => "Save rendered HTML",
    };

    html! {
        <TopSheet node_ref={component.save_sheet_ref.clone()}>
            <div class="sheet-body">
                <h3>{ title }</h3>
                <label>
                    {"File name"}
                    <input
                        type="text"
                        placeholder={format!("welcome{}", component.save_kind.extension())}
                        value={component.save_name.clone()}
                        oninput={on_input}
                        onkeydown={on_keydown}
                    />
                </label>
                <p class="hint">{"A file with the same name is replaced."}</p>
                <div class="sheet-actions">
                    <button onclick={link.callback(|_| Msg::CloseSaveSheet)}>{"Cancel"}</button>
                    <button class="primary" onclick={link.callback(|_| Msg::Save)}>{"Save"}</button>
                </div>
            </div>
        </TopSheet>
    }
}
