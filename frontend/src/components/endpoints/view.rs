//! View rendering for the endpoint panel: saved endpoints with their last
//! fetch status, the add/edit form and the test result.

use super::form::Field;
use super::messages::Msg;
use super::state::EndpointsPanel;
use common::model::endpoint::{EndpointDescriptor, HttpMethod};
use common::model::remote::RemoteResult;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::html::Scope;
use yew::prelude::*;

pub fn view(component: &EndpointsPanel, ctx: &Context<EndpointsPanel>) -> Html {
    let link = ctx.link();

    html! {
        <section class="pane endpoints-panel">
            <div class="pane-toolbar">
                <span class="pane-title">{"Endpoints"}</span>
                <div class="spacer" />
                <button
                    class="icon-btn"
                    onclick={link.callback(|_| Msg::FetchAll)}
                    disabled={component.busy || component.endpoints.is_empty()}
                >
                    <i class="material-icons">{"sync"}</i>
                    <span class="icon-label">{"Fetch all"}</span>
                </button>
            </div>
            <ul class="endpoint-list">
                { for component.endpoints.iter().map(|e| endpoint_row(component, link, e)) }
            </ul>
            { build_form(component, link) }
        </section>
    }
}

fn endpoint_row(component: &EndpointsPanel, link: &Scope<EndpointsPanel>, endpoint: &EndpointDescriptor) -> Html {
    let (status_class, status_text) = match component.responses.get(&endpoint.name) {
        None => ("status-idle", "not fetched".to_string()),
        Some(RemoteResult::Success { status, .. }) => ("status-ok", status.to_string()),
        Some(RemoteResult::Failure { status: Some(status), .. }) => ("status-error", status.to_string()),
        Some(RemoteResult::Failure { message, .. }) => ("status-error", message.clone()),
    };
    let edit_id = endpoint.id.clone();
    let delete_id = endpoint.id.clone();

    html! {
        <li class={classes!("endpoint-row", (component.editing_id.as_deref() == Some(endpoint.id.as_str())).then_some("editing"))}>
            <span class="method">{ endpoint.method.as_str() }</span>
            <span class="endpoint-name" title={endpoint.url.clone()}>{ format!("API.{}", endpoint.name) }</span>
            <span class={classes!("status", status_class)}>{ status_text }</span>
            <button class="icon-btn small" onclick={link.callback(move |_| Msg::Edit(edit_id.clone()))}>
                <i class="material-icons">{"edit"}</i>
            </button>
            <button class="icon-btn small" onclick={link.callback(move |_| Msg::Delete(delete_id.clone()))}>
                <i class="material-icons">{"delete"}</i>
            </button>
        </li>
    }
}

fn input_callback(link: &Scope<EndpointsPanel>, field: Field) -> Callback<InputEvent> {
    link.callback(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetField(field, input.value())
    })
}

fn textarea_callback(link: &Scope<EndpointsPanel>, field: Field) -> Callback<InputEvent> {
    link.callback(move |e: InputEvent| {
        let input: HtmlTextAreaElement = e.target_unchecked_into();
        Msg::SetField(field, input.value())
    })
}

fn build_form(component: &EndpointsPanel, link: &Scope<EndpointsPanel>) -> Html {
    let form = &component.form;
    let on_method = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::SetField(Field::Method, select.value())
    });
    let sends_body = HttpMethod::parse(&form.method).is_some_and(|m| m.sends_body());

    html! {
        <div class="endpoint-form">
            <h4>{ if component.editing_id.is_some() { "Edit endpoint" } else { "Add endpoint" } }</h4>
            <input type="text" placeholder="Name" value={form.name.clone()} oninput={input_callback(link, Field::Name)} />
            <div class="row">
                <select onchange={on_method}>
                    { for HttpMethod::ALL.iter().map(|m| html! {
                        <option value={m.as_str()} selected={form.method.eq_ignore_ascii_case(m.as_str())}>{ m.as_str() }</option>
                    }) }
                </select>
                <input type="url" placeholder="https://api.example.com/data" value={form.url.clone()} oninput={input_callback(link, Field::Url)} />
            </div>
            <textarea
                placeholder={r#"Headers as JSON, e.g. {"Authorization": "Bearer ..."}"#}
                value={form.headers.clone()}
                oninput={textarea_callback(link, Field::Headers)}
            />
            {
                if sends_body {
                    html! {
                        <textarea
                            placeholder="Request body (JSON)"
                            value={form.body.clone()}
                            oninput={textarea_callback(link, Field::Body)}
                        />
                    }
                } else {
                    html! {}
                }
            }
            {
                if component.errors.is_empty() {
                    html! {}
                } else {
                    html! {
                        <ul class="form-errors">
                            { for component.errors.iter().map(|e| html! { <li>{ e }</li> }) }
                        </ul>
                    }
                }
            }
            <div class="sheet-actions">
                <button onclick={link.callback(|_| Msg::ResetForm)}>{"Clear"}</button>
                <button onclick={link.callback(|_| Msg::Test)} disabled={component.busy}>{"Test"}</button>
                <button class="primary" onclick={link.callback(|_| Msg::Submit)} disabled={component.busy}>
                    { if component.editing_id.is_some() { "Update" } else { "Add" } }
                </button>
            </div>
            { build_test_result(component) }
        </div>
    }
}

fn build_test_result(component: &EndpointsPanel) -> Html {
    let Some(result) = &component.test_result else {
        return html! {};
    };
    let (class, summary, data) = match result {
        RemoteResult::Success { status, status_text, data, .. } => {
            ("ok", format!("{} {}", status, status_text), Some(data))
        }
        RemoteResult::Failure { message, data, .. } => ("error", message.clone(), data.as_ref()),
    };
    let pretty = data
        .and_then(|d| serde_json::to_string_pretty(d).ok())
        .unwrap_or_default();

    html! {
        <div class={classes!("test-result", class)}>
            <div class="summary">{ summary }</div>
            <pre>{ pretty }</pre>
        </div>
    }
}
