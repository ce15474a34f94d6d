//! Update function for the endpoint panel.

use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::helpers::show_toast;

use super::form::EndpointForm;
use super::messages::Msg;
use super::state::EndpointsPanel;

pub fn update(component: &mut EndpointsPanel, ctx: &Context<EndpointsPanel>, msg: Msg) -> bool {
    match msg {
        Msg::Loaded(Ok((endpoints, responses))) => {
            component.endpoints = endpoints;
            component.responses = responses;
            true
        }
        Msg::Loaded(Err(err)) => {
            show_toast(&format!("Could not load endpoints: {}", err));
            false
        }
        Msg::SetField(field, value) => {
            component.form.set(field, value);
            true
        }
        Msg::Edit(id) => {
            if let Some(descriptor) = component.endpoints.iter().find(|e| e.id == id) {
                component.form = EndpointForm::from_descriptor(descriptor);
                component.editing_id = Some(id);
                component.errors.clear();
                component.test_result = None;
            }
            true
        }
        Msg::ResetForm => {
            component.reset_form();
            true
        }
        Msg::Submit => {
            let draft = match component
                .form
                .to_draft(&component.endpoints, component.editing_id.as_deref())
            {
                Ok(draft) => draft,
                Err(errors) => {
                    component.errors = errors;
                    return true;
                }
            };

            component.busy = true;
            component.errors.clear();
            let editing_id = component.editing_id.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = match editing_id {
                    Some(id) => api::update_endpoint(&id, &draft).await,
                    None => api::create_endpoint(&draft).await,
                };
                link.send_message(Msg::Saved(result));
            });
            true
        }
        Msg::Saved(result) => {
            component.busy = false;
            match result {
                Ok(saved) => {
                    match component.endpoints.iter().position(|e| e.id == saved.id) {
                        Some(pos) => {
                            let renamed = component.endpoints[pos].name != saved.name;
                            let previous = std::mem::replace(&mut component.endpoints[pos], saved);
                            if renamed {
                                component.responses.remove(&previous.name);
                            }
                        }
                        None => component.endpoints.push(saved),
                    }
                    component.reset_form();
                }
                Err(err) => component.errors = err.lines().map(str::to_string).collect(),
            }
            true
        }
        Msg::Delete(id) => {
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::delete_endpoint(&id).await;
                link.send_message(Msg::Deleted(id, result));
            });
            false
        }
        Msg::Deleted(id, Ok(())) => {
            if let Some(pos) = component.endpoints.iter().position(|e| e.id == id) {
                let removed = component.endpoints.remove(pos);
                component.responses.remove(&removed.name);
            }
            if component.editing_id.as_deref() == Some(id.as_str()) {
                component.reset_form();
            }
            true
        }
        Msg::Deleted(_, Err(err)) => {
            show_toast(&format!("Could not delete the endpoint: {}", err));
            false
        }
        Msg::Test => {
            // a test is not a save, so the name may repeat a saved one
            let draft = match component.form.to_draft(&[], None) {
                Ok(draft) => draft,
                Err(errors) => {
                    component.errors = errors;
                    return true;
                }
            };
            component.busy = true;
            component.errors.clear();
            component.test_result = None;
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::Tested(api::test_endpoint(&draft).await));
            });
            true
        }
        Msg::Tested(result) => {
            component.busy = false;
            match result {
                Ok(outcome) => component.test_result = Some(outcome),
                Err(err) => component.errors = err.lines().map(str::to_string).collect(),
            }
            true
        }
        Msg::FetchAll => {
            component.busy = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::Fetched(api::fetch_all_endpoints().await));
            });
            true
        }
        Msg::Fetched(result) => {
            component.busy = false;
            match result {
                Ok(responses) => {
                    let ok = responses.values().filter(|r| r.is_success()).count();
                    show_toast(&format!("Fetched {} of {} endpoints", ok, responses.len()));
                    component.responses = responses;
                }
                Err(err) => show_toast(&format!("Fetch failed: {}", err)),
            }
            true
        }
    }
}
