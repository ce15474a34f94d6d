use crate::app::App;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::BeforeUnloadEvent;

mod api;
mod app;
mod components;
mod helpers;
mod top_sheet;
mod workspace_grid;

/// Asks for confirmation before leaving the page with unsaved template edits.
fn install_unload_guard() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let guard = Closure::<dyn FnMut(BeforeUnloadEvent)>::new(|event: BeforeUnloadEvent| {
        if helpers::window_is_dirty() {
            event.prevent_default();
            event.set_return_value("");
        }
    });
    let _ = window.add_event_listener_with_callback("beforeunload", guard.as_ref().unchecked_ref());
    guard.forget();
}

fn main() {
    install_unload_guard();
    yew::Renderer::<App>::new().render();
}
