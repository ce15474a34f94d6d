//! Template editor: root module wiring the Yew `Component` implementation
//! with submodules for state, update logic and view rendering.
//!
//! Responsibilities
//! - Keep the template text and forward every keystroke into state.
//! - Request a render only when the user asks for it (button or Ctrl+Enter).
//! - Show the markup in a sandboxed preview, with copy and download.
//! - Host the storage and endpoint panels and react to their callbacks.
//!
//! On first render the starter template is loaded from the server.

use yew::platform::spawn_local;
use yew::prelude::*;

mod messages;
mod state;
mod update;
mod view;

use crate::api;
use crate::helpers::show_toast;
pub use messages::Msg;
pub use state::EditorComponent;

impl Component for EditorComponent {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        EditorComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::default_template().await {
                    Ok(text) => link.send_message(Msg::DocumentLoaded(text)),
                    Err(err) => show_toast(&format!("Could not load the starter template: {}", err)),
                }
            });
        }
    }
}
