//! Endpoint panel: configure the external JSON sources a template reads
//! through `API`, test a draft, and fetch every source at once.
//!
//! Drafts are validated in the browser with the same rules the server
//! applies (`EndpointDraft::validate`), so most mistakes are reported before
//! a request is sent.

use yew::platform::spawn_local;
use yew::prelude::*;

mod form;
mod messages;
mod state;
mod update;
mod view;

use crate::api;
pub use messages::Msg;
pub use state::EndpointsPanel;

impl Component for EndpointsPanel {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        EndpointsPanel::new()
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
                let endpoints = api::list_endpoints().await;
                let responses = api::cached_responses().await.unwrap_or_default();
                link.send_message(Msg::Loaded(endpoints.map(|list| (list, responses))));
            });
        }
    }
}
