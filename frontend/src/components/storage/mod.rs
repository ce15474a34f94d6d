//! Cloud storage panel: sign-in state, the list of saved templates and the
//! save sheet.
//!
//! All network access goes through [`StorageClient`](crate::api::StorageClient),
//! which refuses authenticated calls while the cached session says signed out.

use yew::platform::spawn_local;
use yew::prelude::*;

mod messages;
mod props;
mod state;
mod update;
mod view;

use crate::api::StorageClient;
use crate::helpers::{auth_failure_message, show_toast, take_auth_outcome, AuthOutcome};
pub use messages::Msg;
pub use props::StoragePanelProps;
pub use state::StoragePanel;

impl Component for StoragePanel {
    type Message = Msg;
    type Properties = StoragePanelProps;

    fn create(_ctx: &Context<Self>) -> Self {
        StoragePanel::new()
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

            match take_auth_outcome() {
                Some(AuthOutcome::SignedIn) => show_toast("Signed in"),
                Some(AuthOutcome::Failed(reason)) => show_toast(auth_failure_message(&reason)),
                None => {}
            }

            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::SessionLoaded(StorageClient::load().await));
            });
        }
    }
}
