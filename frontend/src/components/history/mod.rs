//! History browser: download and upload events with filters, lazily loaded
//! re-downloads under each download parent, public flags and file links.

use yew::platform::spawn_local;
use yew::prelude::*;

mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::HistoryProps;
pub use state::HistoryBrowser;

use crate::api;

impl Component for HistoryBrowser {
    type Message = Msg;
    type Properties = HistoryProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut browser = HistoryBrowser::new(&ctx.props().config);

        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::FilterOptionsLoaded(api::history::filter_options().await));
        });
        update::load(&mut browser, ctx);
        browser
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
