//! Bulk import wizard: upload a user file, wait for validation, review the
//! report and the repository members missing from the file, run the import
//! and follow its result.
//!
//! Layout follows the other pages: state, messages and props in their own
//! modules, with `update::update` and `view::view` doing the work.

use common::pagination::Paging;
use common::requests::RepositoriesQuery;
use yew::platform::spawn_local;
use yew::prelude::*;

mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::BulkProps;
pub use state::BulkWizard;

use crate::api;

impl Component for BulkWizard {
    type Message = Msg;
    type Properties = BulkProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = &ctx.props().config;
        let query = RepositoriesQuery {
            sort_key: Some("displayName".to_string()),
            paging: Some(Paging::first(
                config.page_sizes.iter().copied().max().unwrap_or(config.default_page_size),
            )),
            ..RepositoriesQuery::default()
        };
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = api::resources::repositories::list(&query).await;
            link.send_message(Msg::RepositoriesLoaded(result));
        });
        BulkWizard::new(config)
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.next_generation();
    }
}
