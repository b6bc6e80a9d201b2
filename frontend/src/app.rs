use common::config::ClientConfig;
use common::errors::ApiError;
use common::model::auth::LoginUser;
use std::rc::Rc;
use yew::platform::spawn_local;
use yew::{classes, html, Component, Context, Html};

use crate::api;
use crate::components::bulk::BulkWizard;
use crate::components::helpers::report_api_error;
use crate::components::history::HistoryBrowser;
use crate::components::resources::groups::GroupList;
use crate::components::resources::repositories::RepositoryList;
use crate::components::resources::users::UserList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Bulk,
    History,
    Repositories,
    Groups,
    Users,
}

impl Page {
    const ALL: [Page; 5] = [
        Page::Bulk,
        Page::History,
        Page::Repositories,
        Page::Groups,
        Page::Users,
    ];

    fn label(self) -> &'static str {
        match self {
            Page::Bulk => "Bulk import",
            Page::History => "History",
            Page::Repositories => "Repositories",
            Page::Groups => "Groups",
            Page::Users => "Users",
        }
    }
}

pub enum Msg {
    ConfigLoaded(ClientConfig),
    Authenticated(Result<LoginUser, ApiError>),
    Show(Page),
}

/// Shell of the console: loads the client configuration, checks the session
/// and switches between the pages.
pub struct App {
    config: Option<Rc<ClientConfig>>,
    user: Option<LoginUser>,
    page: Page,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::ConfigLoaded(api::config::load().await));
        });

        Self {
            config: None,
            user: None,
            page: Page::Bulk,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::ConfigLoaded(config) => {
                self.config = Some(Rc::new(config));
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Authenticated(api::auth::check().await));
                });
                false
            }
            Msg::Authenticated(Ok(user)) => {
                self.user = Some(user);
                true
            }
            Msg::Authenticated(Err(err)) => {
                let login_url = self
                    .config
                    .as_ref()
                    .map(|config| config.login_url.clone())
                    .unwrap_or_default();
                report_api_error(&err, &login_url);
                false
            }
            Msg::Show(page) => {
                if self.page == page {
                    return false;
                }
                self.page = page;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let (Some(config), Some(user)) = (&self.config, &self.user) else {
            return html! { <div class="app-loading">{"Loading…"}</div> };
        };
        let link = ctx.link();
        let config = config.clone();

        let content = match self.page {
            Page::Bulk => html! { <BulkWizard {config} /> },
            Page::History => html! { <HistoryBrowser {config} /> },
            Page::Repositories => html! { <RepositoryList {config} /> },
            Page::Groups => html! { <GroupList {config} /> },
            Page::Users => html! { <UserList {config} /> },
        };

        html! {
            <div class="app-root">
                <header class="app-header">
                    <span class="app-title">{"Gateway admin"}</span>
                    <nav class="app-nav">
                        { for Page::ALL.into_iter().map(|page| html! {
                            <button
                                class={classes!("nav-btn", (self.page == page).then_some("active"))}
                                onclick={link.callback(move |_| Msg::Show(page))}
                            >
                                { page.label() }
                            </button>
                        }) }
                    </nav>
                    <span class="app-user">{ user.user_name.clone() }</span>
                    <a class="text-btn" href={api::auth::LOGOUT_URL}>{"Log out"}</a>
                </header>
                <main class="app-content">
                    { content }
                </main>
            </div>
        }
    }
}
