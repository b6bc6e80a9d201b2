use common::model::history::HistoryTab;
use common::pagination::Paging;
use uuid::Uuid;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::messages::Msg;
use super::state::HistoryBrowser;
use crate::api;
use crate::components::helpers::{download_file, report_api_error, show_toast};

pub fn update(browser: &mut HistoryBrowser, ctx: &Context<HistoryBrowser>, msg: Msg) -> bool {
    let login_url = ctx.props().config.login_url.clone();

    match msg {
        Msg::SetTab(tab) => {
            if browser.tab == tab {
                return false;
            }
            browser.tab = tab;
            // Operators differ between the two tables.
            browser.filters.set("o", Vec::<String>::new());
            browser.flags.clear();
            browser.children.clear();
            restart(browser, ctx);
            true
        }
        Msg::FilterOptionsLoaded(Ok(options)) => {
            browser.filter_options = options;
            true
        }
        Msg::FilterOptionsLoaded(Err(err)) => {
            report_api_error(&err, &login_url);
            false
        }
        Msg::SetFilters(filters) => {
            browser.filters = filters;
            restart(browser, ctx);
            true
        }
        Msg::SetDate { key, value } => {
            browser.filters.set(key, [value]);
            restart(browser, ctx);
            true
        }
        Msg::SetOperators(ids) => {
            browser.filters.set("o", ids);
            restart(browser, ctx);
            true
        }
        Msg::ToggleDirection => {
            browser.direction = browser.direction.toggled();
            restart(browser, ctx);
            true
        }
        Msg::SetPaging(paging) => {
            browser.paging = paging;
            load(browser, ctx);
            true
        }
        Msg::Refresh => {
            load(browser, ctx);
            true
        }
        Msg::DownloadsLoaded { ticket, result } => {
            if !browser.latest.accepts(&ticket) {
                return false;
            }
            browser.loading = false;
            match result {
                Ok(found) => {
                    browser
                        .flags
                        .load(found.resources.iter().map(|row| (row.id, row.public)));
                    browser.children.clear();
                    browser.downloads = Some(found);
                }
                Err(err) => report_api_error(&err, &login_url),
            }
            true
        }
        Msg::UploadsLoaded { ticket, result } => {
            if !browser.latest.accepts(&ticket) {
                return false;
            }
            browser.loading = false;
            match result {
                Ok(found) => {
                    browser
                        .flags
                        .load(found.resources.iter().map(|row| (row.id, row.public)));
                    browser.uploads = Some(found);
                }
                Err(err) => report_api_error(&err, &login_url),
            }
            true
        }
        Msg::TogglePublic(id) => {
            let Some(body) = browser.flags.toggle_request(&id) else {
                return false;
            };
            let tab = browser.tab;
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::history::set_public(tab, id, &body).await;
                link.send_message(Msg::PublicUpdated { id, result });
            });
            false
        }
        Msg::PublicUpdated { id, result } => match result {
            Ok(echoed) => {
                browser.flags.apply(id, echoed);
                true
            }
            Err(err) => {
                report_api_error(&err, &login_url);
                // Re-render so the checkbox falls back to the stored flag.
                true
            }
        },
        Msg::Expand(parent) => {
            if let Some(paging) = browser.children.expand(parent) {
                load_children(browser, ctx, parent, paging);
            }
            true
        }
        Msg::Collapse(parent) => {
            browser.children.collapse(&parent);
            true
        }
        Msg::MoreChildren(parent) => {
            if let Some(paging) = browser.children.load_more(&parent) {
                load_children(browser, ctx, parent, paging);
            }
            true
        }
        Msg::ChildrenLoaded {
            parent,
            page,
            result,
        } => {
            match result {
                Ok(found) => {
                    browser
                        .flags
                        .load(found.resources.iter().map(|row| (row.id, row.public)));
                    browser
                        .children
                        .receive(&parent, page, found.resources, found.total);
                }
                Err(err) => {
                    browser.children.fail(&parent, page);
                    report_api_error(&err, &login_url);
                }
            }
            true
        }
        Msg::Download(file_id) => {
            download_file(file_id, login_url);
            false
        }
    }
}

/// Back to the first page after the filters or the order changed.
fn restart(browser: &mut HistoryBrowser, ctx: &Context<HistoryBrowser>) {
    browser.paging = browser.paging.with_page(1);
    load(browser, ctx);
}

/// Fetches the current page of the active tab. Earlier requests still in
/// flight are superseded.
pub fn load(browser: &mut HistoryBrowser, ctx: &Context<HistoryBrowser>) {
    let query = match browser.query() {
        Ok(query) => query,
        Err(err) => {
            show_toast(&err.to_string());
            return;
        }
    };
    browser.loading = true;
    let tab = browser.tab;
    let ticket = browser.latest.issue(tab.path(), browser.paging.page);
    let link = ctx.link().clone();
    spawn_local(async move {
        match tab {
            HistoryTab::Download => {
                let result = api::history::downloads(&query).await;
                link.send_message(Msg::DownloadsLoaded { ticket, result });
            }
            HistoryTab::Upload => {
                let result = api::history::uploads(&query).await;
                link.send_message(Msg::UploadsLoaded { ticket, result });
            }
        }
    });
}

fn load_children(
    browser: &HistoryBrowser,
    ctx: &Context<HistoryBrowser>,
    parent: Uuid,
    paging: Paging,
) {
    let query = browser.child_query(&parent, paging);
    let link = ctx.link().clone();
    spawn_local(async move {
        let result = api::history::downloads(&query).await;
        link.send_message(Msg::ChildrenLoaded {
            parent,
            page: paging.page,
            result,
        });
    });
}
