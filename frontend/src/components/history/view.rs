use common::model::history::{DownloadHistory, HistoryTab, UploadHistory};
use common::model::repository::RepositorySummary;
use common::requests::SortDirection;
use uuid::Uuid;
use yew::html::Scope;
use yew::prelude::*;

use super::messages::Msg;
use super::state::HistoryBrowser;
use crate::components::filter_panel::FilterPanel;
use crate::components::helpers::{format_count, format_optional_timestamp, format_timestamp, input_value};
use crate::components::operator_select::OperatorSelect;
use crate::components::pager::Pager;

pub fn view(browser: &HistoryBrowser, ctx: &Context<HistoryBrowser>) -> Html {
    let link = ctx.link();
    let config = &ctx.props().config;

    let table = match browser.tab {
        HistoryTab::Download => download_table(browser, link),
        HistoryTab::Upload => upload_table(browser, link),
    };

    html! {
        <div class="history-root">
            { tab_bar(browser, link) }
            <div class="filter-bar">
                <label class="filter-control">
                    <span class="filter-label">{"From"}</span>
                    <input
                        type="date"
                        value={browser.filters.first("s").unwrap_or_default().to_string()}
                        onchange={link.callback(|e: Event| Msg::SetDate { key: "s", value: input_value(&e) })}
                    />
                </label>
                <label class="filter-control">
                    <span class="filter-label">{"To"}</span>
                    <input
                        type="date"
                        value={browser.filters.first("e").unwrap_or_default().to_string()}
                        onchange={link.callback(|e: Event| Msg::SetDate { key: "e", value: input_value(&e) })}
                    />
                </label>
                <OperatorSelect
                    tab={browser.tab}
                    selected={browser.filters.values("o").to_vec()}
                    page_size={config.default_page_size}
                    debounce_ms={config.search_debounce_ms}
                    login_url={config.login_url.clone()}
                    on_change={link.callback(Msg::SetOperators)}
                />
                <FilterPanel
                    options={browser.filter_options.clone()}
                    selection={browser.filters.clone()}
                    exclude={vec!["o".to_string()]}
                    on_change={link.callback(Msg::SetFilters)}
                />
            </div>
            <div class="table-toolbar">
                <button class="icon-btn" title="Reverse order" onclick={link.callback(|_| Msg::ToggleDirection)}>
                    <i class="material-icons">
                        { if browser.direction == SortDirection::Desc { "arrow_downward" } else { "arrow_upward" } }
                    </i>
                    <span class="icon-label">{"Date"}</span>
                </button>
                <button class="icon-btn" title="Reload" onclick={link.callback(|_| Msg::Refresh)}>
                    <i class="material-icons">{"refresh"}</i>
                </button>
                if browser.loading {
                    <span class="muted">{"Loading…"}</span>
                }
            </div>
            { table }
            <Pager
                paging={browser.paging}
                total={browser.total()}
                page_sizes={config.page_sizes.clone()}
                on_change={link.callback(Msg::SetPaging)}
            />
        </div>
    }
}

fn tab_bar(browser: &HistoryBrowser, link: &Scope<HistoryBrowser>) -> Html {
    let tab_button = |tab: HistoryTab, label: &'static str| {
        html! {
            <button
                class={classes!("tab-btn", (browser.tab == tab).then_some("active"))}
                onclick={link.callback(move |_| Msg::SetTab(tab))}
            >
                { label }
            </button>
        }
    };

    html! {
        <div class="tab-bar">
            { tab_button(HistoryTab::Download, "Downloads") }
            { tab_button(HistoryTab::Upload, "Uploads") }
        </div>
    }
}

fn public_toggle(browser: &HistoryBrowser, link: &Scope<HistoryBrowser>, id: Uuid, stored: bool) -> Html {
    html! {
        <input
            type="checkbox"
            title="Public"
            checked={browser.flags.get(&id).unwrap_or(stored)}
            onchange={link.callback(move |_: Event| Msg::TogglePublic(id))}
        />
    }
}

fn file_link(link: &Scope<HistoryBrowser>, file_path: &str, file_id: Option<Uuid>) -> Html {
    let name = file_path.rsplit('/').next().unwrap_or(file_path).to_string();
    match file_id {
        Some(file_id) => html! {
            <a href="#" title={file_path.to_string()} onclick={link.callback(move |e: MouseEvent| {
                e.prevent_default();
                Msg::Download(file_id)
            })}>
                { name }
            </a>
        },
        None => html! { <span title={file_path.to_string()}>{ name }</span> },
    }
}

fn labels(repositories: &[RepositorySummary]) -> String {
    repositories
        .iter()
        .map(RepositorySummary::label)
        .collect::<Vec<_>>()
        .join(", ")
}

fn download_table(browser: &HistoryBrowser, link: &Scope<HistoryBrowser>) -> Html {
    let rows = browser
        .downloads
        .as_ref()
        .map(|found| found.resources.as_slice())
        .unwrap_or_default();

    html! {
        <table class="data-table">
            <thead>
                <tr>
                    <th />
                    <th>{"Date"}</th>
                    <th>{"Operator"}</th>
                    <th>{"File"}</th>
                    <th>{"Repositories"}</th>
                    <th>{"Groups"}</th>
                    <th>{"Users"}</th>
                    <th>{"Public"}</th>
                </tr>
            </thead>
            <tbody>
                { for rows.iter().map(|row| download_rows(browser, link, row)) }
            </tbody>
        </table>
    }
}

fn download_row(browser: &HistoryBrowser, link: &Scope<HistoryBrowser>, row: &DownloadHistory, expander: Html) -> Html {
    html! {
        <tr class={classes!(row.parent_id.is_some().then_some("child-row"))}>
            <td>{ expander }</td>
            <td>{ format_timestamp(&row.timestamp) }</td>
            <td>{ row.operator.label() }</td>
            <td>{ file_link(link, &row.file_path, row.file_id) }</td>
            <td>{ labels(&row.repositories) }</td>
            <td>{ format_count(row.groups.len() as u64) }</td>
            <td>{ format_count(row.users.len() as u64) }</td>
            <td>{ public_toggle(browser, link, row.id, row.public) }</td>
        </tr>
    }
}

/// A parent row followed, when expanded, by its loaded children and a
/// "more" row while further pages exist.
fn download_rows(browser: &HistoryBrowser, link: &Scope<HistoryBrowser>, row: &DownloadHistory) -> Html {
    let id = row.id;
    if row.children_count == 0 {
        return download_row(browser, link, row, html! {});
    }

    let expanded = browser.children.is_expanded(&id);
    let expander = html! {
        <button
            class="icon-btn"
            title={format!("{} re-download(s)", row.children_count)}
            onclick={link.callback(move |_| if expanded { Msg::Collapse(id) } else { Msg::Expand(id) })}
        >
            <i class="material-icons">{ if expanded { "expand_less" } else { "expand_more" } }</i>
            <span class="icon-label">{ format_count(row.children_count) }</span>
        </button>
    };

    let children = match browser.children.children(&id) {
        Some(list) => html! {
            <>
                { for list.rows().iter().map(|child| download_row(browser, link, child, html! {})) }
                if list.is_loading() {
                    <tr class="child-row"><td colspan="8" class="muted">{"Loading…"}</td></tr>
                } else if list.has_more() {
                    <tr class="child-row">
                        <td colspan="8">
                            <button class="text-btn" onclick={link.callback(move |_| Msg::MoreChildren(id))}>
                                {"Show more"}
                            </button>
                        </td>
                    </tr>
                }
            </>
        },
        None => html! {},
    };

    html! {
        <>
            { download_row(browser, link, row, expander) }
            { children }
        </>
    }
}

fn upload_table(browser: &HistoryBrowser, link: &Scope<HistoryBrowser>) -> Html {
    let rows = browser
        .uploads
        .as_ref()
        .map(|found| found.resources.as_slice())
        .unwrap_or_default();

    html! {
        <table class="data-table">
            <thead>
                <tr>
                    <th>{"Started"}</th>
                    <th>{"Finished"}</th>
                    <th>{"Operator"}</th>
                    <th>{"Status"}</th>
                    <th>{"File"}</th>
                    <th>{"Repositories"}</th>
                    <th>{"Created / updated / deleted / skipped / errors"}</th>
                    <th>{"Public"}</th>
                </tr>
            </thead>
            <tbody>
                { for rows.iter().map(|row| upload_row(browser, link, row)) }
            </tbody>
        </table>
    }
}

fn upload_row(browser: &HistoryBrowser, link: &Scope<HistoryBrowser>, row: &UploadHistory) -> Html {
    let counts = row
        .summary
        .map(|summary| {
            format!(
                "{} / {} / {} / {} / {}",
                format_count(summary.create),
                format_count(summary.update),
                format_count(summary.delete),
                format_count(summary.skip),
                format_count(summary.error),
            )
        })
        .unwrap_or_else(|| "-".to_string());

    html! {
        <tr key={row.id.to_string()}>
            <td>{ format_timestamp(&row.timestamp) }</td>
            <td>{ format_optional_timestamp(row.end_timestamp.as_ref()) }</td>
            <td>{ row.operator.label() }</td>
            <td>{ row.status.label() }</td>
            <td>{ file_link(link, &row.file_path, row.file_id) }</td>
            <td>{ labels(&row.repositories) }</td>
            <td>{ counts }</td>
            <td>{ public_toggle(browser, link, row.id, row.public) }</td>
        </tr>
    }
}
