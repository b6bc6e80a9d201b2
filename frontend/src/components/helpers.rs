//! Toasts, error reporting and small DOM readers shared by the pages.

use chrono::{DateTime, Local, Utc};
use common::errors::{ApiError, BulkError};
use gloo_console::error;
use num_format::{Locale, ToFormattedString};
use uuid::Uuid;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement};
use yew::html::TargetCast;
use yew::platform::spawn_local;

use crate::api;

/// Shows a transient message at the bottom of the page for three seconds.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", "rgba(0, 0, 0, 0.8)").ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();
                style.set_property("font-family", "Arial, sans-serif").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

/// Sends the browser to the login page on 401, otherwise shows a toast.
/// Failures the operator cannot act on are also written to the console.
pub fn report_api_error(err: &ApiError, login_url: &str) {
    if err.requires_login() {
        api::auth::navigate(login_url);
        return;
    }
    if matches!(
        err,
        ApiError::Network(_) | ApiError::Decode(_) | ApiError::Unexpected { .. }
    ) {
        error!(format!("gateway call failed: {err}"));
    }
    show_toast(&err.toast_message());
}

pub fn report_bulk_error(err: &BulkError, login_url: &str) {
    match err {
        BulkError::Api(api_err) => report_api_error(api_err, login_url),
        other => show_toast(&other.toast_message()),
    }
}

/// Checks that a stored file still exists before handing it to the browser.
pub fn download_file(file_id: Uuid, login_url: String) {
    spawn_local(async move {
        match api::history::file_exists(file_id).await {
            Ok(true) => api::auth::navigate(&api::history::file_url(file_id)),
            Ok(false) => show_toast("The file is no longer available on the server."),
            Err(err) => report_api_error(&err, &login_url),
        }
    });
}

pub fn format_count(value: u64) -> String {
    value.to_formatted_string(&Locale::en)
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub fn format_optional_timestamp(timestamp: Option<&DateTime<Utc>>) -> String {
    timestamp.map(format_timestamp).unwrap_or_else(|| "-".to_string())
}

pub fn input_value(e: &Event) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

pub fn input_checked(e: &Event) -> bool {
    e.target_unchecked_into::<HtmlInputElement>().checked()
}

pub fn select_value(e: &Event) -> String {
    e.target_unchecked_into::<HtmlSelectElement>().value()
}

/// Values of every selected `<option>` of a `<select multiple>`.
pub fn selected_values(e: &Event) -> Vec<String> {
    let options = e.target_unchecked_into::<HtmlSelectElement>().selected_options();
    (0..options.length())
        .filter_map(|index| options.item(index))
        .filter_map(|element| element.dyn_into::<HtmlOptionElement>().ok())
        .map(|option| option.value())
        .collect()
}

/// Splits a comma or newline separated list, dropping blanks.
pub fn split_list(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Asks the browser for a yes/no confirmation.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}
