use common::errors::ApiError;
use common::model::auth::LoginUser;

pub const LOGOUT_URL: &str = "/api/auth/logout";

pub async fn check() -> Result<LoginUser, ApiError> {
    super::get_json("/api/auth/check").await
}

/// Sends the browser to `url`; used for the login and logout redirects.
pub fn navigate(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(url);
    }
}
