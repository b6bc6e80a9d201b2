//! `GET /client-config`: polling, paging and upload limits for the client,
//! taken from the server's command line.

mod get;

use actix_web::web;
use common::config::CLIENT_CONFIG_PATH;

pub fn configure_routes() -> actix_web::Resource {
    web::resource(CLIENT_CONFIG_PATH).route(web::get().to(get::process))
}
