use actix_web::{web, HttpResponse};
use common::config::ClientConfig;

pub(crate) async fn process(config: web::Data<ClientConfig>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-store"))
        .json(config.get_ref())
}
