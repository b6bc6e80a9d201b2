//! Forwards every `/api/...` call of the client to the gateway.
//!
//! The gateway owns authentication and every REST endpoint; this server only
//! relays. Method, path, query, body, cookies and end-to-end headers pass
//! through unchanged in both directions. Hop-by-hop headers are dropped.
//! An unreachable gateway answers 502, a gateway that does not answer in time
//! answers 504.

mod forward;

use actix_web::web;

const API_PATH: &str = "/api";

pub fn configure_routes() -> actix_web::Scope {
    web::scope(API_PATH).default_service(web::route().to(forward::process))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::state::UpstreamState;
    use actix_web::{App, HttpRequest, HttpResponse, HttpServer, http::StatusCode, test};
    use std::time::Duration;
    use url::Url;

    async fn echo(req: HttpRequest, body: web::Bytes) -> HttpResponse {
        let cookie = req
            .headers()
            .get("cookie")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");
        HttpResponse::Created()
            .insert_header(("x-upstream", "gateway"))
            .insert_header(("proxy-authenticate", "Basic"))
            .body(format!(
                "{} {} cookie={} proxy-authorization={} body={}",
                req.method(),
                req.uri(),
                cookie,
                req.headers().contains_key("proxy-authorization"),
                String::from_utf8_lossy(&body)
            ))
    }

    #[actix_web::test]
    async fn relays_request_and_response() {
        let gateway = HttpServer::new(|| App::new().default_service(web::route().to(echo)))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .unwrap();
        let addr = gateway.addrs()[0];
        let server = gateway.run();
        let handle = server.handle();
        actix_rt::spawn(server);

        let upstream = UpstreamState::new(
            Url::parse(&format!("http://{addr}")).unwrap(),
            Duration::from_secs(5),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(upstream.client()))
                .app_data(web::Data::new(upstream))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/groups/delete?x=1")
            .insert_header(("cookie", "session=abc"))
            .insert_header(("proxy-authorization", "secret"))
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"groupIds":["g1"]}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers().get("x-upstream").unwrap(), "gateway");
        assert!(!resp.headers().contains_key("proxy-authenticate"));
        let body = test::read_body(resp).await;
        assert_eq!(
            String::from_utf8_lossy(&body),
            r#"POST /api/groups/delete?x=1 cookie=session=abc proxy-authorization=false body={"groupIds":["g1"]}"#
        );

        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn unreachable_gateway_answers_bad_gateway() {
        // Nothing listens on the discard port.
        let upstream = UpstreamState::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            Duration::from_secs(5),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(upstream.client()))
                .app_data(web::Data::new(upstream))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/auth/check").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: common::model::error::ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.code, "bad_gateway");
    }
}
