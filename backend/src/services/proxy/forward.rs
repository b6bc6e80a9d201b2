use actix_web::http::header::{self, HeaderName};
use actix_web::{web, HttpRequest, HttpResponse};
use awc::error::SendRequestError;
use common::model::error::ErrorResponse;
use futures_util::TryStreamExt;
use log::{debug, error};

use crate::upstream::state::UpstreamState;

/// Headers that describe a single connection and must not be relayed.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub(crate) fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

pub(crate) async fn process(
    req: HttpRequest,
    payload: web::Payload,
    client: web::Data<awc::Client>,
    upstream: web::Data<UpstreamState>,
) -> HttpResponse {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.path());
    let target = upstream.target(path_and_query);
    debug!("forwarding {} {}", req.method(), target);

    let mut forwarded = client.request(req.method().clone(), &target).no_decompress();
    // Host is derived from the target URL.
    for (name, value) in req
        .headers()
        .iter()
        .filter(|(name, _)| !is_hop_by_hop(name) && **name != header::HOST)
    {
        forwarded = forwarded.append_header((name.clone(), value.clone()));
    }
    if let Some(peer) = req.peer_addr() {
        forwarded = forwarded.insert_header(("X-Forwarded-For", peer.ip().to_string()));
    }

    let response = match forwarded.send_stream(payload).await {
        Ok(response) => response,
        Err(SendRequestError::Timeout) => {
            error!("gateway did not answer {} {} in time", req.method(), target);
            return HttpResponse::GatewayTimeout().json(ErrorResponse {
                code: "gateway_timeout".to_string(),
                message: "The gateway did not answer in time.".to_string(),
            });
        }
        Err(err) => {
            error!("forwarding {} {} failed: {}", req.method(), target, err);
            return HttpResponse::BadGateway().json(ErrorResponse {
                code: "bad_gateway".to_string(),
                message: "The gateway could not be reached.".to_string(),
            });
        }
    };

    let mut builder = HttpResponse::build(response.status());
    for (name, value) in response
        .headers()
        .iter()
        .filter(|(name, _)| !is_hop_by_hop(name))
    {
        builder.append_header((name.clone(), value.clone()));
    }
    builder.streaming(response.map_err(move |err| {
        error!("reading the gateway response of {target} failed: {err}");
        err
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("connection", true)]
    #[case("keep-alive", true)]
    #[case("transfer-encoding", true)]
    #[case("upgrade", true)]
    #[case("cookie", false)]
    #[case("set-cookie", false)]
    #[case("content-type", false)]
    #[case("location", false)]
    fn classifies_hop_by_hop_headers(#[case] name: &'static str, #[case] expected: bool) {
        assert_eq!(is_hop_by_hop(&HeaderName::from_static(name)), expected);
    }
}
