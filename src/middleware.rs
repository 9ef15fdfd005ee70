use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::request::Request;
use rocket::{Data, Response};
use tracing::{info, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Per-request correlation id, echoed back in `X-Request-Id`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }

    /// The id assigned by [`RequestLogger`], if the fairing has run for this request.
    pub fn cached(request: &Request<'_>) -> Option<RequestId> {
        request.local_cache(|| None::<RequestId>).clone()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

/// Tags every request with a [`RequestId`] and logs it on the way in and out.
pub struct RequestLogger;

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request Logger",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _: &mut Data<'_>) {
        let request_id = RequestId::new();
        request.local_cache(|| Some(request_id.clone()));

        info!(
            request_id = %request_id.0,
            method = %request.method(),
            uri = %request.uri(),
            content_length = request.headers().get_one("Content-Length").unwrap_or("0"),
            "incoming request"
        );
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let request_id = RequestId::cached(request).map(|id| id.0).unwrap_or_else(|| "unknown".to_string());
        let status = response.status();

        response.set_header(Header::new(REQUEST_ID_HEADER, request_id.clone()));
        response.set_header(Header::new("X-Content-Type-Options", "nosniff"));
        response.set_header(Header::new("Cache-Control", "no-store"));

        if status.class().is_server_error() || status.class().is_client_error() {
            warn!(
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
                status = status.code,
                "request completed with error"
            );
        } else {
            info!(
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
                status = status.code,
                "request completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TempStorePath, test_client};

    #[test]
    fn request_ids_are_unique_uuids() {
        let first = RequestId::new();
        let second = RequestId::default();
        assert!(Uuid::parse_str(&first.0).is_ok());
        assert_ne!(first.0, second.0);
    }

    #[rocket::async_test]
    async fn responses_carry_request_id_header() {
        let store = TempStorePath::new();
        let client = test_client(&store).await;

        let response = client.get("/api/health").dispatch().await;
        let header = response.headers().get_one(REQUEST_ID_HEADER).expect("request id header");

        assert!(Uuid::parse_str(header).is_ok());
        assert_eq!(response.headers().get_one("Cache-Control"), Some("no-store"));
    }

    #[rocket::async_test]
    async fn each_request_gets_its_own_id() {
        let store = TempStorePath::new();
        let client = test_client(&store).await;

        let first = client.get("/api/health").dispatch().await;
        let second = client.get("/api/garages").dispatch().await;

        let first_id = first.headers().get_one(REQUEST_ID_HEADER).expect("request id header").to_string();
        let second_id = second.headers().get_one(REQUEST_ID_HEADER).expect("request id header");
        assert_ne!(first_id, second_id);
    }
}
