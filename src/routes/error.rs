use rocket::serde::Serialize;
use rocket::serde::json::Json;
use rocket::{Request, catch};

/// Same shape as `AppError` responses, so clients read one `error` field.
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct Error {
    pub error: String,
}

fn error_body(text: &str) -> Json<Error> {
    Json(Error { error: text.to_string() })
}

#[catch(404)]
pub fn not_found(_: &Request) -> Json<Error> {
    error_body("Not found")
}

#[catch(409)]
pub fn conflict(_: &Request) -> Json<Error> {
    error_body("Conflict")
}

/// Bodies that are not valid JSON or do not match the record shape.
#[catch(422)]
pub fn unprocessable_entity(_: &Request) -> Json<Error> {
    error_body("Request body does not match the expected shape")
}

#[catch(500)]
pub fn internal_error(_: &Request) -> Json<Error> {
    error_body("Internal server error")
}

#[cfg(test)]
mod tests {
    use crate::build_rocket;
    use crate::test_utils::{TempStorePath, test_client, test_config};
    use rocket::http::{ContentType, Status};
    use rocket::local::asynchronous::Client;
    use serde_json::{Value, json};

    #[rocket::async_test]
    async fn unknown_route_returns_json_error() {
        let store = TempStorePath::new();
        let client = test_client(&store).await;

        let response = client.get("/api/garages").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        assert_eq!(response.into_json::<Value>().await.unwrap(), json!({ "error": "Not found" }));
    }

    #[rocket::async_test]
    async fn malformed_body_returns_json_error() {
        let store = TempStorePath::new();
        let client = test_client(&store).await;

        let response = client.post("/api/users/login").header(ContentType::JSON).body("{not json").dispatch().await;
        assert_eq!(response.status(), Status::UnprocessableEntity);

        let body: Value = response.into_json().await.expect("catcher body");
        assert_eq!(body, json!({ "error": "Request body does not match the expected shape" }));
    }

    #[rocket::async_test]
    async fn corrupt_store_surfaces_as_server_error() {
        let store = TempStorePath::new();
        let mut config = test_config(&store);
        config.store.seed_sample_data = false;
        std::fs::write(store.path(), "{ \"cars\": [").unwrap();

        let client = Client::tracked(build_rocket(config)).await.expect("valid rocket instance");
        let response = client.get("/api/cars").dispatch().await;

        assert_eq!(response.status(), Status::InternalServerError);
        let body: Value = response.into_json().await.expect("error body");
        assert_eq!(body["error"], "Internal server error");
    }
}
