pub mod config;
pub mod database;
pub mod db;
pub mod error;
mod middleware;
pub mod models;
mod routes;
pub mod service;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;

use crate::db::stage_store;
use crate::middleware::RequestLogger;
use crate::routes as app_routes;
use rocket::data::{Limits, ToByteUnit};
use rocket::{Build, Rocket, catchers, http::Method};
use rocket_cors::{AllowedOrigins, Cors, CorsOptions};
use rocket_okapi::swagger_ui::{SwaggerUIConfig, make_swagger_ui};
use rocket_okapi::{get_openapi_route, okapi::merge::marge_spec_list};
use tracing_subscriber::EnvFilter;

fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG takes precedence over logging.level, e.g.
    //   RUST_LOG=drive_easy::db=debug,info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    // A subscriber may already be installed (tests build several rockets per process).
    let _ = if json_format { subscriber.json().try_init() } else { subscriber.try_init() };
}

fn build_cors(cors_config: &config::CorsConfig) -> Cors {
    let is_wildcard = cors_config.allowed_origins.len() == 1 && cors_config.allowed_origins[0] == "*";

    if is_wildcard && cors_config.allow_credentials {
        panic!(
            "Invalid CORS configuration: Cannot use wildcard origins (*) with credentials enabled. \
            Either set specific origins or disable credentials."
        );
    }

    let allowed_origins = if cors_config.allowed_origins.is_empty() {
        AllowedOrigins::some_exact::<&str>(&[])
    } else if is_wildcard {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&cors_config.allowed_origins.iter().map(String::as_str).collect::<Vec<_>>())
    };

    let options = CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Delete, Method::Patch, Method::Options]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: rocket_cors::AllowedHeaders::some(&["Content-Type", "Accept"]),
        allow_credentials: cors_config.allow_credentials,
        ..Default::default()
    };

    match options.to_cors() {
        Ok(cors) => cors,
        Err(err) => panic!("Failed to create CORS fairing: {}", err),
    }
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return config::DEFAULT_API_BASE_PATH.to_string();
    }

    let mut normalized = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };

    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }

    normalized
}

fn join_base_path(base_path: &str, path: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let suffix = path.trim_start_matches('/');

    if base.is_empty() {
        format!("/{}", suffix)
    } else {
        format!("{}/{}", base, suffix)
    }
}

fn collect_base_paths(api_config: &config::ApiConfig) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();

    for raw in std::iter::once(&api_config.base_path).chain(&api_config.additional_base_paths) {
        let path = normalize_base_path(raw);
        if !normalized.contains(&path) {
            normalized.push(path);
        }
    }

    normalized
}

type RouteSpec = (&'static str, Vec<rocket::Route>, okapi::openapi3::OpenApi);

fn collect_route_specs() -> Vec<RouteSpec> {
    let (car_routes, car_openapi) = app_routes::car::routes();
    let (user_routes, user_openapi) = app_routes::user::routes();
    let (booking_routes, booking_openapi) = app_routes::booking::routes();
    let (dashboard_routes, dashboard_openapi) = app_routes::dashboard::routes();
    let (health_routes, health_openapi) = app_routes::health::routes();

    vec![
        ("/cars", car_routes, car_openapi),
        ("/users", user_routes, user_openapi),
        ("/bookings", booking_routes, booking_openapi),
        ("/dashboard", dashboard_routes, dashboard_openapi),
        ("/health", health_routes, health_openapi),
    ]
}

fn mount_api_routes(mut rocket: Rocket<Build>, base_path: &str, enable_swagger: bool) -> Rocket<Build> {
    let mut openapi_list = Vec::new();
    for (path, routes, openapi) in collect_route_specs() {
        rocket = rocket.mount(join_base_path(base_path, path), routes);
        openapi_list.push((path, openapi));
    }

    if enable_swagger {
        let openapi_docs = match marge_spec_list(&openapi_list) {
            Ok(docs) => docs,
            Err(err) => panic!("Could not merge OpenAPI spec: {}", err),
        };

        let settings = rocket_okapi::settings::OpenApiSettings::default();
        rocket = rocket.mount(base_path, vec![get_openapi_route(openapi_docs, &settings)]);

        let swagger = SwaggerUIConfig {
            url: join_base_path(base_path, "openapi.json"),
            ..Default::default()
        };
        rocket = rocket.mount(join_base_path(base_path, "docs"), make_swagger_ui(&swagger));
    }

    rocket.register(
        base_path,
        catchers![
            app_routes::error::not_found,
            app_routes::error::conflict,
            app_routes::error::unprocessable_entity,
            app_routes::error::internal_error
        ],
    )
}

pub fn build_rocket(config: Config) -> Rocket<Build> {
    init_tracing(&config.logging.level, config.logging.json_format);

    let figment = rocket::Config::figment()
        .merge(("port", config.server.port))
        .merge(("address", config.server.address.clone()))
        .merge(("limits", Limits::default().limit("json", config.server.json_limit_mib.mebibytes())));

    let mut rocket = rocket::custom(figment)
        .attach(build_cors(&config.cors))
        .attach(RequestLogger)
        .attach(stage_store(config.store.clone()));

    for base_path in collect_base_paths(&config.api) {
        rocket = mount_api_routes(rocket, &base_path, config.api.enable_swagger);
    }

    rocket.manage(config)
}
