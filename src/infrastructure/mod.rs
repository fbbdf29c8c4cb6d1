pub mod axum_http;
pub mod local_storage;
