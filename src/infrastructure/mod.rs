// Infrastructure layer - External dependencies and adapters
pub mod chunked_json;
pub mod config;
pub mod device_client;
pub mod discovery;
pub mod dta;
pub mod http_response;
pub mod merge_store;
pub mod persistence;
pub mod tcp;
pub mod websocket;
