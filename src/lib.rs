pub mod client;
pub mod domain;
pub mod models;
pub mod schema;

/// Products collection of the public fake store API.
pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com/products/";
