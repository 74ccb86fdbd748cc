//! Helpers for integration tests.

use fakestore_suite::client::ApiClient;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const CATALOGUE: &str = include_str!("../fixtures/products.json");

/// Routes `log` output through the test harness; `RUST_LOG` picks the level.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Local stand-in for the store's `/products` resource serving the fixture
/// catalogue. Writes are echoed back the way the live service does it and
/// never change the catalogue.
pub struct TestStore {
    server: MockServer,
}

impl TestStore {
    pub async fn start() -> Self {
        init_logging();

        let products: Vec<Value> =
            serde_json::from_str(CATALOGUE).expect("Failed to parse fixture catalogue.");
        let next_id = products
            .iter()
            .filter_map(|p| p["id"].as_i64())
            .max()
            .unwrap_or_default()
            + 1;

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/products/?$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&products))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/products/\d+$"))
            .respond_with(ProductById(products))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/products/?$"))
            .respond_with(EchoBody {
                assigned_id: Some(next_id),
            })
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/products/\d+$"))
            .respond_with(EchoBody { assigned_id: None })
            .mount(&server)
            .await;

        TestStore { server }
    }

    pub fn base_url(&self) -> Url {
        Url::parse(&format!("{}/products/", self.server.uri()))
            .expect("Mock server URI is a valid URL.")
    }

    /// A fresh client pointed at this store.
    pub fn client(&self) -> ApiClient {
        ApiClient::with_base_url(self.base_url()).expect("Failed to build API client.")
    }
}

fn id_from_path(url: &Url) -> Option<i64> {
    url.path_segments()?.next_back()?.parse().ok()
}

struct ProductById(Vec<Value>);

impl Respond for ProductById {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let id = id_from_path(&request.url);
        match self.0.iter().find(|p| p["id"].as_i64() == id) {
            Some(product) => ResponseTemplate::new(200).set_body_json(product),
            None => ResponseTemplate::new(404).set_body_json(json!({
                "status": "error",
                "message": "product not found",
            })),
        }
    }
}

/// Returns the JSON object from the request body with `id` set to either a
/// server-assigned value or the id in the request path.
struct EchoBody {
    assigned_id: Option<i64>,
}

impl Respond for EchoBody {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(Value::Object(mut body)) = serde_json::from_slice::<Value>(&request.body) else {
            return ResponseTemplate::new(400).set_body_json(json!({
                "status": "error",
                "message": "body must be a JSON object",
            }));
        };
        if let Some(id) = self.assigned_id.or_else(|| id_from_path(&request.url)) {
            body.insert("id".to_string(), id.into());
        }
        ResponseTemplate::new(200).set_body_json(Value::Object(body))
    }
}
