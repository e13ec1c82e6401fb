//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `CatApi` over real
//! HTTP through a ureq-backed `Transport`. Validates that request building,
//! query encoding, key handling and image identity work end-to-end.

use std::net::SocketAddr;
use std::sync::Arc;

use catapi_core::{
    ApiError, CatApi, ClientConfig, HttpRequest, HttpResponse, ImageRegistry, Interval, MimeType, Order,
    SearchFilters, Transport,
};

const KEY: &str = "test-key";

/// Executes requests with ureq, returning 4xx/5xx responses as data so the
/// core client interprets the status.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.agent.get(req.url.as_str());
        for (key, value) in &req.query {
            builder = builder.query(key, value);
        }
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let mut response = builder.call().map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, KEY).await
        })
        .unwrap();
    });

    addr
}

fn api(addr: SocketAddr, key: &str) -> CatApi<UreqTransport> {
    let config = ClientConfig::new(key).with_base_url(format!("http://{addr}"));
    CatApi::new(&config, UreqTransport::new())
}

#[test]
fn search_lifecycle() {
    let addr = start_server();
    let api = api(addr, KEY);

    // Step 1: fetch everything in storage order.
    let all = api.search_images(&SearchFilters::new().with_limit(10)).unwrap();
    let ids: Vec<&str> = all.iter().map(|image| image.id.as_str()).collect();
    assert_eq!(ids, vec!["0XYvRd7oD", "ozEvzdVM-", "MTY3ODIyMQ", "bpc"]);
    assert_eq!(api.registry().len(), 4);

    // Step 2: nested records and the absent/empty categories distinction.
    let abyssinian = &all[0].breeds[0];
    assert_eq!(abyssinian.name, "Abyssinian");
    assert_eq!(abyssinian.life_span, Some(Interval { min: 14, max: 15 }));
    assert_eq!(abyssinian.weight_metric, Some(Interval { min: 3, max: 5 }));
    assert_eq!(abyssinian.alt_names, Some(Vec::new()));
    assert!(all[0].categories.is_none());
    assert_eq!(all[1].categories.as_ref().unwrap()[0].name, "hats");
    assert_eq!(all[2].categories, Some(Vec::new()));

    // Step 3: breed filter resolves to the instance cached in step 1.
    let bengals = api.images_by_breed("Bengal").unwrap();
    assert_eq!(bengals.len(), 1);
    assert!(Arc::ptr_eq(&bengals[0], &all[2]));
    let bengal = &bengals[0].breeds[0];
    assert!(bengal.hypoallergenic);
    assert_eq!(
        bengal.alt_names.as_deref().unwrap(),
        ["Leopardette".to_string(), "Bengal Cat".to_string()]
    );

    // Step 4: category and mime filters resolve to the cached image.
    let boxes = api.images_by_category(&[5]).unwrap();
    let gifs = api.images_by_mime_type(MimeType::Gif).unwrap();
    assert!(Arc::ptr_eq(&boxes[0], &gifs[0]));
    assert_eq!(gifs[0].id, "bpc");

    // Step 5: ascending pagination.
    let page = api.browse_images(Some(2), Some(1), Some(Order::Ascending)).unwrap();
    let ids: Vec<&str> = page.iter().map(|image| image.id.as_str()).collect();
    assert_eq!(ids, vec!["bpc", "ozEvzdVM-"]);

    // Step 6: nothing new was cached along the way.
    assert_eq!(api.registry().len(), 4);
}

#[test]
fn wrong_key_is_unauthorized() {
    let addr = start_server();
    let err = api(addr, "wrong-key")
        .search_images(&SearchFilters::new())
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[test]
fn invalid_filters_fail_before_io() {
    // Nothing listens here; a network call would surface as a transport error.
    let config = ClientConfig::new(KEY).with_base_url("http://127.0.0.1:9");
    let api = CatApi::new(&config, UreqTransport::new());
    let filters = SearchFilters {
        order: Some("sideways".to_string()),
        ..SearchFilters::default()
    };
    let err = api.search_images(&filters).unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument { name: "order", .. }));
}

#[test]
fn two_facades_share_a_registry() {
    let addr = start_server();
    let registry = Arc::new(ImageRegistry::new());
    let config = ClientConfig::new(KEY).with_base_url(format!("http://{addr}"));
    let a = CatApi::with_registry(&config, UreqTransport::new(), Arc::clone(&registry));
    let b = CatApi::with_registry(&config, UreqTransport::new(), Arc::clone(&registry));

    let from_a = a.search_images(&SearchFilters::new()).unwrap();
    let from_b = b.search_images(&SearchFilters::new()).unwrap();
    assert!(Arc::ptr_eq(&from_a[0], &from_b[0]));
    assert_eq!(registry.len(), 1);
}
