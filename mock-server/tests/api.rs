use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_images, Image, API_KEY_HEADER};
use tower::ServiceExt;

const KEY: &str = "test-key";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn search(query: &str) -> Request<String> {
    Request::builder()
        .uri(format!("/images/search{query}"))
        .header(API_KEY_HEADER, KEY)
        .body(String::new())
        .unwrap()
}

async fn search_ids(query: &str) -> Vec<String> {
    let resp = app(KEY).oneshot(search(query)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "query {query}");
    let images: Vec<Image> = body_json(resp).await;
    images.into_iter().map(|image| image.id).collect()
}

// --- auth ---

#[tokio::test]
async fn missing_key_returns_401() {
    let resp = app(KEY)
        .oneshot(Request::builder().uri("/images/search").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_bytes(resp).await, "AUTHENTICATION_ERROR");
}

#[tokio::test]
async fn wrong_key_returns_401() {
    let resp = app("other-key").oneshot(search("")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- limit / order / page ---

#[tokio::test]
async fn default_limit_is_one() {
    assert_eq!(search_ids("").await, vec!["0XYvRd7oD"]);
}

#[tokio::test]
async fn random_order_keeps_storage_order() {
    assert_eq!(
        search_ids("?limit=10&order=rand").await,
        vec!["0XYvRd7oD", "ozEvzdVM-", "MTY3ODIyMQ", "bpc"]
    );
}

#[tokio::test]
async fn ascending_and_descending_sort_by_id() {
    assert_eq!(
        search_ids("?limit=10&order=asc").await,
        vec!["0XYvRd7oD", "MTY3ODIyMQ", "bpc", "ozEvzdVM-"]
    );
    assert_eq!(
        search_ids("?limit=10&order=DESC").await,
        vec!["ozEvzdVM-", "bpc", "MTY3ODIyMQ", "0XYvRd7oD"]
    );
}

#[tokio::test]
async fn page_applies_only_to_sorted_orders() {
    assert_eq!(search_ids("?limit=2&page=1&order=asc").await, vec!["bpc", "ozEvzdVM-"]);
    assert_eq!(search_ids("?limit=2&page=1&order=rand").await, vec!["0XYvRd7oD", "ozEvzdVM-"]);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let query = format!("?limit=2&order=asc&page={}", usize::MAX);
    assert!(search_ids(&query).await.is_empty());
}

#[tokio::test]
async fn invalid_order_returns_400() {
    let resp = app(KEY).oneshot(search("?order=sideways")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- filters ---

#[tokio::test]
async fn breed_filter_matches_name() {
    assert_eq!(search_ids("?limit=10&breeds=Bengal").await, vec!["MTY3ODIyMQ"]);
}

#[tokio::test]
async fn category_filter_accepts_comma_list() {
    assert_eq!(search_ids("?limit=10&category_ids=1,5").await, vec!["ozEvzdVM-", "bpc"]);
}

#[tokio::test]
async fn bad_category_id_returns_400() {
    let resp = app(KEY).oneshot(search("?category_ids=hats")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mime_filter_matches_extension() {
    assert_eq!(search_ids("?limit=10&mime_types=gif").await, vec!["bpc"]);
    assert_eq!(
        search_ids("?limit=10&mime_types=jpg,png").await,
        vec!["0XYvRd7oD", "ozEvzdVM-", "MTY3ODIyMQ"]
    );
}

// --- payload shape ---

#[tokio::test]
async fn categories_key_is_omitted_when_absent() {
    let resp = app(KEY).oneshot(search("?limit=10")).await.unwrap();
    let images: Vec<serde_json::Value> = body_json(resp).await;
    assert!(images[0].get("categories").is_none());
    assert_eq!(images[2]["categories"], serde_json::json!([]));
    assert_eq!(images[0]["breeds"][0]["life_span"], "14 - 15");
}

#[tokio::test]
async fn custom_image_set_is_served() {
    let images = vec![Image {
        id: "solo".to_string(),
        url: "https://cdn/solo.png".to_string(),
        width: 1,
        height: 1,
        breeds: Vec::new(),
        categories: None,
    }];
    let resp = app_with_images(KEY, images).oneshot(search("?limit=5")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let served: Vec<Image> = body_json(resp).await;
    assert_eq!(served.len(), 1);
    assert_eq!(served[0].id, "solo");
}
