//! In-memory stand-in for the cat API's `GET /images/search` endpoint.
//!
//! Serves a fixed set of fixture images and applies the same filters the
//! real API accepts. Random order returns fixtures in storage order so tests
//! stay deterministic.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;

pub const API_KEY_HEADER: &str = "x-api-key";
const DEFAULT_LIMIT: usize = 1;
const MAX_LIMIT: usize = 100;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub breeds: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub limit: Option<usize>,
    pub page: Option<usize>,
    pub order: Option<String>,
    pub breeds: Option<String>,
    pub category_ids: Option<String>,
    pub mime_types: Option<String>,
}

pub struct AppState {
    api_key: String,
    images: Vec<Image>,
}

pub type SharedState = Arc<AppState>;

/// Router serving the fixture images, accepting only `api_key`.
pub fn app(api_key: &str) -> Router {
    app_with_images(api_key, fixtures())
}

pub fn app_with_images(api_key: &str, images: Vec<Image>) -> Router {
    let state: SharedState = Arc::new(AppState {
        api_key: api_key.to_string(),
        images,
    });
    Router::new()
        .route("/images/search", get(search_images))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

async fn search_images(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Image>>, (StatusCode, String)> {
    let key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    if key != Some(state.api_key.as_str()) {
        return Err((StatusCode::UNAUTHORIZED, "AUTHENTICATION_ERROR".to_string()));
    }

    let order = match params.order.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("rand") | Some("random") => None,
        Some("asc") => Some(false),
        Some("desc") => Some(true),
        Some(other) => return Err((StatusCode::BAD_REQUEST, format!("invalid order {other:?}"))),
    };
    let category_ids = parse_ids(params.category_ids.as_deref())?;
    let mime_types: Vec<String> = params
        .mime_types
        .as_deref()
        .map(|s| s.split(',').map(|m| m.trim().to_ascii_lowercase()).collect())
        .unwrap_or_default();

    let mut matched: Vec<Image> = state
        .images
        .iter()
        .filter(|image| params.breeds.as_deref().is_none_or(|name| has_breed(image, name)))
        .filter(|image| category_ids.is_empty() || in_categories(image, &category_ids))
        .filter(|image| mime_types.is_empty() || mime_types.iter().any(|m| has_extension(image, m)))
        .cloned()
        .collect();

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let skip = match order {
        Some(descending) => {
            matched.sort_by(|a, b| a.id.cmp(&b.id));
            if descending {
                matched.reverse();
            }
            params.page.unwrap_or(0).saturating_mul(limit)
        }
        None => 0,
    };

    let page: Vec<Image> = matched.into_iter().skip(skip).take(limit).collect();
    debug!(returned = page.len(), "search images");
    Ok(Json(page))
}

fn parse_ids(raw: Option<&str>) -> Result<Vec<u32>, (StatusCode, String)> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(|id| {
            id.trim()
                .parse()
                .map_err(|_| (StatusCode::BAD_REQUEST, format!("invalid category id {id:?}")))
        })
        .collect()
}

fn has_breed(image: &Image, name: &str) -> bool {
    image.breeds.iter().any(|breed| {
        ["id", "name"]
            .iter()
            .filter_map(|key| breed[*key].as_str())
            .any(|value| value.eq_ignore_ascii_case(name))
    })
}

fn in_categories(image: &Image, ids: &[u32]) -> bool {
    image
        .categories
        .as_ref()
        .is_some_and(|categories| categories.iter().any(|c| ids.contains(&c.id)))
}

fn has_extension(image: &Image, mime: &str) -> bool {
    let url = image.url.to_ascii_lowercase();
    match mime {
        "jpg" | "jpeg" => url.ends_with(".jpg") || url.ends_with(".jpeg"),
        other => url.ends_with(&format!(".{other}")),
    }
}

/// The images served by [`app`], in storage order.
pub fn fixtures() -> Vec<Image> {
    vec![
        Image {
            id: "0XYvRd7oD".to_string(),
            url: "https://cdn2.thecatapi.com/images/0XYvRd7oD.jpg".to_string(),
            width: 1204,
            height: 1445,
            breeds: vec![abyssinian()],
            categories: None,
        },
        Image {
            id: "ozEvzdVM-".to_string(),
            url: "https://cdn2.thecatapi.com/images/ozEvzdVM-.jpg".to_string(),
            width: 500,
            height: 375,
            breeds: Vec::new(),
            categories: Some(vec![Category {
                id: 1,
                name: "hats".to_string(),
            }]),
        },
        Image {
            id: "MTY3ODIyMQ".to_string(),
            url: "https://cdn2.thecatapi.com/images/MTY3ODIyMQ.png".to_string(),
            width: 640,
            height: 480,
            breeds: vec![bengal()],
            categories: Some(Vec::new()),
        },
        Image {
            id: "bpc".to_string(),
            url: "https://cdn2.thecatapi.com/images/bpc.gif".to_string(),
            width: 320,
            height: 240,
            breeds: Vec::new(),
            categories: Some(vec![Category {
                id: 5,
                name: "boxes".to_string(),
            }]),
        },
    ]
}

fn abyssinian() -> Value {
    json!({
        "id": "abys",
        "name": "Abyssinian",
        "adaptability": 5,
        "affection_level": 5,
        "alt_names": "",
        "cfa_url": "http://cfa.org/Breeds/BreedsAB/Abyssinian.aspx",
        "child_friendly": 3,
        "country_code": "EG",
        "country_codes": "EG",
        "description": "The Abyssinian is easy to care for, and a joy to have in your home.",
        "dog_friendly": 4,
        "energy_level": 5,
        "experimental": 0,
        "grooming": 1,
        "hairless": 0,
        "health_issues": 2,
        "hypoallergenic": 0,
        "indoor": 0,
        "intelligence": 5,
        "life_span": "14 - 15",
        "natural": 1,
        "origin": "Egypt",
        "rare": 0,
        "reference_image_id": "0XYvRd7oD",
        "rex": 0,
        "shedding_level": 2,
        "short_legs": 0,
        "social_needs": 5,
        "stranger_friendly": 5,
        "suppressed_tail": 0,
        "temperament": "Active, Energetic, Independent, Intelligent, Gentle",
        "vcahospitals_url": "https://vcahospitals.com/know-your-pet/cat-breeds/abyssinian",
        "vetstreet_url": "http://www.vetstreet.com/cats/abyssinian",
        "vocalisation": 1,
        "weight": { "imperial": "7  -  10", "metric": "3 - 5" },
        "wikipedia_url": "https://en.wikipedia.org/wiki/Abyssinian_(cat)"
    })
}

fn bengal() -> Value {
    json!({
        "id": "beng",
        "name": "Bengal",
        "adaptability": 5,
        "affection_level": 5,
        "alt_names": "Leopardette, Bengal Cat",
        "cfa_url": "http://cfa.org/Breeds/BreedsAB/Bengal.aspx",
        "child_friendly": 4,
        "country_code": "US",
        "country_codes": "US",
        "description": "Bengals are a lot of fun to live with.",
        "dog_friendly": 5,
        "energy_level": 5,
        "experimental": 0,
        "grooming": 1,
        "hairless": 0,
        "health_issues": 3,
        "hypoallergenic": 1,
        "indoor": 0,
        "intelligence": 5,
        "life_span": "12 - 15",
        "natural": 0,
        "origin": "United States",
        "rare": 0,
        "reference_image_id": "O3btzLlsO",
        "rex": 0,
        "shedding_level": 3,
        "short_legs": 0,
        "social_needs": 5,
        "stranger_friendly": 3,
        "suppressed_tail": 0,
        "temperament": "Alert, Agile, Energetic, Demanding, Intelligent",
        "vcahospitals_url": "https://vcahospitals.com/know-your-pet/cat-breeds/bengal",
        "vetstreet_url": "http://www.vetstreet.com/cats/bengal",
        "vocalisation": 5,
        "weight": { "imperial": "6 - 12", "metric": "3 - 7" },
        "wikipedia_url": "https://en.wikipedia.org/wiki/Bengal_(cat)"
    })
}
