//! Typed records built from the API's JSON documents.
//!
//! # Design
//! Records are plain owned data and never change after construction. Images
//! are shared as `Arc<Image>` through the `ImageRegistry`; breeds and
//! categories are owned by the image that carries them and compare by value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::parse::Interval;

/// How breed conversion treats keys that are absent from the JSON object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldPolicy {
    /// Every breed key must be present. Explicit `null` values are accepted.
    #[default]
    Strict,
    /// Absent breed keys become `None` (or `false` for flags). `id` and
    /// `name` are still required.
    Lenient,
}

impl FromStr for FieldPolicy {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(FieldPolicy::Strict),
            "lenient" => Ok(FieldPolicy::Lenient),
            _ => Err(ApiError::InvalidArgument {
                name: "field_policy",
                value: s.to_string(),
            }),
        }
    }
}

/// A cat image returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub breeds: Vec<Breed>,
    /// `None` when the response carried no `categories` key at all, which is
    /// different from `Some(vec![])`.
    pub categories: Option<Vec<Category>>,
}

/// Descriptive profile of a cat breed. Levels are 0-5 ordinals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breed {
    pub id: String,
    pub name: String,
    pub adaptability: Option<u8>,
    pub affection_level: Option<u8>,
    pub alt_names: Option<Vec<String>>,
    pub cfa_url: Option<String>,
    pub child_friendly: Option<u8>,
    pub country_code: Option<String>,
    pub country_codes: Option<Vec<String>>,
    pub description: Option<String>,
    pub dog_friendly: Option<u8>,
    pub energy_level: Option<u8>,
    pub experimental: bool,
    pub grooming: Option<u8>,
    pub hairless: bool,
    pub health_issues: Option<u8>,
    pub hypoallergenic: bool,
    pub indoor: bool,
    pub intelligence: Option<u8>,
    /// Years.
    pub life_span: Option<Interval>,
    pub natural: bool,
    pub origin: Option<String>,
    pub rare: bool,
    pub reference_image_id: Option<String>,
    pub rex: bool,
    pub shedding_level: Option<u8>,
    pub short_legs: bool,
    pub social_needs: Option<u8>,
    pub stranger_friendly: Option<u8>,
    pub suppressed_tail: bool,
    pub temperament: Option<Vec<String>>,
    pub vcahospitals_url: Option<String>,
    pub vetstreet_url: Option<String>,
    pub vocalisation: Option<u8>,
    /// Kilograms.
    pub weight_metric: Option<Interval>,
    /// Pounds.
    pub weight_imperial: Option<Interval>,
    pub wikipedia_url: Option<String>,
}

/// A named tag an image may belong to, e.g. "hats" or "boxes".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Image id={:?}>", self.id)
    }
}

impl fmt::Display for Breed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Breed id={:?}, name={:?}>", self.id, self.name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Category id={}, name={:?}>", self.id, self.name)
    }
}
