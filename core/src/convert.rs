//! Conversion of API JSON objects into typed records.
//!
//! # Design
//! Each object is first deserialized into a raw record whose fields are
//! [`Slot`]s, which keep "absent", "null" and "wrong kind" apart instead of
//! collapsing them into `Option`. The typed record is then assembled from the
//! raw one: image and category keys are always required, breed keys follow
//! the configured [`FieldPolicy`]. Conversions are pure: caching of images
//! happens one layer up, in `ImageRegistry`.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::parse::{parse_interval, parse_list, Interval};
use crate::types::{Breed, Category, FieldPolicy, Image};

/// Highest value of the breed rating scales.
const MAX_LEVEL: u8 = 5;

const STRING: &str = "a string";
const COUNT: &str = "a non-negative integer";
const LEVEL: &str = "a level between 0 and 5";
const FLAG: &str = "a boolean or 0/1";

/// One key of an upstream object.
enum Slot<T> {
    Absent,
    Null,
    /// Present, but not deserializable as `T`.
    Invalid,
    Set(T),
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Absent
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Slot<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => Slot::Null,
            value => serde_json::from_value(value).map_or(Slot::Invalid, Slot::Set),
        })
    }
}

impl<T> Slot<T> {
    /// Present and non-null under every policy.
    fn required(self, entity: &'static str, field: &str, expected: &'static str) -> Result<T, ApiError> {
        match self {
            Slot::Set(value) => Ok(value),
            Slot::Invalid => Err(ApiError::invalid(entity, field, expected)),
            Slot::Absent | Slot::Null => Err(ApiError::missing(entity, field)),
        }
    }

    /// Absence is decided by the policy. `null` reads as `None` under either.
    fn optional(
        self,
        entity: &'static str,
        field: &str,
        expected: &'static str,
        policy: FieldPolicy,
    ) -> Result<Option<T>, ApiError> {
        match self {
            Slot::Absent if policy == FieldPolicy::Strict => Err(ApiError::missing(entity, field)),
            slot => slot.or_none(entity, field, expected),
        }
    }

    fn or_none(self, entity: &'static str, field: &str, expected: &'static str) -> Result<Option<T>, ApiError> {
        match self {
            Slot::Set(value) => Ok(Some(value)),
            Slot::Invalid => Err(ApiError::invalid(entity, field, expected)),
            Slot::Absent | Slot::Null => Ok(None),
        }
    }
}

/// Upstream encodes breed traits as `0`/`1` or as JSON booleans.
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Number(f64),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Number(n) => *n != 0.0,
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawImageId {
    id: Slot<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawImage {
    url: Slot<String>,
    width: Slot<u32>,
    height: Slot<u32>,
    breeds: Slot<Vec<Value>>,
    categories: Slot<Vec<Value>>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawCategory {
    id: Slot<u32>,
    name: Slot<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawWeight {
    metric: Slot<String>,
    imperial: Slot<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawBreed {
    id: Slot<String>,
    name: Slot<String>,
    adaptability: Slot<u8>,
    affection_level: Slot<u8>,
    alt_names: Slot<String>,
    cfa_url: Slot<String>,
    child_friendly: Slot<u8>,
    country_code: Slot<String>,
    country_codes: Slot<String>,
    description: Slot<String>,
    dog_friendly: Slot<u8>,
    energy_level: Slot<u8>,
    experimental: Slot<Flag>,
    grooming: Slot<u8>,
    hairless: Slot<Flag>,
    health_issues: Slot<u8>,
    hypoallergenic: Slot<Flag>,
    indoor: Slot<Flag>,
    intelligence: Slot<u8>,
    life_span: Slot<String>,
    natural: Slot<Flag>,
    origin: Slot<String>,
    rare: Slot<Flag>,
    reference_image_id: Slot<String>,
    rex: Slot<Flag>,
    shedding_level: Slot<u8>,
    short_legs: Slot<Flag>,
    social_needs: Slot<u8>,
    stranger_friendly: Slot<u8>,
    suppressed_tail: Slot<Flag>,
    temperament: Slot<String>,
    vcahospitals_url: Slot<String>,
    vetstreet_url: Slot<String>,
    vocalisation: Slot<u8>,
    weight: Slot<RawWeight>,
    wikipedia_url: Slot<String>,
}

/// Deserialize a raw record, refusing anything but a JSON object.
fn from_object<T: DeserializeOwned>(entity: &'static str, value: &Value) -> Result<T, ApiError> {
    if !value.is_object() {
        return Err(ApiError::DeserializationError(format!("{entity} is not a JSON object")));
    }
    T::deserialize(value).map_err(|e| ApiError::DeserializationError(format!("{entity}: {e}")))
}

/// Read only the `id` of an image object.
pub(crate) fn image_id(value: &Value) -> Result<String, ApiError> {
    from_object::<RawImageId>("image", value)?
        .id
        .required("image", "id", STRING)
}

/// Policy-aware reads of optional breed fields.
struct BreedFields {
    policy: FieldPolicy,
}

impl BreedFields {
    fn text(&self, field: &str, slot: Slot<String>) -> Result<Option<String>, ApiError> {
        slot.optional("breed", field, STRING, self.policy)
    }

    fn level(&self, field: &str, slot: Slot<u8>) -> Result<Option<u8>, ApiError> {
        match slot.optional("breed", field, LEVEL, self.policy)? {
            Some(level) if level > MAX_LEVEL => Err(ApiError::invalid("breed", field, LEVEL)),
            level => Ok(level),
        }
    }

    /// Absent (lenient), `null`, `0` and `false` all read as false.
    fn flag(&self, field: &str, slot: Slot<Flag>) -> Result<bool, ApiError> {
        Ok(slot
            .optional("breed", field, FLAG, self.policy)?
            .is_some_and(|flag| flag.is_set()))
    }

    fn interval(&self, field: &str, slot: Slot<String>) -> Result<Option<Interval>, ApiError> {
        self.text(field, slot)?.map(|text| parse_interval(&text)).transpose()
    }

    fn list(&self, field: &str, slot: Slot<String>) -> Result<Option<Vec<String>>, ApiError> {
        Ok(self.text(field, slot)?.map(|text| parse_list(&text)))
    }
}

impl Breed {
    /// Build a breed from one element of an image's `breeds` array.
    pub fn from_json(value: &Value, policy: FieldPolicy) -> Result<Self, ApiError> {
        let raw: RawBreed = from_object("breed", value)?;
        let f = BreedFields { policy };

        let id = raw.id.required("breed", "id", STRING)?;
        let name = raw.name.required("breed", "name", STRING)?;
        let (weight_metric, weight_imperial) = match raw.weight.optional("breed", "weight", "an object", policy)? {
            Some(weight) => (
                f.interval("weight.metric", weight.metric)?,
                f.interval("weight.imperial", weight.imperial)?,
            ),
            None => (None, None),
        };

        Ok(Breed {
            id,
            name,
            adaptability: f.level("adaptability", raw.adaptability)?,
            affection_level: f.level("affection_level", raw.affection_level)?,
            alt_names: f.list("alt_names", raw.alt_names)?,
            cfa_url: f.text("cfa_url", raw.cfa_url)?,
            child_friendly: f.level("child_friendly", raw.child_friendly)?,
            country_code: f.text("country_code", raw.country_code)?,
            country_codes: f.list("country_codes", raw.country_codes)?,
            description: f.text("description", raw.description)?,
            dog_friendly: f.level("dog_friendly", raw.dog_friendly)?,
            energy_level: f.level("energy_level", raw.energy_level)?,
            experimental: f.flag("experimental", raw.experimental)?,
            grooming: f.level("grooming", raw.grooming)?,
            hairless: f.flag("hairless", raw.hairless)?,
            health_issues: f.level("health_issues", raw.health_issues)?,
            hypoallergenic: f.flag("hypoallergenic", raw.hypoallergenic)?,
            indoor: f.flag("indoor", raw.indoor)?,
            intelligence: f.level("intelligence", raw.intelligence)?,
            life_span: f.interval("life_span", raw.life_span)?,
            natural: f.flag("natural", raw.natural)?,
            origin: f.text("origin", raw.origin)?,
            rare: f.flag("rare", raw.rare)?,
            reference_image_id: f.text("reference_image_id", raw.reference_image_id)?,
            rex: f.flag("rex", raw.rex)?,
            shedding_level: f.level("shedding_level", raw.shedding_level)?,
            short_legs: f.flag("short_legs", raw.short_legs)?,
            social_needs: f.level("social_needs", raw.social_needs)?,
            stranger_friendly: f.level("stranger_friendly", raw.stranger_friendly)?,
            suppressed_tail: f.flag("suppressed_tail", raw.suppressed_tail)?,
            temperament: f.list("temperament", raw.temperament)?,
            vcahospitals_url: f.text("vcahospitals_url", raw.vcahospitals_url)?,
            vetstreet_url: f.text("vetstreet_url", raw.vetstreet_url)?,
            vocalisation: f.level("vocalisation", raw.vocalisation)?,
            weight_metric,
            weight_imperial,
            wikipedia_url: f.text("wikipedia_url", raw.wikipedia_url)?,
        })
    }
}

impl Category {
    /// Build a category; `id` and `name` are always required.
    pub fn from_json(value: &Value) -> Result<Self, ApiError> {
        let raw: RawCategory = from_object("category", value)?;
        Ok(Category {
            id: raw.id.required("category", "id", COUNT)?,
            name: raw.name.required("category", "name", STRING)?,
        })
    }
}

impl Image {
    /// Build an image without consulting any registry.
    ///
    /// Use `ImageRegistry::convert` to get the shared instance for an id.
    pub fn from_json(value: &Value, policy: FieldPolicy) -> Result<Self, ApiError> {
        let id = image_id(value)?;
        Image::from_json_with_id(id, value, policy)
    }

    /// Read everything but the id, which the caller has already extracted.
    pub(crate) fn from_json_with_id(id: String, value: &Value, policy: FieldPolicy) -> Result<Self, ApiError> {
        let raw: RawImage = from_object("image", value)?;
        let url = raw.url.required("image", "url", STRING)?;
        let width = raw.width.required("image", "width", COUNT)?;
        let height = raw.height.required("image", "height", COUNT)?;

        let breeds = raw
            .breeds
            .or_none("image", "breeds", "an array")?
            .unwrap_or_default()
            .iter()
            .map(|item| Breed::from_json(item, policy))
            .collect::<Result<Vec<_>, _>>()?;

        let categories = raw
            .categories
            .or_none("image", "categories", "an array")?
            .map(|items| items.iter().map(Category::from_json).collect::<Result<Vec<_>, _>>())
            .transpose()?;

        Ok(Image {
            id,
            url,
            width,
            height,
            breeds,
            categories,
        })
    }
}
