use chrono::{DateTime, Utc};
use database::{GatewayResult, Row};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

/// Item entity - one entry on the shopping list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Assigned by storage, positive and never reused
    pub id: i64,
    /// What to buy
    pub name: String,
    /// Free-form amount, e.g. "2" or "1 kg"
    pub quantity: String,
    /// Creation timestamp, set by storage
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Decodes an item from a row with `id`, `name`, `quantity` and `created_at` columns.
    pub fn from_row(row: &Row) -> GatewayResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            quantity: row.get("quantity")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// DTO for creating a new item
///
/// Missing fields decode as empty strings so that they are reported by
/// validation rather than by the JSON decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewItem {
    #[serde(default, deserialize_with = "name_text")]
    #[validate(length(min = 1, message = "cannot be empty"))]
    pub name: String,
    #[serde(default, deserialize_with = "quantity_text")]
    #[validate(length(min = 1, message = "cannot be empty"))]
    pub quantity: String,
}

impl NewItem {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
        }
    }

    /// Copy with surrounding whitespace removed from both fields.
    pub fn trimmed(&self) -> Self {
        Self::new(self.name.trim(), self.quantity.trim())
    }
}

/// Accepts only a JSON string. Other value kinds name the field in the
/// error; syntax and EOF errors from the decoder pass through untouched.
struct FieldText(&'static str);

impl FieldText {
    fn invalid<E: de::Error>(&self) -> E {
        E::custom(format!(
            "invalid value for the \"{}\" field, expected a string",
            self.0
        ))
    }
}

impl<'de> Visitor<'de> for FieldText {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a string for the \"{}\" field", self.0)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<String, E> {
        Err(self.invalid())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<String, E> {
        Err(self.invalid())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<String, E> {
        Err(self.invalid())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<String, E> {
        Err(self.invalid())
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Err(self.invalid())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _: A) -> Result<String, A::Error> {
        Err(self.invalid())
    }

    fn visit_map<A: MapAccess<'de>>(self, _: A) -> Result<String, A::Error> {
        Err(self.invalid())
    }
}

fn name_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    deserializer.deserialize_any(FieldText("name"))
}

fn quantity_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    deserializer.deserialize_any(FieldText("quantity"))
}
