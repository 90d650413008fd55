//! Country record model and payload decoding.
//!
//! The countries endpoint returns a JSON array of loosely-shaped objects: any
//! attribute may be missing or `null`, and a handful of entries carry numbers
//! encoded as strings. [`Country`] models every attribute as optional and
//! [`decode_countries`] decodes the array element by element so a single
//! malformed entry cannot sink the whole load.

use crate::domain::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder shown for any attribute that is missing.
pub const MISSING: &str = "-";

/// Image links attached to a country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub emblem: Option<String>,
}

/// One country as returned by the endpoint.
///
/// Records carry no identity; the view addresses them by position. Once a
/// load succeeds the record set is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    #[serde(default)]
    pub name: Option<String>,
    /// Displayed as "Code".
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_population")]
    pub population: Option<u64>,
    #[serde(default)]
    pub media: Option<Media>,
}

impl Country {
    /// Creates a record with just a name and population, the two attributes
    /// the filter engine looks at.
    ///
    /// # Examples
    ///
    /// ```
    /// use country_browser::Country;
    ///
    /// let albania = Country::named("Albania", Some(2_800_000));
    /// assert_eq!(albania.name.as_deref(), Some("Albania"));
    /// assert_eq!(albania.display_population(), "2800000");
    /// ```
    #[must_use]
    pub fn named(name: &str, population: Option<u64>) -> Self {
        Self {
            name: Some(name.to_string()),
            population,
            ..Self::default()
        }
    }

    /// Name used for matching; a missing name matches like an empty string.
    #[must_use]
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        non_empty_or_missing(self.name.as_deref())
    }

    #[must_use]
    pub fn display_code(&self) -> &str {
        non_empty_or_missing(self.abbreviation.as_deref())
    }

    #[must_use]
    pub fn display_capital(&self) -> &str {
        non_empty_or_missing(self.capital.as_deref())
    }

    #[must_use]
    pub fn display_phone(&self) -> &str {
        non_empty_or_missing(self.phone.as_deref())
    }

    /// Population as shown in the table. Zero renders as missing.
    #[must_use]
    pub fn display_population(&self) -> String {
        match self.population {
            Some(0) | None => MISSING.to_string(),
            Some(population) => population.to_string(),
        }
    }

    #[must_use]
    pub fn flag_url(&self) -> Option<&str> {
        self.media
            .as_ref()
            .and_then(|m| m.flag.as_deref())
            .filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn emblem_url(&self) -> Option<&str> {
        self.media
            .as_ref()
            .and_then(|m| m.emblem.as_deref())
            .filter(|s| !s.is_empty())
    }
}

fn non_empty_or_missing(value: Option<&str>) -> &str {
    match value {
        Some(s) if !s.is_empty() => s,
        _ => MISSING,
    }
}

/// Accepts a non-negative integer, an integer-valued string, or `null`.
/// Anything else decodes to `None` rather than failing the record.
fn lenient_population<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().replace(',', "").parse::<u64>().ok(),
        _ => None,
    }))
}

/// Outcome of decoding a countries payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCountries {
    pub countries: Vec<Country>,
    /// Array elements that were not country objects.
    pub skipped: usize,
}

/// Decodes a countries payload.
///
/// The body must be a JSON array; anything else is an error. Elements that
/// fail to decode as a [`Country`] are skipped and counted.
///
/// # Errors
///
/// Returns [`BrowserError::Decode`](crate::BrowserError::Decode) if the body is
/// not valid JSON or not an array.
///
/// # Examples
///
/// ```
/// use country_browser::domain::decode_countries;
///
/// let body = br#"[{"name":"Albania","population":2800000}, 42]"#;
/// let decoded = decode_countries(body)?;
/// assert_eq!(decoded.countries.len(), 1);
/// assert_eq!(decoded.skipped, 1);
/// # Ok::<(), country_browser::BrowserError>(())
/// ```
pub fn decode_countries(body: &[u8]) -> Result<DecodedCountries> {
    let elements: Vec<Value> = serde_json::from_slice(body)?;
    let total = elements.len();

    let countries: Vec<Country> = elements
        .into_iter()
        .filter_map(|element| match serde_json::from_value::<Country>(element) {
            Ok(country) => Some(country),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed country record");
                None
            }
        })
        .collect();

    Ok(DecodedCountries {
        skipped: total - countries.len(),
        countries,
    })
}
