//! Wire types returned by the remote user listing service
//!
//! These mirror the JSON the service sends and carry no guarantees beyond
//! "it parsed". Field coercion is lenient: integers may arrive as numeric
//! strings, and missing text fields become empty strings.

use serde::{Deserialize, Deserializer, Serialize};

/// One page of the listing endpoint.
///
/// ```json
/// { "result": [1, 2, 3], "token": "b3BhcXVl" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPage {
    /// Record ids on this page, in service order
    #[serde(deserialize_with = "lenient_ids")]
    pub result: Vec<i64>,

    /// Continuation marker; absent on the final page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ListingPage {
    /// The token to request the next page with, if there is one.
    ///
    /// An empty token is treated as absent, otherwise the service could keep
    /// us requesting `?token=` forever.
    pub fn continuation(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Unvalidated user record as served by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUserRecord {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,

    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,

    #[serde(deserialize_with = "lenient_i64")]
    pub age: i64,

    /// Phone number with arbitrary punctuation; may be missing entirely
    #[serde(default, deserialize_with = "lenient_phone")]
    pub number: Option<String>,

    #[serde(default, deserialize_with = "nullable_string")]
    pub photo: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub bio: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

impl IntOrString {
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            IntOrString::Int(value) => Ok(value),
            IntOrString::Str(raw) => raw
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected an integer, got {:?}", raw))),
        }
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    IntOrString::deserialize(deserializer)?.into_i64()
}

fn lenient_ids<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<IntOrString>::deserialize(deserializer)?
        .into_iter()
        .map(IntOrString::into_i64)
        .collect()
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_phone<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<IntOrString>::deserialize(deserializer)?.map(|value| match value {
            IntOrString::Int(n) => n.to_string(),
            IntOrString::Str(s) => s,
        }),
    )
}
