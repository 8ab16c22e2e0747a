//! API types for the song catalog.
//!
//! These are the wire shapes shared by the route handlers and the service
//! layer. Database row types live in `db/models.rs` and convert into these.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Date format used on every API boundary, both inbound and outbound.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Parse a `DD.MM.YYYY` date string.
pub fn parse_release_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
}

/// Format a date as `DD.MM.YYYY`.
pub fn format_release_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ============================================================================
// Library listing
// ============================================================================

/// Song entry inside a library listing.
#[derive(Debug, Clone, Serialize)]
pub struct SongEntry {
    pub song_id: i64,
    pub song_name: String,
    pub release_date: Option<String>,
    pub song_text: Option<String>,
    pub link: Option<String>,
}

/// Group with its songs, as returned by the library listing.
#[derive(Debug, Clone, Serialize)]
pub struct GroupEntry {
    pub group_id: i64,
    pub group_name: String,
    pub song_info: Vec<SongEntry>,
}

// ============================================================================
// Partial updates
// ============================================================================

/// Three-state update value: absent, explicit null, or a new value.
///
/// A missing JSON key deserializes to `Unchanged` (via `#[serde(default)]`
/// on the containing struct), JSON `null` to `Clear`, anything else to
/// `Set`. Serialization goes the other way: `Set` emits the value, `Clear`
/// emits null, and `Unchanged` fields are meant to be skipped with
/// `skip_serializing_if`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    #[default]
    Unchanged,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    /// True when the field carries no change.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Patch::Unchanged)
    }

    /// Apply `f` to a set value, preserving the other states.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Set(value) => Patch::Set(f(value)),
            Patch::Clear => Patch::Clear,
            Patch::Unchanged => Patch::Unchanged,
        }
    }
}

impl<T: Clone> Patch<T> {
    /// Value to bind for a changed column: `Set` carries the value, `Clear`
    /// becomes NULL. Callers must not bind `Unchanged` fields at all.
    pub fn to_option(&self) -> Option<T> {
        match self {
            Patch::Set(value) => Some(value.clone()),
            _ => None,
        }
    }
}

impl Patch<String> {
    /// Fold a present-but-empty string into an explicit clear.
    pub fn empty_as_clear(self) -> Self {
        match self {
            Patch::Set(s) if s.is_empty() => Patch::Clear,
            other => other,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|opt| match opt {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        })
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Set(value) => serializer.serialize_some(value),
            _ => serializer.serialize_none(),
        }
    }
}

/// Partial update request for a song. Absent fields stay untouched.
#[derive(Debug, Default, Deserialize)]
pub struct SongUpdateRequest {
    #[serde(default)]
    pub song_name: Patch<String>,
    #[serde(default)]
    pub release_date: Patch<String>,
    #[serde(default)]
    pub song_text: Patch<String>,
    #[serde(default)]
    pub link: Patch<String>,
}

/// Echo of the changes an update applied.
#[derive(Debug, Serialize)]
pub struct UpdateInfo {
    #[serde(skip_serializing_if = "Patch::is_unchanged")]
    pub song_name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unchanged")]
    pub release_date: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unchanged")]
    pub song_text: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unchanged")]
    pub link: Patch<String>,
}
