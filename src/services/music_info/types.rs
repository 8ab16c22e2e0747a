//! Music info provider response types.

use serde::Deserialize;

/// Successful response of the info endpoint.
///
/// The provider speaks camelCase and sends the release date as a
/// `DD.MM.YYYY` string.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDetails {
    pub release_date: String,
    pub text: String,
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_details_decodes_camel_case() {
        let body = r#"{
            "releaseDate": "16.07.2006",
            "text": "Ooh baby, don't you know I suffer?",
            "link": "https://example.com/watch?v=abc"
        }"#;

        let details: SongDetails = serde_json::from_str(body).unwrap();
        assert_eq!(details.release_date, "16.07.2006");
        assert_eq!(details.link, "https://example.com/watch?v=abc");
    }
}
