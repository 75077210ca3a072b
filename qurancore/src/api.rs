//! Surah detail from the quranapi JSON endpoint.

use crate::catalog::{is_valid_id, SurahId};
use crate::config::AppConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("no such surah: {0}")]
    InvalidSurah(SurahId),
}

/// A recitation track offered for a surah.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reciter {
    pub key: String,
    pub display_name: String,
    pub audio_url: String,
    pub image_url: Option<String>,
}

/// One surah's text and recitations. Verse `n` lives at index `n - 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurahDetail {
    pub surah_id: SurahId,
    pub name: String,
    pub name_arabic: String,
    pub name_translation: String,
    pub total_ayah: u16,
    pub arabic_verses: Vec<String>,
    pub english_verses: Vec<String>,
    /// In the order the API lists them; the first is the default.
    pub reciters: Vec<Reciter>,
}

/// A verse as shown in the content view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verse<'a> {
    pub number: usize,
    pub arabic: &'a str,
    pub english: Option<&'a str>,
}

impl SurahDetail {
    pub fn verse_count(&self) -> usize {
        self.arabic_verses.len()
    }

    pub fn verses(&self) -> impl Iterator<Item = Verse<'_>> {
        self.arabic_verses.iter().enumerate().map(move |(i, arabic)| Verse {
            number: i + 1,
            arabic: arabic.as_str(),
            english: self.english_verses.get(i).map(String::as_str),
        })
    }

    pub fn default_reciter(&self) -> Option<&Reciter> {
        self.reciters.first()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSurah {
    #[serde(default)]
    surah_name: String,
    surah_name_arabic: String,
    surah_name_translation: String,
    total_ayah: u16,
    arabic1: Vec<String>,
    #[serde(default)]
    english: Vec<String>,
    // serde_json is built with preserve_order, so this keeps document order
    #[serde(default)]
    audio: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct RawReciter {
    reciter: String,
    url: String,
    #[serde(default)]
    image: Option<String>,
}

/// Parse an API response body for surah `id`.
pub fn parse_surah(id: SurahId, body: &str) -> Result<SurahDetail, FetchError> {
    let raw: RawSurah = serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    let reciters = raw
        .audio
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<RawReciter>(value) {
            Ok(r) => Some(Reciter {
                key,
                display_name: r.reciter,
                audio_url: r.url,
                image_url: r.image.filter(|s| !s.is_empty()),
            }),
            Err(e) => {
                warn!(surah = id, reciter = %key, error = %e, "skipping malformed reciter");
                None
            }
        })
        .collect();

    Ok(SurahDetail {
        surah_id: id,
        name: raw.surah_name,
        name_arabic: raw.surah_name_arabic,
        name_translation: raw.surah_name_translation,
        total_ayah: raw.total_ayah,
        arabic_verses: raw.arabic1,
        english_verses: raw.english,
        reciters,
    })
}

/// Anything that can produce a surah's detail. Called from worker threads.
pub trait SurahSource: Send + Sync {
    fn fetch(&self, id: SurahId) -> Result<SurahDetail, FetchError>;
}

/// HTTP client for the surah API and recitation downloads.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::blocking::Client,
    config: AppConfig,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("slowQuran/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { http, config: config.clone() })
    }

    /// Download a whole resource, e.g. a recitation track.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!(%url, "downloading");
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let bytes = response.bytes().map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl SurahSource for ApiClient {
    fn fetch(&self, id: SurahId) -> Result<SurahDetail, FetchError> {
        if !is_valid_id(id) {
            return Err(FetchError::InvalidSurah(id));
        }
        let url = self.config.surah_url(id);
        debug!(%url, "fetching surah");
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.text().map_err(|e| FetchError::Network(e.to_string()))?;
        parse_surah(id, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "surahName": "Al-Ikhlas",
        "surahNameArabic": "الإخلاص",
        "surahNameArabicLong": "سُورَةُ الإخْلَاصِ",
        "surahNameTranslation": "Sincerity",
        "revelationPlace": "Mecca",
        "totalAyah": 4,
        "surahNo": 112,
        "audio": {
            "3": { "reciter": "Nasser Al Qatami", "url": "https://example.org/3/112.mp3", "originalUrl": "x" },
            "1": { "reciter": "Mishary Rashid Al Afasy", "url": "https://example.org/1/112.mp3", "originalUrl": "y", "image": "https://example.org/1.png" },
            "bad": { "name": "missing fields" },
            "2": { "reciter": "Abu Bakr Al Shatri", "url": "https://example.org/2/112.mp3", "image": "" }
        },
        "english": ["Say, He is Allah, One.", "Allah, the Eternal Refuge.", "He neither begets nor is born,", "Nor is there to Him any equivalent."],
        "arabic1": ["a1", "a2", "a3", "a4"]
    }"#;

    #[test]
    fn test_parse_keeps_reciter_order() {
        let detail = parse_surah(112, BODY).unwrap();
        let keys: Vec<_> = detail.reciters.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["3", "1", "2"]);
        assert_eq!(detail.default_reciter().map(|r| r.display_name.as_str()), Some("Nasser Al Qatami"));
        assert_eq!(detail.reciters[1].image_url.as_deref(), Some("https://example.org/1.png"));
        assert_eq!(detail.reciters[2].image_url, None);
    }

    #[test]
    fn test_parse_verses() {
        let detail = parse_surah(112, BODY).unwrap();
        assert_eq!(detail.verse_count(), 4);
        assert_eq!(detail.total_ayah, 4);
        let first = detail.verses().next().unwrap();
        assert_eq!(first.number, 1);
        assert_eq!(first.arabic, "a1");
        assert_eq!(first.english, Some("Say, He is Allah, One."));
    }

    #[test]
    fn test_missing_translation_is_none() {
        let body = r#"{"surahNameArabic":"x","surahNameTranslation":"y","totalAyah":2,"arabic1":["a","b"],"english":["only one"]}"#;
        let detail = parse_surah(1, body).unwrap();
        let verses: Vec<_> = detail.verses().collect();
        assert_eq!(verses[1].english, None);
        assert!(detail.reciters.is_empty());
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(parse_surah(1, "<html>"), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_invalid_id_rejected_before_request() {
        let client = ApiClient::new(&AppConfig::default()).unwrap();
        assert_eq!(client.fetch(0).unwrap_err(), FetchError::InvalidSurah(0));
        assert_eq!(client.fetch(115).unwrap_err(), FetchError::InvalidSurah(115));
    }
}
