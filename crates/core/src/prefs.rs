//! Persisted client preferences (popup dismissals, cookie consent).
//!
//! The storage is behind a trait so UI drivers inject a real file-backed
//! store while tests substitute the in-memory one.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

pub const EMAIL_POPUP_DISMISSED_KEY: &str = "cupid-email-popup-dismissed";
pub const COOKIE_CONSENT_KEY: &str = "cookie-consent";

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Ephemeral store for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }
}

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("could not read preference file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse preference file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
}

/// JSON-file-backed store. Writes are best-effort, matching the browser
/// storage it replaces; `persist` is available when a caller needs to know
/// the flush succeeded.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FilePreferenceStore {
    /// Opens the store at `path`; a missing file starts empty.
    pub fn open(path: &Path) -> Result<Self, PrefsError> {
        let values = match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|source| PrefsError::ParseFile { path: path.to_path_buf(), source })?,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(PrefsError::ReadFile { path: path.to_path_buf(), source });
            }
        };

        Ok(Self { path: path.to_path_buf(), values: Mutex::new(values) })
    }

    pub fn persist(&self) -> std::io::Result<()> {
        let snapshot = match self.values.lock() {
            Ok(values) => values.clone(),
            Err(_) => return Ok(()),
        };
        let raw = serde_json::to_string_pretty(&snapshot).unwrap_or_else(|_| "{}".to_string());
        fs::write(&self.path, raw)
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        let _ = self.persist();
    }
}

/// Gate for the email-capture popup: shown until dismissed once.
pub struct EmailPopupGate<'a> {
    store: &'a dyn PreferenceStore,
}

impl<'a> EmailPopupGate<'a> {
    pub fn new(store: &'a dyn PreferenceStore) -> Self {
        Self { store }
    }

    pub fn should_show(&self) -> bool {
        self.store.get(EMAIL_POPUP_DISMISSED_KEY).is_none()
    }

    pub fn dismiss(&self) {
        self.store.set(EMAIL_POPUP_DISMISSED_KEY, "true");
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CookieConsent {
    Accepted,
    Declined,
}

/// Gate for the cookie banner: shown until the visitor accepts or declines.
pub struct CookieConsentGate<'a> {
    store: &'a dyn PreferenceStore,
}

impl<'a> CookieConsentGate<'a> {
    pub fn new(store: &'a dyn PreferenceStore) -> Self {
        Self { store }
    }

    pub fn consent(&self) -> Option<CookieConsent> {
        match self.store.get(COOKIE_CONSENT_KEY)?.as_str() {
            "accepted" => Some(CookieConsent::Accepted),
            "declined" => Some(CookieConsent::Declined),
            _ => None,
        }
    }

    pub fn should_show_banner(&self) -> bool {
        self.consent().is_none()
    }

    pub fn record(&self, consent: CookieConsent) {
        let value = match consent {
            CookieConsent::Accepted => "accepted",
            CookieConsent::Declined => "declined",
        };
        self.store.set(COOKIE_CONSENT_KEY, value);
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::{
        CookieConsent, CookieConsentGate, EmailPopupGate, FilePreferenceStore,
        MemoryPreferenceStore, PreferenceStore,
    };

    #[test]
    fn popup_shows_until_dismissed() {
        let store = MemoryPreferenceStore::default();
        let gate = EmailPopupGate::new(&store);

        assert!(gate.should_show());
        gate.dismiss();
        assert!(!gate.should_show());
    }

    #[test]
    fn cookie_banner_tracks_both_outcomes() {
        let store = MemoryPreferenceStore::default();
        let gate = CookieConsentGate::new(&store);

        assert!(gate.should_show_banner());
        gate.record(CookieConsent::Declined);
        assert!(!gate.should_show_banner());
        assert_eq!(gate.consent(), Some(CookieConsent::Declined));

        gate.record(CookieConsent::Accepted);
        assert_eq!(gate.consent(), Some(CookieConsent::Accepted));
    }

    #[test]
    fn file_store_round_trips_across_reopens() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("prefs.json");

        {
            let store = FilePreferenceStore::open(&path).expect("open fresh store");
            assert!(store.get("cookie-consent").is_none());
            store.set("cookie-consent", "accepted");
            store.persist().expect("persist");
        }

        let reopened = FilePreferenceStore::open(&path).expect("reopen store");
        assert_eq!(reopened.get("cookie-consent").as_deref(), Some("accepted"));
    }

    #[test]
    fn corrupt_preference_files_are_reported() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").expect("write corrupt file");

        let error = FilePreferenceStore::open(&path).expect_err("corrupt file must fail");
        assert!(error.to_string().contains("could not parse"));
    }
}
