//! Session cookie loading.
//!
//! Two serialized forms are understood:
//!
//! - the `MFP_COOKIES` form, a JSON object mapping cookie name to
//!   `{"value", "domain"?, "path"?, "secure"?}`;
//! - the exported browser cookie file, a JSON array of
//!   `{"name", "value", "domain", "path", "secure", "httpOnly"}` objects.
//!
//! Loading only parses; it never writes state.

use reqwest::Url;
use reqwest::cookie::Jar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use super::error::{DiaryError, DiaryResult};

/// Domain assumed when a cookie does not name one.
pub const DEFAULT_COOKIE_DOMAIN: &str = ".myfitnesspal.com";

/// Path assumed when a cookie does not name one.
pub const DEFAULT_COOKIE_PATH: &str = "/";

/// Cookies that carry the logged-in session.
pub const SESSION_COOKIE_NAMES: &[&str] = &[
    "_mfp_session",
    "__Secure-next-auth.session-token",
    "known_user",
    "remember_me",
];

/// A single HTTP session credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
}

/// Cookie values are bearer credentials; keep them out of logs.
impl std::fmt::Debug for Cookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cookie")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("domain", &self.domain)
            .field("path", &self.path)
            .field("secure", &self.secure)
            .finish()
    }
}

impl Cookie {
    /// The cookie rendered as a `Set-Cookie` header value.
    fn set_cookie_header(&self) -> String {
        let mut header = format!(
            "{}={}; Domain={}; Path={}",
            self.name, self.value, self.domain, self.path
        );
        if self.secure {
            header.push_str("; Secure");
        }
        header
    }

    /// Origin the cookie is scoped to, used to seed the jar.
    fn origin(&self) -> Option<Url> {
        let host = self.domain.trim_start_matches('.');
        Url::parse(&format!("https://{}{}", host, self.path)).ok()
    }
}

/// Attributes of one cookie in the `MFP_COOKIES` map form.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CookieAttributes {
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    secure: Option<bool>,
}

/// One object in the exported browser cookie file.
#[derive(Debug, Clone, Deserialize)]
struct ExportedCookie {
    name: String,
    value: String,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    secure: Option<bool>,
    #[serde(default, rename = "httpOnly")]
    #[allow(dead_code)]
    http_only: bool,
}

/// An ordered set of session cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieStore {
    cookies: Vec<Cookie>,
}

impl CookieStore {
    /// Build a store from already-reconstructed cookies.
    pub fn new(cookies: Vec<Cookie>) -> Self {
        Self { cookies }
    }

    /// Parse the `MFP_COOKIES` map form.
    ///
    /// Absent or blank input and an empty map yield `None`. Malformed input
    /// is reported as a single warning and also yields `None`, so callers
    /// fall through to the next credential source.
    pub fn from_env_json(raw: Option<&str>) -> Option<Self> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;

        match serde_json::from_str::<BTreeMap<String, CookieAttributes>>(raw) {
            Ok(map) => {
                let cookies: Vec<Cookie> = map
                    .into_iter()
                    .map(|(name, attrs)| Cookie {
                        name,
                        value: attrs.value,
                        domain: attrs
                            .domain
                            .unwrap_or_else(|| DEFAULT_COOKIE_DOMAIN.to_string()),
                        path: attrs.path.unwrap_or_else(|| DEFAULT_COOKIE_PATH.to_string()),
                        secure: attrs.secure.unwrap_or(false),
                    })
                    .collect();
                debug!("Parsed {} cookies from environment", cookies.len());
                Some(Self::new(cookies)).filter(|store| !store.is_empty())
            }
            Err(e) => {
                warn!("Failed to load cookies from environment: {}", e);
                None
            }
        }
    }

    /// Parse the exported browser cookie file form.
    pub fn from_export_json(raw: &str) -> Result<Self, serde_json::Error> {
        let exported: Vec<ExportedCookie> = serde_json::from_str(raw)?;
        Ok(Self::new(
            exported
                .into_iter()
                .map(|c| Cookie {
                    name: c.name,
                    value: c.value,
                    domain: c.domain.unwrap_or_else(|| DEFAULT_COOKIE_DOMAIN.to_string()),
                    path: c.path.unwrap_or_else(|| DEFAULT_COOKIE_PATH.to_string()),
                    secure: c.secure.unwrap_or(false),
                })
                .collect(),
        ))
    }

    /// Load the exported browser cookie file at `path`.
    ///
    /// A missing file yields `Ok(None)`; an unreadable or malformed one is
    /// an error.
    pub fn from_export_file(path: &Path) -> DiaryResult<Option<Self>> {
        if !path.exists() {
            debug!("No cookie file at {}", path.display());
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path).map_err(|e| DiaryError::CookieFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let store = Self::from_export_json(&raw).map_err(|e| DiaryError::CookieFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Some(store).filter(|s| !s.is_empty()))
    }

    /// Serialize into the `MFP_COOKIES` map form (single line JSON).
    pub fn to_env_json(&self) -> String {
        let map: BTreeMap<&str, CookieAttributes> = self
            .cookies
            .iter()
            .map(|c| {
                (
                    c.name.as_str(),
                    CookieAttributes {
                        value: c.value.clone(),
                        domain: Some(c.domain.clone()),
                        path: Some(c.path.clone()),
                        secure: Some(c.secure),
                    },
                )
            })
            .collect();
        serde_json::to_string(&map).unwrap_or_else(|_| "{}".to_string())
    }

    /// Install every cookie into a jar usable by the HTTP transport.
    pub fn to_jar(&self) -> Jar {
        let jar = Jar::default();
        for cookie in &self.cookies {
            match cookie.origin() {
                Some(url) => jar.add_cookie_str(&cookie.set_cookie_header(), &url),
                None => warn!("Skipping cookie {} with unusable domain", cookie.name),
            }
        }
        jar
    }

    /// Look up a cookie by name.
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.iter()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::cookie::CookieStore as _;
    use std::io::Write;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::NamedTempFile;
    use tracing_subscriber::layer::{self, Layer, SubscriberExt};

    #[test]
    fn test_env_json_applies_defaults() {
        let store = CookieStore::from_env_json(Some(r#"{"a": {"value": "x"}}"#)).unwrap();
        assert_eq!(store.len(), 1);
        let cookie = store.get("a").unwrap();
        assert_eq!(cookie.value, "x");
        assert_eq!(cookie.domain, DEFAULT_COOKIE_DOMAIN);
        assert_eq!(cookie.path, "/");
        assert!(!cookie.secure);
    }

    #[test]
    fn test_env_json_keeps_explicit_attributes() {
        let raw = r#"{"_mfp_session": {"value": "s", "domain": "www.myfitnesspal.com", "path": "/food", "secure": true}}"#;
        let store = CookieStore::from_env_json(Some(raw)).unwrap();
        let cookie = store.get("_mfp_session").unwrap();
        assert_eq!(cookie.domain, "www.myfitnesspal.com");
        assert_eq!(cookie.path, "/food");
        assert!(cookie.secure);
    }

    #[test]
    fn test_env_json_absent_or_empty() {
        assert!(CookieStore::from_env_json(None).is_none());
        assert!(CookieStore::from_env_json(Some("")).is_none());
        assert!(CookieStore::from_env_json(Some("   ")).is_none());
        assert!(CookieStore::from_env_json(Some("{}")).is_none());
    }

    #[test]
    fn test_env_json_malformed_returns_none() {
        assert!(CookieStore::from_env_json(Some("not json")).is_none());
        assert!(CookieStore::from_env_json(Some(r#"["a", "b"]"#)).is_none());
        // One cookie without a value poisons the whole map.
        assert!(CookieStore::from_env_json(Some(r#"{"a": {"value": "x"}, "b": {}}"#)).is_none());
    }

    /// Counts WARN events seen while it is the active subscriber.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: layer::Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn warnings_while(f: impl FnOnce()) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(count.clone()));
        tracing::subscriber::with_default(subscriber, f);
        count.load(Ordering::SeqCst)
    }

    #[test]
    fn test_env_json_malformed_warns_once() {
        let warnings = warnings_while(|| {
            assert!(CookieStore::from_env_json(Some("{not json")).is_none());
        });
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_env_json_absent_is_silent() {
        let warnings = warnings_while(|| {
            assert!(CookieStore::from_env_json(None).is_none());
            assert!(CookieStore::from_env_json(Some("   ")).is_none());
            assert!(CookieStore::from_env_json(Some("{}")).is_none());
        });
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_debug_redacts_values() {
        let store = CookieStore::from_env_json(Some(r#"{"a": {"value": "secret"}}"#)).unwrap();
        let debug = format!("{:?}", store);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_export_file_round_trips_to_env_form() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "known_user", "value": "42", "domain": ".myfitnesspal.com", "path": "/", "secure": true, "httpOnly": false}}]"#
        )
        .unwrap();

        let store = CookieStore::from_export_file(file.path()).unwrap().unwrap();
        assert_eq!(store.len(), 1);

        let env = store.to_env_json();
        let reparsed = CookieStore::from_env_json(Some(&env)).unwrap();
        assert_eq!(reparsed, store);
    }

    #[test]
    fn test_export_file_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = CookieStore::from_export_file(&dir.path().join("absent.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_export_file_malformed_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{broken").unwrap();
        let err = CookieStore::from_export_file(file.path()).unwrap_err();
        assert!(matches!(err, DiaryError::CookieFile { .. }));
    }

    #[test]
    fn test_jar_sends_cookie_to_service() {
        let store = CookieStore::from_env_json(Some(r#"{"a": {"value": "x"}}"#)).unwrap();
        let jar = store.to_jar();
        let url = Url::parse("https://www.myfitnesspal.com/food/diary").unwrap();
        let header = jar.cookies(&url).unwrap();
        assert_eq!(header.to_str().unwrap(), "a=x");
    }
}
