//! Support for library configuration options

use std::error::Error;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::theme::ThemeSetting;

/// Name of the collection tasks are stored into.
/// Feel free to override it when initing this library.
pub static COLLECTION_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("tasks".to_string())));

/// The text that is displayed when no quote could be fetched
pub const FALLBACK_QUOTE: &str = "Couldn't load a quote right now. Keep going, you've got this!";

/// The process-wide theme setting. Only [`set_theme_setting`] changes it.
static THEME_SETTING: Lazy<Mutex<ThemeSetting>> = Lazy::new(|| Mutex::new(ThemeSetting::default()));

/// The current value of [`COLLECTION_NAME`]
pub fn collection_name() -> String {
    COLLECTION_NAME.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
}

pub fn theme_setting() -> ThemeSetting {
    *THEME_SETTING.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn set_theme_setting(setting: ThemeSetting) {
    log::debug!("Theme set to {}", setting);
    *THEME_SETTING.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = setting;
}


const ENV_PREFIX: &str = "STUDY_TASKS_";

/// Everything needed to connect to the outer world
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub firestore: FirestoreSettings,
    #[serde(default)]
    pub quote: QuoteSettings,
    #[serde(default)]
    pub theme: ThemeSetting,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FirestoreSettings {
    pub project_id: String,
    pub api_key: String,
    /// Root of the REST API. Override it to use the Firestore emulator
    #[serde(default = "default_firestore_base_url")]
    pub base_url: String,
    #[serde(default = "collection_name")]
    pub collection: String,
    /// How often subscriptions re-read the collection
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteSettings {
    #[serde(default = "default_quote_endpoint")]
    pub endpoint: String,
    /// Bearer token. Quotes cannot be fetched without it
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_quote_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_firestore_base_url() -> String { "https://firestore.googleapis.com/v1".to_string() }
fn default_poll_interval_secs() -> u64    { 5 }
fn default_timeout_secs() -> u64          { 30 }
fn default_quote_endpoint() -> String     { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_quote_model() -> String        { "gpt-3.5-turbo".to_string() }
fn default_max_tokens() -> u32            { 60 }
fn default_temperature() -> f32           { 0.9 }

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            endpoint: default_quote_endpoint(),
            token: String::new(),
            model: default_quote_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FirestoreSettings {
    pub fn new<S: ToString, T: ToString>(project_id: S, api_key: T) -> Self {
        Self {
            project_id: project_id.to_string(),
            api_key: api_key.to_string(),
            base_url: default_firestore_base_url(),
            collection: collection_name(),
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl QuoteSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let file = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => file,
        };
        let settings = serde_json::from_reader(file)?;
        Ok(settings)
    }

    /// Read settings from `STUDY_TASKS_*` environment variables.
    ///
    /// `FIRESTORE_PROJECT_ID` and `FIRESTORE_API_KEY` are required. `FIRESTORE_BASE_URL`, `FIRESTORE_COLLECTION`,
    /// `FIRESTORE_POLL_INTERVAL_SECS`, `FIRESTORE_TIMEOUT_SECS`, `QUOTE_ENDPOINT`, `QUOTE_TOKEN`, `QUOTE_MODEL`,
    /// `QUOTE_MAX_TOKENS`, `QUOTE_TEMPERATURE`, `QUOTE_TIMEOUT_SECS` and `THEME` are optional.
    pub fn from_env() -> Result<Self, Box<dyn Error>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings from any key/value source, keys being the names of the environment variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name)).filter(|v| v.is_empty() == false);
        let required = |name: &str| var(name).ok_or_else(|| format!("Missing environment variable {}{}", ENV_PREFIX, name));

        let mut firestore = FirestoreSettings::new(required("FIRESTORE_PROJECT_ID")?, required("FIRESTORE_API_KEY")?);
        if let Some(base_url) = var("FIRESTORE_BASE_URL") { firestore.base_url = base_url; }
        if let Some(collection) = var("FIRESTORE_COLLECTION") { firestore.collection = collection; }
        if let Some(secs) = parse_var::<u64>("FIRESTORE_POLL_INTERVAL_SECS", var("FIRESTORE_POLL_INTERVAL_SECS"))? {
            firestore.poll_interval_secs = secs;
        }
        if let Some(secs) = parse_var::<u64>("FIRESTORE_TIMEOUT_SECS", var("FIRESTORE_TIMEOUT_SECS"))? {
            firestore.timeout_secs = secs;
        }

        let mut quote = QuoteSettings::default();
        if let Some(endpoint) = var("QUOTE_ENDPOINT") { quote.endpoint = endpoint; }
        if let Some(token) = var("QUOTE_TOKEN") { quote.token = token; }
        if let Some(model) = var("QUOTE_MODEL") { quote.model = model; }
        if let Some(n) = parse_var::<u32>("QUOTE_MAX_TOKENS", var("QUOTE_MAX_TOKENS"))? {
            quote.max_tokens = n;
        }
        if let Some(t) = parse_var::<f32>("QUOTE_TEMPERATURE", var("QUOTE_TEMPERATURE"))? {
            quote.temperature = t;
        }
        if let Some(secs) = parse_var::<u64>("QUOTE_TIMEOUT_SECS", var("QUOTE_TIMEOUT_SECS"))? {
            quote.timeout_secs = secs;
        }

        let theme = match var("THEME") {
            None => ThemeSetting::default(),
            Some(t) => t.parse()?,
        };

        Ok(Self { firestore, quote, theme })
    }
}


fn parse_var<T>(name: &str, value: Option<String>) -> Result<Option<T>, Box<dyn Error>>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        None => Ok(None),
        Some(v) => v.trim().parse()
            .map(Some)
            .map_err(|err| format!("Invalid value {:?} for {}{}: {}", v, ENV_PREFIX, name, err).into()),
    }
}
