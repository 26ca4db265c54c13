// Application settings: a JSON file under ./data with environment variables
// taking precedence. Presence or absence of provider credentials decides
// which providers the gateway attempts and in what order.
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};

pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_PORT: u16 = 3001;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Settings {
    pub port: u16,
    pub groq_api_key: Option<String>, // Optional API key for Groq.
    pub groq_base_url: String,
    pub groq_model: String,
    pub openai_api_key: Option<String>, // Optional API key for OpenAI.
    pub openai_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            port: DEFAULT_PORT,
            groq_api_key: None,
            groq_base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings file if present, defaults otherwise, environment on top.
    pub fn load() -> Self {
        let mut settings =
            Self::load_settings_from_file("./data/settings.json").unwrap_or_default();
        settings.apply_env();
        settings
    }

    // Save current settings to the default file path.
    pub fn save(&self) -> io::Result<()> {
        std::fs::create_dir_all("./data")?;
        self.save_to_file("./data/settings.json")
    }

    pub fn load_settings_from_file(path: &str) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    pub fn save_to_file(&self, path: &str) -> io::Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        if let Some(parent) = std::path::Path::new(path).parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Some(key) = non_empty_env("GROQ_API_KEY") {
            self.groq_api_key = Some(key);
        }
        if let Some(base_url) = non_empty_env("GROQ_BASE_URL") {
            self.groq_base_url = base_url;
        }
        if let Some(model) = non_empty_env("GROQ_MODEL") {
            self.groq_model = model;
        }
        if let Some(key) = non_empty_env("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Some(model) = non_empty_env("OPENAI_MODEL") {
            self.openai_model = model;
        }
        if let Some(port) = non_empty_env("PORT").and_then(|port| port.parse().ok()) {
            self.port = port;
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
