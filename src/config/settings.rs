use config::{Config, ConfigBuilder, ConfigError, Environment, builder::DefaultState};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_MP_API_BASE_URL: &str = "https://api.mercadopago.com";

#[derive(Clone, Deserialize)]
pub struct Settings {
    pub mp_access_token: String,
    pub mp_api_base_url: String,
    pub app_base_url: String,
    pub host: String,
    pub port: u16,
    pub gateway_timeout_secs: u64,
    pub campaign_reference: String,
    pub campaign_description: String,
    pub athlete_name: String,
    pub donation_totals_enabled: bool,
    pub school_name: Option<String>,
    pub school_url: Option<String>,
    pub contact_whatsapp_url: Option<String>,
    pub contact_instagram_url: Option<String>,
    pub contact_email: Option<String>,
}

impl Settings {
    /// Reads `.env` (when present) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Self::build(
            Self::defaults()?.add_source(Environment::default().try_parsing(true)),
        )
    }

    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("mp_api_base_url", DEFAULT_MP_API_BASE_URL)?
            .set_default("app_base_url", "http://localhost:3000")?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3000)?
            .set_default("gateway_timeout_secs", 15)?
            .set_default("campaign_reference", "doacao-atleta-123")?
            .set_default("campaign_description", "Doação para a campanha do atleta")?
            .set_default("athlete_name", "Denner")?
            .set_default("donation_totals_enabled", false)
    }

    pub fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;

        if settings.mp_access_token.trim().is_empty() {
            return Err(ConfigError::Message("MP_ACCESS_TOKEN must not be empty".to_string()));
        }

        Ok(Settings {
            mp_api_base_url: settings.mp_api_base_url.trim_end_matches('/').to_string(),
            app_base_url: settings.app_base_url.trim_end_matches('/').to_string(),
            school_name: non_blank(settings.school_name),
            school_url: non_blank(settings.school_url),
            contact_whatsapp_url: non_blank(settings.contact_whatsapp_url),
            contact_instagram_url: non_blank(settings.contact_instagram_url),
            contact_email: non_blank(settings.contact_email),
            ..settings
        })
    }

    pub fn has_contacts(&self) -> bool {
        self.contact_whatsapp_url.is_some()
            || self.contact_instagram_url.is_some()
            || self.contact_email.is_some()
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }

    pub fn back_url(&self, page: &str) -> String {
        format!("{}/{}", self.app_base_url, page)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("mp_access_token", &"<redacted>")
            .field("mp_api_base_url", &self.mp_api_base_url)
            .field("app_base_url", &self.app_base_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("gateway_timeout_secs", &self.gateway_timeout_secs)
            .field("campaign_reference", &self.campaign_reference)
            .field("campaign_description", &self.campaign_description)
            .field("athlete_name", &self.athlete_name)
            .field("donation_totals_enabled", &self.donation_totals_enabled)
            .field("school_name", &self.school_name)
            .field("school_url", &self.school_url)
            .field("contact_whatsapp_url", &self.contact_whatsapp_url)
            .field("contact_instagram_url", &self.contact_instagram_url)
            .field("contact_email", &self.contact_email)
            .finish()
    }
}

/// `KEY=` in `.env` means "not set".
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
