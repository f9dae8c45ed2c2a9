use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub tls: TlsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Idle time after which a session is dropped.
    #[serde(default = "default_session_ttl_seconds")]
    pub ttl_seconds: u64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Mark the session cookie `Secure`. Always on when TLS is enabled.
    #[serde(default)]
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_auth_rpm")]
    pub auth_requests_per_minute: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

impl RateLimitConfig {
    /// Tokens allowed in a burst. Zero is treated as one.
    pub fn burst_size(&self) -> u32 {
        self.auth_requests_per_minute.max(1)
    }

    /// Milliseconds between replenished tokens, so a full minute refills
    /// the whole burst.
    pub fn replenish_interval_ms(&self) -> u64 {
        (60_000 / u64::from(self.burst_size())).max(1)
    }
}

impl TlsConfig {
    pub fn is_enabled(&self) -> bool {
        self.cert_path.is_some() && self.key_path.is_some()
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

/// One year. Longer idle timeouts are rejected at startup.
const MAX_SESSION_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

fn default_session_ttl_seconds() -> u64 { 86_400 }
fn default_cookie_name() -> String { "ticketflow_session".to_string() }
fn default_auth_rpm() -> u32 { 30 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_session_ttl_seconds(),
            cookie_name: default_cookie_name(),
            secure_cookie: false,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { auth_requests_per_minute: default_auth_rpm() }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            session: SessionConfig::default(),
            rate_limit: RateLimitConfig::default(),
            tls: TlsConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn secure_cookie(&self) -> bool {
        self.session.secure_cookie || self.tls.is_enabled()
    }

    /// Reads `TICKETFLOW_WEB_CONFIG` (if set), then applies environment
    /// overrides.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("TICKETFLOW_WEB_CONFIG")
            .map(PathBuf::from)
            .ok();

        let mut config = if let Some(path) = config_path {
            let contents = std::fs::read_to_string(&path)?;
            tracing::info!("Loaded config from {}", path.display());
            toml::from_str(&contents)?
        } else {
            ServerConfig::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(addr) = var("TICKETFLOW_BIND_ADDR") {
            self.bind_addr = addr.parse()?;
        }

        if let Some(val) = var("TICKETFLOW_SESSION_TTL_SECONDS") {
            match val.parse::<u64>() {
                Ok(ttl) => self.session.ttl_seconds = ttl,
                Err(_) => tracing::warn!("Ignoring invalid TICKETFLOW_SESSION_TTL_SECONDS: {val}"),
            }
        }

        if let Some(name) = var("TICKETFLOW_COOKIE_NAME") {
            self.session.cookie_name = name;
        }

        if let Some(cert) = var("TICKETFLOW_TLS_CERT") {
            self.tls.cert_path = Some(cert);
        }
        if let Some(key) = var("TICKETFLOW_TLS_KEY") {
            self.tls.key_path = Some(key);
        }

        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.session.ttl_seconds == 0 {
            anyhow::bail!("session.ttl_seconds must be greater than zero");
        }
        if self.session.ttl_seconds > MAX_SESSION_TTL_SECONDS {
            anyhow::bail!("session.ttl_seconds must be at most {MAX_SESSION_TTL_SECONDS}");
        }

        let name = &self.session.cookie_name;
        let valid_name = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid_name {
            anyhow::bail!("session.cookie_name {name:?} is not a valid cookie name");
        }

        if self.tls.cert_path.is_some() != self.tls.key_path.is_some() {
            tracing::warn!("Only one of tls.cert_path / tls.key_path is set; serving plain HTTP");
        }

        Ok(())
    }
}
