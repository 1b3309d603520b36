use std::{env, net::SocketAddr, path::Path, str::FromStr};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::wallet::Network;

/// Where page content is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// The built-in seed (or a YAML file of the same shape).
    #[default]
    Mock,
    /// A `PostgreSQL` database reached through `database_url`.
    Postgres,
}

impl FromStr for DataSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(ConfigError::InvalidValue {
                key: "data_source",
                value: other.to_string(),
            }),
        }
    }
}

/// Wallet capability settings.
///
/// The wallet subsystem exists only when `enabled` is set and a project id
/// is available. It is only ever offered on the community page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Turns the wallet capability on.
    #[serde(default)]
    pub enabled: bool,

    /// Project id issued by the wallet-connection provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Networks offered to the connecting wallet. The first one is the
    /// default network.
    #[serde(default = "default_networks")]
    pub networks: Vec<Network>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            project_id: None,
            networks: default_networks(),
        }
    }
}

/// Site configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Absolute base URL used for canonical links, sitemap entries and
    /// structured data, without a trailing slash.
    site_url: String,

    /// Address the HTTP server binds to.
    pub bind: SocketAddr,

    /// Where content comes from.
    pub data_source: DataSource,

    /// Connection string for the postgres data source.
    pub database_url: Option<String>,

    /// Optional YAML file replacing the built-in mock content.
    pub mock_data: Option<String>,

    /// Time zone dates are displayed in.
    timezone: Tz,

    /// Number of upcoming events on the homepage.
    pub upcoming_limit: u32,

    /// Number of articles on the homepage.
    pub latest_news_limit: u32,

    /// Number of articles on the news index.
    pub news_page_limit: u32,

    /// Bearer token protecting the admin API. The API is not mounted when
    /// this is unset.
    pub admin_token: Option<String>,

    /// Wallet capability.
    pub wallet: WalletConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: default_site_url(),
            bind: default_bind(),
            data_source: DataSource::default(),
            database_url: None,
            mock_data: None,
            timezone: default_timezone(),
            upcoming_limit: default_upcoming_limit(),
            latest_news_limit: default_latest_news_limit(),
            news_page_limit: default_news_page_limit(),
            admin_token: None,
            wallet: WalletConfig::default(),
        }
    }
}

/// Errors raised while loading, saving or overriding configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),

    /// The file is not valid TOML for this configuration.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialised.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file could not be written.
    #[error("Failed to write config file: {0}")]
    Write(#[source] std::io::Error),

    /// An environment override holds an unusable value.
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue {
        /// Setting that was overridden.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads the configuration if the file exists, otherwise returns the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// Applies overrides from the process environment.
    ///
    /// `DATABASE_URL` also switches the data source to postgres unless
    /// `MMABOX_DATA_SOURCE` says otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be parsed.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = Some(url);
            self.data_source = DataSource::Postgres;
        }
        if let Some(source) = lookup("MMABOX_DATA_SOURCE") {
            self.data_source = source.parse()?;
        }
        if let Some(bind) = lookup("MMABOX_BIND") {
            self.bind = bind.parse().map_err(|_| ConfigError::InvalidValue {
                key: "bind",
                value: bind,
            })?;
        }
        if let Some(token) = lookup("MMABOX_ADMIN_TOKEN") {
            self.admin_token = Some(token);
        }
        if let Some(project_id) = lookup("WALLET_PROJECT_ID") {
            self.wallet.project_id = Some(project_id);
        }
        Ok(())
    }

    /// Returns the site URL without a trailing slash.
    #[must_use]
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Sets the site URL. Trailing slashes are removed.
    pub fn set_site_url(&mut self, url: &str) {
        self.site_url = url.trim_end_matches('/').to_string();
    }

    /// Builds an absolute URL for a site path such as `/events/1`.
    #[must_use]
    pub fn absolute_url(&self, path: &str) -> String {
        if path == "/" || path.is_empty() {
            self.site_url.clone()
        } else {
            format!("{}{path}", self.site_url)
        }
    }

    /// Returns the display time zone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }
}

fn default_site_url() -> String {
    "https://www.mma.box".to_string()
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

const fn default_timezone() -> Tz {
    chrono_tz::America::New_York
}

const fn default_upcoming_limit() -> u32 {
    5
}

const fn default_latest_news_limit() -> u32 {
    4
}

const fn default_news_page_limit() -> u32 {
    10
}

fn default_networks() -> Vec<Network> {
    vec![Network::Mainnet, Network::Arbitrum]
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_site_url")]
        site_url: String,

        #[serde(default = "default_bind")]
        bind: SocketAddr,

        #[serde(default)]
        data_source: DataSource,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        database_url: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        mock_data: Option<String>,

        /// IANA name, e.g. `America/New_York`.
        #[serde(default = "default_timezone")]
        timezone: Tz,

        #[serde(default = "default_upcoming_limit")]
        upcoming_limit: u32,

        #[serde(default = "default_latest_news_limit")]
        latest_news_limit: u32,

        #[serde(default = "default_news_page_limit")]
        news_page_limit: u32,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        admin_token: Option<String>,

        #[serde(default)]
        wallet: WalletConfig,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                site_url,
                bind,
                data_source,
                database_url,
                mock_data,
                timezone,
                upcoming_limit,
                latest_news_limit,
                news_page_limit,
                admin_token,
                wallet,
            } => Self {
                site_url: site_url.trim_end_matches('/').to_string(),
                bind,
                data_source,
                database_url,
                mock_data,
                timezone,
                upcoming_limit,
                latest_news_limit,
                news_page_limit,
                admin_token,
                wallet,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            site_url: config.site_url,
            bind: config.bind,
            data_source: config.data_source,
            database_url: config.database_url,
            mock_data: config.mock_data,
            timezone: config.timezone,
            upcoming_limit: config.upcoming_limit,
            latest_news_limit: config.latest_news_limit,
            news_page_limit: config.news_page_limit,
            admin_token: config.admin_token,
            wallet: config.wallet,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nsite_url = \"https://example.test/\"\ndata_source = \"postgres\"\ndatabase_url = \"postgres://localhost/mma\"\ntimezone = \"Europe/London\"\nupcoming_limit = 3\n\n[wallet]\nenabled = true\nproject_id = \"abc\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.site_url(), "https://example.test");
        assert_eq!(config.data_source, DataSource::Postgres);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/mma")
        );
        assert_eq!(config.timezone(), chrono_tz::Europe::London);
        assert_eq!(config.upcoming_limit, 3);
        assert_eq!(config.latest_news_limit, 4);
        assert!(config.wallet.enabled);
        assert_eq!(config.wallet.networks, vec![Network::Mainnet, Network::Arbitrum]);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.to_string().starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&tmp.path().join("mmabox.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nupcoming_limit = \"five\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.to_string().starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn saved_file_loads_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("mmabox.toml");
        let mut config = Config::default();
        config.admin_token = Some("secret".to_string());

        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn database_url_switches_to_postgres() {
        let vars: HashMap<&str, &str> = [("DATABASE_URL", "postgres://db/mma")].into();
        let mut config = Config::default();

        config
            .apply_overrides(|key| vars.get(key).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.data_source, DataSource::Postgres);
        assert_eq!(config.database_url.as_deref(), Some("postgres://db/mma"));
    }

    #[test]
    fn explicit_data_source_wins_over_database_url() {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://db/mma"),
            ("MMABOX_DATA_SOURCE", "mock"),
        ]
        .into();
        let mut config = Config::default();

        config
            .apply_overrides(|key| vars.get(key).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.data_source, DataSource::Mock);
    }

    #[test]
    fn invalid_bind_override_is_rejected() {
        let mut config = Config::default();
        let error = config
            .apply_overrides(|key| (key == "MMABOX_BIND").then(|| "nowhere".to_string()))
            .unwrap_err();
        assert!(matches!(error, ConfigError::InvalidValue { key: "bind", .. }));
    }

    #[test]
    fn absolute_url_joins_paths() {
        let config = Config::default();
        assert_eq!(config.absolute_url("/"), "https://www.mma.box");
        assert_eq!(config.absolute_url("/events/1"), "https://www.mma.box/events/1");
    }
}
