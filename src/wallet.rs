//! Optional wallet connectivity for the community page.
//!
//! The capability is decided once at startup from [`WalletConfig`]. When it
//! is on, the server emits a bootstrap document that the wallet SDK reads on
//! the community page. Nothing else on the site depends on it.

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::domain::WalletConfig;

/// Path of the only page that offers a wallet connection.
pub const COMMUNITY_PATH: &str = "/community";

/// A chain the wallet may connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Ethereum mainnet.
    Mainnet,
    /// Arbitrum One.
    Arbitrum,
}

impl Network {
    /// EIP-155 chain id.
    #[must_use]
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Arbitrum => 42_161,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "Ethereum",
            Self::Arbitrum => "Arbitrum One",
        }
    }
}

/// Reasons a string is not a wallet address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The `0x` prefix is missing.
    #[error("address must start with 0x")]
    MissingPrefix,

    /// Wrong number of hex digits after the prefix.
    #[error("address must have 40 hex digits, found {0}")]
    Length(usize),

    /// A character after the prefix is not a hex digit.
    #[error("address contains a non-hex character '{0}'")]
    NotHex(char),
}

/// A 20-byte account address in `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix("0x")
            .or_else(|| s.trim().strip_prefix("0X"))
            .ok_or(AddressError::MissingPrefix)?;
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(AddressError::NotHex(bad));
        }
        if digits.len() != 40 {
            return Err(AddressError::Length(digits.len()));
        }
        Ok(Self(format!("0x{digits}")))
    }
}

impl Address {
    /// The full address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form, e.g. `0x1234…abcd`.
    #[must_use]
    pub fn short(&self) -> String {
        format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A connected account as shown in the page header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// The account address.
    pub address: Address,
    /// Reverse-resolved ENS name, if any.
    pub ens_name: Option<String>,
}

impl Account {
    /// The ENS name when known, otherwise the shortened address.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.ens_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| self.address.short(), ToString::to_string)
    }
}

/// Site details shown by the wallet during connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppMetadata {
    /// Site name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Site URL.
    pub url: String,
    /// Icon paths.
    pub icons: Vec<&'static str>,
}

/// A network as listed in the bootstrap document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    /// Config name.
    pub id: Network,
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Display name.
    pub name: &'static str,
}

impl From<Network> for NetworkInfo {
    fn from(network: Network) -> Self {
        Self {
            id: network,
            chain_id: network.chain_id(),
            name: network.name(),
        }
    }
}

/// Configuration handed to the wallet SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bootstrap {
    /// Provider project id.
    pub project_id: String,
    /// Offered networks.
    pub networks: Vec<NetworkInfo>,
    /// Network selected initially.
    pub default_network: NetworkInfo,
    /// Site details.
    pub metadata: AppMetadata,
}

/// Wallet capability, chosen once at startup.
pub trait WalletConnector: Send + Sync + fmt::Debug {
    /// Whether a wallet can be connected at all.
    fn is_enabled(&self) -> bool;

    /// The bootstrap document for `path`, or `None` where the wallet is not
    /// offered.
    fn bootstrap(&self, path: &str) -> Option<Bootstrap>;
}

/// The capability when it is turned off.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

impl WalletConnector for Disabled {
    fn is_enabled(&self) -> bool {
        false
    }

    fn bootstrap(&self, _path: &str) -> Option<Bootstrap> {
        None
    }
}

/// Wallet connection through a hosted connection kit.
#[derive(Debug, Clone)]
pub struct ConnectionKit {
    project_id: String,
    networks: Vec<Network>,
    site_url: String,
}

impl ConnectionKit {
    /// Creates the connector. `networks` must not be empty.
    #[must_use]
    pub fn new(project_id: String, networks: Vec<Network>, site_url: &str) -> Option<Self> {
        (!networks.is_empty()).then(|| Self {
            project_id,
            networks,
            site_url: site_url.to_string(),
        })
    }
}

impl WalletConnector for ConnectionKit {
    fn is_enabled(&self) -> bool {
        true
    }

    fn bootstrap(&self, path: &str) -> Option<Bootstrap> {
        if !path.starts_with(COMMUNITY_PATH) {
            return None;
        }
        let networks: Vec<NetworkInfo> = self.networks.iter().copied().map(Into::into).collect();
        Some(Bootstrap {
            project_id: self.project_id.clone(),
            default_network: *networks.first()?,
            networks,
            metadata: AppMetadata {
                name: "mma.box",
                description: "The ultimate MMA fan website",
                url: self.site_url.clone(),
                icons: vec!["/favicon-32x32.png"],
            },
        })
    }
}

/// Builds the wallet capability from configuration.
///
/// An enabled wallet without a project id or networks falls back to
/// [`Disabled`] with a warning.
#[must_use]
pub fn from_config(config: &WalletConfig, site_url: &str) -> Arc<dyn WalletConnector> {
    if !config.enabled {
        return Arc::new(Disabled);
    }
    let Some(project_id) = config.project_id.clone().filter(|id| !id.trim().is_empty()) else {
        tracing::warn!("Wallet is enabled but no project id is configured; wallet disabled");
        return Arc::new(Disabled);
    };
    match ConnectionKit::new(project_id, config.networks.clone(), site_url) {
        Some(kit) => Arc::new(kit),
        None => {
            tracing::warn!("Wallet is enabled but no networks are configured; wallet disabled");
            Arc::new(Disabled)
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    const ADDRESS: &str = "0x1234567890abcdef1234567890abcdef1234abcd";

    #[test]
    fn shortens_addresses() {
        let address: Address = ADDRESS.parse().unwrap();
        assert_eq!(address.short(), "0x1234…abcd");
    }

    #[test_case("1234567890abcdef1234567890abcdef1234abcd", AddressError::MissingPrefix; "no prefix")]
    #[test_case("0x1234", AddressError::Length(4); "too short")]
    #[test_case("0x1234567890abcdef1234567890abcdef1234abcz", AddressError::NotHex('z'); "not hex")]
    fn rejects_malformed_addresses(input: &str, expected: AddressError) {
        assert_eq!(input.parse::<Address>(), Err(expected));
    }

    #[test]
    fn ens_name_is_preferred() {
        let mut account = Account {
            address: ADDRESS.parse().unwrap(),
            ens_name: Some("fightfan.eth".to_string()),
        };
        assert_eq!(account.display_name(), "fightfan.eth");

        account.ens_name = Some(String::new());
        assert_eq!(account.display_name(), "0x1234…abcd");
    }

    #[test]
    fn disabled_by_default() {
        let wallet = from_config(&WalletConfig::default(), "https://www.mma.box");
        assert!(!wallet.is_enabled());
        assert_eq!(wallet.bootstrap(COMMUNITY_PATH), None);
    }

    #[test]
    fn enabled_without_project_id_stays_disabled() {
        let config = WalletConfig {
            enabled: true,
            ..WalletConfig::default()
        };
        assert!(!from_config(&config, "https://www.mma.box").is_enabled());
    }

    #[test]
    fn bootstrap_only_on_community_page() {
        let config = WalletConfig {
            enabled: true,
            project_id: Some("project".to_string()),
            ..WalletConfig::default()
        };
        let wallet = from_config(&config, "https://www.mma.box");

        assert!(wallet.bootstrap("/events").is_none());

        let bootstrap = wallet.bootstrap(COMMUNITY_PATH).unwrap();
        assert_eq!(bootstrap.default_network.chain_id, 1);
        assert_eq!(
            bootstrap
                .networks
                .iter()
                .map(|n| n.chain_id)
                .collect::<Vec<_>>(),
            [1, 42_161]
        );
        assert_eq!(
            serde_json::to_value(&bootstrap).unwrap()["networks"][1]["id"],
            "arbitrum"
        );
    }
}
