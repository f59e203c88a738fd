use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inbound platform endpoints exposed to the UI.
///
/// Several platforms can share one upstream provider (and one credential
/// scope): all `CometApi*` variants authenticate with the CometAPI key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "kling")]
    Kling,
    #[serde(rename = "cometapi-sora")]
    CometApiSora,
    #[serde(rename = "cometapi-nanobanana")]
    CometApiNanobanana,
    #[serde(rename = "cometapi-seedream")]
    CometApiSeedream,
    #[serde(rename = "cometapi-veo")]
    CometApiVeo,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Kling,
        Platform::CometApiSora,
        Platform::CometApiNanobanana,
        Platform::CometApiSeedream,
        Platform::CometApiVeo,
    ];

    /// Stable identifier used in usage logs.
    pub fn id(&self) -> &'static str {
        match self {
            Platform::Kling => "kling",
            Platform::CometApiSora => "cometapi-sora",
            Platform::CometApiNanobanana => "cometapi-nanobanana",
            Platform::CometApiSeedream => "cometapi-seedream",
            Platform::CometApiVeo => "cometapi-veo",
        }
    }

    /// Key-management platform whose active credential authenticates calls.
    pub fn credential_scope(&self) -> &'static str {
        match self {
            Platform::Kling => "kling",
            _ => "cometapi",
        }
    }

    /// Inbound HTTP route for this platform.
    pub fn route_path(&self) -> &'static str {
        match self {
            Platform::Kling => "/api/kling",
            Platform::CometApiSora => "/api/cometapi/sora",
            Platform::CometApiNanobanana => "/api/cometapi/nanobanana",
            Platform::CometApiSeedream => "/api/cometapi/seedream",
            Platform::CometApiVeo => "/api/cometapi/veo",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown platform '{needle}'"))
    }
}
