use serde::{Deserialize, Serialize};

/// lifecycle service configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// reject non-positive principals and investment amounts
    pub strict_amounts: bool,
    /// send agreement links to investors on full funding
    pub notify_investors: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self::permissive()
    }
}

impl LifecycleConfig {
    /// accept any amount as given, notify investors
    pub fn permissive() -> Self {
        Self {
            strict_amounts: false,
            notify_investors: true,
        }
    }

    /// require positive principals and investments, notify investors
    pub fn strict() -> Self {
        Self {
            strict_amounts: true,
            notify_investors: true,
        }
    }

    /// load from json, missing keys fall back to the permissive defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
