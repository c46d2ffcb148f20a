use serde::{Deserialize, Serialize};

/// Steam account to friend-group member mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserMapping {
    pub steam_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

impl UserMapping {
    pub fn display_name(&self) -> &str {
        match self.nickname.as_deref() {
            Some(nick) if !nick.trim().is_empty() => nick,
            _ => &self.username,
        }
    }

    /// Label used by the mapping picker: `"{nickname or username} ({steamId})"`.
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.display_name(), self.steam_id)
    }
}

/// Value of the `get-usernames` lookup, keyed by steam id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Username {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

impl Username {
    pub fn display_name(&self) -> &str {
        match self.nickname.as_deref() {
            Some(nick) if !nick.trim().is_empty() => nick,
            _ => &self.username,
        }
    }
}

/// Add-or-update form contents as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MappingForm {
    pub steam_id: String,
    pub username: String,
    pub nickname: String,
}

impl MappingForm {
    pub fn from_mapping(mapping: &UserMapping) -> Self {
        Self {
            steam_id: mapping.steam_id.clone(),
            username: mapping.username.clone(),
            nickname: mapping.nickname.clone().unwrap_or_default(),
        }
    }

    /// Builds the request body; a blank nickname is sent as null.
    pub fn to_mapping(&self) -> Result<UserMapping, &'static str> {
        let steam_id = self.steam_id.trim();
        let username = self.username.trim();
        if steam_id.is_empty() {
            return Err("Steam ID is required");
        }
        if username.is_empty() {
            return Err("Username is required");
        }
        let nickname = self.nickname.trim();
        Ok(UserMapping {
            steam_id: steam_id.to_string(),
            username: username.to_string(),
            nickname: (!nickname.is_empty()).then(|| nickname.to_string()),
        })
    }
}

/// Splits a comma or whitespace separated id list, keeping only tokens that
/// are plain unsigned integers. Malformed entries are dropped, not reported.
pub fn parse_steam_ids(raw: &str) -> Vec<String> {
    split_ids(raw)
        .filter(|token| token.chars().all(|c| c.is_ascii_digit()))
        .map(ToOwned::to_owned)
        .collect()
}

pub fn parse_app_ids(raw: &str) -> Vec<u32> {
    split_ids(raw)
        .filter_map(|token| token.parse::<u32>().ok())
        .collect()
}

fn split_ids(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
