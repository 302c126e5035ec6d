use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::fmt::MoneyFormat;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,
    #[serde(default = "default_group_separator")]
    pub group_separator: char,
    /// Section title for expenses that belong to no single property.
    #[serde(default = "default_general_label")]
    pub general_label: String,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_decimal_separator() -> char {
    '.'
}

fn default_group_separator() -> char {
    ','
}

fn default_general_label() -> String {
    "General".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            decimal_separator: default_decimal_separator(),
            group_separator: default_group_separator(),
            general_label: default_general_label(),
        }
    }
}

impl Settings {
    pub fn money_format(&self) -> MoneyFormat {
        MoneyFormat {
            symbol: self.currency_symbol.clone(),
            decimal_separator: self.decimal_separator,
            group_separator: self.group_separator,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("reckon")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(&path).unwrap_or_default();
    serde_json::from_str(&content).unwrap_or_else(|e| {
        log::warn!("ignoring {}: {e}", path.display());
        Settings::default()
    })
}

pub fn shellexpand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}
