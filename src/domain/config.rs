use std::path::Path;

use serde::{Deserialize, Serialize};

/// Page chrome configuration.
///
/// Controls the fixed head and navigation markup wrapped around the
/// converted catalog. The defaults reproduce the published Plotto page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The document title.
    title: String,

    /// The navbar brand text.
    brand: String,

    /// Where the brand link points.
    brand_href: String,

    /// Stylesheet hrefs linked from the page head, in order.
    stylesheets: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: default_title(),
            brand: default_brand(),
            brand_href: default_brand_href(),
            stylesheets: default_stylesheets(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or
    /// if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the document title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the navbar brand text.
    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Returns the brand link target.
    #[must_use]
    pub fn brand_href(&self) -> &str {
        &self.brand_href
    }

    /// Returns the stylesheet hrefs in link order.
    #[must_use]
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }
}

fn default_title() -> String {
    "Plotto".to_string()
}

fn default_brand() -> String {
    "Plotto - A New Method of Plot Suggestion for Writers of Creative Fiction".to_string()
}

fn default_brand_href() -> String {
    "./plotto.html".to_string()
}

fn default_stylesheets() -> Vec<String> {
    vec![
        "https://maxcdn.bootstrapcdn.com/bootstrap/3.3.6/css/bootstrap.min.css".to_string(),
        "plotto.css".to_string(),
        "https://fonts.googleapis.com/css?family=Old+Standard+TT:400,400italic,700".to_string(),
    ]
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the
/// domain type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_title")]
        title: String,

        #[serde(default = "default_brand")]
        brand: String,

        #[serde(default = "default_brand_href")]
        brand_href: String,

        #[serde(default = "default_stylesheets")]
        stylesheets: Vec<String>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                title,
                brand,
                brand_href,
                stylesheets,
            } => Self {
                title,
                brand,
                brand_href,
                stylesheets,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            title: config.title,
            brand: config.brand,
            brand_href: config.brand_href,
            stylesheets: config.stylesheets,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\ntitle = \"My Catalog\"\nbrand = \"My Catalog of Conflicts\"\nstylesheets = [\"local.css\"]\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.title(), "My Catalog");
        assert_eq!(config.brand(), "My Catalog of Conflicts");
        assert_eq!(config.brand_href(), "./plotto.html");
        assert_eq!(config.stylesheets(), &["local.css".to_string()]);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nstylesheets = \"not-a-list\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        // Deserialising a bare version header yields the default chrome.
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("plotto.toml");

        let config = Config::default();
        config.save(&path).unwrap();
        let reloaded = Config::load(&path).unwrap();

        assert_eq!(reloaded, config);
    }
}
