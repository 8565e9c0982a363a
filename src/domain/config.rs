use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for a catalog.
///
/// This struct controls where the backing files of a catalog live, relative
/// to the catalog root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The directory holding the backing files, relative to the root.
    data_dir: PathBuf,

    /// The file holding library records.
    pub libraries_file: String,

    /// The file holding item records.
    pub items_file: String,

    /// The file holding member records.
    pub members_file: String,

    /// The file holding borrowing records.
    pub borrowings_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            libraries_file: default_libraries_file(),
            items_file: default_items_file(),
            members_file: default_members_file(),
            borrowings_file: default_borrowings_file(),
        }
    }
}

impl Config {
    /// The name of the configuration file in the catalog root.
    pub const FILE_NAME: &'static str = "catalog.toml";

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
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the data directory, relative to the catalog root.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_libraries_file() -> String {
    "library.txt".to_string()
}

fn default_items_file() -> String {
    "items.txt".to_string()
}

fn default_members_file() -> String {
    "members.txt".to_string()
}

fn default_borrowings_file() -> String {
    "borrowing.txt".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_data_dir")]
        data_dir: PathBuf,

        #[serde(default = "default_libraries_file")]
        libraries_file: String,

        #[serde(default = "default_items_file")]
        items_file: String,

        #[serde(default = "default_members_file")]
        members_file: String,

        #[serde(default = "default_borrowings_file")]
        borrowings_file: String,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                data_dir,
                libraries_file,
                items_file,
                members_file,
                borrowings_file,
            } => Self {
                data_dir,
                libraries_file,
                items_file,
                members_file,
                borrowings_file,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            data_dir: config.data_dir,
            libraries_file: config.libraries_file,
            items_file: config.items_file,
            members_file: config.members_file,
            borrowings_file: config.borrowings_file,
        }
    }
}
