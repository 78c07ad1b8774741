use moovmend_core::DeviceProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub profile: DeviceProfile,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Output directory name, created next to the inputs when no explicit
    /// output path is given (default: "Repaired")
    #[serde(default = "default_dir_name")]
    pub dir_name: String,

    /// Extension of the file written before the final rename (default: "mov")
    #[serde(default = "default_temp_extension")]
    pub temp_extension: String,

    /// Rename the written file to drop its extension (default: true)
    #[serde(default = "default_strip_extension")]
    pub strip_extension: bool,
}

fn default_dir_name() -> String {
    "Repaired".to_string()
}

fn default_temp_extension() -> String {
    "mov".to_string()
}

fn default_strip_extension() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir_name: default_dir_name(),
            temp_extension: default_temp_extension(),
            strip_extension: default_strip_extension(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Only treat files with these extensions as candidates (empty = all)
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl ScanConfig {
    /// Whether `path` passes the extension filter (case-insensitive).
    pub fn accepts(&self, path: &std::path::Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}
