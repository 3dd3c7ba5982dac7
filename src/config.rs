use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "AudioConfig::default_latency_ms")]
    pub latency_ms: f32,
    #[serde(default = "AudioConfig::default_master_gain")]
    pub master_gain: f32,
    #[serde(default)]
    pub output_guard: OutputGuardSetting,
}

impl AudioConfig {
    fn default_latency_ms() -> f32 {
        50.0
    }
    fn default_master_gain() -> f32 {
        0.125
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            latency_ms: Self::default_latency_ms(),
            master_gain: Self::default_master_gain(),
            output_guard: OutputGuardSetting::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputGuardSetting {
    None,
    SoftClip,
}

impl Default for OutputGuardSetting {
    fn default() -> Self {
        Self::SoftClip
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Number of live curves. Must fit within twice the palette size;
    /// the population build rejects anything larger.
    #[serde(default = "SceneConfig::default_population_size")]
    pub population_size: usize,
    /// Glyph draw size in points.
    #[serde(default = "SceneConfig::default_glyph_size")]
    pub glyph_size: f32,
}

impl SceneConfig {
    fn default_population_size() -> usize {
        15
    }
    fn default_glyph_size() -> f32 {
        30.0
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            population_size: Self::default_population_size(),
            glyph_size: Self::default_glyph_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

impl AppConfig {
    /// Read the config at `path`, or write a fully commented default
    /// file there and return the defaults.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        eprintln!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    eprintln!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write commented defaults and return them.
        let default_cfg = Self::default();
        if let Ok(text) = toml::to_string_pretty(&default_cfg) {
            let mut commented = String::new();
            for line in text.lines() {
                let trimmed = line.trim();
                if trimmed.is_empty() || (trimmed.starts_with('[') && trimmed.ends_with(']')) {
                    commented.push_str(line);
                } else {
                    commented.push_str("# ");
                    commented.push_str(line);
                }
                commented.push('\n');
            }
            if let Err(err) = fs::write(path_obj, commented) {
                eprintln!("Failed to write default config to {path}: {err}");
            }
        } else {
            eprintln!("Failed to serialize default config; continuing with defaults");
        }
        default_cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn unique_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "glyphtrail_config_test_{}_{}",
            name,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        p
    }

    #[test]
    fn load_or_default_writes_defaults_cleanly() {
        let path = unique_path("defaults.toml");
        let path_str = path.to_string_lossy().to_string();
        let _ = fs::remove_file(&path);

        let cfg = AppConfig::load_or_default(&path_str);
        assert!(path.exists(), "config file should be created");
        assert_eq!(cfg.audio.latency_ms, 50.0);
        assert_eq!(cfg.audio.output_guard, OutputGuardSetting::SoftClip);
        assert_eq!(cfg.scene.population_size, 15);
        assert_eq!(cfg.scene.glyph_size, 30.0);

        let contents = fs::read_to_string(&path).expect("read written config");
        assert!(contents.contains("[scene]"));
        assert!(
            contents.contains("# population_size = 15"),
            "should write commented population_size"
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_or_default_reads_existing() {
        let path = unique_path("custom.toml");
        let path_str = path.to_string_lossy().to_string();
        let custom = AppConfig {
            audio: AudioConfig {
                latency_ms: 75.0,
                master_gain: 0.25,
                output_guard: OutputGuardSetting::None,
            },
            scene: SceneConfig {
                population_size: 12,
                glyph_size: 24.0,
            },
        };
        let text = toml::to_string_pretty(&custom).unwrap();
        fs::write(&path, text).unwrap();

        let cfg = AppConfig::load_or_default(&path_str);
        assert_eq!(cfg.audio.latency_ms, 75.0);
        assert_eq!(cfg.audio.master_gain, 0.25);
        assert_eq!(cfg.audio.output_guard, OutputGuardSetting::None);
        assert_eq!(cfg.scene.population_size, 12);
        assert_eq!(cfg.scene.glyph_size, 24.0);

        let _ = fs::remove_file(&path);
    }
}
