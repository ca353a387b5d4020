//! Named weather presets.
//!
//! A preset is a partial overwrite of [`CloudParams`]: fields left as `None`
//! keep their current value. Built-in presets are merged with user presets
//! loaded from `assets/weather/*.weather.ron`.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::params::CloudParams;

const WEATHER_DIR: &str = "assets/weather";
const WEATHER_EXT: &str = ".weather.ron";

/// Partial parameter overwrite applied as one unit.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Reflect)]
#[serde(default)]
pub struct WeatherPreset {
    pub particle_count: Option<u32>,
    pub color_top: Option<Vec3>,
    pub color_bottom: Option<Vec3>,
    pub opacity: Option<f32>,
    pub wind_speed: Option<f32>,
    pub fluffiness: Option<f32>,
    pub turbulence: Option<f32>,
    pub cloud_density: Option<f32>,
}

impl WeatherPreset {
    /// Overwrite the declared fields of `params`, leaving the rest untouched.
    pub fn apply_to(&self, params: &mut CloudParams) {
        fn put<T: Copy>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        put(&mut params.particle_count, self.particle_count);
        put(&mut params.color_top, self.color_top);
        put(&mut params.color_bottom, self.color_bottom);
        put(&mut params.opacity, self.opacity);
        put(&mut params.wind_speed, self.wind_speed);
        put(&mut params.fluffiness, self.fluffiness);
        put(&mut params.turbulence, self.turbulence);
        put(&mut params.cloud_density, self.cloud_density);
    }
}

/// Built-in presets as `(name, preset)` pairs, in display order.
pub fn default_presets() -> Vec<(&'static str, WeatherPreset)> {
    vec![
        ("Partially Cloudy", partially_cloudy()),
        ("Cloudy", cloudy()),
        ("Storm", storm()),
    ]
}

fn partially_cloudy() -> WeatherPreset {
    WeatherPreset {
        particle_count: Some(10_000),
        color_top: Some(Vec3::ONE),
        color_bottom: Some(Vec3::splat(0.87)),
        opacity: Some(0.3),
        wind_speed: Some(-0.5),
        fluffiness: Some(0.5),
        turbulence: Some(0.5),
        cloud_density: Some(0.5),
    }
}

fn cloudy() -> WeatherPreset {
    WeatherPreset {
        particle_count: Some(20_000),
        color_top: Some(Vec3::ONE),
        color_bottom: Some(Vec3::splat(0.87)),
        opacity: Some(0.5),
        wind_speed: Some(-0.3),
        fluffiness: Some(0.5),
        turbulence: Some(0.5),
        cloud_density: Some(0.7),
    }
}

/// Dark, dense and fast.
fn storm() -> WeatherPreset {
    WeatherPreset {
        particle_count: Some(30_000),
        color_top: Some(Vec3::splat(0.66)),
        color_bottom: Some(Vec3::splat(0.44)),
        opacity: Some(0.7),
        wind_speed: Some(-0.7),
        fluffiness: Some(1.0),
        turbulence: Some(0.8),
        cloud_density: Some(1.0),
    }
}

/// Presets available to the UI, in display order.
#[derive(Resource, Clone, Debug)]
pub struct WeatherLibrary {
    pub presets: Vec<(String, WeatherPreset)>,
}

impl Default for WeatherLibrary {
    fn default() -> Self {
        Self {
            presets: default_presets()
                .into_iter()
                .map(|(name, preset)| (name.to_string(), preset))
                .collect(),
        }
    }
}

impl WeatherLibrary {
    pub fn get(&self, name: &str) -> Option<&WeatherPreset> {
        self.presets
            .iter()
            .find(|(preset_name, _)| preset_name == name)
            .map(|(_, preset)| preset)
    }

    /// Add or replace a preset. Replacements keep their display slot.
    pub fn insert(&mut self, name: impl Into<String>, preset: WeatherPreset) {
        let name = name.into();
        match self.presets.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = preset,
            None => self.presets.push((name, preset)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|(name, _)| name.as_str())
    }

    /// Merge `*.weather.ron` files from `dir` over the current presets.
    ///
    /// Unreadable or malformed files are logged and skipped.
    pub fn load_dir(&mut self, dir: &Path) -> usize {
        if !dir.is_dir() {
            return 0;
        }

        let Ok(entries) = std::fs::read_dir(dir) else {
            warn!("Failed to read weather preset directory: {:?}", dir);
            return 0;
        };

        let mut paths: Vec<_> = entries.flatten().map(|entry| entry.path()).collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let fname = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            let Some(name) = fname.strip_suffix(WEATHER_EXT) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }

            let Ok(contents) = std::fs::read_to_string(&path) else {
                warn!("Failed to read weather preset file: {:?}", path);
                continue;
            };

            match ron::from_str::<WeatherPreset>(&contents) {
                Ok(preset) => {
                    self.insert(name, preset);
                    loaded += 1;
                    info!("Loaded weather preset '{}' from disk", name);
                }
                Err(e) => {
                    warn!("Failed to parse weather preset {:?}: {}", path, e);
                }
            }
        }
        loaded
    }
}

/// Populate the library from disk once at startup.
pub(crate) fn load_weather_presets(mut library: ResMut<WeatherLibrary>) {
    let loaded = library.load_dir(Path::new(WEATHER_DIR));
    debug!(
        "Weather library ready: {} presets ({} from disk)",
        library.presets.len(),
        loaded
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_in_display_order() {
        let library = WeatherLibrary::default();
        let names: Vec<_> = library.names().collect();
        assert_eq!(names, ["Partially Cloudy", "Cloudy", "Storm"]);
    }

    #[test]
    fn applying_sets_declared_fields_only() {
        let mut params = CloudParams::default();
        params.noise.octaves = 7;
        params.noise.frequency = 0.9;

        storm().apply_to(&mut params);

        assert_eq!(params.particle_count, 30_000);
        assert_eq!(params.color_top, Vec3::splat(0.66));
        assert_eq!(params.color_bottom, Vec3::splat(0.44));
        assert_eq!(params.opacity, 0.7);
        assert_eq!(params.wind_speed, -0.7);
        assert_eq!(params.fluffiness, 1.0);
        assert_eq!(params.turbulence, 0.8);
        assert_eq!(params.cloud_density, 1.0);
        // Not part of the preset.
        assert_eq!(params.noise.octaves, 7);
        assert_eq!(params.noise.frequency, 0.9);
    }

    #[test]
    fn sparse_preset_leaves_everything_else() {
        let mut params = CloudParams::default();
        let preset = WeatherPreset {
            wind_speed: Some(0.9),
            ..default()
        };
        preset.apply_to(&mut params);
        assert_eq!(
            params,
            CloudParams {
                wind_speed: 0.9,
                ..default()
            }
        );
    }

    #[test]
    fn sparse_ron_parses() {
        let preset: WeatherPreset = ron::from_str("(opacity: Some(0.2))").unwrap();
        assert_eq!(preset.opacity, Some(0.2));
        assert_eq!(preset.wind_speed, None);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut library = WeatherLibrary::default();
        library.insert("Cloudy", WeatherPreset::default());
        library.insert("Fog", WeatherPreset::default());
        let names: Vec<_> = library.names().collect();
        assert_eq!(names, ["Partially Cloudy", "Cloudy", "Storm", "Fog"]);
        assert_eq!(library.get("Cloudy"), Some(&WeatherPreset::default()));
    }

    #[test]
    fn load_dir_merges_and_skips_bad_files() {
        let dir = std::env::temp_dir().join(format!(
            "bevy_splat_clouds_presets_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Drizzle.weather.ron"), "(wind_speed: Some(-0.1))").unwrap();
        std::fs::write(dir.join("Broken.weather.ron"), "(wind_speed: ").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let mut library = WeatherLibrary::default();
        let loaded = library.load_dir(&dir);
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(library.get("Drizzle").and_then(|p| p.wind_speed), Some(-0.1));
        assert!(library.get("Broken").is_none());
    }

    #[test]
    fn missing_dir_loads_nothing() {
        let mut library = WeatherLibrary::default();
        assert_eq!(library.load_dir(Path::new("definitely/not/here")), 0);
        assert_eq!(library.presets.len(), 3);
    }
}
