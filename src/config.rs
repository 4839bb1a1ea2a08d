use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::*;
use crate::error::{SwitcherError, SwitcherResult};

/// Where the rotated images come from.
///
/// In JSON a template is written as `["bg.jpg", 1, 3]`; any other array must hold only strings.
/// Template counters may be integral floats (`1.0`), and elements after the third are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ImageSource {
    /// Base URL plus an inclusive counter range, expanded by [`crate::sequence`].
    Template(String, i64, i64),
    List(Vec<String>),
}

impl ImageSource {
    pub fn list<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(urls.into_iter().map(Into::into).collect())
    }

    pub fn template(base: impl Into<String>, min: i64, max: i64) -> Self {
        Self::Template(base.into(), min, max)
    }

    /// Lists the images of a directory, sorted by file name.
    pub fn from_dir(dir_path: &Path) -> SwitcherResult<Self> {
        let mut paths: Vec<PathBuf> = Vec::new();
        let entries = fs::read_dir(dir_path).map_err(|e| {
            SwitcherError::configuration(format!(
                "failed to read directory {}: {e}",
                dir_path.display()
            ))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                SwitcherError::configuration(format!("failed to read directory entry: {e}"))
            })?;
            let path = entry.path();
            if path.is_file() {
                if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
                    match ext.to_lowercase().as_str() {
                        "png" | "jpg" | "jpeg" | "bmp" | "gif" => paths.push(path),
                        _ => {}
                    }
                }
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        if paths.is_empty() {
            return Err(SwitcherError::configuration(format!(
                "no image files found in directory {}",
                dir_path.display()
            )));
        }
        Ok(Self::List(
            paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        ))
    }
}

impl<'de> Deserialize<'de> for ImageSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<Value>::deserialize(deserializer)?;
        if let [Value::String(base), min @ Value::Number(_), max @ Value::Number(_), ..] =
            items.as_slice()
        {
            return Ok(Self::Template(base.clone(), counter(min)?, counter(max)?));
        }

        items
            .into_iter()
            .map(|item| match item {
                Value::String(url) => Ok(url),
                other => Err(de::Error::custom(format!(
                    "image URLs must be strings, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>, D::Error>>()
            .map(Self::List)
    }
}

fn counter<E: de::Error>(value: &Value) -> Result<i64, E> {
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(n) if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 => Ok(n as i64),
        _ => Err(E::custom(format!(
            "template counter must be an integer, got {value}"
        ))),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    pub images: Option<ImageSource>,
    #[serde(with = "millis")]
    pub interval: Duration,
    pub auto_start: bool,
    #[serde(with = "millis")]
    pub fade_speed: Duration,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub random: bool,
    pub resize: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            images: None,
            interval: DEFAULT_INTERVAL,
            auto_start: true,
            fade_speed: DEFAULT_FADE_SPEED,
            looping: true,
            random: false,
            resize: false,
        }
    }
}

impl Configuration {
    pub fn new(images: ImageSource) -> Self {
        Self {
            images: Some(images),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> SwitcherResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SwitcherError::configuration(format!("invalid configuration JSON: {e}")))
    }

    pub fn from_json_file(path: &Path) -> SwitcherResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            SwitcherError::configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn fade_enabled(&self) -> bool {
        !self.fade_speed.is_zero()
    }

    pub fn validate(&self) -> SwitcherResult<()> {
        if self.interval.is_zero() {
            return Err(SwitcherError::configuration("interval must be positive"));
        }
        Ok(())
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Configuration::default();
        assert_eq!(config.images, None);
        assert_eq!(config.interval, Duration::from_millis(5000));
        assert!(config.auto_start);
        assert_eq!(config.fade_speed, Duration::from_millis(1000));
        assert!(config.looping);
        assert!(!config.random);
        assert!(!config.resize);
    }

    #[test]
    fn json_uses_camel_case_and_milliseconds() {
        let config = Configuration::from_json(
            r#"{"images": ["a.png", "b.png"], "interval": 250, "autoStart": false,
                "fadeSpeed": 0, "loop": false, "random": true}"#,
        )
        .unwrap();
        assert_eq!(config.images, Some(ImageSource::list(["a.png", "b.png"])));
        assert_eq!(config.interval, Duration::from_millis(250));
        assert!(!config.auto_start);
        assert!(!config.fade_enabled());
        assert!(!config.looping);
        assert!(config.random);
        assert!(!config.resize);
    }

    #[test]
    fn json_template_triple_is_recognised() {
        let config = Configuration::from_json(r#"{"images": ["bg.jpg", 1, 3]}"#).unwrap();
        assert_eq!(config.images, Some(ImageSource::template("bg.jpg", 1, 3)));
    }

    #[test]
    fn template_counters_accept_integral_floats() {
        let config = Configuration::from_json(r#"{"images": ["bg.jpg", 1.0, 3.0]}"#).unwrap();
        assert_eq!(config.images, Some(ImageSource::template("bg.jpg", 1, 3)));
    }

    #[test]
    fn template_ignores_elements_after_the_third() {
        let config = Configuration::from_json(r#"{"images": ["bg.jpg", 1, 3, "x"]}"#).unwrap();
        assert_eq!(config.images, Some(ImageSource::template("bg.jpg", 1, 3)));
    }

    #[test]
    fn fractional_template_counter_is_a_configuration_error() {
        let err = Configuration::from_json(r#"{"images": ["bg.jpg", 1.5, 3]}"#).unwrap_err();
        assert!(matches!(err, SwitcherError::Configuration(_)));
    }

    #[test]
    fn mixed_list_without_template_shape_is_rejected() {
        for json in [
            r#"{"images": ["a.png", 2]}"#,
            r#"{"images": ["a.png", "b.png", 3]}"#,
        ] {
            let err = Configuration::from_json(json).unwrap_err();
            assert!(matches!(err, SwitcherError::Configuration(_)), "{json}");
        }
    }

    #[test]
    fn non_list_images_are_a_configuration_error() {
        let err = Configuration::from_json(r#"{"images": "bg.jpg"}"#).unwrap_err();
        assert!(matches!(err, SwitcherError::Configuration(_)));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = Configuration {
            interval: Duration::ZERO,
            ..Configuration::new(ImageSource::list(["a", "b"]))
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_dir_sorts_and_filters_images() {
        let dir = PathBuf::from("target").join("config_from_dir");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        for name in ["b.JPG", "a.png", "notes.txt"] {
            fs::write(dir.join(name), b"").unwrap();
        }

        let ImageSource::List(urls) = ImageSource::from_dir(&dir).unwrap() else {
            panic!("expected an explicit list");
        };
        assert_eq!(urls.len(), 2);
        assert!(urls[0].ends_with("a.png"));
        assert!(urls[1].ends_with("b.JPG"));
    }
}
