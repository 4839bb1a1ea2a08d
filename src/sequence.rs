use std::ops::Index;

use crate::config::ImageSource;
use crate::constants::{MAX_TEMPLATE_IMAGES, MIN_IMAGES};
use crate::error::{SwitcherError, SwitcherResult};

/// The fixed list of image URLs a controller rotates through. Always holds at least two entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSequence {
    urls: Vec<String>,
}

impl ImageSequence {
    pub fn resolve(source: Option<&ImageSource>) -> SwitcherResult<Self> {
        let urls = match source {
            None => return Err(SwitcherError::configuration("images is missing")),
            Some(ImageSource::List(urls)) => urls.clone(),
            Some(ImageSource::Template(base, min, max)) => expand_template(base, *min, *max)?,
        };

        if urls.len() < MIN_IMAGES {
            return Err(SwitcherError::configuration(format!(
                "at least {MIN_IMAGES} images are required, got {}",
                urls.len()
            )));
        }
        Ok(Self { urls })
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.urls
    }
}

impl Index<usize> for ImageSequence {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.urls[index]
    }
}

/// Inserts each counter in `min..=max` before the extension of `base`.
///
/// `bg.jpg` with 1..=3 gives `bg1.jpg`, `bg2.jpg`, `bg3.jpg`. A base without a trailing
/// `.<word chars>` suffix gets the counter appended as is. Ranges longer than
/// [`MAX_TEMPLATE_IMAGES`] are a configuration error.
pub fn expand_template(base: &str, min: i64, max: i64) -> SwitcherResult<Vec<String>> {
    let count = (i128::from(max) - i128::from(min) + 1).max(0);
    if count > MAX_TEMPLATE_IMAGES as i128 {
        return Err(SwitcherError::configuration(format!(
            "template range {min}..={max} exceeds {MAX_TEMPLATE_IMAGES} images"
        )));
    }

    let (stem, extension) = split_extension(base);
    Ok((min..=max)
        .map(|counter| format!("{stem}{counter}{extension}"))
        .collect())
}

fn split_extension(base: &str) -> (&str, &str) {
    match base.rfind('.') {
        Some(dot)
            if dot + 1 < base.len()
                && base[dot + 1..]
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_') =>
        {
            base.split_at(dot)
        }
        _ => (base, ""),
    }
}
