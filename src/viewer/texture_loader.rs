use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, anyhow};
use exif::{In, Reader, Tag, Value};
use raylib::prelude::*;
use tracing::{debug, warn};

/// Textures keyed by the image URL (a local path) they were loaded from.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<String, Texture2D>,
}

impl TextureCache {
    /// Loads every URL not cached yet. A failed load is logged and leaves the URL uncached, so
    /// layers showing it paint their background colour only.
    pub fn load_all(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, urls: Vec<String>) {
        for url in urls {
            if self.textures.contains_key(&url) {
                continue;
            }
            match load_texture_with_exif_rotation(rl, thread, Path::new(&url)) {
                Ok(texture) => {
                    debug!(%url, "texture loaded");
                    self.textures.insert(url, texture);
                }
                Err(e) => warn!(%url, "image unavailable: {e:#}"),
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<&Texture2D> {
        self.textures.get(url)
    }
}

// --- Load Image, Apply EXIF Rotation, Create Texture ---
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> anyhow::Result<Texture2D> {
    let file_bytes = fs::read(image_path)
        .with_context(|| format!("failed to read {}", image_path.display()))?;

    let extension = image_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    // EXIF orientation is only read reliably from JPEG files
    let orientation = if extension == "jpg" || extension == "jpeg" {
        read_orientation(&file_bytes, image_path)
    } else {
        1
    };

    let mut image = Image::load_image_from_mem(&format!(".{extension}"), &file_bytes)
        .map_err(|e| anyhow!("failed to decode {}: {e}", image_path.display()))?;

    // 1 = Top-left (Normal)
    // 3 = Bottom-right (180 deg)
    // 6 = Top-right (90 deg clockwise)
    // 8 = Bottom-left (270 deg clockwise / 90 deg counter-clockwise)
    // Others involve flips, ignored.
    match orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => image.rotate_cw(),
        8 => image.rotate_ccw(),
        _ => {}
    }

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| anyhow!("failed to create texture for {}: {e}", image_path.display()))?;

    Ok(texture)
}

fn read_orientation(file_bytes: &[u8], image_path: &Path) -> u16 {
    match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| match &field.value {
                Value::Short(values) => values.first().copied(),
                _ => None,
            })
            .unwrap_or(1),
        Err(e) => {
            debug!(path = %image_path.display(), "no EXIF data: {e}");
            1
        }
    }
}
