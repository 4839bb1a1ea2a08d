use raylib::prelude::*;

use crate::layer::{Layer, Rgba};
use crate::sim::SimDocument;
use crate::viewer::texture_loader::TextureCache;

/// Paints every visible box of `document`, back to front. Background images cover their box,
/// cropped around the centre.
pub fn draw(d: &mut RaylibDrawHandle, document: &SimDocument, textures: &TextureCache) {
    for layer in document.paint_order() {
        let opacity = layer.opacity() as f32;
        if opacity <= 0.0 {
            continue;
        }

        let offset = layer.offset();
        let size = layer.inner_size();
        let dest = Rectangle::new(
            offset.x as f32,
            offset.y as f32,
            size.width as f32,
            size.height as f32,
        );
        if dest.width <= 0.0 || dest.height <= 0.0 {
            continue;
        }

        let background = layer.background();
        if background.color.a > 0 {
            d.draw_rectangle_rec(dest, tint(background.color, opacity));
        }

        if let Some(texture) = background.image.as_deref().and_then(|url| textures.get(url)) {
            d.draw_texture_pro(
                texture,
                cover_source(texture, &dest),
                dest,
                Vector2::new(0.0, 0.0),
                0.0,
                tint(Rgba::new(255, 255, 255, 255), opacity),
            );
        }
    }
}

fn tint(color: Rgba, opacity: f32) -> Color {
    Color::new(color.r, color.g, color.b, (color.a as f32 * opacity) as u8)
}

// Largest centred region of the texture with the destination's aspect ratio.
fn cover_source(texture: &Texture2D, dest: &Rectangle) -> Rectangle {
    let tex_width = texture.width() as f32;
    let tex_height = texture.height() as f32;
    let scale = (dest.width / tex_width).max(dest.height / tex_height);
    let width = dest.width / scale;
    let height = dest.height / scale;
    Rectangle::new(
        (tex_width - width) * 0.5,
        (tex_height - height) * 0.5,
        width,
        height,
    )
}
