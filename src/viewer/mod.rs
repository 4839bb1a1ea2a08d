//! Desktop window painting a [`SimDocument`] while a [`Controller`] rotates its backgrounds.
//!
//! Space toggles the rotation, R resets it to the first image.

mod scene;
mod texture_loader;

use std::time::Duration;

use raylib::prelude::*;
use tracing::info;

use crate::config::Configuration;
use crate::constants::*;
use crate::controller::Controller;
use crate::layer::{Layer, Size};
use crate::sim::{SimDocument, SimLayer};

pub use texture_loader::{TextureCache, load_texture_with_exif_rotation};

/// The window opens at [`VIEW_WIDTH`] x [`VIEW_HEIGHT`], so `document` should be built with that
/// viewport.
pub fn run(
    mut document: SimDocument,
    target: SimLayer,
    config: Configuration,
) -> anyhow::Result<()> {
    let (mut rl, thread) = raylib::init()
        .size(VIEW_WIDTH, VIEW_HEIGHT)
        .title("Background Switcher")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    let mut controller = Controller::new(&mut document, target, config)?;

    let mut textures = TextureCache::default();
    textures.load_all(&mut rl, &thread, document.take_prefetched());

    // --- Main Loop ---
    while !rl.window_should_close() {
        let dt = Duration::from_secs_f32(rl.get_frame_time());

        if rl.is_window_resized() {
            let viewport = Size::new(
                rl.get_screen_width() as f64,
                rl.get_screen_height() as f64,
            );
            document.root_element().set_size(viewport);
            document.body().set_size(viewport);
            controller.on_resize();
        }

        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            controller.toggle();
            info!(running = controller.is_running(), "toggled");
        }
        if rl.is_key_pressed(KeyboardKey::KEY_R) {
            controller.reset();
            info!("reset");
        }

        controller.update(dt);

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        scene::draw(&mut d, &document, &textures);
    }

    Ok(())
}
