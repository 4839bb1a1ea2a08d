use std::time::Duration;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);   // Time between two switches
pub const DEFAULT_FADE_SPEED: Duration = Duration::from_millis(1000); // Cross-fade duration, zero disables fading
pub const DEFAULT_Z_INDEX: i32 = 1000;                                // Written back when the target has none

pub const MIN_IMAGES: usize = 2;                                      // Shortest sequence worth rotating
pub const MAX_TEMPLATE_IMAGES: usize = 10_000;                        // Largest counter range a template may expand to

pub const VIEW_WIDTH: i32 = 1280;                                     // Initial viewer window width
pub const VIEW_HEIGHT: i32 = 720;                                     // Initial viewer window height
pub const FPS: u32 = 60;                                              // Frames per second
pub const FRAME_TIME: f32 = 1.0 / FPS as f32;                         // Time per frame (seconds)
