use std::time::Duration;

use tracing::debug;

use crate::layer::Layer;
use crate::synth::Layers;

/// Puts a new image on screen.
pub trait SwitchStrategy {
    /// Transitions to `url`.
    fn switch(&mut self, url: &str);

    /// Displays `url` with no transition.
    fn show(&mut self, url: &str);

    /// Moves any running transition forward by `dt`.
    fn advance(&mut self, _dt: Duration) {}

    fn is_fading(&self) -> bool {
        false
    }
}

/// Replaces the background image of a single layer.
#[derive(Debug)]
pub struct InstantSwitch<L> {
    layer: L,
}

impl<L: Layer> InstantSwitch<L> {
    pub fn new(layer: L) -> Self {
        Self { layer }
    }
}

impl<L: Layer> SwitchStrategy for InstantSwitch<L> {
    fn switch(&mut self, url: &str) {
        self.show(url);
    }

    fn show(&mut self, url: &str) {
        self.layer.set_background_image(Some(url));
    }
}

/// Linear fade-out of the fade layer, from opaque to transparent.
#[derive(Debug, Clone, Copy)]
struct FadeOut {
    elapsed: Duration,
}

/// Cross-fades by parking the outgoing image on the fade layer and fading that layer out over the
/// content layer, which already holds the incoming image.
#[derive(Debug)]
pub struct FadeSwitch<L> {
    fade: L,
    content: L,
    fade_z_index: i32,
    speed: Duration,
    in_flight: Option<FadeOut>,
}

impl<L: Layer> FadeSwitch<L> {
    pub fn new(layers: &Layers<L>, speed: Duration) -> Self {
        let fade_z_index = layers
            .fade
            .z_index()
            .or_else(|| layers.content.z_index().map(|z| z + 1))
            .unwrap_or(1);
        Self {
            fade: layers.fade.clone(),
            content: layers.content.clone(),
            fade_z_index,
            speed,
            in_flight: None,
        }
    }

    /// Jumps a running fade to its end state.
    fn collapse(&mut self) {
        if self.in_flight.take().is_some() {
            debug!("fade collapsed");
        }
        self.fade.set_opacity(0.0);
        self.fade.set_visible(false);
    }
}

impl<L: Layer> SwitchStrategy for FadeSwitch<L> {
    fn switch(&mut self, url: &str) {
        self.collapse();

        let outgoing = self.content.background().image;
        self.fade.set_background_image(outgoing.as_deref());
        self.fade.set_opacity(1.0);
        self.fade.set_visible(true);
        self.fade.set_z_index(self.fade_z_index);

        self.content.set_background_image(Some(url));
        self.in_flight = Some(FadeOut {
            elapsed: Duration::ZERO,
        });
    }

    fn show(&mut self, url: &str) {
        self.collapse();
        self.content.set_background_image(Some(url));
    }

    fn advance(&mut self, dt: Duration) {
        let Some(fade) = self.in_flight.as_mut() else {
            return;
        };
        fade.elapsed += dt;
        if fade.elapsed >= self.speed {
            self.in_flight = None;
            self.fade.set_opacity(0.0);
            self.fade.set_visible(false);
        } else {
            let t = fade.elapsed.as_secs_f64() / self.speed.as_secs_f64();
            self.fade.set_opacity(1.0 - t);
        }
    }

    fn is_fading(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{Document, Size};
    use crate::sim::{SimDocument, SimLayer};
    use crate::synth::synthesize;

    fn fade_fixture() -> (Layers<SimLayer>, FadeSwitch<SimLayer>) {
        let mut doc = SimDocument::new(Size::new(640.0, 480.0));
        let body = doc.body();
        let panel = doc.append_element(&body, "div");
        panel.set_size(Size::new(320.0, 240.0));
        let layers = synthesize(&mut doc, &panel).unwrap().layers;
        let mut switch = FadeSwitch::new(&layers, Duration::from_millis(1000));
        switch.show("a.png");
        (layers, switch)
    }

    #[test]
    fn instant_switch_sets_image() {
        let mut doc = SimDocument::new(Size::new(10.0, 10.0));
        let layer = doc.create_element("div");
        let mut switch = InstantSwitch::new(layer.clone());

        switch.switch("next.png");

        assert_eq!(layer.background().image.as_deref(), Some("next.png"));
        assert!(!switch.is_fading());
    }

    #[test]
    fn fade_switch_puts_new_image_underneath_immediately() {
        let (layers, mut switch) = fade_fixture();

        switch.switch("b.png");

        assert_eq!(layers.content.background().image.as_deref(), Some("b.png"));
        assert_eq!(layers.fade.background().image.as_deref(), Some("a.png"));
        assert_eq!(layers.fade.opacity(), 1.0);
        assert!(layers.fade.is_visible());
        assert!(layers.fade.z_index() > layers.content.z_index());
        assert!(switch.is_fading());
    }

    #[test]
    fn fade_is_linear_and_rests_transparent() {
        let (layers, mut switch) = fade_fixture();
        switch.switch("b.png");

        switch.advance(Duration::from_millis(250));
        assert!((layers.fade.opacity() - 0.75).abs() < 1e-9);
        assert!(switch.is_fading());

        switch.advance(Duration::from_millis(750));
        assert_eq!(layers.fade.opacity(), 0.0);
        assert!(!layers.fade.is_visible());
        assert!(!switch.is_fading());
        assert_eq!(layers.content.background().image.as_deref(), Some("b.png"));
    }

    #[test]
    fn new_switch_collapses_running_fade() {
        let (layers, mut switch) = fade_fixture();
        switch.switch("b.png");
        switch.advance(Duration::from_millis(400));

        switch.switch("c.png");

        assert_eq!(layers.fade.background().image.as_deref(), Some("b.png"));
        assert_eq!(layers.fade.opacity(), 1.0);
        assert_eq!(layers.content.background().image.as_deref(), Some("c.png"));

        // The restarted fade needs the full duration again.
        switch.advance(Duration::from_millis(700));
        assert!(switch.is_fading());
        switch.advance(Duration::from_millis(300));
        assert!(!switch.is_fading());
    }

    #[test]
    fn show_skips_the_transition() {
        let (layers, mut switch) = fade_fixture();
        switch.switch("b.png");

        switch.show("c.png");

        assert!(!switch.is_fading());
        assert!(!layers.fade.is_visible());
        assert_eq!(layers.content.background().image.as_deref(), Some("c.png"));
    }
}
