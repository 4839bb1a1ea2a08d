use tracing::debug;

use crate::layer::Layer;
use crate::synth::Layers;

/// Copies the origin's width onto the synthesized boxes on every viewport resize.
#[derive(Debug)]
pub struct ResizeSynchronizer<L> {
    origin: L,
    followers: Vec<L>,
}

impl<L: Layer> ResizeSynchronizer<L> {
    pub fn new(layers: &Layers<L>) -> Self {
        let followers = layers
            .root
            .iter()
            .chain([&layers.fade, &layers.content])
            .cloned()
            .collect();
        Self {
            origin: layers.origin.clone(),
            followers,
        }
    }

    pub fn on_resize(&self) {
        let width = self.origin.inner_size().width;
        for layer in &self.followers {
            layer.set_width(width);
        }
        debug!(width, "layers resized");
    }
}
