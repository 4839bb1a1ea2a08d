use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::compositor::{FadeSwitch, InstantSwitch, SwitchStrategy};
use crate::config::Configuration;
use crate::error::SwitcherResult;
use crate::layer::{Document, Layer};
use crate::preload::preload;
use crate::resize::ResizeSynchronizer;
use crate::scheduler::{InOrder, IndexStrategy, RandomOrder, RotationScheduler};
use crate::sequence::ImageSequence;
use crate::state::RotationState;
use crate::synth::{Layers, synthesize};

/// Rotates background images on one target.
///
/// The host loop drives it: call [`update`](Self::update) every frame with the elapsed time and
/// [`on_resize`](Self::on_resize) whenever the viewport changes size.
pub struct Controller<L> {
    images: ImageSequence,
    scheduler: RotationScheduler,
    switcher: Box<dyn SwitchStrategy>,
    layers: Option<Layers<L>>,
    resize: Option<ResizeSynchronizer<L>>,
}

impl<L: std::fmt::Debug> std::fmt::Debug for Controller<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("images", &self.images)
            .field("scheduler", &self.scheduler)
            .field("layers", &self.layers)
            .field("resize", &self.resize.is_some())
            .finish()
    }
}

impl<L: Layer + 'static> Controller<L> {
    pub fn new<D>(document: &mut D, target: L, config: Configuration) -> SwitcherResult<Self>
    where
        D: Document<Layer = L>,
    {
        Self::with_rng(document, target, config, rand::rng())
    }

    /// Like [`new`](Self::new), drawing random picks from `rng`.
    pub fn with_rng<D, R>(
        document: &mut D,
        target: L,
        config: Configuration,
        rng: R,
    ) -> SwitcherResult<Self>
    where
        D: Document<Layer = L>,
        R: Rng + 'static,
    {
        config.validate()?;
        let images = ImageSequence::resolve(config.images.as_ref())?;
        preload(document, &images);

        let synthesis = if config.fade_enabled() {
            Some(synthesize(document, &target)?)
        } else {
            None
        };

        let strategy: Box<dyn IndexStrategy> = if config.random {
            Box::new(RandomOrder::new(rng))
        } else {
            Box::new(InOrder::new(config.looping))
        };
        let scheduler = RotationScheduler::new(config.interval, &images, strategy)?;

        let (switcher, layers, resize) = match synthesis {
            Some(synthesis) => {
                let resize = (config.resize || synthesis.force_resize)
                    .then(|| ResizeSynchronizer::new(&synthesis.layers));
                (
                    Box::new(FadeSwitch::new(&synthesis.layers, config.fade_speed))
                        as Box<dyn SwitchStrategy>,
                    Some(synthesis.layers),
                    resize,
                )
            }
            None => {
                if config.resize {
                    debug!("resize ignored, no layers to keep in sync");
                }
                (
                    Box::new(InstantSwitch::new(target)) as Box<dyn SwitchStrategy>,
                    None,
                    None,
                )
            }
        };

        let mut controller = Self {
            images,
            scheduler,
            switcher,
            layers,
            resize,
        };
        let first = controller.scheduler.current_index();
        controller.switcher.show(&controller.images[first]);

        if config.auto_start {
            controller.start();
        }

        info!(
            images = controller.images.len(),
            fade_ms = config.fade_speed.as_millis() as u64,
            random = config.random,
            looping = config.looping,
            running = controller.is_running(),
            "background rotation ready"
        );
        Ok(controller)
    }
}

impl<L: Layer> Controller<L> {
    pub fn start(&mut self) {
        self.scheduler.start();
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn toggle(&mut self) {
        self.scheduler.toggle();
    }

    /// Switches to the first image and (re)starts the rotation.
    pub fn reset(&mut self) {
        let index = self.scheduler.rewind();
        self.switcher.switch(&self.images[index]);
        self.scheduler.start();
    }

    /// Advances the running fade and fires every tick that fell due during `dt`.
    pub fn update(&mut self, dt: Duration) {
        self.switcher.advance(dt);
        let due = self.scheduler.poll(dt);
        for _ in 0..due {
            // A tick may stop the rotation; later ticks from the same poll are dropped.
            if !self.scheduler.is_running() {
                break;
            }
            let index = self.scheduler.tick();
            self.switcher.switch(&self.images[index]);
            debug!(index, url = &self.images[index], "switched");
        }
    }

    pub fn on_resize(&self) {
        if let Some(resize) = &self.resize {
            resize.on_resize();
        }
    }

    pub fn current_index(&self) -> usize {
        self.scheduler.current_index()
    }

    pub fn current_image(&self) -> &str {
        &self.images[self.current_index()]
    }

    pub fn state(&self) -> RotationState {
        self.scheduler.state()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn is_fading(&self) -> bool {
        self.switcher.is_fading()
    }

    pub fn tracks_resize(&self) -> bool {
        self.resize.is_some()
    }

    pub fn images(&self) -> &ImageSequence {
        &self.images
    }

    /// The synthesized layers, when fading is enabled.
    pub fn layers(&self) -> Option<&Layers<L>> {
        self.layers.as_ref()
    }
}
