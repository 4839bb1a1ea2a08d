//! Builds the layer stack a cross-fade needs.
//!
//! For a plain element the stack is: the element itself (background cleared), then a fade layer one
//! z-level below it and a content layer one more level below, both inserted right after it. When the
//! target is the page body the body's children are first wrapped in a `div` that takes over the
//! body's background and box spacing, and the stack is built against that wrapper.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::constants::DEFAULT_Z_INDEX;
use crate::error::{SwitcherError, SwitcherResult};
use crate::layer::*;

static NEXT_ROOT_ID: AtomicUsize = AtomicUsize::new(0);

/// Handles onto every box taking part in a cross-fade.
#[derive(Debug, Clone)]
pub struct Layers<L> {
    /// The caller's target.
    pub origin: L,
    /// Wrapper synthesized when the origin is the page body.
    pub root: Option<L>,
    /// Shows the outgoing image while a fade runs.
    pub fade: L,
    /// Holds the current image.
    pub content: L,
}

impl<L: Layer> Layers<L> {
    /// The box the fade and content layers are stacked against.
    pub fn anchor(&self) -> &L {
        self.root.as_ref().unwrap_or(&self.origin)
    }
}

#[derive(Debug)]
pub struct Synthesis<L> {
    pub layers: Layers<L>,
    /// Set when the wrapper was synthesized, whose width must follow the viewport.
    pub force_resize: bool,
}

pub fn synthesize<D: Document>(
    document: &mut D,
    target: &D::Layer,
) -> SwitcherResult<Synthesis<D::Layer>> {
    let root = match target.kind() {
        NodeKind::DocumentRoot => {
            return Err(SwitcherError::unsupported_target(
                "fading the document's root element is not allowed",
            ));
        }
        NodeKind::ContentRoot => Some(synthesize_root(document, target)),
        NodeKind::Element => None,
    };
    let anchor = root.as_ref().unwrap_or(target);

    let z_index = match anchor.z_index() {
        Some(z_index) => z_index,
        None => {
            anchor.set_z_index(DEFAULT_Z_INDEX);
            DEFAULT_Z_INDEX
        }
    };
    let offset = anchor.offset();
    let size = anchor.inner_size();
    let background = anchor.background();

    let fade = document.create_element(&anchor.tag_name());
    fade.set_position(Position::Absolute(offset));
    fade.set_size(size);
    fade.set_z_index(z_index.saturating_sub(1));
    fade.set_background(&background);

    anchor.set_position(Position::Relative);
    anchor.set_background(&Background::none());

    let content = document.clone_layer(&fade);
    content.set_z_index(z_index.saturating_sub(2));

    // Nothing is in flight yet.
    fade.set_opacity(0.0);
    fade.set_visible(false);

    document.insert_after(anchor, &[fade.clone(), content.clone()]);
    debug!(z_index, width = size.width, height = size.height, "fade layers synthesized");

    let force_resize = root.is_some();
    Ok(Synthesis {
        layers: Layers {
            origin: target.clone(),
            root,
            fade,
            content,
        },
        force_resize,
    })
}

fn synthesize_root<D: Document>(document: &mut D, body: &D::Layer) -> D::Layer {
    let id = format!("bgswitcher-{}", NEXT_ROOT_ID.fetch_add(1, Ordering::Relaxed));
    let root = document.wrap_children(body, &id);

    root.set_background(&body.background());
    root.set_padding(body.margin() + body.padding());

    body.set_margin(Edges::ZERO);
    body.set_padding(Edges::ZERO);
    body.set_background(&Background::none());

    debug!(%id, "root wrapper synthesized");
    root
}
