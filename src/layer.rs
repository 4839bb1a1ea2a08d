//! The visual-box capability the switcher drives.
//!
//! A [`Layer`] is a handle onto one box in the host environment (a DOM element, a node of
//! [`crate::sim::SimDocument`], ...). Handles are cheap to clone and all clones refer to the same
//! box, so every accessor takes `&self`. Structural edits that involve more than one box go
//! through [`Document`].

use std::ops::Add;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Per-edge pixel lengths, used for margins and paddings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Edges {
    pub const ZERO: Self = Self::uniform(0.0);

    pub const fn uniform(px: f64) -> Self {
        Self {
            top: px,
            bottom: px,
            left: px,
            right: px,
        }
    }
}

impl Add for Edges {
    type Output = Edges;

    fn add(self, rhs: Edges) -> Edges {
        Edges {
            top: self.top + rhs.top,
            bottom: self.bottom + rhs.bottom,
            left: self.left + rhs.left,
            right: self.right + rhs.right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Everything that makes up a box's background.
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    /// Image URL, `None` for no image.
    pub image: Option<String>,
    pub position: String,
    pub repeat: String,
    pub color: Rgba,
    pub attachment: String,
}

impl Background {
    /// The background of a box nobody styled.
    pub fn none() -> Self {
        Self {
            image: None,
            position: "0% 0%".to_string(),
            repeat: "repeat".to_string(),
            color: Rgba::TRANSPARENT,
            attachment: "scroll".to_string(),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    /// Laid out by the host, wherever it falls.
    #[default]
    Static,
    Relative,
    /// Placed at a document offset.
    Absolute(Point),
}

/// How the switcher treats a target, decided from its tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The document's root element (`html`).
    DocumentRoot,
    /// The page's root content container (`body`).
    ContentRoot,
    Element,
}

impl NodeKind {
    pub fn of(tag_name: &str) -> Self {
        if tag_name.eq_ignore_ascii_case("html") {
            NodeKind::DocumentRoot
        } else if tag_name.eq_ignore_ascii_case("body") {
            NodeKind::ContentRoot
        } else {
            NodeKind::Element
        }
    }
}

pub trait Layer: Clone {
    fn tag_name(&self) -> String;

    fn kind(&self) -> NodeKind {
        NodeKind::of(&self.tag_name())
    }

    /// Top-left corner of the border box, in document coordinates.
    fn offset(&self) -> Point;
    /// Content plus padding.
    fn inner_size(&self) -> Size;
    fn set_size(&self, size: Size);
    fn set_width(&self, width: f64);
    fn set_position(&self, position: Position);

    fn margin(&self) -> Edges;
    fn set_margin(&self, margin: Edges);
    fn padding(&self) -> Edges;
    fn set_padding(&self, padding: Edges);

    fn background(&self) -> Background;
    fn set_background(&self, background: &Background);
    fn set_background_image(&self, url: Option<&str>);

    fn opacity(&self) -> f64;
    fn set_opacity(&self, opacity: f64);
    fn is_visible(&self) -> bool;
    fn set_visible(&self, visible: bool);

    /// `None` when the stacking order is left to the host (`auto`).
    fn z_index(&self) -> Option<i32>;
    fn set_z_index(&self, z_index: i32);
}

pub trait Document {
    type Layer: Layer;

    /// Creates a detached box with the given tag.
    fn create_element(&mut self, tag_name: &str) -> Self::Layer;

    /// Deep-copies a box, styles and children included. The copy is detached.
    fn clone_layer(&mut self, layer: &Self::Layer) -> Self::Layer;

    /// Moves `layers`, in order, right after `anchor` among its siblings.
    fn insert_after(&mut self, anchor: &Self::Layer, layers: &[Self::Layer]);

    /// Wraps every child of `container` except scripts in a new `div` carrying `id`.
    fn wrap_children(&mut self, container: &Self::Layer, id: &str) -> Self::Layer;

    /// Starts fetching `url` so a later switch finds it cached. Never reports failure.
    fn prefetch(&mut self, url: &str);
}
