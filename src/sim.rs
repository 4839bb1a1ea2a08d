//! In-memory [`Document`] used by the tests, the headless `simulate` command and the viewer.
//!
//! Nodes live in an arena shared by every handle. There is no layout engine: offsets and sizes are
//! whatever was last written, and a wrapper created by [`Document::wrap_children`] simply covers its
//! container.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::layer::*;

#[derive(Clone)]
struct SimNode {
    tag_name: String,
    element_id: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
    offset: Point,
    size: Size,
    position: Position,
    margin: Edges,
    padding: Edges,
    background: Background,
    opacity: f64,
    visible: bool,
    z_index: Option<i32>,
}

impl SimNode {
    fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            element_id: None,
            parent: None,
            children: Vec::new(),
            offset: Point::default(),
            size: Size::default(),
            position: Position::Static,
            margin: Edges::ZERO,
            padding: Edges::ZERO,
            background: Background::none(),
            opacity: 1.0,
            visible: true,
            z_index: None,
        }
    }
}

#[derive(Default)]
struct Arena {
    nodes: Vec<SimNode>,
    mutations: usize,
    prefetched: Vec<String>,
}

impl Arena {
    fn push(&mut self, node: SimNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn detach(&mut self, id: usize) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|&child| child != id);
        }
    }

    fn deep_copy(&mut self, id: usize) -> usize {
        let mut node = self.nodes[id].clone();
        node.parent = None;
        let children = std::mem::take(&mut node.children);
        let copy = self.push(node);
        for child in children {
            let child_copy = self.deep_copy(child);
            self.nodes[child_copy].parent = Some(copy);
            self.nodes[copy].children.push(child_copy);
        }
        copy
    }
}

#[derive(Clone)]
pub struct SimDocument {
    arena: Rc<RefCell<Arena>>,
}

impl fmt::Debug for SimDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimDocument")
            .field("nodes", &self.arena.borrow().nodes.len())
            .finish()
    }
}

#[derive(Clone)]
pub struct SimLayer {
    arena: Rc<RefCell<Arena>>,
    id: usize,
}

impl fmt::Debug for SimLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimLayer")
            .field("id", &self.id)
            .field("tag_name", &self.tag_name())
            .finish()
    }
}

impl PartialEq for SimLayer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena) && self.id == other.id
    }
}

impl SimDocument {
    const ROOT: usize = 0;
    const BODY: usize = 1;

    /// An `html` root holding an empty `body`, both covering `viewport`.
    pub fn new(viewport: Size) -> Self {
        let mut arena = Arena::default();
        let mut html = SimNode::new("html");
        html.size = viewport;
        let root = arena.push(html);
        let mut body = SimNode::new("body");
        body.size = viewport;
        body.parent = Some(root);
        let body = arena.push(body);
        arena.nodes[root].children.push(body);

        Self {
            arena: Rc::new(RefCell::new(arena)),
        }
    }

    fn handle(&self, id: usize) -> SimLayer {
        SimLayer {
            arena: Rc::clone(&self.arena),
            id,
        }
    }

    pub fn root_element(&self) -> SimLayer {
        self.handle(Self::ROOT)
    }

    pub fn body(&self) -> SimLayer {
        self.handle(Self::BODY)
    }

    /// Creates a `tag_name` element as the last child of `parent`.
    pub fn append_element(&mut self, parent: &SimLayer, tag_name: &str) -> SimLayer {
        let mut arena = self.arena.borrow_mut();
        let mut node = SimNode::new(tag_name);
        node.parent = Some(parent.id);
        let id = arena.push(node);
        arena.nodes[parent.id].children.push(id);
        arena.mutations += 1;
        drop(arena);
        self.handle(id)
    }

    pub fn children(&self, layer: &SimLayer) -> Vec<SimLayer> {
        let ids = self.arena.borrow().nodes[layer.id].children.clone();
        ids.into_iter().map(|id| self.handle(id)).collect()
    }

    pub fn parent(&self, layer: &SimLayer) -> Option<SimLayer> {
        let parent = self.arena.borrow().nodes[layer.id].parent;
        parent.map(|id| self.handle(id))
    }

    /// Number of writes performed on any node since the document was created.
    pub fn mutations(&self) -> usize {
        self.arena.borrow().mutations
    }

    pub fn prefetched(&self) -> Vec<String> {
        self.arena.borrow().prefetched.clone()
    }

    /// Drains the prefetch log, for backends that fetch lazily.
    pub fn take_prefetched(&mut self) -> Vec<String> {
        std::mem::take(&mut self.arena.borrow_mut().prefetched)
    }

    /// Attached, visible boxes from back to front.
    pub fn paint_order(&self) -> Vec<SimLayer> {
        let arena = self.arena.borrow();
        let mut stack = vec![Self::ROOT];
        let mut attached = Vec::new();
        while let Some(id) = stack.pop() {
            let node = &arena.nodes[id];
            if !node.visible {
                continue;
            }
            attached.push(id);
            stack.extend(node.children.iter().rev());
        }
        // Stable sort keeps document order between equal z-indices.
        attached.sort_by_key(|&id| arena.nodes[id].z_index.unwrap_or(0));
        drop(arena);
        attached.into_iter().map(|id| self.handle(id)).collect()
    }
}

impl SimLayer {
    fn read<T>(&self, f: impl FnOnce(&SimNode) -> T) -> T {
        f(&self.arena.borrow().nodes[self.id])
    }

    fn write(&self, f: impl FnOnce(&mut SimNode)) {
        let mut arena = self.arena.borrow_mut();
        arena.mutations += 1;
        f(&mut arena.nodes[self.id]);
    }

    pub fn element_id(&self) -> Option<String> {
        self.read(|n| n.element_id.clone())
    }

    pub fn position(&self) -> Position {
        self.read(|n| n.position)
    }

    /// Layout-side setter, standing in for the host moving the box.
    pub fn set_offset(&self, offset: Point) {
        self.write(|n| n.offset = offset);
    }
}

impl Layer for SimLayer {
    fn tag_name(&self) -> String {
        self.read(|n| n.tag_name.clone())
    }

    fn offset(&self) -> Point {
        self.read(|n| n.offset)
    }

    fn inner_size(&self) -> Size {
        self.read(|n| n.size)
    }

    fn set_size(&self, size: Size) {
        self.write(|n| n.size = size);
    }

    fn set_width(&self, width: f64) {
        self.write(|n| n.size.width = width);
    }

    fn set_position(&self, position: Position) {
        self.write(|n| {
            n.position = position;
            if let Position::Absolute(offset) = position {
                n.offset = offset;
            }
        });
    }

    fn margin(&self) -> Edges {
        self.read(|n| n.margin)
    }

    fn set_margin(&self, margin: Edges) {
        self.write(|n| n.margin = margin);
    }

    fn padding(&self) -> Edges {
        self.read(|n| n.padding)
    }

    fn set_padding(&self, padding: Edges) {
        self.write(|n| n.padding = padding);
    }

    fn background(&self) -> Background {
        self.read(|n| n.background.clone())
    }

    fn set_background(&self, background: &Background) {
        self.write(|n| n.background = background.clone());
    }

    fn set_background_image(&self, url: Option<&str>) {
        self.write(|n| n.background.image = url.map(str::to_string));
    }

    fn opacity(&self) -> f64 {
        self.read(|n| n.opacity)
    }

    fn set_opacity(&self, opacity: f64) {
        self.write(|n| n.opacity = opacity.clamp(0.0, 1.0));
    }

    fn is_visible(&self) -> bool {
        self.read(|n| n.visible)
    }

    fn set_visible(&self, visible: bool) {
        self.write(|n| n.visible = visible);
    }

    fn z_index(&self) -> Option<i32> {
        self.read(|n| n.z_index)
    }

    fn set_z_index(&self, z_index: i32) {
        self.write(|n| n.z_index = Some(z_index));
    }
}

impl Document for SimDocument {
    type Layer = SimLayer;

    fn create_element(&mut self, tag_name: &str) -> SimLayer {
        let id = self.arena.borrow_mut().push(SimNode::new(tag_name));
        self.handle(id)
    }

    fn clone_layer(&mut self, layer: &SimLayer) -> SimLayer {
        let id = self.arena.borrow_mut().deep_copy(layer.id);
        self.handle(id)
    }

    fn insert_after(&mut self, anchor: &SimLayer, layers: &[SimLayer]) {
        let mut arena = self.arena.borrow_mut();
        let Some(parent) = arena.nodes[anchor.id].parent else {
            return;
        };
        for layer in layers {
            arena.detach(layer.id);
        }
        let mut at = arena.nodes[parent]
            .children
            .iter()
            .position(|&child| child == anchor.id)
            .map_or(0, |i| i + 1);
        for layer in layers {
            arena.nodes[parent].children.insert(at, layer.id);
            arena.nodes[layer.id].parent = Some(parent);
            at += 1;
        }
        arena.mutations += 1;
    }

    fn wrap_children(&mut self, container: &SimLayer, id: &str) -> SimLayer {
        let mut arena = self.arena.borrow_mut();
        let mut wrapper = SimNode::new("div");
        wrapper.element_id = Some(id.to_string());
        wrapper.parent = Some(container.id);
        wrapper.offset = arena.nodes[container.id].offset;
        wrapper.size = arena.nodes[container.id].size;
        let wrapper = arena.push(wrapper);

        let children = std::mem::take(&mut arena.nodes[container.id].children);
        let mut kept = Vec::with_capacity(children.len());
        for child in children {
            if arena.nodes[child].tag_name.eq_ignore_ascii_case("script") {
                kept.push(child);
            } else {
                if !kept.contains(&wrapper) {
                    kept.push(wrapper);
                }
                arena.nodes[child].parent = Some(wrapper);
                arena.nodes[wrapper].children.push(child);
            }
        }
        if !kept.contains(&wrapper) {
            kept.push(wrapper);
        }
        arena.nodes[container.id].children = kept;
        arena.mutations += 1;
        drop(arena);
        self.handle(wrapper)
    }

    fn prefetch(&mut self, url: &str) {
        self.arena.borrow_mut().prefetched.push(url.to_string());
    }
}
