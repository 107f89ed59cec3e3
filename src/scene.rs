use color_eyre::Result;
use std::collections::BTreeMap;

use crate::assets::{Asset, AssetCatalog};
use crate::geometry::Rect;

/// Handle to something currently on the display list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Invisible-ish wall the ship is kept inside
    Boundary,
    Beam,
    /// Beam that has touched the ship
    BeamHit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Sprite {
        image: String,
        bounds: Rect,
        mirrored: bool,
    },
    Shape {
        bounds: Rect,
        fill: Fill,
    },
    /// Text centred horizontally on `x`
    Label {
        text: String,
        x: f64,
        y: f64,
    },
}

impl Node {
    pub fn bounds(&self) -> Rect {
        match self {
            Node::Sprite { bounds, .. } | Node::Shape { bounds, .. } => *bounds,
            Node::Label { x, y, .. } => Rect::new(*x, *y, 0.0, 0.0),
        }
    }
}

/// Display list in world coordinates. Nodes are drawn in insertion order,
/// so a re-added sprite ends up on top.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    catalog: AssetCatalog,
    nodes: BTreeMap<NodeId, Node>,
    next_id: u64,
}

impl Scene {
    pub fn new(catalog: AssetCatalog) -> Self {
        Self {
            catalog,
            nodes: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn asset(&self, image: &str) -> Result<&Asset> {
        self.catalog.get(image)
    }

    pub fn add_sprite(&mut self, image: &str, x: f64, y: f64) -> Result<NodeId> {
        self.add_sprite_with(image, x, y, false)
    }

    /// Same as [`Scene::add_sprite`] but flipped horizontally.
    pub fn add_mirrored_sprite(&mut self, image: &str, x: f64, y: f64) -> Result<NodeId> {
        self.add_sprite_with(image, x, y, true)
    }

    fn add_sprite_with(&mut self, image: &str, x: f64, y: f64, mirrored: bool) -> Result<NodeId> {
        let asset = self.catalog.get(image)?;
        let bounds = Rect::new(x, y, asset.width, asset.height);
        Ok(self.insert(Node::Sprite {
            image: image.to_string(),
            bounds,
            mirrored,
        }))
    }

    pub fn add_shape(&mut self, bounds: Rect, fill: Fill) -> NodeId {
        self.insert(Node::Shape { bounds, fill })
    }

    pub fn add_label(&mut self, text: &str, x: f64, y: f64) -> NodeId {
        self.insert(Node::Label {
            text: text.to_string(),
            x,
            y,
        })
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    /// Removes a node; removing something already gone is a no-op.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.nodes.remove(&id).is_some()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(&id).map(Node::bounds)
    }

    pub fn set_position(&mut self, id: NodeId, x: f64, y: f64) {
        match self.nodes.get_mut(&id) {
            Some(Node::Sprite { bounds, .. } | Node::Shape { bounds, .. }) => {
                bounds.x = x;
                bounds.y = y;
            }
            Some(Node::Label { x: lx, y: ly, .. }) => {
                *lx = x;
                *ly = y;
            }
            None => {}
        }
    }

    pub fn set_shape(&mut self, id: NodeId, rect: Rect) {
        if let Some(Node::Shape { bounds, .. }) = self.nodes.get_mut(&id) {
            *bounds = rect;
        }
    }

    pub fn set_fill(&mut self, id: NodeId, new_fill: Fill) {
        if let Some(Node::Shape { fill, .. }) = self.nodes.get_mut(&id) {
            *fill = new_fill;
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
