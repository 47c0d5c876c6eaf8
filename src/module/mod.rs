//! Module definitions and their configuration trees
//!
//! A module owns a tree of configuration nodes. The tree is stored as an
//! arena: nodes refer to their parent and children by index, so upward
//! traversal needs no shared ownership. Nodes start out holding whatever
//! the module file declared and are overwritten in place by the resolver.

pub mod loader;
pub mod resolver;

use serde::Deserialize;
use tracing::warn;

use crate::constants::defaults;
use crate::display::{Display, DisplayId};
use crate::geometry::{Offsets, Rect, center_in};

/// Index of a module in its catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(pub(crate) usize);

impl ModuleId {
    /// Id for the module at `index` in load order, for callers building their own catalog
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// Index of a node in its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

// ==============================================================================
// On-disk shapes
// ==============================================================================

/// Wrapper object of a module file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ModuleFile {
    pub modules: Vec<ModuleDef>,
}

impl ModuleFile {
    /// Parse a module file
    ///
    /// Configurations may nest arbitrarily deep, so the parser's recursion
    /// limit is off and the stack grows on demand instead.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        let mut de = serde_json::Deserializer::from_str(contents);
        de.disable_recursion_limit();
        let file = Self::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(file)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleDef {
    pub name: String,
    pub tag: String,
    pub display_name: String,
    pub file_name: String,
    pub configurations: Vec<ConfigurationDef>,
}

/// One configuration as written in a module file; absent fields are zero
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigurationDef {
    pub name: String,
    pub file_name: String,
    pub opacity: f32,
    pub center: bool,
    pub enabled: bool,
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
    pub x_offset_start: i64,
    pub x_offset_finish: i64,
    pub y_offset_start: i64,
    pub y_offset_finish: i64,
    #[serde(rename = "subConfigDef")]
    pub configurations: Vec<ConfigurationDef>,
}

// ==============================================================================
// Resolved model
// ==============================================================================

#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub tag: String,
    pub display_name: String,
    pub file_name: String,
    /// Directory of the module file relative to the module root, `/`-separated
    pub category: String,
    pub configurations: ConfigTree,
}

impl Module {
    pub fn from_def(def: ModuleDef, category: impl Into<String>) -> Self {
        Self {
            name: def.name,
            tag: def.tag,
            display_name: def.display_name,
            file_name: def.file_name,
            category: category.into(),
            configurations: ConfigTree::from_defs(def.configurations),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigNode {
    pub name: String,
    pub file_name: String,
    pub opacity: f32,
    pub center: bool,
    pub enabled: bool,
    pub rect: Rect,
    pub offsets: Offsets,

    /// Owning module; only set on top-level nodes
    pub module: Option<ModuleId>,
    pub parent: Option<NodeId>,
    pub display: Option<DisplayId>,
    pub children: Vec<NodeId>,
}

impl ConfigNode {
    fn from_def(def: &ConfigurationDef) -> Self {
        Self {
            name: def.name.clone(),
            file_name: def.file_name.clone(),
            opacity: def.opacity,
            center: def.center,
            enabled: def.enabled,
            rect: Rect::new(def.left, def.top, def.width, def.height),
            offsets: Offsets {
                x_start: def.x_offset_start,
                x_finish: def.x_offset_finish,
                y_start: def.y_offset_start,
                y_finish: def.y_offset_finish,
            },
            module: None,
            parent: None,
            display: None,
            children: Vec::new(),
        }
    }

    /// Overwrite visual and geometry fields from the matched display,
    /// or with sentinel defaults when nothing matched
    ///
    /// The display's x-finish feeds the node's y-start and its y-start
    /// feeds the node's x-finish. Downstream croppers read them that way.
    pub fn apply_defaults(&mut self, display: Option<&Display>) {
        match display {
            Some(display) => {
                self.opacity = display.opacity;
                self.enabled = display.enabled;
                self.center = display.center;
                self.rect = display.rect;
                self.offsets = Offsets {
                    x_start: display.offsets.x_start,
                    y_start: display.offsets.x_finish,
                    x_finish: display.offsets.y_start,
                    y_finish: display.offsets.y_finish,
                };
            }
            None => {
                self.opacity = defaults::OPACITY;
                self.enabled = defaults::ENABLED;
                self.center = defaults::CENTER;
                self.rect = Rect::new(defaults::UNSET, defaults::UNSET, defaults::UNSET, defaults::UNSET);
                self.offsets = Offsets::UNSET;
            }
        }
    }

    pub fn dimension(&self) -> Rect {
        self.rect
    }

    pub fn base_dimension(&self) -> Rect {
        self.rect.at_origin()
    }

    pub fn offsets(&self) -> Offsets {
        self.offsets
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    nodes: Vec<ConfigNode>,
    roots: Vec<NodeId>,
}

impl ConfigTree {
    /// Flatten declared configurations into the arena, preserving sibling order
    pub fn from_defs(defs: Vec<ConfigurationDef>) -> Self {
        let mut tree = Self::default();
        let roots = defs.iter().map(|def| tree.insert(def, None)).collect();
        tree.roots = roots;
        tree
    }

    fn insert(&mut self, def: &ConfigurationDef, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ConfigNode { parent, ..ConfigNode::from_def(def) });

        let children = def
            .configurations
            .iter()
            .map(|child| self.insert(child, Some(id)))
            .collect();
        self.nodes[id.0].children = children;
        id
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &ConfigNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ConfigNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node id, parents before their children
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn find_top_level(&self, name: &str) -> Option<NodeId> {
        self.roots.iter().copied().find(|&id| self.node(id).name == name)
    }

    /// Number of parent links between `id` and its root
    pub fn depth(&self, id: NodeId) -> usize {
        std::iter::successors(self.node(id).parent, |&p| self.node(p).parent).count()
    }

    /// Nearest module back-reference found walking up from `id`
    ///
    /// Only top-level nodes carry the back-reference themselves; this
    /// gives deeper nodes transitive access.
    pub fn owning_module(&self, id: NodeId) -> Option<ModuleId> {
        std::iter::successors(Some(id), |&current| self.node(current).parent)
            .find_map(|current| self.node(current).module)
    }

    /// Where the node should be drawn
    ///
    /// Centered nodes are placed in the middle of their parent's rectangle.
    /// A node too large for its parent keeps its own rectangle.
    pub fn placement(&self, id: NodeId) -> Rect {
        let node = self.node(id);
        let Some(parent) = node.parent.map(|p| self.node(p)) else {
            return node.rect;
        };
        if !node.center || !node.rect.has_size() || !parent.rect.has_size() {
            return node.rect;
        }

        center_in(parent.dimension(), node.dimension()).unwrap_or_else(|e| {
            warn!(node = %node.name, parent = %parent.name, error = %e, "Cannot center configuration, using its own rectangle");
            node.rect
        })
    }
}

/// Every module from one load pass, in load order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    modules: Vec<Module>,
}

impl Catalog {
    pub(crate) fn next_id(&self) -> ModuleId {
        ModuleId(self.modules.len())
    }

    pub(crate) fn push(&mut self, module: Module) -> ModuleId {
        let id = self.next_id();
        self.modules.push(module);
        id
    }

    pub fn get(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id.0)
    }

    /// Module whose name or tag equals `key`
    pub fn find_module(&self, key: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == key || m.tag == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
