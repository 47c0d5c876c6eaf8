//! Resolution pass over configuration trees
//!
//! For every node: attach back-references, match a display by name prefix,
//! overwrite visual and geometry fields from it (or sentinel defaults), and
//! resolve the image file name against the configured base path. Then
//! recurse into the children.
//!
//! The pass is idempotent: resolving an already resolved tree with the same
//! registry leaves every field unchanged.

use tracing::{debug, trace};

use crate::display::DisplayRegistry;
use crate::error::Result;
use crate::module::{ConfigTree, Module, ModuleId, NodeId};
use crate::paths::{is_in_base, join_base};

/// Module context handed to the top level of a resolution pass
#[derive(Debug, Clone, Copy)]
pub struct ModuleRef<'a> {
    pub id: ModuleId,
    pub file_name: &'a str,
}

pub struct Resolver<'a> {
    displays: &'a DisplayRegistry,
    base_path: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(displays: &'a DisplayRegistry, base_path: &'a str) -> Self {
        Self { displays, base_path }
    }

    /// Resolve a module's whole tree, attaching the module to its top-level nodes
    pub fn resolve_module(&self, id: ModuleId, module: &mut Module) -> Result<()> {
        let Module { name, file_name, configurations, .. } = module;
        let roots = configurations.roots().to_vec();

        debug!(module = %name, nodes = configurations.len(), "Resolving configurations");
        self.resolve(configurations, Some(ModuleRef { id, file_name }), None, &roots)
    }

    /// Resolve `nodes` and everything below them
    ///
    /// `module` only reaches the nodes passed in here; children are resolved
    /// without it, so deeper nodes carry no module back-reference and never
    /// fall back to the module's file name.
    pub fn resolve(
        &self,
        tree: &mut ConfigTree,
        module: Option<ModuleRef<'_>>,
        parent: Option<NodeId>,
        nodes: &[NodeId],
    ) -> Result<()> {
        for &id in nodes {
            self.resolve_node(tree, module, parent, id)?;

            let children = tree.node(id).children.clone();
            self.resolve(tree, None, Some(id), &children)?;
        }
        Ok(())
    }

    fn resolve_node(
        &self,
        tree: &mut ConfigTree,
        module: Option<ModuleRef<'_>>,
        parent: Option<NodeId>,
        id: NodeId,
    ) -> Result<()> {
        let node = tree.node_mut(id);

        if let Some(module) = module {
            node.module = Some(module.id);
        }
        if parent.is_some() {
            node.parent = parent;
        }

        let display_id = self.displays.match_name(&node.name);
        node.apply_defaults(display_id.and_then(|d| self.displays.get(d)));
        node.display = display_id;

        node.file_name = self.resolve_file_name(&node.file_name, module.map(|m| m.file_name))?;

        trace!(node = %node.name, display = ?node.display, file = %node.file_name, "Resolved configuration");
        Ok(())
    }

    /// The node's own file name wins over the module's; names already under
    /// the base path are kept, anything else is joined onto it
    fn resolve_file_name(&self, own: &str, module_file: Option<&str>) -> Result<String> {
        let candidate = match (own, module_file) {
            (own, _) if !own.is_empty() => own,
            (_, Some(module_file)) if !module_file.is_empty() => module_file,
            _ => return Ok(String::new()),
        };

        if is_in_base(self.base_path, candidate)? {
            Ok(candidate.to_string())
        } else {
            Ok(join_base(self.base_path, candidate))
        }
    }
}
