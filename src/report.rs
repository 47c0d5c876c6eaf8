//! Plain-text views of a resolved catalog for the command line

use crate::display::DisplayRegistry;
use crate::geometry::Rect;
use crate::module::{Catalog, ConfigTree, Module, NodeId};

fn format_rect(rect: Rect) -> String {
    format!("({},{} {}x{})", rect.left, rect.top, rect.width, rect.height)
}

/// One line per module: name, tag, category and configuration count
pub fn summary(catalog: &Catalog) -> String {
    catalog
        .iter()
        .map(|module| {
            let category = if module.category.is_empty() { "-" } else { module.category.as_str() };
            format!(
                "{} [{}] category={} configurations={}",
                module.name,
                module.tag,
                category,
                module.configurations.len()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indented tree of a module's resolved configurations
///
/// With `sub`, only the top-level configuration of that name and its
/// descendants are shown; `None` if it does not exist.
pub fn module_tree(module: &Module, displays: &DisplayRegistry, sub: Option<&str>) -> Option<String> {
    let tree = &module.configurations;
    let roots = match sub {
        Some(name) => vec![tree.find_top_level(name)?],
        None => tree.roots().to_vec(),
    };

    let mut lines = vec![format!("{} ({}) file={}", module.display_name, module.name, module.file_name)];
    for root in roots {
        push_node(&mut lines, tree, displays, root);
    }
    Some(lines.join("\n"))
}

fn push_node(lines: &mut Vec<String>, tree: &ConfigTree, displays: &DisplayRegistry, id: NodeId) {
    let node = tree.node(id);
    let indent = "  ".repeat(tree.depth(id) + 1);
    let display = node
        .display
        .and_then(|d| displays.get(d))
        .map_or("-", |d| d.name.as_str());
    let offsets = node.offsets();

    lines.push(format!(
        "{indent}{} display={display} rect={} placed={} offsets=[x {}..{}, y {}..{}] opacity={:.2} enabled={} center={} file={}",
        node.name,
        format_rect(node.dimension()),
        format_rect(tree.placement(id)),
        offsets.x_start,
        offsets.x_finish,
        offsets.y_start,
        offsets.y_finish,
        node.opacity,
        node.enabled,
        node.center,
        if node.file_name.is_empty() { "-" } else { node.file_name.as_str() },
    ));

    for &child in &node.children {
        push_node(lines, tree, displays, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Display;
    use crate::module::resolver::Resolver;
    use crate::module::{ConfigurationDef, ModuleDef, ModuleId};

    fn resolved_module() -> (Module, DisplayRegistry) {
        let mut left = Display::with_defaults("LEFT");
        left.rect = Rect::new(0, 0, 100, 100);
        let displays = DisplayRegistry::new(vec![left]);

        let mut module = Module::from_def(
            ModuleDef {
                name: "A-10C".to_string(),
                tag: "A10".to_string(),
                display_name: "A-10C Warthog".to_string(),
                configurations: vec![
                    ConfigurationDef {
                        name: "LEFT_MFCD".to_string(),
                        configurations: vec![ConfigurationDef { name: "OSB".to_string(), ..Default::default() }],
                        ..Default::default()
                    },
                    ConfigurationDef { name: "RIGHT_MFCD".to_string(), ..Default::default() },
                ],
                ..Default::default()
            },
            "Jets",
        );
        Resolver::new(&displays, "/images")
            .resolve_module(ModuleId(0), &mut module)
            .unwrap();
        (module, displays)
    }

    #[test]
    fn test_module_tree_lists_every_node_indented() {
        let (module, displays) = resolved_module();
        let text = module_tree(&module, &displays, None).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("A-10C Warthog (A-10C)"));
        assert!(lines[1].starts_with("  LEFT_MFCD display=LEFT rect=(0,0 100x100)"));
        assert!(lines[2].starts_with("    OSB display=- rect=(-1,-1 -1x-1)"));
        assert!(lines[3].starts_with("  RIGHT_MFCD display=-"));
    }

    #[test]
    fn test_module_tree_sub_selection() {
        let (module, displays) = resolved_module();
        let text = module_tree(&module, &displays, Some("RIGHT_MFCD")).unwrap();
        assert_eq!(text.lines().count(), 2);

        assert!(module_tree(&module, &displays, Some("OSB")).is_none());
    }

    #[test]
    fn test_summary() {
        let (module, _) = resolved_module();
        let mut catalog = Catalog::default();
        catalog.push(module);

        assert_eq!(summary(&catalog), "A-10C [A10] category=Jets configurations=3");
    }
}
