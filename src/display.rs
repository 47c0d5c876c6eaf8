//! Display regions
//!
//! The registry is loaded once from a JSON array and is read-only after
//! that. Order matters: matching walks the registry in file order and the
//! first region whose name prefixes the query wins.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::constants::defaults;
use crate::error::{MfdError, Result};
use crate::geometry::{Offsets, Rect};

/// Index of a display in its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayId(usize);

impl DisplayId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Display {
    pub name: String,
    pub center: bool,
    pub rect: Rect,
    pub offsets: Offsets,
    pub opacity: f32,
    pub enabled: bool,
}

impl Display {
    /// A display carrying only sentinel defaults
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            center: defaults::CENTER,
            rect: Rect::new(defaults::UNSET, defaults::UNSET, defaults::UNSET, defaults::UNSET),
            offsets: Offsets::UNSET,
            opacity: defaults::OPACITY,
            enabled: defaults::ENABLED,
        }
    }

    /// Screen rectangle of the display
    pub fn dimension(&self) -> Rect {
        self.rect
    }

    /// Display size anchored at the origin
    pub fn base_dimension(&self) -> Rect {
        self.rect.at_origin()
    }
}

/// On-disk shape of one display entry; absent fields keep their defaults
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DisplayDef {
    name: String,
    center: Option<bool>,
    left: Option<i64>,
    top: Option<i64>,
    width: Option<i64>,
    height: Option<i64>,
    x_offset_start: Option<i64>,
    x_offset_finish: Option<i64>,
    y_offset_start: Option<i64>,
    y_offset_finish: Option<i64>,
    opacity: Option<f32>,
    enabled: Option<bool>,
}

/// Replace `slot` only when the source declared a value
fn overlay<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl DisplayDef {
    fn into_display(self) -> Display {
        // Defaults first, then only the fields present in the source
        let mut display = Display::with_defaults(self.name);

        let Display { center, rect, offsets, opacity, enabled, .. } = &mut display;
        overlay(center, self.center);
        overlay(&mut rect.left, self.left);
        overlay(&mut rect.top, self.top);
        overlay(&mut rect.width, self.width);
        overlay(&mut rect.height, self.height);
        overlay(&mut offsets.x_start, self.x_offset_start);
        overlay(&mut offsets.x_finish, self.x_offset_finish);
        overlay(&mut offsets.y_start, self.y_offset_start);
        overlay(&mut offsets.y_finish, self.y_offset_finish);
        overlay(opacity, self.opacity);
        overlay(enabled, self.enabled);

        display
    }
}

#[derive(Debug, Clone, Default)]
pub struct DisplayRegistry {
    displays: Vec<Display>,
}

impl DisplayRegistry {
    pub fn new(displays: Vec<Display>) -> Self {
        Self { displays }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| MfdError::io(path, e))?;
        let registry = Self::from_json(&contents).map_err(|e| MfdError::parse(path, e))?;
        info!(path = %path.display(), count = registry.len(), "Loaded display definitions");
        Ok(registry)
    }

    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        let defs: Vec<DisplayDef> = serde_json::from_str(contents)?;
        Ok(Self::new(defs.into_iter().map(DisplayDef::into_display).collect()))
    }

    /// First display, in load order, whose name is a prefix of `name`
    pub fn match_name(&self, name: &str) -> Option<DisplayId> {
        let found = self
            .displays
            .iter()
            .position(|display| name.starts_with(display.name.as_str()))
            .map(DisplayId);
        debug!(name = %name, display = ?found.map(|id| &self.displays[id.0].name), "Matched display");
        found
    }

    pub fn get(&self, id: DisplayId) -> Option<&Display> {
        self.displays.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Display> {
        self.displays.iter()
    }

    pub fn len(&self) -> usize {
        self.displays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }
}
