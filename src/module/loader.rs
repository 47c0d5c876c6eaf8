//! Module catalog loading
//!
//! Every `.json` file below the module root holds a `{"modules": [...]}`
//! wrapper. Each module's category is the file's directory relative to the
//! root. Modules are resolved as soon as they are parsed. One malformed
//! file aborts the whole load.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::constants::modules::FILE_EXTENSION;
use crate::error::{MfdError, Result};
use crate::module::resolver::Resolver;
use crate::module::{Catalog, Module, ModuleFile};
use crate::paths::to_forward_slashes;

/// Where module files come from
pub trait ModuleSource {
    fn root(&self) -> &Path;

    /// Module files below the root, in visitation order
    fn module_files(&self) -> Result<Vec<PathBuf>>;

    fn read(&self, path: &Path) -> Result<String>;
}

/// Module files on disk, visited in directory-walk order
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ModuleSource for FsSource {
    fn root(&self) -> &Path {
        &self.root
    }

    fn module_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|source| MfdError::Walk { root: self.root.clone(), source })?;
            if entry.file_type().is_file() && has_module_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| MfdError::io(path, e))
    }
}

fn has_module_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == FILE_EXTENSION)
}

/// Directory of `file` relative to `root`, `/`-separated; empty at the root
pub fn category_for(root: &Path, file: &Path) -> String {
    let dir = file.parent().unwrap_or(Path::new(""));
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    to_forward_slashes(&relative.to_string_lossy())
}

/// Parse and resolve every module below the source's root
pub fn load_catalog(source: &dyn ModuleSource, resolver: &Resolver<'_>) -> Result<Catalog> {
    let mut catalog = Catalog::default();

    for path in source.module_files()? {
        let contents = source.read(&path)?;
        let file = ModuleFile::from_json(&contents).map_err(|e| MfdError::parse(&path, e))?;
        let category = category_for(source.root(), &path);

        debug!(path = %path.display(), category = %category, modules = file.modules.len(), "Parsed module file");

        for def in file.modules {
            let mut module = Module::from_def(def, category.clone());
            resolver.resolve_module(catalog.next_id(), &mut module)?;
            catalog.push(module);
        }
    }

    info!(root = %source.root().display(), count = catalog.len(), "Loaded module definitions");
    Ok(catalog)
}
