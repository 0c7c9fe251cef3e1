//! The TypeScript modules generated files import their helper types from.
//!
//! They ship inside the binary and are written out with `--emit-helpers`,
//! under `<dir>/types/<name>.ts`, so that `--import <dir>` resolves.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub struct HelperModule {
    /// File stem under `types/`, as used by [`crate::writer::helper_module`].
    pub name: &'static str,
    pub source: &'static str,
}

pub const HELPER_MODULES: [HelperModule; 6] = [
    HelperModule { name: "brand", source: include_str!("../assets/types/brand.ts") },
    HelperModule { name: "utils", source: include_str!("../assets/types/utils.ts") },
    HelperModule { name: "json", source: include_str!("../assets/types/json.ts") },
    HelperModule { name: "headers", source: include_str!("../assets/types/headers.ts") },
    HelperModule { name: "url_search_params", source: include_str!("../assets/types/url_search_params.ts") },
    HelperModule { name: "urlsearchparams", source: include_str!("../assets/types/urlsearchparams.ts") },
];

pub fn find(name: &str) -> Option<&'static HelperModule> {
    HELPER_MODULES.iter().find(|module| module.name == name)
}

impl HelperModule {
    /// Whether the module declares `export type <name>`.
    pub fn exports(&self, name: &str) -> bool {
        self.source.contains(&format!("export type {name}<")) || self.source.contains(&format!("export type {name} "))
    }
}

/// Write every helper module to `<dir>/types/`. Returns the written paths.
pub fn write_helpers(dir: &Path) -> Result<Vec<PathBuf>> {
    let types = dir.join("types");
    std::fs::create_dir_all(&types).with_context(|| format!("failed to create directory {}", types.display()))?;
    HELPER_MODULES
        .iter()
        .map(|module| {
            let path = types.join(format!("{}.ts", module.name));
            std::fs::write(&path, module.source).with_context(|| format!("failed to write {}", path.display()))?;
            Ok(path)
        })
        .collect()
}
