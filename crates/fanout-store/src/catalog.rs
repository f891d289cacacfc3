//! Spec catalog: immutable lookup table of canonical placement specs.
//!
//! The built-in library is defined in `specs.toml` and embedded in the
//! binary at compile time. A catalog can also be loaded from a TOML file
//! on disk (same schema) or built directly from definitions in tests.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::SpecDefinition;

/// The embedded spec library TOML.
static SPECS_TOML: &str = include_str!("specs.toml");

/// Container for (de)serializing a spec library TOML file.
#[derive(Debug, Serialize, Deserialize)]
struct SpecLibraryFile {
    specs: Vec<SpecDefinition>,
}

/// Read-only lookup table of canonical placement specifications.
///
/// Lookup is a total function over the key space: an absent ID is not an
/// error, it means "this environment cannot be produced" and callers skip
/// it. Iteration order is the definition order of the source file.
#[derive(Debug, Clone)]
pub struct SpecCatalog {
    specs: Vec<SpecDefinition>,
    by_id: HashMap<String, usize>,
}

impl SpecCatalog {
    /// Build a catalog from an explicit list of definitions.
    ///
    /// Later definitions win when IDs collide, matching the semantics of
    /// re-declaring a key in a lookup table.
    pub fn from_specs(specs: Vec<SpecDefinition>) -> Self {
        let mut catalog = Self {
            specs: Vec::with_capacity(specs.len()),
            by_id: HashMap::with_capacity(specs.len()),
        };
        for spec in specs {
            match catalog.by_id.get(&spec.id) {
                Some(&idx) => catalog.specs[idx] = spec,
                None => {
                    catalog.by_id.insert(spec.id.clone(), catalog.specs.len());
                    catalog.specs.push(spec);
                }
            }
        }
        catalog
    }

    /// Load the built-in spec library embedded at compile time.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed. This is a compile-time
    /// invariant -- if the binary was built, the TOML is valid.
    pub fn embedded() -> Self {
        let lib: SpecLibraryFile =
            toml::from_str(SPECS_TOML).expect("embedded specs.toml is invalid");
        Self::from_specs(lib.specs)
    }

    /// Load a catalog from a TOML file on disk (same schema as the embedded
    /// library).
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read spec library at {}", path.display()))?;
        let lib: SpecLibraryFile = toml::from_str(&contents)
            .with_context(|| format!("failed to parse spec library at {}", path.display()))?;
        Ok(Self::from_specs(lib.specs))
    }

    /// Write the catalog to a TOML file on disk, in the same schema
    /// `from_path` reads.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let lib = SpecLibraryFile {
            specs: self.specs.clone(),
        };
        let contents = toml::to_string_pretty(&lib).context("failed to serialize spec library")?;
        std::fs::write(path, &contents)
            .with_context(|| format!("failed to write spec library at {}", path.display()))?;
        Ok(())
    }

    /// Look up a spec by its canonical ID. Absence is not an error.
    pub fn lookup(&self, spec_id: &str) -> Option<&SpecDefinition> {
        self.by_id.get(spec_id).map(|&idx| &self.specs[idx])
    }

    /// Whether the catalog contains the given canonical ID.
    pub fn contains(&self, spec_id: &str) -> bool {
        self.by_id.contains_key(spec_id)
    }

    /// All canonical IDs, in definition order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.id.as_str())
    }

    /// All spec definitions, in definition order.
    pub fn all(&self) -> &[SpecDefinition] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Derive a fresh canonical ID for a new spec: `PLATFORM_PLACEMENT`
    /// uppercased with spaces collapsed, suffixed `_n` until unique.
    pub fn derive_id(&self, platform: &str, placement: &str) -> String {
        let base = format!("{platform}_{placement}")
            .to_uppercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        if !self.contains(&base) {
            return base;
        }
        let mut suffix = 1;
        loop {
            let candidate = format!("{base}_{suffix}");
            if !self.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

impl Default for SpecCatalog {
    fn default() -> Self {
        Self::embedded()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
