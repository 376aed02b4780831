//! Registry of discovered modules and the interfaces they provide.
//!
//! The registry only records data. It answers which modules can provide an
//! interface at a given version and which requirements are left unsatisfied;
//! load ordering is up to the caller.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discovery::{DiscoveryReport, FilenamePolicy};
use crate::error::{Error, Result};
use crate::version::{compare, Compatibility, Version};

/// A named interface at a specific version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceDesc {
    pub name: String,
    pub version: Version,
}

impl InterfaceDesc {
    pub fn new(name: impl Into<String>, version: impl Into<Version>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// A module known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Logical name: the file stem without ignorable prefixes.
    pub name: String,
    /// Canonical library path.
    pub path: PathBuf,
    pub reloadable: bool,
    /// Interfaces this module implements.
    #[serde(default)]
    pub provides: Vec<InterfaceDesc>,
    /// Interfaces this module needs from others.
    #[serde(default)]
    pub requires: Vec<InterfaceDesc>,
}

impl ModuleRecord {
    /// Build a record for a discovered library, deriving its name from the
    /// path under `policy`.
    pub fn from_discovered(
        path: impl Into<PathBuf>,
        reloadable: bool,
        policy: &FilenamePolicy,
    ) -> Result<Self> {
        let path = path.into();
        let name = policy
            .module_name(&path)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::InvalidModule {
                path: path.display().to_string(),
                reason: "no module name in file name".to_string(),
            })?;

        Ok(Self {
            name,
            path,
            reloadable,
            provides: Vec::new(),
            requires: Vec::new(),
        })
    }

    pub fn with_provides(mut self, interface: InterfaceDesc) -> Self {
        self.provides.push(interface);
        self
    }

    pub fn with_requires(mut self, interface: InterfaceDesc) -> Self {
        self.requires.push(interface);
        self
    }
}

/// Owned collection of module records keyed by logical name.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, ModuleRecord>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module. Fails if a module with the same name is present.
    pub fn register(&mut self, record: ModuleRecord) -> Result<()> {
        if self.modules.contains_key(&record.name) {
            return Err(Error::AlreadyRegistered(record.name));
        }

        tracing::debug!(
            module = %record.name,
            path = %record.path.display(),
            reloadable = record.reloadable,
            "Registered module"
        );
        self.modules.insert(record.name.clone(), record);
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> Result<ModuleRecord> {
        self.modules
            .remove(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&ModuleRecord> {
        self.modules.get(name)
    }

    /// Find the record registered for a library path.
    pub fn get_by_path(&self, path: &Path) -> Option<&ModuleRecord> {
        self.modules.values().find(|m| m.path == path)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Records in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.values()
    }

    /// Register every matched module of a discovery pass.
    ///
    /// A library whose logical name is already taken (the same module found
    /// in two search paths) is logged and skipped; the first one wins.
    /// Returns the number of newly registered modules.
    pub fn register_report(&mut self, report: &DiscoveryReport, policy: &FilenamePolicy) -> usize {
        let mut added = 0;
        for matched in &report.matched {
            let record = match ModuleRecord::from_discovered(&matched.path, matched.reloadable, policy)
            {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(path = %matched.path.display(), error = %e, "Skipping module");
                    continue;
                }
            };

            match self.register(record) {
                Ok(()) => added += 1,
                Err(e) => {
                    tracing::warn!(path = %matched.path.display(), error = %e, "Skipping module");
                }
            }
        }
        added
    }

    /// Modules providing a version of `interface` compatible with the
    /// requested one, with the verdict for each. Warnings are kept in the
    /// verdict but not logged; this is a query, not a load.
    pub fn providers(&self, interface: &InterfaceDesc) -> Vec<(&ModuleRecord, Compatibility)> {
        self.modules
            .values()
            .filter_map(|module| {
                module
                    .provides
                    .iter()
                    .filter(|p| p.name == interface.name)
                    .map(|p| compare(&interface.name, interface.version, p.version))
                    .find(Compatibility::is_compatible)
                    .map(|verdict| (module, verdict))
            })
            .collect()
    }

    /// Requirements of module `name` that no other registered module can
    /// satisfy.
    pub fn unsatisfied_requirements(&self, name: &str) -> Result<Vec<&InterfaceDesc>> {
        let module = self
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        Ok(module
            .requires
            .iter()
            .filter(|req| {
                self.providers(req)
                    .iter()
                    .all(|(provider, _)| provider.name == module.name)
            })
            .collect())
    }
}
