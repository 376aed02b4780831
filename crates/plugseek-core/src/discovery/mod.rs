//! Native plugin module discovery.
//!
//! Discovery walks a list of search paths, looks at every file with the
//! platform's native library extension and classifies it against three
//! wildcard sets:
//!
//! - **exclude**: rejected even though it looks like a module
//! - **load**: what counts as a module at all (everything, by default)
//! - **reloadable**: matched modules the loader should watch for changes
//!
//! Patterns are matched against the file stem. On platforms whose libraries
//! carry a `lib` prefix the stem is tried both with and without it, so the
//! pattern `"foo"` matches `libfoo.so`. The path reported to callbacks is
//! always the full canonical path, prefix included.
//!
//! ```no_run
//! use plugseek_core::discovery::{discover, DiscoveryCallbacks, SearchConfig};
//!
//! let config = SearchConfig::new()
//!     .with_search_paths(["plugins", "${HOME}/.plugseek/plugins"])
//!     .with_exclude_patterns(["*.broken"])
//!     .with_reloadable_patterns(["dev.*"]);
//!
//! let mut found = Vec::new();
//! let mut callbacks = DiscoveryCallbacks::new()
//!     .on_matched(|path, reloadable| found.push((path.to_path_buf(), reloadable)));
//!
//! assert!(discover(&config, &mut callbacks));
//! ```

pub mod env;
pub mod naming;
pub mod report;
pub mod walker;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::wildcard::match_any_form;

pub use env::{expand_env_vars, EnvLookup, ProcessEnv};
pub use naming::FilenamePolicy;
pub use report::{DiscoveryReport, MatchedModule};
pub use walker::{FileWalker, FsWalker, WalkAction};

/// Search paths used when a configuration does not name any. The empty path
/// is the application directory.
pub const DEFAULT_SEARCH_PATHS: &[&str] = &[""];

/// Load patterns used when a configuration does not name any.
pub const DEFAULT_LOAD_PATTERNS: &[&str] = &["*"];

/// Where and what to search for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Directories to search. Relative paths are resolved against the
    /// application directory. `${NAME}` is replaced with the environment
    /// variable `NAME`. `None` means [`DEFAULT_SEARCH_PATHS`].
    pub search_paths: Option<Vec<String>>,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Stem patterns that make a file a module. `None` means
    /// [`DEFAULT_LOAD_PATTERNS`].
    pub load_patterns: Option<Vec<String>>,
    /// Stem patterns that mark a matched module as reloadable.
    pub reloadable_patterns: Vec<String>,
    /// Stem patterns that reject a file outright.
    pub exclude_patterns: Vec<String>,
    /// Native library extension and prefix conventions.
    pub policy: FilenamePolicy,
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_load_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.load_patterns = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_reloadable_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reloadable_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exclude_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_policy(mut self, policy: FilenamePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Structural validation. An explicitly supplied but empty list of
    /// search paths or load patterns is a caller error, not a request for
    /// the defaults.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.search_paths.as_ref().is_some_and(Vec::is_empty) {
            return Err("search paths were given but the list is empty");
        }
        if self.load_patterns.as_ref().is_some_and(Vec::is_empty) {
            return Err("load patterns were given but the list is empty");
        }
        Ok(())
    }

    /// The search paths in effect, defaults applied.
    pub fn effective_search_paths(&self) -> Vec<String> {
        match &self.search_paths {
            Some(paths) => paths.clone(),
            None => DEFAULT_SEARCH_PATHS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The load patterns in effect, defaults applied.
    pub fn effective_load_patterns(&self) -> Vec<String> {
        match &self.load_patterns {
            Some(patterns) => patterns.clone(),
            None => DEFAULT_LOAD_PATTERNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// How one candidate file was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Classification {
    Matched { reloadable: bool },
    Excluded,
    Skipped,
}

/// A classified candidate.
///
/// `path` is canonical for matched and excluded files. Files rejected by the
/// extension pre-filter are never canonicalized and keep the walker's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub classification: Classification,
}

type PathCallback<'a> = Box<dyn FnMut(&Path) + 'a>;
type PathFlagCallback<'a> = Box<dyn FnMut(&Path, bool) + 'a>;

/// Hooks invoked during discovery. Only `on_matched` is required.
#[derive(Default)]
pub struct DiscoveryCallbacks<'a> {
    matched: Option<PathFlagCallback<'a>>,
    excluded: Option<PathCallback<'a>>,
    skipped: Option<PathCallback<'a>>,
    search_path: Option<PathFlagCallback<'a>>,
}

impl<'a> DiscoveryCallbacks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the canonical path and the reloadable flag of every
    /// accepted module.
    pub fn on_matched(mut self, f: impl FnMut(&Path, bool) + 'a) -> Self {
        self.matched = Some(Box::new(f));
        self
    }

    /// Called with the canonical path of every file rejected by an exclude
    /// pattern.
    pub fn on_excluded(mut self, f: impl FnMut(&Path) + 'a) -> Self {
        self.excluded = Some(Box::new(f));
        self
    }

    /// Called for files that do not look like modules: wrong extension or
    /// no load pattern matched.
    pub fn on_skipped(mut self, f: impl FnMut(&Path) + 'a) -> Self {
        self.skipped = Some(Box::new(f));
        self
    }

    /// Called with the resolved directory and the recursive flag before each
    /// search path is walked.
    pub fn on_search_path(mut self, f: impl FnMut(&Path, bool) + 'a) -> Self {
        self.search_path = Some(Box::new(f));
        self
    }

    fn entering(&mut self, dir: &Path, recursive: bool) {
        match self.search_path.as_mut() {
            Some(f) => f(dir, recursive),
            None => tracing::debug!(
                path = %dir.display(),
                recursive,
                "Searching plugins {}in folder",
                if recursive { "recursively " } else { "" }
            ),
        }
    }

    fn report(&mut self, candidate: &Candidate) {
        match candidate.classification {
            Classification::Matched { reloadable } => {
                if let Some(f) = self.matched.as_mut() {
                    f(&candidate.path, reloadable);
                }
            }
            Classification::Excluded => match self.excluded.as_mut() {
                Some(f) => f(&candidate.path),
                None => tracing::debug!(
                    path = %candidate.path.display(),
                    "Excluding potential plugin file"
                ),
            },
            Classification::Skipped => {
                if let Some(f) = self.skipped.as_mut() {
                    f(&candidate.path);
                }
            }
        }
    }
}

/// Runs discovery passes with a given walker, application directory and
/// environment.
pub struct ModuleFinder<W = FsWalker> {
    walker: W,
    app_dir: PathBuf,
    env: Box<dyn EnvLookup + Send + Sync>,
}

impl ModuleFinder<FsWalker> {
    /// A finder over the real filesystem and process environment, resolving
    /// relative paths against the executable's directory.
    pub fn new() -> Self {
        Self::with_walker(FsWalker::default())
    }
}

impl Default for ModuleFinder<FsWalker> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: FileWalker> ModuleFinder<W> {
    pub fn with_walker(walker: W) -> Self {
        Self {
            walker,
            app_dir: default_app_dir(),
            env: Box::new(ProcessEnv),
        }
    }

    /// Directory relative search paths are resolved against.
    pub fn with_app_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.app_dir = dir.into();
        self
    }

    /// Environment used for `${NAME}` expansion.
    pub fn with_env(mut self, env: impl EnvLookup + Send + Sync + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// Walk every search path and report each candidate through `callbacks`.
    ///
    /// Each file is reported at most once per call, keyed by canonical path,
    /// even when links or overlapping search paths lead to it repeatedly.
    ///
    /// Returns `false` without touching the filesystem when the configuration
    /// is structurally invalid or no `on_matched` callback was given.
    /// Otherwise returns `true` once every search path has been walked, even
    /// if nothing was found.
    pub fn discover(&self, config: &SearchConfig, callbacks: &mut DiscoveryCallbacks<'_>) -> bool {
        if let Err(reason) = config.validate() {
            tracing::error!(reason, "Invalid plugin search configuration");
            return false;
        }
        if callbacks.matched.is_none() {
            tracing::error!("Plugin discovery requires an on_matched callback");
            return false;
        }

        let load_patterns = config.effective_load_patterns();
        // A file reachable through links or overlapping search paths is
        // reported once, on first sight.
        let mut seen = HashSet::new();
        for search_path in config.effective_search_paths() {
            let dir = self.resolve_search_path(&search_path);
            callbacks.entering(&dir, config.recursive);

            self.walker.walk(&dir, config.recursive, &mut |path| {
                let Some(candidate) = self.classify_with(config, &load_patterns, path) else {
                    return WalkAction::Continue;
                };
                if seen.insert(candidate.path.clone()) {
                    callbacks.report(&candidate);
                } else {
                    tracing::trace!(path = %candidate.path.display(), "Candidate already reported");
                }
                WalkAction::Continue
            });
        }

        true
    }

    /// Run a pass and collect every outcome into a [`DiscoveryReport`].
    ///
    /// Returns `None` when the configuration is structurally invalid.
    pub fn collect(&self, config: &SearchConfig) -> Option<DiscoveryReport> {
        let mut matched = Vec::new();
        let mut excluded = Vec::new();
        let mut skipped = Vec::new();
        let mut search_paths = Vec::new();

        let mut callbacks = DiscoveryCallbacks::new()
            .on_matched(|path, reloadable| {
                matched.push(MatchedModule {
                    path: path.to_path_buf(),
                    reloadable,
                })
            })
            .on_excluded(|path| excluded.push(path.to_path_buf()))
            .on_skipped(|path| skipped.push(path.to_path_buf()))
            .on_search_path(|path, _| search_paths.push(path.to_path_buf()));

        let ok = self.discover(config, &mut callbacks);
        drop(callbacks);

        ok.then(|| DiscoveryReport {
            search_paths,
            matched,
            excluded,
            skipped,
        })
    }

    /// Classify a single file the way a discovery pass would.
    ///
    /// Returns `None` for files that pass the extension filter but cannot be
    /// canonicalized; a pass drops those silently.
    pub fn classify(&self, config: &SearchConfig, path: &Path) -> Option<Candidate> {
        self.classify_with(config, &config.effective_load_patterns(), path)
    }

    fn classify_with(
        &self,
        config: &SearchConfig,
        load_patterns: &[String],
        path: &Path,
    ) -> Option<Candidate> {
        let policy = &config.policy;

        if !policy.has_native_extension(path) {
            return Some(Candidate {
                path: path.to_path_buf(),
                classification: Classification::Skipped,
            });
        }

        let canonical = self.walker.canonicalize(path)?;
        let forms = policy.stem_forms(&canonical);

        let classification = if match_any_form(&forms, &config.exclude_patterns) {
            Classification::Excluded
        } else if !match_any_form(&forms, load_patterns) {
            Classification::Skipped
        } else {
            Classification::Matched {
                reloadable: match_any_form(&forms, &config.reloadable_patterns),
            }
        };

        Some(Candidate {
            path: canonical,
            classification,
        })
    }

    fn resolve_search_path(&self, search_path: &str) -> PathBuf {
        let expanded = expand_env_vars(search_path, &*self.env);
        if expanded.is_empty() {
            return self.app_dir.clone();
        }

        let path = Path::new(&expanded);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.app_dir.join(path)
        }
    }
}

/// Discover modules on the real filesystem with the process environment.
///
/// See [`ModuleFinder::discover`].
pub fn discover(config: &SearchConfig, callbacks: &mut DiscoveryCallbacks<'_>) -> bool {
    ModuleFinder::new().discover(config, callbacks)
}

fn default_app_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
