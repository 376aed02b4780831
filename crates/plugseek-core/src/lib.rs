//! plugseek Core Crate
//!
//! Finds native plugin libraries on disk and decides which of them to load.
//!
//! ## Features
//!
//! - **Wildcard Matching**: `*` and `?` patterns over names
//! - **Discovery**: walks search paths, classifies libraries as matched,
//!   excluded or skipped, and flags reloadable ones
//! - **Version Compatibility**: `major.minor` interface checks with special
//!   handling for the unstable `0.x` line
//! - **Registry**: records discovered modules and the interfaces they
//!   provide and require
//! - **Configuration**: TOML plugin settings with environment overrides
//! - **Logging**: wildcard-filtered log channels on top of `tracing`
//!
//! ## Example
//!
//! ```rust,no_run
//! use plugseek_core::logging::LevelFilter;
//! use plugseek_core::{ModuleFinder, ModuleRegistry, PluginLoadingConfig};
//!
//! fn main() -> plugseek_core::Result<()> {
//!     let mut config = PluginLoadingConfig::load("plugins.toml")?;
//!     config.apply_env_overrides()?;
//!     plugseek_core::logging::try_init(&config.channel_filters(), LevelFilter::INFO)?;
//!
//!     let search = config.to_search_config();
//!     let Some(report) = ModuleFinder::new().collect(&search) else {
//!         return Ok(());
//!     };
//!
//!     let mut registry = ModuleRegistry::new();
//!     registry.register_report(&report, &search.policy);
//!     for module in registry.iter() {
//!         println!("{} -> {}", module.name, module.path.display());
//!     }
//!     Ok(())
//! }
//! ```

pub mod channel_filter;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod registry;
pub mod version;
pub mod wildcard;

pub use channel_filter::{ChannelFilter, ChannelFilterList, ChannelLevel, ChannelSetting};
pub use config::PluginLoadingConfig;
pub use discovery::{
    discover, Classification, DiscoveryCallbacks, DiscoveryReport, FilenamePolicy, FileWalker,
    FsWalker, MatchedModule, ModuleFinder, SearchConfig, WalkAction,
};
pub use error::{Error, Result};
pub use registry::{InterfaceDesc, ModuleRecord, ModuleRegistry};
pub use version::{compare, is_compatible, Compatibility, Version};
pub use wildcard::{is_wildcard_pattern, match_wildcard, match_wildcards};
