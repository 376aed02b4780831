//! Platform filename conventions for native libraries.
//!
//! The policy is chosen once (usually [`FilenamePolicy::native`]) and handed
//! to discovery, so the matching code itself stays platform-agnostic and the
//! POSIX and Windows conventions can both be exercised on any host.

use std::path::Path;

/// Native library filename conventions: the file extension and any prefixes
/// that are not part of the logical module name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenamePolicy {
    extension: String,
    ignore_prefixes: Vec<String>,
}

impl FilenamePolicy {
    /// Create a policy. `extension` includes the leading dot (`".so"`).
    pub fn new<I, S>(extension: impl Into<String>, ignore_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extension: extension.into(),
            ignore_prefixes: ignore_prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// Linux and other ELF platforms: `libfoo.so`.
    pub fn posix() -> Self {
        Self::new(".so", ["lib"])
    }

    /// macOS: `libfoo.dylib`.
    pub fn macos() -> Self {
        Self::new(".dylib", ["lib"])
    }

    /// Windows: `foo.dll`, no prefix.
    pub fn windows() -> Self {
        Self::new(".dll", Vec::<String>::new())
    }

    /// The conventions of the platform this binary was built for.
    pub fn native() -> Self {
        Self::new(std::env::consts::DLL_SUFFIX, [std::env::consts::DLL_PREFIX])
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn ignore_prefixes(&self) -> &[String] {
        &self.ignore_prefixes
    }

    /// Whether the file name ends with the native library extension,
    /// compared ASCII case-insensitively.
    pub fn has_native_extension(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy();
        let (name, ext) = (name.as_bytes(), self.extension.as_bytes());
        name.len() >= ext.len() && name[name.len() - ext.len()..].eq_ignore_ascii_case(ext)
    }

    /// The file name without directory and extension.
    ///
    /// When the name carries the native extension exactly that suffix is
    /// removed, otherwise the last extension is.
    pub fn stem(&self, path: &Path) -> Option<String> {
        let name = path.file_name()?.to_string_lossy();
        if self.has_native_extension(path) {
            let cut = name.len() - self.extension.len();
            if name.is_char_boundary(cut) {
                return Some(name[..cut].to_string());
            }
        }
        path.file_stem().map(|s| s.to_string_lossy().into_owned())
    }

    /// Every spelling of the stem that patterns are tried against: the stem
    /// itself, then the stem with each matching ignorable prefix removed.
    pub fn stem_forms(&self, path: &Path) -> Vec<String> {
        let Some(stem) = self.stem(path) else {
            return Vec::new();
        };

        let mut forms = vec![stem.clone()];
        forms.extend(
            self.ignore_prefixes
                .iter()
                .filter_map(|prefix| stem.strip_prefix(prefix.as_str()))
                .map(str::to_string),
        );
        forms
    }

    /// The logical module name: the stem with the first matching ignorable
    /// prefix removed.
    pub fn module_name(&self, path: &Path) -> Option<String> {
        let stem = self.stem(path)?;
        let name = self
            .ignore_prefixes
            .iter()
            .find_map(|prefix| stem.strip_prefix(prefix.as_str()))
            .unwrap_or(&stem);
        Some(name.to_string())
    }
}

impl Default for FilenamePolicy {
    fn default() -> Self {
        Self::native()
    }
}
