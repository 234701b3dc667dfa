//! Scan configuration: well-known marker paths and heuristic patterns.

use std::path::PathBuf;

/// Archive-root-relative paths consulted by the targeted checks.
///
/// Matching is exact and case-sensitive. Defaults describe the Forge and
/// Fabric ecosystems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPaths {
    /// Coremods manifest (JSON object of name to script path).
    pub core_hooks_manifest: String,

    /// Access transformer file.
    pub binary_patch_spec: String,

    /// Service declaration directory.
    pub services_dir: String,

    /// Platform-A (Fabric) descriptor.
    pub platform_a_descriptor: String,

    /// Platform-B (Forge) descriptor.
    pub platform_b_descriptor: String,

    /// Legacy Platform-B (Forge 1.12 and older) descriptor.
    pub legacy_platform_b_descriptor: String,

    /// Package path left behind by the MCreator generator.
    pub generator_marker: String,
}

impl Default for MarkerPaths {
    /// Default values:
    /// - `core_hooks_manifest`: `/META-INF/coremods.json`
    /// - `binary_patch_spec`: `/META-INF/accesstransformer.cfg`
    /// - `services_dir`: `/META-INF/services`
    /// - `platform_a_descriptor`: `/fabric.mod.json`
    /// - `platform_b_descriptor`: `/META-INF/mods.toml`
    /// - `legacy_platform_b_descriptor`: `/mcmod.info`
    /// - `generator_marker`: `/net/mcreator`
    fn default() -> Self {
        Self {
            core_hooks_manifest: "/META-INF/coremods.json".to_string(),
            binary_patch_spec: "/META-INF/accesstransformer.cfg".to_string(),
            services_dir: "/META-INF/services".to_string(),
            platform_a_descriptor: "/fabric.mod.json".to_string(),
            platform_b_descriptor: "/META-INF/mods.toml".to_string(),
            legacy_platform_b_descriptor: "/mcmod.info".to_string(),
            generator_marker: "/net/mcreator".to_string(),
        }
    }
}

/// File name patterns used by the full-tree walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicPatterns {
    /// Suffix of classes emitted by the generator tool.
    pub generator_class_suffix: String,

    /// Suffix of weaving configuration files.
    pub weaving_manifest_suffix: String,

    /// Substring identifying weaving reference maps.
    pub refmap_marker: String,

    /// Prefix of weaving configuration files (only for `.json` names).
    pub weaving_json_prefix: String,
}

impl Default for HeuristicPatterns {
    fn default() -> Self {
        Self {
            generator_class_suffix: "ModElement.class".to_string(),
            weaving_manifest_suffix: "mixins.json".to_string(),
            refmap_marker: "refmap".to_string(),
            weaving_json_prefix: "mixins".to_string(),
        }
    }
}

impl HeuristicPatterns {
    /// Returns `true` if `file_name` looks like a generated element class.
    #[must_use]
    pub fn is_generator_element(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.generator_class_suffix)
    }

    /// Returns `true` if `file_name` looks like weaving metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// use modsurvey_core::HeuristicPatterns;
    ///
    /// let patterns = HeuristicPatterns::default();
    /// assert!(patterns.is_weaving_metadata("examplemod.mixins.json"));
    /// assert!(patterns.is_weaving_metadata("examplemod-refmap.json"));
    /// assert!(patterns.is_weaving_metadata("mixins.client.json"));
    /// assert!(!patterns.is_weaving_metadata("mixins.txt"));
    /// ```
    #[must_use]
    pub fn is_weaving_metadata(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.weaving_manifest_suffix)
            || file_name.contains(&self.refmap_marker)
            || (file_name.ends_with(".json") && file_name.starts_with(&self.weaving_json_prefix))
    }
}

/// What to do when the full-tree walk of an archive fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkFailurePolicy {
    /// Classify on the remaining signals with both heuristics unset.
    #[default]
    BestEffort,
    /// Fail the archive and keep it out of the batch totals.
    FailArchive,
}

/// Configuration for scanning a single archive.
///
/// # Examples
///
/// ```
/// use modsurvey_core::ScanConfig;
/// use modsurvey_core::WalkFailurePolicy;
///
/// let config = ScanConfig::default()
///     .with_output_root(Some("output".into()))
///     .with_walk_failure(WalkFailurePolicy::FailArchive);
/// assert!(config.output_root.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Well-known paths for the targeted checks.
    pub markers: MarkerPaths,

    /// Patterns for the full-tree walk.
    pub patterns: HeuristicPatterns,

    /// Root under which per-archive folders are created. `None` disables
    /// extraction; detection still runs.
    pub output_root: Option<PathBuf>,

    /// Behavior on walk failure.
    pub walk_failure: WalkFailurePolicy,
}

impl ScanConfig {
    /// Sets the extraction output root.
    #[must_use]
    pub fn with_output_root(mut self, output_root: Option<PathBuf>) -> Self {
        self.output_root = output_root;
        self
    }

    /// Sets the walk failure policy.
    #[must_use]
    pub fn with_walk_failure(mut self, policy: WalkFailurePolicy) -> Self {
        self.walk_failure = policy;
        self
    }

    /// Replaces the marker paths.
    #[must_use]
    pub fn with_markers(mut self, markers: MarkerPaths) -> Self {
        self.markers = markers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers() {
        let markers = MarkerPaths::default();
        assert_eq!(markers.platform_b_descriptor, "/META-INF/mods.toml");
        assert_eq!(markers.legacy_platform_b_descriptor, "/mcmod.info");
        assert_eq!(markers.platform_a_descriptor, "/fabric.mod.json");
    }

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert!(config.output_root.is_none());
        assert_eq!(config.walk_failure, WalkFailurePolicy::BestEffort);
    }

    #[test]
    fn test_generator_element() {
        let patterns = HeuristicPatterns::default();
        assert!(patterns.is_generator_element("ExampleItemModElement.class"));
        assert!(!patterns.is_generator_element("ModElement.java"));
        assert!(!patterns.is_generator_element("ExampleItem.class"));
    }

    #[test]
    fn test_weaving_json_prefix_needs_json_extension() {
        let patterns = HeuristicPatterns::default();
        assert!(patterns.is_weaving_metadata("mixins.common.json"));
        assert!(!patterns.is_weaving_metadata("mixins.common.toml"));
        assert!(!patterns.is_weaving_metadata("examplemod.json"));
    }

    #[test]
    fn test_refmap_anywhere_in_name() {
        let patterns = HeuristicPatterns::default();
        assert!(patterns.is_weaving_metadata("examplemod.refmap.json"));
        assert!(patterns.is_weaving_metadata("refmap"));
    }
}
