//! Signal gathering for a single archive.
//!
//! [`SignalScanner::scan`] combines cheap targeted lookups at well-known
//! paths with exactly one full-tree walk. The walk stops as soon as both
//! heuristic markers have been seen, since no later entry can change them.

use log::debug;
use log::info;
use log::warn;
use serde_json::Value;

use crate::ArchiveTree;
use crate::PayloadExtractor;
use crate::Result;
use crate::ScanConfig;
use crate::ScanError;
use crate::WalkFailurePolicy;
use crate::tree::file_name;

/// Name under which the access transformer is written to the output folder.
pub const BINARY_PATCH_SPEC_FILE_NAME: &str = "accesstransformer.cfg";

/// One entry of a coremods manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreHook {
    /// Coremod name (manifest key).
    pub name: String,

    /// Archive-relative path of the script.
    pub path: String,
}

/// A coremods manifest that parsed as an object of name to script path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreHooksManifest {
    hooks: Vec<CoreHook>,
}

impl CoreHooksManifest {
    /// Parses manifest bytes.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the bytes are not JSON, not
    /// an object, or hold a non-string value.
    ///
    /// # Examples
    ///
    /// ```
    /// use modsurvey_core::CoreHooksManifest;
    ///
    /// let manifest = CoreHooksManifest::parse(br#"{"foo": "scripts/foo.js"}"#).unwrap();
    /// assert_eq!(manifest.hooks()[0].path, "scripts/foo.js");
    ///
    /// assert!(CoreHooksManifest::parse(b"[]").is_err());
    /// ```
    pub fn parse(bytes: &[u8]) -> std::result::Result<Self, String> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| format!("invalid JSON: {e}"))?;

        let map = match value {
            Value::Object(map) => map,
            other => return Err(format!("expected an object, found {}", kind(&other))),
        };

        let hooks = map
            .into_iter()
            .map(|(name, value)| match value {
                Value::String(path) => Ok(CoreHook { name, path }),
                other => Err(format!(
                    "entry `{name}` is {} instead of a path",
                    kind(&other)
                )),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { hooks })
    }

    /// Declared coremods, in manifest order.
    #[must_use]
    pub fn hooks(&self) -> &[CoreHook] {
        &self.hooks
    }

    /// Number of declared coremods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns `true` if the manifest declares no coremods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Everything the scanner learned about one archive, before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSignals {
    /// Parsed coremods manifest, if the archive has one.
    pub core_hooks_manifest: Option<CoreHooksManifest>,

    /// Raw access transformer bytes, if the archive has one.
    pub binary_patch_spec: Option<Vec<u8>>,

    /// Files under the services directory. Informational only.
    pub services: Vec<String>,

    /// Fabric descriptor present.
    pub platform_a_descriptor: bool,

    /// Forge descriptor present.
    pub platform_b_descriptor: bool,

    /// Legacy Forge descriptor present.
    pub legacy_platform_b_descriptor: bool,

    /// Generator package path present.
    pub generator_marker_by_path: bool,

    /// A generated element class was seen during the walk.
    pub generator_marker_by_heuristic: bool,

    /// Weaving metadata was seen during the walk.
    pub weaving_marker_by_heuristic: bool,

    /// `false` if the walk failed and the heuristics fell back to unset.
    pub walk_completed: bool,
}

#[derive(Debug, Default)]
struct WalkFindings {
    generator: bool,
    weaving: bool,
}

/// Runs every classification check against an archive tree.
#[derive(Debug)]
pub struct SignalScanner {
    config: ScanConfig,
    extractor: Option<PayloadExtractor>,
}

impl SignalScanner {
    /// Creates a scanner. Extraction is enabled iff `config.output_root` is
    /// set.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        let extractor = config.output_root.clone().map(PayloadExtractor::new);
        Self { config, extractor }
    }

    /// Returns the scan configuration.
    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Returns the payload extractor, if extraction is enabled.
    #[must_use]
    pub fn extractor(&self) -> Option<&PayloadExtractor> {
        self.extractor.as_ref()
    }

    /// Gathers raw signals from `tree`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::MalformedManifest`] if the coremods manifest is
    /// not an object of name to path (nothing is extracted in that case),
    /// [`ScanError::WalkFailure`] if the walk fails under
    /// [`WalkFailurePolicy::FailArchive`], or an I/O error if a present entry
    /// cannot be decoded.
    pub fn scan<T: ArchiveTree + ?Sized>(&self, tree: &mut T) -> Result<RawSignals> {
        let markers = &self.config.markers;

        let core_hooks_manifest = self.check_core_hooks(tree)?;
        let binary_patch_spec = self.check_binary_patch_spec(tree)?;
        let services = self.list_services(tree);

        let mut signals = RawSignals {
            core_hooks_manifest,
            binary_patch_spec,
            services,
            platform_a_descriptor: tree.exists(&markers.platform_a_descriptor),
            platform_b_descriptor: tree.exists(&markers.platform_b_descriptor),
            legacy_platform_b_descriptor: tree.exists(&markers.legacy_platform_b_descriptor),
            generator_marker_by_path: tree.exists(&markers.generator_marker),
            ..RawSignals::default()
        };

        match self.walk(tree) {
            Ok(findings) => {
                signals.generator_marker_by_heuristic = findings.generator;
                signals.weaving_marker_by_heuristic = findings.weaving;
                signals.walk_completed = true;
            }
            Err(e) => match self.config.walk_failure {
                WalkFailurePolicy::BestEffort => {
                    warn!(
                        "Walk of {} failed, heuristics left unset: {e}",
                        tree.identity()
                    );
                }
                WalkFailurePolicy::FailArchive => return Err(e),
            },
        }

        Ok(signals)
    }

    fn check_core_hooks<T: ArchiveTree + ?Sized>(
        &self,
        tree: &mut T,
    ) -> Result<Option<CoreHooksManifest>> {
        let path = &self.config.markers.core_hooks_manifest;
        let Some(bytes) = read_optional(tree, path)? else {
            return Ok(None);
        };

        let identity = tree.identity().to_string();
        info!("Found coremods manifest in {identity}");
        debug!("{}", String::from_utf8_lossy(&bytes));

        let manifest =
            CoreHooksManifest::parse(&bytes).map_err(|reason| ScanError::MalformedManifest {
                path: path.clone(),
                reason,
            })?;

        if let Some(extractor) = &self.extractor {
            for hook in manifest.hooks() {
                match extractor.extract(tree, &hook.path) {
                    Ok(file) => info!(
                        "Found coremod {} in {identity}, extracted to {}",
                        hook.name,
                        file.path.display()
                    ),
                    Err(e) => warn!("Skipping coremod {} in {identity}: {e}", hook.name),
                }
            }
        }

        Ok(Some(manifest))
    }

    fn check_binary_patch_spec<T: ArchiveTree + ?Sized>(
        &self,
        tree: &mut T,
    ) -> Result<Option<Vec<u8>>> {
        let path = &self.config.markers.binary_patch_spec;
        let Some(bytes) = read_optional(tree, path)? else {
            return Ok(None);
        };

        if let Some(extractor) = &self.extractor
            && let Err(e) = extractor.extract_as(tree, path, BINARY_PATCH_SPEC_FILE_NAME)
        {
            warn!(
                "Failed to extract access transformer from {}: {e}",
                tree.identity()
            );
        }

        Ok(Some(bytes))
    }

    fn list_services<T: ArchiveTree + ?Sized>(&self, tree: &mut T) -> Vec<String> {
        let dir = &self.config.markers.services_dir;
        if !tree.exists(dir) {
            return Vec::new();
        }

        let identity = tree.identity().to_string();
        let mut services = Vec::new();
        match tree.walk(dir) {
            Ok(entries) => {
                for entry in entries {
                    match entry {
                        Ok(path) => {
                            debug!("Service in {identity}: {path}");
                            services.push(path);
                        }
                        Err(e) => {
                            debug!("Stopped listing services of {identity}: {e}");
                            break;
                        }
                    }
                }
            }
            Err(e) => debug!("Cannot list services of {identity}: {e}"),
        }

        if !services.is_empty() {
            debug!("Mod with services: {identity}");
        }
        services
    }

    fn walk<T: ArchiveTree + ?Sized>(&self, tree: &mut T) -> Result<WalkFindings> {
        let patterns = &self.config.patterns;
        let mut found = WalkFindings::default();

        for entry in tree.walk("/").map_err(into_walk_failure)? {
            let path = entry.map_err(into_walk_failure)?;
            let Some(name) = file_name(&path) else {
                continue;
            };

            found.generator |= patterns.is_generator_element(name);
            found.weaving |= patterns.is_weaving_metadata(name);

            if found.generator && found.weaving {
                break;
            }
        }

        Ok(found)
    }
}

fn read_optional<T: ArchiveTree + ?Sized>(tree: &mut T, path: &str) -> Result<Option<Vec<u8>>> {
    match tree.read_all(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

fn into_walk_failure(err: ScanError) -> ScanError {
    match err {
        ScanError::WalkFailure { .. } => err,
        other => ScanError::WalkFailure {
            reason: other.to_string(),
        },
    }
}
