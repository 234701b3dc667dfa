//! Resolution of raw signals into one classification record per archive.
//!
//! Classification is a pure function of [`RawSignals`]. The precedence rules
//! live in two small tables, [`Platform::resolve`] and
//! [`PlatformOutcome::resolve`], so they can be tested exhaustively.

use std::fmt;

use crate::ArchiveTree;
use crate::RawSignals;
use crate::Result;
use crate::SignalScanner;

/// Forge-family platform resolved from the descriptor checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Platform {
    /// No Forge descriptor.
    #[default]
    None,
    /// Only the pre-1.13 descriptor.
    LegacyPlatformB,
    /// Modern descriptor (wins over the legacy one).
    PlatformB,
}

impl Platform {
    /// Applies the descriptor precedence: PlatformB, then LegacyPlatformB.
    #[must_use]
    pub const fn resolve(platform_b: bool, legacy_platform_b: bool) -> Self {
        match (platform_b, legacy_platform_b) {
            (true, _) => Self::PlatformB,
            (false, true) => Self::LegacyPlatformB,
            (false, false) => Self::None,
        }
    }
}

/// Mutually exclusive platform bucket used for batch totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformOutcome {
    /// Fabric only.
    PlatformA,
    /// Forge only.
    PlatformB,
    /// Fabric and Forge descriptors in the same archive.
    Both,
    /// Only the legacy Forge descriptor.
    LegacyPlatformB,
    /// No loader descriptor at all.
    Neither,
}

impl PlatformOutcome {
    /// Buckets a Fabric marker together with the resolved Forge platform.
    ///
    /// | platform_a | platform | outcome |
    /// |---|---|---|
    /// | true | PlatformB | Both |
    /// | true | otherwise | PlatformA |
    /// | false | PlatformB | PlatformB |
    /// | false | LegacyPlatformB | LegacyPlatformB |
    /// | false | None | Neither |
    #[must_use]
    pub const fn resolve(platform_a: bool, platform: Platform) -> Self {
        match (platform_a, platform) {
            (true, Platform::PlatformB) => Self::Both,
            (true, _) => Self::PlatformA,
            (false, Platform::PlatformB) => Self::PlatformB,
            (false, Platform::LegacyPlatformB) => Self::LegacyPlatformB,
            (false, Platform::None) => Self::Neither,
        }
    }
}

impl fmt::Display for PlatformOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlatformA => "Fabric",
            Self::PlatformB => "Forge",
            Self::Both => "Fabric and Forge",
            Self::LegacyPlatformB => "Forge 1.12 or below",
            Self::Neither => "neither",
        };
        f.write_str(name)
    }
}

/// Combination worth an advisory line when the record is folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anomaly {
    /// Generator tool detected without any Forge descriptor.
    GeneratorWithoutPlatformB,
    /// Weaving metadata in a Fabric mod.
    WeavingUnderPlatformA,
    /// Weaving metadata in a Forge mod.
    WeavingUnderPlatformB,
    /// Both Fabric and Forge descriptors.
    BothPlatforms,
    /// Only the legacy Forge descriptor.
    LegacyOnly,
    /// No loader descriptor at all.
    NeitherPlatform,
}

impl Anomaly {
    /// Returns `true` for the platform anomalies that deserve a warning;
    /// weaving combinations are informational.
    #[must_use]
    pub const fn is_warning(self) -> bool {
        !matches!(
            self,
            Self::WeavingUnderPlatformA | Self::WeavingUnderPlatformB
        )
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::GeneratorWithoutPlatformB => "MCreator mod without a Forge descriptor",
            Self::WeavingUnderPlatformA => "Fabric mod using Mixins",
            Self::WeavingUnderPlatformB => "Forge mod using Mixins",
            Self::BothPlatforms => "mod has both Fabric and Forge descriptors",
            Self::LegacyOnly => "Forge 1.12 or below mod",
            Self::NeitherPlatform => "mod has neither Fabric nor Forge descriptors",
        };
        f.write_str(message)
    }
}

/// Immutable classification of one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRecord {
    platform: Platform,
    platform_a: bool,
    outcome: PlatformOutcome,
    generator_tool: bool,
    bytecode_weaving: bool,
    core_hooks: bool,
    binary_patch_spec: Option<String>,
}

impl ClassificationRecord {
    /// Resolved Forge-family platform.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Fabric descriptor present.
    #[must_use]
    pub const fn platform_a(&self) -> bool {
        self.platform_a
    }

    /// Exclusive platform bucket.
    #[must_use]
    pub const fn outcome(&self) -> PlatformOutcome {
        self.outcome
    }

    /// Produced by the generator tool.
    #[must_use]
    pub const fn generator_tool(&self) -> bool {
        self.generator_tool
    }

    /// Ships weaving metadata.
    #[must_use]
    pub const fn bytecode_weaving(&self) -> bool {
        self.bytecode_weaving
    }

    /// Ships a well-formed coremods manifest.
    #[must_use]
    pub const fn core_hooks(&self) -> bool {
        self.core_hooks
    }

    /// Access transformer contents, if present.
    #[must_use]
    pub fn binary_patch_spec(&self) -> Option<&str> {
        self.binary_patch_spec.as_deref()
    }

    /// Advisory combinations present in this record, in a fixed order.
    #[must_use]
    pub fn anomalies(&self) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();

        if self.generator_tool && self.platform == Platform::None {
            anomalies.push(Anomaly::GeneratorWithoutPlatformB);
        }
        if self.bytecode_weaving && self.platform_a {
            anomalies.push(Anomaly::WeavingUnderPlatformA);
        }
        if self.bytecode_weaving && self.platform == Platform::PlatformB {
            anomalies.push(Anomaly::WeavingUnderPlatformB);
        }
        match self.outcome {
            PlatformOutcome::Both => anomalies.push(Anomaly::BothPlatforms),
            PlatformOutcome::LegacyPlatformB => anomalies.push(Anomaly::LegacyOnly),
            PlatformOutcome::Neither => anomalies.push(Anomaly::NeitherPlatform),
            PlatformOutcome::PlatformA | PlatformOutcome::PlatformB => {}
        }

        anomalies
    }
}

/// Resolves raw signals into a classification record. Performs no I/O.
///
/// # Examples
///
/// ```
/// use modsurvey_core::Platform;
/// use modsurvey_core::PlatformOutcome;
/// use modsurvey_core::RawSignals;
/// use modsurvey_core::classify;
///
/// let signals = RawSignals {
///     platform_b_descriptor: true,
///     legacy_platform_b_descriptor: true,
///     ..RawSignals::default()
/// };
/// let record = classify(&signals);
/// assert_eq!(record.platform(), Platform::PlatformB);
/// assert_eq!(record.outcome(), PlatformOutcome::PlatformB);
/// ```
#[must_use]
pub fn classify(signals: &RawSignals) -> ClassificationRecord {
    let platform = Platform::resolve(
        signals.platform_b_descriptor,
        signals.legacy_platform_b_descriptor,
    );
    let platform_a = signals.platform_a_descriptor;

    ClassificationRecord {
        platform,
        platform_a,
        outcome: PlatformOutcome::resolve(platform_a, platform),
        generator_tool: signals.generator_marker_by_path || signals.generator_marker_by_heuristic,
        bytecode_weaving: signals.weaving_marker_by_heuristic,
        core_hooks: signals.core_hooks_manifest.is_some(),
        binary_patch_spec: signals
            .binary_patch_spec
            .as_deref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Scans `tree` and classifies it.
///
/// # Errors
///
/// Propagates archive-fatal scan errors (see [`SignalScanner::scan`]).
pub fn classify_archive<T: ArchiveTree + ?Sized>(
    tree: &mut T,
    scanner: &SignalScanner,
) -> Result<ClassificationRecord> {
    let signals = scanner.scan(tree)?;
    Ok(classify(&signals))
}
