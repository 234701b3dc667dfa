//! Survey reporting.

use std::fmt;
use std::path::Path;

use crate::AggregateTotals;

/// A share with one truncated decimal, or undefined for an empty divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Percentage {
    /// Share in tenths of a percent (`125` is 12.5%).
    Tenths(u64),
    /// Divisor was zero or negative.
    Undefined,
}

impl Percentage {
    /// Computes `value / divisor` truncated to one decimal.
    ///
    /// `None` stands for a divisor that went negative after subtraction.
    ///
    /// # Examples
    ///
    /// ```
    /// use modsurvey_core::Percentage;
    ///
    /// assert_eq!(Percentage::of(1, Some(3)).to_string(), "33.3%");
    /// assert_eq!(Percentage::of(2, Some(0)), Percentage::Undefined);
    /// assert_eq!(Percentage::of(2, None).to_string(), "undefined");
    /// ```
    #[must_use]
    pub fn of(value: u64, divisor: Option<u64>) -> Self {
        match divisor {
            Some(divisor) if divisor > 0 => Self::Tenths(value.saturating_mul(1000) / divisor),
            _ => Self::Undefined,
        }
    }

    /// Returns the share as a float, if defined.
    #[must_use]
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Tenths(tenths) => Some(tenths as f64 / 10.0),
            Self::Undefined => None,
        }
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tenths(tenths) => write!(f, "{}.{}%", tenths / 10, tenths % 10),
            Self::Undefined => f.write_str("undefined"),
        }
    }
}

/// Share among Forge mods, with and without MCreator mods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForgeShare {
    /// Share of Forge-only mods.
    pub of_platform_b: Percentage,
    /// Share of Forge-only mods once MCreator mods are subtracted.
    pub excluding_generator: Percentage,
}

/// Final batch report: totals plus derived percentages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyReport {
    /// Raw counters.
    pub totals: AggregateTotals,

    /// MCreator mods, of Forge mods.
    pub generator_tool: Percentage,

    /// Mods with coremods.
    pub core_hooks: ForgeShare,

    /// Mods with access transformers.
    pub binary_patch_spec: ForgeShare,

    /// Forge mods using Mixins.
    pub weaving_platform_b: ForgeShare,

    /// Fabric mods using Mixins, of Fabric mods.
    pub weaving_platform_a: Percentage,
}

impl SurveyReport {
    pub(crate) fn from_totals(totals: AggregateTotals) -> Self {
        let forge = totals.platform_b;
        let forge_without_generator = totals.platform_b.checked_sub(totals.generator_tool);
        let forge_share = |value: u64| ForgeShare {
            of_platform_b: Percentage::of(value, Some(forge)),
            excluding_generator: Percentage::of(value, forge_without_generator),
        };

        Self {
            generator_tool: Percentage::of(totals.generator_tool, Some(forge)),
            core_hooks: forge_share(totals.core_hooks),
            binary_patch_spec: forge_share(totals.binary_patch_spec),
            weaving_platform_b: forge_share(totals.weaving_platform_b),
            weaving_platform_a: Percentage::of(totals.weaving_platform_a, Some(totals.platform_a)),
            totals,
        }
    }
}

/// Callback trait for progress reporting during a survey.
///
/// The trait requires `Send` since archives are processed on a worker pool;
/// calls are serialized by the survey driver.
pub trait SurveyProgress: Send {
    /// Called once the input directory has been enumerated.
    fn on_start(&mut self, total: usize);

    /// Called when a worker picks up an archive.
    fn on_archive_start(&mut self, path: &Path);

    /// Called when an archive has been fully processed, whatever the result.
    fn on_archive_complete(&mut self, path: &Path);

    /// Called when the entire survey is complete.
    fn on_complete(&mut self);
}

/// No-op implementation of `SurveyProgress`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl SurveyProgress for NoopProgress {
    fn on_start(&mut self, _total: usize) {}

    fn on_archive_start(&mut self, _path: &Path) {}

    fn on_archive_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}
