//! Batch-wide aggregation of classification records.

use log::info;
use log::warn;

use crate::ClassificationRecord;
use crate::Platform;
use crate::PlatformOutcome;
use crate::SurveyReport;

/// Running batch counters. Only ever incremented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateTotals {
    /// Archives folded.
    pub total: u64,

    /// MCreator mods.
    pub generator_tool: u64,

    /// Fabric mods using Mixins.
    pub weaving_platform_a: u64,

    /// Forge mods using Mixins.
    pub weaving_platform_b: u64,

    /// Mods with a coremods manifest.
    pub core_hooks: u64,

    /// Mods with an access transformer.
    pub binary_patch_spec: u64,

    /// Fabric-only outcome.
    pub platform_a: u64,

    /// Forge-only outcome.
    pub platform_b: u64,

    /// Fabric and Forge outcome.
    pub both: u64,

    /// Legacy Forge outcome.
    pub legacy: u64,

    /// No-descriptor outcome.
    pub neither: u64,
}

/// Single owner of the batch totals.
///
/// In a parallel survey the aggregator sits behind one lock; every fold goes
/// through it.
#[derive(Debug, Default)]
pub struct Aggregator {
    totals: AggregateTotals,
}

impl Aggregator {
    /// Creates an aggregator with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record into the totals and logs its anomalies.
    pub fn fold(&mut self, record: &ClassificationRecord, identity: &str) {
        let totals = &mut self.totals;
        totals.total += 1;

        if record.generator_tool() {
            totals.generator_tool += 1;
        }
        if record.bytecode_weaving() && record.platform_a() {
            totals.weaving_platform_a += 1;
        }
        if record.bytecode_weaving() && record.platform() == Platform::PlatformB {
            totals.weaving_platform_b += 1;
        }
        if record.core_hooks() {
            totals.core_hooks += 1;
        }
        if record.binary_patch_spec().is_some() {
            totals.binary_patch_spec += 1;
        }

        let bucket = match record.outcome() {
            PlatformOutcome::PlatformA => &mut totals.platform_a,
            PlatformOutcome::PlatformB => &mut totals.platform_b,
            PlatformOutcome::Both => &mut totals.both,
            PlatformOutcome::LegacyPlatformB => &mut totals.legacy,
            PlatformOutcome::Neither => &mut totals.neither,
        };
        *bucket += 1;

        for anomaly in record.anomalies() {
            if anomaly.is_warning() {
                warn!("{anomaly}: {identity}");
            } else {
                info!("{anomaly}: {identity}");
            }
        }
    }

    /// Current counters.
    #[must_use]
    pub fn totals(&self) -> &AggregateTotals {
        &self.totals
    }

    /// Builds the final report. Call once every record has been folded.
    #[must_use]
    pub fn report(&self) -> SurveyReport {
        SurveyReport::from_totals(self.totals.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Anomaly;
    use crate::CoreHooksManifest;
    use crate::RawSignals;
    use crate::classify;
    use log::Level;
    use log::Metadata;
    use log::Record;
    use std::sync::Mutex;

    /// Keeps every log line so tests can check what `fold` reported.
    struct CaptureLogger;

    static CAPTURED: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
    static LOGGER: CaptureLogger = CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            CAPTURED
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    /// Lines mentioning `identity`. Identities must be unique per test since
    /// the logger is process-wide.
    fn captured_for(identity: &str) -> Vec<(Level, String)> {
        CAPTURED
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, line)| line.contains(identity))
            .cloned()
            .collect()
    }

    fn install_capture_logger() {
        // Another test may have installed it already.
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
    }

    fn forge() -> RawSignals {
        RawSignals {
            platform_b_descriptor: true,
            ..RawSignals::default()
        }
    }

    #[test]
    fn test_fold_counts_outcome_buckets_once() {
        let mut aggregator = Aggregator::new();
        let signals = [
            forge(),
            RawSignals {
                platform_a_descriptor: true,
                ..RawSignals::default()
            },
            RawSignals {
                platform_a_descriptor: true,
                platform_b_descriptor: true,
                ..RawSignals::default()
            },
            RawSignals {
                legacy_platform_b_descriptor: true,
                ..RawSignals::default()
            },
            RawSignals::default(),
        ];
        for (i, s) in signals.iter().enumerate() {
            aggregator.fold(&classify(s), &format!("mod-{i}.jar"));
        }

        let totals = aggregator.totals();
        assert_eq!(totals.total, 5);
        assert_eq!(
            (totals.platform_a, totals.platform_b, totals.both, totals.legacy, totals.neither),
            (1, 1, 1, 1, 1)
        );
    }

    #[test]
    fn test_fold_cross_cutting_counters() {
        let mut aggregator = Aggregator::new();
        let signals = RawSignals {
            core_hooks_manifest: Some(CoreHooksManifest::default()),
            binary_patch_spec: Some(b"public a.B".to_vec()),
            weaving_marker_by_heuristic: true,
            generator_marker_by_path: true,
            ..forge()
        };
        aggregator.fold(&classify(&signals), "kitchen-sink.jar");

        let totals = aggregator.totals();
        assert_eq!(totals.core_hooks, 1);
        assert_eq!(totals.binary_patch_spec, 1);
        assert_eq!(totals.weaving_platform_b, 1);
        assert_eq!(totals.weaving_platform_a, 0);
        assert_eq!(totals.generator_tool, 1);
    }

    #[test]
    fn test_weaving_counted_under_both_platforms() {
        let mut aggregator = Aggregator::new();
        let signals = RawSignals {
            platform_a_descriptor: true,
            weaving_marker_by_heuristic: true,
            ..forge()
        };
        aggregator.fold(&classify(&signals), "both.jar");

        let totals = aggregator.totals();
        assert_eq!(totals.weaving_platform_a, 1);
        assert_eq!(totals.weaving_platform_b, 1);
        assert_eq!(totals.both, 1);
    }

    #[test]
    fn test_weaving_under_legacy_not_counted() {
        let mut aggregator = Aggregator::new();
        let signals = RawSignals {
            legacy_platform_b_descriptor: true,
            weaving_marker_by_heuristic: true,
            ..RawSignals::default()
        };
        aggregator.fold(&classify(&signals), "old.jar");
        assert_eq!(aggregator.totals().weaving_platform_b, 0);
    }

    #[test]
    fn test_report_percentages() {
        let mut aggregator = Aggregator::new();
        for i in 0..4 {
            let signals = RawSignals {
                core_hooks_manifest: (i == 0).then(CoreHooksManifest::default),
                generator_marker_by_path: i == 3,
                ..forge()
            };
            aggregator.fold(&classify(&signals), "forge.jar");
        }

        let report = aggregator.report();
        assert_eq!(report.core_hooks.of_platform_b.to_string(), "25.0%");
        assert_eq!(report.core_hooks.excluding_generator.to_string(), "33.3%");
        assert_eq!(report.generator_tool.to_string(), "25.0%");
    }

    #[test]
    fn test_fold_logs_anomalies_by_severity() {
        install_capture_logger();
        let mut aggregator = Aggregator::new();

        let weaving = RawSignals {
            weaving_marker_by_heuristic: true,
            ..forge()
        };
        aggregator.fold(&classify(&weaving), "fold-log-weaving.jar");
        aggregator.fold(&classify(&RawSignals::default()), "fold-log-neither.jar");

        assert_eq!(
            captured_for("fold-log-weaving.jar"),
            vec![(
                Level::Info,
                format!("{}: fold-log-weaving.jar", Anomaly::WeavingUnderPlatformB)
            )]
        );
        assert_eq!(
            captured_for("fold-log-neither.jar"),
            vec![(
                Level::Warn,
                format!("{}: fold-log-neither.jar", Anomaly::NeitherPlatform)
            )]
        );
    }
}
