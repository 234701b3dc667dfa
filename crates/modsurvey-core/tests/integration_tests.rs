//! Integration tests for modsurvey-core.
//!
//! These tests run whole archives through the scanner, classifier and
//! aggregator with real filesystem output.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use modsurvey_core::Aggregator;
use modsurvey_core::Anomaly;
use modsurvey_core::NoopProgress;
use modsurvey_core::Platform;
use modsurvey_core::PlatformOutcome;
use modsurvey_core::ScanConfig;
use modsurvey_core::ScanError;
use modsurvey_core::SignalScanner;
use modsurvey_core::SurveyConfig;
use modsurvey_core::ZipTree;
use modsurvey_core::classify_archive;
use modsurvey_core::survey_directory;
use modsurvey_core::test_utils::create_test_zip;
use modsurvey_core::test_utils::write_test_zip;
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

fn tree(identity: &str, entries: &[(&str, &str)]) -> ZipTree<Cursor<Vec<u8>>> {
    ZipTree::new(Cursor::new(create_test_zip(entries)), identity).expect("valid zip")
}

fn extracting_scanner(temp: &TempDir) -> SignalScanner {
    SignalScanner::new(ScanConfig::default().with_output_root(Some(temp.path().to_path_buf())))
}

#[test]
fn test_plain_forge_mod() {
    let temp = TempDir::new().unwrap();
    let mut tree = tree(
        "forge-only.jar",
        &[
            ("META-INF/mods.toml", "modLoader=\"javafml\""),
            ("com/example/ExampleMod.class", "compiled"),
        ],
    );

    let record = classify_archive(&mut tree, &extracting_scanner(&temp)).unwrap();

    assert_eq!(record.platform(), Platform::PlatformB);
    assert_eq!(record.outcome(), PlatformOutcome::PlatformB);
    assert!(!record.platform_a());
    assert!(!record.generator_tool());
    assert!(!record.bytecode_weaving());
    assert!(!record.core_hooks());
    assert_eq!(record.binary_patch_spec(), None);
    assert!(record.anomalies().is_empty());
    assert!(!temp.path().join("forge-only.jar").exists());
}

#[test]
fn test_fabric_and_forge_with_mixins() {
    let temp = TempDir::new().unwrap();
    let mut tree = tree(
        "hybrid.jar",
        &[
            ("fabric.mod.json", "{}"),
            ("META-INF/mods.toml", ""),
            ("mixins.json", "{}"),
        ],
    );

    let record = classify_archive(&mut tree, &extracting_scanner(&temp)).unwrap();

    assert_eq!(record.outcome(), PlatformOutcome::Both);
    assert!(record.bytecode_weaving());
    assert!(record.anomalies().contains(&Anomaly::WeavingUnderPlatformB));

    let mut aggregator = Aggregator::new();
    aggregator.fold(&record, "hybrid.jar");
    assert_eq!(aggregator.totals().both, 1);
    assert_eq!(aggregator.totals().weaving_platform_b, 1);
}

#[test]
fn test_coremod_extracted_once() {
    let temp = TempDir::new().unwrap();
    let mut tree = tree(
        "coremod.jar",
        &[
            ("META-INF/coremods.json", r#"{"foo": "scripts/foo.js"}"#),
            ("scripts/foo.js", "function initializeCoreMod() { return {}; }"),
            ("META-INF/mods.toml", ""),
        ],
    );

    let record = classify_archive(&mut tree, &extracting_scanner(&temp)).unwrap();

    assert!(record.core_hooks());
    let folder = temp.path().join("coremod.jar");
    let files: Vec<String> = fs::read_dir(&folder)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files, vec!["foo.js"]);
}

#[test]
fn test_rescan_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let scanner = extracting_scanner(&temp);
    let entries = [
        (
            "META-INF/coremods.json",
            r#"{"a": "client/hook.js", "b": "server/hook.js"}"#,
        ),
        ("client/hook.js", "// client"),
        ("server/hook.js", "// server"),
    ];

    for _ in 0..2 {
        let mut tree = tree("twice.jar", &entries);
        classify_archive(&mut tree, &scanner).unwrap();
    }

    let folder = temp.path().join("twice.jar");
    assert_eq!(fs::read_dir(&folder).unwrap().count(), 2);
    assert_eq!(fs::read(folder.join("hook.js")).unwrap(), b"// client");
    assert_eq!(fs::read(folder.join("-hook.js")).unwrap(), b"// server");
}

#[test]
fn test_malformed_manifest_fails_archive() {
    let temp = TempDir::new().unwrap();
    for manifest in [r#"["scripts/foo.js"]"#, "\"scripts/foo.js\"", "true"] {
        let mut tree = tree(
            "bad.jar",
            &[
                ("META-INF/coremods.json", manifest),
                ("scripts/foo.js", "function initializeCoreMod() {}"),
            ],
        );

        let err = classify_archive(&mut tree, &extracting_scanner(&temp)).unwrap_err();

        assert!(matches!(err, ScanError::MalformedManifest { .. }));
        assert!(err.is_archive_fatal());
    }
    assert!(!temp.path().join("bad.jar").exists());
}

#[test]
fn test_access_transformer_detected_without_platform() {
    let mut tree = tree(
        "at-only.jar",
        &[("META-INF/accesstransformer.cfg", "public net.minecraft.A f_1_")],
    );

    let record = classify_archive(&mut tree, &SignalScanner::new(ScanConfig::default())).unwrap();

    assert_eq!(record.binary_patch_spec(), Some("public net.minecraft.A f_1_"));
    assert_eq!(record.outcome(), PlatformOutcome::Neither);
}

#[test]
fn test_survey_directory_end_to_end() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    write_test_zip(
        &input.path().join("a-forge.jar"),
        &[("META-INF/mods.toml", ""), ("META-INF/accesstransformer.cfg", "public a.B")],
    );
    write_test_zip(
        &input.path().join("b-mcreator.jar"),
        &[
            ("META-INF/mods.toml", ""),
            ("net/mcreator/example/ExampleModElement.class", ""),
        ],
    );
    write_test_zip(
        &input.path().join("c-fabric.jar"),
        &[("fabric.mod.json", "{}"), ("example.mixins.json", "{}")],
    );
    write_test_zip(&input.path().join("d-legacy.jar"), &[("mcmod.info", "[]")]);
    fs::write(input.path().join("e-readme.txt"), b"not an archive").unwrap();

    let config = SurveyConfig {
        scan: ScanConfig::default().with_output_root(Some(output.path().to_path_buf())),
        threads: 2,
    };
    let outcome = survey_directory(input.path(), &config, &mut NoopProgress).unwrap();
    let totals = &outcome.report.totals;

    assert_eq!(totals.total, 4);
    assert_eq!(totals.platform_b, 2);
    assert_eq!(totals.platform_a, 1);
    assert_eq!(totals.legacy, 1);
    assert_eq!(totals.neither, 0);
    assert_eq!(totals.generator_tool, 1);
    assert_eq!(totals.binary_patch_spec, 1);
    assert_eq!(totals.weaving_platform_a, 1);
    assert_eq!(outcome.skipped.len(), 1);

    assert_eq!(outcome.report.generator_tool.to_string(), "50.0%");
    assert_eq!(
        outcome.report.binary_patch_spec.excluding_generator.to_string(),
        "100.0%"
    );
    assert!(
        output
            .path()
            .join("a-forge.jar")
            .join("accesstransformer.cfg")
            .is_file()
    );
}
