use scroll_stage::StageError;
use scroll_stage::api::{
    STAGE_MANIFEST_JSON_SCHEMA_V1, SectionSpec, StageEngine, StageEngineConfig, StageManifest,
    StageSnapshot,
};
use scroll_stage::core::{
    Ease, Phase, PhaseTemplate, ScrollRange, SectionId, SectionKind, Viewport,
};
use scroll_stage::render::NullRenderer;

#[test]
fn config_defaults_fill_missing_fields() {
    let config = StageEngineConfig::from_json_str(r#"{"viewport":{"width":1280,"height":720}}"#)
        .expect("config");
    assert_eq!(config.viewport, Viewport::new(1280, 720));
    assert!(config.snap.enabled);
    assert_eq!(config.snap.tolerance, 0.02);
    assert_eq!(config.snap.glide.duration_min, 0.15);
    assert_eq!(config.snap.glide.duration_max, 0.35);
    assert_eq!(config.snap.glide.delay_seconds, 0.0);
    assert_eq!(config.snap.glide.ease, Ease::Power2Out);
    assert_eq!(config.settle_delay_seconds, 0.5);
    assert_eq!(config.pinned_scrub_lag_seconds, 0.6);
    assert_eq!(config.reveal_scrub_lag_seconds, 0.0);
    assert_eq!(config.phase_template, PhaseTemplate::ENTER_SETTLE_EXIT);
}

#[test]
fn partial_snap_block_keeps_other_defaults() {
    let config = StageEngineConfig::from_json_str(
        r#"{
            "viewport": {"width": 1280, "height": 720},
            "snap": {"tolerance": 0.05, "glide": {"ease": "power3.out"}}
        }"#,
    )
    .expect("config");
    assert_eq!(config.snap.tolerance, 0.05);
    assert_eq!(config.snap.glide.ease, Ease::Power3Out);
    assert_eq!(config.snap.glide.duration_max, 0.35);
}

#[test]
fn config_round_trips_through_json() {
    let config = StageEngineConfig::new(Viewport::new(1440, 900))
        .with_snap_tolerance(0.03)
        .with_settle_delay(0.25);
    let json = config.to_json_pretty().expect("serialize");
    let parsed = StageEngineConfig::from_json_str(&json).expect("parse");
    assert_eq!(parsed, config);
}

#[test]
fn invalid_config_values_are_rejected() {
    let cases = [
        r#"{"viewport":{"width":0,"height":720}}"#,
        r#"{"viewport":{"width":1280,"height":720},"snap":{"tolerance":-0.1}}"#,
        r#"{"viewport":{"width":1280,"height":720},"snap":{"tolerance":0.9}}"#,
        r#"{"viewport":{"width":1280,"height":720},"snap":{"glide":{"duration_min":0.5,"duration_max":0.2}}}"#,
        r#"{"viewport":{"width":1280,"height":720},"settle_delay_seconds":-1.0}"#,
        r#"{"viewport":{"width":1280,"height":720},"phase_template":{"entrance_end":0.8,"exit_start":0.2}}"#,
        r#"{"viewport":{"width":1280}"#,
    ];
    for input in cases {
        assert!(
            StageEngineConfig::from_json_str(input).is_err(),
            "accepted {input}"
        );
    }
}

const MANIFEST: &str = r#"{
    "schema_version": 1,
    "config": {"viewport": {"width": 1000, "height": 800}, "pinned_scrub_lag_seconds": 0.0},
    "sections": [
        {
            "id": "hero",
            "bindings": [
                {
                    "target": "headline",
                    "phase": "exit",
                    "from": {"y": {"px": 0.0}, "opacity": 1.0},
                    "to": {"y": {"vh": -18.0}, "opacity": 0.0}
                }
            ],
            "intro": {
                "duration_seconds": 1.0,
                "bindings": [
                    {
                        "target": "headline",
                        "window": [0.0, 1.0],
                        "from": {"opacity": 0.0},
                        "to": {"opacity": 1.0},
                        "ease": "power2.out"
                    }
                ]
            }
        },
        {
            "id": "features",
            "kind": {"mode": "reveal"},
            "height_vh": 1.5,
            "bindings": [
                {
                    "target": "card-0",
                    "window": [0.0, 1.0],
                    "from": {"opacity": 0.0},
                    "to": {"opacity": 1.0}
                }
            ]
        },
        {
            "id": "details",
            "kind": {"mode": "pinned", "extension_vh": 1.4},
            "bindings": [
                {
                    "target": "card",
                    "phase": "entrance",
                    "start": 0.1,
                    "from": {"x": {"vw": 60.0}, "rotate": -4.0},
                    "to": {"x": {"px": 0.0}, "rotate": 0.0}
                }
            ]
        },
        {"id": "footer", "kind": {"mode": "static"}, "height_vh": null}
    ]
}"#;

#[test]
fn manifest_parses_sections_and_kinds() {
    let manifest = StageManifest::from_json_str(MANIFEST).expect("manifest");
    assert_eq!(manifest.schema_version, STAGE_MANIFEST_JSON_SCHEMA_V1);
    assert_eq!(manifest.sections.len(), 4);
    assert_eq!(manifest.sections[0].kind, SectionKind::pinned());
    assert_eq!(manifest.sections[1].kind, SectionKind::reveal());
    assert_eq!(
        manifest.sections[2].kind,
        SectionKind::Pinned { extension_vh: 1.4 }
    );
    assert_eq!(manifest.sections[3].height_vh, None);
    assert!(manifest.sections[0].intro.is_some());

    let timeline = manifest.sections[2]
        .build_timeline(PhaseTemplate::default())
        .expect("timeline");
    assert_eq!(timeline.bindings().len(), 1);
    assert!((timeline.bindings()[0].window().start() - 0.1).abs() <= 1e-12);
    assert!((timeline.bindings()[0].window().end() - 0.3).abs() <= 1e-12);
}

#[test]
fn manifest_drives_an_engine() {
    let manifest = StageManifest::from_json_str(MANIFEST).expect("manifest");
    let mut engine =
        StageEngine::from_manifest(NullRenderer::default(), manifest).expect("engine init");
    engine.mount().expect("mount");
    engine
        .report_content_height(&SectionId::new("footer"), 400.0)
        .expect("footer measured");
    assert!(engine.layout_ready());

    let details = engine
        .section_trigger(&SectionId::new("details"))
        .expect("details measured");
    assert!((details.span() - 1_120.0).abs() <= 1e-9);
    assert_eq!(engine.pin_registry().len(), 2);
}

#[test]
fn manifest_rejects_unknown_schema_versions() {
    let input = MANIFEST.replacen("\"schema_version\": 1", "\"schema_version\": 2", 1);
    let err = StageManifest::from_json_str(&input).expect_err("version 2");
    assert!(matches!(err, StageError::InvalidData(_)));
}

#[test]
fn manifest_round_trips_through_json() {
    let manifest = StageManifest::new(
        StageEngineConfig::new(Viewport::new(1000, 800)),
        vec![
            SectionSpec::pinned("hero"),
            SectionSpec::reveal("features", 1.5).with_scrub_lag(0.2),
            SectionSpec::pinned("community").with_measured_height(),
        ],
    );
    let json = manifest.to_json_pretty().expect("serialize");
    let parsed = StageManifest::from_json_str(&json).expect("parse");
    assert_eq!(parsed, manifest);
}

#[test]
fn snapshot_contract_v1_round_trips() {
    let manifest = StageManifest::from_json_str(MANIFEST).expect("manifest");
    let mut engine =
        StageEngine::from_manifest(NullRenderer::default(), manifest).expect("engine init");
    engine.mount().expect("mount");
    engine
        .report_content_height(&SectionId::new("footer"), 400.0)
        .expect("footer measured");
    engine.layout_ready();
    engine.scroll_to(520.0).expect("scroll");

    let snapshot = engine.snapshot();
    let hero = snapshot.section(&SectionId::new("hero")).expect("hero");
    assert!((hero.progress - 0.5).abs() <= 1e-9);
    assert_eq!(hero.phase, Phase::Settle);
    assert_eq!(snapshot.snap_summaries.len(), 2);

    let contract = snapshot.to_json_contract_v1_pretty().expect("contract");
    assert!(contract.contains("\"schema_version\": 1"));
    let parsed = StageSnapshot::from_json_compat_str(&contract).expect("parse contract");
    assert_eq!(parsed, snapshot);

    let bare = engine.snapshot_json_pretty().expect("bare json");
    let parsed_bare = StageSnapshot::from_json_compat_str(&bare).expect("parse bare");
    assert_eq!(parsed_bare, snapshot);

    let future = contract.replacen("\"schema_version\": 1", "\"schema_version\": 9", 1);
    assert!(StageSnapshot::from_json_compat_str(&future).is_err());
}

#[test]
fn snapshot_with_inverted_trigger_is_rejected() {
    let manifest = StageManifest::from_json_str(MANIFEST).expect("manifest");
    let mut engine =
        StageEngine::from_manifest(NullRenderer::default(), manifest).expect("engine init");
    engine.mount().expect("mount");
    let bare = engine.snapshot_json_pretty().expect("bare json");

    let mut value: serde_json::Value = serde_json::from_str(&bare).expect("json value");
    value["sections"][0]["trigger"]["start"] = serde_json::json!(5_000.0);
    let inverted = serde_json::to_string(&value).expect("serialize");
    assert!(StageSnapshot::from_json_compat_str(&inverted).is_err());

    let range: ScrollRange =
        serde_json::from_str(r#"{"start":10.0,"end":10.0}"#).expect("degenerate range");
    assert!(range.is_degenerate());
    assert!(serde_json::from_str::<ScrollRange>(r#"{"start":10.0,"end":2.0}"#).is_err());
}
