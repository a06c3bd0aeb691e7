use approx::assert_abs_diff_eq;
use scroll_stage::api::{BindingSpec, SectionSpec, StageEngine, StageEngineConfig};
use scroll_stage::core::{Ease, Length, Phase, PropertySet, SectionId, SectionKind, TargetId, Viewport};
use scroll_stage::render::NullRenderer;

fn fade(target: &str, phase: Option<Phase>, window: Option<[f64; 2]>) -> BindingSpec {
    BindingSpec {
        target: TargetId::new(target),
        phase,
        start: None,
        window,
        from: PropertySet::new().y(Length::Vh(10.0)).opacity(0.0),
        to: PropertySet::new().y(Length::Px(0.0)).opacity(1.0),
        ease: Some(Ease::Linear),
    }
}

fn landing_sections() -> Vec<SectionSpec> {
    vec![
        SectionSpec::pinned("hero").with_binding(fade("headline", Some(Phase::Exit), None)),
        SectionSpec::reveal("features", 1.0).with_binding(fade("header", None, Some([0.0, 1.0]))),
        SectionSpec::pinned("details").with_binding(fade("card", Some(Phase::Entrance), None)),
    ]
}

/// Viewport 1000x800: hero [0, 1040], features [1200, 1440],
/// details [2640, 3680], max scroll 3680.
fn mounted_engine(scrub_lag: f64) -> StageEngine<NullRenderer> {
    let config = StageEngineConfig::new(Viewport::new(1000, 800)).with_scrub_lag(scrub_lag);
    let mut engine =
        StageEngine::new(NullRenderer::default(), config, landing_sections()).expect("engine init");
    engine.mount().expect("mount");
    engine
}

#[test]
fn layout_measures_pinned_and_reveal_ranges() {
    let engine = mounted_engine(0.0);
    let hero = engine
        .section_trigger(&SectionId::new("hero"))
        .expect("hero measured");
    assert_abs_diff_eq!(hero.start(), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(hero.end(), 1_040.0, epsilon = 1e-9);

    let features = engine
        .section_trigger(&SectionId::new("features"))
        .expect("features measured");
    assert_abs_diff_eq!(features.start(), 1_200.0, epsilon = 1e-9);
    assert_abs_diff_eq!(features.end(), 1_440.0, epsilon = 1e-9);

    let details = engine
        .section_trigger(&SectionId::new("details"))
        .expect("details measured");
    assert_abs_diff_eq!(details.start(), 2_640.0, epsilon = 1e-9);
    assert_abs_diff_eq!(
        engine.max_scroll().expect("complete layout"),
        3_680.0,
        epsilon = 1e-9
    );
    // Only pinned sections enter the registry.
    assert_eq!(engine.pin_registry().len(), 2);
}

#[test]
fn local_progress_is_linear_inside_the_range() {
    let mut engine = mounted_engine(0.0);
    let hero = SectionId::new("hero");
    let features = SectionId::new("features");

    engine.scroll_to(520.0).expect("scroll");
    assert_abs_diff_eq!(
        engine.section_progress(&hero).expect("hero"),
        0.5,
        epsilon = 1e-9
    );
    assert_eq!(engine.section_phase(&hero), Some(Phase::Settle));

    engine.scroll_to(1_320.0).expect("scroll");
    assert_abs_diff_eq!(
        engine.section_progress(&features).expect("features"),
        0.5,
        epsilon = 1e-9
    );
}

#[test]
fn progress_is_monotonic_and_clamped_over_a_sweep() {
    let mut engine = mounted_engine(0.0);
    let hero = SectionId::new("hero");
    let mut previous = 0.0;
    for step in 0..=200 {
        engine.scroll_to(f64::from(step) * 10.0).expect("scroll");
        let progress = engine.section_progress(&hero).expect("hero");
        assert!(progress >= previous, "progress went back at step {step}");
        assert!((0.0..=1.0).contains(&progress));
        previous = progress;
    }
    assert_eq!(previous, 1.0);

    engine.scroll_to(0.0).expect("scroll back");
    assert_eq!(engine.section_progress(&hero), Some(0.0));
}

#[test]
fn leaving_a_range_pushes_the_crossed_boundary_once() {
    let mut engine = mounted_engine(0.0);
    let details = SectionId::new("details");

    engine.scroll_to(3_000.0).expect("enter details");
    let inside = engine.section_progress(&details).expect("details");
    assert!(inside > 0.0 && inside < 1.0);

    engine.scroll_to(1_000.0).expect("leave backwards");
    assert_eq!(engine.section_progress(&details), Some(0.0));

    // Nothing changes between the ranges, so nothing is rendered.
    engine.scroll_to(1_500.0).expect("scroll");
    let rendered = engine.renderer().frames_rendered;
    engine.scroll_to(1_600.0).expect("scroll");
    engine.scroll_to(1_700.0).expect("scroll");
    assert_eq!(engine.renderer().frames_rendered, rendered);
}

#[test]
fn zero_height_range_yields_zero_progress() {
    let config = StageEngineConfig::new(Viewport::new(1000, 800)).with_scrub_lag(0.0);
    let sections = vec![
        SectionSpec::pinned("flat")
            .with_kind(SectionKind::Pinned { extension_vh: 0.0 })
            .with_binding(fade("card", Some(Phase::Entrance), None)),
        SectionSpec::reveal("tail", 2.0),
    ];
    let mut engine = StageEngine::new(NullRenderer::default(), config, sections).expect("engine");
    engine.mount().expect("mount");

    let flat = SectionId::new("flat");
    let range = engine.section_trigger(&flat).expect("measured");
    assert!(range.is_degenerate());
    for offset in [0.0, 400.0, 1_200.0] {
        engine.scroll_to(offset).expect("scroll");
        assert_eq!(engine.section_progress(&flat), Some(0.0));
    }
}

#[test]
fn scrub_lag_smooths_displayed_progress() {
    let mut engine = mounted_engine(0.6);
    let hero = SectionId::new("hero");

    engine.scroll_to(1_040.0).expect("scroll");
    assert_eq!(engine.section_progress(&hero), Some(1.0));
    assert_eq!(engine.section_displayed_progress(&hero), Some(0.0));

    engine.frame(0.1).expect("frame");
    let partial = engine.section_displayed_progress(&hero).expect("hero");
    assert!(partial > 0.0 && partial < 1.0);

    for _ in 0..120 {
        engine.frame(1.0 / 60.0).expect("frame");
    }
    assert_eq!(engine.section_displayed_progress(&hero), Some(1.0));
}

#[test]
fn offsets_are_clamped_and_validated() {
    let mut engine = mounted_engine(0.0);
    engine.scroll_to(-50.0).expect("scroll");
    assert_eq!(engine.scroll_offset(), 0.0);
    engine.scroll_to(1.0e9).expect("scroll");
    assert_abs_diff_eq!(engine.scroll_offset(), 3_680.0, epsilon = 1e-9);
    assert_abs_diff_eq!(
        engine.normalized_scroll().expect("overflow"),
        1.0,
        epsilon = 1e-12
    );
    assert!(engine.scroll_to(f64::NAN).is_err());
}

#[test]
fn rendered_frames_carry_resolved_target_states() {
    let mut engine = mounted_engine(0.0);
    engine.scroll_to(1_320.0).expect("scroll");

    let frame = engine
        .renderer()
        .last_frame
        .clone()
        .expect("frame rendered");
    let header = frame
        .state_of(&SectionId::new("features"), &TargetId::new("header"))
        .expect("header state");
    assert_abs_diff_eq!(header.opacity, 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(header.y, 40.0, epsilon = 1e-9);
}
