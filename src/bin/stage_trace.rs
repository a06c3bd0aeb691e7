use scroll_stage::api::{StageEngine, StageManifest};
use scroll_stage::core::{Phase, SectionId};
use scroll_stage::render::NullRenderer;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

const USAGE: &str = "usage: stage_trace --input <manifest.json> --output <trace.json> [--steps <n>] [--content-height <section>=<px>]...";

#[derive(Debug)]
struct CliArgs {
    input: PathBuf,
    output: PathBuf,
    steps: usize,
    content_heights: Vec<(SectionId, f64)>,
}

#[derive(Debug, Serialize)]
struct StageTraceFile {
    source: String,
    max_scroll: f64,
    snap_installed: bool,
    samples: Vec<TraceSample>,
}

#[derive(Debug, Serialize)]
struct TraceSample {
    offset: f64,
    normalized: Option<f64>,
    snap_target: Option<f64>,
    sections: Vec<TraceSection>,
}

#[derive(Debug, Serialize)]
struct TraceSection {
    id: SectionId,
    progress: f64,
    phase: Phase,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("failed to read `{}`: {err}", args.input.display()))?;
    let manifest = StageManifest::from_json_str(&raw).map_err(|err| err.to_string())?;

    let mut engine =
        StageEngine::from_manifest(NullRenderer::default(), manifest).map_err(|err| err.to_string())?;
    for (section, height_px) in &args.content_heights {
        engine
            .report_content_height(section, *height_px)
            .map_err(|err| err.to_string())?;
    }
    engine.mount().map_err(|err| err.to_string())?;
    engine.layout_ready();
    let max_scroll = engine.max_scroll().ok_or_else(|| {
        "layout is incomplete: report every measured section with --content-height".to_owned()
    })?;

    let mut samples = Vec::with_capacity(args.steps + 1);
    for step in 0..=args.steps {
        let offset = max_scroll * step as f64 / args.steps as f64;
        engine.scroll_to(offset).map_err(|err| err.to_string())?;
        let snapshot = engine.snapshot();
        samples.push(TraceSample {
            offset,
            normalized: snapshot.normalized_scroll,
            snap_target: snapshot
                .normalized_scroll
                .map(|position| engine.compute_snap_target(position)),
            sections: snapshot
                .sections
                .into_iter()
                .map(|section| TraceSection {
                    id: section.id,
                    progress: section.progress,
                    phase: section.phase,
                })
                .collect(),
        });
    }

    let trace = StageTraceFile {
        source: args.input.display().to_string(),
        max_scroll,
        snap_installed: engine.has_snap_rule(),
        samples,
    };
    engine.unmount();
    write_json(&args.output, &trace)
}

fn write_json<T: Serialize>(path: &PathBuf, value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize json: {err}"))?;
    fs::write(path, payload).map_err(|err| format!("failed to write `{}`: {err}", path.display()))
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut input = None::<PathBuf>;
    let mut output = None::<PathBuf>;
    let mut steps = 100_usize;
    let mut content_heights = Vec::new();

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--input" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --input".to_owned())?;
                input = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output = Some(PathBuf::from(value));
            }
            "--steps" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --steps".to_owned())?;
                steps = value
                    .parse::<usize>()
                    .ok()
                    .filter(|steps| *steps > 0)
                    .ok_or_else(|| format!("--steps must be a positive integer, got `{value}`"))?;
            }
            "--content-height" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --content-height".to_owned())?;
                content_heights.push(parse_content_height(&value)?);
            }
            "--help" | "-h" => return Err(USAGE.to_owned()),
            _ => return Err(format!("unknown argument `{flag}`")),
        }
    }

    let input = input.ok_or_else(|| "missing --input".to_owned())?;
    let output = output.ok_or_else(|| "missing --output".to_owned())?;
    Ok(CliArgs {
        input,
        output,
        steps,
        content_heights,
    })
}

fn parse_content_height(value: &str) -> Result<(SectionId, f64), String> {
    let (section, height) = value
        .split_once('=')
        .ok_or_else(|| format!("--content-height expects `<section>=<px>`, got `{value}`"))?;
    let height = height
        .parse::<f64>()
        .map_err(|err| format!("invalid height in `{value}`: {err}"))?;
    Ok((SectionId::new(section), height))
}
