use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use autosize::{
    AutoSize, AutoSizeConfig, Basis, CustomAdapt, DeviceScreen, IntrinsicMode, MetricsPatch,
    MetricsSnapshot, Resolution, ScaleResult, Surface, TargetInfo, WindowParams,
};

#[derive(Parser, Debug)]
#[command(name = "autosize", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the adapted metrics for one unit and print them as JSON.
    Compute(ComputeArgs),
    /// Print the baseline metrics a cancelled unit is restored to.
    Restore(InputArgs),
}

#[derive(Parser, Debug)]
struct InputArgs {
    /// Configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Device screen JSON (raw metrics before adaptation).
    #[arg(long)]
    metrics: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SurfaceArg {
    Primary,
    Compat,
}

#[derive(Parser, Debug)]
struct ComputeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Unit identity used for diagnostics.
    #[arg(long, default_value = "cli")]
    identity: String,

    /// Custom design size in dp (0 falls back to the configured size).
    #[arg(long)]
    design: Option<f32>,

    /// Use the height as basis for the custom design size.
    #[arg(long, default_value_t = false)]
    height_basis: bool,

    /// Window params declaration (`version,mode,resize,force,width,height,min_w,min_h`).
    #[arg(long)]
    window_params: Option<String>,

    /// The unit is shown on an external display.
    #[arg(long, default_value_t = false)]
    external_display: bool,

    /// Keep the intrinsic window size on external displays.
    #[arg(long, default_value_t = false)]
    keep_intrinsic: bool,

    /// Adaptation surface.
    #[arg(long, value_enum, default_value_t = SurfaceArg::Primary)]
    surface: SurfaceArg,
}

#[derive(serde::Serialize)]
struct Report<'a> {
    resolution: &'a Resolution,
    result: &'a ScaleResult,
    patch: &'a MetricsPatch,
    cache_hit: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Compute(args) => cmd_compute(args),
        Command::Restore(args) => cmd_restore(args),
    }
}

fn load_engine(input: &InputArgs) -> anyhow::Result<AutoSize> {
    let config = AutoSizeConfig::from_path(&input.config)?;
    let f = std::fs::File::open(&input.metrics)
        .with_context(|| format!("open metrics JSON '{}'", input.metrics.display()))?;
    let screen: DeviceScreen = serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| format!("parse metrics JSON '{}'", input.metrics.display()))?;
    let baseline = MetricsSnapshot::capture(&screen, config.use_device_size)?;
    Ok(AutoSize::new(config, baseline)?)
}

fn cmd_compute(args: ComputeArgs) -> anyhow::Result<()> {
    let engine = load_engine(&args.input)?;

    let mut target = TargetInfo::new(args.identity);
    if let Some(size) = args.design {
        let basis = Basis::from_width_flag(!args.height_basis);
        target = target.with_custom(CustomAdapt::new(basis, size));
    }

    let params = args
        .window_params
        .as_deref()
        .map(WindowParams::parse)
        .transpose()?;
    let mode = IntrinsicMode {
        external_display: args.external_display,
        app_keep_intrinsic: args.keep_intrinsic,
        unit_keep_intrinsic: None,
    };

    let surface = match args.surface {
        SurfaceArg::Primary => Surface::Primary,
        SurfaceArg::Compat => Surface::Compat,
    };
    let outcome = engine.adapt(&target, surface, mode.window_override(params.as_ref()))?;
    print_report(&Report {
        resolution: &outcome.resolution,
        result: &outcome.result,
        patch: &outcome.patch,
        cache_hit: outcome.cache_hit,
    })
}

fn cmd_restore(args: InputArgs) -> anyhow::Result<()> {
    let engine = load_engine(&args)?;
    let outcome = engine.cancel(&TargetInfo::new("cli"))?;
    print_report(&Report {
        resolution: &outcome.resolution,
        result: &outcome.result,
        patch: &outcome.patch,
        cache_hit: outcome.cache_hit,
    })
}

fn print_report(report: &Report<'_>) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(report).context("serialize report")?;
    println!("{out}");
    Ok(())
}
