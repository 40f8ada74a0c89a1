use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flarefx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate an effect definition and print a summary.
    Check(CheckArgs),
    /// Play an effect headlessly and print per-frame scene counters.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input effect JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input effect JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of update steps.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Seconds per step.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Play position, x.
    #[arg(long, default_value_t = 0.0)]
    x: f64,

    /// Play position, y.
    #[arg(long, default_value_t = 0.0)]
    y: f64,

    /// Uniform play scale.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Layer the instance is placed on.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    layer: flarefx::Layer,

    /// Write the draw list of the last simulated frame as JSON.
    #[arg(long)]
    draw_list: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn load_effect(
    path: &Path,
    textures: &mut flarefx::TextureCache,
) -> anyhow::Result<flarefx::BuiltEffect> {
    let def = flarefx::EffectDefinition::from_path(path)?;
    let built = def
        .build(textures)
        .with_context(|| format!("build effect from '{}'", path.display()))?;
    Ok(built)
}

fn format_duration(seconds: f64) -> String {
    if seconds.is_infinite() {
        "endless".to_owned()
    } else {
        format!("{seconds}s")
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let mut textures = flarefx::TextureCache::new();
    let built = load_effect(&args.in_path, &mut textures)?;
    let effect = &built.effect;

    println!("effect '{}'", built.name);
    println!("  duration: {}", format_duration(effect.duration()));
    println!("  elements: {}", effect.elements().len());
    for (name, handler) in effect.handlers() {
        let scope = if handler.affects_all() {
            "all".to_owned()
        } else {
            format!("{:?}", handler.affected_indices())
        };
        println!("  handler '{name}': {} -> {scope}", handler.kind().name());
    }
    for (id, def) in textures.iter() {
        println!("  texture {}: {}", id.0, def.path);
    }
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.dt.is_finite() && args.dt >= 0.0,
        "--dt must be a non-negative number"
    );

    let mut textures = flarefx::TextureCache::new();
    let built = load_effect(&args.in_path, &mut textures)?;

    let scene = flarefx::Scene::new();
    let mut manager = flarefx::EffectManager::new(&scene);
    manager.add_effect(built.name.clone(), built.effect);
    let played = manager.play(
        &built.name,
        args.layer,
        flarefx::Vec2::new(args.x, args.y),
        flarefx::Vec2::new(args.scale, args.scale),
    );
    anyhow::ensure!(played, "effect '{}' did not start", built.name);

    let mut list = flarefx::DrawList::new();
    for frame in 0..args.frames {
        manager.update(args.dt);
        list.clear();
        scene.draw(&mut list, &flarefx::RenderStates::default());
        println!(
            "frame {frame}: running={} batches={} elements={} draws={}",
            manager.running_count(),
            scene.batch_count(),
            scene.elements_count(),
            list.len()
        );
        if manager.running_count() == 0 {
            break;
        }
    }

    if let Some(out) = args.draw_list {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&list).context("serialize draw list")?;
        std::fs::write(&out, json)
            .with_context(|| format!("write draw list '{}'", out.display()))?;
    }
    Ok(())
}
