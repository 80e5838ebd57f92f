//! Aberred Tween command line player.
//!
//! Loads a tween document (JSON), binds it to a freshly spawned target entity
//! carrying every animatable component, plays it and prints the target's
//! property values while simulating frames at a fixed delta.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- demos/bounce.json --frames 120 --every 10
//! cargo run --release -- --list-kinds
//! cargo run --release -- --template multi_position
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use bevy_ecs::message::Messages;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info};

use aberredtween::components::anchoredposition::AnchoredPosition;
use aberredtween::components::canvasgroup::CanvasGroup;
use aberredtween::components::globaltransform::GlobalTransform;
use aberredtween::components::mapposition::MapPosition;
use aberredtween::components::rotation::Rotation;
use aberredtween::components::scale::Scale;
use aberredtween::components::sprite::Sprite;
use aberredtween::components::tint::Tint;
use aberredtween::components::uiimage::UiImage;
use aberredtween::components::zindex::ZIndex;
use aberredtween::events::tween::{TweenCmd, TweenFinishedEvent};
use aberredtween::resources::tweenconfig::TweenConfig;
use aberredtween::resources::tweenstore::TweenStore;
use aberredtween::resources::worldtime::WorldTime;
use aberredtween::systems::propagate_transforms::propagate_transforms;
use aberredtween::systems::time::update_world_time;
use aberredtween::systems::tween::update_tweens;
use aberredtween::tween::factory::TweenFactory;
use aberredtween::tween::{PlayOptions, Tween};

/// Aberred Tween player
#[derive(Parser)]
#[command(version, about = "Plays a tween document against a simulated entity and prints its properties.")]
struct Cli {
    /// Tween document to play (JSON).
    #[arg(value_name = "FILE", required_unless_present_any = ["list_kinds", "template"])]
    tween: Option<PathBuf>,

    /// INI file with tween defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Fixed frame delta in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Play from the end back to the start.
    #[arg(long)]
    reverse: bool,

    /// Continue from the target's current values instead of snapping to the start.
    #[arg(long)]
    from_current: bool,

    /// Print the target every N frames.
    #[arg(long, default_value_t = 10)]
    every: u32,

    /// Children spawned under the target for fan-out documents.
    #[arg(long, default_value_t = 3)]
    children: u32,

    /// List the registered primitive kinds and exit.
    #[arg(long)]
    list_kinds: bool,

    /// Print the default JSON document of a primitive kind and exit.
    #[arg(long, value_name = "KIND")]
    template: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = match &cli.config {
        Some(path) => TweenConfig::with_path(path),
        None => TweenConfig::new(),
    };
    if cli.config.is_some() {
        config.load_from_file()?;
    }
    let factory = TweenFactory::from_config(&config);

    // Early-exit: informational flags need no world
    if cli.list_kinds {
        for name in factory.names() {
            println!("{name}");
        }
        return Ok(());
    }
    if let Some(kind) = &cli.template {
        let tween = factory
            .create(kind, None)
            .ok_or_else(|| format!("Unknown tween kind '{kind}'"))?;
        let json = serde_json::to_string_pretty(&Tween::Simple(tween))
            .map_err(|e| format!("Failed to serialize template: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    let Some(path) = cli.tween else {
        return Err("No tween document given".to_string());
    };
    let tween = load_tween(&path)?;

    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(config);
    world.insert_resource(TweenStore::new());
    world.init_resource::<Messages<TweenCmd>>();
    world.add_observer(|trigger: On<TweenFinishedEvent>| {
        info!("tween {:?} finished: {:?}", trigger.id, trigger.outcome);
    });

    let target = spawn_target(&mut world, cli.children);
    let id = world
        .resource_mut::<TweenStore>()
        .insert(tween.clone_for(Some(target)));
    let options = PlayOptions {
        reverse: cli.reverse,
        from_current: cli.from_current,
    };
    world
        .resource_mut::<Messages<TweenCmd>>()
        .write(TweenCmd::Play { id, options });

    let mut schedule = Schedule::default();
    schedule.add_systems((update_tweens, propagate_transforms).chain());

    let every = cli.every.max(1);
    for frame in 1..=cli.frames {
        update_world_time(&mut world, cli.dt);
        schedule.run(&mut world);
        if frame % every == 0 || frame == cli.frames {
            print_target(&world, frame, target);
        }
        if world.resource::<TweenStore>().playing().is_empty() {
            print_target(&world, frame, target);
            break;
        }
    }
    Ok(())
}

fn load_tween(path: &Path) -> Result<Tween, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let tween: Tween = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
    tween
        .validate()
        .map_err(|e| format!("Invalid tween in {}: {}", path.display(), e))?;
    info!("Loaded tween from {} ({:.3}s)", path.display(), tween.length());
    Ok(tween)
}

/// Spawn an entity carrying every component a tween can animate.
fn spawn_target(world: &mut World, children: u32) -> Entity {
    let target = world
        .spawn((
            MapPosition::default(),
            AnchoredPosition::default(),
            Rotation::default(),
            Scale::default(),
            GlobalTransform::default(),
            Tint::default(),
            UiImage::default(),
            CanvasGroup::default(),
            Sprite::new("frame_0"),
            ZIndex(0),
        ))
        .id();
    for i in 0..children {
        world.spawn((
            MapPosition::new(0.0, i as f32 * 10.0, 0.0),
            Rotation::default(),
            Scale::default(),
            GlobalTransform::default(),
            Tint::default(),
            ChildOf(target),
        ));
    }
    target
}

fn print_target(world: &World, frame: u32, target: Entity) {
    let Ok(entity) = world.get_entity(target) else {
        return;
    };
    let pos = entity.get::<MapPosition>().map(|p| p.pos).unwrap_or_default();
    let rot = entity.get::<Rotation>().map(|r| r.degrees).unwrap_or_default();
    let scale = entity.get::<Scale>().map(|s| s.scale).unwrap_or_default();
    let tint = entity.get::<Tint>().map(|t| t.color).unwrap_or_default();
    let sprite = entity.get::<Sprite>().map(|s| s.tex_key.as_str()).unwrap_or("");
    println!(
        "frame {frame:>4}: pos=({:.3}, {:.3}, {:.3}) rot={:.2} scale=({:.3}, {:.3}) tint=({:.2}, {:.2}, {:.2}, {:.2}) sprite={sprite}",
        pos.x, pos.y, pos.z, rot.z, scale.x, scale.y, tint.r, tint.g, tint.b, tint.a
    );
}
