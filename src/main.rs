//! Memao animator demo entry point.
//!
//! Runs the animator headless for a fixed number of ticks:
//!
//! 1. Load `memao.ini` (or `--config`) and build the ECS world
//! 2. Spawn a player, a follower and a map event using Memao sheets
//! 3. Walk and dash the player along a route, then run a small script that
//!    plays a waited chop followed by a looping watering action on the event
//! 4. Log frame changes and the sound effects the host would play
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --ticks 300
//! cargo run -- --dump-table
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use crossbeam_channel::Receiver;

use memaoanimator::components::character::{Character, Direction, Follower, MapEvent, Player};
use memaoanimator::components::gridmover::GridMover;
use memaoanimator::components::sprite::Sprite;
use memaoanimator::events::audio::AudioCmd;
use memaoanimator::game::{build_schedule, setup_world, tick};
use memaoanimator::resources::animatorconfig::AnimatorConfig;
use memaoanimator::resources::rangetable::RangeTable;
use memaoanimator::resources::texturestore::TextureStore;
use memaoanimator::systems::actions::{
    ActionTarget, DirectionArg, PlayAction, ScriptContext, play_action, stop_action,
};
use memaoanimator::systems::waitmode::poll_wait;

/// Memao sprite-sheet animator
#[derive(Parser)]
#[command(version, about = "Headless demo of the Memao sprite-sheet animator")]
struct Cli {
    /// Configuration file (default: ./memao.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of 60 Hz ticks to simulate.
    #[arg(long, default_value_t = 240)]
    ticks: u32,

    /// Print the compiled range table as JSON and exit.
    #[arg(long)]
    dump_table: bool,
}

/// Ticks before the fake loader reports the sheets ready.
const TEXTURE_LOAD_TICKS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DemoStep {
    WalkOut,
    Chop,
    WaitChop,
    Water,
    WaitWater,
    Done,
}

/// Tiny stand-in for the host's event interpreter.
struct DemoScript {
    ctx: ScriptContext,
    step: DemoStep,
}

impl DemoScript {
    fn update(&mut self, world: &mut World, player: Entity) {
        match self.step {
            DemoStep::WalkOut => {
                let done = world.get::<GridMover>(player).is_none_or(|m| m.is_idle());
                if done {
                    self.step = DemoStep::Chop;
                }
            }
            DemoStep::Chop => {
                let cmd = PlayAction::new(ActionTarget::Player, "chop")
                    .with_direction(DirectionArg::Fixed(Direction::Down))
                    .wait(true);
                play_action(world, &self.ctx, &cmd);
                self.step = DemoStep::WaitChop;
            }
            DemoStep::WaitChop => {
                if !poll_wait(world, self.ctx.interpreter) {
                    self.step = DemoStep::Water;
                }
            }
            DemoStep::Water => {
                let cmd = PlayAction::new(ActionTarget::ThisEvent, "watering")
                    .looped(true)
                    .wait(true)
                    .wait_cycles(2);
                play_action(world, &self.ctx, &cmd);
                self.step = DemoStep::WaitWater;
            }
            DemoStep::WaitWater => {
                if !poll_wait(world, self.ctx.interpreter) {
                    stop_action(world, &self.ctx, ActionTarget::ThisEvent);
                    self.step = DemoStep::Done;
                }
            }
            DemoStep::Done => {}
        }
    }
}

fn spawn_cast(world: &mut World) -> Entity {
    let mut mover = GridMover::new(4, 4, 48.0);
    mover.push_route([
        Direction::Right,
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
        Direction::Up,
    ]);
    let player = world
        .spawn((Character::new("teo_$(memao)"), Player, mover))
        .id();
    world.spawn((
        Character::new("ana_$(memao)"),
        Follower,
        GridMover::new(3, 4, 48.0),
    ));
    world.spawn((
        Character::new("farmer_$(memao)").with_direction(Direction::Left),
        MapEvent { id: 1 },
        GridMover::new(8, 6, 48.0),
    ));
    player
}

fn finish_texture_loads(world: &mut World, config: &AnimatorConfig) {
    let mut textures = world.resource_mut::<TextureStore>();
    let pending: Vec<String> = textures.pending().map(str::to_string).collect();
    for key in pending {
        log::info!("Texture '{}' ready", key);
        textures.mark_ready(key, config.cell_width * 3, config.cell_height * 24);
    }
}

fn drain_audio(rx: &Receiver<AudioCmd>, tick_no: u32) {
    for cmd in rx.try_iter() {
        match cmd {
            AudioCmd::PlaySe(se) => log::info!(
                "tick {}: play SE '{}' (vol {}, pitch {}, pan {})",
                tick_no,
                se.name,
                se.volume,
                se.pitch,
                se.pan
            ),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => AnimatorConfig::with_path(path),
        None => AnimatorConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }

    if cli.dump_table {
        let table = RangeTable::load(config.row_map_path.as_deref());
        match serde_json::to_string_pretty(&table.to_named_map()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing range table: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    log::info!("Memao animator demo: {} ticks", cli.ticks);
    let mut world = World::new();
    let audio_rx = setup_world(&mut world, config.clone());
    let player = spawn_cast(&mut world);
    let mut schedule = build_schedule();
    let mut script = DemoScript {
        ctx: ScriptContext::new(1).with_event(1),
        step: DemoStep::WalkOut,
    };

    let mut last_frames: Vec<(Entity, (f32, f32))> = Vec::new();
    for tick_no in 1..=cli.ticks {
        if tick_no == TEXTURE_LOAD_TICKS {
            finish_texture_loads(&mut world, &config);
        }
        if tick_no == 30 {
            if let Some(mut character) = world.get_mut::<Character>(player) {
                character.dashing = true;
            }
        }

        script.update(&mut world, player);
        tick(&mut world, &mut schedule);
        drain_audio(&audio_rx, tick_no);

        let mut sprites = world.query::<(Entity, &Sprite)>();
        let frames: Vec<(Entity, (f32, f32))> = sprites
            .iter(&world)
            .map(|(e, s)| (e, (s.frame.x, s.frame.y)))
            .collect();
        for (entity, frame) in &frames {
            let changed = last_frames
                .iter()
                .find(|(e, _)| e == entity)
                .is_none_or(|(_, f)| f != frame);
            if changed {
                log::debug!("tick {}: {:?} frame at {:?}", tick_no, entity, frame);
            }
        }
        last_frames = frames;
    }
    log::info!("Demo finished at step {:?}", script.step);
}
