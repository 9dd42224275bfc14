//! Voxel Sandbox - Headless Player Run
//!
//! Run with: `RUST_LOG=debug cargo run --bin voxel_sandbox [config.json]`
//!
//! Builds a flat bedrock floor with a stone wall, spawns the player and
//! plays a scripted input sequence: walk to the wall, dig a doorway through
//! it, turn back and place a block on the floor, then jump and strafe.
//! Positions and block edits are logged; nothing is rendered.

use std::error::Error;

use glam::{IVec3, Vec3};
use invasion_engine::physics::Rigidbody;
use invasion_engine::world::{BlockType, BlockWorld, VoxelGrid};
use invasion_engine::{EngineConfig, EntityPlayer, InputState, KeyCode, MouseButton, Simulation};

const TICK_RATE: f32 = 60.0;

/// One scripted stretch of input.
struct Phase {
    name: &'static str,
    ticks: u32,
    keys: &'static [KeyCode],
    /// Camera turn in degrees (yaw, pitch) applied on the first tick
    look: (f32, f32),
    click: Option<MouseButton>,
}

impl Phase {
    const fn hold(name: &'static str, ticks: u32, keys: &'static [KeyCode]) -> Self {
        Self { name, ticks, keys, look: (0.0, 0.0), click: None }
    }

    const fn look(name: &'static str, yaw: f32, pitch: f32) -> Self {
        Self { name, ticks: 1, keys: &[], look: (yaw, pitch), click: None }
    }

    const fn click(name: &'static str, button: MouseButton) -> Self {
        Self { name, ticks: 1, keys: &[], look: (0.0, 0.0), click: Some(button) }
    }
}

const SCRIPT: &[Phase] = &[
    Phase::hold("settle", 10, &[]),
    Phase::hold("walk to wall", 120, &[KeyCode::W]),
    Phase::click("dig low", MouseButton::Left),
    Phase::look("look up", 0.0, -30.0),
    Phase::click("dig high", MouseButton::Left),
    Phase::look("look level", 0.0, 30.0),
    Phase::hold("sprint through", 20, &[KeyCode::W, KeyCode::ShiftLeft]),
    Phase::look("turn around", 180.0, 30.0),
    Phase::click("build", MouseButton::Right),
    Phase::look("look level", 0.0, -30.0),
    Phase::hold("jump", 45, &[KeyCode::Space]),
    Phase::hold("strafe", 60, &[KeyCode::D]),
];

fn build_world() -> VoxelGrid {
    let mut world = VoxelGrid::new();
    let floor = world.fill(IVec3::new(-32, 0, -32), IVec3::new(32, 0, 32), BlockType::BEDROCK);
    let wall = world.fill(IVec3::new(-3, 1, 8), IVec3::new(3, 2, 8), BlockType::STONE);
    log::info!("world: {} floor blocks, {} wall blocks", floor, wall);
    world
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading config from {}", path);
            EngineConfig::load(&path)?
        }
        None => EngineConfig::default(),
    };

    let mut sim = Simulation::new(build_world(), config);
    let mut input = InputState::new();
    sim.spawn("Player", &mut input, |object, config| {
        EntityPlayer::new(object, &config.player)
    })?;
    let player = sim
        .scene()
        .root("Player")
        .ok_or("player object missing after spawn")?;
    sim.scene_mut().set_local_position(player, Vec3::new(0.5, 1.0, 0.5))?;

    let dt = 1.0 / TICK_RATE;
    for phase in SCRIPT {
        let solid_before = sim.world().solid_count();
        for key in phase.keys {
            input.keyboard.handle_key(*key, true);
        }
        // Mouselook turns by delta * sensitivity * dt degrees
        let per_delta = sim.config().player.mouse_sensitivity * dt;
        if per_delta > 0.0 {
            input
                .mouse
                .accumulate_delta(phase.look.0 / per_delta, phase.look.1 / per_delta);
        }
        if let Some(button) = phase.click {
            input.mouse.set_button(button, true);
        }

        for _ in 0..phase.ticks {
            input.begin_frame(dt);
            sim.tick(&mut input)?;
        }

        if let Some(button) = phase.click {
            input.mouse.set_button(button, false);
        }
        for key in phase.keys {
            input.keyboard.handle_key(*key, false);
        }

        let position = sim.scene().world_position(player)?;
        let grounded = sim
            .scene()
            .component::<Rigidbody>(player)
            .is_some_and(|body| body.grounded());
        log::info!(
            "{:<16} pos=({:.2}, {:.2}, {:.2}) grounded={} solid blocks {} -> {}",
            phase.name,
            position.x,
            position.y,
            position.z,
            grounded,
            solid_before,
            sim.world().solid_count()
        );
    }

    let edited = sim.world_mut().drain_dirty_chunks();
    log::info!(
        "{} ticks, {} chunks need remeshing, block at wall gap: {}",
        sim.tick_count(),
        edited.len(),
        sim.world().block(IVec3::new(0, 1, 8)).name()
    );
    Ok(())
}
