//! Rail Rush entry point
//!
//! Headless demo driver standing in for the host engine: it owns the loop
//! and calls into the gameplay core in the documented order (frame tick,
//! fixed-step correction, event dispatch), synthesizing the ground contacts
//! and trigger crossings the engine's geometry system would report.

use glam::Vec3;

use rail_rush::consts::FIXED_DT;
use rail_rush::sim::{BodyTag, Game, GameEvent, TickInput, WorldEvent};
use rail_rush::tuning::Tuning;

/// Simulated run length in frames (60 fps, ~30 seconds of gameplay)
const DEMO_FRAMES: u32 = 60 * 30;
const FRAME_DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0x5EED);

    log::info!("Rail Rush demo starting (seed {seed})");

    let tuning = Tuning::load_from(std::path::Path::new("tuning.json"));
    let mut game = Game::new(tuning, seed);

    // Intro: one grounding contact from the spawn platform, then go
    game.handle_event(WorldEvent::Contact { point: Vec3::ZERO });
    game.start_run();

    let mut accumulator = 0.0f32;
    let mut next_trigger_z = game.tuning.segment_length;
    let mut stats = Stats::default();

    for frame in 0..DEMO_FRAMES {
        // 1. Frame tick with scripted edge-triggered inputs
        let input = scripted_input(frame);
        game.tick(&input, FRAME_DT);

        // 2. Fixed-step physics correction
        accumulator += FRAME_DT;
        while accumulator >= FIXED_DT {
            game.fixed_tick(FIXED_DT);
            accumulator -= FIXED_DT;
        }

        // 3. Event dispatch: what the engine's geometry system would report.
        // A body that sank through the floor gets pushed out, then the
        // contact is reported.
        if game.player.is_airborne() && game.player.position.y < 0.0 {
            game.player.position.y = 0.0;
            game.handle_event(WorldEvent::Contact {
                point: Vec3::new(game.player.position.x, 0.0, game.player.position.z),
            });
        }
        while game.player.position.z >= next_trigger_z {
            game.handle_event(WorldEvent::TriggerEntered {
                body: BodyTag::Player,
            });
            next_trigger_z += game.tuning.segment_length;
        }

        for event in game.drain_events() {
            stats.record(event);
            log::debug!("frame {frame}: {event:?}");
        }
    }

    println!("--- demo summary ---");
    println!("distance travelled: {:.1}", game.player.position.z);
    println!("final lane:         {:?}", game.player.lane);
    println!(
        "segments recycled:  {} (window {}, pool {})",
        stats.segments_spawned,
        game.recycler.window_len(),
        game.recycler.pool_len()
    );
    println!("lane changes:       {}", stats.lane_changes);
    println!("jumps / slides:     {} / {}", stats.jumps, stats.slides);
}

/// Deterministic input script: weave lanes, jump and slide on a cycle
fn scripted_input(frame: u32) -> TickInput {
    let mut input = TickInput::default();
    match frame % 240 {
        30 => input.lane_left = true,
        90 => input.lane_right = true,
        120 => input.jump = true,
        180 => input.slide = true,
        210 => input.lane_right = true,
        _ => {}
    }
    input
}

#[derive(Default)]
struct Stats {
    lane_changes: u32,
    jumps: u32,
    slides: u32,
    segments_spawned: u32,
}

impl Stats {
    fn record(&mut self, event: GameEvent) {
        match event {
            GameEvent::LaneChanged(_) => self.lane_changes += 1,
            GameEvent::Jumped => self.jumps += 1,
            GameEvent::SlideStarted => self.slides += 1,
            GameEvent::SegmentSpawned(_) => self.segments_spawned += 1,
            _ => {}
        }
    }
}
