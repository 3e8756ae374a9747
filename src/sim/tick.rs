//! Driver glue and application context
//!
//! The host loop owns scheduling and calls in with a fixed order per frame:
//!
//! 1. [`Game::tick`] once per rendered frame (input + frame-rate movement)
//! 2. [`Game::fixed_tick`] zero or more times on the fixed physics step
//! 3. [`Game::handle_event`] for each collision/trigger report
//!
//! `Game` is the explicitly-constructed application context: one instance
//! of each manager, passed by reference to whoever needs it. No global
//! singletons, so tests can run several games side by side.

use glam::Vec3;

use super::player::{Lane, LaneShift, PlayerState};
use super::pool::{Lease, ObjectPool, PoolItem};
use super::world::{AreaRecycler, FollowCollider, SegmentId, SegmentKind};
use crate::tuning::Tuning;

/// Edge-triggered input for a single frame (fire once per press, not held)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub lane_left: bool,
    pub lane_right: bool,
    pub jump: bool,
    pub slide: bool,
}

/// Tag carried by bodies the geometry system reports about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyTag {
    Player,
    Other,
}

/// Reports from the host engine's geometry system
#[derive(Debug, Clone, Copy)]
pub enum WorldEvent {
    /// Collision contact at a world point
    Contact { point: Vec3 },
    /// A body entered the spawn trigger volume
    TriggerEntered { body: BodyTag },
}

/// Things that happened during an update, for the embedding layer
/// (animation, audio) to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    LaneChanged(Lane),
    Jumped,
    SlideStarted,
    SlideEnded,
    Grounded,
    SegmentSpawned(SegmentId),
    SegmentRetired(SegmentId),
}

/// Prop prefab variants decorating segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropKind {
    Barrier,
    LowBeam,
    Coin,
}

/// Obstacle/decoration instance parked in the prop pool
#[derive(Debug, Clone)]
pub struct Prop {
    pub active: bool,
    pub position: Vec3,
}

impl Prop {
    fn new() -> Self {
        Self {
            active: false,
            position: Vec3::ZERO,
        }
    }
}

impl PoolItem for Prop {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// Prop layout per segment: local travel-axis offset and lane per kind
const SEGMENT_PROPS: [(PropKind, f32, Lane); 3] = [
    (PropKind::Barrier, 20.0, Lane::Left),
    (PropKind::LowBeam, 45.0, Lane::Middle),
    (PropKind::Coin, 70.0, Lane::Right),
];

/// Application context holding one instance of each manager
pub struct Game {
    pub tuning: Tuning,
    pub player: PlayerState,
    pub recycler: AreaRecycler,
    pub props: ObjectPool<PropKind, Prop>,
    pub guard: FollowCollider,
    /// Props on loan, keyed by the segment they decorate
    prop_leases: Vec<(SegmentId, Lease<PropKind, Prop>)>,
    events: Vec<GameEvent>,
}

impl Game {
    /// Build the full context: player frozen in the middle lane, window
    /// seeded with pre-placed segments, prop pool preloaded, everything
    /// deterministic under `seed`.
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let seeded: Vec<SegmentKind> = (0..tuning.initial_segments)
            .map(|i| SegmentKind(i as u32 % tuning.segment_variants.max(1) as u32))
            .collect();
        let prefabs: Vec<SegmentKind> = (0..tuning.segment_variants)
            .map(|i| SegmentKind(i as u32))
            .collect();
        let recycler = AreaRecycler::new(seed, tuning.segment_length, &seeded, &prefabs);

        let mut props = ObjectPool::new();
        for kind in [PropKind::Barrier, PropKind::LowBeam, PropKind::Coin] {
            props.preload(kind, tuning.prop_pool_size, Prop::new);
        }

        let player = PlayerState::new(&tuning);
        let mut game = Self {
            tuning,
            player,
            recycler,
            props,
            guard: FollowCollider::default(),
            prop_leases: Vec::new(),
            events: Vec::new(),
        };

        // Pre-placed segments get their props up front
        let seeded_ids: Vec<SegmentId> = game.recycler.window().collect();
        for id in seeded_ids {
            game.decorate(id);
        }
        game
    }

    /// Intro hook: restore cruise speed and unlock jump/slide
    pub fn start_run(&mut self) {
        self.player.set_forward_speed(self.tuning.forward_speed);
        self.player.set_actions_enabled(true);
        log::info!("run started at speed {}", self.tuning.forward_speed);
    }

    /// Outro hook: freeze the player and lock actions
    pub fn freeze(&mut self) {
        self.player.set_forward_speed(0.0);
        self.player.set_actions_enabled(false);
    }

    /// Per-frame update: apply edge-triggered inputs, advance frame-rate
    /// movement, keep the guard collider glued to the player
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        if input.lane_left && self.player.switch_lane(LaneShift::Left, &self.tuning) {
            self.events.push(GameEvent::LaneChanged(self.player.lane));
        }
        if input.lane_right && self.player.switch_lane(LaneShift::Right, &self.tuning) {
            self.events.push(GameEvent::LaneChanged(self.player.lane));
        }
        if input.jump && self.player.jump(&self.tuning) {
            self.events.push(GameEvent::Jumped);
        }
        if input.slide && self.player.slide(&self.tuning) {
            self.events.push(GameEvent::SlideStarted);
        }

        if self.player.tick(dt, &self.tuning) {
            self.events.push(GameEvent::SlideEnded);
        }
        self.guard.follow(self.player.position.z);
    }

    /// Fixed-step physics correction
    pub fn fixed_tick(&mut self, dt: f32) {
        self.player.fixed_tick(dt, &self.tuning);
    }

    /// Dispatch one collision/trigger report from the engine
    pub fn handle_event(&mut self, event: WorldEvent) {
        match event {
            WorldEvent::Contact { point } => {
                if self.player.on_contact(point) {
                    self.events.push(GameEvent::Grounded);
                }
            }
            WorldEvent::TriggerEntered {
                body: BodyTag::Player,
            } => self.spawn_next_area(),
            WorldEvent::TriggerEntered { .. } => {}
        }
    }

    /// Drain the events accumulated since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// One recycle step: retire the oldest segment (returning its props to
    /// the pool first) and decorate the freshly placed one
    fn spawn_next_area(&mut self) {
        let outcome = self.recycler.advance();

        if let Some(retired) = outcome.retired {
            let mut kept = Vec::with_capacity(self.prop_leases.len());
            for (segment, lease) in self.prop_leases.drain(..) {
                if segment == retired {
                    self.props.release(lease);
                } else {
                    kept.push((segment, lease));
                }
            }
            self.prop_leases = kept;
            self.events.push(GameEvent::SegmentRetired(retired));
        }

        if let Some(placed) = outcome.placed {
            self.decorate(placed);
            self.events.push(GameEvent::SegmentSpawned(placed));
        }
    }

    /// Lease props onto a segment at its fixed local layout. Exhaustion
    /// skips the prop (the pool already warned), it never blocks the spawn.
    fn decorate(&mut self, id: SegmentId) {
        let offset = self.recycler.segment(id).offset;
        for (kind, local_z, lane) in SEGMENT_PROPS {
            let Some(mut lease) = self.props.acquire(kind) else {
                continue;
            };
            let x = lane.offset_x(self.tuning.lane_spacing);
            lease.position = Vec3::new(x, 0.0, offset + local_z);
            self.prop_leases.push((id, lease));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FIXED_DT;

    const DT: f32 = 1.0 / 60.0;

    fn started_game(seed: u64) -> Game {
        let mut game = Game::new(Tuning::default(), seed);
        game.start_run();
        game.handle_event(WorldEvent::Contact { point: Vec3::ZERO });
        game.drain_events();
        game
    }

    #[test]
    fn test_trigger_crossing_advances_exactly_once() {
        let mut game = started_game(1);
        let window_before: Vec<SegmentId> = game.recycler.window().collect();

        game.handle_event(WorldEvent::TriggerEntered {
            body: BodyTag::Player,
        });

        let events = game.drain_events();
        let spawns = events
            .iter()
            .filter(|e| matches!(e, GameEvent::SegmentSpawned(_)))
            .count();
        assert_eq!(spawns, 1);
        let window_after: Vec<SegmentId> = game.recycler.window().collect();
        assert_eq!(window_after.len(), window_before.len());
        assert_ne!(window_after, window_before);
    }

    #[test]
    fn test_non_player_trigger_is_ignored() {
        let mut game = started_game(2);
        let window_before: Vec<SegmentId> = game.recycler.window().collect();

        game.handle_event(WorldEvent::TriggerEntered {
            body: BodyTag::Other,
        });

        assert!(game.drain_events().is_empty());
        let window_after: Vec<SegmentId> = game.recycler.window().collect();
        assert_eq!(window_after, window_before);
    }

    #[test]
    fn test_props_follow_the_window() {
        let mut game = started_game(3);
        let per_segment = SEGMENT_PROPS.len();
        let window = game.recycler.window_len();
        assert_eq!(game.prop_leases.len(), per_segment * window);

        for _ in 0..10 {
            game.handle_event(WorldEvent::TriggerEntered {
                body: BodyTag::Player,
            });
            // Retired segments hand their props back before the new
            // segment draws, so the loan count stays pinned to the window
            assert_eq!(game.prop_leases.len(), per_segment * game.recycler.window_len());
        }
    }

    #[test]
    fn test_input_drives_player_and_emits_events() {
        let mut game = started_game(4);

        let input = TickInput {
            lane_left: true,
            jump: true,
            ..Default::default()
        };
        game.tick(&input, DT);

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::LaneChanged(Lane::Left)));
        assert!(events.contains(&GameEvent::Jumped));
        assert!(game.player.is_airborne());

        // Landing back on the ground emits Grounded
        for _ in 0..200 {
            game.fixed_tick(FIXED_DT);
            if game.player.position.y <= 0.0 {
                game.handle_event(WorldEvent::Contact {
                    point: Vec3::new(0.0, 0.0, game.player.position.z),
                });
                break;
            }
        }
        assert!(game.drain_events().contains(&GameEvent::Grounded));
        assert!(game.player.is_grounded());
    }

    #[test]
    fn test_frozen_game_ignores_inputs() {
        let mut game = Game::new(Tuning::default(), 5);
        game.handle_event(WorldEvent::Contact { point: Vec3::ZERO });
        game.drain_events();

        let input = TickInput {
            lane_right: true,
            jump: true,
            slide: true,
            ..Default::default()
        };
        game.tick(&input, DT);
        assert!(game.drain_events().is_empty());
        assert_eq!(game.player.lane, Lane::Middle);
    }

    #[test]
    fn test_guard_collider_trails_player() {
        let mut game = started_game(6);
        for _ in 0..30 {
            game.tick(&TickInput::default(), DT);
        }
        assert!(game.player.position.z > 0.0);
        assert_eq!(game.guard.position.z, game.player.position.z);
    }

    #[test]
    fn test_determinism_per_seed() {
        let script = [
            TickInput {
                lane_left: true,
                ..Default::default()
            },
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                slide: true,
                ..Default::default()
            },
        ];

        let mut a = started_game(99);
        let mut b = started_game(99);
        for input in &script {
            a.tick(input, DT);
            b.tick(input, DT);
            a.fixed_tick(FIXED_DT);
            b.fixed_tick(FIXED_DT);
            a.handle_event(WorldEvent::TriggerEntered {
                body: BodyTag::Player,
            });
            b.handle_event(WorldEvent::TriggerEntered {
                body: BodyTag::Player,
            });
        }

        assert_eq!(a.player.position, b.player.position);
        assert_eq!(a.drain_events(), b.drain_events());
        let kinds = |game: &Game| -> Vec<SegmentKind> {
            game.recycler
                .window()
                .map(|id| game.recycler.segment(id).kind)
                .collect()
        };
        assert_eq!(kinds(&a), kinds(&b));
    }
}
