//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Driven by an external loop, never self-scheduling
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! Call order per host frame: `Game::tick` once, `Game::fixed_tick` zero or
//! more times on the fixed step, then `Game::handle_event` for every
//! collision/trigger report the engine produced.

pub mod player;
pub mod pool;
pub mod tick;
pub mod world;

pub use player::{ColliderShape, Lane, LaneShift, PlayerState};
pub use pool::{Lease, ObjectPool, PoolItem};
pub use tick::{BodyTag, Game, GameEvent, Prop, PropKind, TickInput, WorldEvent};
pub use world::{AreaRecycler, FollowCollider, Recycle, Segment, SegmentId, SegmentKind};
