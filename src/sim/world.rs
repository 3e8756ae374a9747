//! World segment recycling
//!
//! A fixed set of pre-built track segments fakes infinite terrain: each
//! time the player crosses a spawn trigger, the oldest active segment is
//! retired and a freshly shuffled one is placed ahead. Segments are created
//! once and reused forever by repositioning, never destroyed.

use std::collections::VecDeque;

use glam::Vec3;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Opaque handle to a pre-built world tile owned by the recycler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentId(u32);

/// Prefab variant a segment was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentKind(pub u32);

/// A pre-built chunk of track geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Placed and collidable in the world
    pub active: bool,
    /// Origin along the travel axis
    pub offset: f32,
}

/// Outcome of one recycle step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recycle {
    /// Segment deactivated and returned to the pool, if the window had one
    pub retired: Option<SegmentId>,
    /// Segment placed ahead of the player, if the pool had one
    pub placed: Option<SegmentId>,
}

/// Rotates a pool of pre-built segments through a small active window
///
/// Owns all segment storage exclusively. Every segment id lives in exactly
/// one of the pool (shuffle order, consumed front-to-back) or the active
/// window (oldest first) at any time.
#[derive(Debug, Clone)]
pub struct AreaRecycler {
    segments: Vec<Segment>,
    /// Inactive segments in shuffle order
    pool: Vec<SegmentId>,
    /// Segments currently placed in the world, oldest first
    window: VecDeque<SegmentId>,
    /// Next placement slot along the travel axis
    next_slot: u32,
    /// Travel-axis distance between segment origins
    distance: f32,
    rng: Pcg32,
}

impl AreaRecycler {
    /// Seed the active window with pre-placed segments (in the given order,
    /// at offsets `0, distance, 2·distance, …`) and build the pool with one
    /// inactive copy per prefab kind, shuffled.
    ///
    /// Empty inputs are a configuration error: the recycler still works but
    /// degrades, and a warning is logged.
    pub fn new(seed: u64, distance: f32, seeded: &[SegmentKind], prefabs: &[SegmentKind]) -> Self {
        if seeded.is_empty() {
            log::warn!("no pre-placed segments; the active window starts empty");
        }
        if prefabs.is_empty() {
            log::warn!("no segment prefabs; the rotation pool starts empty");
        }

        let mut segments = Vec::with_capacity(seeded.len() + prefabs.len());
        let mut window = VecDeque::with_capacity(seeded.len());
        let mut pool = Vec::with_capacity(prefabs.len());

        for (slot, &kind) in seeded.iter().enumerate() {
            let id = SegmentId(segments.len() as u32);
            segments.push(Segment {
                kind,
                active: true,
                offset: slot as f32 * distance,
            });
            window.push_back(id);
        }
        for &kind in prefabs {
            let id = SegmentId(segments.len() as u32);
            segments.push(Segment {
                kind,
                active: false,
                offset: 0.0,
            });
            pool.push(id);
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        pool.shuffle(&mut rng);

        Self {
            segments,
            pool,
            next_slot: seeded.len() as u32,
            window,
            distance,
            rng,
        }
    }

    /// Retire the oldest active segment into the pool, reshuffle, and place
    /// a freshly drawn segment ahead of the player. Called once per trigger
    /// crossing.
    ///
    /// The placement counter advances even when a step degrades, so a
    /// failed spawn skips a slot rather than overlapping a later one.
    pub fn advance(&mut self) -> Recycle {
        let slot = self.next_slot;
        self.next_slot += 1;

        let retired = self.window.pop_front();
        match retired {
            Some(id) => {
                self.segments[id.0 as usize].active = false;
                self.pool.push(id);
            }
            None => log::warn!("recycle with an empty active window; check seed configuration"),
        }

        self.pool.shuffle(&mut self.rng);

        if self.pool.is_empty() {
            log::warn!("no segments available in the pool");
            return Recycle {
                retired,
                placed: None,
            };
        }
        let id = self.pool.remove(0);
        let segment = &mut self.segments[id.0 as usize];
        segment.active = true;
        segment.offset = slot as f32 * self.distance;
        self.window.push_back(id);

        Recycle {
            retired,
            placed: Some(id),
        }
    }

    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id.0 as usize]
    }

    /// Active segments, oldest first
    pub fn window(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.window.iter().copied()
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Total segments ever built (pool + window, by the ownership invariant)
    pub fn total(&self) -> usize {
        self.segments.len()
    }
}

/// Guard volume that trails the player along the travel axis
///
/// The engine keeps it colliding with whatever falls behind the run; the
/// gameplay layer only has to snap it to the player's travel position.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FollowCollider {
    pub position: Vec3,
}

impl FollowCollider {
    /// Per-frame: follow the player along the travel axis only
    pub fn follow(&mut self, player_z: f32) {
        self.position.z = player_z;
    }
}
