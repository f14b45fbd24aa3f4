//! # strand-contact
//!
//! Obstacle collision for cable simulation.
//!
//! Collision here is a per-node position projection, split into:
//! 1. **Snapshots** — immutable per-tick copies of host collider geometry
//! 2. **Resolvers** — pure sphere and oriented-box projections
//! 3. **Bookkeeping** — which nodes are in contact and which neighbours
//!    surround them
//!
//! An optional pairwise self-collision pass keeps distant parts of one
//! cable from overlapping.

pub mod box_collider;
pub mod locality;
pub mod response;
pub mod self_collision;
pub mod snapshot;
pub mod sphere;

pub use box_collider::BoxSnapshot;
pub use locality::{CollisionLocalityTracker, LocalityEntry, LocalityUpdate};
pub use response::ContactResult;
pub use self_collision::{SelfCollisionPass, SelfCollisionResult};
pub use snapshot::{BoxDescriptor, ColliderSet, SphereDescriptor};
pub use sphere::SphereSnapshot;
