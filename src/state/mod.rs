pub mod maneuver;
pub mod store;
pub mod types;

pub use maneuver::{
    apply_maneuver, apply_maneuver_at, restore_original_trajectory,
    restore_original_trajectory_at,
};
pub use store::StateStore;
pub use types::{
    ManeuverReason, ManeuverRecord, Position, SpacecraftState, TrajectorySnapshot, Velocity,
};
