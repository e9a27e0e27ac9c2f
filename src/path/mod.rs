//! Camera path planning.
//!
//! A path is an ordered list of waypoints. Each consecutive pair forms a
//! leg, and each leg is walked with an eased pan speed: slow near both
//! ends and fastest at the midpoint.

mod planner;
mod waypoint;

pub use planner::{pan_speed, Leg, LegOrigins, LegStep, Origin, PathPlanner, MAX_PAN_SPEED};
pub use waypoint::{DirectiveError, PathDirective, Waypoint};
