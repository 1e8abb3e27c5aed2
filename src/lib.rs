//! Bezier-Spline-Engine für Routen-Editoren.
//! Orientierte Kontrollpunkte, Tangenten-Modi, Sampling und Verfolgung
//! als Library exportiert für Tests und Wiederverwendung.

pub mod attachment;
pub mod core;
pub mod follow;

pub use attachment::SplineAttachment;
pub use core::{
    OrientedPoint, Spline, SplineError, SplineEvent, SplinePoint, TangentMode,
};
pub use follow::{FollowStatus, WaypointFollower};
