//! Core-Domänentypen: Kontrollpunkte, Spline-Container, Kurven-Mathematik.

pub mod curve;
pub mod error;
pub mod event;
pub mod oriented_point;
/// Core-Datenmodelle der Spline-Engine
///
/// Dieses Modul definiert die Haupt-Datenstrukturen:
/// - Spline: geordneter Container für alle Kontrollpunkte
/// - SplinePoint: einzelner Kontrollpunkt mit Pose und Tangenten
/// - OrientedPoint: Position + Rotation als Wertetyp
pub mod spline;
pub mod spline_point;

pub use error::SplineError;
pub use event::SplineEvent;
pub use oriented_point::OrientedPoint;
pub use spline::Spline;
pub use spline_point::{SplinePoint, TangentMode};
