//! Fehlertypen der Spline-Engine.

use thiserror::Error;

/// Fehler bei Abfragen und Mutationen am Spline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SplineError {
    /// Index liegt auch nach Loop-Umrechnung außerhalb des gültigen Bereichs
    #[error("Spline-Punkt nicht gefunden: Index {index} liegt außerhalb von 0..{point_count}")]
    PointNotFound { index: isize, point_count: usize },

    /// Die Operation würde die Mindest-Punktzahl unterschreiten
    #[error("Spline benötigt mindestens zwei Punkte")]
    TooFewPoints,

    /// Nicht-endliche Eingabe (NaN oder ±∞) wurde zurückgewiesen
    #[error("Degenerierte Geometrie: Eingabe enthält nicht-endliche Werte")]
    DegenerateGeometry,
}
