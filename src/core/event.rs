//! Änderungs-Ereignisse des Spline-Containers.

use super::SplinePoint;

/// Strukturelle Änderung am Spline.
///
/// Ereignisse tragen eine eigene Kopie des betroffenen Punktes samt seinem
/// Listen-Index zum Zeitpunkt der Änderung. Beobachter arbeiten nur mit
/// diesem Schnappschuss und fragen den Spline bei Bedarf danach neu ab.
#[derive(Debug, Clone, PartialEq)]
pub enum SplineEvent {
    /// Punkt eingefügt; nach Duplikat-Bereinigung der überlebende Punkt
    PointInserted {
        /// Listen-Index des überlebenden Punktes
        index: usize,
        /// Schnappschuss des Punktes
        point: SplinePoint,
    },
    /// Punkt entfernt
    PointRemoved {
        /// Listen-Index, an dem der Punkt stand
        index: usize,
        /// Der entfernte Punkt
        point: SplinePoint,
    },
}
