//! Kopplung der Spline an eine übergeordnete Bezugspose.
//!
//! Ein Host (etwa ein Szenen-Objekt, unter dem die Spline hängt) ruft pro
//! Frame [`SplineAttachment::sync`] mit seiner aktuellen Pose auf; die
//! Spline wird starr mitgeführt, als wäre sie ein Kind des Objekts.

use crate::core::{OrientedPoint, Spline, SplineError};

/// Führt eine Spline starr unter einer Eltern-Pose mit.
///
/// Der Zustand ist allein die zuletzt gesehene Eltern-Pose. Positions- und
/// Rotations-Änderungen werden getrennt angewendet: eine reine Verschiebung
/// wird als Versatz auf alle Punkte addiert, eine Drehung rebasiert die
/// Punkte um die aktuelle Eltern-Position. Die gemerkte Pose wird sofort
/// nach dem Anwenden aktualisiert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineAttachment {
    /// Zuletzt übernommene Eltern-Pose
    last_pose: OrientedPoint,
}

impl SplineAttachment {
    /// Erstellt die Kopplung und merkt sich die aktuelle Eltern-Pose
    pub fn new(parent: OrientedPoint) -> Self {
        Self { last_pose: parent }
    }

    /// Zuletzt übernommene Eltern-Pose
    pub fn last_pose(&self) -> OrientedPoint {
        self.last_pose
    }

    /// Übernimmt eine Pose ohne die Spline zu bewegen.
    ///
    /// Nützlich nach Operationen, die die Spline absichtlich relativ zum
    /// Eltern-Objekt verschieben sollen.
    pub fn record(&mut self, parent: OrientedPoint) {
        self.last_pose = parent;
    }

    /// Gleicht die Spline mit der aktuellen Eltern-Pose ab.
    ///
    /// Gibt `true` zurück, wenn sich die Eltern-Pose seit dem letzten Abgleich
    /// geändert hat und die Spline bewegt wurde. Bei unveränderter Pose wird
    /// die Spline nicht angefasst.
    pub fn sync(&mut self, spline: &mut Spline, current: OrientedPoint) -> Result<bool, SplineError> {
        if !current.is_finite() {
            return Err(SplineError::DegenerateGeometry);
        }

        let moved = current.position != self.last_pose.position;
        let rotated = current.rotation != self.last_pose.rotation;

        if moved {
            spline.move_all_points(current.position - self.last_pose.position)?;
        }

        if rotated {
            // Drehung um die bereits aktualisierte Eltern-Position
            let before = OrientedPoint::new(current.position, self.last_pose.rotation);
            spline.rebase(&before, &current)?;
        }

        if moved || rotated {
            self.last_pose = current;
            log::trace!("Spline an Eltern-Pose nachgeführt");
        }

        Ok(moved || rotated)
    }
}
