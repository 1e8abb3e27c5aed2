//! Einzelner Kontrollpunkt einer Spline mit Pose und Tangenten-Griffen.

use super::OrientedPoint;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Verhalten der beiden Tangenten-Griffe eines Kontrollpunkts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TangentMode {
    /// Griffe spiegelbildlich: rechter Griff ist immer die Negation des linken
    #[default]
    Mirrored,
    /// Griffe ruhen; wirksame Tangenten zeigen geradlinig zum jeweiligen Nachbarn
    Linear,
    /// Beide Griffe unabhängig editierbar
    Free,
}

/// Ein Kontrollpunkt der Spline
///
/// Die Tangenten-Griffe werden lokal zur Pose gespeichert und folgen damit
/// automatisch jeder Verschiebung oder Drehung des Punktes. Die Identität
/// eines Punktes ist seine `id`; Positions-Gleichheit spielt nur bei der
/// Duplikat-Bereinigung eine Rolle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplinePoint {
    /// Stabile ID, vergeben vom Spline-Container
    id: u64,
    /// Pose (Position + Rotation) des Punktes
    pub pose: OrientedPoint,
    /// Linker Tangenten-Griff, lokal zur Pose
    local_left_tangent: Vec3,
    /// Rechter Tangenten-Griff, lokal zur Pose
    local_right_tangent: Vec3,
    /// Tangenten-Modus
    tangent_mode: TangentMode,
}

impl SplinePoint {
    /// Standard-Länge der Tangenten-Griffe bei Neuanlage
    pub const DEFAULT_TANGENT_LENGTH: f32 = 1.0;

    /// Erstellt einen neuen Kontrollpunkt mit gespiegelten Standard-Griffen (±X)
    pub fn new(id: u64, position: Vec3, rotation: Quat) -> Self {
        Self {
            id,
            pose: OrientedPoint::new(position, rotation),
            local_left_tangent: Vec3::NEG_X * Self::DEFAULT_TANGENT_LENGTH,
            local_right_tangent: Vec3::X * Self::DEFAULT_TANGENT_LENGTH,
            tangent_mode: TangentMode::Mirrored,
        }
    }

    /// Stabile ID des Punktes
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Weltposition des Punktes
    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    /// Rotation des Punktes
    pub fn rotation(&self) -> Quat {
        self.pose.rotation
    }

    /// Aktueller Tangenten-Modus
    pub fn tangent_mode(&self) -> TangentMode {
        self.tangent_mode
    }

    /// Wechselt den Tangenten-Modus.
    ///
    /// Beim Wechsel auf `Mirrored` wird der rechte Griff aus dem linken
    /// abgeleitet (der linke gewinnt). Alle anderen Wechsel lassen die
    /// gespeicherten Griffe unangetastet.
    pub fn set_tangent_mode(&mut self, tangent_mode: TangentMode) {
        if tangent_mode == TangentMode::Mirrored {
            self.local_right_tangent = -self.local_left_tangent;
        }
        self.tangent_mode = tangent_mode;
    }

    /// Linker Tangenten-Griff in lokalen Koordinaten
    pub fn local_left_tangent(&self) -> Vec3 {
        self.local_left_tangent
    }

    /// Rechter Tangenten-Griff in lokalen Koordinaten
    pub fn local_right_tangent(&self) -> Vec3 {
        self.local_right_tangent
    }

    /// Setzt den linken Griff; unter `Mirrored` wird der rechte mitgezogen
    pub fn set_local_left_tangent(&mut self, local_left_tangent: Vec3) {
        self.local_left_tangent = local_left_tangent;
        if self.tangent_mode == TangentMode::Mirrored {
            self.local_right_tangent = -self.local_left_tangent;
        }
    }

    /// Setzt den rechten Griff; unter `Mirrored` wird der linke mitgezogen
    pub fn set_local_right_tangent(&mut self, local_right_tangent: Vec3) {
        self.local_right_tangent = local_right_tangent;
        if self.tangent_mode == TangentMode::Mirrored {
            self.local_left_tangent = -self.local_right_tangent;
        }
    }

    /// Linker Tangenten-Griff als Weltpunkt (aus der Pose abgeleitet)
    pub fn left_tangent(&self) -> Vec3 {
        self.pose.local_to_world(self.local_left_tangent)
    }

    /// Rechter Tangenten-Griff als Weltpunkt (aus der Pose abgeleitet)
    pub fn right_tangent(&self) -> Vec3 {
        self.pose.local_to_world(self.local_right_tangent)
    }

    /// Setzt den linken Griff über einen Weltpunkt
    pub fn set_left_tangent(&mut self, world: Vec3) {
        self.set_local_left_tangent(self.pose.world_to_local(world));
    }

    /// Setzt den rechten Griff über einen Weltpunkt
    pub fn set_right_tangent(&mut self, world: Vec3) {
        self.set_local_right_tangent(self.pose.world_to_local(world));
    }

    /// Wirksame linke Tangenten-Richtung im `Linear`-Modus:
    /// Einheitsvektor vom Vorgänger auf diesen Punkt.
    /// Bei deckungsgleichen Positionen Nullvektor.
    pub fn linear_left_direction(&self, previous: &SplinePoint) -> Vec3 {
        (self.position() - previous.position()).normalize_or_zero()
    }

    /// Virtueller linker Ankerpunkt im `Linear`-Modus (eine Einheit zurück)
    pub fn linear_left_anchor(&self, previous: &SplinePoint) -> Vec3 {
        self.position() - self.linear_left_direction(previous)
    }

    /// Wirksame rechte Tangenten-Richtung im `Linear`-Modus:
    /// Einheitsvektor von diesem Punkt auf den Nachfolger.
    pub fn linear_right_direction(&self, next: &SplinePoint) -> Vec3 {
        (next.position() - self.position()).normalize_or_zero()
    }

    /// Virtueller rechter Ankerpunkt im `Linear`-Modus (eine Einheit voraus)
    pub fn linear_right_anchor(&self, next: &SplinePoint) -> Vec3 {
        self.position() + self.linear_right_direction(next)
    }
}
