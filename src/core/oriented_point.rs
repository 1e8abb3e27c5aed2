//! Pose-Wertetyp: Position und Rotation eines Punktes im Raum.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position und Ausrichtung als gemeinsamer Wertetyp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedPoint {
    /// Weltposition
    pub position: Vec3,
    /// Ausrichtung (Quaternion)
    pub rotation: Quat,
}

impl OrientedPoint {
    /// Pose im Ursprung mit Identitäts-Rotation
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Erstellt eine neue Pose
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Transformiert einen lokalen Punkt in Weltkoordinaten
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Transformiert einen Weltpunkt in lokale Koordinaten
    pub fn world_to_local(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.position)
    }

    /// Hebt eine lokale Rotation in Weltkoordinaten
    pub fn local_to_world_rotation(&self, local: Quat) -> Quat {
        self.rotation * local
    }

    /// Drückt eine Welt-Rotation in lokalen Koordinaten aus
    pub fn world_to_local_rotation(&self, world: Quat) -> Quat {
        self.rotation.inverse() * world
    }

    /// Lokale Vorwärts-Achse (+Z) in Weltkoordinaten
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Lokale Hoch-Achse (+Y) in Weltkoordinaten
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Lokale Rechts-Achse (+X) in Weltkoordinaten
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Prüft ob Position und Rotation ausschließlich endliche Werte enthalten
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}

impl Default for OrientedPoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_local_world_roundtrip() {
        let pose = OrientedPoint::new(
            Vec3::new(3.0, 1.0, -2.0),
            Quat::from_rotation_y(FRAC_PI_2),
        );

        let local = Vec3::new(1.0, 2.0, 3.0);
        let world = pose.local_to_world(local);
        let back = pose.world_to_local(world);

        assert!(back.abs_diff_eq(local, 1e-5), "Rücktransformation weicht ab: {back:?}");
    }

    #[test]
    fn test_rotation_roundtrip() {
        let pose = OrientedPoint::new(Vec3::ZERO, Quat::from_rotation_y(0.7));
        let local = Quat::from_rotation_x(0.3);

        let world = pose.local_to_world_rotation(local);
        let back = pose.world_to_local_rotation(world);

        assert!(back.abs_diff_eq(local, 1e-5));
    }

    #[test]
    fn test_axes_after_yaw() {
        // 90° um die Hoch-Achse: Vorwärts zeigt danach nach +X
        let pose = OrientedPoint::new(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2));

        assert!(pose.forward().abs_diff_eq(Vec3::X, 1e-6));
        assert!(pose.up().abs_diff_eq(Vec3::Y, 1e-6));
        assert!(pose.right().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn test_identity_default() {
        let pose = OrientedPoint::default();
        assert_eq!(pose.position, Vec3::ZERO);
        assert_eq!(pose.rotation, Quat::IDENTITY);
        assert_eq!(pose.forward(), Vec3::Z);
    }
}
