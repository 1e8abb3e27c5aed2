//! Wegpunkt-Verfolgung: bewegt eine externe Pose Frame für Frame die Spline entlang.
//!
//! Der Verfolger arbeitet rein auf den abgetasteten Posen aus
//! [`Spline::sample_by_segments`](crate::Spline::sample_by_segments) und hält
//! keinen Verweis auf die Spline selbst; nach einer strukturellen Änderung
//! baut der Aufrufer die Wegpunkte über [`WaypointFollower::rebuild_from`] neu.

use crate::core::{OrientedPoint, Spline};
use glam::Vec3;

/// Ergebnis eines Verfolgungs-Schritts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowStatus {
    /// Verfolgung ist angehalten oder es gibt keine Wegpunkte
    Idle,
    /// Die Pose bewegt sich auf den aktuellen Ziel-Wegpunkt zu
    Moving,
    /// Geschlossene Route: der letzte Wegpunkt wurde erreicht, die
    /// Verfolgung läuft am ersten Wegpunkt weiter
    LapFinished,
    /// Offene Route: der letzte Wegpunkt wurde erreicht, die Verfolgung stoppt
    RouteFinished,
}

/// Läuft die abgetasteten Wegpunkte einer Spline ab.
///
/// Pro Schritt wandert die Position mit begrenzter Schrittweite auf den
/// Ziel-Wegpunkt zu, die Rotation dreht per normalisiertem Lerp hinterher.
/// Sobald das Ziel näher als [`WaypointFollower::REACH_DISTANCE`] liegt,
/// rückt der Ziel-Index vor; am Routen-Ende entscheidet das Loop-Flag der
/// Spline über Weiterlaufen oder Stopp.
#[derive(Debug, Clone)]
pub struct WaypointFollower {
    /// Abgetastete Wegpunkte in Durchlauf-Reihenfolge
    waypoints: Vec<OrientedPoint>,
    /// Loop-Flag der Spline zum Zeitpunkt des Abtastens
    closed: bool,
    /// Index des aktuellen Ziel-Wegpunkts
    target_index: usize,
    /// Bewegungsgeschwindigkeit in Einheiten pro Sekunde
    pub move_speed: f32,
    /// Drehgeschwindigkeit (Lerp-Faktor pro Sekunde)
    pub look_speed: f32,
    /// Die geführte Pose (Position + Rotation des externen Objekts)
    pub pose: OrientedPoint,
    /// Läuft die Verfolgung gerade
    pub moving: bool,
}

impl WaypointFollower {
    /// Abstand, ab dem ein Ziel-Wegpunkt als erreicht gilt
    pub const REACH_DISTANCE: f32 = 0.1;
    /// Standard-Bewegungsgeschwindigkeit
    pub const DEFAULT_MOVE_SPEED: f32 = 2.0;
    /// Standard-Drehgeschwindigkeit
    pub const DEFAULT_LOOK_SPEED: f32 = 1.0;

    /// Erstellt einen Verfolger auf den aktuellen Wegpunkten der Spline.
    ///
    /// Die Pose startet auf dem ersten Wegpunkt, die Verfolgung ist aktiv.
    pub fn new(spline: &Spline) -> Self {
        let waypoints = spline.sample_by_segments();
        let pose = waypoints.first().copied().unwrap_or_default();

        Self {
            waypoints,
            closed: spline.closed,
            target_index: 0,
            move_speed: Self::DEFAULT_MOVE_SPEED,
            look_speed: Self::DEFAULT_LOOK_SPEED,
            pose,
            moving: true,
        }
    }

    /// Tastet die Spline neu ab und beginnt wieder beim ersten Wegpunkt.
    ///
    /// Die geführte Pose bleibt stehen; sie läuft ab dem nächsten Schritt
    /// auf den neuen Routen-Anfang zu.
    pub fn rebuild_from(&mut self, spline: &Spline) {
        self.waypoints = spline.sample_by_segments();
        self.closed = spline.closed;
        self.target_index = 0;
        log::debug!(
            "Wegpunkte neu aufgebaut: {} Posen, geschlossen={}",
            self.waypoints.len(),
            self.closed
        );
    }

    /// Aktueller Ziel-Wegpunkt, falls vorhanden
    pub fn target(&self) -> Option<&OrientedPoint> {
        self.waypoints.get(self.target_index)
    }

    /// Anzahl der Wegpunkte
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Springt zurück zum ersten Wegpunkt und übernimmt dessen Pose
    pub fn jump_to_start(&mut self) {
        self.target_index = 0;
        self.jump_to_target();
    }

    /// Übernimmt Position und Rotation des aktuellen Ziel-Wegpunkts direkt
    pub fn jump_to_target(&mut self) {
        if let Some(target) = self.waypoints.get(self.target_index) {
            self.pose = *target;
        }
    }

    /// Führt einen Verfolgungs-Schritt mit der Frame-Zeit `dt` aus.
    ///
    /// Erreicht die Pose den letzten Wegpunkt einer offenen Route, stoppt die
    /// Verfolgung und der Schritt meldet [`FollowStatus::RouteFinished`];
    /// auf geschlossenen Routen meldet derselbe Moment
    /// [`FollowStatus::LapFinished`] und das Ziel springt auf den Anfang.
    pub fn advance(&mut self, dt: f32) -> FollowStatus {
        if !self.moving || self.waypoints.is_empty() {
            return FollowStatus::Idle;
        }

        let mut status = FollowStatus::Moving;
        if self.pose.position.distance(self.waypoints[self.target_index].position)
            < Self::REACH_DISTANCE
        {
            status = self.reached_target();
            if status == FollowStatus::RouteFinished {
                return status;
            }
        }

        let target = self.waypoints[self.target_index];
        self.pose.position = move_towards(self.pose.position, target.position, self.move_speed * dt);
        let turn = (self.look_speed * dt).min(1.0);
        self.pose.rotation = self.pose.rotation.lerp(target.rotation, turn).normalize();

        status
    }

    fn reached_target(&mut self) -> FollowStatus {
        let mut status = FollowStatus::Moving;

        if self.target_index == self.waypoints.len() - 1 {
            if !self.closed {
                self.moving = false;
                log::debug!("Routen-Ende erreicht, Verfolgung gestoppt");
                return FollowStatus::RouteFinished;
            }
            log::debug!("Runde beendet, weiter am Routen-Anfang");
            status = FollowStatus::LapFinished;
        }

        self.target_index = (self.target_index + 1) % self.waypoints.len();
        status
    }
}

/// Bewegt `from` um höchstens `max_step` auf `to` zu, ohne zu überschießen.
fn move_towards(from: Vec3, to: Vec3, max_step: f32) -> Vec3 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= max_step || distance < f32::EPSILON {
        return to;
    }
    from + delta / distance * max_step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TangentMode;
    use glam::{Quat, Vec3};

    /// Gerade Spline auf der Z-Achse mit Linear-Tangenten.
    fn gerade_route(segment_count: usize) -> Spline {
        let mut spline = Spline::from_poses(&[
            (Vec3::ZERO, Quat::IDENTITY),
            (Vec3::new(0.0, 0.0, 3.0), Quat::IDENTITY),
        ])
        .expect("gültige Posen");
        spline.change_all_tangent_modes(TangentMode::Linear);
        spline.segment_count = segment_count;
        spline
    }

    #[test]
    fn test_move_towards_ueberschiesst_nicht() {
        let from = Vec3::ZERO;
        let to = Vec3::new(0.0, 0.0, 1.0);

        assert_eq!(move_towards(from, to, 0.25), Vec3::new(0.0, 0.0, 0.25));
        assert_eq!(move_towards(from, to, 5.0), to);
        assert_eq!(move_towards(to, to, 0.5), to);
    }

    #[test]
    fn test_offene_route_stoppt_am_ende() {
        let spline = gerade_route(3);
        let mut follower = WaypointFollower::new(&spline);
        follower.move_speed = 1.0;

        assert_eq!(follower.waypoint_count(), 4);
        assert_eq!(follower.pose.position, Vec3::ZERO);

        // Ein Wegpunkt pro Sekunden-Schritt: 0 → 1 → 2 → 3
        for erwartet_z in [1.0, 2.0, 3.0] {
            assert_eq!(follower.advance(1.0), FollowStatus::Moving);
            assert!(
                follower.pose.position.abs_diff_eq(Vec3::new(0.0, 0.0, erwartet_z), 1e-4),
                "Position nach Schritt: {:?}",
                follower.pose.position
            );
        }

        assert_eq!(follower.advance(1.0), FollowStatus::RouteFinished);
        assert!(!follower.moving);
        // Gestoppt: weitere Schritte bewegen nichts mehr
        assert_eq!(follower.advance(1.0), FollowStatus::Idle);
        assert!(follower.pose.position.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-4));
    }

    #[test]
    fn test_geschlossene_route_laeuft_weiter() {
        let mut spline = gerade_route(3);
        spline.closed = true;
        let mut follower = WaypointFollower::new(&spline);
        follower.move_speed = 1.0;

        // Hin (3 Schritte) und zurück (3 Schritte) bis kurz vor den letzten Wegpunkt
        for _ in 0..5 {
            assert_eq!(follower.advance(1.0), FollowStatus::Moving);
        }
        assert!(follower.pose.position.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-4));

        // Letzter Wegpunkt liegt wieder auf dem Start: Runde beendet, läuft weiter
        assert_eq!(follower.advance(1.0), FollowStatus::Moving);
        assert_eq!(follower.advance(1.0), FollowStatus::LapFinished);
        assert!(follower.moving);
    }

    #[test]
    fn test_rotation_dreht_zum_ziel() {
        let spline = gerade_route(1);
        let mut follower = WaypointFollower::new(&spline);
        follower.pose.rotation = Quat::from_rotation_y(1.5);
        follower.look_speed = 4.0;

        for _ in 0..20 {
            follower.advance(0.25);
        }

        // Auf der geraden Strecke zeigt das Ziel nach +Z
        assert!(
            follower.pose.forward().abs_diff_eq(Vec3::Z, 1e-3),
            "Blickrichtung konvergiert nicht: {:?}",
            follower.pose.forward()
        );
    }

    #[test]
    fn test_jump_und_rebuild() {
        let spline = gerade_route(3);
        let mut follower = WaypointFollower::new(&spline);
        follower.advance(1.0);
        follower.advance(1.0);

        follower.jump_to_start();
        assert_eq!(follower.pose.position, Vec3::ZERO);

        let mut laenger = gerade_route(6);
        laenger
            .insert_point_last(Vec3::new(0.0, 0.0, 9.0), Quat::IDENTITY)
            .expect("Einfügen");
        follower.rebuild_from(&laenger);
        assert_eq!(follower.waypoint_count(), 13);
        assert_eq!(follower.target().map(|t| t.position), Some(Vec3::ZERO));
    }
}
