//! Reine Kurven-Mathematik: De-Casteljau-Auswertung, Blickrotation, Segment-Sampling.
//!
//! Layer-neutral: kann vom Spline-Container, von Verfolgungs-Logik und von
//! Tests importiert werden ohne Zirkel-Abhängigkeiten zu erzeugen.

use super::{OrientedPoint, SplinePoint, TangentMode};
use glam::{Mat3, Quat, Vec3};

/// B(t) = (1-t)³·P0 + 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³·P3,
/// ausgewertet über drei Ebenen linearer Interpolation (De Casteljau).
///
/// `t` wird nicht geklemmt; Werte außerhalb [0, 1] extrapolieren die Kurve.
pub fn eval_bezier(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let a = p0.lerp(p1, t);
    let b = p1.lerp(p2, t);
    let c = p2.lerp(p3, t);

    let d = a.lerp(b, t);
    let e = b.lerp(c, t);

    d.lerp(e, t)
}

/// Wertet die Kurve als Pose aus: Position aus der letzten Lerp-Ebene,
/// Rotation immer aus der momentanen Kurven-Tangente `e − d` der beiden
/// letzten Zwischenpunkte — nie aus den Rotationen der Endpunkte.
pub fn eval_bezier_oriented(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> OrientedPoint {
    let a = p0.lerp(p1, t);
    let b = p1.lerp(p2, t);
    let c = p2.lerp(p3, t);

    let d = a.lerp(b, t);
    let e = b.lerp(c, t);

    let position = d.lerp(e, t);
    let forward = (e - d).normalize_or_zero();

    OrientedPoint::new(position, look_rotation(forward))
}

/// Rotation, die +Z auf `forward` ausrichtet; Hoch-Achse so nah wie möglich an +Y.
///
/// Nullvektor fällt auf Identität zurück, zu +Y parallele Eingaben auf eine
/// Ausweich-Basis über +Z.
pub fn look_rotation(forward: Vec3) -> Quat {
    let forward = forward.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let mut right = Vec3::Y.cross(forward);
    if right.length_squared() < f32::EPSILON {
        right = Vec3::Z.cross(forward);
    }
    let right = right.normalize_or_zero();
    let up = forward.cross(right);

    Quat::from_mat3(&Mat3::from_cols(right, up, forward))
}

/// Löst die vier Bezier-Anker eines Segments auf.
///
/// Im `Linear`-Modus ersetzt der virtuelle Einheits-Anker den gespeicherten
/// Griff der jeweiligen Seite; die Seiten werden unabhängig behandelt.
pub fn segment_anchors(start: &SplinePoint, end: &SplinePoint) -> [Vec3; 4] {
    let start_tangent = if start.tangent_mode() == TangentMode::Linear {
        start.linear_right_anchor(end)
    } else {
        start.right_tangent()
    };

    let end_tangent = if end.tangent_mode() == TangentMode::Linear {
        end.linear_left_anchor(start)
    } else {
        end.left_tangent()
    };

    [start.position(), start_tangent, end_tangent, end.position()]
}

/// Wertet ein Spline-Segment zwischen zwei Kontrollpunkten an Parameter `t` aus.
pub fn eval_segment(start: &SplinePoint, end: &SplinePoint, t: f32) -> OrientedPoint {
    let [p0, p1, p2, p3] = segment_anchors(start, end);
    eval_bezier_oriented(p0, p1, p2, p3, t)
}

/// Tastet ein Segment mit `segment_count + 1` parameter-gleichverteilten Posen ab.
///
/// Beide Endpunkte sind enthalten. `segment_count` wird auf mindestens 1 angehoben.
pub fn sample_segment(
    start: &SplinePoint,
    end: &SplinePoint,
    segment_count: usize,
) -> Vec<OrientedPoint> {
    let segment_count = segment_count.max(1);
    let [p0, p1, p2, p3] = segment_anchors(start, end);

    let mut points = Vec::with_capacity(segment_count + 1);
    for i in 0..=segment_count {
        let t = i as f32 / segment_count as f32;
        points.push(eval_bezier_oriented(p0, p1, p2, p3, t));
    }

    points
}

/// Approximierte Bogenlänge eines Segments über Polylinien-Abstände.
///
/// Der Fehler sinkt mit wachsendem `segment_count`; eine geschlossene Form
/// gibt es für kubische Bezier-Kurven nicht.
pub fn segment_length(start: &SplinePoint, end: &SplinePoint, segment_count: usize) -> f32 {
    let points = sample_segment(start, end, segment_count);
    points
        .windows(2)
        .map(|w| w[0].position.distance(w[1].position))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Geschlossene Bernstein-Form als Gegenprobe zur Lerp-Kaskade.
    fn bernstein(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
        let inv = 1.0 - t;
        inv * inv * inv * p0
            + 3.0 * inv * inv * t * p1
            + 3.0 * inv * t * t * p2
            + t * t * t * p3
    }

    fn gerades_segment() -> (SplinePoint, SplinePoint) {
        let mut start = SplinePoint::new(1, Vec3::ZERO, Quat::IDENTITY);
        let mut end = SplinePoint::new(2, Vec3::new(0.0, 0.0, 4.0), Quat::IDENTITY);
        start.set_tangent_mode(TangentMode::Linear);
        end.set_tangent_mode(TangentMode::Linear);
        (start, end)
    }

    #[test]
    fn test_endpunkte_exakt() {
        let p0 = Vec3::new(1.0, 2.0, 3.0);
        let p1 = Vec3::new(4.0, 0.0, 2.0);
        let p2 = Vec3::new(-2.0, 5.0, 8.0);
        let p3 = Vec3::new(7.0, -1.0, 6.0);

        assert_eq!(eval_bezier(p0, p1, p2, p3, 0.0), p0);
        assert_eq!(eval_bezier(p0, p1, p2, p3, 1.0), p3);
    }

    #[test]
    fn test_lerp_kaskade_entspricht_bernstein_form() {
        let p0 = Vec3::new(0.0, 0.0, 0.0);
        let p1 = Vec3::new(2.0, 3.0, 1.0);
        let p2 = Vec3::new(5.0, -1.0, 4.0);
        let p3 = Vec3::new(6.0, 2.0, 8.0);

        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let lerp = eval_bezier(p0, p1, p2, p3, t);
            let closed = bernstein(p0, p1, p2, p3, t);
            assert_relative_eq!(lerp.x, closed.x, epsilon = 1e-4);
            assert_relative_eq!(lerp.y, closed.y, epsilon = 1e-4);
            assert_relative_eq!(lerp.z, closed.z, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_rotation_folgt_kurven_tangente_nicht_endpunkten() {
        // Beide Endpunkte tragen absichtlich wilde Rotationen. Auf der geraden
        // Linie muss die abgetastete Rotation trotzdem exakt +Z folgen.
        let (mut start, mut end) = gerades_segment();
        start.pose.rotation = Quat::from_rotation_x(1.2);
        end.pose.rotation = Quat::from_rotation_z(-0.7);

        for i in 1..8 {
            let t = i as f32 / 8.0;
            let sample = eval_segment(&start, &end, t);
            assert!(
                sample.forward().abs_diff_eq(Vec3::Z, 1e-5),
                "Tangente bei t={t} weicht ab: {:?}",
                sample.forward()
            );
        }
    }

    #[test]
    fn test_look_rotation_richtet_z_aus() {
        let forward = Vec3::new(1.0, 0.0, 1.0).normalize();
        let rotation = look_rotation(forward);

        assert!((rotation * Vec3::Z).abs_diff_eq(forward, 1e-5));
        // Hoch-Achse bleibt bei seitlichem Blick auf +Y
        assert!((rotation * Vec3::Y).abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn test_look_rotation_degenerierte_eingaben() {
        assert_eq!(look_rotation(Vec3::ZERO), Quat::IDENTITY);

        // Parallel zur Hoch-Achse: Ausweich-Basis, aber gültige Rotation
        let up = look_rotation(Vec3::Y);
        assert!(up.is_finite());
        assert!((up * Vec3::Z).abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn test_sample_segment_anzahl_und_endpunkte() {
        let (start, end) = gerades_segment();

        let points = sample_segment(&start, &end, 16);
        assert_eq!(points.len(), 17);
        assert_eq!(points[0].position, start.position());
        assert_eq!(points[16].position, end.position());

        // Dichte 0 wird auf 1 angehoben: nur die beiden Endpunkte
        let minimal = sample_segment(&start, &end, 0);
        assert_eq!(minimal.len(), 2);
    }

    #[test]
    fn test_gerade_laenge_unabhaengig_von_dichte() {
        let (start, end) = gerades_segment();

        assert_relative_eq!(segment_length(&start, &end, 4), 4.0, epsilon = 1e-4);
        assert_relative_eq!(segment_length(&start, &end, 64), 4.0, epsilon = 1e-4);
    }

    #[test]
    fn test_gekruemmte_laenge_konvergiert_von_unten() {
        // Mirrored-Standardgriffe (±X) erzeugen eine echte S-Kurve
        let start = SplinePoint::new(1, Vec3::ZERO, Quat::IDENTITY);
        let end = SplinePoint::new(2, Vec3::new(0.0, 0.0, 4.0), Quat::IDENTITY);

        let grob = segment_length(&start, &end, 4);
        let fein = segment_length(&start, &end, 128);
        let sehne = start.position().distance(end.position());

        assert!(grob >= sehne - 1e-4);
        assert!(fein >= grob - 1e-4, "Verfeinerung darf die Länge nicht verkürzen");

        // Obergrenze: Umfang des Kontrollpolygons
        let [p0, p1, p2, p3] = segment_anchors(&start, &end);
        let polygon = p0.distance(p1) + p1.distance(p2) + p2.distance(p3);
        assert!(fein <= polygon + 1e-4);
    }
}
