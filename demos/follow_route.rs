//! Beispiel: eine Route aufbauen, verfeinern und mit dem Verfolger ablaufen.
//!
//! Start mit `cargo run --example follow_route`; der Log-Level lässt sich
//! über `RUST_LOG` anheben, um die Mutations-Meldungen des Containers zu sehen.

use bezier_spline_engine::{FollowStatus, Spline, TangentMode, WaypointFollower};
use glam::{Quat, Vec3};

fn main() {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!(
        "Bezier-Spline-Engine v{} — Beispiel-Route",
        env!("CARGO_PKG_VERSION")
    );

    // Eine geschwungene Route über vier Kontrollpunkte
    let mut spline = Spline::from_poses(&[
        (Vec3::new(0.0, 0.0, 0.0), Quat::IDENTITY),
        (Vec3::new(4.0, 0.0, 6.0), Quat::from_rotation_y(0.8)),
        (Vec3::new(10.0, 1.0, 8.0), Quat::from_rotation_y(1.4)),
        (Vec3::new(14.0, 0.0, 2.0), Quat::from_rotation_y(2.6)),
    ])
    .expect("gültige Posen");
    spline.segment_count = 8;

    // Das mittlere Segment verfeinern und das letzte geradlinig auslaufen lassen
    spline.subdivide(1, 2).expect("benachbarte Indizes");
    let last = spline.point_count() as isize - 1;
    spline
        .set_point_tangent_mode(last, TangentMode::Linear)
        .expect("letzter Punkt");

    log::info!(
        "Route: {} Punkte, Länge ≈ {:.2} Einheiten",
        spline.point_count(),
        spline.total_length()
    );

    // Die Route mit 60 Schritten pro Sekunde ablaufen
    let mut follower = WaypointFollower::new(&spline);
    follower.move_speed = 4.0;
    follower.look_speed = 6.0;

    let dt = 1.0 / 60.0;
    let mut elapsed = 0.0f32;
    loop {
        let status = follower.advance(dt);
        elapsed += dt;

        if status == FollowStatus::RouteFinished {
            break;
        }

        // Pose zweimal pro Sekunde ausgeben
        if (elapsed * 2.0).fract() < dt * 2.0 {
            let p = follower.pose.position;
            log::info!(
                "t={elapsed:5.2}s  Position ({:6.2}, {:5.2}, {:6.2})  Blick {:?}",
                p.x,
                p.y,
                p.z,
                follower.pose.forward()
            );
        }
    }

    log::info!("Routen-Ende nach {elapsed:.2}s erreicht");
}
