//! Der Spline-Container: geordnete Kontrollpunkte mit stabilen IDs,
//! Loop-Flag, Beobachtern und allen mutierenden Operationen.

use super::{OrientedPoint, SplineError, SplineEvent, SplinePoint, TangentMode, curve};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;

mod dedup;
mod sampling;

/// Beobachter-Callback für Spline-Ereignisse
pub type SplineObserver = Box<dyn FnMut(&SplineEvent)>;

/// Geordnete, orientierte Bezier-Spline
///
/// Der Container hält zu jedem Zeitpunkt mindestens zwei Kontrollpunkte.
/// Punkte werden über stabile IDs oder über (bei geschlossener Spline
/// Loop-gefaltete) Indizes adressiert; Mutationen laufen ausschließlich über
/// die Methoden des Containers, die Eingaben validieren und Beobachter
/// benachrichtigen. Abfragen geben nur unveränderliche Referenzen heraus.
///
/// Die serde-Ableitung ist für von dieser Engine geschriebene Dokumente
/// gedacht; handeditierte Eingaben können die Mindest-Punktzahl- und
/// ID-Invarianten verletzen und müssen vom Host vorab geprüft werden.
#[derive(Serialize, Deserialize)]
pub struct Spline {
    /// Kontrollpunkte in Traversierungs-Reihenfolge
    points: Vec<SplinePoint>,
    /// Geschlossene Spline: der letzte Punkt verbindet zurück zum ersten
    pub closed: bool,
    /// Sampling-Dichte pro Kurvensegment (≥ 1)
    pub segment_count: usize,
    /// Nächste zu vergebende Punkt-ID
    next_point_id: u64,
    /// Registrierte Beobachter in Anmelde-Reihenfolge
    #[serde(skip)]
    observers: Vec<(u64, SplineObserver)>,
    #[serde(skip)]
    next_observer_id: u64,
}

impl Spline {
    /// Mindest-Punktzahl, die der Container zu jedem Zeitpunkt hält
    pub const MIN_POINT_COUNT: usize = 2;
    /// Standard-Sampling-Dichte pro Segment
    pub const DEFAULT_SEGMENT_COUNT: usize = 16;
    /// Empfohlene UI-Untergrenze für `segment_count` (vom Core nicht erzwungen)
    pub const MIN_SEGMENT_COUNT: usize = 4;
    /// Empfohlene UI-Obergrenze für `segment_count` (vom Core nicht erzwungen)
    pub const MAX_SEGMENT_COUNT: usize = 128;
    /// Versatz der Standard-Punkte bei Neuanlage und beim Verlängern
    pub const DEFAULT_EXTEND_DISTANCE: f32 = 2.0;

    /// Erstellt eine offene Spline mit zwei Standard-Punkten:
    /// einer im Ursprung, einer zwei Einheiten voraus.
    pub fn new() -> Self {
        let mut spline = Self {
            points: Vec::with_capacity(Self::MIN_POINT_COUNT),
            closed: false,
            segment_count: Self::DEFAULT_SEGMENT_COUNT,
            next_point_id: 1,
            observers: Vec::new(),
            next_observer_id: 1,
        };

        let first = spline.take_point_id();
        spline
            .points
            .push(SplinePoint::new(first, Vec3::ZERO, Quat::IDENTITY));
        let second = spline.take_point_id();
        spline.points.push(SplinePoint::new(
            second,
            Vec3::Z * Self::DEFAULT_EXTEND_DISTANCE,
            Quat::IDENTITY,
        ));

        spline
    }

    /// Erstellt eine Spline aus vorgegebenen Posen.
    ///
    /// Direkt aufeinanderfolgende Duplikate der Eingabe werden übersprungen.
    /// Bleiben weniger als zwei Punkte übrig, wird die Eingabe zurückgewiesen.
    pub fn from_poses(poses: &[(Vec3, Quat)]) -> Result<Self, SplineError> {
        let mut spline = Self {
            points: Vec::with_capacity(poses.len()),
            closed: false,
            segment_count: Self::DEFAULT_SEGMENT_COUNT,
            next_point_id: 1,
            observers: Vec::new(),
            next_observer_id: 1,
        };

        for &(position, rotation) in poses {
            if !position.is_finite() || !rotation.is_finite() {
                return Err(SplineError::DegenerateGeometry);
            }
            if spline.points.last().map(|p| p.position()) == Some(position) {
                continue;
            }
            let id = spline.take_point_id();
            spline.points.push(SplinePoint::new(id, position, rotation));
        }

        if spline.points.len() < Self::MIN_POINT_COUNT {
            return Err(SplineError::TooFewPoints);
        }

        Ok(spline)
    }

    // ── Abfragen ───────────────────────────────────────────────

    /// Anzahl der Kontrollpunkte
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Alle Kontrollpunkte in Reihenfolge (read-only)
    pub fn points(&self) -> &[SplinePoint] {
        &self.points
    }

    /// Alle Punkt-Positionen in Reihenfolge
    pub fn positions(&self) -> Vec<Vec3> {
        self.points.iter().map(|p| p.position()).collect()
    }

    /// Findet einen Punkt über seine stabile ID
    pub fn point_by_id(&self, id: u64) -> Option<&SplinePoint> {
        self.points.iter().find(|p| p.id() == id)
    }

    /// Aktueller Listen-Index des Punktes mit der angegebenen ID
    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.points.iter().position(|p| p.id() == id)
    }

    /// Prüft ob zwei Punkte in der Liste direkt benachbart sind
    pub fn is_consecutive(&self, id_a: u64, id_b: u64) -> bool {
        match (self.index_of(id_a), self.index_of(id_b)) {
            (Some(a), Some(b)) => a.abs_diff(b) == 1,
            _ => false,
        }
    }

    /// Liefert den Kontrollpunkt an `index`.
    ///
    /// Bei geschlossener Spline wird ein nicht-negativer Index modulo der
    /// Punktzahl gefaltet und ein negativer Index einmal um die Punktzahl
    /// angehoben, sodass −1 den letzten Punkt adressiert. Indizes, die danach
    /// außerhalb von `0..point_count` liegen, sind ein Fehler; offene Splines
    /// falten nie.
    pub fn point(&self, index: isize) -> Result<&SplinePoint, SplineError> {
        let resolved = self.resolve_index(index)?;
        Ok(&self.points[resolved])
    }

    /// Iterator über alle Kurvensegmente als Punkt-Paare.
    ///
    /// Offene Splines liefern `point_count − 1` Paare, geschlossene zusätzlich
    /// das Schluss-Segment vom letzten zurück zum ersten Punkt.
    pub fn lines(&self) -> impl Iterator<Item = (&SplinePoint, &SplinePoint)> {
        let pair_count = if self.closed {
            self.points.len()
        } else {
            self.points.len().saturating_sub(1)
        };

        (0..pair_count).map(move |i| {
            let next = (i + 1) % self.points.len();
            (&self.points[i], &self.points[next])
        })
    }

    fn resolve_index(&self, index: isize) -> Result<usize, SplineError> {
        let count = self.points.len() as isize;
        let resolved = if self.closed {
            if index < 0 { index + count } else { index % count }
        } else {
            index
        };

        if resolved < 0 || resolved >= count {
            return Err(SplineError::PointNotFound {
                index,
                point_count: self.points.len(),
            });
        }

        Ok(resolved as usize)
    }

    fn take_point_id(&mut self) -> u64 {
        let id = self.next_point_id;
        self.next_point_id += 1;
        id
    }

    // ── Strukturelle Mutationen ────────────────────────────────

    /// Fügt an `index` einen neuen Kontrollpunkt mit Standard-Griffen ein.
    ///
    /// Gültige Einfüge-Indizes sind `0..=point_count` (ohne Loop-Faltung).
    /// Nach dem Einfügen werden benachbarte Duplikate kollabiert; das
    /// Einfüge-Ereignis trägt den überlebenden Punkt, dessen ID auch
    /// zurückgegeben wird.
    pub fn insert_point(
        &mut self,
        index: usize,
        position: Vec3,
        rotation: Quat,
    ) -> Result<u64, SplineError> {
        if !position.is_finite() || !rotation.is_finite() {
            log::warn!("Einfügen verworfen: nicht-endliche Pose");
            return Err(SplineError::DegenerateGeometry);
        }
        if index > self.points.len() {
            return Err(SplineError::PointNotFound {
                index: index as isize,
                point_count: self.points.len(),
            });
        }

        let id = self.take_point_id();
        self.points
            .insert(index, SplinePoint::new(id, position, rotation));

        let survivor_id = self.collapse_duplicates(id);
        if let Some(survivor_index) = self.index_of(survivor_id) {
            let point = self.points[survivor_index].clone();
            log::debug!(
                "Punkt {} an Index {} eingefügt ({} Punkte)",
                survivor_id,
                survivor_index,
                self.points.len()
            );
            self.notify(SplineEvent::PointInserted {
                index: survivor_index,
                point,
            });
        }

        Ok(survivor_id)
    }

    /// Hängt einen Punkt ans Ende der Spline an
    pub fn insert_point_last(&mut self, position: Vec3, rotation: Quat) -> Result<u64, SplineError> {
        self.insert_point(self.points.len(), position, rotation)
    }

    /// Verlängert die Spline am Anfang: der neue Punkt liegt zwei Einheiten
    /// hinter dem ersten Punkt entlang dessen lokaler Vorwärts-Achse.
    pub fn extend_at_start(&mut self) -> Result<u64, SplineError> {
        let first = &self.points[0];
        let position = first
            .pose
            .local_to_world(Vec3::Z * -Self::DEFAULT_EXTEND_DISTANCE);
        let rotation = first.rotation();
        self.insert_point(0, position, rotation)
    }

    /// Verlängert die Spline am Ende: der neue Punkt liegt zwei Einheiten
    /// vor dem letzten Punkt entlang dessen lokaler Vorwärts-Achse.
    pub fn extend_at_end(&mut self) -> Result<u64, SplineError> {
        let last = &self.points[self.points.len() - 1];
        let position = last
            .pose
            .local_to_world(Vec3::Z * Self::DEFAULT_EXTEND_DISTANCE);
        let rotation = last.rotation();
        self.insert_point_last(position, rotation)
    }

    /// Entfernt den Punkt an `index` (Loop-Faltung wie bei [`Spline::point`]).
    ///
    /// Schlägt mit [`SplineError::TooFewPoints`] fehl, wenn die Spline nur
    /// noch die Mindest-Punktzahl hält; sie bleibt dann unverändert.
    pub fn remove_point(&mut self, index: isize) -> Result<SplinePoint, SplineError> {
        if self.points.len() <= Self::MIN_POINT_COUNT {
            log::warn!("Entfernen verworfen: Mindest-Punktzahl erreicht");
            return Err(SplineError::TooFewPoints);
        }

        let resolved = self.resolve_index(index)?;
        let removed = self.points.remove(resolved);
        log::debug!(
            "Punkt {} an Index {} entfernt ({} Punkte verbleiben)",
            removed.id(),
            resolved,
            self.points.len()
        );
        self.notify(SplineEvent::PointRemoved {
            index: resolved,
            point: removed.clone(),
        });

        Ok(removed)
    }

    /// Entfernt den Punkt mit der angegebenen ID.
    ///
    /// Eine unbekannte ID ist bewusst kein Fehler: die Methode gibt `None`
    /// zurück und löst kein Ereignis aus.
    pub fn remove_point_by_id(&mut self, id: u64) -> Result<Option<SplinePoint>, SplineError> {
        if self.points.len() <= Self::MIN_POINT_COUNT {
            return Err(SplineError::TooFewPoints);
        }

        let Some(index) = self.index_of(id) else {
            log::debug!("Punkt {} nicht vorhanden, nichts zu entfernen", id);
            return Ok(None);
        };

        let removed = self.points.remove(index);
        self.notify(SplineEvent::PointRemoved {
            index,
            point: removed.clone(),
        });

        Ok(Some(removed))
    }

    /// Unterteilt das Segment zwischen zwei benachbarten Indizes.
    ///
    /// Der neue Punkt entsteht bei t = 0,5 als Standard-Kontrollpunkt auf der
    /// Kurve. Nicht benachbarte Indizes sind bewusst ein stiller No-Op.
    pub fn subdivide(
        &mut self,
        index_a: isize,
        index_b: isize,
    ) -> Result<Option<u64>, SplineError> {
        let a = self.resolve_index(index_a)?;
        let b = self.resolve_index(index_b)?;
        let (lower, upper) = if a < b { (a, b) } else { (b, a) };

        if upper - lower != 1 {
            log::debug!("Unterteilen übersprungen: {index_a} und {index_b} sind nicht benachbart");
            return Ok(None);
        }

        let midpoint = curve::eval_segment(&self.points[lower], &self.points[upper], 0.5);
        self.insert_point(upper, midpoint.position, midpoint.rotation)
            .map(Some)
    }

    /// Unterteilt das Segment zwischen zwei Punkt-IDs.
    ///
    /// Unbekannte oder nicht benachbarte IDs sind ein stiller No-Op.
    pub fn subdivide_between(&mut self, id_a: u64, id_b: u64) -> Option<u64> {
        let index_a = self.index_of(id_a)?;
        let index_b = self.index_of(id_b)?;
        self.subdivide(index_a as isize, index_b as isize)
            .unwrap_or_default()
    }

    // ── Punkt-Mutationen ───────────────────────────────────────

    /// Setzt die Position eines Punktes.
    ///
    /// Deckungsgleiche Nachbarn kollabieren dabei nicht sofort, sondern erst
    /// beim nächsten Einfügen.
    pub fn set_point_position(&mut self, index: isize, position: Vec3) -> Result<(), SplineError> {
        if !position.is_finite() {
            return Err(SplineError::DegenerateGeometry);
        }
        let resolved = self.resolve_index(index)?;
        self.points[resolved].pose.position = position;
        Ok(())
    }

    /// Setzt die Rotation eines Punktes
    pub fn set_point_rotation(&mut self, index: isize, rotation: Quat) -> Result<(), SplineError> {
        if !rotation.is_finite() {
            return Err(SplineError::DegenerateGeometry);
        }
        let resolved = self.resolve_index(index)?;
        self.points[resolved].pose.rotation = rotation;
        Ok(())
    }

    /// Setzt den Tangenten-Modus eines Punktes
    pub fn set_point_tangent_mode(
        &mut self,
        index: isize,
        tangent_mode: TangentMode,
    ) -> Result<(), SplineError> {
        let resolved = self.resolve_index(index)?;
        self.points[resolved].set_tangent_mode(tangent_mode);
        Ok(())
    }

    /// Setzt den lokalen linken Tangenten-Griff eines Punktes
    pub fn set_point_local_left_tangent(
        &mut self,
        index: isize,
        tangent: Vec3,
    ) -> Result<(), SplineError> {
        if !tangent.is_finite() {
            return Err(SplineError::DegenerateGeometry);
        }
        let resolved = self.resolve_index(index)?;
        self.points[resolved].set_local_left_tangent(tangent);
        Ok(())
    }

    /// Setzt den lokalen rechten Tangenten-Griff eines Punktes
    pub fn set_point_local_right_tangent(
        &mut self,
        index: isize,
        tangent: Vec3,
    ) -> Result<(), SplineError> {
        if !tangent.is_finite() {
            return Err(SplineError::DegenerateGeometry);
        }
        let resolved = self.resolve_index(index)?;
        self.points[resolved].set_local_right_tangent(tangent);
        Ok(())
    }

    /// Setzt den linken Tangenten-Griff über einen Weltpunkt
    pub fn set_point_left_tangent(&mut self, index: isize, world: Vec3) -> Result<(), SplineError> {
        if !world.is_finite() {
            return Err(SplineError::DegenerateGeometry);
        }
        let resolved = self.resolve_index(index)?;
        self.points[resolved].set_left_tangent(world);
        Ok(())
    }

    /// Setzt den rechten Tangenten-Griff über einen Weltpunkt
    pub fn set_point_right_tangent(
        &mut self,
        index: isize,
        world: Vec3,
    ) -> Result<(), SplineError> {
        if !world.is_finite() {
            return Err(SplineError::DegenerateGeometry);
        }
        let resolved = self.resolve_index(index)?;
        self.points[resolved].set_right_tangent(world);
        Ok(())
    }

    /// Setzt den Tangenten-Modus aller Punkte
    pub fn change_all_tangent_modes(&mut self, tangent_mode: TangentMode) {
        for point in &mut self.points {
            point.set_tangent_mode(tangent_mode);
        }
    }

    // ── Globale Transformationen ───────────────────────────────

    /// Kehrt die Durchlaufrichtung um.
    ///
    /// Die Punktreihenfolge wird gespiegelt und jeder Punkt um 180° um seine
    /// lokale Hoch-Achse gedreht; zweimaliges Umkehren stellt Reihenfolge und
    /// Rotationen wieder her.
    pub fn reverse(&mut self) {
        self.points.reverse();
        for point in &mut self.points {
            point.pose.rotation = point.pose.rotation * Quat::from_rotation_y(PI);
        }
        log::debug!("Durchlaufrichtung umgekehrt ({} Punkte)", self.points.len());
    }

    /// Verschiebt alle Punkte um denselben Welt-Versatz
    pub fn move_all_points(&mut self, delta: Vec3) -> Result<(), SplineError> {
        if !delta.is_finite() {
            return Err(SplineError::DegenerateGeometry);
        }
        for point in &mut self.points {
            point.pose.position += delta;
        }
        Ok(())
    }

    /// Drückt alle Punkte aus dem `before`-Bezugssystem im `after`-System aus.
    ///
    /// Positionen und Rotationen werden starr mitgeführt, die Rotationen
    /// anschließend renormalisiert.
    pub fn rebase(
        &mut self,
        before: &OrientedPoint,
        after: &OrientedPoint,
    ) -> Result<(), SplineError> {
        if !before.is_finite() || !after.is_finite() {
            return Err(SplineError::DegenerateGeometry);
        }

        for point in &mut self.points {
            let local_position = before.world_to_local(point.pose.position);
            let local_rotation = before.world_to_local_rotation(point.pose.rotation);
            point.pose.position = after.local_to_world(local_position);
            point.pose.rotation = after.local_to_world_rotation(local_rotation).normalize();
        }

        Ok(())
    }

    // ── Beobachter ─────────────────────────────────────────────

    /// Registriert einen Beobachter; Rückgabe ist das Abmelde-Handle.
    ///
    /// Beobachter werden synchron und in Anmelde-Reihenfolge nach jeder
    /// strukturellen Änderung aufgerufen. Sie erhalten ausschließlich das
    /// Ereignis selbst und können den Spline daher nicht re-entrant mutieren.
    pub fn add_observer(&mut self, observer: impl FnMut(&SplineEvent) + 'static) -> u64 {
        let id = self.next_observer_id;
        self.next_observer_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Meldet einen Beobachter ab (gibt `true` zurück falls das Handle bekannt war)
    pub fn remove_observer(&mut self, observer_id: u64) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(id, _)| *id != observer_id);
        self.observers.len() < before
    }

    pub(super) fn notify(&mut self, event: SplineEvent) {
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
    }
}

impl Default for Spline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Spline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spline")
            .field("points", &self.points)
            .field("closed", &self.closed)
            .field("segment_count", &self.segment_count)
            .field("observers", &self.observers.len())
            .finish()
    }
}
