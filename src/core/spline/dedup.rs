//! Duplikat-Bereinigung für direkt benachbarte Kontrollpunkte.

use super::Spline;
use crate::core::SplineEvent;

impl Spline {
    /// Kollabiert benachbarte Punkte mit exakt gleicher Position.
    ///
    /// Von jedem deckungsgleichen Paar wird der spätere Punkt entfernt und
    /// die Prüfung startet von vorn; da jeder Durchlauf einen Punkt entfernt,
    /// ist die Schleife durch die Punktzahl beschränkt. Das Schluss-Paar
    /// einer geschlossenen Spline wird nicht verglichen. Die Bereinigung
    /// stoppt, sobald die Mindest-Punktzahl erreicht ist.
    ///
    /// `tracked` folgt dem übergebenen Punkt durch die Bereinigung: wird er
    /// selbst entfernt, übernimmt der frühere Punkt des Paares die Rolle.
    /// Zurückgegeben wird die ID des am Ende überlebenden Punktes.
    pub(super) fn collapse_duplicates(&mut self, tracked: u64) -> u64 {
        let mut tracked = tracked;
        let mut restart = true;

        while restart && self.points.len() > Self::MIN_POINT_COUNT {
            restart = false;

            for i in 0..self.points.len() - 1 {
                if self.points[i].position() != self.points[i + 1].position() {
                    continue;
                }

                let removed = self.points.remove(i + 1);
                if removed.id() == tracked {
                    tracked = self.points[i].id();
                }
                log::debug!(
                    "Deckungsgleichen Punkt {} an Index {} entfernt",
                    removed.id(),
                    i + 1
                );
                self.notify(SplineEvent::PointRemoved {
                    index: i + 1,
                    point: removed,
                });
                restart = true;
                break;
            }
        }

        tracked
    }
}
