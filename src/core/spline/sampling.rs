//! Sampling- und Längen-Abfragen über die gesamte Spline.

use super::Spline;
use crate::core::{OrientedPoint, curve};

impl Spline {
    /// Tastet die gesamte Spline mit `segment_count` Schritten pro Segment ab.
    ///
    /// Das erste Segment liefert `segment_count + 1` Posen, jedes weitere
    /// lässt die doppelte Naht-Pose weg. Eine offene Spline ergibt damit
    /// `(point_count − 1) · segment_count + 1` Posen, eine geschlossene
    /// `point_count · segment_count + 1`; deren letzte Pose liegt wieder auf
    /// dem ersten Punkt.
    pub fn sample_by_segments(&self) -> Vec<OrientedPoint> {
        let segment_count = self.segment_count.max(1);
        let pair_count = if self.closed {
            self.point_count()
        } else {
            self.point_count() - 1
        };

        let mut samples = Vec::with_capacity(pair_count * segment_count + 1);
        for (start, end) in self.lines() {
            let segment = curve::sample_segment(start, end, segment_count);
            if samples.is_empty() {
                samples.extend(segment);
            } else {
                samples.extend(segment.into_iter().skip(1));
            }
        }

        samples
    }

    /// Verteilt Posen im festen Bogenlängen-Abstand entlang der Spline.
    ///
    /// Pro Segment wird die laufende Distanz über `t = offset / segmentlänge`
    /// linear in einen Kurvenparameter übersetzt; der Überhang wandert in das
    /// nächste Segment, bei geschlossenen Splines auch über das
    /// Schluss-Segment. Der Spline-Endpunkt selbst wird nie mitgeliefert,
    /// auch wenn er exakt auf dem Abstands-Raster liegt.
    pub fn sample_by_distance(&self, spacing: f32) -> Vec<OrientedPoint> {
        if !spacing.is_finite() || spacing <= 0.0 {
            log::warn!("Ungültiger Sampling-Abstand {spacing}, liefere Start-Pose");
            if let Some((start, end)) = self.lines().next() {
                return vec![curve::eval_segment(start, end, 0.0)];
            }
            return Vec::new();
        }

        let segment_count = self.segment_count.max(1);
        let mut samples = Vec::new();
        let mut offset = 0.0f32;

        for (start, end) in self.lines() {
            let segment_length = curve::segment_length(start, end, segment_count);

            while offset < segment_length {
                let t = offset / segment_length;
                samples.push(curve::eval_segment(start, end, t));
                offset += spacing;
            }
            offset -= segment_length;
        }

        samples
    }

    /// Gesamtlänge der Spline als Summe aller Segment-Längen
    pub fn total_length(&self) -> f32 {
        let segment_count = self.segment_count.max(1);
        self.lines()
            .map(|(start, end)| curve::segment_length(start, end, segment_count))
            .sum()
    }
}
