use core::f32::consts::TAU;

use crate::coords::Vec3;

use super::{ArcMode, Shape, ShapeKind};

/// Ring points per full turn. Arcs sample proportionally to their span,
/// never fewer than 3 rim points.
const SEGMENTS_PER_TURN: f32 = 48.0;

impl Shape {
    /// Builds an ellipse-arc shape centered at `center` with radii
    /// `(rx, ry)`, sweeping from `start` to `stop` radians.
    ///
    /// Vertex layout matches what the classifier expects:
    /// - default mode and [`ArcMode::Pie`]: center vertex first, then the
    ///   rim (a triangle fan)
    /// - [`ArcMode::Open`] / [`ArcMode::Chord`]: rim only, filled through
    ///   the tessellator (`Chord` appends the first rim point so the
    ///   closing edge is part of the outline chain)
    pub fn arc(center: Vec3, rx: f32, ry: f32, start: f32, stop: f32, mode: Option<ArcMode>) -> Self {
        let rim = rim_points(center, rx, ry, start, stop);

        let mut vertices;
        match mode {
            None | Some(ArcMode::Pie) => {
                vertices = Vec::with_capacity(rim.len() + 1);
                vertices.push(center);
                vertices.extend(rim);
            }
            Some(ArcMode::Open) => {
                vertices = rim;
            }
            Some(ArcMode::Chord) => {
                vertices = rim;
                if let Some(&first) = vertices.first() {
                    vertices.push(first);
                }
            }
        }

        let mut shape = Shape::new(ShapeKind::Arc, vertices);
        shape.arc_mode = mode;
        shape
    }
}

fn rim_points(center: Vec3, rx: f32, ry: f32, start: f32, stop: f32) -> Vec<Vec3> {
    let span = stop - start;
    let steps = ((span.abs() / TAU) * SEGMENTS_PER_TURN).ceil().max(3.0) as usize;

    (0..=steps)
        .map(|i| {
            let theta = start + span * (i as f32 / steps as f32);
            Vec3::new(
                center.x + rx * theta.cos(),
                center.y + ry * theta.sin(),
                center.z,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_leads_with_center() {
        let c = Vec3::xy(10.0, 20.0);
        let a = Shape::arc(c, 5.0, 5.0, 0.0, 1.0, None);
        assert_eq!(a.kind, ShapeKind::Arc);
        assert_eq!(a.arc_mode, None);
        assert_eq!(a.vertices[0], c);
        assert!(a.vertices.len() >= 4);
    }

    #[test]
    fn open_mode_has_no_center_vertex() {
        let c = Vec3::xy(0.0, 0.0);
        let a = Shape::arc(c, 5.0, 5.0, 0.0, 1.0, Some(ArcMode::Open));
        assert!(a.vertices.iter().all(|&v| v != c));
    }

    #[test]
    fn chord_mode_closes_the_ring() {
        let a = Shape::arc(Vec3::zero(), 5.0, 5.0, 0.0, 2.0, Some(ArcMode::Chord));
        assert_eq!(a.vertices.first(), a.vertices.last());
    }

    #[test]
    fn rim_endpoints_hit_start_and_stop_angles() {
        let rim = rim_points(Vec3::zero(), 2.0, 2.0, 0.0, core::f32::consts::FRAC_PI_2);
        let first = rim[0];
        let last = rim[rim.len() - 1];
        assert!((first.x - 2.0).abs() < 1e-4 && first.y.abs() < 1e-4);
        assert!(last.x.abs() < 1e-4 && (last.y - 2.0).abs() < 1e-4);
    }
}
