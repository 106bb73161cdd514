use glam::{Mat4, Vec2, Vec3};

use super::{assert_segments, circular_cap, ring_direction, stitch};
use crate::{BezierCurve, MeshBuilder, MeshDescription};

/// Orthonormal cross-section frame at one curve sample.
struct Frame {
    origin: Vec3,
    tangent: Vec3,
    bitangent: Vec3,
    normal: Vec3,
}

impl Frame {
    /// `chord` points from this sample towards the next one along the curve
    /// and stands in for a vanishing derivative, e.g. at a repeated control point.
    fn at(curve: &BezierCurve, t: f32, up: Vec3, chord: Vec3) -> Self {
        let tangent = curve
            .tangent_at(t)
            .try_normalize()
            .or_else(|| {
                log::debug!("Zero-length tangent at t = {}, using the sample chord", t);
                chord.try_normalize()
            })
            .unwrap_or_else(|| {
                log::warn!("Degenerate curve at t = {}, falling back to +Y", t);
                Vec3::Y
            });
        let bitangent = tangent.cross(up).try_normalize().unwrap_or_else(|| {
            log::warn!("Up vector is parallel to the tangent at t = {}", t);
            tangent.any_orthonormal_vector()
        });
        Self {
            origin: curve.value_at(t),
            tangent,
            bitangent,
            normal: bitangent.cross(tangent),
        }
    }

    /// Outward direction of ring segment `s`.
    fn direction(&self, s: u32, segments: u32) -> Vec3 {
        let d = ring_direction(s, segments);
        self.bitangent * d.x - self.normal * d.y
    }

    /// Maps local +Y onto the tangent so local caps line up with the rings.
    fn to_world(&self) -> Mat4 {
        Mat4::from_cols(
            self.bitangent.extend(0.0),
            self.tangent.extend(0.0),
            self.normal.extend(0.0),
            self.origin.extend(1.0),
        )
    }
}

/// Sweeps a circle of `radius` along `resolution + 1` samples of `curve` and caps both ends.
///
/// `v` follows the accumulated chord length between samples.
pub fn bezier_tube(
    curve: &BezierCurve,
    up: Vec3,
    radius: f32,
    resolution: u32,
    segments: u32,
    color: Vec3,
) -> MeshDescription {
    assert!(resolution >= 1, "tube resolution must be at least 1");
    assert_segments(segments);

    let params: Vec<f32> = (0..=resolution).map(|r| r as f32 / resolution as f32).collect();
    let origins: Vec<Vec3> = params.iter().map(|&t| curve.value_at(t)).collect();
    let frames: Vec<Frame> = params
        .iter()
        .enumerate()
        .map(|(r, &t)| {
            let chord = match origins.get(r + 1) {
                Some(next) => *next - origins[r],
                None => origins[r] - origins[r - 1],
            };
            Frame::at(curve, t, up, chord)
        })
        .collect();

    let mut builder = MeshBuilder::new();

    for (frame, reverse) in [(&frames[0], true), (&frames[resolution as usize], false)] {
        builder.push_transform();
        builder.transform(frame.to_world());
        circular_cap(&mut builder, radius, segments, color, reverse);
        builder.pop_transform();
    }

    let mut arclength = 0.0;
    let mut lower = None;
    for (r, frame) in frames.iter().enumerate() {
        if r > 0 {
            arclength += frame.origin.distance(frames[r - 1].origin);
        }

        let ring = builder.start_cycle(segments + 1);
        for s in 0..=segments {
            let normal = frame.direction(s, segments);
            let u = s as f32 / segments as f32;
            builder.emit(frame.origin + normal * radius, color, normal, Vec2::new(u, arclength));

            if let (Some(lower), true) = (lower, s > 0) {
                stitch(&mut builder, lower, ring, s);
            }
        }
        lower = Some(ring);
    }

    builder.build()
}
