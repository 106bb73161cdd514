use glam::Vec3;

/// A Bézier curve of degree `n` evaluated in closed Bernstein form.
#[derive(Clone, Debug)]
pub struct BezierCurve {
    points: Vec<Vec3>,
    coefficients: Vec<f64>,
    derivative_points: Vec<Vec3>,
    derivative_coefficients: Vec<f64>,
}

impl BezierCurve {
    /// Panics when fewer than two control points are given.
    pub fn new(points: Vec<Vec3>) -> Self {
        assert!(
            points.len() >= 2,
            "a Bézier curve needs at least 2 control points, got {}",
            points.len()
        );

        let n = (points.len() - 1) as u32;
        let coefficients = (0..=n).map(|i| binomial(n, i)).collect();
        let derivative_coefficients = (0..n).map(|i| binomial(n - 1, i)).collect();
        let derivative_points = points.windows(2).map(|w| w[1] - w[0]).collect();

        Self {
            points,
            coefficients,
            derivative_points,
            derivative_coefficients,
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn degree(&self) -> u32 {
        (self.points.len() - 1) as u32
    }

    pub fn value_at(&self, t: f32) -> Vec3 {
        let n = self.degree();
        self.points
            .iter()
            .zip(&self.coefficients)
            .enumerate()
            .fold(Vec3::ZERO, |acc, (i, (&p, &c))| {
                acc + p * (c * bernstein_power(t, n, i as u32)) as f32
            })
    }

    /// First derivative with respect to `t`. Not normalized.
    pub fn tangent_at(&self, t: f32) -> Vec3 {
        let n = self.degree();
        let sum = self
            .derivative_points
            .iter()
            .zip(&self.derivative_coefficients)
            .enumerate()
            .fold(Vec3::ZERO, |acc, (i, (&d, &c))| {
                acc + d * (c * bernstein_power(t, n - 1, i as u32)) as f32
            });
        sum * n as f32
    }
}

/// `(1 - t)^(n - i) * t^i` with `0^0 = 1`.
///
/// Weights are formed in `f64` so large binomials meet tiny powers before
/// anything is rounded to `f32`.
fn bernstein_power(t: f32, n: u32, i: u32) -> f64 {
    let t = t as f64;
    power(1.0 - t, n - i) * power(t, i)
}

fn power(base: f64, exponent: u32) -> f64 {
    if exponent == 0 {
        1.0
    } else {
        base.powi(exponent as i32)
    }
}

/// Multiplicative form in `f64`. Exact while the result fits 53 bits, finite up to degree ~1000.
fn binomial(n: u32, k: u32) -> f64 {
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, j| acc * (n - j) as f64 / (j + 1) as f64)
}
