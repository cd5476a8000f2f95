//! Gradient (Perlin) noise with per-axis permutation tables.

use crate::sampling::random_vec3;
use ember_math::{Point3, Vec3};
use rand::seq::SliceRandom;
use rand::RngCore;

/// Default number of lattice gradients / permutation entries.
pub const DEFAULT_POINT_COUNT: usize = 256;

/// Default octave count for [`Perlin::turbulence`].
pub const DEFAULT_TURBULENCE_DEPTH: u32 = 7;

/// Perlin noise generator. Tables are filled once at construction and
/// never change afterwards.
#[derive(Debug, Clone)]
pub struct Perlin {
    ranvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Build tables of `point_count` entries (at least 1) from `rng`.
    pub fn new(point_count: usize, rng: &mut dyn RngCore) -> Self {
        let point_count = point_count.max(1);
        let ranvec = (0..point_count)
            .map(|_| random_vec3(rng, -1.0, 1.0).normalize_or_zero())
            .collect();

        Self {
            ranvec,
            perm_x: generate_perm(point_count, rng),
            perm_y: generate_perm(point_count, rng),
            perm_z: generate_perm(point_count, rng),
        }
    }

    pub fn point_count(&self) -> usize {
        self.ranvec.len()
    }

    /// Smoothly interpolated gradient noise at `p`, in [-1, 1].
    pub fn noise(&self, p: Point3) -> f64 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i64;
        let j = p.y.floor() as i64;
        let k = p.z.floor() as i64;

        let n = self.point_count() as i64;
        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let index = self.perm_x[(i + di as i64).rem_euclid(n) as usize]
                        ^ self.perm_y[(j + dj as i64).rem_euclid(n) as usize]
                        ^ self.perm_z[(k + dk as i64).rem_euclid(n) as usize];
                    // XOR of two in-range indices can exceed a non power of two count
                    *corner = self.ranvec[index % self.ranvec.len()];
                }
            }
        }

        perlin_interp(&c, u, v, w)
    }

    /// Sum of `depth` octaves of noise, each at double the frequency and
    /// half the amplitude of the previous one. Never negative.
    pub fn turbulence(&self, p: Point3, depth: u32) -> f64 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

/// Identity permutation shuffled in place (Fisher-Yates).
fn generate_perm(point_count: usize, rng: &mut dyn RngCore) -> Vec<usize> {
    let mut p: Vec<usize> = (0..point_count).collect();
    p.shuffle(rng);
    p
}

/// Trilinear interpolation of the corner gradients, Hermite-smoothed.
fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f64, v: f64, w: f64) -> f64 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        let fi = i as f64;
        for (j, row) in plane.iter().enumerate() {
            let fj = j as f64;
            for (k, gradient) in row.iter().enumerate() {
                let fk = k as f64;
                let weight = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight);
            }
        }
    }
    accum
}
