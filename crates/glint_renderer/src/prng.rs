//! Seeded pseudo-random source for every stochastic decision in a path.
//!
//! Each render worker owns one `Prng`; nothing here is shared between
//! threads. Sequences are reproducible for a given seed.

use glint_math::Vec3;
use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::f32::consts::{PI, TAU};

/// Deterministic random number generator with direction sampling helpers.
#[derive(Clone, Debug)]
pub struct Prng {
    rng: Xoshiro256PlusPlus,
    seed: u64,
}

impl Prng {
    /// Create a generator with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a generator seeded from the thread-local entropy source.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this generator was last (re)seeded with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    /// Uniform value in [0, 1).
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Uniform value between `min` and `max`.
    ///
    /// The bounds may be given in either order.
    #[inline]
    pub fn uniform(&mut self, min: f32, max: f32) -> f32 {
        let r = self.next_f32();
        min * (1.0 - r) + max * r
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        ((self.next_f32() * len as f32) as usize).min(len - 1)
    }

    /// Point on the unit sphere restricted to an azimuth range and a range of
    /// `cos(polar angle)` measured from +Y.
    pub fn unit_sphere_patch(
        &mut self,
        theta_min: f32,
        theta_max: f32,
        cos_min: f32,
        cos_max: f32,
    ) -> Vec3 {
        let theta = self.uniform(theta_min, theta_max);
        let phi = self.uniform(cos_min, cos_max).clamp(-1.0, 1.0).acos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta)
    }

    /// Uniformly distributed direction.
    pub fn unit_sphere(&mut self) -> Vec3 {
        self.unit_sphere_patch(0.0, TAU, -1.0, 1.0)
    }

    /// Uniformly distributed direction in the hemisphere around `up`.
    pub fn hemisphere(&mut self, up: Vec3) -> Vec3 {
        let (right, forward) = up.any_orthonormal_pair();
        let u1 = self.next_f32();
        let u2 = self.next_f32();

        let r = (1.0 - u1 * u1).max(0.0).sqrt();
        let (sin_phi, cos_phi) = (TAU * u2).sin_cos();
        right * (cos_phi * r) + forward * (sin_phi * r) + up * u1
    }

    /// Cosine-weighted direction in the hemisphere around `up`.
    pub fn hemisphere_cosine(&mut self, up: Vec3) -> Vec3 {
        self.lobe(up, 1.0)
    }

    /// Cosine-weighted direction around `axis` restricted to a cone.
    ///
    /// `amount` in [0, 1] is the squared sine of the widest angle: 0 returns
    /// `axis` itself, 1 covers the whole hemisphere. Used for rough
    /// reflection and refraction lobes.
    pub fn lobe(&mut self, axis: Vec3, amount: f32) -> Vec3 {
        let (right, forward) = axis.any_orthonormal_pair();
        let u1 = self.uniform(0.0, amount.clamp(0.0, 1.0));
        let u2 = self.next_f32();

        let r = u1.sqrt();
        let (sin_theta, cos_theta) = (TAU * u2).sin_cos();
        right * (cos_theta * r) + forward * (sin_theta * r) + axis * (1.0 - u1).max(0.0).sqrt()
    }

    /// Uniform point on the unit disc in the XY plane.
    pub fn unit_disc(&mut self) -> Vec3 {
        let angle = self.uniform(0.0, 2.0 * PI);
        let radius = self.next_f32().sqrt();
        let (sin, cos) = angle.sin_cos();
        Vec3::new(cos * radius, sin * radius, 0.0)
    }

    /// Uniform point in the cube [-1, 1]^3.
    pub fn unit_cube(&mut self) -> Vec3 {
        Vec3::new(
            self.uniform(-1.0, 1.0),
            self.uniform(-1.0, 1.0),
            self.uniform(-1.0, 1.0),
        )
    }
}

impl RngCore for Prng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: usize = 20_000;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Prng::new(7);
        let mut b = Prng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_f32(), b.next_f32());
        }

        a.reseed(7);
        let mut c = Prng::new(7);
        assert_eq!(a.unit_sphere(), c.unit_sphere());
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn test_uniform_range() {
        let mut prng = Prng::new(1);
        for _ in 0..SAMPLES {
            let v = prng.uniform(-2.0, 3.0);
            assert!((-2.0..=3.0).contains(&v));
        }
    }

    #[test]
    fn test_index_in_bounds() {
        let mut prng = Prng::new(2);
        let mut seen = [0usize; 3];
        for _ in 0..SAMPLES {
            seen[prng.index(3)] += 1;
        }
        assert!(seen.iter().all(|&n| n > SAMPLES / 4));
    }

    #[test]
    fn test_unit_sphere_is_unit_and_centered() {
        let mut prng = Prng::new(3);
        let mut mean = Vec3::ZERO;
        for _ in 0..SAMPLES {
            let d = prng.unit_sphere();
            assert!((d.length() - 1.0).abs() < 1e-4);
            mean += d;
        }
        mean /= SAMPLES as f32;
        assert!(mean.length() < 0.03, "mean = {mean:?}");
    }

    #[test]
    fn test_hemisphere_stays_above_normal() {
        let mut prng = Prng::new(4);
        let n = Vec3::new(1.0, 2.0, -0.5).normalize();
        for _ in 0..SAMPLES {
            let d = prng.hemisphere(n);
            assert!(d.dot(n) >= -1e-5);
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cosine_hemisphere_mean_cosine() {
        // E[cos] under a cosine-weighted distribution is 2/3.
        let mut prng = Prng::new(5);
        let n = Vec3::Y;
        let mean: f32 =
            (0..SAMPLES).map(|_| prng.hemisphere_cosine(n).dot(n)).sum::<f32>() / SAMPLES as f32;
        assert!((mean - 2.0 / 3.0).abs() < 0.01, "mean = {mean}");
    }

    #[test]
    fn test_lobe_with_zero_amount_is_axis() {
        let mut prng = Prng::new(6);
        // Axis along X used to produce a degenerate basis.
        for axis in [Vec3::X, Vec3::Y, -Vec3::Y, Vec3::new(1.0, 1.0, 0.0).normalize()] {
            let d = prng.lobe(axis, 0.0);
            assert!((d - axis).length() < 1e-5);
        }
    }

    #[test]
    fn test_unit_disc_inside_radius() {
        let mut prng = Prng::new(8);
        for _ in 0..SAMPLES {
            let p = prng.unit_disc();
            assert_eq!(p.z, 0.0);
            assert!(p.length() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_sphere_patch_respects_bounds() {
        let mut prng = Prng::new(9);
        for _ in 0..SAMPLES {
            let d = prng.unit_sphere_patch(0.0, PI, 0.5, 1.0);
            assert!(d.y >= 0.5 - 1e-5);
            assert!(d.z >= -1e-5);
        }
    }

    #[test]
    fn test_unit_cube_bounds() {
        let mut prng = Prng::new(10);
        for _ in 0..SAMPLES {
            let p = prng.unit_cube();
            assert!(p.abs().max_element() <= 1.0);
        }
    }
}
