//! Surface materials.
//!
//! A material is a function from a surface point to the scattering
//! parameters the integrator branches on. Materials are shared between many
//! surfaces through `Arc<dyn Material>`.

use crate::Texture;
use glint_math::{Color, Vec3};
use std::sync::Arc;

/// Scattering parameters at one surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    /// Albedo multiplied into the path throughput
    pub color: Color,
    /// Radiance emitted by the surface
    pub emission: Color,
    /// 0 = perfectly sharp lobes, 1 = widest lobes
    pub roughness: f32,
    /// Probability of diffuse scattering versus transmission
    pub opacity: f32,
    /// Probability of metallic reflection versus the dielectric branches
    pub metallic: f32,
    /// Index of refraction for transmitted rays
    pub ior: f32,
}

impl MaterialProperties {
    /// Opaque diffuse surface with the given albedo.
    pub fn diffuse(color: Color) -> Self {
        Self {
            color,
            emission: Color::ZERO,
            roughness: 0.0,
            opacity: 1.0,
            metallic: 0.0,
            ior: 1.5,
        }
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    pub fn with_ior(mut self, ior: f32) -> Self {
        self.ior = ior;
        self
    }
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self::diffuse(Color::ONE)
    }
}

/// Trait for anything that can describe a surface at a point.
pub trait Material: Send + Sync {
    /// Material parameters at world `position` with surface coordinate `uvw`.
    fn sample(&self, position: Vec3, uvw: Vec3) -> MaterialProperties;
}

/// The same parameters everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantMaterial {
    props: MaterialProperties,
}

impl ConstantMaterial {
    pub fn new(props: MaterialProperties) -> Self {
        Self { props }
    }

    /// Shorthand for an opaque diffuse surface.
    pub fn diffuse(color: Color) -> Arc<dyn Material> {
        Arc::new(Self::new(MaterialProperties::diffuse(color)))
    }

    /// Shorthand for an emitter that also reflects diffusely.
    pub fn emissive(color: Color, emission: Color) -> Arc<dyn Material> {
        Arc::new(Self::new(
            MaterialProperties::diffuse(color).with_emission(emission),
        ))
    }
}

impl Material for ConstantMaterial {
    fn sample(&self, _position: Vec3, _uvw: Vec3) -> MaterialProperties {
        self.props
    }
}

/// Tiled image lookup.
///
/// `uvw` is measured in multiples of the texture height in both directions,
/// so one unit of `u` or `v` spans `height` texels. Bright texels glow in
/// proportion to `emission`.
#[derive(Debug, Clone)]
pub struct TextureMaterial {
    texture: Arc<Texture>,
    emission: f32,
    opacity: f32,
}

impl TextureMaterial {
    const ROUGHNESS: f32 = 0.02;
    const IOR: f32 = 1.3;
    const EMISSION_GAIN: f32 = 10.0;

    pub fn new(texture: Arc<Texture>, emission: f32, opacity: f32) -> Self {
        Self {
            texture,
            emission,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

impl Material for TextureMaterial {
    fn sample(&self, _position: Vec3, uvw: Vec3) -> MaterialProperties {
        let scale = self.texture.height() as f32;
        let color = self
            .texture
            .wrapped((scale * uvw.x).floor() as i64, (scale * uvw.y).floor() as i64);

        MaterialProperties {
            color,
            emission: color * color * color * (self.emission * Self::EMISSION_GAIN),
            roughness: Self::ROUGHNESS,
            opacity: self.opacity,
            metallic: 0.0,
            ior: Self::IOR,
        }
    }
}

/// Procedural 3D checkerboard alternating between two parameter sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckerMaterial {
    odd: MaterialProperties,
    even: MaterialProperties,
    cell_size: f32,
}

impl CheckerMaterial {
    pub fn new(odd: MaterialProperties, even: MaterialProperties, cell_size: f32) -> Self {
        Self {
            odd,
            even,
            cell_size,
        }
    }
}

impl Default for CheckerMaterial {
    /// Polished grey metal tiles of two slightly different roughnesses.
    fn default() -> Self {
        let tile = MaterialProperties::diffuse(Color::splat(0.3)).with_metallic(1.0);
        Self::new(tile.with_roughness(0.0002), tile.with_roughness(0.00002), 2.0)
    }
}

impl Material for CheckerMaterial {
    fn sample(&self, position: Vec3, _uvw: Vec3) -> MaterialProperties {
        let cell = (position / self.cell_size).floor();
        let parity = (cell.x as i64 + cell.y as i64 + cell.z as i64).rem_euclid(2);
        if parity == 1 {
            self.odd
        } else {
            self.even
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_clamps_ranges() {
        let props = MaterialProperties::diffuse(Color::ONE)
            .with_roughness(2.0)
            .with_opacity(-1.0)
            .with_metallic(1.5);

        assert_eq!(props.roughness, 1.0);
        assert_eq!(props.opacity, 0.0);
        assert_eq!(props.metallic, 1.0);
    }

    #[test]
    fn test_constant_material_ignores_position() {
        let mat = ConstantMaterial::emissive(Color::splat(0.9), Color::splat(10.0));
        let a = mat.sample(Vec3::ZERO, Vec3::ZERO);
        let b = mat.sample(Vec3::splat(100.0), Vec3::ONE);
        assert_eq!(a, b);
        assert_eq!(a.emission, Color::splat(10.0));
    }

    #[test]
    fn test_texture_material_tiles() {
        let texels = vec![
            Color::new(1.0, 0.0, 0.0),
            Color::new(0.0, 1.0, 0.0),
            Color::new(0.0, 0.0, 1.0),
            Color::new(0.5, 0.5, 0.5),
        ];
        let texture = Arc::new(Texture::new(2, 2, texels).expect("valid texture"));
        let mat = TextureMaterial::new(texture, 0.0, 1.0);

        let first = mat.sample(Vec3::ZERO, Vec3::new(0.1, 0.1, 0.0));
        let tiled = mat.sample(Vec3::ZERO, Vec3::new(1.1, -0.9, 0.0));
        assert_eq!(first.color, Color::new(1.0, 0.0, 0.0));
        assert_eq!(first, tiled);

        let second_column = mat.sample(Vec3::ZERO, Vec3::new(0.6, 0.1, 0.0));
        assert_eq!(second_column.color, Color::new(0.0, 1.0, 0.0));
        assert_eq!(second_column.emission, Color::ZERO);
    }

    #[test]
    fn test_texture_material_emission_scales_with_brightness() {
        let texture = Arc::new(Texture::solid(Color::new(1.0, 0.5, 0.0)));
        let mat = TextureMaterial::new(texture, 0.1, 1.0);
        let props = mat.sample(Vec3::ZERO, Vec3::ZERO);
        assert!((props.emission - Color::new(1.0, 0.125, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_checker_alternates() {
        let odd = MaterialProperties::diffuse(Color::ONE);
        let even = MaterialProperties::diffuse(Color::ZERO);
        let mat = CheckerMaterial::new(odd, even, 1.0);

        assert_eq!(mat.sample(Vec3::new(0.5, 0.5, 0.5), Vec3::ZERO), even);
        assert_eq!(mat.sample(Vec3::new(1.5, 0.5, 0.5), Vec3::ZERO), odd);
        assert_eq!(mat.sample(Vec3::new(1.5, 1.5, 0.5), Vec3::ZERO), even);
        assert_eq!(mat.sample(Vec3::new(-0.5, 0.5, 0.5), Vec3::ZERO), odd);
        assert_eq!(mat.sample(Vec3::new(0.5, 0.5, 1.5), Vec3::ZERO), odd);
    }
}
