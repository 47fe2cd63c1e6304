//! Glint - progressive CPU path tracing
//!
//! A Monte Carlo path tracer: surfaces and lights go into a [`Scene`], a
//! [`Tracer`] renders passes over it on a worker pool and accumulates the
//! samples into an [`Accumulator`]. Presentation is left to the caller.

mod accumulator;
mod camera;
mod config;
mod cuboid;
pub mod hit;
mod integrator;
mod material;
pub mod mesh;
mod plane;
mod prng;
mod quad;
mod scene;
mod sphere;
mod surface;
mod texture;
mod tracer;
mod triangle;

pub use accumulator::Accumulator;
pub use camera::Camera;
pub use config::{IntegratorConfig, TracerConfig};
pub use cuboid::Cuboid;
pub use hit::{initial_range, Hit, Intersection, SurfaceId, FAR_DISTANCE, MIN_HIT_DISTANCE};
pub use integrator::PathIntegrator;
pub use material::{CheckerMaterial, ConstantMaterial, Material, MaterialProperties, TextureMaterial};
pub use mesh::Mesh;
pub use plane::Plane;
pub use prng::Prng;
pub use quad::Quad;
pub use scene::{RayCounter, Scene, SceneError, SceneResult, Sky};
pub use sphere::Sphere;
pub use surface::{Shape, Surface};
pub use texture::{EnvironmentMap, Texture, TextureError, TextureResult};
pub use tracer::{Tracer, TracerError, TracerResult};
pub use triangle::{Triangle, Vertex};

/// Re-export the math types used throughout the public API
pub use glint_math::{Aabb, Color, Interval, Ray, Vec3};
