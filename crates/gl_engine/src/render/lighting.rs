//! Scene lighting state
//!
//! Two hardcoded directional lights: a key light (the sun) and a fill light,
//! each with its own ambient term. Defaults match the demo scene.

use crate::foundation::math::Vec3;

/// A directional light
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    /// Light direction in world space (not required to be normalized)
    pub direction: Vec3,
    /// Light colour/intensity
    pub colour: Vec3,
}

/// Complete lighting state for the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLighting {
    /// Primary light (sun)
    pub key_light: DirectionalLight,
    /// Ambient term of the primary light
    pub ambient: Vec3,
    /// Secondary fill light
    pub fill_light: DirectionalLight,
    /// Ambient term of the fill light
    pub fill_ambient: Vec3,
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self {
            key_light: DirectionalLight {
                direction: Vec3::new(2.0, 0.0, 2.0),
                colour: Vec3::new(5.0, 5.0, 5.0),
            },
            ambient: Vec3::new(0.5, 0.5, 0.5),
            fill_light: DirectionalLight {
                direction: Vec3::new(1.0, 2.0, -2.0),
                colour: Vec3::new(2.0, 2.0, 2.0),
            },
            fill_ambient: Vec3::new(0.5, 0.5, 0.5),
        }
    }
}
