//! Serde helpers for glam vectors in environment configs.
//!
//! Vectors are written as `{ x, y, z }` maps so hand-edited JSON/YAML stays
//! readable. Use with `#[serde(with = "crate::serde_utils::vec3")]`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Serde proxy for Vec3
#[derive(Serialize, Deserialize)]
pub struct Vec3Def {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for Vec3Def {
    fn from(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<Vec3Def> for Vec3 {
    fn from(def: Vec3Def) -> Self {
        Vec3::new(def.x, def.y, def.z)
    }
}

pub mod vec3 {
    use super::Vec3Def;
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(v: &Vec3, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Vec3Def::from(*v).serialize(s)
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Vec3, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec3Def::deserialize(d).map(Vec3::from)
    }
}

/// `Option<Vec3>`; `null` or a missing field reads as `None`.
pub mod opt_vec3 {
    use super::Vec3Def;
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(v: &Option<Vec3>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        v.map(Vec3Def::from).serialize(s)
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<Vec3>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<Vec3Def>::deserialize(d).map(|def| def.map(Vec3::from))
    }
}
