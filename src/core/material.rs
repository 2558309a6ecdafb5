use serde::{Deserialize, Serialize};

/// Material coefficients that drive mass derivation and contact response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.5,
            restitution: 0.3,
        }
    }
}

impl Material {
    pub fn wood() -> Self {
        Self {
            density: 0.7,
            friction: 0.6,
            restitution: 0.3,
        }
    }

    pub fn metal() -> Self {
        Self {
            density: 7.8,
            friction: 0.4,
            restitution: 0.2,
        }
    }

    pub fn rubber() -> Self {
        Self {
            density: 1.4,
            friction: 0.9,
            restitution: 0.8,
        }
    }

    pub fn ice() -> Self {
        Self {
            density: 0.9,
            friction: 0.05,
            restitution: 0.1,
        }
    }

    pub fn stone() -> Self {
        Self {
            density: 2.6,
            friction: 0.7,
            restitution: 0.15,
        }
    }

    /// Looks up a named preset.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "wood" => Some(Self::wood()),
            "metal" => Some(Self::metal()),
            "rubber" => Some(Self::rubber()),
            "ice" => Some(Self::ice()),
            "stone" => Some(Self::stone()),
            _ => None,
        }
    }

    /// Named lookup that falls back to the `default` preset. Unknown names
    /// are not an error for the caller, only a log line.
    pub fn resolve(name: &str) -> Self {
        Self::named(name).unwrap_or_else(|| {
            log::warn!("unknown material preset '{name}', using default");
            Self::default()
        })
    }
}
