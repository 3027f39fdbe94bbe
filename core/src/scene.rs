//! Read-only render snapshot
//!
//! The renderer consumes a [`Scene`] built from the game state after each tick
//! and never mutates the simulation. Decorative assets that fail to load are
//! replaced by solid-colour shapes.

use std::collections::HashSet;

use crate::ball::Tier;
use crate::collision::Rect;

const BASKET_SPRITE: &str = "/assets/images/basket.png";
const BASKET_COLOR: &str = "#8B4513";

/// A decorative image the renderer may fail to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    Ball(Tier),
    Basket,
}

impl Asset {
    pub fn path(&self) -> String {
        match self {
            Asset::Ball(tier) => format!("/assets/images/{}_ball.png", tier),
            Asset::Basket => BASKET_SPRITE.to_string(),
        }
    }

    fn fallback_color(&self) -> &'static str {
        match self {
            Asset::Ball(tier) => tier.color(),
            Asset::Basket => BASKET_COLOR,
        }
    }
}

/// Tracks which assets failed to load
#[derive(Debug, Clone, Default)]
pub struct AssetStatus {
    failed: HashSet<Asset>,
}

impl AssetStatus {
    pub fn mark_failed(&mut self, asset: Asset, reason: &str) {
        tracing::warn!("Error loading {}: {} (using solid colour)", asset.path(), reason);
        self.failed.insert(asset);
    }

    pub fn is_available(&self, asset: Asset) -> bool {
        !self.failed.contains(&asset)
    }

    pub fn appearance(&self, asset: Asset) -> Appearance {
        if self.is_available(asset) {
            Appearance::Sprite { path: asset.path() }
        } else {
            Appearance::Solid {
                color: asset.fallback_color(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Appearance {
    Sprite { path: String },
    Solid { color: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub rect: Rect,
    pub appearance: Appearance,
}

/// Text layer drawn over the play area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Waiting,
    Paused,
    GameOver { final_score: u32 },
}

impl Overlay {
    pub fn lines(&self) -> Vec<String> {
        match self {
            Overlay::None => Vec::new(),
            Overlay::Waiting => vec!["Waiting for next ball...".to_string()],
            Overlay::Paused => vec![
                "PAUSED".to_string(),
                "Press SPACE to resume".to_string(),
                "Press R to restart".to_string(),
            ],
            Overlay::GameOver { final_score } => {
                vec!["Game Over".to_string(), format!("Score: {}", final_score)]
            }
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub ball: Option<Drawable>,
    pub basket: Drawable,
    pub overlay: Overlay,
    pub score: u32,
    pub high_score: u32,
}
