//! # Feature Catalog
//!
//! The stock stamps of the game and their serializable definitions.

use crate::generation::feature::Feature;
use crate::CubelikeResult;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A feature in text form, as stored in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDefinition {
    pub id: String,
    pub replace: Vec<String>,
    pub place: Vec<String>,
    #[serde(default = "default_can_rotate")]
    pub can_rotate: bool,
}

fn default_can_rotate() -> bool {
    true
}

impl FeatureDefinition {
    pub fn new(id: &str, replace: &[&str], place: &[&str], can_rotate: bool) -> Self {
        Self {
            id: id.to_string(),
            replace: replace.iter().map(|row| row.to_string()).collect(),
            place: place.iter().map(|row| row.to_string()).collect(),
            can_rotate,
        }
    }

    /// Parses the masks into a [`Feature`].
    pub fn compile(&self) -> CubelikeResult<Feature> {
        Feature::from_patterns(&self.id, self.replace.as_slice(), self.place.as_slice(), self.can_rotate)
    }
}

/// Start marker: player on a floor row, entrance just outside it.
pub fn start_definition() -> FeatureDefinition {
    FeatureDefinition::new("start", &["XXX", "...", "?.?"], &["XpX", ".v.", "?.?"], false)
}

/// Exit marker on a floor cell below empty space.
pub fn exit_definition() -> FeatureDefinition {
    FeatureDefinition::new("exit_door", &[".", "X"], &[".", "e"], false)
}

/// The stock decorations. `quest_npc` is listed twice so it is drawn twice as often.
pub fn stock_decorations() -> Vec<FeatureDefinition> {
    let quest_npc = FeatureDefinition::new("quest_npc", &["XXX", "XXX", "..."], &["XXX", "XnX", "..."], true);
    vec![
        FeatureDefinition::new("monster_2x2", &["XX", "XX"], &["mX", "Xm"], true),
        FeatureDefinition::new("chest", &["XXX", "XXX", "XXX"], &["XXX", "XcX", "XXX"], true),
        quest_npc.clone(),
        FeatureDefinition::new("monster_3x3", &["XXX", "XXX", "XXX"], &["mXX", "XXm", "XmX"], true),
        FeatureDefinition::new("wishing_well", &["....", "XXXX", "XXXX"], &["....", "XnsX", "XXXX"], true),
        quest_npc,
        FeatureDefinition::new("stray_item", &["X"], &["i"], true),
    ]
}

/// Compiled features used by the dungeon pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCatalog {
    pub start: Feature,
    pub exit: Feature,
    pub decorations: Vec<Feature>,
}

impl FeatureCatalog {
    /// The stock catalog.
    pub fn standard() -> CubelikeResult<Self> {
        Self::with_decorations(&stock_decorations())
    }

    /// The stock start and exit with a custom decoration list.
    pub fn with_decorations(decorations: &[FeatureDefinition]) -> CubelikeResult<Self> {
        Ok(Self {
            start: start_definition().compile()?,
            exit: exit_definition().compile()?,
            decorations: decorations
                .iter()
                .map(FeatureDefinition::compile)
                .collect::<CubelikeResult<_>>()?,
        })
    }

    /// Draws a decoration uniformly; `None` when the list is empty.
    pub fn random_decoration(&self, rng: &mut StdRng) -> Option<&Feature> {
        self.decorations.choose(rng)
    }
}
