use super::coalescer::{AssetInfo, AssetSource, PerkId};
use crate::api::client::load_document;
use crate::api::endpoints::{rune_icon_url, runes_reforged_url};
use crate::api::models::RuneStyleDto;
use crate::error::AppError;
use std::collections::HashMap;

/// Rune and rune-style metadata from Data Dragon's `runesReforged.json`.
pub struct DataDragonRunes {
    version: String,
}

impl DataDragonRunes {
    pub fn new(version: impl Into<String>) -> Self {
        DataDragonRunes {
            version: version.into(),
        }
    }
}

impl AssetSource for DataDragonRunes {
    fn fetch(&self, ids: &[PerkId]) -> Result<HashMap<PerkId, AssetInfo>, AppError> {
        let styles: Vec<RuneStyleDto> = load_document(&runes_reforged_url(&self.version))?;
        let index = rune_index(&styles);

        Ok(ids
            .iter()
            .filter_map(|id| index.get(id).map(|info| (*id, info.clone())))
            .collect())
    }
}

/// Flattens styles and their runes into one ID lookup.
pub fn rune_index(styles: &[RuneStyleDto]) -> HashMap<PerkId, AssetInfo> {
    let mut index = HashMap::new();

    for style in styles {
        index.insert(
            style.id,
            AssetInfo {
                icon: rune_icon_url(&style.icon),
                name: style.name.clone(),
            },
        );
        for rune in style.slots.iter().flat_map(|slot| slot.runes.iter()) {
            index.insert(
                rune.id,
                AssetInfo {
                    icon: rune_icon_url(&rune.icon),
                    name: rune.name.clone(),
                },
            );
        }
    }

    index
}
