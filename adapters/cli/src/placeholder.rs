//! Stand-in sprite catalog for headless runs.
//!
//! The real sheet provider is an external collaborator; this module supplies
//! solid frames cut to the reference sheet's region sizes so collision
//! footprints match the windowed game.

use sky_joust_core::{SpriteCatalog, SpriteFrame, ENEMY_MOUNT_FRAMES, PLAYER_MOUNT_FRAMES};

/// Ledge piece sizes in catalog order, taken from the reference sheet.
const LEDGE_SIZES: [(u32, u32); 8] = [
    (190, 30),
    (64, 8),
    (88, 9),
    (50, 7),
    (64, 7),
    (80, 8),
    (63, 7),
    (58, 11),
];

/// Builds the placeholder catalog.
pub(crate) fn catalog() -> SpriteCatalog {
    SpriteCatalog {
        player_mount: vec![SpriteFrame::solid(16, 20); PLAYER_MOUNT_FRAMES],
        player_rider: SpriteFrame::solid(12, 7),
        enemy_mount: vec![SpriteFrame::solid(20, 20); ENEMY_MOUNT_FRAMES],
        enemy_rider: SpriteFrame::solid(12, 7),
        ledges: LEDGE_SIZES
            .iter()
            .map(|(width, height)| SpriteFrame::solid(*width, *height))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::catalog;

    #[test]
    fn placeholder_catalog_validates() {
        catalog().validate().expect("placeholder catalog is usable");
    }
}
