//! Static ledge terrain, built once at world creation and never mutated.

use sky_joust_core::{SpriteCatalog, SpriteFrame};

use crate::body::Body;

/// Width of the widened floor strip holding the bottom ledge piece.
const FLOOR_WIDTH: u32 = 300;
/// Height of the widened floor strip.
const FLOOR_HEIGHT: u32 = 30;
/// Horizontal inset of the bottom ledge piece within the floor strip.
const FLOOR_PIECE_INSET: u32 = 70;
/// Placement of the floor strip in playfield coordinates.
const FLOOR_POSITION: (f32, f32) = (-20.0, 178.0);

/// Placements for the remaining catalog pieces, in catalog order:
/// mid-bottom, mid-top, top-left, top-right, bottom-left, bottom-right,
/// mid-right.
const LEDGE_POSITIONS: [(f32, f32); 7] = [
    (105.0, 136.0),
    (83.0, 63.0),
    (-20.0, 52.0),
    (253.0, 52.0),
    (-17.0, 114.0),
    (257.0, 114.0),
    (202.0, 106.0),
];

/// One immovable platform the riders land on and bounce against.
#[derive(Clone, Debug)]
pub(crate) struct Ledge {
    body: Body,
    piece: usize,
}

impl Ledge {
    fn new(frame: SpriteFrame, x: f32, y: f32, piece: usize) -> Self {
        Self {
            body: Body::fixed(frame, x, y),
            piece,
        }
    }

    pub(crate) fn body(&self) -> &Body {
        &self.body
    }

    /// Catalog index of the piece this ledge renders with.
    pub(crate) fn piece(&self) -> usize {
        self.piece
    }
}

/// Lays out the arena's ledges from the catalog pieces.
///
/// The first piece lands inside a widened transparent floor strip so the
/// bottom platform spans the playfield seam; the rest sit at their fixed
/// layout coordinates.
pub(crate) fn build_terrain(catalog: &SpriteCatalog) -> Vec<Ledge> {
    let mut ledges = Vec::with_capacity(catalog.ledges.len());

    if let Some(floor_piece) = catalog.ledges.first() {
        let strip = SpriteFrame::from_alpha(FLOOR_WIDTH, FLOOR_HEIGHT, Vec::new())
            .overlay(floor_piece, FLOOR_PIECE_INSET, 0);
        ledges.push(Ledge::new(strip, FLOOR_POSITION.0, FLOOR_POSITION.1, 0));
    }

    for (offset, piece) in catalog.ledges.iter().skip(1).enumerate() {
        let (x, y) = LEDGE_POSITIONS[offset.min(LEDGE_POSITIONS.len() - 1)];
        ledges.push(Ledge::new(piece.clone(), x, y, offset + 1));
    }

    ledges
}
