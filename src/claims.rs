//! Checks for claiming another player's discard.

use crate::{Hand, NUMBERED, Tile};

/// The hand holds a pair matching the discard
pub fn can_pong(hand: &Hand, tile: Tile) -> bool {
    hand.count(&tile) >= 2
}

/// A concealed kong needs all four copies in hand; claiming a discard needs three.
pub fn can_kong(hand: &Hand, tile: Tile, self_drawn: bool) -> bool {
    let needed = if self_drawn { 4 } else { 3 };
    hand.count(&tile) >= needed
}

/// Every sequence the discard could complete, ordered by starting rank.
/// Each option lists all three tiles including the discard.
pub fn chow_options(hand: &Hand, tile: Tile) -> Vec<[Tile; 3]> {
    let Some(rank) = tile.rank() else {
        return Vec::new();
    };

    let mut options = Vec::new();
    for start in rank.saturating_sub(2).max(1)..=rank {
        if start as usize + 2 > NUMBERED {
            break;
        }
        let seq = [
            Tile::numbered(start),
            Tile::numbered(start + 1),
            Tile::numbered(start + 2),
        ];
        if seq.iter().filter(|&&t| t != tile).all(|t| hand.count(t) >= 1) {
            options.push(seq);
        }
    }
    options
}

/// At least one sequence can be formed with the discard
pub fn can_chow(hand: &Hand, tile: Tile) -> bool {
    !chow_options(hand, tile).is_empty()
}
