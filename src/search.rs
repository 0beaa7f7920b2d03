use crate::{COPIES_PER_KIND, Counts, Exposed, Hand, KINDS, NUMBERED, Tile};
use serde::{Deserialize, Serialize};

/// Melds a complete standard hand holds (exposed plus concealed)
pub const MELDS_PER_HAND: usize = 4;

/// Size of a seven-pairs hand
pub const SEVEN_PAIRS_SIZE: usize = 14;

/// Which meld shapes the decomposition search may remove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeldMoves {
    /// Triplets and sequences
    Any,
    /// Sequences only (plain win)
    SequencesOnly,
    /// Triplets only (all triplets)
    TripletsOnly,
}

impl MeldMoves {
    fn triplets(self) -> bool {
        matches!(self, MeldMoves::Any | MeldMoves::TripletsOnly)
    }

    fn sequences(self) -> bool {
        matches!(self, MeldMoves::Any | MeldMoves::SequencesOnly)
    }
}

/// The shape a winning hand was recognised as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinShape {
    /// Melds plus one pair
    Standard,
    /// Seven distinct pairs, no exposed melds
    SevenPairs,
}

/// Check whether `remaining` tiles of `counts` split into triplets and sequences.
///
/// The caller must already have taken the pair out; `remaining` is the number
/// of tiles left to consume and is expected to be a multiple of 3. The
/// snapshot is copied, so `counts` is never modified.
pub fn can_decompose(counts: &Counts, remaining: usize) -> bool {
    decompose_with(counts, remaining, MeldMoves::Any)
}

/// Same as [`can_decompose`] but restricted to the given meld shapes.
pub fn decompose_with(counts: &Counts, remaining: usize, moves: MeldMoves) -> bool {
    let mut scratch = *counts;
    find_melds(&mut scratch, remaining, moves)
}

/// Depth-first search with undo over a scratch array owned by one top-level call.
fn find_melds(counts: &mut Counts, remaining: usize, moves: MeldMoves) -> bool {
    if remaining == 0 {
        return true;
    }
    if remaining < 3 {
        return false;
    }

    for i in 0..KINDS {
        // Option 1: triplet of kind i
        if moves.triplets() && counts[i] >= 3 {
            counts[i] -= 3;
            if find_melds(counts, remaining - 3, moves) {
                return true;
            }
            counts[i] += 3;
        }

        // Option 2: sequence starting at kind i, numbered ranks only
        if moves.sequences()
            && i + 2 < NUMBERED
            && counts[i] >= 1
            && counts[i + 1] >= 1
            && counts[i + 2] >= 1
        {
            counts[i] -= 1;
            counts[i + 1] -= 1;
            counts[i + 2] -= 1;
            if find_melds(counts, remaining - 3, moves) {
                return true;
            }
            counts[i] += 1;
            counts[i + 1] += 1;
            counts[i + 2] += 1;
        }
    }

    false
}

/// Melds still to be found among the concealed tiles, or None if the
/// concealed size cannot complete a standard hand with `meld_count` exposed.
fn needed_melds(concealed_len: usize, meld_count: usize) -> Option<usize> {
    let needed = MELDS_PER_HAND.checked_sub(meld_count)?;
    (concealed_len == 2 + 3 * needed).then_some(needed)
}

/// Standard-shape test on a count snapshot with the given meld moves.
/// Pair candidates are tried in canonical order; the first that lets the
/// rest decompose wins.
pub(crate) fn standard_shape_with(
    counts: &Counts,
    concealed_len: usize,
    meld_count: usize,
    moves: MeldMoves,
) -> bool {
    let Some(needed) = needed_melds(concealed_len, meld_count) else {
        return false;
    };

    (0..KINDS).filter(|&i| counts[i] >= 2).any(|pair| {
        let mut rest = *counts;
        rest[pair] -= 2;
        decompose_with(&rest, 3 * needed, moves)
    })
}

/// Melds-plus-pair test for the concealed tiles given `meld_count` exposed melds.
pub fn is_standard_shape(concealed: &Hand, meld_count: usize) -> bool {
    standard_shape_with(&concealed.counts(), concealed.len(), meld_count, MeldMoves::Any)
}

/// Exactly seven kinds held twice, fourteen tiles, nothing exposed.
pub fn is_seven_pairs(concealed: &Hand, meld_count: usize) -> bool {
    meld_count == 0
        && concealed.len() == SEVEN_PAIRS_SIZE
        && concealed.counts().iter().filter(|&&c| c == 2).count() == 7
}

/// Recognise the winning shape, if any.
///
/// Seven pairs is reported first: a hand of seven distinct pairs is scored
/// through the seven-pairs family even when it also splits into melds.
pub fn winning_shape(concealed: &Hand, meld_count: usize) -> Option<WinShape> {
    if is_seven_pairs(concealed, meld_count) {
        Some(WinShape::SevenPairs)
    } else if is_standard_shape(concealed, meld_count) {
        Some(WinShape::Standard)
    } else {
        None
    }
}

/// Whether the concealed tiles complete a hand. A size matching neither
/// shape is simply not winning.
pub fn is_winning_hand(concealed: &Hand, meld_count: usize) -> bool {
    winning_shape(concealed, meld_count).is_some()
}

/// Whether adding `tile` to the concealed tiles completes the hand.
pub fn can_complete_with(concealed: &Hand, meld_count: usize, tile: Tile) -> bool {
    let mut with_tile = concealed.clone();
    with_tile.add(tile);
    is_winning_hand(&with_tile, meld_count)
}

/// Every tile kind that would complete the hand beside `exposed`, in
/// canonical order. Kinds whose four copies are all in the player's
/// concealed tiles or exposed melds are skipped.
pub fn winning_tiles(concealed: &Hand, exposed: &Exposed) -> Vec<Tile> {
    let on_table = exposed.counts();
    let meld_count = exposed.meld_count();
    Tile::all()
        .filter(|tile| {
            concealed.count(tile).saturating_add(on_table[tile.index()]) < COPIES_PER_KIND
        })
        .filter(|&tile| can_complete_with(concealed, meld_count, tile))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count_tiles;

    fn hand(tokens: &str) -> Hand {
        Hand::from_string(tokens).unwrap()
    }

    fn counts_of(ranks: &[u8]) -> Counts {
        let tiles: Vec<Tile> = ranks.iter().map(|&r| Tile::numbered(r)).collect();
        count_tiles(&tiles)
    }

    #[test]
    fn test_can_decompose_triplets_and_sequences() {
        assert!(can_decompose(&counts_of(&[1, 1, 1, 2, 3, 4]), 6));
        assert!(can_decompose(&counts_of(&[1, 2, 3, 1, 2, 3, 1, 2, 3]), 9));
        assert!(!can_decompose(&counts_of(&[1, 2, 4]), 3));
        assert!(!can_decompose(&counts_of(&[1, 1, 2, 2, 4, 4]), 6));
    }

    #[test]
    fn test_can_decompose_zero_remaining() {
        assert!(can_decompose(&[0u8; KINDS], 0));
    }

    #[test]
    fn test_can_decompose_leaves_input_untouched() {
        let counts = counts_of(&[4, 5, 6, 7, 7, 7]);
        let before = counts;
        assert!(can_decompose(&counts, 6));
        assert_eq!(counts, before);
    }

    #[test]
    fn test_sequences_stop_at_rank_nine() {
        // eight, nine, east is not a sequence
        let tiles = [Tile::numbered(8), Tile::numbered(9), Tile::EAST];
        assert!(!can_decompose(&count_tiles(&tiles), 3));
        // nor do honors run into each other
        let winds = [Tile::EAST, Tile::SOUTH, Tile::WEST];
        assert!(!can_decompose(&count_tiles(&winds), 3));
    }

    #[test]
    fn test_decompose_with_restricted_moves() {
        let runs = counts_of(&[1, 2, 3, 4, 5, 6]);
        assert!(decompose_with(&runs, 6, MeldMoves::SequencesOnly));
        assert!(!decompose_with(&runs, 6, MeldMoves::TripletsOnly));

        let sets = counts_of(&[2, 2, 2, 3, 3, 3, 4, 4, 4]);
        assert!(decompose_with(&sets, 9, MeldMoves::TripletsOnly));
        // 234 three times is also a valid split
        assert!(decompose_with(&sets, 9, MeldMoves::SequencesOnly));
    }

    #[test]
    fn test_decomposition_ignores_input_order() {
        let orders: [&[u8]; 3] = [
            &[1, 2, 3, 3, 4, 5, 7, 7, 7],
            &[7, 5, 3, 1, 7, 4, 3, 2, 7],
            &[3, 7, 2, 7, 5, 1, 4, 7, 3],
        ];
        for ranks in orders {
            assert!(can_decompose(&counts_of(ranks), 9));
        }
    }

    #[test]
    fn test_four_triplets_and_pair() {
        let h = hand("two,two,two,three,three,three,four,four,four,five,five,five,six,six");
        assert!(is_standard_shape(&h, 0));
        assert!(is_winning_hand(&h, 0));
        assert_eq!(winning_shape(&h, 0), Some(WinShape::Standard));
    }

    #[test]
    fn test_honor_triplets_and_pair() {
        let h = hand("e,e,e,s,s,s,m,m,m,b,b,b,f,f");
        assert!(is_winning_hand(&h, 0));
    }

    #[test]
    fn test_sequences_and_pair() {
        let h = hand("one,two,three,four,five,six,seven,eight,nine,two,three,four,five,five");
        assert!(is_winning_hand(&h, 0));
    }

    #[test]
    fn test_removing_a_tile_breaks_the_hand() {
        let tokens = [
            "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "e", "e",
            "e", "m", "m",
        ];
        let full = hand(&tokens.join(","));
        assert!(is_winning_hand(&full, 0));

        for tile in full.tiles() {
            let mut short = full.clone();
            short.remove(&tile);
            assert!(!is_winning_hand(&short, 0), "still winning without {}", tile);
        }
    }

    /// Every choice of four distinct triplet kinds plus a pair of a fifth kind.
    fn triplet_hands() -> Vec<Hand> {
        let mut hands = Vec::new();
        for a in 0..KINDS {
            for b in a + 1..KINDS {
                for c in b + 1..KINDS {
                    for d in c + 1..KINDS {
                        for pair in (0..KINDS).filter(|p| ![a, b, c, d].contains(p)) {
                            let mut counts = [0u8; KINDS];
                            for kind in [a, b, c, d] {
                                counts[kind] = 3;
                            }
                            counts[pair] = 2;
                            hands.push(hand_from_counts(&counts));
                        }
                    }
                }
            }
        }
        hands
    }

    fn hand_from_counts(counts: &Counts) -> Hand {
        let mut hand = Hand::new();
        for tile in Tile::all() {
            for _ in 0..counts[tile.index()] {
                hand.add(tile);
            }
        }
        hand
    }

    #[test]
    fn test_every_triplet_hand_wins() {
        let hands = triplet_hands();
        assert_eq!(hands.len(), 1820 * 12);
        for h in &hands {
            assert!(is_winning_hand(h, 0), "not winning: {:?}", h.tiles());
            assert_eq!(winning_shape(h, 0), Some(WinShape::Standard));
        }
    }

    #[test]
    fn test_every_triplet_hand_loses_a_tile() {
        for full in triplet_hands() {
            for (&tile, _) in full.iter() {
                let mut short = full.clone();
                short.remove(&tile);
                assert!(!is_winning_hand(&short, 0), "still winning: {:?}", short.tiles());
                assert!(can_complete_with(&short, 0, tile));
            }
        }
    }

    #[test]
    fn test_every_sequence_hand_wins() {
        // four runs (repeats allowed) plus any pair, within four copies per kind
        for a in 0..7 {
            for b in a..7 {
                for c in b..7 {
                    for d in c..7 {
                        for pair in 0..KINDS {
                            let mut counts = [0u8; KINDS];
                            for start in [a, b, c, d] {
                                for kind in start..start + 3 {
                                    counts[kind] += 1;
                                }
                            }
                            counts[pair] += 2;
                            if counts.iter().any(|&n| n > 4) {
                                continue;
                            }
                            let h = hand_from_counts(&counts);
                            assert!(is_standard_shape(&h, 0), "not winning: {:?}", h.tiles());

                            let mut short = h.clone();
                            short.remove(&Tile::numbered(a as u8 + 1));
                            assert!(!is_winning_hand(&short, 0));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_exposed_melds_reduce_needed_sets() {
        // two melds exposed: 8 concealed tiles remain
        let h = hand("one,two,three,e,e,e,n,n");
        assert!(is_winning_hand(&h, 2));
        assert!(!is_winning_hand(&h, 1));
        assert!(!is_winning_hand(&h, 0));

        // four melds exposed: only the pair is left
        assert!(is_winning_hand(&hand("w,w"), 4));
        assert!(!is_winning_hand(&hand("w,n"), 4));
    }

    #[test]
    fn test_wrong_size_is_not_winning() {
        assert!(!is_winning_hand(&hand("one,two,three,e,e,e,n"), 0));
        assert!(!is_winning_hand(&Hand::new(), 0));
        assert!(!is_winning_hand(&hand("w,w"), 5));
    }

    #[test]
    fn test_seven_pairs() {
        let h = hand("one,one,three,three,five,five,seven,seven,nine,nine,e,e,m,m");
        assert!(!is_standard_shape(&h, 0));
        assert!(is_seven_pairs(&h, 0));
        assert_eq!(winning_shape(&h, 0), Some(WinShape::SevenPairs));

        // four of a kind is not two pairs
        let quad = hand("one,one,one,one,three,three,five,five,seven,seven,nine,nine,e,e");
        assert!(!is_seven_pairs(&quad, 0));

        // seven pairs needs a fully concealed hand
        assert!(!is_seven_pairs(&h, 1));
    }

    #[test]
    fn test_seven_pairs_wins_even_when_decomposable() {
        let h = hand("one,one,two,two,three,three,four,four,five,five,six,six,seven,seven");
        assert!(is_standard_shape(&h, 0));
        assert_eq!(winning_shape(&h, 0), Some(WinShape::SevenPairs));
    }

    #[test]
    fn test_can_complete_with() {
        let h = hand("one,two,three,four,five,six,seven,eight,nine,e,e,e,m");
        assert!(can_complete_with(&h, 0, Tile::RED));
        assert!(!can_complete_with(&h, 0, Tile::WHITE));
        // the caller's hand is not modified
        assert_eq!(h.len(), 13);
    }

    #[test]
    fn test_winning_tiles_multi_wait() {
        // 2345 + three triplets: waits on 2 and 5
        let h = hand("two,three,four,five,e,e,e,s,s,s,m,m,m");
        assert_eq!(
            winning_tiles(&h, &Exposed::new()),
            vec![Tile::numbered(2), Tile::numbered(5)]
        );
    }

    #[test]
    fn test_winning_tiles_skips_exhausted_kinds() {
        // waiting on the pair tile east, but all four are already used
        let h = hand("e,e,e,e,one,two,three,four,five,six,seven,eight,nine");
        assert!(!winning_tiles(&h, &Exposed::new()).contains(&Tile::EAST));
    }

    #[test]
    fn test_winning_tiles_counts_exposed_copies() {
        // 123 456 concealed beside exposed east and red triplets.
        // A lone east would need a fifth copy; a lone south is a real wait.
        let exposed = Exposed::from_string("e,e,e;m,m,m").unwrap();
        let east = hand("one,two,three,four,five,six,e");
        assert!(can_complete_with(&east, 2, Tile::EAST));
        assert!(winning_tiles(&east, &exposed).is_empty());

        let south = hand("one,two,three,four,five,six,s");
        assert_eq!(winning_tiles(&south, &exposed), vec![Tile::SOUTH]);
    }
}
