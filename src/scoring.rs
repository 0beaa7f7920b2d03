//! Pattern catalogue and score aggregation for winning hands.
//!
//! Every pattern is an independent predicate over the same hand. Matches
//! are additive: a hand collects the points of every pattern it satisfies,
//! plus situational bonuses for how and when it was completed. The
//! seven-pairs family is the exception: a seven-pairs hand scores exactly
//! one of its three variants.

use crate::search::{MeldMoves, WinShape, standard_shape_with, winning_shape};
use crate::{Counts, Exposed, Hand, KINDS, MeldType, NUMBERED, Tile, TileError, check_copies};
use serde::{Deserialize, Serialize};

/// A named scoring pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// 1112345678999 in the numbered suit plus any one extra rank
    NineGates,
    /// Four exposed quads
    FourQuads,
    /// A triplet of every wind
    BigFourWinds,
    /// Three wind triplets and a wind pair
    SmallFourWinds,
    /// A triplet of every dragon
    BigThreeDragons,
    /// Two dragon triplets and a dragon pair
    SmallThreeDragons,
    /// Numbered tiles only
    SingleSuit,
    /// Honor tiles only
    AllHonors,
    /// Pair plus sequences only
    PlainWin,
    /// Pair plus triplets only
    AllTriplets,
    FourConcealedTriplets,
    ThreeConcealedTriplets,
    SevenPairs,
    /// Seven pairs on seven consecutive ranks
    SevenConsecutivePairs,
    /// Seven pairs, one of each honor
    SevenHonorPairs,
    /// A winning hand that matched nothing else
    UnscoredWin,
}

impl Pattern {
    /// Catalogue checked against standard-shape hands, in reporting order
    pub const STANDARD: [Pattern; 12] = [
        Pattern::NineGates,
        Pattern::FourQuads,
        Pattern::BigFourWinds,
        Pattern::SmallFourWinds,
        Pattern::BigThreeDragons,
        Pattern::SmallThreeDragons,
        Pattern::SingleSuit,
        Pattern::AllHonors,
        Pattern::PlainWin,
        Pattern::AllTriplets,
        Pattern::FourConcealedTriplets,
        Pattern::ThreeConcealedTriplets,
    ];

    /// Point value of the pattern
    pub fn points(self) -> u32 {
        match self {
            Pattern::NineGates => 88,
            Pattern::FourQuads => 88,
            Pattern::BigFourWinds => 88,
            Pattern::SmallFourWinds => 64,
            Pattern::BigThreeDragons => 88,
            Pattern::SmallThreeDragons => 64,
            Pattern::SingleSuit => 80,
            Pattern::AllHonors => 320,
            Pattern::PlainWin => 10,
            Pattern::AllTriplets => 40,
            Pattern::FourConcealedTriplets => 160,
            Pattern::ThreeConcealedTriplets => 40,
            Pattern::SevenPairs => 40,
            Pattern::SevenConsecutivePairs => 88,
            Pattern::SevenHonorPairs => 88,
            Pattern::UnscoredWin => 0,
        }
    }

    /// Name reported in score records
    pub fn name(self) -> &'static str {
        match self {
            Pattern::NineGates => "nine_gates",
            Pattern::FourQuads => "four_quads",
            Pattern::BigFourWinds => "big_four_winds",
            Pattern::SmallFourWinds => "small_four_winds",
            Pattern::BigThreeDragons => "big_three_dragons",
            Pattern::SmallThreeDragons => "small_three_dragons",
            Pattern::SingleSuit => "single_suit",
            Pattern::AllHonors => "all_honors",
            Pattern::PlainWin => "plain_win",
            Pattern::AllTriplets => "all_triplets",
            Pattern::FourConcealedTriplets => "four_concealed_triplets",
            Pattern::ThreeConcealedTriplets => "three_concealed_triplets",
            Pattern::SevenPairs => "seven_pairs",
            Pattern::SevenConsecutivePairs => "seven_consecutive_pairs",
            Pattern::SevenHonorPairs => "seven_honor_pairs",
            Pattern::UnscoredWin => "unscored_win",
        }
    }

    /// Test a standard-catalogue pattern against the hand.
    /// Seven-pairs variants and the unscored baseline never match here.
    fn matches(self, view: &HandView) -> bool {
        match self {
            Pattern::NineGates => is_nine_gates(view),
            Pattern::FourQuads => {
                view.exposed
                    .melds()
                    .iter()
                    .filter(|m| m.meld_type == MeldType::Quad)
                    .count()
                    == 4
            }
            Pattern::BigFourWinds => honor_sets(&view.combined, &Tile::WINDS, 4, 0),
            Pattern::SmallFourWinds => honor_sets(&view.combined, &Tile::WINDS, 3, 1),
            Pattern::BigThreeDragons => honor_sets(&view.combined, &Tile::DRAGONS, 3, 0),
            Pattern::SmallThreeDragons => honor_sets(&view.combined, &Tile::DRAGONS, 2, 1),
            Pattern::SingleSuit => view.combined[NUMBERED..].iter().all(|&c| c == 0),
            Pattern::AllHonors => view.combined[..NUMBERED].iter().all(|&c| c == 0),
            Pattern::PlainWin => {
                view.exposed
                    .melds()
                    .iter()
                    .all(|m| m.meld_type == MeldType::Sequence)
                    && view.standard_with(MeldMoves::SequencesOnly)
            }
            Pattern::AllTriplets => {
                view.exposed.melds().iter().all(|m| m.is_triplet_like())
                    && view.standard_with(MeldMoves::TripletsOnly)
            }
            Pattern::FourConcealedTriplets => concealed_triplets(&view.concealed) == 4,
            Pattern::ThreeConcealedTriplets => concealed_triplets(&view.concealed) == 3,
            Pattern::SevenPairs
            | Pattern::SevenConsecutivePairs
            | Pattern::SevenHonorPairs
            | Pattern::UnscoredWin => false,
        }
    }
}

/// Situational bonus for how or when a hand was completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bonus {
    /// Completed from the player's own draw
    SelfDrawn,
    /// Completed straight out of the deal
    OpeningWin,
    /// Completed on the last drawable tile
    LastTile,
    /// Second last-tile award, only with `repeat_last_tile_bonus`
    LastTileRepeat,
}

/// Tunable bonus values and deck thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub self_drawn_points: u32,
    pub opening_win_points: u32,
    /// Remaining-deck sizes that count as an opening win
    pub opening_deck_counts: Vec<usize>,
    pub last_tile_points: u32,
    /// Award the last-tile bonus twice, as the first release of the game did
    pub repeat_last_tile_bonus: bool,
}

/// Tiles in the wall: nine ranks and seven honors, four copies each
pub const WALL_SIZE: usize = 64;

/// Tiles dealt before the first discard: 13 each plus the dealer's extra
pub const DEALT_TILES: usize = 27;

impl Default for ScoringRules {
    fn default() -> Self {
        let after_deal = WALL_SIZE - DEALT_TILES;
        ScoringRules {
            self_drawn_points: 1,
            opening_win_points: 160,
            opening_deck_counts: vec![after_deal, after_deal - 1],
            last_tile_points: 10,
            repeat_last_tile_bonus: false,
        }
    }
}

impl ScoringRules {
    /// Point value of a bonus under these rules
    pub fn points(&self, bonus: Bonus) -> u32 {
        match bonus {
            Bonus::SelfDrawn => self.self_drawn_points,
            Bonus::OpeningWin => self.opening_win_points,
            Bonus::LastTile | Bonus::LastTileRepeat => self.last_tile_points,
        }
    }

    fn bonuses(&self, self_drawn: bool, remaining_deck: usize) -> Vec<Bonus> {
        let mut bonuses = Vec::new();
        if self_drawn {
            bonuses.push(Bonus::SelfDrawn);
        }
        if self.opening_deck_counts.contains(&remaining_deck) {
            bonuses.push(Bonus::OpeningWin);
        }
        if remaining_deck == 0 {
            bonuses.push(Bonus::LastTile);
            if self.repeat_last_tile_bonus {
                bonuses.push(Bonus::LastTileRepeat);
            }
        }
        bonuses
    }
}

/// Result of scoring one hand
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Matched patterns in catalogue order; empty if the hand is not winning
    pub patterns: Vec<Pattern>,
    pub bonuses: Vec<Bonus>,
    pub total: u32,
}

impl ScoreRecord {
    /// Names of the matched patterns
    pub fn names(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|p| p.name()).collect()
    }

    pub fn is_winning(&self) -> bool {
        !self.patterns.is_empty()
    }
}

/// Count views shared by every predicate during one evaluation
struct HandView<'a> {
    concealed: Counts,
    concealed_len: usize,
    exposed: &'a Exposed,
    /// Concealed and exposed tiles together
    combined: Counts,
}

impl<'a> HandView<'a> {
    fn new(concealed: &Hand, exposed: &'a Exposed) -> Self {
        let concealed_counts = concealed.counts();
        let exposed_counts = exposed.counts();
        let mut combined = [0u8; KINDS];
        for i in 0..KINDS {
            combined[i] = concealed_counts[i] + exposed_counts[i];
        }
        HandView {
            concealed: concealed_counts,
            concealed_len: concealed.len(),
            exposed,
            combined,
        }
    }

    fn standard_with(&self, moves: MeldMoves) -> bool {
        standard_shape_with(
            &self.concealed,
            self.concealed_len,
            self.exposed.meld_count(),
            moves,
        )
    }

    /// Kinds held exactly twice, in canonical order
    fn paired_kinds(&self) -> Vec<usize> {
        (0..KINDS).filter(|&i| self.concealed[i] == 2).collect()
    }
}

const NINE_GATES_BASE: [u8; NUMBERED] = [3, 1, 1, 1, 1, 1, 1, 1, 3];

/// Concealed, numbered only, covering 1112345678999 with one tile to spare
fn is_nine_gates(view: &HandView) -> bool {
    view.exposed.is_empty()
        && view.concealed_len == NINE_GATES_BASE.iter().map(|&c| c as usize).sum::<usize>() + 1
        && view.concealed[NUMBERED..].iter().all(|&c| c == 0)
        && view.concealed[..NUMBERED]
            .iter()
            .zip(NINE_GATES_BASE)
            .all(|(&have, base)| have >= base)
}

/// Exactly `triplets` of the kinds at three and `pairs` at two, the rest at neither
fn honor_sets(counts: &Counts, kinds: &[Tile], triplets: usize, pairs: usize) -> bool {
    let at = |n: u8| kinds.iter().filter(|t| counts[t.index()] == n).count();
    at(3) == triplets && at(2) == pairs && triplets + pairs == kinds.len()
}

fn concealed_triplets(counts: &Counts) -> usize {
    counts.iter().filter(|&&c| c == 3).count()
}

/// Pick the single seven-pairs variant for the hand
fn seven_pairs_variant(view: &HandView) -> Pattern {
    let paired = view.paired_kinds();
    let (first, last) = (paired[0], paired[paired.len() - 1]);
    if last < NUMBERED && last - first == paired.len() - 1 {
        Pattern::SevenConsecutivePairs
    } else if first == NUMBERED && paired.len() == KINDS - NUMBERED {
        Pattern::SevenHonorPairs
    } else {
        Pattern::SevenPairs
    }
}

/// Score a hand with the default rules.
///
/// Returns an empty record with a zero total when the concealed tiles do
/// not complete a hand with the given exposed melds.
pub fn score(
    exposed: &Exposed,
    concealed: &Hand,
    self_drawn: bool,
    remaining_deck: usize,
) -> ScoreRecord {
    score_with_rules(exposed, concealed, self_drawn, remaining_deck, &ScoringRules::default())
}

/// Score a hand with explicit bonus rules.
pub fn score_with_rules(
    exposed: &Exposed,
    concealed: &Hand,
    self_drawn: bool,
    remaining_deck: usize,
    rules: &ScoringRules,
) -> ScoreRecord {
    let Some(shape) = winning_shape(concealed, exposed.meld_count()) else {
        return ScoreRecord::default();
    };

    let view = HandView::new(concealed, exposed);
    let patterns = match shape {
        WinShape::SevenPairs => vec![seven_pairs_variant(&view)],
        WinShape::Standard => {
            let matched: Vec<Pattern> = Pattern::STANDARD
                .iter()
                .copied()
                .filter(|p| p.matches(&view))
                .collect();
            if matched.is_empty() {
                vec![Pattern::UnscoredWin]
            } else {
                matched
            }
        }
    };

    let bonuses = rules.bonuses(self_drawn, remaining_deck);
    let total = patterns.iter().map(|p| p.points()).sum::<u32>()
        + bonuses.iter().map(|&b| rules.points(b)).sum::<u32>();

    ScoreRecord {
        patterns,
        bonuses,
        total,
    }
}

/// Score hands passed in the string protocol.
///
/// `exposed` holds groups separated by ';' with tiles separated by ',';
/// `concealed` is a ','-separated tile list. Unknown tokens, groups that
/// are not melds and more than four copies of a kind across both lists are
/// errors; nothing is scored in that case.
pub fn score_encoded(
    exposed: &str,
    concealed: &str,
    self_drawn: bool,
    remaining_deck: usize,
) -> Result<ScoreRecord, TileError> {
    let exposed = Exposed::from_string(exposed)?;
    let concealed = Hand::from_string(concealed)?;

    let mut combined = exposed.counts();
    for (tile, &count) in concealed.iter() {
        combined[tile.index()] = combined[tile.index()].saturating_add(count);
    }
    check_copies(&combined)?;

    Ok(score(&exposed, &concealed, self_drawn, remaining_deck))
}
