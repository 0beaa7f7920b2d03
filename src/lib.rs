use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub mod claims;
pub mod scoring;
pub mod search;
#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

pub use scoring::{Bonus, Pattern, ScoreRecord, ScoringRules, score, score_encoded, score_with_rules};
pub use search::{
    WinShape, can_complete_with, can_decompose, is_seven_pairs, is_standard_shape,
    is_winning_hand, winning_shape, winning_tiles,
};

/// Number of distinct tile kinds.
pub const KINDS: usize = 16;

/// Numbered tiles occupy indices `0..NUMBERED`; honors follow.
pub const NUMBERED: usize = 9;

/// Copies of each kind in the wall.
pub const COPIES_PER_KIND: u8 = 4;

/// Per-kind tile counts, indexed by [`Tile::index`].
pub type Counts = [u8; KINDS];

const TOKENS: [&str; KINDS] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "e", "s", "w", "n",
    "m", "b", "f",
];

// Glyph aliases accepted on input, same order as TOKENS.
const GLYPHS: [&str; KINDS] = [
    "1萬", "2萬", "3萬", "4萬", "5萬", "6萬", "7萬", "8萬", "9萬", "東", "南", "西", "北", "中",
    "白", "發",
];

/// Errors raised while turning caller input into tiles and melds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileError {
    /// A token that is not one of the 16 tile kinds
    UnknownToken(String),
    /// A canonical index outside `0..KINDS`
    IndexOutOfRange(usize),
    /// A group that is neither a sequence, a triplet nor a quad
    MalformedMeld(String),
    /// More copies of one kind than the wall holds
    TooManyCopies(Tile),
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileError::UnknownToken(token) => write!(f, "Unknown tile token: '{}'", token),
            TileError::IndexOutOfRange(index) => {
                write!(f, "Tile index must be 0-{}, got {}", KINDS - 1, index)
            }
            TileError::MalformedMeld(group) => write!(f, "Not a valid meld: '{}'", group),
            TileError::TooManyCopies(tile) => write!(
                f,
                "More than {} copies of tile: '{}'",
                COPIES_PER_KIND, tile
            ),
        }
    }
}

impl std::error::Error for TileError {}

/// A tile kind represented by its canonical index.
/// - 0-8: Ranks 1-9 of the numbered suit
/// - 9-12: Winds (east, south, west, north)
/// - 13-15: Dragons (red, white, green)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile(u8);

impl Tile {
    pub const EAST: Tile = Tile(9);
    pub const SOUTH: Tile = Tile(10);
    pub const WEST: Tile = Tile(11);
    pub const NORTH: Tile = Tile(12);
    pub const RED: Tile = Tile(13);
    pub const WHITE: Tile = Tile(14);
    pub const GREEN: Tile = Tile(15);

    pub const WINDS: [Tile; 4] = [Tile::EAST, Tile::SOUTH, Tile::WEST, Tile::NORTH];
    pub const DRAGONS: [Tile; 3] = [Tile::RED, Tile::WHITE, Tile::GREEN];

    /// Create a numbered tile from its rank (1-9)
    pub fn numbered(rank: u8) -> Self {
        assert!((1..=9).contains(&rank), "Rank must be 1-9");
        Tile(rank - 1)
    }

    /// Look a tile up by canonical index
    pub fn from_index(index: usize) -> Result<Self, TileError> {
        if index < KINDS {
            Ok(Tile(index as u8))
        } else {
            Err(TileError::IndexOutOfRange(index))
        }
    }

    /// Canonical index (0-15)
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Every tile kind in canonical order
    pub fn all() -> impl Iterator<Item = Tile> {
        (0..KINDS as u8).map(Tile)
    }

    /// Get the rank (1-9), or None for honors
    pub fn rank(&self) -> Option<u8> {
        if self.is_numbered() {
            Some(self.0 + 1)
        } else {
            None
        }
    }

    pub fn is_numbered(&self) -> bool {
        self.index() < NUMBERED
    }

    pub fn is_honor(&self) -> bool {
        !self.is_numbered()
    }

    pub fn is_wind(&self) -> bool {
        Tile::WINDS.contains(self)
    }

    pub fn is_dragon(&self) -> bool {
        Tile::DRAGONS.contains(self)
    }

    /// Parse a tile from its token.
    /// Canonical tokens are "one".."nine", "e" "s" "w" "n" and "m" "b" "f";
    /// the glyphs "1萬".."9萬" and "東南西北中白發" are accepted as aliases.
    pub fn from_string(s: &str) -> Result<Self, TileError> {
        let token = s.trim();
        TOKENS
            .iter()
            .position(|&t| t == token)
            .or_else(|| GLYPHS.iter().position(|&g| g == token))
            .map(|index| Tile(index as u8))
            .ok_or_else(|| TileError::UnknownToken(token.to_string()))
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(TOKENS[self.index()])
    }
}

impl FromStr for Tile {
    type Err = TileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tile::from_string(s)
    }
}

/// Build a count array from any tile sequence.
pub fn count_tiles<'a>(tiles: impl IntoIterator<Item = &'a Tile>) -> Counts {
    let mut counts = [0u8; KINDS];
    for tile in tiles {
        counts[tile.index()] = counts[tile.index()].saturating_add(1);
    }
    counts
}

/// Reject a count array holding more copies of a kind than the wall has.
pub fn check_copies(counts: &Counts) -> Result<(), TileError> {
    match counts.iter().position(|&c| c > COPIES_PER_KIND) {
        Some(index) => Err(TileError::TooManyCopies(Tile(index as u8))),
        None => Ok(()),
    }
}

/// Split a comma-separated token list into tiles, sorted canonically.
fn parse_tile_list(input: &str) -> Result<Vec<Tile>, TileError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut tiles = input
        .split(',')
        .map(Tile::from_string)
        .collect::<Result<Vec<_>, _>>()?;
    check_copies(&count_tiles(&tiles))?;
    tiles.sort();
    Ok(tiles)
}

/// Shape of an exposed meld
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeldType {
    /// Three consecutive numbered ranks
    Sequence,
    /// Three identical tiles
    Triplet,
    /// Four identical tiles
    Quad,
}

/// A meld committed to the table. Tiles are kept in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meld {
    pub meld_type: MeldType,
    pub tiles: Vec<Tile>,
}

impl Meld {
    /// Create a meld, classifying its shape from the tiles
    pub fn new(mut tiles: Vec<Tile>) -> Result<Self, TileError> {
        tiles.sort();
        let identical = tiles.windows(2).all(|w| w[0] == w[1]);
        let meld_type = match tiles.len() {
            3 if identical => MeldType::Triplet,
            4 if identical => MeldType::Quad,
            3 if tiles[2].is_numbered()
                && tiles[1].index() == tiles[0].index() + 1
                && tiles[2].index() == tiles[1].index() + 1 =>
            {
                MeldType::Sequence
            }
            _ => {
                let group: Vec<String> = tiles.iter().map(|t| t.to_string()).collect();
                return Err(TileError::MalformedMeld(group.join(",")));
            }
        };
        Ok(Meld { meld_type, tiles })
    }

    /// Parse a meld from comma-separated tokens: "e,e,e" or "three,four,five"
    pub fn from_string(input: &str) -> Result<Self, TileError> {
        Meld::new(parse_tile_list(input)?)
    }

    /// Lowest tile of the meld
    pub fn first(&self) -> Tile {
        self.tiles[0]
    }

    pub fn is_triplet_like(&self) -> bool {
        matches!(self.meld_type, MeldType::Triplet | MeldType::Quad)
    }
}

/// Concealed tiles held by a player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand(BTreeMap<Tile, u8>);

impl Hand {
    /// Create a new empty hand
    pub fn new() -> Self {
        Hand(BTreeMap::new())
    }

    /// Build a hand from a list of tiles
    pub fn from_tiles<'a>(tiles: impl IntoIterator<Item = &'a Tile>) -> Self {
        let mut hand = Hand::new();
        for tile in tiles {
            hand.add(*tile);
        }
        hand
    }

    /// Parse comma-separated tokens: "one,one,e,e,..."
    pub fn from_string(input: &str) -> Result<Self, TileError> {
        Ok(Hand::from_tiles(&parse_tile_list(input)?))
    }

    /// Add a tile to the hand
    pub fn add(&mut self, tile: Tile) {
        let count = self.0.entry(tile).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Remove a tile from the hand
    pub fn remove(&mut self, tile: &Tile) -> bool {
        if let Some(count) = self.0.get_mut(tile) {
            if *count > 0 {
                *count -= 1;
                if *count == 0 {
                    self.0.remove(tile);
                }
                return true;
            }
        }
        false
    }

    /// Get the count of a specific tile
    pub fn count(&self, tile: &Tile) -> u8 {
        self.0.get(tile).copied().unwrap_or(0)
    }

    /// Total number of tiles
    pub fn len(&self) -> usize {
        self.0.values().map(|&c| c as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get an iterator over all tile kinds and their counts
    pub fn iter(&self) -> impl Iterator<Item = (&Tile, &u8)> {
        self.0.iter()
    }

    /// Per-kind count snapshot
    pub fn counts(&self) -> Counts {
        let mut counts = [0u8; KINDS];
        for (tile, &count) in &self.0 {
            counts[tile.index()] = count;
        }
        counts
    }

    /// All tiles in canonical order
    pub fn tiles(&self) -> Vec<Tile> {
        self.0
            .iter()
            .flat_map(|(&tile, &count)| std::iter::repeat_n(tile, count as usize))
            .collect()
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self::new()
    }
}

/// Melds a player has exposed, in the order they were formed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exposed(Vec<Meld>);

impl Exposed {
    /// Create an empty set of exposed melds
    pub fn new() -> Self {
        Exposed(Vec::new())
    }

    /// Parse groups separated by ';', tiles within a group by ','.
    /// Example: "e,e,e;three,four,five"
    pub fn from_string(input: &str) -> Result<Self, TileError> {
        let mut exposed = Exposed::new();
        if input.trim().is_empty() {
            return Ok(exposed);
        }
        for group in input.split(';') {
            exposed.add_meld(Meld::from_string(group)?);
        }
        Ok(exposed)
    }

    /// Add a meld
    pub fn add_meld(&mut self, meld: Meld) {
        self.0.push(meld);
    }

    /// Get all exposed melds
    pub fn melds(&self) -> &[Meld] {
        &self.0
    }

    /// Number of exposed melds
    pub fn meld_count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Per-kind counts over every exposed tile (quads count four)
    pub fn counts(&self) -> Counts {
        count_tiles(self.0.iter().flat_map(|m| m.tiles.iter()))
    }
}

impl Default for Exposed {
    fn default() -> Self {
        Self::new()
    }
}
