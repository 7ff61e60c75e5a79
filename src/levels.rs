//! Level data: built-in levels and parsing
//!
//! Levels are authored as ASCII art, one character per cell:
//!
//! | Symbol | Tile |
//! |--------|------|
//! | `.` | empty |
//! | `_` `X` `Y` `#` | static terrain (four looks) |
//! | `W` | win |
//! | `L` | lose |
//! | `G` | grow item |
//! | `S` | shrink item |
//! | `P` | player head |
//! | `B` | player body |
//!
//! The chain is read in scan order and each player cell is prepended, so the
//! last player cell in row-major order becomes the head.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Tile;

/// Errors raised while parsing level data
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
    #[error("unknown tile code {code} at row {row}, column {col}")]
    UnknownCode { code: u8, row: usize, col: usize },
    #[error("level has no player cells")]
    NoPlayer,
    #[error("invalid level pack: {0}")]
    Json(#[from] serde_json::Error),
}

/// A rectangular level layout including initial player cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    rows: Vec<Vec<Tile>>,
}

impl LevelData {
    /// Validate and wrap a tile grid
    pub fn new(rows: Vec<Vec<Tile>>) -> Result<Self, LevelError> {
        let width = rows.first().map(Vec::len).ok_or(LevelError::Empty)?;
        if width == 0 {
            return Err(LevelError::Empty);
        }
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(LevelError::Ragged {
                row,
                expected: width,
                found,
            });
        }
        if !rows.iter().flatten().any(|t| t.is_player()) {
            return Err(LevelError::NoPlayer);
        }
        Ok(Self { rows })
    }

    /// Parse ASCII art. Blank lines and surrounding whitespace are ignored.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .map(|(col, symbol)| {
                        Tile::from_symbol(symbol)
                            .ok_or(LevelError::UnknownSymbol { symbol, row, col })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rows)
    }

    /// Build from the numeric tile codes (0 = empty ... 10 = player body)
    pub fn from_codes(codes: &[&[u8]]) -> Result<Self, LevelError> {
        let rows = codes
            .iter()
            .enumerate()
            .map(|(row, line)| {
                line.iter()
                    .enumerate()
                    .map(|(col, &code)| {
                        Tile::from_code(code).ok_or(LevelError::UnknownCode { code, row, col })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rows)
    }

    pub fn tiles(&self) -> &[Vec<Tile>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Initial chain, head first
    pub fn player_segments(&self) -> Vec<IVec2> {
        let mut segments = Vec::new();
        for (y, row) in self.rows.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                if tile.is_player() {
                    segments.insert(0, IVec2::new(x as i32, y as i32));
                }
            }
        }
        segments
    }

    /// Render back to ASCII art
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.height() * (self.width() + 1));
        for row in &self.rows {
            out.extend(row.iter().map(|t| t.symbol()));
            out.push('\n');
        }
        out
    }
}

/// A JSON level pack: `{"levels": [["..P..", "_____"], ...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LevelPack {
    levels: Vec<Vec<String>>,
}

/// Parse a JSON level pack
pub fn parse_pack(json: &str) -> Result<Vec<LevelData>, LevelError> {
    let pack: LevelPack = serde_json::from_str(json)?;
    pack.levels
        .iter()
        .map(|rows| LevelData::parse(&rows.join("\n")))
        .collect()
}

/// The shipped campaign, easiest first
pub const BUILTIN_LEVELS: &[&str] = &[
    "
    ..........
    ..........
    .....G....
    BBP..Y..W.
    XYYX_#XYXX
    ##########
    ##########
    ",
    "
    ..........
    ....G.L...
    ....X.....
    BP.X......
    _YY#_L_.W.
    #######Y_X
    ##########
    ",
    "
    .....
    .....
    .B.GL
    .B.X.
    WPG..
    XYLXL
    ",
    "
    .........
    ..XG..G..
    ..#...X..
    BBP.....W
    .XYY..X..
    ...#L....
    ...##XX..
    ",
    "
    ........S.
    ........X.
    ........WY
    .......X.#
    BBP..GL..#
    XYYX_XXY##
    ",
    "
    ..........
    ....W.L...
    ....X.....
    BP..G.Y...
    _YYX_L..LX
    ######XY##
    ##########
    ",
    "
    ...........
    ...........
    .......G...
    ......._L..
    BPW.GG...L.
    XYYX_XX.G_.
    ###########
    ###########
    ",
    "
    .......
    .......
    ....G..
    ...LX..
    .G.GL..
    .X.....
    BBP.L..
    XYY..XY
    ....W..
    ",
    "
    .........
    .........
    ........G
    .....S..X
    BBPS.WSX.
    XYYX_XXY#
    ",
];

/// Parse the built-in levels, skipping (and logging) any that fail
pub fn builtin_levels() -> Vec<LevelData> {
    BUILTIN_LEVELS
        .iter()
        .enumerate()
        .filter_map(|(i, text)| match LevelData::parse(text) {
            Ok(level) => Some(level),
            Err(e) => {
                log::error!("Built-in level {} is invalid: {}", i, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_builtin_levels_parse() {
        for (i, text) in BUILTIN_LEVELS.iter().enumerate() {
            let level = LevelData::parse(text).unwrap_or_else(|e| panic!("level {}: {}", i, e));
            let segments = level.player_segments();
            assert!(!segments.is_empty());
            let head = segments[0];
            assert_eq!(
                level.tiles()[head.y as usize][head.x as usize],
                Tile::PlayerHead,
                "level {} head is not the last player cell",
                i
            );
            let wins = level.tiles().iter().flatten().filter(|&&t| t == Tile::Win).count();
            assert_eq!(wins, 1, "level {} should have exactly one win tile", i);
        }
        assert_eq!(builtin_levels().len(), BUILTIN_LEVELS.len());
    }

    #[test]
    fn test_player_segments_head_first() {
        let level = LevelData::parse("BBP\n___").unwrap();
        assert_eq!(
            level.player_segments(),
            vec![IVec2::new(2, 0), IVec2::new(1, 0), IVec2::new(0, 0)]
        );

        // Vertical chain, head at the bottom
        let level = LevelData::parse(".B.\n.B.\n.P.\n___").unwrap();
        assert_eq!(
            level.player_segments(),
            vec![IVec2::new(1, 2), IVec2::new(1, 1), IVec2::new(1, 0)]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(LevelData::parse(""), Err(LevelError::Empty)));
        assert!(matches!(
            LevelData::parse("P..\n__"),
            Err(LevelError::Ragged { row: 1, expected: 3, found: 2 })
        ));
        assert!(matches!(
            LevelData::parse("P.?"),
            Err(LevelError::UnknownSymbol { symbol: '?', row: 0, col: 2 })
        ));
        assert!(matches!(LevelData::parse("...\n___"), Err(LevelError::NoPlayer)));
    }

    #[test]
    fn test_from_codes_matches_ascii() {
        let from_codes = LevelData::from_codes(&[&[10, 9, 0, 7, 5], &[1, 2, 3, 4, 6]]).unwrap();
        let from_ascii = LevelData::parse("BP.GW\n_XY#L").unwrap();
        assert_eq!(from_codes, from_ascii);
        assert!(matches!(
            LevelData::from_codes(&[&[9, 42]]),
            Err(LevelError::UnknownCode { code: 42, row: 0, col: 1 })
        ));
    }

    #[test]
    fn test_to_ascii_round_trip() {
        let text = "BP.GW\n_XY#L\n";
        assert_eq!(LevelData::parse(text).unwrap().to_ascii(), text);
    }

    #[test]
    fn test_parse_pack() {
        let json = r#"{"levels": [["P.W", "___"], [".BP", "_S_"]]}"#;
        let levels = parse_pack(json).unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[1].player_segments()[0], IVec2::new(2, 0));

        assert!(matches!(parse_pack("not json"), Err(LevelError::Json(_))));
        assert!(matches!(
            parse_pack(r#"{"levels": [["P.", "_"]]}"#),
            Err(LevelError::Ragged { .. })
        ));
    }
}
