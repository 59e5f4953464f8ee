use serde::{Deserialize, Serialize};

use crate::grid::Tile;
use crate::profile::Inventory;
use crate::types::{BoosterKind, GameStatus, Pos, Symbol, TileId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub id: TileId,
    pub x: u8,
    pub y: u8,
    /// `None` only mid-cascade
    pub symbol: Option<Symbol>,
}

impl TileSnapshot {
    pub fn new(pos: Pos, tile: &Tile) -> Self {
        Self {
            id: tile.id,
            x: pos.x,
            y: pos.y,
            symbol: tile.cell,
        }
    }

    pub fn pos(&self) -> Pos {
        Pos::new(self.x, self.y)
    }
}

/// Read-only view of a session for a presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub game_id: u32,
    pub level: u32,
    pub status: GameStatus,
    pub score: u32,
    pub target_score: u32,
    pub moves: u32,
    pub width: u8,
    pub height: u8,
    /// Column-major, bottom row first within each column
    pub tiles: Vec<TileSnapshot>,
    pub selection: Option<Pos>,
    pub processing: bool,
    pub active_booster: Option<BoosterKind>,
    pub currency: u64,
    pub boosters: Inventory,
}

impl SessionSnapshot {
    pub fn clear(&mut self) {
        self.game_id = 0;
        self.level = 0;
        self.status = GameStatus::Menu;
        self.score = 0;
        self.target_score = 0;
        self.moves = 0;
        self.width = 0;
        self.height = 0;
        self.tiles.clear();
        self.selection = None;
        self.processing = false;
        self.active_booster = None;
        self.currency = 0;
        self.boosters = Inventory::empty();
    }

    /// True when a tap would be acted on
    pub fn accepts_input(&self) -> bool {
        self.status == GameStatus::Playing && !self.processing
    }

    pub fn tile_at(&self, pos: Pos) -> Option<&TileSnapshot> {
        if pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        self.tiles
            .get(pos.x as usize * self.height as usize + pos.y as usize)
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            game_id: 0,
            level: 0,
            status: GameStatus::Menu,
            score: 0,
            target_score: 0,
            moves: 0,
            width: 0,
            height: 0,
            tiles: Vec::new(),
            selection: None,
            processing: false,
            active_booster: None,
            currency: 0,
            boosters: Inventory::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_matches_default() {
        let mut snap = SessionSnapshot {
            game_id: 3,
            level: 2,
            status: GameStatus::Won,
            score: 1200,
            target_score: 1000,
            moves: 4,
            width: 1,
            height: 1,
            tiles: vec![TileSnapshot {
                id: TileId(7),
                x: 0,
                y: 0,
                symbol: Some(Symbol::Ton),
            }],
            selection: Some(Pos::new(0, 0)),
            processing: true,
            active_booster: Some(BoosterKind::Bomb),
            currency: 50,
            boosters: Inventory::default(),
        };
        assert!(!snap.accepts_input());
        assert_eq!(snap.tile_at(Pos::new(0, 0)).map(|t| t.id), Some(TileId(7)));

        snap.clear();
        assert_eq!(snap, SessionSnapshot::default());
        assert_eq!(snap.tile_at(Pos::new(0, 0)), None);
    }
}
