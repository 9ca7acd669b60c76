//! 局面快照
//!
//! `State` 是纯值类型：5x5 格子 + 刚走过的一方。搜索时大量复制，
//! 复制品与实盘 `Board` 之间没有任何引用关系。

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_CELLS, BOARD_SIZE, EMPTY_MARKER};
use crate::error::GameError;
use crate::piece::{PieceType, Position, Side};

/// 局面快照
///
/// 相等性只比较格子内容（与 `stringify()` 一致），不比较走子方
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct State {
    /// 格子，索引为 y * 5 + x
    cells: [Option<PieceType>; BOARD_CELLS],
    /// 刚刚走过的一方
    last_moved: Side,
}

impl State {
    /// 创建空局面
    pub fn empty(last_moved: Side) -> Self {
        Self {
            cells: [None; BOARD_CELLS],
            last_moved,
        }
    }

    /// 创建初始局面（巨龙先走）
    pub fn initial() -> Self {
        let mut state = Self::empty(Side::King);

        state.set(Position::new_unchecked(2, 0), Some(PieceType::King));
        state.set(Position::new_unchecked(1, 1), Some(PieceType::Guard));
        state.set(Position::new_unchecked(3, 1), Some(PieceType::Guard));
        for x in [0, 1, 3, 4] {
            state.set(Position::new_unchecked(x, 4), Some(PieceType::Dragon));
        }

        state
    }

    /// 从 5 行字符串解析局面，每行 5 个字符（'K' 'G' 'D' '_'）
    pub fn parse(rows: [&str; BOARD_SIZE], last_moved: Side) -> Result<Self, GameError> {
        let mut state = Self::empty(last_moved);

        for (y, row) in rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != BOARD_SIZE {
                return Err(GameError::InvalidLayout {
                    reason: format!("row {} has {} cells", y, chars.len()),
                });
            }
            for (x, c) in chars.into_iter().enumerate() {
                let cell = match c {
                    EMPTY_MARKER => None,
                    other => Some(PieceType::from_marker(other).ok_or_else(|| {
                        GameError::InvalidLayout {
                            reason: format!("unknown marker '{}' at ({}, {})", other, x, y),
                        }
                    })?),
                };
                state.set(Position::new_unchecked(x as u8, y as u8), cell);
            }
        }

        if state.count(PieceType::King) > 1 {
            return Err(GameError::InvalidLayout {
                reason: "more than one king".to_string(),
            });
        }

        Ok(state)
    }

    /// 获取指定位置的棋子
    pub fn get(&self, pos: Position) -> Option<PieceType> {
        if pos.is_valid() {
            self.cells[pos.to_index()]
        } else {
            None
        }
    }

    /// 设置指定位置的棋子
    pub fn set(&mut self, pos: Position, piece: Option<PieceType>) {
        if pos.is_valid() {
            self.cells[pos.to_index()] = piece;
        }
    }

    /// 获取指定坐标的显示字符，空格或越界返回 '_'
    pub fn get_char(&self, x: u8, y: u8) -> char {
        self.get(Position::new_unchecked(x, y))
            .map(|p| p.marker())
            .unwrap_or(EMPTY_MARKER)
    }

    /// 移动棋子（不检查规则），返回目标格原有的棋子
    pub fn move_piece(&mut self, from: Position, to: Position) -> Option<PieceType> {
        let piece = self.get(from);
        let captured = self.get(to);
        self.set(from, None);
        self.set(to, piece);
        captured
    }

    /// 切换走子方，不改变棋子位置
    pub fn next_turn(&mut self) {
        self.last_moved = self.last_moved.opponent();
    }

    /// 刚走过的一方
    pub fn last_moved(&self) -> Side {
        self.last_moved
    }

    /// 当前走子方
    pub fn side_to_move(&self) -> Side {
        self.last_moved.opponent()
    }

    /// 行优先序列化格子，作为重复局面的键
    pub fn stringify(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.map(|p| p.marker()).unwrap_or(EMPTY_MARKER))
            .collect()
    }

    /// 查找国王位置
    pub fn find_king(&self) -> Option<Position> {
        Position::all().find(|&pos| self.get(pos) == Some(PieceType::King))
    }

    /// 获取指定阵营的所有棋子（行优先）
    pub fn pieces(&self, side: Side) -> Vec<(Position, PieceType)> {
        Position::all()
            .filter_map(|pos| self.get(pos).map(|piece| (pos, piece)))
            .filter(|(_, piece)| piece.side() == side)
            .collect()
    }

    /// 统计指定类型的棋子数量
    pub fn count(&self, piece_type: PieceType) -> usize {
        self.cells.iter().filter(|c| **c == Some(piece_type)).count()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::initial()
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cells.hash(state);
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, " ")?;
        for x in 0..BOARD_SIZE {
            write!(f, " {}", x)?;
        }
        writeln!(f)?;
        for y in 0..BOARD_SIZE {
            write!(f, "{}", y)?;
            for x in 0..BOARD_SIZE {
                write!(f, " {}", self.get_char(x as u8, y as u8))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
