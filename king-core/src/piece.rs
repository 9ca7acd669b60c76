//! 棋子定义

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_SIZE;
use crate::error::GameError;

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    /// 国王（每局 1 个，国王方）
    King,
    /// 卫兵（每局 2 个，国王方）
    Guard,
    /// 巨龙（巨龙方）
    Dragon,
}

impl PieceType {
    /// 所属阵营
    pub fn side(&self) -> Side {
        match self {
            PieceType::King | PieceType::Guard => Side::King,
            PieceType::Dragon => Side::Dragons,
        }
    }

    /// 棋盘上的显示字符
    pub fn marker(&self) -> char {
        match self {
            PieceType::King => 'K',
            PieceType::Guard => 'G',
            PieceType::Dragon => 'D',
        }
    }

    /// 从显示字符解析
    pub fn from_marker(c: char) -> Option<PieceType> {
        match c {
            'K' => Some(PieceType::King),
            'G' => Some(PieceType::Guard),
            'D' => Some(PieceType::Dragon),
            _ => None,
        }
    }

    /// 显示名称
    pub fn name(&self) -> &'static str {
        match self {
            PieceType::King => "King",
            PieceType::Guard => "Guard",
            PieceType::Dragon => "Dragon",
        }
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 国王方（国王 + 卫兵，防守方）
    King,
    /// 巨龙方（进攻方，先手）
    Dragons,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::King => Side::Dragons,
            Side::Dragons => Side::King,
        }
    }

    /// 是否为搜索中的极大方（效用值以国王方视角计算）
    pub fn is_maximizing(&self) -> bool {
        matches!(self, Side::King)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::King => write!(f, "King"),
            Side::Dragons => write!(f, "Dragons"),
        }
    }
}

/// 棋盘位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 列 (0-4)
    pub x: u8,
    /// 行 (0-4)
    pub y: u8,
}

impl Position {
    /// 创建新位置
    pub fn new(x: u8, y: u8) -> Option<Self> {
        if (x as usize) < BOARD_SIZE && (y as usize) < BOARD_SIZE {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// 创建新位置（不检查边界，内部使用）
    pub const fn new_unchecked(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// 检查位置是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.x as usize) < BOARD_SIZE && (self.y as usize) < BOARD_SIZE
    }

    /// 获取偏移后的位置
    pub fn offset(&self, dx: i8, dy: i8) -> Option<Position> {
        let new_x = self.x as i8 + dx;
        let new_y = self.y as i8 + dy;
        if new_x >= 0 && (new_x as usize) < BOARD_SIZE && new_y >= 0 && (new_y as usize) < BOARD_SIZE {
            Some(Position {
                x: new_x as u8,
                y: new_y as u8,
            })
        } else {
            None
        }
    }

    /// 转换为数组索引（行优先）
    pub fn to_index(&self) -> usize {
        self.y as usize * BOARD_SIZE + self.x as usize
    }

    /// 棋盘上所有位置（行优先）
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE * BOARD_SIZE).map(|i| Position::new_unchecked((i % BOARD_SIZE) as u8, (i / BOARD_SIZE) as u8))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl TryFrom<(i32, i32)> for Position {
    type Error = GameError;

    fn try_from((x, y): (i32, i32)) -> Result<Self, Self::Error> {
        u8::try_from(x)
            .ok()
            .zip(u8::try_from(y).ok())
            .and_then(|(x, y)| Position::new(x, y))
            .ok_or(GameError::InvalidPosition { x, y })
    }
}

/// 棋子实体
///
/// 被吃掉的棋子只标记为死亡，不从所属列表移除，保持列表中的身份不变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub position: Position,
    pub alive: bool,
}

impl Piece {
    /// 创建新棋子
    pub fn new(piece_type: PieceType, position: Position) -> Self {
        Self {
            piece_type,
            position,
            alive: true,
        }
    }

    /// 所属阵营
    pub fn side(&self) -> Side {
        self.piece_type.side()
    }

    /// 检查棋子是否存活且位于指定位置
    pub fn is_at(&self, pos: Position) -> bool {
        self.alive && self.position == pos
    }

    /// 移动到新位置
    pub fn move_to(&mut self, pos: Position) {
        self.position = pos;
    }

    /// 标记为死亡
    pub fn kill(&mut self) {
        self.alive = false;
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.piece_type.name(), self.position)
    }
}
