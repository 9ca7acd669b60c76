//! 错误类型定义

use thiserror::Error;

use crate::piece::Side;

/// 规则错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    /// 无效的位置
    #[error("Invalid position: ({x}, {y})")]
    InvalidPosition { x: i32, y: i32 },

    /// 没有可走的棋子
    #[error("No living piece at position ({x}, {y})")]
    NoPiece { x: u8, y: u8 },

    /// 不是该方的回合
    #[error("Not your turn: {side} is not the side to move")]
    NotYourTurn { side: Side },

    /// 非法走法
    #[error("Invalid move: from ({from_x}, {from_y}) to ({to_x}, {to_y})")]
    IllegalMove {
        from_x: u8,
        from_y: u8,
        to_x: u8,
        to_y: u8,
    },

    /// 无效的局面描述
    #[error("Invalid layout: {reason}")]
    InvalidLayout { reason: String },
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, GameError>;
