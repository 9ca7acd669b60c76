//! 疯王棋（国王对巨龙）规则核心
//!
//! 包含:
//! - 棋子、位置、局面等核心数据结构
//! - 走法生成和规则判定
//! - 实盘（活棋子与权威局面）
//! - 对局结果与错误类型

mod board;
mod constants;
mod error;
mod moves;
mod outcome;
mod piece;
mod state;

pub use board::Board;
pub use constants::*;
pub use error::{GameError, Result};
pub use moves::{Move, MoveGenerator};
pub use outcome::{DrawReason, GameResult, WinReason};
pub use piece::{Piece, PieceType, Position, Side};
pub use state::State;
