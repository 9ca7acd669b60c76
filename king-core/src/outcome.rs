//! 对局结果

use serde::{Deserialize, Serialize};

/// 游戏结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// 国王方胜
    KingWins(WinReason),
    /// 巨龙方胜
    DragonsWin(WinReason),
    /// 和棋
    Draw(DrawReason),
}

/// 胜利原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// 国王到达逃脱行
    KingEscaped,
    /// 国王被包围或被擒
    KingCaptured,
}

/// 和棋原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawReason {
    /// 走子方无棋可走（困毙）
    Stalemate,
    /// 同一局面重复出现次数达到上限
    Repetition,
    /// 达到回合上限
    TurnLimit,
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::KingWins(_) => write!(f, "The King Wins!"),
            GameResult::DragonsWin(_) => write!(f, "The Dragons Win!"),
            GameResult::Draw(reason) => write!(f, "Nobody wins, it's a draw! ({:?})", reason),
        }
    }
}
