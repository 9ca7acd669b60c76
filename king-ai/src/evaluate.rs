//! 局面评估函数
//!
//! 只在搜索到达深度上限时使用；终局由规则引擎的效用值决定

use king_core::{MoveGenerator, PieceType, Position, Side, State, KING_WIN_SCORE};

/// 启发式分数的绝对值上限，低于任何折扣后的终局效用值
pub const HEURISTIC_LIMIT: i32 = KING_WIN_SCORE / 2;

/// 评估器
pub struct Evaluator;

/// 评估权重
mod weights {
    /// 国王每向逃脱行前进一行
    pub const KING_PROGRESS: i32 = 40;
    /// 国王每个可走的格子
    pub const KING_MOBILITY: i32 = 10;
    /// 每个存活的卫兵
    pub const GUARD: i32 = 50;
    /// 每条存活的巨龙
    pub const DRAGON: i32 = 40;
    /// 每条贴在国王身边的巨龙
    pub const DRAGON_NEAR_KING: i32 = 30;
}

impl Evaluator {
    /// 评估局面（国王方视角，正值对国王有利）
    ///
    /// 结果严格落在终局效用值之间，保证任何胜负都优于启发式分数
    pub fn evaluate(state: &State) -> i32 {
        let king_pos = match state.find_king() {
            Some(pos) => pos,
            None => return -HEURISTIC_LIMIT,
        };

        let mut score = 0;
        score += king_pos.y as i32 * weights::KING_PROGRESS;
        score += MoveGenerator::available_moves(state, king_pos).len() as i32 * weights::KING_MOBILITY;
        score += Self::evaluate_material(state);
        score -= Self::dragons_near(state, king_pos) * weights::DRAGON_NEAR_KING;

        score.clamp(-HEURISTIC_LIMIT, HEURISTIC_LIMIT)
    }

    /// 快速评估（仅计算子力差）
    pub fn evaluate_material(state: &State) -> i32 {
        state
            .pieces(Side::King)
            .iter()
            .chain(state.pieces(Side::Dragons).iter())
            .map(|(_, piece)| match piece {
                PieceType::King => 0,
                PieceType::Guard => weights::GUARD,
                PieceType::Dragon => -weights::DRAGON,
            })
            .sum()
    }

    /// 国王八邻域内的巨龙数量
    fn dragons_near(state: &State, king_pos: Position) -> i32 {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(pos) = king_pos.offset(dx, dy) {
                    if state.get(pos) == Some(PieceType::Dragon) {
                        count += 1;
                    }
                }
            }
        }
        count
    }
}
