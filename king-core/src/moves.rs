//! 走法生成与规则判定
//!
//! 规则表：
//! - 国王、卫兵：上下左右走一格，可走到空格或吃掉巨龙
//! - 巨龙：八个方向走一格，只能走到空格
//! - 卫兵被两条巨龙在同一直线上夹住（左右或上下）即被吃，棋盘边缘不算
//! - 国王四周所有棋盘内的正交邻格都是巨龙即被擒（边缘视为墙）
//! - 国王到达第 4 行即逃脱

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::constants::{ESCAPE_ROW, KING_WIN_SCORE};
use crate::piece::{PieceType, Position, Side};
use crate::state::State;

/// 正交方向：上、下、左、右
const ORTHOGONAL: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// 对角方向
const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起始位置
    pub from: Position,
    /// 目标位置
    pub to: Position,
    /// 被吃的巨龙（如果有）
    pub captured: Option<PieceType>,
}

impl Move {
    /// 创建新走法
    pub fn new(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            captured: None,
        }
    }

    /// 创建带吃子的走法
    pub fn with_capture(from: Position, to: Position, captured: PieceType) -> Self {
        Self {
            from,
            to,
            captured: Some(captured),
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)?;
        if let Some(captured) = self.captured {
            write!(f, ", captures {}", captured.name())?;
        }
        Ok(())
    }
}

/// 走法生成器（规则引擎）
pub struct MoveGenerator;

impl MoveGenerator {
    /// 指定位置棋子的所有合法目标
    ///
    /// 空格返回空列表；调用方负责只查询己方棋子
    pub fn available_moves(state: &State, pos: Position) -> Vec<Position> {
        let piece = match state.get(pos) {
            Some(piece) => piece,
            None => return Vec::new(),
        };

        let mut targets = Vec::with_capacity(8);
        match piece {
            PieceType::King | PieceType::Guard => {
                for (dx, dy) in ORTHOGONAL {
                    if let Some(to) = pos.offset(dx, dy) {
                        match state.get(to) {
                            None | Some(PieceType::Dragon) => targets.push(to),
                            Some(_) => {}
                        }
                    }
                }
            }
            PieceType::Dragon => {
                for (dx, dy) in ORTHOGONAL.into_iter().chain(DIAGONAL) {
                    if let Some(to) = pos.offset(dx, dy) {
                        if state.get(to).is_none() {
                            targets.push(to);
                        }
                    }
                }
            }
        }
        targets
    }

    /// 生成指定阵营的所有走法（棋子按行优先，目标按方向顺序）
    pub fn generate_moves(state: &State, side: Side) -> Vec<Move> {
        let mut moves = Vec::with_capacity(32);

        for (from, _) in state.pieces(side) {
            for to in Self::available_moves(state, from) {
                match state.get(to) {
                    Some(captured) => moves.push(Move::with_capture(from, to, captured)),
                    None => moves.push(Move::new(from, to)),
                }
            }
        }

        moves
    }

    /// 检查指定阵营是否还有棋可走
    pub fn has_moves(state: &State, side: Side) -> bool {
        state
            .pieces(side)
            .into_iter()
            .any(|(pos, _)| !Self::available_moves(state, pos).is_empty())
    }

    /// 在局面副本上执行走法：吃龙、清除被夹住的卫兵、切换走子方
    pub fn apply(state: &State, mv: Move) -> State {
        let mut next = *state;
        next.move_piece(mv.from, mv.to);
        Self::remove_flanked_guards(&mut next);
        next.next_turn();
        next
    }

    /// 当前走子方的所有后继局面，不修改输入局面
    pub fn successors(state: &State) -> Vec<State> {
        Self::generate_moves(state, state.side_to_move())
            .into_iter()
            .map(|mv| Self::apply(state, mv))
            .collect()
    }

    /// 找出所有被巨龙夹住的卫兵（行优先）
    pub fn flanked_guards(state: &State) -> Vec<Position> {
        Position::all()
            .filter(|&pos| state.get(pos) == Some(PieceType::Guard))
            .filter(|&pos| Self::is_flanked(state, pos))
            .collect()
    }

    /// 检查某格是否被巨龙左右或上下夹住
    fn is_flanked(state: &State, pos: Position) -> bool {
        let dragon_at = |dx: i8, dy: i8| {
            pos.offset(dx, dy)
                .map(|p| state.get(p) == Some(PieceType::Dragon))
                .unwrap_or(false)
        };
        (dragon_at(-1, 0) && dragon_at(1, 0)) || (dragon_at(0, -1) && dragon_at(0, 1))
    }

    /// 移除局面中被夹住的卫兵，返回被移除的位置
    pub fn remove_flanked_guards(state: &mut State) -> Vec<Position> {
        let captured = Self::flanked_guards(state);
        for &pos in &captured {
            trace!("卫兵在 {} 被夹住", pos);
            state.set(pos, None);
        }
        captured
    }

    /// 国王是否被包围：棋盘内所有正交邻格都是巨龙
    pub fn king_surrounded(state: &State, king_pos: Position) -> bool {
        ORTHOGONAL
            .iter()
            .filter_map(|&(dx, dy)| king_pos.offset(dx, dy))
            .all(|pos| state.get(pos) == Some(PieceType::Dragon))
    }

    /// 巨龙胜：国王已不在该位置（被擒），或被包围
    pub fn dragons_win(state: &State, king_pos: Position) -> bool {
        if state.get(king_pos) != Some(PieceType::King) {
            return true;
        }
        Self::king_surrounded(state, king_pos)
    }

    /// 国王胜：到达逃脱行
    pub fn king_wins(king_pos: Position) -> bool {
        king_pos.y == ESCAPE_ROW
    }

    /// 终局：任一方获胜，或走子方无棋可走
    pub fn is_terminal(state: &State) -> bool {
        let king_pos = match state.find_king() {
            Some(pos) => pos,
            None => return true,
        };

        Self::dragons_win(state, king_pos)
            || Self::king_wins(king_pos)
            || !Self::has_moves(state, state.side_to_move())
    }

    /// 终局效用值（国王方视角）：国王胜为正，巨龙胜为负，困毙为 0
    pub fn utility(state: &State) -> i32 {
        let king_pos = match state.find_king() {
            Some(pos) => pos,
            None => return -KING_WIN_SCORE,
        };

        if Self::dragons_win(state, king_pos) {
            -KING_WIN_SCORE
        } else if Self::king_wins(king_pos) {
            KING_WIN_SCORE
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: u8, y: u8) -> Position {
        Position::new_unchecked(x, y)
    }

    fn layout(rows: [&str; 5], last_moved: Side) -> State {
        State::parse(rows, last_moved).unwrap()
    }

    #[test]
    fn test_king_moves_center() {
        let state = layout(["_____", "_____", "__K__", "_____", "_____"], Side::Dragons);
        let moves = MoveGenerator::available_moves(&state, pos(2, 2));

        // 上、下、左、右，不含对角
        assert_eq!(moves, vec![pos(2, 1), pos(2, 3), pos(1, 2), pos(3, 2)]);
    }

    #[test]
    fn test_king_corner() {
        let state = layout(["K____", "_____", "_____", "_____", "_____"], Side::Dragons);
        let moves = MoveGenerator::available_moves(&state, pos(0, 0));

        assert_eq!(moves, vec![pos(0, 1), pos(1, 0)]);
    }

    #[test]
    fn test_king_captures_dragon_not_guard() {
        let state = layout(["_____", "__D__", "_GK__", "_____", "_____"], Side::Dragons);
        let moves = MoveGenerator::available_moves(&state, pos(2, 2));

        assert!(moves.contains(&pos(2, 1)));
        assert!(!moves.contains(&pos(1, 2)));
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn test_guard_moves() {
        let state = layout(["_____", "_____", "_DG__", "__K__", "_____"], Side::Dragons);
        let moves = MoveGenerator::available_moves(&state, pos(2, 2));

        assert_eq!(moves, vec![pos(2, 1), pos(1, 2), pos(3, 2)]);
    }

    #[test]
    fn test_dragon_moves() {
        let state = layout(["_____", "_____", "__D__", "_____", "_____"], Side::King);
        let moves = MoveGenerator::available_moves(&state, pos(2, 2));

        assert_eq!(moves.len(), 8);
        assert_eq!(&moves[..4], &[pos(2, 1), pos(2, 3), pos(1, 2), pos(3, 2)]);
    }

    #[test]
    fn test_dragon_cannot_capture() {
        let state = layout(["_____", "_GK__", "_D___", "_____", "_____"], Side::King);
        let moves = MoveGenerator::available_moves(&state, pos(1, 2));

        assert!(!moves.contains(&pos(1, 1)));
        assert!(!moves.contains(&pos(2, 1)));
        assert_eq!(moves.len(), 6);
    }

    #[test]
    fn test_empty_square_has_no_moves() {
        let state = State::initial();
        assert!(MoveGenerator::available_moves(&state, pos(2, 2)).is_empty());
        assert!(MoveGenerator::available_moves(&state, pos(9, 9)).is_empty());
    }

    #[test]
    fn test_initial_move_count() {
        let state = State::initial();
        let moves = MoveGenerator::generate_moves(&state, Side::Dragons);

        // (0,4): 2, (1,4): 4, (3,4): 4, (4,4): 2
        assert_eq!(moves.len(), 12);
        assert!(moves.iter().all(|m| m.captured.is_none()));
    }

    #[test]
    fn test_successors_flip_turn_and_keep_input() {
        let state = State::initial();
        let before = state.stringify();
        let successors = MoveGenerator::successors(&state);

        assert_eq!(successors.len(), 12);
        assert_eq!(state.stringify(), before);
        for next in &successors {
            assert_eq!(next.side_to_move(), Side::King);
            assert_eq!(next.count(PieceType::Dragon), 4);
            // 每个后继局面与原局面恰好有两个格子不同
            let diff = Position::all().filter(|&p| next.get(p) != state.get(p)).count();
            assert_eq!(diff, 2);
        }
    }

    #[test]
    fn test_successor_capture_removes_dragon() {
        let state = layout(["__K__", "__D__", "_____", "_____", "D____"], Side::Dragons);
        let successors = MoveGenerator::successors(&state);

        let capture = successors
            .iter()
            .find(|s| s.get(pos(2, 1)) == Some(PieceType::King))
            .unwrap();
        assert_eq!(capture.count(PieceType::Dragon), 1);
        assert_eq!(capture.get(pos(2, 0)), None);
    }

    #[test]
    fn test_capture_move_display() {
        let state = layout(["__K__", "__D__", "_____", "_____", "D____"], Side::Dragons);
        let moves = MoveGenerator::generate_moves(&state, Side::King);

        let capture = moves.iter().find(|m| m.to == pos(2, 1)).unwrap();
        assert_eq!(capture.captured, Some(PieceType::Dragon));
        assert_eq!(capture.to_string(), "(2, 0) -> (2, 1), captures Dragon");

        let step = moves.iter().find(|m| m.captured.is_none()).unwrap();
        assert!(!step.to_string().contains("captures"));
    }

    #[test]
    fn test_flanked_guard_horizontal() {
        let state = layout(["K____", "_____", "DGD__", "_____", "_____"], Side::Dragons);
        assert_eq!(MoveGenerator::flanked_guards(&state), vec![pos(1, 2)]);
    }

    #[test]
    fn test_flanked_guard_vertical() {
        let state = layout(["K____", "___D_", "___G_", "___D_", "_____"], Side::Dragons);
        assert_eq!(MoveGenerator::flanked_guards(&state), vec![pos(3, 2)]);
    }

    #[test]
    fn test_edge_does_not_flank() {
        let state = layout(["K____", "_____", "GD___", "_____", "_____"], Side::Dragons);
        assert!(MoveGenerator::flanked_guards(&state).is_empty());

        // 对角不算夹
        let state = layout(["K____", "D____", "_G___", "__D__", "_____"], Side::Dragons);
        assert!(MoveGenerator::flanked_guards(&state).is_empty());
    }

    #[test]
    fn test_successor_flanks_guard() {
        // 巨龙 (3,3) 走到 (2,2) 后与 (0,2) 夹住 (1,2) 的卫兵
        let state = layout(["K____", "_____", "DG___", "___D_", "_____"], Side::King);
        let successors = MoveGenerator::successors(&state);

        let flank = successors
            .iter()
            .find(|s| s.get(pos(2, 2)) == Some(PieceType::Dragon))
            .unwrap();
        assert_eq!(flank.get(pos(1, 2)), None);
        assert_eq!(flank.count(PieceType::Guard), 0);
    }

    #[test]
    fn test_king_surrounded() {
        let center = layout(["_____", "__D__", "_DKD_", "__D__", "_____"], Side::Dragons);
        assert!(MoveGenerator::dragons_win(&center, pos(2, 2)));
        assert!(MoveGenerator::is_terminal(&center));
        assert_eq!(MoveGenerator::utility(&center), -KING_WIN_SCORE);

        // 卫兵占据一个邻格时不算包围
        let guarded = layout(["_____", "__D__", "_DKG_", "__D__", "_____"], Side::Dragons);
        assert!(!MoveGenerator::dragons_win(&guarded, pos(2, 2)));
    }

    #[test]
    fn test_king_surrounded_corner() {
        let state = layout(["KD___", "D____", "_____", "_____", "_____"], Side::Dragons);
        assert!(MoveGenerator::king_surrounded(&state, pos(0, 0)));
    }

    #[test]
    fn test_dragons_win_when_king_missing() {
        let state = layout(["_____", "_G___", "_____", "_____", "D____"], Side::Dragons);
        assert!(MoveGenerator::dragons_win(&state, pos(2, 0)));
        assert!(MoveGenerator::is_terminal(&state));
        assert_eq!(MoveGenerator::utility(&state), -KING_WIN_SCORE);
    }

    #[test]
    fn test_king_wins_on_escape_row() {
        assert!(MoveGenerator::king_wins(pos(3, 4)));
        assert!(!MoveGenerator::king_wins(pos(3, 3)));

        let state = layout(["_____", "_____", "D____", "_____", "__K__"], Side::King);
        assert!(MoveGenerator::is_terminal(&state));
        assert_eq!(MoveGenerator::utility(&state), KING_WIN_SCORE);
    }

    #[test]
    fn test_stalemate_is_terminal_draw() {
        // 巨龙方没有棋子可走
        let state = layout(["__K__", "_____", "_____", "_____", "_____"], Side::King);
        assert!(!MoveGenerator::has_moves(&state, Side::Dragons));
        assert!(MoveGenerator::is_terminal(&state));
        assert_eq!(MoveGenerator::utility(&state), 0);
    }

    #[test]
    fn test_initial_not_terminal() {
        let state = State::initial();
        assert!(!MoveGenerator::is_terminal(&state));
    }
}
