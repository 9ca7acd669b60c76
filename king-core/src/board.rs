//! 实盘
//!
//! `Board` 是唯一持有活棋子对象和权威局面的地方。搜索只拿到 `State` 的副本，
//! 选出的结果再由 `apply_state` 提交回来。

use tracing::{debug, warn};

use crate::error::{GameError, Result};
use crate::moves::MoveGenerator;
use crate::piece::{Piece, PieceType, Position, Side};
use crate::state::State;

/// 实盘
#[derive(Debug, Clone)]
pub struct Board {
    /// 国王
    king: Piece,
    /// 卫兵（国王方）
    guards: Vec<Piece>,
    /// 巨龙（巨龙方）
    dragons: Vec<Piece>,
    /// 当前局面，始终与棋子列表一致
    state: State,
}

impl Board {
    /// 创建初始实盘
    pub fn new() -> Self {
        Self::build(State::initial(), Position::new_unchecked(2, 0))
    }

    /// 从局面创建实盘，棋子按行优先顺序编入各自列表
    pub fn from_state(state: State) -> Result<Self> {
        let king_pos = state.find_king().ok_or_else(|| GameError::InvalidLayout {
            reason: "no king on the board".to_string(),
        })?;
        Ok(Self::build(state, king_pos))
    }

    fn build(state: State, king_pos: Position) -> Self {
        let collect = |piece_type: PieceType| -> Vec<Piece> {
            Position::all()
                .filter(|&pos| state.get(pos) == Some(piece_type))
                .map(|pos| Piece::new(piece_type, pos))
                .collect()
        };

        Self {
            king: Piece::new(PieceType::King, king_pos),
            guards: collect(PieceType::Guard),
            dragons: collect(PieceType::Dragon),
            state,
        }
    }

    /// 当前局面
    pub fn state(&self) -> &State {
        &self.state
    }

    /// 国王
    pub fn king(&self) -> &Piece {
        &self.king
    }

    /// 卫兵（包括已死亡的）
    pub fn guards(&self) -> &[Piece] {
        &self.guards
    }

    /// 巨龙（包括已死亡的）
    pub fn dragons(&self) -> &[Piece] {
        &self.dragons
    }

    /// 指定阵营的全部棋子（包括已死亡的）
    pub fn team(&self, side: Side) -> Vec<&Piece> {
        match side {
            Side::King => std::iter::once(&self.king).chain(self.guards.iter()).collect(),
            Side::Dragons => self.dragons.iter().collect(),
        }
    }

    /// 指定阵营的存活棋子
    pub fn living_pieces(&self, side: Side) -> Vec<Piece> {
        self.team(side).into_iter().filter(|p| p.alive).copied().collect()
    }

    /// 当前走子方
    pub fn side_to_move(&self) -> Side {
        self.state.side_to_move()
    }

    /// 指定局面中走子方某个棋子的合法目标
    ///
    /// 空格、越界或对方棋子返回空列表
    pub fn available_moves(&self, state: &State, pos: Position) -> Vec<Position> {
        if state.get(pos).map(|p| p.side()) != Some(state.side_to_move()) {
            return Vec::new();
        }
        MoveGenerator::available_moves(state, pos)
    }

    /// 指定阵营在实盘上是否还有棋可走
    pub fn has_moves(&self, side: Side) -> bool {
        self.living_pieces(side)
            .iter()
            .any(|piece| !MoveGenerator::available_moves(&self.state, piece.position).is_empty())
    }

    /// 杀死指定位置的巨龙并清空格子
    pub fn kill_dragon(&mut self, pos: Position) -> Option<Piece> {
        let dragon = self.dragons.iter_mut().find(|d| d.is_at(pos))?;
        dragon.kill();
        self.state.set(pos, None);
        debug!("巨龙在 {} 被吃", pos);
        Some(*dragon)
    }

    /// 走子后检查被夹住的卫兵，标记死亡并返回被吃的数量
    pub fn check_guard_capture(&mut self) -> usize {
        let flanked = MoveGenerator::flanked_guards(&self.state);
        let mut captured = 0;

        for pos in flanked {
            if let Some(guard) = self.guards.iter_mut().find(|g| g.is_at(pos)) {
                guard.kill();
                self.state.set(pos, None);
                captured += 1;
                debug!("卫兵在 {} 被巨龙夹住", pos);
            }
        }

        captured
    }

    /// 巨龙胜：国王被擒或被包围
    pub fn dragons_win(&self, state: &State, king_pos: Position) -> bool {
        MoveGenerator::dragons_win(state, king_pos)
    }

    /// 国王胜：到达逃脱行
    pub fn king_wins(&self, king_pos: Position) -> bool {
        MoveGenerator::king_wins(king_pos)
    }

    /// 是否为终局
    pub fn terminal_state(&self, state: &State) -> bool {
        MoveGenerator::is_terminal(state)
    }

    /// 终局效用值
    pub fn utility(&self, state: &State) -> i32 {
        MoveGenerator::utility(state)
    }

    /// 后继局面
    pub fn successors(&self, state: &State) -> Vec<State> {
        MoveGenerator::successors(state)
    }

    /// 人类走子：校验后吃龙、移动、切换走子方，返回被吃的巨龙
    pub fn apply_move(&mut self, from: Position, to: Position) -> Result<Option<Piece>> {
        let piece_type = self
            .state
            .get(from)
            .ok_or(GameError::NoPiece { x: from.x, y: from.y })?;

        let side = piece_type.side();
        if side != self.state.side_to_move() {
            return Err(GameError::NotYourTurn { side });
        }

        if !self.available_moves(&self.state, from).contains(&to) {
            return Err(GameError::IllegalMove {
                from_x: from.x,
                from_y: from.y,
                to_x: to.x,
                to_y: to.y,
            });
        }

        let captured = if self.state.get(to) == Some(PieceType::Dragon) {
            self.kill_dragon(to)
        } else {
            None
        };

        if let Some(piece) = self.piece_at_mut(from) {
            piece.move_to(to);
        }
        self.state.move_piece(from, to);
        self.state.next_turn();

        Ok(captured)
    }

    /// 提交新局面（通常是搜索结果），根据格子重新推导棋子位置和存活状态
    ///
    /// 位置未变的棋子保持不动，离开原格的棋子认领新出现的同类格子，
    /// 没有可认领格子的棋子判定死亡。走子方取自新局面。
    pub fn apply_state(&mut self, new_state: State) {
        match new_state.find_king() {
            Some(pos) => self.king.move_to(pos),
            None => self.king.kill(),
        }
        Self::sync_pieces(&mut self.guards, &new_state, PieceType::Guard);
        Self::sync_pieces(&mut self.dragons, &new_state, PieceType::Dragon);

        self.state = new_state;

        if !self.is_consistent() {
            warn!("提交的局面与棋子列表不一致: {}", self.state.stringify());
        }
    }

    /// 将一类棋子的列表同步到局面
    fn sync_pieces(pieces: &mut [Piece], state: &State, piece_type: PieceType) {
        let mut unclaimed: Vec<Position> = Position::all()
            .filter(|&pos| state.get(pos) == Some(piece_type))
            .filter(|&pos| !pieces.iter().any(|p| p.is_at(pos)))
            .collect();

        for piece in pieces.iter_mut().filter(|p| p.alive) {
            if state.get(piece.position) == Some(piece_type) {
                continue;
            }
            if unclaimed.is_empty() {
                piece.kill();
            } else {
                piece.move_to(unclaimed.remove(0));
            }
        }
    }

    /// 查找指定位置的存活棋子
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        std::iter::once(&self.king)
            .chain(self.guards.iter())
            .chain(self.dragons.iter())
            .find(|p| p.is_at(pos))
    }

    fn piece_at_mut(&mut self, pos: Position) -> Option<&mut Piece> {
        std::iter::once(&mut self.king)
            .chain(self.guards.iter_mut())
            .chain(self.dragons.iter_mut())
            .find(|p| p.is_at(pos))
    }

    /// 检查局面是否恰好是存活棋子的读出
    pub fn is_consistent(&self) -> bool {
        let mut expected = State::empty(self.state.last_moved());
        let mut living = 0;

        for piece in std::iter::once(&self.king)
            .chain(self.guards.iter())
            .chain(self.dragons.iter())
            .filter(|p| p.alive)
        {
            if expected.get(piece.position).is_some() {
                return false;
            }
            expected.set(piece.position, Some(piece.piece_type));
            living += 1;
        }

        let occupied = Position::all().filter(|&p| self.state.get(p).is_some()).count();
        expected == self.state && living == occupied
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: u8, y: u8) -> Position {
        Position::new_unchecked(x, y)
    }

    fn board(rows: [&str; 5], last_moved: Side) -> Board {
        Board::from_state(State::parse(rows, last_moved).unwrap()).unwrap()
    }

    #[test]
    fn test_initial_board() {
        let board = Board::new();

        assert_eq!(board.king().position, pos(2, 0));
        assert_eq!(board.guards().len(), 2);
        assert_eq!(board.dragons().len(), 4);
        assert_eq!(board.side_to_move(), Side::Dragons);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_from_state_requires_king() {
        let state = State::parse(["_____", "_G___", "_____", "_____", "D____"], Side::King).unwrap();
        assert!(Board::from_state(state).is_err());
    }

    #[test]
    fn test_available_moves_invalid_query() {
        let board = Board::new();
        assert!(board.available_moves(board.state(), pos(2, 2)).is_empty());
        assert!(board.available_moves(board.state(), pos(7, 1)).is_empty());
    }

    #[test]
    fn test_available_moves_opponent_piece_empty() {
        let mut board = Board::new();

        // 巨龙先走，查询国王得到空列表
        assert!(board.available_moves(board.state(), pos(2, 0)).is_empty());
        assert!(board.available_moves(board.state(), pos(1, 1)).is_empty());
        assert_eq!(
            board.available_moves(board.state(), pos(0, 4)),
            vec![pos(0, 3), pos(1, 3)]
        );
        assert!(board.has_moves(Side::King));

        board.apply_move(pos(0, 4), pos(0, 3)).unwrap();
        assert_eq!(
            board.available_moves(board.state(), pos(2, 0)),
            vec![pos(2, 1), pos(1, 0), pos(3, 0)]
        );
        assert!(board.available_moves(board.state(), pos(0, 3)).is_empty());
    }

    #[test]
    fn test_kill_dragon() {
        let mut board = Board::new();
        let killed = board.kill_dragon(pos(1, 4));

        assert_eq!(killed.map(|d| d.position), Some(pos(1, 4)));
        assert!(!board.dragons()[1].alive);
        assert_eq!(board.state().get_char(1, 4), '_');
        assert_eq!(board.living_pieces(Side::Dragons).len(), 3);
        assert!(board.is_consistent());

        // 没有巨龙的位置
        assert!(board.kill_dragon(pos(2, 2)).is_none());
    }

    #[test]
    fn test_check_guard_capture_exactly_one() {
        let mut board = board(["__K__", "_____", "DGD__", "___G_", "_____"], Side::Dragons);

        assert_eq!(board.check_guard_capture(), 1);
        assert!(!board.guards()[0].alive);
        assert!(board.guards()[1].alive);
        assert_eq!(board.state().get_char(1, 2), '_');
        assert!(board.is_consistent());

        // 再次检查不会重复吃子
        assert_eq!(board.check_guard_capture(), 0);
    }

    #[test]
    fn test_apply_move_human() {
        let mut board = Board::new();

        let captured = board.apply_move(pos(0, 4), pos(0, 3)).unwrap();
        assert!(captured.is_none());
        assert_eq!(board.dragons()[0].position, pos(0, 3));
        assert_eq!(board.side_to_move(), Side::King);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_apply_move_capture() {
        let mut board = board(["__K__", "__D__", "_____", "_____", "D____"], Side::Dragons);

        let captured = board.apply_move(pos(2, 0), pos(2, 1)).unwrap();
        assert_eq!(captured.map(|d| d.piece_type), Some(PieceType::Dragon));
        assert_eq!(board.king().position, pos(2, 1));
        assert!(!board.dragons()[0].alive);
        assert!(board.dragons()[1].alive);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_apply_move_errors() {
        let mut board = Board::new();

        assert_eq!(
            board.apply_move(pos(2, 2), pos(2, 3)),
            Err(GameError::NoPiece { x: 2, y: 2 })
        );
        assert_eq!(
            board.apply_move(pos(2, 0), pos(2, 1)),
            Err(GameError::NotYourTurn { side: Side::King })
        );
        assert!(matches!(
            board.apply_move(pos(0, 4), pos(0, 2)),
            Err(GameError::IllegalMove { .. })
        ));

        // 失败的走法不改变实盘
        assert_eq!(board.state(), &State::initial());
        assert!(board.is_consistent());
    }

    #[test]
    fn test_apply_state_preserves_identity() {
        let mut board = Board::new();
        let mut next = *board.state();
        next.move_piece(pos(3, 4), pos(3, 3));
        next.next_turn();

        board.apply_state(next);

        assert_eq!(board.dragons()[0].position, pos(0, 4));
        assert_eq!(board.dragons()[1].position, pos(1, 4));
        assert_eq!(board.dragons()[2].position, pos(3, 3));
        assert_eq!(board.dragons()[3].position, pos(4, 4));
        assert_eq!(board.side_to_move(), Side::King);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_apply_state_marks_captured() {
        let mut board = board(["_____", "_____", "DG___", "___D_", "__K__"], Side::King);
        let successors = board.successors(board.state());
        let flank = successors
            .into_iter()
            .find(|s| s.get(pos(2, 2)) == Some(PieceType::Dragon))
            .unwrap();

        board.apply_state(flank);

        assert!(!board.guards()[0].alive);
        assert_eq!(board.dragons()[1].position, pos(2, 2));
        assert!(board.is_consistent());
    }

    #[test]
    fn test_successors_do_not_touch_board() {
        let board = Board::new();
        let before = board.state().stringify();

        let successors = board.successors(board.state());
        assert!(!successors.is_empty());
        assert_eq!(board.state().stringify(), before);
        assert_eq!(board.dragons()[0].position, pos(0, 4));
    }

    #[test]
    fn test_has_moves() {
        let board = board(["__K__", "_____", "_____", "_____", "_____"], Side::King);
        assert!(!board.has_moves(Side::Dragons));
        assert!(board.has_moves(Side::King));
    }
}
