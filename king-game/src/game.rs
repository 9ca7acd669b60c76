//! 对局控制
//!
//! 一回合 = 巨龙方一步 + 国王方一步。每一步之后依次检查：
//! 卫兵被夹、巨龙胜、国王胜、局面重复。

use std::collections::HashMap;
use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use king_core::{Board, DrawReason, GameResult, Side, WinReason};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::player::{Player, PlayerMove};

/// 对局
pub struct Game<W> {
    board: Board,
    config: GameConfig,
    dragons: Box<dyn Player>,
    king: Box<dyn Player>,
    /// 局面签名 -> 重复次数（首次出现为 0）
    repetitions: HashMap<String, u32>,
    /// 已完成的单步数
    plies: u32,
    /// 棋盘输出
    out: W,
}

impl<W: Write> Game<W> {
    /// 从初始局面开始的对局
    pub fn new(config: GameConfig, dragons: Box<dyn Player>, king: Box<dyn Player>, out: W) -> Self {
        Self::with_board(Board::new(), config, dragons, king, out)
    }

    /// 从指定实盘开始的对局
    pub fn with_board(
        board: Board,
        config: GameConfig,
        dragons: Box<dyn Player>,
        king: Box<dyn Player>,
        out: W,
    ) -> Self {
        Self {
            board,
            config,
            dragons,
            king,
            repetitions: HashMap::new(),
            plies: 0,
            out,
        }
    }

    /// 当前实盘
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 已完成的单步数
    pub fn plies(&self) -> u32 {
        self.plies
    }

    /// 进行对局直到分出结果
    pub fn play(&mut self) -> Result<GameResult> {
        info!("对局开始: {} (巨龙) vs {} (国王)", self.dragons.name(), self.king.name());
        writeln!(self.out, "{}", self.board.state())?;

        let result = self.run()?;

        info!("对局结束: {}，共 {} 步", result, self.plies);
        Ok(result)
    }

    fn run(&mut self) -> Result<GameResult> {
        for turn in 1..=self.config.turn_limit {
            debug!("第 {} 回合", turn);
            for _ in 0..2 {
                if let Some(result) = self.play_ply()? {
                    return Ok(result);
                }
            }
        }
        Ok(GameResult::Draw(DrawReason::TurnLimit))
    }

    /// 走一步并做走后检查，分出结果时返回 `Some`
    fn play_ply(&mut self) -> Result<Option<GameResult>> {
        let side = self.board.side_to_move();
        if !self.board.has_moves(side) {
            return Ok(Some(GameResult::Draw(DrawReason::Stalemate)));
        }

        self.pause_between_ai();

        let player = match side {
            Side::Dragons => &mut self.dragons,
            Side::King => &mut self.king,
        };
        let name = player.name().to_string();
        let chosen = player
            .choose(&self.board)
            .with_context(|| format!("{} 未能给出走法", name))?;

        match chosen {
            PlayerMove::Step { from, to } => {
                self.board
                    .apply_move(from, to)
                    .with_context(|| format!("{} 的走法无效", name))?;
            }
            PlayerMove::Searched(state) => self.board.apply_state(state),
        }
        self.plies += 1;

        let captured = self.board.check_guard_capture();
        if captured > 0 {
            info!("{} 个卫兵被巨龙夹住", captured);
        }

        writeln!(self.out, "{} ({}) moved:", name, side)?;
        writeln!(self.out, "{}", self.board.state())?;

        Ok(self.check_outcome())
    }

    fn check_outcome(&mut self) -> Option<GameResult> {
        let king_pos = self.board.king().position;
        if self.board.dragons_win(self.board.state(), king_pos) {
            return Some(GameResult::DragonsWin(WinReason::KingCaptured));
        }
        if self.board.king_wins(king_pos) {
            return Some(GameResult::KingWins(WinReason::KingEscaped));
        }

        let seen = self
            .repetitions
            .entry(self.board.state().stringify())
            .and_modify(|count| *count += 1)
            .or_insert(0);
        if *seen >= self.config.state_limit {
            debug!("局面重复 {} 次", seen);
            return Some(GameResult::Draw(DrawReason::Repetition));
        }

        None
    }

    fn pause_between_ai(&self) {
        if self.config.ai_pause_ms > 0 && self.dragons.is_ai() && self.king.is_ai() && self.plies > 0 {
            thread::sleep(Duration::from_millis(self.config.ai_pause_ms));
        }
    }
}
