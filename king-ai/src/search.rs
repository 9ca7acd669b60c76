//! 搜索接口与配置
//!
//! Minimax 与 Alpha-Beta 共用同一套终局/效用约定，通过 `Search` trait
//! 对外提供统一的 `best_move`，对局控制不需要关心具体算法。

use king_core::{MoveGenerator, State, KING_WIN_SCORE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alpha_beta::AlphaBeta;
use crate::evaluate::{Evaluator, HEURISTIC_LIMIT};
use crate::minimax::Minimax;
use crate::node::GameNode;

/// 搜索错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// 搜索没有返回任何节点（违反搜索约定）
    #[error("Search returned no node for state {state}")]
    NoNode { state: String },
}

/// 搜索算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// 完整 Minimax
    Minimax,
    /// Alpha-Beta 剪枝
    #[default]
    AlphaBeta,
}

impl Algorithm {
    /// 显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Algorithm::Minimax => "Minimax",
            Algorithm::AlphaBeta => "Alpha-Beta",
        }
    }
}

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// 简单：depth=2
    Easy,
    /// 中等：depth=4
    Medium,
    /// 困难：depth=6
    Hard,
}

/// 搜索配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    /// 搜索深度上限，`None` 表示一直搜索到终局（路径上重复的局面按和棋计）
    pub max_depth: Option<u32>,
}

impl SearchConfig {
    pub fn from_difficulty(algorithm: Algorithm, difficulty: Difficulty) -> Self {
        let max_depth = match difficulty {
            Difficulty::Easy => 2,
            Difficulty::Medium => 4,
            Difficulty::Hard => 6,
        };
        Self {
            algorithm,
            max_depth: Some(max_depth),
        }
    }

    /// 按配置创建搜索引擎
    pub fn build(&self) -> Box<dyn Search> {
        match self.algorithm {
            Algorithm::Minimax => Box::new(Minimax::new(self.max_depth)),
            Algorithm::AlphaBeta => Box::new(AlphaBeta::new(self.max_depth)),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::from_difficulty(Algorithm::AlphaBeta, Difficulty::Hard)
    }
}

/// 搜索策略
pub trait Search {
    /// 算法名称
    fn name(&self) -> &'static str;

    /// 从给定局面出发搜索，返回选中的后继节点（局面本身为终局时返回根节点）
    fn best_move(&mut self, state: &State, maximizing: bool) -> Result<GameNode, SearchError>;

    /// 上一次搜索访问的节点数
    fn nodes_searched(&self) -> u64;
}

/// 当前搜索路径上再次出现的局面按和棋计值，保证无深度上限的搜索也能结束
pub(crate) const REPETITION_VALUE: i32 = 0;

/// 叶子节点求值：终局取效用值，到达深度上限取启发式评估，否则返回 `None`
pub(crate) fn leaf_value(node: &GameNode, max_depth: Option<u32>) -> Option<GameNode> {
    if MoveGenerator::is_terminal(&node.state) {
        return Some(node.with_value(terminal_value(&node.state, node.depth)));
    }
    match max_depth {
        Some(limit) if node.depth >= limit => Some(node.with_value(Evaluator::evaluate(&node.state))),
        _ => None,
    }
}

/// 终局效用值按深度折扣，越快的胜利分数越高，符号不变
pub(crate) fn terminal_value(state: &State, depth: u32) -> i32 {
    let utility = MoveGenerator::utility(state);
    let discount = depth.min((KING_WIN_SCORE - HEURISTIC_LIMIT - 1) as u32) as i32;
    match utility.signum() {
        1 => utility - discount,
        -1 => utility + discount,
        _ => 0,
    }
}
