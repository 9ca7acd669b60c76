//! Alpha-Beta 剪枝搜索
//!
//! 与 Minimax 结构相同，多了 (alpha, beta) 窗口：
//! alpha 为极大方已能保证的最好值，beta 为极小方已能保证的最好值。
//! 剪枝只影响速度，选出的走法与 Minimax 一致。

use std::collections::HashSet;

use king_core::{MoveGenerator, Side, State};
use tracing::debug;

use crate::node::GameNode;
use crate::search::{leaf_value, Search, SearchError, REPETITION_VALUE};

/// Alpha-Beta 搜索引擎
#[derive(Debug, Clone)]
pub struct AlphaBeta {
    max_depth: Option<u32>,
    nodes_searched: u64,
    /// 当前搜索路径上的局面（含走子方）
    path: HashSet<(State, Side)>,
}

impl AlphaBeta {
    /// 创建新的引擎，深度上限至少为 1
    pub fn new(max_depth: Option<u32>) -> Self {
        Self {
            max_depth: max_depth.map(|d| d.max(1)),
            nodes_searched: 0,
            path: HashSet::new(),
        }
    }

    /// 不设深度上限，搜索到终局
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// 从节点出发求 Alpha-Beta 值
    pub fn alpha_beta_value(&mut self, node: GameNode, maximizing: bool) -> Result<GameNode, SearchError> {
        self.nodes_searched = 0;
        self.path.clear();

        let result = if maximizing {
            self.max_value(node, i32::MIN, i32::MAX)
        } else {
            self.min_value(node, i32::MIN, i32::MAX)
        };

        let best = result.ok_or_else(|| SearchError::NoNode {
            state: node.state.stringify(),
        })?;
        debug!(
            "Alpha-Beta 搜索完成: value={}, nodes={}",
            best.value, self.nodes_searched
        );
        Ok(best)
    }

    fn max_value(&mut self, node: GameNode, mut alpha: i32, beta: i32) -> Option<GameNode> {
        self.nodes_searched += 1;
        if let Some(leaf) = leaf_value(&node, self.max_depth) {
            return Some(leaf);
        }
        let key = (node.state, node.state.side_to_move());
        if !self.path.insert(key) {
            return Some(node.with_value(REPETITION_VALUE));
        }

        let mut best: Option<GameNode> = None;
        for next in MoveGenerator::successors(&node.state) {
            let child = node.child(next);
            let value = self.min_value(child, alpha, beta)?.value;
            if best.map_or(true, |b| value > b.value) {
                best = Some(child.with_value(value));
            }
            if value >= beta {
                break; // Beta 剪枝
            }
            alpha = alpha.max(value);
        }
        self.path.remove(&key);
        best
    }

    fn min_value(&mut self, node: GameNode, alpha: i32, mut beta: i32) -> Option<GameNode> {
        self.nodes_searched += 1;
        if let Some(leaf) = leaf_value(&node, self.max_depth) {
            return Some(leaf);
        }
        let key = (node.state, node.state.side_to_move());
        if !self.path.insert(key) {
            return Some(node.with_value(REPETITION_VALUE));
        }

        let mut best: Option<GameNode> = None;
        for next in MoveGenerator::successors(&node.state) {
            let child = node.child(next);
            let value = self.max_value(child, alpha, beta)?.value;
            if best.map_or(true, |b| value < b.value) {
                best = Some(child.with_value(value));
            }
            if value <= alpha {
                break; // Alpha 剪枝
            }
            beta = beta.min(value);
        }
        self.path.remove(&key);
        best
    }
}

impl Search for AlphaBeta {
    fn name(&self) -> &'static str {
        "Alpha-Beta"
    }

    fn best_move(&mut self, state: &State, maximizing: bool) -> Result<GameNode, SearchError> {
        self.alpha_beta_value(GameNode::root(*state), maximizing)
    }

    fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}
