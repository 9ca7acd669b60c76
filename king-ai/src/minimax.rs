//! Minimax 搜索
//!
//! 两个互相递归的函数 `max_value` / `min_value`，每一层深度 +1，
//! 平局时保留先遇到的后继（即走法生成顺序）

use std::collections::HashSet;

use king_core::{MoveGenerator, Side, State};
use tracing::debug;

use crate::node::GameNode;
use crate::search::{leaf_value, Search, SearchError, REPETITION_VALUE};

/// Minimax 搜索引擎
#[derive(Debug, Clone)]
pub struct Minimax {
    max_depth: Option<u32>,
    nodes_searched: u64,
    /// 当前搜索路径上的局面（含走子方）
    path: HashSet<(State, Side)>,
}

impl Minimax {
    /// 创建新的引擎，深度上限至少为 1（保证总是走出一步）
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

    /// 从节点出发求 Minimax 值
    pub fn minimax_value(&mut self, node: GameNode, maximizing: bool) -> Result<GameNode, SearchError> {
        self.nodes_searched = 0;
        self.path.clear();

        let result = if maximizing {
            self.max_value(node)
        } else {
            self.min_value(node)
        };

        let best = result.ok_or_else(|| SearchError::NoNode {
            state: node.state.stringify(),
        })?;
        debug!(
            "Minimax 搜索完成: value={}, nodes={}",
            best.value, self.nodes_searched
        );
        Ok(best)
    }

    fn max_value(&mut self, node: GameNode) -> Option<GameNode> {
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
            let value = self.min_value(child)?.value;
            if best.map_or(true, |b| value > b.value) {
                best = Some(child.with_value(value));
            }
        }
        self.path.remove(&key);
        best
    }

    fn min_value(&mut self, node: GameNode) -> Option<GameNode> {
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
            let value = self.max_value(child)?.value;
            if best.map_or(true, |b| value < b.value) {
                best = Some(child.with_value(value));
            }
        }
        self.path.remove(&key);
        best
    }
}

impl Search for Minimax {
    fn name(&self) -> &'static str {
        "Minimax"
    }

    fn best_move(&mut self, state: &State, maximizing: bool) -> Result<GameNode, SearchError> {
        self.minimax_value(GameNode::root(*state), maximizing)
    }

    fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}
