//! 搜索树节点

use king_core::State;

/// 搜索树节点：局面 + 评估值 + 深度
///
/// 只在搜索递归内部使用，由创建它的那一层独占
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameNode {
    pub state: State,
    pub value: i32,
    pub depth: u32,
}

impl GameNode {
    /// 创建新节点
    pub fn new(state: State, value: i32, depth: u32) -> Self {
        Self { state, value, depth }
    }

    /// 以当前局面作为根节点
    pub fn root(state: State) -> Self {
        Self::new(state, 0, 0)
    }

    /// 返回带有新评估值的节点
    pub fn with_value(mut self, value: i32) -> Self {
        self.value = value;
        self
    }

    /// 生成下一层的子节点
    pub fn child(&self, state: State) -> Self {
        Self::new(state, 0, self.depth + 1)
    }
}
