//! 疯王棋 AI 引擎
//!
//! 包含:
//! - 局面评估函数
//! - Minimax 搜索
//! - Alpha-Beta 剪枝搜索
//! - 统一的 `Search` 接口与搜索配置

mod alpha_beta;
mod evaluate;
mod minimax;
mod node;
mod search;

pub use alpha_beta::AlphaBeta;
pub use evaluate::{Evaluator, HEURISTIC_LIMIT};
pub use minimax::Minimax;
pub use node::GameNode;
pub use search::{Algorithm, Difficulty, Search, SearchConfig, SearchError};
