//! 规则常量定义

/// 棋盘边长（5x5）
pub const BOARD_SIZE: usize = 5;

/// 棋盘格子总数
pub const BOARD_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// 国王逃脱行（到达此行即国王胜）
pub const ESCAPE_ROW: u8 = (BOARD_SIZE - 1) as u8;

/// 终局效用值的绝对值（国王胜为正，巨龙胜为负）
pub const KING_WIN_SCORE: i32 = 1000;

/// 默认回合上限（一回合 = 巨龙走一步 + 国王方走一步）
pub const DEFAULT_TURN_LIMIT: u32 = 25;

/// 默认局面重复上限
pub const DEFAULT_STATE_LIMIT: u32 = 5;

/// 双 AI 对战时每步之间的默认停顿（毫秒）
pub const DEFAULT_AI_PAUSE_MS: u64 = 1500;

/// 空格子的显示字符
pub const EMPTY_MARKER: char = '_';
