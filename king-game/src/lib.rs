//! 疯王棋对局
//!
//! 包含:
//! - 对局控制（回合、重复局面、回合上限）
//! - AI 玩家与控制台玩家
//! - 配置文件

mod config;
mod game;
mod player;

pub use config::{ConfigError, GameConfig};
pub use game::Game;
pub use player::{
    parse_coordinates, parse_index, AiPlayer, ConsolePlayer, LineInput, Player, PlayerMove, StdinInput,
};
