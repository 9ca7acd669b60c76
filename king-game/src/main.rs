use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use king_ai::{Algorithm, Difficulty, SearchConfig};
use king_game::{AiPlayer, ConsolePlayer, Game, GameConfig, Player};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 国王对巨龙：5x5 棋盘上的不对称对弈
#[derive(Parser, Debug)]
#[command(name = "mad-king", version, about)]
struct Args {
    /// 配置文件路径（默认为系统配置目录下的 mad-king/config.json）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 搜索算法
    #[arg(long, value_enum)]
    algorithm: Option<AlgorithmArg>,

    /// AI 玩家数量
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=2))]
    ai_players: u8,

    /// 只有一个 AI 时人类执哪一方
    #[arg(long, value_enum, default_value_t = SideArg::King)]
    human_side: SideArg,

    /// AI 难度（决定搜索深度）
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// 搜索深度上限，优先于难度
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    depth: Option<u32>,

    /// 双 AI 对战时每步之间的停顿（毫秒）
    #[arg(long)]
    pause_ms: Option<u64>,

    /// 把合并后的配置写回配置文件
    #[arg(long)]
    save_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Minimax,
    AlphaBeta,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Minimax => Algorithm::Minimax,
            AlgorithmArg::AlphaBeta => Algorithm::AlphaBeta,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SideArg {
    King,
    Dragons,
}

impl Args {
    /// 命令行参数覆盖配置文件
    fn apply_to(&self, config: &mut GameConfig) {
        if let Some(algorithm) = self.algorithm {
            config.search.algorithm = algorithm.into();
        }
        if let Some(difficulty) = self.difficulty {
            config.search = SearchConfig::from_difficulty(config.search.algorithm, difficulty.into());
        }
        if let Some(depth) = self.depth {
            config.search.max_depth = Some(depth);
        }
        if let Some(pause_ms) = self.pause_ms {
            config.ai_pause_ms = pause_ms;
        }
    }

    /// 按 AI 数量创建 (巨龙方, 国王方) 玩家
    fn players(&self, config: &GameConfig) -> (Box<dyn Player>, Box<dyn Player>) {
        let ai = |name: &str| -> Box<dyn Player> { Box::new(AiPlayer::from_config(name, &config.search)) };
        let human = |name: &str| -> Box<dyn Player> { Box::new(ConsolePlayer::stdio(name)) };

        match (self.ai_players, self.human_side) {
            (0, _) => (human("Dragons player"), human("King player")),
            (2, _) => (ai("Dragons AI"), ai("King AI")),
            (_, SideArg::King) => (ai("Dragons AI"), human("You")),
            (_, SideArg::Dragons) => (human("You"), ai("King AI")),
        }
    }
}

fn main() -> Result<()> {
    // 初始化日志（输出到 stderr，不干扰棋盘显示）
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("mad_king=info".parse()?)
            .add_directive("king_game=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = GameConfig::load(args.config.as_deref());
    args.apply_to(&mut config);
    if args.save_config {
        match &args.config {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
    }
    info!(
        "算法: {}, 深度上限: {:?}, AI 数量: {}",
        config.search.algorithm.display_name(),
        config.search.max_depth,
        args.ai_players
    );

    let (dragons, king) = args.players(&config);
    let mut game = Game::new(config, dragons, king, io::stdout());
    let result = game.play().context("对局异常结束")?;

    println!("{}", result);
    Ok(())
}
