//! 对局参与者
//!
//! AI 与控制台玩家实现同一个 `Player` trait，对局控制只负责轮流询问

use std::io::{self, BufRead, Stdin, Stdout, Write};

use anyhow::{bail, Context, Result};
use king_ai::{Search, SearchConfig};
use king_core::{Board, Move, MoveGenerator, Position, Side, State};
use tracing::debug;

/// 玩家给出的一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMove {
    /// 把某个棋子走到目标格
    Step { from: Position, to: Position },
    /// 直接提交搜索得到的后继局面
    Searched(State),
}

/// 对局参与者
pub trait Player {
    /// 显示名称
    fn name(&self) -> &str;

    /// 是否为 AI
    fn is_ai(&self) -> bool;

    /// 为当前走子方选择一步
    fn choose(&mut self, board: &Board) -> Result<PlayerMove>;
}

/// AI 玩家
pub struct AiPlayer {
    name: String,
    engine: Box<dyn Search>,
}

impl AiPlayer {
    pub fn new(name: impl Into<String>, engine: Box<dyn Search>) -> Self {
        Self {
            name: name.into(),
            engine,
        }
    }

    /// 按搜索配置创建
    pub fn from_config(name: impl Into<String>, config: &SearchConfig) -> Self {
        Self::new(name, config.build())
    }
}

impl Player for AiPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ai(&self) -> bool {
        true
    }

    fn choose(&mut self, board: &Board) -> Result<PlayerMove> {
        let side = board.side_to_move();
        let node = self
            .engine
            .best_move(board.state(), side.is_maximizing())
            .with_context(|| format!("{} 搜索失败", self.engine.name()))?;

        if node.depth == 0 {
            bail!("{} 没有给出走法: {}", self.engine.name(), board.state().stringify());
        }

        debug!(
            "{} ({}) 选择局面 {}: value={}, nodes={}",
            self.name,
            self.engine.name(),
            node.state.stringify(),
            node.value,
            self.engine.nodes_searched()
        );
        Ok(PlayerMove::Searched(node.state))
    }
}

/// 按行读取输入
pub trait LineInput {
    /// 读取一行（含换行符），返回读取的字节数，0 表示输入结束
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl<R: BufRead> LineInput for R {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// 标准输入：每次读取时加锁，两个控制台玩家可以共用
pub struct StdinInput(Stdin);

impl LineInput for StdinInput {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(&mut self.0.lock(), buf)
    }
}

/// 控制台玩家：列出存活棋子，输入棋子坐标，再从可走目标中选编号
pub struct ConsolePlayer<R, W> {
    name: String,
    input: R,
    output: W,
}

impl ConsolePlayer<StdinInput, Stdout> {
    /// 使用标准输入输出
    pub fn stdio(name: impl Into<String>) -> Self {
        Self::new(name, StdinInput(io::stdin()), io::stdout())
    }
}

impl<R: LineInput, W: Write> ConsolePlayer<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }

    fn prompt(&mut self, text: &str) -> Result<String> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).context("读取输入失败")? == 0 {
            bail!("输入已结束");
        }
        Ok(line)
    }

    /// 列出走子方的存活棋子
    fn show_pieces(&mut self, board: &Board, side: Side) -> Result<()> {
        writeln!(self.output, "{} pieces:", side)?;
        for piece in board.living_pieces(side) {
            writeln!(self.output, "  {}", piece)?;
        }
        Ok(())
    }
}

impl<R: LineInput, W: Write> Player for ConsolePlayer<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ai(&self) -> bool {
        false
    }

    fn choose(&mut self, board: &Board) -> Result<PlayerMove> {
        let side = board.side_to_move();

        loop {
            self.show_pieces(board, side)?;
            let line = self.prompt(&format!("{} ({}), enter piece coordinates as \"x y\": ", self.name, side))?;
            let Some(coordinates) = parse_coordinates(&line) else {
                writeln!(self.output, "Coordinates must be two digits separated by a space.")?;
                continue;
            };
            let from = match Position::try_from(coordinates) {
                Ok(pos) => pos,
                Err(e) => {
                    writeln!(self.output, "{}.", e)?;
                    continue;
                }
            };

            if board.piece_at(from).map(|p| p.piece_type.side()) != Some(side) {
                writeln!(self.output, "You have no piece at {}.", from)?;
                continue;
            }

            let moves: Vec<Move> = MoveGenerator::generate_moves(board.state(), side)
                .into_iter()
                .filter(|mv| mv.from == from)
                .collect();
            if moves.is_empty() {
                writeln!(self.output, "The piece at {} cannot move.", from)?;
                continue;
            }

            for (index, mv) in moves.iter().enumerate() {
                writeln!(self.output, "  {}: {}", index, mv)?;
            }

            let line = self.prompt("Choose a move: ")?;
            match parse_index(&line, moves.len()) {
                Some(index) => {
                    return Ok(PlayerMove::Step {
                        from,
                        to: moves[index].to,
                    })
                }
                None => writeln!(self.output, "Invalid move number.")?,
            }
        }
    }
}

/// 解析坐标输入：恰好两个数字，中间一个空格；范围由 `Position::try_from` 检查
pub fn parse_coordinates(line: &str) -> Option<(i32, i32)> {
    match line.trim_end_matches(['\r', '\n']).as_bytes() {
        [x @ b'0'..=b'9', b' ', y @ b'0'..=b'9'] => Some(((x - b'0') as i32, (y - b'0') as i32)),
        _ => None,
    }
}

/// 解析走法编号，必须小于可选数量
pub fn parse_index(line: &str, len: usize) -> Option<usize> {
    line.trim_end_matches(['\r', '\n'])
        .parse::<usize>()
        .ok()
        .filter(|&index| index < len)
}
