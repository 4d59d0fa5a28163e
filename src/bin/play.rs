//! 量子チェスを対話的に指すシェル。白から交互に指す。

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context as _};
use clap::arg_enum;
use structopt::StructOpt;

use qchess::*;

arg_enum! {
    /// ログレベル。
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    enum LogLevel {
        Off,
        Error,
        Warn,
        Info,
        Debug,
        Trace,
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

#[derive(Debug, StructOpt)]
struct Opt {
    /// 乱数シード。省略時は OS のエントロピーを使う。
    #[structopt(long)]
    seed: Option<u64>,

    /// ログの出力先ファイル。省略時は標準エラー出力。
    #[structopt(long, parse(from_os_str))]
    log: Option<PathBuf>,

    #[structopt(long, possible_values = &LogLevel::variants(), case_insensitive = true, default_value = "Off")]
    log_level: LogLevel,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    init_logger(opt.log.as_deref(), opt.log_level)?;

    let rng = opt
        .seed
        .map_or_else(StdRandom::from_entropy, StdRandom::from_seed);

    let mut shell = Shell::new(rng);

    shell.interact()?;

    Ok(())
}

fn init_logger(path: Option<&Path>, level: LogLevel) -> anyhow::Result<()> {
    let dispatch = fern::Dispatch::new()
        .format(|out, message, _record| out.finish(format_args!("{}", message)))
        .level(level.into());

    let dispatch = match path {
        Some(path) => dispatch.chain(
            fern::log_file(path)
                .with_context(|| format!("cannot open log file: {}", path.display()))?,
        ),
        None => dispatch.chain(std::io::stderr()),
    };

    dispatch.apply()?;

    Ok(())
}

#[derive(Debug)]
struct Shell {
    pos: Position,
    rng: StdRandom,
    side_to_move: Side,
}

impl Shell {
    fn new(rng: StdRandom) -> Self {
        Self {
            pos: Position::startpos(),
            rng,
            side_to_move: WHITE,
        }
    }

    fn interact(&mut self) -> anyhow::Result<()> {
        use std::io::Write as _;

        self.print_position();

        loop {
            println!();
            print!("{} > ", self.side_to_move);
            std::io::stdout().flush()?;

            let mut line = String::new();
            if std::io::stdin().read_line(&mut line)? == 0 {
                break;
            }

            let tokens: Vec<_> = line.split_ascii_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            let cmd = tokens[0];
            let args = &tokens[1..];

            match self.do_command(cmd, args) {
                Ok(ControlFlow::Break(_)) => break,
                Err(e) => println!("error: {}", e),
                _ => {}
            }
        }

        Ok(())
    }

    fn do_command(&mut self, cmd: &str, args: &[&str]) -> anyhow::Result<ControlFlow<()>> {
        match cmd {
            "quit" => return Ok(ControlFlow::Break(())),
            "move" => return self.do_command_move(args),
            "branches" => self.do_command_branches(args)?,
            "branches-all" => self.do_command_branches_all(args)?,
            "dist" => self.do_command_dist(args)?,
            "print" => self.print_position(),
            _ => bail!("unknown command: {}", cmd),
        }

        Ok(ControlFlow::Continue(()))
    }

    /// `move <origin> <dest> [<dest> ...]`: 各移動先へ至る分岐を選んで指す。
    fn do_command_move(&mut self, args: &[&str]) -> anyhow::Result<ControlFlow<()>> {
        let origin_s = args.get(0).context("origin is not specified")?;
        let origin = Coord::from_board_space(origin_s)?;
        ensure!(args.len() >= 2, "destination is not specified");

        let (_, pc) = self
            .pos
            .piece_at(origin)
            .with_context(|| format!("there's no piece at {}", origin))?;
        ensure!(
            pc.side() == self.side_to_move,
            "that's the opponent's piece"
        );

        let selections = args[1..]
            .iter()
            .map(|dest_s| {
                let dest = Coord::from_board_space(dest_s)?;
                resolve_destination(&self.pos, origin, dest)
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let record = self.pos.do_move(origin, &selections, &mut self.rng)?;

        self.print_record(&record);
        self.print_position();

        let loser = Side::iter().find(|&side| self.pos.king_captured(side));
        if let Some(loser) = loser {
            println!("game over: {} wins", loser.inv());
            return Ok(ControlFlow::Break(()));
        }

        self.side_to_move = self.side_to_move.inv();

        Ok(ControlFlow::Continue(()))
    }

    /// `branches <sq>`: 指定したマスの駒の分岐を表示する。
    fn do_command_branches(&mut self, args: &[&str]) -> anyhow::Result<()> {
        let sq_s = args.get(0).context("square is not specified")?;
        let sq = Coord::from_board_space(sq_s)?;

        let branches = self.pos.candidate_branches(sq)?;
        if branches.is_empty() {
            println!("(no branches)");
        }
        for b in branches {
            println!("{}", format_branch(&b));
        }

        Ok(())
    }

    /// `branches-all <sq>`: 指定したマスの駒について、分布の全てのマスからの分岐を表示する。
    fn do_command_branches_all(&mut self, args: &[&str]) -> anyhow::Result<()> {
        let sq_s = args.get(0).context("square is not specified")?;
        let sq = Coord::from_board_space(sq_s)?;

        let (id, _) = self
            .pos
            .piece_at(sq)
            .with_context(|| format!("there's no piece at {}", sq))?;

        for (origin, branches) in self.pos.candidate_branches_all(id) {
            println!("{}:", origin);
            for b in branches {
                println!("  {}", format_branch(&b));
            }
        }

        Ok(())
    }

    /// `dist <sq>`: 指定したマスの駒の確率分布を表示する。
    fn do_command_dist(&mut self, args: &[&str]) -> anyhow::Result<()> {
        let sq_s = args.get(0).context("square is not specified")?;
        let sq = Coord::from_board_space(sq_s)?;

        for (sq, p) in self.pos.distribution_at(sq)?.to_sorted_vec() {
            println!("{}: {:.1}%", sq, 100.0 * p);
        }

        Ok(())
    }

    fn print_record(&self, record: &MoveRecord) {
        for event in record.events() {
            let occupant = self.pos.piece(event.occupant());
            let collapse = event.collapse();
            println!(
                "collapse: {} at {} ({:.1}%) -> {:?}",
                occupant,
                collapse.square(),
                100.0 * collapse.probability(),
                event.effect()
            );
        }
        for landing in record.landings() {
            println!("landed: {} (+{:.1}%)", landing.square(), 100.0 * landing.mass());
        }
    }

    fn print_position(&self) {
        print!("{}", self.pos);
    }
}
