//! mdb CLI - コマンドラインインターフェース
//!
//! 模擬プログラムを実行し、停止イベントごとにデバッガのコマンドを受け付けます。

mod demo;
mod input;

use anyhow::{Context, Result};
use clap::Parser;
use demo::{Outcome, Program};
use input::TerminalInput;
use mdb_core::console::StdinInput;
use mdb_core::{Console, Features, LineInput, Session, StartupConfig};
use std::cell::RefCell;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

/// ログのフィルタを読む環境変数
const LOG_ENV: &str = "MDB_LOG";

/// mdb - debugger command interpreter
#[derive(Parser)]
#[command(name = "mdb")]
#[command(version = "0.1.0")]
#[command(about = "Interactive debugger command interpreter running a simulated program", long_about = None)]
struct Cli {
    /// Do not read $HOME/.mdbrc, ./.mdbrc or $MDB_INIT
    #[arg(long)]
    no_init: bool,

    /// Source FILE after the standard init scripts
    #[arg(short = 'x', long = "init", value_name = "FILE")]
    init: Vec<PathBuf>,

    /// Report each stop event without prompting
    #[arg(long)]
    batch: bool,

    /// Echo each command read from the terminal
    #[arg(long)]
    echo: bool,

    /// Enable debug logging (overridden by MDB_LOG)
    #[arg(short, long)]
    verbose: bool,

    /// Approximate number of events in the simulated program
    #[arg(long, value_name = "N", default_value_t = 60)]
    events: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let program = Rc::new(RefCell::new(Program::new(cli.events)));
    let collab = demo::collaborators(&program);
    let features = Features {
        io_tabling: true,
        ..Features::default()
    };
    let mut session = Session::new(Console::stdio(line_input(cli.batch)?), collab, features)?;
    session.settings.echo_commands = cli.echo;
    if cli.batch {
        session.settings.scroll_control = false;
    }

    let mut config = StartupConfig::from_env();
    if cli.no_init {
        config = config.without_init_scripts();
    }
    for path in &cli.init {
        config = config.with_script(path);
    }
    let loaded = session.apply_startup(&config)?;
    debug!("loaded {} init scripts", loaded);

    if config.show_banner && !cli.batch {
        writeln!(session.out(), "mdb {}, a debugger command interpreter.", env!("CARGO_PKG_VERSION"))?;
        writeln!(session.out(), "Type `help' for help.")?;
    }

    let outcome = demo::run(&mut session, &program, cli.batch).context("mdb: fatal error")?;
    match outcome {
        Outcome::Finished(events) => {
            info!("program finished after {} events", events);
            writeln!(session.out(), "mdb: program finished after {} events.", events)?;
        }
        Outcome::Quit => info!("quit"),
    }
    session.console.flush()?;
    Ok(())
}

/// ログの出力先は標準エラー。`MDB_LOG` がなければ warn（`-v` なら debug）
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// 端末なら rustyline、そうでなければ標準入力から行を読む
fn line_input(batch: bool) -> Result<Box<dyn LineInput>> {
    if batch || !std::io::stdin().is_terminal() {
        return Ok(Box::new(StdinInput));
    }
    Ok(Box::new(TerminalInput::new()?))
}
