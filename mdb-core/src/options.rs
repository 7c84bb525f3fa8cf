//! コマンドオプションの解析
//!
//! オプションの族ごとに clap の `Parser` を derive し、`words` をそのまま渡して解析します。
//! `words[0]` はコマンド名です。
//!
//! * 短いオプションはまとめて書ける（`-ns`）
//! * 引数は続けても離しても書ける（`-d5`、`-d 5`）
//! * 長いオプションは `=` か次の単語で引数を取り、一意な接頭辞で省略できる
//! * `--` でオプションの終わりを示す。最初の非オプション以降はすべて位置引数
//! * 同じオプションを繰り返すと後のものが勝つ
//!
//! 各アダプタは `(最初の位置引数の添字, 解析結果)` を返します。
//! 失敗したときの使い方エラーの表示は呼び出し側が行います。

use crate::breakpoint::{IgnoreWhen, PrintItem, SpyAction};
use crate::directive::PrintLevel;
use crate::errors::UsageError;
use crate::runtime::{DdSearchMode, RetryIoPolicy};
use crate::settings::{BrowseCaller, PrintFormat, Scope};
use crate::words::parse_natural;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, ArgMatches, Args, Command, CommandFactory, FromArgMatches, Parser};

/// オプションの後ろに続く位置引数
const OPERANDS: &str = "operands";

/// 解析結果と、出現位置を調べるための `ArgMatches`
struct Parsed<P> {
    first: usize,
    args: P,
    matches: ArgMatches,
}

fn parse<P: CommandFactory + FromArgMatches>(words: &[String]) -> Result<Parsed<P>, UsageError> {
    let mut cmd = P::command()
        .disable_help_flag(true)
        .disable_version_flag(true)
        .infer_long_args(true)
        .args_override_self(true)
        .arg(
            Arg::new(OPERANDS)
                .num_args(1..)
                .action(ArgAction::Append)
                .trailing_var_arg(true),
        );
    let matches = cmd
        .try_get_matches_from_mut(words)
        .map_err(|e| usage_error(&cmd, &e))?;
    let args = P::from_arg_matches(&matches).map_err(|e| usage_error(&cmd, &e))?;
    let operands = matches.get_many::<String>(OPERANDS).map_or(0, |values| values.len());
    Ok(Parsed {
        first: words.len() - operands,
        args,
        matches,
    })
}

fn context(err: &clap::Error, kind: ContextKind) -> Option<String> {
    match err.get(kind)? {
        ContextValue::String(s) => Some(s.clone()),
        ContextValue::Strings(v) => v.first().cloned(),
        _ => None,
    }
}

/// `--frame-limit <FRAME_LIMIT>` のような表示からオプション名だけを取り出す
fn option_name(rendered: String) -> String {
    match rendered.split_once(' ') {
        Some((name, _)) => name.to_string(),
        None => rendered,
    }
}

fn is_ambiguous(cmd: &Command, arg: &str) -> bool {
    let Some(prefix) = arg.strip_prefix("--") else {
        return false;
    };
    let prefix = prefix.split_once('=').map_or(prefix, |(name, _)| name);
    cmd.get_arguments()
        .filter(|a| {
            a.get_long()
                .into_iter()
                .chain(a.get_all_aliases().unwrap_or_default())
                .any(|name| name.starts_with(prefix))
        })
        .count()
        > 1
}

fn usage_error(cmd: &Command, err: &clap::Error) -> UsageError {
    let arg = context(err, ContextKind::InvalidArg).map(option_name).unwrap_or_default();
    match err.kind() {
        ErrorKind::UnknownArgument if is_ambiguous(cmd, &arg) => UsageError::AmbiguousOption(arg),
        ErrorKind::InvalidValue | ErrorKind::ValueValidation => {
            match context(err, ContextKind::InvalidValue) {
                Some(value) if !value.is_empty() => UsageError::BadValue { option: arg, value },
                _ => UsageError::MissingArgument(arg),
            }
        }
        ErrorKind::NoEquals | ErrorKind::TooFewValues => UsageError::MissingArgument(arg),
        ErrorKind::TooManyValues => UsageError::UnexpectedArgument(arg),
        ErrorKind::ArgumentConflict => {
            let prior = context(err, ContextKind::PriorArg).map(option_name).unwrap_or_default();
            UsageError::Conflict(arg, prior)
        }
        _ => UsageError::UnknownOption(arg),
    }
}

fn natural(value: &str) -> Result<usize, String> {
    parse_natural(value).ok_or_else(|| format!("`{}' is not a natural number", value))
}

fn search_mode(value: &str) -> Result<DdSearchMode, String> {
    DdSearchMode::parse(value).ok_or_else(|| format!("unknown search mode `{}'", value))
}

/// `-f`/`-r`/`-v`/`-p`。後に書いたものが勝つ
#[derive(Args, Debug)]
struct FormatFlags {
    #[arg(short, long, overrides_with_all = ["raw_pretty", "verbose", "pretty"])]
    flat: bool,
    #[arg(short, long = "raw_pretty", overrides_with_all = ["flat", "verbose", "pretty"])]
    raw_pretty: bool,
    #[arg(short, long, overrides_with_all = ["flat", "raw_pretty", "pretty"])]
    verbose: bool,
    #[arg(short, long, overrides_with_all = ["flat", "raw_pretty", "verbose"])]
    pretty: bool,
}

impl FormatFlags {
    fn selected(&self) -> Option<PrintFormat> {
        if self.flat {
            Some(PrintFormat::Flat)
        } else if self.raw_pretty {
            Some(PrintFormat::RawPretty)
        } else if self.verbose {
            Some(PrintFormat::Verbose)
        } else if self.pretty {
            Some(PrintFormat::Pretty)
        } else {
            None
        }
    }
}

/// 移動コマンドのオプション
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementOpts {
    pub strict: Option<bool>,
    pub print_level: Option<PrintLevel>,
    pub integrity: bool,
}

#[derive(Parser, Debug)]
struct MovementArgs {
    #[arg(short = 'N', long, overrides_with = "strict")]
    nostrict: bool,
    #[arg(short = 'S', long, overrides_with = "nostrict")]
    strict: bool,
    #[arg(short, long, overrides_with_all = ["none", "some"])]
    all: bool,
    #[arg(short, long, overrides_with_all = ["all", "some"])]
    none: bool,
    #[arg(short, long, overrides_with_all = ["all", "none"])]
    some: bool,
    #[arg(short, long)]
    integrity: bool,
}

/// `-NSans`（整合性検査が使えるなら `-i` も）
pub fn movement(words: &[String], integrity_allowed: bool) -> Result<(usize, MovementOpts), UsageError> {
    let Parsed { first, args, .. } = parse::<MovementArgs>(words)?;
    if args.integrity && !integrity_allowed {
        return Err(UsageError::UnknownOption("-i".to_string()));
    }
    let strict = match (args.strict, args.nostrict) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    let print_level = if args.all {
        Some(PrintLevel::All)
    } else if args.none {
        Some(PrintLevel::None)
    } else if args.some {
        Some(PrintLevel::Some)
    } else {
        None
    };
    Ok((
        first,
        MovementOpts {
            strict,
            print_level,
            integrity: args.integrity,
        },
    ))
}

/// `retry` のオプション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryOpts {
    pub io_policy: RetryIoPolicy,
    pub assume_all_io_is_tabled: bool,
}

#[derive(Parser, Debug)]
struct RetryArgs {
    #[arg(short, long)]
    assume_all_io_is_tabled: bool,
    #[arg(short, long, overrides_with_all = ["interactive", "only_if_safe"])]
    force: bool,
    #[arg(short, long, overrides_with_all = ["force", "only_if_safe"])]
    interactive: bool,
    #[arg(short, long, overrides_with_all = ["force", "interactive"])]
    only_if_safe: bool,
}

pub fn retry(words: &[String]) -> Result<(usize, RetryOpts), UsageError> {
    let Parsed { first, args, .. } = parse::<RetryArgs>(words)?;
    let io_policy = if args.force {
        RetryIoPolicy::Force
    } else if args.only_if_safe {
        RetryIoPolicy::OnlyIfSafe
    } else {
        RetryIoPolicy::Interactive
    };
    Ok((
        first,
        RetryOpts {
            io_policy,
            assume_all_io_is_tabled: args.assume_all_io_is_tabled,
        },
    ))
}

#[derive(Parser, Debug)]
struct DetailedArgs {
    #[arg(short, long)]
    detailed: bool,
}

/// `level`/`up`/`down` の `-d`
pub fn detailed(words: &[String]) -> Result<(usize, bool), UsageError> {
    let Parsed { first, args, .. } = parse::<DetailedArgs>(words)?;
    Ok((first, args.detailed))
}

/// `print`/`browse` のオプション
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOpts {
    pub format: Option<PrintFormat>,
    pub xml: bool,
}

#[derive(Parser, Debug)]
struct FormatArgs {
    #[command(flatten)]
    format: FormatFlags,
    #[arg(short, long)]
    xml: bool,
}

/// `-frvp`（`browse` では `-x` も）
pub fn format(words: &[String], allow_xml: bool) -> Result<(usize, FormatOpts), UsageError> {
    let Parsed { first, args, .. } = parse::<FormatArgs>(words)?;
    if args.xml && !allow_xml {
        return Err(UsageError::UnknownOption("-x".to_string()));
    }
    Ok((
        first,
        FormatOpts {
            format: args.format.selected(),
            xml: args.xml,
        },
    ))
}

/// `stack`/`nondet_stack` のオプション
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StackOpts {
    pub detailed: bool,
    /// 0 は無制限
    pub frame_limit: usize,
}

#[derive(Parser, Debug)]
struct StackArgs {
    #[arg(short, long)]
    detailed: bool,
    #[arg(short, long, default_value_t = 0, value_parser = natural)]
    frame_limit: usize,
}

pub fn stack(words: &[String]) -> Result<(usize, StackOpts), UsageError> {
    let Parsed { first, args, .. } = parse::<StackArgs>(words)?;
    Ok((
        first,
        StackOpts {
            detailed: args.detailed,
            frame_limit: args.frame_limit,
        },
    ))
}

/// `set` のブラウザ設定の対象
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamOpts {
    pub callers: Vec<BrowseCaller>,
    pub formats: Vec<PrintFormat>,
}

/// 形式は複数指定でき、全部が対象になる
#[derive(Parser, Debug)]
struct ParamArgs {
    #[arg(short = 'P', long)]
    print: bool,
    #[arg(short = 'B', long)]
    browse: bool,
    #[arg(short = 'A', long)]
    print_all: bool,
    #[arg(short, long)]
    flat: bool,
    #[arg(short, long = "raw_pretty")]
    raw_pretty: bool,
    #[arg(short, long)]
    verbose: bool,
    #[arg(short, long)]
    pretty: bool,
}

/// 出現順に並べる
fn in_order<T: Copy>(matches: &ArgMatches, candidates: &[(&str, bool, T)]) -> Vec<T> {
    let mut given: Vec<(usize, T)> = candidates
        .iter()
        .filter(|(_, set, _)| *set)
        .map(|(id, _, value)| (matches.index_of(id).unwrap_or(0), *value))
        .collect();
    given.sort_by_key(|(index, _)| *index);
    given.into_iter().map(|(_, value)| value).collect()
}

pub fn param(words: &[String]) -> Result<(usize, ParamOpts), UsageError> {
    let Parsed { first, args, matches } = parse::<ParamArgs>(words)?;
    let callers = in_order(
        &matches,
        &[
            ("print", args.print, BrowseCaller::Print),
            ("browse", args.browse, BrowseCaller::Browse),
            ("print_all", args.print_all, BrowseCaller::PrintAll),
        ],
    );
    let formats = in_order(
        &matches,
        &[
            ("flat", args.flat, PrintFormat::Flat),
            ("raw_pretty", args.raw_pretty, PrintFormat::RawPretty),
            ("verbose", args.verbose, PrintFormat::Verbose),
            ("pretty", args.pretty, PrintFormat::Pretty),
        ],
    );
    Ok((first, ParamOpts { callers, formats }))
}

/// `view` のオプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOpts {
    pub close: bool,
    pub window_command: Option<String>,
    pub server_command: Option<String>,
    pub server_name: Option<String>,
    pub timeout: usize,
    pub force: bool,
    pub verbose: bool,
    pub split_screen: bool,
}

/// 接続待ちの既定の秒数
pub const DEFAULT_VIEW_TIMEOUT: usize = 8;

impl Default for ViewOpts {
    fn default() -> Self {
        Self {
            close: false,
            window_command: None,
            server_command: None,
            server_name: None,
            timeout: DEFAULT_VIEW_TIMEOUT,
            force: false,
            verbose: false,
            split_screen: false,
        }
    }
}

/// `-c` はウィンドウを開くためのオプションと一緒に使えない
#[derive(Parser, Debug)]
struct ViewArgs {
    #[arg(
        short,
        long,
        conflicts_with_all = ["window_command", "server_command", "server_name", "timeout", "force", "split_screen"]
    )]
    close: bool,
    #[arg(short, long)]
    window_command: Option<String>,
    #[arg(short, long)]
    server_command: Option<String>,
    #[arg(short = 'n', long)]
    server_name: Option<String>,
    #[arg(short, long, default_value_t = DEFAULT_VIEW_TIMEOUT, value_parser = natural)]
    timeout: usize,
    #[arg(short, long)]
    force: bool,
    #[arg(short, long)]
    verbose: bool,
    #[arg(short = '2', long)]
    split_screen: bool,
}

pub fn view(words: &[String]) -> Result<(usize, ViewOpts), UsageError> {
    let Parsed { first, args, .. } = parse::<ViewArgs>(words)?;
    Ok((
        first,
        ViewOpts {
            close: args.close,
            window_command: args.window_command,
            server_command: args.server_command,
            server_name: args.server_name,
            timeout: args.timeout,
            force: args.force,
            verbose: args.verbose,
            split_screen: args.split_screen,
        },
    ))
}

/// `diff` のオプション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOpts {
    pub start: usize,
    pub max: usize,
}

#[derive(Parser, Debug)]
struct DiffArgs {
    #[arg(short, long, default_value_t = 0, value_parser = natural)]
    start: usize,
    #[arg(short, long, default_value_t = 20, value_parser = natural)]
    max: usize,
}

pub fn diff(words: &[String]) -> Result<(usize, DiffOpts), UsageError> {
    let Parsed { first, args, .. } = parse::<DiffArgs>(words)?;
    Ok((
        first,
        DiffOpts {
            start: args.start,
            max: args.max,
        },
    ))
}

#[derive(Parser, Debug)]
struct XmlArgs {
    #[arg(short, long)]
    xml: bool,
}

/// `dump` の `-x`
pub fn dump(words: &[String]) -> Result<(usize, bool), UsageError> {
    let Parsed { first, args, .. } = parse::<XmlArgs>(words)?;
    Ok((first, args.xml))
}

/// 複数の手続きに一致したときの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiMatch {
    Ask,
    All,
    One,
}

/// `break` のオプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakOpts {
    pub scope: Scope,
    pub action: SpyAction,
    pub multi_match: MultiMatch,
    pub ignore_when: IgnoreWhen,
    pub ignore_count: usize,
    pub print_list: Vec<PrintItem>,
}

#[derive(Parser, Debug)]
struct BreakArgs {
    #[arg(short = 'A', long, overrides_with = "select_one")]
    select_all: bool,
    #[arg(short = 'O', long, overrides_with = "select_all")]
    select_one: bool,
    #[arg(short = 'E', long, value_parser = natural, overrides_with = "ignore_interface")]
    ignore_entry: Option<usize>,
    #[arg(short = 'I', long, value_parser = natural, overrides_with = "ignore_entry")]
    ignore_interface: Option<usize>,
    #[arg(short = 'P', long, overrides_with = "stop")]
    print: bool,
    #[arg(short = 'S', long, overrides_with = "print")]
    stop: bool,
    #[arg(short, long, overrides_with_all = ["entry", "interface"])]
    all: bool,
    #[arg(short, long, overrides_with_all = ["all", "interface"])]
    entry: bool,
    #[arg(short, long, overrides_with_all = ["all", "entry"])]
    interface: bool,
    #[arg(short, long)]
    no_warn: bool,
    #[arg(short = 'p', long, action = ArgAction::Append)]
    print_list: Vec<String>,
}

/// `-n` はそれ以降の `-p` にだけ効く
pub fn break_opts(words: &[String], default_scope: Scope) -> Result<(usize, BreakOpts), UsageError> {
    let Parsed { first, args, matches } = parse::<BreakArgs>(words)?;
    let scope = if args.all {
        Scope::All
    } else if args.entry {
        Scope::Entry
    } else if args.interface {
        Scope::Interface
    } else {
        default_scope
    };
    let (ignore_when, ignore_count) = match (args.ignore_entry, args.ignore_interface) {
        (_, Some(count)) => (IgnoreWhen::Interface, count),
        (Some(count), _) => (IgnoreWhen::Entry, count),
        _ => (IgnoreWhen::Entry, 0),
    };

    let no_warn_from = if args.no_warn {
        matches.index_of("no_warn")
    } else {
        None
    };
    let positions: Vec<usize> = matches
        .indices_of("print_list")
        .map(|indices| indices.collect())
        .unwrap_or_default();
    let print_list = args
        .print_list
        .iter()
        .zip(positions.iter().copied().chain(std::iter::repeat(0)))
        .map(|(item, pos)| {
            let warn = no_warn_from.map_or(true, |from| pos < from);
            PrintItem::parse(item, PrintFormat::Flat, warn)
        })
        .collect();

    Ok((
        first,
        BreakOpts {
            scope,
            action: if args.print { SpyAction::Print } else { SpyAction::Stop },
            multi_match: if args.select_all {
                MultiMatch::All
            } else if args.select_one {
                MultiMatch::One
            } else {
                MultiMatch::Ask
            },
            ignore_when,
            ignore_count,
            print_list,
        },
    ))
}

/// `condition` のオプション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionOpts {
    pub break_num: Option<usize>,
    pub require_var: bool,
    pub require_path: bool,
}

#[derive(Parser, Debug)]
struct ConditionArgs {
    #[arg(short = 'n', long, value_parser = natural)]
    break_num: Option<usize>,
    /// パスの検査もしない
    #[arg(short = 'v', long)]
    dont_require_var: bool,
    #[arg(short = 'p', long)]
    dont_require_path: bool,
}

pub fn condition(words: &[String]) -> Result<(usize, ConditionOpts), UsageError> {
    let Parsed { first, args, .. } = parse::<ConditionArgs>(words)?;
    Ok((
        first,
        ConditionOpts {
            break_num: args.break_num,
            require_var: !args.dont_require_var,
            require_path: !args.dont_require_var && !args.dont_require_path,
        },
    ))
}

#[derive(Parser, Debug)]
struct IgnoreArgs {
    #[arg(short = 'E', long, value_parser = natural, overrides_with = "ignore_interface")]
    ignore_entry: Option<usize>,
    #[arg(short = 'I', long, value_parser = natural, overrides_with = "ignore_entry")]
    ignore_interface: Option<usize>,
}

/// `ignore` の `-E N`/`-I N`（既定は entry で 1 回）
pub fn ignore(words: &[String]) -> Result<(usize, (IgnoreWhen, usize)), UsageError> {
    let Parsed { first, args, .. } = parse::<IgnoreArgs>(words)?;
    let result = match (args.ignore_entry, args.ignore_interface) {
        (_, Some(count)) => (IgnoreWhen::Interface, count),
        (Some(count), _) => (IgnoreWhen::Entry, count),
        _ => (IgnoreWhen::Entry, 1),
    };
    Ok((first, result))
}

/// `break_print` のオプション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakPrintOpts {
    pub at_start: bool,
    pub warn: bool,
    pub format: PrintFormat,
}

#[derive(Parser, Debug)]
struct BreakPrintArgs {
    #[arg(short, long)]
    end: bool,
    #[arg(short, long)]
    no_warn: bool,
    #[command(flatten)]
    format: FormatFlags,
}

pub fn break_print(words: &[String]) -> Result<(usize, BreakPrintOpts), UsageError> {
    let Parsed { first, args, .. } = parse::<BreakPrintArgs>(words)?;
    Ok((
        first,
        BreakPrintOpts {
            at_start: !args.end,
            warn: !args.no_warn,
            format: args.format.selected().unwrap_or(PrintFormat::Flat),
        },
    ))
}

#[derive(Parser, Debug)]
struct RegisterArgs {
    #[arg(short, long, overrides_with = "verbose")]
    quiet: bool,
    #[arg(short, long, overrides_with = "quiet")]
    verbose: bool,
}

/// `register` の `-q`/`-v`。戻り値は詳細表示するかどうか
pub fn register(words: &[String]) -> Result<(usize, bool), UsageError> {
    let Parsed { first, args, .. } = parse::<RegisterArgs>(words)?;
    Ok((first, args.verbose))
}

#[derive(Parser, Debug)]
struct SourceArgs {
    #[arg(short, long)]
    ignore_errors: bool,
}

/// `source` の `-i`
pub fn source(words: &[String]) -> Result<(usize, bool), UsageError> {
    let Parsed { first, args, .. } = parse::<SourceArgs>(words)?;
    Ok((first, args.ignore_errors))
}

/// 長いオプションはない
#[derive(Parser, Debug)]
struct QuitArgs {
    #[arg(short = 'y', short_alias = 'Y', overrides_with = "no")]
    yes: bool,
    #[arg(short = 'n', short_alias = 'N', overrides_with = "yes")]
    no: bool,
}

/// `quit` の `-y`/`-n`。指定がなければ `None`（確認する）
pub fn quit(words: &[String]) -> Result<(usize, Option<bool>), UsageError> {
    let Parsed { first, args, .. } = parse::<QuitArgs>(words)?;
    let confirmed = match (args.yes, args.no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    Ok((first, confirmed))
}

/// `dd` のオプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdOpts {
    pub assume_all_io_is_tabled: bool,
    pub depth: Option<usize>,
    pub nodes: Option<usize>,
    pub resume: bool,
    pub search_mode: Option<DdSearchMode>,
    pub pass_trace_counts: Option<String>,
    pub fail_trace_counts: Option<String>,
    pub test: bool,
    pub debug: bool,
    /// `-z` と一緒に渡された、木を書き出すファイル
    pub dump_file: Option<String>,
}

#[derive(Parser, Debug)]
struct DdArgs {
    #[arg(short, long)]
    assume_all_io_is_tabled: bool,
    #[arg(short = 'z', long)]
    debug: bool,
    #[arg(short, long, value_parser = natural)]
    depth: Option<usize>,
    #[arg(short, long, value_parser = natural)]
    nodes: Option<usize>,
    #[arg(short, long)]
    resume: bool,
    #[arg(short, long, value_parser = search_mode)]
    search_mode: Option<DdSearchMode>,
    #[arg(short, long, alias = "pass-trace-count")]
    pass_trace_counts: Option<String>,
    #[arg(short, long, alias = "fail-trace-count")]
    fail_trace_counts: Option<String>,
    #[arg(short, long)]
    test: bool,
}

pub fn dd(words: &[String]) -> Result<(usize, DdOpts), UsageError> {
    let Parsed { first, args, .. } = parse::<DdArgs>(words)?;
    Ok((
        first,
        DdOpts {
            assume_all_io_is_tabled: args.assume_all_io_is_tabled,
            depth: args.depth,
            nodes: args.nodes,
            resume: args.resume,
            search_mode: args.search_mode,
            pass_trace_counts: args.pass_trace_counts,
            fail_trace_counts: args.fail_trace_counts,
            test: args.test,
            debug: args.debug,
            dump_file: None,
        },
    ))
}

/// `dice` のオプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceOpts {
    pub pass_trace_counts: Option<String>,
    pub fail_trace_counts: Option<String>,
    pub sort: Option<String>,
    pub lines: usize,
    pub out_file: Option<String>,
    pub module: Option<String>,
}

/// `dice` の既定の表示行数
pub const DEFAULT_DICE_LINES: usize = 50;

#[derive(Parser, Debug)]
struct DiceArgs {
    #[arg(short, long)]
    pass_trace_counts: Option<String>,
    #[arg(short, long)]
    fail_trace_counts: Option<String>,
    #[arg(short, long)]
    sort: Option<String>,
    #[arg(short = 'n', long = "top", default_value_t = DEFAULT_DICE_LINES, value_parser = natural)]
    lines: usize,
    #[arg(short = 'o', long = "output-to-file")]
    out_file: Option<String>,
    #[arg(short, long)]
    module: Option<String>,
}

pub fn dice(words: &[String]) -> Result<(usize, DiceOpts), UsageError> {
    let Parsed { first, args, .. } = parse::<DiceArgs>(words)?;
    Ok((
        first,
        DiceOpts {
            pass_trace_counts: args.pass_trace_counts,
            fail_trace_counts: args.fail_trace_counts,
            sort: args.sort,
            lines: args.lines,
            out_file: args.out_file,
            module: args.module,
        },
    ))
}

/// `all_procedures` のオプション
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllProceduresOpts {
    pub separate: bool,
    pub uci: bool,
    pub module: Option<String>,
}

#[derive(Parser, Debug)]
struct AllProceduresArgs {
    #[arg(short, long)]
    separate: bool,
    #[arg(short, long)]
    uci: bool,
    #[arg(short, long)]
    module: Option<String>,
}

pub fn all_procedures(words: &[String]) -> Result<(usize, AllProceduresOpts), UsageError> {
    let Parsed { first, args, .. } = parse::<AllProceduresArgs>(words)?;
    Ok((
        first,
        AllProceduresOpts {
            separate: args.separate,
            uci: args.uci,
            module: args.module,
        },
    ))
}

#[derive(Parser, Debug)]
struct AmbiguityArgs {
    #[arg(short = 'o', long)]
    outputfile: Option<String>,
}

/// `ambiguity` の `-o FILE`
pub fn ambiguity(words: &[String]) -> Result<(usize, Option<String>), UsageError> {
    let Parsed { first, args, .. } = parse::<AmbiguityArgs>(words)?;
    Ok((first, args.outputfile))
}

#[derive(Parser, Debug)]
struct StatsArgs {
    #[arg(short, long)]
    file: Option<String>,
}

/// `stats` の `-f FILE`
pub fn stats(words: &[String]) -> Result<(usize, Option<String>), UsageError> {
    let Parsed { first, args, .. } = parse::<StatsArgs>(words)?;
    Ok((first, args.file))
}

#[derive(Parser, Debug)]
struct TypeCtorArgs {
    #[arg(short = 'r', long)]
    print_rep: bool,
    #[arg(short = 'f', long)]
    print_functors: bool,
}

/// `type_ctor`/`all_type_ctors` の `-r`/`-f`
pub fn type_ctor(words: &[String]) -> Result<(usize, (bool, bool)), UsageError> {
    let Parsed { first, args, .. } = parse::<TypeCtorArgs>(words)?;
    Ok((first, (args.print_rep, args.print_functors)))
}

#[derive(Parser, Debug)]
struct ClassDeclArgs {
    #[arg(short = 'm', long)]
    print_methods: bool,
    #[arg(short = 'i', long)]
    print_instances: bool,
}

/// `class_decl`/`all_class_decls` の `-m`/`-i`
pub fn class_decl(words: &[String]) -> Result<(usize, (bool, bool)), UsageError> {
    let Parsed { first, args, .. } = parse::<ClassDeclArgs>(words)?;
    Ok((first, (args.print_methods, args.print_instances)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoint::PrintTarget;

    fn words(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_clusters_and_attached_arguments() {
        let (first, opts) = dd(&words("dd -ar -d5 -n 6 rest -a")).unwrap();
        assert_eq!(first, 5);
        assert!(opts.assume_all_io_is_tabled && opts.resume);
        assert_eq!(opts.depth, Some(5));
        assert_eq!(opts.nodes, Some(6));
    }

    #[test]
    fn test_long_options_and_terminator() {
        let (first, opts) = stack(&words("stack --det --frame-limit=3 -- -d")).unwrap();
        assert_eq!(first, 4);
        assert!(opts.detailed);
        assert_eq!(opts.frame_limit, 3);

        assert!(matches!(
            stack(&words("stack --frame-limit")),
            Err(UsageError::MissingArgument(_))
        ));
        assert!(matches!(
            stack(&words("stack --detailed=yes")),
            Err(UsageError::UnexpectedArgument(_))
        ));
        assert_eq!(stack(&words("stack --")).unwrap().0, 2);
    }

    #[test]
    fn test_rejects_unknown_and_ambiguous() {
        assert_eq!(
            movement(&words("step -q"), false).unwrap_err(),
            UsageError::UnknownOption("-q".to_string())
        );
        assert_eq!(
            movement(&words("step --s"), false).unwrap_err(),
            UsageError::AmbiguousOption("--s".to_string())
        );
        assert!(movement(&words("step -i"), false).is_err());
        assert!(movement(&words("step -i"), true).unwrap().1.integrity);
    }

    #[test]
    fn test_movement_options() {
        let (first, opts) = movement(&words("next -Sn 3"), false).unwrap();
        assert_eq!(first, 2);
        assert_eq!(opts.strict, Some(true));
        assert_eq!(opts.print_level, Some(PrintLevel::None));

        let (_, opts) = movement(&words("step --nostrict --all"), false).unwrap();
        assert_eq!(opts.strict, Some(false));
        assert_eq!(opts.print_level, Some(PrintLevel::All));
    }

    #[test]
    fn test_later_option_wins() {
        let (_, opts) = movement(&words("step -a -n -S -N"), false).unwrap();
        assert_eq!(opts.strict, Some(false));
        assert_eq!(opts.print_level, Some(PrintLevel::None));

        let (_, opts) = format(&words("print -p -f X"), false).unwrap();
        assert_eq!(opts.format, Some(PrintFormat::Flat));
        assert!(register(&words("register -q -v")).unwrap().1);
        assert!(!register(&words("register -v -q")).unwrap().1);
        assert_eq!(stats(&words("stats -f a -f b")).unwrap().1.as_deref(), Some("b"));
    }

    #[test]
    fn test_format_rejects_xml_for_print() {
        assert!(format(&words("print -x X"), false).is_err());
        let (first, opts) = format(&words("browse -x X"), true).unwrap();
        assert_eq!(first, 2);
        assert!(opts.xml);
        let (_, opts) = format(&words("print --raw X"), false).unwrap();
        assert_eq!(opts.format, Some(PrintFormat::RawPretty));
    }

    #[test]
    fn test_param_keeps_given_order() {
        let (first, opts) = param(&words("set -B -P -v -f depth 3")).unwrap();
        assert_eq!(first, 5);
        assert_eq!(opts.callers, vec![BrowseCaller::Browse, BrowseCaller::Print]);
        assert_eq!(opts.formats, vec![PrintFormat::Verbose, PrintFormat::Flat]);
    }

    #[test]
    fn test_view_close_conflicts() {
        assert!(view(&words("view -c")).unwrap().1.close);
        assert!(view(&words("view -c -v")).unwrap().1.verbose);
        assert!(matches!(view(&words("view -c -w xterm")), Err(UsageError::Conflict(_, _))));
        assert!(matches!(view(&words("view -f -c")), Err(UsageError::Conflict(_, _))));
        let (_, opts) = view(&words("view -t 3 -2")).unwrap();
        assert_eq!(opts.timeout, 3);
        assert!(opts.split_screen);
        assert_eq!(view(&words("view")).unwrap().1.timeout, DEFAULT_VIEW_TIMEOUT);
        assert!(matches!(
            view(&words("view -t soon")),
            Err(UsageError::BadValue { value, .. }) if value == "soon"
        ));
    }

    #[test]
    fn test_break_no_warn_applies_to_later_items() {
        let (first, opts) =
            break_opts(&words("break -p X -n -p goal -I 3 -P foo"), Scope::Interface).unwrap();
        assert_eq!(first, 8);
        assert_eq!(opts.ignore_when, IgnoreWhen::Interface);
        assert_eq!(opts.ignore_count, 3);
        assert_eq!(opts.action, SpyAction::Print);
        assert_eq!(opts.print_list.len(), 2);
        assert!(opts.print_list[0].warn);
        assert_eq!(opts.print_list[0].target, PrintTarget::Var("X".to_string()));
        assert!(!opts.print_list[1].warn);
        assert_eq!(opts.print_list[1].target, PrintTarget::Goal);
    }

    #[test]
    fn test_break_defaults_and_scope() {
        let (first, opts) = break_opts(&words("break -e -A foo"), Scope::Interface).unwrap();
        assert_eq!(first, 3);
        assert_eq!(opts.scope, Scope::Entry);
        assert_eq!(opts.multi_match, MultiMatch::All);
        assert_eq!(opts.action, SpyAction::Stop);
        assert_eq!((opts.ignore_when, opts.ignore_count), (IgnoreWhen::Entry, 0));
        assert_eq!(break_opts(&words("break foo"), Scope::All).unwrap().1.scope, Scope::All);
    }

    #[test]
    fn test_condition_flags() {
        let (_, opts) = condition(&words("condition -v X = 1")).unwrap();
        assert!(!opts.require_var && !opts.require_path);
        let (_, opts) = condition(&words("condition -n 2 -p X = 1")).unwrap();
        assert_eq!(opts.break_num, Some(2));
        assert!(opts.require_var && !opts.require_path);
    }

    #[test]
    fn test_ignore_defaults_to_one_entry() {
        assert_eq!(ignore(&words("ignore 3")).unwrap(), (1, (IgnoreWhen::Entry, 1)));
        assert_eq!(
            ignore(&words("ignore -E 2 -I 4 3")).unwrap(),
            (5, (IgnoreWhen::Interface, 4))
        );
    }

    #[test]
    fn test_quit_and_dd() {
        assert_eq!(quit(&words("quit -y")).unwrap(), (2, Some(true)));
        assert_eq!(quit(&words("quit -Y -N")).unwrap(), (3, Some(false)));
        assert_eq!(quit(&words("quit")).unwrap(), (1, None));
        assert!(quit(&words("quit --yes")).is_err());

        let (first, opts) = dd(&words("dd -s sdq --pass-trace-count p.tc -d 4")).unwrap();
        assert_eq!(first, 7);
        assert_eq!(opts.search_mode, Some(DdSearchMode::SuspicionDivideAndQuery));
        assert_eq!(opts.pass_trace_counts.as_deref(), Some("p.tc"));
        assert_eq!(opts.depth, Some(4));
        let (_, opts) = dd(&words("dd --pass f.tc")).unwrap();
        assert_eq!(opts.pass_trace_counts.as_deref(), Some("f.tc"));
        assert!(matches!(
            dd(&words("dd -s sideways")),
            Err(UsageError::BadValue { .. })
        ));
    }

    #[test]
    fn test_dice_defaults() {
        let (first, opts) = dice(&words("dice --top 5 -m foo")).unwrap();
        assert_eq!(first, 5);
        assert_eq!(opts.lines, 5);
        assert_eq!(opts.module.as_deref(), Some("foo"));
        assert_eq!(dice(&words("dice")).unwrap().1.lines, DEFAULT_DICE_LINES);
    }
}
