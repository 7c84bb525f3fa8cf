//! コマンドの解釈と対話ループ
//!
//! 実行エンジンは停止するたびに `enter_interactive`（対話する場合）か
//! `report_stop_event`（報告だけする場合）を呼びます。

use crate::breakpoint::{PrintItem, PrintTarget, SpyId};
use crate::command::{Command, Feature};
use crate::directive::{Directive, PrintLevel, StopPolicy};
use crate::errors::ERR_UNKNOWN_COMMAND;
use crate::event::Event;
use crate::handlers::handler_for;
use crate::runtime::BrowseTarget;
use crate::session::Session;
use crate::settings::{BrowseCaller, ContextPosition, Settings};
use crate::words::parse_line;
use crate::Result;
use mdb_table::TableError;
use std::io::Write;
use tracing::{debug, warn};

/// 対話ループのプロンプト
pub const PROMPT: &str = "mdb> ";

/// スクロール制御のプロンプト
pub const MORE_PROMPT: &str = "--more-- ";

/// イベント番号などの欄の幅
const REPORT_INDENT: usize = 24;

/// 1行を単語に分け、エイリアスを展開してディスパッチする
pub fn handle_command(
    session: &mut Session,
    line: &str,
    policy: &mut StopPolicy,
    event: &Event,
) -> Result<Directive> {
    let words = match parse_line(line) {
        Ok(words) => words,
        Err(e) => {
            writeln!(session.err(), "{}.", e)?;
            return Ok(Directive::KeepInteracting);
        }
    };

    let words = session.aliases.expand(words);
    if words.is_empty() {
        return Ok(Directive::KeepInteracting);
    }
    dispatch(session, &words, policy, event)
}

/// 先頭の単語でコマンドを引き、ハンドラを呼ぶ
///
/// ハンドラから漏れてきたエラーは `mdb: <error>.` として報告し、対話を続けます。
pub fn dispatch(
    session: &mut Session,
    words: &[String],
    policy: &mut StopPolicy,
    event: &Event,
) -> Result<Directive> {
    session.console.flush()?;
    let Some(name) = words.first() else {
        return Ok(Directive::KeepInteracting);
    };

    let Some(command) = Command::lookup(name) else {
        writeln!(session.err(), "Unknown command `{}'. {}", name, ERR_UNKNOWN_COMMAND)?;
        return Ok(Directive::KeepInteracting);
    };

    if !has_feature(session, command) {
        writeln!(
            session.err(),
            "mdb: the `{}' command is not available in this configuration.",
            name
        )?;
        return Ok(Directive::KeepInteracting);
    }

    debug!("dispatching {} {:?}", name, &words[1..]);
    match handler_for(command)(session, words, policy, event) {
        Ok(directive) => Ok(directive),
        // ランタイムの状態が壊れている場合は対話を続けない
        Err(e) if e.downcast_ref::<TableError>().is_some_and(TableError::is_internal) => Err(e),
        Err(e) => {
            warn!("{} failed: {:#}", name, e);
            session.problem(e)?;
            Ok(Directive::KeepInteracting)
        }
    }
}

fn has_feature(session: &Session, command: Command) -> bool {
    match command.feature() {
        Some(Feature::Histogram) => session.features.histogram,
        Some(Feature::MinimalModelStackCopy) => session.features.minimal_model_stack_copy,
        None => true,
    }
}

/// 実行を再開した後、途中のイベントを調べる必要があるか
pub fn event_must_be_checked(policy: &StopPolicy) -> bool {
    !policy.strict || policy.print_level != PrintLevel::None || policy.check_integrity
}

/// 停止イベントで対話する
///
/// イベントを報告してからコマンドを読み続け、実行を再開するコマンドが来たら
/// その方針を返します。`hits` はこのイベントで反応したブレークポイントです。
pub fn enter_interactive(session: &mut Session, event: &Event, hits: &[SpyId]) -> Result<StopPolicy> {
    if let Some((id, problem)) = session.condition_problem.take() {
        writeln!(session.err(), "mdb: couldn't evaluate break point condition")?;
        if let Some(cond) = session.spies.get(id).and_then(|p| p.condition.clone()) {
            write!(session.err(), "{} {} {}", cond.var, cond.test.symbol(), cond.term)?;
        }
        writeln!(session.err(), ": {}.", problem)?;
    }

    print_event_report(session, event)?;
    let verbose = false;
    session
        .collab
        .window
        .sync(event, verbose, session.console.out())?;
    print_hit_lists(session, event, hits)?;

    let mut policy = StopPolicy::new(session.settings.print_level);
    loop {
        let line = session.get_command(PROMPT)?;
        let directive = handle_command(session, &line, &mut policy, event)?;
        session.err().flush()?;
        if directive == Directive::StopInteracting {
            break;
        }
    }

    session.scroll_next = 0;
    debug!("resuming with {:?}", policy.command);
    Ok(policy)
}

/// 対話せずにイベントを報告する
///
/// スクロール制御が有効で画面が埋まりそうなら `--more--` で確認します。
/// 応答の先頭文字 `a`/`n`/`s` は途中のイベントの表示レベルを変え、`q` は
/// そのイベントで対話に入ります（`policy` は対話の結果で置き換わる）。
pub fn report_stop_event(
    session: &mut Session,
    policy: &mut StopPolicy,
    event: &Event,
    hits: &[SpyId],
) -> Result<()> {
    let list_len = print_items(session, hits).len();
    let limit = session.settings.scroll_limit.saturating_sub(1);
    if session.settings.scroll_control && session.scroll_next + list_len >= limit {
        while let Some(reply) = session.get_line(MORE_PROMPT)? {
            match reply.trim_start().chars().next() {
                Some('a') => policy.print_level = PrintLevel::All,
                Some('n') => policy.print_level = PrintLevel::None,
                Some('s') => policy.print_level = PrintLevel::Some,
                Some('q') => {
                    *policy = enter_interactive(session, event, hits)?;
                    return Ok(());
                }
                Some(_) => {
                    writeln!(session.err(), "unknown command, try again")?;
                    continue;
                }
                None => {}
            }
            break;
        }
        session.scroll_next = 0;
    }

    print_event_report(session, event)?;
    session.scroll_next += 1;
    session.scroll_next += print_hit_lists(session, event, hits)?;
    Ok(())
}

/// 現在のイベントの報告行を書く
pub fn print_event_report(session: &mut Session, event: &Event) -> Result<()> {
    let report = format_event_report(&session.settings, event);
    writeln!(session.out(), "{}", report)?;
    Ok(())
}

/// `   番号:  通し番号 深さ PORT 手続き [ゴールパス]` と文脈
pub fn format_event_report(settings: &Settings, event: &Event) -> String {
    let head = format!(
        "{:>8}: {:>6} {:>2} {}",
        event.number,
        event.call_seqno,
        event.depth,
        event.port.name()
    );
    let mut proc = event.proc.to_string();
    if settings.goal_paths && !event.goal_path.is_empty() {
        proc.push(' ');
        proc.push_str(&event.goal_path);
    }

    let Some(context) = event.context() else {
        return format!("{} {}", head, proc);
    };
    let indent = " ".repeat(REPORT_INDENT);
    match settings.context {
        ContextPosition::None => format!("{} {}", head, proc),
        ContextPosition::Before => format!("{} {} {}", head, context, proc),
        ContextPosition::After => format!("{} {} {}", head, proc, context),
        ContextPosition::PrevLine => format!("{}{}\n{} {}", indent, context, head, proc),
        ContextPosition::NextLine => format!("{} {}\n{}{}", head, proc, indent, context),
    }
}

fn print_items(session: &Session, hits: &[SpyId]) -> Vec<PrintItem> {
    hits.iter()
        .filter_map(|id| session.spies.get(*id))
        .flat_map(|point| point.print_list.iter().cloned())
        .collect()
}

/// 反応したブレークポイントの表示リストを表示し、表示した項目数を返す
fn print_hit_lists(session: &mut Session, event: &Event, hits: &[SpyId]) -> Result<usize> {
    let items = print_items(session, hits);
    for item in &items {
        let target = match &item.target {
            PrintTarget::AllVars => BrowseTarget::AllVars,
            PrintTarget::Goal => BrowseTarget::Goal,
            PrintTarget::Var(name) => BrowseTarget::Var(name.clone()),
        };
        let params = session.settings.browser.params(BrowseCaller::Print, item.format);
        let result = session.collab.inspector.print(
            event,
            &target,
            item.format,
            params,
            session.console.out(),
        );
        if let Err(e) = result {
            if item.warn {
                session.problem(e)?;
            }
        }
    }
    Ok(items.len())
}
