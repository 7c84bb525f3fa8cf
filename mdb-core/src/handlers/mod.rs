//! コマンドハンドラ
//!
//! すべてのハンドラは同じ形 `Handler` を持ち、`handler_for` でコマンドから引きます。
//! 使い方エラーや解決できない指定ではセッションの状態を変えません。
//! 実行を再開するハンドラは、成功したときだけ `policy` を書き換えます。

mod backward;
mod breakpoint;
mod browsing;
mod dd;
mod developer;
mod exp;
mod forward;
mod help;
mod misc;
mod parameter;
mod queries;
mod table_io;
#[cfg(test)]
mod testing;

use crate::command::Command;
use crate::directive::{Directive, StopPolicy};
use crate::errors::ERR_NO_OP;
use crate::event::Event;
use crate::session::Session;
use crate::Result;
use std::io::Write;

/// コマンドハンドラ
pub type Handler = fn(&mut Session, &[String], &mut StopPolicy, &Event) -> Result<Directive>;

/// コマンドに対応するハンドラ
pub fn handler_for(command: Command) -> Handler {
    use Command::*;
    match command {
        Step => forward::step,
        Goto => forward::goto,
        Next => forward::next,
        Finish => forward::finish,
        Fail => forward::fail,
        Exception => forward::exception,
        Return => forward::return_,
        Forward => forward::forward,
        MinDepth => forward::mindepth,
        MaxDepth => forward::maxdepth,
        Continue => forward::continue_,
        Retry => backward::retry,
        Level => browsing::level,
        Up => browsing::up,
        Down => browsing::down,
        Vars => browsing::vars,
        HeldVars => browsing::held_vars,
        Print => browsing::print,
        Browse => browsing::browse,
        Stack => browsing::stack,
        Current => browsing::current,
        View => browsing::view,
        Hold => browsing::hold,
        Diff => browsing::diff,
        Dump => browsing::dump,
        List => browsing::list,
        PushListDir => browsing::push_list_dir,
        PopListDir => browsing::pop_list_dir,
        Break => breakpoint::break_,
        Condition => breakpoint::condition,
        Ignore => breakpoint::ignore,
        BreakPrint => breakpoint::break_print,
        Enable => breakpoint::enable,
        Disable => breakpoint::disable,
        Delete => breakpoint::delete,
        Register => breakpoint::register,
        Modules => breakpoint::modules,
        Procedures => breakpoint::procedures,
        Query => queries::query,
        CcQuery => queries::cc_query,
        IoQuery => queries::io_query,
        TableIo => table_io::table_io,
        PrintLevel => parameter::printlevel,
        MmcOptions => parameter::mmc_options,
        Scroll => parameter::scroll,
        StackDefaultLimit => parameter::stack_default_limit,
        Context => parameter::context,
        GoalPaths => parameter::goal_paths,
        Scope => parameter::scope,
        Echo => parameter::echo,
        Alias => parameter::alias,
        Unalias => parameter::unalias,
        DocumentCategory => help::document_category,
        Document => help::document,
        Help => help::help,
        Dd => dd::dd,
        Trust => dd::trust,
        Untrust => dd::untrust,
        Trusted => dd::trusted,
        Set => misc::set,
        Source => misc::source,
        Save => misc::save,
        Quit => misc::quit,
        HistogramAll => exp::histogram_all,
        HistogramExp => exp::histogram_exp,
        ClearHistogram => exp::clear_histogram,
        Dice => exp::dice,
        VarDetails => developer::var_details,
        TermSize => developer::term_size,
        Flag => developer::flag,
        Subgoal => developer::subgoal,
        Consumer => developer::consumer,
        GenStack => developer::gen_stack,
        CutStack => developer::cut_stack,
        PnegStack => developer::pneg_stack,
        MmStacks => developer::mm_stacks,
        NondetStack => developer::nondet_stack,
        StackRegs => developer::stack_regs,
        AllRegs => developer::all_regs,
        DebugVars => developer::debug_vars,
        Stats => developer::stats,
        PrintOptionals => developer::print_optionals,
        UnhideEvents => developer::unhide_events,
        Table => developer::table,
        TypeCtor => developer::type_ctor,
        ClassDecl => developer::class_decl,
        AllTypeCtors => developer::all_type_ctors,
        AllClassDecls => developer::all_class_decls,
        AllProcedures => developer::all_procedures,
        Ambiguity => developer::ambiguity,
    }
}

fn keep() -> Result<Directive> {
    Ok(Directive::KeepInteracting)
}

/// 使い方エラーを表示して対話を続ける
fn usage(session: &mut Session, words: &[String]) -> Result<Directive> {
    let name = words.first().map(String::as_str).unwrap_or_default();
    session.usage(name)?;
    keep()
}

/// その場から動けない移動コマンド
fn no_op(session: &mut Session) -> Result<Directive> {
    writeln!(session.err(), "{}", ERR_NO_OP)?;
    keep()
}

/// コラボレータの失敗を `mdb: <problem>.` として報告して対話を続ける
fn report(session: &mut Session, result: Result<()>) -> Result<Directive> {
    if let Err(e) = result {
        session.problem(e)?;
    }
    keep()
}

/// `on`/`off` の引数
fn on_off(word: &str) -> Option<bool> {
    match word {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

/// 複数の候補から1つを選ばせる
///
/// 候補を番号付きで表示し、`prompt` で応答を読みます。`allow_all` なら `*` で
/// 全部を選べます。選ばなかった場合は理由を表示して空を返します。
fn choose<T: Clone>(
    session: &mut Session,
    candidates: &[T],
    describe: impl Fn(&T) -> String,
    prompt: &str,
    allow_all: bool,
    bad_index: &str,
) -> Result<Vec<T>> {
    for (i, candidate) in candidates.iter().enumerate() {
        writeln!(session.out(), "{}: {}", i, describe(candidate))?;
    }
    let reply = session.get_line(prompt)?;
    let chosen = match reply.as_deref() {
        Some("*") if allow_all => candidates.to_vec(),
        Some(text) => match crate::words::parse_natural(text) {
            Some(i) if i < candidates.len() => vec![candidates[i].clone()],
            Some(_) => {
                writeln!(session.out(), "{}", bad_index)?;
                Vec::new()
            }
            None => {
                writeln!(session.out(), "none of them")?;
                Vec::new()
            }
        },
        None => {
            writeln!(session.out(), "none of them")?;
            Vec::new()
        }
    };
    Ok(chosen)
}
