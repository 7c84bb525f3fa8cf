//! 開発者向けのコマンド
//!
//! 実行時データ構造の表示、デバッグフラグ、呼び出しテーブルの列挙、
//! 型とモジュールの一覧など。ほとんどはコラボレータへの薄い橋渡しです。

use super::{choose, keep, on_off, report, usage};
use crate::directive::{Directive, StopPolicy};
use crate::errors::{ERR_INVALID_PROC_SPEC, ERR_NOT_AVAILABLE, ERR_NO_SUCH_PROCEDURE};
use crate::event::{Event, ProcLayout};
use crate::flags::print_flag;
use crate::options;
use crate::procspec::ProcSpec;
use crate::reader::os_message;
use crate::runtime::{BrowseTarget, StatsTarget, Tabling, TypeClassDesc, TypeCtorDesc};
use crate::session::Session;
use crate::words::parse_natural;
use crate::Result;
use mdb_table::{entry_count, format_tuple, CallTableInfo, CallTableQuery, TrieAccess};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::debug;

pub fn var_details(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    let result = session.collab.inspector.var_details(event, session.console.out());
    report(session, result)
}

pub fn term_size(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let [_, name] = words else {
        return usage(session, words);
    };
    let target = if name == "*" {
        BrowseTarget::AllVars
    } else {
        BrowseTarget::Var(name.clone())
    };
    let result = session
        .collab
        .inspector
        .term_size(event, &target, session.console.out());
    report(session, result)
}

pub fn debug_vars(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    let result = session.collab.inspector.debug_vars(event, session.console.out());
    report(session, result)
}

pub fn flag(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    match words {
        [_] => session.flags.print_all(session.console.out())?,
        [_, name] => match session.flags.get(name) {
            Some(value) => print_flag(session.console.out(), name, value)?,
            None => writeln!(session.out(), "There is no flag named {}.", name)?,
        },
        [_, name, value] => {
            if session.flags.get(name).is_none() {
                writeln!(session.out(), "There is no flag named {}.", name)?;
                return keep();
            }
            let Some(on) = on_off(value) else {
                return usage(session, words);
            };
            session.flags.set(name, on);
            writeln!(
                session.out(),
                "Flag {} is now {}.",
                name,
                if on { "set" } else { "clear" }
            )?;
        }
        _ => return usage(session, words),
    }
    keep()
}

pub fn subgoal(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Some(n) = single_natural(words) else {
        return usage(session, words);
    };
    match session.collab.tabling.print_subgoal(n, session.console.out()) {
        Ok(true) => {}
        Ok(false) => writeln!(session.out(), "no such subgoal")?,
        Err(e) => session.problem(e)?,
    }
    keep()
}

pub fn consumer(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Some(n) = single_natural(words) else {
        return usage(session, words);
    };
    match session.collab.tabling.print_consumer(n, session.console.out()) {
        Ok(true) => {}
        Ok(false) => writeln!(session.out(), "no such consumer")?,
        Err(e) => session.problem(e)?,
    }
    keep()
}

fn single_natural(words: &[String]) -> Option<usize> {
    match words {
        [_, word] => parse_natural(word),
        _ => None,
    }
}

pub fn gen_stack(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    let result = session.collab.tabling.gen_stack(session.console.out());
    report(session, result)
}

pub fn cut_stack(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    let result = session.collab.tabling.cut_stack(session.console.out());
    report(session, result)
}

pub fn pneg_stack(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    let result = session.collab.tabling.pneg_stack(session.console.out());
    report(session, result)
}

/// 生成器、カット、否定の3つのスタックを空行で区切って表示する
fn print_mm_stacks(tabling: &dyn Tabling, out: &mut dyn Write) -> Result<()> {
    tabling.gen_stack(out)?;
    writeln!(out)?;
    tabling.cut_stack(out)?;
    writeln!(out)?;
    tabling.pneg_stack(out)
}

pub fn mm_stacks(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    let result = print_mm_stacks(&*session.collab.tabling, session.console.out());
    report(session, result)
}

pub fn nondet_stack(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Ok((first, opts)) = options::stack(words) else {
        return usage(session, words);
    };
    let line_limit = match &words[first..] {
        [] => session.settings.stack_default_limit,
        [limit] => match parse_natural(limit) {
            Some(n) => n,
            None => return usage(session, words),
        },
        _ => return usage(session, words),
    };
    let result = session.collab.inspector.nondet_stack(
        event,
        opts.detailed,
        opts.frame_limit,
        line_limit,
        session.console.out(),
    );
    report(session, result)
}

pub fn stack_regs(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    let result = session.collab.engine.stack_regs(event, session.console.out());
    report(session, result)
}

pub fn all_regs(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    let result = session.collab.engine.all_regs(event, session.console.out());
    report(session, result)
}

pub fn stats(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Ok((first, file)) = options::stats(words) else {
        return usage(session, words);
    };
    let [what] = &words[first..] else {
        return usage(session, words);
    };
    // `None` は I/O テーブリングの統計
    let target = match what.as_str() {
        "procs" => Some(StatsTarget::Procs),
        "labels" => Some(StatsTarget::Labels),
        "var_names" => Some(StatsTarget::VarNames),
        "io_tabling" => None,
        _ => return usage(session, words),
    };

    let mut file_out = match &file {
        Some(path) => match File::create(path) {
            Ok(f) => Some(BufWriter::new(f)),
            Err(e) => {
                writeln!(session.err(), "mdb: error opening `{}': {}.", path, os_message(&e))?;
                return keep();
            }
        },
        None => None,
    };

    let result = {
        let out: &mut dyn Write = match file_out.as_mut() {
            Some(w) => w as &mut dyn Write,
            None => session.console.out(),
        };
        let printed = match target {
            Some(target) => session.collab.engine.stats(target, out),
            None => session.io_tabling.print_stats(out).map_err(Into::into),
        };
        printed.and_then(|()| out.flush().map_err(Into::into))
    };
    report(session, result)
}

pub fn print_optionals(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    match words {
        [_] => {
            let negation = if session.settings.print_optionals { "" } else { "not " };
            writeln!(session.out(), "optional values are {}being printed", negation)?;
        }
        [_, value] => match on_off(value) {
            Some(on) => session.settings.print_optionals = on,
            None => return usage(session, words),
        },
        _ => return usage(session, words),
    }
    keep()
}

pub fn unhide_events(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    match words {
        [_] => {
            let state = if session.settings.unhide_events { "exposed" } else { "hidden" };
            writeln!(session.out(), "Hidden events are {}.", state)?;
        }
        [_, value] => match on_off(value) {
            Some(true) => {
                session.settings.unhide_events = true;
                session.settings.have_unhid_events = true;
                writeln!(session.out(), "Hidden events are exposed.")?;
            }
            Some(false) => {
                session.settings.unhide_events = false;
                writeln!(session.out(), "Hidden events are hidden.")?;
            }
            None => return usage(session, words),
        },
        _ => return usage(session, words),
    }
    keep()
}

/// 手続き指定にちょうど1つだけ一致する手続き
///
/// 複数あればユーザーに選ばせます。選ばれなければ `None`。
fn single_matching_proc(session: &mut Session, spec: &ProcSpec) -> Result<Option<ProcLayout>> {
    let procs = session.collab.registry.all_procs();
    let mut matches: Vec<ProcLayout> = spec.select(&procs).into_iter().cloned().collect();
    match matches.len() {
        0 => {
            writeln!(session.err(), "{}", ERR_NO_SUCH_PROCEDURE)?;
            Ok(None)
        }
        1 => Ok(matches.pop()),
        n => {
            writeln!(session.err(), "Ambiguous procedure specification. The matches are:")?;
            let prompt = format!("\nWhich procedure's table do you want to print (0-{})? ", n - 1);
            let chosen = choose(session, &matches, ProcLayout::to_string, &prompt, false, "invalid choice")?;
            Ok(chosen.into_iter().next())
        }
    }
}

/// 指定された引数でテーブルを絞り込み、チップを表示する
///
/// 引数の誤りは出力ストリームに書きます。内部エラーだけを返します。
fn print_call_table(
    trie: &dyn TrieAccess,
    out: &mut dyn Write,
    proc: &ProcLayout,
    info: &CallTableInfo,
    given: &[String],
) -> Result<()> {
    let query = match CallTableQuery::fill(info, trie, given) {
        Ok(query) => query,
        Err(e) if e.is_internal() => return Err(e.into()),
        Err(e) => {
            writeln!(out, "{}", e)?;
            return Ok(());
        }
    };

    if query.is_complete() {
        write!(out, "{}: ", format_tuple(&query.bound_values()))?;
        trie.print_tip(out, query.node())?;
        return Ok(());
    }

    let name = info.method.table_name().unwrap_or("call table");
    writeln!(out, "{} for {}:", name, proc)?;
    let tips = query.enumerate(trie, |values, node| {
        write!(out, "{}: ", format_tuple(values))?;
        trie.print_tip(out, node)?;
        Ok(())
    })?;
    debug!("listed {} tips of {}", tips, proc);
    writeln!(out, "end of table ({})", entry_count(tips))?;
    Ok(())
}

pub fn table(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let [_, spec_word, given @ ..] = words else {
        return usage(session, words);
    };
    let Some(spec) = session.proc_specs.parse(spec_word) else {
        writeln!(session.err(), "{}", ERR_INVALID_PROC_SPEC)?;
        return keep();
    };
    let Some(proc) = single_matching_proc(session, &spec)? else {
        return keep();
    };

    let info = match session.collab.tabling.call_table(&proc) {
        Some(info) if info.method.is_io_tabled() => {
            writeln!(session.out(), "IO tabled predicates do not have their own tables.")?;
            return keep();
        }
        Some(info) if info.method.has_call_table() => info,
        _ => {
            writeln!(session.out(), "{} isn't tabled.", proc)?;
            return keep();
        }
    };

    match session.collab.tabling.trie() {
        Some(trie) => print_call_table(trie, session.console.out(), &proc, &info, given)?,
        None => writeln!(session.console.err(), "mdb: {}.", ERR_NOT_AVAILABLE)?,
    }
    keep()
}

fn write_type_ctor(out: &mut dyn Write, ctor: &TypeCtorDesc, print_rep: bool, print_functors: bool) -> io::Result<()> {
    write!(out, "type constructor {}.{}/{}", ctor.module, ctor.name, ctor.arity)?;
    if print_rep {
        writeln!(out, ": {}", ctor.rep)?;
    } else {
        writeln!(out)?;
    }
    if print_functors && !ctor.functors.is_empty() {
        writeln!(out, "{}", ctor.functors.join(", "))?;
    }
    Ok(())
}

fn write_class_decl(
    out: &mut dyn Write,
    class: &TypeClassDesc,
    print_methods: bool,
    print_instances: bool,
) -> io::Result<()> {
    writeln!(out, "type class {}.{}/{}", class.module, class.name, class.arity)?;
    if print_methods {
        writeln!(out, "methods: {}", class.methods.join(", "))?;
    }
    if print_instances {
        for instance in &class.instances {
            writeln!(out, "instance {}", instance)?;
        }
    }
    Ok(())
}

/// `MOD NAME ARITY`
fn type_name<'a>(args: &'a [String]) -> Option<(&'a str, &'a str, usize)> {
    match args {
        [module, name, arity] => Some((module.as_str(), name.as_str(), parse_natural(arity)?)),
        _ => None,
    }
}

pub fn type_ctor(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Ok((first, (print_rep, print_functors))) = options::type_ctor(words) else {
        return usage(session, words);
    };
    let Some((module, name, arity)) = type_name(&words[first..]) else {
        return usage(session, words);
    };
    let ctors = session.collab.registry.type_ctors();
    match ctors
        .iter()
        .find(|c| c.module == module && c.name == name && c.arity == arity)
    {
        Some(ctor) => write_type_ctor(session.console.out(), ctor, print_rep, print_functors)?,
        None => writeln!(session.out(), "there is no such type constructor")?,
    }
    keep()
}

pub fn class_decl(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Ok((first, (print_methods, print_instances))) = options::class_decl(words) else {
        return usage(session, words);
    };
    let Some((module, name, arity)) = type_name(&words[first..]) else {
        return usage(session, words);
    };
    let classes = session.collab.registry.type_classes();
    match classes
        .iter()
        .find(|c| c.module == module && c.name == name && c.arity == arity)
    {
        Some(class) => write_class_decl(session.console.out(), class, print_methods, print_instances)?,
        None => writeln!(session.out(), "there is no such type class")?,
    }
    keep()
}

/// 一覧の後に付ける件数の行
fn write_count(out: &mut dyn Write, what: &str, module: Option<&str>, count: usize) -> io::Result<()> {
    match module {
        Some(module) => writeln!(out, "\nnumber of {} in module {}: {}", what, module, count),
        None => writeln!(out, "\nnumber of {} in the program: {}", what, count),
    }
}

/// 省略可能なモジュール名1つ
fn optional_module(args: &[String]) -> Option<Option<&str>> {
    match args {
        [] => Some(None),
        [module] => Some(Some(module.as_str())),
        _ => None,
    }
}

pub fn all_type_ctors(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Ok((first, (print_rep, print_functors))) = options::type_ctor(words) else {
        return usage(session, words);
    };
    let Some(module) = optional_module(&words[first..]) else {
        return usage(session, words);
    };
    let ctors = session.collab.registry.type_ctors();
    let out = session.console.out();
    let mut count = 0;
    for ctor in ctors.iter().filter(|c| module.map_or(true, |m| m == c.module)) {
        if count > 0 {
            writeln!(out)?;
        }
        write_type_ctor(out, ctor, print_rep, print_functors)?;
        count += 1;
    }
    write_count(out, "type constructors", module, count)?;
    keep()
}

pub fn all_class_decls(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Ok((first, (print_methods, print_instances))) = options::class_decl(words) else {
        return usage(session, words);
    };
    let Some(module) = optional_module(&words[first..]) else {
        return usage(session, words);
    };
    let classes = session.collab.registry.type_classes();
    let out = session.console.out();
    let mut count = 0;
    for class in classes.iter().filter(|c| module.map_or(true, |m| m == c.module)) {
        if count > 0 {
            writeln!(out)?;
        }
        write_class_decl(out, class, print_methods, print_instances)?;
        count += 1;
    }
    write_count(out, "type classes", module, count)?;
    keep()
}

/// 手続きの表を書く
///
/// `separate` ならモードごとに1行、そうでなければ述語ごとに1行でモードを並べます。
fn write_procedure_table(out: &mut dyn Write, procs: &[ProcLayout], separate: bool) -> io::Result<()> {
    if separate {
        for proc in procs {
            writeln!(out, "{}", proc)?;
        }
        return Ok(());
    }

    let mut preds: Vec<(String, Vec<String>)> = Vec::new();
    for proc in procs {
        let mode = format!("{} ({})", proc.mode, proc.determinism);
        match preds.iter_mut().find(|(id, _)| *id == proc.pred_id()) {
            Some((_, modes)) => modes.push(mode),
            None => preds.push((proc.pred_id(), vec![mode])),
        }
    }
    for (id, modes) in preds {
        writeln!(out, "{}: {}", id, modes.join(", "))?;
    }
    Ok(())
}

pub fn all_procedures(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Ok((first, opts)) = options::all_procedures(words) else {
        return usage(session, words);
    };
    let [path] = &words[first..] else {
        return usage(session, words);
    };
    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            writeln!(session.err(), "mdb: error opening `{}': {}.", path, os_message(&e))?;
            return keep();
        }
    };

    let procs: Vec<ProcLayout> = session
        .collab
        .registry
        .all_procs()
        .into_iter()
        .filter(|p| opts.uci || !p.uci)
        .filter(|p| opts.module.as_deref().map_or(true, |m| m == p.module))
        .collect();
    let mut writer = BufWriter::new(file);
    let written = write_procedure_table(&mut writer, &procs, opts.separate).and_then(|()| writer.flush());
    match written {
        Ok(()) => writeln!(session.out(), "mdb: wrote table to `{}'.", path)?,
        Err(e) => writeln!(session.err(), "mdb: error writing to `{}': {}.", path, os_message(&e))?,
    }
    keep()
}

/// 同じ名前で複数の実体を持つものを名前順に集める
fn ambiguous<I>(entries: I) -> Vec<(String, Vec<String>)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut by_name: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, id) in entries {
        let ids = by_name.entry(name).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    by_name.into_iter().filter(|(_, ids)| ids.len() > 1).collect()
}

fn write_ambiguities(out: &mut dyn Write, title: &str, found: &[(String, Vec<String>)]) -> io::Result<()> {
    writeln!(out, "{}:", title)?;
    for (name, ids) in found {
        writeln!(out, "  {}: {}", name, ids.join(", "))?;
    }
    Ok(())
}

pub fn ambiguity(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Ok((first, file)) = options::ambiguity(words) else {
        return usage(session, words);
    };
    let modules = &words[first..];
    let wanted = |module: &str| modules.is_empty() || modules.iter().any(|m| m == module);

    let procs = session.collab.registry.all_procs();
    let proc_names = ambiguous(
        procs
            .iter()
            .filter(|p| !p.uci && wanted(&p.module))
            .map(|p| (p.name.clone(), p.pred_id())),
    );
    let ctors = session.collab.registry.type_ctors();
    let ctor_names = ambiguous(
        ctors
            .iter()
            .filter(|c| wanted(&c.module))
            .map(|c| (c.name.clone(), format!("{}.{}/{}", c.module, c.name, c.arity))),
    );

    let mut report_text = Vec::new();
    if !proc_names.is_empty() {
        write_ambiguities(&mut report_text, "Ambiguous predicate and function names", &proc_names)?;
    }
    if !ctor_names.is_empty() {
        write_ambiguities(&mut report_text, "Ambiguous type constructor names", &ctor_names)?;
    }
    if report_text.is_empty() {
        writeln!(report_text, "There are no ambiguous names.")?;
    }

    let Some(path) = file else {
        session.out().write_all(&report_text)?;
        return keep();
    };
    let written = File::create(&path).and_then(|mut f| f.write_all(&report_text).and_then(|()| f.flush()));
    match written {
        Ok(()) => writeln!(session.out(), "mdb: wrote report to `{}'.", path)?,
        Err(e) => writeln!(session.err(), "mdb: error opening `{}': {}.", path, os_message(&e))?,
    }
    keep()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Determinism;
    use crate::handlers::testing::Harness;
    use crate::runtime::{Collaborators, Engine, ProcRegistry};
    use crate::settings::Features;
    use mdb_table::{ArgValue, EvalMethod, MemoTrie, NodeRef, StepKind};
    use tempfile::TempDir;

    fn fib() -> ProcLayout {
        ProcLayout::pred("m", "fib", 2, 0, Determinism::Det)
    }

    fn pair() -> ProcLayout {
        ProcLayout::pred("m", "pair", 3, 0, Determinism::Semidet)
    }

    struct Registry;

    impl ProcRegistry for Registry {
        fn modules(&self) -> Vec<String> {
            vec!["m".to_string(), "n".to_string()]
        }

        fn all_procs(&self) -> Vec<ProcLayout> {
            let mut unify = ProcLayout::pred("m", "__Unify__", 2, 0, Determinism::Semidet);
            unify.uci = true;
            vec![
                fib(),
                pair(),
                ProcLayout::pred("m", "plain", 1, 0, Determinism::Det),
                ProcLayout::pred("m", "write", 2, 0, Determinism::Det),
                ProcLayout::pred("m", "q", 1, 0, Determinism::Det),
                ProcLayout::pred("m", "q", 1, 1, Determinism::Semidet),
                ProcLayout::func("n", "q", 1, 0, Determinism::Det),
                unify,
            ]
        }

        fn type_ctors(&self) -> Vec<TypeCtorDesc> {
            vec![
                TypeCtorDesc {
                    module: "m".to_string(),
                    name: "tree".to_string(),
                    arity: 1,
                    rep: "DU".to_string(),
                    functors: vec!["leaf/0".to_string(), "node/3".to_string()],
                },
                TypeCtorDesc {
                    module: "n".to_string(),
                    name: "tree".to_string(),
                    arity: 0,
                    rep: "ENUM".to_string(),
                    functors: vec!["oak/0".to_string()],
                },
            ]
        }

        fn type_classes(&self) -> Vec<TypeClassDesc> {
            vec![TypeClassDesc {
                module: "m".to_string(),
                name: "shape".to_string(),
                arity: 1,
                methods: vec!["func area/1".to_string(), "pred draw/2".to_string()],
                instances: vec!["circle".to_string(), "square".to_string()],
            }]
        }
    }

    /// 手続き名を先頭の段に置いて、1つのトライに複数のテーブルを入れる
    struct Tables {
        trie: MemoTrie,
    }

    impl Tables {
        fn new() -> Self {
            let mut trie = MemoTrie::new();
            let tag = |name: &str| ArgValue::Str(name.to_string());
            for (n, answer) in [(1, "1"), (2, "1"), (3, "2")] {
                trie.insert(&[tag("fib"), ArgValue::Int(n)], format!("succeeded: {}", answer));
            }
            trie.insert(&[tag("pair"), ArgValue::Int(1), ArgValue::Str("a".to_string())], "active");
            trie.insert(&[tag("pair"), ArgValue::Int(1), ArgValue::Str("b".to_string())], "complete");
            Self { trie }
        }

        fn root_of(&self, name: &str) -> NodeRef {
            self.trie
                .lookup(self.trie.root(), &ArgValue::Str(name.to_string()))
                .unwrap()
        }
    }

    impl Tabling for Tables {
        fn call_table(&self, proc: &ProcLayout) -> Option<CallTableInfo> {
            match proc.name.as_str() {
                "fib" => Some(CallTableInfo {
                    method: EvalMethod::MemoStrict,
                    input_steps: vec![StepKind::Int],
                    root: self.root_of("fib"),
                }),
                "pair" => Some(CallTableInfo {
                    method: EvalMethod::LoopCheck,
                    input_steps: vec![StepKind::PromiseImplied, StepKind::Int, StepKind::String],
                    root: self.root_of("pair"),
                }),
                "write" => Some(CallTableInfo {
                    method: EvalMethod::TableIo,
                    input_steps: Vec::new(),
                    root: self.trie.root(),
                }),
                "plain" => Some(CallTableInfo {
                    method: EvalMethod::Normal,
                    input_steps: Vec::new(),
                    root: self.trie.root(),
                }),
                _ => None,
            }
        }

        fn trie(&self) -> Option<&dyn TrieAccess> {
            Some(&self.trie)
        }

        fn print_subgoal(&self, n: usize, out: &mut dyn Write) -> Result<bool> {
            if n == 0 {
                writeln!(out, "subgoal 0: active")?;
            }
            Ok(n == 0)
        }

        fn gen_stack(&self, out: &mut dyn Write) -> Result<()> {
            writeln!(out, "gen stack empty")?;
            Ok(())
        }

        fn cut_stack(&self, out: &mut dyn Write) -> Result<()> {
            writeln!(out, "cut stack empty")?;
            Ok(())
        }

        fn pneg_stack(&self, out: &mut dyn Write) -> Result<()> {
            writeln!(out, "pneg stack empty")?;
            Ok(())
        }
    }

    struct Counts;

    impl Engine for Counts {
        fn stats(&self, target: StatsTarget, out: &mut dyn Write) -> Result<()> {
            writeln!(out, "{:?}: 42", target)?;
            Ok(())
        }
    }

    fn harness(input: &[&str]) -> Harness {
        let mut collab = Collaborators::default();
        collab.registry = Box::new(Registry);
        collab.tabling = Box::new(Tables::new());
        collab.engine = Box::new(Counts);
        Harness::with(input.iter().copied(), collab, Features::all())
    }

    #[test]
    fn test_table_lists_every_entry() {
        let mut h = harness(&[]);
        h.run("table fib");
        assert_eq!(
            h.out(),
            "memo table for pred m.fib/2-0 (det):\n\
             <1>: succeeded: 1\n\
             <2>: succeeded: 1\n\
             <3>: succeeded: 2\n\
             end of table (3 entries)\n"
        );
        assert_eq!(h.err(), "");
    }

    #[test]
    fn test_table_with_given_arguments() {
        let mut h = harness(&[]);
        h.run("table fib 2");
        assert_eq!(h.out(), "<2>: succeeded: 1\n");

        h.run("table pair 1");
        assert_eq!(
            h.out(),
            "loopcheck table for pred m.pair/3-0 (semidet):\n\
             <1, \"a\">: active\n\
             <1, \"b\">: complete\n\
             end of table (2 entries)\n"
        );
        h.run("table pair 1 b");
        assert_eq!(h.out(), "<1, \"b\">: complete\n");
    }

    #[test]
    fn test_table_argument_errors() {
        let mut h = harness(&[]);
        h.run("table fib 9");
        assert_eq!(h.out(), "call table does not contain 9 in argument position 1.\n");
        h.run("table fib x");
        assert_eq!(h.out(), "argument 1 is not an integer.\n");
        h.run("table fib 1 2");
        assert_eq!(h.out(), "There are only 1 input arguments.\n");
        h.run("table pair 1 a b");
        assert_eq!(h.out(), "Sorry, this procedure has only 2 tabled arguments\n");
        assert_eq!(h.err(), "");
    }

    #[test]
    fn test_table_untabled_and_unknown() {
        let mut h = harness(&[]);
        h.run("table plain");
        assert_eq!(h.out(), "pred m.plain/1-0 (det) isn't tabled.\n");
        h.run("table write");
        assert_eq!(h.out(), "IO tabled predicates do not have their own tables.\n");
        h.run("table nosuch");
        assert_eq!(h.err(), "mdb: there is no such procedure.\n");
        h.run("table fib/x");
        assert_eq!(h.err(), "mdb: invalid procedure specification.\n");
        h.run("table");
        assert!(h.err().contains("usage error"));
    }

    #[test]
    fn test_table_ambiguous_asks() {
        let mut h = harness(&["1", "*"]);
        h.run("table m.q");
        assert_eq!(h.err(), "Ambiguous procedure specification. The matches are:\n");
        assert_eq!(
            h.out(),
            "0: pred m.q/1-0 (det)\n1: pred m.q/1-1 (semidet)\npred m.q/1-1 (semidet) isn't tabled.\n"
        );
        h.run("table m.q");
        h.err();
        assert!(h.out().ends_with("none of them\n"));
    }

    #[test]
    fn test_table_ambiguous_bad_index() {
        let mut h = harness(&["5"]);
        h.run("table m.q");
        assert!(h.out().ends_with("invalid choice\n"));
    }

    #[test]
    fn test_flags() {
        let mut h = harness(&[]);
        h.run("flag goto");
        assert_eq!(h.out(), "Flag goto is clear.\n");
        h.run("flag goto on");
        assert_eq!(h.out(), "Flag goto is now set.\n");
        h.run("flag goto");
        assert_eq!(h.out(), "Flag goto is set.\n");
        h.run("flag bogus on");
        assert_eq!(h.out(), "There is no flag named bogus.\n");
        h.run("flag goto maybe");
        assert!(h.err().contains("usage error"));
        h.run("flag");
        assert_eq!(h.out().lines().count(), crate::flags::FLAG_NAMES.len());
    }

    #[test]
    fn test_minimal_model_stacks() {
        let mut h = harness(&[]);
        h.run("subgoal 0");
        assert_eq!(h.out(), "subgoal 0: active\n");
        h.run("subgoal 3");
        assert_eq!(h.out(), "no such subgoal\n");
        h.run("consumer 0");
        assert_eq!(h.err(), "mdb: not available in this configuration.\n");
        h.run("mm_stacks");
        assert_eq!(h.out(), "gen stack empty\n\ncut stack empty\n\npneg stack empty\n");
        h.run("subgoal x");
        assert!(h.err().contains("usage error"));
    }

    #[test]
    fn test_stats() {
        let mut h = harness(&[]);
        h.run("stats procs");
        assert_eq!(h.out(), "Procs: 42\n");
        h.run("stats io_tabling");
        assert!(h.out().starts_with("phase = 0\ncounter = 0\n"));
        h.run("stats widgets");
        h.run("stats");
        assert_eq!(h.err().matches("usage error").count(), 2);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats");
        let path = path.to_str().unwrap();
        h.run(&format!("stats -f {} var_names", path));
        assert_eq!(h.out(), "");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "VarNames: 42\n");
    }

    #[test]
    fn test_print_optionals_and_unhide_events() {
        let mut h = harness(&[]);
        h.run("print_optionals");
        assert_eq!(h.out(), "optional values are not being printed\n");
        h.run("print_optionals on");
        h.run("print_optionals");
        assert_eq!(h.out(), "optional values are being printed\n");

        h.run("unhide_events");
        assert_eq!(h.out(), "Hidden events are hidden.\n");
        h.run("unhide_events on");
        h.run("unhide_events off");
        assert_eq!(h.out(), "Hidden events are exposed.\nHidden events are hidden.\n");
        h.run("unhide_events on");
        h.out();
        h.run("unhide_events");
        assert_eq!(h.out(), "Hidden events are exposed.\n");
        assert!(h.session.settings.have_unhid_events);
        assert!(h.session.settings.unhide_events);
    }

    #[test]
    fn test_inspector_commands_report_problems() {
        let mut h = harness(&[]);
        h.run("var_details");
        h.run("term_size *");
        h.run("nondet_stack -d 5");
        h.run("stack_regs");
        assert_eq!(h.err().matches("mdb: not available in this configuration.\n").count(), 4);
        h.run("nondet_stack x");
        h.run("term_size");
        assert_eq!(h.err().matches("usage error").count(), 2);
    }

    #[test]
    fn test_type_ctors_and_classes() {
        let mut h = harness(&[]);
        h.run("type_ctor -r -f m tree 1");
        assert_eq!(h.out(), "type constructor m.tree/1: DU\nleaf/0, node/3\n");
        h.run("type_ctor m tree 2");
        assert_eq!(h.out(), "there is no such type constructor\n");
        h.run("class_decl -m -i m shape 1");
        assert_eq!(
            h.out(),
            "type class m.shape/1\nmethods: func area/1, pred draw/2\ninstance circle\ninstance square\n"
        );
        h.run("class_decl m shape one");
        assert!(h.err().contains("usage error"));

        h.run("all_type_ctors");
        assert_eq!(
            h.out(),
            "type constructor m.tree/1\n\ntype constructor n.tree/0\n\nnumber of type constructors in the program: 2\n"
        );
        h.run("all_class_decls n");
        assert_eq!(h.out(), "\nnumber of type classes in module n: 0\n");
    }

    #[test]
    fn test_all_procedures() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("procs");
        let path = path.to_str().unwrap();

        let mut h = harness(&[]);
        h.run(&format!("all_procedures -m m {}", path));
        assert_eq!(h.out(), format!("mdb: wrote table to `{}'.\n", path));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("pred m.q/1: 0 (det), 1 (semidet)\n"));
        assert!(!text.contains("__Unify__"));

        h.run(&format!("all_procedures -s -u {}", path));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("pred m.q/1-1 (semidet)\n"));
        assert!(text.contains("func n.q/1-0 (det)\n"));
        assert!(text.contains("__Unify__"));

        h.run("all_procedures");
        assert!(h.err().contains("usage error"));
    }

    #[test]
    fn test_ambiguity_report() {
        let mut h = harness(&[]);
        h.run("ambiguity");
        assert_eq!(
            h.out(),
            "Ambiguous predicate and function names:\n  q: pred m.q/1, func n.q/1\n\
             Ambiguous type constructor names:\n  tree: m.tree/1, n.tree/0\n"
        );
        h.run("ambiguity m");
        assert_eq!(h.out(), "There are no ambiguous names.\n");

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report");
        let path = path.to_str().unwrap();
        h.run(&format!("ambiguity -o {} n", path));
        assert_eq!(h.out(), format!("mdb: wrote report to `{}'.\n", path));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "There are no ambiguous names.\n");
    }
}
