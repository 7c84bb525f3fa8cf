//! デバッガコマンドの登録表
//!
//! コマンドは閉じた列挙型で、各バリアントが名前・カテゴリ・補完用の固定引数・
//! 補完の種類を持ちます。ハンドラとの対応は `handlers` モジュールにあります。

use crate::alias::{EMPTY_KEY, NUMBER_KEY};

/// コマンドのカテゴリ（`help` の分類でもある）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Forward,
    Backward,
    Browsing,
    Breakpoint,
    Queries,
    TableIo,
    Parameter,
    Help,
    Dd,
    Misc,
    Exp,
    Developer,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Forward,
        Category::Backward,
        Category::Browsing,
        Category::Breakpoint,
        Category::Queries,
        Category::TableIo,
        Category::Parameter,
        Category::Help,
        Category::Dd,
        Category::Misc,
        Category::Exp,
        Category::Developer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Forward => "forward",
            Category::Backward => "backward",
            Category::Browsing => "browsing",
            Category::Breakpoint => "breakpoint",
            Category::Queries => "queries",
            Category::TableIo => "table_io",
            Category::Parameter => "parameter",
            Category::Help => "help",
            Category::Dd => "dd",
            Category::Misc => "misc",
            Category::Exp => "exp",
            Category::Developer => "developer",
        }
    }

    /// `help CATEGORY` で表示する説明
    pub fn summary(self) -> &'static str {
        match self {
            Category::Forward => "Commands that move forward in the execution.",
            Category::Backward => "Commands that re-execute part of the program.",
            Category::Browsing => "Commands that examine the state of the program.",
            Category::Breakpoint => "Commands that manage break points.",
            Category::Queries => "Commands that run interactive queries.",
            Category::TableIo => "Commands that control I/O tabling.",
            Category::Parameter => "Commands that set debugger parameters.",
            Category::Help => "Commands that manage the help system.",
            Category::Dd => "Commands for the declarative debugger.",
            Category::Misc => "Miscellaneous commands.",
            Category::Exp => "Experimental commands.",
            Category::Developer => "Commands intended for developers of the debugger.",
        }
    }
}

/// 引数の補完方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completer {
    None,
    Variable,
    ProcSpec,
    Module,
    Command,
    Alias,
    Help,
    Filename,
}

/// 実行時に有効化される機能
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Histogram,
    MinimalModelStackCopy,
}

/// デバッガコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // forward
    Step,
    Goto,
    Next,
    Finish,
    Fail,
    Exception,
    Return,
    Forward,
    MinDepth,
    MaxDepth,
    Continue,
    // backward
    Retry,
    // browsing
    Level,
    Up,
    Down,
    Vars,
    HeldVars,
    Print,
    Browse,
    Stack,
    Current,
    View,
    Hold,
    Diff,
    Dump,
    List,
    PushListDir,
    PopListDir,
    // breakpoint
    Break,
    Condition,
    Ignore,
    BreakPrint,
    Enable,
    Disable,
    Delete,
    Register,
    Modules,
    Procedures,
    // queries
    Query,
    CcQuery,
    IoQuery,
    // table_io
    TableIo,
    // parameter
    PrintLevel,
    MmcOptions,
    Scroll,
    StackDefaultLimit,
    Context,
    GoalPaths,
    Scope,
    Echo,
    Alias,
    Unalias,
    // help
    DocumentCategory,
    Document,
    Help,
    // dd
    Dd,
    Trust,
    Untrust,
    Trusted,
    // misc
    Set,
    Source,
    Save,
    Quit,
    // exp
    HistogramAll,
    HistogramExp,
    ClearHistogram,
    Dice,
    // developer
    VarDetails,
    TermSize,
    Flag,
    Subgoal,
    Consumer,
    GenStack,
    CutStack,
    PnegStack,
    MmStacks,
    NondetStack,
    StackRegs,
    AllRegs,
    DebugVars,
    Stats,
    PrintOptionals,
    UnhideEvents,
    Table,
    TypeCtor,
    ClassDecl,
    AllTypeCtors,
    AllClassDecls,
    AllProcedures,
    Ambiguity,
}

const MOVEMENT_ARGS: &[&str] = &[
    "-N", "-S", "-a", "-i", "-n", "-s", "--none", "--some", "--all", "--integrity", "--strict",
    "--nostrict",
];
const RETRY_ARGS: &[&str] = &["--force", "--interactive", "--only-if-safe"];
const PRINT_ARGS: &[&str] = &[
    "-f", "-p", "-v", "--flat", "--pretty", "--verbose", "exception", "goal", "*",
];
const STACK_ARGS: &[&str] = &["--detailed"];
const SET_ARGS: &[&str] = &[
    "-A", "-B", "-P", "-f", "-p", "-v", "--print-all", "--print", "--browse", "--flat",
    "--pretty", "--verbose", "xml_tmp_filename", "xml_browser_cmd", "format", "depth", "size",
    "width", "lines", "flat", "pretty", "verbose",
];
const VIEW_ARGS: &[&str] = &[
    "-c", "-f", "-n", "-s", "-t", "-v", "-w", "-2", "--close", "--verbose", "--force",
    "--split-screen", "--window-command", "--server-command", "--server-name", "--timeout",
];
const BREAK_ARGS: &[&str] = &[
    "-A", "-E", "-I", "-O", "-P", "-S", "-a", "-e", "-i", "--all", "--entry", "--ignore-entry",
    "--ignore-interface", "--interface", "--print", "--select-all", "--select-one", "--stop",
    "here", "info",
];
const IGNORE_ARGS: &[&str] = &["-E", "-I", "--ignore-entry", "--ignore-interface"];
const PRINTLEVEL_ARGS: &[&str] = &["none", "some", "all"];
const ON_OFF_ARGS: &[&str] = &["on", "off"];
const CONTEXT_ARGS: &[&str] = &["none", "before", "after", "prevline", "nextline"];
const SCOPE_ARGS: &[&str] = &["all", "interface", "entry"];
const DD_ARGS: &[&str] = &[
    "-s", "-a", "-d", "-n", "--search-mode", "--assume-all-io-is-tabled", "--depth", "--nodes",
    "td", "top_down", "dq", "divide_and_query", "sdq", "suspicion_divide_and_query",
];
const TABLE_IO_ARGS: &[&str] = &["stats", "start", "stop"];
const SOURCE_ARGS: &[&str] = &["--ignore-errors"];
const QUIT_ARGS: &[&str] = &["-y"];
const STATS_ARGS: &[&str] = &["procs", "labels", "var_names", "io_tabling"];

impl Command {
    /// 登録順（`help` の一覧順）のすべてのコマンド
    pub const ALL: [Command; 90] = [
        Command::Step,
        Command::Goto,
        Command::Next,
        Command::Finish,
        Command::Fail,
        Command::Exception,
        Command::Return,
        Command::Forward,
        Command::MinDepth,
        Command::MaxDepth,
        Command::Continue,
        Command::Retry,
        Command::Level,
        Command::Up,
        Command::Down,
        Command::Vars,
        Command::HeldVars,
        Command::Print,
        Command::Browse,
        Command::Stack,
        Command::Current,
        Command::View,
        Command::Hold,
        Command::Diff,
        Command::Dump,
        Command::List,
        Command::PushListDir,
        Command::PopListDir,
        Command::Break,
        Command::Condition,
        Command::Ignore,
        Command::BreakPrint,
        Command::Enable,
        Command::Disable,
        Command::Delete,
        Command::Register,
        Command::Modules,
        Command::Procedures,
        Command::Query,
        Command::CcQuery,
        Command::IoQuery,
        Command::TableIo,
        Command::PrintLevel,
        Command::MmcOptions,
        Command::Scroll,
        Command::StackDefaultLimit,
        Command::Context,
        Command::GoalPaths,
        Command::Scope,
        Command::Echo,
        Command::Alias,
        Command::Unalias,
        Command::DocumentCategory,
        Command::Document,
        Command::Help,
        Command::Dd,
        Command::Trust,
        Command::Untrust,
        Command::Trusted,
        Command::Set,
        Command::Source,
        Command::Save,
        Command::Quit,
        Command::HistogramAll,
        Command::HistogramExp,
        Command::ClearHistogram,
        Command::Dice,
        Command::VarDetails,
        Command::TermSize,
        Command::Flag,
        Command::Subgoal,
        Command::Consumer,
        Command::GenStack,
        Command::CutStack,
        Command::PnegStack,
        Command::MmStacks,
        Command::NondetStack,
        Command::StackRegs,
        Command::AllRegs,
        Command::DebugVars,
        Command::Stats,
        Command::PrintOptionals,
        Command::UnhideEvents,
        Command::Table,
        Command::TypeCtor,
        Command::ClassDecl,
        Command::AllTypeCtors,
        Command::AllClassDecls,
        Command::AllProcedures,
        Command::Ambiguity,
    ];

    /// コマンド名
    pub fn name(self) -> &'static str {
        match self {
            Command::Step => "step",
            Command::Goto => "goto",
            Command::Next => "next",
            Command::Finish => "finish",
            Command::Fail => "fail",
            Command::Exception => "exception",
            Command::Return => "return",
            Command::Forward => "forward",
            Command::MinDepth => "mindepth",
            Command::MaxDepth => "maxdepth",
            Command::Continue => "continue",
            Command::Retry => "retry",
            Command::Level => "level",
            Command::Up => "up",
            Command::Down => "down",
            Command::Vars => "vars",
            Command::HeldVars => "held_vars",
            Command::Print => "print",
            Command::Browse => "browse",
            Command::Stack => "stack",
            Command::Current => "current",
            Command::View => "view",
            Command::Hold => "hold",
            Command::Diff => "diff",
            Command::Dump => "dump",
            Command::List => "list",
            Command::PushListDir => "push_list_dir",
            Command::PopListDir => "pop_list_dir",
            Command::Break => "break",
            Command::Condition => "condition",
            Command::Ignore => "ignore",
            Command::BreakPrint => "break_print",
            Command::Enable => "enable",
            Command::Disable => "disable",
            Command::Delete => "delete",
            Command::Register => "register",
            Command::Modules => "modules",
            Command::Procedures => "procedures",
            Command::Query => "query",
            Command::CcQuery => "cc_query",
            Command::IoQuery => "io_query",
            Command::TableIo => "table_io",
            Command::PrintLevel => "printlevel",
            Command::MmcOptions => "mmc_options",
            Command::Scroll => "scroll",
            Command::StackDefaultLimit => "stack_default_limit",
            Command::Context => "context",
            Command::GoalPaths => "goal_paths",
            Command::Scope => "scope",
            Command::Echo => "echo",
            Command::Alias => "alias",
            Command::Unalias => "unalias",
            Command::DocumentCategory => "document_category",
            Command::Document => "document",
            Command::Help => "help",
            Command::Dd => "dd",
            Command::Trust => "trust",
            Command::Untrust => "untrust",
            Command::Trusted => "trusted",
            Command::Set => "set",
            Command::Source => "source",
            Command::Save => "save",
            Command::Quit => "quit",
            Command::HistogramAll => "histogram_all",
            Command::HistogramExp => "histogram_exp",
            Command::ClearHistogram => "clear_histogram",
            Command::Dice => "dice",
            Command::VarDetails => "var_details",
            Command::TermSize => "term_size",
            Command::Flag => "flag",
            Command::Subgoal => "subgoal",
            Command::Consumer => "consumer",
            Command::GenStack => "gen_stack",
            Command::CutStack => "cut_stack",
            Command::PnegStack => "pneg_stack",
            Command::MmStacks => "mm_stacks",
            Command::NondetStack => "nondet_stack",
            Command::StackRegs => "stack_regs",
            Command::AllRegs => "all_regs",
            Command::DebugVars => "debug_vars",
            Command::Stats => "stats",
            Command::PrintOptionals => "print_optionals",
            Command::UnhideEvents => "unhide_events",
            Command::Table => "table",
            Command::TypeCtor => "type_ctor",
            Command::ClassDecl => "class_decl",
            Command::AllTypeCtors => "all_type_ctors",
            Command::AllClassDecls => "all_class_decls",
            Command::AllProcedures => "all_procedures",
            Command::Ambiguity => "ambiguity",
        }
    }

    /// カテゴリ
    pub fn category(self) -> Category {
        use Command::*;
        match self {
            Step | Goto | Next | Finish | Fail | Exception | Return | Forward | MinDepth
            | MaxDepth | Continue => Category::Forward,
            Retry => Category::Backward,
            Level | Up | Down | Vars | HeldVars | Print | Browse | Stack | Current | View | Hold
            | Diff | Dump | List | PushListDir | PopListDir => Category::Browsing,
            Break | Condition | Ignore | BreakPrint | Enable | Disable | Delete | Register
            | Modules | Procedures => Category::Breakpoint,
            Query | CcQuery | IoQuery => Category::Queries,
            TableIo => Category::TableIo,
            PrintLevel | MmcOptions | Scroll | StackDefaultLimit | Context | GoalPaths | Scope
            | Echo | Alias | Unalias => Category::Parameter,
            DocumentCategory | Document | Help => Category::Help,
            Dd | Trust | Untrust | Trusted => Category::Dd,
            Set | Source | Save | Quit => Category::Misc,
            HistogramAll | HistogramExp | ClearHistogram | Dice => Category::Exp,
            VarDetails | TermSize | Flag | Subgoal | Consumer | GenStack | CutStack | PnegStack
            | MmStacks | NondetStack | StackRegs | AllRegs | DebugVars | Stats | PrintOptionals
            | UnhideEvents | Table | TypeCtor | ClassDecl | AllTypeCtors | AllClassDecls
            | AllProcedures | Ambiguity => Category::Developer,
        }
    }

    /// 補完候補として出す固定の引数
    pub fn fixed_args(self) -> &'static [&'static str] {
        use Command::*;
        match self {
            Step | Goto | Next | Finish | Fail | Exception | Return | Forward | MinDepth
            | MaxDepth | Continue => MOVEMENT_ARGS,
            Retry => RETRY_ARGS,
            Level | Up | Down | Stack | NondetStack => STACK_ARGS,
            Print | Browse => PRINT_ARGS,
            Set => SET_ARGS,
            View => VIEW_ARGS,
            Break => BREAK_ARGS,
            Ignore => IGNORE_ARGS,
            PrintLevel => PRINTLEVEL_ARGS,
            Scroll | GoalPaths | Echo | PrintOptionals | UnhideEvents => ON_OFF_ARGS,
            Context => CONTEXT_ARGS,
            Scope => SCOPE_ARGS,
            Dd => DD_ARGS,
            TableIo => TABLE_IO_ARGS,
            Source => SOURCE_ARGS,
            Quit => QUIT_ARGS,
            Stats => STATS_ARGS,
            _ => &[],
        }
    }

    /// 引数の補完方法
    pub fn completer(self) -> Completer {
        use Command::*;
        match self {
            Print | Browse | Hold | Diff | Dump | BreakPrint => Completer::Variable,
            Break | Trust | Table => Completer::ProcSpec,
            Procedures | Query | CcQuery | IoQuery => Completer::Module,
            Alias => Completer::Command,
            Unalias => Completer::Alias,
            Help => Completer::Help,
            Source | Save | HistogramAll | HistogramExp | Stats | AllProcedures | Ambiguity => {
                Completer::Filename
            }
            _ => Completer::None,
        }
    }

    /// このコマンドが必要とする機能
    pub fn feature(self) -> Option<Feature> {
        use Command::*;
        match self {
            HistogramAll | HistogramExp | ClearHistogram => Some(Feature::Histogram),
            Subgoal | Consumer | GenStack | CutStack | PnegStack | MmStacks => {
                Some(Feature::MinimalModelStackCopy)
            }
            _ => None,
        }
    }

    /// 実行を再開し得るコマンドか
    pub fn is_movement(self) -> bool {
        matches!(self.category(), Category::Forward | Category::Backward)
    }

    /// 名前からコマンドを引く（大文字小文字を区別する完全一致）
    pub fn lookup(name: &str) -> Option<Command> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// エイリアス本体の先頭に置ける名前か（`EMPTY` と `NUMBER` も受け付ける）
    pub fn is_valid_name(name: &str) -> bool {
        name == EMPTY_KEY || name == NUMBER_KEY || Self::lookup(name).is_some()
    }

    /// 接頭辞に一致するコマンド名（補完用）
    pub fn completions(prefix: &str) -> impl Iterator<Item = &'static str> + '_ {
        Self::ALL
            .into_iter()
            .map(Command::name)
            .filter(move |name| name.starts_with(prefix))
    }

    /// 1行の説明（`help COMMAND` の既定の文書）
    pub fn summary(self) -> &'static str {
        use Command::*;
        match self {
            Step => "step [-NSans] [num]\n     Step forward num events (default 1).",
            Goto => "goto [-NSans] num\n     Go forward to event num.",
            Next => "next [-NSans] [num]\n     Go to the next exit from the selected ancestor.",
            Finish => "finish [-NSans] [num]\n     Continue until the selected ancestor finishes.",
            Fail => "fail [-NSans] [num]\n     Continue until the selected ancestor fails.",
            Exception => "exception [-NSans]\n     Continue until the next exception event.",
            Return => "return [-NSans]\n     Skip over exit events.",
            Forward => "forward [-NSans]\n     Skip over fail, redo and exception events.",
            MinDepth => "mindepth [-NSans] depth\n     Go to the next event at depth or deeper.",
            MaxDepth => "maxdepth [-NSans] depth\n     Go to the next event at depth or shallower.",
            Continue => "continue [-NSans]\n     Continue until the end of the program.",
            Retry => "retry [-afio] [num]\n     Restart execution of the selected ancestor.",
            Level => "level [-d] num\n     Select the ancestor at level num.",
            Up => "up [-d] [num]\n     Move num levels up the ancestor list (default 1).",
            Down => "down [-d] [num]\n     Move num levels down the ancestor list (default 1).",
            Vars => "vars\n     List the live variables of the selected procedure.",
            HeldVars => "held_vars\n     List the held variables.",
            Print => "print [-frvp] [name|num|*|goal|exception|proc_body|action num]\n     Print a value.",
            Browse => "browse [-frvpx] [name|num|goal|exception|proc_body|action num]\n     Browse a value.",
            Stack => "stack [-d] [-f frames] [num]\n     Print the ancestors of the current call.",
            Current => "current\n     Print the current event again.",
            View => "view [-c] [-w cmd] [-s cmd] [-n name] [-t secs] [-fv2]\n     Open a source window.",
            Hold => "hold name[^path] [heldname]\n     Keep a value for later reference.",
            Diff => "diff [-s start] [-m max] name1[^path1] name2[^path2]\n     Show the differences between two values.",
            Dump => "dump [-x] (goal|exception|proc_body|name) filename\n     Write a value to a file.",
            List => "list [num]\n     List the source lines around the current context.",
            PushListDir => "push_list_dir dir ...\n     Add directories to the front of the listing path.",
            PopListDir => "pop_list_dir\n     Remove the first directory of the listing path.",
            Break => "break [-PS] [-aei] [-AO] [-E n] [-I n] [-n] [-p name] (here|info|procspec|file:line|line)\n     Set a break point.",
            Condition => "condition [-n num] [-v] [-p] varname[^path] (=|!=) term\n     Attach a condition to a break point.",
            Ignore => "ignore [-E num] [-I num] [num|*]\n     Ignore a break point for a number of events.",
            BreakPrint => "break_print [-e] [-n] [-frvp] num (none|name ...)\n     Set what a break point prints.",
            Enable => "enable [num|*]\n     Enable break points.",
            Disable => "disable [num|*]\n     Disable break points.",
            Delete => "delete [num|*]\n     Delete break points.",
            Register => "register [-qv]\n     Register all procedures.",
            Modules => "modules\n     List the debuggable modules.",
            Procedures => "procedures module\n     List the procedures of a module.",
            Query => "query module ...\n     Start an interactive query.",
            CcQuery => "cc_query module ...\n     Start an interactive committed choice query.",
            IoQuery => "io_query module ...\n     Start an interactive I/O query.",
            TableIo => "table_io [start|stop|stats]\n     Control I/O tabling.",
            PrintLevel => "printlevel [none|some|all]\n     Set or show the default print level.",
            MmcOptions => "mmc_options option ...\n     Set the compiler options for queries.",
            Scroll => "scroll [on|off|size]\n     Control the scrolling of event reports.",
            StackDefaultLimit => "stack_default_limit [size]\n     Set the default size limit of stack dumps.",
            Context => "context [none|before|after|prevline|nextline]\n     Control where contexts are printed.",
            GoalPaths => "goal_paths [on|off]\n     Control the printing of goal paths.",
            Scope => "scope [all|interface|entry]\n     Set the default scope of break points.",
            Echo => "echo [on|off]\n     Control the echoing of commands.",
            Alias => "alias [name [command ...]]\n     Define or show aliases.",
            Unalias => "unalias name\n     Remove an alias.",
            DocumentCategory => "document_category slot category\n     Add a help category.",
            Document => "document category slot item\n     Add a help item.",
            Help => "help [category|command]\n     Show help.",
            Dd => "dd [-r] [-s mode] [-d depth] [-n nodes] [-a] [-p file] [-f file]\n     Start the declarative debugger.",
            Trust => "trust (module|procspec|std lib)\n     Trust a module, predicate or function.",
            Untrust => "untrust num\n     Remove an object from the trusted list.",
            Trusted => "trusted\n     List the trusted objects.",
            Set => "set [-APB] [-frvp] param value\n     Set a parameter.",
            Source => "source [-i] filename\n     Execute the commands in a file.",
            Save => "save filename\n     Save the debugger state as a command script.",
            Quit => "quit [-y]\n     Quit the debugger and the program.",
            HistogramAll => "histogram_all filename\n     Write the all-inclusive depth histogram.",
            HistogramExp => "histogram_exp filename\n     Write the experimental depth histogram.",
            ClearHistogram => "clear_histogram\n     Clear the experimental depth histogram.",
            Dice => "dice [-p file] [-f file] [-s key] [-n num] [-o file] [-m module]\n     Display a trace count dice.",
            VarDetails => "var_details\n     Print the details of the live variables.",
            TermSize => "term_size (name|num|*)\n     Print the size of terms.",
            Flag => "flag [name [on|off]]\n     Set or show debugging flags.",
            Subgoal => "subgoal num\n     Print a minimal model subgoal.",
            Consumer => "consumer num\n     Print a minimal model consumer.",
            GenStack => "gen_stack\n     Print the generator stack.",
            CutStack => "cut_stack\n     Print the cut stack.",
            PnegStack => "pneg_stack\n     Print the possible negation stack.",
            MmStacks => "mm_stacks\n     Print all the minimal model stacks.",
            NondetStack => "nondet_stack [-d] [-f frames] [num]\n     Print the nondet stack.",
            StackRegs => "stack_regs\n     Print the stack registers.",
            AllRegs => "all_regs\n     Print all the registers.",
            DebugVars => "debug_vars\n     Print the debugger's own variables.",
            Stats => "stats [-f file] (procs|labels|var_names|io_tabling)\n     Print statistics.",
            PrintOptionals => "print_optionals [on|off]\n     Control the printing of optional values.",
            UnhideEvents => "unhide_events [on|off]\n     Control the visibility of hidden events.",
            Table => "table procspec [arg ...]\n     Print the call table of a tabled procedure.",
            TypeCtor => "type_ctor [-rf] module name arity\n     Print a type constructor.",
            ClassDecl => "class_decl [-mi] module name arity\n     Print a type class declaration.",
            AllTypeCtors => "all_type_ctors [-rf] [module]\n     Print all type constructors.",
            AllClassDecls => "all_class_decls [-mi] [module]\n     Print all type class declarations.",
            AllProcedures => "all_procedures [-su] [-m module] filename\n     Write a list of all procedures.",
            Ambiguity => "ambiguity [-o filename] [module ...]\n     Report ambiguous names.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = Command::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), Command::ALL.len());
    }

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(Command::lookup("step"), Some(Command::Step));
        assert_eq!(Command::lookup("Step"), None);
        assert_eq!(Command::lookup("ste"), None);
        assert_eq!(Command::lookup("EMPTY"), None);
        for command in Command::ALL {
            assert_eq!(Command::lookup(command.name()), Some(command));
        }
    }

    #[test]
    fn test_pseudo_entries_are_valid_alias_targets() {
        assert!(Command::is_valid_name("EMPTY"));
        assert!(Command::is_valid_name("NUMBER"));
        assert!(Command::is_valid_name("break"));
        assert!(!Command::is_valid_name("brake"));
    }

    #[test]
    fn test_registry_order_follows_categories() {
        let mut seen = Vec::new();
        for command in Command::ALL {
            let category = command.category();
            if seen.last() != Some(&category) {
                assert!(!seen.contains(&category), "{:?} split", category);
                seen.push(category);
            }
        }
        assert_eq!(seen, Category::ALL.to_vec());
    }

    #[test]
    fn test_completion_metadata() {
        assert_eq!(Command::Break.completer(), Completer::ProcSpec);
        assert!(Command::Quit.fixed_args().contains(&"-y"));
        let dumps: Vec<&str> = Command::completions("d").collect();
        assert_eq!(dumps, vec!["down", "diff", "dump", "disable", "delete", "document_category", "document", "dd", "dice", "debug_vars"]);
        assert_eq!(Command::MmStacks.feature(), Some(Feature::MinimalModelStackCopy));
        assert!(Command::Retry.is_movement());
    }
}
