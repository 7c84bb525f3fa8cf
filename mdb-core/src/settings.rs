//! セッションの設定値
//!
//! `printlevel`、`scroll`、`context`、`set` などのコマンドが変更し、
//! `save` が書き戻す値をまとめて保持します。

use crate::directive::PrintLevel;

/// スクロール制御のウィンドウサイズの既定値
pub const DEFAULT_SCROLL_LIMIT: usize = 24;

/// `list` の前後行数の既定値
pub const DEFAULT_LIST_CONTEXT_LINES: usize = 2;

/// 表示する I/O アクション数の既定値
pub const DEFAULT_MAX_IO_ACTIONS: usize = 30;

/// イベント報告行のどこに文脈（ファイル:行）を出すか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextPosition {
    None,
    Before,
    After,
    PrevLine,
    NextLine,
}

impl ContextPosition {
    pub const ALL: [ContextPosition; 5] = [
        ContextPosition::None,
        ContextPosition::Before,
        ContextPosition::After,
        ContextPosition::PrevLine,
        ContextPosition::NextLine,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            ContextPosition::None => "none",
            ContextPosition::Before => "before",
            ContextPosition::After => "after",
            ContextPosition::PrevLine => "prevline",
            ContextPosition::NextLine => "nextline",
        }
    }

    pub fn parse(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.keyword() == word)
    }

    /// 設定したときのメッセージ
    pub fn set_message(self) -> &'static str {
        match self {
            ContextPosition::None => "Contexts will not be printed.",
            ContextPosition::Before => "Contexts will be printed before, on the same line.",
            ContextPosition::After => "Contexts will be printed after, on the same line.",
            ContextPosition::PrevLine => "Contexts will be printed on the previous line.",
            ContextPosition::NextLine => "Contexts will be printed on the next line.",
        }
    }

    /// 現在値を報告するメッセージ
    pub fn report_message(self) -> &'static str {
        match self {
            ContextPosition::None => "Contexts are not printed.",
            ContextPosition::Before => "Contexts are printed before, on the same line.",
            ContextPosition::After => "Contexts are printed after, on the same line.",
            ContextPosition::PrevLine => "Contexts are printed on the previous line.",
            ContextPosition::NextLine => "Contexts are printed on the next line.",
        }
    }
}

/// `break` の既定の適用範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Interface,
    Entry,
}

impl Scope {
    pub fn keyword(self) -> &'static str {
        match self {
            Scope::All => "all",
            Scope::Interface => "interface",
            Scope::Entry => "entry",
        }
    }

    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "all" => Some(Scope::All),
            "interface" => Some(Scope::Interface),
            "entry" => Some(Scope::Entry),
            _ => None,
        }
    }

    pub fn set_message(self) -> &'static str {
        match self {
            Scope::All => "The default scope of `break' commands is now all matching events.",
            Scope::Interface => {
                "The default scope of `break' commands is now all matching interface events."
            }
            Scope::Entry => {
                "The default scope of `break' commands is now all matching entry events."
            }
        }
    }

    pub fn report_message(self) -> &'static str {
        match self {
            Scope::All => "The default scope of `break' commands is all matching events.",
            Scope::Interface => {
                "The default scope of `break' commands is all matching interface events."
            }
            Scope::Entry => "The default scope of `break' commands is all matching entry events.",
        }
    }
}

/// 項の表示形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrintFormat {
    Flat,
    RawPretty,
    Verbose,
    Pretty,
}

impl PrintFormat {
    pub const ALL: [PrintFormat; 4] = [
        PrintFormat::Flat,
        PrintFormat::RawPretty,
        PrintFormat::Verbose,
        PrintFormat::Pretty,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrintFormat::Flat => "flat",
            PrintFormat::RawPretty => "raw_pretty",
            PrintFormat::Verbose => "verbose",
            PrintFormat::Pretty => "pretty",
        }
    }

    /// `save` や `break_print` で使う短いオプション
    pub fn short_option(self) -> &'static str {
        match self {
            PrintFormat::Flat => "-f",
            PrintFormat::RawPretty => "-r",
            PrintFormat::Verbose => "-v",
            PrintFormat::Pretty => "-p",
        }
    }

    pub fn parse(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.keyword() == word)
    }

    fn index(self) -> usize {
        match self {
            PrintFormat::Flat => 0,
            PrintFormat::RawPretty => 1,
            PrintFormat::Verbose => 2,
            PrintFormat::Pretty => 3,
        }
    }
}

/// ブラウザ設定を使う呼び出し元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowseCaller {
    /// `print VAR`
    Print,
    /// `browse VAR`
    Browse,
    /// `print *` やイベント表示
    PrintAll,
}

impl BrowseCaller {
    pub const ALL: [BrowseCaller; 3] = [BrowseCaller::Print, BrowseCaller::Browse, BrowseCaller::PrintAll];

    pub fn short_option(self) -> &'static str {
        match self {
            BrowseCaller::Print => "-P",
            BrowseCaller::Browse => "-B",
            BrowseCaller::PrintAll => "-A",
        }
    }

    fn index(self) -> usize {
        match self {
            BrowseCaller::Print => 0,
            BrowseCaller::Browse => 1,
            BrowseCaller::PrintAll => 2,
        }
    }
}

/// 1つの表示形式の上限値
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatParams {
    pub depth: usize,
    pub size: usize,
    pub width: usize,
    pub lines: usize,
}

/// 呼び出し元ごとの既定形式と、形式ごとの上限値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserParams {
    formats: [PrintFormat; 3],
    params: [[FormatParams; 4]; 3],
}

impl Default for BrowserParams {
    fn default() -> Self {
        let flat = FormatParams { depth: 3, size: 10, width: 80, lines: 25 };
        let other = FormatParams { depth: 10, size: 30, width: 80, lines: 25 };
        let row = [flat, other, other, other];
        Self {
            formats: [PrintFormat::Flat, PrintFormat::Flat, PrintFormat::Flat],
            params: [row; 3],
        }
    }
}

/// `set` で変更できるブラウザ設定の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserParam {
    Depth,
    Size,
    Width,
    Lines,
}

impl BrowserParam {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "depth" => Some(BrowserParam::Depth),
            "size" => Some(BrowserParam::Size),
            "width" => Some(BrowserParam::Width),
            "lines" => Some(BrowserParam::Lines),
            _ => None,
        }
    }
}

impl BrowserParams {
    /// 呼び出し元の既定形式
    pub fn format(&self, caller: BrowseCaller) -> PrintFormat {
        self.formats[caller.index()]
    }

    pub fn params(&self, caller: BrowseCaller, format: PrintFormat) -> FormatParams {
        self.params[caller.index()][format.index()]
    }

    /// 指定した呼び出し元（空なら全部）の既定形式を変える
    pub fn set_format(&mut self, callers: &[BrowseCaller], format: PrintFormat) {
        for caller in Self::selected(callers) {
            self.formats[caller.index()] = format;
        }
    }

    /// 指定した呼び出し元と形式（空なら全部）の上限値を変える
    pub fn set_param(
        &mut self,
        callers: &[BrowseCaller],
        formats: &[PrintFormat],
        param: BrowserParam,
        value: usize,
    ) {
        let formats: Vec<PrintFormat> = if formats.is_empty() {
            PrintFormat::ALL.to_vec()
        } else {
            formats.to_vec()
        };
        for caller in Self::selected(callers) {
            for format in &formats {
                let p = &mut self.params[caller.index()][format.index()];
                match param {
                    BrowserParam::Depth => p.depth = value,
                    BrowserParam::Size => p.size = value,
                    BrowserParam::Width => p.width = value,
                    BrowserParam::Lines => p.lines = value,
                }
            }
        }
    }

    fn selected(callers: &[BrowseCaller]) -> Vec<BrowseCaller> {
        if callers.is_empty() {
            BrowseCaller::ALL.to_vec()
        } else {
            callers.to_vec()
        }
    }

    /// `save` 用に、現在の値を再現する `set` コマンド列を返す
    pub fn to_commands(&self) -> Vec<String> {
        let mut commands = Vec::new();
        for caller in BrowseCaller::ALL {
            commands.push(format!(
                "set {} format {}",
                caller.short_option(),
                self.format(caller).keyword()
            ));
            for format in PrintFormat::ALL {
                let p = self.params(caller, format);
                let opts = format!("{} {}", caller.short_option(), format.short_option());
                commands.push(format!("set {} depth {}", opts, p.depth));
                commands.push(format!("set {} size {}", opts, p.size));
                commands.push(format!("set {} width {}", opts, p.width));
                commands.push(format!("set {} lines {}", opts, p.lines));
            }
        }
        commands
    }
}

/// 実行時に変更できる機能の有無
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Features {
    /// イベント深さのヒストグラムを集計している
    pub histogram: bool,
    /// スタックコピー方式の極小モデルテーブリング
    pub minimal_model_stack_copy: bool,
    /// 各イベントでの整合性検査
    pub integrity_checking: bool,
    /// I/O テーブリングの準備がされている
    pub io_tabling: bool,
}

impl Features {
    /// すべて有効
    pub fn all() -> Self {
        Self {
            histogram: true,
            minimal_model_stack_copy: true,
            integrity_checking: true,
            io_tabling: true,
        }
    }
}

/// セッションの設定値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub print_level: PrintLevel,
    pub scroll_control: bool,
    pub scroll_limit: usize,
    /// `stack` の既定の行数上限（0 は無制限）
    pub stack_default_limit: usize,
    pub echo_commands: bool,
    pub scope: Scope,
    pub print_optionals: bool,
    pub context: ContextPosition,
    pub goal_paths: bool,
    pub unhide_events: bool,
    /// 一度でも `unhide_events on` が実行されたか
    pub have_unhid_events: bool,
    pub mmc_options: String,
    pub list_context_lines: usize,
    pub pass_trace_counts: Option<String>,
    pub fail_trace_counts: Option<String>,
    pub max_io_actions: usize,
    pub browser: BrowserParams,
    pub xml_browser_cmd: Option<String>,
    pub xml_tmp_filename: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            print_level: PrintLevel::Some,
            scroll_control: true,
            scroll_limit: DEFAULT_SCROLL_LIMIT,
            stack_default_limit: 0,
            echo_commands: false,
            scope: Scope::Interface,
            print_optionals: false,
            context: ContextPosition::After,
            goal_paths: true,
            unhide_events: false,
            have_unhid_events: false,
            mmc_options: String::new(),
            list_context_lines: DEFAULT_LIST_CONTEXT_LINES,
            pass_trace_counts: None,
            fail_trace_counts: None,
            max_io_actions: DEFAULT_MAX_IO_ACTIONS,
            browser: BrowserParams::default(),
            xml_browser_cmd: None,
            xml_tmp_filename: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.print_level, PrintLevel::Some);
        assert!(settings.scroll_control);
        assert_eq!(settings.scroll_limit, 24);
        assert_eq!(settings.scope, Scope::Interface);
        assert_eq!(settings.context, ContextPosition::After);
        assert!(settings.goal_paths);
    }

    #[test]
    fn test_keywords_round_trip() {
        for c in ContextPosition::ALL {
            assert_eq!(ContextPosition::parse(c.keyword()), Some(c));
        }
        assert_eq!(Scope::parse("entry"), Some(Scope::Entry));
        assert_eq!(PrintFormat::parse("raw_pretty"), Some(PrintFormat::RawPretty));
        assert_eq!(PrintFormat::parse("xml"), None);
    }

    #[test]
    fn test_browser_params_selection() {
        let mut params = BrowserParams::default();
        params.set_param(&[BrowseCaller::Print], &[PrintFormat::Flat], BrowserParam::Depth, 7);
        assert_eq!(params.params(BrowseCaller::Print, PrintFormat::Flat).depth, 7);
        assert_eq!(params.params(BrowseCaller::Browse, PrintFormat::Flat).depth, 3);

        params.set_param(&[], &[], BrowserParam::Lines, 40);
        assert_eq!(params.params(BrowseCaller::PrintAll, PrintFormat::Pretty).lines, 40);

        params.set_format(&[BrowseCaller::Browse], PrintFormat::Pretty);
        assert_eq!(params.format(BrowseCaller::Browse), PrintFormat::Pretty);
        assert_eq!(params.format(BrowseCaller::Print), PrintFormat::Flat);
    }
}
