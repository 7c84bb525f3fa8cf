//! 停止イベントと手続きの情報
//!
//! 実行エンジンが停止のたびに渡してくる文脈です。インタプリタはこれを
//! 読むだけで変更しません。

use std::fmt;

/// 実行イベントの種類（ポート）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    Call,
    Exit,
    Redo,
    Fail,
    TailCall,
    Exception,
    Cond,
    Then,
    Else,
    NegEnter,
    NegSuccess,
    NegFailure,
    DisjFirst,
    DisjLater,
    Switch,
    User,
}

impl Port {
    /// イベント報告行に出す名前
    pub fn name(self) -> &'static str {
        match self {
            Port::Call => "CALL",
            Port::Exit => "EXIT",
            Port::Redo => "REDO",
            Port::Fail => "FAIL",
            Port::TailCall => "TAIL",
            Port::Exception => "EXCP",
            Port::Cond => "COND",
            Port::Then => "THEN",
            Port::Else => "ELSE",
            Port::NegEnter => "NEGE",
            Port::NegSuccess => "NEGS",
            Port::NegFailure => "NEGF",
            Port::DisjFirst => "DISJ",
            Port::DisjLater => "DISJ",
            Port::Switch => "SWTC",
            Port::User => "USER",
        }
    }

    /// 呼び出しを終える最後のポート（exit/fail/exception）か
    pub fn is_final(self) -> bool {
        matches!(self, Port::Exit | Port::Fail | Port::Exception)
    }

    /// インターフェースポートか
    pub fn is_interface(self) -> bool {
        matches!(
            self,
            Port::Call | Port::Exit | Port::Redo | Port::Fail | Port::Exception | Port::TailCall
        )
    }

    /// 呼び出しに入るポートか
    pub fn is_entry(self) -> bool {
        matches!(self, Port::Call | Port::TailCall)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 述語か関数か
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcKind {
    Pred,
    Func,
}

impl ProcKind {
    pub fn name(self) -> &'static str {
        match self {
            ProcKind::Pred => "pred",
            ProcKind::Func => "func",
        }
    }
}

/// 決定性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Determinism {
    Det,
    Semidet,
    Nondet,
    Multi,
    CcNondet,
    CcMulti,
    Erroneous,
    Failure,
}

impl Determinism {
    pub fn name(self) -> &'static str {
        match self {
            Determinism::Det => "det",
            Determinism::Semidet => "semidet",
            Determinism::Nondet => "nondet",
            Determinism::Multi => "multi",
            Determinism::CcNondet => "cc_nondet",
            Determinism::CcMulti => "cc_multi",
            Determinism::Erroneous => "erroneous",
            Determinism::Failure => "failure",
        }
    }

    /// 失敗し得るか
    pub fn can_fail(self) -> bool {
        matches!(
            self,
            Determinism::Semidet | Determinism::Nondet | Determinism::CcNondet | Determinism::Failure
        )
    }
}

impl fmt::Display for Determinism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 手続き（述語または関数の1モード）のレイアウト情報
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcLayout {
    pub kind: ProcKind,
    pub module: String,
    pub name: String,
    pub arity: usize,
    pub mode: usize,
    pub determinism: Determinism,
    /// 決定的スタックにフレームを置くか
    pub on_det_stack: bool,
    /// コンパイラが生成した unify/compare/index 手続きか
    pub uci: bool,
}

impl ProcLayout {
    /// 通常の述語のレイアウトを作る
    pub fn pred(module: &str, name: &str, arity: usize, mode: usize, determinism: Determinism) -> Self {
        Self {
            kind: ProcKind::Pred,
            module: module.to_string(),
            name: name.to_string(),
            arity,
            mode,
            determinism,
            on_det_stack: !matches!(determinism, Determinism::Nondet | Determinism::Multi),
            uci: false,
        }
    }

    /// 関数のレイアウトを作る
    pub fn func(module: &str, name: &str, arity: usize, mode: usize, determinism: Determinism) -> Self {
        Self {
            kind: ProcKind::Func,
            ..Self::pred(module, name, arity, mode, determinism)
        }
    }

    /// `pred m.p/2` 形式の述語識別子（モードなし）
    pub fn pred_id(&self) -> String {
        format!("{} {}.{}/{}", self.kind.name(), self.module, self.name, self.arity)
    }

    /// `break` や `table` で再入力できる手続き指定
    pub fn spec(&self) -> String {
        format!(
            "{}*{}.{}/{}-{}",
            self.kind.name(),
            self.module,
            self.name,
            self.arity,
            self.mode
        )
    }
}

/// `pred m.p/2-0 (det)` 形式
impl fmt::Display for ProcLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}.{}/{}-{} ({})",
            self.kind.name(),
            self.module,
            self.name,
            self.arity,
            self.mode,
            self.determinism
        )
    }
}

/// 停止イベントの文脈
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// イベント番号
    pub number: u64,
    /// 呼び出しの通し番号
    pub call_seqno: u64,
    /// 呼び出しの深さ
    pub depth: u64,
    pub port: Port,
    pub proc: ProcLayout,
    /// ソースファイル名（不明なら空）
    pub file: String,
    pub line: u32,
    pub goal_path: String,
    /// 呼び出し元の位置（インターフェースポートでのみ表示）
    pub parent_file: String,
    pub parent_line: u32,
    /// 例外ポートで捕捉された値がある場合
    pub has_exception: bool,
}

impl Event {
    /// 最小限の情報でイベントを作る
    pub fn new(number: u64, call_seqno: u64, depth: u64, port: Port, proc: ProcLayout) -> Self {
        Self {
            number,
            call_seqno,
            depth,
            port,
            proc,
            file: String::new(),
            line: 0,
            goal_path: String::new(),
            parent_file: String::new(),
            parent_line: 0,
            has_exception: port == Port::Exception,
        }
    }

    /// ソース上の位置を設定する
    pub fn at(mut self, file: &str, line: u32) -> Self {
        self.file = file.to_string();
        self.line = line;
        self
    }

    /// 呼び出し元の位置を設定する
    pub fn called_from(mut self, file: &str, line: u32) -> Self {
        self.parent_file = file.to_string();
        self.parent_line = line;
        self
    }

    /// ゴールパスを設定する
    pub fn with_goal_path(mut self, path: &str) -> Self {
        self.goal_path = path.to_string();
        self
    }

    /// `file:line`（呼び出し元があれば `(from file:line)` を付ける）
    pub fn context(&self) -> Option<String> {
        if self.file.is_empty() {
            return None;
        }
        let mut context = format!("{}:{}", self.file, self.line);
        if self.port.is_interface() && !self.parent_file.is_empty() {
            context.push_str(&format!(
                " (from {}:{})",
                self.parent_file, self.parent_line
            ));
        }
        Some(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_classes() {
        assert!(Port::Exit.is_final());
        assert!(!Port::Redo.is_final());
        assert!(Port::TailCall.is_entry());
        assert!(Port::Exception.is_interface());
        assert!(!Port::Switch.is_interface());
    }

    #[test]
    fn test_proc_formats() {
        let proc = ProcLayout::func("list", "length", 2, 0, Determinism::Det);
        assert_eq!(proc.to_string(), "func list.length/2-0 (det)");
        assert_eq!(proc.pred_id(), "func list.length/2");
        assert_eq!(proc.spec(), "func*list.length/2-0");
        assert!(proc.on_det_stack);
    }

    #[test]
    fn test_parent_context_only_at_interface_ports() {
        let proc = ProcLayout::pred("m", "p", 1, 0, Determinism::Det);
        let call = Event::new(1, 1, 1, Port::Call, proc.clone())
            .at("m.m", 10)
            .called_from("main.m", 3);
        assert_eq!(call.context().as_deref(), Some("m.m:10 (from main.m:3)"));

        let then = Event::new(2, 1, 1, Port::Then, proc)
            .at("m.m", 11)
            .called_from("main.m", 3);
        assert_eq!(then.context().as_deref(), Some("m.m:11"));
    }
}
