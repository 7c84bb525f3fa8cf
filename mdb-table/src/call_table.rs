//! 呼び出しテーブルの記述子とユーザー指定引数の束縛

use crate::error::TableError;
use crate::trie::{NodeRef, TrieAccess};
use crate::value::{ArgKind, ArgValue};
use tracing::trace;

/// 手続きの評価方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMethod {
    Normal,
    LoopCheck,
    MemoStrict,
    MemoFastLoose,
    MemoSpecified,
    MinimalStackCopy,
    MinimalOwnStacks,
    TableIo,
    TableIoDecl,
    TableIoUnitize,
    TableIoUnitizeDecl,
}

impl EvalMethod {
    /// I/Oテーブリングされた手続きかどうか
    pub fn is_io_tabled(self) -> bool {
        matches!(
            self,
            EvalMethod::TableIo
                | EvalMethod::TableIoDecl
                | EvalMethod::TableIoUnitize
                | EvalMethod::TableIoUnitizeDecl
        )
    }

    /// 独自の呼び出しテーブルを持つかどうか
    pub fn has_call_table(self) -> bool {
        self != EvalMethod::Normal && !self.is_io_tabled()
    }

    /// 列挙時の見出しに使う名前
    pub fn table_name(self) -> Option<&'static str> {
        match self {
            EvalMethod::LoopCheck => Some("loopcheck table"),
            EvalMethod::MemoStrict | EvalMethod::MemoFastLoose | EvalMethod::MemoSpecified => {
                Some("memo table")
            }
            EvalMethod::MinimalStackCopy | EvalMethod::MinimalOwnStacks => {
                Some("minimal model table")
            }
            _ => None,
        }
    }
}

/// 入力引数1つ分のトライの段の種類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    Int,
    Float,
    String,
    /// トライに現れない引数（列挙では飛ばす）
    PromiseImplied,
    /// このクレートが扱えない段（enum、一般の項、型情報など）
    Other(String),
}

impl StepKind {
    fn arg_kind(&self) -> Result<Option<ArgKind>, TableError> {
        match self {
            StepKind::Int => Ok(Some(ArgKind::Int)),
            StepKind::Float => Ok(Some(ArgKind::Float)),
            StepKind::String => Ok(Some(ArgKind::String)),
            StepKind::PromiseImplied => Ok(None),
            StepKind::Other(_) => Err(TableError::UnsupportedStep),
        }
    }
}

/// 手続きの呼び出しテーブルの情報
#[derive(Debug, Clone)]
pub struct CallTableInfo {
    pub method: EvalMethod,
    pub input_steps: Vec<StepKind>,
    pub root: NodeRef,
}

/// 1つの入力引数の記述子
#[derive(Debug, Clone)]
pub struct CallTableArg {
    /// キーの種類
    pub kind: ArgKind,
    /// この引数の値を検索したノード
    pub start: Option<NodeRef>,
    /// ユーザーが指定した値
    pub value: Option<ArgValue>,
}

/// ユーザー指定の引数で絞り込んだ後の状態
#[derive(Debug, Clone)]
pub struct CallTableQuery {
    pub(crate) args: Vec<CallTableArg>,
    pub(crate) node: NodeRef,
    pub(crate) bound: usize,
}

impl CallTableQuery {
    /// ユーザー指定の値で先頭の引数を順に束縛し、トライを降りる
    ///
    /// `given[k]` は k+1 番目の（テーブルに現れる）入力引数の値です。
    pub fn fill(
        info: &CallTableInfo,
        trie: &dyn TrieAccess,
        given: &[String],
    ) -> Result<Self, TableError> {
        if given.len() > info.input_steps.len() {
            return Err(TableError::TooManyInputs(info.input_steps.len()));
        }

        let mut args = Vec::with_capacity(info.input_steps.len());
        for step in &info.input_steps {
            if let Some(kind) = step.arg_kind()? {
                args.push(CallTableArg {
                    kind,
                    start: None,
                    value: None,
                });
            }
        }

        if given.len() > args.len() {
            return Err(TableError::TooManyTabled(args.len()));
        }

        let mut node = info.root;
        for (i, text) in given.iter().enumerate() {
            let arg_num = i + 1;
            let arg = &mut args[i];
            let value = arg.kind.parse(text).ok_or(match arg.kind {
                ArgKind::Int => TableError::NotAnInteger(arg_num),
                _ => TableError::NotAFloat(arg_num),
            })?;

            let next = trie.lookup(node, &value).ok_or_else(|| TableError::NotInTable {
                value: value.bare(),
                arg: arg_num,
            })?;
            trace!("bound argument {} to {} at node {:?}", arg_num, value, node);

            arg.start = Some(node);
            arg.value = Some(value);
            node = next;
        }

        Ok(Self {
            args,
            node,
            bound: given.len(),
        })
    }

    /// テーブルに現れる入力引数の数
    pub fn num_tabled(&self) -> usize {
        self.args.len()
    }

    /// ユーザーが束縛した引数の数
    pub fn num_bound(&self) -> usize {
        self.bound
    }

    /// 全引数が束縛済みかどうか
    pub fn is_complete(&self) -> bool {
        self.bound == self.args.len()
    }

    /// 束縛済みの値
    pub fn bound_values(&self) -> Vec<ArgValue> {
        self.args.iter().filter_map(|a| a.value.clone()).collect()
    }

    /// 束縛済みの引数をたどった先のノード
    pub fn node(&self) -> NodeRef {
        self.node
    }

    /// 引数の記述子
    pub fn args(&self) -> &[CallTableArg] {
        &self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::MemoTrie;

    fn sample() -> (MemoTrie, CallTableInfo) {
        let mut trie = MemoTrie::new();
        trie.insert(&[ArgValue::Int(1), ArgValue::Str("a".into())], "yes");
        let info = CallTableInfo {
            method: EvalMethod::MemoStrict,
            input_steps: vec![StepKind::Int, StepKind::PromiseImplied, StepKind::String],
            root: trie.root(),
        };
        (trie, info)
    }

    #[test]
    fn test_fill_skips_promise_implied() {
        let (trie, info) = sample();
        let query = CallTableQuery::fill(&info, &trie, &["1".to_string()]).unwrap();
        assert_eq!(query.num_tabled(), 2);
        assert_eq!(query.num_bound(), 1);
        assert!(!query.is_complete());
    }

    #[test]
    fn test_fill_errors() {
        let (trie, info) = sample();
        let err = CallTableQuery::fill(&info, &trie, &["x".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "argument 1 is not an integer.");

        let err = CallTableQuery::fill(&info, &trie, &["7".to_string()]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "call table does not contain 7 in argument position 1."
        );

        let given: Vec<String> = vec!["1".into(), "a".into(), "b".into()];
        let err = CallTableQuery::fill(&info, &trie, &given).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sorry, this procedure has only 2 tabled arguments"
        );

        let given: Vec<String> = vec!["1".into(); 4];
        let err = CallTableQuery::fill(&info, &trie, &given).unwrap_err();
        assert_eq!(err.to_string(), "There are only 3 input arguments.");
    }

    #[test]
    fn test_fill_rejects_unsupported_step() {
        let (trie, mut info) = sample();
        info.input_steps.push(StepKind::Other("typeinfo".into()));
        let err = CallTableQuery::fill(&info, &trie, &[]).unwrap_err();
        assert!(matches!(err, TableError::UnsupportedStep));
    }
}
