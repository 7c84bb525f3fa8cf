//! 呼び出しテーブル探索の結合テスト

use mdb_table::{
    entry_count, format_tuple, ArgKind, ArgValue, CallTableInfo, CallTableQuery, EvalMethod,
    MemoTrie, NodeRef, StepKind, TableError, TrieAccess,
};

/// 兄弟値の表に、検索できない値が混じっている壊れたトライ
struct Corrupt(MemoTrie);

impl TrieAccess for Corrupt {
    fn lookup(&self, node: NodeRef, key: &ArgValue) -> Option<NodeRef> {
        self.0.lookup(node, key)
    }

    fn values(&self, node: NodeRef, kind: ArgKind) -> Option<Vec<ArgValue>> {
        let mut values = self.0.values(node, kind)?;
        if node == self.0.root() {
            values.push(ArgValue::Int(99));
        }
        Some(values)
    }
}

/// 手続き名を先頭の段に持つ、複数の手続きで共有されたトライ
fn shared_trie() -> (MemoTrie, CallTableInfo) {
    let mut trie = MemoTrie::new();
    let fib = ArgValue::Str("fib".to_string());
    for (n, answer) in [(0, "0"), (1, "1"), (10, "55")] {
        trie.insert(&[fib.clone(), ArgValue::Int(n)], answer);
    }
    trie.insert(&[ArgValue::Str("other".to_string()), ArgValue::Int(3)], "x");

    let root = trie.lookup(trie.root(), &fib).unwrap();
    let info = CallTableInfo {
        method: EvalMethod::MemoStrict,
        input_steps: vec![StepKind::Int],
        root,
    };
    (trie, info)
}

fn listing(query: &CallTableQuery, trie: &dyn TrieAccess) -> Result<String, TableError> {
    let mut out = Vec::new();
    let tips = query.enumerate(trie, |values, node| {
        out.extend_from_slice(format!("{}: ", format_tuple(values)).as_bytes());
        trie.print_tip(&mut out, node)?;
        Ok(())
    })?;
    out.extend_from_slice(format!("end of table ({})\n", entry_count(tips)).as_bytes());
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[test]
fn test_table_rooted_below_trie_root() {
    let (trie, info) = shared_trie();
    let query = CallTableQuery::fill(&info, &trie, &[]).unwrap();
    assert_eq!(
        listing(&query, &trie).unwrap(),
        "<0>: 0\n<1>: 1\n<10>: 55\nend of table (3 entries)\n"
    );
}

#[test]
fn test_given_argument_selects_single_tip() {
    let (trie, info) = shared_trie();
    let query = CallTableQuery::fill(&info, &trie, &["10".to_string()]).unwrap();
    assert!(query.is_complete());
    assert_eq!(query.bound_values(), vec![ArgValue::Int(10)]);
    assert_eq!(listing(&query, &trie).unwrap(), "<10>: 55\nend of table (1 entry)\n");

    // 他の手続きの値は見えない
    let err = CallTableQuery::fill(&info, &trie, &["3".to_string()]).unwrap_err();
    assert_eq!(err.to_string(), "call table does not contain 3 in argument position 1.");
    assert!(!err.is_internal());
}

#[test]
fn test_float_and_string_arguments() {
    let mut trie = MemoTrie::new();
    trie.insert(&[ArgValue::Float(0.5), ArgValue::Str("x".to_string())], "a");
    trie.insert(&[ArgValue::Float(1.5), ArgValue::Str("y".to_string())], "b");
    let info = CallTableInfo {
        method: EvalMethod::MinimalStackCopy,
        input_steps: vec![StepKind::Float, StepKind::String],
        root: trie.root(),
    };

    let err = CallTableQuery::fill(&info, &trie, &["half".to_string()]).unwrap_err();
    assert_eq!(err.to_string(), "argument 1 is not a float.");

    let query = CallTableQuery::fill(&info, &trie, &["1.5".to_string()]).unwrap();
    assert_eq!(
        listing(&query, &trie).unwrap(),
        "<1.500000, \"y\">: b\nend of table (1 entry)\n"
    );
}

#[test]
fn test_inconsistent_trie_is_internal_error() {
    let mut trie = MemoTrie::new();
    trie.insert(&[ArgValue::Int(1)], "one");
    let info = CallTableInfo {
        method: EvalMethod::LoopCheck,
        input_steps: vec![StepKind::Int],
        root: trie.root(),
    };
    let corrupt = Corrupt(trie);
    let query = CallTableQuery::fill(&info, &corrupt, &[]).unwrap();

    let mut seen = 0;
    let err = query
        .enumerate(&corrupt, |_, _| {
            seen += 1;
            Ok(())
        })
        .unwrap_err();
    assert_eq!(seen, 1);
    assert!(err.is_internal());
    assert_eq!(
        err.to_string(),
        "internal error: trie lookup failed for 99 while enumerating"
    );
}

#[test]
fn test_visit_error_stops_enumeration() {
    let (trie, info) = shared_trie();
    let query = CallTableQuery::fill(&info, &trie, &[]).unwrap();
    let mut seen = 0;
    let err = query
        .enumerate(&trie, |_, _| {
            seen += 1;
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into())
        })
        .unwrap_err();
    assert_eq!(seen, 1);
    assert!(matches!(err, TableError::Io(_)));
}

#[test]
fn test_method_classification() {
    assert!(EvalMethod::MemoFastLoose.has_call_table());
    assert!(!EvalMethod::TableIoUnitize.has_call_table());
    assert!(EvalMethod::TableIoDecl.is_io_tabled());
    assert_eq!(EvalMethod::MinimalOwnStacks.table_name(), Some("minimal model table"));
    assert_eq!(EvalMethod::Normal.table_name(), None);
}
