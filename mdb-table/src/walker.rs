//! 呼び出しテーブルの列挙
//!
//! 束縛されていない引数位置ごとに1段ずつ、明示的なスタックで
//! 深さ優先にトライをたどります。外側の引数ほどゆっくり変化します。

use crate::call_table::CallTableQuery;
use crate::error::TableError;
use crate::trie::{NodeRef, TrieAccess};
use crate::value::{ArgKind, ArgValue};
use tracing::trace;

/// 1つの引数位置の列挙状態
#[derive(Debug)]
struct Level {
    /// この位置で取り得る値（開いたときに一度だけ取得する）
    snapshot: Vec<ArgValue>,
    /// 次に試す値の位置
    index: usize,
    /// 値を検索するノード
    start: NodeRef,
}

impl Level {
    fn open(trie: &dyn TrieAccess, start: NodeRef, kind: ArgKind) -> Self {
        let snapshot = trie.values(start, kind).unwrap_or_default();
        trace!("opened level at {:?} with {} values", start, snapshot.len());
        Self {
            snapshot,
            index: 0,
            start,
        }
    }

    fn next_value(&mut self) -> Option<ArgValue> {
        let value = self.snapshot.get(self.index).cloned();
        if value.is_some() {
            self.index += 1;
        }
        value
    }
}

impl CallTableQuery {
    /// 未束縛の引数位置をすべて列挙し、完全に束縛されたタプルごとに `visit` を呼ぶ
    ///
    /// 全引数が束縛済みならチップを1つだけ訪問します。戻り値は訪問したチップの数です。
    pub fn enumerate<F>(&self, trie: &dyn TrieAccess, mut visit: F) -> Result<usize, TableError>
    where
        F: FnMut(&[ArgValue], NodeRef) -> Result<(), TableError>,
    {
        let mut values = self.bound_values();
        if self.is_complete() {
            visit(&values, self.node)?;
            return Ok(1);
        }

        let total = self.args.len();
        let mut tips = 0;
        let mut stack = vec![Level::open(trie, self.node, self.args[self.bound].kind)];

        while let Some(level) = stack.last_mut() {
            let Some(value) = level.next_value() else {
                // この位置は尽きたので一つ外側へ戻る
                stack.pop();
                continue;
            };

            let next = trie
                .lookup(level.start, &value)
                .ok_or_else(|| TableError::BadLookup(value.to_string()))?;

            values.truncate(self.bound + stack.len() - 1);
            values.push(value);

            if values.len() == total {
                visit(&values, next)?;
                tips += 1;
            } else {
                let kind = self.args[values.len()].kind;
                stack.push(Level::open(trie, next, kind));
            }
        }

        Ok(tips)
    }
}

/// "end of table (N entries)" の件数部分
pub fn entry_count(tips: usize) -> String {
    if tips == 1 {
        "1 entry".to_string()
    } else {
        format!("{} entries", tips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_table::{CallTableInfo, EvalMethod, StepKind};
    use crate::trie::MemoTrie;
    use crate::value::format_tuple;

    fn int_string_table() -> (MemoTrie, CallTableInfo) {
        let mut trie = MemoTrie::new();
        for n in [1, 2] {
            for s in ["a", "b"] {
                trie.insert(
                    &[ArgValue::Int(n), ArgValue::Str(s.to_string())],
                    format!("{}{}", n, s),
                );
            }
        }
        let info = CallTableInfo {
            method: EvalMethod::MemoStrict,
            input_steps: vec![StepKind::Int, StepKind::String],
            root: trie.root(),
        };
        (trie, info)
    }

    fn collect(query: &CallTableQuery, trie: &MemoTrie) -> (usize, Vec<String>) {
        let mut seen = Vec::new();
        let count = query
            .enumerate(trie, |values, _| {
                seen.push(format_tuple(values));
                Ok(())
            })
            .unwrap();
        (count, seen)
    }

    #[test]
    fn test_enumerate_outer_varies_slowest() {
        let (trie, info) = int_string_table();
        let query = CallTableQuery::fill(&info, &trie, &[]).unwrap();
        let (count, seen) = collect(&query, &trie);
        assert_eq!(count, 4);
        assert_eq!(
            seen,
            vec!["<1, \"a\">", "<1, \"b\">", "<2, \"a\">", "<2, \"b\">"]
        );
        assert_eq!(entry_count(count), "4 entries");
    }

    #[test]
    fn test_enumerate_with_prefix() {
        let (trie, info) = int_string_table();
        let query = CallTableQuery::fill(&info, &trie, &["2".to_string()]).unwrap();
        let (count, seen) = collect(&query, &trie);
        assert_eq!(count, 2);
        assert_eq!(seen, vec!["<2, \"a\">", "<2, \"b\">"]);
    }

    #[test]
    fn test_all_bound_visits_single_tip() {
        let (trie, info) = int_string_table();
        let given = vec!["1".to_string(), "a".to_string()];
        let query = CallTableQuery::fill(&info, &trie, &given).unwrap();
        assert!(query.is_complete());

        let mut tips = Vec::new();
        let count = query
            .enumerate(&trie, |values, node| {
                let mut out = Vec::new();
                trie.print_tip(&mut out, node)?;
                tips.push(format!("{}: {}", format_tuple(values), String::from_utf8_lossy(&out)));
                Ok(())
            })
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(tips, vec!["<1, \"a\">: 1a\n"]);
        assert_eq!(entry_count(count), "1 entry");
    }

    #[test]
    fn test_empty_table_has_no_entries() {
        let trie = MemoTrie::new();
        let info = CallTableInfo {
            method: EvalMethod::LoopCheck,
            input_steps: vec![StepKind::Float],
            root: trie.root(),
        };
        let query = CallTableQuery::fill(&info, &trie, &[]).unwrap();
        let (count, seen) = collect(&query, &trie);
        assert_eq!(count, 0);
        assert!(seen.is_empty());
    }

    #[test]
    fn test_uneven_branches() {
        let mut trie = MemoTrie::new();
        trie.insert(&[ArgValue::Int(1), ArgValue::Int(10), ArgValue::Int(100)], "x");
        trie.insert(&[ArgValue::Int(2), ArgValue::Int(20), ArgValue::Int(200)], "y");
        trie.insert(&[ArgValue::Int(2), ArgValue::Int(20), ArgValue::Int(201)], "z");
        let info = CallTableInfo {
            method: EvalMethod::MemoStrict,
            input_steps: vec![StepKind::Int; 3],
            root: trie.root(),
        };
        let query = CallTableQuery::fill(&info, &trie, &[]).unwrap();
        let (count, seen) = collect(&query, &trie);
        assert_eq!(count, 3);
        assert_eq!(seen, vec!["<1, 10, 100>", "<2, 20, 200>", "<2, 20, 201>"]);
    }
}
