//! トライへのアクセス
//!
//! トライ自体はテーブリングランタイムが所有します。このクレートはノードを
//! 不透明なハンドルとして扱い、値による検索と兄弟値の列挙だけを行います。

use crate::value::{ArgKind, ArgValue};
use std::io::{self, Write};

/// トライノードへのハンドル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub usize);

/// トライの読み取りインターフェース
pub trait TrieAccess {
    /// `node` から `key` をたどった先のノードを返す
    fn lookup(&self, node: NodeRef, key: &ArgValue) -> Option<NodeRef>;

    /// `node` に格納されている `kind` 型の値をすべて返す
    ///
    /// ノードにまだ値の表が作られていない場合は `None` を返します。
    fn values(&self, node: NodeRef, kind: ArgKind) -> Option<Vec<ArgValue>>;

    /// チップ（全引数が束縛された葉）の中身を表示する
    fn print_tip(&self, out: &mut dyn Write, node: NodeRef) -> io::Result<()> {
        writeln!(out, "trie node {}", node.0)
    }
}

#[derive(Debug, Default)]
struct MemoNode {
    children: Vec<(ArgValue, NodeRef)>,
    answer: Option<String>,
}

/// メモリ上のトライ
///
/// 値は挿入順に列挙されます。テストとデモ用のテーブリングランタイムが使います。
#[derive(Debug)]
pub struct MemoTrie {
    nodes: Vec<MemoNode>,
}

impl MemoTrie {
    /// 根ノードだけを持つトライを作成する
    pub fn new() -> Self {
        Self {
            nodes: vec![MemoNode::default()],
        }
    }

    /// 根ノード
    pub fn root(&self) -> NodeRef {
        NodeRef(0)
    }

    /// 引数タプルを登録し、その葉に答えを記録する
    pub fn insert(&mut self, key: &[ArgValue], answer: impl Into<String>) -> NodeRef {
        let mut node = self.root();
        for value in key {
            node = match self.lookup(node, value) {
                Some(next) => next,
                None => {
                    let next = NodeRef(self.nodes.len());
                    self.nodes.push(MemoNode::default());
                    self.nodes[node.0].children.push((value.clone(), next));
                    next
                }
            };
        }
        self.nodes[node.0].answer = Some(answer.into());
        node
    }

    /// ノード数
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 根ノードしかないかどうか
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}

impl Default for MemoTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl TrieAccess for MemoTrie {
    fn lookup(&self, node: NodeRef, key: &ArgValue) -> Option<NodeRef> {
        self.nodes
            .get(node.0)?
            .children
            .iter()
            .find(|(value, _)| value == key)
            .map(|(_, next)| *next)
    }

    fn values(&self, node: NodeRef, kind: ArgKind) -> Option<Vec<ArgValue>> {
        let children = &self.nodes.get(node.0)?.children;
        if children.is_empty() {
            return None;
        }
        Some(
            children
                .iter()
                .filter(|(value, _)| value.kind() == kind)
                .map(|(value, _)| value.clone())
                .collect(),
        )
    }

    fn print_tip(&self, out: &mut dyn Write, node: NodeRef) -> io::Result<()> {
        match self.nodes.get(node.0).and_then(|n| n.answer.as_deref()) {
            Some(answer) => writeln!(out, "{}", answer),
            None => writeln!(out, "uninitialized"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_shares_prefix() {
        let mut trie = MemoTrie::new();
        trie.insert(&[ArgValue::Int(1), ArgValue::Int(2)], "a");
        trie.insert(&[ArgValue::Int(1), ArgValue::Int(3)], "b");
        // root, 1, 1/2, 1/3
        assert_eq!(trie.len(), 4);

        let one = trie.lookup(trie.root(), &ArgValue::Int(1)).unwrap();
        assert_eq!(
            trie.values(one, ArgKind::Int),
            Some(vec![ArgValue::Int(2), ArgValue::Int(3)])
        );
        assert_eq!(trie.lookup(one, &ArgValue::Int(9)), None);
    }

    #[test]
    fn test_leaf_has_no_values() {
        let mut trie = MemoTrie::new();
        let leaf = trie.insert(&[ArgValue::Str("x".to_string())], "done");
        assert_eq!(trie.values(leaf, ArgKind::Int), None);

        let mut out = Vec::new();
        trie.print_tip(&mut out, leaf).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "done\n");
    }
}
