//! 未処理の入力行キュー
//!
//! `source` で読み込んだ行、`;` で分割した残り、`retry -o` の再投入など、
//! 端末から読む前に処理すべき行を保持します。

use std::collections::VecDeque;
use tracing::trace;

/// 入力行のキュー（先頭と末尾の両方に挿入できる FIFO）
#[derive(Debug, Default, Clone)]
pub struct LineQueue {
    lines: VecDeque<String>,
}

impl LineQueue {
    /// 空のキューを作成する
    pub fn new() -> Self {
        Self::default()
    }

    /// 先頭に1行挿入する
    pub fn push_front(&mut self, line: impl Into<String>) {
        let line = line.into();
        trace!("queue head <- {:?}", line);
        self.lines.push_front(line);
    }

    /// 末尾に1行追加する
    pub fn push_back(&mut self, line: impl Into<String>) {
        let line = line.into();
        trace!("queue tail <- {:?}", line);
        self.lines.push_back(line);
    }

    /// 複数行を元の順序のまま先頭に挿入する
    ///
    /// 挿入後の先頭は `lines` の最初の行で、既存の行はその後ろに続きます。
    pub fn insert_lines_at_head<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        let lines: Vec<String> = lines.into_iter().collect();
        trace!("queue head <- {} lines", lines.len());
        for line in lines.into_iter().rev() {
            self.lines.push_front(line);
        }
    }

    /// 先頭の行を取り出す
    pub fn pop_front(&mut self) -> Option<String> {
        self.lines.pop_front()
    }

    /// 先頭の行を参照する
    pub fn front(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 待機中の行を先頭から順に返す
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}
