//! 宣言的デバッガが信頼するモジュールと手続き

use crate::event::ProcLayout;
use std::io::{self, Write};
use tracing::debug;

/// 信頼する対象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trusted {
    Module(String),
    /// `pred m.p/2` 形式の述語識別子
    Proc(String),
    StdLib,
}

impl Trusted {
    pub fn proc(proc: &ProcLayout) -> Self {
        Trusted::Proc(proc.pred_id())
    }

    fn describe(&self) -> String {
        match self {
            Trusted::Module(name) => format!("module {}", name),
            Trusted::Proc(id) => id.clone(),
            Trusted::StdLib => "the Mercury standard library".to_string(),
        }
    }

    /// `trust` コマンドの引数として再入力できる形
    pub fn to_args(&self) -> String {
        match self {
            Trusted::Module(name) => name.clone(),
            Trusted::Proc(id) => id.replacen(' ', "*", 1),
            Trusted::StdLib => "std lib".to_string(),
        }
    }
}

/// 信頼リスト（番号は一覧の位置）
#[derive(Debug, Clone, Default)]
pub struct TrustList {
    items: Vec<Trusted>,
}

impl TrustList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既にあれば何もしない
    pub fn add(&mut self, item: Trusted) {
        if !self.items.contains(&item) {
            debug!("trusting {:?}", item);
            self.items.push(item);
        }
    }

    /// 番号で削除する。該当がなければ `false`
    pub fn remove(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.items.remove(index);
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trusted> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `trusted` の一覧
    pub fn print(&self, out: &mut dyn Write) -> io::Result<()> {
        if self.items.is_empty() {
            return writeln!(out, "There are no trusted modules, predicates or functions.");
        }
        writeln!(out, "Trusted objects:")?;
        for (i, item) in self.items.iter().enumerate() {
            writeln!(out, "{}: {}", i, item.describe())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Determinism;

    #[test]
    fn test_add_remove_and_print() {
        let mut list = TrustList::new();
        let mut out = Vec::new();
        list.print(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "There are no trusted modules, predicates or functions.\n"
        );

        list.add(Trusted::Module("list".to_string()));
        list.add(Trusted::proc(&ProcLayout::pred("m", "p", 2, 0, Determinism::Det)));
        list.add(Trusted::StdLib);
        list.add(Trusted::StdLib);

        let mut out = Vec::new();
        list.print(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Trusted objects:\n0: module list\n1: pred m.p/2\n2: the Mercury standard library\n"
        );

        assert!(list.remove(0));
        assert!(!list.remove(2));
        assert_eq!(list.iter().next(), Some(&Trusted::Proc("pred m.p/2".to_string())));
        assert_eq!(list.iter().next().unwrap().to_args(), "pred*m.p/2");
    }
}
