//! ヘルプテキストの保管と表示
//!
//! カテゴリとカテゴリ内の項目を番号（スロット）順に保持します。起動時に
//! コマンド表から既定のテキストを登録し、`document_category`/`document` で
//! 追加できます。

use crate::command::{Category, Command};
use std::io::{self, Write};
use thiserror::Error;

/// ヘルプの登録エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HelpError {
    #[error("category already exists")]
    CategoryExists,

    #[error("there is no such category")]
    NoSuchCategory,

    #[error("item already exists in that category")]
    ItemExists,
}

#[derive(Debug, Clone)]
struct HelpItem {
    slot: usize,
    name: String,
    text: String,
}

#[derive(Debug, Clone)]
struct HelpCategory {
    slot: usize,
    name: String,
    text: String,
    items: Vec<HelpItem>,
}

/// ヘルプテキストの保管庫
#[derive(Debug, Clone, Default)]
pub struct HelpStore {
    categories: Vec<HelpCategory>,
}

impl HelpStore {
    /// 空の保管庫
    pub fn new() -> Self {
        Self::default()
    }

    /// コマンド表の説明を登録した保管庫
    pub fn with_commands() -> Self {
        let mut store = Self::new();
        for (slot, category) in Category::ALL.into_iter().enumerate() {
            // カテゴリ名は重複しないので失敗しない
            let _ = store.add_category(category.name(), slot * 100, category.summary());
        }
        for (slot, command) in Command::ALL.into_iter().enumerate() {
            let _ = store.add_item(command.category().name(), command.name(), slot, command.summary());
        }
        store
    }

    pub fn add_category(&mut self, name: &str, slot: usize, text: &str) -> Result<(), HelpError> {
        if self.category(name).is_some() {
            return Err(HelpError::CategoryExists);
        }
        let pos = self.categories.partition_point(|c| c.slot <= slot);
        self.categories.insert(
            pos,
            HelpCategory {
                slot,
                name: name.to_string(),
                text: text.to_string(),
                items: Vec::new(),
            },
        );
        Ok(())
    }

    pub fn add_item(&mut self, category: &str, name: &str, slot: usize, text: &str) -> Result<(), HelpError> {
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.name == category)
            .ok_or(HelpError::NoSuchCategory)?;
        if category.items.iter().any(|i| i.name == name) {
            return Err(HelpError::ItemExists);
        }
        let pos = category.items.partition_point(|i| i.slot <= slot);
        category.items.insert(
            pos,
            HelpItem {
                slot,
                name: name.to_string(),
                text: text.to_string(),
            },
        );
        Ok(())
    }

    fn category(&self, name: &str) -> Option<&HelpCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// 補完用のカテゴリ名と項目名
    pub fn words(&self) -> Vec<String> {
        let mut words: Vec<String> = Vec::new();
        for category in &self.categories {
            words.push(category.name.clone());
            for item in &category.items {
                if !words.contains(&item.name) {
                    words.push(item.name.clone());
                }
            }
        }
        words
    }

    /// 引数なしの `help`
    pub fn print_overview(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "The following help categories are available:")?;
        for category in &self.categories {
            let first = category.text.lines().next().unwrap_or_default();
            writeln!(out, "    {:<12} {}", category.name, first)?;
        }
        writeln!(out)?;
        writeln!(out, "Type `help CATEGORY' for the commands in a category,")?;
        writeln!(out, "or `help COMMAND' for help on a particular command.")
    }

    /// `help WORD`: カテゴリ名ならその一覧、項目名なら一致するすべての項目
    pub fn print_word(&self, out: &mut dyn Write, word: &str) -> io::Result<()> {
        let mut found = false;
        if let Some(category) = self.category(word) {
            found = true;
            writeln!(out, "{}", category.text)?;
            for item in &category.items {
                writeln!(out, "    {}", item.name)?;
            }
        }
        for category in &self.categories {
            for item in category.items.iter().filter(|i| i.name == word) {
                found = true;
                writeln!(out, "{}", item.text)?;
            }
        }
        if !found {
            writeln!(out, "There is no help on `{}'.", word)?;
        }
        Ok(())
    }

    /// `help CATEGORY ITEM`
    pub fn print_item(&self, out: &mut dyn Write, category: &str, item: &str) -> io::Result<()> {
        let Some(cat) = self.category(category) else {
            return writeln!(out, "There is no help category named `{}'.", category);
        };
        match cat.items.iter().find(|i| i.name == item) {
            Some(found) => writeln!(out, "{}", found.text),
            None => writeln!(
                out,
                "There is no help item named `{}' in category `{}'.",
                item, category
            ),
        }
    }
}
