//! デバッガの状態を `source` で読み戻せるスクリプトにする
//!
//! エイリアス、設定値、ブレークポイント、ブラウザ設定、信頼リスト、
//! トレースカウントファイル、`list` の検索パスを順に書き出します。
//! 特定イベントのブレークポイント（`break here`）はコマンドで再現できないので、
//! 番号を `unsaved` に集めて呼び出し側に知らせます。

use crate::breakpoint::{SpyAction, SpyId, SpyPoint, SpyTarget, SpyWhen};
use crate::session::Session;
use crate::words::quote_word;

/// 書き出す内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedState {
    pub commands: Vec<String>,
    /// 再現できなかったブレークポイント
    pub unsaved: Vec<SpyId>,
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

/// ブレークポイントを作り直すコマンド
fn spy_point_commands(point: &SpyPoint) -> Option<Vec<String>> {
    let mut args = Vec::new();
    match point.when {
        SpyWhen::All => args.push("-a".to_string()),
        SpyWhen::Interface => args.push("-i".to_string()),
        SpyWhen::Entry => args.push("-e".to_string()),
        SpyWhen::Specific | SpyWhen::LineNo => {}
    }
    args.push(
        match point.action {
            SpyAction::Stop => "-S",
            SpyAction::Print => "-P",
        }
        .to_string(),
    );
    if point.ignore_count > 0 {
        args.push(format!("{} {}", point.ignore_when.short_option(), point.ignore_count));
    }
    // `-n` はそれ以降の `-p` にだけ効くので、警告するものを先に並べる
    for item in point.print_list.iter().filter(|i| i.warn) {
        args.push(format!("-p {}", quote_word(item.word())));
    }
    if point.print_list.iter().any(|i| !i.warn) {
        args.push("-n".to_string());
        for item in point.print_list.iter().filter(|i| !i.warn) {
            args.push(format!("-p {}", quote_word(item.word())));
        }
    }
    match &point.target {
        SpyTarget::Proc(proc) => args.push(proc.spec()),
        SpyTarget::Line { file, line } => args.push(format!("{}:{}", quote_word(file), line)),
        SpyTarget::Label { .. } => return None,
    }

    let mut commands = vec![format!("break {}", args.join(" "))];
    if let Some(condition) = &point.condition {
        commands.push(format!("condition {}", condition.to_args()));
    }
    if !point.enabled {
        commands.push("disable".to_string());
    }
    Some(commands)
}

impl Session {
    /// 現在の状態を再現するコマンド列
    pub fn saved_state(&self) -> SavedState {
        let mut state = SavedState::default();
        let commands = &mut state.commands;
        let settings = &self.settings;

        for (name, body) in self.aliases.iter() {
            let body: Vec<String> = body.iter().map(|w| quote_word(w)).collect();
            commands.push(format!("alias {} {}", quote_word(name), body.join(" ")));
        }
        commands.push(format!("printlevel {}", settings.print_level));
        commands.push(format!("echo {}", on_off(settings.echo_commands)));
        commands.push(format!("scroll {}", on_off(settings.scroll_control)));
        commands.push(format!("scroll {}", settings.scroll_limit));
        commands.push(format!("stack_default_limit {}", settings.stack_default_limit));
        commands.push(format!("context {}", settings.context.keyword()));
        commands.push(format!("goal_paths {}", on_off(settings.goal_paths)));

        for (id, point) in self.spies.iter() {
            match spy_point_commands(point) {
                Some(point_commands) => commands.extend(point_commands),
                None => state.unsaved.push(id),
            }
        }

        commands.push(format!("scope {}", settings.scope.keyword()));
        commands.extend(settings.browser.to_commands());
        for item in self.trust.iter() {
            commands.push(format!("trust {}", item.to_args()));
        }
        if let Some(file) = &settings.fail_trace_counts {
            commands.push(format!("set fail_trace_counts {}", quote_word(file)));
        }
        if let Some(file) = &settings.pass_trace_counts {
            commands.push(format!("set pass_trace_counts {}", quote_word(file)));
        }
        commands.push(format!("set list_context_lines {}", settings.list_context_lines));
        if !self.listing.dirs().is_empty() {
            let dirs: Vec<String> = self.listing.dirs().iter().map(|d| quote_word(d)).collect();
            commands.push(format!("set list_path {}", dirs.join(" ")));
        }
        state
    }
}
