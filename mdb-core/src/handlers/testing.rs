//! ハンドラのテスト用の共通部品

use crate::console::{Console, ScriptedInput, SharedBuffer};
use crate::directive::{Directive, StopPolicy};
use crate::event::{Determinism, Event, Port, ProcLayout};
use crate::handlers::handler_for;
use crate::runtime::Collaborators;
use crate::session::Session;
use crate::settings::Features;
use crate::command::Command;

/// 出力とエラー出力を捕まえたセッション
pub struct Harness {
    pub session: Session,
    pub out: SharedBuffer,
    pub err: SharedBuffer,
    pub policy: StopPolicy,
    pub event: Event,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(Vec::<String>::new(), Collaborators::default(), Features::default())
    }

    /// 端末からの入力行とコラボレータを指定する
    pub fn with<I, S>(input: I, collab: Collaborators, features: Features) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let console = Console::new(
            Box::new(ScriptedInput::new(input)),
            Box::new(out.clone()),
            Box::new(err.clone()),
        );
        let session = Session::new(console, collab, features).unwrap();
        Self {
            session,
            out,
            err,
            policy: StopPolicy::default(),
            event: Event::new(10, 4, 3, Port::Call, ProcLayout::pred("m", "p", 2, 0, Determinism::Det))
                .at("m.m", 12),
        }
    }

    /// 対話中として扱う（確認メッセージを出させる）
    pub fn interacting(mut self) -> Self {
        self.session.console.set_interacting(true);
        self
    }

    /// 1行を単語に分けてハンドラを直接呼ぶ
    pub fn run(&mut self, line: &str) -> Directive {
        let words = words(line);
        let command = Command::lookup(&words[0]).unwrap();
        handler_for(command)(&mut self.session, &words, &mut self.policy, &self.event).unwrap()
    }

    pub fn out(&self) -> String {
        self.out.take()
    }

    pub fn err(&self) -> String {
        self.err.take()
    }
}

pub fn words(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}
