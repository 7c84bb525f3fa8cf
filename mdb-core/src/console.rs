//! 端末入出力
//!
//! 行入力は `LineInput` トレイトの背後に隠します。CLI は rustyline を使い、
//! テストは `ScriptedInput` で決まった行を流し込みます。
//! 出力ストリームとエラーストリームは別々に保持し、エラーを書く前には
//! 必ず出力側をフラッシュします。

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::rc::Rc;
use tracing::warn;

/// 1行読み込みの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadLine {
    /// 改行を除いた1行
    Line(String),
    /// 入力の終わり
    Eof,
    /// 割り込みシグナルで読み込みが中断された
    Interrupted,
}

/// プロンプトを表示して1行読む入力源
pub trait LineInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadLine>;
}

/// 標準入力から読む入力源
#[derive(Debug, Default)]
pub struct StdinInput;

impl LineInput for StdinInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadLine> {
        let mut stdout = io::stdout();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => Ok(ReadLine::Eof),
            Ok(_) => {
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Ok(ReadLine::Line(line))
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(ReadLine::Interrupted),
            Err(e) => Err(e),
        }
    }
}

/// あらかじめ用意した行を順に返す入力源
///
/// 行が尽きると EOF を返します。`with_transcript` を指定すると、
/// プロンプトをそのバッファに書き出します。
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<ReadLine>,
    transcript: Option<SharedBuffer>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(|l| ReadLine::Line(l.into())).collect(),
            transcript: None,
        }
    }

    /// プロンプトの書き出し先を指定する
    pub fn with_transcript(mut self, buffer: SharedBuffer) -> Self {
        self.transcript = Some(buffer);
        self
    }

    /// 割り込みを1回挟む
    pub fn push_interrupt(&mut self) {
        self.lines.push_back(ReadLine::Interrupted);
    }
}

impl LineInput for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadLine> {
        if let Some(transcript) = self.transcript.as_mut() {
            transcript.write_all(prompt.as_bytes())?;
        }
        Ok(self.lines.pop_front().unwrap_or(ReadLine::Eof))
    }
}

/// 複数の所有者から書き込める共有バッファ
///
/// テストで `Console` の出力を後から読み出すために使います。
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// これまでに書き込まれた内容
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// 内容を取り出して空にする
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.borrow_mut());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// デバッガの入出力
pub struct Console {
    input: Box<dyn LineInput>,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    /// 最後の行を端末から読んだかどうか（キューやファイルからではなく）
    interacting: bool,
}

impl Console {
    pub fn new(input: Box<dyn LineInput>, out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            input,
            out,
            err,
            interacting: false,
        }
    }

    /// 標準入出力を使うコンソール
    pub fn stdio(input: Box<dyn LineInput>) -> Self {
        Self::new(input, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// 出力ストリーム
    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    /// エラーストリーム（出力ストリームをフラッシュしてから返す）
    ///
    /// フラッシュの失敗はログに残し、エラーの報告は続ける
    pub fn err(&mut self) -> &mut dyn Write {
        if let Err(e) = self.out.flush() {
            warn!("flushing output before an error message failed: {}", e);
        }
        &mut *self.err
    }

    /// 出力ストリームをフラッシュする
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// プロンプトを出して1行読む
    pub fn read_line(&mut self, prompt: &str) -> io::Result<ReadLine> {
        self.out.flush()?;
        self.input.read_line(prompt)
    }

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    pub fn set_interacting(&mut self, interacting: bool) {
        self.interacting = interacting;
    }

    /// 入力源を差し替える
    pub fn set_input(&mut self, input: Box<dyn LineInput>) {
        self.input = input;
    }
}
