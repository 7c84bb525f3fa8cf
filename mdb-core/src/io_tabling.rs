//! I/O テーブリングの段階
//!
//! 開始前、記録中、停止後の3段階を一方向に進みます。

use std::io::{self, Write};
use tracing::debug;

/// I/O テーブリングの段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoTablingPhase {
    Before,
    During,
    After,
}

impl IoTablingPhase {
    fn number(self) -> u8 {
        match self {
            IoTablingPhase::Before => 0,
            IoTablingPhase::During => 1,
            IoTablingPhase::After => 2,
        }
    }
}

/// 記録範囲の上限（停止前）
pub const IO_ACTION_MAX: u64 = u64::MAX;

/// I/O テーブリングの状態
#[derive(Debug, Clone)]
pub struct IoTabling {
    /// この実行ファイルで I/O テーブリングを使えるか
    pub allowed: bool,
    pub phase: IoTablingPhase,
    /// これまでに実行した I/O アクションの数
    pub counter: u64,
    pub counter_hwm: u64,
    pub start: u64,
    pub end: u64,
    pub start_event: Option<u64>,
    pub stop_event: Option<u64>,
}

impl IoTabling {
    pub fn new(allowed: bool) -> Self {
        Self {
            allowed,
            phase: IoTablingPhase::Before,
            counter: 0,
            counter_hwm: 0,
            start: 0,
            end: IO_ACTION_MAX,
            start_event: None,
            stop_event: None,
        }
    }

    /// 現在の段階の説明
    pub fn status_message(&self) -> &'static str {
        match self.phase {
            IoTablingPhase::Before => "I/O tabling has not yet started.",
            IoTablingPhase::During => "I/O tabling has started.",
            IoTablingPhase::After => "I/O tabling has stopped.",
        }
    }

    /// 記録を始める
    pub fn start(&mut self, event_number: u64) -> &'static str {
        match self.phase {
            IoTablingPhase::Before => {
                self.phase = IoTablingPhase::During;
                self.start = self.counter;
                self.end = IO_ACTION_MAX;
                self.start_event = Some(event_number);
                debug!("I/O tabling started at event {}", event_number);
                "I/O tabling started."
            }
            IoTablingPhase::During => "I/O tabling has already started.",
            IoTablingPhase::After => "I/O tabling has already stopped.",
        }
    }

    /// 記録をやめる
    pub fn stop(&mut self, event_number: u64) -> &'static str {
        match self.phase {
            IoTablingPhase::Before => "I/O tabling has not yet started.",
            IoTablingPhase::During => {
                self.phase = IoTablingPhase::After;
                self.end = self.counter_hwm;
                self.stop_event = Some(event_number);
                debug!("I/O tabling stopped at event {}", event_number);
                "I/O tabling stopped."
            }
            IoTablingPhase::After => "I/O tabling has already stopped.",
        }
    }

    /// I/O アクションを1つ数える
    pub fn record_action(&mut self) {
        self.counter += 1;
        self.counter_hwm = self.counter_hwm.max(self.counter);
    }

    /// `table_io stats` と `stats io_tabling` の出力
    pub fn print_stats(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "phase = {}", self.phase.number())?;
        writeln!(out, "counter = {}", self.counter)?;
        writeln!(out, "hwm = {}", self.counter_hwm)?;
        writeln!(out, "start = {}", self.start)?;
        writeln!(out, "end = {}", self.end)
    }
}

impl Default for IoTabling {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_machine() {
        let mut io = IoTabling::new(true);
        assert_eq!(io.stop(1), "I/O tabling has not yet started.");
        io.record_action();
        assert_eq!(io.start(3), "I/O tabling started.");
        assert_eq!(io.start, 1);
        assert_eq!(io.start(4), "I/O tabling has already started.");
        io.record_action();
        io.record_action();
        assert_eq!(io.stop(9), "I/O tabling stopped.");
        assert_eq!(io.end, 3);
        assert_eq!(io.stop_event, Some(9));
        assert_eq!(io.start(10), "I/O tabling has already stopped.");
        assert_eq!(io.status_message(), "I/O tabling has stopped.");
    }

    #[test]
    fn test_stats_format() {
        let io = IoTabling::new(true);
        let mut out = Vec::new();
        io.print_stats(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("phase = 0\ncounter = 0\n"));
    }
}
