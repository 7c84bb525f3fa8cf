//! 起動時の設定
//!
//! 初期化スクリプトの場所と環境変数を集めて、最初のプロンプトの前に
//! セッションへ反映します。スクリプトは `$HOME/.mdbrc`、`./.mdbrc`、
//! `MDB_INIT` の順に読み、各行をキューの末尾に追加します。

use crate::reader::os_message;
use crate::session::Session;
use crate::words::parse_natural;
use crate::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// ホームディレクトリとカレントディレクトリで探すファイル名
pub const INIT_FILE_NAME: &str = ".mdbrc";

/// 追加の初期化スクリプトを指す環境変数
pub const INIT_ENV: &str = "MDB_INIT";

/// 端末の行数（スクロール制御の上限になる）
pub const LINES_ENV: &str = "LINES";

/// 設定されていれば起動時のバナーを出さない
pub const SUPPRESS_BANNER_ENV: &str = "MDB_SUPPRESS_BANNER";

/// 読み込む初期化スクリプト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitScript {
    pub path: PathBuf,
    /// 読めなかったときに報告するか
    pub required: bool,
}

impl InitScript {
    fn optional(path: PathBuf) -> Self {
        Self { path, required: false }
    }

    fn required(path: PathBuf) -> Self {
        Self { path, required: true }
    }
}

/// 起動時の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub scripts: Vec<InitScript>,
    pub scroll_limit: Option<usize>,
    pub show_banner: bool,
}

impl StartupConfig {
    /// 実際の環境から集める
    pub fn from_env() -> Self {
        Self::discover(home::home_dir(), Path::new("."), |name| std::env::var(name).ok())
    }

    /// ホームディレクトリ、カレントディレクトリ、環境変数の読み方を指定して集める
    pub fn discover(home: Option<PathBuf>, cwd: &Path, var: impl Fn(&str) -> Option<String>) -> Self {
        let mut scripts = Vec::new();
        if let Some(home) = home {
            scripts.push(InitScript::optional(home.join(INIT_FILE_NAME)));
        }
        scripts.push(InitScript::optional(cwd.join(INIT_FILE_NAME)));
        if let Some(init) = var(INIT_ENV).filter(|s| !s.is_empty()) {
            scripts.push(InitScript::required(PathBuf::from(init)));
        }

        let scroll_limit = var(LINES_ENV).and_then(|lines| parse_natural(&lines));
        let show_banner = var(SUPPRESS_BANNER_ENV).is_none();
        debug!("init scripts: {:?}", scripts);
        Self {
            scripts,
            scroll_limit,
            show_banner,
        }
    }

    /// 標準の初期化スクリプトを読まない
    pub fn without_init_scripts(mut self) -> Self {
        self.scripts.clear();
        self
    }

    /// 標準のスクリプトの後に読むファイルを加える
    pub fn with_script(mut self, path: impl Into<PathBuf>) -> Self {
        self.scripts.push(InitScript::required(path.into()));
        self
    }
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            scripts: Vec::new(),
            scroll_limit: None,
            show_banner: true,
        }
    }
}

impl Session {
    /// 起動時の設定を反映する。読み込んだスクリプトの数を返す
    pub fn apply_startup(&mut self, config: &StartupConfig) -> Result<usize> {
        if let Some(limit) = config.scroll_limit {
            self.settings.scroll_limit = limit;
        }
        let mut loaded = 0;
        for script in &config.scripts {
            if self.append_script(&script.path, script.required)? {
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    /// ファイルの全行をキューの末尾に追加する
    ///
    /// `source` と違い、既にキューにある行より後に実行されます。
    pub fn append_script(&mut self, path: &Path, required: bool) -> Result<bool> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                debug!("loading init script {} ({} lines)", path.display(), text.lines().count());
                for line in text.lines() {
                    self.queue.push_back(line);
                }
                Ok(true)
            }
            Err(e) => {
                debug!("skipping init script {}: {}", path.display(), e);
                if required {
                    writeln!(self.err(), "{}: {}.", path.display(), os_message(&e))?;
                }
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{Console, ScriptedInput, SharedBuffer};
    use crate::runtime::Collaborators;
    use crate::settings::Features;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn session(err: SharedBuffer) -> Session {
        let console = Console::new(
            Box::new(ScriptedInput::default()),
            Box::new(SharedBuffer::new()),
            Box::new(err),
        );
        Session::new(console, Collaborators::default(), Features::default()).unwrap()
    }

    #[test]
    fn test_discover_order() {
        let config = StartupConfig::discover(
            Some(PathBuf::from("/home/u")),
            Path::new("/work"),
            env(&[("MDB_INIT", "/etc/mdb.init"), ("LINES", "40")]),
        );
        let paths: Vec<&Path> = config.scripts.iter().map(|s| s.path.as_path()).collect();
        assert_eq!(
            paths,
            [
                Path::new("/home/u/.mdbrc"),
                Path::new("/work/.mdbrc"),
                Path::new("/etc/mdb.init"),
            ]
        );
        assert!(config.scripts[2].required);
        assert_eq!(config.scroll_limit, Some(40));
        assert!(config.show_banner);
    }

    #[test]
    fn test_discover_without_home_or_env() {
        let config = StartupConfig::discover(
            None,
            Path::new("."),
            env(&[("LINES", "many"), ("MDB_SUPPRESS_BANNER", "1")]),
        );
        assert_eq!(config.scripts.len(), 1);
        assert_eq!(config.scroll_limit, None);
        assert!(!config.show_banner);

        let config = config.without_init_scripts().with_script("extra.mdb");
        assert_eq!(config.scripts, [InitScript::required(PathBuf::from("extra.mdb"))]);
    }

    #[test]
    fn test_apply_appends_in_order() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let work = dir.path().join("work");
        std::fs::create_dir_all(&home).unwrap();
        std::fs::create_dir_all(&work).unwrap();
        std::fs::write(home.join(INIT_FILE_NAME), "alias s step\necho on\n").unwrap();
        std::fs::write(work.join(INIT_FILE_NAME), "scroll off\n").unwrap();

        let config = StartupConfig::discover(Some(home), &work, env(&[("LINES", "30")]));
        let err = SharedBuffer::new();
        let mut s = session(err.clone());
        s.queue.push_back("already queued");
        assert_eq!(s.apply_startup(&config).unwrap(), 2);
        let queued: Vec<&str> = s.queue.iter().collect();
        assert_eq!(queued, ["already queued", "alias s step", "echo on", "scroll off"]);
        assert_eq!(s.settings.scroll_limit, 30);
        assert_eq!(err.take(), "");
    }

    #[test]
    fn test_missing_required_script_is_reported() {
        let dir = TempDir::new().unwrap();
        let config = StartupConfig::discover(
            None,
            dir.path(),
            env(&[("MDB_INIT", "/nonexistent/mdb.init")]),
        );
        let err = SharedBuffer::new();
        let mut s = session(err.clone());
        assert_eq!(s.apply_startup(&config).unwrap(), 0);
        assert_eq!(err.take(), "/nonexistent/mdb.init: No such file or directory.\n");
    }
}
