//! 対話的クエリ

use super::report;
use crate::directive::{Directive, StopPolicy};
use crate::event::Event;
use crate::runtime::QueryKind;
use crate::session::Session;
use crate::Result;

/// 残りの単語をモジュール名として `mmc_options` と一緒に渡す
fn run_query(session: &mut Session, kind: QueryKind, words: &[String]) -> Result<Directive> {
    let options = session.settings.mmc_options.clone();
    let result = session
        .collab
        .engine
        .query(kind, &options, &words[1..], session.console.out());
    report(session, result)
}

pub fn query(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    run_query(session, QueryKind::Normal, words)
}

pub fn cc_query(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    run_query(session, QueryKind::CcQuery, words)
}

pub fn io_query(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    run_query(session, QueryKind::IoQuery, words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::Harness;
    use crate::runtime::{Collaborators, Engine};
    use crate::settings::Features;
    use std::io::Write;

    struct EchoQuery;

    impl Engine for EchoQuery {
        fn query(&mut self, kind: QueryKind, options: &str, modules: &[String], out: &mut dyn Write) -> Result<()> {
            writeln!(out, "{:?} [{}] {}", kind, options, modules.join(","))?;
            Ok(())
        }
    }

    #[test]
    fn test_query_passes_options_and_modules() {
        let mut collab = Collaborators::default();
        collab.engine = Box::new(EchoQuery);
        let mut h = Harness::with(Vec::<String>::new(), collab, Features::default());
        h.run("mmc_options --no-warn -O2");
        h.run("cc_query list int");
        assert_eq!(h.out(), "CcQuery [--no-warn -O2] list,int\n");
        h.run("io_query");
        assert_eq!(h.out(), "IoQuery [--no-warn -O2] \n");
    }

    #[test]
    fn test_query_without_engine() {
        let mut h = Harness::new();
        h.run("query");
        assert_eq!(h.err(), "mdb: not available in this configuration.\n");
    }
}
