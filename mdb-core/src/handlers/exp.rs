//! 実験的なコマンド（深さヒストグラムと dice）

use super::{keep, usage};
use crate::directive::{Directive, StopPolicy};
use crate::event::Event;
use crate::options;
use crate::reader::os_message;
use crate::runtime::HistogramKind;
use crate::session::Session;
use crate::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// ヒストグラムをタブ区切りで書く
fn write_histogram(out: &mut dyn Write, title: &str, counts: &[u64]) -> io::Result<()> {
    writeln!(out, "{} histogram", title)?;
    for (depth, count) in counts.iter().enumerate() {
        writeln!(out, "{}\t{}", depth, count)?;
    }
    Ok(())
}

fn histogram_to_file(session: &mut Session, words: &[String], kind: HistogramKind) -> Result<Directive> {
    let [_, path] = words else {
        return usage(session, words);
    };
    let Some(counts) = session.collab.engine.histogram(kind) else {
        session.problem("no histogram has been collected")?;
        return keep();
    };
    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            writeln!(
                session.err(),
                "mdb: cannot open file `{}' for output: {}.",
                path,
                os_message(&e)
            )?;
            return keep();
        }
    };
    let title = match kind {
        HistogramKind::All => "All-inclusive",
        HistogramKind::Exp => "Experimental",
    };
    let mut writer = BufWriter::new(file);
    let written = write_histogram(&mut writer, title, &counts).and_then(|()| writer.flush());
    if let Err(e) = written {
        writeln!(session.err(), "mdb: error closing file `{}': {}.", path, os_message(&e))?;
    }
    keep()
}

pub fn histogram_all(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    histogram_to_file(session, words, HistogramKind::All)
}

pub fn histogram_exp(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    histogram_to_file(session, words, HistogramKind::Exp)
}

pub fn clear_histogram(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    session.collab.engine.clear_histogram();
    keep()
}

pub fn dice(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Ok((first, mut opts)) = options::dice(words) else {
        return usage(session, words);
    };
    if first != words.len() {
        return usage(session, words);
    }
    if opts.pass_trace_counts.is_none() {
        opts.pass_trace_counts = session.settings.pass_trace_counts.clone();
    }
    if opts.fail_trace_counts.is_none() {
        opts.fail_trace_counts = session.settings.fail_trace_counts.clone();
    }

    if opts.pass_trace_counts.is_none() {
        writeln!(
            session.err(),
            "mdb: No passing trace counts file specified.\n\
             mdb: Specify one with the -p option or using the `set' command."
        )?;
        return keep();
    }
    if opts.fail_trace_counts.is_none() {
        writeln!(
            session.err(),
            "mdb: No failing trace counts file specified.\n\
             mdb: Specify one with the -f option or using the `set' command."
        )?;
        return keep();
    }

    let table = match session.collab.trace_counts.dice(&opts) {
        Ok(table) => table,
        Err(e) => {
            writeln!(session.err(), "mdb: {}", e)?;
            return keep();
        }
    };
    let Some(path) = &opts.out_file else {
        write!(session.out(), "{}", table)?;
        return keep();
    };
    match File::create(path) {
        Ok(mut file) => {
            if let Err(e) = file.write_all(table.as_bytes()).and_then(|()| file.flush()) {
                writeln!(session.err(), "mdb: Error closing file `{}': {}", path, os_message(&e))?;
            }
        }
        Err(e) => {
            writeln!(session.err(), "mdb: Error opening file `{}': {}", path, os_message(&e))?;
        }
    }
    keep()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::Harness;
    use crate::options::DiceOpts;
    use crate::runtime::{Collaborators, Engine, TraceCounts};
    use crate::settings::Features;
    use tempfile::TempDir;

    struct Counting {
        all: Vec<u64>,
        exp: Vec<u64>,
    }

    impl Engine for Counting {
        fn histogram(&self, kind: HistogramKind) -> Option<Vec<u64>> {
            Some(match kind {
                HistogramKind::All => self.all.clone(),
                HistogramKind::Exp => self.exp.clone(),
            })
        }

        fn clear_histogram(&mut self) {
            self.exp.iter_mut().for_each(|c| *c = 0);
        }
    }

    struct Dicer;

    impl TraceCounts for Dicer {
        fn dice(&mut self, opts: &DiceOpts) -> Result<String> {
            Ok(format!(
                "{} vs {} top {}\n",
                opts.pass_trace_counts.as_deref().unwrap_or_default(),
                opts.fail_trace_counts.as_deref().unwrap_or_default(),
                opts.lines
            ))
        }
    }

    fn harness() -> Harness {
        let mut collab = Collaborators::default();
        collab.engine = Box::new(Counting {
            all: vec![1, 4, 2],
            exp: vec![0, 3],
        });
        collab.trace_counts = Box::new(Dicer);
        let features = Features {
            histogram: true,
            ..Features::default()
        };
        Harness::with(Vec::<String>::new(), collab, features)
    }

    #[test]
    fn test_histograms_are_written_to_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hist");
        let path = path.to_str().unwrap();

        let mut h = harness();
        h.run(&format!("histogram_all {}", path));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "All-inclusive histogram\n0\t1\n1\t4\n2\t2\n"
        );
        h.run("clear_histogram");
        h.run(&format!("histogram_exp {}", path));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "Experimental histogram\n0\t0\n1\t0\n"
        );
        assert_eq!(h.err(), "");

        h.run("histogram_all");
        h.run("clear_histogram now");
        assert_eq!(h.err().matches("usage error").count(), 2);
    }

    #[test]
    fn test_histogram_file_cannot_be_opened() {
        let mut h = harness();
        h.run("histogram_exp /nonexistent/dir/hist");
        assert_eq!(
            h.err(),
            "mdb: cannot open file `/nonexistent/dir/hist' for output: No such file or directory.\n"
        );
    }

    #[test]
    fn test_dice_needs_both_files() {
        let mut h = harness();
        h.run("dice");
        assert!(h.err().starts_with("mdb: No passing trace counts file specified.\n"));
        h.run("dice -p pass.tc");
        assert!(h.err().starts_with("mdb: No failing trace counts file specified.\n"));

        h.run("set fail_trace_counts fail.tc");
        h.run("dice -p pass.tc -n 5");
        assert_eq!(h.out(), "pass.tc vs fail.tc top 5\n");
    }

    #[test]
    fn test_dice_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dice.out");
        let path = path.to_str().unwrap();

        let mut h = harness();
        h.run(&format!("dice -p a -f b -o {}", path));
        assert_eq!(h.out(), "");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a vs b top 50\n");
    }
}
