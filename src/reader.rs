// 📖 Stream Reader - lazy, line-at-a-time event source
//
// Holds at most one line in memory. Rejected lines are logged and dropped;
// an I/O failure ends the stream with a fatal error.

use crate::error::PipelineError;
use crate::events::{InventoryEvent, MoneyEvent};
use crate::parser::{InventoryParser, LogParser, MoneyParser};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Per-pass line accounting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub lines: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub blank: u64,
}

/// EventReader - forward-only iterator of accepted events
///
/// One pass per handle. A fresh pass means opening the source again.
pub struct EventReader<R, P> {
    reader: R,
    parser: P,
    path: PathBuf,
    buffer: String,
    stats: ReadStats,
    finished: bool,
}

pub type InventoryReader = EventReader<BufReader<File>, InventoryParser>;
pub type MoneyReader = EventReader<BufReader<File>, MoneyParser>;

impl<P: LogParser> EventReader<BufReader<File>, P> {
    /// Open a log file for one pass
    pub fn open(path: &Path, parser: P) -> Result<Self, PipelineError> {
        let file = File::open(path).map_err(|e| PipelineError::unavailable(path, e))?;
        info!(
            source = parser.source_kind().name(),
            path = %path.display(),
            "reading log"
        );
        Ok(EventReader::new(BufReader::new(file), parser, path))
    }
}

impl<R: BufRead, P: LogParser> EventReader<R, P> {
    /// Wrap any buffered reader (files, in-memory fixtures)
    pub fn new(reader: R, parser: P, path: impl Into<PathBuf>) -> Self {
        EventReader {
            reader,
            parser,
            path: path.into(),
            buffer: String::new(),
            stats: ReadStats::default(),
            finished: false,
        }
    }

    pub fn stats(&self) -> ReadStats {
        self.stats
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn finish(&mut self) {
        self.finished = true;
        info!(
            source = self.parser.source_kind().name(),
            lines = self.stats.lines,
            accepted = self.stats.accepted,
            rejected = self.stats.rejected,
            "log pass complete"
        );
    }
}

impl<R: BufRead, P: LogParser> Iterator for EventReader<R, P> {
    type Item = Result<P::Event, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            self.buffer.clear();
            let read = match self.reader.read_line(&mut self.buffer) {
                Ok(n) => n,
                Err(source) => {
                    self.finished = true;
                    return Some(Err(PipelineError::Read {
                        path: self.path.clone(),
                        line: self.stats.lines + 1,
                        source,
                    }));
                }
            };

            if read == 0 {
                self.finish();
                return None;
            }

            self.stats.lines += 1;
            let line_no = self.stats.lines;

            match self.parser.parse_line(&self.buffer, line_no) {
                Ok(Some(event)) => {
                    self.stats.accepted += 1;
                    return Some(Ok(event));
                }
                Ok(None) => self.stats.blank += 1,
                Err(reason) => {
                    self.stats.rejected += 1;
                    warn!(
                        source = self.parser.source_kind().name(),
                        line = line_no,
                        raw = %self.buffer.trim(),
                        %reason,
                        "rejected log line"
                    );
                }
            }
        }
        None
    }
}

/// Open `inventory_logs.txt`-style file
pub fn read_inventory_events(path: &Path) -> Result<InventoryReader, PipelineError> {
    EventReader::open(path, InventoryParser::new())
}

/// Open `money_logs.txt`-style file
pub fn read_money_events(path: &Path) -> Result<MoneyReader, PipelineError> {
    EventReader::open(path, MoneyParser::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Write};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_reader_skips_rejects_and_blanks() {
        let input = "[1] ITEM_ADD | 1, (2, 3)\n\n[abc] ITEM_ADD | 1, (2,3)\n[3] ITEM_REMOVE | 1, (2, 1)\n";
        let mut reader = EventReader::new(Cursor::new(input), InventoryParser::new(), "inv.txt");

        let events: Vec<InventoryEvent> = reader.by_ref().map(|e| e.unwrap()).collect();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].source_line, 1);
        assert_eq!(events[1].source_line, 4);
        assert_eq!(
            reader.stats(),
            ReadStats { lines: 4, accepted: 2, rejected: 1, blank: 1 }
        );
    }

    #[test]
    fn test_rejected_line_is_logged_with_line_and_text() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();

        let input = "100|1|MONEY_ADD,50,initial\ngarbage here\n";
        let accepted = tracing::subscriber::with_default(subscriber, || {
            EventReader::new(Cursor::new(input), MoneyParser::new(), "money.txt")
                .filter_map(Result::ok)
                .count()
        });

        assert_eq!(accepted, 1);
        let text = logs.contents();
        let rejected = text
            .lines()
            .find(|l| l.contains("rejected log line"))
            .expect("rejection was logged");
        assert!(rejected.contains("WARN"));
        assert!(rejected.contains("line=2"));
        assert!(rejected.contains("raw=garbage here"));
        assert!(rejected.contains("source=\"money\"") || rejected.contains("source=money"));
    }

    #[test]
    fn test_reader_last_line_without_newline() {
        let input = "100|1|MONEY_ADD,50,initial\n200|1|MONEY_REMOVE,20,purchase";
        let reader = EventReader::new(Cursor::new(input), MoneyParser::new(), "money.txt");

        let events: Vec<MoneyEvent> = reader.map(|e| e.unwrap()).collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].reason, "purchase");
        assert_eq!(events[1].source_line, 2);
    }

    #[test]
    fn test_reader_is_exhausted_after_one_pass() {
        let mut reader = EventReader::new(
            Cursor::new("100|1|MONEY_ADD,50,initial\n"),
            MoneyParser::new(),
            "money.txt",
        );
        assert!(reader.next().is_some());
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_open_missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_money_events(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(PipelineError::SourceUnavailable { .. })));
    }

    #[test]
    fn test_open_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[1000] ITEM_ADD | 7, (5, 3)").unwrap();
        writeln!(file, "garbage").unwrap();

        let events: Vec<_> = read_inventory_events(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].player_id, 7);
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let bytes: &[u8] = b"[1] ITEM_ADD | 1, (2, 3)\n\xff\xfe\n";
        let mut reader = EventReader::new(Cursor::new(bytes), InventoryParser::new(), "inv.txt");

        assert!(reader.next().unwrap().is_ok());
        assert!(matches!(
            reader.next(),
            Some(Err(PipelineError::Read { line: 2, .. }))
        ));
        assert!(reader.next().is_none());
    }
}
