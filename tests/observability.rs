use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use csv_combine::CombineError;
use csv_combine::combine::{CombineOptions, combine_directory};
use csv_combine::ingestion::{
    CombineObserver, CompositeObserver, FileContext, FileStats, RejectedRowsFile,
};
use csv_combine::processing::{RejectReason, Rejection};

#[derive(Default)]
struct RecordingObserver {
    files: Mutex<Vec<(PathBuf, FileStats)>>,
    rejections: Mutex<Vec<(usize, String, RejectReason)>>,
    failures: Mutex<usize>,
}

impl CombineObserver for RecordingObserver {
    fn on_file_done(&self, ctx: &FileContext, stats: FileStats) {
        self.files.lock().unwrap().push((ctx.path.clone(), stats));
    }

    fn on_row_rejected(&self, _ctx: &FileContext, line: usize, rejection: &Rejection) {
        self.rejections
            .lock()
            .unwrap()
            .push((line, rejection.column.clone(), rejection.reason));
    }

    fn on_failure(&self, _error: &CombineError) {
        *self.failures.lock().unwrap() += 1;
    }
}

fn opts(observer: Arc<dyn CombineObserver>, output: PathBuf) -> CombineOptions {
    CombineOptions {
        input_dir: PathBuf::from("tests/fixtures/companies"),
        output_path: output,
        observer: Some(observer),
        ..Default::default()
    }
}

#[test]
fn observer_sees_file_stats_and_rejections() {
    let tmp = tempfile::tempdir().unwrap();
    let obs = Arc::new(RecordingObserver::default());

    combine_directory(&opts(obs.clone(), tmp.path().join("out.csv"))).unwrap();

    let files = obs.files.lock().unwrap().clone();
    assert_eq!(files.len(), 2);
    assert!(files[0].0.ends_with("f1.csv"));
    assert_eq!(
        files[0].1,
        FileStats {
            rows_read: 2,
            rows_accepted: 1,
            rows_rejected: 1,
        }
    );

    let rejections = obs.rejections.lock().unwrap().clone();
    assert_eq!(
        rejections,
        vec![
            (3, "City".to_string(), RejectReason::Empty),
            (3, "Revenue".to_string(), RejectReason::NullLiteral),
        ]
    );
    assert_eq!(*obs.failures.lock().unwrap(), 0);
}

#[test]
fn observer_is_told_about_failures() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("dir_not_file");
    fs::create_dir(&out).unwrap();
    let obs = Arc::new(RecordingObserver::default());

    let _ = combine_directory(&opts(obs.clone(), out)).unwrap_err();
    assert_eq!(*obs.failures.lock().unwrap(), 1);
}

#[test]
fn rejected_rows_file_appends_one_line_per_row() {
    let tmp = tempfile::tempdir().unwrap();
    let log = tmp.path().join("rejected.log");
    let composite = CompositeObserver::new(vec![
        Arc::new(RejectedRowsFile::create(&log).unwrap()) as Arc<dyn CombineObserver>,
        Arc::new(RecordingObserver::default()),
    ]);

    combine_directory(&opts(Arc::new(composite), tmp.path().join("out.csv"))).unwrap();

    let text = fs::read_to_string(&log).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("f1.csv:3: City empty"), "{}", lines[0]);
    assert!(lines[1].ends_with("f2.csv:3: Revenue null"), "{}", lines[1]);
}

#[test]
fn rejected_rows_file_keeps_earlier_runs() {
    let tmp = tempfile::tempdir().unwrap();
    let log = tmp.path().join("rejected.log");
    fs::write(&log, "previous run\n").unwrap();

    let file = RejectedRowsFile::create(&log).unwrap();
    assert_eq!(file.path(), log.as_path());
    combine_directory(&opts(Arc::new(file), tmp.path().join("out.csv"))).unwrap();

    let text = fs::read_to_string(&log).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.starts_with("previous run\n"));
}
