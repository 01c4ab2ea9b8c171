use leadcommander_backend::services::event_logger::{EventLogger, WEBHOOK_LOG_FILE};
use std::{fs, sync::Arc, thread};

#[test]
fn n_calls_produce_header_plus_n_rows() {
    let dir = tempfile::tempdir().unwrap();
    let logger = EventLogger::new(dir.path().join("logs"));

    for status in [200u16, 400, 500, 200] {
        logger.log("stripe", status).unwrap();
    }

    let contents = fs::read_to_string(dir.path().join("logs").join(WEBHOOK_LOG_FILE)).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "timestamp,source,status_code");
    assert_eq!(
        lines.iter().filter(|l| **l == "timestamp,source,status_code").count(),
        1
    );
    assert!(lines[2].ends_with(",stripe,400"));
}

#[test]
fn existing_log_is_appended_without_new_header() {
    let dir = tempfile::tempdir().unwrap();
    EventLogger::new(dir.path()).log("a", 200).unwrap();
    // Separate logger instance, same file.
    EventLogger::new(dir.path()).log("b", 200).unwrap();

    let contents = fs::read_to_string(dir.path().join(WEBHOOK_LOG_FILE)).unwrap();
    assert_eq!(contents.lines().count(), 3);
}

#[test]
fn concurrent_writers_do_not_interleave_rows() {
    let dir = tempfile::tempdir().unwrap();
    let logger = Arc::new(EventLogger::new(dir.path()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let logger = logger.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    logger.log(&format!("src{i}"), 200).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut reader = csv::Reader::from_path(logger.path()).unwrap();
    let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 200);
    assert!(rows.iter().all(|r| r.len() == 3 && &r[2] == "200"));
}
