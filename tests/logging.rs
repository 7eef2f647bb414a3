use std::{fs, thread::sleep, time::Duration};

use handwriting_canvas::canvas::settings::CanvasSettings;
use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn writes_log_file_and_ignores_second_init() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("canvas.log");

    handwriting_canvas::logging::init(true, Some(path.clone()));
    tracing::info!("canvas logging test");

    sleep(Duration::from_millis(100));

    assert!(path.exists(), "log file was not created");
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("canvas logging test"));

    // A subscriber is already installed; this must not panic.
    let settings = CanvasSettings::default();
    handwriting_canvas::logging::init_from_settings(&settings, None);
}
