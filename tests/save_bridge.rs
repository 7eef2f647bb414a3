use handwriting_canvas::canvas::bridge::{
    HandwritingClient, HttpClearListener, ERASE_PATH, MODE_TOGGLE_PATH, SAVE_PATH,
};
use handwriting_canvas::canvas::model::Point;
use handwriting_canvas::canvas::settings::CanvasSettings;
use handwriting_canvas::canvas::surface::DrawingSurface;
use httpmock::prelude::*;
use std::time::{Duration, Instant};

fn settings_for(server: &MockServer) -> CanvasSettings {
    CanvasSettings {
        width: 40,
        height: 40,
        api_base_url: server.base_url(),
        request_timeout_seconds: 5,
        ..CanvasSettings::default()
    }
}

#[test]
fn save_posts_png_data_url() {
    let server = MockServer::start();
    let save = server.mock(|when, then| {
        when.method(POST)
            .path(SAVE_PATH)
            .header("content-type", "application/json")
            .body_contains("\"handWritingImg\":\"data:image/png;base64,");
        then.status(200);
    });

    let settings = settings_for(&server);
    let mut surface = DrawingSurface::mounted(&settings);
    surface.begin_stroke(Point::new(5.0, 5.0));
    surface.extend_stroke(Point::new(30.0, 30.0));
    surface.end_stroke();

    let client = HandwritingClient::from_settings(&settings).unwrap();
    let payload = surface.save_payload().expect("payload");
    client.save(&payload).unwrap();

    save.assert();
}

#[test]
fn rejected_save_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(SAVE_PATH);
        then.status(500);
    });

    let settings = settings_for(&server);
    let surface = DrawingSurface::mounted(&settings);
    let client = HandwritingClient::from_settings(&settings).unwrap();

    let err = client.save(&surface.save_payload().unwrap()).unwrap_err();
    assert!(err.to_string().contains("500"));
}

#[test]
fn mode_toggle_posts_to_handwriting_root() {
    let server = MockServer::start();
    let toggle = server.mock(|when, then| {
        when.method(POST).path(MODE_TOGGLE_PATH);
        then.status(200).body("{}");
    });

    let client = HandwritingClient::from_settings(&settings_for(&server)).unwrap();
    client.toggle_mode().unwrap();
    toggle.assert();
}

#[test]
fn clear_sends_erase_notification_in_background() {
    let server = MockServer::start();
    let erase = server.mock(|when, then| {
        when.method(POST).path(ERASE_PATH);
        then.status(200);
    });

    let settings = settings_for(&server);
    let client = HandwritingClient::from_settings(&settings).unwrap();
    let mut surface = DrawingSurface::mounted(&settings)
        .with_clear_listener(Box::new(HttpClearListener::new(client)));

    assert!(surface.clear());

    let deadline = Instant::now() + Duration::from_secs(5);
    while erase.hits() == 0 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }
    assert_eq!(erase.hits(), 1);
}

#[test]
fn unreachable_erase_endpoint_does_not_block_clear() {
    let settings = CanvasSettings {
        width: 10,
        height: 10,
        api_base_url: "http://127.0.0.1:9".into(),
        request_timeout_seconds: 1,
        ..CanvasSettings::default()
    };
    let client = HandwritingClient::from_settings(&settings).unwrap();
    let mut surface = DrawingSurface::mounted(&settings)
        .with_clear_listener(Box::new(HttpClearListener::new(client)));

    let started = Instant::now();
    assert!(surface.clear());
    assert!(started.elapsed() < Duration::from_millis(500));
    assert!(surface.can_undo());
}
