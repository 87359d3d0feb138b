#![cfg(unix)]

use std::fs;
use std::net::{SocketAddr, TcpListener};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use warp::http::StatusCode;
use warp::Filter;

use lichtkrant::config::Settings;
use lichtkrant::domain::Metric;
use lichtkrant::error::Error;
use lichtkrant::fetch::Fetcher;

const FIXTURE_FONT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSansMono.ttf");
const VALUES: [&str; 5] = ["12.3", "400", "21.5", "1013", "55"];

struct HomeServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl HomeServer {
    fn base_url(&self) -> String {
        format!("http://{}/app/lichtkrant", self.addr)
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serves the five lichtkrant endpoints. `failing` answers with a 500 instead.
fn home_server(failing: Option<&'static str>) -> HomeServer {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = requests.clone();

    let routes = warp::path!("app" / "lichtkrant" / String).map(move |file: String| {
        log.lock().unwrap().push(file.clone());

        let value = Metric::ALL
            .iter()
            .position(|metric| metric.endpoint() == file)
            .map(|index| VALUES[index]);

        match value {
            Some(_) if failing == Some(file.as_str()) => {
                warp::reply::with_status(String::from("oops"), StatusCode::INTERNAL_SERVER_ERROR)
            }
            Some(value) => warp::reply::with_status(value.to_string(), StatusCode::OK),
            None => warp::reply::with_status(String::new(), StatusCode::NOT_FOUND),
        }
    });

    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    HomeServer { addr, requests }
}

/// A stand-in for the led-matrix driver that logs its arguments and whether the image exists.
fn fake_driver(dir: &Path) -> (PathBuf, PathBuf) {
    let program = dir.join("led-matrix");
    let log = dir.join("led-matrix.log");
    let script = format!(
        "#!/bin/sh\nif [ -f \"$8\" ]; then state=present; else state=missing; fi\necho \"$* $state\" >> '{}'\n",
        log.display()
    );

    fs::write(&program, script).unwrap();
    fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();

    (program, log)
}

fn settings(dir: &TempDir, base_url: String, program: PathBuf) -> Settings {
    Settings {
        base_url,
        font_path: PathBuf::from(FIXTURE_FONT),
        font_size: 12.0,
        output_path: dir.path().join("openhab.ppm"),
        display_binary: program,
    }
}

fn invocations(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(String::from)
        .collect()
}

#[tokio::test]
async fn readings_are_fetched_in_display_order() {
    let server = home_server(None);

    let readings = Fetcher::new(server.base_url()).fetch_all().await.unwrap();

    let lines: Vec<String> = readings.iter().map(|reading| reading.to_string()).collect();
    assert_eq!(
        lines,
        vec!["Stroom 12.3", "Co2 400", "Tempratuur 21.5", "Bar 1013", "Vochtigheid 55"]
    );
    assert_eq!(
        server.requests(),
        vec!["stroom.php", "co2.php", "temp.php", "bar.php", "hum.php"]
    );
}

#[tokio::test]
async fn run_writes_the_image_then_shows_it_once() {
    let server = home_server(None);
    let dir = tempfile::tempdir().unwrap();
    let (program, log) = fake_driver(dir.path());
    let settings = settings(&dir, server.base_url(), program);

    let image = lichtkrant::run(&settings).await.unwrap();

    assert_eq!(image, settings.output_path);
    let expected = format!("-t 20 -m 0 -V -D 1 {} -p4 present", image.display());
    assert_eq!(invocations(&log), vec![expected]);
}

#[tokio::test]
async fn written_image_is_a_96_by_64_pixmap() {
    let server = home_server(None);
    let dir = tempfile::tempdir().unwrap();
    let (program, _) = fake_driver(dir.path());
    let settings = settings(&dir, server.base_url(), program);

    let written = lichtkrant::run(&settings).await.unwrap();

    let bytes = fs::read(&written).unwrap();
    assert!(bytes.starts_with(b"P6"));
    let decoded = image::open(&written).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (96, 64));
    assert!(decoded.pixels().any(|pixel| pixel.0 != [0, 0, 0]));
}

#[tokio::test]
async fn written_image_header_reads_line_by_line() {
    let server = home_server(None);
    let dir = tempfile::tempdir().unwrap();
    let (program, _) = fake_driver(dir.path());
    let settings = settings(&dir, server.base_url(), program);

    let written = lichtkrant::run(&settings).await.unwrap();

    // The led-matrix loader reads magic, "width height" and maxval as three lines.
    let bytes = fs::read(&written).unwrap();
    let mut lines = bytes.splitn(4, |byte| *byte == b'\n');
    assert_eq!(lines.next(), Some(&b"P6"[..]));
    assert_eq!(lines.next(), Some(&b"96 64"[..]));
    assert_eq!(lines.next(), Some(&b"255"[..]));
    assert_eq!(lines.next().map(|pixels| pixels.len()), Some(96 * 64 * 3));
}

#[tokio::test]
async fn identical_readings_give_identical_files() {
    let server = home_server(None);
    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    let (first_program, _) = fake_driver(first_dir.path());
    let (second_program, _) = fake_driver(second_dir.path());

    let first = lichtkrant::run(&settings(&first_dir, server.base_url(), first_program))
        .await
        .unwrap();
    let second = lichtkrant::run(&settings(&second_dir, server.base_url(), second_program))
        .await
        .unwrap();

    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
}

#[tokio::test]
async fn failing_endpoint_aborts_before_anything_is_written() {
    let server = home_server(Some("temp.php"));
    let dir = tempfile::tempdir().unwrap();
    let (program, log) = fake_driver(dir.path());
    let settings = settings(&dir, server.base_url(), program);

    let result = lichtkrant::run(&settings).await;

    match result {
        Err(Error::Status { url, status }) => {
            assert!(url.ends_with("/temp.php"));
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        }
        other => panic!("expected a status error, got {:?}", other),
    }
    assert_eq!(server.requests(), vec!["stroom.php", "co2.php", "temp.php"]);
    assert!(!settings.output_path.exists());
    assert!(invocations(&log).is_empty());
}

#[tokio::test]
async fn unreachable_server_aborts_before_anything_is_written() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let dir = tempfile::tempdir().unwrap();
    let (program, log) = fake_driver(dir.path());
    let settings = settings(&dir, format!("http://{}/app/lichtkrant", addr), program);

    let result = lichtkrant::run(&settings).await;

    assert!(matches!(result, Err(Error::Http(_))));
    assert!(!settings.output_path.exists());
    assert!(invocations(&log).is_empty());
}
