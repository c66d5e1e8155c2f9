#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use skillet::config::Config;
use skillet::db::DbPool;
use skillet::{app, db, AppState};

pub const BOUNDARY: &str = "test-boundary";

/// One fully wired application over a throwaway database and upload
/// directory. The tempdir is dropped (and cleaned up) with the struct.
pub struct TestApp {
    pub router: Router,
    pub config: Arc<Config>,
    pub pool: DbPool,
    _dir: TempDir,
}

pub fn test_app() -> TestApp {
    test_app_with(|_| {})
}

pub fn test_app_with(tweak: impl FnOnce(&mut Config)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config {
        port: 0,
        db_path: dir.path().join("test.db").to_string_lossy().into_owned(),
        upload_dir: dir.path().join("uploads"),
        max_upload_mb: 10,
        img_max_width: 800,
        img_quality: 80,
    };
    tweak(&mut config);

    let pool = db::create_pool(&config.db_path);
    let config = Arc::new(config);
    let state = AppState {
        pool: pool.clone(),
        config: config.clone(),
    };

    TestApp {
        router: app(state),
        config,
        pool,
        _dir: dir,
    }
}

/// Sends a request and returns the full response, for tests that need
/// headers or raw bytes.
pub async fn send_raw(app: &TestApp, request: Request<Body>) -> Response {
    app.router.clone().oneshot(request).await.unwrap()
}

/// Sends a request and parses the body as JSON. Empty bodies come back as
/// `Value::Null`.
pub async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = send_raw(app, request).await;
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn json_request(
    app: &TestApp,
    method: Method,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    raw_json_request(app, method, uri, body.to_string()).await
}

/// Like `json_request` but takes the body verbatim, for malformed payloads.
pub async fn raw_json_request(
    app: &TestApp,
    method: Method,
    uri: &str,
    body: impl Into<Body>,
) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap(),
    )
    .await
}

/// Builds a multipart/form-data body with the given text fields and an
/// optional image part of (filename, content type, bytes).
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &str, &[u8])>) -> Body {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((filename, content_type, data)) = image {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

pub async fn multipart_request(
    app: &TestApp,
    uri: &str,
    fields: &[(&str, &str)],
    image: Option<(&str, &str, &[u8])>,
) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(multipart_body(fields, image))
            .unwrap(),
    )
    .await
}

/// Creates a recipe through the API and returns its JSON representation.
pub async fn create_recipe(app: &TestApp, title: &str, ingredients: &str) -> Value {
    let (status, body) = multipart_request(
        app,
        "/api/recipes",
        &[("title", title), ("ingredients", ingredients)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["data"].clone()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    encode_png(image::DynamicImage::ImageRgb8(img))
}

/// PNG with an alpha channel; the pipeline has to flatten it before JPEG
/// re-encoding.
pub fn rgba_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 200])
    });
    encode_png(image::DynamicImage::ImageRgba8(img))
}

fn encode_png(img: image::DynamicImage) -> Vec<u8> {
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}
