mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use image::GenericImageView;

use common::{multipart_request, png_bytes, rgba_png_bytes, send_raw, test_app, test_app_with, TestApp};

const FIELDS: &[(&str, &str)] = &[("title", "Photo dish"), ("ingredients", r#"["rice"]"#)];

async fn served_image(app: &TestApp, url: &str) -> image::DynamicImage {
    let response = send_raw(
        app,
        Request::builder().uri(url).body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    image::load_from_memory(&bytes).unwrap()
}

fn upload_dir_files(app: &TestApp) -> Vec<String> {
    match std::fs::read_dir(&app.config.upload_dir) {
        Ok(entries) => entries
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn uploads_are_resized_reencoded_and_served() {
    let app = test_app();
    let png = png_bytes(1000, 500);

    let (status, body) = multipart_request(
        &app,
        "/api/recipes",
        FIELDS,
        Some(("photo.png", "image/png", png.as_slice())),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "upload failed: {body}");
    let url = body["data"]["image_url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/recipe_"), "unexpected url {url}");
    assert!(url.ends_with(".jpg"));

    let img = served_image(&app, url).await;
    assert_eq!(img.dimensions(), (800, 400));

    // The raw staged file is gone, only the processed JPEG remains
    let files = upload_dir_files(&app);
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("recipe_"));
}

#[tokio::test]
async fn small_images_are_upscaled_to_the_target_width() {
    let app = test_app();
    let png = png_bytes(100, 40);

    let (status, body) = multipart_request(
        &app,
        "/api/recipes",
        FIELDS,
        Some(("tiny.png", "image/png", png.as_slice())),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let url = body["data"]["image_url"].as_str().unwrap();
    let img = served_image(&app, url).await;
    assert_eq!(img.dimensions(), (800, 320));
}

#[tokio::test]
async fn alpha_channels_are_flattened_for_jpeg() {
    let app = test_app();
    let png = rgba_png_bytes(900, 300);

    let (status, body) = multipart_request(
        &app,
        "/api/recipes",
        FIELDS,
        Some(("layered.png", "image/png", png.as_slice())),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "upload failed: {body}");
    let url = body["data"]["image_url"].as_str().unwrap();
    let img = served_image(&app, url).await;
    // 300 * (800 / 900) rounds to 267
    assert_eq!(img.dimensions(), (800, 267));
}

#[tokio::test]
async fn disallowed_content_types_are_rejected() {
    let app = test_app();

    for (filename, content_type) in [("notes.txt", "text/plain"), ("anim.gif", "image/gif")] {
        let (status, body) = multipart_request(
            &app,
            "/api/recipes",
            FIELDS,
            Some((filename, content_type, b"not an image".as_slice())),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            format!("Invalid file type: {content_type}. Only JPEG and PNG are allowed")
        );
    }

    // The gate rejected before the handler ran: nothing staged, nothing stored
    assert!(upload_dir_files(&app).is_empty());
    let (_, body) = common::get(&app, "/api/recipes").await;
    assert_eq!(body["total_count"], 0);
}

#[tokio::test]
async fn oversized_uploads_are_rejected() {
    let app = test_app_with(|config| config.max_upload_mb = 1);
    let blob = vec![0u8; 2 * 1024 * 1024];

    let (status, body) = multipart_request(
        &app,
        "/api/recipes",
        FIELDS,
        Some(("big.png", "image/png", blob.as_slice())),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "File too large. Maximum size is 1MB");
    assert!(upload_dir_files(&app).is_empty());
}

#[tokio::test]
async fn failed_processing_keeps_the_staged_file() {
    let app = test_app();

    let (status, body) = multipart_request(
        &app,
        "/api/recipes",
        FIELDS,
        Some(("broken.png", "image/png", &[1u8, 2, 3][..])),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to process uploaded image:"));

    // The staged raw file stays behind for inspection
    let files = upload_dir_files(&app);
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("raw_"));
}
