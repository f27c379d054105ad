//! Integration tests for the scraper
//!
//! These tests use wiremock to create mock HTTP servers and run full
//! single-page and domain scrapes end-to-end into temporary folders.

use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use pixthief::config::{ConvertFormat, CrawlMode, ScraperConfig};
use pixthief::{RunReport, Scraper};
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `dir`
fn create_test_config(start: &str, dir: &Path) -> ScraperConfig {
    let mut config = ScraperConfig::new(Url::parse(start).expect("Failed to parse start URL"));
    config.output_dir = Some(dir.to_path_buf());
    config.delay_ms = 10; // Very short for testing
    config
}

/// Encodes a small PNG of the given size
fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 200, 255]));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image)
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("Failed to encode test PNG");
    buffer.into_inner()
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "text/html")
}

fn image_response(bytes: Vec<u8>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(bytes)
        .insert_header("content-type", "image/png")
}

async fn mount_image(server: &MockServer, image_path: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(image_response(png_bytes(2, 2)))
        .expect(expected_hits)
        .mount(server)
        .await;
}

async fn run(config: ScraperConfig) -> RunReport {
    let mut scraper = Scraper::new(config).expect("Failed to create scraper");
    scraper.run().await.expect("Scrape should complete")
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Output folder should exist")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_single_page_all_heuristics() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/gallery"))
        .respond_with(html_page(&format!(
            r#"<html><head><title>Gallery</title>
            <style>.hero {{ background-image: url('/css/hero.png'); }}</style>
            </head><body>
              <img srcset="/img/small.jpg 1x, /img/large.jpg 2x" src="/img/fallback.jpg">
              <div style="background: url(/inline/bg.webp)"></div>
              <div data-lazy-src="/lazy/photo.png"></div>
              <video poster="/media/poster.jpg"></video>
              <script>var cfg = {{"thumbnail": "{}/json/thumb.png"}};</script>
              <a href="/next">Next</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    for image_path in [
        "/img/small.jpg",
        "/img/large.jpg",
        "/img/fallback.jpg",
        "/inline/bg.webp",
        "/lazy/photo.png",
        "/media/poster.jpg",
        "/css/hero.png",
        "/json/thumb.png",
    ] {
        mount_image(&mock_server, image_path, 1).await;
    }

    // Single-page mode never follows links
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/gallery", base_url), out.path());
    let report = run(config).await;

    assert_eq!(report.mode, CrawlMode::SinglePage);
    assert_eq!(report.state.pages_processed, 1);
    assert_eq!(report.state.images_found, 8);
    assert_eq!(report.state.images_saved, 8);
    assert_eq!(report.state.images_failed, 0);
    assert_eq!(
        file_names(out.path()),
        vec![
            "bg.webp",
            "fallback.jpg",
            "hero.png",
            "large.jpg",
            "photo.png",
            "poster.jpg",
            "small.jpg",
            "thumb.png",
        ]
    );
}

#[tokio::test]
async fn test_domain_crawl_breadth_first() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<html><head><title>Home</title></head><body>
            <img src="/shared.png">
            <a href="{}/page1">Page 1</a>
            <a href="/page2#section">Page 2</a>
            <a href="http://other.invalid/elsewhere">External</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_page(
            r#"<html><body>
            <img src="/shared.png"><img src="/one.png">
            <a href="/">Home</a><a href="/page2">Page 2</a>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html_page(
            r#"<html><body><img src="/two.png"><a href="/page1">Back</a></body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Referenced from two pages, downloaded once
    mount_image(&mock_server, "/shared.png", 1).await;
    mount_image(&mock_server, "/one.png", 1).await;
    mount_image(&mock_server, "/two.png", 1).await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", base_url), out.path());
    config.mode = CrawlMode::Domain;

    let report = run(config).await;

    assert_eq!(report.state.pages_processed, 3);
    assert_eq!(report.state.pages_failed, 0);
    assert_eq!(report.state.images_found, 4);
    assert_eq!(report.state.images_saved, 3);
    assert_eq!(report.state.duplicates_skipped, 1);
    assert_eq!(file_names(out.path()), vec!["one.png", "shared.png", "two.png"]);
}

#[tokio::test]
async fn test_domain_crawl_respects_max_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: String = (1..=5)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!("<html><body>{}</body></html>", links)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/p1"))
        .respond_with(html_page("<html><body></body></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    for i in 2..=5 {
        Mock::given(method("GET"))
            .and(path(format!("/p{}", i)))
            .respond_with(html_page("<html><body></body></html>"))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", base_url), out.path());
    config.mode = CrawlMode::Domain;
    config.max_pages = 2;

    let report = run(config).await;
    assert_eq!(report.state.pages_processed, 2);
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><body><a href="/broken">Broken</a><a href="/fine">Fine</a></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fine"))
        .respond_with(html_page(r#"<html><body><img src="/ok.png"></body></html>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_image(&mock_server, "/ok.png", 1).await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", mock_server.uri()), out.path());
    config.mode = CrawlMode::Domain;

    let report = run(config).await;
    assert_eq!(report.state.pages_processed, 3);
    assert_eq!(report.state.pages_failed, 1);
    assert_eq!(report.state.images_saved, 1);
}

#[tokio::test]
async fn test_rate_limited_page_retried_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<html><body><img src="/after.png"></body></html>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_image(&mock_server, "/after.png", 1).await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", mock_server.uri()), out.path());

    let report = run(config).await;
    assert_eq!(report.state.pages_failed, 0);
    assert_eq!(report.state.images_saved, 1);
}

#[tokio::test]
async fn test_convert_to_jpeg_preserves_dimensions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<html><body><img src="/photo.png"></body></html>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/photo.png"))
        .respond_with(image_response(png_bytes(9, 4)))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", mock_server.uri()), out.path());
    config.convert_to = Some(ConvertFormat::Jpg);
    config.jpeg_quality = 75;

    let report = run(config).await;
    assert_eq!(report.state.images_converted, 1);
    assert_eq!(file_names(out.path()), vec!["photo.jpg"]);

    let written = std::fs::read(out.path().join("photo.jpg")).unwrap();
    assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Jpeg);
    assert_eq!(image::load_from_memory(&written).unwrap().dimensions(), (9, 4));
}

#[tokio::test]
async fn test_convert_jpeg_url_to_png_preserves_dimensions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<html><body><img src="/shots/photo.jpg"></body></html>"#))
        .mount(&mock_server)
        .await;

    let mut jpeg = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(12, 7, Rgba([10, 120, 200, 255])))
        .to_rgb8()
        .write_to(&mut jpeg, ImageFormat::Jpeg)
        .expect("Failed to encode test JPEG");

    Mock::given(method("GET"))
        .and(path("/shots/photo.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(jpeg.into_inner())
                .insert_header("content-type", "image/jpeg"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", mock_server.uri()), out.path());
    config.convert_to = Some(ConvertFormat::Png);

    let report = run(config).await;
    assert_eq!(report.state.images_converted, 1);
    assert_eq!(report.state.conversion_fallbacks, 0);
    assert_eq!(file_names(out.path()), vec!["photo.png"]);

    let written = std::fs::read(out.path().join("photo.png")).unwrap();
    assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Png);
    assert_eq!(image::load_from_memory(&written).unwrap().dimensions(), (12, 7));
}

#[tokio::test]
async fn test_conversion_failure_keeps_original_bytes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<html><body><img src="/corrupt.jpg"></body></html>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/corrupt.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\xff\xd8 truncated".to_vec()))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", mock_server.uri()), out.path());
    config.convert_to = Some(ConvertFormat::Png);

    let report = run(config).await;
    assert_eq!(report.state.conversion_fallbacks, 1);
    assert_eq!(report.state.images_failed, 0);
    assert_eq!(
        std::fs::read(out.path().join("corrupt.png")).unwrap(),
        b"\xff\xd8 truncated"
    );
}

#[tokio::test]
async fn test_animated_gifs_opt_in() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><body><img src="/still.png"><img src="/anim.gif"></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    mount_image(&mock_server, "/still.png", 2).await;
    mount_image(&mock_server, "/anim.gif", 1).await;

    let without = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", mock_server.uri()), without.path());
    let report = run(config).await;
    assert_eq!(report.state.images_found, 1);
    assert_eq!(file_names(without.path()), vec!["still.png"]);

    let with = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", mock_server.uri()), with.path());
    config.include_animated_gifs = true;
    let report = run(config).await;
    assert_eq!(report.state.images_found, 2);
    assert_eq!(file_names(with.path()), vec!["anim.gif", "still.png"]);
}

#[tokio::test]
async fn test_stealth_fixed_delay_sends_browser_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("dnt", "1"))
        .and(header("upgrade-insecure-requests", "1"))
        .respond_with(html_page(
            r#"<html><body><img src="/a.png"><a href="/second">Next</a></body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/second"))
        .and(header("dnt", "1"))
        .respond_with(html_page(r#"<html><body><img src="/b.png"></body></html>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_image(&mock_server, "/a.png", 1).await;
    mount_image(&mock_server, "/b.png", 1).await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", mock_server.uri()), out.path());
    config.mode = CrawlMode::Domain;
    config.stealth = true;
    config.randomize_delays = false;

    let report = run(config).await;
    assert_eq!(report.state.pages_processed, 2);
    assert_eq!(report.state.images_saved, 2);
}

#[tokio::test]
async fn test_file_name_collisions_get_suffixes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><body><img src="/a/pic.png"><img src="/b/pic.png"><img src="/c/pic.png"></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    for image_path in ["/a/pic.png", "/b/pic.png", "/c/pic.png"] {
        mount_image(&mock_server, image_path, 1).await;
    }

    let out = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", mock_server.uri()), out.path());

    let report = run(config).await;
    assert_eq!(report.state.images_saved, 3);
    assert_eq!(file_names(out.path()), vec!["pic.png", "pic_1.png", "pic_2.png"]);
}

#[tokio::test]
async fn test_stealth_pacing_across_a_domain_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><body><img src="/a.png"><a href="/second">Next</a></body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/second"))
        .respond_with(html_page(r#"<html><body><img src="/b.png"></body></html>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_image(&mock_server, "/a.png", 1).await;
    mount_image(&mock_server, "/b.png", 1).await;

    let out = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", mock_server.uri()), out.path());
    config.mode = CrawlMode::Domain;
    config.stealth = true;
    config.randomize_delays = false;
    config.delay_ms = 600;

    // One page wait (600ms) plus two image waits (300ms each); the start page is not delayed
    let report = run(config).await;
    assert_eq!(report.state.images_saved, 2);
    assert!(
        report.elapsed >= Duration::from_millis(1200),
        "run took {:?}",
        report.elapsed
    );
    assert!(
        report.elapsed < Duration::from_millis(1800),
        "run took {:?}",
        report.elapsed
    );
}
