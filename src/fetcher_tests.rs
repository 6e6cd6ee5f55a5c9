//! Unit tests for the fetch pipeline.

use super::*;
use crate::release::download::MockReleaseClient;
use crate::release::extraction::{ExtractionError, MockArchiveExtractor};
use crate::test_utils::{CannedResponse, LoopbackServer, release_metadata_json, write_zip};
use rstest::rstest;

const ASSET_URL: &str = "https://dl.example/v2.31.0/vuetorrent.zip";

fn scratch_config() -> (tempfile::TempDir, FetcherConfig) {
    let temp = tempfile::tempdir().expect("temp dir");
    let target = Utf8PathBuf::try_from(temp.path().join("vuetorrent")).expect("UTF-8 path");
    let config = FetcherConfig::default().with_target_dir(Some(target));
    (temp, config)
}

fn request(config: &FetcherConfig) -> FetchRequest<'_> {
    FetchRequest {
        config,
        quiet: true,
    }
}

/// Leftover temporary archives in `dir`.
fn leftover_archives(dir: &Utf8Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("read target dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(ARCHIVE_PREFIX))
        .collect()
}

fn metadata_client(
    download: impl Fn(&Path) -> std::result::Result<(), DownloadError> + Send + 'static,
) -> MockReleaseClient {
    let body = release_metadata_json("v2.31.0", &[ASSET_URL]);
    let mut client = MockReleaseClient::new();
    client
        .expect_fetch_metadata()
        .returning(move |_| Ok(body.clone()));
    client
        .expect_download_to()
        .returning(move |_url, dest| download(dest));
    client
}

fn write_ui_archive(dest: &Path) -> std::result::Result<(), DownloadError> {
    write_zip(
        dest,
        &[
            ("public/", ""),
            ("public/index.html", "<html>vuetorrent</html>"),
        ],
    )
    .map_err(|e| DownloadError::Http {
        url: ASSET_URL.to_owned(),
        reason: e.to_string(),
    })
}

#[test]
fn happy_path_extracts_and_removes_archive() {
    let (_temp, config) = scratch_config();
    let client = metadata_client(write_ui_archive);

    let mut stderr = Vec::new();
    let report = fetch_with(&request(&config), &client, &ZipExtractor, &mut stderr)
        .expect("fetch succeeds");

    assert_eq!(report.resolved.url, ASSET_URL);
    assert_eq!(report.target_dir, config.target_dir);
    assert_eq!(report.extracted, vec!["public/", "public/index.html"]);
    assert!(config.target_dir.join("public/index.html").is_file());
    assert!(leftover_archives(&config.target_dir).is_empty());

    let names: Vec<&str> = report.listing.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["public"]);
    assert!(stderr.is_empty(), "quiet run wrote progress output");
}

#[test]
fn target_directory_is_created_recursively() {
    let (_temp, base) = scratch_config();
    let config = base
        .clone()
        .with_target_dir(Some(base.target_dir.join("nested/deeper")));
    let client = metadata_client(write_ui_archive);

    fetch_with(&request(&config), &client, &ZipExtractor, &mut Vec::new()).expect("fetch");
    assert!(config.target_dir.join("public").is_dir());
}

#[test]
fn existing_files_are_overwritten() {
    let (_temp, config) = scratch_config();
    std::fs::create_dir_all(config.target_dir.join("public")).expect("mkdir");
    std::fs::write(config.target_dir.join("public/index.html"), b"old release").expect("seed");
    let client = metadata_client(write_ui_archive);

    fetch_with(&request(&config), &client, &ZipExtractor, &mut Vec::new()).expect("fetch");

    let index = std::fs::read_to_string(config.target_dir.join("public/index.html")).expect("read");
    assert_eq!(index, "<html>vuetorrent</html>");
}

#[test]
fn metadata_failure_downloads_fallback_url() {
    let (_temp, config) = scratch_config();
    let fallback = config.fallback_url.clone();

    let mut client = MockReleaseClient::new();
    client.expect_fetch_metadata().returning(|url| {
        Err(DownloadError::Http {
            url: url.to_owned(),
            reason: "connection refused".to_owned(),
        })
    });
    client
        .expect_download_to()
        .withf(move |url, _dest| url.to_string() == fallback)
        .times(1)
        .returning(|_url, dest| write_ui_archive(dest));

    let mut stderr = Vec::new();
    let request = FetchRequest {
        config: &config,
        quiet: false,
    };
    let report = fetch_with(&request, &client, &ZipExtractor, &mut stderr).expect("fetch");

    assert!(report.resolved.is_fallback());
    let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
    assert!(stderr_text.contains("Release metadata unavailable"), "{stderr_text}");
    assert!(stderr_text.contains("(fallback)"), "{stderr_text}");
}

fn transfer_refused(_dest: &Path) -> std::result::Result<(), DownloadError> {
    Err(DownloadError::Http {
        url: ASSET_URL.to_owned(),
        reason: "connection reset".to_owned(),
    })
}

fn archive_deleted(dest: &Path) -> std::result::Result<(), DownloadError> {
    std::fs::remove_file(dest).map_err(DownloadError::Io)
}

fn nothing_written(_dest: &Path) -> std::result::Result<(), DownloadError> {
    Ok(())
}

#[rstest]
#[case::transfer_failure(transfer_refused, "connection reset")]
#[case::archive_missing(archive_deleted, "is missing")]
#[case::archive_empty(nothing_written, "is empty")]
fn download_failures_abort_before_extraction(
    #[case] download: fn(&Path) -> std::result::Result<(), DownloadError>,
    #[case] expected_message: &str,
) {
    let (_temp, config) = scratch_config();
    let client = metadata_client(download);
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().never();

    let result = fetch_with(&request(&config), &client, &extractor, &mut Vec::new());
    match result {
        Err(err) => {
            assert!(err.is_download_failure(), "unexpected error kind: {err:?}");
            assert_eq!(err.exit_code(), 1);
            assert!(err.to_string().contains(expected_message), "{err}");
        }
        Ok(report) => panic!("expected download failure, got {report:?}"),
    }
    assert!(leftover_archives(&config.target_dir).is_empty());
}

#[test]
fn extraction_failure_removes_archive() {
    let (_temp, config) = scratch_config();
    let client = metadata_client(write_ui_archive);
    let mut extractor = MockArchiveExtractor::new();
    extractor
        .expect_extract()
        .times(1)
        .returning(|_archive, _dest| Err(ExtractionError::EmptyArchive));

    let result = fetch_with(&request(&config), &client, &extractor, &mut Vec::new());
    assert!(matches!(result, Err(FetchError::Extraction(_))));
    assert!(leftover_archives(&config.target_dir).is_empty());
}

#[test]
fn extractor_receives_downloaded_archive_and_target() {
    let (_temp, config) = scratch_config();
    let client = metadata_client(write_ui_archive);
    let target = config.target_dir.clone();
    let mut extractor = MockArchiveExtractor::new();
    extractor
        .expect_extract()
        .withf(move |archive, dest| {
            dest == target.as_std_path()
                && archive.parent() == Some(target.as_std_path())
                && archive
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy().starts_with(ARCHIVE_PREFIX))
        })
        .times(1)
        .returning(|_archive, _dest| Ok(vec!["index.html".to_owned()]));

    let report =
        fetch_with(&request(&config), &client, &extractor, &mut Vec::new()).expect("fetch");
    assert_eq!(report.extracted, vec!["index.html"]);
}

#[test]
fn unusable_target_directory_is_reported() {
    let temp = tempfile::tempdir().expect("temp dir");
    let occupied = temp.path().join("occupied");
    std::fs::write(&occupied, b"a file, not a directory").expect("seed");
    let target = Utf8PathBuf::try_from(occupied.join("ui")).expect("UTF-8 path");
    let config = FetcherConfig::default().with_target_dir(Some(target));

    let mut client = MockReleaseClient::new();
    client.expect_fetch_metadata().never();
    client.expect_download_to().never();
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().never();

    let result = fetch_with(&request(&config), &client, &extractor, &mut Vec::new());
    assert!(matches!(result, Err(FetchError::TargetDir { .. })));
}

/// Bytes of a small web UI archive.
fn ui_archive_bytes() -> Vec<u8> {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = temp.path().join("vuetorrent.zip");
    write_zip(
        &path,
        &[
            ("public/", ""),
            ("public/index.html", "<html>served</html>"),
        ],
    )
    .expect("write zip");
    std::fs::read(&path).expect("read zip")
}

#[test]
fn fetch_downloads_and_extracts_over_http() {
    let server = LoopbackServer::bind().expect("bind loopback server");
    let asset_url = server.url("/download/v2.31.0/vuetorrent.zip");
    let (_temp, config) = scratch_config();
    let config = FetcherConfig {
        metadata_url: server.url("/releases/latest"),
        fallback_url: server.url("/latest/vuetorrent.zip"),
        timeout_secs: 5,
        ..config
    };
    server.serve(vec![
        (
            "/releases/latest".to_owned(),
            CannedResponse::ok(release_metadata_json("v2.31.0", &[asset_url.as_str()])),
        ),
        (
            "/download/v2.31.0/vuetorrent.zip".to_owned(),
            CannedResponse::ok(ui_archive_bytes()),
        ),
    ]);

    let mut stderr = Vec::new();
    let report = fetch(&request(&config), &mut stderr).expect("fetch succeeds");

    assert_eq!(report.resolved.url, asset_url);
    assert!(!report.resolved.is_fallback());
    assert_eq!(report.extracted, vec!["public/", "public/index.html"]);
    let index = std::fs::read_to_string(config.target_dir.join("public/index.html"))
        .expect("read extracted index");
    assert_eq!(index, "<html>served</html>");
    assert!(leftover_archives(&config.target_dir).is_empty());
}

#[test]
fn fetch_fails_when_fallback_is_missing_too() {
    let server = LoopbackServer::bind().expect("bind loopback server");
    let (_temp, config) = scratch_config();
    let config = FetcherConfig {
        metadata_url: server.url("/releases/latest"),
        fallback_url: server.url("/latest/vuetorrent.zip"),
        timeout_secs: 5,
        ..config
    };
    server.serve(Vec::new());

    let result = fetch(&request(&config), &mut Vec::new());

    assert!(matches!(
        result,
        Err(FetchError::Download(DownloadError::NotFound { .. }))
    ));
    assert!(!config.target_dir.join("public").exists());
    assert!(leftover_archives(&config.target_dir).is_empty());
}
