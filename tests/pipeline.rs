//! End-to-end pipeline tests against a mock conference site.

use std::fs;
use std::time::Duration;

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wwdc_dl::{Config, PatternSet, SessionOutcome, WwdcDownloader};

const MANIFEST: &str = "#EXTM3U\n\
#EXT-X-TARGETDURATION:6\n\
#EXTINF:6.00600,\n\
fileSequence0.webvtt\n\
#EXTINF:6.00600,\n\
fileSequence1.webvtt\n\
#EXT-X-ENDLIST\n";

const FRAGMENT_0: &str = "WEBVTT\n\
X-TIMESTAMP-MAP=MPEGTS:181083,LOCAL:00:00:00.000\n\
\n\
00:00:01.040 --> 00:00:04.373\n\
Welcome to the platforms state of the union.\n";

const FRAGMENT_1: &str = "WEBVTT\n\
X-TIMESTAMP-MAP=MPEGTS:181083,LOCAL:00:00:00.000\n\
\n\
00:00:01.040 --> 00:00:04.373\n\
Welcome to the platforms state of the union.\n\
\n\
00:00:04.373 --> 00:00:08.173\n\
We have a lot to cover today.\n";

/// Serves a two-session year: 10067 with full subtitle content, 10068 with a
/// play page that carries no downloadable resources.
async fn mock_site(server: &MockServer) {
    let catalog = concat!(
        r#"<li><a href="/videos/play/wwdc2024/10067/" class="vc-card">"#,
        r#"<h5 class="vc-card__title">Platforms State of the Union</h5></a></li>"#,
        r#"<li><a href="/videos/play/wwdc2024/10068/" class="vc-card">"#,
        r#"<h5 class="vc-card__title">Sessionless Wonder</h5></a></li>"#,
    );
    Mock::given(method("GET"))
        .and(path("/videos/wwdc2024/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog))
        .mount(server)
        .await;

    let play = format!(
        r#"<li class="download"><ul><li><a href="{uri}/videos/wwdc/2024/10067/downloads/wwdc2024-10067_hd.mp4?dl=1">HD Video</a></li></ul></li>"#,
        uri = server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/videos/play/wwdc2024/10067/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(play))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/play/wwdc2024/10068/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>video only</html>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos/wwdc/2024/10067/subtitles/eng/prog_index.m3u8"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MANIFEST))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/wwdc/2024/10067/subtitles/eng/fileSequence0.webvtt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FRAGMENT_0))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/wwdc/2024/10067/subtitles/eng/fileSequence1.webvtt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FRAGMENT_1))
        .mount(server)
        .await;
}

fn config(server: &MockServer, dir: &TempDir) -> Config {
    Config {
        base_url: server.uri(),
        output_dir: dir.path().to_path_buf(),
        patterns: PatternSet {
            resource_list: r#"<li class="download">[\s\S]*?<a href="(http://[^"]+\.mp4\?dl=1)">"#
                .to_string(),
            ..PatternSet::builtin()
        },
        fetch_timeout: Duration::from_secs(5),
        ..Config::default()
    }
}

#[tokio::test]
async fn full_run_then_idempotent_rerun() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mock_site(&server).await;

    let downloader = WwdcDownloader::new(config(&server, &dir)).unwrap();
    let reports = downloader.run().await.unwrap();

    // 10067 written, 10068 had nothing to download
    assert_eq!(reports.len(), 2);
    assert!(matches!(reports[0].outcome, SessionOutcome::Written(_)));
    assert!(matches!(reports[1].outcome, SessionOutcome::NoResources));

    let srt_path = dir.path().join("10067_hd_platforms_state_of_the_union.eng.srt");
    let srt = fs::read_to_string(&srt_path).unwrap();
    // The overlapping cue at the fragment boundary appears once
    assert_eq!(
        srt.matches("Welcome to the platforms state of the union.").count(),
        1
    );
    assert!(srt.contains("2\n00:00:04,373 --> 00:00:08,173\nWe have a lot to cover today."));

    // Second run touches nothing
    let reports = downloader.run().await.unwrap();
    assert!(matches!(
        reports[0].outcome,
        SessionOutcome::SkippedExisting(_)
    ));
    assert_eq!(fs::read_to_string(&srt_path).unwrap(), srt);
}

#[tokio::test]
async fn listing_needs_only_the_catalog_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mock_site(&server).await;

    let downloader = WwdcDownloader::new(config(&server, &dir)).unwrap();
    let sessions = downloader.list_sessions().await.unwrap();

    assert_eq!(
        sessions,
        vec![
            ("10067".to_string(), "Platforms State of the Union".to_string()),
            ("10068".to_string(), "Sessionless Wonder".to_string()),
        ]
    );
    // Exactly one request: the catalog page
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
