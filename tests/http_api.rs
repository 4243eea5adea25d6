use std::sync::Arc;

use stripd::archive::MemoryArchive;
use stripd::build_index;
use stripd::query::QueryServer;

async fn spawn_server(arc: MemoryArchive) -> String {
    let index = Arc::new(build_index(Box::new(arc)).unwrap());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = QueryServer::new(index).router();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn archive() -> MemoryArchive {
    MemoryArchive::new()
        .dir("1990")
        .file("1990/1990-01-03.jpg", b"third".to_vec())
        .file("1990/1990-01-02.jpg", b"second".to_vec())
        .file("1990/not-a-date.jpg", b"junk".to_vec())
        .file("1990/1990-01-04 sunday.gif", b"gif89a".to_vec())
        .file("1989/1989-04-16.gif", b"first".to_vec())
        .unreadable("1991/1991-01-01.jpg")
}

#[tokio::test]
async fn years_endpoint_lists_sorted_years() {
    let base = spawn_server(archive()).await;
    let years: Vec<String> = reqwest::get(format!("{base}/api/years"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(years, vec!["1989", "1990", "1991"]);
}

#[tokio::test]
async fn strips_endpoint_returns_sorted_records() {
    let base = spawn_server(archive()).await;
    let resp = reqwest::get(format!("{base}/api/strips/1990")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let strips: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        strips,
        serde_json::json!([
            {"date": "1990-01-02", "year": "1990", "url": "/comics/1990/1990-01-02.jpg"},
            {"date": "1990-01-03", "year": "1990", "url": "/comics/1990/1990-01-03.jpg"},
            {"date": "1990-01-04", "year": "1990", "url": "/comics/1990/1990-01-04%20sunday.gif"},
        ])
    );
}

#[tokio::test]
async fn unknown_year_is_404() {
    let base = spawn_server(archive()).await;
    let resp = reqwest::get(format!("{base}/api/strips/2077")).await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn published_urls_serve_original_bytes() {
    let base = spawn_server(archive()).await;
    let strips: Vec<serde_json::Value> = reqwest::get(format!("{base}/api/strips/1990"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let expected: [&[u8]; 3] = [b"second", b"third", b"gif89a"];
    for (strip, want) in strips.iter().zip(expected) {
        let url = strip["url"].as_str().unwrap();
        let resp = reqwest::get(format!("{base}{url}")).await.unwrap();
        assert_eq!(resp.status(), 200, "{url}");
        assert_eq!(resp.bytes().await.unwrap().as_ref(), want);
    }
}

#[tokio::test]
async fn comic_content_type_follows_extension() {
    let base = spawn_server(archive()).await;
    let resp = reqwest::get(format!("{base}/comics/1989/1989-04-16.gif"))
        .await
        .unwrap();
    assert_eq!(resp.headers()["content-type"], "image/gif");
}

#[tokio::test]
async fn rejected_or_missing_comic_is_404() {
    let base = spawn_server(archive()).await;
    for path in ["1990/not-a-date.jpg", "1990/1990-01-09.jpg", "1990"] {
        let resp = reqwest::get(format!("{base}/comics/{path}")).await.unwrap();
        assert_eq!(resp.status(), 404, "{path}");
    }
}

#[tokio::test]
async fn unreadable_comic_is_500_and_server_keeps_serving() {
    let base = spawn_server(archive()).await;
    let resp = reqwest::get(format!("{base}/comics/1991/1991-01-01.jpg"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);

    let resp = reqwest::get(format!("{base}/comics/1990/1990-01-02.jpg"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn status_reports_counts() {
    let base = spawn_server(archive()).await;
    let status: serde_json::Value = reqwest::get(format!("{base}/api/status"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["strips"], 5);
    assert_eq!(status["years"], 3);
    assert_eq!(status["scan"]["accepted"], 5);
    assert_eq!(status["scan"]["rejected"]["date format mismatch"], 1);
    assert_eq!(status["scan"]["rejected"]["not a regular file"], 1);
}
