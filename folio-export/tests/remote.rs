use folio_core::{ExportOptions, Normalizer, PositionLayout, RawRecord};
use folio_export::{
    ArtifactLocation, ArtifactNaming, ExportCoordinator, ExportOutcome, ExportSink,
    MemoryReporter, RemoteSheetSink, Sheet, SinkError,
};
use folio_ingest::JsonFileSource;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One captured request: request line and parsed JSON body.
type Request = (String, Value);

/// Answer one request per entry of `responses`, in order.
async fn serve(responses: Vec<(&'static str, &'static str)>) -> (String, JoinHandle<Vec<Request>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let header_end = loop {
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
                let n = sock.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before headers");
                buf.extend_from_slice(&chunk[..n]);
            };

            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length: usize = head
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                .map(|(_, v)| v.trim().parse().unwrap())
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = sock.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before body");
                buf.extend_from_slice(&chunk[..n]);
            }

            let request_body: Value =
                serde_json::from_slice(&buf[header_end..header_end + content_length]).unwrap();
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            sock.write_all(response.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();

            let request_line = head.lines().next().unwrap_or_default().to_string();
            seen.push((request_line, request_body));
        }
        seen
    });

    (format!("http://{addr}"), handle)
}

fn position_sheet(label: &str) -> Sheet {
    let rows = Normalizer::default()
        .positions(
            &[RawRecord::new(json!({"symbol": "A", "quantity": 2}))],
            PositionLayout::Compact,
        )
        .unwrap();
    Sheet::new(label, PositionLayout::Compact.schema(), rows)
}

fn position_header() -> Value {
    json!([
        "Symbol",
        "Name",
        "Type",
        "Quantity",
        "Book Value",
        "Market Value",
        "Currency",
        "Institution"
    ])
}

#[tokio::test]
async fn test_remote_write_posts_sheet_and_reports_range() {
    let (url, server) = serve(vec![("200 OK", "{}")]).await;
    let sink = RemoteSheetSink::new(format!("{url}/sheets"), "sid", None).unwrap();

    let artifact = sink
        .write("Wealthica_Positions", &[position_sheet("Positions")])
        .await
        .unwrap();

    assert_eq!(
        artifact.location,
        ArtifactLocation::Remote {
            sheet_id: sink.sheet_id().to_string(),
            ranges: vec!["Positions!A1".to_string()],
        }
    );
    assert_eq!(artifact.to_string(), "Spreadsheet sid updated: Positions!A1");

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 1);
    let (line, body) = &requests[0];
    assert_eq!(line, "POST /sheets HTTP/1.1");
    assert_eq!(
        *body,
        json!({
            "sheetId": "sid",
            "range": "Positions!A1",
            "values": [position_header(), ["A", "", "", 2.0, "", "", "", ""]]
        })
    );
}

#[tokio::test]
async fn test_remote_backend_rejection_carries_body() {
    let (url, server) = serve(vec![("400 Bad Request", "bad range")]).await;
    let sink = RemoteSheetSink::new(url, "sid", None).unwrap();

    let err = sink
        .write("Wealthica_Positions", &[position_sheet("Positions")])
        .await
        .unwrap_err();

    match err {
        SinkError::Backend { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "bad range");
        }
        other => panic!("expected Backend error, got {other:?}"),
    }
    let requests = server.await.unwrap();
    assert_eq!(requests[0].1["range"], json!("Positions!A1"));
}

#[tokio::test]
async fn test_combined_export_posts_transactions_then_positions() {
    let input = tempfile::tempdir().unwrap();
    std::fs::write(
        input.path().join("transactions.json"),
        json!([{"date": "2024-03-15", "type": "buy", "symbol": "A", "amount": 100}]).to_string(),
    )
    .unwrap();
    std::fs::write(
        input.path().join("positions.json"),
        json!({"data": [{"symbol": "A", "quantity": 2, "gain_amount": 9}]}).to_string(),
    )
    .unwrap();

    let (url, server) = serve(vec![("200 OK", "{}"), ("200 OK", "{}")]).await;
    let reporter = Arc::new(MemoryReporter::new());
    let coordinator = ExportCoordinator::new(
        Arc::new(JsonFileSource::new(input.path())),
        Arc::new(RemoteSheetSink::new(url, "sid", None).unwrap()),
        reporter.clone(),
        ArtifactNaming::default(),
    );

    let outcome = coordinator
        .export_combined(&ExportOptions::default())
        .await
        .unwrap();

    let ExportOutcome::Exported(artifact) = outcome else {
        panic!("expected an artifact");
    };
    assert_eq!(
        artifact.location,
        ArtifactLocation::Remote {
            sheet_id: "sid".to_string(),
            ranges: vec!["Transactions!A1".to_string(), "Positions!A1".to_string()],
        }
    );

    let requests = server.await.unwrap();
    let ranges: Vec<&Value> = requests.iter().map(|(_, body)| &body["range"]).collect();
    assert_eq!(ranges, vec![&json!("Transactions!A1"), &json!("Positions!A1")]);

    // compact position rows: no gain columns
    assert_eq!(requests[1].1["values"][0], position_header());
    assert_eq!(requests[0].1["values"][0].as_array().unwrap().len(), 10);
    assert_eq!(
        reporter.messages()[0],
        "✓ Spreadsheet sid updated: Transactions!A1, Positions!A1"
    );
}
