//! Worker Module Tests
//!
//! ## Test Scopes
//! - **Lifecycle**: Keep-alive looping, end of stream, negotiated close, aborts.
//! - **Framing**: Chunked bodies, `Expect: 100-continue`, conflicting or
//!   unsupported length headers, body limits.
//! - **TCP**: A worker on a real socket bound to an ephemeral port.

#[cfg(test)]
mod tests {
    use crate::index::{SharedIndex, SuggestionEntry, SuggestionIndex};
    use crate::processor::RequestProcessor;
    use crate::worker::{ConnectionWorker, DEFAULT_MAX_BODY_BYTES, WorkerExit};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
    use tokio::net::{TcpListener, TcpStream};

    const SUGGEST_A: &str =
        "POST /v1/api/suggest HTTP/1.1\r\nHost: x\r\nContent-Length: 13\r\n\r\n{\"input\":\"a\"}";

    fn processor() -> Arc<RequestProcessor> {
        let index = SuggestionIndex::from_entries(vec![
            SuggestionEntry::new("a", "apple", 2.0),
            SuggestionEntry::new("a", "avocado", 1.0),
        ]);
        Arc::new(RequestProcessor::new(SharedIndex::new(index)))
    }

    fn spawn_worker(max_body: usize) -> (DuplexStream, tokio::task::JoinHandle<WorkerExit>) {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let worker = ConnectionWorker::new(server, processor(), "test", max_body);
        (client, tokio::spawn(worker.run()))
    }

    /// Sends `raw`, closes the sending half and collects everything the
    /// worker wrote back.
    async fn exchange(raw: &str, max_body: usize) -> (String, WorkerExit) {
        let (mut client, worker) = spawn_worker(max_body);

        client.write_all(raw.as_bytes()).await.unwrap();
        client.shutdown().await.unwrap();

        let mut out = Vec::new();
        client.read_to_end(&mut out).await.unwrap();
        (String::from_utf8(out).unwrap(), worker.await.unwrap())
    }

    fn status_lines(raw: &str) -> Vec<&str> {
        raw.lines().filter(|l| l.starts_with("HTTP/1.")).collect()
    }

    // ============================================================
    // LIFECYCLE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_keep_alive_serves_until_end_of_stream() {
        let zzz = "POST /v1/api/suggest HTTP/1.1\r\nContent-Length: 15\r\n\r\n{\"input\":\"zzz\"}";
        let raw = format!("{}{}{}", SUGGEST_A, zzz, SUGGEST_A);

        let (out, exit) = exchange(&raw, DEFAULT_MAX_BODY_BYTES).await;

        assert_eq!(exit, WorkerExit::Closed { requests: 3 });
        assert_eq!(status_lines(&out), vec!["HTTP/1.1 200 OK"; 3]);
        assert!(out.contains("\r\n\r\n{}"));
        assert_eq!(out.matches("avocado").count(), 2);
    }

    #[tokio::test]
    async fn test_connection_close_stops_after_response() {
        let raw = format!(
            "POST /v1/api/suggest HTTP/1.1\r\nConnection: close\r\nContent-Length: 13\r\n\r\n{{\"input\":\"a\"}}{}",
            SUGGEST_A
        );

        let (out, exit) = exchange(&raw, DEFAULT_MAX_BODY_BYTES).await;

        assert_eq!(exit, WorkerExit::Closed { requests: 1 });
        assert_eq!(status_lines(&out).len(), 1);
        assert!(out.contains("connection: close\r\n"));
    }

    #[tokio::test]
    async fn test_http10_request_closes_by_default() {
        let raw = format!(
            "POST /v1/api/suggest HTTP/1.0\r\nContent-Length: 13\r\n\r\n{{\"input\":\"a\"}}{}",
            SUGGEST_A
        );

        let (out, exit) = exchange(&raw, DEFAULT_MAX_BODY_BYTES).await;

        assert_eq!(exit, WorkerExit::Closed { requests: 1 });
        assert_eq!(status_lines(&out), vec!["HTTP/1.0 200 OK"]);
    }

    #[tokio::test]
    async fn test_bad_requests_keep_the_connection_open() {
        let raw = format!("GET /nope HTTP/1.1\r\nContent-Length: 0\r\n\r\n{}", SUGGEST_A);

        let (out, exit) = exchange(&raw, DEFAULT_MAX_BODY_BYTES).await;

        assert_eq!(exit, WorkerExit::Closed { requests: 2 });
        assert_eq!(
            status_lines(&out),
            vec!["HTTP/1.1 400 Bad Request", "HTTP/1.1 200 OK"]
        );
    }

    #[tokio::test]
    async fn test_query_string_is_part_of_the_target() {
        let raw = "POST /v1/api/suggest?x=1 HTTP/1.1\r\nContent-Length: 13\r\n\r\n{\"input\":\"a\"}";

        let (out, exit) = exchange(raw, DEFAULT_MAX_BODY_BYTES).await;

        assert_eq!(exit, WorkerExit::Closed { requests: 1 });
        assert_eq!(status_lines(&out), vec!["HTTP/1.1 404 Not Found"]);
        assert!(out.ends_with("The resource '/v1/api/suggest?x=1' was not found."));
    }

    #[tokio::test]
    async fn test_garbage_request_line_aborts() {
        let (out, exit) = exchange("THIS IS NOT HTTP\r\n\r\n", DEFAULT_MAX_BODY_BYTES).await;

        assert_eq!(exit, WorkerExit::Aborted { requests: 0 });
        assert!(out.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[tokio::test]
    async fn test_truncated_body_aborts() {
        let raw = "POST /v1/api/suggest HTTP/1.1\r\nContent-Length: 50\r\n\r\nshort";

        let (out, exit) = exchange(raw, DEFAULT_MAX_BODY_BYTES).await;

        assert_eq!(exit, WorkerExit::Aborted { requests: 0 });
        assert!(status_lines(&out).is_empty());
    }

    #[tokio::test]
    async fn test_immediate_end_of_stream_closes_cleanly() {
        let (out, exit) = exchange("", DEFAULT_MAX_BODY_BYTES).await;

        assert_eq!(exit, WorkerExit::Closed { requests: 0 });
        assert!(out.is_empty());
    }

    // ============================================================
    // FRAMING TESTS
    // ============================================================

    #[tokio::test]
    async fn test_chunked_body_is_decoded() {
        let raw = "POST /v1/api/suggest HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\nd\r\n{\"input\":\"a\"}\r\n0\r\n\r\n";

        let (out, exit) = exchange(raw, DEFAULT_MAX_BODY_BYTES).await;

        assert_eq!(exit, WorkerExit::Closed { requests: 1 });
        assert_eq!(status_lines(&out), vec!["HTTP/1.1 200 OK"]);
        assert!(out.contains("\"text\": \"avocado\""));
    }

    #[tokio::test]
    async fn test_chunked_body_split_across_chunks() {
        let raw = "POST /v1/api/suggest HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n5\r\n{\"inp\r\n8\r\nut\":\"a\"}\r\n0\r\n\r\n";

        let (out, _) = exchange(raw, DEFAULT_MAX_BODY_BYTES).await;

        assert!(out.contains("\"text\": \"apple\""));
    }

    #[tokio::test]
    async fn test_expect_continue_is_answered_before_the_body() {
        let (mut client, worker) = spawn_worker(DEFAULT_MAX_BODY_BYTES);

        client
            .write_all(b"POST /v1/api/suggest HTTP/1.1\r\nContent-Length: 13\r\nExpect: 100-continue\r\n\r\n")
            .await
            .unwrap();

        let mut interim = Vec::new();
        let mut buf = [0u8; 256];
        while !interim.ends_with(b"\r\n\r\n") {
            let n = client.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before 100 Continue");
            interim.extend_from_slice(&buf[..n]);
        }
        assert_eq!(interim, b"HTTP/1.1 100 Continue\r\n\r\n");

        client.write_all(b"{\"input\":\"a\"}").await.unwrap();
        client.shutdown().await.unwrap();

        let mut rest = String::new();
        client.read_to_string(&mut rest).await.unwrap();
        assert!(rest.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(rest.contains("avocado"));
        assert_eq!(worker.await.unwrap(), WorkerExit::Closed { requests: 1 });
    }

    #[tokio::test]
    async fn test_conflicting_content_lengths_are_rejected() {
        let raw = "POST /v1/api/suggest HTTP/1.1\r\nContent-Length: 13\r\nContent-Length: 14\r\n\r\n{\"input\":\"a\"}";

        let (out, exit) = exchange(raw, DEFAULT_MAX_BODY_BYTES).await;

        assert_eq!(exit, WorkerExit::Aborted { requests: 0 });
        assert_eq!(status_lines(&out), vec!["HTTP/1.1 400 Bad Request"]);
    }

    #[tokio::test]
    async fn test_repeated_equal_content_length_is_accepted() {
        let raw = "POST /v1/api/suggest HTTP/1.1\r\nContent-Length: 13\r\nContent-Length: 13\r\n\r\n{\"input\":\"a\"}";

        let (out, exit) = exchange(raw, DEFAULT_MAX_BODY_BYTES).await;

        assert_eq!(exit, WorkerExit::Closed { requests: 1 });
        assert_eq!(status_lines(&out), vec!["HTTP/1.1 200 OK"]);
    }

    #[tokio::test]
    async fn test_length_and_chunked_together_close_after_one_response() {
        // The body is framed by the chunked encoding; whatever follows must
        // never be read as a second request.
        let raw = format!(
            "POST /v1/api/suggest HTTP/1.1\r\nContent-Length: 4\r\nTransfer-Encoding: chunked\r\n\r\nd\r\n{{\"input\":\"a\"}}\r\n0\r\n\r\n{}",
            SUGGEST_A
        );

        let (out, exit) = exchange(&raw, DEFAULT_MAX_BODY_BYTES).await;

        assert_eq!(exit, WorkerExit::Closed { requests: 1 });
        assert_eq!(status_lines(&out), vec!["HTTP/1.1 200 OK"]);
        assert!(out.contains("connection: close\r\n"));
    }

    #[tokio::test]
    async fn test_non_chunked_transfer_encoding_is_rejected() {
        let raw = "POST /v1/api/suggest HTTP/1.1\r\nTransfer-Encoding: gzip\r\n\r\n{\"input\":\"a\"}";

        let (out, exit) = exchange(raw, DEFAULT_MAX_BODY_BYTES).await;

        assert_eq!(exit, WorkerExit::Aborted { requests: 0 });
        assert_eq!(status_lines(&out), vec!["HTTP/1.1 400 Bad Request"]);
    }

    #[tokio::test]
    async fn test_oversized_body_is_payload_too_large() {
        let raw = format!("{}{}", SUGGEST_A, SUGGEST_A);

        let (out, exit) = exchange(&raw, 8).await;

        assert_eq!(status_lines(&out), vec!["HTTP/1.1 413 Payload Too Large"]);
        assert!(out.contains("connection: close\r\n"));
        assert!(out.ends_with("Request body exceeds the 8 byte limit"));
        assert!(matches!(
            exit,
            WorkerExit::Closed { requests: 1 } | WorkerExit::Aborted { requests: 1 }
        ));
    }

    // ============================================================
    // TCP TESTS
    // ============================================================

    #[tokio::test]
    async fn test_tcp_worker_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut client = TcpStream::connect(addr).await.unwrap();
        let (server, peer) = listener.accept().await.unwrap();
        let worker = tokio::spawn(
            ConnectionWorker::new(server, processor(), peer.to_string(), DEFAULT_MAX_BODY_BYTES)
                .run(),
        );

        client
            .write_all(b"POST /v1/api/suggest HTTP/1.1\r\nContent-Length: 13\r\nConnection: close\r\n\r\n{\"input\":\"a\"}")
            .await
            .unwrap();

        let mut raw = String::new();
        client.read_to_string(&mut raw).await.unwrap();

        assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(raw.contains("connection: close\r\n"));
        assert!(raw.contains("content-type: application/json\r\n"));
        assert!(raw.contains("\"text\": \"avocado\""));
        assert_eq!(worker.await.unwrap(), WorkerExit::Closed { requests: 1 });
    }

    #[tokio::test]
    async fn test_tcp_peer_disconnect_closes_cleanly() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).await.unwrap();
        let (server, peer) = listener.accept().await.unwrap();
        drop(client);

        let exit = ConnectionWorker::new(server, processor(), peer.to_string(), DEFAULT_MAX_BODY_BYTES)
            .run()
            .await;

        assert_eq!(exit, WorkerExit::Closed { requests: 0 });
    }
}
