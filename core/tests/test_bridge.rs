#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cyphro_core::bridge::{
        BridgeError, CryptoBridge, CryptoRequest, CryptoResponse, CryptoResponseBody, CryptoResult,
        CryptoWorker,
    };
    use cyphro_core::codec::FileCodec;
    use cyphro_core::config::CodecConfig;
    use cyphro_core::types::{Action, ErrorKind, TransferableFile};

    const PASSWORD: &str = "correct horse battery";
    const TIMEOUT: Duration = Duration::from_secs(30);

    fn bridge(iterations: u32) -> CryptoBridge {
        CryptoBridge::new(FileCodec::new(CodecConfig::default().with_iterations(iterations)))
    }

    fn text(name: &str, body: &str) -> TransferableFile {
        TransferableFile::new(name, "text/plain", body.as_bytes().to_vec())
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let bridge = bridge(1_000);
        let encoded = bridge
            .call(Action::Encode, text("memo.txt", "meet at noon"), PASSWORD, None, TIMEOUT)
            .unwrap();
        let CryptoResult::Encoded { file_name, data } = encoded else {
            panic!("expected encoded result");
        };
        assert_eq!(file_name, "memo.cph");

        let container = TransferableFile::new(file_name, "application/octet-stream", data);
        let decoded = bridge.call(Action::Decode, container, PASSWORD, None, TIMEOUT).unwrap();
        let CryptoResult::Restored(restored) = &decoded else {
            panic!("expected restored result");
        };
        assert_eq!(&restored.data[..], b"meet at noon");
        assert_eq!(decoded.file_name(), "memo.txt");
    }

    #[test]
    fn test_disguise_is_ignored_on_decode() {
        let bridge = bridge(1_000);
        let encoded = bridge
            .call(Action::Encode, text("memo.txt", "x"), PASSWORD, Some(text("cover.pdf", "%PDF-1.7")), TIMEOUT)
            .unwrap();
        assert_eq!(encoded.file_name(), "cover.pdf");

        let container = TransferableFile::new("cover.pdf", "application/pdf", encoded.data().clone());
        let decoded = bridge
            .call(Action::Decode, container, PASSWORD, Some(text("unused.pdf", "y")), TIMEOUT)
            .unwrap();
        assert_eq!(decoded.file_name(), "memo.txt");
    }

    #[test]
    fn test_codec_errors_are_remote() {
        let bridge = bridge(1_000);
        let encoded = bridge.call(Action::Encode, text("a.txt", "abc"), PASSWORD, None, TIMEOUT).unwrap();
        let container = TransferableFile::new("a.cph", "", encoded.data().clone());

        let err = bridge.call(Action::Decode, container, "wrong password", None, TIMEOUT).unwrap_err();
        assert_eq!(err.remote_kind(), Some(ErrorKind::Authentication));

        let err = bridge
            .call(Action::Decode, text("a.cph", "nope"), PASSWORD, None, TIMEOUT)
            .unwrap_err();
        assert_eq!(err.remote_kind(), Some(ErrorKind::Format));
    }

    #[test]
    fn test_timeout_is_distinct() {
        // slow enough to outlast the deadline
        let bridge = bridge(200_000);
        let err = bridge
            .call(Action::Encode, text("a.txt", "abc"), PASSWORD, None, Duration::from_millis(1))
            .unwrap_err();
        assert_eq!(err, BridgeError::Timeout(Duration::from_millis(1)));
        assert_eq!(err.remote_kind(), None);
    }

    #[test]
    fn test_worker_answers_with_request_id() {
        let worker = CryptoWorker::spawn(FileCodec::new(CodecConfig::default().with_iterations(10))).unwrap();
        let request = CryptoRequest {
            id: 42,
            action: Action::Encode,
            source: text("a.txt", "abc"),
            password: PASSWORD.into(),
            disguise: None,
        };
        assert!(matches!(worker.call(request, TIMEOUT), Ok(CryptoResult::Encoded { .. })));
    }

    fn request(id: u64) -> CryptoRequest {
        CryptoRequest {
            id,
            action: Action::Encode,
            source: text("a.txt", "abc"),
            password: PASSWORD.into(),
            disguise: None,
        }
    }

    #[test]
    fn test_panicking_worker_is_transport_error() {
        let worker =
            CryptoWorker::spawn_with(|_: CryptoRequest| -> CryptoResponse { panic!("handler blew up") })
                .unwrap();
        let err = worker.call(request(3), TIMEOUT).unwrap_err();
        assert!(matches!(err, BridgeError::Transport(_)));
        assert_eq!(err.remote_kind(), None);
    }

    #[test]
    fn test_mismatched_id_is_transport_error() {
        let worker = CryptoWorker::spawn_with(|request| CryptoResponse {
            id: request.id + 1,
            body: CryptoResponseBody::Result(CryptoResult::Encoded {
                file_name: "a.cph".into(),
                data: bytes::Bytes::from_static(b"x"),
            }),
        })
        .unwrap();
        let err = worker.call(request(9), TIMEOUT).unwrap_err();
        assert!(matches!(err, BridgeError::Transport(_)));
        assert_eq!(err.remote_kind(), None);
    }

    #[test]
    fn test_injected_handler_answers() {
        let worker = CryptoWorker::spawn_with(|request| CryptoResponse {
            id: request.id,
            body: CryptoResponseBody::Error { kind: ErrorKind::Format, message: "not a protected file".into() },
        })
        .unwrap();
        let err = worker.call(request(5), TIMEOUT).unwrap_err();
        assert_eq!(err.remote_kind(), Some(ErrorKind::Format));
    }

    #[test]
    fn test_request_debug_hides_password() {
        let request = CryptoRequest {
            id: 1,
            action: Action::Decode,
            source: text("a.cph", "abc"),
            password: "hunter2hunter2".into(),
            disguise: None,
        };
        let dbg = format!("{:?}", request);
        assert!(dbg.contains("a.cph"));
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn test_response_wire_shape() {
        let response = CryptoResponse {
            id: 7,
            body: CryptoResponseBody::Error { kind: ErrorKind::Authentication, message: "authentication failed".into() },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["body"]["type"], "error");
        assert_eq!(json["body"]["kind"], "authentication");

        let back: CryptoResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }
}
