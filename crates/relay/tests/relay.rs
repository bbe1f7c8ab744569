use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use bytes::Bytes;
use encoding_rs::UTF_8;
use http::Request;
use http::header::CONTENT_TYPE;
use http_body::Frame;
use http_body_util::StreamBody;
use micro_relay::provider::{self, BodyProvider};
use micro_relay::{BodyProviderKind, BodyRelay, MultipartMessage, Part, RelayBody, RelayError, RequestBody};
use serde_json::json;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).with_test_writer().finish();
        tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
    });
}

fn post(content_type: &str, body: impl Into<RequestBody>) -> Request<RequestBody> {
    Request::builder().method("POST").uri("http://localhost/relay").header(CONTENT_TYPE, content_type).body(body.into()).unwrap()
}

fn slow_part(name: &'static str, millis: u64, completed: Arc<Mutex<Vec<&'static str>>>) -> Part {
    let stream = futures::stream::once(async move {
        tokio::time::sleep(Duration::from_millis(millis)).await;
        completed.lock().unwrap().push(name);
        Ok::<_, std::io::Error>(Frame::data(Bytes::from(name)))
    });
    Part::stream(name, StreamBody::new(stream)).with_content_type(mime::APPLICATION_OCTET_STREAM)
}

#[tokio::test]
async fn plain_text_request() {
    init_tracing();
    let relay = BodyRelay::default();
    let request = relay.request(post("text/plain", "hello")).unwrap();

    let extracted = relay.extract(&request).await.unwrap();
    assert_eq!(extracted.body, RelayBody::Text("hello".into()));
    assert_eq!(extracted.encoding, UTF_8);
}

#[tokio::test]
async fn json_request_is_relayed_as_text() {
    init_tracing();
    let relay = BodyRelay::default();
    let request = relay.request(post("application/json", r#"{"a":1}"#)).unwrap();

    let extracted = relay.extract(&request).await.unwrap();
    assert!(matches!(extracted.provider, BodyProviderKind::String(_)));
    assert_eq!(extracted.body.as_text(), Some(r#"{"a":1}"#));
}

#[tokio::test]
async fn unknown_application_subtype_is_raw() {
    init_tracing();
    let relay = BodyRelay::default();
    let request = relay.request(post("application/unknown-binary", vec![0xDEu8, 0xAD, 0xBE, 0xEF])).unwrap();

    let extracted = relay.extract(&request).await.unwrap();
    assert!(matches!(extracted.provider, BodyProviderKind::Raw(_)));
    assert_eq!(extracted.body, RelayBody::Bytes(Bytes::from_static(&[0xDE, 0xAD, 0xBE, 0xEF])));
}

#[tokio::test]
async fn font_request_is_unsupported() {
    init_tracing();
    let relay = BodyRelay::default();
    let request = relay.request(post("font/ttf", vec![0u8; 4])).unwrap();

    assert!(matches!(relay.extract(&request).await, Err(RelayError::UnsupportedContentType { .. })));
}

#[tokio::test]
async fn multipart_request_keeps_part_order() {
    init_tracing();
    let relay = BodyRelay::default();
    let completed = Arc::new(Mutex::new(Vec::new()));
    let parts = vec![
        slow_part("A", 50, Arc::clone(&completed)),
        slow_part("B", 100, Arc::clone(&completed)),
        slow_part("C", 5, Arc::clone(&completed)),
    ];
    let request = relay.request(post("multipart/form-data; boundary=relay", parts)).unwrap();

    let extracted = relay.extract(&request).await.unwrap();
    assert_eq!(extracted.encoding, UTF_8);

    let messages = MultipartMessage::decode_all(extracted.body.as_text().unwrap()).unwrap();
    let names: Vec<_> = messages.iter().map(MultipartMessage::name).collect();
    assert_eq!(names, ["A", "B", "C"]);
    assert_eq!(*completed.lock().unwrap(), ["C", "A", "B"]);
}

#[tokio::test]
async fn multipart_image_shape() {
    init_tracing();
    let relay = BodyRelay::default();
    let parts = vec![Part::bytes("file", Bytes::from_static(&[0x89, 0x50, 0x4E, 0x47])).with_content_type(mime::IMAGE_PNG)];
    let request = relay.request(post("multipart/form-data; boundary=relay", parts)).unwrap();

    let extracted = relay.extract(&request).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(extracted.body.as_text().unwrap()).unwrap();
    assert_eq!(value, json!([{"name": "file", "length": 4, "contentType": "image/png", "data": [137, 80, 78, 71]}]));
}

#[tokio::test]
async fn provider_mismatch_is_reported() {
    init_tracing();
    let relay = BodyRelay::default();
    let request = relay.request(post("text/plain", vec![Part::text("a", "b")])).unwrap();

    let err = relay.extract(&request).await.unwrap_err();
    assert!(matches!(err, RelayError::InvalidRequestShape { expected: "single-body", actual: "multipart" }));

    let provider = provider::build(&mime::TEXT_PLAIN).unwrap();
    assert!(provider.encoding(&request).is_err());
}
