//! End-to-end tests for bundle creation

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use rstest::rstest;
use sigstore_http::testing::MockTransport;
use sigstore_http::RetryOptions;
use sigstore_sign::{
    Artifact, Bundle, Bundler, DssePackager, ErrorCode, InternalError, KeyMaterial,
    MessageSignaturePackager, Result, SignatureBundle, Signer, SigningConfig, SigningContext,
    Packager, StaticIdentityProvider, Witness, WitnessMaterial,
};
use sigstore_types::{
    CertificateContent, MediaType, Rfc3161Timestamp, SignatureContent, TransparencyLogEntry,
    VerificationMaterialContent,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const LEAF: &str = "-----BEGIN CERTIFICATE-----\nbGVhZg==\n-----END CERTIFICATE-----\n";
const ROOT: &str = "-----BEGIN CERTIFICATE-----\ncm9vdA==\n-----END CERTIFICATE-----\n";

/// Signs with a fixed signature and remembers what it was asked to sign
#[derive(Default)]
struct RecordingSigner {
    payloads: Mutex<Vec<Vec<u8>>>,
}

impl RecordingSigner {
    fn payloads(&self) -> Vec<Vec<u8>> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Signer for RecordingSigner {
    async fn sign(&self, data: &[u8]) -> Result<SignatureBundle> {
        self.payloads.lock().unwrap().push(data.to_vec());
        Ok(SignatureBundle {
            signature: b"signature".to_vec(),
            key: KeyMaterial::public_key("PUBLIC KEY"),
        })
    }
}

/// Contributes canned material
struct FixedWitness(WitnessMaterial);

#[async_trait]
impl Witness for FixedWitness {
    async fn testify(&self, _: &SignatureContent, public_key: &[u8]) -> Result<WitnessMaterial> {
        assert_eq!(public_key, b"PUBLIC KEY");
        Ok(self.0.clone())
    }
}

struct RejectingWitness;

#[async_trait]
impl Witness for RejectingWitness {
    async fn testify(&self, _: &SignatureContent, _: &[u8]) -> Result<WitnessMaterial> {
        Err(InternalError::new(ErrorCode::TlogCreateEntry, "error creating tlog entry").into())
    }
}

/// Counts how often it is asked to testify
#[derive(Default)]
struct CountingWitness {
    calls: AtomicUsize,
}

impl CountingWitness {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Witness for CountingWitness {
    async fn testify(&self, _: &SignatureContent, _: &[u8]) -> Result<WitnessMaterial> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(WitnessMaterial::default())
    }
}

/// Fails to lay out any bundle
#[derive(Debug)]
struct FailingPackager;

impl Packager for FailingPackager {
    fn package(&self, _: &Artifact, _: &SignatureBundle) -> Result<Bundle> {
        Err(InternalError::new(
            ErrorCode::CaCreateSigningCertificate,
            "no usable key material",
        )
        .into())
    }
}

/// A signer backed by an unreachable key store
struct OfflineSigner;

#[async_trait]
impl Signer for OfflineSigner {
    async fn sign(&self, _: &[u8]) -> Result<SignatureBundle> {
        Err(sigstore_sign::Error::signing(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "key store offline",
        )))
    }
}

/// Never finishes
struct StalledWitness;

#[async_trait]
impl Witness for StalledWitness {
    async fn testify(&self, _: &SignatureContent, _: &[u8]) -> Result<WitnessMaterial> {
        std::future::pending::<Result<WitnessMaterial>>().await
    }
}

fn tlog_entry(index: &str) -> TransparencyLogEntry {
    serde_json::from_value(serde_json::json!({
        "logIndex": index,
        "logId": {"keyId": "q80="},
        "kindVersion": {"kind": "hashedrekord", "version": "0.0.1"},
        "integratedTime": "1",
        "canonicalizedBody": "e30="
    }))
    .unwrap()
}

fn timestamp(token: &[u8]) -> Rfc3161Timestamp {
    Rfc3161Timestamp {
        signed_timestamp: token.to_vec(),
    }
}

#[tokio::test]
async fn test_hello_without_witnesses() {
    let bundler = Bundler::new(DssePackager::new(), Arc::new(RecordingSigner::default()));
    let artifact = Artifact::new(b"hello".to_vec()).with_type("text/plain");

    let bundle = bundler.create(&artifact).await.unwrap();

    let SignatureContent::DsseEnvelope(envelope) = &bundle.content else {
        panic!("expected an envelope");
    };
    assert_eq!(envelope.payload, b"hello");
    assert_eq!(envelope.payload_type, "text/plain");
    assert_eq!(envelope.signatures.len(), 1);
    assert_eq!(envelope.signatures[0].sig, b"signature");
    assert!(bundle.verification_material.tlog_entries.is_empty());
    assert!(bundle
        .verification_material
        .timestamp_verification_data
        .rfc3161_timestamps
        .is_empty());
}

#[tokio::test]
async fn test_json_roundtrip_recovers_artifact() {
    let bundler = Bundler::new(DssePackager::new(), Arc::new(RecordingSigner::default()))
        .with_witness(Arc::new(FixedWitness(WitnessMaterial {
            tlog_entries: vec![tlog_entry("3")],
            rfc3161_timestamps: vec![timestamp(b"ts")],
        })));
    let artifact = Artifact::new(b"{\"a\":1}".to_vec()).with_type("application/json");

    let bundle = bundler.create(&artifact).await.unwrap();
    let parsed = Bundle::from_json(&bundle.to_json().unwrap()).unwrap();

    assert_eq!(parsed, bundle);
    let SignatureContent::DsseEnvelope(envelope) = &parsed.content else {
        panic!("expected an envelope");
    };
    assert_eq!(envelope.payload, artifact.data);
    assert_eq!(envelope.payload_type, "application/json");
    assert_eq!(envelope.signatures[0].sig, b"signature");
}

#[tokio::test]
async fn test_message_signature_signs_raw_data() {
    let signer = Arc::new(RecordingSigner::default());
    let bundler = Bundler::new(MessageSignaturePackager::new(), signer.clone());
    let artifact = Artifact::new(b"raw artifact".to_vec()).with_type("ignored");

    let bundle = bundler.create(&artifact).await.unwrap();

    assert_eq!(signer.payloads(), vec![b"raw artifact".to_vec()]);
    let SignatureContent::MessageSignature(message) = &bundle.content else {
        panic!("expected a message signature");
    };
    assert_eq!(message.signature, b"signature");
    assert_eq!(
        bundle.verification_material.content,
        VerificationMaterialContent::PublicKey {
            hint: String::new()
        }
    );
}

#[rstest]
#[case(Some("text/plain"), b"DSSEv1 10 text/plain 5 hello".to_vec())]
#[case(Some("application/json"), b"DSSEv1 16 application/json 5 hello".to_vec())]
#[case(None, b"DSSEv1 0  5 hello".to_vec())]
#[tokio::test]
async fn test_dsse_signs_pae(#[case] content_type: Option<&str>, #[case] expected: Vec<u8>) {
    let signer = Arc::new(RecordingSigner::default());
    let bundler = Bundler::new(DssePackager::new(), signer.clone());
    let mut artifact = Artifact::new(b"hello".to_vec());
    if let Some(content_type) = content_type {
        artifact = artifact.with_type(content_type);
    }

    bundler.create(&artifact).await.unwrap();

    assert_eq!(signer.payloads(), vec![expected]);
}

#[tokio::test]
async fn test_witness_material_merged_in_order() {
    let bundler = Bundler::new(DssePackager::new(), Arc::new(RecordingSigner::default()))
        .with_witness(Arc::new(FixedWitness(WitnessMaterial {
            tlog_entries: vec![tlog_entry("1"), tlog_entry("2")],
            rfc3161_timestamps: Vec::new(),
        })))
        .with_witness(Arc::new(FixedWitness(WitnessMaterial::default())))
        .with_witness(Arc::new(FixedWitness(WitnessMaterial {
            tlog_entries: vec![tlog_entry("3")],
            rfc3161_timestamps: vec![timestamp(b"a"), timestamp(b"b")],
        })));

    let bundle = bundler.create(&Artifact::new(b"x".to_vec())).await.unwrap();

    let indices: Vec<_> = bundle
        .verification_material
        .tlog_entries
        .iter()
        .map(|e| e.log_index.as_str())
        .collect();
    assert_eq!(indices, ["1", "2", "3"]);
    assert_eq!(
        bundle
            .verification_material
            .timestamp_verification_data
            .rfc3161_timestamps,
        vec![timestamp(b"a"), timestamp(b"b")]
    );
}

#[tokio::test]
async fn test_one_rejecting_witness_fails_create() {
    let bundler = Bundler::new(DssePackager::new(), Arc::new(RecordingSigner::default()))
        .with_witness(Arc::new(StalledWitness))
        .with_witness(Arc::new(RejectingWitness))
        .with_witness(Arc::new(FixedWitness(WitnessMaterial::default())));

    let err = bundler
        .create(&Artifact::new(b"x".to_vec()))
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::TlogCreateEntry));
    assert_eq!(err.to_string(), "error creating tlog entry");
}

#[tokio::test]
async fn test_packaging_failure_skips_witnesses() {
    let witness = Arc::new(CountingWitness::default());
    let bundler = Bundler::new(FailingPackager, Arc::new(RecordingSigner::default()))
        .with_witness(witness.clone());

    let err = bundler
        .create(&Artifact::new(b"x".to_vec()))
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::CaCreateSigningCertificate));
    assert_eq!(err.to_string(), "no usable key material");
    assert_eq!(witness.calls(), 0);
}

#[tokio::test]
async fn test_signer_failure_keeps_source() {
    let witness = Arc::new(CountingWitness::default());
    let bundler =
        Bundler::new(DssePackager::new(), Arc::new(OfflineSigner)).with_witness(witness.clone());

    let err = bundler
        .create(&Artifact::new(b"x".to_vec()))
        .await
        .unwrap_err();

    assert!(matches!(err, sigstore_sign::Error::Signing(_)));
    let mut source = std::error::Error::source(&err);
    let mut io = None;
    while let Some(cause) = source {
        if let Some(e) = cause.downcast_ref::<std::io::Error>() {
            io = Some(e);
            break;
        }
        source = cause.source();
    }
    assert_eq!(io.unwrap().kind(), std::io::ErrorKind::ConnectionRefused);
    assert_eq!(witness.calls(), 0);
}

fn jwt() -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let claims = serde_json::json!({
        "iss": "https://oauth2.sigstore.dev/auth",
        "sub": "1234",
        "email": "alice@example.com"
    });
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"none"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

fn fulcio_response() -> serde_json::Value {
    serde_json::json!({
        "signedCertificateEmbeddedSct": {"chain": {"certificates": [LEAF, ROOT]}}
    })
}

fn rekor_response() -> serde_json::Value {
    let body = r#"{"apiVersion":"0.0.1","kind":"dsse","spec":{}}"#;
    serde_json::json!({
        "24296fb24b8ad77a": {
            "body": STANDARD.encode(body),
            "integratedTime": 1700000000,
            "logID": "abcd",
            "logIndex": 42,
            "verification": {"signedEntryTimestamp": STANDARD.encode("set")}
        }
    })
}

fn config() -> SigningConfig {
    SigningConfig {
        fulcio_url: "http://fulcio.test".to_string(),
        rekor_url: Some("http://rekor.test".to_string()),
        tsa_url: None,
        retry: RetryOptions {
            retries: 2,
            min_timeout_ms: 1,
            max_timeout_ms: 1,
            ..RetryOptions::default()
        }
        .into(),
        ..SigningConfig::default()
    }
}

#[tokio::test]
async fn test_keyless_dsse_bundle() {
    let transport = Arc::new(MockTransport::new());
    transport.respond_json(201, &fulcio_response());
    transport.respond_json(201, &rekor_response());
    let context = SigningContext::with_config(config()).with_transport(transport.clone());

    let bundler = context
        .dsse_bundler(Arc::new(StaticIdentityProvider::new(jwt())))
        .unwrap();
    let artifact = Artifact::new(b"hello".to_vec()).with_type("text/plain");
    let bundle = bundler.create(&artifact).await.unwrap();

    assert_eq!(bundle.media_type, MediaType::Bundle0_2.as_str());
    let VerificationMaterialContent::X509CertificateChain { certificates } =
        &bundle.verification_material.content
    else {
        panic!("expected a certificate chain");
    };
    let raw: Vec<_> = certificates.iter().map(|c| c.raw_bytes.as_slice()).collect();
    assert_eq!(raw, [b"leaf".as_slice(), b"root".as_slice()]);

    let entries = &bundle.verification_material.tlog_entries;
    assert_eq!(entries.len(), 1);
    assert!(entries[0].inclusion_proof.is_none());
    assert_eq!(entries[0].log_index, "42");
    assert_eq!(entries[0].log_id.key_id, vec![0xab, 0xcd]);
    assert_eq!(entries[0].kind_version.kind, "dsse");
    assert_eq!(
        entries[0].inclusion_promise.as_ref().unwrap().signed_entry_timestamp,
        b"set"
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, "http://fulcio.test/api/v2/signingCert");
    assert_eq!(requests[1].url, "http://rekor.test/api/v1/log/entries");

    // The log receives the leaf certificate only
    let proposed: serde_json::Value =
        serde_json::from_slice(requests[1].body.as_deref().unwrap()).unwrap();
    let verifier = proposed["spec"]["proposedContent"]["verifiers"][0]
        .as_str()
        .unwrap();
    assert_eq!(STANDARD.decode(verifier).unwrap(), LEAF.as_bytes());
}

#[tokio::test]
async fn test_keyless_single_certificate() {
    let transport = Arc::new(MockTransport::new());
    transport.respond_json(201, &fulcio_response());
    let context = SigningContext::with_config(SigningConfig {
        rekor_url: None,
        single_certificate: true,
        ..config()
    })
    .with_transport(transport.clone());

    let bundle = context
        .dsse_bundler(Arc::new(StaticIdentityProvider::new(jwt())))
        .unwrap()
        .create(&Artifact::new(b"hello".to_vec()))
        .await
        .unwrap();

    assert_eq!(bundle.media_type, MediaType::Bundle0_3.as_str());
    assert_eq!(
        bundle.verification_material.content,
        VerificationMaterialContent::Certificate(CertificateContent {
            raw_bytes: b"leaf".to_vec()
        })
    );
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let transport = Arc::new(MockTransport::new());
    transport.respond(503, "");
    transport.fail("connection reset");
    transport.respond_json(201, &fulcio_response());
    transport.respond_json(201, &rekor_response());
    let context = SigningContext::with_config(config()).with_transport(transport.clone());

    let bundle = context
        .message_bundler(Arc::new(StaticIdentityProvider::new(jwt())))
        .unwrap()
        .create(&Artifact::new(b"hello".to_vec()))
        .await
        .unwrap();

    assert!(matches!(bundle.content, SignatureContent::MessageSignature(_)));
    assert_eq!(transport.request_count(), 4);
}

#[tokio::test]
async fn test_certificate_failure_code() {
    let transport = Arc::new(MockTransport::new());
    transport.respond_json(401, &serde_json::json!({"message": "invalid token"}));
    let context = SigningContext::with_config(config()).with_transport(transport.clone());

    let err = context
        .message_bundler(Arc::new(StaticIdentityProvider::new(jwt())))
        .unwrap()
        .create(&Artifact::new(b"hello".to_vec()))
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::CaCreateSigningCertificate));
    assert_eq!(
        err.to_string(),
        "error creating signing certificate - (401) invalid token"
    );
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_malformed_token_fails_before_any_request() {
    let transport = Arc::new(MockTransport::new());
    let context = SigningContext::with_config(config()).with_transport(transport.clone());
    let witness = Arc::new(CountingWitness::default());

    let err = context
        .dsse_bundler(Arc::new(StaticIdentityProvider::new("not-a-jwt")))
        .unwrap()
        .with_witness(witness.clone())
        .create(&Artifact::new(b"hello".to_vec()))
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::IdentityTokenParse));
    assert_eq!(err.to_string(), "error parsing identity token");
    assert_eq!(transport.request_count(), 0);
    assert_eq!(witness.calls(), 0);
}
