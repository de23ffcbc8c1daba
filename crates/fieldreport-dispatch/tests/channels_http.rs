// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Relay and hosted-email channels against loopback HTTP servers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use fieldreport_core::config::EmailJsConfig;
use fieldreport_core::error::FieldReportError;
use fieldreport_core::types::{
    Address, CapturedPhoto, FormValues, GeoLocation, ImageEncoding, PhotoId, ReportArtifact,
    SignatureImage,
};
use fieldreport_dispatch::data_url;
use fieldreport_dispatch::{DeliveryChannel, EmailJsChannel, RelayChannel, Submission};

#[derive(Debug, Clone)]
struct ReceivedPart {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

type Received = Arc<Mutex<Vec<HashMap<String, ReceivedPart>>>>;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Relay stand-in: records every request, answers with `status`.
async fn relay(status: StatusCode) -> (String, Received) {
    let received: Received = Arc::default();
    let app = Router::new()
        .route(
            "/api/send-email",
            post(
                move |State(received): State<Received>, mut multipart: Multipart| async move {
                    let mut parts = HashMap::new();
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap().to_owned();
                        let part = ReceivedPart {
                            file_name: field.file_name().map(str::to_owned),
                            content_type: field.content_type().map(str::to_owned),
                            bytes: field.bytes().await.unwrap().to_vec(),
                        };
                        parts.insert(name, part);
                    }
                    received.lock().unwrap().push(parts);
                    (status, "{\"message\":\"done\"}")
                },
            ),
        )
        .with_state(received.clone());
    let base = serve(app).await;
    (format!("{base}/api/send-email"), received)
}

fn submission(photo_count: usize) -> Submission {
    Submission {
        report: ReportArtifact {
            pdf: b"%PDF-1.7 test".to_vec(),
            file_name: "report.pdf".into(),
            sha256: String::new(),
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            created_at: Utc::now(),
        },
        signature: SignatureImage {
            data: vec![0x89, b'P', b'N', b'G'],
            min_present_len: 0,
        },
        photos: (0..photo_count)
            .map(|n| CapturedPhoto {
                id: PhotoId::new(),
                data: vec![0xff, 0xd8, n as u8],
                encoding: ImageEncoding::Jpeg,
                width: 1,
                height: 1,
                captured_at: Utc::now(),
            })
            .collect(),
        location: GeoLocation::new(40.0, -3.0),
        address: Address("Madrid".into()),
        form: FormValues {
            work_reference: "WR-1".into(),
            full_name: "Ana".into(),
            ..FormValues::default()
        },
    }
}

fn text(part: &ReceivedPart) -> String {
    String::from_utf8(part.bytes.clone()).unwrap()
}

#[tokio::test]
async fn relay_receives_every_part() {
    let (endpoint, received) = relay(StatusCode::OK).await;
    let channel = RelayChannel::new(endpoint).unwrap();

    let receipt = channel.deliver(&submission(2)).await.unwrap();
    assert!(receipt.confirmed);
    assert!(receipt.detail.contains("done"));

    let requests = received.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let parts = &requests[0];

    let pdf = &parts["pdfFile"];
    assert_eq!(pdf.file_name.as_deref(), Some("report.pdf"));
    assert_eq!(pdf.content_type.as_deref(), Some("application/pdf"));
    assert!(pdf.bytes.starts_with(b"%PDF"));

    assert_eq!(parts["signature"].file_name.as_deref(), Some("signature.png"));
    assert_eq!(parts["photo_1"].file_name.as_deref(), Some("photo_1.jpg"));
    assert_eq!(parts["photo_2"].bytes, vec![0xff, 0xd8, 1]);
    assert!(!parts.contains_key("photo_3"));

    let location: serde_json::Value = serde_json::from_str(&text(&parts["location"])).unwrap();
    assert_eq!(location["latitude"], 40.0);
    assert_eq!(location["longitude"], -3.0);
    assert_eq!(text(&parts["address"]), "Madrid");
    assert_eq!(text(&parts["workReference"]), "WR-1");
    assert_eq!(text(&parts["fullName"]), "Ana");
    assert_eq!(text(&parts["email"]), "");
}

#[tokio::test]
async fn relay_400_means_missing_pdf() {
    let (endpoint, _) = relay(StatusCode::BAD_REQUEST).await;
    let channel = RelayChannel::new(endpoint).unwrap();
    let err = channel.deliver(&submission(1)).await.unwrap_err();
    match err {
        FieldReportError::Network(message) => assert!(message.contains("missing PDF")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn relay_500_carries_the_body() {
    let (endpoint, _) = relay(StatusCode::INTERNAL_SERVER_ERROR).await;
    let channel = RelayChannel::new(endpoint).unwrap();
    let err = channel.deliver(&submission(1)).await.unwrap_err();
    match err {
        FieldReportError::Network(message) => {
            assert!(message.contains("500"));
            assert!(message.contains("done"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_relay_is_a_network_failure() {
    // Bind and drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let channel = RelayChannel::new(format!("http://{addr}/api/send-email")).unwrap();
    assert!(matches!(
        channel.deliver(&submission(1)).await,
        Err(FieldReportError::Network(_))
    ));
}

#[tokio::test]
async fn emailjs_posts_template_params() {
    let received: Arc<Mutex<Vec<serde_json::Value>>> = Arc::default();
    let app = Router::new()
        .route(
            "/api/v1.0/email/send",
            post(
                |State(received): State<Arc<Mutex<Vec<serde_json::Value>>>>,
                 Json(body): Json<serde_json::Value>| async move {
                    received.lock().unwrap().push(body);
                    "OK"
                },
            ),
        )
        .with_state(received.clone());
    let base = serve(app).await;

    let channel = EmailJsChannel::new(EmailJsConfig {
        endpoint: format!("{base}/api/v1.0/email/send"),
        service_id: "svc".into(),
        template_id: "tpl".into(),
        public_key: "pk".into(),
        access_token: Some("secret".into()),
    })
    .unwrap();

    let receipt = channel.deliver(&submission(2)).await.unwrap();
    assert_eq!(receipt.detail, "OK");

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["service_id"], "svc");
    assert_eq!(body["template_id"], "tpl");
    assert_eq!(body["user_id"], "pk");
    assert_eq!(body["accessToken"], "secret");

    let params = &body["template_params"];
    assert_eq!(params["workReference"], "WR-1");
    assert_eq!(params["location"], "Lat: 40.0, Lon: -3.0");
    assert_eq!(params["address"], "Madrid");
    assert_eq!(params["photo_count"], 2);

    assert_eq!(
        params["signature"],
        data_url::encode("image/png", &[0x89, b'P', b'N', b'G'])
    );
    let photos_html = params["photos_html"].as_str().unwrap();
    assert_eq!(photos_html.matches("<img ").count(), 2);
    assert!(photos_html.contains("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn emailjs_error_status_is_a_network_failure() {
    let app = Router::new().route(
        "/send",
        post(|| async { (StatusCode::BAD_REQUEST, "The template ID is invalid") }),
    );
    let base = serve(app).await;

    let channel = EmailJsChannel::new(EmailJsConfig {
        endpoint: format!("{base}/send"),
        ..EmailJsConfig::default()
    })
    .unwrap();
    match channel.deliver(&submission(1)).await.unwrap_err() {
        FieldReportError::Network(message) => assert!(message.contains("template ID")),
        other => panic!("unexpected error: {other:?}"),
    }
}
