// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mail relay channel — one multipart POST to `/api/send-email`.
//
// Body parts:
//   - `pdfFile`       the report (application/pdf)
//   - `signature`     signature PNG
//   - `photo_<n>`     one per photo, 1-based, capture order
//   - `location`      `{"latitude":..,"longitude":..}`
//   - `address`       resolved address or placeholder
//   - form values     under their wire names (`workReference`, ...)
//
// The relay answers 200 on success, 400 when the PDF part is missing and 500
// when its own mail send fails.

use async_trait::async_trait;
use fieldreport_core::error::{FieldReportError, Result};
use fieldreport_core::types::{ChannelKind, DeliveryReceipt};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use tracing::{error, info, instrument};

use crate::channel::{DeliveryChannel, Submission};

pub struct RelayChannel {
    http: reqwest::Client,
    endpoint: String,
}

impl RelayChannel {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| FieldReportError::Network(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Assemble the multipart body.
    pub fn build_form(submission: &Submission) -> Result<Form> {
        let mut form = Form::new()
            .part(
                "pdfFile",
                file_part(
                    submission.report.pdf.clone(),
                    &submission.report.file_name,
                    "application/pdf",
                )?,
            )
            .part(
                "signature",
                file_part(submission.signature.data.clone(), "signature.png", "image/png")?,
            );

        for (index, photo) in submission.photos.iter().enumerate() {
            let n = index + 1;
            let file_name = format!("photo_{n}.{}", photo.encoding.extension());
            form = form.part(
                format!("photo_{n}"),
                file_part(photo.data.clone(), &file_name, photo.encoding.mime_type())?,
            );
        }

        form = form
            .text("location", serde_json::to_string(&submission.location)?)
            .text("address", submission.address.to_string());
        for (wire_name, _, value) in submission.form.fields() {
            form = form.text(wire_name, value.to_owned());
        }
        Ok(form)
    }
}

fn file_part(bytes: Vec<u8>, file_name: &str, mime: &str) -> Result<Part> {
    Part::bytes(bytes)
        .file_name(file_name.to_owned())
        .mime_str(mime)
        .map_err(|err| FieldReportError::Network(format!("invalid part type '{mime}': {err}")))
}

#[async_trait]
impl DeliveryChannel for RelayChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Relay
    }

    #[instrument(skip_all, fields(endpoint = %self.endpoint, photos = submission.photos.len()))]
    async fn deliver(&self, submission: &Submission) -> Result<DeliveryReceipt> {
        let form = Self::build_form(submission)?;

        info!(pdf_bytes = submission.report.pdf.len(), "uploading report to relay");
        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|err| FieldReportError::Network(format!("relay unreachable: {err}")))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            info!(%status, "relay accepted the report");
            return Ok(DeliveryReceipt {
                channel: ChannelKind::Relay,
                confirmed: true,
                detail: body,
            });
        }

        error!(%status, body = %body, "relay refused the report");
        if status == StatusCode::BAD_REQUEST {
            return Err(FieldReportError::Network(
                "relay rejected the report (missing PDF)".into(),
            ));
        }
        Err(FieldReportError::Network(format!("relay returned {status}: {body}")))
    }
}
