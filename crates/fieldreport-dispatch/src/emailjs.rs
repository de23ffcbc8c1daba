// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Hosted templated-email channel. The report travels as template variables:
// form values, location text, the signature as a data URL and the photos as
// inline `<img>` fragments. The PDF itself is not attached; the service only
// renders the template.

use async_trait::async_trait;
use fieldreport_core::config::EmailJsConfig;
use fieldreport_core::error::{FieldReportError, Result};
use fieldreport_core::types::{ChannelKind, DeliveryReceipt};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info, instrument};

use crate::channel::{DeliveryChannel, Submission};
use crate::data_url;

/// Request body of the service's `send` endpoint.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: Map<String, Value>,
}

pub struct EmailJsChannel {
    http: reqwest::Client,
    config: EmailJsConfig,
}

impl EmailJsChannel {
    pub fn new(config: EmailJsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| FieldReportError::Network(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { http, config })
    }

    /// Flat name → value mapping handed to the template.
    pub fn template_params(submission: &Submission) -> Map<String, Value> {
        let mut params = Map::new();
        for (wire_name, _, value) in submission.form.fields() {
            params.insert(wire_name.to_owned(), Value::from(value));
        }
        params.insert("location".into(), Value::from(submission.location.to_string()));
        params.insert("address".into(), Value::from(submission.address.as_str()));
        params.insert(
            "signature".into(),
            Value::from(data_url::encode("image/png", &submission.signature.data)),
        );

        let photos_html: String = submission
            .photos
            .iter()
            .enumerate()
            .map(|(index, photo)| {
                format!(
                    "<img src=\"{}\" alt=\"Photo {}\" style=\"max-width:100%;\"/>",
                    data_url::encode(photo.encoding.mime_type(), &photo.data),
                    index + 1
                )
            })
            .collect();
        params.insert("photos_html".into(), Value::from(photos_html));
        params.insert("photo_count".into(), Value::from(submission.photos.len()));
        params
    }
}

#[async_trait]
impl DeliveryChannel for EmailJsChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::EmailJs
    }

    #[instrument(skip_all, fields(service = %self.config.service_id, template = %self.config.template_id))]
    async fn deliver(&self, submission: &Submission) -> Result<DeliveryReceipt> {
        let request = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            access_token: self.config.access_token.as_deref(),
            template_params: Self::template_params(submission),
        };

        info!(photos = submission.photos.len(), "sending templated email");
        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|err| FieldReportError::Network(format!("email service unreachable: {err}")))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            error!(%status, body = %body, "email service refused the message");
            return Err(FieldReportError::Network(format!(
                "email service returned {status}: {body}"
            )));
        }

        info!(%status, "templated email accepted");
        Ok(DeliveryReceipt {
            channel: ChannelKind::EmailJs,
            confirmed: true,
            detail: body,
        })
    }
}
