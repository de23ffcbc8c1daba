// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mail-client handoff. Builds a `mailto:` URI whose body carries every form
// value plus the signature and photos as data URLs, then asks the platform to
// open it. Whether the user ever presses send is unknowable, so receipts from
// this channel are never confirmed.

use std::sync::Arc;

use async_trait::async_trait;
use fieldreport_bridge::NativeMailClient;
use fieldreport_core::error::Result;
use fieldreport_core::types::{ChannelKind, DeliveryReceipt};
use tracing::{info, instrument};

use crate::channel::{DeliveryChannel, Submission};
use crate::data_url;

pub struct MailtoChannel {
    mail_client: Arc<dyn NativeMailClient>,
    default_recipient: Option<String>,
}

impl MailtoChannel {
    pub fn new(mail_client: Arc<dyn NativeMailClient>, default_recipient: Option<String>) -> Self {
        Self {
            mail_client,
            default_recipient,
        }
    }

    /// The form's email field, else the configured default, else nobody.
    fn recipient(&self, submission: &Submission) -> String {
        let from_form = submission.form.email.trim();
        if !from_form.is_empty() {
            return from_form.to_owned();
        }
        self.default_recipient
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_owned()
    }

    pub fn subject(submission: &Submission) -> String {
        format!(
            "Cable identification report - Ref: {}",
            submission.form.work_reference
        )
    }

    pub fn body(submission: &Submission) -> String {
        let mut lines = submission.form.summary_lines();
        lines.push(format!("Location: {}", submission.location));
        lines.push(format!("Address: {}", submission.address));
        lines.push(format!(
            "Signature: {}",
            data_url::encode("image/png", &submission.signature.data)
        ));
        for (index, photo) in submission.photos.iter().enumerate() {
            lines.push(format!(
                "Photo {}: {}",
                index + 1,
                data_url::encode(photo.encoding.mime_type(), &photo.data)
            ));
        }
        lines.join("\n")
    }

    /// `mailto:<recipient>?subject=..&body=..`, percent-encoded.
    pub fn build_uri(&self, submission: &Submission) -> String {
        let recipient = urlencoding::encode(&self.recipient(submission)).replace("%40", "@");
        format!(
            "mailto:{recipient}?subject={}&body={}",
            urlencoding::encode(&Self::subject(submission)),
            urlencoding::encode(&Self::body(submission)),
        )
    }
}

#[async_trait]
impl DeliveryChannel for MailtoChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Mailto
    }

    #[instrument(skip_all, fields(photos = submission.photos.len()))]
    async fn deliver(&self, submission: &Submission) -> Result<DeliveryReceipt> {
        let uri = self.build_uri(submission);
        info!(uri_len = uri.len(), "handing report to the mail client");
        self.mail_client.open_mail_uri(&uri)?;
        Ok(DeliveryReceipt {
            channel: ChannelKind::Mailto,
            confirmed: false,
            detail: "opened in the mail client; delivery cannot be confirmed".into(),
        })
    }
}
