// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The delivery seam. A deployment picks exactly one channel; the dispatcher
// only ever sees `dyn DeliveryChannel`.

use std::sync::Arc;

use async_trait::async_trait;
use fieldreport_bridge::NativeMailClient;
use fieldreport_core::config::ChannelConfig;
use fieldreport_core::error::Result;
use fieldreport_core::types::{
    Address, CapturedPhoto, ChannelKind, DeliveryReceipt, FormValues, GeoLocation, ReportArtifact,
    SignatureImage, SubmissionDraft,
};

use crate::emailjs::EmailJsChannel;
use crate::mailto::MailtoChannel;
use crate::relay::RelayChannel;

/// A validated draft plus its freshly composed report.
#[derive(Debug, Clone)]
pub struct Submission {
    pub report: ReportArtifact,
    pub signature: SignatureImage,
    pub photos: Vec<CapturedPhoto>,
    pub location: GeoLocation,
    /// Placeholder when the lookup has not produced anything yet.
    pub address: Address,
    pub form: FormValues,
}

impl Submission {
    pub fn new(draft: &SubmissionDraft, location: GeoLocation, report: ReportArtifact) -> Self {
        Self {
            report,
            signature: draft.signature.clone(),
            photos: draft.photos.clone(),
            location,
            address: draft
                .location
                .address
                .clone()
                .unwrap_or_else(Address::unavailable),
            form: draft.form.clone(),
        }
    }
}

/// One way of getting a report to its recipient.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    fn kind(&self) -> ChannelKind;

    /// Send once. No retries; every error is terminal for this attempt.
    async fn deliver(&self, submission: &Submission) -> Result<DeliveryReceipt>;
}

/// Build the channel selected by `config.kind`.
pub fn build_channel(
    config: &ChannelConfig,
    mail_client: Arc<dyn NativeMailClient>,
) -> Result<Box<dyn DeliveryChannel>> {
    let channel: Box<dyn DeliveryChannel> = match config.kind {
        ChannelKind::Relay => Box::new(RelayChannel::new(config.relay.endpoint.clone())?),
        ChannelKind::EmailJs => Box::new(EmailJsChannel::new(config.emailjs.clone())?),
        ChannelKind::Mailto => Box::new(MailtoChannel::new(
            mail_client,
            config.mailto.default_recipient.clone(),
        )),
    };
    tracing::info!(channel = %channel.kind(), "delivery channel configured");
    Ok(channel)
}
