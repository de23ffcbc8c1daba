// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Submission dispatcher — gate, compose, deliver.
//
//   1. reject a second attempt while one is in flight
//   2. validate signature → photos → location (no side effects on failure)
//   3. disable the submit control, compose a fresh PDF
//   4. hand the submission to the configured channel
//
// Any failure after step 3 leaves the draft untouched so the user can press
// submit again without recapturing anything.

use fieldreport_core::error::{FieldReportError, Result};
use fieldreport_core::types::{ChannelKind, DeliveryReceipt, ReportArtifact, SubmissionDraft};
use fieldreport_document::ReportComposer;
use tracing::{error, info, instrument, warn};

use crate::channel::{DeliveryChannel, Submission};
use crate::control::SubmitControl;

pub struct SubmissionDispatcher {
    composer: ReportComposer,
    channel: Box<dyn DeliveryChannel>,
    control: SubmitControl,
}

impl SubmissionDispatcher {
    pub fn new(composer: ReportComposer, channel: Box<dyn DeliveryChannel>) -> Self {
        Self {
            composer,
            channel,
            control: SubmitControl::new(),
        }
    }

    pub fn channel_kind(&self) -> ChannelKind {
        self.channel.kind()
    }

    pub fn control(&self) -> &SubmitControl {
        &self.control
    }

    /// Validate and compose without sending.
    pub fn preview(&self, draft: &SubmissionDraft) -> Result<ReportArtifact> {
        draft.validate()?;
        self.composer.compose(draft)
    }

    /// One submission attempt. Never retried.
    #[instrument(skip_all, fields(channel = %self.channel.kind(), photos = draft.photos.len()))]
    pub async fn submit(&self, draft: &SubmissionDraft) -> Result<DeliveryReceipt> {
        if !self.control.is_enabled() {
            warn!("submission already in flight");
            return Err(FieldReportError::SubmissionInFlight);
        }

        let location = draft.validate().inspect_err(|failure| {
            warn!(%failure, "submission rejected");
        })?;

        let Some(_guard) = self.control.try_begin() else {
            return Err(FieldReportError::SubmissionInFlight);
        };

        let report = self.composer.compose(draft).inspect_err(|err| {
            error!(error = %err, "report composition failed");
        })?;
        info!(
            sha256 = %report.sha256,
            bytes = report.pdf.len(),
            "report composed"
        );

        let submission = Submission::new(draft, location, report);
        let receipt = self.channel.deliver(&submission).await.inspect_err(|err| {
            error!(error = %err, "delivery failed");
        })?;

        info!(confirmed = receipt.confirmed, "report delivered");
        Ok(receipt)
    }
}
