// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One capture session: camera and photo roll, signature surface, location,
// form values. Owned by a single orchestrator; `reset` is the only way back
// to a blank session.
//
// Failures are caught here, logged and shown to the user through the
// notifier. Nothing is retried on the user's behalf.
//
// The address lookup runs as a background task once a position fix is in:
// the fix is stored immediately and the address fills in when the lookup
// answers.

use std::sync::Arc;

use fieldreport_capture::{
    CameraCapture, LocationResolver, PhotoRoll, PointerEvent, SignaturePad, SurfaceRect,
};
use fieldreport_core::error::{FieldReportError, Result};
use fieldreport_core::human_errors::humanize_error;
use fieldreport_core::types::{
    Address, DeliveryReceipt, FormValues, GeoLocation, LocationState, PhotoId, ReportArtifact,
    SubmissionDraft,
};
use fieldreport_dispatch::SubmissionDispatcher;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::notify::Notifier;

pub const SENT_MESSAGE: &str = "Report sent successfully.";
pub const HANDED_OFF_MESSAGE: &str =
    "The report was opened in your mail client. Send it from there to finish.";

pub struct FieldSession {
    camera: CameraCapture,
    signature: SignaturePad,
    locator: LocationResolver,
    location: Option<GeoLocation>,
    address: watch::Receiver<Option<Address>>,
    lookup: Option<JoinHandle<()>>,
    form: FormValues,
    notifier: Arc<dyn Notifier>,
}

impl FieldSession {
    pub fn new(
        camera: CameraCapture,
        signature: SignaturePad,
        locator: LocationResolver,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            camera,
            signature,
            locator,
            location: None,
            address: watch::channel(None).1,
            lookup: None,
            form: FormValues::default(),
            notifier,
        }
    }

    /// Start the camera and take a position fix. The two run concurrently
    /// and fail independently. Returns once both have answered; the address
    /// lookup for the fix continues in the background.
    #[instrument(skip(self))]
    pub async fn start(&mut self) {
        self.clear_location();
        let (camera, fix) = tokio::join!(self.camera.start(), self.locator.acquire());

        if let Err(err) = camera {
            self.report(&err);
        }
        match fix {
            Ok(location) => {
                self.location = Some(location);
                self.spawn_address_lookup(location);
            }
            Err(err) => self.report(&err),
        }
    }

    fn spawn_address_lookup(&mut self, location: GeoLocation) {
        let (sender, receiver) = watch::channel(None);
        let locator = self.locator.clone();
        self.address = receiver;
        self.lookup = Some(tokio::spawn(async move {
            let address = locator.lookup_address(location).await;
            sender.send_replace(Some(address));
        }));
    }

    /// Wait for the pending address lookup. `None` when there is no fix or
    /// the lookup was cancelled.
    pub async fn address_resolved(&mut self) -> Option<Address> {
        if self.location.is_none() {
            return None;
        }
        if let Some(address) = self.address.borrow().clone() {
            return Some(address);
        }
        match self.address.wait_for(Option::is_some).await {
            Ok(address) => (*address).clone(),
            Err(_) => None,
        }
    }

    fn clear_location(&mut self) {
        if let Some(lookup) = self.lookup.take() {
            lookup.abort();
            debug!("pending address lookup cancelled");
        }
        self.location = None;
        self.address = watch::channel(None).1;
    }

    /// Grab a still from the live camera. `None` when nothing was captured.
    pub fn capture_photo(&mut self) -> Option<PhotoId> {
        self.camera.capture().map_err(|err| self.report(&err)).ok()
    }

    pub fn remove_photo(&mut self, id: PhotoId) -> bool {
        self.camera.remove(id).is_some()
    }

    pub fn photos(&self) -> &PhotoRoll {
        self.camera.photos()
    }

    pub fn camera_active(&self) -> bool {
        self.camera.is_active()
    }

    /// Forward a pointer event to the signature surface.
    pub fn handle_pointer(&mut self, event: PointerEvent, rect: SurfaceRect) -> bool {
        self.signature.handle(event, rect)
    }

    pub fn signature_mut(&mut self) -> &mut SignaturePad {
        &mut self.signature
    }

    pub fn clear_signature(&mut self) {
        self.signature.clear();
    }

    /// The fix, and its address once the lookup has answered.
    pub fn location(&self) -> LocationState {
        LocationState {
            location: self.location,
            address: self.location.and_then(|_| self.address.borrow().clone()),
        }
    }

    pub fn form(&self) -> &FormValues {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormValues {
        &mut self.form
    }

    /// Snapshot of everything collected so far.
    pub fn draft(&self) -> Result<SubmissionDraft> {
        Ok(SubmissionDraft {
            signature: self.signature.export()?,
            photos: self.photos().to_vec(),
            location: self.location(),
            form: self.form.clone(),
        })
    }

    /// Submit through `dispatcher`. The session is left as it was on
    /// failure so the user can try again.
    pub async fn submit(&self, dispatcher: &SubmissionDispatcher) -> Result<DeliveryReceipt> {
        let outcome = match self.draft() {
            Ok(draft) => dispatcher.submit(&draft).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(receipt) => {
                self.notifier.confirm(if receipt.confirmed {
                    SENT_MESSAGE
                } else {
                    HANDED_OFF_MESSAGE
                });
                Ok(receipt)
            }
            Err(err) => {
                if !matches!(err, FieldReportError::SubmissionInFlight) {
                    self.report(&err);
                }
                Err(err)
            }
        }
    }

    /// Compose the report without sending it.
    pub fn preview(&self, dispatcher: &SubmissionDispatcher) -> Result<ReportArtifact> {
        let draft = self.draft()?;
        dispatcher.preview(&draft).inspect_err(|err| self.report(err))
    }

    /// Back to a blank session: camera stopped, photos, signature, location
    /// and form cleared.
    pub fn reset(&mut self) {
        self.camera.reset();
        self.signature.clear();
        self.clear_location();
        self.form = FormValues::default();
        info!("session reset");
    }

    fn report(&self, err: &FieldReportError) {
        match err {
            FieldReportError::Validation(failure) => warn!(%failure, "submission blocked"),
            other => error!(error = %other, "operation failed"),
        }
        self.notifier.alert(&humanize_error(err));
    }
}

impl Drop for FieldSession {
    fn drop(&mut self) {
        if let Some(lookup) = self.lookup.take() {
            lookup.abort();
        }
    }
}
