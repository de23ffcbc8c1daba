// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// fieldreport-dispatch — Gatekeeping and delivery of a finished report.
// The dispatcher validates a draft, composes the PDF and hands the result to
// exactly one configured delivery channel: the mail relay (multipart upload),
// a hosted templated-email API, or the local mail client via `mailto:`.

pub mod channel;
pub mod control;
pub mod data_url;
pub mod dispatcher;
pub mod emailjs;
pub mod mailto;
pub mod relay;

pub use channel::{DeliveryChannel, Submission, build_channel};
pub use control::{BusyGuard, SubmitControl};
pub use dispatcher::SubmissionDispatcher;
pub use emailjs::EmailJsChannel;
pub use mailto::MailtoChannel;
pub use relay::RelayChannel;
