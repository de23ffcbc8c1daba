// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// fieldreport-app — the capture session that ties camera, signature,
// location and form together, plus the desktop devices, configuration
// loading and command handlers behind the `fieldreport` binary.

pub mod cli;
pub mod commands;
pub mod desktop;
pub mod logging;
pub mod notify;
pub mod services;
pub mod session;

pub use desktop::{DesktopBridge, Devices};
pub use notify::{ConsoleNotifier, Notifier};
pub use services::AppServices;
pub use session::FieldSession;
