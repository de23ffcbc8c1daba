// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — configuration, storage locations and the wiring that turns
// settings plus devices into a session and a dispatcher.

pub mod app_services;
pub mod data_dir;

pub use app_services::{AppServices, CONFIG_FILE, load_config};
