// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod commands;
pub mod common;

pub use common::{HostContext, TerminalApprover};
