// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod call;
pub mod cat;
pub mod grant;
pub mod grants;
pub mod list;
pub mod mkdir;
pub mod revoke;
pub mod write;

pub use call::call_command;
pub use cat::cat_command;
pub use grant::grant_command;
pub use grants::grants_command;
pub use list::list_command;
pub use mkdir::mkdir_command;
pub use revoke::revoke_command;
pub use write::write_command;
