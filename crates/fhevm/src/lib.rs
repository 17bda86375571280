// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod amount;
mod auth_cache;
mod error;
mod formatter;
mod input_builder;
mod orchestrator;
mod reencrypt;
mod session;
mod traits;
mod types;

pub use amount::*;
pub use auth_cache::*;
pub use error::*;
pub use formatter::*;
pub use input_builder::*;
pub use orchestrator::*;
pub use reencrypt::*;
pub use session::*;
pub use traits::*;
pub use types::*;
