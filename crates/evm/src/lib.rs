// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod contracts;
mod errors;
mod pending;
mod signer;

pub use contracts::*;
pub use errors::*;
pub use pending::*;
pub use signer::*;
