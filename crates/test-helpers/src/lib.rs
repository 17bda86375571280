// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod mock_contract;
mod mock_fhe;
mod mock_signer;
mod utils;

pub use mock_contract::*;
pub use mock_fhe::*;
pub use mock_signer::*;
pub use utils::*;
