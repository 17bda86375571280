// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::DecryptedBalance;
use std::fmt;

pub const HIDDEN: &str = "Hidden";

/// Number of fractional digits dropped when displaying a balance
pub const DISPLAY_SCALE: usize = 6;

/// What a balance field shows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BalanceDisplay {
    /// Never fetched or decrypted
    #[default]
    Hidden,
    Decrypted(DecryptedBalance),
}

impl BalanceDisplay {
    pub fn is_hidden(&self) -> bool {
        matches!(self, BalanceDisplay::Hidden)
    }

    pub fn as_raw(&self) -> &str {
        match self {
            BalanceDisplay::Hidden => HIDDEN,
            BalanceDisplay::Decrypted(balance) => balance.as_str(),
        }
    }
}

impl fmt::Display for BalanceDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_balance(self.as_raw()))
    }
}

/// Render a raw balance for display: the last six digits are dropped and the integer part gets
/// thousands separators. The fractional part is lost.
///
/// Anything that is not a plain digit string, `"Hidden"` included, is returned unchanged.
/// [`DecryptedBalance`] only ever holds digits, so through [`BalanceDisplay`] that case is
/// always `Hidden`.
pub fn format_balance(balance: &str) -> String {
    if !balance.bytes().all(|b| b.is_ascii_digit()) {
        return balance.to_owned();
    }

    let integer = &balance[..balance.len().saturating_sub(DISPLAY_SCALE)];
    let integer = integer.trim_start_matches('0');
    if integer.is_empty() {
        return "0".to_string();
    }
    group_thousands(integer)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
