// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    ConfidentialContract, ContractFunction, EncryptedArg, FhevmError, Result,
    TransactionConfirmation,
};
use std::future::Future;
use tracing::{error, info};

/// Free-text amount fields of one form plus its busy indicator
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AmountForm {
    amounts: Vec<String>,
    busy: bool,
}

impl AmountForm {
    /// A form with `fields` empty amount fields
    pub fn new(fields: usize) -> Self {
        Self {
            amounts: vec![String::new(); fields],
            busy: false,
        }
    }

    pub fn with_amounts<I, T>(amounts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            amounts: amounts.into_iter().map(Into::into).collect(),
            busy: false,
        }
    }

    /// Set field `index`, ignoring indexes the form does not have
    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.amounts.get_mut(index) {
            *field = value.into();
        }
    }

    pub fn amounts(&self) -> &[String] {
        &self.amounts
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Submitting is possible when idle and every field has text
    pub fn can_submit(&self) -> bool {
        !self.busy && self.amounts.iter().all(|a| !a.trim().is_empty())
    }

    pub fn clear(&mut self) {
        self.amounts.iter_mut().for_each(String::clear);
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

/// Invoke `function` on `contract` with the encrypted arguments in order and wait for the
/// transaction to confirm. No retry and no timeout beyond what the transport enforces.
pub async fn submit(
    contract: &dyn ConfidentialContract,
    function: ContractFunction,
    args: &[EncryptedArg],
) -> Result<TransactionConfirmation> {
    if args.len() != function.arity() {
        return Err(FhevmError::Arity {
            function: function.name(),
            expected: function.arity(),
            actual: args.len(),
        });
    }

    let pending = contract.send(function, args).await?;
    info!(
        contract = %contract.address(),
        function = function.name(),
        tx = %pending.tx_hash(),
        "Transaction submitted"
    );

    let confirmation = pending.wait().await?;
    info!(
        contract = %contract.address(),
        function = function.name(),
        tx = %confirmation.tx_hash,
        block = ?confirmation.block_number,
        "Transaction confirmed"
    );
    Ok(confirmation)
}

/// Run one form submission: the form is busy while `operation` runs and idle afterwards.
/// Fields are cleared only on success so a failed attempt can be retried as typed.
pub async fn run_form<T, Fut>(form: &mut AmountForm, flow: &str, operation: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    form.set_busy(true);
    let result = operation.await;
    form.set_busy(false);

    match &result {
        Ok(_) => form.clear(),
        Err(e) => error!(flow, kind = ?e.kind(), error = %e, "Operation failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_fields() {
        let mut form = AmountForm::new(2);
        assert!(!form.can_submit());
        form.set(0, "50");
        form.set(1, "75");
        form.set(5, "ignored");
        assert_eq!(form.amounts(), &["50".to_string(), "75".to_string()]);
        assert!(form.can_submit());
        form.clear();
        assert_eq!(form.amounts(), &[String::new(), String::new()]);
    }

    #[tokio::test]
    async fn test_run_form_resets_busy_and_keeps_fields_on_error() {
        let mut form = AmountForm::with_amounts(["1"]);
        let result: Result<()> = run_form(&mut form, "test", async {
            Err(FhevmError::Network("down".into()))
        })
        .await;
        assert!(result.is_err());
        assert!(!form.is_busy());
        assert_eq!(form.amounts(), &["1".to_string()]);

        let result = run_form(&mut form, "test", async { Ok(1u8) }).await;
        assert_eq!(result.unwrap(), 1);
        assert_eq!(form.amounts(), &[String::new()]);
    }
}
