//! The pattern shared by every procedure: price, submit, wait, report.

use crate::{
    artifacts::ContractHandle,
    backend::{RegistryBackend, RegistryCall, Submission},
    error::{NamingError, Step},
    fees::FeeOverrides,
    wallet::Authority,
};
use alloy_primitives::TxHash;
use ens_admin_common::{Config, Explorer};
use std::{io::Write, time::Duration};

/// Settings common to every procedure run.
#[derive(Clone, Debug)]
pub struct Settings {
    pub explorer: Explorer,
    pub gas_limit: u64,
    /// Bound on each confirmation wait.
    pub confirmation_timeout: Duration,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            explorer: config.explorer(),
            gas_limit: config.gas_limit,
            confirmation_timeout: config.confirmation_timeout(),
        }
    }
}

/// A confirmed step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub step: Step,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// Explorer page of the transaction.
    pub url: String,
}

/// Outcome of a successful procedure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcedureReport {
    /// Confirmed steps, in submission order.
    pub confirmed: Vec<StepReport>,
    /// Steps that were already satisfied on-chain and not submitted.
    pub skipped: Vec<Step>,
}

impl ProcedureReport {
    /// Returns the report of `step`, if it was confirmed.
    pub fn get(&self, step: Step) -> Option<&StepReport> {
        self.confirmed.iter().find(|report| report.step == step)
    }
}

/// Runs steps strictly one after the other, writing operator output to `out`.
pub struct Procedure<'a, B: ?Sized, W> {
    backend: &'a B,
    settings: &'a Settings,
    out: W,
    report: ProcedureReport,
}

impl<'a, B: RegistryBackend + ?Sized, W: Write> Procedure<'a, B, W> {
    pub fn new(backend: &'a B, settings: &'a Settings, out: W) -> Self {
        Self { backend, settings, out, report: ProcedureReport::default() }
    }

    /// Prints the explorer page of a contract the procedure is about to call.
    pub fn announce(&mut self, contract: &ContractHandle) -> Result<(), NamingError> {
        let explorer = &self.settings.explorer;
        writeln!(
            self.out,
            "{} contract on explorer: {}",
            contract.name,
            explorer.address_url(contract.address)
        )?;
        Ok(())
    }

    /// Records a step that needs no submission.
    pub fn skip(&mut self, step: Step, reason: &str) -> Result<(), NamingError> {
        warn!(%step, reason, "skipping step");
        writeln!(self.out, "Skipped {step}: {reason}")?;
        self.report.skipped.push(step);
        Ok(())
    }

    /// Submits `call` to `registry` signed by `authority`, then blocks until it is confirmed.
    ///
    /// Fees are queried right before the submission. On success `message` is printed with the
    /// transaction's explorer page.
    pub async fn execute(
        &mut self,
        step: Step,
        authority: &Authority,
        registry: &ContractHandle,
        call: RegistryCall,
        message: &str,
    ) -> Result<StepReport, NamingError> {
        let overrides = FeeOverrides::resolve(self.backend, self.settings.gas_limit).await?;

        let submission =
            Submission { step, authority: authority.clone(), to: registry.address, call, overrides };
        let tx_hash = self
            .backend
            .submit(submission)
            .await
            .map_err(|err| NamingError::Submission { step, source: err.into() })?;
        info!(%step, %tx_hash, from = %authority.address(), "submitted, waiting for confirmation");

        let timeout = self.settings.confirmation_timeout;
        let confirmation = tokio::time::timeout(timeout, self.backend.confirm(tx_hash))
            .await
            .map_err(|_| NamingError::ConfirmationTimeout { step, tx_hash, timeout })?
            .map_err(|err| NamingError::Confirmation { step, tx_hash, source: err.into() })?;
        if !confirmation.success {
            return Err(NamingError::Reverted { step, tx_hash });
        }
        info!(%step, %tx_hash, block = ?confirmation.block_number, "confirmed");

        let url = self.settings.explorer.tx_url(confirmation.tx_hash);
        writeln!(self.out, "{message}, TX: {url}")?;

        let report = StepReport {
            step,
            tx_hash: confirmation.tx_hash,
            block_number: confirmation.block_number,
            url,
        };
        self.report.confirmed.push(report.clone());
        Ok(report)
    }

    /// Returns the report of the steps run so far.
    pub fn report(&self) -> &ProcedureReport {
        &self.report
    }

    pub fn finish(self) -> ProcedureReport {
        self.report
    }
}
