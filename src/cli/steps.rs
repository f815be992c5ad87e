//! CLI commands for the step catalog
//!
//! Also hosts the financial context arguments shared with `diff`.

use std::path::PathBuf;

use clap::Args;

use crate::config::{ProcessAuditPaths, Settings};
use crate::display::format_step_list;
use crate::error::{AuditError, AuditResult};
use crate::models::{FinancialContext, PaymentMethod};
use crate::registry::StepConfigRegistry;
use crate::storage::read_json_required;

/// Financial context of the client
#[derive(Args, Debug, Clone, Default)]
pub struct ContextArgs {
    /// JSON file holding the financial context
    #[arg(long, conflicts_with_all = ["payment_method", "subsidy", "severance_funds"])]
    pub context: Option<PathBuf>,

    /// Payment method (cash, mortgage, leasing)
    #[arg(short = 'm', long)]
    pub payment_method: Option<String>,

    /// A housing subsidy is involved
    #[arg(long)]
    pub subsidy: bool,

    /// Severance funds are involved
    #[arg(long)]
    pub severance_funds: bool,
}

impl ContextArgs {
    /// Build the financial context from a file or from the flags
    pub fn resolve(&self) -> AuditResult<FinancialContext> {
        if let Some(path) = &self.context {
            return read_json_required(path);
        }

        let payment_method = match &self.payment_method {
            Some(method) => PaymentMethod::parse(method).ok_or_else(|| {
                AuditError::Validation(format!(
                    "Unknown payment method '{}'. Valid methods: cash, mortgage, leasing",
                    method
                ))
            })?,
            None => PaymentMethod::default(),
        };

        Ok(FinancialContext {
            payment_method,
            has_subsidy: self.subsidy,
            uses_severance_funds: self.severance_funds,
        })
    }
}

/// Handle the `steps` command
pub fn handle_steps_command(
    paths: &ProcessAuditPaths,
    settings: &Settings,
    args: ContextArgs,
) -> AuditResult<()> {
    let registry = StepConfigRegistry::from_settings(settings, paths)?;
    let ctx = args.resolve()?;

    print!("{}", format_step_list(&registry, &ctx));
    Ok(())
}
