//! Command handlers for the aztfmove CLI

use crate::config::Config;
use crate::correction::apply_corrections;
use crate::error::MoveError;
use crate::filter::FilterOptions;
use crate::report::MovePlan;
use crate::state::TerraformState;
use crate::validation::{
    validate_module_filter, validate_resource_group_filter, validate_resource_group_name,
    validate_subscription_id,
};
use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

/// Flags selecting what to move and where to.
#[derive(Args, Clone, Debug)]
pub struct SelectionArgs {
    /// Terraform state file (defaults to the configured state path)
    #[arg(long)]
    pub state: Option<PathBuf>,
    /// Resource address to move, e.g. azurerm_virtual_network.main (* for all)
    #[arg(long, default_value = "*")]
    pub resource: String,
    /// Module to move, e.g. module.network (* for all)
    #[arg(long, default_value = "*")]
    pub module: String,
    /// Source resource group (* to derive it from the selected resources)
    #[arg(long)]
    pub resource_group: Option<String>,
    /// Subscription the resources live in
    #[arg(long, env = "ARM_SUBSCRIPTION_ID")]
    pub subscription_id: String,
    /// Resource group to move the resources to
    #[arg(long)]
    pub target_resource_group: String,
    /// Subscription to move the resources to (defaults to the source subscription)
    #[arg(long)]
    pub target_subscription_id: Option<String>,
}

impl SelectionArgs {
    /// Combine the flags with the configured defaults and validate the result.
    pub fn to_filter_options(&self, config: &Config) -> crate::error::Result<FilterOptions> {
        let resource_group_filter = self
            .resource_group
            .clone()
            .unwrap_or_else(|| config.defaults.resource_group.clone());
        let target_subscription_id = self
            .target_subscription_id
            .clone()
            .or_else(|| config.defaults.target_subscription_id.clone())
            .unwrap_or_else(|| self.subscription_id.clone());

        validate_subscription_id(&self.subscription_id)?;
        validate_subscription_id(&target_subscription_id)?;
        validate_resource_group_filter(&resource_group_filter)?;
        validate_resource_group_name("target_resource_group", &self.target_resource_group)?;
        validate_module_filter(&self.module)?;

        Ok(FilterOptions {
            resource_filter: self.resource.clone(),
            module_filter: self.module.clone(),
            resource_group_filter,
            source_subscription_id: self.subscription_id.clone(),
            target_resource_group: self.target_resource_group.clone(),
            target_subscription_id,
        })
    }

    pub fn state_path(&self, config: &Config) -> PathBuf {
        self.state
            .clone()
            .unwrap_or_else(|| config.defaults.state_path.clone())
    }
}

fn build_plan(args: &SelectionArgs, config: &Config) -> Result<(TerraformState, MovePlan)> {
    let options = args.to_filter_options(config)?;
    let state_path = args.state_path(config);
    let state = TerraformState::load(&state_path)
        .with_context(|| format!("Failed to read state file: {}", state_path.display()))?;
    let outcome = state
        .filter(&options)
        .context("Unable to select the resources to move")?;
    info!(
        "Selected {} resource instances from {}",
        outcome.summaries.len(),
        state_path.display()
    );
    let plan = MovePlan::new(&options, &outcome);
    Ok((state, plan))
}

fn print_plan(plan: &MovePlan, output_format: &str) -> Result<()> {
    if output_format == "json" {
        println!("{}", plan.to_json()?);
    } else {
        print!("{}", plan);
    }
    Ok(())
}

fn ensure_not_blocked(plan: &MovePlan) -> Result<()> {
    if plan.is_blocked() {
        return Err(MoveError::BlockingResources {
            terraform_ids: plan.blocking.iter().map(|b| b.terraform_id.clone()).collect(),
        }
        .into());
    }
    Ok(())
}

/// Print what would be moved and corrected.
pub fn handle_plan(args: &SelectionArgs, config: &Config, output_format: &str) -> Result<()> {
    let (_, plan) = build_plan(args, config)?;
    print_plan(&plan, output_format)?;
    ensure_not_blocked(&plan)
}

/// Write a copy of the state with the post-move Azure IDs.
pub fn handle_correct(
    args: &SelectionArgs,
    out: &Path,
    config: &Config,
    output_format: &str,
) -> Result<()> {
    let (state, plan) = build_plan(args, config)?;
    print_plan(&plan, output_format)?;
    ensure_not_blocked(&plan)?;

    let corrected = apply_corrections(&state, &plan.to_correct);
    corrected
        .state
        .save(out)
        .with_context(|| format!("Failed to write corrected state: {}", out.display()))?;

    if output_format != "json" {
        println!(
            "Corrected {} IDs, written to {}",
            corrected.corrected.len(),
            out.display()
        );
    }
    Ok(())
}
