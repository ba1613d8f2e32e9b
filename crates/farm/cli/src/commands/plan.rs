//! Startup plan evaluation

use super::load_document;
use crate::config::FarmConfig;
use crate::error::CliResult;
use crate::output::{self, print_success, print_warning, OutputFormat};
use farm_startup::{PlanDelta, StartupDecisionCard, StartupPolicyEvaluator};
use farm_types::{
    DomainDocument, DomainTopology, ServerName, StartupControl, StartupDocument, StartupRequest,
    TopologyDocument,
};
use serde::Serialize;
use tabled::Tabled;

/// Inputs for the plan command
#[derive(Debug, Clone)]
pub struct PlanInputs {
    pub domain: String,
    pub topology: String,
    pub startup: Option<String>,
    pub running: Vec<String>,
}

/// Table row for a planned server
#[derive(Debug, Serialize, Tabled)]
struct ServerRow {
    server: String,
    reason: String,
}

/// Table row for a convergence action
#[derive(Debug, Serialize, Tabled)]
struct ActionRow {
    server: String,
    action: &'static str,
}

/// Full report for structured output
#[derive(Debug, Serialize)]
struct PlanReport {
    decision: StartupDecisionCard,
    #[serde(skip_serializing_if = "Option::is_none")]
    delta: Option<PlanDelta>,
}

/// Evaluate the startup policy and print the plan
pub fn execute(inputs: PlanInputs, config: &FarmConfig, format: OutputFormat) -> CliResult<()> {
    let spec = load_document::<DomainDocument>(&inputs.domain)?.into_spec(config.spec_defaults())?;
    let topology = DomainTopology::try_from(load_document::<TopologyDocument>(&inputs.topology)?)?;
    let request = match &inputs.startup {
        Some(file) => StartupRequest::try_from(load_document::<StartupDocument>(file)?)?,
        None => StartupRequest::default(),
    };

    let card = StartupPolicyEvaluator::new()
        .with_emit_audit_events(config.audit_decisions())
        .evaluate_with_card(&spec, &topology, &request)?;

    let delta = if inputs.running.is_empty() {
        None
    } else {
        let running: Vec<ServerName> = inputs.running.iter().map(|s| ServerName::new(s.as_str())).collect();
        Some(card.plan.delta(&running))
    };

    match format {
        OutputFormat::Table => print_tables(&card, delta.as_ref()),
        OutputFormat::Json | OutputFormat::Yaml => {
            output::print_single(&PlanReport { decision: card, delta }, format)
        }
    }
}

fn print_tables(card: &StartupDecisionCard, delta: Option<&PlanDelta>) -> CliResult<()> {
    if card.policy == StartupControl::None {
        print_warning(&format!(
            "Startup control is NONE: no server of {} will run",
            card.domain_uid
        ));
    }

    let rows: Vec<ServerRow> = card
        .plan
        .selections()
        .map(|(server, reason)| ServerRow {
            server: server.to_string(),
            reason: reason.to_string(),
        })
        .collect();
    output::print_output(rows, OutputFormat::Table)?;

    if let Some(delta) = delta {
        if delta.is_converged() {
            print_success("Running servers already match the plan");
        } else {
            let actions: Vec<ActionRow> = delta
                .to_start
                .iter()
                .map(|s| ActionRow { server: s.to_string(), action: "start" })
                .chain(
                    delta
                        .to_stop
                        .iter()
                        .map(|s| ActionRow { server: s.to_string(), action: "stop" }),
                )
                .collect();
            output::print_output(actions, OutputFormat::Table)?;
        }
    }

    print_success(&format!(
        "{} server(s) planned for {} under {}",
        card.plan.len(),
        card.domain_uid,
        card.policy
    ));
    Ok(())
}
