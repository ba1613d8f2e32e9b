//! Domain document validation

use super::load_document;
use crate::config::FarmConfig;
use crate::error::CliResult;
use crate::output::{self, print_success, OutputFormat};
use farm_types::{DomainDocument, DomainSpec};
use serde::Serialize;
use tabled::Tabled;

/// Table row for spec display
#[derive(Debug, Serialize, Tabled)]
struct FieldRow {
    field: &'static str,
    value: String,
}

fn rows(spec: &DomainSpec) -> Vec<FieldRow> {
    let secret = match &spec.admin_secret().namespace {
        Some(ns) => format!("{}/{}", ns, spec.admin_secret().name),
        None => spec.admin_secret().name.clone(),
    };

    vec![
        FieldRow { field: "domainUID", value: spec.domain_uid().to_string() },
        FieldRow { field: "domainName", value: spec.domain_name().to_string() },
        FieldRow { field: "image", value: spec.image().to_string() },
        FieldRow { field: "imagePullPolicy", value: spec.image_pull_policy().to_string() },
        FieldRow { field: "adminSecret", value: secret },
        FieldRow { field: "asName", value: spec.admin_server_name().to_string() },
        FieldRow { field: "asPort", value: spec.admin_server_port().to_string() },
        FieldRow { field: "exportT3Channels", value: spec.exported_channels().join(",") },
        FieldRow { field: "startupControl", value: spec.startup_control().to_string() },
    ]
}

/// Validate a domain document and print the resolved spec
pub fn execute(domain: &str, config: &FarmConfig, format: OutputFormat) -> CliResult<()> {
    let document: DomainDocument = load_document(domain)?;
    let spec = document.into_spec(config.spec_defaults())?;

    match format {
        OutputFormat::Table => {
            output::print_output(rows(&spec), format)?;
            print_success(&format!("Domain {} is valid", spec.domain_uid()));
        }
        OutputFormat::Json | OutputFormat::Yaml => output::print_single(&spec, format)?,
    }
    Ok(())
}
