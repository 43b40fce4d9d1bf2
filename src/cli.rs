//! Command-line interface.
//!
//! Commands:
//! - `restgen serve --config <path>`: register the configured resources
//!   and serve them over HTTP
//! - `restgen check --config <path>`: validate the configuration and
//!   print the registered resources

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::errors::{Error, RestResult};
use crate::filters::FilterChains;
use crate::http::RestServer;
use crate::params::ParamRegistry;
use crate::resource::{MemoryStore, ResourceSchema, ResourceService, SchemaRegistry};

/// restgen - a generic REST resource service
#[derive(Parser, Debug)]
#[command(name = "restgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./restgen.json")]
        config: PathBuf,
    },

    /// Validate the configuration and exit
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./restgen.json")]
        config: PathBuf,
    },
}

/// Parse arguments and dispatch
pub fn run() -> RestResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { config } => serve(&Config::from_file(&config)?),
        Command::Check { config } => check(&Config::from_file(&config)?),
    }
}

/// Build a multi-resource service from configuration.
///
/// Registration problems (bad field names, bad shapes) are fatal here,
/// before any traffic is served.
pub fn build_service(config: &Config) -> RestResult<ResourceService> {
    let mut registry = ParamRegistry::new();
    let mut schemas = SchemaRegistry::new();

    for resource in &config.resources {
        let schema = ResourceSchema::new(resource.name.clone(), resource.columns.clone());
        match &resource.permit {
            Some(fields) => registry.register_fields(&resource.name, fields)?,
            None => registry.register_from_schema(&schema)?,
        }
        schemas.register(schema);
    }

    let default_resource = config
        .resources
        .first()
        .map(|r| r.name.clone())
        .unwrap_or_else(|| "resource".to_string());

    Ok(ResourceService::new(
        "api",
        default_resource,
        Arc::new(registry),
        Arc::new(FilterChains::new()),
        Arc::new(schemas),
        Arc::new(MemoryStore::new()),
        config.policy.clone(),
    ))
}

fn serve(config: &Config) -> RestResult<()> {
    let service = build_service(config)?;
    let server = RestServer::with_config(service, config.server.clone());

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Internal(format!("cannot start runtime: {e}")))?;
    runtime
        .block_on(server.start())
        .map_err(|e| Error::Internal(format!("server error: {e}")))
}

fn check(config: &Config) -> RestResult<()> {
    let service = build_service(config)?;
    println!("configuration ok; serving resource {}", service.resource());
    for resource in &config.resources {
        let fields = match &resource.permit {
            Some(fields) => fields.join(", "),
            None => resource
                .columns
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        };
        println!("  {}: {}", resource.name, fields);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{ColumnDef, ColumnType};

    fn sample_config() -> Config {
        let mut config = Config::default();
        config.resources.push(crate::config::ResourceConfig {
            name: "customers".to_string(),
            columns: vec![
                ColumnDef::new("name", ColumnType::String).required(),
                ColumnDef::new("stuff", ColumnType::String),
            ],
            permit: None,
        });
        config
    }

    #[test]
    fn test_build_service_registers_resources() {
        let service = build_service(&sample_config()).unwrap();
        assert_eq!(service.resource(), "customer");
    }

    #[test]
    fn test_build_service_rejects_bad_field_names() {
        let mut config = sample_config();
        config.resources[0].permit = Some(vec!["not a field".to_string()]);

        let err = build_service(&config).unwrap_err();
        assert!(matches!(err, Error::InvalidRegistration(_)));
    }
}
