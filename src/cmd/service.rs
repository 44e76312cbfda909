//! Service command - subordinate-process protocol over stdin/stdout
//!
//! A host process spawns the binary, writes one JSON request to stdin and
//! reads exactly one JSON line from stdout. Failures still produce a
//! parseable result; the exit status mirrors the success flag so hosts
//! can check either.

use crate::input::ClientInput;
use crate::render::svg::SvgCharts;
use crate::render::text::TextTemplate;
use crate::render::{Generated, Generator};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ServiceCommand {}

/// One request, read from stdin as a single JSON document.
#[derive(Debug, Deserialize)]
struct ServiceRequest {
    template_path: PathBuf,
    output_path: PathBuf,
    #[serde(default, alias = "client")]
    dados_cliente: ClientInput,
}

/// The single JSON line written to stdout.
#[derive(Debug, Serialize)]
struct ServiceOutcome {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<String>,
}

impl ServiceOutcome {
    fn ok(generated: Generated) -> Self {
        ServiceOutcome {
            success: true,
            generated_path: Some(generated.path),
            file_size: Some(generated.file_size),
            error: None,
            trace: None,
        }
    }

    fn failed(error: String, trace: Option<String>) -> Self {
        ServiceOutcome {
            success: false,
            generated_path: None,
            file_size: None,
            error: Some(error),
            trace,
        }
    }
}

impl ServiceCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let outcome = run();
        let failed = !outcome.success;

        // Stdout may be a pipe; flush before exiting or the host reads nothing
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{}", serde_json::to_string(&outcome)?)?;
        stdout.flush()?;

        if failed {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn run() -> ServiceOutcome {
    let mut buffer = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut buffer) {
        return ServiceOutcome::failed(format!("cannot read request: {}", err), None);
    }
    if buffer.trim().is_empty() {
        return ServiceOutcome::failed("no request received on stdin".to_string(), None);
    }

    let request: ServiceRequest = match serde_json::from_str(&buffer) {
        Ok(request) => request,
        Err(err) => {
            return ServiceOutcome::failed(format!("invalid request: {}", err), None);
        }
    };

    log::info!(
        "service request: template {} -> output {}",
        request.template_path.display(),
        request.output_path.display()
    );

    let generator =
        match Generator::new(&request.template_path, Box::new(TextTemplate), Box::new(SvgCharts)) {
            Ok(generator) => generator,
            Err(err) => return ServiceOutcome::failed(err.to_string(), Some(error_chain(&err))),
        };

    match generator.generate(&request.dados_cliente, &request.output_path) {
        Ok(generated) => ServiceOutcome::ok(generated),
        Err(err) => ServiceOutcome::failed(err.to_string(), Some(error_chain(&err))),
    }
}

/// Full source chain, outermost first, for the trace field.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut chain = vec![err.to_string()];
    let mut current = err.source();
    while let Some(source) = current {
        chain.push(source.to_string());
        current = source.source();
    }
    chain.join(": caused by: ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_requires_template_and_output_paths() {
        let err = serde_json::from_str::<ServiceRequest>(r#"{"dados_cliente": {}}"#)
            .err()
            .unwrap();
        assert!(err.to_string().contains("template_path"));

        let err = serde_json::from_str::<ServiceRequest>(r#"{"template_path": "t.txt"}"#)
            .err()
            .unwrap();
        assert!(err.to_string().contains("output_path"));
    }

    #[test]
    fn client_data_defaults_to_empty_and_accepts_alias() {
        let request: ServiceRequest = serde_json::from_str(
            r#"{"template_path": "t.txt", "output_path": "o.txt"}"#,
        )
        .unwrap();
        assert!(request.dados_cliente.nome.is_none());

        let request: ServiceRequest = serde_json::from_str(
            r#"{"template_path": "t.txt", "output_path": "o.txt", "client": {"nome": "Ana"}}"#,
        )
        .unwrap();
        assert_eq!(request.dados_cliente.nome.as_deref(), Some("Ana"));
    }

    #[test]
    fn failure_outcome_serializes_the_protocol_shape() {
        let outcome = ServiceOutcome::failed("boom".to_string(), Some("boom: caused by: io".to_string()));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert!(json.get("generated_path").is_none());
    }
}
