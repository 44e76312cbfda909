pub mod context;
pub mod generate;
pub mod projection;
pub mod scenarios;
pub mod schema;
pub mod service;

use crate::input::ClientInput;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read client data (JSON) from a file, or stdin with "-"
pub fn read_client(path: &Path) -> anyhow::Result<ClientInput> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        read_from_file(path)
    }
}

fn read_from_file(path: &Path) -> anyhow::Result<ClientInput> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let input = serde_json::from_reader(reader)?;
    Ok(input)
}

fn read_from_stdin() -> anyhow::Result<ClientInput> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    let input = serde_json::from_slice(&buffer)?;
    Ok(input)
}
