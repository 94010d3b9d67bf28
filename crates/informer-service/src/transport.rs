//! Line-oriented stdio transport
//!
//! Reads one JSON-RPC request per line and writes one response per line.

use crate::{Result, Service};
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// STDIO transport for the calculation service
pub struct StdioTransport {
    service: Service,
}

impl StdioTransport {
    /// Create new STDIO transport
    pub fn new(service: Service) -> Self {
        Self { service }
    }

    /// Serve stdin/stdout until EOF
    pub fn run_stdio(&self) -> Result<usize> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.run(stdin.lock(), stdout.lock())
    }

    /// Serve requests from `reader` until EOF, returning how many were handled
    pub fn run<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> Result<usize> {
        let mut handled = 0;

        for line in reader.lines() {
            let request = line?;

            // Skip empty lines
            if request.trim().is_empty() {
                continue;
            }

            let response = self.service.handle_request(&request)?;
            writeln!(writer, "{}", response)?;
            writer.flush()?;

            handled += 1;
            debug!(handled, "response written");
        }

        info!(handled, "input closed");
        Ok(handled)
    }
}
