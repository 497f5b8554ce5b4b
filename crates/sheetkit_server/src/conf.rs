//! Process configuration and named constants.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Generated files older than this are reclaimed by the sweeper.
pub const RETENTION_AGE_MAX: Duration = Duration::from_secs(60 * 60);
/// Sweeps run once per hour at this minute.
pub const RETENTION_SWEEP_MINUTE: u32 = 0;

/// Workbook generation endpoint.
pub const ROUTE_GENERATE: &str = "/excel-generator/generate";
/// Prefix under which generated files are served.
pub const ROUTE_DOWNLOADS: &str = "/excel-generator/downloads";
/// Page reader endpoint.
pub const ROUTE_GET_CONTENT: &str = "/web-page-reader/get-content";
/// Liveness check.
pub const ROUTE_HEALTH: &str = "/health";
/// Static OpenAPI document.
pub const ROUTE_OPENAPI: &str = "/api-docs/openapi.json";

#[derive(Debug, Clone, Parser)]
#[command(name = "sheetkit-server", version, about = "Spreadsheet generator and page reader service")]
pub struct ServerArgs {
    /// Interface to bind.
    #[arg(long, env = "SHEETKIT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory receiving generated workbooks; created when absent.
    #[arg(long, env = "SHEETKIT_OUTPUT_DIR", default_value = "public/excel")]
    pub output_dir: PathBuf,

    /// Absolute base of download links [default: http://localhost:<port>].
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Do not start the hourly retention sweep.
    #[arg(long)]
    pub disable_sweeper: bool,
}

impl ServerArgs {
    pub fn derive_base_url(&self) -> String {
        match &self.base_url {
            Some(c_url) if !c_url.trim().is_empty() => c_url.trim().trim_end_matches('/').to_string(),
            _ => format!("http://localhost:{}", self.port),
        }
    }

    pub fn derive_bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_defaults_to_localhost_port() {
        let args = ServerArgs::parse_from(["sheetkit-server", "--port", "8080"]);
        assert_eq!(args.derive_base_url(), "http://localhost:8080");
    }

    #[test]
    fn base_url_override_drops_trailing_slash() {
        let args =
            ServerArgs::parse_from(["sheetkit-server", "--base-url", "https://files.example.com/"]);
        assert_eq!(args.derive_base_url(), "https://files.example.com");
    }

    #[test]
    fn bind_addr_combines_host_and_port() {
        let args = ServerArgs::parse_from(["sheetkit-server", "--host", "127.0.0.1", "--port", "4000"]);
        assert_eq!(args.derive_bind_addr().expect("addr").to_string(), "127.0.0.1:4000");
    }
}
