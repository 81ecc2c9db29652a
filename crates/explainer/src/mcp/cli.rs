#[derive(Debug, clap::Parser)]
#[command(name = "mcp")]
#[command(about = "Model Context Protocol server exposing the explainer as tools")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Serve JSON-RPC messages on stdin/stdout, one per line
    #[clap(name = "stdio")]
    Stdio,

    /// Serve over HTTP: `GET /sse` opens a session stream, `POST /message` takes requests
    #[clap(name = "sse")]
    Sse(HttpOptions),
}

#[derive(Debug, clap::Args)]
pub struct HttpOptions {
    /// Port to listen on
    #[arg(short, long, env = "EXPLAINER_MCP_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind; keep it on loopback unless the model endpoint is meant to be shared
    #[arg(long, env = "EXPLAINER_MCP_HOST", default_value = "127.0.0.1")]
    pub host: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_http_options_defaults() {
        let app = App::try_parse_from(["mcp", "sse"]).unwrap();

        match app.command {
            Commands::Sse(options) => {
                assert_eq!(options.port, 3000);
                assert_eq!(options.host, "127.0.0.1");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
