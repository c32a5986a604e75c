use clap::Parser;
use patch_common::net::{self, DEFAULT_HOST, HTTP_PORT};

/// Command-line arguments of the terminal client.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Server address as `host:port`.
    #[clap(long, default_value_t = net::addr(DEFAULT_HOST, HTTP_PORT))]
    pub server: String,

    /// Streaming route to subscribe to.
    #[clap(long, default_value = "/stream-ticker")]
    pub route: String,

    /// Stop after this many events.
    #[clap(long)]
    pub max_events: Option<usize>,
}

impl Args {
    /// Full URL of the stream.
    pub fn url(&self) -> String {
        let server = self.server.trim().trim_end_matches('/');
        let route = self.route.trim();
        let slash = if route.starts_with('/') { "" } else { "/" };
        if server.starts_with("http://") || server.starts_with("https://") {
            format!("{}{}{}", server, slash, route)
        } else {
            format!("http://{}{}{}", server, slash, route)
        }
    }
}
