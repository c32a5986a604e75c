//! Shared networking defaults used by client and server.

/// Default HTTP port the demo server listens on.
pub const HTTP_PORT: u16 = 8001;
/// Default bind / connect host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Helper to format a host and port like "host:port".
pub fn addr(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_host_and_port() {
        assert_eq!(addr(DEFAULT_HOST, HTTP_PORT), "127.0.0.1:8001");
    }
}
