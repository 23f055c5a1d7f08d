use url::Url;

use crate::LinkError;

/// Fixed path of the scan service socket.
pub const DEFAULT_SERVICE_PATH: &str = "/ws";

/// Builds the socket URL from the origin the form was served from.
///
/// Accepts a bare `host[:port]`, or an origin with an `http`, `https`, `ws`
/// or `wss` scheme. Secure origins map to `wss`.
pub fn service_endpoint(origin: &str, path: &str) -> Result<Url, LinkError> {
    let origin = origin.trim().trim_end_matches('/');
    let (scheme, host) = match origin.split_once("://") {
        Some((scheme, host)) => {
            let scheme = match scheme.to_ascii_lowercase().as_str() {
                "http" | "ws" => "ws",
                "https" | "wss" => "wss",
                other => {
                    return Err(LinkError::InvalidEndpoint(format!(
                        "unsupported scheme '{other}'"
                    )))
                }
            };
            (scheme, host)
        }
        None => ("ws", origin),
    };
    if host.is_empty() {
        return Err(LinkError::InvalidEndpoint("missing host".to_string()));
    }

    let path = path.trim();
    let separator = if path.starts_with('/') { "" } else { "/" };
    Url::parse(&format!("{scheme}://{host}{separator}{path}"))
        .map_err(|err| LinkError::InvalidEndpoint(err.to_string()))
}
