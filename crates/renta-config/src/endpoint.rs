//! Answer server endpoint selection.
//!
//! The endpoint is picked from a small static table keyed by host name:
//! the first route whose `host_prefix` the selecting host starts with wins,
//! and anything else (including no host at all) falls back to the local
//! development server. An explicit `url` bypasses the table.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_url() -> String {
    "ws://localhost:8000/chat".to_string()
}

fn default_routes() -> Vec<EndpointRoute> {
    vec![
        EndpointRoute {
            host_prefix: "rentagpt.com".into(),
            url: "ws://rentagpt.com/chat".into(),
        },
        EndpointRoute {
            host_prefix: "rentagpt.fly.dev".into(),
            url: "ws://rentagpt.fly.dev/chat".into(),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndpointRoute {
    pub host_prefix: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Explicit endpoint URL. Overrides host-based selection when set.
    #[serde(default)]
    pub url: String,

    /// Host name used to pick a route (the deployment the client belongs to).
    #[serde(default)]
    pub host: String,

    /// Endpoint used when no route matches.
    #[serde(default = "default_url")]
    pub default_url: String,

    /// Host prefix to endpoint table, checked in order.
    #[serde(default = "default_routes")]
    pub routes: Vec<EndpointRoute>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            host: String::new(),
            default_url: default_url(),
            routes: default_routes(),
        }
    }
}

/// The endpoint chosen for a session and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub url: String,
    /// Host used for selection, if any.
    pub host: Option<String>,
    /// Prefix of the route that matched, if any.
    pub matched_route: Option<String>,
}

impl EndpointConfig {
    /// Pick the endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the chosen URL is not a
    /// `ws://` or `wss://` URL.
    pub fn resolve(&self) -> Result<ResolvedEndpoint, ConfigError> {
        let host = Some(self.host.trim())
            .filter(|h| !h.is_empty())
            .map(str::to_string);

        let resolved = if self.url.is_empty() {
            let route = host.as_deref().and_then(|h| {
                self.routes
                    .iter()
                    .find(|route| h.starts_with(route.host_prefix.as_str()))
            });
            match route {
                Some(route) => ResolvedEndpoint {
                    url: route.url.clone(),
                    host,
                    matched_route: Some(route.host_prefix.clone()),
                },
                None => ResolvedEndpoint {
                    url: self.default_url.clone(),
                    host,
                    matched_route: None,
                },
            }
        } else {
            ResolvedEndpoint {
                url: self.url.clone(),
                host,
                matched_route: None,
            }
        };

        validate_ws_url(&resolved.url)?;
        Ok(resolved)
    }
}

fn validate_ws_url(url: &str) -> Result<(), ConfigError> {
    let rest = url
        .strip_prefix("ws://")
        .or_else(|| url.strip_prefix("wss://"))
        .ok_or_else(|| ConfigError::InvalidValue {
            field: "endpoint.url".into(),
            reason: format!("'{url}' must start with ws:// or wss://"),
        })?;

    if rest.split('/').next().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidValue {
            field: "endpoint.url".into(),
            reason: format!("'{url}' has no host"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn with_host(host: &str) -> EndpointConfig {
        EndpointConfig {
            host: host.into(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("", "ws://localhost:8000/chat", None)]
    #[case("localhost", "ws://localhost:8000/chat", None)]
    #[case("rentagpt.com", "ws://rentagpt.com/chat", Some("rentagpt.com"))]
    #[case("rentagpt.fly.dev", "ws://rentagpt.fly.dev/chat", Some("rentagpt.fly.dev"))]
    #[case("rentagpt.community", "ws://localhost:8000/chat", None)]
    #[case("www.rentagpt.com", "ws://localhost:8000/chat", None)]
    fn host_selects_route(
        #[case] host: &str,
        #[case] url: &str,
        #[case] matched: Option<&str>,
    ) {
        let resolved = with_host(host).resolve().expect("resolves");
        assert_eq!(resolved.url, url);
        assert_eq!(resolved.matched_route.as_deref(), matched);
    }

    #[test]
    fn explicit_url_wins_over_routes() {
        let config = EndpointConfig {
            url: "wss://staging.example.net/chat".into(),
            host: "rentagpt.com".into(),
            ..Default::default()
        };
        let resolved = config.resolve().expect("resolves");
        assert_eq!(resolved.url, "wss://staging.example.net/chat");
        assert_eq!(resolved.matched_route, None);
        assert_eq!(resolved.host.as_deref(), Some("rentagpt.com"));
    }

    #[rstest]
    #[case("http://localhost:8000/chat")]
    #[case("localhost:8000")]
    #[case("ws:///chat")]
    fn rejects_non_websocket_urls(#[case] url: &str) {
        let config = EndpointConfig {
            url: url.into(),
            ..Default::default()
        };
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
