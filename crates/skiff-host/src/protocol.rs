//! Deep-link protocol command parsing and routing.
//!
//! External triggers arrive as `skiff://<route>/<action>?<params>` URLs
//! handed over by the OS. Parsing splits them into an addressed command;
//! the router decides which controller handles it.

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::install::McpInstallCtl;

/// URL scheme this application registers with the OS.
pub const PROTOCOL_SCHEME: &str = "skiff";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("not a valid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("protocol URL is missing a route")]
    MissingRoute,
    #[error("protocol URL is missing an action")]
    MissingAction,
}

/// An addressed command parsed from a protocol URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolCommand {
    pub route: String,
    pub action: String,
    pub params: HashMap<String, String>,
}

impl ProtocolCommand {
    /// Parse a deep link into an addressed command.
    ///
    /// `skiff://plugin/install?id=..&schema=..` yields route `plugin`, action
    /// `install`, and the percent-decoded query params (later duplicate keys
    /// win).
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let url = Url::parse(raw)?;

        if url.scheme() != PROTOCOL_SCHEME {
            return Err(ProtocolError::UnsupportedScheme(url.scheme().to_string()));
        }

        let route = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or(ProtocolError::MissingRoute)?
            .to_string();

        let action = url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|segment| !segment.is_empty())
            .ok_or(ProtocolError::MissingAction)?
            .to_string();

        let params = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        Ok(Self {
            route,
            action,
            params,
        })
    }
}

/// Routes parsed protocol commands to their controllers.
///
/// One route/action pair per flow, matched explicitly; unknown commands are
/// refused rather than guessed at.
pub struct ProtocolRouter {
    install: McpInstallCtl,
}

impl ProtocolRouter {
    pub fn new(install: McpInstallCtl) -> Self {
        Self { install }
    }

    /// Handle one command. Returns whether its controller accepted it.
    pub fn dispatch(&self, command: &ProtocolCommand) -> bool {
        match (command.route.as_str(), command.action.as_str()) {
            ("plugin", McpInstallCtl::ACTION) => self.install.handle_command(command),
            _ => {
                warn!(route = %command.route, action = %command.action, "unhandled protocol command");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_route_action_and_decoded_params() {
        let command =
            ProtocolCommand::parse("skiff://plugin/install?id=abc&marketId=lobehub&schema=%7B%7D")
                .unwrap();

        assert_eq!(command.route, "plugin");
        assert_eq!(command.action, "install");
        assert_eq!(command.params.get("id").unwrap(), "abc");
        assert_eq!(command.params.get("marketId").unwrap(), "lobehub");
        assert_eq!(command.params.get("schema").unwrap(), "{}");
    }

    #[test]
    fn later_duplicate_params_win() {
        let command = ProtocolCommand::parse("skiff://plugin/install?id=a&id=b").unwrap();
        assert_eq!(command.params.get("id").unwrap(), "b");
    }

    #[test]
    fn rejects_foreign_schemes() {
        let err = ProtocolCommand::parse("https://plugin/install?id=abc").unwrap_err();
        assert_eq!(err, ProtocolError::UnsupportedScheme("https".into()));
    }

    #[test]
    fn rejects_garbage_and_incomplete_urls() {
        assert!(matches!(
            ProtocolCommand::parse("not a url"),
            Err(ProtocolError::InvalidUrl(_))
        ));
        assert_eq!(
            ProtocolCommand::parse("skiff://plugin").unwrap_err(),
            ProtocolError::MissingAction
        );
    }
}
