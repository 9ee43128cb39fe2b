//! # Capability Config
//!
//! A service node advertises what it offers as one delimited string:
//! `"<protocol>,<tag>,<tag>..."` (commas and spaces both separate tokens).
//! The leading token is the protocol version; the rest are free-form tags
//! such as supported asset symbols.

use crate::domain::errors::ConfigError;

/// Parsed capability config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceConfig {
    /// Protocol version (0 when the leading token did not parse).
    pub protocol: u32,
    /// Capability tags.
    pub services: Vec<String>,
}

impl ServiceConfig {
    /// Strict parse: the leading token must be a positive protocol version.
    ///
    /// The leading token is taken before empty tokens are dropped, so a
    /// config that starts with a delimiter has no protocol version.
    pub fn parse(config: &str) -> Result<Self, ConfigError> {
        if config.is_empty() {
            return Err(ConfigError::Empty);
        }
        let mut raw = config.split(DELIMITERS);
        let protocol = parse_protocol_version(raw.next().unwrap_or_default())?;
        if protocol == 0 {
            return Err(ConfigError::NonPositiveProtocolVersion);
        }
        Ok(Self {
            protocol,
            services: non_empty(raw),
        })
    }

    /// Tolerant parse used when assigning a config to a record.
    ///
    /// If the leading token is not a protocol version, `protocol` is 0 and
    /// every token is kept as a tag.
    pub fn parse_lenient(config: &str) -> Self {
        let mut services = tokenize(config);
        let protocol = match services.first().map(|t| parse_protocol_version(t)) {
            Some(Ok(v)) => {
                services.remove(0);
                v
            }
            _ => 0,
        };
        Self { protocol, services }
    }
}

/// Parse a protocol version token as an unsigned decimal integer.
pub fn parse_protocol_version(token: &str) -> Result<u32, ConfigError> {
    token
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidProtocolVersion(token.to_string()))
}

const DELIMITERS: [char; 2] = [',', ' '];

/// Split on commas and spaces, dropping empty tokens.
fn tokenize(config: &str) -> Vec<String> {
    non_empty(config.split(DELIMITERS))
}

fn non_empty<'a>(tokens: impl Iterator<Item = &'a str>) -> Vec<String> {
    tokens
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
