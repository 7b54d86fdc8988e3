//! Command-line interface of the data-fetching agent.
//!
//! The agent itself talks to the router and is not part of this crate. This
//! module builds its argument vector from configured parameters, the way the
//! monitoring host invokes it, and parses that same vector back.

use clap::Args;
use clap::ValueEnum;
use strum::Display;
use strum::EnumString;

pub const DEFAULT_USERNAME: &str = "smarthome";
pub const DEFAULT_PORT: u16 = 80;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumString, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

/// Router access parameters for the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentParams {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub protocol: Protocol,
    pub ignore_ssl: bool,
}

impl AgentParams {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: password.into(),
            port: DEFAULT_PORT,
            protocol: Protocol::default(),
            ignore_ssl: false,
        }
    }
}

/// Argument vector for invoking the agent against `host`.
pub fn command_arguments(params: &AgentParams, host: &str) -> Vec<String> {
    let mut args = vec![
        "--host".to_string(),
        host.to_string(),
        "--username".to_string(),
        params.username.clone(),
        "--password".to_string(),
        params.password.clone(),
        "--port".to_string(),
        params.port.to_string(),
        "--protocol".to_string(),
        params.protocol.to_string(),
    ];

    if params.ignore_ssl {
        args.push("--ignore-ssl".to_string());
    }

    args
}

/// Flags accepted by the agent.
#[derive(Debug, Clone, PartialEq, Args)]
pub struct AgentArgs {
    /// Router address
    #[arg(long)]
    pub host: String,

    #[arg(long, default_value = DEFAULT_USERNAME)]
    pub username: String,

    #[arg(long)]
    pub password: String,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, value_enum, default_value_t = Protocol::Http)]
    pub protocol: Protocol,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub ignore_ssl: bool,
}

impl AgentArgs {
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    pub fn params(&self) -> AgentParams {
        AgentParams {
            username: self.username.clone(),
            password: self.password.clone(),
            port: self.port,
            protocol: self.protocol,
            ignore_ssl: self.ignore_ssl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Agent {
        #[command(flatten)]
        args: AgentArgs,
    }

    fn parse(args: &[&str]) -> Result<AgentArgs, clap::Error> {
        Agent::try_parse_from(std::iter::once("agent").chain(args.iter().copied()))
            .map(|agent| agent.args)
    }

    #[test]
    fn test_command_arguments_defaults() {
        let params = AgentParams::new("secret");
        assert_eq!(
            command_arguments(&params, "192.168.178.1"),
            vec![
                "--host",
                "192.168.178.1",
                "--username",
                "smarthome",
                "--password",
                "secret",
                "--port",
                "80",
                "--protocol",
                "http",
            ]
        );
    }

    #[test]
    fn test_command_arguments_ignore_ssl() {
        let params = AgentParams {
            port: 443,
            protocol: Protocol::Https,
            ignore_ssl: true,
            ..AgentParams::new("secret")
        };
        let args = command_arguments(&params, "fritz.box");
        assert_eq!(args.last().map(String::as_str), Some("--ignore-ssl"));
        assert!(args.windows(2).any(|w| w == ["--protocol", "https"]));
    }

    #[test]
    fn test_parse_agent_flags() {
        let args = parse(&["--host", "fritz.box", "--password", "pw"]).unwrap();
        assert_eq!(args.username, "smarthome");
        assert_eq!(args.port, 80);
        assert_eq!(args.protocol, Protocol::Http);
        assert!(!args.ignore_ssl);
        assert_eq!(args.base_url(), "http://fritz.box:80");
    }

    #[test]
    fn test_parse_generated_arguments() {
        let params = AgentParams {
            username: "monitor".to_string(),
            port: 49443,
            protocol: Protocol::Https,
            ignore_ssl: true,
            ..AgentParams::new("pw")
        };
        let generated = command_arguments(&params, "10.0.0.1");
        let refs: Vec<&str> = generated.iter().map(String::as_str).collect();

        let args = parse(&refs).unwrap();
        assert_eq!(args.params(), params);
        assert_eq!(args.base_url(), "https://10.0.0.1:49443");
    }

    #[test]
    fn test_parse_rejects_unknown_protocol_and_positionals() {
        assert!(parse(&["--host", "h", "--password", "p", "--protocol", "ftp"]).is_err());
        assert!(parse(&["--host", "h", "--password", "p", "extra"]).is_err());
        assert!(parse(&["--password", "p"]).is_err());
    }
}
