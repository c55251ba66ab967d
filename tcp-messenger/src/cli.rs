use clap::Parser;

use crate::connector::{DEFAULT_ADDRESS, Role};

/// Chat with one peer over a single TCP connection.
///
/// Lines typed on standard input are sent to the peer; whatever the peer
/// sends is printed to standard output.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Wait for a peer to connect instead of dialing out.
    #[arg(short = 'l', long = "listen")]
    pub listen: bool,

    /// Port to listen on or connect to.
    #[arg(value_name = "PORT", value_parser = parse_port)]
    pub port: u16,

    /// Host to connect to (initiator only). Defaults to localhost.
    #[arg(value_name = "ADDRESS")]
    pub address: Option<String>,
}

impl Cli {
    pub fn role(&self) -> Role {
        if self.listen {
            Role::Listener { port: self.port }
        } else {
            Role::Initiator {
                address: self
                    .address
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
                port: self.port,
            }
        }
    }
}

fn parse_port(raw: &str) -> Result<u16, String> {
    let port: i64 = raw
        .trim()
        .parse()
        .map_err(|_| "Port number must be an integer.".to_string())?;
    match u16::try_from(port) {
        Ok(port) if port != 0 => Ok(port),
        _ => Err("Port number must be between 1 and 65535.".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("tcp-messenger").chain(args.iter().copied()))
    }

    #[test]
    fn listen_flag_selects_listener_role() {
        let cli = parse(&["-l", "5000"]).expect("valid arguments");
        assert_eq!(cli.role(), Role::Listener { port: 5000 });
    }

    #[test]
    fn initiator_defaults_to_localhost() {
        let cli = parse(&["5000"]).expect("valid arguments");
        assert_eq!(
            cli.role(),
            Role::Initiator {
                address: "localhost".into(),
                port: 5000
            }
        );
    }

    #[test]
    fn initiator_uses_given_address() {
        let cli = parse(&["5000", "192.0.2.10"]).expect("valid arguments");
        assert_eq!(
            cli.role(),
            Role::Initiator {
                address: "192.0.2.10".into(),
                port: 5000
            }
        );
    }

    #[test]
    fn non_integer_port_is_a_usage_error() {
        let err = parse(&["abc"]).expect_err("port must be rejected");
        assert_eq!(err.exit_code(), 2);
        assert!(
            err.to_string().contains("Port number must be an integer."),
            "unexpected message: {err}"
        );
    }

    #[test]
    fn out_of_range_ports_are_rejected() {
        for raw in ["0", "65536", "-1"] {
            let err = parse(&["--", raw]).expect_err("port must be rejected");
            assert!(
                err.to_string().contains("between 1 and 65535"),
                "unexpected message for {raw}: {err}"
            );
        }
    }

    #[test]
    fn missing_port_and_extra_arguments_are_usage_errors() {
        assert_eq!(parse(&[]).expect_err("missing port").exit_code(), 2);
        assert_eq!(
            parse(&["5000", "localhost", "extra"])
                .expect_err("too many arguments")
                .exit_code(),
            2
        );
    }
}
