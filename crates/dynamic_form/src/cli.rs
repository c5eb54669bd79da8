use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "dynamic_form",
    version,
    about = "Pick a form type, fill in its fields, validate and submit"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Run the interactive TUI (default)
    Run {
        /// Form type selected on start, e.g. `userInfo`
        #[arg(long)]
        form_type: Option<String>,
    },
    /// List form types and their fields
    List {
        #[arg(long)]
        json: bool,
    },
    /// Fill in and submit a form without the TUI
    Submit {
        #[arg(long)]
        form_type: String,
        /// Field value, repeatable
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn command(&self) -> Cmd {
        self.cmd.clone().unwrap_or(Cmd::Run { form_type: None })
    }
}

impl Cmd {
    pub fn is_interactive(&self) -> bool {
        matches!(self, Cmd::Run { .. })
    }
}

/// Parse `NAME=VALUE`; the value may be empty and may contain `=`.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in `{s}`"));
    }
    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_is_well_formed() {
        <Cli as CommandFactory>::command().debug_assert();
    }

    #[test]
    fn defaults_to_run() {
        let cli = Cli::try_parse_from(["dynamic_form"]).unwrap();
        assert_eq!(cli.command(), Cmd::Run { form_type: None });
        assert!(cli.command().is_interactive());
    }

    #[test]
    fn parses_submit() {
        let cli = Cli::try_parse_from([
            "dynamic_form",
            "submit",
            "--form-type",
            "userInfo",
            "--set",
            "firstName=Ann",
            "--set",
            "age=",
            "--json",
        ])
        .unwrap();
        assert_eq!(
            cli.command(),
            Cmd::Submit {
                form_type: "userInfo".into(),
                set: vec![
                    ("firstName".into(), "Ann".into()),
                    ("age".into(), String::new())
                ],
                json: true,
            }
        );
        assert!(!cli.command().is_interactive());
    }

    #[test]
    fn rejects_malformed_assignments() {
        assert!(Cli::try_parse_from(["dynamic_form", "submit", "--form-type", "x", "--set", "oops"])
            .is_err());
        assert_eq!(parse_assignment("a=b=c"), Ok(("a".into(), "b=c".into())));
        assert!(parse_assignment("=value").is_err());
    }
}
