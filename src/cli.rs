//! CLI argument definitions and dispatch using clap

use clap::{Parser, Subcommand};
use tracing::{debug, instrument};

use crate::{DisplayId, DisplayInfo, Error, list_displays, set_display_enabled, toggle_display};

/// List active displays and switch them on or off
#[derive(Parser, Debug)]
#[command(name = "displayctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug output (-d, -dd, -ddd)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a table of active displays
    List,

    /// Switch a display on
    Enable {
        /// Target display id
        id: DisplayId,
    },

    /// Switch a display off
    Disable {
        /// Target display id
        id: DisplayId,
    },

    /// Flip a display's current state
    Toggle {
        /// Target display id
        id: DisplayId,
    },
}

pub fn execute_command(cli: &Cli) -> Result<(), Error> {
    match cli.command {
        Commands::List => list(),
        Commands::Enable { id } => set(id, true),
        Commands::Disable { id } => set(id, false),
        Commands::Toggle { id } => toggle(id),
    }
}

#[instrument]
fn list() -> Result<(), Error> {
    let displays = list_displays()?;
    debug!("rendering {} displays", displays.len());
    print!("{}", render_table(&displays));
    Ok(())
}

#[instrument]
fn set(id: DisplayId, enabled: bool) -> Result<(), Error> {
    set_display_enabled(id, enabled)?;
    println!("display {} {}", id, state_name(enabled));
    Ok(())
}

#[instrument]
fn toggle(id: DisplayId) -> Result<(), Error> {
    let enabled = toggle_display(id)?;
    println!("display {} {}", id, state_name(enabled));
    Ok(())
}

fn state_name(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

fn render_table(displays: &[DisplayInfo]) -> String {
    let mut out = format!("{:<10}  {:<6}  {:<6}  Name\n", "ID", "Vendor", "Model");

    for display in displays {
        out.push_str(&format!(
            "{:<10}  {:#06x}  {:#06x}  {}\n",
            display.id,
            display.vendor,
            display.model,
            display.name.as_deref().unwrap_or("-"),
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use rstest::rstest;

    use super::*;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case::enable("enable")]
    #[case::disable("disable")]
    #[case::toggle("toggle")]
    fn configure_subcommands_take_a_display_id(#[case] subcommand: &str) {
        let cli = Cli::try_parse_from(["displayctl", subcommand, "42"]).unwrap();

        let id = match cli.command {
            Commands::Enable { id } | Commands::Disable { id } | Commands::Toggle { id } => id,
            Commands::List => panic!("parsed the wrong subcommand"),
        };
        assert_eq!(id, 42);
    }

    #[rstest]
    #[case::missing_id(&["displayctl", "toggle"])]
    #[case::non_numeric_id(&["displayctl", "enable", "built-in"])]
    #[case::unknown_subcommand(&["displayctl", "mirror", "42"])]
    fn rejected_invocations(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn table_renders_one_row_per_display() {
        let displays = vec![DisplayInfo {
            id: 1,
            vendor: 0x610,
            model: 0x0,
            name: Some("Built-in Display".into()),
        }];

        let table = render_table(&displays);
        let mut lines = table.lines();

        assert!(lines.next().unwrap().starts_with("ID"));
        let row = lines.next().unwrap();
        assert!(row.contains("0x0610"));
        assert!(row.contains("0x0000"));
        assert!(row.ends_with("Built-in Display"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn missing_name_renders_as_placeholder() {
        let displays = vec![DisplayInfo {
            id: 724042317,
            vendor: 0x610,
            model: 0x0,
            name: None,
        }];

        let table = render_table(&displays);
        assert!(table.lines().nth(1).unwrap().trim_end().ends_with('-'));
    }
}
