//! services/app/src/cli.rs
//!
//! Defines the interactive command grammar using clap.
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// One line of user input, parsed as a subcommand.
#[derive(Parser)]
#[command(name = "plastivize")]
#[command(about = "Plastivize - scan plastic, track your impact", long_about = None)]
#[command(no_binary_name = true)]
#[command(disable_version_flag = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account and sign in
    Signup {
        email: String,
        password: String,
    },

    /// Sign in to an existing account
    Login {
        email: String,
        password: String,
    },

    /// Sign out and clear local progress
    Logout,

    /// Classify a plastic item from an image file and record the scan
    Scan {
        /// Path to a JPEG, PNG or WebP image
        image: PathBuf,
    },

    /// Show your impact summary
    Stats,

    /// Show your most recent scans
    History,

    /// Show the activity feed
    Activity,

    /// Show achievement badges
    Achievements,

    /// Browse the marketplace
    Market,

    /// Spend eco-points to unlock a marketplace item
    Unlock {
        /// Item id as shown by `market`
        item_id: String,
    },

    /// Change your display name
    Rename {
        /// The new name (may contain spaces)
        #[arg(required = true)]
        username: Vec<String>,
    },

    /// Leave the program
    #[command(alias = "quit")]
    Exit,
}

/// Splits a raw input line on whitespace and parses it. Returns the
/// rendered clap error (usage or help text) on failure.
pub fn parse_line(line: &str) -> Result<Command, String> {
    let words = line.split_whitespace();
    match ReplLine::try_parse_from(words) {
        Ok(parsed) => Ok(parsed.command),
        Err(e) => Err(e.render().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_takes_an_image_path() {
        let cmd = parse_line("scan photos/bottle.jpg").unwrap();
        match cmd {
            Command::Scan { image } => assert_eq!(image, PathBuf::from("photos/bottle.jpg")),
            _ => panic!("parsed the wrong command"),
        }
    }

    #[test]
    fn rename_collects_every_word() {
        let cmd = parse_line("rename Eco Warrior Jane").unwrap();
        match cmd {
            Command::Rename { username } => assert_eq!(username, ["Eco", "Warrior", "Jane"]),
            _ => panic!("parsed the wrong command"),
        }
    }

    #[test]
    fn quit_is_an_alias_for_exit() {
        assert!(matches!(parse_line("quit").unwrap(), Command::Exit));
        assert!(matches!(parse_line("exit").unwrap(), Command::Exit));
    }

    #[test]
    fn unknown_words_render_an_error() {
        let err = parse_line("teleport").unwrap_err();
        assert!(err.contains("Usage") || err.contains("unrecognized"));
    }

    #[test]
    fn help_renders_the_command_list() {
        let err = parse_line("help").unwrap_err();
        assert!(err.contains("scan"));
        assert!(err.contains("market"));
    }
}
