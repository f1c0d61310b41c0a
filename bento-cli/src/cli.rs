//! Command-line arguments.

use bento_core::{KeyId, KeyStatus, MemberRole, MemberStatus, ProjectId};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bento - manage translation keys, languages and project members
#[derive(Parser, Debug)]
#[command(name = "bento", version, about, long_about = None)]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "BENTO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bearer token sent with every request
    #[arg(long, env = "BENTO_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Log level (overrides config)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Output logs as JSON (overrides config)
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and select the first project
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BENTO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BENTO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the cached session
    Logout,
    /// Show the signed-in user and current project
    Whoami,
    /// List or select projects
    Projects {
        #[command(subcommand)]
        command: ProjectsCommand,
    },
    /// Create a project
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    /// Work with translation keys
    Keys {
        #[command(subcommand)]
        command: KeysCommand,
    },
    /// Work with project members
    Members {
        #[command(subcommand)]
        command: MembersCommand,
    },
    /// Show the project's languages
    Languages {
        /// Filter by name or code
        #[arg(long)]
        search: Option<String>,
        /// List every language a key can be translated into instead
        #[arg(long)]
        available: bool,
    },
    /// Show the role catalog
    Roles,
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    List,
    /// Make a project current
    Use { id: ProjectId },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum KeysCommand {
    List {
        #[arg(long, value_parser = parse_key_status)]
        status: Vec<KeyStatus>,
        #[arg(long)]
        tag: Vec<String>,
        #[arg(long)]
        updated_by: Vec<String>,
        #[arg(long)]
        search: Option<String>,
    },
    Show {
        id: KeyId,
    },
    Add {
        #[arg(long)]
        key: String,
        #[arg(long)]
        tag: String,
        /// English source text
        #[arg(long)]
        english: String,
        /// Additional translation as CODE=TEXT
        #[arg(long = "translation", value_parser = parse_translation)]
        translations: Vec<(String, String)>,
    },
    Update {
        id: KeyId,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long, value_parser = parse_key_status)]
        status: Option<KeyStatus>,
        /// Translation as CODE=TEXT
        #[arg(long = "translation", value_parser = parse_translation)]
        translations: Vec<(String, String)>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MembersCommand {
    List {
        #[arg(long, value_parser = parse_member_role)]
        role: Vec<MemberRole>,
        #[arg(long, value_parser = parse_member_status)]
        status: Vec<MemberStatus>,
        #[arg(long)]
        search: Option<String>,
    },
    Invite {
        #[arg(long)]
        email: String,
        #[arg(long, value_parser = parse_member_role, default_value = "Member")]
        role: MemberRole,
    },
}

fn parse_key_status(value: &str) -> Result<KeyStatus, String> {
    KeyStatus::parse(value).ok_or_else(|| format!("unknown status '{}' (draft, published, archive)", value))
}

fn parse_member_role(value: &str) -> Result<MemberRole, String> {
    MemberRole::parse(value).ok_or_else(|| format!("unknown role '{}' (admin, member)", value))
}

fn parse_member_status(value: &str) -> Result<MemberStatus, String> {
    MemberStatus::parse(value).ok_or_else(|| format!("unknown status '{}' (active, pending)", value))
}

fn parse_translation(value: &str) -> Result<(String, String), String> {
    let (code, text) = value
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=TEXT, got '{}'", value))?;
    let code = code.trim();
    if code.is_empty() {
        return Err("language code must not be empty".to_string());
    }
    Ok((code.to_string(), text.to_string()))
}
