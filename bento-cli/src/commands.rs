//! Command dispatch: one console call per subcommand, rendered to text.

use crate::cli::{Command, KeysCommand, MembersCommand, ProjectCommand, ProjectsCommand};
use crate::error::{CliError, CliResult};
use crate::render;
use bento_client::{ClientError, Console};
use bento_core::{
    available_languages, roles, search_languages, CreateKeyRequest, CreateProjectRequest,
    InviteMemberRequest, KeyFilter, Language, LoginRequest, MemberFilter, RegisterRequest,
    UpdateKeyRequest,
};

/// Run `command` against `console` and return what should be printed.
pub async fn run(console: &mut Console, command: Command) -> CliResult<String> {
    console.restore()?;

    match command {
        Command::Login { email, password } => {
            let user = console.login(&LoginRequest::new(email, password)).await?;
            let mut out = format!("Signed in as {}\n", user.display_name());
            if console.current_project().is_none() {
                out.push_str("No projects yet. Create one with `bento project create`.\n");
            }
            Ok(out)
        }
        Command::Register {
            first_name,
            last_name,
            email,
            password,
        } => {
            let registration = RegisterRequest {
                first_name,
                last_name,
                email,
                password,
            };
            let user = console.register(&registration).await?;
            Ok(format!(
                "Account created for {}. Run `bento login` to sign in.\n",
                user.email
            ))
        }
        Command::Logout => {
            console.logout()?;
            Ok("Signed out.\n".to_string())
        }
        Command::Whoami => {
            let user = console.user().cloned().ok_or(ClientError::NotAuthenticated)?;
            Ok(render::user(&user, console.current_project()))
        }
        Command::Projects { command } => projects(console, command),
        Command::Project {
            command: ProjectCommand::Create { name, description },
        } => {
            let project = console
                .create_project(&CreateProjectRequest { name, description })
                .await?;
            Ok(format!(
                "Created project {} (id {}) and made it current.\n",
                project.project_name, project.project_id
            ))
        }
        Command::Keys { command } => keys(console, command).await,
        Command::Members { command } => members(console, command).await,
        Command::Languages { search, available } => Ok(languages(console, search, available)),
        Command::Roles => Ok(render::roles(roles())),
    }
}

fn projects(console: &mut Console, command: ProjectsCommand) -> CliResult<String> {
    match command {
        ProjectsCommand::List => {
            let projects = console.projects()?;
            Ok(render::projects(&projects, console.current_project()))
        }
        ProjectsCommand::Use { id } => {
            let project = console.switch_project(id)?;
            Ok(format!("Now working on {} (id {}).\n", project.project_name, project.project_id))
        }
    }
}

async fn keys(console: &mut Console, command: KeysCommand) -> CliResult<String> {
    match command {
        KeysCommand::List {
            status,
            tag,
            updated_by,
            search,
        } => {
            let filter = KeyFilter {
                statuses: status,
                tags: tag,
                updated_by,
                search: search.unwrap_or_default(),
            };
            let listing = console.dashboard().await?;
            let mut out = String::new();
            if !listing.notice_message.is_empty() {
                out.push_str(&listing.notice_message);
                out.push('\n');
            }
            out.push_str(&render::keys(&filter.apply(&listing.translations)));
            Ok(out)
        }
        KeysCommand::Show { id } => {
            let details = console.key_details(id).await?;
            Ok(render::key_details(&details))
        }
        KeysCommand::Add {
            key,
            tag,
            english,
            translations,
        } => {
            let request = translations
                .into_iter()
                .fold(CreateKeyRequest::new(key, tag, english), |request, (code, text)| {
                    request.with_translation(code, text)
                });
            Ok(with_newline(console.add_key(&request).await?))
        }
        KeysCommand::Update {
            id,
            tag,
            status,
            translations,
        } => {
            let request = UpdateKeyRequest {
                tag,
                status,
                translations: translations.into_iter().collect(),
            };
            if request.is_empty() {
                return Err(CliError::InvalidArgument(
                    "pass at least one of --tag, --status or --translation".to_string(),
                ));
            }
            Ok(with_newline(console.update_key(id, &request).await?))
        }
    }
}

async fn members(console: &mut Console, command: MembersCommand) -> CliResult<String> {
    match command {
        MembersCommand::List {
            role,
            status,
            search,
        } => {
            let filter = MemberFilter {
                statuses: status,
                roles: role,
                search: search.unwrap_or_default(),
            };
            let members = console.members().await?;
            Ok(render::members(&filter.apply(&members)))
        }
        MembersCommand::Invite { email, role } => {
            let message = console
                .invite_member(&InviteMemberRequest { email, role })
                .await?;
            Ok(with_newline(message))
        }
    }
}

fn languages(console: &Console, search: Option<String>, available: bool) -> String {
    let query = search.unwrap_or_default();
    if available {
        return if query.trim().is_empty() {
            render::languages(available_languages())
        } else {
            render::languages(&search_languages(&query))
        };
    }

    let needle = query.trim().to_lowercase();
    let matching: Vec<Language> = console
        .languages()
        .iter()
        .filter(|l| {
            needle.is_empty()
                || l.language_code.to_lowercase().contains(&needle)
                || l.language_name.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    render::languages(&matching)
}

fn with_newline(mut message: String) -> String {
    if message.is_empty() {
        message.push_str("Done.");
    }
    message.push('\n');
    message
}
