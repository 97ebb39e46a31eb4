//! Command execution logic.
//!
//! Contains the `execute_command` function that runs parsed commands
//! against the session and returns results. Every verb reports its first
//! failure as `<verb>: <message>` and stops there.

use crate::config::WGET_DEFAULT_FILENAME;
use crate::core::error::DispatchError;
use crate::core::parser::{Command, Redirect, RedirectMode};
use crate::core::session::Session;
use crate::utils::Fetcher;

use super::{Builtin, CommandResult, Flags, Output, ShellAction};

/// Everything a command may touch while it runs.
pub struct ShellContext<'a, F> {
    pub session: &'a mut Session,
    pub fetcher: &'a F,
}

/// Execute a parsed command, then route its output through its redirects.
///
/// An empty command yields an empty result. `wget` is the only verb that
/// suspends.
pub async fn execute_command<F: Fetcher>(
    command: &Command,
    ctx: &mut ShellContext<'_, F>,
) -> CommandResult {
    if command.is_empty() {
        return CommandResult::empty();
    }

    let result = match Builtin::from_name(&command.bin) {
        Some(builtin) => {
            log::debug!("dispatching {:?} with {:?}", builtin, command.arguments);
            run_builtin(builtin, command, ctx)
                .await
                .unwrap_or_else(|e| CommandResult::error(format!("{}: {}", builtin.name(), e)))
        }
        None => CommandResult::error(DispatchError::CommandNotFound(command.bin.clone()).to_string()),
    };

    apply_redirects(result, &command.bin, &command.redirects, ctx.session)
}

async fn run_builtin<F: Fetcher>(
    builtin: Builtin,
    command: &Command,
    ctx: &mut ShellContext<'_, F>,
) -> Result<CommandResult, DispatchError> {
    let flags = builtin.flags(command)?;
    let args = &command.arguments;
    if builtin.needs_operand() && args.is_empty() {
        return Err(DispatchError::MissingOperand);
    }

    let session = &mut *ctx.session;
    match builtin {
        Builtin::Pwd => Ok(CommandResult::text(format!("{}\n", session.pwd()))),
        Builtin::Cd => {
            if args.len() > 1 {
                return Err(DispatchError::TooManyArguments);
            }
            session.cd(args.first().map(String::as_str))?;
            Ok(CommandResult::empty())
        }
        Builtin::Mkdir => {
            for path in args {
                session.mkdir(path, flags.has("parents"))?;
            }
            Ok(CommandResult::empty())
        }
        Builtin::Ls => execute_ls(session, args, &flags).map(CommandResult::text),
        Builtin::Touch => {
            for path in args {
                session.touch(path)?;
            }
            Ok(CommandResult::empty())
        }
        Builtin::Cat => {
            let mut text = String::new();
            for path in args {
                text.push_str(&session.cat(path)?);
            }
            Ok(CommandResult::text(text))
        }
        Builtin::Echo => Ok(CommandResult::text(format!("{}\n", args.join(" ")))),
        Builtin::Rm => {
            for path in args {
                session.rm(path, flags.has("recursive"))?;
            }
            Ok(CommandResult::empty())
        }
        Builtin::XdgOpen => {
            let mut actions = Vec::with_capacity(args.len());
            for path in args {
                actions.push(ShellAction::Open(session.xdg_open(path)?));
            }
            Ok(CommandResult::actions(actions))
        }
        Builtin::Wget => execute_wget(ctx, args).await.map(CommandResult::text),
        Builtin::Clear => Ok(CommandResult::actions(vec![ShellAction::Clear])),
    }
}

/// Execute `ls`.
///
/// One entry per line. With several paths, each listing gets a `path:`
/// header and listings are separated by a blank line.
fn execute_ls(session: &Session, args: &[String], flags: &Flags) -> Result<String, DispatchError> {
    let all = flags.has("all");
    let listing = |path: Option<&str>| -> Result<String, DispatchError> {
        let is_dir = path.is_none_or(|p| session.is_directory(p));
        let mut out = String::new();
        for name in session.list_files(path)? {
            if is_dir && !all && name.starts_with('.') {
                continue;
            }
            out.push_str(&name);
            out.push('\n');
        }
        Ok(out)
    };

    match args {
        [] => listing(None),
        [path] => listing(Some(path.as_str())),
        paths => {
            let mut sections = Vec::with_capacity(paths.len());
            for path in paths {
                sections.push(format!("{}:\n{}", path, listing(Some(path.as_str()))?));
            }
            Ok(sections.join("\n"))
        }
    }
}

/// Execute `wget`: fetch each URL and save it in the working directory.
async fn execute_wget<F: Fetcher>(
    ctx: &mut ShellContext<'_, F>,
    urls: &[String],
) -> Result<String, DispatchError> {
    let mut out = String::new();
    for url in urls {
        let bytes = ctx.fetcher.fetch(url).await.inspect_err(|e| {
            log::warn!("wget of '{}' failed: {}", url, e);
        })?;
        let name = ctx.session.save_download(&download_name(url), bytes, url)?;
        out.push_str(&format!("'{}' saved\n", name));
    }
    Ok(out)
}

/// File name for a download: the last URL path segment, without query or
/// fragment.
fn download_name(url: &str) -> &str {
    let url = url.split(['?', '#']).next().unwrap_or(url);
    let path = match url.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
        None => url,
    };
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(WGET_DEFAULT_FILENAME)
}

/// Send the command's text to each redirect target in order.
///
/// Redirected text is no longer displayed; error text still is, and the
/// targets are still created. The first target that cannot be opened
/// replaces the output with its error and stops the rest.
fn apply_redirects(
    mut result: CommandResult,
    bin: &str,
    redirects: &[Redirect],
    session: &mut Session,
) -> CommandResult {
    if redirects.is_empty() {
        return result;
    }

    let (text, shown) = match std::mem::replace(&mut result.output, Output::None) {
        Output::Text(text) => (text, Output::None),
        other => (String::new(), other),
    };
    result.output = shown;

    for redirect in redirects {
        let file = match session.create_or_open_file(&redirect.target) {
            Ok(file) => file,
            Err(e) => {
                log::debug!("redirect to '{}' failed: {}", redirect.target, e);
                result.output = Output::Error(format!("{}: {}", bin, e));
                return result;
            }
        };
        match redirect.mode {
            RedirectMode::Write => file.write(text.as_bytes()),
            RedirectMode::Append => file.append(text.as_bytes()),
        }
    }
    result
}

// =============================================================================
// Tests
// =============================================================================
