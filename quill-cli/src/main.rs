//! quill - Read and write Quill blog posts from the command line

mod draft;
mod output;

use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use libquill::error::SessionError;
use libquill::logging::{config_from_env, LogFormat, LoggingConfig};
use libquill::notification::ActiveNotification;
use libquill::topics::{filter_topics, find_by_url};
use libquill::{
    BlogService, Config, NotificationKind, PostQuery, QuillError, Route, Session, Store,
};

use draft::Draft;
use output::Format;

#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(version, about = "Read and write Quill blog posts from the command line")]
#[command(long_about = r#"Read and write Quill blog posts from the command line.

EXAMPLES:
    # Newest posts, then the page before post 21
    quill posts
    quill posts --before 21

    # Read one post
    quill show 42

    # Topics, optionally filtered
    quill topics --search sql

    # Log in once; the session is kept for later commands
    quill register --username ferris
    quill login --username ferris
    quill publish draft.toml

    # Anything the TUI can open
    quill open /topic/rust

    # JSON for scripting
    quill posts --format json | jq '.[].title'

EXIT CODES:
    0 - Success
    1 - Error (network, backend, config)
    2 - Authentication required or rejected
    3 - Invalid input (bad draft, missing topic, unknown path)
"#)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List posts, newest first
    Posts {
        /// Posts older than this id
        #[arg(long, value_name = "ID", conflicts_with = "after")]
        before: Option<u64>,

        /// Posts newer than this id
        #[arg(long, value_name = "ID")]
        after: Option<u64>,
    },

    /// Show one post in full
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// List topics
    Topics {
        /// Only topics whose title contains this (case-insensitive)
        #[arg(short, long, value_name = "TERM")]
        search: Option<String>,
    },

    /// List the posts in a topic
    Topic {
        /// Topic url, e.g. rust
        #[arg(value_name = "TERM")]
        term: String,
    },

    /// List your own posts
    Mine,

    /// Create an account and log into it
    Register {
        #[arg(short, long)]
        username: Option<String>,

        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// Log in and keep the session
    Login {
        #[arg(short, long)]
        username: Option<String>,

        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Like a post
    Like {
        #[arg(value_name = "ID")]
        id: u64,
    },

    /// Delete one of your posts
    Delete {
        #[arg(value_name = "ID")]
        id: u64,
    },

    /// Publish a post from a TOML draft
    Publish {
        #[arg(value_name = "DRAFT")]
        draft: PathBuf,
    },

    /// Open a path like the TUI would (/, /all, /blog/42, /topic/rust, ...)
    Open {
        #[arg(value_name = "PATH")]
        path: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let logging = if cli.verbose {
        LoggingConfig::new(LogFormat::Text, "debug".to_string(), true)
    } else {
        config_from_env("warn")
    };
    logging.init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<QuillError>()
        .map_or(1, QuillError::exit_code)
}

async fn run(cli: Cli) -> Result<()> {
    tracing::debug!("quill started with args: {:?}", cli);

    // Drafts are checked before anything touches the network
    let draft = match &cli.command {
        Command::Publish { draft } => Some(read_draft(draft)?),
        _ => None,
    };

    let config = Config::load_or_default().context("Failed to load configuration")?;
    let service = BlogService::from_config(&config)?;

    let mut store = Store::new();
    let _subscription = store.subscribe(notification_printer());

    execute(&service, &mut store, cli.command, draft, cli.format).await
}

fn read_draft(path: &Path) -> Result<Draft> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft {}", path.display()))?;
    let draft = Draft::parse(&source)
        .map_err(|e| QuillError::InvalidInput(format!("{}: {}", path.display(), e)))?;
    draft.validate().map_err(QuillError::from)?;
    Ok(draft)
}

/// Success and info notifications go to stderr; errors are reported by `main`
fn notification_printer() -> impl FnMut(&libquill::State) {
    let mut last: Option<ActiveNotification> = None;
    move |state| {
        if state.notification == last {
            return;
        }
        if let Some(active) = &state.notification {
            if active.notification.kind != NotificationKind::Error {
                eprintln!("{}", active.notification.content);
            }
        }
        last = state.notification.clone();
    }
}

/// The command showing the view `path` routes to
fn open(path: &str) -> Result<Command> {
    let resolved = match Route::parse(path) {
        Route::Home => Command::Topics { search: None },
        Route::AllPosts => Command::Posts {
            before: None,
            after: None,
        },
        Route::Post { id } => Command::Show { id },
        Route::Topic { term } => Command::Topic { term },
        Route::YourPosts => Command::Mine,
        Route::Login => Command::Whoami,
        Route::Create => {
            return Err(QuillError::InvalidInput(
                "Write a TOML draft and run: quill publish <DRAFT>".to_string(),
            )
            .into())
        }
        Route::NotFound { path } => {
            return Err(QuillError::InvalidInput(format!("Page not found: {}", path)).into())
        }
    };

    tracing::debug!(?resolved, "opened {}", path);
    Ok(resolved)
}

async fn execute(
    service: &BlogService,
    store: &mut Store,
    command: Command,
    draft: Option<Draft>,
    format: Format,
) -> Result<()> {
    match command {
        Command::Posts { before, after } => {
            let query = match (before, after) {
                (Some(id), _) => PostQuery::older_than(id),
                (None, Some(id)) => PostQuery::newer_than(id),
                (None, None) => PostQuery::newest(),
            };
            let posts = service.fetch_posts(store, &query, false).await?;
            output::print_posts(&posts, format)
        }

        Command::Show { id } => {
            let post = service.fetch_post(store, &id).await?;
            output::print_post(&post, format)
        }

        Command::Topics { search } => {
            let topics = service.fetch_topics(store).await?;
            let matching = filter_topics(&topics, search.as_deref().unwrap_or_default());
            output::print_topics(&matching, format)
        }

        Command::Topic { term } => {
            let posts = service.fetch_topic_posts(store, &term).await?;
            output::print_posts(&posts, format)
        }

        Command::Mine => {
            let session = require_session(service, store).await?;
            let posts = service.fetch_user_posts(store, &session).await?;
            output::print_posts(&posts, format)
        }

        Command::Login {
            username,
            password_stdin,
        } => {
            let username = read_username(username)?;
            let password = if password_stdin {
                read_stdin_line()?
            } else {
                rpassword::prompt_password("Password: ").context("Failed to read password")?
            };

            let session = service.login(store, &username, &password).await?;
            output::print_user(&session.user, format)
        }

        Command::Register {
            username,
            password_stdin,
        } => {
            let username = read_username(username)?;
            let password = if password_stdin {
                read_stdin_line()?
            } else {
                let password =
                    rpassword::prompt_password("Password: ").context("Failed to read password")?;
                let repeated = rpassword::prompt_password("Repeat password: ")
                    .context("Failed to read password")?;
                if password != repeated {
                    return Err(
                        QuillError::InvalidInput("Passwords do not match".to_string()).into(),
                    );
                }
                password
            };

            let session = service.register(store, &username, &password).await?;
            output::print_user(&session.user, format)
        }

        Command::Logout => {
            service.logout(store)?;
            Ok(())
        }

        Command::Whoami => {
            let session = require_session(service, store).await?;
            output::print_user(&session.user, format)
        }

        Command::Like { id } => {
            let session = require_session(service, store).await?;
            let post = service.like_post(store, &session, id).await?;
            match format {
                Format::Json => output::print_json(&post),
                Format::Text => {
                    println!("{} now has {} likes", post.title, post.likes);
                    Ok(())
                }
            }
        }

        Command::Delete { id } => {
            let session = require_session(service, store).await?;
            service.delete_post(store, &session, id).await?;
            Ok(())
        }

        Command::Publish { draft: path } => {
            let draft = match draft {
                Some(draft) => draft,
                None => read_draft(&path)?,
            };
            let session = require_session(service, store).await?;

            let url = draft.validate().map_err(QuillError::from)?;
            let topics = service.fetch_topics(store).await?;
            let topic = find_by_url(&topics, url).cloned().ok_or_else(|| {
                QuillError::InvalidInput(format!("Unknown topic: {}", url))
            })?;

            let editor = draft.to_editor(Some(topic)).map_err(QuillError::from)?;
            let post = service.publish(store, Some(&session), &editor).await?;

            match format {
                Format::Json => output::print_json(&post),
                Format::Text => {
                    println!("{}", Route::Post { id: post.route_id() });
                    Ok(())
                }
            }
        }

        Command::Open { path } => {
            let resolved = open(&path)?;
            Box::pin(execute(service, store, resolved, draft, format)).await
        }
    }
}

async fn require_session(service: &BlogService, store: &mut Store) -> Result<Session> {
    let session = service
        .restore_session(store)
        .await?
        .ok_or(QuillError::Session(SessionError::NotLoggedIn))?;
    Ok(session)
}

fn read_username(username: Option<String>) -> Result<String> {
    match username {
        Some(username) => Ok(username),
        None => prompt_line("Username: "),
    }
}

fn prompt_line(prompt: &str) -> Result<String> {
    eprint!("{}", prompt);
    read_stdin_line()
}

fn read_stdin_line() -> Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
