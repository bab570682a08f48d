//! # Chat Client
//!
//! Terminal front end for the chat backend.
//!
//! This is the application entry point that initializes:
//! - Configuration loading
//! - Tracing/logging subsystem
//! - Client context (REST client, realtime transport, credential store)
//! - The requested command

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

use chat_client::config::Settings;
use chat_client::presentation::{navbar, AuthForm, AuthMode, ChatListView, ChatView, Mount, Route};
use chat_client::startup::AppContext;

#[derive(Parser)]
#[command(name = "chat-client")]
#[command(about = "Terminal client for the chat backend")]
struct Cli {
    /// REST API base URL (overrides configuration)
    #[arg(long, env = "API_BASE_URL")]
    api_url: Option<String>,

    /// WebSocket endpoint (overrides configuration)
    #[arg(long, env = "WS_URL")]
    ws_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the credential
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CHAT_PASSWORD")]
        password: Option<String>,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CHAT_PASSWORD")]
        password: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// List your chats
    Chats,
    /// Open a chat and send messages interactively
    Open {
        /// Chat id
        id: String,
    },
    /// Forget the stored credential
    Logout,
}

type InputLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut settings = Settings::load().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        settings.api.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(url) = cli.ws_url {
        settings.websocket.url = url;
    }

    chat_client::telemetry::init_tracing(&settings.logging);
    info!(environment = %settings.environment, "Configuration loaded");

    let ctx = Arc::new(AppContext::build(settings)?);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    if !matches!(cli.command, Command::Login { .. } | Command::Register { .. }) {
        if let Err(e) = ctx.auth().resume().await {
            warn!(error = %e, "Could not resume session");
        }
    }

    match cli.command {
        Command::Login { email, password } => {
            let mut form = AuthForm::new(AuthMode::Login);
            form.fields_mut().email = email;
            form.fields_mut().password = password_or_prompt(password, &mut input).await?;
            authenticate(&mut form, &ctx).await?;
        }
        Command::Register {
            username,
            email,
            password,
            gender,
            first_name,
            last_name,
        } => {
            let mut form = AuthForm::new(AuthMode::Register);
            let password = password_or_prompt(password, &mut input).await?;
            let fields = form.fields_mut();
            fields.username = username;
            fields.email = email;
            fields.password = password;
            fields.gender = gender.unwrap_or_default();
            fields.first_name = first_name.unwrap_or_default();
            fields.last_name = last_name.unwrap_or_default();
            authenticate(&mut form, &ctx).await?;
        }
        Command::Chats => {
            let mut view = ChatListView::new();
            if let Some(route) = view.load(&ctx).await {
                bail!("Not signed in (go to {})", route);
            }
            print_header(&ctx);
            for line in view.render() {
                println!("{}", line);
            }
        }
        Command::Open { id } => {
            // Needed to resolve the receiver from participants.
            if ctx.session.user().is_some() {
                if let Err(e) = ctx.chat_service().load().await {
                    warn!(error = %e, "Could not load chats");
                }
            }
            match ChatView::open(ctx.clone(), &id).await {
                Mount::Mounted(view) => run_chat(view, &ctx, &mut input).await?,
                Mount::Redirect(Route::Login) => bail!("Not signed in"),
                Mount::Redirect(route) => bail!("Invalid chat id {:?} (go to {})", id, route),
            }
        }
        Command::Logout => {
            navbar::logout(&ctx);
            println!("Signed out");
        }
    }

    Ok(())
}

async fn password_or_prompt(password: Option<String>, input: &mut InputLines) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    Ok(input.next_line().await?.unwrap_or_default())
}

async fn authenticate(form: &mut AuthForm, ctx: &AppContext) -> Result<()> {
    match form.submit(ctx).await {
        Some(_) => {
            print_header(ctx);
            Ok(())
        }
        None => bail!("{}", form.error().unwrap_or("Authentication failed")),
    }
}

fn print_header(ctx: &AppContext) {
    if let Some(greeting) = navbar::render(ctx) {
        println!("{}", greeting);
    }
}

enum Step {
    Line(Option<String>),
    Event,
    Disconnected,
    Interrupted,
}

async fn run_chat(mut view: ChatView, ctx: &AppContext, input: &mut InputLines) -> Result<()> {
    print_header(ctx);
    println!("Chat {} (type /quit to leave)", view.chat());
    redraw(&view);

    let mut live = true;
    loop {
        let step = tokio::select! {
            line = input.next_line() => Step::Line(line?),
            event = view.next_event(), if live => match event {
                Some(_) => Step::Event,
                None => Step::Disconnected,
            },
            _ = tokio::signal::ctrl_c() => Step::Interrupted,
        };

        match step {
            Step::Event => {
                view.refresh().await;
                redraw(&view);
            }
            Step::Disconnected => {
                live = false;
                println!("(realtime updates unavailable)");
            }
            Step::Line(Some(line)) if line.trim() == "/quit" => break,
            Step::Line(Some(line)) => {
                view.set_input(line);
                view.submit().await;
                redraw(&view);
            }
            Step::Line(None) | Step::Interrupted => break,
        }
    }

    view.unmount();
    Ok(())
}

fn redraw(view: &ChatView) {
    for line in view.render() {
        println!("{}", line);
    }
}
