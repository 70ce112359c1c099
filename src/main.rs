use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use alloy::primitives::U256;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use greeter_console::app::{App, InputMode, ToastLevel};
use greeter_console::config::{self, EndpointOverrides};
use greeter_console::domain::contract::{Balance, GasLimit, GasLimitAndRequiredValue};
use greeter_console::infrastructure::ethereum::DevChain;
use greeter_console::infrastructure::runtime::{
    connect_greeter, RuntimeBridge, RuntimeCommand, WorkerSettings,
};
use greeter_console::logging::{self, LogSink};
use greeter_console::modules::greeter::FormFocus;
use greeter_console::ui;

#[derive(Debug, Parser)]
#[command(
    name = "greeter",
    version,
    about = "Greeter: typed console for the greeter contract"
)]
struct Args {
    /// HTTP JSON-RPC endpoint (e.g. http://localhost:8545)
    #[arg(long, global = true)]
    rpc: Option<String>,

    /// WebSocket endpoint (e.g. ws://localhost:8546)
    #[arg(long, global = true)]
    ws: Option<String>,

    /// IPC path (e.g. ~/.ethereum/geth.ipc). Unix only.
    #[arg(long, global = true)]
    ipc: Option<PathBuf>,

    /// Run against the in-process dev chain
    #[arg(long, global = true)]
    dev: bool,

    /// Greeter deployment address
    #[arg(long, global = true)]
    contract: Option<String>,

    /// Hex private key used to sign transactions
    #[arg(long, env = "GREETER_PRIVATE_KEY", hide_env_values = true, global = true)]
    private_key: Option<String>,

    /// Gas cap applied to every call
    #[arg(long, global = true)]
    gas_limit: Option<u64>,

    /// Log level or filter directive
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Log file for the interactive console
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Print the current greeting
    Greet,
    /// Print whether the contract is locked
    LockState,
    /// Print the contract balance
    Balance,
    /// Send setMessage and print the outcome
    SetMessage {
        message: String,
        #[arg(long)]
        value: Option<u64>,
    },
    /// Send unlock and print the outcome
    Unlock {
        #[arg(long)]
        value: Option<u64>,
    },
    /// Print the unsigned transaction for a method without sending it
    Build {
        #[arg(value_enum)]
        method: BuildMethod,
        /// New greeting for set-message
        message: Option<String>,
        #[arg(long)]
        value: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BuildMethod {
    GetBalance,
    Greet,
    SetMessage,
    GetLockState,
    Unlock,
}

fn main() -> Result<()> {
    let args = Args::parse();
    match args.command.as_ref() {
        Some(command) => run_headless(&args, command),
        None => run_tui(&args),
    }
}

fn endpoint_overrides(args: &Args) -> EndpointOverrides {
    EndpointOverrides {
        rpc: args.rpc.clone(),
        ws: args.ws.clone(),
        ipc: args.ipc.clone(),
        dev: args.dev,
    }
}

fn parse_signer(raw: Option<&str>) -> Result<Option<PrivateKeySigner>> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|key| key.parse::<PrivateKeySigner>().context("Invalid private key"))
        .transpose()
}

fn run_headless(args: &Args, command: &CliCommand) -> Result<()> {
    logging::setup_logging(&args.log_level, LogSink::Stderr)?;
    let config = config::load();
    let endpoints = config::resolve_endpoints(&endpoint_overrides(args), &config)?;
    let provider = endpoints
        .first()
        .map(|endpoint| endpoint.provider.clone())
        .context("No endpoints configured")?;
    let contract = config::resolve_contract(args.contract.as_deref(), &config, &provider)?;
    let signer = parse_signer(args.private_key.as_deref())?;
    let gas_limit = args.gas_limit.or(config.gas_limit);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(async {
        let conn = connect_greeter(&provider, contract, signer, &DevChain::new()).await?;
        tracing::info!(
            endpoint = %conn.endpoint,
            node = %conn.node_kind,
            contract = %conn.greeter.address(),
            "Connected"
        );
        let greeter = conn.greeter;
        let read = GasLimit::new(gas_limit);
        let paid = |value: Balance| GasLimitAndRequiredValue::new(gas_limit, U256::from(value));

        match command {
            CliCommand::Greet => {
                let greeting = greeter.query().greet(read).await?.into_value()?;
                println!("{greeting}");
            }
            CliCommand::LockState => {
                let locked = greeter.query().get_lock_state(read).await?.into_value()?;
                println!("{locked}");
            }
            CliCommand::Balance => {
                let balance = greeter.query().get_balance(read).await?.into_value()?;
                println!("{balance}");
            }
            CliCommand::SetMessage { message, value } => {
                let value = value.map_or_else(|| config.message_value(), Balance::from);
                let outcome = greeter
                    .tx()
                    .set_message(message.clone(), value, paid(value))
                    .await?;
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
            CliCommand::Unlock { value } => {
                let value = value.map_or_else(|| config.unlock_value(), Balance::from);
                let outcome = greeter.tx().unlock(value, paid(value)).await?;
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
            CliCommand::Build {
                method,
                message,
                value,
            } => {
                let builder = greeter.build_extrinsic();
                let options = GasLimitAndRequiredValue::from(read);
                let request = match method {
                    BuildMethod::GetBalance => builder.get_balance(options),
                    BuildMethod::Greet => builder.greet(options),
                    BuildMethod::GetLockState => builder.get_lock_state(options),
                    BuildMethod::SetMessage => {
                        let message = message
                            .clone()
                            .context("set-message needs a message argument")?;
                        let value = value.map_or_else(|| config.message_value(), Balance::from);
                        builder.set_message(message, value, paid(value))
                    }
                    BuildMethod::Unlock => {
                        let value = value.map_or_else(|| config.unlock_value(), Balance::from);
                        builder.unlock(value, paid(value))
                    }
                };
                println!("{}", serde_json::to_string_pretty(&request)?);
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}

fn run_tui(args: &Args) -> Result<()> {
    let log_path = args.log_file.clone().or_else(config::default_log_path);
    if let Some(path) = log_path {
        if let Err(err) = logging::setup_logging(&args.log_level, LogSink::File(path)) {
            eprintln!("Logging disabled: {err:#}");
        }
    }

    let config = config::load();
    let endpoints = config::resolve_endpoints(&endpoint_overrides(args), &config)?;
    let settings = WorkerSettings {
        endpoints: endpoints
            .iter()
            .map(|endpoint| endpoint.provider.clone())
            .collect(),
        contract: config::contract_addresses(args.contract.as_deref(), &config)?,
        signer: parse_signer(args.private_key.as_deref())?,
        gas_limit: args.gas_limit.or(config.gas_limit),
    };
    let initial_endpoint = endpoints
        .first()
        .map(|endpoint| endpoint.provider.display())
        .unwrap_or_default();

    let mut app = App::new(config.message_value(), config.unlock_value());
    app.endpoints = endpoints.into_iter().map(|endpoint| endpoint.label).collect();
    app.ctx.endpoint = initial_endpoint;
    app.set_toast("Connecting…", ToastLevel::Info);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = RuntimeBridge::new(settings)
        .and_then(|runtime| run_app(&mut terminal, app, runtime));

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => handle_key(&mut app, key),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        pump_background(&mut app, &runtime);
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        app.apply_event(event);
    }

    for command in app.take_commands() {
        if let Err(err) = runtime.send(command) {
            app.set_toast(format!("{err:#}"), ToastLevel::Error);
        }
    }

    if let Some(text) = app.take_copy_request() {
        copy_to_clipboard(app, text);
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc) {
            app.help_open = false;
        }
        return;
    }

    match app.input_mode {
        InputMode::Form => app.handle_form_key(key),
        InputMode::Command => handle_command_mode(app, key),
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_command(),
        KeyCode::Enter => app.apply_command(),
        KeyCode::Backspace => {
            app.command.input.pop();
        }
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return;
            }
            app.command.input.push(ch);
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.help_open || app.input_mode == InputMode::Command {
        return;
    }
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    let Some(size) = terminal_rect() else {
        return;
    };
    let areas = ui::layout::areas(size);
    let (col, row) = (mouse.column, mouse.row);

    if ui::layout::rect_contains(areas.update_input, col, row) {
        app.form.set_focus(FormFocus::Input);
    } else if ui::layout::rect_contains(areas.submit_button, col, row) {
        app.form.set_focus(FormFocus::Submit);
        let input = app.form.input().to_string();
        app.submit_message(&input);
    } else if ui::layout::rect_contains(areas.unlock_button, col, row) {
        app.form.set_focus(FormFocus::Unlock);
        app.unlock();
    }
}

fn terminal_rect() -> Option<Rect> {
    let (width, height) = crossterm::terminal::size().ok()?;
    Some(Rect {
        x: 0,
        y: 0,
        width,
        height,
    })
}

fn copy_to_clipboard(app: &mut App, text: String) {
    use arboard::Clipboard;

    match Clipboard::new() {
        Ok(mut clipboard) => {
            if clipboard.set_text(&text).is_ok() {
                app.set_toast(format!("Copied: {text}"), ToastLevel::Info);
                app.ctx.set_clipboard(text);
            } else {
                app.set_toast("Failed to copy to clipboard", ToastLevel::Error);
            }
        }
        Err(_) => {
            app.set_toast("Clipboard not available", ToastLevel::Error);
        }
    }
}
