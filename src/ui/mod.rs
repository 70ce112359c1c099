use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;

use crate::app::{App, InputMode, ToastLevel};
use crate::config;
use crate::modules::greeter::FormFocus;

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header, app);
    draw_title(f, areas.title);
    draw_greeting_card(f, areas.greeting_card, app);
    draw_update_card(f, areas.update_input, areas.submit_button, app);
    draw_unlock_button(f, areas.unlock_button, app);
    draw_address(f, areas.address, app);
    draw_activity(f, areas.activity, app);
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let endpoint = if app.ctx.endpoint.is_empty() {
        "--"
    } else {
        app.ctx.endpoint.as_str()
    };
    let title = Line::from(vec![
        Span::styled(
            "Greeter",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("RPC", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {} ", endpoint)),
        Span::styled("Node", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {}", app.node_kind)),
    ]);

    let left = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    let wallet = match app.ctx.caller {
        Some(caller) => Span::styled(short_addr(&caller.to_checksum(None)), Style::default().fg(Color::LightGreen)),
        None => Span::styled("not connected", Style::default().fg(Color::LightRed)),
    };
    let right = Paragraph::new(Line::from(vec![
        Span::styled("Wallet ", Style::default().fg(Color::DarkGray)),
        wallet,
    ]))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Left);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}

fn draw_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new("Greeter Smart Contract")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(title, area);
}

fn draw_greeting_card(f: &mut Frame, area: Rect, app: &App) {
    let placeholder = Style::default().fg(Color::DarkGray);
    let value_style = |label: &str| {
        if label == crate::app::LOADING_LABEL {
            placeholder
        } else {
            Style::default().fg(Color::White)
        }
    };

    let greeting = app.greeting_label();
    let lock = app.lock_label();
    let lines = vec![
        Line::from(Span::styled(
            "Fetched Greeting",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(greeting.clone(), value_style(&greeting))),
        Line::from(Span::styled(
            "Fetched Lock State",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(lock.clone(), value_style(&lock))),
    ];

    let card = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(card, area);
}

fn draw_update_card(f: &mut Frame, input_area: Rect, button_area: Rect, app: &App) {
    let focused = app.input_mode == InputMode::Form && app.form.focus() == FormFocus::Input;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let input_style = if app.is_submitting() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    let mut spans = vec![Span::styled(app.form.input().to_string(), input_style)];
    if focused && !app.is_submitting() {
        spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
    }

    let title = match app.form.validation_hint() {
        Some(hint) => Line::from(vec![
            Span::raw("Update Greeting "),
            Span::styled(hint, Style::default().fg(Color::LightRed)),
        ]),
        None => Line::from(vec![
            Span::raw("Update Greeting "),
            Span::styled(app.form.counter(), Style::default().fg(Color::DarkGray)),
        ]),
    };

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    f.render_widget(input, input_area);

    let label = if app.is_submitting() { "…" } else { "Submit" };
    draw_button(
        f,
        button_area,
        label,
        app.form.focus() == FormFocus::Submit,
        app.buttons_enabled(),
    );
}

fn draw_unlock_button(f: &mut Frame, area: Rect, app: &App) {
    let label = if app.is_submitting() {
        "…"
    } else {
        "Unlock Contract"
    };
    draw_button(
        f,
        area,
        label,
        app.form.focus() == FormFocus::Unlock,
        app.buttons_enabled(),
    );
}

fn draw_button(f: &mut Frame, area: Rect, label: &str, focused: bool, enabled: bool) {
    let style = match (enabled, focused) {
        (false, _) => Style::default().fg(Color::DarkGray),
        (true, true) => Style::default()
            .fg(Color::Black)
            .bg(Color::LightCyan)
            .add_modifier(Modifier::BOLD),
        (true, false) => Style::default()
            .fg(Color::LightCyan)
            .add_modifier(Modifier::BOLD),
    };
    let button = Paragraph::new(label.to_string())
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(button, area);
}

fn draw_address(f: &mut Frame, area: Rect, app: &App) {
    let address = Paragraph::new(app.contract_label())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(address, area);
}

fn draw_activity(f: &mut Frame, area: Rect, app: &App) {
    if area.height < 3 {
        return;
    }
    let mut lines = Vec::new();
    if let Some(tx) = app.last_tx.as_ref() {
        lines.push(Line::from(vec![
            Span::styled("Last tx ", Style::default().fg(Color::DarkGray)),
            Span::raw(tx.method),
            Span::raw("  "),
            Span::raw(short_hash(&tx.outcome.tx_hash.to_string(), 18)),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Block ", Style::default().fg(Color::DarkGray)),
            Span::raw(
                tx.outcome
                    .block_number
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "--".to_string()),
            ),
            Span::styled("  Gas ", Style::default().fg(Color::DarkGray)),
            Span::raw(tx.outcome.gas_used.to_string()),
        ]));
        for event in &tx.outcome.events {
            lines.push(Line::from(vec![
                Span::styled("Event ", Style::default().fg(Color::DarkGray)),
                Span::raw(format!("{event:?}")),
            ]));
        }
    }
    if let Some(balance) = app.contract_balance {
        lines.push(Line::from(vec![
            Span::styled("Contract balance ", Style::default().fg(Color::DarkGray)),
            Span::raw(balance.to_string()),
        ]));
    }
    if let Some(balance) = app.caller_balance {
        lines.push(Line::from(vec![
            Span::styled("Wallet balance ", Style::default().fg(Color::DarkGray)),
            Span::raw(balance.to_string()),
        ]));
    }
    if lines.is_empty() {
        return;
    }

    let panel = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Activity").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(panel, area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let state = if app.is_submitting() {
        Span::styled("submitting", Style::default().fg(Color::LightYellow))
    } else if app.is_loading() {
        Span::styled("loading", Style::default().fg(Color::LightYellow))
    } else {
        Span::styled("idle", Style::default().fg(Color::LightGreen))
    };
    let endpoint = app
        .endpoints
        .get(app.endpoint_index)
        .cloned()
        .unwrap_or_else(|| "--".to_string());
    let line = Line::from(vec![
        Span::styled("Endpoint ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(
            "{}/{} {}  ",
            app.endpoint_index + 1,
            app.endpoints.len().max(1),
            endpoint
        )),
        Span::styled("State ", Style::default().fg(Color::DarkGray)),
        state,
        Span::styled("  Value ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}/{}", app.message_value, app.unlock_value)),
    ]);

    let paragraph = Paragraph::new(line)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

/// Get command hint for autocompletion
fn command_hint(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let commands = [
        ("refresh", "Re-fetch greeting and lock state"),
        ("set", "set <message>: update the greeting"),
        ("unlock", "Unlock the contract"),
        ("balance", "Contract and wallet balances"),
        ("endpoint", "endpoint [n]: switch endpoint"),
        ("copy", "Copy contract address"),
        ("help", "Toggle help"),
        ("quit", "Quit"),
    ];

    for (cmd, desc) in commands {
        if cmd.starts_with(input.split_whitespace().next().unwrap_or("")) {
            return Some(desc);
        }
    }
    None
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Command => {
            let hint = command_hint(&app.command.input);
            let hint_text = hint.unwrap_or("refresh | set <msg> | unlock | balance | endpoint [n]");
            Line::from(vec![
                Span::styled(": ", Style::default().fg(Color::Yellow)),
                Span::raw(app.command.input.clone()),
                Span::styled(
                    format!("  {}", hint_text),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        InputMode::Form => {
            if let Some((text, level)) = app.toast_text() {
                let color = match level {
                    ToastLevel::Info => Color::LightBlue,
                    ToastLevel::Loading => Color::LightYellow,
                    ToastLevel::Success => Color::LightGreen,
                    ToastLevel::Warn => Color::LightYellow,
                    ToastLevel::Error => Color::LightRed,
                };
                Line::from(vec![
                    Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(text.to_string(), Style::default().fg(color)),
                ])
            } else {
                action_hints(app)
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn action_hints(app: &App) -> Line<'static> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::LightCyan));
    if app.form.focus() == FormFocus::Input {
        return Line::from(vec![
            key("Enter"),
            Span::raw(" Submit  "),
            key("Tab"),
            Span::raw(" Next  "),
            key("Esc"),
            Span::raw(" Leave input  "),
            key("Ctrl-c"),
            Span::raw(" Quit"),
        ]);
    }
    Line::from(vec![
        key("Tab"),
        Span::raw(" Focus  "),
        key("Enter"),
        Span::raw(" Press  "),
        key("i"),
        Span::raw(" Edit  "),
        key("r"),
        Span::raw(" Refresh  "),
        key("u"),
        Span::raw(" Unlock  "),
        key(":"),
        Span::raw(" Command  "),
        key("?"),
        Span::raw(" Help  "),
        key("q"),
        Span::raw(" Quit"),
    ])
}

fn draw_help_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup_area = layout::centered_rect(72, 70, area);
    f.render_widget(Clear, popup_area);

    let config_path = config::config_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(unknown)".to_string());

    let mut lines = vec![
        Line::from("Form"),
        Line::from("  type       Edit the new greeting (1-90 chars)"),
        Line::from("  Enter      Submit / press focused button"),
        Line::from("  Tab        Cycle input / Submit / Unlock"),
        Line::from("  Esc        Leave the input"),
        Line::from(""),
        Line::from("Shortcuts (outside the input)"),
        Line::from("  i / e      Edit greeting"),
        Line::from("  r          Refresh greeting and lock state"),
        Line::from("  u          Unlock contract"),
        Line::from("  b          Balances"),
        Line::from("  y / c      Copy contract address"),
        Line::from("  :          Command line"),
        Line::from("  ?          Toggle help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from("Commands"),
        Line::from("  :refresh  :set <msg>  :unlock  :balance"),
        Line::from("  :endpoint [n]  :copy  :quit"),
        Line::from(""),
        Line::from(format!(
            "Values: setMessage {}  unlock {}",
            app.message_value, app.unlock_value
        )),
        Line::from(format!("Config: {config_path}")),
        Line::from(""),
        Line::from("Endpoints"),
    ];
    for (idx, label) in app.endpoints.iter().enumerate() {
        let marker = if idx == app.endpoint_index { "*" } else { " " };
        lines.push(Line::from(format!(" {marker}{}  {label}", idx + 1)));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

fn short_addr(value: &str) -> String {
    let value = value.trim();
    if value.len() <= 12 {
        return value.to_string();
    }
    format!("{}..{}", &value[..6], &value[value.len() - 4..])
}

fn short_hash(value: &str, len: usize) -> String {
    if value.len() <= len {
        return value.to_string();
    }
    format!("{}…", &value[..len])
}
