//! SolFriends TUI - Actor-based terminal wallet
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - wallet provider and RPC calls

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;

use solfriends_tui::app::{AppActor, AppState, ViewState};
use solfriends_tui::config::Config;
use solfriends_tui::constants::{APP_NAME, APP_VERSION, LOG_FILE};
use solfriends_tui::messages::ui_events::{key_to_ui_event, FriendField, InputMode, Panel};
use solfriends_tui::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use solfriends_tui::models::TransferOutcome;
use solfriends_tui::network::{NetworkActor, RpcConnection};
use solfriends_tui::storage::{AddressBook, FileContactStore};
use solfriends_tui::ui::{
    centered_rect, cursor_column, format_sol, key_hint, outcome_color, render_input, shorten_address,
    status_bar_line,
};
use solfriends_tui::wallet::KeypairWallet;

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    std::fs::create_dir_all(&config.data_dir)?;

    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(&config.data_dir, LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(
        cluster = config.cluster.as_str(),
        rpc_url = config.rpc_url(),
        keypair = %config.keypair_path.display(),
        "Starting {} {}", APP_NAME, APP_VERSION
    );

    // Collaborators
    let wallet = Arc::new(KeypairWallet::from_file(&config.keypair_path));
    let connection = Arc::new(RpcConnection::new(config.rpc_url(), config.commitment.clone()));
    let address_book = AddressBook::new(Box::new(FileContactStore::new(&config.data_dir)));
    let state = AppState::new(address_book, config.cluster, connection.url());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(wallet, connection, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.view,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Title bar
            Constraint::Min(0),     // Content
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, main_chunks[0]);

    match state.view {
        ViewState::Disconnected => draw_disconnected(f, state, main_chunks[1]),
        _ => draw_connected(f, state, main_chunks[1]),
    }

    draw_status_bar(f, state, main_chunks[2]);

    // Popups
    match state.view {
        ViewState::ConnectedWithPopup => draw_add_friend_popup(f, state, area),
        ViewState::ConnectedWithConfirmation => draw_confirmation_popup(f, state, area),
        _ => {}
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let connected = match &state.wallet_address {
        Some(addr) => Span::styled(format!(" [+] {}", shorten_address(addr)), Style::default().fg(Color::Green)),
        None => Span::styled(" [-] not connected", Style::default().fg(Color::DarkGray)),
    };

    let title = Line::from(vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Magenta).bold()),
        Span::raw(" "),
        Span::styled(state.cluster.as_str().to_string(), Style::default().fg(Color::Cyan)),
        connected,
    ]);
    f.render_widget(Paragraph::new(title), area);
}

fn draw_disconnected(f: &mut Frame, state: &RenderState, area: Rect) {
    let box_area = centered_rect(50, 40, area);

    let prompt = if state.is_connecting {
        Line::from(Span::styled("Connecting...", Style::default().fg(Color::Yellow)))
    } else {
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("c", Style::default().fg(Color::Yellow).bold()),
            Span::raw(" to connect your wallet"),
        ])
    };

    let lines = vec![
        Line::from(""),
        prompt,
        Line::from(""),
        Line::from(Span::styled(format!("RPC: {}", state.rpc_url), Style::default().fg(Color::DarkGray))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Wallet ");

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, box_area);
}

fn draw_connected(f: &mut Frame, state: &RenderState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Balance
            Constraint::Min(8),     // Friends + transfer
        ])
        .split(area);

    draw_balance(f, state, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    draw_friends(f, state, columns[0]);
    draw_transfer(f, state, columns[1]);
}

fn draw_balance(f: &mut Frame, state: &RenderState, area: Rect) {
    let balance = match state.balance {
        Some(sol) => Span::styled(format!("{} SOL", format_sol(sol)), Style::default().fg(Color::Green).bold()),
        None => Span::styled("…", Style::default().fg(Color::DarkGray)),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Balance (r:refresh) ");

    let address = state.wallet_address.as_deref().unwrap_or_default();
    let line = Line::from(vec![
        balance,
        Span::styled(format!("   {}", address), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_friends(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Friends;
    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" Friends ({}) a:add Enter:pick ", state.friends.len()));

    if state.friends.is_empty() {
        let empty = Paragraph::new("No friends yet.\n\nPress 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state.friends.iter()
        .map(|friend| {
            ListItem::new(Line::from(vec![
                Span::styled(friend.name.clone(), Style::default().bold()),
                Span::styled(format!(" {}", shorten_address(&friend.address)), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let highlight_style = if is_focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style)
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_friend));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_transfer(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Recipient
            Constraint::Length(3),  // Amount
            Constraint::Min(3),     // Activity log
        ])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    let title = if state.is_submitting { " Amount (SOL) [sending...] " } else { " Amount (SOL) s:send " };

    f.render_widget(
        render_input(&state.recipient, " Recipient ", state.active_panel == Panel::Recipient, editing),
        chunks[0],
    );
    f.render_widget(
        render_input(&state.amount, title, state.active_panel == Panel::Amount, editing),
        chunks[1],
    );

    // Cursor
    if editing && state.active_panel.is_editable() {
        let field_area = if state.active_panel == Panel::Recipient { chunks[0] } else { chunks[1] };
        let max_x = field_area.x + field_area.width.saturating_sub(2);
        let text = if state.active_panel == Panel::Recipient { &state.recipient } else { &state.amount };
        let column = cursor_column(text, state.cursor_position) as u16;
        let cursor_x = (field_area.x + column + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, field_area.y + 1));
    }

    draw_activity(f, state, chunks[2]);
}

fn draw_activity(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Activity ");

    let mut lines: Vec<Line> = Vec::new();
    for record in state.activity.iter().rev() {
        let detail = match &record.outcome {
            TransferOutcome::Confirmed(sig) => format!("ok {}", shorten_address(&sig.to_string())),
            TransferOutcome::Failed(reason) => format!("failed: {}", reason),
        };
        lines.push(Line::from(vec![
            Span::styled(record.timestamp.format("%H:%M:%S ").to_string(), Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{} SOL -> {} ", format_sol(record.amount), shorten_address(&record.recipient))),
            Span::styled(detail, Style::default().fg(outcome_color(&record.outcome))),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No transfers yet this session.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let activity = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(activity, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hint = key_hint(state.view, state.input_mode);
    let bar = Paragraph::new(status_bar_line(state.status.as_ref(), hint));
    f.render_widget(bar, area);
}

fn draw_add_friend_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(60, 40, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Add Friend (Tab:field Enter:add Esc:cancel) ")
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let fields = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let on_name = state.friend_field == FriendField::Name;
    f.render_widget(render_input(&state.friend_name, " Name ", on_name, on_name), fields[0]);
    f.render_widget(render_input(&state.friend_address, " Address ", !on_name, !on_name), fields[1]);

    let (field_area, text) = if on_name {
        (fields[0], &state.friend_name)
    } else {
        (fields[1], &state.friend_address)
    };
    let max_x = field_area.x + field_area.width.saturating_sub(2);
    let cursor_x = (field_area.x + cursor_column(text, text.len()) as u16 + 1).min(max_x);
    f.set_cursor_position(Position::new(cursor_x, field_area.y + 1));
}

fn draw_confirmation_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(confirmation) = &state.confirmation else {
        return;
    };
    let popup_area = centered_rect(80, 30, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Success (Enter:OK) ")
        .style(Style::default().bg(Color::Black));

    let lines = vec![
        Line::from(Span::styled("Transfer submitted", Style::default().fg(Color::Green).bold())),
        Line::from(""),
        Line::from(Span::styled(confirmation.explorer_url.clone(), Style::default().fg(Color::Blue).underlined())),
    ];

    let banner = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(banner, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = format!(r#"
 {} {} - Keyboard Shortcuts

 SESSION
   c                  Connect wallet
   d                  Disconnect
   r                  Refresh balance

 FRIENDS
   a                  Add friend
   ↑ / ↓              Highlight friend
   Enter              Use friend as recipient

 TRANSFER
   Tab / Shift+Tab    Switch panels
   e / Enter          Edit recipient / amount
   s                  Send
   Enter (amount)     Send while editing

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#, APP_NAME, APP_VERSION);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
