use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, FormField};
use crate::form::MessageKind;
use crate::markup::{display_or_placeholder, sanitize_terminal};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Message
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    draw_user_list(f, main[0], app);
    draw_form(f, main[1], app);
    draw_message(f, chunks[2], app);
    draw_status_bar(f, chunks[3], app);

    if app.confirming_delete {
        draw_delete_confirm_popup(f, app);
    }

    if app.loading {
        draw_loading_overlay(f, &app.loading_message);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let header = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            "USERS",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(app.api.base_url(), Style::default().fg(Color::Yellow)),
        Span::raw(" | "),
        Span::styled(
            format!("{} total", app.users.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ])])
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn draw_user_list(f: &mut Frame, area: Rect, app: &App) {
    let border_color = if app.focus == Focus::List {
        Color::Cyan
    } else {
        Color::Gray
    };
    let block = Block::default()
        .title(" Users ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if app.users.is_empty() {
        let empty = Paragraph::new("No users yet.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .users
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let selected = i == app.selected;
            let name_style = if selected {
                Style::default()
                    .bg(Color::DarkGray)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            let marker = if app.form.editing_id == Some(user.id) {
                "✎ "
            } else {
                "  "
            };

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Yellow)),
                    Span::styled(
                        sanitize_terminal(display_or_placeholder(&user.name)),
                        name_style,
                    ),
                ]),
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        sanitize_terminal(display_or_placeholder(&user.email)),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("  {}", user.created_at.format("%Y-%m-%d %H:%M")),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
            ])
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn draw_form(f: &mut Frame, area: Rect, app: &App) {
    let title = if app.form.is_editing() {
        " Edit User "
    } else {
        " New User "
    };
    let border_color = if app.focus == Focus::Form {
        Color::Cyan
    } else {
        Color::Gray
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Email
            Constraint::Length(2), // Hint
            Constraint::Min(0),    // Spacer
        ])
        .split(inner);

    let field_style = |field: FormField| {
        if app.focus == Focus::Form && app.field == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        }
    };

    let name = Paragraph::new(sanitize_terminal(&app.form.name)).block(
        Block::default()
            .title(" Name ")
            .borders(Borders::ALL)
            .border_style(field_style(FormField::Name)),
    );
    f.render_widget(name, chunks[0]);

    let email = Paragraph::new(sanitize_terminal(&app.form.email)).block(
        Block::default()
            .title(" Email ")
            .borders(Borders::ALL)
            .border_style(field_style(FormField::Email)),
    );
    f.render_widget(email, chunks[1]);

    let hint = if app.form.is_editing() {
        "Enter: save changes"
    } else {
        "Enter: create"
    };
    let hint = Paragraph::new(hint)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[2]);

    // Set cursor position
    if app.focus == Focus::Form && !app.confirming_delete {
        let (chunk, text) = match app.field {
            FormField::Name => (chunks[0], &app.form.name),
            FormField::Email => (chunks[1], &app.form.email),
        };
        let offset = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        f.set_cursor_position((chunk.x.saturating_add(1).saturating_add(offset), chunk.y + 1));
    }
}

fn draw_message(f: &mut Frame, area: Rect, app: &App) {
    let Some(message) = app.form.message() else {
        return;
    };

    let color = match message.kind {
        MessageKind::Info => Color::White,
        MessageKind::Success => Color::Green,
        MessageKind::Error => Color::Red,
    };
    let text = Paragraph::new(format!(" {}", sanitize_terminal(&message.text)))
        .style(Style::default().fg(color));
    f.render_widget(text, area);
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let (mode, mode_color) = if app.confirming_delete {
        ("DELETE", Color::Red)
    } else {
        match app.focus {
            Focus::List => ("LIST", Color::Blue),
            Focus::Form => ("FORM", Color::Green),
        }
    };

    let hints = if app.confirming_delete {
        "y: confirm | n/Esc: cancel"
    } else {
        match app.focus {
            Focus::List => {
                "j/k: select | n: new | e: edit | d: delete | c: clear form | r: refresh | q: quit"
            }
            Focus::Form => "Tab: next field | Enter: submit | Esc: back to list",
        }
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", mode),
            Style::default().bg(mode_color).fg(Color::White),
        ),
        Span::raw(" "),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]));

    f.render_widget(status, area);
}

fn draw_delete_confirm_popup(f: &mut Frame, app: &App) {
    let area = centered_rect(50, 20, f.area());

    f.render_widget(Clear, area);

    let user_name = app
        .selected_user()
        .map(|u| sanitize_terminal(&u.name))
        .unwrap_or_else(|| "Unknown".to_string());

    let block = Block::default()
        .title(" Confirm Delete ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Message
            Constraint::Length(2), // Hint
            Constraint::Min(0),    // Spacer
        ])
        .split(inner);

    let message = Paragraph::new(vec![
        Line::from(Span::raw("Delete this user?")),
        Line::from(Span::styled(
            format!("\"{}\"", user_name),
            Style::default().fg(Color::Yellow),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(message, chunks[0]);

    let hint = Paragraph::new("y: yes, delete | n: no, cancel")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[1]);
}

fn draw_loading_overlay(f: &mut Frame, message: &str) {
    let area = centered_rect(40, 10, f.area());

    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Loading ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let text = Paragraph::new(message)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    f.render_widget(text, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
