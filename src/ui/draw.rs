use anyhow::Result;
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::line::NORMAL as LINE;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use ratatui::{Frame, Terminal};
use time::OffsetDateTime;
// Use Popup from tui-widgets to render modals
use tui_widgets::popup::Popup;

use crate::config::RgbColor;
use crate::focus::EntryKind;
use crate::overview::{relative_time, AgentToggle, ProfileStatus, GETTING_STARTED};
use crate::profile::ProfileField;

use super::app::{App, FormField, ProfileRow};
use super::edit::EditTarget;
use super::panes::Tab;

const TITLE: &str = "NAMO DASHBOARD v1.0";
const OVERVIEW_HELP: &str = "j/k: select  Space: toggle  1-3: section  ?: help  q: quit";
const PROFILE_HELP: &str = "j/k: nav  e: edit  a: add  x: remove  s: save  u: revert  ?: help";
const CONTACTS_HELP: &str = "j/k: nav  a: add  e: edit  x: delete  ?: help";
const EDITOR_HELP: &str = "Type to edit  Enter: done  Esc: undo edit";
const FORM_HELP: &str = "Tab/Shift+Tab: field  Enter: save contact  Esc: cancel";
const NOTICE_HELP: &str = "Enter/Esc: close";
const HELP_MODAL_FOOTER: &str = "Esc/q: close";

pub fn render<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    terminal.draw(|frame| draw_frame(frame, app))?;
    Ok(())
}

fn draw_frame(frame: &mut Frame<'_>, app: &mut App) {
    let size = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    draw_header(frame, layout[0], app);
    draw_body(frame, layout[1], app);
    draw_footer(frame, layout[2], app);
    draw_help_modal(frame, size, app);
    draw_notice_modal(frame, size, app);
}

fn draw_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let header_style = header_text_style(app);
    let left = Line::from(vec![
        Span::styled(format!(" {}", TITLE), header_style.add_modifier(Modifier::BOLD)),
        Span::styled(format!("   {}", app.active_tab.title()), muted_style(app)),
    ]);

    let mut right_spans = Vec::new();
    if app.profile.is_dirty() {
        right_spans.push(Span::styled("● unsaved changes", selection_style(app)));
        right_spans.push(Span::raw("  "));
    }
    right_spans.push(Span::styled(
        format!("slot: {} ", app.slot_key()),
        muted_style(app),
    ));
    let right = Line::from(right_spans);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right.width() as u16)])
        .split(area);

    frame.render_widget(Paragraph::new(left), chunks[0]);
    frame.render_widget(Paragraph::new(right), chunks[1]);
}

fn draw_body(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(0)])
        .split(area);

    draw_sidebar(frame, chunks[0], app);
    match app.active_tab {
        Tab::Overview => draw_overview(frame, chunks[1], app),
        Tab::Profile => draw_profile(frame, chunks[1], app),
        Tab::Contacts => draw_contacts(frame, chunks[1], app),
    }
}

fn draw_sidebar(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, false))
        .title(Span::styled(" SECTIONS ", header_text_style(app)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    for tab in Tab::ALL {
        let active = tab == app.active_tab;
        let (title_style, desc_style) = if active {
            let style = selection_style(app);
            (style.add_modifier(Modifier::BOLD), style)
        } else {
            (Style::default(), muted_style(app))
        };
        let width = inner.width as usize;
        lines.push(Line::from(Span::styled(
            format!("{:<width$}", format!(" {} {}", tab.digit(), tab.title())),
            title_style,
        )));
        lines.push(Line::from(Span::styled(
            format!("{:<width$}", format!("   {}", tab.description())),
            desc_style,
        )));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

// =============================================================================
// Overview
// =============================================================================

fn draw_overview(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(GETTING_STARTED.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area);

    draw_stats(frame, layout[0], app);
    draw_getting_started(frame, layout[1], app);
    draw_agent_settings(frame, layout[2], app);
}

fn draw_stats(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let status = ProfileStatus::of(&app.profile);
    let contact_count = app.contacts.len();
    let activity = relative_time(app.last_activity, OffsetDateTime::now_utc());

    draw_stat_card(frame, cards[0], app, "Profile Status", status.title(), status.description());
    draw_stat_card(
        frame,
        cards[1],
        app,
        "Contacts",
        &contact_count.to_string(),
        if contact_count == 1 { "Contact saved" } else { "Contacts saved" },
    );
    draw_stat_card(frame, cards[2], app, "Last Activity", &activity, "Since your last change");
}

fn draw_stat_card(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &App,
    title: &str,
    value: &str,
    caption: &str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, false))
        .title(Span::styled(format!(" {} ", title), header_text_style(app)));
    let lines = vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(caption.to_string(), muted_style(app))),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_getting_started(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, false))
        .title(Span::styled(" GETTING STARTED ", header_text_style(app)));
    let lines: Vec<Line> = GETTING_STARTED
        .iter()
        .enumerate()
        .map(|(idx, step)| {
            Line::from(vec![
                Span::styled(format!(" {}. ", idx + 1), header_text_style(app)),
                Span::raw(*step),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_agent_settings(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, true))
        .title(Span::styled(" AGENT SETTINGS ", header_text_style(app)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    for (idx, toggle) in AgentToggle::ALL.iter().enumerate() {
        let enabled = app.agent.get(*toggle);
        let highlight = idx == app.agent_selected;
        let (label_style, value_style) = line_styles(app, highlight);
        let marker = if enabled { "[on] " } else { "[off]" };
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), value_style),
            Span::styled(toggle.title().to_string(), label_style.add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("       {}", toggle.description()),
            muted_style(app),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

// =============================================================================
// Profile
// =============================================================================

fn draw_profile(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(8)])
        .split(area);

    draw_profile_form(frame, layout[0], app);
    draw_saved_summary(frame, layout[1], app);
}

fn draw_profile_form(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, true));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let header_line = Line::from(Span::styled("MY PROFILE", header_text_style(app)));
    render_header_with_separator(frame, layout[0], header_line, app, area.width);

    let rows = app.profile_rows();
    let label_width = rows.iter().map(|row| row_label(*row).len() + 1).max().unwrap_or(0);

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0;
    let mut cursor = None;
    let mut section = None;

    for (idx, row) in rows.iter().enumerate() {
        let heading = section_title(*row);
        if section != Some(heading) {
            if section.is_some() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                heading.to_string(),
                header_text_style(app).add_modifier(Modifier::BOLD),
            )));
            section = Some(heading);
        }

        let highlight = idx == app.profile_row;
        if highlight {
            selected_line = lines.len();
        }
        let line_index = lines.len();
        let (line, cursor_info) = profile_row_line(app, *row, highlight, label_width);
        if let Some(column) = cursor_info {
            cursor = Some((line_index, column));
        }
        lines.push(line);
    }

    let viewport = layout[1].height as usize;
    let scroll = (selected_line + 1).saturating_sub(viewport);
    frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), layout[1]);

    if let Some((line_idx, column)) = cursor {
        if line_idx >= scroll && line_idx < scroll + viewport {
            let x = layout[1].x.saturating_add(column as u16);
            let y = layout[1].y.saturating_add((line_idx - scroll) as u16);
            frame.set_cursor_position((x, y));
        }
    }
}

fn section_title(row: ProfileRow) -> &'static str {
    match row {
        ProfileRow::Field(_) => "Basic Information",
        ProfileRow::Entry(EntryKind::Email, _) | ProfileRow::AddEntry(EntryKind::Email) => {
            "Additional Emails"
        }
        ProfileRow::Entry(EntryKind::Phone, _) | ProfileRow::AddEntry(EntryKind::Phone) => {
            "Phone Numbers"
        }
    }
}

fn row_label(row: ProfileRow) -> String {
    match row {
        ProfileRow::Field(ProfileField::Name) => "Full Name".to_string(),
        ProfileRow::Field(ProfileField::PrimaryEmail) => "Primary Email *".to_string(),
        ProfileRow::Entry(kind, index) => format!("{} {}", kind.label(), index + 1),
        ProfileRow::AddEntry(_) => "+".to_string(),
    }
}

fn row_edit_target(row: ProfileRow) -> EditTarget {
    match row {
        ProfileRow::Field(field) => EditTarget::Field(field),
        ProfileRow::Entry(kind, index) => EditTarget::Entry(kind, index),
        ProfileRow::AddEntry(kind) => EditTarget::NewEntry(kind),
    }
}

fn profile_row_line(
    app: &App,
    row: ProfileRow,
    highlight: bool,
    label_width: usize,
) -> (Line<'static>, Option<usize>) {
    let editing = app.editor.active && app.editor.target() == Some(row_edit_target(row));
    let focused = match row {
        ProfileRow::Entry(kind, index) => app.focus.is_editing(kind, index),
        _ => false,
    };
    let (label_style, value_style) = line_styles(app, highlight || editing || focused);
    // Pad the label (including colon) to consistent width, then add space before value
    let label = format!("{:width$} ", format!("{}:", row_label(row)), width = label_width);
    let mut spans = vec![Span::styled(label.clone(), label_style)];
    let mut cursor = None;

    if editing {
        let visual_label_width = Span::raw(&label).width();
        cursor = Some(visual_label_width + app.editor.visual_cursor());
        spans.push(Span::styled(app.editor.value().to_string(), value_style));
        return (Line::from(spans), cursor);
    }

    let profile = app.profile.current();
    let (value, placeholder) = match row {
        ProfileRow::Field(ProfileField::Name) => (profile.name.as_str(), "Enter your full name"),
        ProfileRow::Field(ProfileField::PrimaryEmail) => {
            (profile.primary_email.as_str(), "you@example.com")
        }
        ProfileRow::Entry(EntryKind::Email, index) => {
            (profile.additional_emails.get(index).unwrap_or(""), "")
        }
        ProfileRow::Entry(EntryKind::Phone, index) => {
            (profile.phone_numbers.get(index).unwrap_or(""), "")
        }
        ProfileRow::AddEntry(EntryKind::Email) => ("", "Add email"),
        ProfileRow::AddEntry(EntryKind::Phone) => ("", "Add phone number"),
    };

    if value.is_empty() {
        let style = if highlight { value_style } else { muted_style(app) };
        spans.push(Span::styled(placeholder.to_string(), style));
    } else {
        spans.push(Span::styled(value.to_string(), value_style));
    }

    (Line::from(spans), cursor)
}

fn draw_saved_summary(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, false))
        .title(Span::styled(
            " SAVED CONTACT INFORMATION ",
            header_text_style(app),
        ));

    let lines = match app.profile.last_saved() {
        Some(saved) if saved.has_content() => {
            let label = |text: &str| Span::styled(format!("{:<16}", text), header_text_style(app));
            let or_dash = |value: String| if value.is_empty() { "-".to_string() } else { value };
            vec![
                Line::from(vec![label("Name"), Span::raw(or_dash(saved.name.clone()))]),
                Line::from(vec![
                    label("Primary Email"),
                    Span::raw(or_dash(saved.primary_email.clone())),
                ]),
                Line::from(vec![
                    label("Other Emails"),
                    Span::raw(or_dash(saved.additional_emails.iter().collect::<Vec<_>>().join(", "))),
                ]),
                Line::from(vec![
                    label("Phone Numbers"),
                    Span::raw(or_dash(saved.phone_numbers.as_slice().join(", "))),
                ]),
            ]
        }
        _ => vec![
            Line::from(Span::styled("No saved profile yet", muted_style(app))),
            Line::from(Span::styled(
                "Fill in your details and save to see them here",
                muted_style(app),
            )),
        ],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

// =============================================================================
// Contacts
// =============================================================================

fn draw_contacts(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let constraints = if app.contact_form.is_some() {
        [Constraint::Min(0), Constraint::Length(7)]
    } else {
        [Constraint::Min(0), Constraint::Length(0)]
    };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    draw_contact_list(frame, layout[0], app);
    draw_contact_form(frame, layout[1], app);
}

fn draw_contact_list(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, app.contact_form.is_none()))
        .title(Span::styled(
            format!(" CONTACTS ({}) ", app.contacts.len()),
            header_text_style(app),
        ));

    if app.contacts.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let lines = vec![
            Line::from(Span::styled("No contacts yet", header_text_style(app))),
            Line::from(Span::styled(
                "Press a to add your first contact",
                muted_style(app),
            )),
        ];
        let target = Rect {
            y: inner.y + inner.height.saturating_sub(2) / 2,
            height: inner.height.min(2),
            ..inner
        };
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), target);
        return;
    }

    let header = Row::new(["Name", "Email", "Phone"]).style(header_text_style(app));
    let rows = app.contacts.iter().map(|contact| {
        Row::new(vec![
            Cell::from(contact.name.clone()),
            Cell::from(contact.email.clone()),
            Cell::from(if contact.phone.is_empty() {
                "-".to_string()
            } else {
                contact.phone.clone()
            }),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(selection_style(app));

    let mut state = TableState::default().with_selected(Some(app.contact_selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_contact_form(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(form) = app.contact_form.as_ref() else {
        return;
    };
    if area.height == 0 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, true))
        .title(Span::styled(
            format!(" {} ", form.title().to_uppercase()),
            header_text_style(app),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label_width = FormField::ALL
        .iter()
        .map(|field| field.label().len() + 1)
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    let mut cursor = None;
    for field in FormField::ALL {
        let active = field == form.field;
        let (label_style, value_style) = line_styles(app, active);
        let label = format!("{:width$} ", format!("{}:", field.label()), width = label_width);
        if active {
            cursor = Some((lines.len(), Span::raw(&label).width() + form.cursor(field)));
        }
        lines.push(Line::from(vec![
            Span::styled(label, label_style),
            Span::styled(form.value(field).to_string(), value_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("* required", muted_style(app))));

    frame.render_widget(Paragraph::new(lines), inner);

    if let Some((line_idx, column)) = cursor {
        let x = inner.x.saturating_add(column as u16);
        let y = inner.y.saturating_add(line_idx as u16);
        frame.set_cursor_position((x, y));
    }
}

// =============================================================================
// Footer & modals
// =============================================================================

fn draw_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let message: String = if app.notice.is_some() {
        NOTICE_HELP.to_string()
    } else if app.show_help {
        HELP_MODAL_FOOTER.to_string()
    } else if app.editor.active {
        match &app.status {
            Some(status) => format!("{}  |  {}", status, EDITOR_HELP),
            None => EDITOR_HELP.to_string(),
        }
    } else if app.contact_form.is_some() {
        match &app.status {
            Some(status) => format!("{}  |  {}", status, FORM_HELP),
            None => FORM_HELP.to_string(),
        }
    } else {
        let hint = match app.active_tab {
            Tab::Overview => OVERVIEW_HELP,
            Tab::Profile => PROFILE_HELP,
            Tab::Contacts => CONTACTS_HELP,
        };
        match &app.status {
            Some(status) => format!("{}  |  {}", status, hint),
            None => hint.to_string(),
        }
    };
    let colors = app.ui_colors();
    let style = Style::default()
        .fg(color(colors.status_fg))
        .bg(color(colors.status_bg));

    let background = Block::default().style(Style::default().bg(color(colors.status_bg)));
    frame.render_widget(background, area);

    frame.render_widget(Paragraph::new(format!(" {}", message)).style(style), area);
}

fn draw_notice_modal(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let Some(notice) = app.notice.as_ref() else {
        return;
    };

    let body_text = Text::from(vec![
        Line::from(notice.message.clone()),
        Line::from(""),
        Line::from(Span::styled(NOTICE_HELP, muted_style(app))),
    ]);
    let title_line = Line::from(Span::styled(
        format!(" {} ", notice.title),
        header_text_style(app),
    ));
    let popup = Popup::new(body_text)
        .title(title_line)
        .border_style(border_style(app, true));

    frame.render_stateful_widget_ref(popup, area, &mut app.modal_popup);
}

fn draw_help_modal(frame: &mut Frame<'_>, area: Rect, app: &App) {
    if !app.show_help {
        return;
    }

    // 2/3 width, 80% height
    let width = area.width.saturating_mul(2).saturating_div(3).max(40).min(area.width);
    let height = area.height.saturating_mul(4).saturating_div(5).max(10).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let modal_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, modal_area);

    let header_style = header_text_style(app);
    let sections = app.help_entries();
    let mut lines: Vec<Line> = Vec::new();

    let content_width = width.saturating_sub(4) as usize;
    let action_width = 24usize;

    for (section_idx, section) in sections.iter().enumerate() {
        let header_text = format!(" {} ", section.title);
        let padding_total = content_width.saturating_sub(header_text.len());
        let left_pad = padding_total / 2;
        let right_pad = padding_total - left_pad;
        let header_line = format!(
            "{}{}{}",
            LINE.horizontal.to_string().repeat(left_pad),
            header_text,
            LINE.horizontal.to_string().repeat(right_pad)
        );
        lines.push(Line::from(Span::styled(header_line, header_style)));

        for entry in &section.entries {
            let action = format!("{:<width$}", entry.action, width = action_width);
            lines.push(Line::from(vec![
                Span::styled(action, Style::default()),
                Span::styled(entry.keys.clone(), header_style),
            ]));
        }

        if section_idx < sections.len() - 1 {
            lines.push(Line::from(""));
        }
    }

    let footer = Line::from(Span::styled(
        format!(" {} ", HELP_MODAL_FOOTER),
        header_style,
    ));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, true))
        .title(Span::styled(" HELP ", header_style))
        .title_bottom(footer)
        .title_alignment(Alignment::Center);

    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render a header line with a separator below it.
/// `outer_width` is the full pane width (including borders) for drawing connected separators.
fn render_header_with_separator(
    frame: &mut Frame<'_>,
    area: Rect,
    content: Line<'static>,
    app: &App,
    outer_width: u16,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    if area.height == 1 {
        frame.render_widget(Paragraph::new(content), area);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    frame.render_widget(Paragraph::new(content), layout[0]);

    // ├───┤ spanning the full outer width so it joins the side borders
    let inner_width = outer_width.saturating_sub(2) as usize;
    let separator = format!(
        "{}{}{}",
        LINE.vertical_right,
        LINE.horizontal.to_string().repeat(inner_width),
        LINE.vertical_left
    );
    let separator_line = Line::from(Span::styled(separator, border_style(app, true)));

    let separator_area = Rect {
        x: layout[1].x.saturating_sub(1),
        y: layout[1].y,
        width: outer_width,
        height: 1,
    };
    frame.render_widget(Paragraph::new(separator_line), separator_area);
}

fn line_styles(app: &App, highlight: bool) -> (Style, Style) {
    if highlight {
        let style = selection_style(app);
        (style, style)
    } else {
        (header_text_style(app), Style::default())
    }
}

fn selection_style(app: &App) -> Style {
    let colors = app.ui_colors();
    Style::default()
        .fg(color(colors.selection_fg))
        .bg(color(colors.selection_bg))
}

fn border_style(app: &App, active: bool) -> Style {
    let colors = app.ui_colors();
    if active {
        Style::default().fg(color(colors.accent))
    } else {
        Style::default().fg(color(colors.border))
    }
}

fn header_text_style(app: &App) -> Style {
    let colors = app.ui_colors();
    Style::default().fg(color(colors.accent))
}

fn muted_style(app: &App) -> Style {
    let colors = app.ui_colors();
    Style::default().fg(color(colors.muted))
}

fn color(rgb: RgbColor) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ratatui::backend::TestBackend;

    use super::*;
    use crate::config::Config;
    use crate::storage::MemoryStore;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_each_section() {
        let config = Config::defaults(PathBuf::from("/tmp/namo-test/config.toml")).unwrap();
        let mut store = MemoryStore::new();
        let mut app = App::new(&config, &mut store).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        render(&mut terminal, &mut app).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains(TITLE));
        assert!(text.contains("Incomplete"));
        assert!(text.contains("Phone Agent Access"));

        app.active_tab = Tab::Profile;
        render(&mut terminal, &mut app).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Basic Information"));
        assert!(text.contains("No saved profile yet"));

        app.active_tab = Tab::Contacts;
        render(&mut terminal, &mut app).unwrap();
        assert!(buffer_text(&terminal).contains("No contacts yet"));
    }
}
