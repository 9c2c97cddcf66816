//! UI rendering for the chat screen
//!
//! One screen, web-chat shaped: a conversation sidebar on the left, the
//! active transcript with per-message sentiment badges on the right.

use crate::sentiment::{ANALYZING_LABEL, ERROR_LABEL};
use crate::session::{Message, Role, SentimentAnnotation};
use crate::tui::app::App;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Main UI rendering function
pub fn ui(f: &mut Frame, app: &App) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(40)])
        .split(size);

    render_sidebar(f, app, chunks[0]);
    render_chat(f, app, chunks[1]);
}

/// Render the conversation list sidebar
fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let conversations = app.controller.conversations();

    if conversations.is_empty() {
        let empty_msg = Paragraph::new("No conversations yet.\nCtrl+N starts a new one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Conversations"))
            .wrap(Wrap { trim: true });
        f.render_widget(empty_msg, area);
        return;
    }

    let active_id = app.controller.active_conversation_id();
    let items: Vec<ListItem> = conversations
        .iter()
        .map(|conversation| {
            let selected = active_id == Some(conversation.id.as_str());
            let marker = if selected { "→ " } else { "  " };
            let title_style = if selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let title_line = Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(conversation.title.clone(), title_style),
                Span::raw(" "),
                Span::styled(
                    capitalise(&conversation.overall_sentiment),
                    Style::default().fg(sentiment_color(&conversation.overall_sentiment)),
                ),
            ]);
            let detail_line = Line::from(vec![
                Span::raw("    "),
                Span::styled(conversation.preview(), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("  {}", format_relative_date(conversation.last_activity)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            ListItem::new(vec![title_line, detail_line])
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Conversations ({})", conversations.len())),
    );
    f.render_widget(list, area);
}

/// Render the active conversation: header, transcript, input, help line
fn render_chat(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Transcript
            Constraint::Length(3), // Input box
            Constraint::Length(3), // Help
        ])
        .split(area);

    let active = app
        .controller
        .active_conversation_id()
        .and_then(|id| app.controller.store().get(id));

    // Header: conversation title plus its aggregate sentiment
    let header_line = match active {
        Some(conversation) => Line::from(vec![
            Span::styled(
                conversation.title.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                capitalise(&conversation.overall_sentiment),
                Style::default()
                    .fg(sentiment_color(&conversation.overall_sentiment))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(Span::styled(
            "Welcome to Solace",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    };
    let header = Paragraph::new(header_line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    // Transcript
    let messages = app.controller.working_messages();
    if active.is_none() {
        let welcome = Paragraph::new(
            "This is a place where you can express yourself freely.\n\
             Your thoughts and feelings are valid. I'm here to listen.\n\n\
             Press Ctrl+N to start a conversation.",
        )
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Messages"));
        f.render_widget(welcome, chunks[1]);
    } else if messages.is_empty() {
        let empty_msg = Paragraph::new("Send a message to begin.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Messages"));
        f.render_widget(empty_msg, chunks[1]);
    } else {
        let mut lines: Vec<Line> = Vec::new();
        for message in messages {
            lines.extend(message_lines(message));
        }

        // Keep the tail visible: the newest message always fits the frame.
        let visible_height = chunks[1].height.saturating_sub(2) as usize;
        let skip = lines.len().saturating_sub(visible_height);
        let tail: Vec<Line> = lines.into_iter().skip(skip).collect();

        let transcript = Paragraph::new(tail).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Messages ({})", messages.len())),
        );
        f.render_widget(transcript, chunks[1]);
    }

    // Input box
    let input_title = if app.controller.busy() {
        "Waiting for reply..."
    } else {
        "Express yourself here"
    };
    let input = Paragraph::new(app.controller.input())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(input_title));
    f.render_widget(input, chunks[2]);

    // Help line
    let help = Paragraph::new(
        "Enter: Send | Tab/Up/Down: Switch conversation | Ctrl+N: New | Ctrl+D: Delete | Esc: Quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

/// Render one message as transcript lines, badges included
fn message_lines(message: &Message) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let (label, color) = match message.role {
        Role::User => ("You: ", Color::Green),
        Role::Assistant => ("Assistant: ", Color::Blue),
    };
    lines.push(Line::from(vec![
        Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(message.content.clone(), Style::default().fg(Color::White)),
    ]));

    if let Some(annotation) = &message.sentiment {
        lines.push(badge_line(annotation));
    }

    lines
}

/// The sentiment badge line under a user message
fn badge_line(annotation: &SentimentAnnotation) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];

    if annotation.pending {
        spans.push(Span::styled(
            format!("[{}]", ANALYZING_LABEL),
            Style::default().fg(Color::DarkGray),
        ));
    } else if annotation.emotion_label == ERROR_LABEL {
        spans.push(Span::styled(
            format!("[{}]", ERROR_LABEL),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(
            format!(
                "[{} {:.0}%]",
                capitalise(&annotation.emotion_label),
                annotation.emotion_confidence
            ),
            Style::default().fg(sentiment_color(&annotation.emotion_label)),
        ));
        if annotation.sarcasm_detected {
            spans.push(Span::styled(
                format!(" [Sarcastic: {}]", annotation.sarcasm_reason),
                Style::default().fg(Color::Magenta),
            ));
        }
    }

    Line::from(spans)
}

/// Map an emotion label to a terminal color
///
/// Labels are grouped into positive / sadness / anger / fear / neutral
/// buckets; unknown labels get their own hue rather than falling back to
/// gray, which is reserved for the transient states.
pub fn sentiment_color(emotion_label: &str) -> Color {
    if emotion_label.is_empty()
        || emotion_label == ANALYZING_LABEL
        || emotion_label == ERROR_LABEL
    {
        return Color::DarkGray;
    }
    match emotion_label.to_lowercase().as_str() {
        "happy" | "joy" | "admiration" | "amusement" | "love" | "caring" | "optimism"
        | "excitement" | "gratitude" | "pride" | "relief" => Color::Green,
        "sadness" | "grief" | "disappointment" | "remorse" | "embarrassment" => Color::Blue,
        "anger" | "annoyance" | "disapproval" => Color::Red,
        "fear" | "nervousness" | "confusion" | "curiosity" => Color::Yellow,
        "neutral" | "realization" | "desire" => Color::Gray,
        _ => Color::Magenta,
    }
}

/// Uppercase the first letter, lowercase the rest
pub fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Format a timestamp relative to now, web-chat style
pub fn format_relative_date(timestamp: DateTime<Utc>) -> String {
    let days = (Utc::now() - timestamp).num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d < 7 => format!("{} days ago", d),
        _ => timestamp.format("%Y-%m-%d").to_string(),
    }
}
