use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};

use super::app::{App, InputMode, Pane};
use crate::api::ArticleSource;
use crate::internal::models::Article;
use crate::internal::results::SearchStatus;
use crate::internal::summary::Summary;
use crate::utils::datetime::format_published_at;
use crate::utils::text::truncate_with_ellipsis;

const RESULT_TITLE_CHARS: usize = 50;
const FAVORITE_TITLE_CHARS: usize = 70;

const ACCENT: Color = Color::Yellow;
const MUTED: Color = Color::DarkGray;
const ERROR: Color = Color::Red;

#[tracing::instrument(skip(app, f))]
pub fn draw<S: ArticleSource>(app: &mut App<S>, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_top_bar(app, f, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_results(app, f, panes[0]);
    match app.session.selection().article().cloned() {
        Some(article) => render_detail(app, f, panes[1], &article),
        None => render_favorites(app, f, panes[1]),
    }

    render_status_bar(app, f, chunks[2]);
}

/// Pane frame titled with the pane name and its collapse marker.
fn pane_block<S: ArticleSource>(app: &App<S>, pane: Pane) -> Block<'static> {
    let border = match app.pane == pane {
        true => ACCENT,
        false => MUTED,
    };
    let marker = match app.is_collapsed(pane) {
        true => "+",
        false => "-",
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .padding(Padding::horizontal(1))
        .title(format!(" {} [{}] ", pane, marker))
}

fn render_top_bar<S: ArticleSource>(app: &App<S>, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22),
            Constraint::Min(10),
            Constraint::Length(22),
        ])
        .split(area);

    let logo = Paragraph::new(format!("News Tracker v{}", app.app_version))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().padding(Padding::vertical(1)));
    f.render_widget(logo, chunks[0]);

    let (input, style) = match (app.input_mode, app.session.query().is_empty()) {
        (InputMode::Search, _) => (format!("{}█", app.session.query()), Style::default()),
        (InputMode::Normal, true) => (
            "Search by keyword...".to_string(),
            Style::default().fg(MUTED),
        ),
        (InputMode::Normal, false) => (app.session.query().to_string(), Style::default()),
    };
    let border = match app.input_mode {
        InputMode::Search => ACCENT,
        InputMode::Normal => MUTED,
    };
    let search = Paragraph::new(input).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(search, chunks[1]);

    let count = app.session.results().articles().len();
    let results = Paragraph::new(format!("{} results found", count))
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::vertical(1)));
    f.render_widget(results, chunks[2]);
}

fn render_results<S: ArticleSource>(app: &mut App<S>, f: &mut Frame, area: Rect) {
    let block = pane_block(app, Pane::Results);
    if app.is_collapsed(Pane::Results) {
        f.render_widget(block, area);
        return;
    }

    match app.session.results().status() {
        SearchStatus::Loading => {
            let p = Paragraph::new("Loading...")
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(p, area);
        }
        SearchStatus::Failed(message) => {
            let p = Paragraph::new(format!("⛔ {}", message))
                .style(Style::default().fg(ERROR))
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(p, area);
        }
        SearchStatus::Idle | SearchStatus::Ready(_) => {
            let items: Vec<ListItem> = app
                .session
                .results()
                .articles()
                .iter()
                .map(|article| {
                    let favorite = match app.session.is_favorite(&article.title) {
                        true => "★ ",
                        false => "",
                    };
                    ListItem::new(vec![
                        Line::from(vec![
                            Span::styled(favorite, Style::default().fg(ACCENT)),
                            Span::raw(truncate_with_ellipsis(&article.title, RESULT_TITLE_CHARS)),
                        ]),
                        Line::from(Span::styled(
                            format!("  By: {}", article.author.as_deref().unwrap_or("unknown")),
                            Style::default().fg(MUTED),
                        )),
                    ])
                })
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            f.render_stateful_widget(list, area, &mut app.results_state);
        }
    }
}

fn summary_lines(summary: &Summary) -> Vec<Line<'static>> {
    let avg_chars = summary
        .average_content_length
        .map(|len| format!("{:.0}", len))
        .unwrap_or_else(|| "n/a".to_string());
    vec![Line::from(vec![
        Span::styled("# ", Style::default().fg(ACCENT)),
        Span::raw(format!("{} items   ", summary.count)),
        Span::styled("⭐ ", Style::default().fg(ACCENT)),
        Span::raw(format!("{:.1}   ", summary.average_rating)),
        Span::styled("chars ", Style::default().fg(ACCENT)),
        Span::raw(avg_chars),
    ])]
}

fn render_favorites<S: ArticleSource>(app: &mut App<S>, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let summary = Paragraph::new(summary_lines(&app.session.summary())).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(MUTED))
            .title(" Favorited Items "),
    );
    f.render_widget(summary, chunks[0]);

    if app.is_collapsed(Pane::Favorites) {
        f.render_widget(pane_block(app, Pane::Favorites), chunks[1]);
        return;
    }

    let items: Vec<ListItem> = app
        .session
        .favorites()
        .items()
        .iter()
        .map(|favorite| {
            ListItem::new(vec![
                Line::from(truncate_with_ellipsis(favorite.title(), FAVORITE_TITLE_CHARS)),
                Line::from(Span::styled(
                    format!("  ⭐ {} rating", favorite.rating),
                    Style::default().fg(MUTED),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(pane_block(app, Pane::Favorites))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, chunks[1], &mut app.favorites_state);
}

fn rating_line<S: ArticleSource>(app: &App<S>, article: &Article) -> Line<'static> {
    match app.session.rating_of(&article.title) {
        Some(rating) => Line::from(format!(
            "You rated the current article {} out of 5.",
            rating
        )),
        None => {
            let stars: String = (1..=5)
                .map(|i| match i <= app.pending_rating {
                    true => '★',
                    false => '☆',
                })
                .collect();
            let mut spans = vec![Span::styled(stars, Style::default().fg(ACCENT))];
            if app.pending_rating > 0 {
                spans.push(Span::raw("   [a] + Add to list"));
            }
            Line::from(spans)
        }
    }
}

fn field_line(label: &'static str, value: Option<&str>) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(value.unwrap_or("unknown").to_string()),
    ])
}

fn render_detail<S: ArticleSource>(app: &App<S>, f: &mut Frame, area: Rect, article: &Article) {
    let published = article.published_at.as_deref().map(|raw| {
        format_published_at(raw).unwrap_or_else(|| raw.to_string())
    });

    let lines = vec![
        Line::from(Span::styled(
            article.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        rating_line(app, article),
        Line::from(""),
        field_line("Written by: ", article.author.as_deref()),
        field_line("Published by: ", article.source.name.as_deref()),
        field_line("Published at: ", published.as_deref()),
        field_line("Description: ", article.description.as_deref()),
        Line::from(""),
        Line::from(Span::styled(
            article.url.clone().unwrap_or_default(),
            Style::default().fg(MUTED).add_modifier(Modifier::UNDERLINED),
        )),
    ];

    let p = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .padding(Padding::horizontal(1))
            .title(" Article "),
    );
    f.render_widget(p, area);
}

fn render_status_bar<S: ArticleSource>(app: &App<S>, f: &mut Frame, area: Rect) {
    let status = match (&app.status_message, app.input_mode) {
        (Some(message), _) => message.clone(),
        (None, InputMode::Search) => "Type to search | Backspace: Delete | Enter/Esc: Done".to_string(),
        (None, InputMode::Normal) => match app.session.selection().is_selected() {
            true => "1-5: Rate | a: Add | o: Open | Space/Esc: Close | q: Quit".to_string(),
            false => format!(
                "Enter or /: Search | Tab: {} | j/k: Move | Space: Open | c: Collapse | d: Delete | q: Quit",
                app.pane
            ),
        },
    };

    let p = Paragraph::new(status).style(Style::default().fg(MUTED));
    f.render_widget(p, area);
}
