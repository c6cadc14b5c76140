//! Terminal rendering. Pure view over [`App`] state; no mutation happens
//! here except the spinner tick driven by the main loop.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::assets::{BannerSource, IconSource, GRADIENTS};
use crate::card::{CardView, ErrorCard, GuildCard, UserCard};
use crate::models::EntityKind;
use crate::theme::ColorScheme;

const MIN_WIDTH: u16 = 44;
const MIN_HEIGHT: u16 = 14;

pub fn draw(f: &mut Frame, app: &App) {
    let colors = app.theme();
    let area = f.area();

    f.render_widget(
        Block::default().style(Style::default().bg(colors.background).fg(colors.text)),
        area,
    );

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = Paragraph::new(format!(
            "Terminal too small\nNeed at least {MIN_WIDTH}x{MIN_HEIGHT}"
        ))
        .alignment(Alignment::Center)
        .style(Style::default().fg(colors.error));
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header tabs
            Constraint::Length(3), // input bar
            Constraint::Min(5),    // card
            Constraint::Length(1), // footer
        ])
        .split(area);

    draw_header(f, app, &colors, chunks[0]);
    draw_input(f, app, &colors, chunks[1]);
    draw_card(f, app, &colors, chunks[2]);
    draw_footer(f, app, &colors, chunks[3]);

    if let Some(msg) = app.toast() {
        draw_toast(f, msg, &colors, area);
    }
}

fn draw_header(f: &mut Frame, app: &App, colors: &ColorScheme, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(16)])
        .split(area);

    let selected = match app.kind() {
        EntityKind::User => 0,
        EntityKind::Guild => 1,
    };
    let tabs = Tabs::new(vec![Line::from(" User "), Line::from(" Server ")])
        .select(selected)
        .style(Style::default().fg(colors.text_dim))
        .highlight_style(
            Style::default()
                .fg(colors.selection_fg)
                .bg(colors.selection_bg)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|")
        .block(Block::default().title(Span::styled(
            " snowcard ",
            Style::default().fg(colors.badge).add_modifier(Modifier::BOLD),
        )));
    f.render_widget(tabs, cols[0]);

    let token_status = if app.has_token() {
        Span::styled("token set", Style::default().fg(colors.toast_success))
    } else {
        Span::styled("no token", Style::default().fg(colors.text_dim))
    };
    f.render_widget(
        Paragraph::new(Line::from(token_status)).alignment(Alignment::Right),
        cols[1],
    );
}

fn draw_input(f: &mut Frame, app: &App, colors: &ColorScheme, area: Rect) {
    let editing_id = app.input_mode() == InputMode::EditId;
    let editing_token = app.input_mode() == InputMode::EditToken;

    let (title, content) = if editing_token {
        // Token characters are never echoed.
        (
            " Bot token (Enter save, Esc cancel) ",
            "•".repeat(app.token_input().chars().count()),
        )
    } else {
        (" Snowflake ID ", app.input().to_string())
    };

    let border_color = if editing_id || editing_token {
        colors.focus_border
    } else {
        colors.unfocused_border
    };

    let input = Paragraph::new(content.as_str())
        .style(Style::default().fg(colors.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(title),
        );
    f.render_widget(input, area);

    if editing_id || editing_token {
        let x = area.x + 1 + content.chars().count() as u16;
        if x < area.x + area.width - 1 {
            f.set_cursor_position((x, area.y + 1));
        }
    }
}

fn draw_card(f: &mut Frame, app: &App, colors: &ColorScheme, area: Rect) {
    // Shake cue: jitter the card block horizontally while active.
    let offset = app.shake_offset();
    let area = Rect {
        x: area.x + offset,
        width: area.width.saturating_sub(offset),
        ..area
    };

    let is_error = matches!(app.card(), CardView::Error(_));
    let border_color = if is_error { colors.error } else { colors.unfocused_border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Card ");

    let lines = match app.card() {
        CardView::Idle => idle_lines(colors),
        CardView::Loading => skeleton_lines(app, colors),
        CardView::User(user) => user_lines(user, colors),
        CardView::Guild(guild) => guild_lines(guild, app.sel_feature(), colors),
        CardView::Error(err) => error_lines(err, colors),
    };

    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll(), 0))
        .block(block);
    f.render_widget(card, area);
}

fn idle_lines(colors: &ColorScheme) -> Vec<Line<'static>> {
    vec![
        Line::default(),
        Line::from(Span::styled(
            "  Enter a snowflake ID to look up a profile.",
            Style::default().fg(colors.text_dim),
        )),
        Line::from(Span::styled(
            "  Press / to edit, Tab to switch User/Server.",
            Style::default().fg(colors.text_dim),
        )),
    ]
}

fn skeleton_lines(app: &App, colors: &ColorScheme) -> Vec<Line<'static>> {
    let dim = Style::default().fg(colors.text_dim);
    vec![
        Line::default(),
        Line::from(Span::styled(format!("  {} Loading…", app.spinner()), dim)),
        Line::default(),
        Line::from(Span::styled("  ▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒", dim)),
        Line::from(Span::styled("  ▒▒▒▒▒▒▒▒▒▒▒▒", dim)),
        Line::from(Span::styled("  ▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒", dim)),
    ]
}

fn banner_line(banner: &BannerSource, colors: &ColorScheme) -> Line<'static> {
    match banner {
        BannerSource::Image(img) => Line::from(vec![
            Span::styled("  banner ", Style::default().fg(colors.text_dim)),
            Span::raw(img.still.clone()),
            animated_tag(img.animated.is_some(), colors),
        ]),
        BannerSource::Color(css) => Line::from(vec![
            Span::styled("  banner ", Style::default().fg(colors.text_dim)),
            Span::styled(
                format!("████████ {css}"),
                Style::default().fg(css_color(css).unwrap_or(colors.text_dim)),
            ),
        ]),
        BannerSource::Gradient(i) => {
            let (from, to) = GRADIENTS[*i];
            Line::from(vec![
                Span::styled("  banner ", Style::default().fg(colors.text_dim)),
                Span::styled(
                    "████",
                    Style::default().fg(css_color(from).unwrap_or(colors.text_dim)),
                ),
                Span::styled(
                    "████",
                    Style::default().fg(css_color(to).unwrap_or(colors.text_dim)),
                ),
                Span::styled(format!(" {from} → {to}"), Style::default().fg(colors.text_dim)),
            ])
        }
    }
}

fn icon_line(label: &'static str, icon: &IconSource, colors: &ColorScheme) -> Line<'static> {
    let dim = Style::default().fg(colors.text_dim);
    match icon {
        IconSource::Image(img) => Line::from(vec![
            Span::styled(format!("  {label} "), dim),
            Span::raw(img.still.clone()),
            animated_tag(img.animated.is_some(), colors),
        ]),
        IconSource::DefaultIndex(i) => Line::from(vec![
            Span::styled(format!("  {label} "), dim),
            Span::raw(crate::assets::default_avatar_url(*i)),
            Span::styled(" (stock)", dim),
        ]),
        IconSource::Glyph { letter, gradient } => {
            let (from, _) = GRADIENTS[*gradient];
            Line::from(vec![
                Span::styled(format!("  {label} "), dim),
                Span::styled(
                    format!("[{letter}]"),
                    Style::default()
                        .fg(css_color(from).unwrap_or(colors.badge))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" letter glyph", dim),
            ])
        }
    }
}

fn animated_tag(animated: bool, colors: &ColorScheme) -> Span<'static> {
    if animated {
        Span::styled(" [animated]", Style::default().fg(colors.badge))
    } else {
        Span::raw("")
    }
}

fn user_lines(user: &UserCard, colors: &ColorScheme) -> Vec<Line<'static>> {
    let dim = Style::default().fg(colors.text_dim);
    let mut lines = vec![Line::default()];

    let mut name_spans = vec![Span::styled(
        format!("  {}", user.display_name),
        Style::default().fg(colors.text).add_modifier(Modifier::BOLD),
    )];
    if user.bot {
        name_spans.push(Span::styled(
            " [BOT]",
            Style::default().fg(colors.selection_fg).bg(colors.selection_bg),
        ));
    }
    lines.push(Line::from(name_spans));
    lines.push(Line::from(Span::styled(format!("  @{}", user.username), dim)));
    lines.push(Line::default());
    lines.push(banner_line(&user.banner, colors));
    lines.push(icon_line("avatar", &user.avatar, colors));
    lines.push(Line::default());

    if user.badges.is_empty() {
        lines.push(Line::from(Span::styled("  No public badges", dim)));
    } else {
        let mut spans = vec![Span::styled("  badges ", dim)];
        for (i, badge) in user.badges.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                format!("◆ {}", badge.label),
                Style::default().fg(colors.badge),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("  Created ", dim),
        Span::raw(user.created.clone()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  ID ", dim),
        Span::raw(user.id.clone()),
    ]));

    if !user.activities.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "  Recent activity",
            Style::default().fg(colors.text).add_modifier(Modifier::BOLD),
        )));
        for act in &user.activities {
            let mut spans = vec![
                Span::styled("   · ", dim),
                Span::raw(act.title.clone()),
            ];
            if let Some(desc) = &act.description {
                spans.push(Span::styled(format!(" — {desc}"), dim));
            }
            if let Some(meta) = &act.meta {
                spans.push(Span::styled(format!("  {meta}"), dim));
            }
            lines.push(Line::from(spans));
        }
    }

    lines
}

fn guild_lines(guild: &GuildCard, sel_feature: usize, colors: &ColorScheme) -> Vec<Line<'static>> {
    let dim = Style::default().fg(colors.text_dim);
    let mut lines = vec![Line::default()];

    lines.push(Line::from(Span::styled(
        format!("  {}", guild.name),
        Style::default().fg(colors.text).add_modifier(Modifier::BOLD),
    )));
    if let Some(desc) = &guild.description {
        lines.push(Line::from(Span::styled(format!("  {desc}"), dim)));
    }
    lines.push(Line::default());
    lines.push(banner_line(&guild.banner, colors));
    lines.push(icon_line("icon", &guild.icon, colors));
    lines.push(Line::default());

    let mut counts = Vec::new();
    if let Some(m) = &guild.counts.members {
        counts.push(format!("{m} members"));
    }
    if let Some(o) = &guild.counts.online {
        counts.push(format!("{o} online"));
    }
    if let Some(b) = &guild.counts.boosts {
        counts.push(format!("{b} boosts"));
    }
    if !counts.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("  ", dim),
            Span::styled(counts.join("  ·  "), Style::default().fg(colors.badge)),
        ]));
        lines.push(Line::default());
    }

    lines.push(Line::from(vec![
        Span::styled("  Created ", dim),
        Span::raw(guild.created.clone()),
    ]));
    for (label, value) in &guild.meta {
        lines.push(Line::from(vec![
            Span::styled(format!("  {label} "), dim),
            Span::raw(value.clone()),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("  ID ", dim),
        Span::raw(guild.id.clone()),
    ]));

    if !guild.features.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "  Features (j/k to browse)",
            Style::default().fg(colors.text).add_modifier(Modifier::BOLD),
        )));
        let mut spans = vec![Span::raw("  ")];
        for (i, (name, _)) in guild.features.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let style = if i == sel_feature {
                Style::default().fg(colors.selection_fg).bg(colors.selection_bg)
            } else {
                Style::default().fg(colors.badge)
            };
            spans.push(Span::styled(format!(" {name} "), style));
        }
        lines.push(Line::from(spans));
        if let Some((_, info)) = guild.features.get(sel_feature) {
            lines.push(Line::from(Span::styled(format!("  {info}"), dim)));
        }
    }

    lines
}

fn error_lines(err: &ErrorCard, colors: &ColorScheme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            format!("  ✗ {}", err.message),
            Style::default().fg(colors.error).add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(detail) = &err.detail {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "  Response body:",
            Style::default().fg(colors.text_dim),
        )));
        for raw in detail.lines().take(12) {
            lines.push(Line::from(Span::styled(
                format!("  {raw}"),
                Style::default().fg(colors.text_dim),
            )));
        }
    }
    lines
}

fn draw_footer(f: &mut Frame, app: &App, colors: &ColorScheme, area: Rect) {
    let hints = match app.input_mode() {
        InputMode::EditId => "Enter submit · Esc done · Ctrl+U clear",
        InputMode::EditToken => "Enter save · Esc cancel",
        InputMode::Normal => {
            "/ edit · Tab kind · Enter submit · c copy card · y copy ID · b token · t theme · r motion · q quit"
        }
    };
    f.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(colors.text_dim))),
        area,
    );
}

fn draw_toast(f: &mut Frame, msg: &str, colors: &ColorScheme, area: Rect) {
    let width = (msg.chars().count() as u16 + 4).min(area.width);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(4),
        width,
        height: 3,
    };
    f.render_widget(Clear, rect);
    let toast = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(colors.toast_success))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.toast_success)),
        );
    f.render_widget(toast, rect);
}

/// Parse a `#rrggbb` CSS hex color into a terminal color.
fn css_color(css: &str) -> Option<Color> {
    let hex = css.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let n = u32::from_str_radix(hex, 16).ok()?;
    Some(Color::Rgb((n >> 16) as u8, (n >> 8) as u8, n as u8))
}
