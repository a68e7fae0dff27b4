use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::scores::{BestScores, GAME_NAMES, NUM_GAMES};

const BANNER: &str = r#"
 ╔══════════════════════════════════════════════════════════════════════════╗
 ║  ███╗   ███╗██╗███╗   ██╗██╗         ██████╗ █████╗ ██████╗ ███████╗     ║
 ║  ████╗ ████║██║████╗  ██║██║        ██╔════╝██╔══██╗██╔══██╗██╔════╝     ║
 ║  ██╔████╔██║██║██╔██╗ ██║██║ █████╗ ██║     ███████║██║  ██║█████╗       ║
 ║  ██║╚██╔╝██║██║██║╚██╗██║██║ ╚════╝ ██║     ██╔══██║██║  ██║██╔══╝       ║
 ║  ██║ ╚═╝ ██║██║██║ ╚████║██║        ╚██████╗██║  ██║██████╔╝███████╗     ║
 ║  ╚═╝     ╚═╝╚═╝╚═╝  ╚═══╝╚═╝         ╚═════╝╚═╝  ╚═╝╚═════╝ ╚══════╝     ║
 ╚══════════════════════════════════════════════════════════════════════════╝"#;

struct GameTile {
    key: &'static str,
    icon: &'static str,
    name: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

const GAME_TILES: [GameTile; NUM_GAMES] = [
    GameTile { key: "1", icon: "🧠", name: "Brain Twist", desc: "Quick-fire\nmental math!", color: Color::Rgb(200, 120, 255), border_color: Color::Rgb(100, 60, 140) },
    GameTile { key: "2", icon: "🚗", name: "City Racer", desc: "Dodge traffic\nin three lanes!", color: Color::Rgb(220, 80, 80), border_color: Color::Rgb(120, 40, 40) },
    GameTile { key: "3", icon: "🐦", name: "Flappy", desc: "Thread the\npipe gaps!", color: Color::Rgb(255, 215, 0), border_color: Color::Rgb(140, 110, 30) },
    GameTile { key: "4", icon: "🐍", name: "Snake", desc: "Eat apples,\ndon't bite back!", color: Color::Rgb(80, 220, 80), border_color: Color::Rgb(40, 120, 40) },
    GameTile { key: "5", icon: "🚀", name: "Space Runner", desc: "Jump obstacles\nin endless run!", color: Color::Rgb(150, 90, 220), border_color: Color::Rgb(80, 50, 120) },
];

fn render_game_tile(frame: &mut Frame, area: Rect, tile: &GameTile, selected: bool) {
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let mut lines: Vec<Line> = Vec::new();

    // Key + Icon + Name line
    let name_color = if selected { Color::Rgb(255, 255, 255) } else { tile.color };
    lines.push(Line::from(vec![
        Span::styled(format!("[{}] ", tile.key), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{} ", tile.icon), Style::default()),
        Span::styled(tile.name, Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ]));

    // Description lines
    for desc_line in tile.desc.split('\n') {
        lines.push(Line::from(vec![
            Span::styled(desc_line, Style::default().fg(if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) })),
        ]));
    }

    // Selected indicator
    if selected {
        lines.push(Line::from(vec![
            Span::styled("▶ Enter to play", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        ]));
    }

    let p = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(p, inner);
}

fn game_controls(game_idx: usize) -> Vec<Line<'static>> {
    match game_idx {
        0 => vec![ // Brain Twist
            Line::from(""),
            Line::from(vec![
                Span::styled("  🧠 Brain Twist", Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("  Ten questions, three lives!", Style::default().fg(Color::Rgb(100, 100, 120))),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("    1-4              ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Pick an answer", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    Click            ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Pick an answer", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    R                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Restart", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    P                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Pause", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
        ],
        1 => vec![ // City Racer
            Line::from(""),
            Line::from(vec![
                Span::styled("  🚗 City Racer", Style::default().fg(Color::Rgb(220, 80, 80)).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("  Weave through oncoming traffic!", Style::default().fg(Color::Rgb(100, 100, 120))),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("    ← / →            ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Change lane", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    R                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Restart", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    P                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Pause", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
        ],
        2 => vec![ // Flappy
            Line::from(""),
            Line::from(vec![
                Span::styled("  🐦 Flappy", Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("  Flap between the pipes!", Style::default().fg(Color::Rgb(100, 100, 120))),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("    Space / ↑        ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Flap", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    Click            ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Flap", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    R                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Restart", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    P                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Pause", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
        ],
        3 => vec![ // Snake
            Line::from(""),
            Line::from(vec![
                Span::styled("  🐍 Snake", Style::default().fg(Color::Rgb(80, 220, 80)).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("  Grow long, wrap the walls!", Style::default().fg(Color::Rgb(100, 100, 120))),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("    ↑ ↓ ← →         ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Steer", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    Space            ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Pause / restart", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    R                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Restart", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    P                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Pause", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
        ],
        4 => vec![ // Space Runner
            Line::from(""),
            Line::from(vec![
                Span::styled("  🚀 Space Runner", Style::default().fg(Color::Rgb(150, 90, 220)).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("  Endless runner — clear everything!", Style::default().fg(Color::Rgb(100, 100, 120))),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("    Space / ↑        ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Jump", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    Click            ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Jump", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    R                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Restart", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    P                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Pause", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
        ],
        _ => vec![],
    }
}

pub fn render_home(frame: &mut Frame, area: Rect, selected_game: usize, show_best_scores: bool, best_scores: &BestScores) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Banner
            Constraint::Length(2),  // Subtitle
            Constraint::Length(7),  // Game tiles (single row)
            Constraint::Min(10),    // Controls area
            Constraint::Length(2),  // Footer
        ])
        .split(area);

    // Banner
    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(80, 200, 255)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    // Subtitle
    let subtitle = Paragraph::new(Line::from(vec![
        Span::styled(
            "  ⚡ Five Tiny Games, One Terminal ⚡  ",
            Style::default()
                .fg(Color::Rgb(255, 220, 80))
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    // Games section title block
    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" 🎮 Games — ←→ Select, Enter to Play ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[2]);
    frame.render_widget(games_block, chunks[2]);

    // Single row of five tiles
    let tile_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
        ])
        .split(games_inner);

    for i in 0..NUM_GAMES {
        render_game_tile(frame, tile_cols[i], &GAME_TILES[i], selected_game == i);
    }

    // Controls area: split horizontally - navigation left, game controls right
    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(60),
        ])
        .split(chunks[3]);

    // Navigation Control (left)
    let controls = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  🔧 Navigation", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    Tab / Shift+Tab  ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Switch tabs", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    1-5              ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Launch game", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    ← / →            ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Select game", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    Enter            ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Play selected", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    Esc              ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Return to Home", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    q / Ctrl+C       ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Quit", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  🎮 Common", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    R                ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Restart game", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    P                ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Pause / Unpause", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Navigation Control ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls, ctrl_cols[0]);

    // Game Control (right) - shows controls for the selected game
    let game_ctrl_lines = game_controls(selected_game);
    let game_ctrl = Paragraph::new(game_ctrl_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Rgb(50, 100, 140)))
                .title(format!(" 🎮 {} Control ", GAME_TILES[selected_game].name))
                .title_style(Style::default().fg(GAME_TILES[selected_game].color).add_modifier(Modifier::BOLD)),
        );
    frame.render_widget(game_ctrl, ctrl_cols[1]);

    // Footer
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled("v0.1.0", Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled("H", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" Best Scores", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);

    // Best scores overlay
    if show_best_scores {
        render_best_scores_overlay(frame, area, best_scores);
    }
}

fn render_best_scores_overlay(frame: &mut Frame, area: Rect, best_scores: &BestScores) {
    // Center overlay
    let overlay_w = 40u16.min(area.width.saturating_sub(4));
    let overlay_h = 12u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    // Clear background
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 200, 80)))
        .title(" 🏆 Best Scores ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let icons = ["🧠", "🚗", "🐦", "🐍", "🚀"];
    let colors = [
        Color::Rgb(200, 120, 255),
        Color::Rgb(220, 80, 80),
        Color::Rgb(255, 215, 0),
        Color::Rgb(80, 220, 80),
        Color::Rgb(150, 90, 220),
    ];

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));

    for game_idx in 0..NUM_GAMES {
        let best = best_scores.best(game_idx);
        let score_span = if best > 0 {
            Span::styled(
                format!("{}", best),
                Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("—", Style::default().fg(Color::Rgb(60, 60, 80)))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", icons[game_idx]), Style::default()),
            Span::styled(
                format!("{:<14}", GAME_NAMES[game_idx]),
                Style::default().fg(colors[game_idx]).add_modifier(Modifier::BOLD),
            ),
            score_span,
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("H", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" to close", Style::default().fg(Color::Rgb(80, 80, 100))),
    ]));

    let p = Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}
