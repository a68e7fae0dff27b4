use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::audio::Jukebox;
use crate::games::{Game, Hitbox, Screen};

const BIRD_X: f32 = 8.0;
const BIRD_W: f32 = 4.0;
const BIRD_H: f32 = 2.0;
const GRAVITY: f32 = 0.02;
const FLAP: f32 = -0.35;
const PIPE_W: f32 = 7.0;
// Vertical gap between a pipe pair, constant no matter where the pair sits
const GAP: f32 = 8.0;
const MIN_TOP: f32 = 3.0;
const PIPE_SPEED: f32 = 0.3;
const SPAWN_EVERY: u64 = 120;
// The pipes are forgiving: only the middle 40% of their width is solid
const SIDE_PAD: f32 = 0.3;

#[derive(Clone)]
struct Pipe {
    x: f32,
    top: f32,
    passed: bool,
}

pub struct Flappy {
    screen: Screen,
    bird_y: f32,
    bird_vel: f32,
    pipes: Vec<Pipe>,
    score: u32,
    high_score: u32,
    tick: u64,
    rng: StdRng,
    // Updated each render
    field_width: usize,
    field_height: usize,
}

impl Flappy {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            screen: Screen::Instructions,
            bird_y: 10.0,
            bird_vel: 0.0,
            pipes: Vec::new(),
            score: 0,
            high_score: 0,
            tick: 0,
            rng,
            field_width: 60,
            field_height: 24,
        }
    }

    fn spawn_pipe(&mut self) {
        let max_top = (self.field_height as f32 - GAP - MIN_TOP).max(MIN_TOP);
        let top = self.rng.gen_range(MIN_TOP..=max_top);
        self.pipes.push(Pipe {
            x: self.field_width as f32,
            top,
            passed: false,
        });
    }

    fn bird_hitbox(&self) -> Hitbox {
        Hitbox::new(BIRD_X, self.bird_y, BIRD_W, BIRD_H)
    }

    fn pipe_hitboxes(&self, pipe: &Pipe) -> (Hitbox, Hitbox) {
        let pad = PIPE_W * SIDE_PAD;
        let solid_x = pipe.x + pad;
        let solid_w = PIPE_W - 2.0 * pad;
        let bottom_y = pipe.top + GAP;
        (
            Hitbox::new(solid_x, 0.0, solid_w, pipe.top),
            Hitbox::new(solid_x, bottom_y, solid_w, self.field_height as f32 - bottom_y),
        )
    }

    fn flap(&mut self, audio: &Jukebox) {
        self.bird_vel = FLAP;
        audio.jump();
    }

    /// Context-sensitive action shared by Space and mouse click.
    fn action(&mut self, audio: &Jukebox) {
        match self.screen {
            Screen::Instructions => {
                self.screen = Screen::Playing;
                audio.start();
                self.flap(audio);
            }
            Screen::Playing => self.flap(audio),
            Screen::GameOver => {
                self.reset();
                self.screen = Screen::Playing;
            }
            Screen::Paused => {}
        }
    }

    fn set_game_over(&mut self, audio: &Jukebox) {
        self.screen = Screen::GameOver;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        audio.game_over();
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut grid: Vec<Vec<(char, Style)>> =
            vec![vec![(' ', Style::default()); width]; height];

        // Sky with drifting star specks
        for (y, row) in grid.iter_mut().enumerate() {
            let sky = Style::default()
                .fg(Color::Rgb(140, 190, 210))
                .bg(Color::Rgb(20, 40, 60));
            for (x, cell) in row.iter_mut().enumerate() {
                let drift = x + self.tick as usize / 6;
                let ch = if drift.wrapping_mul(31).wrapping_add(y * 17) % 97 == 0 {
                    '·'
                } else {
                    ' '
                };
                *cell = (ch, sky);
            }
        }

        // Pipes
        let pipe_body = Style::default()
            .fg(Color::Rgb(46, 139, 87))
            .bg(Color::Rgb(26, 90, 50));
        let pipe_lip = Style::default()
            .fg(Color::Rgb(80, 180, 110))
            .bg(Color::Rgb(26, 90, 50))
            .add_modifier(Modifier::BOLD);
        for pipe in &self.pipes {
            let left = pipe.x as i32;
            let top_end = pipe.top as usize;
            let bottom_start = (pipe.top + GAP) as usize;
            for dx in 0..PIPE_W as i32 {
                let x = left + dx;
                if x < 0 || x as usize >= width {
                    continue;
                }
                let x = x as usize;
                for y in 0..height {
                    if y < top_end || y >= bottom_start {
                        let lip = y + 1 == top_end || y == bottom_start;
                        let style = if lip { pipe_lip } else { pipe_body };
                        let ch = if dx == 0 || dx == PIPE_W as i32 - 1 {
                            '║'
                        } else if lip {
                            '▬'
                        } else {
                            '█'
                        };
                        grid[y][x] = (ch, style);
                    }
                }
            }
        }

        // Bird: 4x2 glyph sprite
        let by = self.bird_y as i32;
        let bird_style = Style::default()
            .fg(Color::Rgb(255, 215, 0))
            .bg(Color::Rgb(20, 40, 60))
            .add_modifier(Modifier::BOLD);
        let wings_up = self.tick % 10 < 5;
        let sprite: [&str; 2] = if wings_up {
            ["«▙█▶", " ▜▛ "]
        } else {
            [" ▟▙▶", "«▛▜ "]
        };
        for (dy, row_str) in sprite.iter().enumerate() {
            let y = by + dy as i32;
            if y < 0 || y as usize >= height {
                continue;
            }
            for (dx, ch) in row_str.chars().enumerate() {
                let x = BIRD_X as usize + dx;
                if x < width && ch != ' ' {
                    grid[y as usize][x] = (ch, bird_style);
                }
            }
        }

        grid.into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

impl Game for Flappy {
    fn update(&mut self, audio: &Jukebox) {
        if self.screen != Screen::Playing {
            return;
        }

        self.tick += 1;

        // Bird physics
        self.bird_vel += GRAVITY;
        self.bird_y += self.bird_vel;
        if self.bird_y < 0.0 || self.bird_y + BIRD_H > self.field_height as f32 {
            self.set_game_over(audio);
            return;
        }

        if self.tick % SPAWN_EVERY == 1 {
            self.spawn_pipe();
        }

        for pipe in &mut self.pipes {
            pipe.x -= PIPE_SPEED;
            if !pipe.passed && pipe.x + PIPE_W < BIRD_X {
                pipe.passed = true;
                self.score += 1;
                if self.score > self.high_score {
                    self.high_score = self.score;
                }
            }
        }

        let bird = self.bird_hitbox();
        let crashed = self.pipes.iter().any(|pipe| {
            let (top_box, bottom_box) = self.pipe_hitboxes(pipe);
            bird.overlaps(&top_box) || bird.overlaps(&bottom_box)
        });

        self.pipes.retain(|pipe| pipe.x + PIPE_W > 0.0);

        if crashed {
            self.set_game_over(audio);
        }
    }

    fn handle_input(&mut self, key: KeyEvent, audio: &Jukebox) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Char('p') | KeyCode::Char('P') => match self.screen {
                Screen::Playing => self.screen = Screen::Paused,
                Screen::Paused => self.screen = Screen::Playing,
                Screen::Instructions | Screen::GameOver => {}
            },
            KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => self.action(audio),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, _mouse: MouseEvent, audio: &Jukebox) {
        self.action(audio);
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(200, 170, 40)))
            .title(" 🐦 Flappy ")
            .title_style(
                Style::default()
                    .fg(Color::Rgb(255, 215, 0))
                    .add_modifier(Modifier::BOLD),
            );

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Min(8),    // Sky
                Constraint::Length(1), // Help
            ])
            .split(inner);

        // Keep the spawn bounds in step with the drawable area
        self.field_width = chunks[1].width as usize;
        if self.screen == Screen::Instructions || self.screen == Screen::GameOver {
            self.field_height = chunks[1].height as usize;
        }

        let status = Line::from(vec![
            Span::styled(" 🐦 ", Style::default()),
            Span::styled(
                format!("Score: {} ", self.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("🏆 Best: {} ", self.high_score),
                Style::default().fg(Color::Cyan),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        let lines = self.render_field(chunks[1].width as usize, chunks[1].height as usize);
        frame.render_widget(Paragraph::new(lines), chunks[1]);

        match self.screen {
            Screen::GameOver => {
                let msg = Paragraph::new(Line::from(vec![
                    Span::styled(
                        " 💀 GAME OVER! ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("Score: {} │ Best: {} │ ", self.score, self.high_score),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(
                        "SPACE or click to restart, Esc for menu",
                        Style::default().fg(Color::Gray),
                    ),
                ]));
                frame.render_widget(msg, chunks[2]);
            }
            Screen::Instructions => {
                let msg = Paragraph::new(Line::from(vec![
                    Span::styled(
                        " ▶ Press SPACE or click to start! ",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        "SPACE/click Flap │ P Pause │ R Restart │ Esc Menu",
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
                frame.render_widget(msg, chunks[2]);
            }
            Screen::Paused => {
                let msg = Paragraph::new(Line::from(vec![Span::styled(
                    " ⏸ PAUSED - Press P to resume ",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )]));
                frame.render_widget(msg, chunks[2]);
            }
            Screen::Playing => {
                let help = Paragraph::new(Line::from(vec![
                    Span::styled(" SPACE/click Flap ", Style::default().fg(Color::DarkGray)),
                    Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                    Span::styled("P Pause ", Style::default().fg(Color::DarkGray)),
                    Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                    Span::styled("R Restart ", Style::default().fg(Color::DarkGray)),
                    Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                    Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
                ]));
                frame.render_widget(help, chunks[2]);
            }
        }
    }

    fn reset(&mut self) {
        let hs = self.high_score;
        let fw = self.field_width;
        let fh = self.field_height;
        let rng = std::mem::replace(&mut self.rng, StdRng::from_entropy());
        *self = Flappy::from_rng(rng);
        self.high_score = hs;
        self.field_width = fw;
        self.field_height = fh;
        self.bird_y = fh as f32 / 2.0;
    }

    fn get_score(&self) -> u32 {
        self.score
    }

    fn set_high_score(&mut self, score: u32) {
        self.high_score = score;
    }

    fn is_game_over(&self) -> bool {
        self.screen == Screen::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn playing_game(seed: u64) -> Flappy {
        let mut game = Flappy::with_seed(seed);
        game.handle_input(key(KeyCode::Char(' ')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Playing);
        game
    }

    #[test]
    fn gap_is_constant_across_random_heights() {
        let mut game = Flappy::with_seed(1);
        for _ in 0..200 {
            game.spawn_pipe();
        }
        let max_top = game.field_height as f32 - GAP - MIN_TOP;
        for pipe in &game.pipes {
            assert!(pipe.top >= MIN_TOP && pipe.top <= max_top);
            let (top_box, bottom_box) = game.pipe_hitboxes(pipe);
            // Gap between the two solid boxes is exactly GAP rows
            assert_eq!(bottom_box.y - (top_box.y + top_box.h), GAP);
        }
    }

    #[test]
    fn flap_sets_velocity_and_gravity_pulls_back() {
        let mut game = playing_game(2);
        assert_eq!(game.bird_vel, FLAP);
        let y = game.bird_y;
        game.update(&Jukebox::muted());
        assert_eq!(game.bird_vel, FLAP + GRAVITY);
        assert!(game.bird_y < y);
    }

    #[test]
    fn floor_breach_ends_the_game() {
        let mut game = playing_game(3);
        game.bird_y = game.field_height as f32 - BIRD_H;
        game.bird_vel = 1.0;
        game.update(&Jukebox::muted());
        assert_eq!(game.screen, Screen::GameOver);
    }

    #[test]
    fn ceiling_breach_ends_the_game() {
        let mut game = playing_game(4);
        game.bird_y = 0.5;
        game.bird_vel = -1.0;
        game.update(&Jukebox::muted());
        assert_eq!(game.screen, Screen::GameOver);
    }

    #[test]
    fn passing_a_pipe_scores_exactly_once() {
        let mut game = playing_game(5);
        game.bird_y = 10.0;
        game.bird_vel = 0.0;
        game.pipes.push(Pipe {
            x: BIRD_X - PIPE_W + PIPE_SPEED / 2.0,
            top: 2.0,
            passed: false,
        });
        game.update(&Jukebox::muted());
        assert_eq!(game.score, 1);

        for _ in 0..20 {
            game.bird_vel = 0.0; // hold level, only the pass counter matters
            game.update(&Jukebox::muted());
        }
        assert_eq!(game.score, 1);
    }

    #[test]
    fn hitting_a_pipe_ends_the_game() {
        let mut game = playing_game(6);
        game.bird_y = 1.0;
        game.bird_vel = 0.0;
        game.pipes.push(Pipe {
            x: BIRD_X,
            top: 10.0,
            passed: false,
        });
        game.update(&Jukebox::muted());
        assert_eq!(game.screen, Screen::GameOver);
    }

    #[test]
    fn gliding_through_the_gap_is_safe() {
        let mut game = playing_game(7);
        game.bird_y = 12.0;
        game.bird_vel = 0.0;
        game.pipes.push(Pipe {
            x: BIRD_X,
            top: 10.0, // gap covers rows 10..18
            passed: false,
        });
        game.update(&Jukebox::muted());
        assert_eq!(game.screen, Screen::Playing);
    }

    #[test]
    fn offscreen_pipes_are_pruned() {
        let mut game = playing_game(8);
        game.bird_y = 10.0;
        game.bird_vel = 0.0;
        game.pipes.push(Pipe {
            x: -PIPE_W,
            top: 5.0,
            passed: true,
        });
        game.update(&Jukebox::muted());
        assert!(game.pipes.is_empty());
    }

    #[test]
    fn update_is_noop_outside_play() {
        let mut game = Flappy::with_seed(9);
        let y = game.bird_y;
        game.update(&Jukebox::muted());
        assert_eq!(game.bird_y, y);
        assert_eq!(game.tick, 0);
    }

    #[test]
    fn pause_freezes_bird_and_double_toggle_restores() {
        let mut game = playing_game(10);
        game.handle_input(key(KeyCode::Char('p')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Paused);
        let y = game.bird_y;
        game.update(&Jukebox::muted());
        assert_eq!(game.bird_y, y);
        game.handle_input(key(KeyCode::Char('p')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Playing);
    }

    #[test]
    fn restart_from_game_over_preserves_best() {
        let mut game = playing_game(11);
        game.score = 7;
        game.bird_y = -1.0;
        game.update(&Jukebox::muted());
        assert_eq!(game.screen, Screen::GameOver);
        assert_eq!(game.high_score, 7);

        game.handle_input(key(KeyCode::Char(' ')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Playing);
        assert_eq!(game.score, 0);
        assert_eq!(game.high_score, 7);
        assert!(game.pipes.is_empty());
    }
}
