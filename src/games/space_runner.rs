use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::audio::Jukebox;
use crate::games::{Game, Hitbox, Screen};

const PLAYER_X: f32 = 6.0;
const PLAYER_W: f32 = 3.0;
const PLAYER_H: f32 = 2.0;
const GRAVITY: f32 = 0.02;
const JUMP: f32 = -0.45;
const OBSTACLE_W: f32 = 3.0;
const OBSTACLE_SPEED: f32 = 0.3;
const SPAWN_EVERY: u64 = 120;
const MIN_OBSTACLE_H: u32 = 1;
const MAX_OBSTACLE_H: u32 = 4;

#[derive(Clone)]
struct Obstacle {
    x: f32,
    height: u32,
}

pub struct SpaceRunner {
    screen: Screen,
    player_y: f32,
    player_vel: f32,
    obstacles: Vec<Obstacle>,
    score: u32,
    high_score: u32,
    tick: u64,
    rng: StdRng,
    // Updated each render
    field_width: usize,
    field_height: usize,
}

impl SpaceRunner {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        let mut runner = Self {
            screen: Screen::Instructions,
            player_y: 0.0,
            player_vel: 0.0,
            obstacles: Vec::new(),
            score: 0,
            high_score: 0,
            tick: 0,
            rng,
            field_width: 60,
            field_height: 20,
        };
        runner.player_y = runner.ground_y() - PLAYER_H;
        runner
    }

    fn ground_y(&self) -> f32 {
        (self.field_height.saturating_sub(2)) as f32
    }

    fn grounded(&self) -> bool {
        self.player_y >= self.ground_y() - PLAYER_H
    }

    fn player_hitbox(&self) -> Hitbox {
        Hitbox::new(PLAYER_X, self.player_y, PLAYER_W, PLAYER_H)
    }

    fn obstacle_hitbox(&self, obstacle: &Obstacle) -> Hitbox {
        Hitbox::new(
            obstacle.x,
            self.ground_y() - obstacle.height as f32,
            OBSTACLE_W,
            obstacle.height as f32,
        )
    }

    /// Context-sensitive action key: start, jump, or restart.
    fn action(&mut self, audio: &Jukebox) {
        match self.screen {
            Screen::Instructions => {
                self.screen = Screen::Playing;
                audio.start();
            }
            Screen::Playing => {
                if self.grounded() {
                    self.player_vel = JUMP;
                    audio.jump();
                }
            }
            Screen::GameOver => self.reset(),
            Screen::Paused => {}
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut grid: Vec<Vec<(char, Style)>> =
            vec![vec![(' ', Style::default()); width]; height];

        // Starfield scrolling with the obstacles
        let star_style = Style::default().fg(Color::Rgb(90, 90, 130));
        for (y, row) in grid.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                let scroll = x + self.tick as usize / 4;
                if scroll.wrapping_mul(37).wrapping_add(y * 23) % 89 == 0 {
                    *cell = ('.', star_style);
                }
            }
        }

        // Ground line
        let ground = self.ground_y() as usize;
        if ground < height {
            let ground_style = Style::default().fg(Color::Rgb(120, 110, 160));
            for x in 0..width {
                let ch = if (x + self.tick as usize / 3) % 7 == 0 {
                    '▪'
                } else {
                    '━'
                };
                grid[ground][x] = (ch, ground_style);
            }
        }

        // Obstacles
        let obstacle_style = Style::default()
            .fg(Color::Rgb(233, 69, 96))
            .add_modifier(Modifier::BOLD);
        for obstacle in &self.obstacles {
            let left = obstacle.x as i32;
            for dy in 0..obstacle.height as usize {
                let y = ground.saturating_sub(1 + dy);
                for dx in 0..OBSTACLE_W as i32 {
                    let x = left + dx;
                    if x >= 0 && (x as usize) < width && y < height {
                        let ch = if dy + 1 == obstacle.height as usize {
                            '▄'
                        } else {
                            '█'
                        };
                        grid[y][x as usize] = (ch, obstacle_style);
                    }
                }
            }
        }

        // Player: gold 3x2 sprite with a thruster flicker while airborne
        let player_style = Style::default()
            .fg(Color::Rgb(255, 215, 0))
            .add_modifier(Modifier::BOLD);
        let airborne = !self.grounded();
        let sprite: [&str; 2] = if airborne {
            if self.tick % 6 < 3 {
                ["▗█▖", "▝▀▘"]
            } else {
                ["▗█▖", "▘▀▝"]
            }
        } else {
            ["▗█▖", "▟▀▙"]
        };
        let top = self.player_y as i32;
        for (dy, row_str) in sprite.iter().enumerate() {
            let y = top + dy as i32;
            if y < 0 || y as usize >= height {
                continue;
            }
            for (dx, ch) in row_str.chars().enumerate() {
                let x = PLAYER_X as usize + dx;
                if x < width && ch != ' ' {
                    grid[y as usize][x] = (ch, player_style);
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

impl Game for SpaceRunner {
    fn update(&mut self, audio: &Jukebox) {
        if self.screen != Screen::Playing {
            return;
        }

        self.tick += 1;
        self.score = (self.tick / 10) as u32;

        // Player gravity, clamped at the floor
        self.player_vel += GRAVITY;
        self.player_y += self.player_vel;
        let rest = self.ground_y() - PLAYER_H;
        if self.player_y > rest {
            self.player_y = rest;
            self.player_vel = 0.0;
        }

        if self.tick % SPAWN_EVERY == 0 {
            let height = self.rng.gen_range(MIN_OBSTACLE_H..=MAX_OBSTACLE_H);
            self.obstacles.push(Obstacle {
                x: self.field_width as f32,
                height,
            });
        }

        let player = self.player_hitbox();
        let mut crashed = false;
        for obstacle in &mut self.obstacles {
            obstacle.x -= OBSTACLE_SPEED;
        }
        for obstacle in &self.obstacles {
            if self.obstacle_hitbox(obstacle).overlaps(&player) {
                crashed = true;
                break;
            }
        }

        self.obstacles.retain(|o| o.x + OBSTACLE_W > 0.0);

        if crashed {
            self.screen = Screen::GameOver;
            if self.score > self.high_score {
                self.high_score = self.score;
            }
            audio.game_over();
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
            .border_style(Style::default().fg(Color::Rgb(150, 90, 220)))
            .title(" 🚀 Space Runner ")
            .title_style(
                Style::default()
                    .fg(Color::Rgb(190, 130, 255))
                    .add_modifier(Modifier::BOLD),
            );

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Min(8),    // Field
                Constraint::Length(1), // Help
            ])
            .split(inner);

        self.field_width = chunks[1].width as usize;
        let new_height = chunks[1].height as usize;
        if new_height != self.field_height
            && matches!(self.screen, Screen::Instructions | Screen::GameOver)
        {
            self.field_height = new_height;
            self.player_y = self.ground_y() - PLAYER_H;
        }

        let status = Line::from(vec![
            Span::styled(" 🚀 ", Style::default()),
            Span::styled(
                format!("Score: {:05} ", self.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("🏆 Best: {:05} ", self.high_score),
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
                        format!("Score: {} │ ", self.score),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(
                        "Press SPACE to restart, Esc for menu",
                        Style::default().fg(Color::Gray),
                    ),
                ]));
                frame.render_widget(msg, chunks[2]);
            }
            Screen::Instructions => {
                let msg = Paragraph::new(Line::from(vec![
                    Span::styled(
                        " ▶ Jump the obstacles — press SPACE or click to start! ",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        "SPACE/click Jump │ P Pause │ R Restart │ Esc Menu",
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
                    Span::styled(" SPACE/click Jump ", Style::default().fg(Color::DarkGray)),
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
        *self = SpaceRunner::from_rng(rng);
        self.high_score = hs;
        self.field_width = fw;
        self.field_height = fh;
        self.player_y = self.ground_y() - PLAYER_H;
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

    fn playing_game(seed: u64) -> SpaceRunner {
        let mut game = SpaceRunner::with_seed(seed);
        game.handle_input(key(KeyCode::Char(' ')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Playing);
        game
    }

    #[test]
    fn starts_resting_on_the_ground() {
        let game = SpaceRunner::with_seed(1);
        assert!(game.grounded());
        assert_eq!(game.player_y, game.ground_y() - PLAYER_H);
    }

    #[test]
    fn jump_lifts_off_and_gravity_brings_back() {
        let mut game = playing_game(2);
        game.handle_input(key(KeyCode::Char(' ')), &Jukebox::muted());
        assert_eq!(game.player_vel, JUMP);

        game.update(&Jukebox::muted());
        assert!(!game.grounded());

        // A full jump arc lands well within this budget
        for _ in 0..100 {
            game.update(&Jukebox::muted());
        }
        assert!(game.grounded());
        assert_eq!(game.player_vel, 0.0);
    }

    #[test]
    fn no_double_jump_in_the_air() {
        let mut game = playing_game(3);
        game.handle_input(key(KeyCode::Char(' ')), &Jukebox::muted());
        game.update(&Jukebox::muted());
        let vel = game.player_vel;
        game.handle_input(key(KeyCode::Char(' ')), &Jukebox::muted());
        assert_eq!(game.player_vel, vel);
    }

    #[test]
    fn obstacles_spawn_on_cadence_with_bounded_heights() {
        let mut game = playing_game(4);
        for _ in 0..(SPAWN_EVERY * 3) {
            game.update(&Jukebox::muted());
        }
        assert_eq!(game.obstacles.len(), 3);
        for obstacle in &game.obstacles {
            assert!((MIN_OBSTACLE_H..=MAX_OBSTACLE_H).contains(&obstacle.height));
        }
    }

    #[test]
    fn running_into_an_obstacle_ends_the_game() {
        let mut game = playing_game(5);
        game.obstacles.push(Obstacle {
            x: PLAYER_X,
            height: MAX_OBSTACLE_H,
        });
        game.update(&Jukebox::muted());
        assert_eq!(game.screen, Screen::GameOver);
        assert!(game.is_game_over());
    }

    #[test]
    fn clearing_an_obstacle_in_flight_is_safe() {
        let mut game = playing_game(6);
        game.player_y = game.ground_y() - PLAYER_H - 6.0;
        game.player_vel = 0.0;
        game.obstacles.push(Obstacle {
            x: PLAYER_X,
            height: 2,
        });
        game.update(&Jukebox::muted());
        assert_eq!(game.screen, Screen::Playing);
    }

    #[test]
    fn offscreen_obstacles_are_pruned() {
        let mut game = playing_game(7);
        game.obstacles.push(Obstacle {
            x: -OBSTACLE_W,
            height: 2,
        });
        game.update(&Jukebox::muted());
        assert!(game.obstacles.is_empty());
    }

    #[test]
    fn score_tracks_survival_time() {
        let mut game = playing_game(8);
        let mut last = 0;
        for _ in 0..100 {
            game.update(&Jukebox::muted());
            assert!(game.score >= last);
            last = game.score;
        }
        assert_eq!(game.score, 10);
    }

    #[test]
    fn update_is_noop_outside_play() {
        let mut game = SpaceRunner::with_seed(9);
        let y = game.player_y;
        for _ in 0..10 {
            game.update(&Jukebox::muted());
        }
        assert_eq!(game.player_y, y);
        assert_eq!(game.tick, 0);
    }

    #[test]
    fn pause_double_toggle_restores_mode() {
        let mut game = playing_game(10);
        game.handle_input(key(KeyCode::Char('p')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Paused);
        game.handle_input(key(KeyCode::Char('p')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Playing);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut game = playing_game(11);
        for _ in 0..200 {
            game.update(&Jukebox::muted());
        }
        game.set_high_score(42);
        game.reset();
        assert_eq!(game.screen, Screen::Instructions);
        assert_eq!(game.score, 0);
        assert_eq!(game.tick, 0);
        assert!(game.obstacles.is_empty());
        assert!(game.grounded());
        assert_eq!(game.high_score, 42);
    }
}
