use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::audio::Jukebox;
use crate::games::{Game, Hitbox, Screen};

const NUM_LANES: usize = 3;
// Lane columns on screen; collision works in lane units
const LANE_COLS: u16 = 9;
const CAR_W: u16 = 5;
const CAR_H: usize = 3;
const CAR_SPEED: f32 = 0.35;
const SPAWN_EVERY: u64 = 90;

#[derive(Clone)]
struct Opponent {
    lane: usize,
    y: f32,
}

pub struct CityRacer {
    screen: Screen,
    lane: usize,
    opponents: Vec<Opponent>,
    score: u32,
    high_score: u32,
    tick: u64,
    rng: StdRng,
    // Updated each render
    field_height: usize,
}

impl CityRacer {
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
            lane: 1,
            opponents: Vec::new(),
            score: 0,
            high_score: 0,
            tick: 0,
            rng,
            field_height: 24,
        }
    }

    fn player_top(&self) -> f32 {
        (self.field_height.saturating_sub(CAR_H + 1)) as f32
    }

    fn player_hitbox(&self) -> Hitbox {
        Hitbox::new(self.lane as f32, self.player_top(), 1.0, CAR_H as f32)
    }

    fn opponent_hitbox(car: &Opponent) -> Hitbox {
        Hitbox::new(car.lane as f32, car.y, 1.0, CAR_H as f32)
    }

    fn start(&mut self, audio: &Jukebox) {
        self.screen = Screen::Playing;
        audio.start();
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut grid: Vec<Vec<(char, Style)>> =
            vec![vec![(' ', Style::default()); width]; height];

        let road_w = NUM_LANES as u16 * LANE_COLS;
        let road_x = (width as u16).saturating_sub(road_w) / 2;
        let road_bg = Color::Rgb(45, 45, 50);
        let shoulder = Style::default().fg(Color::Rgb(25, 70, 25)).bg(Color::Rgb(15, 40, 15));

        for (y, row) in grid.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                let x = x as u16;
                if x >= road_x && x < road_x + road_w {
                    *cell = (' ', Style::default().bg(road_bg));
                } else {
                    let hash = (x as usize).wrapping_mul(7).wrapping_add(y * 13) % 6;
                    let ch = match hash {
                        0 => '"',
                        2 => '.',
                        _ => ' ',
                    };
                    *cell = (ch, shoulder);
                }
            }
        }

        // Dashed lane dividers, scrolling down with the traffic
        let dash_style = Style::default().fg(Color::Rgb(220, 220, 220)).bg(road_bg);
        for divider in 1..NUM_LANES as u16 {
            let x = (road_x + divider * LANE_COLS) as usize;
            if x >= width {
                continue;
            }
            for (y, row) in grid.iter_mut().enumerate() {
                if (y + 1000 - (self.tick as usize / 2) % 8) % 8 < 4 {
                    row[x] = ('┆', dash_style);
                }
            }
        }

        // Opponent cars
        for car in &self.opponents {
            Self::draw_car(
                &mut grid,
                road_x + car.lane as u16 * LANE_COLS + (LANE_COLS - CAR_W) / 2,
                car.y,
                Color::Rgb(220, 53, 69),
                false,
            );
        }

        // Player car
        Self::draw_car(
            &mut grid,
            road_x + self.lane as u16 * LANE_COLS + (LANE_COLS - CAR_W) / 2,
            self.player_top(),
            Color::Rgb(0, 123, 255),
            true,
        );

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

    fn draw_car(grid: &mut [Vec<(char, Style)>], x: u16, y: f32, color: Color, facing_up: bool) {
        let rows: [&str; CAR_H] = if facing_up {
            [" ▄█▄ ", "█████", "▀█ █▀"]
        } else {
            ["▄█ █▄", "█████", " ▀█▀ "]
        };
        let style = Style::default()
            .fg(color)
            .bg(Color::Rgb(45, 45, 50))
            .add_modifier(Modifier::BOLD);
        let top = y as i32;
        for (dy, row_str) in rows.iter().enumerate() {
            let gy = top + dy as i32;
            if gy < 0 || gy as usize >= grid.len() {
                continue;
            }
            for (dx, ch) in row_str.chars().enumerate() {
                let gx = x as usize + dx;
                if gx < grid[gy as usize].len() && ch != ' ' {
                    grid[gy as usize][gx] = (ch, style);
                }
            }
        }
    }
}

impl Game for CityRacer {
    fn update(&mut self, audio: &Jukebox) {
        if self.screen != Screen::Playing {
            return;
        }

        self.tick += 1;
        self.score = (self.tick / 10) as u32;

        for car in &mut self.opponents {
            car.y += CAR_SPEED;
        }

        let player = self.player_hitbox();
        if self
            .opponents
            .iter()
            .any(|car| Self::opponent_hitbox(car).overlaps(&player))
        {
            self.screen = Screen::GameOver;
            if self.score > self.high_score {
                self.high_score = self.score;
            }
            audio.crash();
            return;
        }

        let bottom = self.field_height as f32;
        self.opponents.retain(|car| car.y < bottom);

        if self.tick % SPAWN_EVERY == 0 {
            let lane = self.rng.gen_range(0..NUM_LANES);
            self.opponents.push(Opponent {
                lane,
                y: -(CAR_H as f32),
            });
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
            _ => match self.screen {
                Screen::Instructions => self.start(audio),
                Screen::GameOver => {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                        self.reset();
                        self.start(audio);
                    }
                }
                Screen::Paused => {}
                Screen::Playing => match key.code {
                    KeyCode::Left => self.lane = self.lane.saturating_sub(1),
                    KeyCode::Right => self.lane = (self.lane + 1).min(NUM_LANES - 1),
                    _ => {}
                },
            },
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 130, 220)))
            .title(" 🏎 City Racer ")
            .title_style(
                Style::default()
                    .fg(Color::Rgb(100, 170, 255))
                    .add_modifier(Modifier::BOLD),
            );

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Min(8),    // Road
                Constraint::Length(1), // Help
            ])
            .split(inner);

        self.field_height = chunks[1].height as usize;

        let status = Line::from(vec![
            Span::styled(" 🏎 ", Style::default()),
            Span::styled(
                format!("Score: {:05} ", self.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("🏆 Best: {:05} ", self.high_score),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Lane: {} ", self.lane + 1),
                Style::default().fg(Color::Green),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        let lines = self.render_field(chunks[1].width as usize, chunks[1].height as usize);
        frame.render_widget(Paragraph::new(lines), chunks[1]);

        match self.screen {
            Screen::GameOver => {
                let msg = Paragraph::new(Line::from(vec![
                    Span::styled(
                        " 💥 CRASHED! ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("Score: {} │ ", self.score),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(
                        "Press ENTER to restart, Esc for menu",
                        Style::default().fg(Color::Gray),
                    ),
                ]));
                frame.render_widget(msg, chunks[2]);
            }
            Screen::Instructions => {
                let msg = Paragraph::new(Line::from(vec![
                    Span::styled(
                        " ▶ Dodge the traffic — press any key to start! ",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        "← → Change lane │ P Pause │ R Restart │ Esc Menu",
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
                    Span::styled(" ← → Change lane ", Style::default().fg(Color::DarkGray)),
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
        let fh = self.field_height;
        let rng = std::mem::replace(&mut self.rng, StdRng::from_entropy());
        *self = CityRacer::from_rng(rng);
        self.high_score = hs;
        self.field_height = fh;
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

    fn playing_game(seed: u64) -> CityRacer {
        let mut game = CityRacer::with_seed(seed);
        game.handle_input(key(KeyCode::Char(' ')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Playing);
        game
    }

    #[test]
    fn update_is_noop_outside_play() {
        let mut game = CityRacer::with_seed(1);
        game.opponents.push(Opponent { lane: 0, y: 5.0 });

        game.update(&Jukebox::muted());
        assert_eq!(game.opponents[0].y, 5.0);
        assert_eq!(game.tick, 0);

        game.screen = Screen::Paused;
        game.update(&Jukebox::muted());
        assert_eq!(game.opponents[0].y, 5.0);
    }

    #[test]
    fn opponents_spawn_on_cadence() {
        let mut game = playing_game(2);
        for _ in 0..SPAWN_EVERY {
            game.update(&Jukebox::muted());
        }
        assert_eq!(game.opponents.len(), 1);
        assert!(game.opponents[0].lane < NUM_LANES);

        // Drop the first car so it can neither crash nor scroll off
        game.opponents.clear();
        for _ in 0..SPAWN_EVERY {
            game.update(&Jukebox::muted());
        }
        assert_eq!(game.opponents.len(), 1);
    }

    #[test]
    fn score_tracks_survival_time() {
        let mut game = playing_game(3);
        let mut last = 0;
        for _ in 0..100 {
            game.update(&Jukebox::muted());
            assert!(game.score >= last);
            last = game.score;
        }
        assert_eq!(game.score, 10);
    }

    #[test]
    fn same_lane_overlap_crashes() {
        let mut game = playing_game(4);
        game.opponents.push(Opponent {
            lane: game.lane,
            y: game.player_top(),
        });
        game.update(&Jukebox::muted());
        assert_eq!(game.screen, Screen::GameOver);
        assert!(game.is_game_over());
    }

    #[test]
    fn adjacent_lane_overlap_is_safe() {
        let mut game = playing_game(5);
        game.lane = 0;
        game.opponents.push(Opponent {
            lane: 1,
            y: game.player_top(),
        });
        game.update(&Jukebox::muted());
        assert_ne!(game.screen, Screen::GameOver);
    }

    #[test]
    fn lane_changes_are_clamped() {
        let mut game = playing_game(6);
        game.handle_input(key(KeyCode::Left), &Jukebox::muted());
        game.handle_input(key(KeyCode::Left), &Jukebox::muted());
        game.handle_input(key(KeyCode::Left), &Jukebox::muted());
        assert_eq!(game.lane, 0);
        for _ in 0..5 {
            game.handle_input(key(KeyCode::Right), &Jukebox::muted());
        }
        assert_eq!(game.lane, NUM_LANES - 1);
    }

    #[test]
    fn offscreen_opponents_are_pruned() {
        let mut game = playing_game(7);
        game.opponents.push(Opponent {
            lane: 0,
            y: game.field_height as f32 + 1.0,
        });
        game.update(&Jukebox::muted());
        assert!(game.opponents.is_empty());
    }

    #[test]
    fn pause_double_toggle_restores_mode() {
        let mut game = playing_game(8);
        game.handle_input(key(KeyCode::Char('p')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Paused);
        game.handle_input(key(KeyCode::Char('p')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Playing);
    }

    #[test]
    fn reset_keeps_best_score_only() {
        let mut game = playing_game(9);
        for _ in 0..50 {
            game.update(&Jukebox::muted());
        }
        game.set_high_score(99);
        game.reset();
        assert_eq!(game.screen, Screen::Instructions);
        assert_eq!(game.score, 0);
        assert_eq!(game.tick, 0);
        assert!(game.opponents.is_empty());
        assert_eq!(game.lane, 1);
        assert_eq!(game.high_score, 99);
    }
}
