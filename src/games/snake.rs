use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::audio::Jukebox;
use crate::games::{Game, Screen};

const GRID: i32 = 20;
// Logical move throttle in milliseconds, decoupled from the tick rate
const TICK_MS: u32 = 16;
const START_SPEED_MS: u32 = 150;
const MIN_SPEED_MS: u32 = 80;
const SPEED_STEP_MS: u32 = 2;

pub struct Snake {
    screen: Screen,
    body: Vec<(i32, i32)>,
    vel: (i32, i32),
    apple: (i32, i32),
    score: u32,
    high_score: u32,
    speed_ms: u32,
    move_budget_ms: u32,
    rng: StdRng,
}

impl Snake {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(mut rng: StdRng) -> Self {
        let body = vec![(10, 10)];
        let apple = Self::place_apple(&body, &mut rng);
        Self {
            screen: Screen::Instructions,
            body,
            vel: (0, 0),
            apple,
            score: 0,
            high_score: 0,
            speed_ms: START_SPEED_MS,
            move_budget_ms: 0,
            rng,
        }
    }

    /// Random free cell; cells under the snake are rejected and redrawn.
    fn place_apple(body: &[(i32, i32)], rng: &mut StdRng) -> (i32, i32) {
        loop {
            let cell = (rng.gen_range(0..GRID), rng.gen_range(0..GRID));
            if !body.contains(&cell) {
                return cell;
            }
        }
    }

    fn start(&mut self, audio: &Jukebox) {
        self.screen = Screen::Playing;
        self.vel = (1, 0);
        audio.start();
    }

    fn advance(&mut self, audio: &Jukebox) {
        let head = self.body[0];
        let mut next = (head.0 + self.vel.0, head.1 + self.vel.1);

        // Walls wrap to the opposite side
        if next.0 < 0 {
            next.0 = GRID - 1;
        } else if next.0 >= GRID {
            next.0 = 0;
        }
        if next.1 < 0 {
            next.1 = GRID - 1;
        } else if next.1 >= GRID {
            next.1 = 0;
        }

        if self.body.contains(&next) {
            self.screen = Screen::GameOver;
            if self.score > self.high_score {
                self.high_score = self.score;
            }
            audio.game_over();
            return;
        }

        self.body.insert(0, next);

        if next == self.apple {
            self.score += 10;
            self.apple = Self::place_apple(&self.body, &mut self.rng);
            self.speed_ms = self.speed_ms.saturating_sub(SPEED_STEP_MS).max(MIN_SPEED_MS);
            audio.eat();
        } else {
            self.body.pop();
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        // Two columns per cell so the board is roughly square on screen
        let cell_w = 2usize;
        let board_w = GRID as usize * cell_w;
        let x_off = width.saturating_sub(board_w) / 2;

        let dark = Style::default().fg(Color::Rgb(20, 28, 40)).bg(Color::Rgb(16, 20, 30));
        let light = Style::default().fg(Color::Rgb(24, 32, 46)).bg(Color::Rgb(20, 25, 36));
        let body_style = Style::default()
            .fg(Color::Rgb(60, 120, 216))
            .bg(Color::Rgb(15, 52, 96));
        let head_style = Style::default()
            .fg(Color::Rgb(120, 180, 255))
            .bg(Color::Rgb(22, 33, 62))
            .add_modifier(Modifier::BOLD);
        let apple_style = Style::default()
            .fg(Color::Rgb(233, 69, 96))
            .bg(Color::Rgb(16, 20, 30))
            .add_modifier(Modifier::BOLD);

        let mut lines = Vec::with_capacity(height);
        for row in 0..height {
            let mut spans: Vec<Span<'static>> = Vec::with_capacity(width);
            let y = row as i32;
            for col in 0..width {
                if y >= GRID || col < x_off || col >= x_off + board_w {
                    spans.push(Span::raw(" "));
                    continue;
                }
                let x = ((col - x_off) / cell_w) as i32;
                let sub = (col - x_off) % cell_w;
                let cell = (x, y);
                let span = if cell == self.body[0] {
                    Span::styled(if sub == 0 { "▐" } else { "▌" }, head_style)
                } else if self.body.contains(&cell) {
                    Span::styled("█", body_style)
                } else if cell == self.apple {
                    Span::styled(if sub == 0 { "(" } else { ")" }, apple_style)
                } else if (x + y) % 2 == 0 {
                    Span::styled("░", dark)
                } else {
                    Span::styled("░", light)
                };
                spans.push(span);
            }
            lines.push(Line::from(spans));
        }
        lines
    }
}

impl Game for Snake {
    fn update(&mut self, audio: &Jukebox) {
        if self.screen != Screen::Playing {
            return;
        }
        self.move_budget_ms += TICK_MS;
        if self.move_budget_ms < self.speed_ms {
            return;
        }
        self.move_budget_ms = 0;
        self.advance(audio);
    }

    fn handle_input(&mut self, key: KeyEvent, audio: &Jukebox) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            _ => match self.screen {
                Screen::Instructions => self.start(audio),
                Screen::GameOver => {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                        self.reset();
                    }
                }
                Screen::Paused => {
                    if matches!(key.code, KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ')) {
                        self.screen = Screen::Playing;
                    }
                }
                Screen::Playing => match key.code {
                    KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => {
                        self.screen = Screen::Paused;
                    }
                    // Reversing onto the neck is rejected
                    KeyCode::Up => {
                        if self.vel != (0, 1) {
                            self.vel = (0, -1);
                        }
                    }
                    KeyCode::Down => {
                        if self.vel != (0, -1) {
                            self.vel = (0, 1);
                        }
                    }
                    KeyCode::Left => {
                        if self.vel != (1, 0) {
                            self.vel = (-1, 0);
                        }
                    }
                    KeyCode::Right => {
                        if self.vel != (-1, 0) {
                            self.vel = (1, 0);
                        }
                    }
                    _ => {}
                },
            },
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(50, 180, 90)))
            .title(" 🐍 Snake ")
            .title_style(
                Style::default()
                    .fg(Color::Rgb(80, 220, 120))
                    .add_modifier(Modifier::BOLD),
            );

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Min(8),    // Board
                Constraint::Length(1), // Help
            ])
            .split(inner);

        let status = Line::from(vec![
            Span::styled(" 🐍 ", Style::default()),
            Span::styled(
                format!("Score: {} ", self.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Length: {} ", self.body.len()),
                Style::default().fg(Color::Green),
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
                        format!("Score: {} │ Length: {} │ ", self.score, self.body.len()),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(
                        "Press SPACE to play again, Esc for menu",
                        Style::default().fg(Color::Gray),
                    ),
                ]));
                frame.render_widget(msg, chunks[2]);
            }
            Screen::Instructions => {
                let msg = Paragraph::new(Line::from(vec![
                    Span::styled(
                        " ▶ Eat apples, don't bite yourself — press any key to start! ",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        "↑↓←→ Steer │ P/SPACE Pause │ R Restart │ Esc Menu",
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
                frame.render_widget(msg, chunks[2]);
            }
            Screen::Paused => {
                let msg = Paragraph::new(Line::from(vec![Span::styled(
                    " ⏸ PAUSED - Press P or SPACE to resume ",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )]));
                frame.render_widget(msg, chunks[2]);
            }
            Screen::Playing => {
                let help = Paragraph::new(Line::from(vec![
                    Span::styled(" ↑↓←→ Steer ", Style::default().fg(Color::DarkGray)),
                    Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                    Span::styled("P/SPACE Pause ", Style::default().fg(Color::DarkGray)),
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
        let rng = std::mem::replace(&mut self.rng, StdRng::from_entropy());
        *self = Snake::from_rng(rng);
        self.high_score = hs;
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

    fn playing_game(seed: u64) -> Snake {
        let mut game = Snake::with_seed(seed);
        game.handle_input(key(KeyCode::Enter), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Playing);
        assert_eq!(game.vel, (1, 0));
        game
    }

    /// Runs ticks until the throttle releases one logical move.
    fn advance_one_move(game: &mut Snake) {
        let head = game.body[0];
        for _ in 0..32 {
            game.update(&Jukebox::muted());
            if game.body[0] != head || game.screen == Screen::GameOver {
                return;
            }
        }
        panic!("snake never moved");
    }

    #[test]
    fn head_advances_by_velocity() {
        let mut game = playing_game(1);
        assert_eq!(game.body[0], (10, 10));
        game.apple = (0, 0); // out of the path
        advance_one_move(&mut game);
        assert_eq!(game.body[0], (11, 10));
        assert_eq!(game.body.len(), 1);
    }

    #[test]
    fn head_wraps_at_the_right_wall() {
        let mut game = playing_game(2);
        game.body = vec![(19, 10)];
        game.apple = (0, 0);
        advance_one_move(&mut game);
        assert_eq!(game.body[0], (0, 10));
    }

    #[test]
    fn head_wraps_at_the_top_wall() {
        let mut game = playing_game(3);
        game.handle_input(key(KeyCode::Up), &Jukebox::muted());
        game.body = vec![(5, 0)];
        game.apple = (0, 10);
        advance_one_move(&mut game);
        assert_eq!(game.body[0], (5, 19));
    }

    #[test]
    fn velocity_cannot_reverse() {
        let mut game = playing_game(4);
        game.handle_input(key(KeyCode::Left), &Jukebox::muted());
        assert_eq!(game.vel, (1, 0));
        game.handle_input(key(KeyCode::Up), &Jukebox::muted());
        assert_eq!(game.vel, (0, -1));
        game.handle_input(key(KeyCode::Down), &Jukebox::muted());
        assert_eq!(game.vel, (0, -1));
    }

    #[test]
    fn eating_an_apple_grows_and_scores_and_speeds_up() {
        let mut game = playing_game(5);
        game.apple = (11, 10);
        let speed = game.speed_ms;
        advance_one_move(&mut game);
        assert_eq!(game.body.len(), 2);
        assert_eq!(game.score, 10);
        assert_eq!(game.speed_ms, speed - SPEED_STEP_MS);
        assert_ne!(game.apple, (11, 10));
    }

    #[test]
    fn apple_never_lands_on_the_snake() {
        let mut body = Vec::new();
        for x in 0..GRID {
            for y in 0..GRID - 1 {
                body.push((x, y));
            }
        }
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..50 {
            let apple = Snake::place_apple(&body, &mut rng);
            assert_eq!(apple.1, GRID - 1);
        }
    }

    #[test]
    fn biting_the_body_ends_the_game() {
        let mut game = playing_game(7);
        game.body = vec![(10, 10), (11, 10), (11, 11), (10, 11)];
        game.handle_input(key(KeyCode::Down), &Jukebox::muted());
        advance_one_move(&mut game);
        assert_eq!(game.screen, Screen::GameOver);
        assert!(game.is_game_over());
    }

    #[test]
    fn update_is_noop_outside_play() {
        let mut game = Snake::with_seed(8);
        for _ in 0..40 {
            game.update(&Jukebox::muted());
        }
        assert_eq!(game.body[0], (10, 10));
    }

    #[test]
    fn pause_freezes_the_snake_and_toggles_back() {
        let mut game = playing_game(9);
        game.handle_input(key(KeyCode::Char(' ')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Paused);
        for _ in 0..40 {
            game.update(&Jukebox::muted());
        }
        assert_eq!(game.body[0], (10, 10));
        game.handle_input(key(KeyCode::Char('p')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Playing);
    }

    #[test]
    fn score_is_monotonic_while_playing() {
        let mut game = playing_game(10);
        let mut last = 0;
        for _ in 0..600 {
            game.update(&Jukebox::muted());
            if game.screen != Screen::Playing {
                break;
            }
            assert!(game.score >= last);
            last = game.score;
        }
    }

    #[test]
    fn reset_restores_initial_layout() {
        let mut game = playing_game(11);
        game.score = 50;
        game.body = vec![(1, 1), (2, 1), (3, 1)];
        game.set_high_score(60);
        game.reset();
        assert_eq!(game.screen, Screen::Instructions);
        assert_eq!(game.body, vec![(10, 10)]);
        assert_eq!(game.vel, (0, 0));
        assert_eq!(game.score, 0);
        assert_eq!(game.speed_ms, START_SPEED_MS);
        assert_eq!(game.high_score, 60);
    }
}
