use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::audio::Jukebox;
use crate::games::{Game, Screen};

const TOTAL_QUESTIONS: u32 = 10;
const STARTING_LIVES: u32 = 3;
const CHOICES: usize = 4;
// Ticks the ✓/✗ verdict stays on the status bar
const FLASH_TICKS: u8 = 45;

#[derive(Clone)]
struct Question {
    text: String,
    correct: i32,
    answers: Vec<i32>,
}

pub struct BrainTwist {
    screen: Screen,
    question: Question,
    score: u32,
    high_score: u32,
    lives: u32,
    question_count: u32,
    won: bool,
    flash: Option<(bool, u8)>,
    rng: StdRng,
    // Answer button rects captured at render time for click hit-testing
    answer_rects: Vec<(Rect, i32)>,
}

impl BrainTwist {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(mut rng: StdRng) -> Self {
        let question = Self::generate_question(&mut rng);
        Self {
            screen: Screen::Instructions,
            question,
            score: 0,
            high_score: 0,
            lives: STARTING_LIVES,
            question_count: 1,
            won: false,
            flash: None,
            rng,
            answer_rects: Vec::new(),
        }
    }

    fn generate_question(rng: &mut StdRng) -> Question {
        let a = rng.gen_range(1..=10);
        let b = rng.gen_range(1..=10);
        let op = ["+", "-", "*"][rng.gen_range(0..3)];
        let correct = match op {
            "+" => a + b,
            "-" => a - b,
            _ => a * b,
        };
        Question {
            text: format!("{} {} {} = ?", a, op, b),
            correct,
            answers: Self::generate_answers(correct, rng),
        }
    }

    /// Exactly four distinct choices including the true result. Wrong
    /// answers are drawn near the correct one; a draw that collides with an
    /// existing choice is simply drawn again.
    fn generate_answers(correct: i32, rng: &mut StdRng) -> Vec<i32> {
        let mut answers = vec![correct];
        while answers.len() < CHOICES {
            let mut wrong = correct + rng.gen_range(-5..5);
            if wrong == correct {
                wrong += if rng.gen_bool(0.5) { 1 } else { -1 };
            }
            if !answers.contains(&wrong) {
                answers.push(wrong);
            }
        }
        // Fisher-Yates
        for i in (1..answers.len()).rev() {
            let j = rng.gen_range(0..=i);
            answers.swap(i, j);
        }
        answers
    }

    fn next_question(&mut self) {
        self.question = Self::generate_question(&mut self.rng);
        self.question_count += 1;
    }

    fn check_answer(&mut self, answer: i32, audio: &Jukebox) {
        let correct = answer == self.question.correct;
        if correct {
            self.score += 10;
            audio.correct();
        } else {
            self.lives -= 1;
            audio.incorrect();
        }
        self.flash = Some((correct, FLASH_TICKS));

        if self.lives == 0 {
            self.screen = Screen::GameOver;
            self.won = false;
            audio.game_over();
        } else if self.question_count >= TOTAL_QUESTIONS {
            self.screen = Screen::GameOver;
            self.won = true;
            audio.win();
        } else {
            self.next_question();
        }
    }

    fn start(&mut self, audio: &Jukebox) {
        self.screen = Screen::Playing;
        audio.start();
    }

    fn restart(&mut self) {
        self.reset();
        self.screen = Screen::Playing;
    }

    fn select(&mut self, index: usize, audio: &Jukebox) {
        if let Some(&answer) = self.question.answers.get(index) {
            self.check_answer(answer, audio);
        }
    }
}

impl Game for BrainTwist {
    fn update(&mut self, _audio: &Jukebox) {
        if self.screen != Screen::Playing {
            return;
        }
        if let Some((verdict, ticks)) = self.flash {
            if ticks <= 1 {
                self.flash = None;
            } else {
                self.flash = Some((verdict, ticks - 1));
            }
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
                        self.restart();
                    }
                }
                Screen::Paused => {}
                Screen::Playing => {
                    if let KeyCode::Char(c @ '1'..='4') = key.code {
                        self.select(c as usize - '1' as usize, audio);
                    }
                }
            },
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, audio: &Jukebox) {
        match self.screen {
            Screen::Instructions => self.start(audio),
            Screen::GameOver => self.restart(),
            Screen::Paused => {}
            Screen::Playing => {
                let hit = self.answer_rects.iter().find(|(rect, _)| {
                    mouse.column >= rect.x
                        && mouse.column < rect.x + rect.width
                        && mouse.row >= rect.y
                        && mouse.row < rect.y + rect.height
                });
                if let Some(&(_, answer)) = hit {
                    self.check_answer(answer, audio);
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(120, 100, 220)))
            .title(" 🧠 Brain Twist ")
            .title_style(
                Style::default()
                    .fg(Color::Rgb(160, 140, 255))
                    .add_modifier(Modifier::BOLD),
            );

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Min(10),   // Question + answers
                Constraint::Length(1), // Help
            ])
            .split(inner);

        // Status bar
        let mut status = vec![
            Span::styled(" 🧠 ", Style::default()),
            Span::styled(
                format!("Score: {} ", self.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Lives: {} ", "♥ ".repeat(self.lives as usize)),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Question: {}/{} ", self.question_count, TOTAL_QUESTIONS),
                Style::default().fg(Color::Green),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("🏆 Best: {} ", self.high_score),
                Style::default().fg(Color::Cyan),
            ),
        ];
        if let Some((verdict, _)) = self.flash {
            status.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            status.push(if verdict {
                Span::styled(" ✓ Correct! ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else {
                Span::styled(" ✗ Wrong! ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            });
        }
        frame.render_widget(Paragraph::new(Line::from(status)), chunks[0]);

        // Question and answer grid
        self.answer_rects.clear();
        let field = chunks[1];
        let question = Paragraph::new(Line::from(Span::styled(
            self.question.text.clone(),
            Style::default()
                .fg(Color::Rgb(230, 230, 240))
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        let question_area = Rect::new(field.x, field.y + 1, field.width, 1);
        frame.render_widget(question, question_area);

        let btn_w = 18u16.min(field.width / 2);
        let btn_h = 3u16;
        let gap = 2u16;
        let grid_w = btn_w * 2 + gap;
        let start_x = field.x + field.width.saturating_sub(grid_w) / 2;
        let start_y = field.y + 3;

        for (index, &answer) in self.question.answers.iter().enumerate() {
            let row = index as u16 / 2;
            let col = index as u16 % 2;
            let x = start_x + col * (btn_w + gap);
            let y = start_y + row * (btn_h + 1);
            if y + btn_h > field.y + field.height {
                continue;
            }
            let rect = Rect::new(x, y, btn_w, btn_h);
            self.answer_rects.push((rect, answer));

            let button = Paragraph::new(Line::from(vec![
                Span::styled(
                    format!("[{}] ", index + 1),
                    Style::default().fg(Color::Rgb(255, 220, 80)),
                ),
                Span::styled(
                    answer.to_string(),
                    Style::default()
                        .fg(Color::Rgb(230, 230, 240))
                        .add_modifier(Modifier::BOLD),
                ),
            ]))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Rgb(79, 70, 229))),
            );
            frame.render_widget(button, rect);
        }

        // Help / overlay line
        match self.screen {
            Screen::GameOver => {
                let headline = if self.won {
                    Span::styled(
                        " 🎉 COMPLETE! ",
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(
                        " 💀 GAME OVER! ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                };
                let msg = Paragraph::new(Line::from(vec![
                    headline,
                    Span::styled(
                        format!("Score: {} │ ", self.score),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(
                        "Press ENTER or click to play again, Esc for menu",
                        Style::default().fg(Color::Gray),
                    ),
                ]));
                frame.render_widget(msg, chunks[2]);
            }
            Screen::Instructions => {
                let msg = Paragraph::new(Line::from(vec![
                    Span::styled(
                        " ▶ Answer 10 questions, 3 lives — press any key to start! ",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        "1-4 or click Answer │ P Pause │ R Restart │ Esc Menu",
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
                    Span::styled(" 1-4 / click Answer ", Style::default().fg(Color::DarkGray)),
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
        let rng = std::mem::replace(&mut self.rng, StdRng::from_entropy());
        *self = BrainTwist::from_rng(rng);
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

    fn playing_game(seed: u64) -> BrainTwist {
        let mut game = BrainTwist::with_seed(seed);
        game.handle_input(key(KeyCode::Char(' ')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Playing);
        game
    }

    fn answer_correctly(game: &mut BrainTwist) {
        let correct = game.question.correct;
        let index = game
            .question
            .answers
            .iter()
            .position(|&a| a == correct)
            .expect("correct answer missing from choices");
        let digit = char::from_digit(index as u32 + 1, 10).unwrap();
        game.handle_input(key(KeyCode::Char(digit)), &Jukebox::muted());
    }

    fn answer_wrongly(game: &mut BrainTwist) {
        let correct = game.question.correct;
        let index = game
            .question
            .answers
            .iter()
            .position(|&a| a != correct)
            .unwrap();
        let digit = char::from_digit(index as u32 + 1, 10).unwrap();
        game.handle_input(key(KeyCode::Char(digit)), &Jukebox::muted());
    }

    #[test]
    fn choices_are_four_distinct_and_include_correct() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let question = BrainTwist::generate_question(&mut rng);
            assert_eq!(question.answers.len(), CHOICES);
            assert!(question.answers.contains(&question.correct));
            for (i, a) in question.answers.iter().enumerate() {
                for b in &question.answers[i + 1..] {
                    assert_ne!(a, b, "duplicate choice in {:?}", question.answers);
                }
            }
        }
    }

    #[test]
    fn question_result_matches_operator() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let q = BrainTwist::generate_question(&mut rng);
            let parts: Vec<&str> = q.text.split_whitespace().collect();
            let a: i32 = parts[0].parse().unwrap();
            let b: i32 = parts[2].parse().unwrap();
            let expected = match parts[1] {
                "+" => a + b,
                "-" => a - b,
                "*" => a * b,
                other => panic!("unexpected operator {other}"),
            };
            assert_eq!(q.correct, expected);
            assert!((1..=10).contains(&a));
            assert!((1..=10).contains(&b));
        }
    }

    #[test]
    fn correct_answer_scores_wrong_answer_costs_a_life() {
        let mut game = playing_game(1);
        answer_correctly(&mut game);
        assert_eq!(game.score, 10);
        assert_eq!(game.lives, STARTING_LIVES);

        answer_wrongly(&mut game);
        assert_eq!(game.score, 10);
        assert_eq!(game.lives, STARTING_LIVES - 1);
    }

    #[test]
    fn score_is_monotonic_over_a_full_run() {
        let mut game = playing_game(3);
        let mut last = 0;
        while game.screen == Screen::Playing {
            answer_correctly(&mut game);
            assert!(game.score >= last);
            last = game.score;
        }
    }

    #[test]
    fn ten_questions_answered_wins() {
        let mut game = playing_game(5);
        for _ in 0..TOTAL_QUESTIONS {
            assert_eq!(game.screen, Screen::Playing);
            answer_correctly(&mut game);
        }
        assert_eq!(game.screen, Screen::GameOver);
        assert!(game.won);
        assert_eq!(game.score, TOTAL_QUESTIONS * 10);
    }

    #[test]
    fn three_wrong_answers_lose() {
        let mut game = playing_game(9);
        for _ in 0..STARTING_LIVES {
            assert_eq!(game.screen, Screen::Playing);
            answer_wrongly(&mut game);
        }
        assert_eq!(game.screen, Screen::GameOver);
        assert!(!game.won);
        assert!(game.is_game_over());
    }

    #[test]
    fn pause_ignores_answers_and_double_toggle_restores_mode() {
        let mut game = playing_game(2);
        game.handle_input(key(KeyCode::Char('p')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Paused);

        let before = game.question.text.clone();
        game.handle_input(key(KeyCode::Char('1')), &Jukebox::muted());
        assert_eq!(game.score, 0);
        assert_eq!(game.lives, STARTING_LIVES);
        assert_eq!(game.question.text, before);

        game.handle_input(key(KeyCode::Char('p')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Playing);
    }

    #[test]
    fn pause_does_nothing_outside_play() {
        let mut game = BrainTwist::with_seed(4);
        game.handle_input(key(KeyCode::Char('p')), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Instructions);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut game = playing_game(6);
        answer_correctly(&mut game);
        answer_wrongly(&mut game);
        game.set_high_score(77);

        game.reset();
        assert_eq!(game.screen, Screen::Instructions);
        assert_eq!(game.score, 0);
        assert_eq!(game.lives, STARTING_LIVES);
        assert_eq!(game.question_count, 1);
        assert_eq!(game.high_score, 77);
    }

    #[test]
    fn enter_restarts_from_game_over_into_play() {
        let mut game = playing_game(8);
        for _ in 0..STARTING_LIVES {
            answer_wrongly(&mut game);
        }
        assert_eq!(game.screen, Screen::GameOver);
        game.handle_input(key(KeyCode::Enter), &Jukebox::muted());
        assert_eq!(game.screen, Screen::Playing);
        assert_eq!(game.score, 0);
        assert_eq!(game.lives, STARTING_LIVES);
    }
}
