use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

use crate::audio::Jukebox;
use crate::games::brain_twist::BrainTwist;
use crate::games::city_racer::CityRacer;
use crate::games::flappy::Flappy;
use crate::games::snake::Snake;
use crate::games::space_runner::SpaceRunner;
use crate::games::Game;
use crate::scores::{BestScores, NUM_GAMES};

#[derive(Clone, Copy, PartialEq)]
pub enum Tab {
    Home,
    BrainTwist,
    CityRacer,
    Flappy,
    Snake,
    SpaceRunner,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::BrainTwist, Tab::CityRacer, Tab::Flappy, Tab::Snake, Tab::SpaceRunner]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Home => " Home ",
            Tab::BrainTwist => " Brain Twist ",
            Tab::CityRacer => " City Racer ",
            Tab::Flappy => " Flappy ",
            Tab::Snake => " Snake ",
            Tab::SpaceRunner => " Space Runner ",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::BrainTwist => 1,
            Tab::CityRacer => 2,
            Tab::Flappy => 3,
            Tab::Snake => 4,
            Tab::SpaceRunner => 5,
        }
    }

    fn for_game(game_idx: usize) -> Tab {
        match game_idx {
            0 => Tab::BrainTwist,
            1 => Tab::CityRacer,
            2 => Tab::Flappy,
            3 => Tab::Snake,
            4 => Tab::SpaceRunner,
            _ => Tab::Home,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_game: usize, // 0-4 for home screen game selection
    pub brain_twist: BrainTwist,
    pub city_racer: CityRacer,
    pub flappy: Flappy,
    pub snake: Snake,
    pub space_runner: SpaceRunner,
    pub best_scores: BestScores,
    pub show_best_scores: bool,
    pub audio: Jukebox,
}

impl App {
    pub fn new() -> Self {
        let best_scores = BestScores::load();
        let mut app = Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            brain_twist: BrainTwist::new(),
            city_racer: CityRacer::new(),
            flappy: Flappy::new(),
            snake: Snake::new(),
            space_runner: SpaceRunner::new(),
            best_scores,
            show_best_scores: false,
            audio: Jukebox::new(),
        };
        for idx in 0..NUM_GAMES {
            let best = app.best_scores.best(idx);
            app.game_mut(idx).set_high_score(best);
        }
        app
    }

    fn game_mut(&mut self, idx: usize) -> &mut dyn Game {
        match idx {
            0 => &mut self.brain_twist,
            1 => &mut self.city_racer,
            2 => &mut self.flappy,
            3 => &mut self.snake,
            _ => &mut self.space_runner,
        }
    }

    pub fn on_tick(&mut self) {
        match self.current_tab {
            Tab::Home => {}
            Tab::BrainTwist => self.brain_twist.update(&self.audio),
            Tab::CityRacer => self.city_racer.update(&self.audio),
            Tab::Flappy => self.flappy.update(&self.audio),
            Tab::Snake => self.snake.update(&self.audio),
            Tab::SpaceRunner => self.space_runner.update(&self.audio),
        }
        self.submit_scores();
    }

    /// Persist each game's score once per run, when the run ends.
    fn submit_scores(&mut self) {
        for idx in 0..NUM_GAMES {
            let game_over = self.game_mut(idx).is_game_over();
            let score = self.game_mut(idx).get_score();
            if game_over && score > 0 && !self.best_scores.was_submitted(idx) {
                if self.best_scores.record(idx, score) {
                    self.game_mut(idx).set_high_score(score);
                }
                self.best_scores.mark_submitted(idx);
            }
            if !game_over && self.best_scores.was_submitted(idx) {
                self.best_scores.clear_submitted(idx);
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                if matches!(self.current_tab, Tab::Home) {
                    self.should_quit = true;
                    return;
                }
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc => {
                if !matches!(self.current_tab, Tab::Home) {
                    self.current_tab = Tab::Home;
                    return;
                }
            }
            _ => {}
        }

        // Home screen shortcuts and navigation
        if matches!(self.current_tab, Tab::Home) && key.modifiers.is_empty() {
            match key.code {
                KeyCode::Char('1') => { self.current_tab = Tab::BrainTwist; return; }
                KeyCode::Char('2') => { self.current_tab = Tab::CityRacer; return; }
                KeyCode::Char('3') => { self.current_tab = Tab::Flappy; return; }
                KeyCode::Char('4') => { self.current_tab = Tab::Snake; return; }
                KeyCode::Char('5') => { self.current_tab = Tab::SpaceRunner; return; }
                KeyCode::Char('h') | KeyCode::Char('H') => {
                    self.show_best_scores = !self.show_best_scores;
                    return;
                }
                // Arrow key navigation across the single row of game tiles
                KeyCode::Right | KeyCode::Down => {
                    self.selected_game = (self.selected_game + 1) % NUM_GAMES;
                    return;
                }
                KeyCode::Left | KeyCode::Up => {
                    self.selected_game = (self.selected_game + NUM_GAMES - 1) % NUM_GAMES;
                    return;
                }
                KeyCode::Enter => {
                    self.current_tab = Tab::for_game(self.selected_game);
                    return;
                }
                _ => {}
            }
        }

        // Forward to active game
        match self.current_tab {
            Tab::Home => {}
            Tab::BrainTwist => self.brain_twist.handle_input(key, &self.audio),
            Tab::CityRacer => self.city_racer.handle_input(key, &self.audio),
            Tab::Flappy => self.flappy.handle_input(key, &self.audio),
            Tab::Snake => self.snake.handle_input(key, &self.audio),
            Tab::SpaceRunner => self.space_runner.handle_input(key, &self.audio),
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        match self.current_tab {
            Tab::Home => {}
            Tab::BrainTwist => self.brain_twist.handle_mouse(mouse, &self.audio),
            Tab::CityRacer => self.city_racer.handle_mouse(mouse, &self.audio),
            Tab::Flappy => self.flappy.handle_mouse(mouse, &self.audio),
            Tab::Snake => self.snake.handle_mouse(mouse, &self.audio),
            Tab::SpaceRunner => self.space_runner.handle_mouse(mouse, &self.audio),
        }
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + 1) % tabs.len()];
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + tabs.len() - 1) % tabs.len()];
    }
}
