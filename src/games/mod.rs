pub mod brain_twist;
pub mod city_racer;
pub mod flappy;
pub mod snake;
pub mod space_runner;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::prelude::*;

use crate::audio::Jukebox;

/// Coarse per-game mode. Exactly one is active; every transition site
/// matches exhaustively.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Instructions,
    Playing,
    Paused,
    GameOver,
}

pub trait Game {
    fn update(&mut self, audio: &Jukebox);
    fn handle_input(&mut self, key: KeyEvent, audio: &Jukebox);
    fn handle_mouse(&mut self, _mouse: MouseEvent, _audio: &Jukebox) {}
    fn render(&mut self, frame: &mut Frame, area: Rect);
    fn reset(&mut self);
    fn get_score(&self) -> u32;
    fn set_high_score(&mut self, score: u32);
    fn is_game_over(&self) -> bool;
}

/// Axis-aligned bounding box over half-open ranges [x, x+w) × [y, y+h).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Hitbox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_symmetric() {
        let a = Hitbox::new(0.0, 0.0, 10.0, 10.0);
        let b = Hitbox::new(5.0, 5.0, 10.0, 10.0);
        let c = Hitbox::new(20.0, 20.0, 3.0, 3.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        // Half-open ranges: a box ending at x=10 does not hit one starting there.
        let a = Hitbox::new(0.0, 0.0, 10.0, 10.0);
        let b = Hitbox::new(10.0, 0.0, 5.0, 10.0);
        let c = Hitbox::new(0.0, 10.0, 10.0, 5.0);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn containment_overlaps() {
        let outer = Hitbox::new(0.0, 0.0, 20.0, 20.0);
        let inner = Hitbox::new(5.0, 5.0, 2.0, 2.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }
}
