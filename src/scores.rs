use std::fs;
use std::path::PathBuf;

const MAGIC: &[u8; 4] = b"MCS1";
pub const NUM_GAMES: usize = 5;
// File layout: 4 magic + 5 * 4 bytes of little-endian best scores
const FILE_SIZE: usize = 4 + NUM_GAMES * 4;

pub const GAME_NAMES: [&str; NUM_GAMES] = [
    "Brain Twist",
    "City Racer",
    "Flappy",
    "Snake",
    "Space Runner",
];

/// One persisted best score per game, kept next to the executable.
/// Unreadable or missing files fall back to zeros; write failures are
/// dropped, the in-memory score still updates.
pub struct BestScores {
    scores: [u32; NUM_GAMES],
    path: PathBuf,
    /// Games whose finished run has already been recorded, so a game-over
    /// screen sitting on the same score does not re-submit every tick.
    submitted: [bool; NUM_GAMES],
}

impl BestScores {
    pub fn load() -> Self {
        Self::load_from(Self::scores_path())
    }

    pub fn load_from(path: PathBuf) -> Self {
        let mut scores = BestScores {
            scores: [0; NUM_GAMES],
            path,
            submitted: [false; NUM_GAMES],
        };
        scores.read_file();
        scores
    }

    fn scores_path() -> PathBuf {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join("minicade.scores");
            }
        }
        PathBuf::from("minicade.scores")
    }

    fn read_file(&mut self) {
        let Ok(data) = fs::read(&self.path) else { return };
        if data.len() < FILE_SIZE {
            return;
        }
        if &data[0..4] != MAGIC {
            return;
        }
        for game in 0..NUM_GAMES {
            let offset = 4 + game * 4;
            let bytes: [u8; 4] = [
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ];
            self.scores[game] = u32::from_le_bytes(bytes);
        }
    }

    fn write_file(&self) {
        let mut buf = Vec::with_capacity(FILE_SIZE);
        buf.extend_from_slice(MAGIC);
        for game in 0..NUM_GAMES {
            buf.extend_from_slice(&self.scores[game].to_le_bytes());
        }
        let _ = fs::write(&self.path, &buf);
    }

    pub fn best(&self, game_idx: usize) -> u32 {
        if game_idx >= NUM_GAMES {
            return 0;
        }
        self.scores[game_idx]
    }

    /// Record a finished run. Persists and returns true only on a strictly
    /// better score.
    pub fn record(&mut self, game_idx: usize, score: u32) -> bool {
        if game_idx >= NUM_GAMES || score == 0 {
            return false;
        }
        if score > self.scores[game_idx] {
            self.scores[game_idx] = score;
            self.write_file();
            true
        } else {
            false
        }
    }

    pub fn was_submitted(&self, game_idx: usize) -> bool {
        game_idx < NUM_GAMES && self.submitted[game_idx]
    }

    pub fn mark_submitted(&mut self, game_idx: usize) {
        if game_idx < NUM_GAMES {
            self.submitted[game_idx] = true;
        }
    }

    /// Cleared when the game leaves its game-over screen.
    pub fn clear_submitted(&mut self, game_idx: usize) {
        if game_idx < NUM_GAMES {
            self.submitted[game_idx] = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("minicade-test-{}-{}", std::process::id(), name))
    }

    #[test]
    fn missing_file_loads_zeros() {
        let scores = BestScores::load_from(temp_path("missing"));
        for game in 0..NUM_GAMES {
            assert_eq!(scores.best(game), 0);
        }
    }

    #[test]
    fn record_round_trips_through_file() {
        let path = temp_path("roundtrip");
        let _ = fs::remove_file(&path);

        let mut scores = BestScores::load_from(path.clone());
        assert!(scores.record(2, 41));
        assert!(scores.record(4, 120));

        let reloaded = BestScores::load_from(path.clone());
        assert_eq!(reloaded.best(2), 41);
        assert_eq!(reloaded.best(4), 120);
        assert_eq!(reloaded.best(0), 0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn record_only_on_strictly_better_score() {
        let path = temp_path("better");
        let _ = fs::remove_file(&path);

        let mut scores = BestScores::load_from(path.clone());
        assert!(scores.record(1, 50));
        assert!(!scores.record(1, 50));
        assert!(!scores.record(1, 30));
        assert!(scores.record(1, 51));
        assert_eq!(scores.best(1), 51);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn zero_scores_and_bad_indices_are_rejected() {
        let path = temp_path("reject");
        let _ = fs::remove_file(&path);

        let mut scores = BestScores::load_from(path.clone());
        assert!(!scores.record(0, 0));
        assert!(!scores.record(NUM_GAMES, 10));
        assert_eq!(scores.best(NUM_GAMES), 0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_magic_is_ignored() {
        let path = temp_path("corrupt");
        fs::write(&path, b"XXXX\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00").unwrap();

        let scores = BestScores::load_from(path.clone());
        assert_eq!(scores.best(0), 0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn submitted_flags_track_per_game() {
        let mut scores = BestScores::load_from(temp_path("flags"));
        assert!(!scores.was_submitted(3));
        scores.mark_submitted(3);
        assert!(scores.was_submitted(3));
        assert!(!scores.was_submitted(1));
        scores.clear_submitted(3);
        assert!(!scores.was_submitted(3));
    }
}
