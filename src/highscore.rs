//! Persisted high score
//!
//! A single integer under one storage key, read once at engine construction
//! and written only when a completed run strictly beats it. The store is a
//! trait so the sim and tests never touch LocalStorage directly.

/// Key-value collaborator holding the best completed-run score
pub trait ScoreStore {
    /// Read the stored high score (0 when absent or unreadable)
    fn load(&self) -> u32;
    /// Overwrite the stored high score
    fn save(&mut self, score: u32);
}

/// In-memory store for native builds and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryScore {
    score: u32,
}

impl MemoryScore {
    pub fn new(score: u32) -> Self {
        Self { score }
    }
}

impl ScoreStore for MemoryScore {
    fn load(&self) -> u32 {
        self.score
    }

    fn save(&mut self, score: u32) {
        self.score = score;
    }
}

/// LocalStorage-backed store (WASM only). A plain integer string under a
/// single key.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageScore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageScore {
    const STORAGE_KEY: &'static str = "waterdrop88-highscore";
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageScore {
    fn load(&self) -> u32 {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(score) = raw.parse::<u32>() {
                    log::info!("Loaded high score: {}", score);
                    return score;
                }
            }
        }

        log::info!("No stored high score, starting fresh");
        0
    }

    fn save(&mut self, score: u32) {
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            let _ = storage.set_item(Self::STORAGE_KEY, &score.to_string());
            log::info!("High score saved: {}", score);
        }
    }
}
