use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::{Canvas, Rgba8},
        error::{HuploError, HuploResult},
    },
    overlay::{
        manager::QueueManager,
        queue::{Queue, QueueConfig},
    },
};

/// Top-level settings for an overlay run: the font, the synthetic stream geometry, and
/// any queues to register up front.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Relative paths resolve against the config file's directory.
    pub font_path: Option<PathBuf>,
    pub canvas: Canvas,
    pub fps: u32,
    pub clear_rgba: Rgba8,
    pub queues: BTreeMap<String, QueueConfig>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            canvas: Canvas {
                width: 640,
                height: 480,
            },
            fps: 15,
            clear_rgba: Rgba8 {
                r: 18,
                g: 20,
                b: 28,
                a: 255,
            },
            queues: BTreeMap::new(),
        }
    }
}

impl OverlayConfig {
    pub fn from_json(s: &str) -> HuploResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| HuploError::config(format!("invalid overlay config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> HuploResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read overlay config '{}'", path.display()))?;
        let mut cfg = Self::from_json(&text)?;
        if let Some(font) = cfg.font_path.as_mut()
            && font.is_relative()
            && let Some(dir) = path.parent()
        {
            *font = dir.join(&*font);
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> HuploResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)
            .map_err(|e| HuploError::config(format!("canvas: {e}")))?;
        if self.fps == 0 {
            return Err(HuploError::config("fps must be > 0"));
        }
        for (name, queue) in &self.queues {
            queue
                .validate()
                .map_err(|e| HuploError::config(format!("queue '{name}': {e}")))?;
        }
        Ok(())
    }

    /// Manager with every configured queue registered.
    pub fn build_manager(&self) -> QueueManager {
        let mut manager = QueueManager::new();
        for (name, queue) in &self.queues {
            manager.add_queue(name, Queue::new(queue.clone()));
        }
        manager
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
