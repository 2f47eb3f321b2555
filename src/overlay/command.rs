use crate::{
    foundation::error::{HuploError, HuploResult},
    overlay::{
        manager::QueueManager,
        queue::{Queue, QueueConfig},
    },
};

/// Queue settings as received from a client: either the serialized JSON string or an
/// inline object.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum QueueSpec {
    Serialized(String),
    Inline(QueueConfig),
}

impl Default for QueueSpec {
    fn default() -> Self {
        Self::Inline(QueueConfig::default())
    }
}

impl QueueSpec {
    pub fn resolve(&self) -> HuploResult<QueueConfig> {
        match self {
            Self::Serialized(json) => QueueConfig::from_json(json),
            Self::Inline(cfg) => {
                cfg.validate()?;
                Ok(cfg.clone())
            }
        }
    }
}

/// The operations an external process may invoke.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    AddQueue {
        name: String,
        #[serde(default)]
        config: QueueSpec,
    },
    AddMessage {
        name: String,
        text: String,
    },
    RemoveQueue {
        name: String,
    },
    ClearQueue {
        name: String,
    },
    ClearAllQueues,
}

impl Command {
    pub fn from_json(s: &str) -> HuploResult<Self> {
        serde_json::from_str(s).map_err(|e| HuploError::serde(format!("invalid command: {e}")))
    }

    /// Apply to `manager`. Only a malformed queue config is an error; commands naming
    /// unknown queues succeed without effect.
    pub fn apply_to(self, manager: &mut QueueManager) -> HuploResult<()> {
        match self {
            Self::AddQueue { name, config } => {
                let cfg = config.resolve()?;
                if manager.add_queue(&name, Queue::new(cfg)).is_some() {
                    tracing::debug!(queue = %name, "queue replaced");
                }
            }
            Self::AddMessage { name, text } => {
                manager.add_message(&name, text);
            }
            Self::RemoveQueue { name } => {
                manager.remove_queue(&name);
            }
            Self::ClearQueue { name } => {
                manager.clear_queue(&name);
            }
            Self::ClearAllQueues => manager.clear_all_queues(),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/command.rs"]
mod tests;
