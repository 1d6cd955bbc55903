//! Channels where every substantial message is auto-searched.

use std::collections::HashSet;

use poise::serenity_prelude::ChannelId;
use tokio::sync::RwLock;

/// Action for the `monitor` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum MonitorAction {
    #[name = "on"]
    On,
    #[name = "off"]
    Off,
    #[name = "status"]
    Status,
}

/// Adapter-owned set of monitored channels.
#[derive(Debug, Default)]
pub struct MonitoredChannels {
    channels: RwLock<HashSet<ChannelId>>,
}

impl MonitoredChannels {
    pub fn new(initial: impl IntoIterator<Item = ChannelId>) -> Self {
        Self {
            channels: RwLock::new(initial.into_iter().collect()),
        }
    }

    pub async fn contains(&self, channel_id: ChannelId) -> bool {
        self.channels.read().await.contains(&channel_id)
    }

    pub async fn enable(&self, channel_id: ChannelId) {
        self.channels.write().await.insert(channel_id);
    }

    pub async fn disable(&self, channel_id: ChannelId) {
        self.channels.write().await.remove(&channel_id);
    }

    /// Apply a `monitor` action and return the confirmation to show the user.
    pub async fn apply(&self, channel_id: ChannelId, action: MonitorAction) -> &'static str {
        match action {
            MonitorAction::On => {
                self.enable(channel_id).await;
                "✅ Auto-search monitoring enabled for this channel!"
            }
            MonitorAction::Off => {
                self.disable(channel_id).await;
                "❌ Auto-search monitoring disabled for this channel."
            }
            MonitorAction::Status => {
                if self.contains(channel_id).await {
                    "Auto-search monitoring status: 🟢 Enabled"
                } else {
                    "Auto-search monitoring status: 🔴 Disabled"
                }
            }
        }
    }
}
