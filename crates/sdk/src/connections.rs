//! Trading pair channels and their subscription state.
//!
//! Quotes for every trading pair are published to pub/sub channels.
//! [`PairConnections`] folds subscription status events, as reported by a
//! pub/sub client listener, into per pair [`ConnectionState`].

use std::{collections::HashMap, fmt::Display};

use itertools::Itertools;
use serde::Deserialize;

/// Subscription settings of a trading pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscribeSettings {
    pub channels: &'static [&'static str],
    pub with_presence: bool,
}

/// Trading pair and the channels its quotes are published to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub title: &'static str,
    pub settings: SubscribeSettings,
}

pub const ONE_USDT: ConnectionInfo = ConnectionInfo {
    title: "WONE/1USDT",
    settings: SubscribeSettings { channels: &["one-usdt-10"], with_presence: true },
};

pub const ONE_BTC: ConnectionInfo = ConnectionInfo {
    title: "WONE/1WBTC",
    settings: SubscribeSettings { channels: &["one-btc-10"], with_presence: true },
};

pub const ETH_BTC: ConnectionInfo = ConnectionInfo {
    title: "1ETH/1WBTC",
    settings: SubscribeSettings { channels: &["eth-btc-10"], with_presence: true },
};

pub const ETH_USDT: ConnectionInfo = ConnectionInfo {
    title: "1ETH/1USDT",
    settings: SubscribeSettings { channels: &["eth-usdt-10"], with_presence: true },
};

pub const BTC_USDT: ConnectionInfo = ConnectionInfo {
    title: "1WBTC/1USDT",
    settings: SubscribeSettings { channels: &["btc-usdt-10"], with_presence: true },
};

pub const TRADING_PAIRS: &[ConnectionInfo] = &[ONE_USDT, ONE_BTC, ETH_BTC, ETH_USDT, BTC_USDT];

/// Subscription state of a trading pair.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Failed(String),
}

/// Status event of a pub/sub client.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum StatusEvent {
    /// Subscription to all configured channels was requested.
    Subscribing,
    Connected {
        channels: Vec<String>,
    },
    Disconnected {
        channels: Vec<String>,
    },
    Error {
        channels: Vec<String>,
        reason: String,
    },
    /// Presence update: number of subscribers of the channel.
    Presence {
        channel: String,
        occupancy: u32,
    },
}

#[derive(Clone, Debug, Default)]
struct PairState {
    state: ConnectionState,
    occupancy: Option<u32>,
}

/// Connection state of trading pairs.
#[derive(Clone, derive_more::Debug)]
pub struct PairConnections {
    pairs: Vec<ConnectionInfo>,
    #[debug(skip)]
    channels: HashMap<&'static str, usize>,
    states: Vec<PairState>,
}

impl PairConnections {
    pub fn new(pairs: &[ConnectionInfo]) -> Self {
        let channels = pairs
            .iter()
            .enumerate()
            .flat_map(|(idx, pair)| pair.settings.channels.iter().map(move |ch| (*ch, idx)))
            .collect();
        Self { pairs: pairs.to_vec(), channels, states: vec![PairState::default(); pairs.len()] }
    }

    /// Applies status event, events for unknown channels are ignored.
    pub fn apply(&mut self, event: &StatusEvent) {
        match event {
            StatusEvent::Subscribing => {
                self.states
                    .iter_mut()
                    .for_each(|pair| pair.state = ConnectionState::Connecting);
            },
            StatusEvent::Connected { channels } => {
                self.set_state(channels, ConnectionState::Connected);
            },
            StatusEvent::Disconnected { channels } => {
                self.set_state(channels, ConnectionState::Disconnected);
            },
            StatusEvent::Error { channels, reason } => {
                self.set_state(channels, ConnectionState::Failed(reason.clone()));
            },
            StatusEvent::Presence { channel, occupancy } => {
                if let Some(idx) = self.channels.get(channel.as_str())
                    && self.pairs[*idx].settings.with_presence
                {
                    self.states[*idx].occupancy = Some(*occupancy);
                }
            },
        }
    }

    fn set_state(&mut self, channels: &[String], state: ConnectionState) {
        for idx in channels
            .iter()
            .filter_map(|ch| self.channels.get(ch.as_str()))
            .unique()
        {
            self.states[*idx].state = state.clone();
        }
    }

    /// State of the pair with the given title.
    pub fn state(&self, title: &str) -> Option<&ConnectionState> {
        self.pairs
            .iter()
            .position(|pair| pair.title == title)
            .map(|idx| &self.states[idx].state)
    }

    /// Number of channel subscribers, when presence is reported.
    pub fn occupancy(&self, title: &str) -> Option<u32> {
        self.pairs
            .iter()
            .position(|pair| pair.title == title)
            .and_then(|idx| self.states[idx].occupancy)
    }

    /// Pairs with their current state, in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&ConnectionInfo, &ConnectionState)> {
        self.pairs.iter().zip(self.states.iter().map(|s| &s.state))
    }

    pub fn all_connected(&self) -> bool {
        self.states
            .iter()
            .all(|pair| pair.state == ConnectionState::Connected)
    }
}

impl Default for PairConnections {
    fn default() -> Self { Self::new(TRADING_PAIRS) }
}

#[cfg(not(feature = "display"))]
impl Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Connected => write!(f, "Connected"),
            ConnectionState::Failed(reason) => write!(f, "Failed: {}", reason),
        }
    }
}

#[cfg(feature = "display")]
impl Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use colored::Colorize;

        match self {
            ConnectionState::Disconnected => write!(f, "{}", "Disconnected".dimmed()),
            ConnectionState::Connecting => write!(f, "{}", "Connecting".yellow()),
            ConnectionState::Connected => write!(f, "{}", "Connected".green()),
            ConnectionState::Failed(reason) => {
                write!(f, "{}", format!("Failed: {}", reason).red())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels(names: &[&str]) -> Vec<String> { names.iter().map(|n| n.to_string()).collect() }

    #[test]
    fn test_state_transitions() {
        let mut pairs = PairConnections::default();
        assert_eq!(pairs.state("1ETH/1USDT"), Some(&ConnectionState::Disconnected));

        pairs.apply(&StatusEvent::Subscribing);
        assert!(pairs.iter().all(|(_, state)| *state == ConnectionState::Connecting));

        pairs.apply(&StatusEvent::Connected {
            channels: channels(&["eth-usdt-10", "btc-usdt-10", "unknown-channel"]),
        });
        assert_eq!(pairs.state("1ETH/1USDT"), Some(&ConnectionState::Connected));
        assert_eq!(pairs.state("1WBTC/1USDT"), Some(&ConnectionState::Connected));
        assert_eq!(pairs.state("WONE/1USDT"), Some(&ConnectionState::Connecting));
        assert!(!pairs.all_connected());

        pairs.apply(&StatusEvent::Error {
            channels: channels(&["btc-usdt-10"]),
            reason: "access denied".to_string(),
        });
        assert_eq!(
            pairs.state("1WBTC/1USDT"),
            Some(&ConnectionState::Failed("access denied".to_string()))
        );

        pairs.apply(&StatusEvent::Disconnected { channels: channels(&["eth-usdt-10"]) });
        assert_eq!(pairs.state("1ETH/1USDT"), Some(&ConnectionState::Disconnected));
        assert_eq!(pairs.state("BTC/ETH"), None);
    }

    #[test]
    fn test_all_connected() {
        let mut pairs = PairConnections::new(&[ETH_BTC, ETH_USDT]);
        pairs.apply(&StatusEvent::Connected { channels: channels(&["eth-btc-10", "eth-usdt-10"]) });
        assert!(pairs.all_connected());
    }

    #[test]
    fn test_presence() {
        let mut pairs = PairConnections::default();
        pairs.apply(&StatusEvent::Presence { channel: "one-btc-10".to_string(), occupancy: 3 });
        assert_eq!(pairs.occupancy("WONE/1WBTC"), Some(3));
        assert_eq!(pairs.occupancy("WONE/1USDT"), None);
    }

    #[test]
    fn test_status_event_json() {
        let event: StatusEvent =
            serde_json::from_str(r#"{"category":"connected","channels":["one-usdt-10"]}"#).unwrap();
        assert_eq!(event, StatusEvent::Connected { channels: channels(&["one-usdt-10"]) });

        let event: StatusEvent = serde_json::from_str(r#"{"category":"subscribing"}"#).unwrap();
        assert_eq!(event, StatusEvent::Subscribing);
    }
}
