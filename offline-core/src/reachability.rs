//! Network reachability contract.
//!
//! A [`Reachability`] source reports whether the network is currently
//! reachable and publishes transitions through a `tokio::sync::watch` channel.
//! The orchestrator listens for [`Connectivity::Online`] transitions and
//! triggers a drain cycle for each one.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Current network state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// The network is reachable.
    Online,
    /// The network is unreachable.
    Offline,
}

impl Connectivity {
    /// Event name delivered on a transition into this state.
    pub fn event_name(self) -> &'static str {
        match self {
            Connectivity::Online => "online",
            Connectivity::Offline => "offline",
        }
    }

    /// Whether this is [`Connectivity::Online`].
    #[inline]
    pub fn is_online(self) -> bool {
        self == Connectivity::Online
    }
}

impl From<bool> for Connectivity {
    fn from(online: bool) -> Self {
        if online {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Source of reachability state and transition notifications.
pub trait Reachability: Send + Sync {
    /// Current state.
    fn connectivity(&self) -> Connectivity;

    /// Subscribe to transitions.
    ///
    /// The returned receiver has already seen the current value, so
    /// `changed()` resolves on the next transition only.
    fn watch(&self) -> watch::Receiver<Connectivity>;

    /// Whether the network is reachable right now.
    fn is_online(&self) -> bool {
        self.connectivity().is_online()
    }
}

impl<T> Reachability for Arc<T>
where
    T: Reachability + ?Sized,
{
    fn connectivity(&self) -> Connectivity {
        (**self).connectivity()
    }

    fn watch(&self) -> watch::Receiver<Connectivity> {
        (**self).watch()
    }
}
