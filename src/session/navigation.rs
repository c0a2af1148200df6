// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client-side navigation capability.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

/// Something that can move the client to another path.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn navigate_to(&self, path: &str) {
        (**self).navigate_to(path)
    }
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn navigate_to(&self, path: &str) {
        (**self).navigate_to(path)
    }
}

/// Navigator that hands requested paths to the client router over a channel.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate_to(&self, path: &str) {
        if self.tx.send(path.to_string()).is_err() {
            debug!(path, "navigation dropped: router is gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_navigator_forwards_paths() {
        let (navigator, mut rx) = ChannelNavigator::new();
        navigator.navigate_to("/login");
        Arc::new(navigator.clone()).navigate_to("/dashboard");
        assert_eq!(rx.try_recv().unwrap(), "/login");
        assert_eq!(rx.try_recv().unwrap(), "/dashboard");
    }

    #[test]
    fn closed_router_is_ignored() {
        let (navigator, rx) = ChannelNavigator::new();
        drop(rx);
        navigator.navigate_to("/login");
    }
}
