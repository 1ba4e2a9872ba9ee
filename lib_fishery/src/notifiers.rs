//! # Notifiers
//!
//! Delivery of formatted messages to a user-interface channel. The channel is
//! any type implementing [`Channel`]; a websocket, a log sink or a test
//! double all qualify. Delivery failures are the channel's business.

use colored::Colorize;

/// An external UI endpoint accepting formatted messages.
pub trait Channel {
    /// Delivers one message. Must not panic on delivery failure.
    fn notify(&self, message: &str);
}

impl<C: Channel + ?Sized> Channel for &C {
    fn notify(&self, message: &str) {
        (**self).notify(message)
    }
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    fn notify(&self, message: &str) {
        (**self).notify(message)
    }
}

/// Stand-in for a websocket: prints `ConsoleChannel: <message>` to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleChannel;

impl Channel for ConsoleChannel {
    fn notify(&self, message: &str) {
        println!("{} {}", "ConsoleChannel:".truecolor(128, 128, 128), message);
    }
}

/// Writes each message as an info-level log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogChannel;

impl Channel for LogChannel {
    fn notify(&self, message: &str) {
        log::info!(target: "fishery::ui", "{}", message);
    }
}

/// Pushes formatted messages through the channel it owns.
#[derive(Debug, Clone)]
pub struct Notifier<C: Channel> {
    channel: C,
}

impl<C: Channel> Notifier<C> {
    /// Notifier over `channel`.
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// The owned channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Exactly one delivery per call; no batching, retry or acknowledgement.
    pub fn notify(&self, message: &str) {
        self.channel.notify(message);
    }
}

impl Default for Notifier<ConsoleChannel> {
    fn default() -> Self {
        Self::new(ConsoleChannel)
    }
}
