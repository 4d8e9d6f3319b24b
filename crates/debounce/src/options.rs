//! Edge and max-wait options

use std::time::Duration;

/// Behavior options for a debounced function
///
/// Defaults: no leading edge, trailing edge enabled, no max wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Invoke on the leading edge of the wait window
    pub leading: bool,
    /// Invoke on the trailing edge of the wait window
    pub trailing: bool,
    /// Longest an invocation may be deferred (`None` = no ceiling)
    pub max_wait: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            leading: false,
            trailing: true,
            max_wait: None,
        }
    }
}

impl Options {
    /// Both edges, with max wait equal to the wait window
    pub fn throttle(wait: Duration) -> Self {
        Self {
            leading: true,
            trailing: true,
            max_wait: Some(wait),
        }
    }

    /// Set whether the leading edge invokes
    pub fn leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    /// Set whether the trailing edge invokes
    pub fn trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }

    /// Set the max wait; a zero duration means no ceiling
    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = (!max_wait.is_zero()).then_some(max_wait);
        self
    }
}

/// Options resolved against a wait window
#[derive(Debug, Clone, Copy)]
pub(crate) struct Settings {
    pub wait: Duration,
    pub leading: bool,
    pub trailing: bool,
    /// `max(wait, max_wait)` when a ceiling is configured
    pub max_wait: Option<Duration>,
}

impl Settings {
    pub fn new(wait: Duration, options: Options) -> Self {
        Self {
            wait,
            leading: options.leading,
            trailing: options.trailing,
            max_wait: options
                .max_wait
                .filter(|max| !max.is_zero())
                .map(|max| max.max(wait)),
        }
    }

    pub fn options(&self) -> Options {
        Options {
            leading: self.leading,
            trailing: self.trailing,
            max_wait: self.max_wait,
        }
    }
}
