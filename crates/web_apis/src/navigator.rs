//! Navigator API implementation.

/// Navigator API implementation, reduced to the capability probes the site uses.
#[derive(Clone, Debug)]
pub struct Navigator {
    /// User agent string.
    user_agent: String,
    /// Max touch points.
    max_touch_points: u32,
    /// Whether the environment exposes touch events.
    touch_events: bool,
}

impl Navigator {
    /// Create a new Navigator describing a desktop pointer environment.
    pub fn new() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) ScenicSite/0.1".to_string(),
            max_touch_points: 0,
            touch_events: false,
        }
    }

    /// Desktop environment with a mouse and no touch support.
    pub fn desktop() -> Self {
        Self::new()
    }

    /// Touch-first environment, e.g. a phone.
    pub fn touch() -> Self {
        Self::new()
            .with_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) ScenicSite/0.1")
            .with_max_touch_points(5)
            .with_touch_events(true)
    }

    /// Create with custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set max touch points.
    pub fn with_max_touch_points(mut self, points: u32) -> Self {
        self.max_touch_points = points;
        self
    }

    pub fn with_touch_events(mut self, enabled: bool) -> Self {
        self.touch_events = enabled;
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn max_touch_points(&self) -> u32 {
        self.max_touch_points
    }

    /// A device counts as touch when it exposes touch events or reports any touch points.
    pub fn is_touch_device(&self) -> bool {
        self.touch_events || self.max_touch_points > 0
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
