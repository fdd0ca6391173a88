//! Site configuration.

use media::{AutoplayPolicy, VideoConfig};
use web_apis::Navigator;

/// Site configuration.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Site name, used for the logo and footer.
    pub site_name: String,
    /// Location shown in the footer.
    pub location: String,
    /// Origin pages are resolved against.
    pub base_url: String,
    /// Year shown in the footer copyright.
    pub copyright_year: i32,
    /// Google tag id for pages that include analytics.
    pub analytics_id: Option<String>,
    /// Emulate a touch device.
    pub touch: bool,
    /// Autoplay policy of the emulated environment.
    pub autoplay_policy: AutoplayPolicy,
    /// Video preview timing.
    pub video: VideoConfig,
}

impl SiteConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a phone configuration.
    pub fn mobile() -> Self {
        Self {
            touch: true,
            ..Self::default()
        }
    }

    pub fn with_touch(mut self, touch: bool) -> Self {
        self.touch = touch;
        self
    }

    pub fn with_autoplay_policy(mut self, policy: AutoplayPolicy) -> Self {
        self.autoplay_policy = policy;
        self
    }

    pub fn with_copyright_year(mut self, year: i32) -> Self {
        self.copyright_year = year;
        self
    }

    pub fn with_video(mut self, video: VideoConfig) -> Self {
        self.video = video;
        self
    }

    pub fn with_analytics_id(mut self, id: Option<&str>) -> Self {
        self.analytics_id = id.map(str::to_string);
        self
    }

    /// Navigator matching the emulated device.
    pub fn navigator(&self) -> Navigator {
        if self.touch {
            Navigator::touch()
        } else {
            Navigator::desktop()
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "Scenic Serenity Arts".to_string(),
            location: "Chattanooga, TN".to_string(),
            base_url: "https://scenicserenityarts.com/".to_string(),
            copyright_year: 2025,
            analytics_id: Some("G-YHZKZ8TB6S".to_string()),
            touch: false,
            autoplay_policy: AutoplayPolicy::Allowed,
            video: VideoConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert!(!config.touch);
        assert!(!config.navigator().is_touch_device());
        assert_eq!(config.analytics_id.as_deref(), Some("G-YHZKZ8TB6S"));
    }

    #[test]
    fn test_mobile_config() {
        let config = SiteConfig::mobile();
        assert!(config.navigator().is_touch_device());
    }

    #[test]
    fn test_config_builder() {
        let config = SiteConfig::new()
            .with_autoplay_policy(AutoplayPolicy::Blocked)
            .with_copyright_year(2030)
            .with_analytics_id(None)
            .with_video(VideoConfig::new().with_long_press(Duration::from_millis(800)));

        assert_eq!(config.autoplay_policy, AutoplayPolicy::Blocked);
        assert_eq!(config.copyright_year, 2030);
        assert!(config.analytics_id.is_none());
        assert_eq!(config.video.long_press, Duration::from_millis(800));
    }
}
