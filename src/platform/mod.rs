//! Platform policy
//!
//! Decisions that depend on the host rather than the simulation. The core only
//! ever sees their results (a population size, a viewport, a pointer position).

/// Broad device class, used to pick a population size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceClass {
    /// Phones and tablets
    Touch,
    #[default]
    Desktop,
}

impl DeviceClass {
    /// User-agent markers that mean a touch device
    const TOUCH_MARKERS: [&'static str; 4] = ["iphone", "ipad", "ipod", "android"];

    /// Classify a browser user-agent string (case-insensitive)
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        if Self::TOUCH_MARKERS.iter().any(|m| ua.contains(m)) {
            DeviceClass::Touch
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Touch => "touch",
            DeviceClass::Desktop => "desktop",
        }
    }
}
