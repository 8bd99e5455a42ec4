use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Platform {
    YouTube,
    Facebook,
    Twitch,
    TikTok,
    Instagram,
    CustomRtmp,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::YouTube,
        Platform::Facebook,
        Platform::Twitch,
        Platform::TikTok,
        Platform::Instagram,
        Platform::CustomRtmp,
    ];

    /// Where the stream key lives in the platform's own tooling, if the platform has one.
    pub fn stream_key_hint(&self) -> Option<&'static str> {
        match self {
            Platform::YouTube => Some("YouTube Studio → Go Live → Stream Key"),
            Platform::Facebook => Some("Facebook Live → Use Stream Key → Copy Key"),
            Platform::Twitch => Some("Creator Dashboard → Settings → Stream Key"),
            Platform::TikTok => Some("TikTok Live Studio → Get Stream Key"),
            Platform::Instagram | Platform::CustomRtmp => None,
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let platform = match self {
            Platform::YouTube => "YouTube",
            Platform::Facebook => "Facebook",
            Platform::Twitch => "Twitch",
            Platform::TikTok => "TikTok",
            Platform::Instagram => "Instagram",
            Platform::CustomRtmp => "Custom RTMP",
        };
        write!(f, "{}", platform)
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "youtube" => Ok(Platform::YouTube),
            "facebook" => Ok(Platform::Facebook),
            "twitch" => Ok(Platform::Twitch),
            "tiktok" => Ok(Platform::TikTok),
            "instagram" => Ok(Platform::Instagram),
            "custom rtmp" | "custom_rtmp" | "rtmp" => Ok(Platform::CustomRtmp),
            other => Err(format!("Unsupported platform: {}", other)),
        }
    }
}
