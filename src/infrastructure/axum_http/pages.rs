use anyhow::{Context, Result};
use axum::response::Html;
use handlebars::Handlebars;
use serde_json::{Map, Value, json};

use crate::{
    domain::value_objects::{
        enums::platforms::Platform,
        streams::StreamModel,
        users::UserModel,
        videos::VideoModel,
    },
    infrastructure::axum_http::{error_responses::AppError, session::Flash},
};

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Register,
    Dashboard,
    Gallery,
    Streams,
    Settings,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Login,
        Page::Register,
        Page::Dashboard,
        Page::Gallery,
        Page::Streams,
        Page::Settings,
    ];

    fn template_name(&self) -> &'static str {
        match self {
            Page::Login => "login",
            Page::Register => "register",
            Page::Dashboard => "dashboard",
            Page::Gallery => "gallery",
            Page::Streams => "streams",
            Page::Settings => "settings",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Page::Login => include_str!("../../../templates/login.hbs"),
            Page::Register => include_str!("../../../templates/register.hbs"),
            Page::Dashboard => include_str!("../../../templates/dashboard.hbs"),
            Page::Gallery => include_str!("../../../templates/gallery.hbs"),
            Page::Streams => include_str!("../../../templates/streams.hbs"),
            Page::Settings => include_str!("../../../templates/settings.hbs"),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Login => "Login",
            Page::Register => "Register",
            Page::Dashboard => "Dashboard",
            Page::Gallery => "Video Gallery",
            Page::Streams => "Live Streaming",
            Page::Settings => "Settings",
        }
    }
}

/// The parts of a page that do not depend on which page it is.
#[derive(Debug, Default)]
pub struct PageFrame {
    pub user: Option<UserModel>,
    pub flash: Option<Flash>,
    pub error: Option<String>,
}

impl PageFrame {
    pub fn new(user: Option<UserModel>, flash: Option<Flash>) -> Self {
        Self {
            user,
            flash,
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        handlebars
            .register_partial("header", include_str!("../../../templates/partials/header.hbs"))
            .context("Failed to register header partial")?;
        handlebars
            .register_partial("footer", include_str!("../../../templates/partials/footer.hbs"))
            .context("Failed to register footer partial")?;

        for page in Page::ALL {
            handlebars
                .register_template_string(page.template_name(), page.source())
                .with_context(|| format!("Failed to register {} template", page.template_name()))?;
        }

        Ok(Self { handlebars })
    }

    pub fn render(&self, page: Page, frame: PageFrame, data: Value) -> Result<Html<String>, AppError> {
        let mut context = match data {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };

        context.insert("title".to_string(), json!(page.title()));
        context.insert("page".to_string(), json!(page.template_name()));
        context.insert("user".to_string(), json!(frame.user));
        context.insert("flash".to_string(), json!(frame.flash));
        context.insert("error".to_string(), json!(frame.error));

        let html = self
            .handlebars
            .render(page.template_name(), &Value::Object(context))
            .with_context(|| format!("Failed to render {} page", page.template_name()))?;

        Ok(Html(html))
    }
}

pub fn video_rows(videos: &[VideoModel]) -> Value {
    Value::Array(
        videos
            .iter()
            .map(|video| {
                json!({
                    "id": video.id,
                    "original_name": video.original_name,
                    "filename": video.filename,
                    "file_path": video.file_path,
                    "size": video.file_size.map(format_file_size),
                    "uploaded_at": video.created_at.format(DISPLAY_TIME_FORMAT).to_string(),
                })
            })
            .collect(),
    )
}

pub fn stream_rows(streams: &[StreamModel]) -> Value {
    Value::Array(
        streams
            .iter()
            .map(|stream| {
                json!({
                    "id": stream.id,
                    "title": stream.title,
                    "platform": stream.platform.to_string(),
                    "video_id": stream.video_id,
                    "status": stream.status.to_string(),
                    "scheduled_time": stream
                        .scheduled_time
                        .map(|t| t.format(DISPLAY_TIME_FORMAT).to_string()),
                    "created_at": stream.created_at.format(DISPLAY_TIME_FORMAT).to_string(),
                })
            })
            .collect(),
    )
}

pub fn platform_options(selected: &str) -> Value {
    let selected = selected.parse::<Platform>().ok();

    Value::Array(
        Platform::ALL
            .iter()
            .map(|platform| {
                json!({
                    "name": platform.to_string(),
                    "selected": Some(*platform) == selected,
                    "hint": platform.stream_key_hint(),
                })
            })
            .collect(),
    )
}

pub fn video_options(videos: &[VideoModel], selected: &str) -> Value {
    let selected = selected.trim().parse::<i32>().ok();

    Value::Array(
        videos
            .iter()
            .map(|video| {
                json!({
                    "id": video.id,
                    "name": video.original_name,
                    "selected": Some(video.id) == selected,
                })
            })
            .collect(),
    )
}

fn format_file_size(bytes: i64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes = bytes as f64;
    if bytes >= GIB {
        format!("{:.1} GB", bytes / GIB)
    } else if bytes >= MIB {
        format!("{:.1} MB", bytes / MIB)
    } else if bytes >= KIB {
        format!("{:.1} KB", bytes / KIB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::value_objects::enums::stream_statuses::StreamStatus,
        infrastructure::axum_http::session::FlashKind,
    };
    use chrono::Utc;

    fn alice() -> UserModel {
        UserModel {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn every_page_renders_signed_out_and_in() {
        let renderer = PageRenderer::new().unwrap();

        for page in Page::ALL {
            let Html(signed_out) = renderer.render(page, PageFrame::default(), Value::Null).unwrap();
            assert!(signed_out.contains(page.title()));
            assert!(!signed_out.contains("action=\"/logout\""));

            let Html(signed_in) = renderer
                .render(page, PageFrame::new(Some(alice()), None), Value::Null)
                .unwrap();
            assert!(signed_in.contains("action=\"/logout\""));
        }
    }

    #[test]
    fn error_and_flash_are_shown_escaped() {
        let renderer = PageRenderer::new().unwrap();
        let frame = PageFrame::new(
            None,
            Some(Flash {
                kind: FlashKind::Success,
                message: "Account created!".to_string(),
            }),
        )
        .with_error("<b>Invalid username or password</b>");

        let Html(html) = renderer.render(Page::Login, frame, json!({})).unwrap();

        assert!(html.contains("Account created!"));
        assert!(html.contains("&lt;b&gt;Invalid username or password&lt;/b&gt;"));
    }

    #[test]
    fn stream_rows_carry_display_values() {
        let stream = StreamModel {
            id: 3,
            user_id: 1,
            title: "Launch".to_string(),
            platform: Platform::YouTube,
            video_id: None,
            status: StreamStatus::Active,
            scheduled_time: None,
            created_at: Utc::now(),
        };

        let rows = stream_rows(&[stream]);

        assert_eq!(rows[0]["platform"], "YouTube");
        assert_eq!(rows[0]["status"], "active");
        assert!(rows[0]["created_at"].is_string());
        assert!(rows[0]["scheduled_time"].is_null());
    }

    #[test]
    fn platform_options_keep_selection_and_hints() {
        let options = platform_options("twitch");

        assert_eq!(options.as_array().map(Vec::len), Some(6));
        assert_eq!(options[2]["name"], "Twitch");
        assert_eq!(options[2]["selected"], true);
        assert_eq!(options[0]["selected"], false);
        assert!(options[5]["hint"].is_null());
    }

    #[test]
    fn file_sizes_are_human_readable() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }
}
