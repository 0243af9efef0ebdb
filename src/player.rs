//! Player view: embed, thumbnail and watch links per platform

use serde::Serialize;

use crate::url_parser::Platform;
use crate::video::Video;

/// Shown when a platform has no thumbnail endpoint
pub const PLACEHOLDER_THUMBNAIL: &str = "https://placehold.co/120x90.png";

/// iframe `allow` list used for every embed
const IFRAME_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

/// Autoplaying embed URL, or None when the platform cannot be embedded
pub fn embed_url(video: &Video) -> Option<String> {
    match video.platform {
        Platform::YouTube => Some(format!(
            "https://www.youtube.com/embed/{}?autoplay=1",
            video.video_id
        )),
        Platform::Vimeo => Some(format!(
            "https://player.vimeo.com/video/{}?autoplay=1",
            video.video_id
        )),
        Platform::Dailymotion => Some(format!(
            "https://www.dailymotion.com/embed/video/{}?autoplay=1",
            video.video_id
        )),
        Platform::Unknown => None,
    }
}

pub fn thumbnail_url(video: &Video) -> String {
    match video.platform {
        Platform::YouTube => format!("https://img.youtube.com/vi/{}/mqdefault.jpg", video.video_id),
        Platform::Dailymotion => format!(
            "https://www.dailymotion.com/thumbnail/video/{}",
            video.video_id
        ),
        _ => PLACEHOLDER_THUMBNAIL.to_string(),
    }
}

/// Canonical page URL to hand to an external downloader.
///
/// Only YouTube and Vimeo are supported.
pub fn watch_url(video: &Video) -> Option<String> {
    match video.platform {
        Platform::YouTube => Some(format!("https://www.youtube.com/watch?v={}", video.video_id)),
        Platform::Vimeo => Some(format!("https://vimeo.com/{}", video.video_id)),
        _ => None,
    }
}

/// What the player renders for one video
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub video: Video,
    pub audio_only: bool,
    pub embed_url: Option<String>,
    pub thumbnail_url: String,
    pub watch_url: Option<String>,
}

impl PlayerView {
    pub fn new(video: &Video, audio_only: bool) -> Self {
        Self {
            video: video.clone(),
            audio_only,
            embed_url: embed_url(video),
            thumbnail_url: thumbnail_url(video),
            watch_url: watch_url(video),
        }
    }

    /// Whether an iframe should be shown
    pub fn shows_video(&self) -> bool {
        !self.audio_only && self.embed_url.is_some()
    }

    /// Render the player card as an HTML fragment
    pub fn render_html(&self) -> String {
        let mut html = String::from("<section class=\"player\">\n");

        if self.shows_video() {
            if let Some(src) = &self.embed_url {
                html.push_str(&format!(
                    "  <iframe src=\"{}\" title=\"{}\" width=\"100%\" height=\"100%\" allow=\"{}\" allowfullscreen></iframe>\n",
                    escape_html(src),
                    escape_html(&self.video.title),
                    IFRAME_ALLOW
                ));
            }
        }

        html.push_str(&format!("  <h2>{}</h2>\n", escape_html(&self.video.title)));
        if !self.video.description.is_empty() {
            html.push_str(&format!("  <p>{}</p>\n", escape_html(&self.video.description)));
        }
        if self.audio_only {
            html.push_str("  <p class=\"audio-only\">Audio-Only</p>\n");
        }
        html.push_str("</section>\n");
        html
    }
}

/// Empty-state card shown when nothing is selected
pub fn render_empty_html() -> String {
    concat!(
        "<section class=\"player empty\">\n",
        "  <p>Your personal streaming sanctuary</p>\n",
        "  <p>Add a YouTube video to your playlist to get started.</p>\n",
        "</section>\n",
    )
    .to_string()
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(platform: Platform, id: &str) -> Video {
        Video::new(id, platform, "Title <b>", "Desc & more", "")
    }

    #[test]
    fn test_embed_urls() {
        assert_eq!(
            embed_url(&video(Platform::YouTube, "dQw4w9WgXcQ")).as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1")
        );
        assert_eq!(
            embed_url(&video(Platform::Vimeo, "76979871")).as_deref(),
            Some("https://player.vimeo.com/video/76979871?autoplay=1")
        );
        assert!(embed_url(&video(Platform::Dailymotion, "x7tgad0")).is_some());
        assert_eq!(embed_url(&video(Platform::Unknown, "x")), None);
    }

    #[test]
    fn test_thumbnails_and_watch_links() {
        assert_eq!(
            thumbnail_url(&video(Platform::YouTube, "abc")),
            "https://img.youtube.com/vi/abc/mqdefault.jpg"
        );
        assert_eq!(thumbnail_url(&video(Platform::Vimeo, "1")), PLACEHOLDER_THUMBNAIL);
        assert_eq!(
            watch_url(&video(Platform::Vimeo, "76979871")).as_deref(),
            Some("https://vimeo.com/76979871")
        );
        assert_eq!(watch_url(&video(Platform::Dailymotion, "x1")), None);
    }

    #[test]
    fn test_audio_only_hides_iframe() {
        let v = video(Platform::YouTube, "dQw4w9WgXcQ");
        let html = PlayerView::new(&v, false).render_html();
        assert!(html.contains("<iframe"));
        assert!(html.contains("Title &lt;b&gt;"));
        assert!(html.contains("Desc &amp; more"));

        let audio = PlayerView::new(&v, true);
        assert!(!audio.shows_video());
        assert!(!audio.render_html().contains("<iframe"));
    }
}
