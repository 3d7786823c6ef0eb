//! Content negotiation
//!
//! Picks JSON or HTML from the `Accept` header. Quality values are honoured
//! and the most specific media range wins for each type. HTML is chosen only
//! when it is strictly preferred, so ties and missing headers yield JSON.

use axum::http::header::ACCEPT;
use axum::http::HeaderMap;

/// The representation a response is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Representation {
    #[default]
    Json,
    Html,
}

impl Representation {
    /// Negotiate from request headers
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let accept = headers.get(ACCEPT).and_then(|v| v.to_str().ok());
        negotiate(accept)
    }
}

struct MediaRange<'a> {
    main: &'a str,
    sub: &'a str,
    quality: f32,
}

impl<'a> MediaRange<'a> {
    fn parse(item: &'a str) -> Option<Self> {
        let mut parts = item.split(';');
        let (main, sub) = parts.next()?.trim().split_once('/')?;
        let (main, sub) = (main.trim(), sub.trim());
        if main.is_empty() || sub.is_empty() {
            return None;
        }

        let mut quality = 1.0;
        for param in parts {
            if let Some((key, value)) = param.split_once('=') {
                if key.trim().eq_ignore_ascii_case("q") {
                    quality = value.trim().parse::<f32>().ok()?.clamp(0.0, 1.0);
                }
            }
        }

        Some(Self { main, sub, quality })
    }

    /// Specificity of the match against `main/sub`, if it matches at all
    fn specificity(&self, main: &str, sub: &str) -> Option<u8> {
        match (self.main, self.sub) {
            ("*", "*") => Some(0),
            (m, "*") if m.eq_ignore_ascii_case(main) => Some(1),
            (m, s) if m.eq_ignore_ascii_case(main) && s.eq_ignore_ascii_case(sub) => Some(2),
            _ => None,
        }
    }
}

/// Quality the client assigns to `main/sub`, taken from the most specific range
fn quality_of(ranges: &[MediaRange<'_>], main: &str, sub: &str) -> f32 {
    ranges
        .iter()
        .filter_map(|r| r.specificity(main, sub).map(|s| (s, r.quality)))
        .max_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)))
        .map(|(_, q)| q)
        .unwrap_or(0.0)
}

/// Pick a representation for an `Accept` header value
pub fn negotiate(accept: Option<&str>) -> Representation {
    let Some(accept) = accept.filter(|a| !a.trim().is_empty()) else {
        return Representation::Json;
    };

    let ranges: Vec<MediaRange<'_>> = accept.split(',').filter_map(MediaRange::parse).collect();
    let json = quality_of(&ranges, "application", "json");
    let html = quality_of(&ranges, "text", "html");

    if html > json {
        Representation::Html
    } else {
        Representation::Json
    }
}
