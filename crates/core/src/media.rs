//! Best-effort harvesting of image/video URLs from provider results.
//!
//! Provider response shapes are not fixed, so this walks whatever it is given
//! and keeps strings that look like media URLs. URLs without a recognized
//! extension are skipped.

use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashSet;
use url::Url;

use crate::gateway_types::MediaUrls;

pub const MAX_DEPTH: usize = 8;
pub const MAX_IMAGES: usize = 24;
pub const MAX_VIDEOS: usize = 8;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp", "avif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "m4v", "mkv"];

/// A node of a dynamically shaped tree (or graph) that can hold media URLs.
pub trait MediaNode {
    /// String payload of a scalar node.
    fn text(&self) -> Option<Cow<'_, str>>;

    /// Identity of a composite node, used to avoid revisiting it.
    /// Scalars return `None`.
    fn identity(&self) -> Option<usize>;

    /// Visit direct children in their natural order.
    fn for_each_child(&self, visit: &mut dyn FnMut(&Self));
}

impl MediaNode for Value {
    fn text(&self) -> Option<Cow<'_, str>> {
        self.as_str().map(Cow::Borrowed)
    }

    fn identity(&self) -> Option<usize> {
        match self {
            Value::Array(_) | Value::Object(_) => Some(self as *const Value as usize),
            _ => None,
        }
    }

    fn for_each_child(&self, visit: &mut dyn FnMut(&Self)) {
        match self {
            Value::Array(items) => items.iter().for_each(|v| visit(v)),
            Value::Object(map) => map.values().for_each(|v| visit(v)),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// Classify a string as an image or video URL by scheme and path extension.
pub fn classify_url(candidate: &str) -> Option<MediaKind> {
    let trimmed = candidate.trim();
    let lower = trimmed.get(..8).unwrap_or(trimmed).to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return None;
    }
    let url = Url::parse(trimmed).ok()?;
    let last_segment = url.path().rsplit('/').next()?;
    let (_, ext) = last_segment.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

#[derive(Default)]
struct Walk {
    visited: HashSet<usize>,
    seen_urls: HashSet<String>,
    found: MediaUrls,
}

impl Walk {
    fn full(&self) -> bool {
        self.found.images.len() >= MAX_IMAGES && self.found.videos.len() >= MAX_VIDEOS
    }

    fn visit<N: MediaNode>(&mut self, node: &N, depth: usize) {
        if depth > MAX_DEPTH || self.full() {
            return;
        }
        if let Some(text) = node.text() {
            self.take(text.trim());
            return;
        }
        if let Some(id) = node.identity() {
            if !self.visited.insert(id) {
                return;
            }
        }
        node.for_each_child(&mut |child| self.visit(child, depth + 1));
    }

    fn take(&mut self, url: &str) {
        let Some(kind) = classify_url(url) else {
            return;
        };
        let (bucket, cap) = match kind {
            MediaKind::Image => (&mut self.found.images, MAX_IMAGES),
            MediaKind::Video => (&mut self.found.videos, MAX_VIDEOS),
        };
        if bucket.len() >= cap || !self.seen_urls.insert(url.to_string()) {
            return;
        }
        bucket.push(url.to_string());
    }
}

/// Collect image and video URLs from `root`, first-seen order, deduplicated.
pub fn extract_media<N: MediaNode>(root: &N) -> MediaUrls {
    let mut walk = Walk::default();
    walk.visit(root, 0);
    walk.found
}

#[cfg(test)]
#[path = "../tests/media_tests.rs"]
mod media_tests;
