use crate::core::media::{classify_url, extract_media, MediaKind, MediaNode, MAX_IMAGES, MAX_VIDEOS};
use serde_json::{json, Value};
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn finds_image_and_video_in_nested_result() {
    let result = json!({
        "data": {"url": "https://x.com/a.png"},
        "other": {"u": "https://x.com/b.mp4"}
    });
    let media = extract_media(&result);
    assert_eq!(media.images, vec!["https://x.com/a.png"]);
    assert_eq!(media.videos, vec!["https://x.com/b.mp4"]);
}

#[test]
fn keeps_first_seen_order_and_drops_duplicates() {
    let result = json!({
        "data": {
            "task_result": {
                "videos": [
                    {"url": "https://cdn.example.com/v/2.mp4", "cover": "https://cdn.example.com/c/2.jpg"},
                    {"url": "https://cdn.example.com/v/1.mp4"}
                ]
            }
        },
        "preview": "https://cdn.example.com/c/2.jpg"
    });
    let media = extract_media(&result);
    assert_eq!(
        media.videos,
        vec!["https://cdn.example.com/v/2.mp4", "https://cdn.example.com/v/1.mp4"]
    );
    assert_eq!(media.images, vec!["https://cdn.example.com/c/2.jpg"]);
}

#[test]
fn ignores_non_http_and_unknown_extensions() {
    let result = json!([
        "ftp://x.com/a.png",
        "data:image/png;base64,AAAA",
        "https://x.com/download?id=7",
        "https://x.com/file.txt",
        "https://x.com/Photo.JPEG?sig=abc#frag",
        42,
        null,
        true
    ]);
    let media = extract_media(&result);
    assert_eq!(media.images, vec!["https://x.com/Photo.JPEG?sig=abc#frag"]);
    assert!(media.videos.is_empty());
}

#[test]
fn classify_uses_the_last_path_segment() {
    assert_eq!(classify_url("https://x.com/a.png/view"), None);
    assert_eq!(classify_url("https://x.com/clip.webm"), Some(MediaKind::Video));
    assert_eq!(classify_url("  HTTPS://x.com/img.webp  "), Some(MediaKind::Image));
    assert_eq!(classify_url("https://x.com/"), None);
}

#[test]
fn caps_images_higher_than_videos() {
    let images: Vec<Value> = (0..40)
        .map(|i| json!(format!("https://x.com/{i}.png")))
        .collect();
    let videos: Vec<Value> = (0..40)
        .map(|i| json!(format!("https://x.com/{i}.mp4")))
        .collect();
    let media = extract_media(&json!({"images": images, "videos": videos}));
    assert_eq!(media.images.len(), MAX_IMAGES);
    assert_eq!(media.videos.len(), MAX_VIDEOS);
    assert!(MAX_IMAGES > MAX_VIDEOS);
    assert_eq!(media.images[0], "https://x.com/0.png");
}

#[test]
fn stops_descending_past_the_depth_bound() {
    let mut deep = json!("https://x.com/deep.png");
    for _ in 0..20 {
        deep = json!({"next": deep});
    }
    let media = extract_media(&json!({"shallow": "https://x.com/top.png", "chain": deep}));
    assert_eq!(media.images, vec!["https://x.com/top.png"]);
}

enum Node {
    Text(String),
    Map(Vec<Rc<RefCell<Node>>>),
}

type Shared = Rc<RefCell<Node>>;

impl MediaNode for Shared {
    fn text(&self) -> Option<Cow<'_, str>> {
        match &*self.borrow() {
            Node::Text(s) => Some(Cow::Owned(s.clone())),
            Node::Map(_) => None,
        }
    }

    fn identity(&self) -> Option<usize> {
        match &*self.borrow() {
            Node::Map(_) => Some(Rc::as_ptr(self) as usize),
            Node::Text(_) => None,
        }
    }

    fn for_each_child(&self, visit: &mut dyn FnMut(&Self)) {
        let children = match &*self.borrow() {
            Node::Map(children) => children.clone(),
            Node::Text(_) => Vec::new(),
        };
        children.iter().for_each(|child| visit(child));
    }
}

#[test]
fn self_referential_graph_terminates() {
    let root: Shared = Rc::new(RefCell::new(Node::Map(Vec::new())));
    let leaf: Shared = Rc::new(RefCell::new(Node::Text("https://x.com/loop.gif".into())));
    if let Node::Map(children) = &mut *root.borrow_mut() {
        children.push(leaf);
        children.push(root.clone());
    }

    let media = extract_media(&root);
    assert_eq!(media.images, vec!["https://x.com/loop.gif"]);
    assert!(media.videos.is_empty());

    // break the cycle so the test does not leak
    let mut node = root.borrow_mut();
    if let Node::Map(children) = &mut *node {
        children.clear();
    }
}
