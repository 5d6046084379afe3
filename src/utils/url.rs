//! URL helpers for turning output files into servable URLs.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::sync::OnceLock;
use url::{Position, Url};

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Resolve `target` against `base` the way a browser resolves a link.
///
/// - Absolute base (`http://host/assets/`): standard URL joining.
/// - Absolute target or root-relative target: returned as-is.
/// - Root-relative base (`/assets/`): joined on the path only.
/// - Relative or empty base (`static/`, `""`): everything after the last `/`
///   of the base is replaced by the target.
pub fn resolve(base: &str, target: &str) -> String {
    if let Ok(base) = Url::parse(base) {
        return base
            .join(target)
            .map(String::from)
            .unwrap_or_else(|_| format!("{base}{target}"));
    }

    if target.starts_with('/') || Url::parse(target).is_ok() {
        return target.to_string();
    }

    if base.starts_with('/') {
        static DUMMY: OnceLock<Option<Url>> = OnceLock::new();
        let joined = DUMMY
            .get_or_init(|| Url::parse("http://resolve.invalid").ok())
            .as_ref()
            .and_then(|dummy| dummy.join(base).ok())
            .and_then(|base| base.join(target).ok());
        if let Some(joined) = joined {
            return joined[Position::BeforePath..].to_string();
        }
    }

    let dir = base.rfind('/').map_or("", |idx| &base[..=idx]);
    format!("{dir}{target}")
}

/// Percent-encode every segment of a `/`-separated path, keeping the separators.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_base() {
        assert_eq!(
            resolve("http://host/assets/", "sw-extra.js"),
            "http://host/assets/sw-extra.js"
        );
        assert_eq!(resolve("http://host/assets", "a.js"), "http://host/a.js");
        assert_eq!(
            resolve("http://host/assets/", "https://cdn.example/x.js"),
            "https://cdn.example/x.js"
        );
    }

    #[test]
    fn test_resolve_root_relative_base() {
        assert_eq!(resolve("/assets/", "a.js"), "/assets/a.js");
        assert_eq!(resolve("/assets/", "./js/a.js"), "/assets/js/a.js");
        assert_eq!(resolve("/assets/", "/root.js"), "/root.js");
        assert_eq!(resolve("/assets", "a.js"), "/a.js");
    }

    #[test]
    fn test_resolve_relative_base() {
        assert_eq!(resolve("", "a.js"), "a.js");
        assert_eq!(resolve("static/", "a.js"), "static/a.js");
        assert_eq!(resolve("../x/", "a.js"), "../x/a.js");
        assert_eq!(resolve("", "https://cdn.example/x.js"), "https://cdn.example/x.js");
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("js/main.1a2b.js"), "js/main.1a2b.js");
        assert_eq!(encode_path("img/my photo.png"), "img/my%20photo.png");
        assert_eq!(encode_path("a#b/c?d"), "a%23b/c%3Fd");
        assert_eq!(encode_path("日本/語.js"), "%E6%97%A5%E6%9C%AC/%E8%AA%9E.js");
    }
}
