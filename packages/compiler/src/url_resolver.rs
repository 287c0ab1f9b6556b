//! URL Resolver
//!
//! Resolves template and style URLs relative to the URL of the component
//! that declares them. Pure string manipulation; nothing is fetched.

use once_cell::sync::Lazy;
use regex::Regex;

/// Splits a URL into scheme, authority, path, query and fragment.
static URL_PARTS_REGEXP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([a-zA-Z][a-zA-Z0-9+.\-]*):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .unwrap()
});

#[derive(Debug, Default, Clone, PartialEq)]
struct UrlParts<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

fn split(url: &str) -> UrlParts<'_> {
    match URL_PARTS_REGEXP.captures(url) {
        Some(caps) => UrlParts {
            scheme: caps.get(1).map(|m| m.as_str()),
            authority: caps.get(2).map(|m| m.as_str()),
            path: caps.get(3).map(|m| m.as_str()).unwrap_or(""),
            query: caps.get(4).map(|m| m.as_str()),
            fragment: caps.get(5).map(|m| m.as_str()),
        },
        None => UrlParts {
            path: url,
            ..UrlParts::default()
        },
    }
}

fn join(parts: &UrlParts<'_>, path: &str) -> String {
    let mut out = String::new();
    if let Some(scheme) = parts.scheme {
        out.push_str(scheme);
        out.push(':');
    }
    if let Some(authority) = parts.authority {
        out.push_str("//");
        out.push_str(authority);
    }
    out.push_str(path);
    if let Some(query) = parts.query {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = parts.fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Collapse `.` and `..` segments. A leading `..` on a relative path is kept.
fn remove_dot_segments(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let absolute = path.starts_with('/');
    let trailing_slash = path.ends_with('/') || path.ends_with("/.") || path.ends_with("/..");

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if !absolute => segments.push(".."),
                _ => {}
            },
            other => segments.push(other),
        }
    }

    let mut out = String::new();
    if absolute {
        out.push('/');
    }
    out.push_str(&segments.join("/"));
    if trailing_slash && !segments.is_empty() {
        out.push('/');
    }
    out
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UrlResolver;

impl UrlResolver {
    pub fn new() -> Self {
        UrlResolver
    }

    /// Resolve `url` against `base`. Without a base the url is returned as is.
    pub fn resolve(&self, base: Option<&str>, url: &str) -> String {
        let base = match base {
            Some(base) if !base.is_empty() => base,
            _ => return url.to_string(),
        };
        if url.is_empty() {
            return base.to_string();
        }

        let reference = split(url);
        if reference.scheme.is_some() {
            return join(&reference, &remove_dot_segments(reference.path));
        }

        let base_parts = split(base);
        let mut target = UrlParts {
            scheme: base_parts.scheme,
            authority: reference.authority.or(base_parts.authority),
            path: "",
            query: reference.query,
            fragment: reference.fragment,
        };

        if reference.authority.is_some() {
            return join(&target, &remove_dot_segments(reference.path));
        }

        let path = if reference.path.is_empty() {
            if target.query.is_none() {
                target.query = base_parts.query;
            }
            base_parts.path.to_string()
        } else if reference.path.starts_with('/') {
            remove_dot_segments(reference.path)
        } else {
            let merged = match base_parts.path.rfind('/') {
                Some(slash) => format!("{}{}", &base_parts.path[..=slash], reference.path),
                None if base_parts.authority.is_some() => format!("/{}", reference.path),
                None => reference.path.to_string(),
            };
            remove_dot_segments(&merged)
        };

        join(&target, &path)
    }
}
