//! Content-type strings git clients key their behavior on.

/// Build `application/x-git-<name>-<suffixes...>`, dropping absent
/// suffixes before joining. The exact output is part of the wire contract.
pub fn content_type_for(name: &str, suffixes: &[Option<&str>]) -> String {
    let mut parts = vec![name];
    parts.extend(suffixes.iter().flatten().copied());
    format!("application/x-git-{}", parts.join("-"))
}
