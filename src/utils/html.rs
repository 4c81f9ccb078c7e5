// src/utils/html.rs

use std::collections::HashSet;

use ammonia::Builder;

/// Removes every tag (and `<script>`/`<style>` content) from `input`, returning plain text.
///
/// ammonia serializes the text back as HTML, so the four entities its
/// serializer emits are decoded again. Escaping for display is left to
/// whatever renders the text.
pub fn strip_markup(input: &str) -> String {
    Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .clean(input)
        .to_string()
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

/// True when `input` carries tags, comments or entities rather than plain text.
pub fn contains_markup(input: &str) -> bool {
    strip_markup(input) != input
}
