// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns the HTML-ish reply markup into terminal text.

use std::sync::LazyLock;

use regex::Regex;

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").unwrap());

/// `<br>` becomes a newline; every other tag is dropped.
pub fn to_plain_text(markup: &str) -> String {
    let text = LINE_BREAK.replace_all(markup, "\n");
    TAG.replace_all(&text, "").into_owned()
}
