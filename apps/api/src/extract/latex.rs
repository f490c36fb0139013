//! LaTeX source → prose, via regex substitution.
//!
//! This is not a TeX interpreter. It keeps what a reader sees on the page
//! closely enough for keyword matching and structural heuristics: section
//! titles, item text, command arguments. Layout commands are dropped along
//! with their arguments.

use std::sync::LazyLock;

use regex::Regex;

/// Escaped specials are swapped for private-use placeholders so the brace,
/// math and comment passes cannot touch them, then restored at the end.
const ESCAPES: &[(char, char)] = &[
    ('%', '\u{E001}'),
    ('&', '\u{E002}'),
    ('$', '\u{E003}'),
    ('#', '\u{E004}'),
    ('_', '\u{E005}'),
    ('{', '\u{E006}'),
    ('}', '\u{E007}'),
];

/// `%` opens a comment unless escaped, i.e. preceded by an odd number of
/// backslashes. A `\\` line break right before it is kept.
static COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^|[^\\])((?:\\\\)*)%.*$").expect("comment regex")
});

static ESCAPED_SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\([%&$#_{}])").expect("escape regex"));

static DROPPED_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\\(?:documentclass|usepackage|RequirePackage|newcommand|renewcommand|providecommand|newenvironment|renewenvironment|setlength|addtolength|setcounter|pagestyle|thispagestyle|geometry|hypersetup|definecolor|titleformat|titlespacing|input|include|includegraphics|label|ref|vspace|hspace|vskip|hskip|color|fontsize|linespread|newcolumntype|pdfgentounicode|addcontentsline)\b\*?(?:\s*\[[^\]]*\]|\s*\{[^{}]*\})*",
    )
    .expect("dropped command regex")
});

static ENVIRONMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:begin|end)\s*\{[^}]*\}(?:\s*\[[^\]]*\])?").expect("environment regex")
});

static SECTIONING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:part|chapter|section|subsection|subsubsection|paragraph)\b\*?\s*")
        .expect("sectioning regex")
});

static ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\item\b(?:\s*\[[^\]]*\])?\s*").expect("item regex"));

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\\(?:\s*\[[^\]]*\])?").expect("line break regex"));

static ACCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\\['`^"~=.]"#).expect("accent regex"));

static SPACING_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[,;:! ]").expect("spacing regex"));

static COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\[a-zA-Z@]+\*?(?:\s*\[[^\]]*\])?").expect("command regex")
});

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("space regex"));

/// Converts LaTeX source into plain prose.
pub fn latex_to_text(source: &str) -> String {
    let without_comments = COMMENT.replace_all(source, "${1}${2}");
    let body = document_body(&without_comments);

    let mut text = ESCAPED_SPECIAL
        .replace_all(body, |caps: &regex::Captures| {
            let c = caps[1].chars().next().unwrap_or_default();
            placeholder_for(c).to_string()
        })
        .into_owned();

    text = DROPPED_COMMAND.replace_all(&text, "").into_owned();
    text = ENVIRONMENT.replace_all(&text, "\n").into_owned();
    text = SECTIONING.replace_all(&text, "\n").into_owned();
    text = ITEM.replace_all(&text, "\n• ").into_owned();
    text = LINE_BREAK.replace_all(&text, "\n").into_owned();
    text = ACCENT.replace_all(&text, "").into_owned();
    text = SPACING_SYMBOL.replace_all(&text, " ").into_owned();
    text = COMMAND.replace_all(&text, " ").into_owned();

    text = text
        .replace("}{", "} {")
        .replace("---", "\u{2014}")
        .replace("--", "\u{2013}")
        .replace("``", "\"")
        .replace("''", "\"")
        .replace('~', " ")
        .replace('&', " ")
        .replace(['{', '}', '$'], "");

    for &(literal, placeholder) in ESCAPES {
        text = text.replace(placeholder, &literal.to_string());
    }

    normalize_whitespace(&text)
}

fn placeholder_for(c: char) -> char {
    ESCAPES
        .iter()
        .find(|(literal, _)| *literal == c)
        .map(|(_, placeholder)| *placeholder)
        .unwrap_or(c)
}

/// Returns the `document` environment body when present, else the whole source.
fn document_body(source: &str) -> &str {
    const BEGIN: &str = "\\begin{document}";
    const END: &str = "\\end{document}";

    let Some(start) = source.find(BEGIN) else {
        return source;
    };
    let body = &source[start + BEGIN.len()..];
    match body.find(END) {
        Some(end) => &body[..end],
        None => body,
    }
}

/// Collapses runs of spaces, trims lines, and keeps at most one blank line.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.lines() {
        let line = HORIZONTAL_SPACE.replace_all(line.trim(), " ");
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        out.push_str(&line);
        blank_run = 0;
    }

    out
}
