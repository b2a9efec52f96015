//! Markup to plain-text normalization.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("valid regex"));

static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b.*?</style\s*>").expect("valid regex"));

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<.*?>").expect("valid regex"));

/// Reduce HTML to whitespace-collapsed plain text.
///
/// Script and style blocks are dropped with their content before any other
/// tag is removed, so their text never reaches the output. Entities are
/// decoded after tag removal, and strip-then-decode repeats until nothing
/// changes: markup hidden behind entities (`&lt;b&gt;`, `&amp;amp;`) is
/// unwrapped too, which makes `clean` idempotent. Malformed markup is never
/// an error; an unterminated `<` simply stays in the text.
pub fn clean(markup: &str) -> String {
    let mut text = strip_and_decode(markup);
    loop {
        let next = strip_and_decode(&text);
        if next == text {
            break;
        }
        text = next;
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One pass: drop script/style blocks and tags, then decode entities.
///
/// Every change shortens the text, so repeating it reaches a fixed point.
fn strip_and_decode(markup: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(markup, " ");
    let text = STYLE_BLOCK.replace_all(&text, " ");
    let text = TAG.replace_all(&text, " ");
    html_escape::decode_html_entities(&text).into_owned()
}
