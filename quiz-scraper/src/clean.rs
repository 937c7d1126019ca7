//! Shared text-cleaning rules for both extraction strategies.

use std::sync::LazyLock;

use regex::Regex;

static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("style regex"));
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("script regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));

/// Collapses whitespace runs to single spaces and trims.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduces an HTML snippet to its visible text: strips style/script
/// blocks, strips remaining tags, decodes `&nbsp;`, collapses
/// whitespace, trims.
pub fn strip_markup(html: &str) -> String {
    let no_style = STYLE_RE.replace_all(html, " ");
    let no_script = SCRIPT_RE.replace_all(&no_style, " ");
    let no_tags = TAG_RE.replace_all(&no_script, " ");
    clean_text(&no_tags.replace("&nbsp;", " "))
}
