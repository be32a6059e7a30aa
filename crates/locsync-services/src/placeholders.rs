use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Collect the placeholder tokens of a string: printf (`%s`, `%1$d`),
/// brace arguments (`{name}`, `{{name}}`), ICU argument heads (`{count,`)
/// and HTML tag openers (`<b`, `</b`).
pub fn extract_placeholders(s: &str) -> BTreeSet<String> {
    let mut set = BTreeSet::new();

    static RE_PCT: OnceLock<Regex> = OnceLock::new();
    let re_pct =
        RE_PCT.get_or_init(|| Regex::new(r"%(\d+\$)?[-+0#]*\d*(\.\d+)?[sdifuxXc@]").unwrap());
    for m in re_pct.find_iter(s) {
        set.insert(m.as_str().to_string());
    }

    static RE_BRACE: OnceLock<Regex> = OnceLock::new();
    let re_brace = RE_BRACE
        .get_or_init(|| Regex::new(r"\{\{\s*[\w.]+\s*\}\}|\{\s*[\w.]+\s*\}").unwrap());
    for m in re_brace.find_iter(s) {
        set.insert(m.as_str().to_string());
    }

    static RE_ICU: OnceLock<Regex> = OnceLock::new();
    let re_icu = RE_ICU.get_or_init(|| Regex::new(r"\{\s*(\w+)\s*,").unwrap());
    for c in re_icu.captures_iter(s) {
        set.insert(format!("{{{},", &c[1]));
    }

    static RE_TAG: OnceLock<Regex> = OnceLock::new();
    let re_tag = RE_TAG.get_or_init(|| Regex::new(r"</?[A-Za-z][A-Za-z0-9-]*").unwrap());
    for m in re_tag.find_iter(s) {
        set.insert(m.as_str().to_string());
    }

    set
}

/// Placeholders present in `source` but absent from `translated`.
pub fn missing_placeholders(source: &str, translated: &str) -> Vec<String> {
    let have = extract_placeholders(translated);
    extract_placeholders(source)
        .into_iter()
        .filter(|p| !have.contains(p))
        .collect()
}
