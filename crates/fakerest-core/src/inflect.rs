//! English singular/plural inflection for resource names.
//!
//! Resource tokens such as `author` / `authors` decide whether a lookup
//! returns one record or a collection, so the rules here only need to cover
//! names a test suite is likely to use.

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("movie", "movies"),
    ("cookie", "cookies"),
    ("quiz", "quizzes"),
];

const UNCOUNTABLE: &[&str] = &[
    "sheep",
    "fish",
    "series",
    "species",
    "news",
    "equipment",
    "information",
    "metadata",
];

// Words taking -ves in the plural
const F_TO_VES: &[(&str, &str)] = &[
    ("leaf", "leaves"),
    ("life", "lives"),
    ("knife", "knives"),
    ("wife", "wives"),
    ("wolf", "wolves"),
    ("shelf", "shelves"),
    ("half", "halves"),
];

// Words taking -oes in the plural
const O_TO_OES: &[(&str, &str)] = &[
    ("hero", "heroes"),
    ("potato", "potatoes"),
    ("tomato", "tomatoes"),
    ("echo", "echoes"),
    ("veto", "vetoes"),
    ("torpedo", "torpedoes"),
];

// Plural suffix -> singular suffix, first match wins
const SINGULAR_SUFFIXES: &[(&str, &str)] = &[
    ("ouses", "ouse"),
    ("auses", "ause"),
    ("uses", "us"),
    ("sses", "ss"),
    ("yses", "ysis"),
    ("xes", "x"),
    ("zzes", "zz"),
    ("ches", "ch"),
    ("shes", "sh"),
];

fn word_pairs() -> impl Iterator<Item = &'static (&'static str, &'static str)> {
    IRREGULAR.iter().chain(F_TO_VES).chain(O_TO_OES)
}

fn is_uncountable(word: &str) -> bool {
    UNCOUNTABLE.contains(&word.to_lowercase().as_str())
}

fn ends_with_consonant_y(word: &str) -> bool {
    let mut chars = word.chars().rev();
    matches!(
        (chars.next(), chars.next()),
        (Some('y'), Some(c)) if !"aeiou".contains(c)
    )
}

/// `replacement` written in the case of `source`: all caps, capitalized or as is.
fn match_case(source: &str, replacement: &str) -> String {
    let mut chars = source.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            if source.chars().count() > 1 && chars.all(|c| !c.is_lowercase()) {
                replacement.to_uppercase()
            } else {
                let mut rest = replacement.chars();
                match rest.next() {
                    Some(c) => c.to_uppercase().chain(rest).collect(),
                    None => String::new(),
                }
            }
        }
        _ => replacement.to_owned(),
    }
}

/// `word` with its last `cut` bytes replaced by `suffix`. All-caps words get an all-caps suffix.
fn replace_suffix(word: &str, cut: usize, suffix: &str) -> String {
    let Some(stem) = word
        .len()
        .checked_sub(cut)
        .and_then(|at| word.get(..at))
    else {
        return word.to_owned();
    };
    if word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase) {
        format!("{stem}{}", suffix.to_uppercase())
    } else {
        format!("{stem}{suffix}")
    }
}

/// Plural form of `word`.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() || is_uncountable(word) {
        return word.to_owned();
    }
    let lower = word.to_lowercase();
    if let Some((_, plural)) = word_pairs().find(|(singular, _)| lower == *singular) {
        return match_case(word, plural);
    }
    if word_pairs().any(|(_, p)| lower == *p) {
        return word.to_owned();
    }

    if ends_with_consonant_y(&lower) {
        replace_suffix(word, 1, "ies")
    } else if lower.ends_with("sis") {
        replace_suffix(word, 2, "es")
    } else if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        replace_suffix(word, 0, "es")
    } else {
        replace_suffix(word, 0, "s")
    }
}

/// Singular form of `word`. Already-singular words come back unchanged.
pub fn singularize(word: &str) -> String {
    if word.is_empty() || is_uncountable(word) {
        return word.to_owned();
    }
    let lower = word.to_lowercase();
    if let Some((singular, _)) = word_pairs().find(|(_, plural)| lower == *plural) {
        return match_case(word, singular);
    }
    if word_pairs().any(|(s, _)| lower == *s) {
        return word.to_owned();
    }

    if let Some(stem) = lower.strip_suffix("ies") {
        if !stem.is_empty() {
            return replace_suffix(word, 3, "y");
        }
    }
    for (plural, singular) in SINGULAR_SUFFIXES {
        if lower.len() > plural.len() && lower.ends_with(plural) {
            return replace_suffix(word, plural.len(), singular);
        }
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_owned();
    }
    match lower.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => replace_suffix(word, 1, ""),
        _ => word.to_owned(),
    }
}

/// Whether `word` is grammatically plural. Uncountable words count as singular.
pub fn is_plural(word: &str) -> bool {
    !is_uncountable(word) && singularize(word) != word
}
