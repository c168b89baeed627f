use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

/// The three canonical casings of one identifier, computed once at model
/// construction and reused by every generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Naming {
    pub raw: String,
    pub snake: String,
    pub camel: String,
    pub pascal: String,
}

impl Naming {
    pub fn of<T: AsRef<str>>(identifier: T) -> Self {
        let raw = identifier.as_ref().to_owned();
        Self {
            snake: raw.to_snake_case(),
            camel: raw.to_lower_camel_case(),
            pascal: raw.to_upper_camel_case(),
            raw,
        }
    }

    /// camelCase plural, used for inbound relation collection fields.
    pub fn camel_plural(&self) -> String {
        pluralize(&self.camel)
    }

    pub fn pascal_plural(&self) -> String {
        pluralize(&self.pascal)
    }
}

/// Identifier-grade English pluralization. Table names are ascii
/// identifiers, so a dictionary-backed inflection pass is not warranted.
pub(crate) fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        let penultimate = stem.chars().last();
        if !matches!(penultimate, Some('a' | 'e' | 'i' | 'o' | 'u') | None) {
            return format!("{stem}ies");
        }
    }
    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{word}es");
    }
    format!("{word}s")
}

pub(crate) fn escape_target_keyword<T>(string: T) -> String
where
    T: ToString,
{
    let string = string.to_string();
    if TARGET_KEYWORDS.iter().any(|s| s.eq(&string)) {
        format!("{string}_")
    } else {
        string
    }
}

/// Reserved words of the emitted language family that may not appear as
/// bare field or function identifiers.
pub(crate) const TARGET_KEYWORDS: [&str; 36] = [
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true",
    "try", "typeof", "var", "void", "while", "with",
];
