//! YANG keyword recognition.
//!
//! Uses a sorted static array with binary search: exact match or nothing, no
//! allocation, O(log n) over the closed keyword set.

/// A YANG statement keyword.
///
/// `Custom` stands for any prefixed keyword, which is by definition a vendor
/// extension statement regardless of its local name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Action,
    Anydata,
    Anyxml,
    Argument,
    Augment,
    Base,
    BelongsTo,
    Bit,
    Case,
    Choice,
    Config,
    Contact,
    Container,
    Default,
    Description,
    Deviate,
    Deviation,
    Enum,
    ErrorAppTag,
    ErrorMessage,
    Extension,
    Feature,
    FractionDigits,
    Grouping,
    Identity,
    IfFeature,
    Import,
    Include,
    Input,
    Key,
    Leaf,
    LeafList,
    Length,
    List,
    Mandatory,
    MaxElements,
    MinElements,
    Modifier,
    Module,
    Must,
    Namespace,
    Notification,
    OrderedBy,
    Organization,
    Output,
    Path,
    Pattern,
    Position,
    Prefix,
    Presence,
    Range,
    Reference,
    Refine,
    RequireInstance,
    Revision,
    RevisionDate,
    Rpc,
    Status,
    Submodule,
    Type,
    Typedef,
    Unique,
    Units,
    Uses,
    Value,
    When,
    YangVersion,
    YinElement,
    /// Prefixed keyword: an extension statement.
    Custom,
}

/// Keyword entry mapping text to keyword tag.
struct KeywordEntry {
    text: &'static str,
    keyword: Keyword,
}

/// Sorted keyword table for binary search.
///
/// IMPORTANT: This table MUST be sorted by text in ASCII byte order. The test
/// `test_keywords_sorted` verifies this at test time. Hyphen (45) sorts
/// before both digits and letters.
static KEYWORDS: &[KeywordEntry] = &[
    KeywordEntry {
        text: "action",
        keyword: Keyword::Action,
    },
    KeywordEntry {
        text: "anydata",
        keyword: Keyword::Anydata,
    },
    KeywordEntry {
        text: "anyxml",
        keyword: Keyword::Anyxml,
    },
    KeywordEntry {
        text: "argument",
        keyword: Keyword::Argument,
    },
    KeywordEntry {
        text: "augment",
        keyword: Keyword::Augment,
    },
    KeywordEntry {
        text: "base",
        keyword: Keyword::Base,
    },
    KeywordEntry {
        text: "belongs-to",
        keyword: Keyword::BelongsTo,
    },
    KeywordEntry {
        text: "bit",
        keyword: Keyword::Bit,
    },
    KeywordEntry {
        text: "case",
        keyword: Keyword::Case,
    },
    KeywordEntry {
        text: "choice",
        keyword: Keyword::Choice,
    },
    KeywordEntry {
        text: "config",
        keyword: Keyword::Config,
    },
    KeywordEntry {
        text: "contact",
        keyword: Keyword::Contact,
    },
    KeywordEntry {
        text: "container",
        keyword: Keyword::Container,
    },
    KeywordEntry {
        text: "default",
        keyword: Keyword::Default,
    },
    KeywordEntry {
        text: "description",
        keyword: Keyword::Description,
    },
    KeywordEntry {
        text: "deviate",
        keyword: Keyword::Deviate,
    },
    KeywordEntry {
        text: "deviation",
        keyword: Keyword::Deviation,
    },
    KeywordEntry {
        text: "enum",
        keyword: Keyword::Enum,
    },
    KeywordEntry {
        text: "error-app-tag",
        keyword: Keyword::ErrorAppTag,
    },
    KeywordEntry {
        text: "error-message",
        keyword: Keyword::ErrorMessage,
    },
    KeywordEntry {
        text: "extension",
        keyword: Keyword::Extension,
    },
    KeywordEntry {
        text: "feature",
        keyword: Keyword::Feature,
    },
    KeywordEntry {
        text: "fraction-digits",
        keyword: Keyword::FractionDigits,
    },
    KeywordEntry {
        text: "grouping",
        keyword: Keyword::Grouping,
    },
    KeywordEntry {
        text: "identity",
        keyword: Keyword::Identity,
    },
    KeywordEntry {
        text: "if-feature",
        keyword: Keyword::IfFeature,
    },
    KeywordEntry {
        text: "import",
        keyword: Keyword::Import,
    },
    KeywordEntry {
        text: "include",
        keyword: Keyword::Include,
    },
    KeywordEntry {
        text: "input",
        keyword: Keyword::Input,
    },
    KeywordEntry {
        text: "key",
        keyword: Keyword::Key,
    },
    KeywordEntry {
        text: "leaf",
        keyword: Keyword::Leaf,
    },
    KeywordEntry {
        text: "leaf-list",
        keyword: Keyword::LeafList,
    },
    KeywordEntry {
        text: "length",
        keyword: Keyword::Length,
    },
    KeywordEntry {
        text: "list",
        keyword: Keyword::List,
    },
    KeywordEntry {
        text: "mandatory",
        keyword: Keyword::Mandatory,
    },
    KeywordEntry {
        text: "max-elements",
        keyword: Keyword::MaxElements,
    },
    KeywordEntry {
        text: "min-elements",
        keyword: Keyword::MinElements,
    },
    KeywordEntry {
        text: "modifier",
        keyword: Keyword::Modifier,
    },
    KeywordEntry {
        text: "module",
        keyword: Keyword::Module,
    },
    KeywordEntry {
        text: "must",
        keyword: Keyword::Must,
    },
    KeywordEntry {
        text: "namespace",
        keyword: Keyword::Namespace,
    },
    KeywordEntry {
        text: "notification",
        keyword: Keyword::Notification,
    },
    KeywordEntry {
        text: "ordered-by",
        keyword: Keyword::OrderedBy,
    },
    KeywordEntry {
        text: "organization",
        keyword: Keyword::Organization,
    },
    KeywordEntry {
        text: "output",
        keyword: Keyword::Output,
    },
    KeywordEntry {
        text: "path",
        keyword: Keyword::Path,
    },
    KeywordEntry {
        text: "pattern",
        keyword: Keyword::Pattern,
    },
    KeywordEntry {
        text: "position",
        keyword: Keyword::Position,
    },
    KeywordEntry {
        text: "prefix",
        keyword: Keyword::Prefix,
    },
    KeywordEntry {
        text: "presence",
        keyword: Keyword::Presence,
    },
    KeywordEntry {
        text: "range",
        keyword: Keyword::Range,
    },
    KeywordEntry {
        text: "reference",
        keyword: Keyword::Reference,
    },
    KeywordEntry {
        text: "refine",
        keyword: Keyword::Refine,
    },
    KeywordEntry {
        text: "require-instance",
        keyword: Keyword::RequireInstance,
    },
    KeywordEntry {
        text: "revision",
        keyword: Keyword::Revision,
    },
    KeywordEntry {
        text: "revision-date",
        keyword: Keyword::RevisionDate,
    },
    KeywordEntry {
        text: "rpc",
        keyword: Keyword::Rpc,
    },
    KeywordEntry {
        text: "status",
        keyword: Keyword::Status,
    },
    KeywordEntry {
        text: "submodule",
        keyword: Keyword::Submodule,
    },
    KeywordEntry {
        text: "type",
        keyword: Keyword::Type,
    },
    KeywordEntry {
        text: "typedef",
        keyword: Keyword::Typedef,
    },
    KeywordEntry {
        text: "unique",
        keyword: Keyword::Unique,
    },
    KeywordEntry {
        text: "units",
        keyword: Keyword::Units,
    },
    KeywordEntry {
        text: "uses",
        keyword: Keyword::Uses,
    },
    KeywordEntry {
        text: "value",
        keyword: Keyword::Value,
    },
    KeywordEntry {
        text: "when",
        keyword: Keyword::When,
    },
    KeywordEntry {
        text: "yang-version",
        keyword: Keyword::YangVersion,
    },
    KeywordEntry {
        text: "yin-element",
        keyword: Keyword::YinElement,
    },
];

/// Recognize a statement keyword.
///
/// `name` is the local part of the statement keyword and `prefix_len` the
/// length of the prefix that preceded it, zero when unprefixed. Any prefixed
/// keyword is an extension statement and yields [`Keyword::Custom`] without a
/// table lookup. Recognition is exact: a string that merely starts with a
/// keyword is not a keyword.
#[must_use]
pub fn match_keyword(name: &str, prefix_len: usize) -> Option<Keyword> {
    if prefix_len > 0 {
        return Some(Keyword::Custom);
    }
    KEYWORDS
        .binary_search_by(|entry| entry.text.cmp(name))
        .ok()
        .map(|idx| KEYWORDS[idx].keyword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_sorted() {
        for window in KEYWORDS.windows(2) {
            assert!(
                window[0].text < window[1].text,
                "Keywords not sorted: {:?} should come before {:?}",
                window[0].text,
                window[1].text
            );
        }
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(match_keyword("module", 0), Some(Keyword::Module));
        assert_eq!(match_keyword("belongs-to", 0), Some(Keyword::BelongsTo));
        assert_eq!(match_keyword("typedef", 0), Some(Keyword::Typedef));
        assert_eq!(match_keyword("type", 0), Some(Keyword::Type));
        assert_eq!(match_keyword("revision-date", 0), Some(Keyword::RevisionDate));
        assert_eq!(match_keyword("yin-element", 0), Some(Keyword::YinElement));

        assert_eq!(match_keyword("ifIndex", 0), None);
        assert_eq!(match_keyword("modules", 0), None);
        assert_eq!(match_keyword("", 0), None);
    }

    #[test]
    fn test_exact_match_at_boundaries() {
        assert_eq!(match_keyword("leaf-list", 0), Some(Keyword::LeafList));
        assert_eq!(match_keyword("leaf", 0), Some(Keyword::Leaf));
        assert_eq!(match_keyword("leafx", 0), None);
        assert_eq!(match_keyword("leaf-", 0), None);
        assert_eq!(match_keyword("lea", 0), None);
    }

    #[test]
    fn test_prefixed_is_custom() {
        // A prefixed keyword is a vendor extension whatever its local name.
        assert_eq!(match_keyword("annotation", 3), Some(Keyword::Custom));
        assert_eq!(match_keyword("module", 2), Some(Keyword::Custom));
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(match_keyword("Module", 0), None);
        assert_eq!(match_keyword("LEAF", 0), None);
    }

    #[test]
    fn test_no_two_entries_share_text() {
        for (i, a) in KEYWORDS.iter().enumerate() {
            for b in &KEYWORDS[i + 1..] {
                assert_ne!(a.text, b.text);
            }
        }
    }
}
