//! Pretty printing for selectors
//!
//! `Display` renders the same string syntax `parse` accepts, so a selector
//! can travel as text and come back structurally intact. Printing is
//! canonical: one-element `Several` predicates render in single-element form,
//! field names render bare whenever they are plain identifiers, and markers
//! always come out `!` before `?`.

use std::fmt::{self, Display};

use crate::ast::{IndexPredicate, NamePredicate, Selector};

impl Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::This => write!(f, "."),
            other => write_steps(other, f),
        }
    }
}

/// Render a selector as its step sequence; an embedded `This` contributes
/// nothing, so piped chains concatenate flat.
fn write_steps(selector: &Selector, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match selector {
        Selector::This => Ok(()),
        Selector::Pipe { first, second } => {
            write_steps(first, f)?;
            write_steps(second, f)
        }
        Selector::Iterate { strict } => {
            write!(f, ".[]")?;
            write_markers(f, false, *strict)
        }
        Selector::Index { predicate, strict } => {
            write!(f, ".[{}]", predicate)?;
            write_markers(f, false, *strict)
        }
        Selector::Name {
            predicate,
            strict,
            mandatory,
        } => {
            match bare_name(predicate) {
                Some(name) => write!(f, ".{}", name)?,
                None => write!(f, ".[{}]", predicate)?,
            }
            write_markers(f, *mandatory, *strict)
        }
    }
}

fn write_markers(f: &mut fmt::Formatter<'_>, mandatory: bool, strict: bool) -> fmt::Result {
    if mandatory {
        write!(f, "!")?;
    }
    if !strict {
        write!(f, "?")?;
    }
    Ok(())
}

impl Display for IndexPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexPredicate::Single(at) => write!(f, "{}", at),
            IndexPredicate::Several(indices) => {
                for (i, at) in indices.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", at)?;
                }
                Ok(())
            }
            IndexPredicate::Range { start, end } => write!(f, "{}:{}", start, end),
        }
    }
}

impl Display for NamePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamePredicate::Single(name) => write!(f, "\"{}\"", escape_string(name)),
            NamePredicate::Several(names) => {
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "\"{}\"", escape_string(name))?;
                }
                Ok(())
            }
        }
    }
}

/// The bare (unbracketed, unquoted) rendering of a name predicate, if it has
/// one: a single identifier-shaped name, counting one-element `Several`s.
fn bare_name(predicate: &NamePredicate) -> Option<&str> {
    let name = match predicate {
        NamePredicate::Single(name) => name,
        NamePredicate::Several(names) if names.len() == 1 => &names[0],
        NamePredicate::Several(_) => return None,
    };
    if is_ident(name) { Some(name.as_str()) } else { None }
}

fn is_ident(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::ast::Selector;
    use crate::builder::{SelectorBuilder, root};
    use crate::parse::parse;

    #[test]
    fn display_identity() {
        assert_eq!(Selector::This.to_string(), ".");
    }

    #[test]
    fn display_steps() {
        let selector = root().field("a").iterate().indices(2, [0]).compile();
        assert_eq!(selector.to_string(), ".a.[].[2,0]");
    }

    #[test]
    fn display_markers_in_canonical_order() {
        assert_eq!(parse(".a?!").unwrap().to_string(), ".a!?");
    }

    #[test]
    fn display_quotes_non_ident_names() {
        let selector = root().field("two words").compile();
        assert_eq!(selector.to_string(), r#".["two words"]"#);
        assert_eq!(parse(&selector.to_string()).unwrap(), selector);
    }

    #[test]
    fn display_single_element_several_collapses() {
        let selector = root().fields("a", std::iter::empty::<&str>()).compile();
        assert_eq!(selector.to_string(), ".a");
        // Re-parsing yields the Single form; the text is stable from there on.
        assert_eq!(parse(".a").unwrap().to_string(), ".a");
    }

    #[test]
    fn display_parse_round_trip() {
        for text in [
            ".",
            ".a",
            ".a!",
            ".a?",
            ".a!?",
            ".[]",
            ".[]?",
            ".[0]",
            ".[2,0]",
            ".[1:4]",
            r#".["b","c"]!"#,
            r#".["\"q\""]"#,
            ".entries.[].name!.[0:3]",
        ] {
            let selector = parse(text).unwrap();
            assert_eq!(selector.to_string(), text, "canonical text changed: {text}");
        }
    }
}
