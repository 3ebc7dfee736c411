//! Soft wrapping of long signatures.
//!
//! A signature that exceeds the target width is split at the commas of its
//! widest bracketed group. Only whitespace is inserted or removed, so the
//! wrapped line reads the same to a compiler as the original.

/// Indentation of continuation lines.
const INDENT: &str = "    ";

/// Replace `remove` bytes at `at` with `insert`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    pub at: usize,
    pub remove: usize,
    pub insert: String,
}

impl Edit {
    /// Change in length caused by this edit.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn delta(&self) -> isize {
        self.insert.len() as isize - self.remove as isize
    }
}

#[derive(Debug)]
struct Group {
    open: usize,
    close: usize,
    commas: Vec<usize>,
}

/// Find the bracketed groups of `text` that contain top-level commas.
///
/// Arrows (`=>`, `->`) and quoted strings are skipped. Unbalanced input
/// yields only the groups that did close.
fn comma_groups(text: &str) -> Vec<Group> {
    let bytes = text.as_bytes();
    let mut stack: Vec<Group> = Vec::new();
    let mut groups = Vec::new();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'"' | b'\'' | b'`' => quote = Some(b),
            b'(' | b'[' | b'{' | b'<' => stack.push(Group {
                open: i,
                close: 0,
                commas: Vec::new(),
            }),
            b'>' if i > 0 && matches!(bytes[i - 1], b'=' | b'-') => {}
            b')' | b']' | b'}' | b'>' => {
                if let Some(mut group) = stack.pop() {
                    group.close = i;
                    if !group.commas.is_empty() {
                        groups.push(group);
                    }
                }
            }
            b',' => {
                if let Some(group) = stack.last_mut() {
                    group.commas.push(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    groups
}

fn whitespace_after(text: &str, pos: usize) -> usize {
    text[pos..]
        .bytes()
        .take_while(u8::is_ascii_whitespace)
        .count()
}

fn whitespace_before(text: &str, pos: usize) -> usize {
    text[..pos]
        .bytes()
        .rev()
        .take_while(u8::is_ascii_whitespace)
        .count()
}

/// Compute the edits that wrap `text` to roughly `width` columns.
///
/// Returns no edits when the text already fits or has no group to split.
/// The widest group breaks after its opening bracket, after each of its
/// commas and before its closing bracket.
#[must_use]
pub fn wrap_signature(text: &str, width: usize) -> Vec<Edit> {
    if text.chars().count() <= width {
        return Vec::new();
    }
    let Some(group) = comma_groups(text)
        .into_iter()
        .max_by(|a, b| (a.close - a.open).cmp(&(b.close - b.open)).then(b.open.cmp(&a.open)))
    else {
        return Vec::new();
    };

    let break_line = format!("\n{INDENT}");
    let mut edits = Vec::with_capacity(group.commas.len() + 2);

    let after_open = group.open + 1;
    edits.push(Edit {
        at: after_open,
        remove: whitespace_after(text, after_open),
        insert: break_line.clone(),
    });

    let close_ws = whitespace_before(text, group.close);
    let close_at = group.close - close_ws;
    for comma in &group.commas {
        let at = comma + 1;
        if at >= close_at {
            continue;
        }
        edits.push(Edit {
            at,
            remove: whitespace_after(text, at),
            insert: break_line.clone(),
        });
    }

    edits.push(Edit {
        at: close_at,
        remove: close_ws,
        insert: "\n".to_owned(),
    });
    edits
}

/// Apply sorted, non-overlapping edits to `text`.
#[must_use]
pub fn apply_edits(text: &str, edits: &[Edit]) -> String {
    let mut out = String::with_capacity(text.len() + edits.len() * (INDENT.len() + 1));
    let mut pos = 0;
    for edit in edits {
        out.push_str(&text[pos..edit.at]);
        out.push_str(&edit.insert);
        pos = edit.at + edit.remove;
    }
    out.push_str(&text[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wrap(text: &str, width: usize) -> String {
        apply_edits(text, &wrap_signature(text, width))
    }

    fn strip_whitespace(text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_short_line_unchanged() {
        assert!(wrap_signature("run(a: string): void", 60).is_empty());
    }

    #[test]
    fn test_wraps_parameter_list() {
        let text = "registerSuite(name: string, factory: SuiteFactory, options: SuiteOptions): Suite";
        assert_eq!(
            wrap(text, 60),
            "registerSuite(\n    name: string,\n    factory: SuiteFactory,\n    options: SuiteOptions\n): Suite"
        );
    }

    #[test]
    fn test_widest_group_wins() {
        let text = "on<K, V>(event: Map<K, V>, listener: (event: K, value: V) => void): Handle";
        let wrapped = wrap(text, 40);
        assert!(wrapped.starts_with("on<K, V>(\n    event: Map<K, V>,\n    listener:"));
        assert!(wrapped.contains("(event: K, value: V) => void\n): Handle"));
    }

    #[test]
    fn test_arrow_not_a_bracket() {
        let groups = comma_groups("f(a: (x: T) => U, b: number)");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].commas.len(), 1);
    }

    #[test]
    fn test_commas_in_strings_ignored() {
        let groups = comma_groups(r#"f(sep: ", " | "(")"#);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_no_group_no_edits() {
        let text = "aVeryLongFunctionNameWithoutAnyParameters(): SomeExtremelyLongReturnTypeName";
        assert!(wrap_signature(text, 20).is_empty());
    }

    #[test]
    fn test_wrapping_changes_only_whitespace() {
        let samples = [
            "registerSuite(name: string, factory: SuiteFactory, options: SuiteOptions): Suite",
            "then<U>(onFulfilled?: (value: T) => U | Promise<U>, onRejected?: (error: Error) => U): Task<U>",
            "constructor(executor: (resolve: (value?: T) => void, reject: (reason?: any) => void) => void, canceler?: () => void)",
            "f( a ,  b , c,)",
        ];
        for text in samples {
            let wrapped = wrap(text, 10);
            assert_eq!(strip_whitespace(&wrapped), strip_whitespace(text), "{text}");
        }
    }
}
