//! Splits a source buffer into whitespace-delimited tokens.
//!
//! A token is a maximal run of bytes that are not space, tab or newline.
//! There is no escaping, no string literals and no comments; `(` and `)` are
//! ordinary words that only the quotation built-ins give meaning to.

use crate::{
    heap::{Heap, HeapId},
    value::StrSlice,
};

fn is_separator(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n')
}

/// Tokenizes the buffer behind `source` into raw (non-owning) slices.
///
/// The slices stay valid for as long as the caller keeps a reference on the
/// source buffer.
pub(crate) fn tokenize(heap: &Heap, source: HeapId) -> Vec<StrSlice> {
    let bytes = heap.source(source).bytes();
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, &b) in bytes.iter().enumerate() {
        if is_separator(b) {
            if let Some(s) = start.take() {
                tokens.push(StrSlice {
                    owner: source,
                    start: s as u32,
                    len: (i - s) as u32,
                });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(StrSlice {
            owner: source,
            start: s as u32,
            len: (bytes.len() - s) as u32,
        });
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        let mut heap = Heap::new();
        let id = heap.new_source("test", text.as_bytes().to_vec());
        tokenize(&heap, id)
            .into_iter()
            .map(|t| String::from_utf8_lossy(heap.str_bytes(t)).into_owned())
            .collect()
    }

    #[test]
    fn splits_on_space_tab_newline() {
        assert_eq!(words("a b\tc\nd"), ["a", "b", "c", "d"]);
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(words("  a \n\n b\t\t "), ["a", "b"]);
    }

    #[test]
    fn empty_and_blank_buffers() {
        assert!(words("").is_empty());
        assert!(words(" \n\t").is_empty());
    }

    #[test]
    fn trailing_token_without_separator() {
        assert_eq!(words("x yz"), ["x", "yz"]);
    }

    #[test]
    fn parens_are_ordinary_words() {
        assert_eq!(words("( a )"), ["(", "a", ")"]);
    }

    #[test]
    fn retokenizing_printed_list_form_is_stable() {
        // the printed form of a list is "( t1 t2 ... )"; tokenizing it again
        // must yield the same inner words
        let printed = "( alpha beta gamma )";
        let first = words(printed);
        let again = words(&first.join(" "));
        assert_eq!(first, again);
    }
}
