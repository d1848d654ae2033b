//! Tokenization capability.
//!
//! The engine only needs "text in, ordered tokens with offsets out", so the
//! tokenizer is a trait. [`WordTokenizer`] is a small regex-based default
//! suitable for English technical text.

use crate::{Range, Token};

/// Converts raw text into an ordered token sequence.
///
/// Implementations must return tokens in text order with non-overlapping,
/// non-empty ranges. They are shared across threads, hence `Send + Sync`.
pub trait Tokenizer: Send + Sync {
    fn tokenize<'t>(&self, text: &'t str) -> Vec<Token<'t>>;
}

/// Default tokenizer.
///
/// A token is either a word or a single punctuation/symbol character.
/// Words are alphanumeric runs that may be joined by inner `.` and may end in
/// `+`/`#`, so `Node.js`, `C++` and `C#` stay one token. `-` and `/` between
/// words are tokens of their own, and possessives and negations are split off
/// the word they attach to:
///
/// ```text
/// "I know C++ and Node.js." -> [I] [know] [C++] [and] [Node.js] [.]
/// "Python's CI/CD"          -> [Python] ['s] [CI] [/] [CD]
/// "don't"                   -> [do] [n't]
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize<'t>(&self, text: &'t str) -> Vec<Token<'t>> {
        let re = regex!(r"\w+(?:\.\w+)*[+#]*(?:['’]\w+)?|[^\w\s]");

        let mut tokens = Vec::new();
        // Running (byte offset, char offset) so char positions are computed in
        // a single pass over the text.
        let mut byte_pos = 0;
        let mut char_pos = 0;

        for m in re.find_iter(text) {
            let pieces = match clitic_start(m.as_str()) {
                Some(at) => [(m.start(), m.start() + at), (m.start() + at, m.end())],
                None => [(m.start(), m.end()), (m.end(), m.end())],
            };

            for (start, end) in pieces.into_iter().filter(|(start, end)| start < end) {
                char_pos += text[byte_pos..start].chars().count();
                let char_start = char_pos;
                char_pos += text[start..end].chars().count();
                byte_pos = end;

                tokens.push(Token {
                    text: &text[start..end],
                    lower: text[start..end].to_lowercase(),
                    range: Range { start, end },
                    chars: Range { start: char_start, end: char_pos },
                });
            }
        }

        tokens
    }
}

/// Byte offset in `word` where a trailing `'s`-style suffix starts, if any.
/// A `n't` negation takes the `n` with it (`don't` -> `do` + `n't`).
fn clitic_start(word: &str) -> Option<usize> {
    let apostrophe = word.find(|c: char| c == '\'' || c == '’')?;
    let stem = &word[..apostrophe];
    let suffix = word[apostrophe..].trim_start_matches(|c: char| c == '\'' || c == '’');
    if suffix.eq_ignore_ascii_case("t") && stem.len() > 1 && stem.ends_with(|c: char| c == 'n' || c == 'N') {
        return Some(apostrophe - 1);
    }
    Some(apostrophe)
}
