use crate::PagerError;
use std::ops::Range;

/// Reserved word which ends the current page and starts a new chapter
pub const PAGE_BREAK: &str = "###PAGEBREAK###";

/// A lexical unit of the source text, as seen by the layout engine
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// A maximal run of characters without newlines, spaces, or tabs
    Word(&'a str),
    Newline,
    Space,
    Tab,
    /// A word spelled exactly like [PAGE_BREAK]
    PageBreak,
}

impl<'a> Token<'a> {
    /// Classify a string returned by [TextStream::read_word]
    pub fn classify(word: &'a str) -> Token<'a> {
        match word {
            "\n" => Token::Newline,
            " " => Token::Space,
            "\t" => Token::Tab,
            PAGE_BREAK => Token::PageBreak,
            word => Token::Word(word),
        }
    }
}

fn is_separator(ch: char) -> bool {
    matches!(ch, '\n' | ' ' | '\t')
}

/// Walks over an owned piece of text one word (or whitespace character) at a time.
///
/// A single stream is shared by every page of a document, so that each
/// [Renderer](crate::layout::Renderer) picks up where the previous one stopped. The stream
/// supports pushing back exactly one word, which is how a word that doesn't fit on a page
/// gets carried over to the next one.
#[derive(Debug, Clone)]
pub struct TextStream {
    text: String,
    cursor: usize,
    lines: usize,
    last_word: Option<Range<usize>>,
}

impl TextStream {
    pub fn new<S: Into<String>>(text: S) -> TextStream {
        TextStream {
            text: text.into(),
            cursor: 0,
            lines: 0,
            last_word: None,
        }
    }

    /// Read a single character, counting newlines as they pass. Returns [None] once the
    /// whole text has been consumed.
    pub fn read_char(&mut self) -> Option<char> {
        let ch = self.text[self.cursor..].chars().next()?;
        if ch == '\n' {
            self.lines += 1;
        }
        self.cursor += ch.len_utf8();
        self.last_word = None;
        Some(ch)
    }

    /// Read the next word. Newlines, spaces, and tabs are always returned on their own as a
    /// one character string; anything else is returned as the longest run up to the next one
    /// of those (or the end of the text). Returns [None] once the whole text has been consumed.
    pub fn read_word(&mut self) -> Option<String> {
        let start = self.cursor;
        let rest = &self.text[start..];
        let first = rest.chars().next()?;

        let len = if is_separator(first) {
            first.len_utf8()
        } else {
            rest.find(is_separator).unwrap_or(rest.len())
        };

        if first == '\n' {
            self.lines += 1;
        }
        self.cursor += len;
        self.last_word = Some(start..self.cursor);

        Some(self.text[start..self.cursor].to_string())
    }

    /// Push back the word returned by the most recent [TextStream::read_word], so the next
    /// read returns it again. Only a single word can be pushed back; anything else is
    /// rejected with [PagerError::UnreadMismatch] and leaves the stream untouched.
    pub fn unread(&mut self, word: &str) -> Result<(), PagerError> {
        let last = match &self.last_word {
            Some(range) if &self.text[range.clone()] == word => range.clone(),
            other => {
                return Err(PagerError::UnreadMismatch {
                    expected: other.as_ref().map(|range| self.text[range.clone()].to_string()),
                    found: word.to_string(),
                })
            }
        };

        self.lines -= word.matches('\n').count();
        self.cursor = last.start;
        self.last_word = None;
        Ok(())
    }

    /// The number of newlines consumed so far
    pub fn line(&self) -> usize {
        self.lines
    }

    /// Whether the whole text has been consumed
    pub fn eof(&self) -> bool {
        self.cursor >= self.text.len()
    }

    /// Byte offset of the next character to be read
    pub fn position(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(stream: &mut TextStream) -> Vec<String> {
        std::iter::from_fn(|| stream.read_word()).collect()
    }

    #[test]
    fn splits_words_and_whitespace() {
        let mut stream = TextStream::new("one two\tthree\n\nfour");
        assert_eq!(
            drain(&mut stream),
            vec!["one", " ", "two", "\t", "three", "\n", "\n", "four"]
        );
        assert!(stream.eof());
        assert_eq!(stream.line(), 2);
    }

    #[test]
    fn consecutive_spaces_are_separate_tokens() {
        let mut stream = TextStream::new("a  b");
        assert_eq!(drain(&mut stream), vec!["a", " ", " ", "b"]);
    }

    #[test]
    fn carriage_returns_stay_inside_words() {
        let mut stream = TextStream::new("line\r\nnext");
        assert_eq!(drain(&mut stream), vec!["line\r", "\n", "next"]);
    }

    #[test]
    fn empty_text_is_eof() {
        let mut stream = TextStream::new("");
        assert!(stream.eof());
        assert_eq!(stream.read_word(), None);
        assert_eq!(stream.read_char(), None);
    }

    #[test]
    fn read_char_counts_newlines() {
        let mut stream = TextStream::new("a\nb");
        assert_eq!(stream.read_char(), Some('a'));
        assert_eq!(stream.line(), 0);
        assert_eq!(stream.read_char(), Some('\n'));
        assert_eq!(stream.line(), 1);
        assert_eq!(stream.read_char(), Some('b'));
        assert_eq!(stream.read_char(), None);
    }

    #[test]
    fn multibyte_words() {
        let mut stream = TextStream::new("größe über");
        assert_eq!(drain(&mut stream), vec!["größe", " ", "über"]);
        assert!(stream.eof());
    }

    #[test]
    fn unread_then_read_returns_same_word() {
        let mut stream = TextStream::new("alpha beta");
        stream.read_word();
        stream.read_word();
        let before = stream.position();
        let word = stream.read_word().expect("has a word");
        assert_eq!(word, "beta");

        stream.unread(&word).expect("can unread the last word");
        assert_eq!(stream.position(), before);
        assert_eq!(stream.read_word().as_deref(), Some("beta"));
    }

    #[test]
    fn unread_restores_line_count() {
        let mut stream = TextStream::new("a\n\nb");
        stream.read_word();
        stream.read_word();
        let word = stream.read_word().expect("has a newline");
        assert_eq!(word, "\n");
        assert_eq!(stream.line(), 2);

        stream.unread(&word).expect("can unread the last word");
        assert_eq!(stream.line(), 1);
        assert_eq!(stream.read_word().as_deref(), Some("\n"));
        assert_eq!(stream.line(), 2);
    }

    #[test]
    fn unread_rejects_stale_words() {
        let mut stream = TextStream::new("alpha beta");
        stream.read_word();
        stream.read_word();

        let err = stream.unread("alpha").expect_err("alpha is not the last word");
        assert!(matches!(
            err,
            PagerError::UnreadMismatch { expected: Some(ref e), ref found }
                if e == " " && found == "alpha"
        ));
        assert_eq!(stream.position(), 6);
    }

    #[test]
    fn unread_only_once() {
        let mut stream = TextStream::new("alpha");
        let word = stream.read_word().expect("has a word");
        stream.unread(&word).expect("first unread works");
        assert!(stream.unread(&word).is_err());
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn classify_tokens() {
        assert_eq!(Token::classify("\n"), Token::Newline);
        assert_eq!(Token::classify(" "), Token::Space);
        assert_eq!(Token::classify("\t"), Token::Tab);
        assert_eq!(Token::classify(PAGE_BREAK), Token::PageBreak);
        assert_eq!(Token::classify("###PAGEBREAK"), Token::Word("###PAGEBREAK"));
    }
}
