use super::{LexerTokenKind, SourcePosition, Token};

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /** Human Readable positions in file */
    pub cur_line: usize,
    pub cur_col: usize,

    /** 'raw' format / offset within the file (in terms of 'codepoints') */
    pub codepoint_offset: usize,

    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(chars: &'a str) -> Lexer<'a> {
        Lexer {
            cur_col: 1,
            cur_line: 1,

            codepoint_offset: 0,

            chars: chars.chars().peekable(),
        }
    }

    fn current_position(&self) -> SourcePosition {
        SourcePosition {
            offset: self.codepoint_offset,
            line: self.cur_line,
            column: self.cur_col,
        }
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.cur_col += 1;
        if c == '\n' {
            self.cur_line += 1;
            self.cur_col = 1;
        }
        self.codepoint_offset += 1;
        Some(c)
    }

    /// Consume every following character that satisfies `same`, returning how many were eaten
    fn consume_while(&mut self, same: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(&c) = self.chars.peek() {
            if !same(c) {
                break;
            }
            self.consume_char();
            count += 1;
        }
        count
    }

    /// Produces the next token, `None` once the source is exhausted.
    ///
    /// Runs of identical non-bracket operators are folded into a single token,
    /// brackets are always emitted one at a time so each can be matched.
    /// Everything that isn't an operator is gathered into a single comment token,
    /// which also means a comment between two operators breaks up their run.
    pub fn next_token(&mut self) -> Option<Token> {
        let position = self.current_position();
        let symbol = self.consume_char()?;
        let kind = LexerTokenKind::from_char(symbol);

        let extra = match kind {
            LexerTokenKind::JumpStart | LexerTokenKind::JumpEnd => 0,
            LexerTokenKind::Comment => {
                self.consume_while(|c| !LexerTokenKind::from_char(c).is_operator())
            }
            _ => self.consume_while(|c| c == symbol),
        };

        Some(Token {
            kind,
            symbol,
            run_length: extra + 1,
            position,
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}
