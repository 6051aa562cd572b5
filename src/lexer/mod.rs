pub mod lexer;

pub use lexer::Lexer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerTokenKind {
    // `>`: Increment the `data pointer` by one
    Increment,
    // `<`: Decrement the `data pointer` by one
    Decrement,

    // `+`: Increment the cell at the `data pointer` by one
    DerefIncrement,
    // `-`: Decrement the cell at the `data pointer` by one
    DerefDecrement,

    // `.`: Write the cell at the `data pointer` to the `output device`
    Write,
    // `,`: Read the next value from the `input device` and write it to the `data pointer`
    Read,

    // `[`: If the cell at the `data pointer` is zero, then jump the `instruction pointer` forward to the instruction after the matching `]`
    JumpStart,
    // `]`: If the cell at the `data pointer` is non-zero then jump the `instruction pointer` back to the instruction after the matching `[`
    JumpEnd,

    // Comment every other character
    Comment,
}

impl LexerTokenKind {
    pub fn from_char(c: char) -> LexerTokenKind {
        match c {
            '>' => LexerTokenKind::Increment,
            '<' => LexerTokenKind::Decrement,
            '+' => LexerTokenKind::DerefIncrement,
            '-' => LexerTokenKind::DerefDecrement,
            '.' => LexerTokenKind::Write,
            ',' => LexerTokenKind::Read,
            '[' => LexerTokenKind::JumpStart,
            ']' => LexerTokenKind::JumpEnd,
            _ => LexerTokenKind::Comment,
        }
    }

    pub fn is_operator(&self) -> bool {
        !matches!(self, LexerTokenKind::Comment)
    }
}

/// Where a token starts in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    /// Offset within the file (in terms of 'codepoints')
    pub offset: usize,
    /// 1-indexed
    pub line: usize,
    /// 1-indexed
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: LexerTokenKind,
    /// The raw character this token was made from (the first one for comments)
    pub symbol: char,
    /// How many identical characters were folded into this token
    pub run_length: usize,
    pub position: SourcePosition,
}
