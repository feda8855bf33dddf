//! Parser state machine and low-level operations.
//!
//! The context owns the token cursor, the pending-comment queue, the depth
//! guard, and the arena. Grammar productions live in `grammar/` as `impl
//! Parser` extensions and drive the context through the helpers here.
//!
//! Comment attachment: `advance` never hands out a comment token; comments
//! passed over are queued, and when a structural node closes, the queued
//! comments falling inside its span become comment nodes merged into its
//! child list in source order. A comment before a node's first token stays
//! queued for an enclosing node, which yields the innermost-container rule
//! without backtracking.

use javelin_core::SourceText;

use crate::arena::{ArenaError, Attribute, NodeArena, NodeId};
use crate::error::{MAX_RECURSION_DEPTH, ParseError, SyntaxError};
use crate::lexer::{Token, token_text};
use crate::syntax::{NodeKind, TokenKind, TokenSet};
use crate::version::{Feature, FeatureSet, JavaVersion};

/// Cursor + pending-comment snapshot for bounded speculation. Restoring
/// never touches the arena: speculation must not allocate.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Snapshot {
    pos: usize,
    pending: usize,
    prev_end: u32,
}

pub(crate) struct Parser<'s> {
    source: SourceText<'s>,
    tokens: Vec<Token>,
    pos: usize,
    prev_end: u32,
    pending_comments: Vec<Token>,
    pub(crate) arena: NodeArena,
    depth: u32,
    version: JavaVersion,
    features: FeatureSet,
}

impl<'s> Parser<'s> {
    pub(crate) fn new(source: &'s str, tokens: Vec<Token>, version: JavaVersion) -> Self {
        Self {
            source: SourceText::new(source),
            tokens,
            pos: 0,
            prev_end: 0,
            pending_comments: Vec::with_capacity(4),
            arena: NodeArena::new(),
            depth: 0,
            version,
            features: version.features(),
        }
    }

    /// Replace the arena with one holding tighter watchdog budgets.
    pub(crate) fn with_arena_limits(mut self, limits: crate::arena::ArenaLimits) -> Self {
        self.arena = NodeArena::with_limits(limits);
        self
    }

    pub(crate) fn parse(mut self) -> Result<(NodeId, NodeArena), SyntaxError> {
        match self.parse_compilation_unit() {
            Ok(root) => Ok((root, self.arena)),
            Err(err) => Err(SyntaxError::from_parse(err, self.peek_start())),
        }
    }

    // --- token access ---

    #[inline]
    fn raw_token(&self, index: usize) -> Token {
        self.tokens
            .get(index)
            .copied()
            .unwrap_or_else(|| *self.tokens.last().expect("token stream ends with Eof"))
    }

    /// The k-th token after the cursor including comments.
    pub(crate) fn peek_including_comments(&self, k: usize) -> Token {
        self.raw_token(self.pos + k)
    }

    /// The k-th non-comment token after the cursor, without consuming.
    pub(crate) fn nth_token(&self, k: usize) -> Token {
        let mut remaining = k;
        let mut index = self.pos;
        loop {
            let token = self.raw_token(index);
            if !token.kind.is_comment() {
                if remaining == 0 {
                    return token;
                }
                remaining -= 1;
            }
            if index >= self.tokens.len() {
                return token;
            }
            index += 1;
        }
    }

    #[inline]
    pub(crate) fn nth(&self, k: usize) -> TokenKind {
        self.nth_token(k).kind
    }

    #[inline]
    pub(crate) fn current(&self) -> TokenKind {
        self.nth(0)
    }

    #[inline]
    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    #[inline]
    pub(crate) fn at_set(&self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    pub(crate) fn token_str(&self, token: Token) -> &'s str {
        token_text(self.source.text(), &token)
    }

    pub(crate) fn current_text(&self) -> &'s str {
        self.token_str(self.nth_token(0))
    }

    /// Whether the current token is the given contextual keyword.
    pub(crate) fn at_contextual(&self, word: &str) -> bool {
        self.at(TokenKind::Identifier) && self.current_text() == word
    }

    pub(crate) fn nth_is_contextual(&self, k: usize, word: &str) -> bool {
        let token = self.nth_token(k);
        token.kind == TokenKind::Identifier && self.token_str(token) == word
    }

    /// Start offset of the current non-comment token (end of source at
    /// Eof).
    #[inline]
    pub(crate) fn peek_start(&self) -> u32 {
        self.nth_token(0).start()
    }

    pub(crate) fn source_len(&self) -> u32 {
        self.source.len()
    }

    // --- consuming ---

    /// Queue comments at the cursor so the cursor rests on a non-comment
    /// token.
    pub(crate) fn skip_comments_to_pending(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_comment() {
            self.pending_comments.push(self.tokens[self.pos]);
            self.pos += 1;
        }
    }

    /// Consume the current non-comment token. Comments passed over are
    /// queued for attachment. At Eof this returns the Eof token without
    /// moving.
    pub(crate) fn advance(&mut self) -> Token {
        self.skip_comments_to_pending();
        let token = self.raw_token(self.pos);
        if token.kind != TokenKind::Eof {
            self.pos += 1;
            self.prev_end = token.end();
        }
        token
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.expected(kind.text_name()))
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<Token, ParseError> {
        self.expect(TokenKind::Identifier)
    }

    pub(crate) fn expect_contextual(&mut self, word: &str) -> Result<Token, ParseError> {
        if self.at_contextual(word) {
            Ok(self.advance())
        } else {
            Err(self.expected(&format!("'{word}'")))
        }
    }

    // --- errors ---

    pub(crate) fn expected(&self, what: &str) -> ParseError {
        let token = self.nth_token(0);
        let pos = self.source.position(token.start());
        ParseError::ExpectedToken {
            expected: what.to_string(),
            found: token.kind.text_name(),
            line: pos.line,
            column: pos.column,
        }
    }

    fn resource_error(&self, err: ArenaError) -> ParseError {
        let pos = self.source.position(self.peek_start());
        ParseError::ResourceLimit {
            message: err.to_string(),
            line: pos.line,
            column: pos.column,
        }
    }

    /// Fails when a feature-gated construct is used below its version.
    pub(crate) fn check_feature(&self, feature: Feature, what: &str) -> Result<(), ParseError> {
        if self.feature(feature) {
            return Ok(());
        }
        let pos = self.source.position(self.peek_start());
        Err(ParseError::Feature {
            message: format!("{what} are not supported in {}", self.version),
            line: pos.line,
            column: pos.column,
        })
    }

    #[inline]
    pub(crate) fn feature(&self, feature: Feature) -> bool {
        self.features.contains(feature)
    }

    // --- speculation ---

    pub(crate) fn save(&self) -> Snapshot {
        Snapshot {
            pos: self.pos,
            pending: self.pending_comments.len(),
            prev_end: self.prev_end,
        }
    }

    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.pos = snapshot.pos;
        self.pending_comments.truncate(snapshot.pending);
        self.prev_end = snapshot.prev_end;
    }

    // --- recursion guard ---

    pub(crate) fn enter_recursion(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_RECURSION_DEPTH {
            let pos = self.source.position(self.peek_start());
            return Err(ParseError::RecursionLimit {
                limit: MAX_RECURSION_DEPTH,
                line: pos.line,
                column: pos.column,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // --- node building ---

    /// Allocate a leaf node covering a single token.
    pub(crate) fn leaf(&mut self, kind: NodeKind, token: Token) -> Result<NodeId, ParseError> {
        self.alloc(kind, token.start(), token.end(), &[])
    }

    /// Close a node started at `start`: its end is the end of the last
    /// consumed token, and queued comments inside the span are merged into
    /// the child list.
    pub(crate) fn finish_node(
        &mut self,
        kind: NodeKind,
        start: u32,
        children: Vec<NodeId>,
    ) -> Result<NodeId, ParseError> {
        let end = self.prev_end.max(start);
        self.finish_node_spanned(kind, start, end, children)
    }

    /// Close a node with an explicit end offset (used by the root, whose
    /// span always covers the whole source).
    pub(crate) fn finish_node_spanned(
        &mut self,
        kind: NodeKind,
        start: u32,
        end: u32,
        children: Vec<NodeId>,
    ) -> Result<NodeId, ParseError> {
        let split = self.pending_comments.partition_point(|c| c.start() < start);
        if split == self.pending_comments.len() {
            return self.alloc(kind, start, end, &children);
        }
        let claimed = self.pending_comments.split_off(split);

        let mut comment_nodes = Vec::with_capacity(claimed.len());
        for comment in claimed {
            debug_assert!(comment.end() <= end, "claimed comment must sit inside the node");
            let node_kind = match comment.kind {
                TokenKind::LineComment => NodeKind::LineComment,
                TokenKind::BlockComment => NodeKind::BlockComment,
                TokenKind::JavadocComment => NodeKind::JavadocComment,
                other => unreachable!("non-comment token {other:?} in pending queue"),
            };
            comment_nodes.push(self.leaf(node_kind, comment)?);
        }

        // Merge children and comment nodes by source position.
        let mut merged = Vec::with_capacity(children.len() + comment_nodes.len());
        let (mut ci, mut mi) = (0, 0);
        while ci < children.len() && mi < comment_nodes.len() {
            if self.arena.start(children[ci]) <= self.arena.start(comment_nodes[mi]) {
                merged.push(children[ci]);
                ci += 1;
            } else {
                merged.push(comment_nodes[mi]);
                mi += 1;
            }
        }
        merged.extend_from_slice(&children[ci..]);
        merged.extend_from_slice(&comment_nodes[mi..]);

        self.alloc(kind, start, end, &merged)
    }

    fn alloc(
        &mut self,
        kind: NodeKind,
        start: u32,
        end: u32,
        children: &[NodeId],
    ) -> Result<NodeId, ParseError> {
        match self.arena.alloc(kind, start, end, children) {
            Ok(id) => Ok(id),
            Err(err) => Err(self.resource_error(err)),
        }
    }

    pub(crate) fn set_attribute(&mut self, id: NodeId, attribute: Attribute) {
        self.arena.set_attribute(id, attribute);
    }

    pub(crate) fn intern(&mut self, text: &str) -> javelin_core::Symbol {
        self.arena.intern(text)
    }

    pub(crate) fn intern_owned(&mut self, text: String) -> javelin_core::Symbol {
        self.arena.intern_owned(text)
    }

    // --- angle-bracket closing ---

    /// Consume one `>` closing a type-argument or type-parameter list.
    ///
    /// The lexer applies longest match, so `List<List<String>>` ends in a
    /// single `>>` token; closing splits such tokens in place, leaving the
    /// remainder for the enclosing list.
    pub(crate) fn eat_type_close(&mut self) -> Result<(), ParseError> {
        self.skip_comments_to_pending();
        let token = self.raw_token(self.pos);
        let reduced = match token.kind {
            TokenKind::Gt => {
                self.advance();
                return Ok(());
            }
            TokenKind::Shr => TokenKind::Gt,
            TokenKind::UShr => TokenKind::Shr,
            TokenKind::Ge => TokenKind::Assign,
            TokenKind::ShrAssign => TokenKind::Ge,
            TokenKind::UShrAssign => TokenKind::ShrAssign,
            _ => return Err(self.expected("'>'")),
        };
        let start = token.start();
        self.tokens[self.pos] = Token::new(
            reduced,
            rowan::TextRange::new((start + 1).into(), token.span.end()),
        );
        self.prev_end = start + 1;
        Ok(())
    }
}
