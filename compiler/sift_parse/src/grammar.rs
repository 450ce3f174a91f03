//! Expression grammar.
//!
//! Precedence, loosest first: sequence (`,` `;`), assignment, pipe (`..`),
//! `&&` `||`, comparisons, `&` `|` `^`, `+` `-`, `*` `/` `%`, `**`, prefix
//! `!` `~` `-`, prefix `:` `?`, postfix indexing, primaries.
//!
//! Statements are assignments, `def` definitions and expressions. Only
//! expressions leave a value.
//!
//! Each method appends the code for its expression to `out`.

use sift_diagnostic::ParseError;
use sift_ir::{ensure_sufficient_stack, Atom, Block, Instruction, Name, Op};

use crate::lexer::{Token, TokenKind};
use crate::literal::{self, BadLiteral};
use crate::Parser;

type Parsed<T = ()> = Result<T, ParseError>;

impl Parser<'_, '_> {
    /// Comma- or semicolon-separated expressions. At least one of them must
    /// produce a value.
    pub(crate) fn sequence(&mut self, out: &mut Block) -> Parsed {
        let start = self.cursor.offset();
        let mut values = 0usize;
        loop {
            if self.statement(out)? {
                values += 1;
            }
            if !(self.cursor.eat(TokenKind::Comma) || self.cursor.eat(TokenKind::Semicolon)) {
                break;
            }
        }
        if values == 0 {
            let end = self.cursor.last_end();
            let text = self.cursor.source_between(start, end);
            return Err(ParseError::new(
                format!("Expression '{text}' has no value. (Assignment to a variable is not a value.)"),
                start,
                end.saturating_sub(start),
            ));
        }
        Ok(())
    }

    /// An assignment, a definition or an expression; true if it leaves a
    /// value.
    fn statement(&mut self, out: &mut Block) -> Parsed<bool> {
        if self.at_keyword("def")
            && matches!(
                self.cursor.peek_at(1),
                Some(TokenKind::Ident | TokenKind::Dollar | TokenKind::LBracket)
            )
        {
            self.cursor.advance();
            self.definition(out)?;
            return Ok(false);
        }
        let is_assignment = matches!(self.cursor.peek(), Some(TokenKind::Ident | TokenKind::At))
            && self.cursor.peek_at(1) == Some(TokenKind::Assign);
        if !is_assignment {
            self.pipe(out)?;
            return Ok(true);
        }
        let name = self.name_token()?;
        self.cursor.advance();
        self.pipe(out)?;
        out.push(Instruction::named(Op::Vaw, name));
        Ok(false)
    }

    /// `def name body`, `def $ body` or `def [a, b ...]`, after `def`.
    fn definition(&mut self, out: &mut Block) -> Parsed {
        if self.cursor.eat(TokenKind::LBracket) {
            return self.destructuring(out);
        }
        let name = if self.cursor.eat(TokenKind::Dollar) {
            self.interner.intern("$")
        } else {
            self.name_token()?
        };
        let mut body = self.definition_body()?;
        body.push(Instruction::tuple(0));
        out.push(definition(name, body));
        Ok(())
    }

    /// `(sequence)` when the parentheses hold the whole body, otherwise one
    /// expression.
    fn definition_body(&mut self) -> Parsed<Block> {
        let mut body = Block::new();
        if self.cursor.peek() == Some(TokenKind::LParen) {
            let start = self.cursor.position();
            self.cursor.advance();
            if self.sequence(&mut body).is_ok()
                && self.cursor.eat(TokenKind::RParen)
                && self.cursor.peek().is_none_or(TokenKind::ends_statement)
            {
                return Ok(body);
            }
            self.cursor.rewind(start);
            body.clear();
        }
        self.pipe(&mut body)?;
        Ok(body)
    }

    /// `[a, b f(@), ...]` after `def [`: the n-th name is `@[n]`, piped
    /// through the expression that follows it, if any.
    fn destructuring(&mut self, out: &mut Block) -> Parsed {
        let mut field = 0u64;
        loop {
            if self.cursor.peek() != Some(TokenKind::Ident) {
                return Err(self.cursor.unparsed());
            }
            let name = self.name_token()?;
            let mut index = Instruction::new(Op::Index);
            index.closures.push(vec![
                Instruction::named(Op::Var, Name::AT),
                Instruction::literal(Atom::UInt(field)),
                Instruction::tuple(0),
            ]);
            let mut body = vec![index];
            if !matches!(self.cursor.peek(), Some(TokenKind::Comma | TokenKind::RBracket)) {
                body.push(Instruction::named(Op::Vaw, Name::AT));
                self.pipe(&mut body)?;
            }
            body.push(Instruction::tuple(0));
            out.push(definition(name, body));
            field += 1;
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(TokenKind::RBracket)?;
        Ok(())
    }

    /// `a .. b` stores `a` in `@` and continues with `b`.
    fn pipe(&mut self, out: &mut Block) -> Parsed {
        ensure_sufficient_stack(|| {
            self.logical(out)?;
            while self.cursor.eat(TokenKind::DotDot) {
                out.push(Instruction::named(Op::Vaw, Name::AT));
                self.logical(out)?;
            }
            Ok(())
        })
    }

    fn logical(&mut self, out: &mut Block) -> Parsed {
        self.comparison(out)?;
        loop {
            let op = match self.cursor.peek() {
                Some(TokenKind::AmpAmp) => Op::And,
                Some(TokenKind::PipePipe) => Op::Or,
                _ => return Ok(()),
            };
            self.cursor.advance();
            self.comparison(out)?;
            out.push(Instruction::new(op));
        }
    }

    /// Non-associative; lowered onto `Eq`, `Lt`, `Rot` and `Not`.
    fn comparison(&mut self, out: &mut Block) -> Parsed {
        self.bitwise(out)?;
        let lowered: &[Op] = match self.cursor.peek() {
            Some(TokenKind::EqEq) => &[Op::Eq],
            Some(TokenKind::NotEq) => &[Op::Eq, Op::Not],
            Some(TokenKind::Lt) => &[Op::Lt],
            Some(TokenKind::Gt) => &[Op::Rot, Op::Lt],
            Some(TokenKind::LtEq) => &[Op::Rot, Op::Lt, Op::Not],
            Some(TokenKind::GtEq) => &[Op::Lt, Op::Not],
            _ => return Ok(()),
        };
        self.cursor.advance();
        self.bitwise(out)?;
        out.extend(lowered.iter().copied().map(Instruction::new));
        Ok(())
    }

    fn bitwise(&mut self, out: &mut Block) -> Parsed {
        self.additive(out)?;
        loop {
            let op = match self.cursor.peek() {
                Some(TokenKind::Amp) => Op::And,
                Some(TokenKind::Pipe) => Op::Or,
                Some(TokenKind::Caret) => Op::Xor,
                _ => return Ok(()),
            };
            self.cursor.advance();
            self.additive(out)?;
            out.push(Instruction::new(op));
        }
    }

    fn additive(&mut self, out: &mut Block) -> Parsed {
        self.multiplicative(out)?;
        loop {
            let op = match self.cursor.peek() {
                Some(TokenKind::Plus) => Op::Add,
                Some(TokenKind::Minus) => Op::Sub,
                _ => return Ok(()),
            };
            self.cursor.advance();
            self.multiplicative(out)?;
            out.push(Instruction::new(op));
        }
    }

    fn multiplicative(&mut self, out: &mut Block) -> Parsed {
        self.power(out)?;
        loop {
            let op = match self.cursor.peek() {
                Some(TokenKind::Star) => Op::Mul,
                Some(TokenKind::Slash) => Op::Div,
                Some(TokenKind::Percent) => Op::Mod,
                _ => return Ok(()),
            };
            self.cursor.advance();
            self.power(out)?;
            out.push(Instruction::new(op));
        }
    }

    /// Left associative.
    fn power(&mut self, out: &mut Block) -> Parsed {
        self.unary(out)?;
        while self.cursor.eat(TokenKind::StarStar) {
            self.unary(out)?;
            out.push(Instruction::new(Op::Pow));
        }
        Ok(())
    }

    fn unary(&mut self, out: &mut Block) -> Parsed {
        let op = match self.cursor.peek() {
            Some(TokenKind::Bang) => Op::Not,
            Some(TokenKind::Tilde) => Op::BitNot,
            Some(TokenKind::Minus) if !self.negative_literal_ahead() => {
                self.cursor.advance();
                out.push(Instruction::literal(Atom::Int(0)));
                self.unary(out)?;
                out.push(Instruction::new(Op::Sub));
                return Ok(());
            }
            _ => return self.prefix(out),
        };
        self.cursor.advance();
        self.unary(out)?;
        out.push(Instruction::new(op));
        Ok(())
    }

    /// `:e` flattens, `?e` filters; both are calls with a nested argument.
    fn prefix(&mut self, out: &mut Block) -> Parsed {
        let function = match self.cursor.peek() {
            Some(TokenKind::Colon) => "flatten",
            Some(TokenKind::Question) => "filter",
            _ => return self.postfix(out),
        };
        self.cursor.advance();
        let mut arg = Block::new();
        self.prefix(&mut arg)?;
        self.push_call(out, function, arg);
        Ok(())
    }

    /// `e[i]`, `e[i, j]`, chainable. The indexed expression becomes the
    /// first part of the index block.
    fn postfix(&mut self, out: &mut Block) -> Parsed {
        let mut inner = Block::new();
        self.primary(&mut inner)?;
        while self.cursor.eat(TokenKind::LBracket) {
            self.sequence(&mut inner)?;
            self.cursor.expect(TokenKind::RBracket)?;
            inner.push(Instruction::tuple(0));
            let mut index = Instruction::new(Op::Index);
            index.closures.push(inner);
            inner = vec![index];
        }
        out.extend(inner);
        Ok(())
    }

    fn primary(&mut self, out: &mut Block) -> Parsed {
        let Some(kind) = self.cursor.peek() else {
            return Err(self.cursor.unparsed());
        };
        match kind {
            TokenKind::Minus if self.negative_literal_ahead() => {
                self.cursor.advance();
                let tok = self.cursor.advance().ok_or_else(|| self.cursor.unparsed())?;
                let atom = match tok.kind {
                    TokenKind::Float => literal::float(self.cursor.text(tok), true),
                    _ => literal::signed(self.cursor.text(tok), true),
                };
                self.push_literal(out, atom, tok, true)
            }
            TokenKind::UInt | TokenKind::Hex | TokenKind::Int | TokenKind::Float => {
                let tok = self.cursor.expect(kind)?;
                let text = self.cursor.text(tok);
                let atom = match kind {
                    TokenKind::UInt => literal::unsigned(text),
                    TokenKind::Hex => literal::hex(text),
                    TokenKind::Int => literal::signed(text, false),
                    _ => literal::float(text, false),
                };
                self.push_literal(out, atom, tok, false)
            }
            TokenKind::Str => {
                let tok = self.cursor.expect(kind)?;
                let s = literal::string(self.cursor.text(tok));
                out.push(Instruction::literal(Atom::string(&s)));
                Ok(())
            }
            TokenKind::Ident if self.cursor.peek_at(1) == Some(TokenKind::LParen) => {
                let name = self.name_token()?;
                self.cursor.advance();
                let mut args = Block::new();
                if !self.cursor.eat(TokenKind::RParen) {
                    self.sequence(&mut args)?;
                    self.cursor.expect(TokenKind::RParen)?;
                }
                self.push_call_named(out, name, args);
                Ok(())
            }
            TokenKind::Ident if self.cursor.peek_at(1) == Some(TokenKind::Dot) => {
                // `f.x` is shorthand for `f(x)` with `x` at bitwise level.
                let name = self.name_token()?;
                self.cursor.advance();
                let mut arg = Block::new();
                self.bitwise(&mut arg)?;
                self.push_call_named(out, name, arg);
                Ok(())
            }
            TokenKind::Ident | TokenKind::At => {
                let name = self.name_token()?;
                out.push(Instruction::named(Op::Var, name));
                Ok(())
            }
            TokenKind::LParen => {
                self.cursor.advance();
                self.pipe(out)?;
                self.cursor.expect(TokenKind::RParen)?;
                Ok(())
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                let generator = if self.cursor.eat(TokenKind::Slash) {
                    self.filter_generator()?
                } else {
                    self.generator(TokenKind::RBracket)?
                };
                out.push(generator);
                Ok(())
            }
            TokenKind::RecOpen => {
                self.cursor.advance();
                let recursor = self.recursor()?;
                out.push(recursor);
                Ok(())
            }
            TokenKind::Dollar => {
                // `$x` and `$(x, y)` call the definition named `$` with `@`
                // prepended to the arguments.
                self.cursor.advance();
                let mut args = vec![Instruction::named(Op::Var, Name::AT)];
                if self.cursor.eat(TokenKind::LParen) {
                    self.sequence(&mut args)?;
                    self.cursor.expect(TokenKind::RParen)?;
                } else {
                    self.primary(&mut args)?;
                }
                self.push_call(out, "$", args);
                Ok(())
            }
            TokenKind::ArrayOpen => {
                self.cursor.advance();
                let generator = self.generator(TokenKind::ArrayClose)?;
                out.push(generator);
                out.push(Instruction::new(Op::Arr));
                Ok(())
            }
            TokenKind::LBrace => {
                self.cursor.advance();
                self.map_comprehension(out)
            }
            _ => Err(self.cursor.unparsed()),
        }
    }

    /// `[try] body [: source] close`, after the opening bracket.
    fn generator(&mut self, close: TokenKind) -> Parsed<Instruction> {
        let op = self.generator_op();
        let mut body = Block::new();
        self.sequence(&mut body)?;
        body.push(Instruction::tuple(0));
        let source = self.generator_source()?;
        self.cursor.expect(close)?;
        let mut node = Instruction::new(op);
        node.closures = vec![body, source];
        Ok(node)
    }

    /// `[/ cond [: source]]`, after `[/`: the elements of the source for
    /// which `cond` is non-zero. The body is `if(cond, @)` in a `try`
    /// generator, so a false condition drops the element.
    fn filter_generator(&mut self) -> Parsed<Instruction> {
        let mut args = Block::new();
        self.pipe(&mut args)?;
        args.push(Instruction::named(Op::Var, Name::AT));
        let mut body = Block::new();
        self.push_call(&mut body, "if", args);
        body.push(Instruction::tuple(0));
        let source = self.generator_source()?;
        self.cursor.expect(TokenKind::RBracket)?;
        let mut node = Instruction::new(Op::GenTry);
        node.closures = vec![body, source];
        Ok(node)
    }

    /// `body : init, sequence >>`, after `<<`.
    fn recursor(&mut self) -> Parsed<Instruction> {
        let mut body = Block::new();
        self.sequence(&mut body)?;
        body.push(Instruction::tuple(0));
        self.cursor.expect(TokenKind::Colon)?;
        let mut source = Block::new();
        self.sequence(&mut source)?;
        source.push(Instruction::tuple(0));
        self.cursor.expect(TokenKind::RecClose)?;
        let mut node = Instruction::new(Op::Rec);
        node.closures = vec![body, source];
        Ok(node)
    }

    /// `Gen`, or `GenTry` after a leading `try`.
    fn generator_op(&mut self) -> Op {
        if self.at_keyword("try") && self.cursor.peek_at(1).is_some_and(TokenKind::starts_operand) {
            self.cursor.advance();
            Op::GenTry
        } else {
            Op::Gen
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.cursor
            .peek_token()
            .is_some_and(|tok| tok.kind == TokenKind::Ident && self.cursor.text(tok) == keyword)
    }

    /// `{key [-> value] [: source]}`, after the opening brace. The body
    /// builds a `(key, value)` pair; the value defaults to `1`.
    fn map_comprehension(&mut self, out: &mut Block) -> Parsed {
        let op = self.generator_op();
        let mut body = Block::new();
        self.sequence(&mut body)?;
        body.push(Instruction::tuple(0));
        if self.cursor.eat(TokenKind::Arrow) {
            self.sequence(&mut body)?;
            body.push(Instruction::tuple(1));
        } else {
            body.push(Instruction::literal(Atom::Int(1)));
        }
        body.push(Instruction::tuple(0));
        body.push(Instruction::tuple(0));
        let source = self.generator_source()?;
        self.cursor.expect(TokenKind::RBrace)?;
        let mut node = Instruction::new(op);
        node.closures = vec![body, source];
        out.push(node);
        out.push(Instruction::new(Op::Map));
        Ok(())
    }

    /// `: expr`, or `@` when omitted; wrapped into a sequence.
    fn generator_source(&mut self) -> Parsed<Block> {
        let mut source = Block::new();
        if self.cursor.eat(TokenKind::Colon) {
            self.sequence(&mut source)?;
        } else {
            source.push(Instruction::named(Op::Var, Name::AT));
        }
        source.push(Instruction::tuple(0));
        source.push(Instruction::new(Op::Seq));
        source.push(Instruction::tuple(0));
        Ok(source)
    }

    /// True at a `-` glued to a numeric literal, as in `-1` or `-2.5`.
    fn negative_literal_ahead(&self) -> bool {
        self.cursor.peek_at(1).is_some_and(TokenKind::is_number) && self.cursor.next_is_adjacent()
    }

    fn name_token(&mut self) -> Parsed<Name> {
        let tok = self.cursor.advance().ok_or_else(|| self.cursor.unparsed())?;
        Ok(match tok.kind {
            TokenKind::At => Name::AT,
            _ => self.interner.intern(self.cursor.text(tok)),
        })
    }

    fn push_literal(
        &self,
        out: &mut Block,
        atom: Result<Atom, BadLiteral>,
        tok: Token,
        negative: bool,
    ) -> Parsed {
        match atom {
            Ok(atom) => {
                out.push(Instruction::literal(atom));
                Ok(())
            }
            Err(BadLiteral(target)) => {
                let start = if negative { tok.start - 1 } else { tok.start };
                let text = self.cursor.source_between(start, tok.end);
                Err(ParseError::new(
                    format!("Could not convert '{text}' to {target}."),
                    start,
                    tok.end - start,
                ))
            }
        }
    }

    fn push_call(&mut self, out: &mut Block, function: &str, args: Block) {
        let name = self.interner.intern(function);
        self.push_call_named(out, name, args);
    }

    fn push_call_named(&self, out: &mut Block, name: Name, mut args: Block) {
        args.push(Instruction::tuple(0));
        let mut call = Instruction::named(Op::Call, name);
        call.closures.push(args);
        out.push(call);
    }
}

fn definition(name: Name, body: Block) -> Instruction {
    let mut node = Instruction::named(Op::Def, name);
    node.closures.push(body);
    node
}
