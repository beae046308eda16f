//! Class interpreter
//!
//! Turns a candidate token such as `md:hover:bg-primary-dark!` into a
//! [`UtilityDescriptor`]: variant chain, resolved utility body and flags.
//!
//! # Grammar
//!
//! ```text
//! class     := (segment ':')* segment
//! segment   := (bracketed | plain)+
//! bracketed := '[' [^\[\]]+ ']'
//! plain     := [^:\[\]]+
//! ```
//!
//! Colons inside brackets do not split, so `bg-[url(a:b)]` stays whole.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::char,
    combinator::{all_consuming, recognize},
    error::VerboseError,
    multi::{many0, many1},
    sequence::{delimited, pair, terminated},
    Finish, IResult,
};
use thiserror::Error;
use tracing::debug;
use windlass_theme::TokenTable;

use crate::utility::{HandlerRegistry, ValueRef};
use crate::variant::{Variant, VariantChain};

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// A fully interpreted utility class
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UtilityDescriptor {
    /// The original token, used for the selector
    pub class: String,
    /// Outermost first
    pub variants: VariantChain,
    pub property: String,
    pub value: ValueRef,
    pub targets: Vec<String>,
    pub fixed: Vec<(String, String)>,
    pub negative: bool,
    pub important: bool,
}

/// Why a token is not a usable class
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("malformed class syntax")]
    Syntax,

    #[error("unknown variant `{0}`")]
    UnknownVariant(String),

    #[error("no utility matches")]
    UnknownUtility,

    /// A handler claimed the name but its value does not resolve
    #[error("value does not resolve against the theme")]
    Unresolved,
}

/// A rejected token with its reason
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{token}`: {reason}")]
pub struct TokenRejection {
    pub token: String,
    pub reason: Rejection,
}

fn bracketed(input: &str) -> ParseResult<'_, &str> {
    recognize(delimited(
        char('['),
        take_while1(|c| c != '[' && c != ']'),
        char(']'),
    ))(input)
}

fn plain(input: &str) -> ParseResult<'_, &str> {
    take_while1(|c| c != ':' && c != '[' && c != ']')(input)
}

fn segment(input: &str) -> ParseResult<'_, &str> {
    recognize(many1(alt((bracketed, plain))))(input)
}

fn class(input: &str) -> ParseResult<'_, (Vec<&str>, &str)> {
    all_consuming(pair(many0(terminated(segment, char(':'))), segment))(input)
}

/// Split a token into its variant tags and utility name
pub fn split_class(token: &str) -> Option<(Vec<&str>, &str)> {
    class(token).finish().ok().map(|(_, parts)| parts)
}

/// Interpretation context: the resolved theme and the handler registry
pub struct Interpreter<'a> {
    table: &'a TokenTable,
    handlers: &'a HandlerRegistry,
}

impl<'a> Interpreter<'a> {
    pub fn new(table: &'a TokenTable, handlers: &'a HandlerRegistry) -> Self {
        Self { table, handlers }
    }

    pub fn table(&self) -> &'a TokenTable {
        self.table
    }

    /// Interpret a token, discarding the rejection reason
    pub fn interpret(&self, token: &str) -> Option<UtilityDescriptor> {
        match self.interpret_detailed(token) {
            Ok(descriptor) => Some(descriptor),
            Err(reason) => {
                debug!(token, %reason, "rejected token");
                None
            }
        }
    }

    pub fn interpret_detailed(&self, token: &str) -> Result<UtilityDescriptor, Rejection> {
        let (tags, utility) = split_class(token).ok_or(Rejection::Syntax)?;

        let mut variants = VariantChain::new();
        for tag in tags {
            let variant = Variant::parse(tag, self.table)
                .ok_or_else(|| Rejection::UnknownVariant(tag.to_string()))?;
            variants.push(variant);
        }

        let (utility, important) = match utility.strip_suffix('!') {
            Some("") => return Err(Rejection::Syntax),
            Some(rest) => (rest, true),
            None => (utility, false),
        };
        if utility.contains('!') {
            return Err(Rejection::Syntax);
        }

        let body = self.handlers.build(utility, self.table).ok_or_else(|| {
            if self.handlers.matches(utility) {
                Rejection::Unresolved
            } else {
                Rejection::UnknownUtility
            }
        })?;

        Ok(UtilityDescriptor {
            class: token.to_string(),
            variants,
            property: body.property,
            value: body.value,
            targets: body.targets,
            fixed: body.fixed,
            negative: body.negative,
            important,
        })
    }
}

/// Interpret a single token with the given context
pub fn interpret(token: &str, interpreter: &Interpreter<'_>) -> Option<UtilityDescriptor> {
    interpreter.interpret(token)
}
