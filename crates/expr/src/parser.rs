//! A `nom`-based parser for the theme expression language.
//!
//! Precedence from loosest to tightest: `||`, `&&`, comparisons,
//! shifts, `+ -`, `* /`, `^`, unary `! -`. Every binary level is left
//! associative.

use super::ast::*;
use crate::error::ExprError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_while, take_while1},
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{map, opt, recognize},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded},
};

// --- Main Public Parser ---

pub fn parse_expression(input: &str) -> Result<Expression, ExprError> {
    match ws(expression).parse(input) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(ExprError::Parse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(ExprError::Parse(input.to_string(), e.to_string())),
    }
}

// --- Combinators & Helpers ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn build_binary_expr_parser<'a, F, G>(
    sub_expr_parser: F,
    op_parser: G,
) -> impl FnMut(&'a str) -> IResult<&'a str, Expression>
where
    F: Parser<&'a str, Output = Expression, Error = nom::error::Error<&'a str>> + Clone,
    G: Parser<&'a str, Output = BinaryOperator, Error = nom::error::Error<&'a str>> + Clone,
{
    move |input: &str| {
        let (input, mut left) = sub_expr_parser.clone().parse(input)?;
        let (input, remainder) =
            many0(pair(ws(op_parser.clone()), sub_expr_parser.clone())).parse(input)?;

        for (op, right) in remainder {
            left = Expression::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok((input, left))
    }
}

// --- Expression Parsers (in order of precedence) ---

fn expression(input: &str) -> IResult<&str, Expression> {
    or_expr(input)
}

fn or_op(input: &str) -> IResult<&str, BinaryOperator> {
    map(tag("||"), |_| BinaryOperator::Or).parse(input)
}

fn and_op(input: &str) -> IResult<&str, BinaryOperator> {
    map(tag("&&"), |_| BinaryOperator::And).parse(input)
}

fn comparison_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(tag("=="), |_| BinaryOperator::Equals),
        map(tag("!="), |_| BinaryOperator::NotEquals),
        map(tag("<="), |_| BinaryOperator::LessThanOrEqual),
        map(tag(">="), |_| BinaryOperator::GreaterThanOrEqual),
        // A single '<' or '>' must not swallow the first half of a shift.
        map((char('<'), nom::combinator::not(char('<'))), |_| BinaryOperator::LessThan),
        map((char('>'), nom::combinator::not(char('>'))), |_| BinaryOperator::GreaterThan),
    ))
    .parse(input)
}

fn shift_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(tag("<<"), |_| BinaryOperator::ShiftLeft),
        map(tag(">>"), |_| BinaryOperator::ShiftRight),
    ))
    .parse(input)
}

fn additive_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(char('+'), |_| BinaryOperator::Plus),
        map(char('-'), |_| BinaryOperator::Minus),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(char('*'), |_| BinaryOperator::Multiply),
        map(char('/'), |_| BinaryOperator::Divide),
    ))
    .parse(input)
}

fn power_op(input: &str) -> IResult<&str, BinaryOperator> {
    map(char('^'), |_| BinaryOperator::Power).parse(input)
}

fn or_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(and_expr, or_op)(input)
}

fn and_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(comparison_expr, and_op)(input)
}

fn comparison_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(shift_expr, comparison_op)(input)
}

fn shift_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(additive_expr, shift_op)(input)
}

fn additive_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(multiplicative_expr, additive_op)(input)
}

fn multiplicative_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(unary_expr, multiplicative_op)(input)
}

fn unary_expr(input: &str) -> IResult<&str, Expression> {
    let (i, op) = opt(ws(one_of("!-+"))).parse(input)?;
    match op {
        // '!' followed by '=' is an operator, not a negation.
        Some('!') if i.starts_with('=') => power_expr(input),
        Some(c) => {
            let (i, expr) = unary_expr(i)?;
            let expr = match c {
                '!' => Expression::UnaryOp { op: UnaryOperator::Not, expr: Box::new(expr) },
                '-' => Expression::UnaryOp { op: UnaryOperator::Minus, expr: Box::new(expr) },
                _ => expr,
            };
            Ok((i, expr))
        }
        None => power_expr(i),
    }
}

fn power_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(primary_expr, power_op)(input)
}

fn primary_expr(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        delimited(char('('), ws(expression), char(')')),
        number,
        string_literal,
        braced_variable,
        identifier,
    )))
    .parse(input)
}

/// `digits[.digits][(e|E)[+-]digits]`. A trailing `.` is accepted.
fn number(input: &str) -> IResult<&str, Expression> {
    let (rest, _) = digit1::<_, Error<&str>>(input)?;
    let rest = match rest.strip_prefix('.') {
        Some(fraction) => fraction.trim_start_matches(|c: char| c.is_ascii_digit()),
        None => rest,
    };
    let rest = exponent(rest).unwrap_or(rest);

    let text = &input[..input.len() - rest.len()];
    text.parse::<f32>()
        .map(|n| (rest, Expression::Number(n)))
        .map_err(|_| nom::Err::Error(Error::new(input, ErrorKind::Float)))
}

/// The input after a complete exponent, or `None` when there is none.
fn exponent(input: &str) -> Option<&str> {
    let rest = input.strip_prefix(['e', 'E'])?;
    let rest = rest.strip_prefix(['+', '-']).unwrap_or(rest);
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    (digits > 0).then(|| &rest[digits..])
}

fn string_literal(input: &str) -> IResult<&str, Expression> {
    map(
        alt((
            delimited(char('\''), take_till(|c| c == '\''), char('\'')),
            delimited(char('"'), take_till(|c| c == '"'), char('"')),
        )),
        |s: &str| Expression::Literal(s.to_string()),
    )
    .parse(input)
}

/// `{name}` or `${name}`; the name may contain any character but `}`.
fn braced_variable(input: &str) -> IResult<&str, Expression> {
    map(
        preceded(opt(char('$')), delimited(char('{'), take_till(|c| c == '}'), char('}'))),
        variable_or_boolean,
    )
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, Expression> {
    map(
        recognize(pair(
            take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.'),
        )),
        variable_or_boolean,
    )
    .parse(input)
}

fn variable_or_boolean(name: &str) -> Expression {
    match name {
        "true" => Expression::Number(1.0),
        "false" => Expression::Number(0.0),
        _ => Expression::Variable(name.to_string()),
    }
}
