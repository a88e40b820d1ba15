use winnow::ascii::till_line_ending;
use winnow::combinator::{alt, cut_err, opt, preceded, repeat, separated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::{Condition, Conditions, Domain, RuleOption, TreeSpec};

const KEYWORDS: &[&str] = &["and", "or", "option", "domain", "priority"];

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

// -- Identifiers & keywords -------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'
        }),
    )
        .take()
        .parse_next(input)
}

fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|k| word.eq_ignore_ascii_case(k))
}

/// A whole-word, case-insensitive keyword.
fn keyword(input: &mut &str, word: &str) -> ModalResult<()> {
    ws.parse_next(input)?;
    ident
        .verify(|found: &str| found.eq_ignore_ascii_case(word))
        .void()
        .parse_next(input)
}

/// A condition or outcome name. Keywords are reserved.
fn name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    ws.parse_next(input)?;
    ident
        .verify(|found: &str| !is_keyword(found))
        .context(StrContext::Expected(StrContextValue::Description("name")))
        .parse_next(input)
}

// -- Option bodies (conjunction with at most one OR group) ------------------

enum Term<'i> {
    Condition(&'i str),
    AnyOf(Vec<&'i str>),
}

fn any_of<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    '('.parse_next(input)?;
    let names = cut_err(separated(1.., name, |i: &mut &str| keyword(i, "or")))
        .parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(')').parse_next(input)?;
    Ok(names)
}

fn term<'i>(input: &mut &'i str) -> ModalResult<Term<'i>> {
    ws.parse_next(input)?;
    alt((any_of.map(Term::AnyOf), name.map(Term::Condition)))
        .context(StrContext::Expected(StrContextValue::Description(
            "condition or (A OR B) group",
        )))
        .parse_next(input)
}

fn option_def(input: &mut &str) -> ModalResult<RuleOption> {
    keyword(input, "option")?;

    let result = cut_err(name)
        .context(StrContext::Expected(StrContextValue::Description("outcome")))
        .parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(':').parse_next(input)?;

    let first = cut_err(term).parse_next(input)?;
    let rest: Vec<Term<'_>> =
        repeat(0.., preceded(|i: &mut &str| keyword(i, "and"), cut_err(term)))
            .parse_next(input)?;

    let mut option = RuleOption::new(result, Vec::<Condition>::new());
    let mut groups = 0;
    for term in std::iter::once(first).chain(rest) {
        match term {
            Term::Condition(condition) => {
                option.want.insert(condition);
            }
            Term::AnyOf(alternatives) => {
                groups += 1;
                option.or.extend(alternatives);
            }
        }
    }

    // An option carries a single alternative set.
    if groups > 1 {
        return Err(ErrMode::from_input(input).cut());
    }

    Ok(option)
}

// -- Domains ----------------------------------------------------------------

fn priority_annotation(input: &mut &str) -> ModalResult<Conditions> {
    ws.parse_next(input)?;
    '('.parse_next(input)?;
    cut_err(|i: &mut &str| keyword(i, "priority"))
        .context(StrContext::Expected(StrContextValue::StringLiteral("priority")))
        .parse_next(input)?;
    let names: Vec<&str> = cut_err(separated(1.., name, (ws, ','))).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(')').parse_next(input)?;
    Ok(names.into_iter().collect())
}

fn domain_def(input: &mut &str) -> ModalResult<Domain> {
    keyword(input, "domain")?;

    let priority = opt(priority_annotation).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(':')
        .context(StrContext::Expected(StrContextValue::CharLiteral(':')))
        .parse_next(input)?;

    let options: Vec<RuleOption> = repeat(0.., option_def).parse_next(input)?;

    Ok(Domain {
        options,
        priority: priority.unwrap_or_default(),
    })
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_spec(input: &mut &str) -> ModalResult<TreeSpec> {
    let domains: Vec<Domain> = repeat(0.., domain_def).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(TreeSpec::new(domains))
}
