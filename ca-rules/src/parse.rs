use crate::{ParseRuleError, Rule};
use std::{
    ops::{Range, RangeInclusive},
    str::{self, FromStr},
};

/// A pattern for matching a single character represented as a byte.
trait CharPattern {
    /// Returns `true` if the given character matches this pattern.
    fn matches(&self, c: u8) -> bool;
}

impl CharPattern for u8 {
    fn matches(&self, c: u8) -> bool {
        *self == c
    }
}

impl<const N: usize> CharPattern for &[u8; N] {
    fn matches(&self, c: u8) -> bool {
        self.contains(&c)
    }
}

impl CharPattern for Range<u8> {
    fn matches(&self, c: u8) -> bool {
        self.contains(&c)
    }
}

impl CharPattern for RangeInclusive<u8> {
    fn matches(&self, c: u8) -> bool {
        self.contains(&c)
    }
}

/// A helper struct for parsing rule strings.
///
/// Inspired by the parser for [`IpAddr`](std::net::IpAddr) in Rust's standard
/// library.
struct Parser<'a> {
    input: &'a [u8],
}

impl<'a> Parser<'a> {
    /// Create a new parser from a string.
    const fn new(str: &'a str) -> Self {
        Self {
            input: str.as_bytes(),
        }
    }

    /// Try to parse something with a given parser function, and reset the
    /// parser if it fails.
    fn try_parse<T>(&mut self, parser_fn: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let input = self.input;
        let result = parser_fn(self);
        if result.is_none() {
            self.input = input;
        }
        result
    }

    /// Parse zero or more things with a given parser function.
    fn parse_many<T>(&mut self, parser_fn: impl FnMut(&mut Self) -> Option<T>) -> Vec<T> {
        let mut result = Vec::new();
        let mut parser_fn = parser_fn;
        while let Some(item) = self.try_parse(&mut parser_fn) {
            result.push(item);
        }
        result
    }

    /// Peek at the next character without consuming it.
    fn peek(&self) -> Option<u8> {
        self.input.first().copied()
    }

    /// Try to read the next character and consume it if it matches the given
    /// pattern.
    fn read_matches(&mut self, pattern: impl CharPattern) -> Option<u8> {
        let c = self.peek()?;
        if pattern.matches(c) {
            self.input = &self.input[1..];
            Some(c)
        } else {
            None
        }
    }

    /// Try to read zero or more characters that match the given pattern.
    fn read_matches_many(&mut self, pattern: impl CharPattern) -> &'a [u8] {
        let input = self.input;
        let mut len = 0;
        while let Some(c) = self.peek() {
            if !pattern.matches(c) {
                break;
            }
            self.input = &self.input[1..];
            len += 1;
        }
        &input[..len]
    }

    /// Read a keyword, ignoring ASCII case.
    fn read_keyword(&mut self, keyword: &[u8]) -> Option<()> {
        let prefix = self.input.get(..keyword.len())?;
        if prefix.eq_ignore_ascii_case(keyword) {
            self.input = &self.input[keyword.len()..];
            Some(())
        } else {
            None
        }
    }

    /// Parse a single digit as a `u8`.
    fn parse_digit(&mut self) -> Option<u8> {
        let c = self.read_matches(b'0'..=b'9')?;
        Some(c - b'0')
    }

    /// Parse a number as a `u64`.
    ///
    /// Fails on an empty digit sequence or on overflow.
    fn parse_number(&mut self) -> Option<u64> {
        let digits = self.read_matches_many(b'0'..=b'9');
        str::from_utf8(digits).ok()?.parse().ok()
    }

    /// Parse a sequence of condition digits, sorted and without duplicates.
    fn parse_conditions(&mut self) -> Vec<u8> {
        let mut conditions = self.parse_many(|parser| parser.parse_digit());
        conditions.sort_unstable();
        conditions.dedup();
        conditions
    }

    /// Build a Life-like rule and check its conditions.
    fn life_like(birth: Vec<u8>, survival: Vec<u8>) -> Result<Rule, ParseRuleError> {
        let rule = Rule::LifeLike { birth, survival };
        if rule.check_conditions() {
            Ok(rule)
        } else {
            Err(ParseRuleError::InvalidCondition)
        }
    }

    /// Parse an elementary rule string.
    ///
    /// Returns `None` if this rule string is not an elementary rule string.
    fn parse_elementary(&mut self) -> Option<Result<Rule, ParseRuleError>> {
        // The prefix is optional: `W30`, `Rule 30` and `30` are all accepted.
        if self.read_matches(b"Ww").is_none() && self.read_keyword(b"rule").is_some() {
            self.read_matches_many(b' ');
        }

        let number = self.parse_number()?;

        // Check that there is no more input.
        if self.peek().is_some() {
            return None;
        }

        Some(Ok(Rule::Elementary { number }))
    }

    /// Parse a Life-like rule string with B/S notation or Catagolue notation.
    ///
    /// Returns `None` if this rule string is not using these notations.
    /// Returns `Some(Err(_))` if it is using these notation but there is some
    /// other error.
    fn parse_life_like_bs(&mut self) -> Option<Result<Rule, ParseRuleError>> {
        // Parse the birth sequence.
        self.read_matches(b"Bb")?;
        let birth = self.parse_conditions();

        // Parse the slash. This is optional.
        // If there is no slash, this is a Catagolue rule string.
        self.read_matches(b'/');

        // Parse the survival sequence.
        self.read_matches(b"Ss")?;
        let survival = self.parse_conditions();

        // Check that there is no more input.
        if self.peek().is_some() {
            return None;
        }

        Some(Self::life_like(birth, survival))
    }

    /// Parse a Life-like rule string with S/B notation.
    ///
    /// Returns `None` if this rule string is not using S/B notation.
    /// Returns `Some(Err(_))` if it is using S/B notation but there is some
    /// other error.
    fn parse_life_like_sb(&mut self) -> Option<Result<Rule, ParseRuleError>> {
        // Parse the survival sequence.
        let survival = self.parse_conditions();

        // Parse the slash.
        self.read_matches(b'/')?;

        // Parse the birth sequence.
        let birth = self.parse_conditions();

        // Check that there is no more input.
        if self.peek().is_some() {
            return None;
        }

        Some(Self::life_like(birth, survival))
    }

    /// Parse a Life-like rule string.
    ///
    /// See [`parse_life_like`] for more details.
    fn parse_life_like(&mut self) -> Option<Result<Rule, ParseRuleError>> {
        self.try_parse(Self::parse_life_like_bs)
            .or_else(|| self.try_parse(Self::parse_life_like_sb))
    }
}

/// Parse an [elementary](https://en.wikipedia.org/wiki/Elementary_cellular_automaton) rule string.
///
/// The rule string is a Wolfram number, optionally prefixed by `W` or `Rule`
/// (case-insensitive, `Rule` may be followed by spaces): `30`, `W30` and
/// `Rule 30` all describe rule 30.
///
/// The number is not checked to be in `0..=255`.
pub fn parse_elementary(rule_string: &str) -> Result<Rule, ParseRuleError> {
    let mut parser = Parser::new(rule_string.trim());

    parser
        .parse_elementary()
        .unwrap_or(Err(ParseRuleError::InvalidSyntax))
}

/// Parse a [Life-like](https://conwaylife.com/wiki/Life-like_cellular_automaton) rule string.
///
/// Three notations are supported: B/S notation, S/B notation, and the
/// notation used by Catagolue.
///
/// The rule string is case-insensitive.
///
/// # B/S notation
///
/// The rule string is in the form `B{birth}/S{survival}`, where `{birth}` and
/// `{survival}` are sequences of digits. The digits in `{birth}` are the
/// numbers of neighbors that cause a dead cell to become alive, and the digits
/// in `{survival}` are the numbers of neighbors that cause a live cell to
/// survive. These sequences may be empty.
///
/// # S/B notation
///
/// The rule string is in the form `{survival}/{birth}`.
///
/// # Catagolue notation
///
/// The rule string is in the form `b{birth}s{survival}`. Since this parser is
/// case-insensitive, the only difference between this notation and the B/S
/// notation is the lack of a slash.
pub fn parse_life_like(rule_string: &str) -> Result<Rule, ParseRuleError> {
    let mut parser = Parser::new(rule_string.trim());

    parser
        .parse_life_like()
        .unwrap_or(Err(ParseRuleError::InvalidSyntax))
}

/// Parse either an elementary or a Life-like rule string.
///
/// Elementary notation is tried first. A bare number is always elementary,
/// since every Life-like notation contains a slash or a `B`.
pub fn parse_rule(rule_string: &str) -> Result<Rule, ParseRuleError> {
    let mut parser = Parser::new(rule_string.trim());

    parser
        .try_parse(Parser::parse_elementary)
        .or_else(|| parser.parse_life_like())
        .unwrap_or(Err(ParseRuleError::InvalidSyntax))
}

impl FromStr for Rule {
    type Err = ParseRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rule(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn life(birth: &[u8], survival: &[u8]) -> Rule {
        Rule::LifeLike {
            birth: birth.to_vec(),
            survival: survival.to_vec(),
        }
    }

    #[test]
    fn test_parse_elementary() {
        assert_eq!(parse_elementary("30"), Ok(Rule::Elementary { number: 30 }));
        assert_eq!(parse_elementary("W110"), Ok(Rule::Elementary { number: 110 }));
        assert_eq!(parse_elementary("w90"), Ok(Rule::Elementary { number: 90 }));
        assert_eq!(parse_elementary("Rule 30"), Ok(Rule::Elementary { number: 30 }));
        assert_eq!(parse_elementary("rule184"), Ok(Rule::Elementary { number: 184 }));

        // Out-of-range numbers are kept as written.
        assert_eq!(parse_elementary("W256"), Ok(Rule::Elementary { number: 256 }));

        assert_eq!(parse_elementary("W"), Err(ParseRuleError::InvalidSyntax));
        assert_eq!(parse_elementary("W30x"), Err(ParseRuleError::InvalidSyntax));
        assert_eq!(parse_elementary("-1"), Err(ParseRuleError::InvalidSyntax));
        assert_eq!(
            parse_elementary("99999999999999999999999"),
            Err(ParseRuleError::InvalidSyntax)
        );
    }

    #[test]
    fn test_parse_life_like_bs() {
        assert_eq!(parse_life_like("B3/S23"), Ok(life(&[3], &[2, 3])));
        assert_eq!(parse_life_like("B2/S"), Ok(life(&[2], &[])));
        assert_eq!(parse_life_like("B/S"), Ok(life(&[], &[])));
        assert_eq!(parse_life_like("B36/S23"), Ok(life(&[3, 6], &[2, 3])));
        assert_eq!(parse_life_like("B33/S32"), Ok(life(&[3], &[2, 3])));
    }

    #[test]
    fn test_parse_life_like_sb() {
        assert_eq!(parse_life_like("23/3"), Ok(life(&[3], &[2, 3])));
        assert_eq!(parse_life_like("/2"), Ok(life(&[2], &[])));
        assert_eq!(parse_life_like("/"), Ok(life(&[], &[])));
    }

    #[test]
    fn test_parse_life_like_catagolue() {
        assert_eq!(parse_life_like("b3s23"), Ok(life(&[3], &[2, 3])));
        assert_eq!(parse_life_like("b2s"), Ok(life(&[2], &[])));
    }

    #[test]
    fn test_parse_life_like_errors() {
        assert_eq!(parse_life_like("B9/S23"), Err(ParseRuleError::InvalidCondition));
        assert_eq!(parse_life_like("B3/S23V"), Err(ParseRuleError::InvalidSyntax));
        assert_eq!(parse_life_like("B3S23/"), Err(ParseRuleError::InvalidSyntax));
        assert_eq!(parse_life_like("Life"), Err(ParseRuleError::InvalidSyntax));
    }

    #[test]
    fn test_parse_rule() {
        assert_eq!("W30".parse(), Ok(Rule::Elementary { number: 30 }));
        assert_eq!(" 30 ".parse(), Ok(Rule::Elementary { number: 30 }));
        assert_eq!("B3/S23".parse(), Ok(life(&[3], &[2, 3])));
        assert_eq!("23/3".parse(), Ok(life(&[3], &[2, 3])));
        assert_eq!("".parse::<Rule>(), Err(ParseRuleError::InvalidSyntax));
    }
}
