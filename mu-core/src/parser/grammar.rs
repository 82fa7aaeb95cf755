//! Backtracking recursive-descent parser for numbered notation
//!
//! ```text
//! Score     := Group (";" Group)* Order
//! Order     := "|" | ":" Positive*
//! Group     := Mode Metre Positive Passage ("," Passage)*
//! Mode      := SAO "=" AAO
//! Metre     := Positive "/" Positive
//! Passage   := Measure+
//! Measure   := Element+ "|"
//! Element   := TimedNote | Braced | Angled | Rated
//! TimedNote := Note Time
//! Braced    := "{" Element* "}"
//! Angled    := "<" Element* ">"
//! Rated     := Ratio Element
//! Ratio     := "[" Positive (":" Positive)? "]"
//! Note      := SAO | "0" | "-"
//! SAO       := Accid Solfa Octave
//! AAO       := Alpha Accid Octave
//! Accid     := "@" | "#"+ | "b"+ | ε
//! Octave    := "'"+ | ","+ | ε
//! Time      := "/"* "."*
//! ```
//!
//! Every rule leaves the cursor where it found it when it fails, so the
//! alternatives of a rule are always tried from the same position.
//! Whitespace is skipped before each terminal.

use crate::parser::error::{Failure, ParseError};
use crate::pitch::{Alpha, Solfa};
use crate::score::{
    Aao, Element, Group, Measure, Metre, Mode, Note, Passage, Ratio, Sao, Score, Time,
};
use crate::source::{Position, SourceBuffer};

type PResult<T> = Result<T, Failure>;

/// Parse a complete score
pub fn parse(text: &str) -> Result<Score, ParseError> {
    Parser::new(text).parse_score()
}

/// Parser over a [`SourceBuffer`]
pub struct Parser<'a> {
    buf: SourceBuffer<'a>,
    /// Failure recorded at the furthest position reached so far
    furthest: Option<Failure>,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> Self {
        Parser {
            buf: SourceBuffer::new(text),
            furthest: None,
        }
    }

    /// Current cursor position
    pub fn position(&self) -> Position {
        self.buf.tell()
    }

    /// Parse the whole input as a score.
    /// On failure the error is the deepest expectation that was not met.
    pub fn parse_score(&mut self) -> Result<Score, ParseError> {
        tracing::trace!(len = self.buf.text().len(), "parsing score");
        self.furthest = None;
        match self.attempt(Self::score) {
            Ok(score) => {
                tracing::debug!(
                    groups = score.groups.len(),
                    passages = score.passage_count(),
                    "parsed score"
                );
                Ok(score)
            }
            Err(failure) => {
                let failure = self.furthest.take().unwrap_or(failure);
                Err(failure.locate(&self.buf))
            }
        }
    }

    // ========================================================================
    // Combinators
    // ========================================================================

    /// Run `rule`, seeking back to the starting position if it fails
    fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let saved = self.buf.tell();
        let result = rule(self);
        if result.is_err() {
            self.buf.seek(saved);
        }
        result
    }

    /// Zero or more `rule`, stopping at (and undoing) the first failure
    fn many<T>(&mut self, mut rule: impl FnMut(&mut Self) -> PResult<T>) -> Vec<T> {
        let mut items = Vec::new();
        while let Ok(item) = self.attempt(&mut rule) {
            items.push(item);
        }
        items
    }

    /// One or more `rule`
    fn many1<T>(&mut self, mut rule: impl FnMut(&mut Self) -> PResult<T>) -> PResult<Vec<T>> {
        let first = self.attempt(&mut rule)?;
        let mut items = vec![first];
        items.extend(self.many(rule));
        Ok(items)
    }

    /// `rule (sep rule)*`
    fn separated<T>(
        &mut self,
        sep: char,
        mut rule: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        let first = self.attempt(&mut rule)?;
        let mut items = vec![first];
        items.extend(self.many(|p| {
            p.expect(sep)?;
            rule(p)
        }));
        Ok(items)
    }

    /// Fail at the cursor and remember the failure if it is the furthest yet.
    /// Locating it on a line is left to `parse_score`.
    fn fail<T>(&mut self, message: impl Into<String>) -> PResult<T> {
        let failure = Failure::new(message.into(), self.buf.tell());
        if self
            .furthest
            .as_ref()
            .map_or(true, |furthest| failure.position >= furthest.position)
        {
            self.furthest = Some(failure.clone());
        }
        Err(failure)
    }

    // ========================================================================
    // Terminals
    // ========================================================================

    /// Consume `ch` after optional whitespace
    fn expect(&mut self, ch: char) -> PResult<()> {
        self.attempt(|p| {
            p.buf.skip_whitespace();
            if p.buf.peek_char() == Some(ch) {
                p.buf.advance(1);
                Ok(())
            } else {
                p.fail(format!("Expected {}", ch))
            }
        })
    }

    /// Consume `ch` if it is next, reporting nothing when it is not
    fn eat(&mut self, ch: char) -> bool {
        let saved = self.buf.tell();
        self.buf.skip_whitespace();
        if self.buf.peek_char() == Some(ch) {
            self.buf.advance(1);
            true
        } else {
            self.buf.seek(saved);
            false
        }
    }

    /// Count consecutive occurrences of `ch`
    fn eat_run(&mut self, ch: char) -> u32 {
        let mut count = 0;
        while self.eat(ch) {
            count += 1;
        }
        count
    }

    /// Consume one character accepted by `classify`
    fn expect_class<T>(
        &mut self,
        expected: &str,
        classify: impl FnOnce(char) -> Option<T>,
    ) -> PResult<T> {
        self.attempt(|p| {
            p.buf.skip_whitespace();
            match p.buf.peek_char().and_then(classify) {
                Some(value) => {
                    p.buf.advance(1);
                    Ok(value)
                }
                None => p.fail(expected),
            }
        })
    }

    /// `[1-9][0-9]*`
    pub fn parse_positive(&mut self) -> PResult<u32> {
        self.attempt(|p| {
            p.buf.skip_whitespace();
            let start = p.buf.tell();
            if !matches!(p.buf.peek_char(), Some('1'..='9')) {
                return p.fail("Expected a positive integer");
            }
            let mut digits = String::new();
            while let Some(ch @ '0'..='9') = p.buf.peek_char() {
                digits.push(ch);
                p.buf.advance(1);
            }
            match digits.parse::<u32>() {
                Ok(value) => Ok(value),
                Err(_) => {
                    p.buf.seek(start);
                    p.fail("Positive integer too large")
                }
            }
        })
    }

    fn expect_end(&mut self) -> PResult<()> {
        self.attempt(|p| {
            p.buf.skip_whitespace();
            if p.buf.is_at_end() {
                Ok(())
            } else {
                p.fail("Expected end of input")
            }
        })
    }

    // ========================================================================
    // Structure
    // ========================================================================

    fn score(&mut self) -> PResult<Score> {
        let groups = self.separated(';', Self::parse_group)?;
        let order = self.parse_order()?;
        self.expect_end()?;
        Ok(Score { groups, order })
    }

    /// `"|"` for declaration order, or `":"` and passage numbers
    pub fn parse_order(&mut self) -> PResult<Option<Vec<u32>>> {
        if self.attempt(|p| p.expect('|')).is_ok() {
            return Ok(None);
        }
        if let Ok(order) = self.attempt(|p| {
            p.expect(':')?;
            Ok(p.many(Self::parse_positive))
        }) {
            return Ok(Some(order));
        }
        self.fail("Expected order")
    }

    pub fn parse_group(&mut self) -> PResult<Group> {
        self.attempt(|p| {
            let mode = p.parse_mode()?;
            let metre = p.parse_metre()?;
            let bpm = p.parse_positive()?;
            let passages = p.separated(',', Self::parse_passage)?;
            Ok(Group {
                mode,
                metre,
                bpm,
                passages,
            })
        })
    }

    pub fn parse_mode(&mut self) -> PResult<Mode> {
        self.attempt(|p| {
            let sao = p.parse_sao()?;
            p.expect('=')?;
            let aao = p.parse_aao()?;
            Ok(Mode { sao, aao })
        })
    }

    pub fn parse_metre(&mut self) -> PResult<Metre> {
        self.attempt(|p| {
            let n = p.parse_positive()?;
            p.expect('/')?;
            let d = p.parse_positive()?;
            Ok(Metre { n, d })
        })
    }

    pub fn parse_passage(&mut self) -> PResult<Passage> {
        let measures = self.many1(Self::parse_measure)?;
        Ok(Passage { measures })
    }

    pub fn parse_measure(&mut self) -> PResult<Measure> {
        self.attempt(|p| {
            let elements = p.many1(Self::parse_element)?;
            p.expect('|')?;
            Ok(Measure { elements })
        })
    }

    // ========================================================================
    // Elements
    // ========================================================================

    /// Alternatives in order: timed note, braced, angled, rated
    pub fn parse_element(&mut self) -> PResult<Element> {
        if let Ok(element) = self.attempt(Self::parse_timed_note) {
            return Ok(element);
        }
        if let Ok(element) = self.attempt(Self::parse_braced) {
            return Ok(element);
        }
        if let Ok(element) = self.attempt(Self::parse_angled) {
            return Ok(element);
        }
        if let Ok(element) = self.attempt(Self::parse_rated) {
            return Ok(element);
        }
        self.fail("Expected element")
    }

    fn parse_timed_note(&mut self) -> PResult<Element> {
        let note = self.parse_note()?;
        let time = self.parse_time();
        Ok(Element::TimedNote(note, time))
    }

    fn parse_braced(&mut self) -> PResult<Element> {
        self.attempt(|p| {
            p.expect('{')?;
            let inner = p.many(Self::parse_element);
            p.expect('}')?;
            Ok(Element::Braced(inner))
        })
    }

    fn parse_angled(&mut self) -> PResult<Element> {
        self.attempt(|p| {
            p.expect('<')?;
            let inner = p.many(Self::parse_element);
            p.expect('>')?;
            Ok(Element::Angled(inner))
        })
    }

    fn parse_rated(&mut self) -> PResult<Element> {
        self.attempt(|p| {
            let ratio = p.parse_ratio()?;
            let inner = p.parse_element()?;
            Ok(Element::Rated(ratio, Box::new(inner)))
        })
    }

    pub fn parse_ratio(&mut self) -> PResult<Ratio> {
        self.attempt(|p| {
            p.expect('[')?;
            let n = p.parse_positive()?;
            let d = p
                .attempt(|p| {
                    p.expect(':')?;
                    p.parse_positive()
                })
                .ok();
            p.expect(']')?;
            Ok(Ratio { n, d })
        })
    }

    /// `"/"* "."*`, never fails
    pub fn parse_time(&mut self) -> Time {
        let und = self.eat_run('/');
        let dot = self.eat_run('.');
        Time { und, dot }
    }

    // ========================================================================
    // Notes
    // ========================================================================

    /// Alternatives in order: SAO, rest, tie
    pub fn parse_note(&mut self) -> PResult<Note> {
        if let Ok(sao) = self.parse_sao() {
            return Ok(Note::Sao(sao));
        }
        if self.expect('0').is_ok() {
            return Ok(Note::Rest);
        }
        if self.expect('-').is_ok() {
            return Ok(Note::Tied);
        }
        self.fail("Expected note")
    }

    pub fn parse_sao(&mut self) -> PResult<Sao> {
        self.attempt(|p| {
            let accidental = p.parse_accidental();
            let solfa = p.expect_class("Expected 1-7", Solfa::from_char)?;
            let octave = p.parse_octave();
            Ok(Sao {
                solfa,
                accidental,
                octave,
            })
        })
    }

    pub fn parse_aao(&mut self) -> PResult<Aao> {
        self.attempt(|p| {
            let alpha = p.expect_class("Expected A-G", Alpha::from_char)?;
            let accidental = p.parse_accidental();
            let octave = p.parse_octave();
            Ok(Aao {
                alpha,
                accidental,
                octave,
            })
        })
    }

    /// `@` is an explicit natural, `#`/`b` runs count sharps/flats,
    /// `None` when no mark is present
    pub fn parse_accidental(&mut self) -> Option<i32> {
        if self.eat('@') {
            return Some(0);
        }
        let sharps = self.eat_run('#');
        if sharps > 0 {
            return Some(sharps as i32);
        }
        let flats = self.eat_run('b');
        if flats > 0 {
            return Some(-(flats as i32));
        }
        None
    }

    /// `'` runs raise, `,` runs lower
    pub fn parse_octave(&mut self) -> i32 {
        let up = self.eat_run('\'');
        if up > 0 {
            return up as i32;
        }
        -(self.eat_run(',') as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Location;

    fn measure_of(text: &str) -> Measure {
        Parser::new(text).parse_measure().unwrap()
    }

    #[test]
    fn test_parse_minimal_score() {
        let score = parse("1=C 4/4 60 1 2 3 4||").unwrap();
        assert_eq!(score.groups.len(), 1);
        assert_eq!(score.order, None);
        let group = &score.groups[0];
        assert_eq!(group.metre, Metre { n: 4, d: 4 });
        assert_eq!(group.bpm, 60);
        assert_eq!(group.mode.aao.alpha, Alpha::C);
        assert_eq!(group.passages[0].measures[0].elements.len(), 4);
    }

    #[test]
    fn test_parse_groups_passages_and_order() {
        let text = "1=C 2/4 90 1 2| 3 4|, 5 6|; 6=A 3/4 120 1 2 3| : 3 1 2 2";
        let score = parse(text).unwrap();
        assert_eq!(score.groups.len(), 2);
        assert_eq!(score.groups[0].passages.len(), 2);
        assert_eq!(score.groups[0].passages[0].measures.len(), 2);
        assert_eq!(score.groups[1].bpm, 120);
        assert_eq!(score.order, Some(vec![3, 1, 2, 2]));
    }

    #[test]
    fn test_empty_explicit_order() {
        let score = parse("1=C 1/4 60 1| :").unwrap();
        assert_eq!(score.order, Some(vec![]));
    }

    #[test]
    fn test_accidental_marks() {
        let mut p = Parser::new("@ ### bb x");
        assert_eq!(p.parse_accidental(), Some(0));
        assert_eq!(p.parse_accidental(), Some(3));
        assert_eq!(p.parse_accidental(), Some(-2));
        assert_eq!(p.parse_accidental(), None);
        assert_eq!(p.buf.peek(2), " x");
    }

    #[test]
    fn test_octave_marks() {
        let mut p = Parser::new("'' ,,, x");
        assert_eq!(p.parse_octave(), 2);
        assert_eq!(p.parse_octave(), -3);
        assert_eq!(p.parse_octave(), 0);
    }

    #[test]
    fn test_sao_fields() {
        let sao = Parser::new("#4''").parse_sao().unwrap();
        assert_eq!(sao.solfa.degree(), 4);
        assert_eq!(sao.accidental, Some(1));
        assert_eq!(sao.octave, 2);

        let sao = Parser::new("7,").parse_sao().unwrap();
        assert_eq!(sao.accidental, None);
        assert_eq!(sao.octave, -1);
    }

    #[test]
    fn test_note_alternatives() {
        assert_eq!(Parser::new("0").parse_note().unwrap(), Note::Rest);
        assert_eq!(Parser::new("-").parse_note().unwrap(), Note::Tied);
        assert!(matches!(Parser::new("b3").parse_note().unwrap(), Note::Sao(_)));
        assert!(Parser::new("8").parse_note().is_err());
    }

    #[test]
    fn test_time_marks() {
        let measure = measure_of("1//. 2.. 3|");
        assert_eq!(
            measure.elements,
            vec![
                Element::TimedNote(
                    Note::Sao(Parser::new("1").parse_sao().unwrap()),
                    Time { und: 2, dot: 1 }
                ),
                Element::TimedNote(
                    Note::Sao(Parser::new("2").parse_sao().unwrap()),
                    Time { und: 0, dot: 2 }
                ),
                Element::TimedNote(
                    Note::Sao(Parser::new("3").parse_sao().unwrap()),
                    Time::default()
                ),
            ]
        );
    }

    #[test]
    fn test_nested_groups() {
        let measure = measure_of("{1 <2 3>} [3:2]{4 5 6} [5]<1 2 3 4 5>|");
        assert!(matches!(&measure.elements[0], Element::Braced(inner) if inner.len() == 2));
        match &measure.elements[1] {
            Element::Rated(ratio, inner) => {
                assert_eq!(*ratio, Ratio { n: 3, d: Some(2) });
                assert!(matches!(inner.as_ref(), Element::Braced(v) if v.len() == 3));
            }
            other => panic!("Expected rated element, got {:?}", other),
        }
        match &measure.elements[2] {
            Element::Rated(ratio, inner) => {
                assert_eq!(*ratio, Ratio { n: 5, d: None });
                assert!(matches!(inner.as_ref(), Element::Angled(v) if v.len() == 5));
            }
            other => panic!("Expected rated element, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_brackets_are_elements() {
        let measure = measure_of("{} <> 1|");
        assert_eq!(measure.elements.len(), 3);
    }

    #[test]
    fn test_rated_wraps_single_note() {
        let measure = measure_of("[2:3]1|");
        assert!(matches!(
            &measure.elements[0],
            Element::Rated(Ratio { n: 2, d: Some(3) }, inner)
                if matches!(inner.as_ref(), Element::TimedNote(..))
        ));
    }

    #[test]
    fn test_whitespace_and_newlines_are_insignificant() {
        let compact = parse("1=C 4/4 60 {1 2}3 4||").unwrap();
        let spaced = parse("1 = C\n 4 / 4\n60\n{ 1\n 2 } 3 4 |\n|\n").unwrap();
        assert_eq!(compact, spaced);
    }

    #[test]
    fn test_failed_structure_rules_restore_cursor() {
        for input in ["  {1 2", " 1=", " <1 x>", "  #", " [2:3]", "  x"] {
            let mut p = Parser::new(input);
            assert!(p.parse_measure().is_err());
            assert_eq!(p.position(), Position(0), "measure leaked on {:?}", input);
            assert!(p.parse_group().is_err());
            assert_eq!(p.position(), Position(0), "group leaked on {:?}", input);
            assert!(p.parse_order().is_err());
            assert_eq!(p.position(), Position(0), "order leaked on {:?}", input);
        }
    }

    #[test]
    fn test_failed_element_restores_cursor() {
        for input in ["  {1 2", " <1 x>", "  #", " [2:3]", "  x", " [3"] {
            let mut p = Parser::new(input);
            assert!(p.parse_element().is_err(), "{}", input);
            assert_eq!(p.position(), Position(0), "element leaked on {:?}", input);
        }
    }

    #[test]
    fn test_failed_terminal_restores_whitespace() {
        let mut p = Parser::new("   x");
        assert!(p.parse_positive().is_err());
        assert_eq!(p.position(), Position(0));
        assert!(p.parse_sao().is_err());
        assert_eq!(p.position(), Position(0));
    }

    #[test]
    fn test_ratio_missing_denominator_backtracks() {
        let ratio = Parser::new("[7]").parse_ratio().unwrap();
        assert_eq!(ratio, Ratio { n: 7, d: None });
    }

    #[test]
    fn test_missing_measure_bar_is_located() {
        let err = parse("1=C 4/4 60 1 2 x|").unwrap_err();
        assert_eq!(err.location, Location { line: 1, column: 16 });
        assert_eq!(err.message, "Expected |");
        assert_eq!(err.to_string(), "Expected | at line 1 column 16");
    }

    #[test]
    fn test_unclosed_brace_reports_inner_expectation() {
        let err = parse("1=C 4/4 60\n{1 2 3|").unwrap_err();
        assert_eq!(err.message, "Expected }");
        assert_eq!(err.location, Location { line: 2, column: 7 });
    }

    #[test]
    fn test_missing_order_is_an_error() {
        let err = parse("1=C 4/4 60 1 2 3 4|").unwrap_err();
        assert_eq!(err.message, "Expected order");
        assert_eq!(err.location.column, 20);
    }

    #[test]
    fn test_trailing_text_is_an_error() {
        let err = parse("1=C 1/4 60 1|| 2").unwrap_err();
        assert_eq!(err.message, "Expected end of input");
        assert_eq!(err.location.column, 16);
    }

    #[test]
    fn test_bad_metre() {
        let err = parse("1=C 4 60 1||").unwrap_err();
        assert_eq!(err.message, "Expected /");
    }

    #[test]
    fn test_positive_rejects_zero_and_overflow() {
        assert!(Parser::new("0").parse_positive().is_err());
        assert_eq!(Parser::new("  120").parse_positive().unwrap(), 120);
        let err = parse("1=C 4/4 99999999999 1||").unwrap_err();
        assert_eq!(err.message, "Positive integer too large");
        assert_eq!(err.location.column, 9);
    }

    #[test]
    fn test_rule_failures_carry_position_only() {
        let mut p = Parser::new("1=C 4/4 60\n  1 2");
        assert!(p.parse_group().is_err());
        let failure = p.furthest.clone().unwrap();
        assert_eq!(failure.message, "Expected |");
        assert_eq!(failure.position, Position(16));
        let err = failure.locate(&p.buf);
        assert_eq!(err.location, Location { line: 2, column: 6 });
    }

    #[test]
    fn test_mode_with_accidentals_and_octaves() {
        let mode = Parser::new("b3 = Eb,").parse_mode().unwrap();
        assert_eq!(mode.sao.accidental, Some(-1));
        assert_eq!(mode.sao.solfa.degree(), 3);
        assert_eq!(mode.aao.alpha, Alpha::E);
        assert_eq!(mode.aao.accidental, Some(-1));
        assert_eq!(mode.aao.octave, -1);
    }

    #[test]
    fn test_octave_comma_before_bar() {
        let err = parse("1=C 1/4 60 5,|, 5'|||").unwrap_err();
        // `5'|` closes passage 2, `|` is the order, the extra bar is trailing
        assert_eq!(err.message, "Expected end of input");

        let score = parse("1=C 1/4 60 5,|, 5'||").unwrap();
        let passages = &score.groups[0].passages;
        assert_eq!(passages.len(), 2);
        match &passages[0].measures[0].elements[0] {
            Element::TimedNote(Note::Sao(sao), _) => assert_eq!(sao.octave, -1),
            other => panic!("Expected note, got {:?}", other),
        }
    }
}
