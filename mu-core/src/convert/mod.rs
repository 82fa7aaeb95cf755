//! Score tree to tone sequence
//!
//! Walks every group and passage, resolving absolute pitch through the
//! group's mode and exact durations through the nesting of braced, angled
//! and rated elements, then lays passages out in play order.

mod diagnostic;
mod tone;

pub use diagnostic::{Diagnostic, DiagnosticSink, TracingSink};
pub use tone::{Tone, REFERENCE_FREQUENCY};

use crate::rational::{rational, whole, Rational};
use crate::score::{Element, Group, Measure, Metre, Note, Passage, Score};
use num_traits::Zero;

/// Duration base of a top-level element: one crotchet
const CROTCHET: (i64, i64) = (1, 4);

/// Convert a score into tones, reporting problems to `sink`
pub fn convert<S: DiagnosticSink + ?Sized>(score: &Score, sink: &mut S) -> Vec<Tone> {
    Converter::new(sink).convert(score)
}

/// Settings shared by every passage of a group
#[derive(Debug, Clone)]
struct GroupContext {
    /// Semitones from a degree's relative pitch to absolute pitch
    transposition: i32,
    metre: Metre,
    /// Seconds per whole-note unit: `60 * metre.d / bpm`
    seconds_per_unit: Rational,
}

impl GroupContext {
    fn new(group: &Group) -> Self {
        GroupContext {
            transposition: group.mode.transposition(),
            metre: group.metre,
            seconds_per_unit: rational(60 * group.metre.d as i64, group.bpm as i64),
        }
    }
}

/// State scoped to one measure
#[derive(Debug)]
struct MeasureState {
    /// Running accidental per degree (index 0 is degree 1)
    accidentals: [Option<i32>; 7],
    /// Notated length so far
    total: Rational,
}

pub struct Converter<'s, S: DiagnosticSink + ?Sized> {
    sink: &'s mut S,
}

impl<'s, S: DiagnosticSink + ?Sized> Converter<'s, S> {
    pub fn new(sink: &'s mut S) -> Self {
        Converter { sink }
    }

    pub fn convert(&mut self, score: &Score) -> Vec<Tone> {
        let mut passages: Vec<Vec<Tone>> = Vec::with_capacity(score.passage_count());
        for group in &score.groups {
            let context = GroupContext::new(group);
            tracing::debug!(
                transposition = context.transposition,
                metre = %context.metre,
                bpm = group.bpm,
                "converting group"
            );
            for passage in &group.passages {
                let number = passages.len() as u32 + 1;
                passages.push(self.visit_passage(number, passage, &context));
            }
        }
        self.linearize(&passages, score.order.as_deref())
    }

    /// Concatenate passages in play order (declaration order by default)
    fn linearize(&mut self, passages: &[Vec<Tone>], order: Option<&[u32]>) -> Vec<Tone> {
        let Some(order) = order else {
            return passages.iter().flatten().cloned().collect();
        };
        let mut tones = Vec::new();
        for &number in order {
            match number
                .checked_sub(1)
                .and_then(|index| passages.get(index as usize))
            {
                Some(passage) => tones.extend(passage.iter().cloned()),
                None => self.sink.report(Diagnostic::MissingPassage { passage: number }),
            }
        }
        tones
    }

    fn visit_passage(&mut self, number: u32, passage: &Passage, context: &GroupContext) -> Vec<Tone> {
        tracing::trace!(passage = number, measures = passage.measures.len(), "converting passage");
        let mut tones = Vec::new();
        for (index, measure) in passage.measures.iter().enumerate() {
            self.visit_measure(number, index as u32 + 1, measure, context, &mut tones);
        }
        tones
    }

    fn visit_measure(
        &mut self,
        passage: u32,
        measure_number: u32,
        measure: &Measure,
        context: &GroupContext,
        tones: &mut Vec<Tone>,
    ) {
        let mut state = MeasureState::default();
        let base = rational(CROTCHET.0, CROTCHET.1);
        for element in &measure.elements {
            self.visit_element(passage, element, &base, context, &mut state, tones);
        }
        if state.total != context.metre.fraction() {
            self.sink.report(Diagnostic::MeasureDuration {
                passage,
                measure: measure_number,
                expected: context.metre,
                actual: state.total,
            });
        }
    }

    fn visit_element(
        &mut self,
        passage: u32,
        element: &Element,
        base: &Rational,
        context: &GroupContext,
        state: &mut MeasureState,
        tones: &mut Vec<Tone>,
    ) {
        match element {
            Element::TimedNote(note, time) => {
                match note {
                    Note::Sao(sao) => {
                        let slot = &mut state.accidentals[sao.solfa.index()];
                        if sao.accidental.is_some() {
                            *slot = sao.accidental;
                        }
                        let relative = sao.semitones_with(slot.unwrap_or(0));
                        tones.push(Tone::pitched(context.transposition + relative));
                    }
                    Note::Rest => tones.push(Tone::rest()),
                    Note::Tied => {
                        if tones.is_empty() {
                            self.sink.report(Diagnostic::TieAtStart { passage });
                            tones.push(Tone::rest());
                        }
                    }
                }
                let length = base * time.multiplier();
                if let Some(last) = tones.last_mut() {
                    last.seconds += &length * &context.seconds_per_unit;
                }
                state.total += length;
            }
            Element::Braced(children) => {
                for child in children {
                    self.visit_element(passage, child, base, context, state, tones);
                }
            }
            Element::Angled(children) => {
                let half = base / whole(2);
                for child in children {
                    self.visit_element(passage, child, &half, context, state, tones);
                }
            }
            Element::Rated(ratio, inner) => {
                self.visit_element(passage, inner, &(base / ratio.value()), context, state, tones);
            }
        }
    }
}

impl Default for MeasureState {
    fn default() -> Self {
        MeasureState {
            accidentals: [None; 7],
            total: Rational::zero(),
        }
    }
}
