//! Selection mapping between tree coordinates and the content model
//!
//! Forward (building): a [`SelectionTracker`] watches the walk of the source
//! tree. Whenever the walk reaches a selection boundary it advances a
//! three-state machine ([`SelectionState`]) through the pure [`reduce`]
//! function and tells the builder whether a selection marker belongs at the
//! current position. Text leaves that contain a boundary are split into runs.
//!
//! Reverse (serializing): a [`SelectionRecorder`] watches the `is_selected`
//! flags of emitted segments and records produced-tree positions for the
//! first selected segment and the end of the selected run.

use crate::dom::{Position, Selection};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Before,
    InSelection,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Start,
    End,
}

/// Advance the selection state machine.
///
/// Returns the new state and whether a selection marker must be emitted.
/// The start boundary always emits a marker; the end boundary emits one only
/// for non-collapsed selections. Events that do not fit the current state
/// (an end before the start, a repeated start) are ignored.
pub fn reduce(
    state: SelectionState,
    event: SelectionEvent,
    collapsed: bool,
) -> (SelectionState, bool) {
    match (state, event) {
        (SelectionState::Before, SelectionEvent::Start) => (SelectionState::InSelection, true),
        (SelectionState::InSelection, SelectionEvent::End) => (SelectionState::After, !collapsed),
        (state, _) => (state, false),
    }
}

/// A piece of a text leaf after selection splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextPiece {
    Run { text: String, is_selected: bool },
    Marker,
}

#[derive(Debug, Clone)]
pub struct SelectionTracker {
    range: Option<Selection>,
    state: SelectionState,
}

impl SelectionTracker {
    pub fn new(range: Option<&Selection>) -> Self {
        SelectionTracker {
            range: range.cloned(),
            state: SelectionState::Before,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_in_selection(&self) -> bool {
        self.state == SelectionState::InSelection
    }

    /// Fire every boundary located at `(path, offset)`. Returns whether a
    /// marker must be emitted there.
    pub fn cross(&mut self, path: &[usize], offset: usize) -> bool {
        let Some(range) = &self.range else {
            return false;
        };
        let collapsed = range.is_collapsed();
        let at_start = range.start.matches(path, offset);
        let at_end = range.end.matches(path, offset);

        let mut emit = false;
        if at_start {
            let (state, marker) = reduce(self.state, SelectionEvent::Start, collapsed);
            self.state = state;
            emit |= marker;
        }
        if at_end {
            let (state, marker) = reduce(self.state, SelectionEvent::End, collapsed);
            self.state = state;
            emit |= marker;
        }
        emit
    }

    /// Split a text leaf at the boundaries that fall inside it. Offsets count
    /// characters; boundaries past the end of the text are never reached.
    pub fn split_text(&mut self, path: &[usize], text: &str) -> Vec<TextPiece> {
        let length = text.chars().count();
        let mut cuts: Vec<usize> = match &self.range {
            Some(range) => [&range.start, &range.end]
                .into_iter()
                .filter(|position| position.path == path && position.offset <= length)
                .map(|position| position.offset)
                .collect(),
            None => Vec::new(),
        };
        cuts.sort_unstable();
        cuts.dedup();

        let mut pieces = Vec::new();
        let mut consumed = 0;
        for cut in cuts {
            self.push_run(&mut pieces, slice_chars(text, consumed, cut));
            consumed = cut;
            if self.cross(path, cut) {
                pieces.push(TextPiece::Marker);
            }
        }
        self.push_run(&mut pieces, slice_chars(text, consumed, length));
        pieces
    }

    fn push_run(&self, pieces: &mut Vec<TextPiece>, text: &str) {
        if !text.is_empty() {
            pieces.push(TextPiece::Run {
                text: text.to_string(),
                is_selected: self.is_in_selection(),
            });
        }
    }

    /// Report boundaries the walk never reached.
    pub fn finish(&self) {
        if let Some(range) = &self.range {
            match self.state {
                SelectionState::Before => {
                    debug!("selection start {} not reached, no selection recorded", range.start)
                }
                SelectionState::InSelection => {
                    debug!("selection end {} not reached, selection runs to the end", range.end)
                }
                SelectionState::After => {}
            }
        }
    }
}

fn slice_chars(text: &str, from: usize, to: usize) -> &str {
    let byte = |index: usize| {
        text.char_indices()
            .nth(index)
            .map_or(text.len(), |(byte, _)| byte)
    };
    &text[byte(from)..byte(to)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecorderPhase {
    Waiting,
    Running,
    Ended,
}

/// Records the produced-tree selection while segments are emitted.
#[derive(Debug, Clone)]
pub struct SelectionRecorder {
    phase: RecorderPhase,
    start: Option<Position>,
    end: Option<Position>,
    last: Option<Position>,
}

impl Default for SelectionRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionRecorder {
    pub fn new() -> Self {
        SelectionRecorder {
            phase: RecorderPhase::Waiting,
            start: None,
            end: None,
            last: None,
        }
    }

    /// Observe one emitted segment occupying `before..after` in the produced
    /// tree.
    pub fn observe(&mut self, is_selected: bool, before: Position, after: Position) {
        match (self.phase, is_selected) {
            (RecorderPhase::Waiting, true) => {
                self.start = Some(before);
                self.end = Some(after.clone());
                self.phase = RecorderPhase::Running;
            }
            (RecorderPhase::Running, true) => self.end = Some(after.clone()),
            (RecorderPhase::Running, false) => self.phase = RecorderPhase::Ended,
            (RecorderPhase::Ended, true) => {
                debug!("ignoring second selected run at {before}");
            }
            _ => {}
        }
        self.last = Some(after);
    }

    /// The recorded selection. When the selected run reached the end of the
    /// content the end is the last emitted position.
    pub fn finish(self) -> Option<Selection> {
        let start = self.start?;
        let end = match self.phase {
            RecorderPhase::Ended => self.end,
            _ => self.last.or(self.end),
        }
        .unwrap_or_else(|| start.clone());
        Some(Selection { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn test_reducer_transitions() {
        use SelectionEvent::*;
        use SelectionState::*;

        assert_eq!(reduce(Before, Start, false), (InSelection, true));
        assert_eq!(reduce(InSelection, End, false), (After, true));
        assert_eq!(reduce(Before, Start, true), (InSelection, true));
        assert_eq!(reduce(InSelection, End, true), (After, false));
        // out of order events are ignored
        assert_eq!(reduce(Before, End, false), (Before, false));
        assert_eq!(reduce(After, Start, false), (After, false));
        assert_eq!(reduce(InSelection, Start, false), (InSelection, false));
    }

    #[test]
    fn test_split_text_three_ways() {
        let selection = Selection::new(pos("0:2"), pos("0:4"));
        let mut tracker = SelectionTracker::new(Some(&selection));
        let pieces = tracker.split_text(&[0], "abcdef");
        assert_eq!(
            pieces,
            vec![
                TextPiece::Run {
                    text: "ab".into(),
                    is_selected: false
                },
                TextPiece::Marker,
                TextPiece::Run {
                    text: "cd".into(),
                    is_selected: true
                },
                TextPiece::Marker,
                TextPiece::Run {
                    text: "ef".into(),
                    is_selected: false
                },
            ]
        );
        assert_eq!(tracker.state(), SelectionState::After);
    }

    #[test]
    fn test_split_text_collapsed() {
        let selection = Selection::collapsed(pos("0:1"));
        let mut tracker = SelectionTracker::new(Some(&selection));
        let pieces = tracker.split_text(&[0], "  ");
        assert_eq!(
            pieces,
            vec![
                TextPiece::Run {
                    text: " ".into(),
                    is_selected: false
                },
                TextPiece::Marker,
                TextPiece::Run {
                    text: " ".into(),
                    is_selected: false
                },
            ]
        );
    }

    #[test]
    fn test_split_text_counts_characters() {
        let selection = Selection::new(pos(":0"), pos("0:2"));
        let mut tracker = SelectionTracker::new(Some(&selection));
        assert!(tracker.cross(&[], 0));
        let pieces = tracker.split_text(&[0], "héllo");
        assert_eq!(
            pieces[0],
            TextPiece::Run {
                text: "hé".into(),
                is_selected: true
            }
        );
    }

    #[test]
    fn test_out_of_range_offset_is_never_reached() {
        let selection = Selection::new(pos("0:1"), pos("0:99"));
        let mut tracker = SelectionTracker::new(Some(&selection));
        let pieces = tracker.split_text(&[0], "abc");
        assert_eq!(pieces.len(), 3);
        assert!(tracker.is_in_selection());
    }

    #[test]
    fn test_recorder_run_with_end() {
        let mut recorder = SelectionRecorder::new();
        recorder.observe(false, pos("0/0/0:0"), pos("0/0/0:3"));
        recorder.observe(true, pos("0/1/0:0"), pos("0/1/0:2"));
        recorder.observe(true, pos("0/2/0:0"), pos("0/2/0:4"));
        recorder.observe(false, pos("0/3/0:0"), pos("0/3/0:1"));
        let selection = recorder.finish().expect("selection");
        assert_eq!(selection.start, pos("0/1/0:0"));
        assert_eq!(selection.end, pos("0/2/0:4"));
    }

    #[test]
    fn test_recorder_synthesizes_end() {
        let mut recorder = SelectionRecorder::new();
        recorder.observe(false, pos("0/0/0:0"), pos("0/0/0:3"));
        recorder.observe(true, pos("1/0/0:0"), pos("1/0/0:5"));
        let selection = recorder.finish().expect("selection");
        assert_eq!(selection.end, pos("1/0/0:5"));
    }

    #[test]
    fn test_recorder_without_selection() {
        let mut recorder = SelectionRecorder::new();
        recorder.observe(false, pos(":0"), pos(":1"));
        assert!(recorder.finish().is_none());
    }
}
