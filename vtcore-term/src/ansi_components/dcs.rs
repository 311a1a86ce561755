// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ansi::{ParserOutcome, TerminalOutput};
use crate::ansi_components::tracer::{SequenceTraceable, SequenceTracer};

// Device Control String and the App/Privacy/Start-of-string family all share
// the same shape on the wire: an introducer byte, an arbitrary body, and a
// String Terminator (ESC \). The body is opaque to the VT state machine
// itself; callers downstream (Kitty graphics, DECRQSS, etc.) interpret it.

#[derive(Eq, PartialEq, Debug)]
pub enum AnsiStringParserState {
    Body,
    Finished,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum StringIntroducer {
    Dcs,
    Apc,
    Pm,
    Sos,
}

#[derive(Eq, PartialEq, Debug)]
pub struct AnsiStringParser {
    pub(crate) introducer: StringIntroducer,
    pub(crate) state: AnsiStringParserState,
    pub(crate) body: Vec<u8>,
    pub(crate) seq_trace: SequenceTracer,
}

impl SequenceTraceable for AnsiStringParser {
    #[inline]
    fn seq_tracer(&mut self) -> &mut SequenceTracer {
        &mut self.seq_trace
    }
    #[inline]
    fn seq_tracer_ref(&self) -> &SequenceTracer {
        &self.seq_trace
    }
}

impl AnsiStringParser {
    #[must_use]
    pub const fn new(introducer: StringIntroducer) -> Self {
        Self {
            introducer,
            state: AnsiStringParserState::Body,
            body: Vec::new(),
            seq_trace: SequenceTracer::new(),
        }
    }

    #[must_use]
    pub fn trace_str(&self) -> String {
        self.seq_trace.as_str()
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn push(&mut self, b: u8) -> ParserOutcome {
        self.append_trace(b);

        if self.state == AnsiStringParserState::Finished {
            return ParserOutcome::Invalid("Parser Pushed To Once Finished".to_string());
        }

        self.body.push(b);

        if is_string_terminator(&self.body) {
            self.state = AnsiStringParserState::Finished;
            self.seq_trace.trim_control_tail();
            while let Some(&last) = self.body.last() {
                if last == 0x5c || last == 0x1b {
                    self.body.pop();
                } else {
                    break;
                }
            }

            return ParserOutcome::Finished;
        }

        ParserOutcome::Continue
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn ansiparser_inner_string(
        &mut self,
        b: u8,
        output: &mut Vec<TerminalOutput>,
    ) -> ParserOutcome {
        let push_result = self.push(b);

        if let ParserOutcome::Invalid(_) = push_result {
            return push_result;
        }

        if self.state == AnsiStringParserState::Finished {
            match self.introducer {
                StringIntroducer::Dcs => {
                    output.push(TerminalOutput::DeviceControlString(std::mem::take(
                        &mut self.body,
                    )));
                }
                StringIntroducer::Apc => {
                    output.push(TerminalOutput::ApplicationProgramCommand(std::mem::take(
                        &mut self.body,
                    )));
                }
                // Privacy Message and Start-of-String bodies carry no defined
                // terminal semantics here; the sequence is absorbed silently.
                StringIntroducer::Pm | StringIntroducer::Sos => {
                    output.push(TerminalOutput::Skipped);
                }
            }

            return ParserOutcome::Finished;
        }

        ParserOutcome::Continue
    }
}

const fn is_string_terminator(b: &[u8]) -> bool {
    matches!(b, [.., 0x1b, 0x5c] | [.., 0x07])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dcs_body_collected_until_st() {
        let mut p = AnsiStringParser::new(StringIntroducer::Dcs);
        let mut out = Vec::new();
        for &b in b"1$r" {
            assert_eq!(p.ansiparser_inner_string(b, &mut out), ParserOutcome::Continue);
        }
        assert_eq!(
            p.ansiparser_inner_string(0x1b, &mut out),
            ParserOutcome::Continue
        );
        assert_eq!(
            p.ansiparser_inner_string(0x5c, &mut out),
            ParserOutcome::Finished
        );
        assert_eq!(
            out.last(),
            Some(&TerminalOutput::DeviceControlString(b"1$r".to_vec()))
        );
    }

    #[test]
    fn apc_body_collected_until_st() {
        let mut p = AnsiStringParser::new(StringIntroducer::Apc);
        let mut out = Vec::new();
        for &b in b"Gi=1,a=t" {
            let _ = p.ansiparser_inner_string(b, &mut out);
        }
        p.ansiparser_inner_string(0x1b, &mut out);
        p.ansiparser_inner_string(0x5c, &mut out);
        assert_eq!(
            out.last(),
            Some(&TerminalOutput::ApplicationProgramCommand(
                b"Gi=1,a=t".to_vec()
            ))
        );
    }

    #[test]
    fn pm_and_sos_are_absorbed() {
        let mut p = AnsiStringParser::new(StringIntroducer::Pm);
        let mut out = Vec::new();
        p.ansiparser_inner_string(b'x', &mut out);
        p.ansiparser_inner_string(0x07, &mut out);
        assert_eq!(out.last(), Some(&TerminalOutput::Skipped));
    }
}
