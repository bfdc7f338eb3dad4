//! Frame rendering for the console
//!
//! The status line is always the last thing written and has no trailing
//! newline, so elapsed-time updates can rewrite it in place.

use std::io::{self, Write};

use crate::player::PlayerView;

/// Return to column 0 and clear the line
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Draws player views, writing only what changed since the last frame
#[derive(Debug, Default)]
pub(crate) struct FrameRenderer {
    last: Option<PlayerView>,
    show_timings: bool,
}

impl FrameRenderer {
    pub(crate) fn new(show_timings: bool) -> Self {
        Self {
            last: None,
            show_timings,
        }
    }

    /// Force a full redraw on the next render
    pub(crate) fn invalidate(&mut self) {
        self.last = None;
    }

    /// Print a message above the frame
    pub(crate) fn message<W: Write>(&mut self, out: &mut W, text: &str) -> io::Result<()> {
        writeln!(out, "{CLEAR_LINE}{text}")?;
        self.invalidate();
        Ok(())
    }

    pub(crate) fn render<W: Write>(&mut self, view: &PlayerView, out: &mut W) -> io::Result<()> {
        match &self.last {
            Some(last) if last == view => return Ok(()),
            Some(last) if same_layout(last, view) => {
                write!(out, "{CLEAR_LINE}{}", self.status_line(view))?;
            }
            _ => self.write_frame(view, out)?,
        }
        out.flush()?;
        self.last = Some(view.clone());
        Ok(())
    }

    fn write_frame<W: Write>(&self, view: &PlayerView, out: &mut W) -> io::Result<()> {
        writeln!(out, "{CLEAR_LINE}{}", self.words_line(view))?;
        if let Some(edit) = &view.edit {
            writeln!(
                out,
                "  editing #{}: \"{}\"  (save to keep, click elsewhere to discard)",
                edit.index, edit.draft
            )?;
        }
        write!(out, "{}", self.status_line(view))
    }

    fn status_line(&self, view: &PlayerView) -> String {
        let marker = if view.running { "playing" } else { "paused" };
        if self.show_timings {
            format!(
                "Elapsed Time: {} [{}ms] ({marker}) > ",
                view.elapsed_label, view.elapsed_ms
            )
        } else {
            format!("Elapsed Time: {} ({marker}) > ", view.elapsed_label)
        }
    }

    fn words_line(&self, view: &PlayerView) -> String {
        view.transcript
            .iter()
            .enumerate()
            .map(|(index, token)| {
                let word = if self.show_timings {
                    format!("{}({}-{})", token.word, token.start_time, token.end_time())
                } else {
                    token.word.clone()
                };
                if view.active_index == Some(index) {
                    format!("[{word}]")
                } else {
                    word
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Everything except the elapsed time is unchanged
fn same_layout(a: &PlayerView, b: &PlayerView) -> bool {
    a.running == b.running
        && a.active_index == b.active_index
        && a.edit == b.edit
        && a.transcript == b.transcript
}
