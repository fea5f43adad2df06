//! Terminal output for dv commands.
//!
//! Two streams: diagnostics (progress, check results, warnings) go to
//! stderr so they never mix with what a command produces, and the produced
//! text (rendered HTML, JSON reports) goes to stdout for piping.

use console::{Style, Term};

/// How a diagnostic line is coloured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tone {
    Plain,
    Ok,
    Warn,
    Fail,
    Heading,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Plain => Style::new(),
            Self::Ok => Style::new().green(),
            Self::Warn => Style::new().yellow(),
            Self::Fail => Style::new().red(),
            Self::Heading => Style::new().cyan().bold(),
        }
    }
}

/// Diagnostics on stderr, results on stdout.
pub(crate) struct Output {
    diagnostics: Term,
    results: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            diagnostics: Term::stderr(),
            results: Term::stdout(),
        }
    }

    fn say(&self, tone: Tone, msg: &str) {
        // A closed stderr must not abort the command.
        let _ = self
            .diagnostics
            .write_line(&tone.style().apply_to(msg).to_string());
    }

    /// Progress or context line.
    pub(crate) fn info(&self, msg: &str) {
        self.say(Tone::Plain, msg);
    }

    /// A check that passed.
    pub(crate) fn success(&self, msg: &str) {
        self.say(Tone::Ok, msg);
    }

    /// Something the site author should look at, e.g. an unreachable page.
    pub(crate) fn warning(&self, msg: &str) {
        self.say(Tone::Warn, msg);
    }

    /// A failed check or the final command error.
    pub(crate) fn error(&self, msg: &str) {
        self.say(Tone::Fail, msg);
    }

    /// Summary heading (e.g. the version count in `dv check`).
    pub(crate) fn highlight(&self, msg: &str) {
        self.say(Tone::Heading, msg);
    }

    /// Write the command's product to stdout.
    ///
    /// Unlike diagnostics, a failed write is an error: the caller asked for
    /// this output.
    pub(crate) fn result(&self, text: &str) -> std::io::Result<()> {
        self.results.write_line(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_tone_leaves_text_unstyled() {
        assert_eq!(Tone::Plain.style().apply_to("done").to_string(), "done");
    }

    #[test]
    fn test_tones_keep_message_text() {
        for tone in [Tone::Ok, Tone::Warn, Tone::Fail, Tone::Heading] {
            assert!(tone.style().apply_to("3 pages").to_string().contains("3 pages"));
        }
    }
}
