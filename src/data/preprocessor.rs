// ============================================================
// Layer 4 — Utterance Preprocessor
// ============================================================
// Cleans a raw utterance before tokenisation.
//
// Corpus files are hand-edited and often copy-pasted from chat
// logs, so they carry non-breaking spaces, zero-width spaces,
// BOMs and stray tabs. An utterance is a single sentence, so
// all whitespace (newlines included) collapses to one space.

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean a raw utterance into a single trimmed line.
    pub fn clean(&self, text: &str) -> String {
        let mut out        = String::with_capacity(text.len());
        let mut last_space = true;

        for c in text.chars() {
            let c = match c {
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_control() || c.is_whitespace() => ' ',
                c => c,
            };

            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        // At most one trailing space can remain
        if out.ends_with(' ') {
            out.pop();
        }
        out
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
