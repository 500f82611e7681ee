/// Watches the characters typed during a game for a secret word.  Only
/// created when cheats are enabled in the configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CheatBuffer {
    code: String,
    /// The most recently typed characters, lowercased, no longer than
    /// `code`
    typed: String,
}

/// How a typed character relates to the secret word
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum CheatProgress {
    /// The character is not part of a match in progress
    Miss,
    /// The character continues the start of the secret word
    Partial,
    /// The character completed the secret word
    Complete,
}

impl CheatProgress {
    /// Whether the character was taken as cheat input rather than as a
    /// game command
    pub(crate) fn consumed(self) -> bool {
        self != CheatProgress::Miss
    }
}

impl CheatBuffer {
    pub(crate) fn new(code: &str) -> CheatBuffer {
        CheatBuffer {
            code: code.to_lowercase(),
            typed: String::new(),
        }
    }

    /// Record a typed character.  On [`CheatProgress::Complete`] the buffer
    /// starts over.
    pub(crate) fn push(&mut self, ch: char) -> CheatProgress {
        if self.code.is_empty() {
            return CheatProgress::Miss;
        }
        self.typed.extend(ch.to_lowercase());
        if self.typed.ends_with(&self.code) {
            self.typed.clear();
            return CheatProgress::Complete;
        }
        let excess = self
            .typed
            .chars()
            .count()
            .saturating_sub(self.code.chars().count());
        if excess > 0 {
            self.typed = self.typed.chars().skip(excess).collect();
        }
        // Keep only the longest tail that could still grow into the code
        let start = self
            .typed
            .char_indices()
            .map(|(i, _)| i)
            .find(|&i| self.code.starts_with(&self.typed[i..]));
        match start {
            Some(i) => {
                self.typed.drain(..i);
                CheatProgress::Partial
            }
            None => {
                self.typed.clear();
                CheatProgress::Miss
            }
        }
    }
}
