//! Character-by-character text reveal for the terminal panel

/// Typing effect over a fixed string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextReveal {
    source: Vec<char>,
    buffer: String,
    revealed: usize,
    finished: bool,
}

impl TextReveal {
    pub fn new(text: &str) -> Self {
        Self {
            source: text.chars().collect(),
            buffer: String::with_capacity(text.len()),
            revealed: 0,
            finished: false,
        }
    }

    /// Append the next char. Returns `false` once everything is revealed.
    ///
    /// The call that appends the last char also marks the reveal finished.
    pub fn step(&mut self) -> bool {
        match self.source.get(self.revealed) {
            Some(&c) => {
                self.buffer.push(c);
                self.revealed += 1;
                if self.revealed == self.source.len() {
                    self.finished = true;
                }
                true
            }
            None => {
                self.finished = true;
                false
            }
        }
    }

    /// Text revealed so far
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drop the revealed text and start over
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.revealed = 0;
        self.finished = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_in_order() {
        let text = "> hi ─ there";
        let n = text.chars().count();
        let mut reveal = TextReveal::new(text);

        for i in 1..=n {
            assert!(!reveal.is_finished());
            assert!(reveal.step());
            let expected: String = text.chars().take(i).collect();
            assert_eq!(reveal.buffer(), expected);
            assert_eq!(reveal.buffer() == text, i == n);
        }

        assert!(reveal.is_finished());
        assert_eq!(reveal.revealed, n);
        assert!(!reveal.step());
        assert_eq!(reveal.buffer(), text);
    }

    #[test]
    fn test_empty_reveal() {
        let mut reveal = TextReveal::new("");
        assert!(!reveal.step());
        assert!(reveal.is_finished());
    }

    #[test]
    fn test_reset() {
        let mut reveal = TextReveal::new("ab");
        reveal.step();
        reveal.step();
        reveal.reset();
        assert_eq!(reveal.buffer(), "");
        assert!(!reveal.is_finished());
        assert_eq!(reveal.revealed, 0);
    }
}
