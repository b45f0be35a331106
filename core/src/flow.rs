use crate::random::{item_seed, rand_range, EVADE_X_SALT, EVADE_Y_SALT};

pub const WRONG_PIN_MESSAGE: &str = "Wrong PIN! Try again ♡";
pub const PIN_CHECK_DELAY_MS: u32 = 300;
pub const UNLOCK_DELAY_MS: u32 = 500;
pub const SOLVED_DELAY_MS: u32 = 1000;
pub const EVADE_ATTEMPTS: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Pin,
    Puzzle,
    Question,
    Letter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenFlow {
    screen: Screen,
}

impl Default for ScreenFlow {
    fn default() -> Self {
        Self { screen: Screen::Pin }
    }
}

impl ScreenFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    fn advance(&mut self, from: Screen, to: Screen) -> bool {
        if self.screen != from {
            return false;
        }
        self.screen = to;
        true
    }

    pub fn unlock(&mut self) -> bool {
        self.advance(Screen::Pin, Screen::Puzzle)
    }

    pub fn puzzle_solved(&mut self) -> bool {
        self.advance(Screen::Puzzle, Screen::Question)
    }

    pub fn accept(&mut self) -> bool {
        self.advance(Screen::Question, Screen::Letter)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinKey {
    Digit(u8),
    Back,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinCheck {
    Accepted,
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinPad {
    code: String,
    entered: String,
}

impl PinPad {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            entered: String::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.code.len()
    }

    pub fn filled(&self) -> usize {
        self.entered.len()
    }

    pub fn is_full(&self) -> bool {
        self.filled() >= self.capacity()
    }

    /// Returns true when the entry changed.
    pub fn press(&mut self, key: PinKey) -> bool {
        match key {
            PinKey::Digit(digit) if digit <= 9 && !self.is_full() => {
                self.entered.push(char::from(b'0' + digit));
                true
            }
            PinKey::Digit(_) => false,
            PinKey::Back => self.entered.pop().is_some(),
        }
    }

    /// Only meaningful once full; a partial entry is left alone.
    pub fn check(&mut self) -> Option<PinCheck> {
        if !self.is_full() {
            return None;
        }
        if self.entered == self.code {
            Some(PinCheck::Accepted)
        } else {
            self.entered.clear();
            Some(PinCheck::Rejected)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plea {
    messages: Vec<String>,
    index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PleaStep {
    pub message: String,
    /// The "no" button gives up and "yes" takes over the screen.
    pub surrendered: bool,
}

impl Plea {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages, index: 0 }
    }

    pub fn presses(&self) -> usize {
        self.index
    }

    pub fn is_surrendered(&self) -> bool {
        !self.messages.is_empty() && self.index >= self.messages.len() - 1
    }

    pub fn refuse(&mut self) -> PleaStep {
        let message = if self.messages.is_empty() {
            String::new()
        } else {
            self.messages[self.index % self.messages.len()].clone()
        };
        self.index += 1;
        PleaStep {
            message,
            surrendered: self.is_surrendered(),
        }
    }
}

/// Picks a spot in `[0, max]` at least `min_distance` from `current`. Falls
/// back to the farthest corner when random draws keep landing too close.
pub fn evade_position(current: (f32, f32), max: (f32, f32), min_distance: f32, seed: u32) -> (f32, f32) {
    let max_x = max.0.max(0.0);
    let max_y = max.1.max(0.0);
    let far_enough = |x: f32, y: f32| {
        let dx = x - current.0;
        let dy = y - current.1;
        (dx * dx + dy * dy).sqrt() >= min_distance
    };
    for attempt in 0..EVADE_ATTEMPTS {
        let step_seed = item_seed(seed, attempt);
        let x = rand_range(step_seed, EVADE_X_SALT, 0.0, max_x);
        let y = rand_range(step_seed, EVADE_Y_SALT, 0.0, max_y);
        if far_enough(x, y) {
            return (x, y);
        }
    }
    let corner_x = if current.0 * 2.0 < max_x { max_x } else { 0.0 };
    let corner_y = if current.1 * 2.0 < max_y { max_y } else { 0.0 };
    (corner_x, corner_y)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Envelope {
    open: bool,
}

impl Envelope {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// True only on the click that opens it.
    pub fn open(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backspace_on_empty_pad_does_nothing() {
        let mut pad = PinPad::new("1202");
        assert!(!pad.press(PinKey::Back));
        assert!(pad.press(PinKey::Digit(1)));
        assert!(pad.press(PinKey::Back));
        assert_eq!(pad.filled(), 0);
        assert!(!pad.press(PinKey::Digit(12)));
    }

    #[test]
    fn evade_falls_back_to_far_corner() {
        // Nothing in a 10x10 box is 150 away, so the corner wins.
        assert_eq!(evade_position((2.0, 3.0), (10.0, 10.0), 150.0, 5), (10.0, 10.0));
        assert_eq!(evade_position((9.0, 9.0), (10.0, 10.0), 150.0, 5), (0.0, 0.0));
    }
}
