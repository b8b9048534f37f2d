//! Dice sources

use rand::Rng;

/// Where die rolls come from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dice {
    /// Uniform roll in `1..=die_faces`
    #[default]
    Random,
    /// Fixed sequence, cycled; restarts from the beginning on every reset
    Scripted { rolls: Vec<u32>, cursor: usize },
}

impl Dice {
    pub fn scripted(rolls: Vec<u32>) -> Self {
        Dice::Scripted {
            rolls,
            cursor: 0,
        }
    }

    /// Roll once. An empty script always yields 1.
    pub fn roll<R: Rng + ?Sized>(&mut self, die_faces: u32, rng: &mut R) -> u32 {
        match self {
            Dice::Random => rng.random_range(1..=die_faces.max(1)),
            Dice::Scripted { rolls, cursor } => {
                if rolls.is_empty() {
                    return 1;
                }
                let roll = rolls[*cursor % rolls.len()];
                *cursor = (*cursor + 1) % rolls.len();
                roll
            }
        }
    }

    pub(crate) fn rewind(&mut self) {
        if let Dice::Scripted { cursor, .. } = self {
            *cursor = 0;
        }
    }
}
