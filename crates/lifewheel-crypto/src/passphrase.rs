//! Diceware-style passphrase generation.
//!
//! Word lists use one `<dice digits>\t<word>` pair per line, where every
//! digit is a die face between 1 and 6.

use std::collections::{HashMap, HashSet};

use crate::error::CryptoError;
use crate::random::secure_random_int;
use crate::types::MIN_PASSPHRASE_WORDS;

/// Rolls allowed per requested word before giving up on a sparse list.
const MAX_ROLLS_PER_WORD: usize = 1000;

/// Dice id → word.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashMap<String, String>,
    id_len: usize,
}

impl WordList {
    /// Parse a tab-separated dice word list. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, CryptoError> {
        let mut words = HashMap::new();
        let mut id_len = 0;

        for (index, row) in text.lines().enumerate() {
            let row = row.trim();
            if row.is_empty() {
                continue;
            }
            let line = index + 1;
            let (id, word) = row.split_once('\t').ok_or_else(|| CryptoError::InvalidWordList {
                line,
                reason: "missing tab separator".to_string(),
            })?;
            let word = word.trim();
            if id.is_empty() || !id.bytes().all(|b| (b'1'..=b'6').contains(&b)) {
                return Err(CryptoError::InvalidWordList {
                    line,
                    reason: format!("invalid dice id {:?}", id),
                });
            }
            if word.is_empty() {
                return Err(CryptoError::InvalidWordList {
                    line,
                    reason: "empty word".to_string(),
                });
            }
            if id_len != 0 && id.len() != id_len {
                return Err(CryptoError::InvalidWordList {
                    line,
                    reason: format!("expected {} digits, got {}", id_len, id.len()),
                });
            }
            id_len = id.len();
            words.insert(id.to_string(), word.to_string());
        }

        Ok(Self { words, id_len })
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.words.get(id).map(String::as_str)
    }

    /// Number of dice rolled per word.
    pub fn id_len(&self) -> usize {
        self.id_len
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

pub struct PassphraseGenerator {
    word_list: WordList,
}

impl PassphraseGenerator {
    pub fn new(word_list: WordList) -> Self {
        Self { word_list }
    }

    /// Generate `length` distinct words joined by `-`.
    pub fn generate(&self, length: usize) -> Result<String, CryptoError> {
        if length < MIN_PASSPHRASE_WORDS {
            return Err(CryptoError::PassphraseTooShort {
                min: MIN_PASSPHRASE_WORDS,
                got: length,
            });
        }
        if self.word_list.len() < length {
            return Err(CryptoError::WordListExhausted { wanted: length });
        }

        let mut selected: Vec<&str> = Vec::with_capacity(length);
        let mut seen = HashSet::with_capacity(length);
        let mut rolls = 0;

        while selected.len() < length {
            if rolls >= length * MAX_ROLLS_PER_WORD {
                return Err(CryptoError::WordListExhausted { wanted: length });
            }
            rolls += 1;

            let id = self.roll_id()?;
            if let Some(word) = self.word_list.get(&id) {
                if seen.insert(word) {
                    selected.push(word);
                }
            }
        }

        Ok(selected.join("-"))
    }

    fn roll_id(&self) -> Result<String, CryptoError> {
        let mut id = String::with_capacity(self.word_list.id_len());
        for _ in 0..self.word_list.id_len() {
            let face = secure_random_int(1, 7)?;
            id.push(char::from(b'0' + face as u8));
        }
        Ok(id)
    }
}
