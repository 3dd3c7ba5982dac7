use std::fmt;

/// Error from parsing a note name such as "C4" or "F#3".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoteError {
    /// The letter part is not one of the 12 chromatic names.
    InvalidNote(String),
    /// The trailing octave is missing or not a digit.
    InvalidOctave(String),
}

impl fmt::Display for NoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteError::InvalidNote(name) => write!(f, "invalid note name: {name:?}"),
            NoteError::InvalidOctave(name) => write!(f, "invalid octave in note: {name:?}"),
        }
    }
}

impl std::error::Error for NoteError {}

fn chromatic_offset(letters: &str) -> Option<u32> {
    let off = match letters {
        "C" => 0,
        "C#" => 1,
        "D" => 2,
        "D#" => 3,
        "E" => 4,
        "F" => 5,
        "F#" => 6,
        "G" => 7,
        "G#" => 8,
        "A" => 9,
        "A#" => 10,
        "B" => 11,
        _ => return None,
    };
    Some(off)
}

/// Note name to MIDI number. MIDI 0 is C in octave -1, so "C4" is 60.
pub fn note_to_midi(name: &str) -> Result<u32, NoteError> {
    let octave_char = name
        .chars()
        .last()
        .ok_or_else(|| NoteError::InvalidOctave(name.to_string()))?;
    let octave = octave_char
        .to_digit(10)
        .ok_or_else(|| NoteError::InvalidOctave(name.to_string()))?;
    let letters = &name[..name.len() - octave_char.len_utf8()];
    let offset =
        chromatic_offset(letters).ok_or_else(|| NoteError::InvalidNote(name.to_string()))?;
    Ok(12 * (octave + 1) + offset)
}

/// Equal-tempered frequency for a MIDI note, A4 (midi 69) = 440 Hz.
pub fn midi_to_freq(midi: u32) -> f32 {
    440.0 * 2f32.powf((midi as f32 - 69.0) / 12.0)
}

pub fn note_to_freq(name: &str) -> Result<f32, NoteError> {
    Ok(midi_to_freq(note_to_midi(name)?))
}
