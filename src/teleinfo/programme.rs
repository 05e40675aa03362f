use serde::{Deserialize, Serialize};
use log::trace;

use super::{frame::Frame, label::Label, InvalidFrameError};

/// Schedule of the first relay output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgrammeCircuit1 {
    A,
    B,
    C,
}

/// Schedule of the second relay output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgrammeCircuit2 {
    P0,
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7,
}

/*
    The programme character is read as 8 bits, MSB first:

      bit string position  0 1 2 | 3 4     | 5 6 7
                                 | circ. 1 | circuit 2
*/
const CIRCUIT_1_SHIFT: u8 = 3;
const CIRCUIT_1_MASK: u8 = 0b11;
const CIRCUIT_2_MASK: u8 = 0b111;

fn programme_byte(c: char) -> Result<u8, InvalidFrameError> {
    return u8::try_from(u32::from(c)).map_err(|_| InvalidFrameError::InvalidProgrammeChar(c));
}

pub fn decode_programme_circuit_1(c: char) -> Result<ProgrammeCircuit1, InvalidFrameError> {
    let bits = (programme_byte(c)? >> CIRCUIT_1_SHIFT) & CIRCUIT_1_MASK;
    trace!("Programme circuit 1 bits of '{c}': {bits:02b}");
    match bits {
        0b01 => Ok(ProgrammeCircuit1::A),
        0b10 => Ok(ProgrammeCircuit1::B),
        0b11 => Ok(ProgrammeCircuit1::C),
        _ => Err(InvalidFrameError::UnknownProgrammeCircuit1(bits)),
    }
}

pub fn decode_programme_circuit_2(c: char) -> Result<ProgrammeCircuit2, InvalidFrameError> {
    let bits = programme_byte(c)? & CIRCUIT_2_MASK;
    trace!("Programme circuit 2 bits of '{c}': {bits:03b}");
    Ok(match bits {
        0 => ProgrammeCircuit2::P0,
        1 => ProgrammeCircuit2::P1,
        2 => ProgrammeCircuit2::P2,
        3 => ProgrammeCircuit2::P3,
        4 => ProgrammeCircuit2::P4,
        5 => ProgrammeCircuit2::P5,
        6 => ProgrammeCircuit2::P6,
        _ => ProgrammeCircuit2::P7,
    })
}

impl Frame {
    /// Fourth character of OPTARIF.
    ///
    /// # Panics
    ///
    /// Decoding only happens on a frame that was classified before, so a
    /// missing OPTARIF is a sequencing bug of the caller and panics.
    pub fn get_programme_char(&self) -> Result<char, InvalidFrameError> {
        let optarif = match self.get(Label::OPTARIF) {
            Some(o) => o,
            None => panic!("OPTARIF is missing, the frame must be classified before decoding the programme"),
        };

        optarif
            .chars()
            .nth(3)
            .ok_or_else(|| InvalidFrameError::UnsupportedOptionTarif(optarif.to_string()))
    }

    pub fn get_programme_circuit_1(&self) -> Result<ProgrammeCircuit1, InvalidFrameError> {
        return decode_programme_circuit_1(self.get_programme_char()?);
    }

    pub fn get_programme_circuit_2(&self) -> Result<ProgrammeCircuit2, InvalidFrameError> {
        return decode_programme_circuit_2(self.get_programme_char()?);
    }
}
