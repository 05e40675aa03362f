/*
    Classification of a Teleinfo frame

    The meter generation, the number of phases, the ICC evolution and the
    tariff option are resolved from the labels present in the frame and
    combined into one FrameType. Nothing is cached, every call looks at the
    current content of the frame.
*/

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{frame::Frame, label::Label, InvalidFrameError};

lazy_static! {
    static ref TEMPO_OPTARIF: Regex = Regex::new(r"(?s)^BBR.$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicMode {
    Historical,
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    OnePhased,
    ThreePhased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evolution {
    None,
    Icc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pricing {
    Base,
    Ejp,
    Hc,
    Tempo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameType {
    CbemmIccBase,
    CbemmIccEjp,
    CbemmIccHc,
    CbemmIccTempo,
    CbemmBase,
    CbemmEjp,
    CbemmHc,
    CbemmTempo,
    CbetmShort,
    CbetmLongBase,
    CbetmLongEjp,
    CbetmLongHc,
    CbetmLongTempo,
    LsmmProd,
    Lsmm,
    LsmtProd,
    Lsmt,
    Unknown,
}

impl Frame {
    pub fn get_tic_mode(&self) -> Result<TicMode, InvalidFrameError> {
        if self.contains(Label::ADCO) {
            Ok(TicMode::Historical)
        } else if self.contains(Label::ADSC) {
            Ok(TicMode::Standard)
        } else {
            Err(InvalidFrameError::MissingTicMode)
        }
    }

    /// Only meaningful for historical frames
    pub fn get_phase(&self) -> Result<Phase, InvalidFrameError> {
        if self.contains(Label::IINST) {
            Ok(Phase::OnePhased)
        } else if self.contains(Label::IINST1) {
            Ok(Phase::ThreePhased)
        } else {
            Err(InvalidFrameError::MissingPhase)
        }
    }

    /// Three phase frames without ISOUSC carry no tariff information
    pub fn is_short_frame(&self) -> bool {
        return !self.contains(Label::ISOUSC);
    }

    pub fn get_evolution(&self) -> Evolution {
        if self.contains(Label::PAPP) {
            Evolution::Icc
        } else {
            Evolution::None
        }
    }

    pub fn get_pricing(&self) -> Result<Pricing, InvalidFrameError> {
        let optarif = self
            .get(Label::OPTARIF)
            .ok_or(InvalidFrameError::MissingLabel(Label::OPTARIF))?;

        match optarif {
            "BASE" => Ok(Pricing::Base),
            "EJP." => Ok(Pricing::Ejp),
            "HC.." => Ok(Pricing::Hc),
            o if TEMPO_OPTARIF.is_match(o) => Ok(Pricing::Tempo),
            o => Err(InvalidFrameError::UnsupportedOptionTarif(o.to_string())),
        }
    }

    pub fn get_type(&self) -> Result<FrameType, InvalidFrameError> {
        let frame_type = match self.get_tic_mode()? {
            TicMode::Historical => self.get_historical_type()?,
            TicMode::Standard => self.get_standard_type(),
        };
        debug!("Frame classified as {frame_type}");
        Ok(frame_type)
    }

    /*
        Every Evolution x Pricing pair is mapped here, so FrameType::Unknown is
        never returned for historical frames while an unsupported OPTARIF is a
        hard error. Unknown stays a valid value for callers building a FrameType
        from a name.
    */
    fn get_historical_type(&self) -> Result<FrameType, InvalidFrameError> {
        let phase = self.get_phase()?;
        trace!("Historical frame with phase {phase:?}");

        match phase {
            Phase::OnePhased => {
                let evolution = self.get_evolution();
                let pricing = self.get_pricing()?;
                trace!("Evolution {evolution:?}, pricing {pricing:?}");

                Ok(match (evolution, pricing) {
                    (Evolution::Icc, Pricing::Base) => FrameType::CbemmIccBase,
                    (Evolution::Icc, Pricing::Ejp) => FrameType::CbemmIccEjp,
                    (Evolution::Icc, Pricing::Hc) => FrameType::CbemmIccHc,
                    (Evolution::Icc, Pricing::Tempo) => FrameType::CbemmIccTempo,
                    (Evolution::None, Pricing::Base) => FrameType::CbemmBase,
                    (Evolution::None, Pricing::Ejp) => FrameType::CbemmEjp,
                    (Evolution::None, Pricing::Hc) => FrameType::CbemmHc,
                    (Evolution::None, Pricing::Tempo) => FrameType::CbemmTempo,
                })
            }
            Phase::ThreePhased => {
                if self.is_short_frame() {
                    return Ok(FrameType::CbetmShort);
                }

                Ok(match self.get_pricing()? {
                    Pricing::Base => FrameType::CbetmLongBase,
                    Pricing::Ejp => FrameType::CbetmLongEjp,
                    Pricing::Hc => FrameType::CbetmLongHc,
                    Pricing::Tempo => FrameType::CbetmLongTempo,
                })
            }
        }
    }

    fn get_standard_type(&self) -> FrameType {
        let is_production = self.contains(Label::EAIT);
        let is_three_phase = self.contains(Label::IRMS2);

        match (is_production, is_three_phase) {
            (true, true) => FrameType::LsmtProd,
            (true, false) => FrameType::LsmmProd,
            (false, true) => FrameType::Lsmt,
            (false, false) => FrameType::Lsmm,
        }
    }
}

const CBEMM_COMMON: &[Label] = &[Label::ADCO, Label::ISOUSC, Label::IINST, Label::PTEC, Label::MOTDETAT];
const CBETM_LONG_COMMON: &[Label] = &[
    Label::ADCO, Label::ISOUSC,
    Label::IINST1, Label::IINST2, Label::IINST3,
    Label::IMAX1, Label::IMAX2, Label::IMAX3,
    Label::PTEC, Label::PMAX, Label::PAPP, Label::MOTDETAT, Label::PPOT,
];
const CBETM_SHORT: &[Label] = &[Label::ADCO, Label::IINST1, Label::IINST2, Label::IINST3];

const BASE_OPTION: &[Label] = &[Label::BASE];
const HC_OPTION: &[Label] = &[Label::HCHC, Label::HCHP, Label::HHPHC];
const EJP_OPTION: &[Label] = &[Label::EJPHN, Label::EJPHPM];
const TEMPO_OPTION: &[Label] = &[
    Label::BBRHCJB, Label::BBRHPJB,
    Label::BBRHCJW, Label::BBRHPJW,
    Label::BBRHCJR, Label::BBRHPJR,
    Label::HHPHC,
];

impl FrameType {
    /// Thing type of the device profile bound to this frame type
    pub fn device_type(&self) -> Option<&'static str> {
        match self {
            FrameType::CbemmIccBase => Some("cbemm_evolution_icc_base_electricitymeter"),
            FrameType::CbemmIccEjp => Some("cbemm_evolution_icc_ejp_electricitymeter"),
            FrameType::CbemmIccHc => Some("cbemm_evolution_icc_hc_electricitymeter"),
            FrameType::CbemmIccTempo => Some("cbemm_evolution_icc_tempo_electricitymeter"),
            FrameType::CbemmBase => Some("cbemm_base_electricitymeter"),
            FrameType::CbemmEjp => Some("cbemm_ejp_electricitymeter"),
            FrameType::CbemmHc => Some("cbemm_hc_electricitymeter"),
            FrameType::CbemmTempo => Some("cbemm_tempo_electricitymeter"),
            FrameType::CbetmLongBase => Some("cbetm_base_electricitymeter"),
            FrameType::CbetmLongEjp => Some("cbetm_ejp_electricitymeter"),
            FrameType::CbetmLongHc => Some("cbetm_hc_electricitymeter"),
            FrameType::CbetmLongTempo => Some("cbetm_tempo_electricitymeter"),
            FrameType::LsmmProd => Some("lsmm_prod_electricitymeter"),
            FrameType::Lsmm => Some("lsmm_electricitymeter"),
            FrameType::LsmtProd => Some("lsmt_prod_electricitymeter"),
            FrameType::Lsmt => Some("lsmt_electricitymeter"),
            FrameType::CbetmShort | FrameType::Unknown => None,
        }
    }

    pub fn pricing(&self) -> Option<Pricing> {
        match self {
            FrameType::CbemmIccBase | FrameType::CbemmBase | FrameType::CbetmLongBase => Some(Pricing::Base),
            FrameType::CbemmIccEjp | FrameType::CbemmEjp | FrameType::CbetmLongEjp => Some(Pricing::Ejp),
            FrameType::CbemmIccHc | FrameType::CbemmHc | FrameType::CbetmLongHc => Some(Pricing::Hc),
            FrameType::CbemmIccTempo | FrameType::CbemmTempo | FrameType::CbetmLongTempo => Some(Pricing::Tempo),
            _ => None,
        }
    }

    /// Labels a complete frame of this type has to contain
    pub fn required_labels(&self) -> Vec<Label> {
        let mut labels: Vec<Label> = match self {
            FrameType::CbemmIccBase | FrameType::CbemmIccEjp | FrameType::CbemmIccHc | FrameType::CbemmIccTempo => {
                let mut l = CBEMM_COMMON.to_vec();
                l.push(Label::PAPP);
                l
            }
            FrameType::CbemmBase | FrameType::CbemmEjp | FrameType::CbemmHc | FrameType::CbemmTempo => CBEMM_COMMON.to_vec(),
            FrameType::CbetmLongBase | FrameType::CbetmLongEjp | FrameType::CbetmLongHc | FrameType::CbetmLongTempo => {
                CBETM_LONG_COMMON.to_vec()
            }
            FrameType::CbetmShort => CBETM_SHORT.to_vec(),
            FrameType::Lsmm => vec![Label::ADSC],
            FrameType::LsmmProd => vec![Label::ADSC, Label::EAIT],
            FrameType::Lsmt => vec![Label::ADSC, Label::IRMS2, Label::IRMS3],
            FrameType::LsmtProd => vec![Label::ADSC, Label::EAIT, Label::IRMS2, Label::IRMS3],
            FrameType::Unknown => Vec::new(),
        };

        if let Some(pricing) = self.pricing() {
            labels.extend_from_slice(match pricing {
                Pricing::Base => BASE_OPTION,
                Pricing::Hc => HC_OPTION,
                Pricing::Ejp => EJP_OPTION,
                Pricing::Tempo => TEMPO_OPTION,
            });
        }
        labels
    }

    pub fn check_required_labels(&self, frame: &Frame) -> Result<(), InvalidFrameError> {
        for label in self.required_labels() {
            if !frame.contains(label) {
                return Err(InvalidFrameError::MissingLabel(label));
            }
        }
        Ok(())
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "CBEMM_ICC_BASE" => FrameType::CbemmIccBase,
            "CBEMM_ICC_EJP" => FrameType::CbemmIccEjp,
            "CBEMM_ICC_HC" => FrameType::CbemmIccHc,
            "CBEMM_ICC_TEMPO" => FrameType::CbemmIccTempo,
            "CBEMM_BASE" => FrameType::CbemmBase,
            "CBEMM_EJP" => FrameType::CbemmEjp,
            "CBEMM_HC" => FrameType::CbemmHc,
            "CBEMM_TEMPO" => FrameType::CbemmTempo,
            "CBETM_SHORT" => FrameType::CbetmShort,
            "CBETM_LONG_BASE" => FrameType::CbetmLongBase,
            "CBETM_LONG_EJP" => FrameType::CbetmLongEjp,
            "CBETM_LONG_HC" => FrameType::CbetmLongHc,
            "CBETM_LONG_TEMPO" => FrameType::CbetmLongTempo,
            "LSMM_PROD" => FrameType::LsmmProd,
            "LSMM" => FrameType::Lsmm,
            "LSMT_PROD" => FrameType::LsmtProd,
            "LSMT" => FrameType::Lsmt,
            _ => FrameType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameType::CbemmIccBase => "CBEMM_ICC_BASE",
            FrameType::CbemmIccEjp => "CBEMM_ICC_EJP",
            FrameType::CbemmIccHc => "CBEMM_ICC_HC",
            FrameType::CbemmIccTempo => "CBEMM_ICC_TEMPO",
            FrameType::CbemmBase => "CBEMM_BASE",
            FrameType::CbemmEjp => "CBEMM_EJP",
            FrameType::CbemmHc => "CBEMM_HC",
            FrameType::CbemmTempo => "CBEMM_TEMPO",
            FrameType::CbetmShort => "CBETM_SHORT",
            FrameType::CbetmLongBase => "CBETM_LONG_BASE",
            FrameType::CbetmLongEjp => "CBETM_LONG_EJP",
            FrameType::CbetmLongHc => "CBETM_LONG_HC",
            FrameType::CbetmLongTempo => "CBETM_LONG_TEMPO",
            FrameType::LsmmProd => "LSMM_PROD",
            FrameType::Lsmm => "LSMM",
            FrameType::LsmtProd => "LSMT_PROD",
            FrameType::Lsmt => "LSMT",
            FrameType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_of(values: &[(Label, &str)]) -> Frame {
        let mut frame = Frame::new();
        for (label, value) in values {
            frame.put(*label, value.to_string());
        }
        frame
    }

    #[test]
    fn test_tic_mode() {
        assert_eq!(frame_of(&[(Label::ADCO, "x")]).get_tic_mode().unwrap(), TicMode::Historical);
        assert_eq!(frame_of(&[(Label::ADSC, "x")]).get_tic_mode().unwrap(), TicMode::Standard);
        /* ADCO wins if a broken reader mixes both */
        assert_eq!(
            frame_of(&[(Label::ADCO, "x"), (Label::ADSC, "y")]).get_tic_mode().unwrap(),
            TicMode::Historical
        );
        assert!(matches!(
            frame_of(&[(Label::IINST, "5")]).get_tic_mode(),
            Err(InvalidFrameError::MissingTicMode)
        ));
    }

    #[test]
    fn test_missing_markers_fail_classification() {
        let frame = frame_of(&[(Label::IINST, "5"), (Label::OPTARIF, "BASE")]);
        assert!(matches!(frame.get_type(), Err(InvalidFrameError::MissingTicMode)));

        let frame = frame_of(&[(Label::ADCO, "x"), (Label::OPTARIF, "BASE")]);
        assert!(matches!(frame.get_type(), Err(InvalidFrameError::MissingPhase)));
    }

    #[test]
    fn test_phase_and_short_frame() {
        assert_eq!(frame_of(&[(Label::IINST, "5")]).get_phase().unwrap(), Phase::OnePhased);
        assert_eq!(frame_of(&[(Label::IINST1, "5")]).get_phase().unwrap(), Phase::ThreePhased);
        assert!(frame_of(&[(Label::ADCO, "x")]).get_phase().is_err());

        assert!(frame_of(&[(Label::IINST1, "5")]).is_short_frame());
        assert!(!frame_of(&[(Label::IINST1, "5"), (Label::ISOUSC, "30")]).is_short_frame());
    }

    #[test]
    fn test_evolution() {
        assert_eq!(frame_of(&[(Label::PAPP, "300")]).get_evolution(), Evolution::Icc);
        assert_eq!(frame_of(&[]).get_evolution(), Evolution::None);
    }

    #[test]
    fn test_pricing() {
        let pricing = |o: &str| frame_of(&[(Label::OPTARIF, o)]).get_pricing();

        assert_eq!(pricing("BASE").unwrap(), Pricing::Base);
        assert_eq!(pricing("EJP.").unwrap(), Pricing::Ejp);
        assert_eq!(pricing("HC..").unwrap(), Pricing::Hc);
        assert_eq!(pricing("BBRZ").unwrap(), Pricing::Tempo);
        assert_eq!(pricing("BBR(").unwrap(), Pricing::Tempo);

        for bad in ["BAS", "BASE ", "HC.", "EJP", "BBR", "BBRAB", "bbrA", "XBBR", ""] {
            assert!(
                matches!(pricing(bad), Err(InvalidFrameError::UnsupportedOptionTarif(_))),
                "'{bad}' must be rejected"
            );
        }

        assert!(matches!(
            frame_of(&[]).get_pricing(),
            Err(InvalidFrameError::MissingLabel(Label::OPTARIF))
        ));
    }

    #[test]
    fn test_cbemm_base() {
        let frame = frame_of(&[(Label::ADCO, "x"), (Label::IINST, "5"), (Label::OPTARIF, "BASE")]);
        assert_eq!(frame.get_type().unwrap(), FrameType::CbemmBase);
    }

    #[test]
    fn test_cbemm_tempo() {
        let frame = frame_of(&[(Label::ADCO, "x"), (Label::IINST, "5"), (Label::OPTARIF, "BBRZ")]);
        assert_eq!(frame.get_type().unwrap(), FrameType::CbemmTempo);
    }

    #[test]
    fn test_cbemm_all_options() {
        let cases = [
            ("BASE", FrameType::CbemmBase, FrameType::CbemmIccBase),
            ("EJP.", FrameType::CbemmEjp, FrameType::CbemmIccEjp),
            ("HC..", FrameType::CbemmHc, FrameType::CbemmIccHc),
            ("BBR(", FrameType::CbemmTempo, FrameType::CbemmIccTempo),
        ];
        for (optarif, plain, icc) in cases {
            let mut frame = frame_of(&[(Label::ADCO, "x"), (Label::IINST, "5"), (Label::OPTARIF, optarif)]);
            assert_eq!(frame.get_type().unwrap(), plain);
            frame.put(Label::PAPP, "00330".to_string());
            assert_eq!(frame.get_type().unwrap(), icc);
        }
    }

    #[test]
    fn test_cbemm_unsupported_optarif() {
        let frame = frame_of(&[(Label::ADCO, "x"), (Label::IINST, "5"), (Label::OPTARIF, "ABCD")]);
        assert!(matches!(frame.get_type(), Err(InvalidFrameError::UnsupportedOptionTarif(o)) if o == "ABCD"));
    }

    #[test]
    fn test_cbetm_short_never_reads_optarif() {
        let frame = frame_of(&[(Label::ADCO, "x"), (Label::IINST1, "5"), (Label::PAPP, "300")]);
        assert_eq!(frame.get_type().unwrap(), FrameType::CbetmShort);

        let frame = frame_of(&[(Label::ADCO, "x"), (Label::IINST1, "5"), (Label::OPTARIF, "????")]);
        assert_eq!(frame.get_type().unwrap(), FrameType::CbetmShort);
    }

    #[test]
    fn test_cbetm_long() {
        let cases = [
            ("BASE", FrameType::CbetmLongBase),
            ("EJP.", FrameType::CbetmLongEjp),
            ("HC..", FrameType::CbetmLongHc),
            ("BBRa", FrameType::CbetmLongTempo),
        ];
        for (optarif, expected) in cases {
            let frame = frame_of(&[
                (Label::ADCO, "x"),
                (Label::IINST1, "5"),
                (Label::ISOUSC, "30"),
                (Label::OPTARIF, optarif),
            ]);
            assert_eq!(frame.get_type().unwrap(), expected);
        }

        let frame = frame_of(&[(Label::ADCO, "x"), (Label::IINST1, "5"), (Label::ISOUSC, "30")]);
        assert!(matches!(frame.get_type(), Err(InvalidFrameError::MissingLabel(Label::OPTARIF))));
    }

    #[test]
    fn test_standard_types() {
        let frame = frame_of(&[(Label::ADSC, "x"), (Label::EAIT, "1"), (Label::IRMS2, "2")]);
        assert_eq!(frame.get_type().unwrap(), FrameType::LsmtProd);

        let frame = frame_of(&[(Label::ADSC, "x"), (Label::EAIT, "1")]);
        assert_eq!(frame.get_type().unwrap(), FrameType::LsmmProd);

        let frame = frame_of(&[(Label::ADSC, "x"), (Label::IRMS2, "2")]);
        assert_eq!(frame.get_type().unwrap(), FrameType::Lsmt);

        /* Historical only labels do not matter in standard mode */
        let frame = frame_of(&[(Label::ADSC, "x"), (Label::OPTARIF, "garbage")]);
        assert_eq!(frame.get_type().unwrap(), FrameType::Lsmm);
    }

    #[test]
    fn test_get_type_is_idempotent() {
        let frame = frame_of(&[(Label::ADCO, "x"), (Label::IINST, "5"), (Label::OPTARIF, "HC..")]);
        let first = frame.get_type().unwrap();
        let second = frame.get_type().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_device_type() {
        assert_eq!(FrameType::CbemmBase.device_type(), Some("cbemm_base_electricitymeter"));
        assert_eq!(FrameType::LsmtProd.device_type(), Some("lsmt_prod_electricitymeter"));
        assert_eq!(FrameType::CbetmShort.device_type(), None);
        assert_eq!(FrameType::Unknown.device_type(), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(FrameType::from_str("CBETM_LONG_TEMPO"), FrameType::CbetmLongTempo);
        assert_eq!(FrameType::from_str(FrameType::LsmmProd.as_str()), FrameType::LsmmProd);
        assert_eq!(FrameType::from_str("cbemm_base"), FrameType::Unknown);
        assert_eq!(FrameType::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_required_labels() {
        let labels = FrameType::CbemmIccHc.required_labels();
        assert!(labels.contains(&Label::PAPP));
        assert!(labels.contains(&Label::HCHC));
        assert!(labels.contains(&Label::HHPHC));
        assert!(!labels.contains(&Label::BASE));

        assert_eq!(FrameType::CbetmShort.required_labels().len(), 4);
        assert!(FrameType::Unknown.required_labels().is_empty());

        let frame = frame_of(&[(Label::ADSC, "x"), (Label::EAIT, "1")]);
        assert!(FrameType::LsmmProd.check_required_labels(&frame).is_ok());
        assert!(matches!(
            FrameType::LsmtProd.check_required_labels(&frame),
            Err(InvalidFrameError::MissingLabel(Label::IRMS2))
        ));
    }
}
