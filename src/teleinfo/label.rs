use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// How the raw value of a label has to be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Text,
    Ptec,
    Hhphc,
    CouleurDemain,
}

macro_rules! labels {
    ($($variant: ident => $name: literal, $vtype: ident;)*) => {
        /// All fields a Teleinfo meter can send, historical and standard mode
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Label {
            $($variant,)*
        }

        impl Label {
            pub const ALL: &'static [Label] = &[$(Label::$variant,)*];

            /// Name of the label as it is written on the wire
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Label::$variant => $name,)*
                }
            }

            pub fn value_type(&self) -> ValueType {
                match self {
                    $(Label::$variant => ValueType::$vtype,)*
                }
            }
        }
    };
}

labels! {
    /* Historical mode */
    ADCO => "ADCO", Text;
    OPTARIF => "OPTARIF", Text;
    ISOUSC => "ISOUSC", Integer;
    BASE => "BASE", Integer;
    HCHC => "HCHC", Integer;
    HCHP => "HCHP", Integer;
    EJPHN => "EJPHN", Integer;
    EJPHPM => "EJPHPM", Integer;
    BBRHCJB => "BBRHCJB", Integer;
    BBRHPJB => "BBRHPJB", Integer;
    BBRHCJW => "BBRHCJW", Integer;
    BBRHPJW => "BBRHPJW", Integer;
    BBRHCJR => "BBRHCJR", Integer;
    BBRHPJR => "BBRHPJR", Integer;
    PEJP => "PEJP", Integer;
    PTEC => "PTEC", Ptec;
    DEMAIN => "DEMAIN", CouleurDemain;
    IINST => "IINST", Integer;
    IINST1 => "IINST1", Integer;
    IINST2 => "IINST2", Integer;
    IINST3 => "IINST3", Integer;
    ADPS => "ADPS", Integer;
    ADIR1 => "ADIR1", Integer;
    ADIR2 => "ADIR2", Integer;
    ADIR3 => "ADIR3", Integer;
    IMAX => "IMAX", Integer;
    IMAX1 => "IMAX1", Integer;
    IMAX2 => "IMAX2", Integer;
    IMAX3 => "IMAX3", Integer;
    PMAX => "PMAX", Integer;
    PAPP => "PAPP", Integer;
    HHPHC => "HHPHC", Hhphc;
    MOTDETAT => "MOTDETAT", Text;
    PPOT => "PPOT", Text;

    /* Standard mode */
    ADSC => "ADSC", Text;
    VTIC => "VTIC", Text;
    DATE => "DATE", Text;
    NGTF => "NGTF", Text;
    LTARF => "LTARF", Text;
    EAST => "EAST", Integer;
    EASF01 => "EASF01", Integer;
    EASF02 => "EASF02", Integer;
    EASF03 => "EASF03", Integer;
    EASF04 => "EASF04", Integer;
    EASF05 => "EASF05", Integer;
    EASF06 => "EASF06", Integer;
    EASF07 => "EASF07", Integer;
    EASF08 => "EASF08", Integer;
    EASF09 => "EASF09", Integer;
    EASF10 => "EASF10", Integer;
    EASD01 => "EASD01", Integer;
    EASD02 => "EASD02", Integer;
    EASD03 => "EASD03", Integer;
    EASD04 => "EASD04", Integer;
    EAIT => "EAIT", Integer;
    ERQ1 => "ERQ1", Integer;
    ERQ2 => "ERQ2", Integer;
    ERQ3 => "ERQ3", Integer;
    ERQ4 => "ERQ4", Integer;
    IRMS1 => "IRMS1", Integer;
    IRMS2 => "IRMS2", Integer;
    IRMS3 => "IRMS3", Integer;
    URMS1 => "URMS1", Integer;
    URMS2 => "URMS2", Integer;
    URMS3 => "URMS3", Integer;
    PREF => "PREF", Integer;
    PCOUP => "PCOUP", Integer;
    SINSTS => "SINSTS", Integer;
    SINSTS1 => "SINSTS1", Integer;
    SINSTS2 => "SINSTS2", Integer;
    SINSTS3 => "SINSTS3", Integer;
    SMAXSN => "SMAXSN", Integer;
    SMAXSN1 => "SMAXSN1", Integer;
    SMAXSN2 => "SMAXSN2", Integer;
    SMAXSN3 => "SMAXSN3", Integer;
    SMAXSN_1 => "SMAXSN-1", Integer;
    SMAXSN1_1 => "SMAXSN1-1", Integer;
    SMAXSN2_1 => "SMAXSN2-1", Integer;
    SMAXSN3_1 => "SMAXSN3-1", Integer;
    SINSTI => "SINSTI", Integer;
    SMAXIN => "SMAXIN", Integer;
    SMAXIN_1 => "SMAXIN-1", Integer;
    CCASN => "CCASN", Integer;
    CCASN_1 => "CCASN-1", Integer;
    CCAIN => "CCAIN", Integer;
    CCAIN_1 => "CCAIN-1", Integer;
    UMOY1 => "UMOY1", Integer;
    UMOY2 => "UMOY2", Integer;
    UMOY3 => "UMOY3", Integer;
    STGE => "STGE", Text;
    DPM1 => "DPM1", Text;
    DPM2 => "DPM2", Text;
    DPM3 => "DPM3", Text;
    FPM1 => "FPM1", Text;
    FPM2 => "FPM2", Text;
    FPM3 => "FPM3", Text;
    MSG1 => "MSG1", Text;
    MSG2 => "MSG2", Text;
    PRM => "PRM", Text;
    RELAIS => "RELAIS", Integer;
    NTARF => "NTARF", Integer;
    NJOURF => "NJOURF", Integer;
    NJOURF_PLUS_1 => "NJOURF+1", Integer;
    PJOURF_PLUS_1 => "PJOURF+1", Text;
    PPOINTE => "PPOINTE", Text;
}

lazy_static! {
    static ref LABELS_BY_NAME: HashMap<&'static str, Label> =
        Label::ALL.iter().map(|l| (l.as_str(), *l)).collect();
}

impl Label {
    pub fn from_str(s: &str) -> Option<Self> {
        return LABELS_BY_NAME.get(s).copied();
    }

    /// Standard mode labels which are sent together with a meter timestamp
    pub fn has_timestamp(&self) -> bool {
        matches!(
            self,
            Label::DATE
                | Label::SMAXSN | Label::SMAXSN1 | Label::SMAXSN2 | Label::SMAXSN3
                | Label::SMAXSN_1 | Label::SMAXSN1_1 | Label::SMAXSN2_1 | Label::SMAXSN3_1
                | Label::SMAXIN | Label::SMAXIN_1
                | Label::CCASN | Label::CCASN_1 | Label::CCAIN | Label::CCAIN_1
                | Label::UMOY1 | Label::UMOY2 | Label::UMOY3
                | Label::DPM1 | Label::DPM2 | Label::DPM3
                | Label::FPM1 | Label::FPM2 | Label::FPM3
        )
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(Label::from_str("ADCO"), Some(Label::ADCO));
        assert_eq!(Label::from_str("SMAXSN-1"), Some(Label::SMAXSN_1));
        assert_eq!(Label::from_str("NJOURF+1"), Some(Label::NJOURF_PLUS_1));
        assert_eq!(Label::from_str("adco"), None);
        assert_eq!(Label::from_str("FOO"), None);
    }

    #[test]
    fn test_names_are_unique() {
        assert_eq!(LABELS_BY_NAME.len(), Label::ALL.len());
        for label in Label::ALL {
            assert_eq!(Label::from_str(label.as_str()), Some(*label));
        }
    }

    #[test]
    fn test_value_types() {
        assert_eq!(Label::PAPP.value_type(), ValueType::Integer);
        assert_eq!(Label::OPTARIF.value_type(), ValueType::Text);
        assert_eq!(Label::PTEC.value_type(), ValueType::Ptec);
        assert_eq!(Label::HHPHC.value_type(), ValueType::Hhphc);
        assert_eq!(Label::DEMAIN.value_type(), ValueType::CouleurDemain);
    }

    #[test]
    fn test_has_timestamp() {
        assert!(Label::DATE.has_timestamp());
        assert!(Label::SMAXSN2_1.has_timestamp());
        assert!(!Label::EAST.has_timestamp());
        assert!(!Label::ADCO.has_timestamp());
    }
}
